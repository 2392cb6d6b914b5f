use textclass_core::Category;

use crate::context::AssetContext;

/// A loaded text classification model.
///
/// Implementations own whatever the backend needs (sessions, tokenizers,
/// mapped weights). [`InferenceClient`](crate::InferenceClient) holds at most
/// one engine and is the only caller of these methods.
pub trait Engine: Sized {
    /// Bind the named resource inside `context` into a ready engine.
    fn create_from_resource(context: &AssetContext, name: &str) -> anyhow::Result<Self>;

    /// Classify one text. Results come back in the engine's own order.
    fn classify(&mut self, text: &str) -> anyhow::Result<Vec<Category>>;

    /// Release backend resources. The default just drops the engine.
    fn close(self) {}
}
