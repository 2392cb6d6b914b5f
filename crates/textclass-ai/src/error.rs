use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to load model {name:?}: {source}")]
    ModelLoad {
        name: String,
        #[source]
        source: BoxError,
    },

    #[error("no model loaded: call load() before {operation}()")]
    NotLoaded { operation: &'static str },

    #[error("model already loaded: call unload() before load()")]
    AlreadyLoaded,

    #[error("inference failed: {0}")]
    Inference(#[source] BoxError),

    #[error("classification worker failed: {0}")]
    Worker(String),
}

impl ClientError {
    /// True for misuse of the load/classify/unload lifecycle.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::NotLoaded { .. } | Self::AlreadyLoaded)
    }
}
