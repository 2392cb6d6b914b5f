//! Text classification client: model lifecycle over a pluggable engine, with
//! an ONNX Runtime engine behind the `onnx` feature.

mod client;
mod context;
mod engine;
mod error;
mod shared;

#[cfg(feature = "onnx")]
mod onnx;
#[cfg(test)]
mod test_engine;

pub use client::{ClientStatus, DEFAULT_MODEL_NAME, InferenceClient};
pub use context::{ASSETS_ENV, AssetContext, DEFAULT_ASSETS_DIR};
pub use engine::Engine;
pub use error::{BoxError, ClientError};
pub use shared::SharedClient;

#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;

/// Client bound to the ONNX Runtime engine.
#[cfg(feature = "onnx")]
pub type OnnxClient = InferenceClient<OnnxClassifier>;
