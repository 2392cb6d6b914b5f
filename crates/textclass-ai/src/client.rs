//! Lifecycle wrapper around a single classification engine.
//!
//! A client starts unloaded. `load` binds the model resource into an engine,
//! `classify` forwards text to it, and `unload` releases it. Operations that
//! do not match the current state return a [`ClientError`] instead of
//! touching a missing engine.

use std::fmt;

use textclass_core::Category;
use tracing::{debug, error, info};

use crate::context::AssetContext;
use crate::engine::Engine;
use crate::error::ClientError;

/// Model resource loaded when no other name is configured.
pub const DEFAULT_MODEL_NAME: &str = "model.onnx";

/// Externally observable lifecycle state of an [`InferenceClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientStatus {
    Unloaded,
    Loaded,
}

enum ModelState<E> {
    Unloaded,
    Loaded(E),
}

pub struct InferenceClient<E: Engine> {
    context: AssetContext,
    model_name: String,
    state: ModelState<E>,
}

impl<E: Engine> InferenceClient<E> {
    /// Create an unloaded client. Performs no I/O.
    pub fn new(context: AssetContext) -> Self {
        Self {
            context,
            model_name: DEFAULT_MODEL_NAME.to_string(),
            state: ModelState::Unloaded,
        }
    }

    /// Use a different model resource name (relative to the context root).
    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = name.into();
        self
    }

    pub fn context(&self) -> &AssetContext {
        &self.context
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn status(&self) -> ClientStatus {
        match self.state {
            ModelState::Unloaded => ClientStatus::Unloaded,
            ModelState::Loaded(_) => ClientStatus::Loaded,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.status() == ClientStatus::Loaded
    }

    /// Bind the model resource into an engine.
    ///
    /// On failure the client stays unloaded and the error is both logged and
    /// returned. Loading an already-loaded client is rejected and leaves the
    /// current engine in place.
    pub fn load(&mut self) -> Result<(), ClientError> {
        if self.is_loaded() {
            return Err(ClientError::AlreadyLoaded);
        }

        match self.create_engine() {
            Ok(engine) => {
                self.state = ModelState::Loaded(engine);
                info!(
                    model = %self.model_name,
                    root = %self.context.root().display(),
                    "loaded text classifier"
                );
                Ok(())
            }
            Err(e) => {
                error!(model = %self.model_name, error = %format!("{e:#}"), "model load failed");
                Err(ClientError::ModelLoad {
                    name: self.model_name.clone(),
                    source: e.into(),
                })
            }
        }
    }

    fn create_engine(&self) -> anyhow::Result<E> {
        anyhow::ensure!(
            self.context.resolve(&self.model_name).is_some(),
            "resource name {:?} is not inside {}",
            self.model_name,
            self.context.root().display()
        );
        E::create_from_resource(&self.context, &self.model_name)
    }

    /// Classify one text with the loaded engine.
    ///
    /// The engine's results are returned as-is: same order, same scores.
    pub fn classify(&mut self, text: &str) -> Result<Vec<Category>, ClientError> {
        let ModelState::Loaded(engine) = &mut self.state else {
            return Err(ClientError::NotLoaded {
                operation: "classify",
            });
        };

        let categories = engine
            .classify(text)
            .map_err(|e| ClientError::Inference(e.into()))?;

        debug!(
            chars = text.chars().count(),
            categories = categories.len(),
            "classified text"
        );
        Ok(categories)
    }

    /// Release the engine and return to the unloaded state.
    pub fn unload(&mut self) -> Result<(), ClientError> {
        match std::mem::replace(&mut self.state, ModelState::Unloaded) {
            ModelState::Loaded(engine) => {
                engine.close();
                info!(model = %self.model_name, "unloaded text classifier");
                Ok(())
            }
            ModelState::Unloaded => Err(ClientError::NotLoaded {
                operation: "unload",
            }),
        }
    }
}

impl<E: Engine> Drop for InferenceClient<E> {
    fn drop(&mut self) {
        if let ModelState::Loaded(engine) = std::mem::replace(&mut self.state, ModelState::Unloaded)
        {
            debug!(model = %self.model_name, "closing text classifier on drop");
            engine.close();
        }
    }
}

impl<E: Engine> fmt::Debug for InferenceClient<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceClient")
            .field("context", &self.context)
            .field("model_name", &self.model_name)
            .field("status", &self.status())
            .finish()
    }
}
