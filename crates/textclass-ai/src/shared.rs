//! Thread-safe handle over an [`InferenceClient`].
//!
//! Every operation takes the lock for its whole duration, so loads, unloads
//! and classifications from different threads never interleave.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use textclass_core::Category;

use crate::client::{ClientStatus, InferenceClient};
use crate::engine::Engine;
use crate::error::ClientError;

pub struct SharedClient<E: Engine> {
    inner: Arc<Mutex<InferenceClient<E>>>,
}

impl<E: Engine> Clone for SharedClient<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: Engine> SharedClient<E> {
    pub fn new(client: InferenceClient<E>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(client)),
        }
    }

    // A panic inside an engine call cannot leave ModelState half-written,
    // so a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, InferenceClient<E>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn status(&self) -> ClientStatus {
        self.lock().status()
    }

    pub fn load(&self) -> Result<(), ClientError> {
        self.lock().load()
    }

    pub fn classify(&self, text: &str) -> Result<Vec<Category>, ClientError> {
        self.lock().classify(text)
    }

    pub fn unload(&self) -> Result<(), ClientError> {
        self.lock().unload()
    }
}

impl<E: Engine + Send + 'static> SharedClient<E> {
    /// Classify on tokio's blocking pool so inference never stalls the
    /// async executor.
    pub async fn classify_async(&self, text: String) -> Result<Vec<Category>, ClientError> {
        let client = self.clone();
        tokio::task::spawn_blocking(move || client.classify(&text))
            .await
            .map_err(|e| ClientError::Worker(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::DEFAULT_MODEL_NAME;
    use crate::context::AssetContext;
    use crate::test_engine::{KeywordEngine, write_spam_model};
    use std::thread;
    use tempfile::TempDir;

    fn shared() -> (TempDir, SharedClient<KeywordEngine>) {
        let dir = tempfile::tempdir().unwrap();
        write_spam_model(dir.path(), DEFAULT_MODEL_NAME);
        let client = InferenceClient::new(AssetContext::new(dir.path()));
        (dir, SharedClient::new(client))
    }

    #[test]
    fn lifecycle_through_shared_handle() {
        let (_dir, client) = shared();
        assert_eq!(client.status(), ClientStatus::Unloaded);
        assert!(client.classify("hi").unwrap_err().is_precondition());

        client.load().unwrap();
        assert_eq!(client.clone().status(), ClientStatus::Loaded);

        client.unload().unwrap();
        assert!(client.unload().is_err());
    }

    #[test]
    fn concurrent_classification_is_consistent() {
        let (_dir, client) = shared();
        client.load().unwrap();
        let expected = client.classify("free prize for the meeting").unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let c = client.clone();
                thread::spawn(move || {
                    (0..25)
                        .map(|_| c.classify("free prize for the meeting").unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for h in handles {
            for got in h.join().unwrap() {
                assert_eq!(got, expected);
            }
        }
    }

    #[test]
    fn unload_is_visible_to_other_handles() {
        let (_dir, client) = shared();
        client.load().unwrap();

        let other = client.clone();
        thread::spawn(move || other.unload().unwrap())
            .join()
            .unwrap();

        assert_eq!(client.status(), ClientStatus::Unloaded);
    }

    #[tokio::test]
    async fn classify_async_matches_sync() {
        let (_dir, client) = shared();
        client.load().unwrap();

        let sync = client.classify("click to claim your prize").unwrap();
        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let c = client.clone();
                tokio::spawn(async move { c.classify_async("click to claim your prize".into()).await })
            })
            .collect();

        for t in tasks {
            assert_eq!(t.await.unwrap().unwrap(), sync);
        }
    }

    #[tokio::test]
    async fn classify_async_before_load_is_precondition_error() {
        let (_dir, client) = shared();
        let err = client.classify_async("hello".into()).await.unwrap_err();
        assert!(matches!(err, ClientError::NotLoaded { .. }));
    }
}
