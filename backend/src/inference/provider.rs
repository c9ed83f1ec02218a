use actix_web::rt;
use shared::{ModelStatus, Prediction};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tokio::sync::watch;
use uuid::Uuid;

use super::classifier::Classifier;
use crate::error::{InferenceError, ProviderError};

/// Owns the one classifier instance of the process.
///
/// The model is loaded exactly once, on a blocking task started by
/// [`ModelProvider::spawn`]. A failed load is final; nothing retries it.
#[derive(Clone)]
pub struct ModelProvider {
    classifier: Arc<OnceLock<Arc<dyn Classifier>>>,
    status: watch::Receiver<ModelStatus>,
}

impl ModelProvider {
    /// Starts loading in the background. Must be called inside the actix runtime.
    pub fn spawn<F>(load: F) -> Self
    where
        F: FnOnce() -> Result<Arc<dyn Classifier>, InferenceError> + Send + 'static,
    {
        let (tx, status) = watch::channel(ModelStatus::Loading);
        let classifier = Arc::new(OnceLock::new());
        let slot = Arc::clone(&classifier);

        rt::task::spawn_blocking(move || {
            log::info!("Loading classification model...");
            let started = Instant::now();

            let outcome = match panic::catch_unwind(AssertUnwindSafe(load)) {
                Ok(Ok(loaded)) => {
                    let model = loaded.name().to_string();
                    // Set before publishing so `Ready` always implies a classifier.
                    let _ = slot.set(loaded);
                    log::info!("Model {} loaded in {:?}", model, started.elapsed());
                    ModelStatus::Ready { model }
                }
                Ok(Err(e)) => {
                    log::error!("Failed to load model: {}", e);
                    ModelStatus::Failed {
                        error: e.to_string(),
                    }
                }
                Err(payload) => {
                    let reason = panic_reason(payload.as_ref());
                    log::error!("Model loader panicked: {}", reason);
                    ModelStatus::Failed {
                        error: format!("Model loader panicked: {}", reason),
                    }
                }
            };
            tx.send_replace(outcome);
        });

        Self { classifier, status }
    }

    pub fn status(&self) -> ModelStatus {
        let status = self.status.borrow().clone();
        // A loader that died without publishing can never finish.
        if status.is_loading() && self.status.has_changed().is_err() {
            return ModelStatus::Failed {
                error: ProviderError::LoaderVanished.to_string(),
            };
        }
        status
    }

    /// Resolves once loading has finished, with the load error if it failed.
    pub async fn ready(&self) -> Result<(), ProviderError> {
        let mut status = self.status.clone();
        let settled = status
            .wait_for(|s| !s.is_loading())
            .await
            .map_err(|_| ProviderError::LoaderVanished)?
            .clone();

        match settled {
            ModelStatus::Failed { error } => Err(ProviderError::LoadFailed(error)),
            _ => Ok(()),
        }
    }

    /// Runs the classifier on encoded image bytes.
    ///
    /// Blocking; call it from `web::block` or another blocking context.
    pub fn classify(&self, image: &[u8]) -> Result<Vec<Prediction>, ProviderError> {
        let classifier = match self.classifier.get() {
            Some(classifier) => classifier,
            None => {
                return Err(match self.status() {
                    ModelStatus::Failed { error } => ProviderError::LoadFailed(error),
                    _ => ProviderError::NotLoaded,
                });
            }
        };

        let request_id = Uuid::new_v4();
        let started = Instant::now();
        log::debug!("[{}] classifying {} bytes", request_id, image.len());

        match classifier.classify(image) {
            Ok(predictions) => {
                match predictions.first() {
                    Some(top) => log::info!(
                        "[{}] top prediction {:?} ({:.3}) in {:?}",
                        request_id,
                        top.label,
                        top.probability,
                        started.elapsed()
                    ),
                    None => log::warn!("[{}] classifier returned no predictions", request_id),
                }
                Ok(predictions)
            }
            Err(e) => {
                log::error!("[{}] Error analyzing image: {}", request_id, e);
                Err(e.into())
            }
        }
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(reason) = payload.downcast_ref::<&str>() {
        (*reason).to_string()
    } else if let Some(reason) = payload.downcast_ref::<String>() {
        reason.clone()
    } else {
        "unknown panic".to_string()
    }
}
