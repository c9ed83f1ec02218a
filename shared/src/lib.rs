use serde::{Deserialize, Serialize};

pub mod analysis;
pub mod state;

pub use analysis::{interpret, risk_score, RiskStatus, Theme, Verdict};
pub use state::{Action, ImageId, SelectedImage, Step, UploadState};

/// One (label, probability) pair as produced by the classifier.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub probability: f64,
}

impl Prediction {
    pub fn new(label: impl Into<String>, probability: f64) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }
}

#[derive(Serialize, Deserialize, Clone)]
pub struct InferenceRequest {
    /// `data:<mime>;base64,<payload>` as produced by a browser file reader.
    pub image_data: String,
}

/// Predictions in provider order, descending by probability.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InferenceResponse {
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ModelStatus {
    #[default]
    Loading,
    Ready { model: String },
    Failed { error: String },
}

impl ModelStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, ModelStatus::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ModelStatus::Ready { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ModelStatus::Failed { error } => Some(error),
            _ => None,
        }
    }
}
