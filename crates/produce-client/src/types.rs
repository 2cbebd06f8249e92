//! Prediction service response types.
//!
//! `predict` returns raw JSON; these are opt-in typed views of the bodies the
//! service is known to send.

use serde::{Deserialize, Serialize};

/// Classification result from `/predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted class name
    pub label: String,
    /// Probability of the predicted class
    pub confidence: f64,
}

/// Response from `/upload_training_image`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub status: String,
    /// Where the service stored the image
    pub path: String,
}

/// Final-epoch metrics reported after retraining.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    #[serde(default)]
    pub train_acc: f64,
    #[serde(default)]
    pub train_loss: f64,
    #[serde(default)]
    pub val_acc: f64,
    #[serde(default)]
    pub val_loss: f64,
}

/// Response from `/retrain`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrainReport {
    pub status: String,
    #[serde(default)]
    pub metrics: TrainingMetrics,
}

/// Response from `/uptime`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Uptime {
    pub uptime_seconds: f64,
}
