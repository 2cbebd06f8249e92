//! Client for the produce classifier prediction service.
//!
//! The service classifies fruit and vegetable images. This crate uploads an
//! image as a `multipart/form-data` part named `file`, POSTs it to
//! `{base_url}/predict` and hands back the JSON reply. It also wraps the
//! service's training endpoints (`/upload_training_image`, `/retrain`) and
//! `/uptime`.
//!
//! ```no_run
//! use produce_client::{ClientConfig, Prediction, PredictionClient};
//!
//! # async fn run() -> produce_client::ClientResult<()> {
//! let client = PredictionClient::new(ClientConfig::new("http://localhost:8000"))?;
//! let raw = client.predict_path("apple_01.jpg").await?;
//! let typed: Prediction = client.predict_as(std::fs::read("apple_01.jpg")?).await?;
//! println!("{raw} / {} ({:.2})", typed.label, typed.confidence);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod types;
pub mod upload;

pub use client::PredictionClient;
pub use config::{ClientConfig, StatusPolicy};
pub use error::{ClientError, ClientResult};
pub use types::{Prediction, RetrainReport, TrainingMetrics, UploadReceipt, Uptime};
pub use upload::UploadFile;
