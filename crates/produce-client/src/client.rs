//! Prediction service HTTP client.

use std::path::Path;
use std::time::Instant;

use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info_span, warn, Instrument};

use crate::config::{ClientConfig, StatusPolicy};
use crate::error::{ClientError, ClientResult};
use crate::metrics::record_request;
use crate::types::{RetrainReport, UploadReceipt, Uptime};
use crate::upload::UploadFile;

/// Form field carrying the file payload.
pub const FILE_FIELD: &str = "file";

/// Form field carrying the training label.
pub const LABEL_FIELD: &str = "label";

/// Client for the prediction service.
///
/// Every call is a single request with no retry. Clones share the
/// connection pool and nothing else.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    http: Client,
    config: ClientConfig,
    base_url: String,
}

impl PredictionClient {
    /// Create a new prediction client.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let base_url = config.normalized_base_url()?;

        let mut builder =
            Client::builder().user_agent(concat!("produce-client/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::invalid_config(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            config,
            base_url,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::from_env())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Full URL of a service endpoint.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a file to `/predict` and return the decoded JSON body as-is.
    ///
    /// Non-2xx responses follow the configured [`StatusPolicy`].
    pub async fn predict(&self, file: impl Into<UploadFile>) -> ClientResult<Value> {
        self.send_prediction(file.into(), self.config.status_policy).await
    }

    /// Send a file to `/predict` and decode the body into `T`.
    ///
    /// Any non-2xx response is a [`ClientError::Status`].
    pub async fn predict_as<T: DeserializeOwned>(
        &self,
        file: impl Into<UploadFile>,
    ) -> ClientResult<T> {
        self.send_prediction(file.into(), StatusPolicy::Strict).await
    }

    async fn send_prediction<T: DeserializeOwned>(
        &self,
        file: UploadFile,
        policy: StatusPolicy,
    ) -> ClientResult<T> {
        let url = self.endpoint("/predict");
        debug!(bytes = file.len(), "Sending prediction request to {}", url);

        let form = Form::new().part(FILE_FIELD, file.into_part()?);
        self.execute("predict", policy, self.http.post(&url).multipart(form))
            .await
    }

    /// Read a file from disk and send it to `/predict`.
    pub async fn predict_path(&self, path: impl AsRef<Path>) -> ClientResult<Value> {
        let file = UploadFile::from_path(path).await?;
        self.predict(file).await
    }

    /// Add a labelled image to the service's training set.
    pub async fn upload_training_image(
        &self,
        file: impl Into<UploadFile>,
        label: &str,
    ) -> ClientResult<UploadReceipt> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ClientError::InvalidLabel);
        }

        let file = file.into();
        let url = self.endpoint("/upload_training_image");
        debug!(bytes = file.len(), label, "Uploading training image to {}", url);

        let form = Form::new()
            .part(FILE_FIELD, file.into_part()?)
            .text(LABEL_FIELD, label.to_string());
        self.execute(
            "upload_training_image",
            StatusPolicy::Strict,
            self.http.post(&url).multipart(form),
        )
        .await
    }

    /// Ask the service to retrain on its current training set.
    pub async fn retrain(&self) -> ClientResult<RetrainReport> {
        let url = self.endpoint("/retrain");
        debug!("Requesting retrain at {}", url);

        self.execute("retrain", StatusPolicy::Strict, self.http.post(&url))
            .await
    }

    /// Seconds since the service started.
    pub async fn uptime(&self) -> ClientResult<Uptime> {
        let url = self.endpoint("/uptime");
        self.execute("uptime", StatusPolicy::Strict, self.http.get(&url))
            .await
    }

    /// Send one request with tracing and metrics.
    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        policy: StatusPolicy,
        request: RequestBuilder,
    ) -> ClientResult<T> {
        let span = info_span!("prediction_request", operation = %operation);

        let start = Instant::now();
        let result = Self::exchange(policy, request).instrument(span).await;
        let latency_secs = start.elapsed().as_secs_f64();

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.outcome(),
        };
        record_request(operation, outcome, latency_secs);

        result
    }

    async fn exchange<T: DeserializeOwned>(
        policy: StatusPolicy,
        request: RequestBuilder,
    ) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "Response received");

        if !status.is_success() {
            match policy {
                StatusPolicy::Strict => {
                    return Err(ClientError::status(status.as_u16(), &body));
                }
                StatusPolicy::PassThrough => {
                    warn!("Prediction service returned {}, decoding body anyway", status);
                }
            }
        }

        serde_json::from_slice(&body).map_err(|e| ClientError::decode(e, &body))
    }
}
