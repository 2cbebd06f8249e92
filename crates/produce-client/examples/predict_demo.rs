//! Demo: talk to a running prediction service.
//!
//! Run with:
//!   cargo run -p produce-client --example predict_demo -- predict apple_01.jpg
//!   cargo run -p produce-client --example predict_demo -- upload apple_02.jpg apple
//!   cargo run -p produce-client --example predict_demo -- retrain
//!   cargo run -p produce-client --example predict_demo -- uptime
//!
//! The service address comes from `PREDICT_SERVICE_URL` (a `.env` file is honoured).

use anyhow::{bail, Context};
use produce_client::{Prediction, PredictionClient, UploadFile};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const USAGE: &str = "usage: predict_demo <predict FILE | upload FILE LABEL | retrain | uptime>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let client = PredictionClient::from_env().context("failed to build prediction client")?;
    info!("Using prediction service at {}", client.config().base_url);

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["predict", file] => {
            let upload = UploadFile::from_path(file)
                .await
                .with_context(|| format!("failed to read {file}"))?;
            let raw = client.predict(upload).await?;
            match serde_json::from_value::<Prediction>(raw.clone()) {
                Ok(p) => println!("Prediction: {} (confidence {:.2})", p.label, p.confidence),
                Err(_) => println!("{}", serde_json::to_string_pretty(&raw)?),
            }
        }
        ["upload", file, label] => {
            let upload = UploadFile::from_path(file)
                .await
                .with_context(|| format!("failed to read {file}"))?;
            let receipt = client.upload_training_image(upload, label).await?;
            println!("Saved to training set: {}", receipt.path);
        }
        ["retrain"] => {
            let report = client.retrain().await?;
            let m = report.metrics;
            println!("{}", report.status);
            println!("Training Accuracy:   {:.4}", m.train_acc);
            println!("Training Loss:       {:.4}", m.train_loss);
            println!("Validation Accuracy: {:.4}", m.val_acc);
            println!("Validation Loss:     {:.4}", m.val_loss);
        }
        ["uptime"] => {
            let uptime = client.uptime().await?;
            println!("Uptime: {:.1}s", uptime.uptime_seconds);
        }
        _ => bail!(USAGE),
    }

    Ok(())
}

/// Colored output by default, JSON when `LOG_FORMAT=json`.
fn init_tracing() -> anyhow::Result<()> {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("produce_client=info,predict_demo=info"))?;

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(env_filter)
            .init();
    }

    Ok(())
}
