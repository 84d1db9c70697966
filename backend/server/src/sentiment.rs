//! # Sentiment Model
//!
//! The fine-tuned DistilBERT checkpoint is served by an external inference server.
//! We only speak its HTTP interface, nothing about the model lives in this crate.
//!
//! ## Wire Format
//! Request
//! ```json
//! {"inputs": "review text"}
//! ```
//!
//! Response, either flat or nested one level (one list per input)
//! ```json
//! [[{"label": "POSITIVE", "score": 0.998}, {"label": "NEGATIVE", "score": 0.002}]]
//! ```
//!
//! ## Labels
//! - `POSITIVE` or `LABEL_1` is positive
//! - `NEGATIVE` or `LABEL_0` is negative
//! - Anything else is ignored, highest recognised score wins
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reviews::Polarity;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub polarity: Polarity,
    pub confidence: f64,
}

#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Prediction, AppError>;

    fn name(&self) -> &'static str;
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Deserialize, Debug)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

pub struct RemoteClassifier {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl RemoteClassifier {
    pub fn new(url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::InternalError(Box::new(e)))?;

        Ok(Self {
            client,
            url: url.to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn classify(&self, text: &str) -> Result<Prediction, AppError> {
        let mut request = self.client.post(&self.url).json(&InferenceRequest { inputs: text });

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let res = request.send().await.map_err(|e| {
            warn!("Inference request failed: {e}");
            AppError::Inference(e.to_string())
        })?;

        let status = res.status();
        if !status.is_success() {
            warn!("Inference server returned {status}");
            return Err(AppError::Inference(format!("inference server returned {status}")));
        }

        let body = res
            .text()
            .await
            .map_err(|e| AppError::Inference(e.to_string()))?;

        #[cfg(feature = "verbose")]
        debug!("Inference body: {body}");

        let prediction = parse_response(&body)?;
        debug!(
            "Classified {} chars as {:?} ({:.3})",
            text.len(),
            prediction.polarity,
            prediction.confidence
        );

        Ok(prediction)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

pub fn parse_response(body: &str) -> Result<Prediction, AppError> {
    let response: InferenceResponse = serde_json::from_str(body)
        .map_err(|e| AppError::Inference(format!("unreadable inference response: {e}")))?;

    let scores = match response {
        InferenceResponse::Nested(mut outer) => {
            if outer.is_empty() {
                Vec::new()
            } else {
                outer.swap_remove(0)
            }
        }
        InferenceResponse::Flat(scores) => scores,
    };

    best_label(&scores)
        .ok_or_else(|| AppError::Inference("no sentiment label in inference response".to_string()))
}

fn best_label(scores: &[LabelScore]) -> Option<Prediction> {
    scores
        .iter()
        .filter_map(|s| {
            map_label(&s.label).map(|polarity| Prediction {
                polarity,
                confidence: s.score.clamp(0.0, 1.0),
            })
        })
        .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
}

fn map_label(label: &str) -> Option<Polarity> {
    match label.to_ascii_uppercase().as_str() {
        "POSITIVE" | "LABEL_1" => Some(Polarity::Positive),
        "NEGATIVE" | "LABEL_0" => Some(Polarity::Negative),
        _ => None,
    }
}
