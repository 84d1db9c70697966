//! # Reviews
//!
//! Payloads shared between the server and the import tool.
//!
//! Everything here is plain JSON over HTTP, field names in `snake_case`.
//!
//! ## Labels
//! - The model only knows two labels, see [`Polarity`]
//! - [`Sentiment`] adds `neutral` for predictions under the confidence threshold
//!
//! ## Counters
//! - `as_str()` values are baked into datastore counter keys, do not rename them
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReviewKind {
    #[default]
    Product,
    Movie,
}

impl ReviewKind {
    pub const ALL: [ReviewKind; 2] = [ReviewKind::Product, ReviewKind::Movie];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewKind::Product => "product",
            ReviewKind::Movie => "movie",
        }
    }
}

/// Raw label emitted by the classifier.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Positive,
    Negative,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    /// Confidence strictly below `neutral_threshold` is reported as neutral.
    pub fn from_prediction(polarity: Polarity, confidence: f64, neutral_threshold: f64) -> Self {
        if confidence < neutral_threshold {
            return Sentiment::Neutral;
        }

        match polarity {
            Polarity::Positive => Sentiment::Positive,
            Polarity::Negative => Sentiment::Negative,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AspectSentiment {
    pub aspect: String,
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub sentences: Vec<String>,
}

/// Result of analysing a review that has not been stored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Analysis {
    pub text: String,
    pub kind: ReviewKind,
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub aspects: Vec<AspectSentiment>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Review {
    pub id: u64,
    pub text: String,
    pub kind: ReviewKind,
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub aspects: Vec<AspectSentiment>,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn from_analysis(id: u64, analysis: Analysis, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text: analysis.text,
            kind: analysis.kind,
            sentiment: analysis.sentiment,
            confidence: analysis.confidence,
            aspects: analysis.aspects,
            created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AnalyzeRequest {
    pub text: String,

    #[serde(default)]
    pub kind: ReviewKind,

    #[serde(default = "default_persist")]
    pub persist: bool,
}

fn default_persist() -> bool {
    true
}

impl AnalyzeRequest {
    pub fn new(text: impl Into<String>, kind: ReviewKind) -> Self {
        Self {
            text: text.into(),
            kind,
            persist: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BatchRequest {
    pub reviews: Vec<AnalyzeRequest>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct SentimentShare {
    pub count: u64,
    pub percentage: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SentimentBreakdown {
    pub positive: SentimentShare,
    pub negative: SentimentShare,
    pub neutral: SentimentShare,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct KindBreakdown {
    pub product: u64,
    pub movie: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AspectStats {
    pub aspect: String,
    pub mentions: u64,
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Stats {
    pub total: u64,
    pub sentiments: SentimentBreakdown,
    pub kinds: KindBreakdown,
    pub aspects: Vec<AspectStats>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorBody {
    pub error: String,
}
