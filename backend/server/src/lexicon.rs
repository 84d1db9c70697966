//! # Lexicon Classifier
//!
//! Offline stand-in for the inference server, selected with `CLASSIFIER=lexicon`.
//!
//! - Word scores in `-1.0..=1.0`
//! - Intensifiers multiply the next scored word
//! - A negation flips the next scored word within 3 tokens, damped by 0.8
//! - Intensifiers count toward that window like any other token
//! - Mean score `s` gives polarity, confidence is `0.5 + |s| / 2`
use std::collections::HashMap;

use async_trait::async_trait;
use reviews::Polarity;

use crate::{
    error::AppError,
    sentiment::{Classifier, Prediction},
    utils::words,
};

const NEGATION_WINDOW: usize = 3;
const NEGATION_DAMPING: f64 = 0.8;

const POSITIVE: &[(&str, f64)] = &[
    ("masterpiece", 0.95),
    ("outstanding", 0.9),
    ("excellent", 0.85),
    ("amazing", 0.85),
    ("brilliant", 0.85),
    ("perfect", 0.85),
    ("fantastic", 0.8),
    ("superb", 0.8),
    ("love", 0.75),
    ("loved", 0.75),
    ("wonderful", 0.75),
    ("great", 0.7),
    ("awesome", 0.7),
    ("beautiful", 0.7),
    ("stunning", 0.7),
    ("recommend", 0.6),
    ("enjoyed", 0.6),
    ("durable", 0.55),
    ("reliable", 0.55),
    ("fun", 0.5),
    ("good", 0.5),
    ("nice", 0.45),
    ("solid", 0.45),
    ("comfortable", 0.45),
    ("fast", 0.4),
    ("cheap", 0.3),
    ("fine", 0.25),
    ("decent", 0.25),
];

const NEGATIVE: &[(&str, f64)] = &[
    ("worst", -0.95),
    ("garbage", -0.9),
    ("terrible", -0.85),
    ("awful", -0.85),
    ("horrible", -0.85),
    ("useless", -0.8),
    ("hate", -0.75),
    ("hated", -0.75),
    ("broken", -0.75),
    ("refund", -0.6),
    ("disappointing", -0.65),
    ("disappointed", -0.65),
    ("waste", -0.7),
    ("boring", -0.65),
    ("poor", -0.6),
    ("bad", -0.6),
    ("defective", -0.7),
    ("cheaply", -0.5),
    ("slow", -0.45),
    ("late", -0.4),
    ("dull", -0.45),
    ("flimsy", -0.5),
    ("overpriced", -0.55),
    ("predictable", -0.35),
    ("confusing", -0.4),
    ("mediocre", -0.4),
];

const MODIFIERS: &[(&str, f64)] = &[
    ("very", 1.5),
    ("really", 1.4),
    ("extremely", 1.8),
    ("incredibly", 1.7),
    ("absolutely", 1.6),
    ("totally", 1.4),
    ("so", 1.3),
    ("quite", 1.2),
    ("somewhat", 0.8),
    ("slightly", 0.7),
    ("barely", 0.6),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "nothing", "don't", "doesn't", "didn't", "can't", "cannot", "won't",
    "wouldn't", "isn't", "aren't", "wasn't", "weren't", "hardly",
];

#[derive(Debug, Clone)]
pub struct LexiconClassifier {
    scores: HashMap<&'static str, f64>,
    modifiers: HashMap<&'static str, f64>,
}

impl LexiconClassifier {
    pub fn new() -> Self {
        Self {
            scores: POSITIVE.iter().chain(NEGATIVE.iter()).copied().collect(),
            modifiers: MODIFIERS.iter().copied().collect(),
        }
    }

    /// Mean word score in `-1.0..=1.0`, `0.0` when nothing scored.
    pub fn score(&self, text: &str) -> f64 {
        let mut total = 0.0;
        let mut scored = 0;
        let mut modifier = 1.0;
        let mut since_negation: Option<usize> = None;

        for word in words(text) {
            if NEGATIONS.contains(&word.as_str()) {
                since_negation = Some(0);
                continue;
            }

            if let Some(m) = self.modifiers.get(word.as_str()) {
                modifier = *m;
            } else if let Some(base) = self.scores.get(word.as_str()) {
                let mut score = base * modifier;

                if since_negation.is_some_and(|n| n < NEGATION_WINDOW) {
                    score = -score * NEGATION_DAMPING;
                    since_negation = None;
                }

                total += score;
                scored += 1;
                modifier = 1.0;
            }

            since_negation = since_negation
                .map(|n| n + 1)
                .filter(|n| *n < NEGATION_WINDOW);
        }

        if scored == 0 {
            return 0.0;
        }

        (total / scored as f64).clamp(-1.0, 1.0)
    }
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Classifier for LexiconClassifier {
    async fn classify(&self, text: &str) -> Result<Prediction, AppError> {
        let score = self.score(text);

        let polarity = if score < 0.0 {
            Polarity::Negative
        } else {
            Polarity::Positive
        };

        Ok(Prediction {
            polarity,
            confidence: 0.5 + score.abs() / 2.0,
        })
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_and_negative() {
        let lexicon = LexiconClassifier::new();

        assert!(lexicon.score("An excellent, beautiful film") > 0.5);
        assert!(lexicon.score("Terrible. A total waste of money") < -0.5);
        assert_eq!(lexicon.score("It arrived on Tuesday"), 0.0);
    }

    #[test]
    fn test_negation_flips() {
        let lexicon = LexiconClassifier::new();

        assert!(lexicon.score("not good") < 0.0);
        assert!(lexicon.score("wasn't bad at all") > 0.0);
    }

    #[test]
    fn test_negation_window_expires() {
        let lexicon = LexiconClassifier::new();

        assert!(lexicon.score("not what i expected from the trailer but good") > 0.0);
    }

    #[test]
    fn test_intensifiers_use_up_negation_window() {
        let lexicon = LexiconClassifier::new();

        assert!(lexicon.score("not very good") < 0.0);
        assert!(lexicon.score("not very very very good") > 0.0);
    }

    #[test]
    fn test_modifier() {
        let lexicon = LexiconClassifier::new();

        assert!(lexicon.score("very good") > lexicon.score("good"));
        assert!(lexicon.score("slightly boring") > lexicon.score("boring"));
    }

    #[tokio::test]
    async fn test_classify_confidence() {
        let lexicon = LexiconClassifier::new();

        let neutral = lexicon.classify("It is a chair").await.unwrap();
        assert_eq!(neutral.polarity, Polarity::Positive);
        assert_eq!(neutral.confidence, 0.5);

        let negative = lexicon.classify("awful").await.unwrap();
        assert_eq!(negative.polarity, Polarity::Negative);
        assert!((negative.confidence - 0.925).abs() < 1e-9);
    }
}
