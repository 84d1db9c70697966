use std::sync::Arc;

use reviews::{Analysis, AspectSentiment, ReviewKind, Sentiment};
use tracing::debug;

use crate::{aspects::extract, error::AppError, sentiment::Classifier, utils::normalize};

pub struct Analyzer {
    classifier: Arc<dyn Classifier>,
    neutral_threshold: f64,
    max_review_chars: usize,
}

impl Analyzer {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        neutral_threshold: f64,
        max_review_chars: usize,
    ) -> Self {
        Self {
            classifier,
            neutral_threshold,
            max_review_chars,
        }
    }

    pub fn classifier_name(&self) -> &'static str {
        self.classifier.name()
    }

    pub async fn analyze(&self, raw: &str, kind: ReviewKind) -> Result<Analysis, AppError> {
        let text = normalize(raw);

        if text.is_empty() {
            return Err(AppError::EmptyReview);
        }

        if text.chars().count() > self.max_review_chars {
            return Err(AppError::ReviewTooLong {
                max: self.max_review_chars,
            });
        }

        let (sentiment, confidence) = self.resolve(&text).await?;

        let mut aspects = Vec::new();
        // line breaks are sentence boundaries, so extraction runs on the raw text
        for found in extract(raw.trim(), kind) {
            let (aspect_sentiment, aspect_confidence) =
                self.resolve(&found.sentences.join(". ")).await?;

            aspects.push(AspectSentiment {
                aspect: found.aspect.to_string(),
                sentiment: aspect_sentiment,
                confidence: aspect_confidence,
                sentences: found.sentences,
            });
        }

        debug!(
            "Analyzed {} review: {} with {} aspects",
            kind.as_str(),
            sentiment.as_str(),
            aspects.len()
        );

        Ok(Analysis {
            text,
            kind,
            sentiment,
            confidence,
            aspects,
        })
    }

    async fn resolve(&self, text: &str) -> Result<(Sentiment, f64), AppError> {
        let prediction = self.classifier.classify(text).await?;

        let sentiment = Sentiment::from_prediction(
            prediction.polarity,
            prediction.confidence,
            self.neutral_threshold,
        );

        Ok((sentiment, prediction.confidence))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use reviews::Polarity;

    use super::*;
    use crate::{lexicon::LexiconClassifier, sentiment::Prediction};

    fn analyzer() -> Analyzer {
        Analyzer::new(Arc::new(LexiconClassifier::new()), 0.6, 100)
    }

    struct CountingClassifier {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Classifier for CountingClassifier {
        async fn classify(&self, _text: &str) -> Result<Prediction, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            Ok(Prediction {
                polarity: Polarity::Positive,
                confidence: 0.9,
            })
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    struct FailingClassifier;

    #[async_trait]
    impl Classifier for FailingClassifier {
        async fn classify(&self, _text: &str) -> Result<Prediction, AppError> {
            Err(AppError::Inference("down".to_string()))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_overall_and_aspects() {
        let analysis = analyzer()
            .analyze(
                "The acting was excellent.  The plot was boring.",
                ReviewKind::Movie,
            )
            .await
            .unwrap();

        assert_eq!(analysis.text, "The acting was excellent. The plot was boring.");
        assert_eq!(analysis.aspects.len(), 2);
        assert_eq!(analysis.aspects[0].aspect, "acting");
        assert_eq!(analysis.aspects[0].sentiment, Sentiment::Positive);
        assert_eq!(analysis.aspects[1].aspect, "plot");
        assert_eq!(analysis.aspects[1].sentiment, Sentiment::Negative);
    }

    #[tokio::test]
    async fn test_multi_line_review() {
        let analysis = analyzer()
            .analyze("Great cast\nBoring plot", ReviewKind::Movie)
            .await
            .unwrap();

        assert_eq!(analysis.text, "Great cast Boring plot");
        assert_eq!(analysis.aspects.len(), 2);
        assert_eq!(analysis.aspects[0].aspect, "acting");
        assert_eq!(analysis.aspects[0].sentences, vec!["Great cast"]);
        assert_eq!(analysis.aspects[0].sentiment, Sentiment::Positive);
        assert_eq!(analysis.aspects[1].aspect, "plot");
        assert_eq!(analysis.aspects[1].sentences, vec!["Boring plot"]);
        assert_eq!(analysis.aspects[1].sentiment, Sentiment::Negative);
    }

    #[tokio::test]
    async fn test_neutral_when_unsure() {
        let analysis = analyzer()
            .analyze("It is a kettle", ReviewKind::Product)
            .await
            .unwrap();

        assert_eq!(analysis.sentiment, Sentiment::Neutral);
        assert!(analysis.aspects.is_empty());
    }

    #[tokio::test]
    async fn test_validation() {
        let analyzer = analyzer();

        assert!(matches!(
            analyzer.analyze(" \n ", ReviewKind::Product).await,
            Err(AppError::EmptyReview)
        ));
        assert!(matches!(
            analyzer.analyze(&"a".repeat(101), ReviewKind::Product).await,
            Err(AppError::ReviewTooLong { max: 100 })
        ));
        assert!(analyzer.analyze(&"a".repeat(100), ReviewKind::Product).await.is_ok());
    }

    #[tokio::test]
    async fn test_one_call_per_aspect() {
        let classifier = Arc::new(CountingClassifier {
            calls: AtomicUsize::new(0),
        });
        let analyzer = Analyzer::new(classifier.clone(), 0.6, 1000);

        analyzer
            .analyze(
                "Cheap price. Fair price. Arrived late.",
                ReviewKind::Product,
            )
            .await
            .unwrap();

        // whole text, price, shipping
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_inference_error_propagates() {
        let analyzer = Analyzer::new(Arc::new(FailingClassifier), 0.6, 1000);

        assert!(matches!(
            analyzer.analyze("fine", ReviewKind::Product).await,
            Err(AppError::Inference(_))
        ));
    }
}
