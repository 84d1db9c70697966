use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use reviews::{Analysis, Review};
use tokio::sync::RwLock;

use crate::{
    database::{ReviewStore, counter_fields},
    error::AppError,
};

#[derive(Default)]
struct Inner {
    next_id: u64,
    reviews: BTreeMap<u64, Review>,
    counters: HashMap<String, i64>,
}

/// Process-local store with the same semantics as the Redis one.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn insert(&self, analysis: Analysis) -> Result<Review, AppError> {
        let mut inner = self.inner.write().await;

        inner.next_id += 1;
        let review = Review::from_analysis(inner.next_id, analysis, Utc::now());

        for field in counter_fields(&review) {
            *inner.counters.entry(field).or_insert(0) += 1;
        }
        inner.reviews.insert(review.id, review.clone());

        Ok(review)
    }

    async fn get(&self, id: u64) -> Result<Option<Review>, AppError> {
        Ok(self.inner.read().await.reviews.get(&id).cloned())
    }

    async fn recent(&self, offset: usize, limit: usize) -> Result<Vec<Review>, AppError> {
        let inner = self.inner.read().await;

        Ok(inner
            .reviews
            .values()
            .rev()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: u64) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;

        let Some(review) = inner.reviews.remove(&id) else {
            return Ok(false);
        };

        for field in counter_fields(&review) {
            *inner.counters.entry(field).or_insert(0) -= 1;
        }

        Ok(true)
    }

    async fn counters(&self) -> Result<HashMap<String, i64>, AppError> {
        Ok(self.inner.read().await.counters.clone())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use reviews::{ReviewKind, Sentiment};

    use super::*;

    fn analysis(text: &str, sentiment: Sentiment) -> Analysis {
        Analysis {
            text: text.to_string(),
            kind: ReviewKind::Product,
            sentiment,
            confidence: 0.9,
            aspects: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_ids_increase() {
        let store = MemoryStore::new();

        let first = store.insert(analysis("a", Sentiment::Positive)).await.unwrap();
        let second = store.insert(analysis("b", Sentiment::Negative)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.get(2).await.unwrap(), Some(second));
        assert_eq!(store.get(3).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_recent_newest_first() {
        let store = MemoryStore::new();
        for text in ["a", "b", "c", "d"] {
            store.insert(analysis(text, Sentiment::Neutral)).await.unwrap();
        }

        let page: Vec<String> = store
            .recent(1, 2)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.text)
            .collect();

        assert_eq!(page, vec!["c", "b"]);
        assert!(store.recent(10, 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_reverses_counters() {
        let store = MemoryStore::new();
        store.insert(analysis("a", Sentiment::Positive)).await.unwrap();
        let doomed = store.insert(analysis("b", Sentiment::Negative)).await.unwrap();

        assert!(store.delete(doomed.id).await.unwrap());
        assert!(!store.delete(doomed.id).await.unwrap());

        let counters = store.counters().await.unwrap();
        assert_eq!(counters["total"], 1);
        assert_eq!(counters["sentiment:positive"], 1);
        assert_eq!(counters["sentiment:negative"], 0);
    }
}
