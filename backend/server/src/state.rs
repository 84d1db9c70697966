use std::sync::Arc;

use tracing::info;

use super::{
    analysis::Analyzer,
    config::{ClassifierBackend, Config, StoreBackend},
    database::{RedisStore, ReviewStore},
    error::AppError,
    lexicon::LexiconClassifier,
    memory::MemoryStore,
    sentiment::{Classifier, RemoteClassifier},
};

pub struct State {
    pub config: Config,
    pub analyzer: Analyzer,
    pub store: Arc<dyn ReviewStore>,
}

impl State {
    pub async fn new(config: Config) -> Result<Arc<Self>, AppError> {
        let classifier: Arc<dyn Classifier> = match config.classifier {
            ClassifierBackend::Remote => Arc::new(RemoteClassifier::new(
                &config.inference_url,
                config.inference_key.clone(),
                config.inference_timeout,
            )?),
            ClassifierBackend::Lexicon => Arc::new(LexiconClassifier::new()),
        };

        let store: Arc<dyn ReviewStore> = match config.store {
            StoreBackend::Redis => Arc::new(RedisStore::connect(&config.redis_url).await?),
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
        };

        info!(
            "Using {} classifier and {} store",
            classifier.name(),
            store.name()
        );

        Ok(Self::from_parts(config, classifier, store))
    }

    pub fn from_parts(
        config: Config,
        classifier: Arc<dyn Classifier>,
        store: Arc<dyn ReviewStore>,
    ) -> Arc<Self> {
        let analyzer = Analyzer::new(
            classifier,
            config.neutral_threshold,
            config.max_review_chars,
        );

        Arc::new(Self {
            config,
            analyzer,
            store,
        })
    }
}
