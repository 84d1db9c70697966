//! # Redis
//!
//! Datastore of record. Only used as a datastore, every query is a plain command.
//!
//! ## Keys
//! - `reviews`: hash, review id to review JSON
//! - `reviews:recent`: list of ids, newest first (LPUSH)
//! - `reviews:next_id`: INCR counter handing out ids
//! - `reviews:stats`: hash of aggregate counters (HINCRBY)
//!
//! ## Counters
//! Every review bumps
//! - `total`
//! - `sentiment:<sentiment>`
//! - `kind:<kind>`
//! - `aspect:<aspect>:mentions` and `aspect:<aspect>:<sentiment>` per aspect
//!
//! Deleting a review applies the same fields with -1. Writes and counter updates
//! share one MULTI/EXEC pipeline so stats never drift from stored rows.
//!
//! A store built with [`RedisStore::with_namespace`] prefixes every key above.
use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use reviews::{Analysis, Review};

use crate::error::AppError;

pub const REVIEWS_KEY: &str = "reviews";
pub const RECENT_KEY: &str = "reviews:recent";
pub const NEXT_ID_KEY: &str = "reviews:next_id";
pub const STATS_KEY: &str = "reviews:stats";

pub const TOTAL_FIELD: &str = "total";

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn insert(&self, analysis: Analysis) -> Result<Review, AppError>;

    async fn get(&self, id: u64) -> Result<Option<Review>, AppError>;

    /// Newest first.
    async fn recent(&self, offset: usize, limit: usize) -> Result<Vec<Review>, AppError>;

    /// `false` when there was nothing to delete.
    async fn delete(&self, id: u64) -> Result<bool, AppError>;

    async fn counters(&self) -> Result<HashMap<String, i64>, AppError>;

    async fn ping(&self) -> Result<(), AppError>;

    fn name(&self) -> &'static str;
}

pub fn counter_fields(review: &Review) -> Vec<String> {
    let mut fields = vec![
        TOTAL_FIELD.to_string(),
        format!("sentiment:{}", review.sentiment.as_str()),
        format!("kind:{}", review.kind.as_str()),
    ];

    for aspect in &review.aspects {
        fields.push(format!("aspect:{}:mentions", aspect.aspect));
        fields.push(format!("aspect:{}:{}", aspect.aspect, aspect.sentiment.as_str()));
    }

    fields
}

pub async fn init_redis(redis_url: &str) -> Result<ConnectionManager, AppError> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url)?;
    let connection_manager = client.get_connection_manager_with_config(config).await?;

    Ok(connection_manager)
}

/// Inclusive LRANGE bounds for a page, `None` when the page is empty or
/// starts past anything a list can hold.
pub fn page_range(offset: usize, limit: usize) -> Option<(isize, isize)> {
    if limit == 0 {
        return None;
    }

    let start = isize::try_from(offset).ok()?;
    let stop = isize::try_from(offset.saturating_add(limit - 1)).unwrap_or(isize::MAX);

    Some((start, stop))
}

#[derive(Debug, Clone)]
struct Keys {
    reviews: String,
    recent: String,
    next_id: String,
    stats: String,
}

impl Keys {
    fn new(namespace: &str) -> Self {
        Self {
            reviews: format!("{namespace}{REVIEWS_KEY}"),
            recent: format!("{namespace}{RECENT_KEY}"),
            next_id: format!("{namespace}{NEXT_ID_KEY}"),
            stats: format!("{namespace}{STATS_KEY}"),
        }
    }
}

#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    keys: Keys,
}

impl RedisStore {
    pub fn new(connection: ConnectionManager) -> Self {
        Self::with_namespace(connection, "")
    }

    pub fn with_namespace(connection: ConnectionManager, namespace: &str) -> Self {
        Self {
            connection,
            keys: Keys::new(namespace),
        }
    }

    pub async fn connect(redis_url: &str) -> Result<Self, AppError> {
        Ok(Self::new(init_redis(redis_url).await?))
    }

    fn parse(json: &str) -> Result<Review, AppError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[async_trait]
impl ReviewStore for RedisStore {
    async fn insert(&self, analysis: Analysis) -> Result<Review, AppError> {
        let mut connection = self.connection.clone();

        let id: u64 = connection.incr(&self.keys.next_id, 1).await?;
        let review = Review::from_analysis(id, analysis, Utc::now());
        let json = serde_json::to_string(&review)?;

        let mut pipe = redis::pipe();
        pipe.atomic()
            .hset(&self.keys.reviews, id, json)
            .ignore()
            .lpush(&self.keys.recent, id)
            .ignore();

        for field in counter_fields(&review) {
            pipe.hincr(&self.keys.stats, field, 1).ignore();
        }

        let () = pipe.query_async(&mut connection).await?;

        Ok(review)
    }

    async fn get(&self, id: u64) -> Result<Option<Review>, AppError> {
        let mut connection = self.connection.clone();

        let json: Option<String> = connection.hget(&self.keys.reviews, id).await?;

        json.as_deref().map(Self::parse).transpose()
    }

    async fn recent(&self, offset: usize, limit: usize) -> Result<Vec<Review>, AppError> {
        let Some((start, stop)) = page_range(offset, limit) else {
            return Ok(Vec::new());
        };

        let mut connection = self.connection.clone();

        let ids: Vec<u64> = connection.lrange(&self.keys.recent, start, stop).await?;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<Option<String>> = redis::cmd("HMGET")
            .arg(&self.keys.reviews)
            .arg(&ids)
            .query_async(&mut connection)
            .await?;

        rows.iter()
            .flatten()
            .map(|json| Self::parse(json))
            .collect()
    }

    async fn delete(&self, id: u64) -> Result<bool, AppError> {
        let Some(review) = self.get(id).await? else {
            return Ok(false);
        };

        let mut connection = self.connection.clone();

        let mut pipe = redis::pipe();
        pipe.atomic()
            .hdel(&self.keys.reviews, id)
            .ignore()
            .lrem(&self.keys.recent, 1, id)
            .ignore();

        for field in counter_fields(&review) {
            pipe.hincr(&self.keys.stats, field, -1).ignore();
        }

        let () = pipe.query_async(&mut connection).await?;

        Ok(true)
    }

    async fn counters(&self) -> Result<HashMap<String, i64>, AppError> {
        let mut connection = self.connection.clone();

        Ok(connection.hgetall(&self.keys.stats).await?)
    }

    async fn ping(&self) -> Result<(), AppError> {
        let mut connection = self.connection.clone();

        let _: String = redis::cmd("PING").query_async(&mut connection).await?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
