use std::sync::Arc;

use axum::{
    Json, extract,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use reviews::{AnalyzeRequest, BatchRequest, Review, Stats};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{error::AppError, state::State, stats::from_counters};

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Deserialize)]
pub struct Page {
    #[serde(default)]
    offset: usize,

    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_PAGE_SIZE
}

#[derive(Serialize)]
pub struct Health {
    status: &'static str,
    store: &'static str,
    classifier: &'static str,
}

pub async fn health_handler(extract::State(state): extract::State<Arc<State>>) -> Json<Health> {
    let store = match state.store.ping().await {
        Ok(()) => "up",
        Err(e) => {
            warn!("Store ping failed: {e}");
            "down"
        }
    };

    Json(Health {
        status: "ok",
        store,
        classifier: state.analyzer.classifier_name(),
    })
}

pub async fn analyze_handler(
    extract::State(state): extract::State<Arc<State>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;

    let analysis = state.analyzer.analyze(&request.text, request.kind).await?;

    if !request.persist {
        return Ok((StatusCode::OK, Json(analysis)).into_response());
    }

    let review = state.store.insert(analysis).await?;
    info!("Stored review {} ({})", review.id, review.sentiment.as_str());

    Ok((StatusCode::CREATED, Json(review)).into_response())
}

pub async fn batch_handler(
    extract::State(state): extract::State<Arc<State>>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Vec<Review>>), AppError> {
    let Json(batch) = payload?;

    let max = state.config.max_batch;
    if batch.reviews.is_empty() || batch.reviews.len() > max {
        return Err(AppError::InvalidBatch { max });
    }

    // Analyse everything first so a bad entry rejects the batch before anything is written
    let mut analyses = Vec::with_capacity(batch.reviews.len());
    for request in &batch.reviews {
        analyses.push(state.analyzer.analyze(&request.text, request.kind).await?);
    }

    let mut stored = Vec::with_capacity(analyses.len());
    for analysis in analyses {
        stored.push(state.store.insert(analysis).await?);
    }

    info!("Stored batch of {} reviews", stored.len());

    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn reviews_handler(
    extract::State(state): extract::State<Arc<State>>,
    page: Result<extract::Query<Page>, QueryRejection>,
) -> Result<Json<Vec<Review>>, AppError> {
    let extract::Query(page) = page?;

    let limit = page.limit.min(MAX_PAGE_SIZE);
    let reviews = state.store.recent(page.offset, limit).await?;

    Ok(Json(reviews))
}

pub async fn review_handler(
    extract::State(state): extract::State<Arc<State>>,
    id: Result<extract::Path<u64>, PathRejection>,
) -> Result<Json<Review>, AppError> {
    let extract::Path(id) = id?;

    state
        .store
        .get(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(id))
}

pub async fn delete_handler(
    extract::State(state): extract::State<Arc<State>>,
    id: Result<extract::Path<u64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let extract::Path(id) = id?;

    if !state.store.delete(id).await? {
        return Err(AppError::NotFound(id));
    }

    info!("Deleted review {id}");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn stats_handler(
    extract::State(state): extract::State<Arc<State>>,
) -> Result<Json<Stats>, AppError> {
    let counters = state.store.counters().await?;

    Ok(Json(from_counters(&counters)))
}
