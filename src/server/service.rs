//! Request handlers.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde_json::{Value, json};
use tracing::debug;

use super::AppState;
use super::convert::ApiError;
use crate::types::{RawSearchParams, SearchResult};
use crate::{ValidationError, version_string};

/// `GET /api/images?query=&page=&per_page=`
///
/// Query pairs are collected as-is so a repeated key reaches the validator
/// instead of being silently collapsed.
pub async fn search_images(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<SearchResult>, ApiError> {
    let Query(pairs) = query.map_err(|e| {
        debug!(error = %e, "undecodable query string");
        ApiError(ValidationError::InvalidQuery.into())
    })?;

    let params = RawSearchParams::from_pairs(pairs);
    let images = state.search.handle(&params).await?;
    Ok(Json(images))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": version_string(),
    }))
}
