use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use geoscout_core::GeoLiteResult;
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::scores::{self, ScoreError};

#[derive(Debug, Deserialize)]
pub(super) struct GeoFreeQuery {
    brand: Option<String>,
}

pub(super) async fn get_geo_free(
    State(state): State<AppState>,
    query: Result<Query<GeoFreeQuery>, QueryRejection>,
) -> Result<Json<GeoLiteResult>, ApiError> {
    let brand = query.ok().and_then(|Query(q)| q.brand).unwrap_or_default();

    match scores::lookup(&state.cache, &brand) {
        Ok(result) => {
            tracing::info!(
                brand = %brand.trim(),
                score = result.score,
                cached = result.cached,
                "free-tier score served"
            );
            Ok(Json(result))
        }
        Err(ScoreError::MissingBrand) => Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "Brand parameter required",
        )),
        Err(ScoreError::Cache(e)) => {
            tracing::error!(error = %e, "free-tier lookup failed");
            Err(ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Analysis failed",
            ))
        }
    }
}

pub(super) async fn method_not_allowed() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
