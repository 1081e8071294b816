//! Cache invalidation endpoint handler.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// Response para operaciones de invalidación.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidateResponse {
    /// Campaña invalidada.
    pub campaign_id: String,
    /// Número de entries invalidadas.
    pub invalidated: usize,
    /// Mensaje descriptivo.
    pub message: String,
}

/// DELETE /v1/cache/campaigns/{campaign_id}
/// Invalida todas las entries que incluyen la campaña.
#[instrument(skip_all, fields(campaign_id = %campaign_id))]
pub async fn invalidate_campaign(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
) -> Result<Response, AppError> {
    let result = state
        .campaigns()
        .invalidate(&campaign_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Cache invalidation failed");
            AppError::from(e)
        })?;

    Ok((
        StatusCode::OK,
        Json(InvalidateResponse {
            message: format!(
                "Invalidated {} cache entries for campaign '{}'",
                result.count, result.campaign_id
            ),
            campaign_id: result.campaign_id,
            invalidated: result.count,
        }),
    )
        .into_response())
}
