//! Campaign delivery endpoint handler.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::error::AppError;
use crate::extractors::DeliveryQuery;
use crate::state::AppState;

/// GET /v1/delivery?app=&country=&os=
///
/// Responde 200 con el array de campañas, o 204 si no hay ninguna elegible.
#[instrument(skip_all, fields(
    app = query.app.as_deref().unwrap_or(""),
    country = query.country.as_deref().unwrap_or(""),
    os = query.os.as_deref().unwrap_or("")
))]
pub async fn get_campaigns(
    State(state): State<AppState>,
    Query(query): Query<DeliveryQuery>,
) -> Result<Response, AppError> {
    let dimensions = query.into_dimensions();
    dimensions.validate()?;

    let campaigns = state.campaigns().get(&dimensions).await.map_err(|e| {
        tracing::error!(error = %e, "Campaign delivery failed");
        AppError::from(e)
    })?;

    match campaigns {
        Some(campaigns) if !campaigns.is_empty() => {
            tracing::debug!(count = campaigns.len(), "Delivering campaigns");
            Ok((StatusCode::OK, Json(campaigns)).into_response())
        },
        _ => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
