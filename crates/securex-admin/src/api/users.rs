use axum::{
    extract::{Query, State},
    response::Response,
    Json,
};

use crate::api::router::AppState;
use crate::api::snapshot_response;
use crate::error::ApiError;
use crate::series::{DetailQuery, DetailedStats, MetricFamily};

#[utoipa::path(
    get,
    path = "/api/user-stats",
    tag = "statistics",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Latest user snapshot", body = crate::db::schema::UserSnapshot),
        (status = 401, description = "Not logged in", body = crate::error::ErrorBody)
    )
)]
pub async fn get_user_stats(State(state): State<AppState>) -> Response {
    snapshot_response(state.metrics.user_snapshot().await)
}

#[utoipa::path(
    get,
    path = "/api/user-stats/detailed",
    tag = "statistics",
    security(("bearer" = [])),
    params(DetailQuery),
    responses(
        (status = 200, description = "Daily series for one user metric", body = DetailedStats),
        (status = 400, description = "Missing or malformed parameters", body = crate::error::ErrorBody),
        (status = 401, description = "Not logged in", body = crate::error::ErrorBody)
    )
)]
pub async fn get_user_detailed(
    State(state): State<AppState>,
    Query(query): Query<DetailQuery>,
) -> Result<Json<DetailedStats>, ApiError> {
    let request = query.into_request()?;
    Ok(Json(state.series.detailed(MetricFamily::Users, &request)?))
}
