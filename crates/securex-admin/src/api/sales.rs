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
    path = "/api/sales-stats",
    tag = "statistics",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Latest sales snapshot; X-Data-Source tells store from mock", body = crate::db::schema::SalesSnapshot),
        (status = 401, description = "Not logged in", body = crate::error::ErrorBody)
    )
)]
pub async fn get_sales_stats(State(state): State<AppState>) -> Response {
    snapshot_response(state.metrics.sales_snapshot().await)
}

#[utoipa::path(
    get,
    path = "/api/sales-stats/detailed",
    tag = "statistics",
    security(("bearer" = [])),
    params(DetailQuery),
    responses(
        (status = 200, description = "Daily series for one sales metric", body = DetailedStats),
        (status = 400, description = "Missing or malformed parameters", body = crate::error::ErrorBody),
        (status = 401, description = "Not logged in", body = crate::error::ErrorBody)
    )
)]
pub async fn get_sales_detailed(
    State(state): State<AppState>,
    Query(query): Query<DetailQuery>,
) -> Result<Json<DetailedStats>, ApiError> {
    let request = query.into_request()?;
    let stats = state.series.detailed(MetricFamily::Sales, &request)?;
    Ok(Json(stats))
}
