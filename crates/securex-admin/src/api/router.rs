use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::docs::ApiDoc;
use crate::api::middleware::auth_middleware;
use crate::api::{sales, users};
use crate::auth::handlers::{login, logout, me};
use crate::auth::{AdminCredentials, SessionService};
use crate::metrics::MetricsService;
use crate::pages;
use crate::pages::views::Views;
use crate::series::SeriesGenerator;

#[derive(Clone)]
pub struct AppState {
    pub metrics: MetricsService,
    pub series: SeriesGenerator,
    pub credentials: Arc<AdminCredentials>,
    pub sessions: SessionService,
    pub views: Views,
}

impl AppState {
    pub fn new(
        metrics: MetricsService,
        series: SeriesGenerator,
        credentials: AdminCredentials,
        sessions: SessionService,
    ) -> Result<Self, tera::Error> {
        Ok(Self {
            metrics,
            series,
            credentials: Arc::new(credentials),
            sessions,
            views: Views::new()?,
        })
    }
}

pub fn create_router(state: AppState) -> Router {
    let public_router = Router::new()
        .route("/auth/login", post(login))
        .with_state(state.clone());

    let protected_router = Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/sales-stats", get(sales::get_sales_stats))
        .route("/sales-stats/detailed", get(sales::get_sales_detailed))
        .route("/user-stats", get(users::get_user_stats))
        .route("/user-stats/detailed", get(users::get_user_detailed))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state.clone());

    let api_router = Router::new()
        .merge(public_router)
        .merge(protected_router);

    Router::new()
        .nest("/api", api_router)
        .merge(pages::create_router(state))
        .route("/health", get(|| async { "OK" }))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
