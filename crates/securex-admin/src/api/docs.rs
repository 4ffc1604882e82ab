use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::{sales, users};
use crate::auth::handlers as auth;
use crate::auth::models::{LoginRequest, LoginResponse, SessionInfo};
use crate::db::schema::{SalesSnapshot, UserSnapshot};
use crate::error::ErrorBody;
use crate::series::{DetailedStats, SeriesPoint};

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        auth::logout,
        auth::me,
        sales::get_sales_stats,
        sales::get_sales_detailed,
        users::get_user_stats,
        users::get_user_detailed,
    ),
    components(schemas(
        SalesSnapshot,
        UserSnapshot,
        DetailedStats,
        SeriesPoint,
        LoginRequest,
        LoginResponse,
        SessionInfo,
        ErrorBody,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Administrator sessions"),
        (name = "statistics", description = "Sales and user statistics")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}
