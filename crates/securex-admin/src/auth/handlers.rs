use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use tracing::{info, warn};

use crate::api::router::AppState;
use crate::auth::models::{LoginRequest, LoginResponse, SessionInfo};
use crate::auth::{AuthError, Session};
use crate::error::ApiError;

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session created", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    match state.credentials.verify(&payload.username, &payload.password) {
        Ok(()) => {
            let session = state.sessions.create_session(&payload.username);
            info!("Admin {} logged in via API", session.username);
            Ok(Json(session.into()))
        }
        Err(AuthError::InvalidCredentials) => {
            warn!("Rejected API login for {:?}", payload.username);
            Err(ApiError::Unauthorized)
        }
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Session revoked"),
        (status = 401, description = "Not logged in", body = crate::error::ErrorBody)
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> StatusCode {
    state.sessions.revoke_session(&session.token);
    info!("Admin {} logged out", session.username);
    StatusCode::NO_CONTENT
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current session", body = SessionInfo),
        (status = 401, description = "Not logged in", body = crate::error::ErrorBody)
    )
)]
pub async fn me(Extension(session): Extension<Session>) -> Json<SessionInfo> {
    Json(SessionInfo::from(&session))
}
