use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::api::router::AppState;
use crate::auth::session::token_from_headers;
use crate::error::ApiError;

/// Rejects requests without a live session and attaches the `Session` otherwise.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = token_from_headers(req.headers()).ok_or(ApiError::Unauthorized)?;

    let session = state.sessions
        .validate_session(&token)
        .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}
