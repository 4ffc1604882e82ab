use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::Redirect,
};

use crate::api::router::AppState;
use crate::auth::session::cookie_token;
use crate::auth::Session;

pub const LOGIN_PATH: &str = "/admin/login";

/// Live session taken from the `admin_session` cookie. Pages without one
/// bounce to the login form.
pub struct PageSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for PageSession {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        cookie_token(&parts.headers)
            .and_then(|token| state.sessions.validate_session(&token))
            .map(PageSession)
            .ok_or_else(|| Redirect::to(LOGIN_PATH))
    }
}
