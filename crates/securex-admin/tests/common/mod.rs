#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use tower::ServiceExt;

use securex_admin::{
    create_router, AdminCredentials, AppState, InMemorySource, MetricsService, SeriesGenerator,
    SessionService,
};

pub const USERNAME: &str = "PROXT";
pub const PASSWORD: &str = "32Ipubib";

pub fn state_with(metrics: MetricsService) -> AppState {
    AppState::new(
        metrics,
        SeriesGenerator::new(3660),
        AdminCredentials::new(USERNAME, PASSWORD).unwrap(),
        SessionService::new(60),
    )
    .unwrap()
}

pub fn mock_state() -> AppState {
    state_with(MetricsService::mock_only())
}

pub fn state_with_source(source: &InMemorySource) -> AppState {
    state_with(MetricsService::new(Some(Arc::new(source.clone()))))
}

pub fn app(state: &AppState) -> Router {
    create_router(state.clone())
}

pub async fn send(state: &AppState, request: Request<Body>) -> Response<Body> {
    app(state).oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn get_with_cookie(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::COOKIE, format!("admin_session={}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn login_request(username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "username": username, "password": password }).to_string(),
        ))
        .unwrap()
}

/// Logs in through the API and returns the bearer token.
pub async fn login(state: &AppState) -> String {
    let response = send(state, login_request(USERNAME, PASSWORD)).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["token"].as_str().unwrap().to_string()
}
