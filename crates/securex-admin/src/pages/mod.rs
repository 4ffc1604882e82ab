//! Server-rendered dashboard under `/admin`.

pub mod cards;
pub mod format;
pub mod guard;
pub mod views;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::api::router::AppState;
use crate::auth::session::{clear_session_cookie, cookie_token, session_cookie};
use crate::auth::AuthError;
use crate::pages::cards::{sales_cards, user_cards};
use crate::pages::guard::{PageSession, LOGIN_PATH};
use crate::pages::views::DetailView;
use crate::series::query::parse_timestamp;
use crate::series::{DateRange, DetailRequest, MetricFamily, SeriesError};

/// Default detail window, and the length of the default comparison window.
pub const DEFAULT_RANGE_DAYS: i64 = 30;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/admin", get(index))
        .route("/admin/login", get(login_form).post(login_submit))
        .route("/admin/logout", post(logout))
        .route("/admin/sales-statistics", get(sales_page))
        .route("/admin/sales-statistics/:metric", get(sales_detail))
        .route("/admin/user-statistics", get(users_page))
        .route("/admin/user-statistics/:metric", get(users_detail))
        .with_state(state)
}

/// Renders a template result with `status`, or a bare 500 when rendering fails.
fn html_page(status: StatusCode, rendered: Result<String, tera::Error>) -> Response {
    match rendered {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!("Template rendering failed: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn index(session: Option<PageSession>) -> Redirect {
    match session {
        Some(_) => Redirect::to(MetricFamily::Sales.page_path()),
        None => Redirect::to(LOGIN_PATH),
    }
}

async fn login_form(State(state): State<AppState>, session: Option<PageSession>) -> Response {
    match session {
        Some(_) => Redirect::to(MetricFamily::Sales.page_path()).into_response(),
        None => html_page(StatusCode::OK, state.views.login_page(None, "")),
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

async fn login_submit(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    match state.credentials.verify(&form.username, &form.password) {
        Ok(()) => {
            let session = state.sessions.create_session(&form.username);
            info!("Admin {} logged in", session.username);
            (
                AppendHeaders([(header::SET_COOKIE, session_cookie(&session))]),
                Redirect::to(MetricFamily::Sales.page_path()),
            )
                .into_response()
        }
        Err(AuthError::InvalidCredentials) => {
            warn!("Rejected login for {:?}", form.username);
            html_page(
                StatusCode::UNAUTHORIZED,
                state.views.login_page(Some("Неверный логин или пароль"), &form.username),
            )
        }
        Err(e) => {
            error!("Login failed: {}", e);
            html_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                state.views.login_page(Some("Внутренняя ошибка, попробуйте ещё раз"), &form.username),
            )
        }
    }
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = cookie_token(&headers) {
        state.sessions.revoke_session(&token);
    }

    (
        AppendHeaders([(header::SET_COOKIE, clear_session_cookie())]),
        Redirect::to(LOGIN_PATH),
    )
        .into_response()
}

async fn sales_page(State(state): State<AppState>, PageSession(session): PageSession) -> Response {
    let snapshot = state.metrics.sales_snapshot().await;
    html_page(StatusCode::OK, state.views.stats_page(
        MetricFamily::Sales,
        &sales_cards(&snapshot.data),
        snapshot.is_mock(),
        &session.username,
    ))
}

async fn users_page(State(state): State<AppState>, PageSession(session): PageSession) -> Response {
    let snapshot = state.metrics.user_snapshot().await;
    html_page(StatusCode::OK, state.views.stats_page(
        MetricFamily::Users,
        &user_cards(&snapshot.data),
        snapshot.is_mock(),
        &session.username,
    ))
}

/// Query string of the detail pages. Dates fall back to the last
/// `DEFAULT_RANGE_DAYS` days; `compare` turns on the comparison column.
#[derive(Debug, Default, Deserialize)]
pub struct DetailPageQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub compare: Option<String>,
    pub comparison_from: Option<String>,
    pub comparison_to: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl DetailPageQuery {
    pub fn compare_enabled(&self) -> bool {
        match present(&self.compare) {
            Some(flag) => !matches!(flag, "0" | "false" | "off"),
            None => false,
        }
    }

    /// Comparing against explicitly given bounds rather than the preceding window.
    pub fn comparison_pinned(&self) -> bool {
        self.compare_enabled()
            && present(&self.comparison_from).is_some()
            && present(&self.comparison_to).is_some()
    }

    /// Primary range, plus the comparison range when comparing.
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<(DateRange, Option<DateRange>), SeriesError> {
        let to = match present(&self.to) {
            Some(raw) => parse_timestamp("to", raw)?,
            None => now,
        };
        let from = match present(&self.from) {
            Some(raw) => parse_timestamp("from", raw)?,
            None => to
                .checked_sub_signed(Duration::days(DEFAULT_RANGE_DAYS))
                .ok_or(SeriesError::OutOfCalendar)?,
        };
        let range = DateRange::new(from, to);

        if !self.compare_enabled() {
            return Ok((range, None));
        }

        let comparison = match (present(&self.comparison_from), present(&self.comparison_to)) {
            (Some(from), Some(to)) => DateRange::new(
                parse_timestamp("comparison_from", from)?,
                parse_timestamp("comparison_to", to)?,
            ),
            _ => range.preceding().ok_or(SeriesError::OutOfCalendar)?,
        };
        Ok((range, Some(comparison)))
    }
}

async fn sales_detail(
    State(state): State<AppState>,
    PageSession(session): PageSession,
    Path(metric): Path<String>,
    Query(query): Query<DetailPageQuery>,
) -> Response {
    render_detail(&state, MetricFamily::Sales, &metric, &query, &session.username)
}

async fn users_detail(
    State(state): State<AppState>,
    PageSession(session): PageSession,
    Path(metric): Path<String>,
    Query(query): Query<DetailPageQuery>,
) -> Response {
    render_detail(&state, MetricFamily::Users, &metric, &query, &session.username)
}

fn render_detail(
    state: &AppState,
    family: MetricFamily,
    metric: &str,
    query: &DetailPageQuery,
    username: &str,
) -> Response {
    let Some(spec) = family.lookup(metric) else {
        return html_page(
            StatusCode::NOT_FOUND,
            state.views.error_page(
                username,
                family,
                None,
                "Метрика не найдена",
                &format!("Неизвестная метрика: {}", metric),
            ),
        );
    };

    let now = Utc::now();
    let outcome = query.resolve(now).and_then(|(range, comparison)| {
        let request = DetailRequest {
            metric: metric.to_string(),
            range,
            comparison,
        };
        state.series.detailed(family, &request).map(|stats| (request, stats))
    });

    match outcome {
        Ok((request, stats)) => html_page(StatusCode::OK, state.views.detail_page(&DetailView {
            family,
            spec,
            range: request.range,
            comparison: request.comparison,
            pinned_comparison: query.comparison_pinned(),
            stats: &stats,
            today: now,
            username,
        })),
        Err(e) => {
            warn!("Detail page for {} failed: {}", metric, e);
            html_page(
                StatusCode::BAD_REQUEST,
                state.views.error_page(username, family, Some(spec.key), spec.title, &e.to_string()),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_default_ranges() {
        let query = DetailPageQuery {
            compare: Some("1".into()),
            ..Default::default()
        };
        let (range, comparison) = query.resolve(now()).unwrap();
        assert_eq!(range, DateRange::trailing(now(), DEFAULT_RANGE_DAYS));
        let comparison = comparison.unwrap();
        assert_eq!(comparison.to, range.from);
        assert_eq!(comparison.day_span(), DEFAULT_RANGE_DAYS);
    }

    #[test]
    fn test_compare_flag() {
        let off = DetailPageQuery {
            compare: Some("false".into()),
            ..Default::default()
        };
        assert!(!off.compare_enabled());
        assert!(off.resolve(now()).unwrap().1.is_none());
        assert!(!DetailPageQuery::default().compare_enabled());
    }

    #[test]
    fn test_explicit_dates() {
        let query = DetailPageQuery {
            from: Some("2024-05-01".into()),
            to: Some("2024-05-08".into()),
            compare: Some("on".into()),
            comparison_from: Some("2024-04-01".into()),
            comparison_to: Some("2024-04-08".into()),
        };
        let (range, comparison) = query.resolve(now()).unwrap();
        assert_eq!(range.day_span(), 7);
        assert_eq!(comparison.unwrap().from, Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_comparison_pinned_needs_both_bounds() {
        let mut query = DetailPageQuery {
            compare: Some("1".into()),
            comparison_from: Some("2024-04-01".into()),
            ..Default::default()
        };
        assert!(!query.comparison_pinned());
        query.comparison_to = Some("2024-04-08".into());
        assert!(query.comparison_pinned());
        query.compare = None;
        assert!(!query.comparison_pinned());
    }

    #[test]
    fn test_extreme_years_are_error() {
        let query = DetailPageQuery {
            from: Some("-200000-01-01".into()),
            to: Some("+200000-01-01".into()),
            compare: Some("1".into()),
            ..Default::default()
        };
        assert!(query.resolve(now()).is_err());
    }

    #[test]
    fn test_bad_date_is_error() {
        let query = DetailPageQuery {
            from: Some("soon".into()),
            ..Default::default()
        };
        assert!(matches!(query.resolve(now()), Err(SeriesError::InvalidTimestamp { param: "from", .. })));
    }
}
