use std::sync::Arc;

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "admin_session";

/// Ten years.
pub const MAX_SESSION_TIMEOUT_MINUTES: i64 = 10 * 366 * 24 * 60;

#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// In-process session table shared by the API and the pages.
#[derive(Clone)]
pub struct SessionService {
    sessions: Arc<DashMap<String, Session>>,
    timeout: Duration,
}

impl SessionService {
    pub fn new(timeout_minutes: i64) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            timeout: Duration::minutes(timeout_minutes.clamp(0, MAX_SESSION_TIMEOUT_MINUTES)),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn create_session(&self, username: &str) -> Session {
        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4().to_string(),
            username: username.to_string(),
            created_at: now,
            expires_at: now.checked_add_signed(self.timeout).unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        self.sessions.insert(session.token.clone(), session.clone());
        session
    }

    /// Returns the live session for `token`, dropping it if it has expired.
    pub fn validate_session(&self, token: &str) -> Option<Session> {
        let now = Utc::now();
        let expired = match self.sessions.get(token) {
            Some(entry) if !entry.is_expired(now) => return Some(entry.value().clone()),
            Some(_) => true,
            None => false,
        };

        if expired {
            self.sessions.remove(token);
        }
        None
    }

    pub fn revoke_session(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired(now));
        before.saturating_sub(self.sessions.len())
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }
}

/// Bearer token first, then the session cookie.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let bearer = headers.get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());

    bearer.or_else(|| cookie_token(headers))
}

pub fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers.get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (name, value) = cookie.trim().split_once('=')?;
            if name == SESSION_COOKIE && !value.is_empty() {
                Some(value.to_string())
            } else {
                None
            }
        })
}

pub fn session_cookie(session: &Session) -> String {
    let max_age = (session.expires_at - session.created_at).num_seconds().max(0);
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Strict; Max-Age={}",
        SESSION_COOKIE, session.token, max_age
    )
}

pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0", SESSION_COOKIE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_lifecycle() {
        let service = SessionService::new(60);
        let session = service.create_session("PROXT");

        let found = service.validate_session(&session.token).unwrap();
        assert_eq!(found.username, "PROXT");
        assert_eq!(service.active_count(), 1);

        assert!(service.revoke_session(&session.token));
        assert!(service.validate_session(&session.token).is_none());
        assert!(!service.revoke_session(&session.token));
    }

    #[test]
    fn test_unknown_token() {
        let service = SessionService::new(60);
        assert!(service.validate_session("nope").is_none());
    }

    #[test]
    fn test_expired_session_dropped() {
        let service = SessionService::new(60);
        let mut session = service.create_session("PROXT");
        session.expires_at = Utc::now() - Duration::seconds(1);
        service.sessions.insert(session.token.clone(), session.clone());

        assert!(service.validate_session(&session.token).is_none());
        assert_eq!(service.active_count(), 0);
    }

    #[test]
    fn test_purge_expired() {
        let service = SessionService::new(60);
        let live = service.create_session("a");
        let mut stale = service.create_session("b");
        stale.expires_at = Utc::now() - Duration::minutes(5);
        service.sessions.insert(stale.token.clone(), stale);

        assert_eq!(service.purge_expired(), 1);
        assert!(service.validate_session(&live.token).is_some());
    }

    #[test]
    fn test_oversized_timeout_is_clamped() {
        let service = SessionService::new(1_000_000_000_000);
        assert_eq!(service.timeout(), Duration::minutes(MAX_SESSION_TIMEOUT_MINUTES));

        let session = service.create_session("PROXT");
        assert!(session.expires_at > session.created_at);
        assert!(service.validate_session(&session.token).is_some());
    }

    #[test]
    fn test_tokens_are_unique() {
        let service = SessionService::new(60);
        let a = service.create_session("PROXT");
        let b = service.create_session("PROXT");
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn test_token_extraction() {
        let mut headers = HeaderMap::new();
        assert!(token_from_headers(&headers).is_none());

        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; admin_session=abc123"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc123"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn test_empty_cookie_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("admin_session="));
        assert!(token_from_headers(&headers).is_none());
    }

    #[test]
    fn test_cookie_format() {
        let service = SessionService::new(30);
        let session = service.create_session("PROXT");
        let cookie = session_cookie(&session);
        assert!(cookie.starts_with(&format!("admin_session={};", session.token)));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=1800"));
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }
}
