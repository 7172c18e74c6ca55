//! Bearer-token session management.
//!
//! Login issues an opaque token held by the admin frontend; every protected
//! route passes through [`bearer_auth_layer`], which resolves the token to an
//! [`AdminIdentity`] before any handler runs. Credential checks use
//! constant-time comparison to mitigate timing attacks.

use std::collections::HashMap;
use std::sync::RwLock;

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use subtle::ConstantTimeEq;

use crate::errors::{codes, ErrorDetails, ErrorResponse};

/// The authenticated session identity, injected as a request extension so
/// handlers can attribute version records to the editor who made the change.
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub username: String,
}

/// An issued session.
#[derive(Debug, Clone)]
struct Session {
    username: String,
    expires_at: DateTime<Utc>,
}

/// In-memory store of issued session tokens.
///
/// A single-admin deployment never holds more than a handful of sessions, so
/// a map behind a lock is enough; expired entries are pruned on access.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new session token for `username`, valid for `ttl_secs`.
    ///
    /// TTLs beyond what the clock can represent saturate to "never expires".
    pub fn issue(&self, username: &str, ttl_secs: u64) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let expires_at = Duration::try_seconds(i64::try_from(ttl_secs).unwrap_or(i64::MAX))
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let session = Session {
            username: username.to_string(),
            expires_at,
        };

        let mut sessions = self.sessions.write().expect("session lock poisoned");
        sessions.retain(|_, s| s.expires_at > Utc::now());
        sessions.insert(token.clone(), session);
        token
    }

    /// Resolve a token to its identity. Expired tokens resolve to `None` and
    /// are removed.
    pub fn authenticate(&self, token: &str) -> Option<AdminIdentity> {
        let mut sessions = self.sessions.write().expect("session lock poisoned");
        match sessions.get(token) {
            Some(session) if session.expires_at > Utc::now() => Some(AdminIdentity {
                username: session.username.clone(),
            }),
            Some(_) => {
                sessions.remove(token);
                None
            }
            None => None,
        }
    }

    /// Drop a session, invalidating its token.
    pub fn revoke(&self, token: &str) {
        let mut sessions = self.sessions.write().expect("session lock poisoned");
        sessions.remove(token);
    }
}

/// Session authentication layer for protected routes.
///
/// Extracts the `Authorization: Bearer <token>` header and rejects the
/// request with 401 before the inner handler (and any mutation) runs when
/// the token is missing, unknown, or expired.
pub async fn bearer_auth_layer(
    sessions: std::sync::Arc<SessionStore>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string());

    let Some(token) = token else {
        return unauthorized_response("Missing session token");
    };

    match sessions.authenticate(&token) {
        Some(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        None => unauthorized_response("Invalid or expired session token"),
    }
}

/// Perform constant-time string comparison.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    // Constant-time comparison
    a_bytes.ct_eq(b_bytes).into()
}

/// Create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    let body = ErrorResponse {
        success: false,
        error: ErrorDetails {
            code: codes::UNAUTHORIZED.to_string(),
            message: message.to_string(),
        },
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("changeme123", "changeme123"));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("changeme123", "changeme124"));
    }

    #[test]
    fn test_constant_time_compare_different_lengths() {
        assert!(!constant_time_compare("short", "much-longer-password"));
    }

    #[test]
    fn test_constant_time_compare_empty() {
        assert!(constant_time_compare("", ""));
        assert!(!constant_time_compare("", "not-empty"));
    }

    #[test]
    fn test_session_issue_and_authenticate() {
        let store = SessionStore::new();
        let token = store.issue("admin", 60);

        let identity = store.authenticate(&token).expect("session should resolve");
        assert_eq!(identity.username, "admin");
    }

    #[test]
    fn test_session_unknown_token() {
        let store = SessionStore::new();
        assert!(store.authenticate("no-such-token").is_none());
    }

    #[test]
    fn test_session_expiry() {
        let store = SessionStore::new();
        let token = store.issue("admin", 0);

        // TTL of zero expires immediately
        assert!(store.authenticate(&token).is_none());
        // And the expired entry is pruned
        assert!(store.sessions.read().unwrap().get(&token).is_none());
    }

    #[test]
    fn test_session_huge_ttl_saturates() {
        let store = SessionStore::new();
        let token = store.issue("admin", u64::MAX);

        let identity = store.authenticate(&token).expect("session should resolve");
        assert_eq!(identity.username, "admin");
    }

    #[test]
    fn test_session_revoke() {
        let store = SessionStore::new();
        let token = store.issue("admin", 60);
        store.revoke(&token);
        assert!(store.authenticate(&token).is_none());
    }
}
