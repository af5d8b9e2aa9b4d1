//! Signed-in session record.
//!
//! The record lives as JSON under [`SESSION_KEY`] in a [`KeyValueStore`].
//! Its presence at startup means the user is signed in. Admin access is a
//! client-side check on the email and carries no security guarantee.

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::store::KeyValueStore;

/// Storage key for the session record.
pub const SESSION_KEY: &str = "excelpro.session";

const ADMIN_DOMAIN_SUFFIX: &str = "@admin.excelpro.com";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub email: String,
    /// ISO 8601 on the wire
    pub login_time: DateTime<Utc>,
}

impl AuthSession {
    /// New session stamped with the current time.
    pub fn new(email: &str) -> Self {
        Self::at(email, Utc::now())
    }

    pub fn at(email: &str, login_time: DateTime<Utc>) -> Self {
        Self {
            email: email.to_string(),
            login_time,
        }
    }

    /// Email contains "admin" or ends with the admin domain, ignoring case.
    pub fn is_admin(&self) -> bool {
        let email = self.email.to_lowercase();
        email.contains("admin") || email.ends_with(ADMIN_DOMAIN_SUFFIX)
    }

    /// Read the stored session. Missing or unreadable records yield `None`.
    pub fn load(store: &dyn KeyValueStore) -> Option<Self> {
        let raw = store.get(SESSION_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("ignoring unreadable session record: {e}");
                None
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), ConfigError> {
        let json = serde_json::to_string(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        store.set(SESSION_KEY, &json)
    }

    /// Sign out.
    pub fn clear(store: &mut dyn KeyValueStore) -> Result<(), ConfigError> {
        store.remove(SESSION_KEY)
    }
}

/// Top-level surface to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Grid,
    Admin,
}

/// Where a request for `requested` actually lands.
///
/// No session always means Login; Admin without admin rights falls back to Grid.
pub fn resolve_route(session: Option<&AuthSession>, requested: Route) -> Route {
    match (session, requested) {
        (None, _) => Route::Login,
        (Some(s), Route::Admin) if s.is_admin() => Route::Admin,
        (Some(_), Route::Admin) => Route::Grid,
        (Some(_), Route::Login) => Route::Grid,
        (Some(_), Route::Grid) => Route::Grid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    #[test]
    fn test_admin_detection() {
        assert!(AuthSession::new("admin@example.com").is_admin());
        assert!(AuthSession::new("Site.ADMIN@corp.io").is_admin());
        assert!(AuthSession::new("jane@Admin.ExcelPro.com").is_admin());
        assert!(!AuthSession::new("jane@excelpro.com").is_admin());
        assert!(!AuthSession::new("").is_admin());
    }

    #[test]
    fn test_wire_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let session = AuthSession::at("a@b.com", at);
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["loginTime"], "2024-03-01T12:30:00Z");

        // Browser-style timestamp with milliseconds
        let parsed: AuthSession =
            serde_json::from_str(r#"{"email":"a@b.com","loginTime":"2024-03-01T12:30:00.000Z"}"#)
                .unwrap();
        assert_eq!(parsed, session);
    }

    #[test]
    fn test_save_load_clear() {
        let mut store = MemoryStore::new();
        assert_eq!(AuthSession::load(&store), None);

        let session = AuthSession::new("user@example.com");
        session.save(&mut store).unwrap();
        assert_eq!(AuthSession::load(&store), Some(session));

        AuthSession::clear(&mut store).unwrap();
        assert_eq!(AuthSession::load(&store), None);
    }

    #[test]
    fn test_unreadable_record_is_signed_out() {
        let mut store = MemoryStore::new();
        store.set(SESSION_KEY, "{\"email\": 5}").unwrap();
        assert_eq!(AuthSession::load(&store), None);
    }

    #[test]
    fn test_routes() {
        let user = AuthSession::new("user@example.com");
        let admin = AuthSession::new("boss@admin.excelpro.com");

        assert_eq!(resolve_route(None, Route::Grid), Route::Login);
        assert_eq!(resolve_route(None, Route::Admin), Route::Login);
        assert_eq!(resolve_route(Some(&user), Route::Grid), Route::Grid);
        assert_eq!(resolve_route(Some(&user), Route::Admin), Route::Grid);
        assert_eq!(resolve_route(Some(&user), Route::Login), Route::Grid);
        assert_eq!(resolve_route(Some(&admin), Route::Admin), Route::Admin);
    }
}
