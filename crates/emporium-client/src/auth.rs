//! # Auth Helpers
//!
//! Local session inspection. No network access.
//!
//! Every helper fails closed: a missing key, an empty token, or a `user`
//! value that does not parse yields `false` / `None` / an empty role list,
//! never an error.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use emporium_core::{EntityId, SESSION_TOKEN_KEY, SESSION_USER_KEY};

use crate::error::SessionResult;
use crate::session::SessionStore;

/// Roles that grant access to the system administration screens.
pub const ADMIN_ROLES: [&str; 2] = ["admin", "super_admin"];

/// Profile of the signed-in administrator, as stored under `user`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredUser")]
pub struct SessionUser {
    #[serde(default)]
    pub id: Option<EntityId>,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub roles: Vec<String>,
}

/// On-disk shape of the profile. `_id` is only read when `id` is absent.
#[derive(Deserialize)]
struct StoredUser {
    #[serde(default)]
    id: Option<EntityId>,

    #[serde(default, rename = "_id")]
    legacy_id: Option<EntityId>,

    #[serde(default)]
    username: String,

    #[serde(default)]
    email: Option<String>,

    #[serde(default)]
    roles: Vec<String>,
}

impl From<StoredUser> for SessionUser {
    fn from(stored: StoredUser) -> Self {
        SessionUser {
            id: stored.id.or(stored.legacy_id),
            username: stored.username,
            email: stored.email,
            roles: stored.roles,
        }
    }
}

/// Returns the session credential, if one is stored and non-empty.
pub fn get_token(store: &dyn SessionStore) -> Option<String> {
    store
        .get(SESSION_TOKEN_KEY)
        .filter(|token| !token.trim().is_empty())
}

/// Returns true if a non-empty token is stored.
pub fn is_authenticated(store: &dyn SessionStore) -> bool {
    get_token(store).is_some()
}

/// Parses the stored profile. `None` if absent or malformed.
pub fn current_user(store: &dyn SessionStore) -> Option<SessionUser> {
    let raw = store.get(SESSION_USER_KEY)?;
    match serde_json::from_str(&raw) {
        Ok(user) => Some(user),
        Err(e) => {
            warn!(error = %e, "Stored user profile is malformed");
            None
        }
    }
}

/// Roles of the signed-in user; empty when unknown.
pub fn user_roles(store: &dyn SessionStore) -> Vec<String> {
    current_user(store).map(|u| u.roles).unwrap_or_default()
}

/// Returns true if the signed-in user holds `role`.
pub fn has_role(store: &dyn SessionStore, role: &str) -> bool {
    user_roles(store).iter().any(|r| r == role)
}

/// Returns true for `admin` or `super_admin`.
pub fn is_admin(store: &dyn SessionStore) -> bool {
    user_roles(store)
        .iter()
        .any(|r| ADMIN_ROLES.contains(&r.as_str()))
}

/// Writes a token and profile directly, bypassing the login flow.
///
/// Used by local tooling and tests to act as a given administrator.
pub fn seed_debug_session(
    store: &dyn SessionStore,
    token: &str,
    user: &SessionUser,
) -> SessionResult<()> {
    let profile = serde_json::to_string(user)?;
    store.set(SESSION_TOKEN_KEY, token)?;
    store.set(SESSION_USER_KEY, &profile)?;
    debug!(username = %user.username, roles = ?user.roles, "Seeded debug session");
    Ok(())
}

/// Removes both session keys.
pub fn clear_session(store: &dyn SessionStore) -> SessionResult<()> {
    store.clear(SESSION_TOKEN_KEY)?;
    store.clear(SESSION_USER_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;

    fn admin() -> SessionUser {
        SessionUser {
            id: Some(1),
            username: "ana".to_string(),
            email: Some("ana@shop.test".to_string()),
            roles: vec!["admin".to_string()],
        }
    }

    #[test]
    fn test_empty_store_fails_closed() {
        let store = MemorySessionStore::new();
        assert!(!is_authenticated(&store));
        assert_eq!(current_user(&store), None);
        assert!(user_roles(&store).is_empty());
        assert!(!is_admin(&store));
    }

    #[test]
    fn test_blank_token_is_not_authenticated() {
        let store = MemorySessionStore::with_values([("token", "  ")]);
        assert!(!is_authenticated(&store));
        assert_eq!(get_token(&store), None);
    }

    #[test]
    fn test_seeded_session() {
        let store = MemorySessionStore::new();
        seed_debug_session(&store, "tok-1", &admin()).unwrap();

        assert_eq!(get_token(&store).as_deref(), Some("tok-1"));
        assert!(is_admin(&store));
        assert!(has_role(&store, "admin"));
        assert!(!has_role(&store, "editor"));
        assert_eq!(current_user(&store).unwrap().username, "ana");

        clear_session(&store).unwrap();
        assert!(!is_authenticated(&store));
        assert_eq!(current_user(&store), None);
    }

    #[test]
    fn test_malformed_profile_fails_closed() {
        let store = MemorySessionStore::with_values([("token", "t"), ("user", "{roles: admin")]);
        assert!(is_authenticated(&store));
        assert_eq!(current_user(&store), None);
        assert!(!is_admin(&store));
    }

    #[test]
    fn test_super_admin_counts_as_admin() {
        let store = MemorySessionStore::with_values([(
            "user",
            r#"{"_id": 4, "username": "root", "roles": ["super_admin"]}"#,
        )]);
        assert!(is_admin(&store));
        assert_eq!(current_user(&store).unwrap().id, Some(4));
    }

    #[test]
    fn test_profile_with_both_id_keys_prefers_id() {
        let store = MemorySessionStore::with_values([(
            "user",
            r#"{"id": 5, "_id": 6, "username": "ops", "roles": ["admin"]}"#,
        )]);
        let user = current_user(&store).unwrap();
        assert_eq!(user.id, Some(5));
        assert!(is_admin(&store));
    }
}
