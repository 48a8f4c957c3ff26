//! # System Store
//!
//! Everything under `/admin/system`, one slice per resource.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SystemStore                                      │
//! │                                                                         │
//! │  slice             items            current        meta                 │
//! │  ─────             ─────            ───────        ────                 │
//! │  users             AdminUser        AdminUser      -                    │
//! │  sessions          AdminSession     -              -                    │
//! │  logs              AdminLog         -              PagedMeta<filters>   │
//! │  health            -                SystemHealth   -                    │
//! │  notifications     Notification     -              paging + stats       │
//! │  permissions       Permission       Permission     -                    │
//! │  role_permissions  RolePermission   -              -                    │
//! │                                                                         │
//! │  Slices load independently; one failing never clears another.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::info;

use emporium_client::api::system as api;
use emporium_client::ApiClient;
use emporium_core::{
    AdminLog, AdminLogFilters, AdminSession, AdminUser, ApiResult, EntityId, NewPermission,
    Notification, NotificationFilters, NotificationStats, NotificationStatus, Page, Permission,
    PermissionUpdate, RolePermission, SystemHealth,
};

use crate::store::{PageInfo, PagedMeta, StoreCore};

/// Extras of the notification slice.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NotificationMeta {
    pub paging: PagedMeta<NotificationFilters>,
    /// Last fetched delivery counters.
    pub stats: Option<NotificationStats>,
}

/// State container for the system administration screens.
#[derive(Clone)]
pub struct SystemStore {
    client: ApiClient,
    users: StoreCore<AdminUser>,
    sessions: StoreCore<AdminSession>,
    logs: StoreCore<AdminLog, PagedMeta<AdminLogFilters>>,
    health: StoreCore<SystemHealth>,
    notifications: StoreCore<Notification, NotificationMeta>,
    permissions: StoreCore<Permission>,
    role_permissions: StoreCore<RolePermission>,
}

impl SystemStore {
    pub fn new(client: ApiClient) -> Self {
        SystemStore {
            client,
            users: StoreCore::new("admin_users"),
            sessions: StoreCore::new("admin_sessions"),
            logs: StoreCore::new("admin_logs"),
            health: StoreCore::new("system_health"),
            notifications: StoreCore::new("notifications"),
            permissions: StoreCore::new("permissions"),
            role_permissions: StoreCore::new("role_permissions"),
        }
    }

    pub fn users(&self) -> &StoreCore<AdminUser> {
        &self.users
    }

    pub fn sessions(&self) -> &StoreCore<AdminSession> {
        &self.sessions
    }

    pub fn logs(&self) -> &StoreCore<AdminLog, PagedMeta<AdminLogFilters>> {
        &self.logs
    }

    pub fn health(&self) -> &StoreCore<SystemHealth> {
        &self.health
    }

    pub fn notifications(&self) -> &StoreCore<Notification, NotificationMeta> {
        &self.notifications
    }

    pub fn permissions(&self) -> &StoreCore<Permission> {
        &self.permissions
    }

    pub fn role_permissions(&self) -> &StoreCore<RolePermission> {
        &self.role_permissions
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub async fn fetch_users(&self) -> ApiResult<Vec<AdminUser>> {
        let guard = self.users.begin_sequenced("list");
        let result = api::list_users(&self.client).await;
        if guard.settle(&result, |state, items| state.replace_all(items.clone())) {
            info!(count = result.data.len(), "Admin users loaded");
        }
        result
    }

    pub async fn fetch_user(&self, id: EntityId) -> ApiResult<Option<AdminUser>> {
        let guard = self.users.begin_sequenced("current");
        let result = api::get_user(&self.client, id).await;
        guard.settle(&result, |state, user| state.set_current(user.clone()));
        result
    }

    pub async fn update_user_roles(
        &self,
        id: EntityId,
        roles: &[String],
    ) -> ApiResult<Option<AdminUser>> {
        let guard = self.users.begin();
        let result = api::update_user_roles(&self.client, id, roles).await;
        if guard.settle(&result, |state, updated| {
            if let Some(user) = updated {
                state.replace_by_id(user.clone());
            }
        }) {
            info!(id, roles = ?roles, "Admin roles updated");
        }
        result
    }

    // =========================================================================
    // Sessions
    // =========================================================================

    pub async fn fetch_sessions(&self, user_id: Option<EntityId>) -> ApiResult<Vec<AdminSession>> {
        let guard = self.sessions.begin_sequenced("list");
        let result = api::list_sessions(&self.client, user_id).await;
        guard.settle(&result, |state, items| state.replace_all(items.clone()));
        result
    }

    pub async fn revoke_session(&self, session_id: &str) -> ApiResult<()> {
        let guard = self.sessions.begin();
        let result = api::revoke_session(&self.client, session_id).await;
        if guard.settle(&result, |state, _| {
            state.remove_by_id(&session_id.to_string());
        }) {
            info!(session_id, "Admin session revoked");
        }
        result
    }

    // =========================================================================
    // Audit Log
    // =========================================================================

    pub async fn fetch_admin_logs(&self, filters: &AdminLogFilters) -> ApiResult<Page<AdminLog>> {
        let guard = self.logs.begin_sequenced("list");
        guard.commit(|state| state.meta.last_filters = Some(filters.clone()));

        let result = api::list_admin_logs(&self.client, filters).await;
        if guard.settle(&result, |state, page| {
            state.replace_all(page.items.clone());
            state.meta.info = PageInfo::of(page);
        }) {
            info!(
                count = result.data.items.len(),
                total = result.data.total,
                "Admin logs loaded"
            );
        }
        result
    }

    /// Replays the most recent log query.
    pub async fn refresh_logs(&self) -> ApiResult<Page<AdminLog>> {
        let filters = self
            .logs
            .read(|state| state.meta.last_filters.clone())
            .unwrap_or_default();
        self.fetch_admin_logs(&filters).await
    }

    // =========================================================================
    // Health
    // =========================================================================

    pub async fn fetch_system_health(&self) -> ApiResult<SystemHealth> {
        let guard = self.health.begin_sequenced("current");
        let result = api::get_system_health(&self.client).await;
        if guard.settle(&result, |state, health| state.set_current(Some(health.clone()))) {
            info!(status = %result.data.effective_status(), "System health loaded");
        }
        result
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    pub async fn fetch_notifications(
        &self,
        filters: &NotificationFilters,
    ) -> ApiResult<Page<Notification>> {
        let guard = self.notifications.begin_sequenced("list");
        guard.commit(|state| state.meta.paging.last_filters = Some(filters.clone()));

        let result = api::list_notifications(&self.client, filters).await;
        guard.settle(&result, |state, page| {
            state.replace_all(page.items.clone());
            state.meta.paging.info = PageInfo::of(page);
        });
        result
    }

    pub async fn refresh_notifications(&self) -> ApiResult<Page<Notification>> {
        let filters = self
            .notifications
            .read(|state| state.meta.paging.last_filters.clone())
            .unwrap_or_default();
        self.fetch_notifications(&filters).await
    }

    pub async fn fetch_notification_stats(&self) -> ApiResult<NotificationStats> {
        let guard = self.notifications.begin_sequenced("stats");
        let result = api::get_notification_stats(&self.client).await;
        guard.settle(&result, |state, stats| state.meta.stats = Some(*stats));
        result
    }

    /// Requeues a failed notification. The local record shows `Pending`
    /// until the next fetch.
    pub async fn retry_notification(&self, id: EntityId) -> ApiResult<()> {
        let guard = self.notifications.begin();
        let result = api::retry_notification(&self.client, id).await;
        if guard.settle(&result, |state, _| {
            if let Some(n) = state.items.iter_mut().find(|n| n.id == id) {
                n.status = NotificationStatus::Pending;
                n.error_message = None;
            }
        }) {
            info!(id, "Notification requeued");
        }
        result
    }

    // =========================================================================
    // Permissions
    // =========================================================================

    pub async fn fetch_permissions(&self) -> ApiResult<Vec<Permission>> {
        let guard = self.permissions.begin_sequenced("list");
        let result = api::list_permissions(&self.client).await;
        guard.settle(&result, |state, items| state.replace_all(items.clone()));
        result
    }

    pub async fn create_permission(&self, payload: &NewPermission) -> ApiResult<Option<Permission>> {
        let guard = self.permissions.begin();
        let result = api::create_permission(&self.client, payload).await;
        guard.settle(&result, |state, created| {
            if let Some(permission) = created {
                state.append(permission.clone());
            }
        });
        result
    }

    pub async fn update_permission(
        &self,
        id: EntityId,
        payload: &PermissionUpdate,
    ) -> ApiResult<Option<Permission>> {
        let guard = self.permissions.begin();
        let result = api::update_permission(&self.client, id, payload).await;
        guard.settle(&result, |state, updated| {
            if let Some(permission) = updated {
                state.replace_by_id(permission.clone());
            }
        });
        result
    }

    pub async fn delete_permission(&self, id: EntityId) -> ApiResult<()> {
        let guard = self.permissions.begin();
        let result = api::delete_permission(&self.client, id).await;
        guard.settle(&result, |state, _| {
            state.remove_by_id(&id);
        });
        result
    }

    // =========================================================================
    // Role Permissions
    // =========================================================================

    pub async fn fetch_role_permissions(
        &self,
        role: Option<&str>,
    ) -> ApiResult<Vec<RolePermission>> {
        let guard = self.role_permissions.begin_sequenced("list");
        let result = api::list_role_permissions(&self.client, role).await;
        guard.settle(&result, |state, items| state.replace_all(items.clone()));
        result
    }

    pub async fn assign_permission(
        &self,
        role: &str,
        permission_id: EntityId,
    ) -> ApiResult<Option<RolePermission>> {
        let guard = self.role_permissions.begin();
        let result = api::assign_permission(&self.client, role, permission_id).await;
        if guard.settle(&result, |state, created| {
            if let Some(grant) = created {
                state.append(grant.clone());
            }
        }) {
            info!(role, permission_id, "Permission granted");
        }
        result
    }

    pub async fn revoke_role_permission(&self, id: EntityId) -> ApiResult<()> {
        let guard = self.role_permissions.begin();
        let result = api::revoke_role_permission(&self.client, id).await;
        guard.settle(&result, |state, _| {
            state.remove_by_id(&id);
        });
        result
    }

    // =========================================================================
    // Status
    // =========================================================================

    /// True while any slice has an outstanding action.
    pub fn is_loading(&self) -> bool {
        self.users.is_loading()
            || self.sessions.is_loading()
            || self.logs.is_loading()
            || self.health.is_loading()
            || self.notifications.is_loading()
            || self.permissions.is_loading()
            || self.role_permissions.is_loading()
    }

    pub fn clear_error(&self) {
        self.users.clear_error();
        self.sessions.clear_error();
        self.logs.clear_error();
        self.health.clear_error();
        self.notifications.clear_error();
        self.permissions.clear_error();
        self.role_permissions.clear_error();
    }

    pub fn reset(&self) {
        self.users.reset();
        self.sessions.reset();
        self.logs.reset();
        self.health.reset();
        self.notifications.reset();
        self.permissions.reset();
        self.role_permissions.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{envelope, scripted_client};
    use emporium_client::{HttpResponse, Method, ScriptedTransport};
    use emporium_core::HealthState;
    use serde_json::json;
    use std::sync::Arc;

    fn store() -> (SystemStore, Arc<ScriptedTransport>) {
        let (client, transport) = scripted_client();
        (SystemStore::new(client), transport)
    }

    #[tokio::test]
    async fn test_revoke_session_by_string_id() {
        let (store, transport) = store();
        transport.respond(
            Method::Get,
            "/admin/system/sessions",
            envelope(json!([
                { "session_id": "s-1", "user_id": 1 },
                { "session_id": "s-2", "user_id": 1 }
            ])),
        );
        transport.respond(
            Method::Delete,
            "/admin/system/sessions/s-1",
            HttpResponse::empty(204),
        );

        store.fetch_sessions(Some(1)).await;
        assert!(store.revoke_session("s-1").await.success);

        let ids: Vec<_> = store
            .sessions()
            .snapshot()
            .items
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["s-2"]);
    }

    #[tokio::test]
    async fn test_health_failure_is_scoped_to_its_slice() {
        let (store, transport) = store();
        transport.respond(
            Method::Get,
            "/admin/system/users",
            envelope(json!([{ "id": 1, "username": "root" }])),
        );
        transport.respond(
            Method::Get,
            "/admin/system/health",
            HttpResponse::json(503, json!({ "detail": "Service unavailable" })),
        );

        store.fetch_users().await;
        let health = store.fetch_system_health().await;

        assert!(!health.success);
        assert_eq!(health.data.status, HealthState::Unknown);
        assert_eq!(store.health().error().as_deref(), Some("Service unavailable"));
        assert_eq!(store.users().error(), None);
        assert_eq!(store.users().snapshot().items.len(), 1);
    }

    #[tokio::test]
    async fn test_logs_refresh_replays_filters() {
        let (store, transport) = store();
        let body = json!({ "logs": [{ "id": 9, "action": "delete_product" }], "total": 1 });
        transport.respond(Method::Get, "/admin/system/logs", envelope(body.clone()));
        transport.respond(Method::Get, "/admin/system/logs", envelope(body));

        let filters = AdminLogFilters {
            action: Some("delete_product".to_string()),
            ..Default::default()
        };
        store.fetch_admin_logs(&filters).await;
        assert!(store.refresh_logs().await.success);

        let requests = transport.requests();
        assert_eq!(requests[1].query.get("action"), Some("delete_product"));
        assert_eq!(store.logs().snapshot().meta.info.total, 1);
    }

    #[tokio::test]
    async fn test_retry_notification_marks_pending() {
        let (store, transport) = store();
        transport.respond(
            Method::Get,
            "/admin/system/notifications",
            envelope(json!({
                "notifications": [
                    { "id": 4, "channel": "email", "status": "failed", "error_message": "bounce" }
                ],
                "total": 1
            })),
        );
        transport.respond(
            Method::Get,
            "/admin/system/notifications/stats",
            envelope(json!({ "total": 4, "sent": 3, "failed": 1, "pending": 0 })),
        );
        transport.respond(
            Method::Post,
            "/admin/system/notifications/4/retry",
            envelope(json!(null)),
        );

        store.fetch_notifications(&NotificationFilters::default()).await;
        store.fetch_notification_stats().await;
        assert!(store.retry_notification(4).await.success);

        let state = store.notifications().snapshot();
        assert_eq!(state.items[0].status, NotificationStatus::Pending);
        assert_eq!(state.items[0].error_message, None);
        assert_eq!(state.meta.stats.map(|s| s.sent), Some(3));
    }

    #[tokio::test]
    async fn test_assign_and_revoke_permission() {
        let (store, transport) = store();
        transport.respond(
            Method::Post,
            "/admin/system/role-permissions",
            envelope(json!({ "id": 7, "role": "editor", "permission_id": 3 })),
        );
        transport.respond(
            Method::Delete,
            "/admin/system/role-permissions/7",
            HttpResponse::empty(204),
        );

        assert!(store.assign_permission("editor", 3).await.success);
        assert_eq!(store.role_permissions().snapshot().items.len(), 1);

        assert!(store.revoke_role_permission(7).await.success);
        assert!(store.role_permissions().snapshot().items.is_empty());
        assert!(!store.is_loading());
    }
}
