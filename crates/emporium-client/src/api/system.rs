//! # System Administration Endpoints
//!
//! Everything under `/admin/system`.
//!
//! ## Endpoint Map
//! ```text
//! /admin/system
//! ├── /users                     GET list, GET one, PUT {id}/roles
//! ├── /sessions                  GET list, DELETE {id}
//! ├── /logs                      GET paged (AdminLogFilters)
//! ├── /health                    GET snapshot
//! ├── /notifications             GET paged (NotificationFilters)
//! │   ├── /stats                 GET counters
//! │   └── /{id}/retry            POST
//! ├── /permissions               GET, POST, PUT {id}, DELETE {id}
//! └── /role-permissions          GET (?role=), POST, DELETE {id}
//! ```

use serde::Serialize;

use emporium_core::{
    AdminLog, AdminLogFilters, AdminSession, AdminUser, ApiResult, EntityId, NewPermission,
    Notification, NotificationFilters, NotificationStats, Page, Permission, PermissionUpdate,
    RoleAssignment, RolePermission, SystemHealth,
};

use crate::client::{ApiClient, ApiRequest};

const BASE: &str = "/admin/system";

const FETCH_USERS_FAILED: &str = "Failed to fetch users";
const FETCH_USER_FAILED: &str = "Failed to fetch user";
const UPDATE_ROLES_FAILED: &str = "Failed to update user roles";
const FETCH_SESSIONS_FAILED: &str = "Failed to fetch sessions";
const REVOKE_SESSION_FAILED: &str = "Failed to revoke session";
const FETCH_LOGS_FAILED: &str = "Failed to fetch admin logs";
const FETCH_HEALTH_FAILED: &str = "Failed to fetch system health";
const FETCH_NOTIFICATIONS_FAILED: &str = "Failed to fetch notifications";
const FETCH_NOTIFICATION_STATS_FAILED: &str = "Failed to fetch notification stats";
const RETRY_NOTIFICATION_FAILED: &str = "Failed to retry notification";
const FETCH_PERMISSIONS_FAILED: &str = "Failed to fetch permissions";
const CREATE_PERMISSION_FAILED: &str = "Failed to create permission";
const UPDATE_PERMISSION_FAILED: &str = "Failed to update permission";
const DELETE_PERMISSION_FAILED: &str = "Failed to delete permission";
const FETCH_ROLE_PERMISSIONS_FAILED: &str = "Failed to fetch role permissions";
const ASSIGN_PERMISSION_FAILED: &str = "Failed to assign permission";
const REVOKE_PERMISSION_FAILED: &str = "Failed to revoke permission";

fn path(rest: impl std::fmt::Display) -> String {
    format!("{}{}", BASE, rest)
}

#[derive(Serialize)]
struct RoleUpdate<'a> {
    roles: &'a [String],
}

// =============================================================================
// Users
// =============================================================================

pub async fn list_users(client: &ApiClient) -> ApiResult<Vec<AdminUser>> {
    client
        .list(ApiRequest::get(path("/users")), FETCH_USERS_FAILED)
        .await
}

pub async fn get_user(client: &ApiClient, id: EntityId) -> ApiResult<Option<AdminUser>> {
    client
        .one(ApiRequest::get(path(format!("/users/{}", id))), FETCH_USER_FAILED)
        .await
}

/// Replaces the role list of an administrator.
pub async fn update_user_roles(
    client: &ApiClient,
    id: EntityId,
    roles: &[String],
) -> ApiResult<Option<AdminUser>> {
    if roles.iter().any(|r| r.trim().is_empty()) {
        return ApiResult::failure("role is required");
    }
    client
        .one(
            ApiRequest::put(path(format!("/users/{}/roles", id))).json(&RoleUpdate { roles }),
            UPDATE_ROLES_FAILED,
        )
        .await
}

// =============================================================================
// Sessions
// =============================================================================

/// Lists administrator sessions, optionally for one user.
pub async fn list_sessions(
    client: &ApiClient,
    user_id: Option<EntityId>,
) -> ApiResult<Vec<AdminSession>> {
    client
        .list(
            ApiRequest::get(path("/sessions")).param("user_id", user_id),
            FETCH_SESSIONS_FAILED,
        )
        .await
}

pub async fn revoke_session(client: &ApiClient, session_id: &str) -> ApiResult<()> {
    client
        .command(
            ApiRequest::delete(path(format!("/sessions/{}", session_id))),
            REVOKE_SESSION_FAILED,
        )
        .await
}

// =============================================================================
// Audit Log
// =============================================================================

pub async fn list_admin_logs(
    client: &ApiClient,
    filters: &AdminLogFilters,
) -> ApiResult<Page<AdminLog>> {
    client
        .page(
            ApiRequest::get(path("/logs")).filters(filters),
            FETCH_LOGS_FAILED,
        )
        .await
}

// =============================================================================
// Health
// =============================================================================

/// Fetches the health snapshot. On failure `data.status` is `Unknown`.
pub async fn get_system_health(client: &ApiClient) -> ApiResult<SystemHealth> {
    client
        .value(ApiRequest::get(path("/health")), FETCH_HEALTH_FAILED)
        .await
}

// =============================================================================
// Notifications
// =============================================================================

pub async fn list_notifications(
    client: &ApiClient,
    filters: &NotificationFilters,
) -> ApiResult<Page<Notification>> {
    client
        .page(
            ApiRequest::get(path("/notifications")).filters(filters),
            FETCH_NOTIFICATIONS_FAILED,
        )
        .await
}

pub async fn get_notification_stats(client: &ApiClient) -> ApiResult<NotificationStats> {
    client
        .value(
            ApiRequest::get(path("/notifications/stats")),
            FETCH_NOTIFICATION_STATS_FAILED,
        )
        .await
}

/// Requeues a failed notification for delivery.
pub async fn retry_notification(client: &ApiClient, id: EntityId) -> ApiResult<()> {
    client
        .command(
            ApiRequest::post(path(format!("/notifications/{}/retry", id))),
            RETRY_NOTIFICATION_FAILED,
        )
        .await
}

// =============================================================================
// Permissions
// =============================================================================

pub async fn list_permissions(client: &ApiClient) -> ApiResult<Vec<Permission>> {
    client
        .list(ApiRequest::get(path("/permissions")), FETCH_PERMISSIONS_FAILED)
        .await
}

pub async fn create_permission(
    client: &ApiClient,
    payload: &NewPermission,
) -> ApiResult<Option<Permission>> {
    client
        .one(
            ApiRequest::post(path("/permissions")).validated(payload),
            CREATE_PERMISSION_FAILED,
        )
        .await
}

pub async fn update_permission(
    client: &ApiClient,
    id: EntityId,
    payload: &PermissionUpdate,
) -> ApiResult<Option<Permission>> {
    client
        .one(
            ApiRequest::put(path(format!("/permissions/{}", id))).validated(payload),
            UPDATE_PERMISSION_FAILED,
        )
        .await
}

pub async fn delete_permission(client: &ApiClient, id: EntityId) -> ApiResult<()> {
    client
        .command(
            ApiRequest::delete(path(format!("/permissions/{}", id))),
            DELETE_PERMISSION_FAILED,
        )
        .await
}

// =============================================================================
// Role → Permission Mappings
// =============================================================================

pub async fn list_role_permissions(
    client: &ApiClient,
    role: Option<&str>,
) -> ApiResult<Vec<RolePermission>> {
    client
        .list(
            ApiRequest::get(path("/role-permissions")).param("role", role),
            FETCH_ROLE_PERMISSIONS_FAILED,
        )
        .await
}

pub async fn assign_permission(
    client: &ApiClient,
    role: &str,
    permission_id: EntityId,
) -> ApiResult<Option<RolePermission>> {
    let assignment = RoleAssignment {
        role: role.to_string(),
        permission_id,
    };
    client
        .one(
            ApiRequest::post(path("/role-permissions")).validated(&assignment),
            ASSIGN_PERMISSION_FAILED,
        )
        .await
}

pub async fn revoke_role_permission(client: &ApiClient, id: EntityId) -> ApiResult<()> {
    client
        .command(
            ApiRequest::delete(path(format!("/role-permissions/{}", id))),
            REVOKE_PERMISSION_FAILED,
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::test_support::scripted_client;
    use crate::transport::{HttpResponse, Method};
    use emporium_core::HealthState;
    use serde_json::json;

    #[tokio::test]
    async fn test_admin_logs_filters_and_page() {
        let (client, transport) = scripted_client();
        transport.respond(
            Method::Get,
            "/admin/system/logs",
            HttpResponse::ok(json!({
                "success": true,
                "data": {
                    "logs": [{ "id": 1, "action": "product.delete", "admin_username": "ana" }],
                    "total": 45,
                    "page": 2,
                    "limit": 20,
                    "total_pages": 3
                }
            })),
        );

        let filters = AdminLogFilters {
            action: Some("product.delete".to_string()),
            start_date: chrono::NaiveDate::from_ymd_opt(2024, 3, 1),
            page: Some(2),
            limit: Some(20),
            ..Default::default()
        };
        let result = list_admin_logs(&client, &filters).await;
        assert!(result.success);
        assert_eq!(result.data.items[0].admin_username.as_deref(), Some("ana"));
        assert!(result.data.has_next());

        let query = transport.last_request().unwrap().query;
        assert_eq!(query.get("start_date"), Some("2024-03-01"));
        assert_eq!(query.get("page"), Some("2"));
        assert_eq!(query.get("end_date"), None);
        assert_eq!(query.len(), 4);
    }

    #[tokio::test]
    async fn test_health_failure_defaults_to_unknown() {
        let (client, transport) = scripted_client();
        transport.fail(Method::Get, "/admin/system/health", ClientError::Timeout);

        let result = get_system_health(&client).await;
        assert!(!result.success);
        assert_eq!(result.data.status, HealthState::Unknown);
        assert_eq!(result.message(), Some("Failed to fetch system health"));
    }

    #[tokio::test]
    async fn test_permission_identifier_shim() {
        let (client, transport) = scripted_client();
        transport.respond(
            Method::Get,
            "/admin/system/permissions",
            HttpResponse::ok(json!({
                "success": true,
                "data": [
                    { "id": 1, "permission_name": "products.read" },
                    { "permission_id": 2, "permission_name": "products.write" }
                ]
            })),
        );

        let result = list_permissions(&client).await;
        let ids: Vec<_> = result.data.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_assign_permission_body() {
        let (client, transport) = scripted_client();
        transport.respond(
            Method::Post,
            "/admin/system/role-permissions",
            HttpResponse::json(201, json!({
                "success": true,
                "data": { "id": 9, "role": "editor", "permission_id": 2 }
            })),
        );

        let result = assign_permission(&client, "editor", 2).await;
        assert_eq!(result.data.unwrap().id, 9);
        assert_eq!(
            transport.last_request().unwrap().body,
            Some(json!({ "role": "editor", "permission_id": 2 }))
        );
    }

    #[tokio::test]
    async fn test_revoke_session_and_retry_paths() {
        let (client, transport) = scripted_client();
        transport.respond(Method::Delete, "/admin/system/sessions/s-42", HttpResponse::empty(204));
        transport.respond(
            Method::Post,
            "/admin/system/notifications/3/retry",
            HttpResponse::ok(json!({ "success": true, "message": "Queued" })),
        );

        assert!(revoke_session(&client, "s-42").await.success);
        let retried = retry_notification(&client, 3).await;
        assert_eq!(retried.message(), Some("Queued"));
    }

    #[tokio::test]
    async fn test_update_user_roles_rejects_blank_role() {
        let (client, transport) = scripted_client();
        let result = update_user_roles(&client, 1, &["admin".to_string(), " ".to_string()]).await;
        assert!(!result.success);
        assert!(transport.requests().is_empty());
    }
}
