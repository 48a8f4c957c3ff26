//! # System Dashboard
//!
//! Health snapshot plus notification delivery counters on one screen.
//!
//! ```text
//! ┌────────────────────────────┐  ┌────────────────────────────┐
//! │ Health                     │  │ Notifications              │
//! │  status   (worst of all)   │  │  sent / failed / pending   │
//! │  version, uptime           │  │  success rate              │
//! │  failing services          │  │  failed list + retry       │
//! └────────────────────────────┘  └────────────────────────────┘
//! ```

use emporium_core::{
    ApiResult, EntityId, HealthState, Notification, NotificationFilters, NotificationStats,
    NotificationStatus, Page, SystemHealth,
};

use crate::stores::SystemStore;

/// What the dashboard renders.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardSummary {
    pub status: HealthState,
    pub version: Option<String>,
    pub uptime_seconds: Option<u64>,
    /// Names of components that are not healthy.
    pub failing_services: Vec<String>,
    pub stats: Option<NotificationStats>,
    /// Percent of settled notifications that were sent.
    pub success_rate: Option<f64>,
    /// Most recent failed notifications, for the retry panel.
    pub failed_notifications: Vec<Notification>,
    pub loading: bool,
    /// First error among the dashboard's slices.
    pub error: Option<String>,
}

/// Outcome of one dashboard load.
#[derive(Debug, Clone)]
pub struct DashboardLoad {
    pub health: ApiResult<SystemHealth>,
    pub stats: ApiResult<NotificationStats>,
    pub failed: ApiResult<Page<Notification>>,
}

impl DashboardLoad {
    pub fn all_succeeded(&self) -> bool {
        self.health.success && self.stats.success && self.failed.success
    }
}

pub struct SystemDashboard {
    store: SystemStore,
}

impl SystemDashboard {
    pub fn new(store: SystemStore) -> Self {
        SystemDashboard { store }
    }

    pub fn store(&self) -> &SystemStore {
        &self.store
    }

    /// Fetches health, stats and failed notifications concurrently.
    pub async fn load(&self) -> DashboardLoad {
        let failed_filters = NotificationFilters {
            status: Some(NotificationStatus::Failed),
            ..Default::default()
        };
        let (health, stats, failed) = tokio::join!(
            self.store.fetch_system_health(),
            self.store.fetch_notification_stats(),
            self.store.fetch_notifications(&failed_filters)
        );
        DashboardLoad {
            health,
            stats,
            failed,
        }
    }

    pub async fn retry(&self) -> DashboardLoad {
        self.store.health().clear_error();
        self.store.notifications().clear_error();
        self.load().await
    }

    /// Requeues one failed notification, then refreshes the counters.
    pub async fn retry_notification(&self, id: EntityId) -> ApiResult<()> {
        let result = self.store.retry_notification(id).await;
        if result.success {
            self.store.fetch_notification_stats().await;
        }
        result
    }

    pub fn summary(&self) -> DashboardSummary {
        let health = self.store.health().snapshot();
        let notifications = self.store.notifications().snapshot();
        let stats = notifications.meta.stats;

        let (status, version, uptime_seconds, failing_services) = match &health.current {
            Some(h) => (
                h.effective_status(),
                h.version.clone(),
                h.uptime_seconds,
                h.failing_services().map(|s| s.name.clone()).collect(),
            ),
            None => (HealthState::Unknown, None, None, Vec::new()),
        };

        DashboardSummary {
            status,
            version,
            uptime_seconds,
            failing_services,
            stats,
            success_rate: stats.and_then(|s| s.success_rate()),
            failed_notifications: notifications
                .items
                .into_iter()
                .filter(|n| n.status == NotificationStatus::Failed)
                .collect(),
            loading: health.loading || notifications.loading,
            error: health.error.or(notifications.error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{envelope, scripted_client};
    use emporium_client::{ClientError, Method};
    use serde_json::json;

    fn script_stats(transport: &emporium_client::ScriptedTransport, sent: u64) {
        transport.respond(
            Method::Get,
            "/admin/system/notifications/stats",
            envelope(json!({ "total": sent + 1, "sent": sent, "failed": 1, "pending": 0 })),
        );
    }

    #[tokio::test]
    async fn test_summary_combines_slices() {
        let (client, transport) = scripted_client();
        transport.respond(
            Method::Get,
            "/admin/system/health",
            envelope(json!({
                "status": "healthy",
                "version": "2.4.1",
                "uptime_seconds": 86400,
                "components": [
                    { "name": "database", "status": "healthy" },
                    { "name": "mailer", "status": "unhealthy" }
                ]
            })),
        );
        script_stats(&transport, 3);
        transport.respond(
            Method::Get,
            "/admin/system/notifications",
            envelope(json!([{ "id": 8, "channel": "email", "status": "failed" }])),
        );

        let dashboard = SystemDashboard::new(SystemStore::new(client));
        assert!(dashboard.load().await.all_succeeded());

        let summary = dashboard.summary();
        assert_eq!(summary.status, HealthState::Unhealthy);
        assert_eq!(summary.failing_services, vec!["mailer"]);
        assert_eq!(summary.version.as_deref(), Some("2.4.1"));
        assert_eq!(summary.success_rate, Some(75.0));
        assert_eq!(summary.failed_notifications.len(), 1);
        assert!(!summary.loading);
    }

    #[tokio::test]
    async fn test_offline_health_reports_unknown() {
        let (client, transport) = scripted_client();
        transport.fail(Method::Get, "/admin/system/health", ClientError::Timeout);
        script_stats(&transport, 1);
        transport.respond(
            Method::Get,
            "/admin/system/notifications",
            envelope(json!([])),
        );

        let dashboard = SystemDashboard::new(SystemStore::new(client));
        let load = dashboard.load().await;
        assert!(!load.all_succeeded());

        let summary = dashboard.summary();
        assert_eq!(summary.status, HealthState::Unknown);
        assert!(summary.error.is_some());
        assert_eq!(summary.success_rate, Some(50.0));
    }

    #[tokio::test]
    async fn test_retry_notification_refreshes_stats() {
        let (client, transport) = scripted_client();
        transport.respond(
            Method::Post,
            "/admin/system/notifications/8/retry",
            envelope(json!(null)),
        );
        script_stats(&transport, 4);

        let dashboard = SystemDashboard::new(SystemStore::new(client));
        assert!(dashboard.retry_notification(8).await.success);
        assert_eq!(dashboard.summary().stats.map(|s| s.sent), Some(4));
    }
}
