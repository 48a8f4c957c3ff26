//! # Audit Log Screen
//!
//! Server-driven list of administrator actions, filtered by admin, action,
//! resource type and date range.

use chrono::NaiveDate;

use emporium_core::{AdminLog, AdminLogFilters, ApiResult, EntityId, Page};

use crate::store::PageInfo;
use crate::stores::SystemStore;
use crate::views::list::ServerFilteredList;

/// Everything the audit log screen renders.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditLogScreen {
    pub entries: Vec<AdminLog>,
    pub info: PageInfo,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct AuditLogView {
    store: SystemStore,
    list: ServerFilteredList<AdminLogFilters>,
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl AuditLogView {
    pub fn new(store: SystemStore, page_size: u32) -> Self {
        AuditLogView {
            store,
            list: ServerFilteredList::new(page_size),
        }
    }

    pub fn filters(&self) -> &AdminLogFilters {
        self.list.filters()
    }

    pub async fn load(&self) -> ApiResult<Page<AdminLog>> {
        self.list.apply(&self.store).await
    }

    pub async fn retry(&self) -> ApiResult<Page<AdminLog>> {
        self.store.refresh_logs().await
    }

    /// Changes several filters at once and fetches `page` of the result.
    pub async fn query(
        &mut self,
        change: impl FnOnce(&mut AdminLogFilters),
        page: u32,
    ) -> ApiResult<Page<AdminLog>> {
        self.list.update(change);
        self.list.set_page(page);
        self.load().await
    }

    pub async fn set_admin(&mut self, admin_id: Option<EntityId>) -> ApiResult<Page<AdminLog>> {
        self.list.update(|f| f.admin_id = admin_id);
        self.load().await
    }

    pub async fn set_action(&mut self, action: Option<&str>) -> ApiResult<Page<AdminLog>> {
        let action = non_blank(action);
        self.list.update(|f| f.action = action);
        self.load().await
    }

    pub async fn set_resource_type(
        &mut self,
        resource_type: Option<&str>,
    ) -> ApiResult<Page<AdminLog>> {
        let resource_type = non_blank(resource_type);
        self.list.update(|f| f.resource_type = resource_type);
        self.load().await
    }

    /// Sets an inclusive date range. A reversed range is swapped.
    pub async fn set_date_range(
        &mut self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> ApiResult<Page<AdminLog>> {
        let (start, end) = match (start, end) {
            (Some(s), Some(e)) if s > e => (Some(e), Some(s)),
            other => other,
        };
        self.list.update(|f| {
            f.start_date = start;
            f.end_date = end;
        });
        self.load().await
    }

    pub async fn set_page(&mut self, page: u32) -> ApiResult<Page<AdminLog>> {
        self.list.set_page(page);
        self.load().await
    }

    pub async fn next_page(&mut self) -> Option<ApiResult<Page<AdminLog>>> {
        let total_pages = self.store.logs().read(|state| state.meta.info.total_pages);
        if self.list.next_page(total_pages) {
            Some(self.load().await)
        } else {
            None
        }
    }

    pub async fn previous_page(&mut self) -> Option<ApiResult<Page<AdminLog>>> {
        if self.list.previous_page() {
            Some(self.load().await)
        } else {
            None
        }
    }

    pub fn screen(&self) -> AuditLogScreen {
        let state = self.store.logs().snapshot();
        AuditLogScreen {
            entries: state.items,
            info: state.meta.info,
            loading: state.loading,
            error: state.error,
        }
    }
}
