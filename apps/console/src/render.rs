//! Plain-text rendering of each screen.

use std::fmt::Write;

use emporium_core::{AdminLog, Customer, Product};
use emporium_state::views::{AuditLogScreen, CategoryScreen, CustomerScreen, DashboardSummary, ProductScreen};
use emporium_state::PageInfo;

fn footer(out: &mut String, page: impl std::fmt::Display, total_pages: impl std::fmt::Display, total: impl std::fmt::Display) {
    let _ = writeln!(out, "-- page {} of {} ({} total)", page, total_pages, total);
}

fn banner(out: &mut String, error: Option<&str>) {
    if let Some(message) = error {
        let _ = writeln!(out, "! {}", message);
    }
}

fn yes_no(active: bool) -> &'static str {
    if active {
        "active"
    } else {
        "inactive"
    }
}

pub fn categories(screen: &CategoryScreen) -> String {
    let mut out = String::new();
    banner(&mut out, screen.error.as_deref());

    if screen.rows.is_empty() {
        out.push_str("No categories found.\n");
    }
    for row in &screen.rows {
        let marker = if row.expanded { "v" } else { ">" };
        let _ = writeln!(
            out,
            "{} {:>5}  {:<32} {:<8} {} subcategories",
            marker,
            row.category.id,
            row.category.category_name,
            yes_no(row.category.is_active),
            row.subcategories.len()
        );
        if row.expanded {
            for sub in &row.subcategories {
                let _ = writeln!(out, "        {:>5}  {}", sub.id, sub.subcategory_name);
            }
        }
    }

    footer(&mut out, screen.page, screen.total_pages, screen.total);
    out
}

fn customer_line(out: &mut String, customer: &Customer) {
    let _ = writeln!(
        out,
        "{:>5}  {:<28} {:<32} {:>4} orders {:>10.2}  {}",
        customer.id,
        customer.full_name(),
        customer.email,
        customer.total_orders,
        customer.total_spent,
        yes_no(customer.is_active)
    );
}

pub fn customers(screen: &CustomerScreen) -> String {
    let mut out = String::new();
    banner(&mut out, screen.error.as_deref());

    if screen.window.is_empty() {
        out.push_str("No customers found.\n");
    }
    for customer in &screen.window.items {
        customer_line(&mut out, customer);
    }

    let window = &screen.window;
    footer(&mut out, window.page, window.total_pages, window.total);
    out
}

fn product_line(out: &mut String, product: &Product) {
    let _ = writeln!(
        out,
        "{:>5}  {:<12} {:<32} {:>10.2} {:>6} in stock  {}",
        product.id,
        product.sku.as_deref().unwrap_or("-"),
        product.name,
        product.price,
        product.stock_quantity,
        product.status
    );
}

fn page_footer(out: &mut String, info: &PageInfo) {
    footer(out, info.page, info.total_pages.max(1), info.total);
}

pub fn products(screen: &ProductScreen) -> String {
    let mut out = String::new();
    banner(&mut out, screen.error.as_deref());

    if screen.products.is_empty() {
        out.push_str("No products found.\n");
    }
    for product in &screen.products {
        product_line(&mut out, product);
    }

    page_footer(&mut out, &screen.info);
    out
}

fn log_line(out: &mut String, entry: &AdminLog) {
    let when = entry
        .created_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    let who = entry
        .admin_username
        .clone()
        .or_else(|| entry.admin_id.map(|id| format!("#{}", id)))
        .unwrap_or_else(|| "-".to_string());
    let target = match (&entry.resource_type, &entry.resource_id) {
        (Some(kind), Some(id)) => format!("{} {}", kind, id),
        (Some(kind), None) => kind.clone(),
        _ => String::new(),
    };
    let _ = writeln!(out, "{}  {:<16} {:<24} {}", when, who, entry.action, target);
}

pub fn audit_log(screen: &AuditLogScreen) -> String {
    let mut out = String::new();
    banner(&mut out, screen.error.as_deref());

    if screen.entries.is_empty() {
        out.push_str("No log entries.\n");
    }
    for entry in &screen.entries {
        log_line(&mut out, entry);
    }

    page_footer(&mut out, &screen.info);
    out
}

fn uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;
    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else {
        format!("{}h {}m", hours, minutes)
    }
}

pub fn dashboard(summary: &DashboardSummary) -> String {
    let mut out = String::new();
    banner(&mut out, summary.error.as_deref());

    let _ = writeln!(out, "System status: {}", summary.status);
    if let Some(version) = &summary.version {
        let _ = writeln!(out, "Version:       {}", version);
    }
    if let Some(seconds) = summary.uptime_seconds {
        let _ = writeln!(out, "Uptime:        {}", uptime(seconds));
    }
    if !summary.failing_services.is_empty() {
        let _ = writeln!(out, "Failing:       {}", summary.failing_services.join(", "));
    }

    match summary.stats {
        Some(stats) => {
            let _ = writeln!(
                out,
                "Notifications: {} sent, {} failed, {} pending",
                stats.sent, stats.failed, stats.pending
            );
            if let Some(rate) = summary.success_rate {
                let _ = writeln!(out, "Success rate:  {:.1}%", rate);
            }
        }
        None => out.push_str("Notifications: unavailable\n"),
    }

    for notification in &summary.failed_notifications {
        let _ = writeln!(
            out,
            "  failed #{} via {} to {}: {}",
            notification.id,
            notification.channel,
            notification.recipient.as_deref().unwrap_or("-"),
            notification.error_message.as_deref().unwrap_or("unknown error")
        );
    }
    out
}
