//! # emporium: Terminal Admin Console
//!
//! Drives the same view models a graphical admin would, rendering each
//! screen as plain text.
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ clap Cli │──►│ view model   │──►│ store        │──►│ ApiClient    │
//! │          │   │ (filters,    │   │ (loading,    │   │ (reqwest,    │
//! │          │   │  confirm)    │   │  error)      │   │  session)    │
//! └──────────┘   └──────┬───────┘   └──────────────┘   └──────────────┘
//!                       │ screen()
//!                       ▼
//!                  render::*  ──► stdout
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

mod cli;
mod render;

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use emporium_client::auth::{self, SessionUser};
use emporium_client::{ApiClient, ClientConfig};
use emporium_core::ApiResult;
use emporium_state::views::{
    AuditLogView, CategoryListView, Confirm, CustomerListView, DeleteOutcome, ProductListView,
    SystemDashboard,
};
use emporium_state::{CategoryStore, CustomerStore, ProductStore, SystemStore};

use cli::{
    AuditLogArgs, CategoryArgs, Cli, Command, ConfigCommand, CustomerArgs, DeleteArgs,
    DeleteTarget, ProductArgs, SessionCommand,
};

// =============================================================================
// Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut config = ClientConfig::load_or_default(cli.config.clone());
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    if let Command::Config(command) = &cli.command {
        return run_config(command, &config, cli.config.clone());
    }

    let client = ApiClient::from_config(&config).context("Failed to build API client")?;
    info!(base_url = %config.base_url(), "Emporium console starting");

    let page_size = config.lists.default_page_size;
    let server_page_size = u32::try_from(page_size).unwrap_or(u32::MAX);

    match cli.command {
        Command::Categories(args) => run_categories(client, args, page_size).await,
        Command::Customers(args) => run_customers(client, args, page_size).await,
        Command::Products(args) => run_products(client, args, server_page_size).await,
        Command::AuditLog(args) => run_audit_log(client, args, server_page_size).await,
        Command::Dashboard => run_dashboard(client).await,
        Command::Delete(args) => run_delete(client, args, page_size).await,
        Command::Session(command) => run_session(&client, command),
        Command::Config(_) => Ok(()),
    }
}

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,emporium=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Turns a failed result into a command error.
fn ensure<T>(result: &ApiResult<T>, what: &str) -> anyhow::Result<()> {
    if result.success {
        return Ok(());
    }
    let reason = result.message().unwrap_or("request failed");
    error!(what, reason, "Command failed");
    bail!("{}: {}", what, reason)
}

// =============================================================================
// Screens
// =============================================================================

async fn run_categories(
    client: ApiClient,
    args: CategoryArgs,
    page_size: usize,
) -> anyhow::Result<()> {
    let mut view = CategoryListView::new(CategoryStore::new(client), page_size);
    ensure(&view.load().await, "categories")?;

    if let Some(search) = args.search {
        view.set_search(search);
    }
    view.set_status(args.status.into());
    if let Some(sort) = args.sort {
        view.sort_by(sort.into());
        if args.desc {
            view.sort_by(sort.into());
        }
    }
    view.set_page(args.page);
    for id in args.expand {
        if !view.is_expanded(id) {
            view.toggle_expanded(id);
        }
    }

    print!("{}", render::categories(&view.screen()));
    Ok(())
}

async fn run_customers(
    client: ApiClient,
    args: CustomerArgs,
    page_size: usize,
) -> anyhow::Result<()> {
    let mut view = CustomerListView::new(CustomerStore::new(client), page_size);
    ensure(&view.load().await, "customers")?;

    if let Some(search) = args.search {
        view.set_search(search);
    }
    view.set_status(args.status.into());
    if let Some(sort) = args.sort {
        view.sort_by(sort.into());
        if args.desc {
            view.sort_by(sort.into());
        }
    }
    view.set_page(args.page);

    print!("{}", render::customers(&view.screen()));
    Ok(())
}

async fn run_products(client: ApiClient, args: ProductArgs, page_size: u32) -> anyhow::Result<()> {
    let mut view = ProductListView::new(ProductStore::new(client), page_size);
    let search = args
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let result = view
        .query(
            |f| {
                f.search = search;
                f.category_id = args.category;
                f.subcategory_id = args.subcategory;
                f.status = args.status.map(Into::into);
                f.sort_by = args.sort.map(Into::into);
            },
            args.page,
        )
        .await;
    ensure(&result, "products")?;

    print!("{}", render::products(&view.screen()));
    Ok(())
}

async fn run_audit_log(
    client: ApiClient,
    args: AuditLogArgs,
    page_size: u32,
) -> anyhow::Result<()> {
    let mut view = AuditLogView::new(SystemStore::new(client), page_size);
    let (from, to) = match (args.from, args.to) {
        (Some(from), Some(to)) if from > to => (Some(to), Some(from)),
        range => range,
    };

    let result = view
        .query(
            |f| {
                f.admin_id = args.admin;
                f.action = args.action;
                f.resource_type = args.resource_type;
                f.start_date = from;
                f.end_date = to;
            },
            args.page,
        )
        .await;
    ensure(&result, "audit log")?;

    print!("{}", render::audit_log(&view.screen()));
    Ok(())
}

async fn run_dashboard(client: ApiClient) -> anyhow::Result<()> {
    let dashboard = SystemDashboard::new(SystemStore::new(client));
    let load = dashboard.load().await;
    if !load.all_succeeded() {
        warn!("Dashboard loaded with missing sections");
    }

    print!("{}", render::dashboard(&dashboard.summary()));
    ensure(&load.health, "system health")
}

// =============================================================================
// Actions
// =============================================================================

/// Asks on the terminal unless `--yes` was given.
struct TerminalConfirm {
    assume_yes: bool,
}

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("{}", message);
    }
}

async fn run_delete(client: ApiClient, args: DeleteArgs, page_size: usize) -> anyhow::Result<()> {
    let confirm = TerminalConfirm {
        assume_yes: args.yes,
    };

    // Lists are loaded first so the prompt can name the record
    let outcome = match args.target {
        DeleteTarget::Category { id } => {
            let view = CategoryListView::new(CategoryStore::new(client), page_size);
            ensure(&view.load().await, "categories")?;
            view.delete(id, &confirm).await
        }
        DeleteTarget::Customer { id } => {
            let view = CustomerListView::new(CustomerStore::new(client), page_size);
            ensure(&view.load().await, "customers")?;
            view.delete(id, &confirm).await
        }
        DeleteTarget::Product { id } => {
            let view = ProductListView::new(ProductStore::new(client), 1);
            view.delete(id, &confirm).await
        }
    };

    match outcome {
        DeleteOutcome::Deleted => {
            println!("Deleted.");
            Ok(())
        }
        DeleteOutcome::Cancelled => {
            println!("Cancelled.");
            Ok(())
        }
        DeleteOutcome::Failed(message) => bail!("delete failed: {}", message),
        DeleteOutcome::AlreadyInFlight => bail!("a delete for this record is already running"),
    }
}

// =============================================================================
// Session & Config
// =============================================================================

fn run_session(client: &ApiClient, command: SessionCommand) -> anyhow::Result<()> {
    let store = client.session();
    match command {
        SessionCommand::Show => {
            if !auth::is_authenticated(store) {
                println!("Not signed in.");
                return Ok(());
            }
            match auth::current_user(store) {
                Some(user) => {
                    println!("User:  {}", user.username);
                    if let Some(email) = &user.email {
                        println!("Email: {}", email);
                    }
                    println!("Roles: {}", user.roles.join(", "));
                    println!("Admin: {}", auth::is_admin(store));
                }
                None => println!("Signed in (no stored profile)."),
            }
        }
        SessionCommand::Seed {
            token,
            username,
            email,
            roles,
        } => {
            let user = SessionUser {
                id: None,
                username,
                email,
                roles,
            };
            auth::seed_debug_session(store, &token, &user).context("Failed to store session")?;
            println!("Session stored for {}.", user.username);
        }
        SessionCommand::Clear => {
            auth::clear_session(store).context("Failed to clear session")?;
            println!("Session cleared.");
        }
    }
    Ok(())
}

fn run_config(
    command: &ConfigCommand,
    config: &ClientConfig,
    path: Option<std::path::PathBuf>,
) -> anyhow::Result<()> {
    match command {
        ConfigCommand::Show => {
            config.validate().context("Configuration is invalid")?;
            println!("API base URL:      {}", config.base_url());
            match config.request_timeout() {
                Some(timeout) => println!("Request timeout:   {}s", timeout.as_secs()),
                None => println!("Request timeout:   none"),
            }
            match config.session_path() {
                Some(session) => println!("Session file:      {}", session.display()),
                None => println!("Session file:      (in memory)"),
            }
            println!("Default page size: {}", config.lists.default_page_size);
        }
        ConfigCommand::Init => {
            config.save(path).context("Failed to write configuration")?;
            println!("Configuration written.");
        }
    }
    Ok(())
}
