//! Command-line arguments.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use emporium_core::listing::{CategorySortKey, CustomerSortKey, StatusFilter};
use emporium_core::{EntityId, ProductSort, ProductStatus};

#[derive(Debug, Parser)]
#[command(name = "emporium", author, version, about = "Terminal admin console for the Emporium store backend")]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Overrides the API base URL from config and environment
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List categories with their subcategories
    Categories(CategoryArgs),
    /// List customers
    Customers(CustomerArgs),
    /// List products (filtered by the server)
    Products(ProductArgs),
    /// Browse the administrator audit trail
    AuditLog(AuditLogArgs),
    /// System health and notification delivery summary
    Dashboard,
    /// Delete a record after confirmation
    Delete(DeleteArgs),
    /// Inspect or seed the local admin session
    #[command(subcommand)]
    Session(SessionCommand),
    /// Show or write the client configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

// =============================================================================
// Screens
// =============================================================================

#[derive(Debug, Args)]
pub struct CategoryArgs {
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long, value_enum, default_value_t = StatusArg::All)]
    pub status: StatusArg,

    #[arg(long, value_enum)]
    pub sort: Option<CategorySortArg>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Show subcategories of this category (repeatable)
    #[arg(long)]
    pub expand: Vec<EntityId>,
}

#[derive(Debug, Args)]
pub struct CustomerArgs {
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long, value_enum, default_value_t = StatusArg::All)]
    pub status: StatusArg,

    #[arg(long, value_enum)]
    pub sort: Option<CustomerSortArg>,

    #[arg(long)]
    pub desc: bool,

    #[arg(long, default_value_t = 1)]
    pub page: usize,
}

#[derive(Debug, Args)]
pub struct ProductArgs {
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long)]
    pub category: Option<EntityId>,

    #[arg(long)]
    pub subcategory: Option<EntityId>,

    #[arg(long, value_enum)]
    pub status: Option<ProductStatusArg>,

    #[arg(long, value_enum)]
    pub sort: Option<ProductSortArg>,

    #[arg(long, default_value_t = 1)]
    pub page: u32,
}

#[derive(Debug, Args)]
pub struct AuditLogArgs {
    #[arg(long)]
    pub admin: Option<EntityId>,

    #[arg(long)]
    pub action: Option<String>,

    #[arg(long)]
    pub resource_type: Option<String>,

    /// First day, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    #[arg(long, default_value_t = 1)]
    pub page: u32,
}

// =============================================================================
// Actions
// =============================================================================

#[derive(Debug, Args)]
pub struct DeleteArgs {
    #[command(subcommand)]
    pub target: DeleteTarget,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

#[derive(Debug, Subcommand)]
pub enum DeleteTarget {
    Category { id: EntityId },
    Customer { id: EntityId },
    Product { id: EntityId },
}

#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Print the stored administrator profile
    Show,
    /// Store a token and profile without going through login
    Seed {
        #[arg(long)]
        token: String,

        #[arg(long)]
        username: String,

        #[arg(long)]
        email: Option<String>,

        /// Role granted to the profile (repeatable)
        #[arg(long = "role")]
        roles: Vec<String>,
    },
    /// Remove the stored token and profile
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Write the effective configuration to the config file
    Init,
}

// =============================================================================
// Value Enums
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    All,
    Active,
    Inactive,
}

impl From<StatusArg> for StatusFilter {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::All => StatusFilter::All,
            StatusArg::Active => StatusFilter::Active,
            StatusArg::Inactive => StatusFilter::Inactive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategorySortArg {
    Name,
    Created,
    Status,
}

impl From<CategorySortArg> for CategorySortKey {
    fn from(arg: CategorySortArg) -> Self {
        match arg {
            CategorySortArg::Name => CategorySortKey::Name,
            CategorySortArg::Created => CategorySortKey::CreatedAt,
            CategorySortArg::Status => CategorySortKey::Status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CustomerSortArg {
    Name,
    Email,
    Orders,
    Spent,
    Created,
}

impl From<CustomerSortArg> for CustomerSortKey {
    fn from(arg: CustomerSortArg) -> Self {
        match arg {
            CustomerSortArg::Name => CustomerSortKey::Name,
            CustomerSortArg::Email => CustomerSortKey::Email,
            CustomerSortArg::Orders => CustomerSortKey::TotalOrders,
            CustomerSortArg::Spent => CustomerSortKey::TotalSpent,
            CustomerSortArg::Created => CustomerSortKey::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProductStatusArg {
    Active,
    Inactive,
    Draft,
    OutOfStock,
}

impl From<ProductStatusArg> for ProductStatus {
    fn from(arg: ProductStatusArg) -> Self {
        match arg {
            ProductStatusArg::Active => ProductStatus::Active,
            ProductStatusArg::Inactive => ProductStatus::Inactive,
            ProductStatusArg::Draft => ProductStatus::Draft,
            ProductStatusArg::OutOfStock => ProductStatus::OutOfStock,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProductSortArg {
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

impl From<ProductSortArg> for ProductSort {
    fn from(arg: ProductSortArg) -> Self {
        match arg {
            ProductSortArg::Newest => ProductSort::Newest,
            ProductSortArg::Oldest => ProductSort::Oldest,
            ProductSortArg::PriceAsc => ProductSort::PriceAsc,
            ProductSortArg::PriceDesc => ProductSort::PriceDesc,
            ProductSortArg::NameAsc => ProductSort::NameAsc,
            ProductSortArg::NameDesc => ProductSort::NameDesc,
        }
    }
}
