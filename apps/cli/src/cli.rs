//! # Command Line
//!
//! ```text
//! vitrina [--json] [--store <sub>] [--config <file>] [-v] <command>
//!
//!   login | logout | whoami          session
//!   store                            public store info
//!   products  list|show|stock|delete
//!   cart      show|add|update|remove|clear
//!   checkout  submit|pay|skip|track
//!   sales     list|show|register|delete|stats
//!   exchanges list|show|create
//!   users     list|create|permissions|delete
//!   catalog   list|create|rename|delete
//!   payments  config|set|webhook
//!   upload    <image>
//!   config    show|set-subdomain|clear-subdomain
//! ```

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use vitrina_api::services::CatalogKind;
use vitrina_core::{PaymentMethod, UserRole};

use crate::commands::LineSpec;

#[derive(Debug, Parser)]
#[command(name = "vitrina")]
#[command(author, version, about = "Vitrina storefront and store admin client")]
pub struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Storefront subdomain (overrides config and the saved override)
    #[arg(long, global = true, env = "VITRINA_STORE")]
    pub store: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "VITRINA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log requests and storage activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in to the store admin
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "VITRINA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Show the selected store
    Store,
    /// Browse and manage products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place the order for the cart
    Checkout {
        #[command(subcommand)]
        action: CheckoutAction,
    },
    /// Sales bookkeeping
    Sales {
        #[command(subcommand)]
        action: SalesAction,
    },
    /// Exchanges against previous sales
    Exchanges {
        #[command(subcommand)]
        action: ExchangesAction,
    },
    /// Store users and permissions
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },
    /// Categories, brands, sizes, colors, genders and types
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// MercadoPago settings
    Payments {
        #[command(subcommand)]
        action: PaymentsAction,
    },
    /// Upload a product image to Cloudinary
    Upload {
        /// Image file
        path: PathBuf,
    },
    /// Local configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Args)]
pub struct ProductFilters {
    /// Text search on the product name
    #[arg(short, long)]
    pub search: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub brand: Option<String>,

    #[arg(long)]
    pub gender: Option<String>,

    #[arg(long = "type")]
    pub product_type: Option<String>,

    #[arg(long)]
    pub page: Option<u32>,

    #[arg(long)]
    pub limit: Option<u32>,

    /// Use the admin catalog (includes inactive products)
    #[arg(long)]
    pub admin: bool,
}

#[derive(Debug, Subcommand)]
pub enum ProductsAction {
    List(ProductFilters),
    Show {
        id: String,
        #[arg(long)]
        admin: bool,
    },
    /// Replace stock for sizes: `vitrina products stock p1 M=4 L=0`
    Stock {
        id: String,
        #[arg(required = true)]
        sizes: Vec<String>,
    },
    Delete {
        id: String,
    },
}

// =============================================================================
// Cart / Checkout
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum CartAction {
    Show,
    /// Add a product in a size (id or name)
    Add {
        product: String,
        size: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a line
    Update {
        product: String,
        size: String,
        quantity: u32,
    },
    Remove {
        product: String,
        size: String,
    },
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum CheckoutAction {
    /// Send the order
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Get a MercadoPago link for the pending order
    Pay,
    /// Finish without paying online
    Skip,
    /// Status of the last order
    Track,
}

// =============================================================================
// Admin
// =============================================================================

#[derive(Debug, Args)]
pub struct Range {
    /// First day (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Subcommand)]
pub enum SalesAction {
    List {
        #[command(flatten)]
        range: Range,
        #[arg(long)]
        payment: Option<PaymentMethod>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    Show {
        id: String,
    },
    /// Record a sale from `product:size[:quantity]` lines, or a JSON batch
    Register {
        #[arg(long = "item", conflicts_with = "file")]
        items: Vec<LineSpec>,
        #[arg(long, default_value = "cash")]
        payment: PaymentMethod,
        #[arg(long)]
        customer: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// JSON array of sales; stops at the first failure
        #[arg(long)]
        file: Option<PathBuf>,
    },
    Delete {
        id: String,
    },
    Stats {
        #[command(flatten)]
        range: Range,
    },
}

#[derive(Debug, Subcommand)]
pub enum ExchangesAction {
    List,
    Show {
        id: String,
    },
    Create {
        #[arg(long)]
        sale: String,
        /// Returned line, `product:size[:quantity]`
        #[arg(long = "return", required = true)]
        returns: Vec<LineSpec>,
        /// New line taken instead, `product:size[:quantity]`
        #[arg(long = "take")]
        takes: Vec<LineSpec>,
        /// Required when the customer owes a difference
        #[arg(long)]
        payment: Option<PaymentMethod>,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum UsersAction {
    List,
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "VITRINA_NEW_USER_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, default_value = "employee")]
        role: UserRole,
        /// Permission keys, repeated or comma separated
        #[arg(long = "permission")]
        permissions: Vec<String>,
    },
    /// Replace the permissions of a user
    Permissions {
        id: String,
        #[arg(long = "permission")]
        permissions: Vec<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum CatalogAction {
    List {
        kind: CatalogKind,
    },
    Create {
        kind: CatalogKind,
        name: String,
    },
    Rename {
        kind: CatalogKind,
        id: String,
        name: String,
    },
    Delete {
        kind: CatalogKind,
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum PaymentsAction {
    /// Current settings, access token masked
    Config,
    Set {
        #[arg(long)]
        public_key: Option<String>,
        #[arg(long, env = "VITRINA_MP_ACCESS_TOKEN", hide_env_values = true)]
        access_token: Option<String>,
        #[arg(long, conflicts_with = "disable")]
        enable: bool,
        #[arg(long)]
        disable: bool,
    },
    /// Notification URL for the MercadoPago panel
    Webhook,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    Show,
    /// Use this store until cleared (development override)
    SetSubdomain {
        subdomain: String,
    },
    ClearSubdomain,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_sale_lines() {
        let cli = Cli::try_parse_from([
            "vitrina", "--json", "sales", "register", "--item", "p1:M:2", "--item", "p2:s1", "--payment", "debit",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Command::Sales {
                action: SalesAction::Register { items, payment, .. },
            } => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0].quantity, 2);
                assert_eq!(payment, PaymentMethod::Debit);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_line() {
        assert!(Cli::try_parse_from(["vitrina", "sales", "register", "--item", "p1"]).is_err());
    }
}
