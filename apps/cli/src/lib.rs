//! # Vitrina CLI Library
//!
//! The `vitrina` binary: a storefront client (browse, cart, checkout) and a
//! store admin client (products, sales, exchanges, users, payments) for the
//! Vitrina multi-tenant backend.
//!
//! ## Module Organization
//! ```text
//! vitrina_cli/
//! ├── lib.rs          ◄─── You are here (startup & dispatch)
//! ├── cli.rs          ◄─── clap argument definitions
//! ├── state/
//! │   ├── mod.rs      ◄─── AppContext
//! │   ├── db.rs       ◄─── Local storage + stored credentials
//! │   ├── cart.rs     ◄─── Cart state
//! │   └── config.rs   ◄─── Config + store selection
//! ├── commands/       ◄─── One module per command group
//! ├── render.rs       ◄─── Text / JSON output
//! └── error.rs        ◄─── CliError { code, message }
//! ```
//!
//! ## Invocation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       One Invocation                                    │
//! │                                                                         │
//! │  1. Parse arguments (clap)                                              │
//! │  2. Initialize logging (stderr, RUST_LOG or --verbose)                  │
//! │  3. Load config: defaults → vitrina.toml → environment                  │
//! │  4. Open local storage, load cart + store override, build ApiClient     │
//! │  5. Run the command, print the result (text or --json)                  │
//! │  6. On error: print { code, message }, exit status 1                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod render;
pub mod state;

use tracing::debug;
use tracing_subscriber::EnvFilter;
use vitrina_api::services::{DateRange, SaleQuery};
use vitrina_api::VitrinaConfig;
use vitrina_core::CheckoutForm;

use cli::{
    CartAction, CatalogAction, CheckoutAction, Cli, Command, ConfigAction, ExchangesAction,
    PaymentsAction, ProductsAction, SalesAction, UsersAction,
};
use commands::payments::PaymentUpdate;
use commands::products::ListArgs;
use error::CliResult;
use render::Output;
use state::AppContext;

/// Logs go to stderr so `--json` output stays parseable.
///
/// `RUST_LOG` wins; otherwise only warnings, or debug for Vitrina crates
/// with `--verbose`.
pub fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,vitrina=debug,sqlx=warn"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .init();
}

/// Runs one parsed command line.
pub async fn run(cli: Cli) -> CliResult<()> {
    let output = Output::new(cli.json);
    let config = VitrinaConfig::load(cli.config.clone())?;
    let ctx = AppContext::open(config, cli.store.clone()).await?;
    debug!(command = ?cli.command, "Dispatching");

    dispatch(&ctx, &output, cli).await
}

async fn dispatch(ctx: &AppContext, out: &Output, cli: Cli) -> CliResult<()> {
    use commands::*;

    match cli.command {
        Command::Login { email, password } => out.emit(&auth::login(ctx, &email, &password).await?),
        Command::Logout => out.emit(&auth::logout(ctx).await?),
        Command::Whoami => out.emit(&auth::whoami(ctx).await?),
        Command::Store => out.emit(&store::info(ctx).await?),

        Command::Products { action } => match action {
            ProductsAction::List(f) => {
                let args = ListArgs {
                    search: f.search,
                    category: f.category,
                    brand: f.brand,
                    gender: f.gender,
                    product_type: f.product_type,
                    page: f.page,
                    limit: f.limit,
                    admin: f.admin,
                };
                out.emit(&products::list(ctx, &args).await?)
            }
            ProductsAction::Show { id, admin } => out.emit(&products::show(ctx, &id, admin).await?),
            ProductsAction::Stock { id, sizes } => out.emit(&products::set_stock(ctx, &id, &sizes).await?),
            ProductsAction::Delete { id } => out.emit(&products::delete(ctx, &id).await?),
        },

        Command::Cart { action } => match action {
            CartAction::Show => out.emit(&cart::show(ctx).await?),
            CartAction::Add {
                product,
                size,
                quantity,
            } => out.emit(&cart::add(ctx, &product, &size, quantity).await?),
            CartAction::Update {
                product,
                size,
                quantity,
            } => out.emit(&cart::update(ctx, &product, &size, quantity).await?),
            CartAction::Remove { product, size } => out.emit(&cart::remove(ctx, &product, &size).await?),
            CartAction::Clear => out.emit(&cart::clear(ctx).await?),
        },

        Command::Checkout { action } => match action {
            CheckoutAction::Submit {
                name,
                phone,
                email,
                address,
                notes,
            } => {
                let form = CheckoutForm {
                    name,
                    phone,
                    email,
                    address,
                    notes,
                };
                out.emit(&checkout::submit(ctx, &form).await?)
            }
            CheckoutAction::Pay => out.emit(&checkout::pay(ctx).await?),
            CheckoutAction::Skip => out.emit(&checkout::skip(ctx).await?),
            CheckoutAction::Track => out.emit(&checkout::track(ctx).await?),
        },

        Command::Sales { action } => match action {
            SalesAction::List {
                range,
                payment,
                page,
                limit,
            } => {
                let query = SaleQuery {
                    range: DateRange {
                        from: range.from,
                        to: range.to,
                    },
                    payment_method: payment,
                    page,
                    limit,
                };
                out.emit(&sales::list(ctx, &query).await?)
            }
            SalesAction::Show { id } => out.emit(&sales::show(ctx, &id).await?),
            SalesAction::Register {
                file: Some(path), ..
            } => {
                let view = sales::register_file(ctx, &path).await?;
                out.emit(&view)?;
                match view.failure {
                    Some(failure) => Err(failure.error),
                    None => Ok(()),
                }
            }
            SalesAction::Register {
                items,
                payment,
                customer,
                notes,
                file: None,
            } => out.emit(&sales::register(ctx, &items, payment, customer, notes).await?),
            SalesAction::Delete { id } => out.emit(&sales::delete(ctx, &id).await?),
            SalesAction::Stats { range } => {
                let range = DateRange {
                    from: range.from,
                    to: range.to,
                };
                out.emit(&sales::stats(ctx, range).await?)
            }
        },

        Command::Exchanges { action } => match action {
            ExchangesAction::List => out.emit(&exchanges::list(ctx).await?),
            ExchangesAction::Show { id } => out.emit(&exchanges::show(ctx, &id).await?),
            ExchangesAction::Create {
                sale,
                returns,
                takes,
                payment,
                notes,
            } => out.emit(&exchanges::create(ctx, &sale, &returns, &takes, payment, notes).await?),
        },

        Command::Users { action } => match action {
            UsersAction::List => out.emit(&users::list(ctx).await?),
            UsersAction::Create {
                name,
                email,
                password,
                role,
                permissions,
            } => out.emit(&users::create(ctx, &name, &email, &password, role, &permissions).await?),
            UsersAction::Permissions { id, permissions } => {
                out.emit(&users::set_permissions(ctx, &id, &permissions).await?)
            }
            UsersAction::Delete { id } => out.emit(&users::delete(ctx, &id).await?),
        },

        Command::Catalog { action } => match action {
            CatalogAction::List { kind } => out.emit(&catalog::list(ctx, kind).await?),
            CatalogAction::Create { kind, name } => out.emit(&catalog::create(ctx, kind, &name).await?),
            CatalogAction::Rename { kind, id, name } => {
                out.emit(&catalog::rename(ctx, kind, &id, &name).await?)
            }
            CatalogAction::Delete { kind, id } => out.emit(&catalog::delete(ctx, kind, &id).await?),
        },

        Command::Payments { action } => match action {
            PaymentsAction::Config => out.emit(&payments::show(ctx).await?),
            PaymentsAction::Set {
                public_key,
                access_token,
                enable,
                disable,
            } => {
                let update = PaymentUpdate {
                    public_key,
                    access_token,
                    enabled: match (enable, disable) {
                        (true, _) => Some(true),
                        (_, true) => Some(false),
                        _ => None,
                    },
                };
                out.emit(&payments::set(ctx, update).await?)
            }
            PaymentsAction::Webhook => out.emit(&payments::webhook(ctx).await?),
        },

        Command::Upload { path } => out.emit(&upload::image(ctx, &path).await?),

        Command::Config { action } => match action {
            ConfigAction::Show => out.emit(&config::show(ctx, cli.config).await?),
            ConfigAction::SetSubdomain { subdomain } => {
                out.emit(&config::set_subdomain(ctx, &subdomain).await?)
            }
            ConfigAction::ClearSubdomain => out.emit(&config::clear_subdomain(ctx).await?),
        },
    }
}
