//! Vastrakala CLI - shop the storefront from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (identity is remembered in $VASTRAKALA_STATE_DIR)
//! vk login -e meera@example.in -n "Meera Iyer" --google-id 1093...
//!
//! # Browse and fill the cart
//! vk products list --category sarees --sort price-asc
//! vk cart add <product-id> --size M --color Teal
//!
//! # Pay
//! vk checkout --name "Meera Iyer" --phone 98... --street "12 MG Road" --city Pune --pincode 411001
//!
//! # Follow the order
//! vk orders show <order-id>
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` / `whoami` - Session identity
//! - `products` - Catalog pass-through
//! - `cart` - Show and edit the cart
//! - `wishlist` - Show and toggle favorites (signed-in only)
//! - `checkout` - Place and pay for an order
//! - `orders` - Order history and tracking
//! - `admin` - Order status updates

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vastrakala_storefront::config::SentryConfig;
use vastrakala_storefront::{AppState, StorefrontConfig};

mod commands;
mod error;
mod render;

use commands::{
    AddressArgs, AdminAction, CartAction, LoginArgs, OrdersAction, ProductsAction, WishlistAction,
};
use error::CliError;

#[derive(Parser)]
#[command(name = "vk")]
#[command(author, version, about = "Vastrakala storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with an identity-provider account
    Login(LoginArgs),
    /// Sign out and return to the guest cart
    Logout,
    /// Show the current identity
    Whoami,
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Show or edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Show or edit the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Place and pay for an order with the current cart
    Checkout(AddressArgs),
    /// Order history and tracking
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Order fulfilment tools
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &SentryConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config.environment.clone().map(std::borrow::Cow::Owned),
            sample_rate: config.sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set.
    // Logs go to stderr so command output stays clean.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vastrakala_storefront=info,vastrakala_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config.sentry);
    init_tracing();

    match run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), CliError> {
    let state = AppState::new(config)?;
    if let Err(e) = state.bootstrap().await {
        tracing::warn!(error = %e, "Could not load session data");
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Login(args) => commands::session::login(&state, &mut out, args).await?,
        Commands::Logout => commands::session::logout(&state, &mut out).await?,
        Commands::Whoami => commands::session::whoami(&state, &mut out)?,
        Commands::Products { action } => commands::catalog::run(&state, &mut out, action).await?,
        Commands::Cart { action } => commands::cart::run(&state, &mut out, action).await?,
        Commands::Wishlist { action } => commands::wishlist::run(&state, &mut out, action).await?,
        Commands::Checkout(address) => commands::checkout::run(&state, &mut out, address).await?,
        Commands::Orders { action } => commands::orders::run(&state, &mut out, action).await?,
        Commands::Admin { action } => commands::admin::run(&state, &mut out, action).await?,
    }

    out.flush()?;
    Ok(())
}
