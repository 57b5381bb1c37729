//! Poom Store - terminal storefront.
//!
//! # Usage
//!
//! ```bash
//! # List products, optionally filtered
//! poom products --search mouse --category "Gaming Gear"
//!
//! # Put products in a cart and check out in one go
//! poom order 1 4 4
//!
//! # Interactive shopping session
//! poom shop
//! ```
//!
//! Configuration comes from the environment (see [`StorefrontConfig`]);
//! `--api-url` and `--user-id` override it.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use poom_store_core::{ProductId, UserId};
use poom_store_storefront::catalog::CategoryFilter;
use poom_store_storefront::checkout::CheckoutOutcome;
use poom_store_storefront::{Storefront, StorefrontConfig, StorefrontError, render, shell};
use sentry::integrations::tracing::{self as sentry_tracing, EventFilter};
use tokio::io::BufReader;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "poom")]
#[command(author, version, about = "Poom Store: browse the catalog and place orders")]
struct Cli {
    /// Base URL of the store API (overrides `STOREFRONT_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// User ID to place orders as (overrides `STOREFRONT_USER_ID`)
    #[arg(long, global = true)]
    user_id: Option<UserId>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products in the catalog
    Products {
        /// Only show products whose name contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Only show products in this category (`all` for every category)
        #[arg(short, long)]
        category: Option<CategoryFilter>,
    },
    /// Add products to a cart and check out
    Order {
        /// Product IDs to add, one unit per occurrence
        #[arg(required = true)]
        product_ids: Vec<ProductId>,
    },
    /// Start an interactive shopping session
    Shop,
}

/// Start Sentry when a DSN is configured.
///
/// Every event is tagged with the API base URL and attributed to the
/// configured shopper. The returned guard flushes pending events on drop.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_deref()?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config.sentry_environment.clone().map(Into::into),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    sentry::configure_scope(|scope| {
        scope.set_tag("api_url", config.api_url.as_str());
        scope.set_user(Some(sentry::User {
            id: Some(config.user_id.to_string()),
            ..Default::default()
        }));
    });

    Some(guard)
}

/// Failed fetches and orders are logged at ERROR and become Sentry events;
/// routine progress only leaves breadcrumbs behind them.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> EventFilter {
    match *metadata.level() {
        Level::ERROR | Level::WARN => EventFilter::Event,
        Level::TRACE => EventFilter::Ignore,
        _ => EventFilter::Breadcrumb,
    }
}

fn load_config(cli: &Cli) -> Result<StorefrontConfig, StorefrontError> {
    let mut config = StorefrontConfig::from_env()?;
    if let Some(api_url) = &cli.api_url {
        config = config.with_api_url(api_url)?;
    }
    if let Some(user_id) = cli.user_id {
        config.user_id = user_id;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            let _ = writeln!(io::stderr(), "{e}");
            return ExitCode::FAILURE;
        }
    };

    // Sentry goes first so the tracing layer below has a client to report to
    let sentry_guard = init_sentry(&config);

    // Logs go to stderr so they never interleave with rendered output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "poom_store_storefront=info,poom=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    tracing::debug!(
        api_url = %config.api_url,
        user_id = %config.user_id,
        sentry = sentry_guard.is_some(),
        "Configuration loaded"
    );

    match run(cli.command, &config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: &StorefrontConfig) -> Result<ExitCode, StorefrontError> {
    let mut storefront = Storefront::from_config(config);
    let mut out = io::stdout();

    match command {
        Commands::Products { search, category } => {
            let source = storefront.load_catalog().await;
            if let Some(search) = search {
                storefront.set_search_query(search);
            }
            if let Some(category) = category {
                storefront.select_category(category);
            }
            render::write_catalog(&mut out, &storefront)?;
            render::write_catalog_source(&mut out, source)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Order { product_ids } => order(&mut storefront, &product_ids, &mut out).await,
        Commands::Shop => {
            let stdin = BufReader::new(tokio::io::stdin());
            shell::run(&mut storefront, stdin, &mut out).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn order(
    storefront: &mut Storefront,
    product_ids: &[ProductId],
    out: &mut impl Write,
) -> Result<ExitCode, StorefrontError> {
    let source = storefront.load_catalog().await;
    render::write_catalog_source(out, source)?;

    for &id in product_ids {
        if !storefront.add_to_cart(id) {
            writeln!(out, "No product with ID {id}; skipping.")?;
        }
    }

    render::write_cart(out, storefront.cart())?;

    match storefront.checkout().await {
        Ok(outcome) => {
            render::write_checkout_outcome(out, &outcome)?;
            Ok(match outcome {
                CheckoutOutcome::Placed { .. } => ExitCode::SUCCESS,
                CheckoutOutcome::Failed(_) => ExitCode::FAILURE,
            })
        }
        Err(refused) => {
            render::write_checkout_refused(out, refused)?;
            Ok(ExitCode::FAILURE)
        }
    }
}
