//! Shopfront CLI - browse the catalog and manage carts from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Pick a user and browse
//! shopfront users
//! shopfront login 2
//! shopfront browse --search bucket --sort price --desc
//!
//! # Cart
//! shopfront cart add mock-12
//! shopfront cart set mock-12 3
//! shopfront cart show
//! shopfront order
//! ```
//!
//! # Commands
//!
//! - `users`, `login`, `logout`, `whoami` - Roster sign-in
//! - `browse` - Search, filter, sort and page through the catalog
//! - `show` - Product details
//! - `cart` - Inspect and edit the signed-in user's cart
//! - `order` - Place an order for the current cart
//! - `theme` - Show or set the persisted theme preference
//!
//! State persists to `STOREFRONT_DATA_PATH` between runs.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand, ValueEnum};
use shopfront_core::{ProductId, SortField, UserId};
use shopfront_storefront::config::StorefrontConfig;
use shopfront_storefront::error::Result;
use shopfront_storefront::state::AppState;
use tracing_subscriber::EnvFilter;

mod commands;

const DEFAULT_LOG_FILTER: &str = "shopfront_storefront=info,shopfront_cli=info";

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Shopfront terminal storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the users you can sign in as
    Users,
    /// Sign in as a roster user
    Login {
        /// User id from `shopfront users`
        id: i32,
    },
    /// Sign out (carts are kept)
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Browse the catalog
    Browse(BrowseArgs),
    /// Show product details
    Show {
        /// Product id
        product_id: String,
    },
    /// Manage the signed-in user's cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for the current cart
    Order,
    /// Show or set the theme preference
    Theme {
        /// New theme; omit to show the current one
        mode: Option<ThemeMode>,
    },
}

/// Options for `browse`. Unset options keep their persisted values.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Search product names and brands (empty string clears)
    #[arg(short, long)]
    search: Option<String>,

    /// Exact category filter (empty string clears)
    #[arg(short, long)]
    category: Option<String>,

    /// Sort by `name`, `category`, `brand`, `price`, `stock` or `rating`
    #[arg(long)]
    sort: Option<SortField>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    desc: bool,

    /// Remove the sort
    #[arg(long, conflicts_with = "sort")]
    unsorted: bool,

    /// Page number, starting at 1
    #[arg(short, long)]
    page: Option<u32>,

    /// Products per page
    #[arg(long)]
    page_size: Option<u32>,

    /// Reset search, filter, sort and paging before applying other options
    #[arg(long)]
    reset: bool,
}

#[derive(Subcommand)]
enum CartAction {
    /// List cart lines and totals
    Show,
    /// Add one unit of a product
    Add {
        /// Product id
        product_id: String,
    },
    /// Set a line's quantity (0 or less removes it)
    Set {
        /// Product id
        product_id: String,
        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove {
        /// Product id
        product_id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeMode {
    Dark,
    Light,
}

#[tokio::main]
async fn main() {
    // Load .env before the filter reads RUST_LOG
    let _ = dotenvy::dotenv();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = StorefrontConfig::from_env()?;
    let state = AppState::new(config)?;

    match cli.command {
        Commands::Users => commands::user::list(&state),
        Commands::Login { id } => commands::user::login(&state, UserId::new(id))?,
        Commands::Logout => commands::user::logout(&state),
        Commands::Whoami => commands::user::whoami(&state),
        Commands::Browse(args) => commands::browse::browse(&state, args.into()).await,
        Commands::Show { product_id } => {
            commands::browse::show(&state, &ProductId::new(product_id)).await?;
        }
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state),
            CartAction::Add { product_id } => {
                commands::cart::add(&state, &ProductId::new(product_id)).await?;
            }
            CartAction::Set {
                product_id,
                quantity,
            } => commands::cart::set(&state, &ProductId::new(product_id), quantity)?,
            CartAction::Remove { product_id } => {
                commands::cart::remove(&state, &ProductId::new(product_id))?;
            }
        },
        Commands::Order => commands::cart::order(&state),
        Commands::Theme { mode } => {
            commands::theme::theme(&state, mode.map(|mode| matches!(mode, ThemeMode::Dark)));
        }
    }
    Ok(())
}

impl From<BrowseArgs> for commands::browse::BrowseOptions {
    fn from(args: BrowseArgs) -> Self {
        let sort = if args.unsorted {
            Some(None)
        } else {
            args.sort.map(|field| Some((field, args.desc)))
        };

        Self {
            reset: args.reset,
            search: args.search,
            category: args.category,
            sort,
            page: args.page,
            page_size: args.page_size,
        }
    }
}
