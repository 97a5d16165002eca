//! Pocket Cart CLI - drive a persisted cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! pocket-cart show
//!
//! # Add one unit of product 3
//! pocket-cart add 3
//!
//! # Set product 3 to five units
//! pocket-cart set 3 5
//!
//! # Step a quantity up or down
//! pocket-cart inc 3
//! pocket-cart dec 3
//!
//! # Remove product 3
//! pocket-cart remove 3
//! ```
//!
//! Configuration comes from the environment; see `pocket_cart::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use pocket_cart::{CartConfig, CartStore, CatalogClient, FileStorage, telemetry};
use pocket_cart_core::ProductId;

mod commands;

#[derive(Parser)]
#[command(name = "pocket-cart")]
#[command(author, version, about = "Pocket Cart shopping cart")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the cart with line subtotals and total
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Set the quantity of a product already in the cart
    Set {
        /// Product ID
        product_id: ProductId,

        /// New quantity (zero or less leaves the cart unchanged)
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Raise a product's quantity by one
    Inc {
        /// Product ID
        product_id: ProductId,
    },
    /// Lower a product's quantity by one
    Dec {
        /// Product ID
        product_id: ProductId,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CartConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // No subscriber yet, so this is the only way to surface it
            report(&format!("Failed to load configuration: {e}"));
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let sentry_guard = telemetry::init_sentry(&config);
    telemetry::init_tracing(&config);

    let catalog = CatalogClient::new(&config.catalog);
    let storage = FileStorage::new(&config.data_dir);
    let store = CartStore::open(catalog, storage).await;

    let result = commands::run(&store, cli.command).await;

    match result {
        Ok(output) => emit(&output),
        Err(e) => {
            report(e.user_message());
            // exit() skips destructors; flush Sentry first
            drop(sentry_guard);
            std::process::exit(1);
        }
    }
}

#[allow(clippy::print_stdout)]
fn emit(output: &str) {
    print!("{output}");
}

#[allow(clippy::print_stderr)]
fn report(message: &str) {
    eprintln!("{message}");
}
