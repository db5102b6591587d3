//! # Cart Commands
//!
//! Cart Mutation API over the cart file.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────┐  cart add   ┌──────────┐  checkout  ┌──────────────┐       │
//! │  │  Empty   │────────────►│ In Cart  │───────────►│ OrderSummary │       │
//! │  │  Cart    │             │          │            └──────┬───────┘       │
//! │  └──────────┘             └──────────┘                   │               │
//! │       ▲                   cart update                    │               │
//! │       │                   cart remove                    │               │
//! │       └───────────────── cart clear ◄────────────────────┘               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Quantities of zero or less passed to `update` remove the line, the same
//! as the storefront's quantity stepper.

use clap::{Args, Subcommand};
use tracing::debug;
use vitrina_core::validation::{validate_price, validate_product_id};
use vitrina_core::{Cart, CoreError, Money, Product, Storefront};

use super::{CartFileArgs, Output};
use crate::config::AppConfig;
use crate::error::CliResult;
use crate::storage;

#[derive(Debug, Args)]
pub struct CartCommand {
    #[command(flatten)]
    pub cart: CartFileArgs,

    #[command(subcommand)]
    pub command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum CartSubcommand {
    /// Add units of a product (accumulates onto an existing line)
    Add(AddArgs),
    /// Set a line's quantity; zero or less removes it
    Update(UpdateArgs),
    /// Remove a line
    Remove(RemoveArgs),
    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Product id
    #[arg(long)]
    pub product_id: String,

    /// Display name
    #[arg(long, default_value = "")]
    pub name: String,

    /// Tax-inclusive unit price
    #[arg(long)]
    pub price: Money,

    /// Units to add
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub quantity: i64,

    /// Packaging tag, repeatable
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    #[arg(long)]
    pub product_id: String,

    #[arg(long, allow_negative_numbers = true)]
    pub quantity: i64,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    #[arg(long)]
    pub product_id: String,
}

/// Applies one mutation and writes the cart back.
pub async fn execute(command: CartCommand, config: &AppConfig, output: Output) -> CliResult<String> {
    let path = command.cart.path;
    let cart = storage::load_cart(&path).await?;
    let mut store = Storefront::new(config.policy()).with_cart(cart);

    match command.command {
        CartSubcommand::Add(args) => {
            validate_product_id(&args.product_id).map_err(CoreError::from)?;
            validate_price(args.price).map_err(CoreError::from)?;

            let product = args
                .tags
                .into_iter()
                .fold(Product::new(args.product_id, args.name, args.price), |p, tag| {
                    p.with_packaging_tag(tag)
                });
            store.add_line(&product, args.quantity);
        }
        CartSubcommand::Update(args) => store.update_quantity(&args.product_id, args.quantity),
        CartSubcommand::Remove(args) => store.remove_line(&args.product_id),
        CartSubcommand::Clear => store.clear_cart(),
    }

    storage::save_cart(&path, store.cart()).await?;
    debug!(path = %path.display(), lines = store.cart().line_count(), "Cart updated");

    match output {
        Output::Json => Ok(serde_json::to_string_pretty(store.cart())?),
        Output::Table => Ok(describe(store.cart(), config)),
    }
}

fn describe(cart: &Cart, config: &AppConfig) -> String {
    if cart.is_empty() {
        return "Cart is empty.\n".to_string();
    }

    let mut out = String::new();
    for line in cart.lines() {
        out.push_str(&format!(
            "  {:<16} x{:<5} {}\n",
            line.product_id,
            line.quantity,
            config.format_currency(line.gross())
        ));
    }
    out.push_str(&format!(
        "{} lines, {} items\n",
        cart.line_count(),
        cart.total_quantity()
    ));
    out
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::path::PathBuf;

    pub(crate) async fn write_fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "vitrina-cli-{}-{}.json",
            name,
            std::process::id()
        ));
        tokio::fs::write(&path, contents).await.unwrap();
        path
    }

    fn add(path: &PathBuf, product_id: &str, price: i64, quantity: i64) -> CartCommand {
        CartCommand {
            cart: CartFileArgs { path: path.clone() },
            command: CartSubcommand::Add(AddArgs {
                product_id: product_id.to_string(),
                name: String::new(),
                price: Money::from_major(price),
                quantity,
                tags: vec![],
            }),
        }
    }

    #[tokio::test]
    async fn test_add_update_remove_cycle() {
        let path = write_fixture("cart-cycle", "").await;
        let config = AppConfig::default();

        execute(add(&path, "A", 100, 2), &config, Output::Table).await.unwrap();
        execute(add(&path, "A", 100, 3), &config, Output::Table).await.unwrap();
        let cart = storage::load_cart(&path).await.unwrap();
        assert_eq!(cart.line("A").map(|l| l.quantity), Some(5));

        let update = CartCommand {
            cart: CartFileArgs { path: path.clone() },
            command: CartSubcommand::Update(UpdateArgs {
                product_id: "A".into(),
                quantity: 0,
            }),
        };
        let out = execute(update, &config, Output::Table).await.unwrap();
        assert_eq!(out, "Cart is empty.\n");

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_add_rejects_negative_price() {
        let path = write_fixture("cart-negative", "").await;

        let err = execute(add(&path, "A", -5, 1), &AppConfig::default(), Output::Table)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_add_with_tags_serializes_tags() {
        let path = write_fixture("cart-tags", "").await;
        let mut command = add(&path, "B", 50, 1);
        if let CartSubcommand::Add(args) = &mut command.command {
            args.tags = vec!["master".into()];
        }

        let out = execute(command, &AppConfig::default(), Output::Json).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["lines"][0]["packagingTags"][0], "master");

        let _ = tokio::fs::remove_file(&path).await;
    }
}
