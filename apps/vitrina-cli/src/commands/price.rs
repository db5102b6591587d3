//! `vitrina price`: cart breakdown against the live promotions.

use clap::Args;
use tracing::debug;
use vitrina_core::Storefront;
use vitrina_offers::load_promotions;

use super::{CartFileArgs, ClockArgs, OffersArgs, Output};
use crate::config::AppConfig;
use crate::error::CliResult;
use crate::{render, storage};

#[derive(Debug, Args)]
pub struct PriceArgs {
    #[command(flatten)]
    pub cart: CartFileArgs,

    #[command(flatten)]
    pub offers: OffersArgs,

    #[command(flatten)]
    pub clock: ClockArgs,
}

/// Prices the stored cart. A dead promotions service prices undiscounted.
pub async fn execute(args: PriceArgs, config: &AppConfig, output: Output) -> CliResult<String> {
    let cart = storage::load_cart(&args.cart.path).await?;
    let source = args.offers.apply(&config.offers).build_source()?;
    let now = args.clock.now();

    let promotions = load_promotions(source.as_ref(), now).await;
    let store = Storefront::new(config.policy())
        .with_cart(cart)
        .with_promotions(promotions);

    let breakdown = store.breakdown(now);
    debug!(total = %breakdown.total, discount = %breakdown.discount, "Cart priced");

    match output {
        Output::Json => Ok(serde_json::to_string_pretty(&breakdown)?),
        Output::Table => Ok(render::breakdown_table(&breakdown, config)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cart::tests::write_fixture;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_price_with_file_offers() {
        let cart_path = write_fixture(
            "price-cart",
            r#"{ "lines": [ { "productId": "A", "unitPrice": "10000", "quantity": 3 } ] }"#,
        )
        .await;
        let offers_path = write_fixture(
            "price-offers",
            r#"[ { "_id": "spring", "percentage": "10", "isAll": true, "endDate": "2099-12-31", "state": "active" } ]"#,
        )
        .await;

        let args = PriceArgs {
            cart: CartFileArgs { path: cart_path.clone() },
            offers: OffersArgs {
                offers_file: Some(offers_path.clone()),
                offers_url: None,
            },
            clock: ClockArgs::default(),
        };

        let out = execute(args, &AppConfig::default(), Output::Json).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["applied"][0]["promotionId"], "spring");
        assert_eq!(json["itemsInCart"], 3);

        let _ = tokio::fs::remove_file(&cart_path).await;
        let _ = tokio::fs::remove_file(&offers_path).await;
    }

    #[tokio::test]
    async fn test_price_survives_missing_offers_file() {
        let cart_path = write_fixture(
            "price-no-offers",
            r#"[ { "productId": "A", "unitPrice": "119", "quantity": 1 } ]"#,
        )
        .await;

        let args = PriceArgs {
            cart: CartFileArgs { path: cart_path.clone() },
            offers: OffersArgs {
                offers_file: Some(PathBuf::from("/nonexistent/vitrina-offers.json")),
                offers_url: None,
            },
            clock: ClockArgs::default(),
        };

        let out = execute(args, &AppConfig::default(), Output::Table).await.unwrap();
        assert!(out.contains("$119.00"));
        assert!(out.contains("$19.00"));

        let _ = tokio::fs::remove_file(&cart_path).await;
    }
}
