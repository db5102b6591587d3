//! `vitrina checkout`: validate, price, and clear the cart.

use clap::Args;
use tracing::info;
use vitrina_core::Storefront;
use vitrina_offers::load_promotions;

use super::{CartFileArgs, ClockArgs, OffersArgs, Output};
use crate::config::AppConfig;
use crate::error::CliResult;
use crate::{render, storage};

#[derive(Debug, Args)]
pub struct CheckoutArgs {
    #[command(flatten)]
    pub cart: CartFileArgs,

    #[command(flatten)]
    pub offers: OffersArgs,

    #[command(flatten)]
    pub clock: ClockArgs,
}

/// Places the order. The cart file is only cleared once the order exists.
pub async fn execute(args: CheckoutArgs, config: &AppConfig, output: Output) -> CliResult<String> {
    let cart = storage::load_cart(&args.cart.path).await?;
    let source = args.offers.apply(&config.offers).build_source()?;
    let now = args.clock.now();

    let promotions = load_promotions(source.as_ref(), now).await;
    let mut store = Storefront::new(config.policy())
        .with_cart(cart)
        .with_promotions(promotions);

    let summary = store.place_order(now)?;
    storage::save_cart(&args.cart.path, store.cart()).await?;
    info!(order_id = %summary.order_id, path = %args.cart.path.display(), "Cart file cleared");

    match output {
        Output::Json => Ok(serde_json::to_string_pretty(&summary)?),
        Output::Table => Ok(render::order_summary(&summary, config)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cart::tests::write_fixture;
    use crate::error::ErrorCode;

    fn args(path: std::path::PathBuf) -> CheckoutArgs {
        CheckoutArgs {
            cart: CartFileArgs { path },
            offers: OffersArgs::default(),
            clock: ClockArgs::default(),
        }
    }

    #[tokio::test]
    async fn test_checkout_clears_cart_file() {
        let path = write_fixture(
            "checkout",
            r#"{ "lines": [ { "productId": "A", "unitPrice": "119", "quantity": 2 } ] }"#,
        )
        .await;

        let out = execute(args(path.clone()), &AppConfig::default(), Output::Json)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["breakdown"]["itemsInCart"], 2);
        assert!(json["orderId"].is_string());

        let cart = storage::load_cart(&path).await.unwrap();
        assert!(cart.is_empty());

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_fails() {
        let path = write_fixture("checkout-empty", "").await;

        let err = execute(args(path.clone()), &AppConfig::default(), Output::Table)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_checkout_rejects_oversized_quantity() {
        let path = write_fixture(
            "checkout-oversized",
            r#"[ { "productId": "A", "unitPrice": "1", "quantity": 100000 } ]"#,
        )
        .await;

        let err = execute(args(path.clone()), &AppConfig::default(), Output::Table)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);

        // Failed checkout leaves the cart alone
        let cart = storage::load_cart(&path).await.unwrap();
        assert_eq!(cart.total_quantity(), 100_000);

        let _ = tokio::fs::remove_file(&path).await;
    }
}
