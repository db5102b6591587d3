//! Terminal rendering for breakdowns, offers and orders.

use std::fmt::Write;

use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Style},
};
use vitrina_core::{OrderSummary, PricingBreakdown, PromotionScope};
use vitrina_offers::NormalizedOffers;

use crate::config::AppConfig;

/// Cart table followed by the totals block.
pub fn breakdown_table(breakdown: &PricingBreakdown, config: &AppConfig) -> String {
    if breakdown.lines.is_empty() {
        return "Cart is empty.\n".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["Product", "Qty", "Unit Price", "Pre-tax", "Tax", "Total", "Promo"]);

    for (line, detail) in breakdown.lines.iter().zip(&breakdown.line_details) {
        let product = if line.name.is_empty() {
            line.product_id.clone()
        } else {
            format!("{} ({})", line.name, line.product_id)
        };
        let promo = if detail.discount.is_zero() {
            String::new()
        } else {
            format!("-{}", config.format_currency(detail.discount))
        };

        builder.push_record([
            product,
            line.quantity.to_string(),
            config.format_currency(line.unit_price),
            config.format_currency(detail.pre_tax),
            config.format_currency(detail.tax),
            config.format_currency(detail.total),
            promo,
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(1..7), Alignment::right());

    let mut out = format!("{}\n", table);
    let _ = write_totals(&mut out, breakdown, config);
    out
}

fn write_totals(out: &mut String, breakdown: &PricingBreakdown, config: &AppConfig) -> std::fmt::Result {
    for applied in &breakdown.applied {
        writeln!(
            out,
            "  Promotion {:<20} -{}",
            applied.promotion_id,
            config.format_currency(applied.discount)
        )?;
    }

    writeln!(out, "  Items      {}", breakdown.items_in_cart)?;
    writeln!(out, "  Discount   {}", config.format_currency(breakdown.discount))?;
    writeln!(out, "  Subtotal   {}", config.format_currency(breakdown.sub_total))?;
    writeln!(
        out,
        "  Tax ({:>5}%) {}",
        breakdown.tax_rate.percentage(),
        config.format_currency(breakdown.tax)
    )?;
    writeln!(out, "  Total      {}", config.format_currency(breakdown.total))
}

/// Accepted promotions, then rejected records if any.
pub fn offers_table(offers: &NormalizedOffers) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Id", "Percent", "Tier", "Scope", "Min Qty", "Valid To", "State"]);

    for promotion in &offers.promotions {
        let scope = match &promotion.scope {
            PromotionScope::All => "all products".to_string(),
            PromotionScope::Products(ids) => ids.join(", "),
        };
        builder.push_record([
            promotion.id.clone(),
            promotion.percentage.to_string(),
            format!("{:?}", promotion.tier),
            scope,
            promotion.minimum_quantity.to_string(),
            promotion.valid_to.format("%Y-%m-%d %H:%M").to_string(),
            format!("{:?}", promotion.state),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(1..2), Alignment::right());

    let mut out = format!("{}\n", table);
    if !offers.rejected.is_empty() {
        let _ = writeln!(out, "Rejected records:");
        for rejected in &offers.rejected {
            let _ = writeln!(
                out,
                "  #{} {}: {}",
                rejected.index,
                rejected.id.as_deref().unwrap_or("<no id>"),
                rejected.reason
            );
        }
    }
    out
}

/// Order header followed by the priced cart.
pub fn order_summary(summary: &OrderSummary, config: &AppConfig) -> String {
    format!(
        "Order {} placed at {}\n{}",
        summary.order_id,
        summary.placed_at.to_rfc3339(),
        breakdown_table(&summary.breakdown, config)
    )
}
