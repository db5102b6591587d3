//! # Offer Records
//!
//! The raw shape served by the promotions service and its normalization
//! into [`vitrina_core::Promotion`].
//!
//! ## Field Mapping
//! ```text
//! ┌──────────────────────┬──────────────────────────────────────────────────┐
//! │ Feed field           │ Promotion                                        │
//! ├──────────────────────┼──────────────────────────────────────────────────┤
//! │ _id (or id)          │ id                          required             │
//! │ percentage           │ percentage  (clamped 0..=100) required           │
//! │ isAll                │ scope = All when true                            │
//! │ products             │ scope = Products([...])   ids or {_id} objects   │
//! │ typePackage          │ inner | unidad | unit → Unit, master → Master    │
//! │ minimumQuantity      │ minimum_quantity (>= 1, default 1)               │
//! │ startDate            │ valid_from (optional)                            │
//! │ endDate              │ valid_to    required, date-only = end of day     │
//! │ state                │ "Active" → Active, anything else → Inactive      │
//! └──────────────────────┴──────────────────────────────────────────────────┘
//! ```

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use vitrina_core::validation::validate_percentage;
use vitrina_core::{Percentage, Promotion, PromotionScope, PromotionState, PromotionTier};

use crate::error::{OffersError, OffersResult};

/// One record as served by `GET /offer`.
///
/// Fields are kept loose here; all interpretation happens in
/// [`OfferRecord::into_promotion`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferRecord {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<Value>,

    #[serde(default)]
    pub percentage: Option<Value>,

    #[serde(default)]
    pub type_package: Option<String>,

    #[serde(default)]
    pub is_all: Option<bool>,

    #[serde(default)]
    pub products: Option<Vec<Value>>,

    #[serde(default)]
    pub minimum_quantity: Option<Value>,

    #[serde(default)]
    pub start_date: Option<String>,

    #[serde(default)]
    pub end_date: Option<String>,

    #[serde(default)]
    pub state: Option<String>,
}

impl OfferRecord {
    /// Parses one raw JSON value.
    ///
    /// # Errors
    /// `OffersError::InvalidRecord` if the value is not an object of the
    /// expected shape.
    pub fn from_value(value: Value) -> OffersResult<Self> {
        let id = value.get("_id").or_else(|| value.get("id")).and_then(id_string);
        serde_json::from_value(value).map_err(|e| OffersError::InvalidRecord {
            id,
            reason: e.to_string(),
        })
    }

    /// The record id as a string, if present.
    pub fn id(&self) -> Option<String> {
        self.id.as_ref().and_then(id_string)
    }

    /// Normalizes the record into a core promotion.
    ///
    /// # Errors
    /// `OffersError::InvalidRecord` when a required field is missing or
    /// unparseable (id, percentage, endDate) or the package type is unknown.
    pub fn into_promotion(self) -> OffersResult<Promotion> {
        let id = self
            .id()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| OffersError::record(None, "missing _id"))?;
        let reject = |reason: String| OffersError::record(Some(&id), reason);

        let raw_percentage = self
            .percentage
            .as_ref()
            .ok_or_else(|| reject("missing percentage".to_string()))
            .and_then(|v| decimal_from(v).ok_or_else(|| reject(format!("invalid percentage: {}", v))))?;
        if let Err(e) = validate_percentage(raw_percentage) {
            warn!(offer_id = %id, error = %e, "Clamping out-of-range percentage");
        }

        let tier = match self.type_package.as_deref() {
            None => PromotionTier::Unit,
            Some(raw) => parse_tier(raw).ok_or_else(|| reject(format!("unknown typePackage '{}'", raw)))?,
        };

        let scope = if self.is_all.unwrap_or(false) {
            PromotionScope::All
        } else {
            PromotionScope::Products(product_ids(&id, self.products.unwrap_or_default()))
        };

        let minimum_quantity = match self.minimum_quantity.as_ref() {
            None | Some(Value::Null) => 1,
            Some(v) => integer_from(v).ok_or_else(|| reject(format!("invalid minimumQuantity: {}", v)))?,
        }
        .max(1);

        let valid_to = self
            .end_date
            .as_deref()
            .ok_or_else(|| reject("missing endDate".to_string()))
            .and_then(|raw| {
                parse_feed_date(raw, DateBound::End).ok_or_else(|| reject(format!("invalid endDate '{}'", raw)))
            })?;

        let valid_from = self
            .start_date
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| {
                parse_feed_date(raw, DateBound::Start).ok_or_else(|| reject(format!("invalid startDate '{}'", raw)))
            })
            .transpose()?;

        let state = match self.state.as_deref() {
            Some(raw) if raw.trim().eq_ignore_ascii_case("active") => PromotionState::Active,
            _ => PromotionState::Inactive,
        };

        debug!(offer_id = %id, ?tier, ?state, "Normalized offer record");

        Ok(Promotion {
            id,
            percentage: Percentage::new(raw_percentage),
            scope,
            tier,
            minimum_quantity,
            valid_from,
            valid_to,
            state,
        })
    }
}

// =============================================================================
// Field Helpers
// =============================================================================

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("$oid").and_then(id_string),
        _ => None,
    }
}

/// Product entries are plain ids or populated documents carrying `_id`.
fn product_ids(offer_id: &str, products: Vec<Value>) -> Vec<String> {
    products
        .into_iter()
        .filter_map(|entry| {
            let product_id = match &entry {
                Value::Object(map) => map.get("_id").or_else(|| map.get("id")).and_then(id_string),
                other => id_string(other),
            };
            if product_id.is_none() {
                debug!(offer_id, ?entry, "Skipping product entry without an id");
            }
            product_id.filter(|id| !id.is_empty())
        })
        .collect()
}

fn parse_tier(raw: &str) -> Option<PromotionTier> {
    match raw.trim().to_lowercase().as_str() {
        "inner" | "unidad" | "unit" => Some(PromotionTier::Unit),
        "master" => Some(PromotionTier::Master),
        _ => None,
    }
}

fn decimal_from(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok())),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

fn integer_from(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.floor() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy)]
enum DateBound {
    Start,
    End,
}

/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS` (read as UTC), and plain
/// `YYYY-MM-DD`. A plain end date covers the whole day.
fn parse_feed_date(raw: &str, bound: DateBound) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let time = match bound {
        DateBound::Start => NaiveTime::MIN,
        DateBound::End => NaiveTime::from_hms_milli_opt(23, 59, 59, 999)?,
    };
    Some(date.and_time(time).and_utc())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn normalize(value: Value) -> OffersResult<Promotion> {
        OfferRecord::from_value(value)?.into_promotion()
    }

    #[test]
    fn test_full_record() {
        let promo = normalize(json!({
            "_id": "64f1",
            "percentage": 15,
            "typePackage": "master",
            "isAll": false,
            "products": ["A", "B"],
            "minimumQuantity": 6,
            "startDate": "2026-01-01T00:00:00.000Z",
            "endDate": "2026-12-31T23:59:59.000Z",
            "state": "Active"
        }))
        .unwrap();

        assert_eq!(promo.id, "64f1");
        assert_eq!(promo.percentage, Percentage::from_whole(15));
        assert_eq!(promo.tier, PromotionTier::Master);
        assert_eq!(promo.scope, PromotionScope::Products(vec!["A".into(), "B".into()]));
        assert_eq!(promo.minimum_quantity, 6);
        assert_eq!(promo.state, PromotionState::Active);
        assert_eq!(promo.valid_to, Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 59).unwrap());
        assert!(promo.valid_from.is_some());
    }

    #[test]
    fn test_product_objects_match_plain_ids() {
        let base = json!({
            "_id": "p", "percentage": 10, "endDate": "2026-06-30", "state": "Active",
            "products": ["A", "B"]
        });
        let mut populated = base.clone();
        populated["products"] = json!([{ "_id": "A", "name": "Café" }, { "_id": "B" }]);

        assert_eq!(normalize(base).unwrap(), normalize(populated).unwrap());
    }

    #[test]
    fn test_inner_and_unidad_are_unit_tier() {
        for raw in ["inner", "unidad", "UNIDAD"] {
            let promo = normalize(json!({
                "_id": "p", "percentage": 5, "typePackage": raw, "endDate": "2026-06-30"
            }))
            .unwrap();
            assert_eq!(promo.tier, PromotionTier::Unit);
        }
    }

    #[test]
    fn test_unknown_package_is_rejected() {
        let err = normalize(json!({
            "_id": "p", "percentage": 5, "typePackage": "pallet", "endDate": "2026-06-30"
        }))
        .unwrap_err();
        assert!(err.is_record_error());
        assert!(err.to_string().contains("pallet"));
    }

    #[test]
    fn test_missing_required_fields_rejected() {
        assert!(normalize(json!({ "percentage": 5, "endDate": "2026-06-30" })).is_err());
        assert!(normalize(json!({ "_id": "p", "endDate": "2026-06-30" })).is_err());
        assert!(normalize(json!({ "_id": "p", "percentage": 5 })).is_err());
        assert!(normalize(json!({ "_id": "p", "percentage": "abc", "endDate": "2026-06-30" })).is_err());
        assert!(normalize(json!("just a string")).is_err());
    }

    #[test]
    fn test_defaults_for_missing_optional_fields() {
        let promo = normalize(json!({ "_id": "p", "percentage": "12.5", "endDate": "2026-06-30" })).unwrap();

        assert_eq!(promo.tier, PromotionTier::Unit);
        assert_eq!(promo.scope, PromotionScope::Products(Vec::new()));
        assert_eq!(promo.minimum_quantity, 1);
        assert_eq!(promo.state, PromotionState::Inactive);
        assert_eq!(promo.percentage.value(), Decimal::new(125, 1));
    }

    #[test]
    fn test_is_all_ignores_products() {
        let promo = normalize(json!({
            "_id": "p", "percentage": 10, "isAll": true, "products": ["A"], "endDate": "2026-06-30"
        }))
        .unwrap();
        assert!(promo.scope.is_all());
    }

    #[test]
    fn test_date_only_end_covers_whole_day() {
        let promo = normalize(json!({ "_id": "p", "percentage": 10, "endDate": "2026-06-30" })).unwrap();
        let late = Utc.with_ymd_and_hms(2026, 6, 30, 23, 59, 0).unwrap();
        let next_day = Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap();

        assert!(late <= promo.valid_to);
        assert!(next_day > promo.valid_to);
    }

    #[test]
    fn test_percentage_and_quantity_are_clamped() {
        let promo = normalize(json!({
            "_id": "p", "percentage": 140, "minimumQuantity": 0, "endDate": "2026-06-30"
        }))
        .unwrap();
        assert_eq!(promo.percentage, Percentage::from_whole(100));
        assert_eq!(promo.minimum_quantity, 1);

        let promo = normalize(json!({
            "_id": "p", "percentage": 10, "minimumQuantity": "3", "endDate": "2026-06-30"
        }))
        .unwrap();
        assert_eq!(promo.minimum_quantity, 3);
    }

    #[test]
    fn test_id_alias_and_numeric_id() {
        let promo = normalize(json!({ "id": 42, "percentage": 10, "endDate": "2026-06-30" })).unwrap();
        assert_eq!(promo.id, "42");
    }
}
