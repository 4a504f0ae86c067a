//! # Pricing
//!
//! Promotion Resolver and Line Pricer.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Line Pricing Pipeline                            │
//! │                                                                         │
//! │  LineItem (product_id, quantity, captured unit_price)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  subtotal = quantity × unit_price                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  resolve_promotion ── first active match in list order ──► discount     │
//! │       │                 (product id OR category)          0..=subtotal  │
//! │       ▼                                                                 │
//! │  taxable base = subtotal − discount                                     │
//! │  tax          = taxable base × VAT                                      │
//! │  total        = taxable base + tax                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both functions are pure and cheap enough to run on every keystroke.
//! A line always keeps the unit price captured when it was added; the
//! catalog is only consulted for the category a promotion may target.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::bill::LineItem;
use crate::money::Money;
use crate::types::{Catalog, DiscountKind, Product, Promotion, TaxRate};

// =============================================================================
// Pricing Context
// =============================================================================

/// Everything a line needs to be priced, borrowed from the host's working set.
#[derive(Debug, Clone, Copy)]
pub struct PricingContext<'a> {
    pub catalog: &'a Catalog,
    /// Promotion list in evaluation order. May contain expired entries.
    pub promotions: &'a [Promotion],
    pub today: NaiveDate,
    pub vat_rate: TaxRate,
}

impl<'a> PricingContext<'a> {
    /// Context using the fixed 19% VAT rate.
    pub fn new(catalog: &'a Catalog, promotions: &'a [Promotion], today: NaiveDate) -> Self {
        PricingContext {
            catalog,
            promotions,
            today,
            vat_rate: TaxRate::vat(),
        }
    }

    pub fn with_vat_rate(mut self, vat_rate: TaxRate) -> Self {
        self.vat_rate = vat_rate;
        self
    }
}

// =============================================================================
// Promotion Resolver
// =============================================================================

/// The discount a promotion grants one line, plus which promotion it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PromotionOutcome {
    pub discount: Money,
    pub promotion_id: Option<String>,
    pub label: Option<String>,
}

impl PromotionOutcome {
    pub fn none() -> Self {
        PromotionOutcome {
            discount: Money::zero(),
            promotion_id: None,
            label: None,
        }
    }
}

/// Promotions whose validity window contains `today`, in input order.
pub fn active_promotions<'a>(
    promotions: &'a [Promotion],
    today: NaiveDate,
) -> impl Iterator<Item = &'a Promotion> + 'a {
    promotions.iter().filter(move |p| p.is_active_on(today))
}

/// Resolves the single promotion that applies to a line.
///
/// ## Rules
/// - Only promotions active on `today` are considered.
/// - First match in list order wins; there is no priority field.
/// - `percentage`: `unit_price × quantity × value / 100`.
/// - `fixed`: `value`, once per line regardless of quantity.
/// - The discount is clamped to `0..=subtotal`.
pub fn resolve_promotion(
    product: &Product,
    quantity: i64,
    unit_price: Money,
    promotions: &[Promotion],
    today: NaiveDate,
) -> PromotionOutcome {
    let Some(promotion) = active_promotions(promotions, today).find(|p| p.matches(product)) else {
        return PromotionOutcome::none();
    };

    let subtotal = unit_price.multiply_quantity(quantity);
    let raw = match promotion.discount_kind {
        DiscountKind::Percentage => subtotal.percentage(promotion.discount_value),
        DiscountKind::Fixed => Money::from_decimal(promotion.discount_value),
    };
    let discount = raw.max(Money::zero()).min(subtotal.max(Money::zero()));

    PromotionOutcome {
        discount,
        promotion_id: Some(promotion.id.clone()),
        label: Some(promotion.name.clone()),
    }
}

// =============================================================================
// Line Pricer
// =============================================================================

/// Returns `line` with every derived field recomputed from scratch.
///
/// A line whose product has left the catalog keeps its captured price and
/// gets no promotion. It is never dropped.
pub fn price_line(line: &LineItem, ctx: &PricingContext<'_>) -> LineItem {
    let subtotal = line.unit_price.multiply_quantity(line.quantity);

    let outcome = match ctx.catalog.get(&line.product_id) {
        Some(product) => resolve_promotion(
            product,
            line.quantity,
            line.unit_price,
            ctx.promotions,
            ctx.today,
        ),
        None => PromotionOutcome::none(),
    };

    let taxable_base = (subtotal - outcome.discount).max(Money::zero());
    let tax = taxable_base.calculate_tax(ctx.vat_rate);

    LineItem {
        product_id: line.product_id.clone(),
        name: line.name.clone(),
        quantity: line.quantity,
        unit_price: line.unit_price,
        subtotal,
        discount: outcome.discount,
        taxable_base,
        tax,
        total: taxable_base + tax,
        promotion_id: outcome.promotion_id,
        promotion_label: outcome.label,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TargetKind;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use std::collections::BTreeMap;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn product(id: &str, price: i64, category: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            unit_price: Money::from_units(price),
            unit_cost: Money::from_units(price / 2),
            category: category.to_string(),
            stock: BTreeMap::new(),
        }
    }

    fn promo(id: &str, target: TargetKind, value: &str, kind: DiscountKind, amount: i64) -> Promotion {
        Promotion {
            id: id.to_string(),
            name: format!("Promo {}", id),
            target_kind: target,
            target_value: value.to_string(),
            discount_kind: kind,
            discount_value: Decimal::from(amount),
            starts_on: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            ends_on: NaiveDate::from_ymd_opt(2026, 10, 31).unwrap(),
        }
    }

    fn line(product: &Product, quantity: i64) -> LineItem {
        let mut line = LineItem::new(product);
        line.quantity = quantity;
        line
    }

    #[test]
    fn test_line_without_promotion() {
        let p = product("A", 40_000, "aseo");
        let catalog = Catalog::new([p.clone()]);
        let ctx = PricingContext::new(&catalog, &[], today());

        let priced = price_line(&line(&p, 2), &ctx);

        assert_eq!(priced.subtotal, Money::from_units(80_000));
        assert_eq!(priced.discount, Money::zero());
        assert_eq!(priced.tax, Money::from_units(15_200));
        assert_eq!(priced.total, Money::from_units(95_200));
        assert_eq!(priced.promotion_label, None);
    }

    #[test]
    fn test_line_with_category_percentage() {
        let p = product("A", 40_000, "aseo");
        let catalog = Catalog::new([p.clone()]);
        let promotions = [promo("10", TargetKind::Category, "aseo", DiscountKind::Percentage, 10)];
        let ctx = PricingContext::new(&catalog, &promotions, today());

        let priced = price_line(&line(&p, 2), &ctx);

        assert_eq!(priced.discount, Money::from_units(8_000));
        assert_eq!(priced.taxable_base, Money::from_units(72_000));
        assert_eq!(priced.tax, Money::from_units(13_680));
        assert_eq!(priced.total, Money::from_units(85_680));
        assert_eq!(priced.promotion_id.as_deref(), Some("10"));
        assert_eq!(priced.promotion_label.as_deref(), Some("Promo 10"));
    }

    #[test]
    fn test_fixed_discount_not_scaled_by_quantity() {
        let p = product("A", 10_000, "aseo");
        let promotions = [promo("f", TargetKind::Product, "A", DiscountKind::Fixed, 3_000)];

        let outcome = resolve_promotion(&p, 5, p.unit_price, &promotions, today());
        assert_eq!(outcome.discount, Money::from_units(3_000));
    }

    #[test]
    fn test_discount_clamped_to_subtotal() {
        let p = product("A", 1_000, "aseo");
        let catalog = Catalog::new([p.clone()]);
        let promotions = [promo("f", TargetKind::Product, "A", DiscountKind::Fixed, 5_000)];
        let ctx = PricingContext::new(&catalog, &promotions, today());

        let priced = price_line(&line(&p, 2), &ctx);

        assert_eq!(priced.discount, Money::from_units(2_000));
        assert_eq!(priced.taxable_base, Money::zero());
        assert_eq!(priced.total, Money::zero());
    }

    #[test]
    fn test_negative_discount_clamped_to_zero() {
        let p = product("A", 1_000, "aseo");
        let promotions = [promo("neg", TargetKind::Product, "A", DiscountKind::Percentage, -10)];

        let outcome = resolve_promotion(&p, 1, p.unit_price, &promotions, today());
        assert_eq!(outcome.discount, Money::zero());
        assert_eq!(outcome.promotion_id.as_deref(), Some("neg"));
    }

    #[test]
    fn test_first_matching_promotion_wins() {
        let p = product("A", 10_000, "aseo");
        let by_product = promo("prod", TargetKind::Product, "A", DiscountKind::Fixed, 1_000);
        let by_category = promo("cat", TargetKind::Category, "aseo", DiscountKind::Percentage, 50);

        let outcome = resolve_promotion(
            &p,
            1,
            p.unit_price,
            &[by_product.clone(), by_category.clone()],
            today(),
        );
        assert_eq!(outcome.promotion_id.as_deref(), Some("prod"));
        assert_eq!(outcome.discount, Money::from_units(1_000));

        let outcome = resolve_promotion(&p, 1, p.unit_price, &[by_category, by_product], today());
        assert_eq!(outcome.promotion_id.as_deref(), Some("cat"));
        assert_eq!(outcome.discount, Money::from_units(5_000));
    }

    #[test]
    fn test_inactive_promotions_are_skipped() {
        let p = product("A", 10_000, "aseo");
        let mut expired = promo("old", TargetKind::Product, "A", DiscountKind::Fixed, 1_000);
        expired.ends_on = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        let current = promo("new", TargetKind::Product, "A", DiscountKind::Fixed, 500);

        let outcome = resolve_promotion(&p, 1, p.unit_price, &[expired, current], today());
        assert_eq!(outcome.promotion_id.as_deref(), Some("new"));
    }

    #[test]
    fn test_non_matching_promotions_give_nothing() {
        let p = product("A", 10_000, "aseo");
        let promotions = [
            promo("x", TargetKind::Product, "B", DiscountKind::Fixed, 1_000),
            promo("y", TargetKind::Category, "bebidas", DiscountKind::Fixed, 1_000),
        ];
        assert_eq!(
            resolve_promotion(&p, 1, p.unit_price, &promotions, today()),
            PromotionOutcome::none()
        );
    }

    #[test]
    fn test_missing_product_keeps_captured_price_without_promotion() {
        let p = product("A", 40_000, "aseo");
        let empty = Catalog::default();
        let promotions = [promo("p", TargetKind::Product, "A", DiscountKind::Fixed, 1_000)];
        let ctx = PricingContext::new(&empty, &promotions, today());

        let priced = price_line(&line(&p, 2), &ctx);

        assert_eq!(priced.unit_price, Money::from_units(40_000));
        assert_eq!(priced.discount, Money::zero());
        assert_eq!(priced.total, Money::from_units(95_200));
    }

    #[test]
    fn test_line_keeps_captured_price_after_catalog_change() {
        let original = product("A", 40_000, "aseo");
        let captured = line(&original, 1);
        let repriced_catalog = Catalog::new([product("A", 50_000, "aseo")]);
        let ctx = PricingContext::new(&repriced_catalog, &[], today());

        assert_eq!(price_line(&captured, &ctx).subtotal, Money::from_units(40_000));
    }

    #[test]
    fn test_custom_vat_rate() {
        let p = product("A", 10_000, "aseo");
        let catalog = Catalog::new([p.clone()]);
        let ctx = PricingContext::new(&catalog, &[], today()).with_vat_rate(TaxRate::from_bps(500));

        assert_eq!(price_line(&line(&p, 1), &ctx).tax, Money::from_units(500));
    }

    proptest! {
        #[test]
        fn prop_line_total_matches_formula(
            price in 0i64..5_000_000,
            quantity in 1i64..=999,
            percent in 0i64..=100,
            fixed in 0i64..10_000_000,
            use_fixed in any::<bool>(),
        ) {
            let p = product("A", price, "aseo");
            let catalog = Catalog::new([p.clone()]);
            let promotions = if use_fixed {
                [promo("f", TargetKind::Product, "A", DiscountKind::Fixed, fixed)]
            } else {
                [promo("p", TargetKind::Category, "aseo", DiscountKind::Percentage, percent)]
            };
            let ctx = PricingContext::new(&catalog, &promotions, today());

            let priced = price_line(&line(&p, quantity), &ctx);

            let base = (Money::from_units(price * quantity) - priced.discount).max(Money::zero());
            let expected = base.amount() * Decimal::new(119, 2);
            prop_assert_eq!(priced.total.amount(), expected);
            prop_assert!(priced.discount <= priced.subtotal);
            prop_assert!(!priced.discount.is_negative());
        }

        #[test]
        fn prop_price_line_is_idempotent(
            price in 0i64..5_000_000,
            quantity in 1i64..=999,
            percent in 0i64..=100,
        ) {
            let p = product("A", price, "aseo");
            let catalog = Catalog::new([p.clone()]);
            let promotions = [promo("p", TargetKind::Category, "aseo", DiscountKind::Percentage, percent)];
            let ctx = PricingContext::new(&catalog, &promotions, today());

            let once = price_line(&line(&p, quantity), &ctx);
            let twice = price_line(&once, &ctx);
            prop_assert_eq!(
                serde_json::to_string(&once).unwrap(),
                serde_json::to_string(&twice).unwrap()
            );
        }

        #[test]
        fn prop_only_first_overlapping_promotion_applies(
            product_first in any::<bool>(),
            fixed in 1i64..1_000,
            percent in 1i64..=100,
        ) {
            let p = product("A", 10_000, "aseo");
            let by_product = promo("prod", TargetKind::Product, "A", DiscountKind::Fixed, fixed);
            let by_category = promo("cat", TargetKind::Category, "aseo", DiscountKind::Percentage, percent);
            let promotions = if product_first {
                vec![by_product, by_category]
            } else {
                vec![by_category, by_product]
            };

            let outcome = resolve_promotion(&p, 1, p.unit_price, &promotions, today());
            let expected = if product_first {
                Money::from_units(fixed)
            } else {
                Money::from_units(100 * percent)
            };
            prop_assert_eq!(outcome.promotion_id.as_deref(), Some(promotions[0].id.as_str()));
            prop_assert_eq!(outcome.discount, expected);
        }
    }
}
