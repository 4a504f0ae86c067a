//! # Validation Module
//!
//! Input validation utilities for Mostrador POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: POS screen                                                   │
//! │  ├── Disabled buttons (empty bill, short cash)                         │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Terminal commands (Rust)                                     │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Core operations                                              │
//! │  └── Invariants (line totals, single active bill, open session)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mostrador_core::money::Money;
//! use mostrador_core::validation::{validate_identifier, validate_price};
//!
//! validate_identifier("product_id", "SKU-001").unwrap();
//! validate_price("unit price", Money::from_units(4_500)).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{DiscountKind, Product, Promotion};
use crate::{MAX_BILL_LINES, MAX_CASH_AMOUNT, MAX_UNIT_PRICE};
use rust_decimal::Decimal;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest identifier accepted from the host.
const MAX_IDENTIFIER_LEN: usize = 64;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a host-supplied identifier (product, customer, warehouse...).
///
/// ## Rules
/// - Must not be empty or whitespace
/// - At most 64 characters
///
/// ## Example
/// ```rust
/// use mostrador_core::validation::validate_identifier;
///
/// assert!(validate_identifier("customer_id", "consumidor-final").is_ok());
/// assert!(validate_identifier("customer_id", "  ").is_err());
/// ```
pub fn validate_identifier(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > MAX_IDENTIFIER_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_IDENTIFIER_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price or cost.
///
/// ## Rules
/// - Zero is allowed (free items)
/// - Must not be negative
/// - Must not exceed MAX_UNIT_PRICE
pub fn validate_price(field: &str, amount: Money) -> ValidationResult<()> {
    validate_amount(field, amount, MAX_UNIT_PRICE)
}

/// Validates a counted cash amount (opening float).
pub fn validate_cash_amount(field: &str, amount: Money) -> ValidationResult<()> {
    validate_amount(field, amount, MAX_CASH_AMOUNT)
}

/// Validates a cash amount received.
///
/// Only rejects nonsense input; covering the total is the reconciler's job.
pub fn validate_tendered_amount(amount: Money) -> ValidationResult<()> {
    validate_cash_amount("amount received", amount)
}

fn validate_amount(field: &str, amount: Money, max: i64) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    if amount > Money::from_units(max) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max,
        });
    }

    Ok(())
}

/// Validates bill size (number of distinct lines) before appending one more.
pub fn validate_bill_size(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_BILL_LINES {
        return Err(ValidationError::OutOfRange {
            field: "bill lines".to_string(),
            min: 0,
            max: MAX_BILL_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Reference Data Validators
// =============================================================================

/// Validates a catalog product supplied by the host.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_identifier("product id", &product.id)?;

    if product.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product name".to_string(),
        });
    }

    validate_price("unit price", product.unit_price)?;
    validate_price("unit cost", product.unit_cost)?;
    Ok(())
}

/// Validates a promotion supplied by the host.
///
/// ## Rules
/// - id and target value present
/// - `starts_on <= ends_on`
/// - discount value not negative; percentages at most 100
pub fn validate_promotion(promotion: &Promotion) -> ValidationResult<()> {
    validate_identifier("promotion id", &promotion.id)?;
    validate_identifier("promotion target", &promotion.target_value)?;

    if promotion.starts_on > promotion.ends_on {
        return Err(ValidationError::InvalidFormat {
            field: "promotion window".to_string(),
            reason: format!(
                "starts on {} after it ends on {}",
                promotion.starts_on, promotion.ends_on
            ),
        });
    }

    if promotion.discount_value < Decimal::ZERO {
        return Err(ValidationError::MustNotBeNegative {
            field: "discount value".to_string(),
        });
    }

    if promotion.discount_kind == DiscountKind::Percentage
        && promotion.discount_value > Decimal::ONE_HUNDRED
    {
        return Err(ValidationError::OutOfRange {
            field: "discount percentage".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TargetKind;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn promotion(kind: DiscountKind, value: i64) -> Promotion {
        Promotion {
            id: "promo-1".into(),
            name: "Promo".into(),
            target_kind: TargetKind::Product,
            target_value: "SKU-1".into(),
            discount_kind: kind,
            discount_value: Decimal::from(value),
            starts_on: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            ends_on: NaiveDate::from_ymd_opt(2026, 10, 31).unwrap(),
        }
    }

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("id", "SKU-1").is_ok());
        assert!(validate_identifier("id", "").is_err());
        assert!(validate_identifier("id", "   ").is_err());
        assert!(validate_identifier("id", &"A".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price("price", Money::zero()).is_ok());
        assert!(validate_price("price", Money::from_units(40_000)).is_ok());
        assert!(validate_price("price", Money::from_units(-1)).is_err());
        assert!(validate_tendered_amount(Money::from_units(-5)).is_err());
    }

    #[test]
    fn test_validate_amount_upper_bounds() {
        assert!(validate_price("price", Money::from_units(MAX_UNIT_PRICE)).is_ok());
        assert_eq!(
            validate_price("price", Money::from_units(MAX_UNIT_PRICE + 1)),
            Err(ValidationError::OutOfRange {
                field: "price".into(),
                min: 0,
                max: MAX_UNIT_PRICE,
            })
        );
        assert!(validate_price("price", Money::from_decimal(Decimal::MAX)).is_err());

        assert!(validate_tendered_amount(Money::from_units(MAX_CASH_AMOUNT)).is_ok());
        assert!(validate_tendered_amount(Money::from_decimal(Decimal::MAX)).is_err());
        assert!(
            validate_cash_amount("opening float", Money::from_units(MAX_CASH_AMOUNT + 1)).is_err()
        );
    }

    #[test]
    fn test_validate_bill_size() {
        assert!(validate_bill_size(0).is_ok());
        assert!(validate_bill_size(MAX_BILL_LINES - 1).is_ok());
        assert!(validate_bill_size(MAX_BILL_LINES).is_err());
    }

    #[test]
    fn test_validate_product() {
        let product = Product {
            id: "SKU-1".into(),
            name: "Jabón".into(),
            unit_price: Money::from_units(4_500),
            unit_cost: Money::from_units(3_000),
            category: "aseo".into(),
            stock: BTreeMap::new(),
        };
        assert!(validate_product(&product).is_ok());

        let mut nameless = product.clone();
        nameless.name = " ".into();
        assert!(validate_product(&nameless).is_err());

        let mut negative = product.clone();
        negative.unit_price = Money::from_units(-1);
        assert!(validate_product(&negative).is_err());

        let mut huge = product.clone();
        huge.unit_price = Money::from_decimal(Decimal::MAX);
        assert!(validate_product(&huge).is_err());

        let mut huge_cost = product;
        huge_cost.unit_cost = Money::from_decimal(Decimal::MAX);
        assert!(validate_product(&huge_cost).is_err());
    }

    #[test]
    fn test_validate_promotion() {
        assert!(validate_promotion(&promotion(DiscountKind::Percentage, 10)).is_ok());
        assert!(validate_promotion(&promotion(DiscountKind::Percentage, 100)).is_ok());
        assert!(validate_promotion(&promotion(DiscountKind::Percentage, 101)).is_err());
        assert!(validate_promotion(&promotion(DiscountKind::Fixed, 5_000)).is_ok());
        assert!(validate_promotion(&promotion(DiscountKind::Fixed, -1)).is_err());

        let mut inverted = promotion(DiscountKind::Fixed, 1);
        inverted.ends_on = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        assert!(validate_promotion(&inverted).is_err());
    }
}
