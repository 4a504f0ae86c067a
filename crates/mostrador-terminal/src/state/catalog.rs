//! # Catalog State
//!
//! Host-supplied reference data: products, promotions and customers.
//!
//! Reads vastly outnumber writes (every keystroke prices against it, the
//! host swaps it rarely), so it sits behind an `RwLock`. Data is validated
//! when loaded, never on read.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::NaiveDate;
use mostrador_core::validation::{validate_product, validate_promotion};
use mostrador_core::{Catalog, Customer, PricingContext, Product, Promotion, TaxRate};

use crate::error::TerminalResult;

/// One consistent snapshot of the reference data.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub catalog: Catalog,
    /// Evaluation order matters: the first matching promotion wins.
    pub promotions: Vec<Promotion>,
    pub customers: Vec<Customer>,
}

impl ReferenceData {
    pub fn pricing_context(&self, today: NaiveDate, vat_rate: TaxRate) -> PricingContext<'_> {
        PricingContext::new(&self.catalog, &self.promotions, today).with_vat_rate(vat_rate)
    }

    pub fn customer(&self, customer_id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == customer_id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    data: Arc<RwLock<ReferenceData>>,
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces products and promotions. Nothing changes if any entry is invalid.
    pub fn load(&self, products: Vec<Product>, promotions: Vec<Promotion>) -> TerminalResult<()> {
        for product in &products {
            validate_product(product)?;
        }
        for promotion in &promotions {
            validate_promotion(promotion)?;
        }

        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        data.catalog = Catalog::new(products);
        data.promotions = promotions;
        Ok(())
    }

    /// Replaces the promotion list only.
    pub fn set_promotions(&self, promotions: Vec<Promotion>) -> TerminalResult<()> {
        for promotion in &promotions {
            validate_promotion(promotion)?;
        }
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        data.promotions = promotions;
        Ok(())
    }

    pub fn set_customers(&self, customers: Vec<Customer>) {
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        data.customers = customers;
    }

    /// Executes a function with read access to the reference data.
    pub fn with_data<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ReferenceData) -> R,
    {
        let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
        f(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TerminalError;
    use mostrador_core::{DiscountKind, Money, TargetKind};
    use rust_decimal::Decimal;
    use std::collections::BTreeMap;

    fn product(id: &str) -> Product {
        Product {
            id: id.into(),
            name: format!("Product {}", id),
            unit_price: Money::from_units(1_000),
            unit_cost: Money::from_units(500),
            category: "aseo".into(),
            stock: BTreeMap::new(),
        }
    }

    fn promotion(value: i64) -> Promotion {
        Promotion {
            id: "p".into(),
            name: "Promo".into(),
            target_kind: TargetKind::Category,
            target_value: "aseo".into(),
            discount_kind: DiscountKind::Percentage,
            discount_value: Decimal::from(value),
            starts_on: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            ends_on: NaiveDate::from_ymd_opt(2026, 10, 31).unwrap(),
        }
    }

    #[test]
    fn test_load_and_read() {
        let state = CatalogState::new();
        state.load(vec![product("a"), product("b")], vec![promotion(10)]).unwrap();

        assert_eq!(state.with_data(|d| d.catalog.len()), 2);
        assert_eq!(state.with_data(|d| d.promotions.len()), 1);
    }

    #[test]
    fn test_invalid_load_keeps_previous_data() {
        let state = CatalogState::new();
        state.load(vec![product("a")], vec![]).unwrap();

        let result = state.load(vec![product("b")], vec![promotion(150)]);

        assert!(result.is_err());
        assert!(state.with_data(|d| d.catalog.get("a").is_some()));
        assert!(state.with_data(|d| d.catalog.get("b").is_none()));
    }

    #[test]
    fn test_load_rejects_price_beyond_limit() {
        let state = CatalogState::new();
        let mut huge = product("a");
        huge.unit_price = Money::from_decimal(Decimal::MAX);

        let err = state.load(vec![huge], vec![]).unwrap_err();
        assert!(matches!(err, TerminalError::InvalidReferenceData(_)));
        assert_eq!(state.with_data(|d| d.catalog.len()), 0);
    }

    #[test]
    fn test_customer_lookup() {
        let state = CatalogState::new();
        state.set_customers(vec![Customer::walk_in()]);
        assert!(state.with_data(|d| d.customer("consumidor-final").is_some()));
        assert!(state.with_data(|d| d.customer("nadie").is_none()));
    }
}
