//! # Bill
//!
//! One in-progress sale ("Cuenta N") and its line items.
//!
//! ## Bill Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Bill Operations                                      │
//! │                                                                         │
//! │  Operator Action         Bill Method             Effect                 │
//! │  ───────────────         ───────────             ──────                 │
//! │                                                                         │
//! │  Click Product ────────► add_product() ────────► qty+1 or push line     │
//! │                                                  then reprice           │
//! │                                                                         │
//! │  Edit Quantity ────────► update_quantity() ────► set qty, reprice       │
//! │                                                  (qty <= 0 removes)     │
//! │                                                                         │
//! │  Click Remove ─────────► remove_item() ────────► line dropped           │
//! │                                                                         │
//! │  Pick Customer ────────► set_customer() ───────► no repricing           │
//! │                                                                         │
//! │  Bill totals are never stored: they are sums over the priced lines.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{price_line, PricingContext};
use crate::types::Product;
use crate::validation::{validate_bill_size, validate_price};
use crate::{MAX_BILL_LINES, MAX_ITEM_QUANTITY};

// =============================================================================
// Line Item
// =============================================================================

/// One product line on a bill.
///
/// ## Design Notes
/// - `name` and `unit_price` are frozen when the product is first added, so a
///   later catalog edit never changes a pending sale.
/// - Every money field after `unit_price` is derived by
///   [`price_line`](crate::pricing::price_line) and never edited directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
    pub discount: Money,
    pub taxable_base: Money,
    pub tax: Money,
    pub total: Money,
    pub promotion_id: Option<String>,
    pub promotion_label: Option<String>,
}

impl LineItem {
    /// Creates an unpriced line with quantity 1, capturing name and price.
    pub fn new(product: &Product) -> Self {
        LineItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            quantity: 1,
            unit_price: product.unit_price,
            subtotal: Money::zero(),
            discount: Money::zero(),
            taxable_base: Money::zero(),
            tax: Money::zero(),
            total: Money::zero(),
            promotion_id: None,
            promotion_label: None,
        }
    }
}

// =============================================================================
// Bill
// =============================================================================

/// An open tab on the terminal.
///
/// ## Invariants
/// - Lines are unique by `product_id` and kept in insertion order
/// - Every line has quantity in `1..=999`
/// - At most 100 lines
/// - Lines are priced against the context of the last mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Bill {
    pub id: String,
    /// Tab label, e.g. "Cuenta 3".
    pub name: String,
    pub customer_id: String,
    pub items: Vec<LineItem>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Bill {
    /// Creates an empty bill bound to `customer_id`.
    pub fn new(name: impl Into<String>, customer_id: impl Into<String>) -> Self {
        Bill {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            customer_id: customer_id.into(),
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds one unit of `product`, or bumps the existing line by one.
    pub fn add_product(&mut self, product: &Product, ctx: &PricingContext<'_>) -> CoreResult<()> {
        validate_price("unit price", product.unit_price)?;

        if let Some(line) = self.items.iter_mut().find(|l| l.product_id == product.id) {
            let requested = line.quantity + 1;
            if requested > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = requested;
        } else {
            validate_bill_size(self.items.len())
                .map_err(|_| CoreError::BillTooLarge { max: MAX_BILL_LINES })?;
            self.items.push(LineItem::new(product));
        }

        self.reprice_with(ctx);
        Ok(())
    }

    /// Sets a line's quantity. A quantity of zero or less removes the line.
    pub fn update_quantity(
        &mut self,
        product_id: &str,
        quantity: i64,
        ctx: &PricingContext<'_>,
    ) -> CoreResult<()> {
        if quantity <= 0 {
            self.remove_item(product_id);
            return Ok(());
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        let bill_id = self.id.clone();
        let line = self
            .items
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or_else(|| CoreError::LineNotFound {
                bill_id,
                product_id: product_id.to_string(),
            })?;
        line.quantity = quantity;

        self.reprice_with(ctx);
        Ok(())
    }

    /// Removes the line for `product_id`. Returns whether a line was removed.
    pub fn remove_item(&mut self, product_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|l| l.product_id != product_id);
        self.items.len() != before
    }

    /// Rebinds the bill to another customer. Pricing is unaffected.
    pub fn set_customer(&mut self, customer_id: impl Into<String>) {
        self.customer_id = customer_id.into();
    }

    /// Reprices every line in place.
    pub fn reprice_with(&mut self, ctx: &PricingContext<'_>) {
        self.items = self.items.iter().map(|l| price_line(l, ctx)).collect();
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|l| l.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn subtotal(&self) -> Money {
        self.items.iter().map(|l| l.subtotal).sum()
    }

    pub fn discount(&self) -> Money {
        self.items.iter().map(|l| l.discount).sum()
    }

    pub fn tax(&self) -> Money {
        self.items.iter().map(|l| l.tax).sum()
    }

    pub fn total(&self) -> Money {
        self.items.iter().map(|l| l.total).sum()
    }
}

/// Returns a copy of `bill` with every line repriced. Pure.
pub fn reprice(bill: &Bill, ctx: &PricingContext<'_>) -> Bill {
    let mut repriced = bill.clone();
    repriced.reprice_with(ctx);
    repriced
}

// =============================================================================
// Bill Totals
// =============================================================================

/// Bill totals summary for the POS screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BillTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub total: Money,
}

impl From<&Bill> for BillTotals {
    fn from(bill: &Bill) -> Self {
        BillTotals {
            item_count: bill.item_count(),
            total_quantity: bill.total_quantity(),
            subtotal: bill.subtotal(),
            discount: bill.discount(),
            tax: bill.tax(),
            total: bill.total(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
