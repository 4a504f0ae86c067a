//! # Domain Types
//!
//! Core domain types used throughout Mostrador POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   Promotion     │   │    Invoice      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  target kind    │   │  id (UUID)      │       │
//! │  │  category       │   │  target value   │   │  number         │       │
//! │  │  unit_price     │   │  discount kind  │   │  status         │       │
//! │  │  stock/warehouse│   │  starts/ends_on │   │  cash_session_id│       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │ PaymentMethod   │   │  CashSession    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Cash, Card ... │   │  Open / Closed  │       │
//! │  │  1900 = 19%     │   │  → Settlement   │   │  opening_float  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Products, promotions and customers are read-only references owned by the
//! host. Invoices are created only by checkout and never mutated here.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::bill::LineItem;
use crate::money::Money;
use crate::{VAT_RATE_BPS, WALK_IN_CUSTOMER_ID, WALK_IN_CUSTOMER_NAME};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1900 bps = 19% (Colombian IVA)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// The fixed VAT rate (19%).
    #[inline]
    pub const fn vat() -> Self {
        TaxRate(VAT_RATE_BPS)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::vat()
    }
}

// =============================================================================
// Product & Catalog
// =============================================================================

/// A product available for sale. Read-only during a POS session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: String,

    /// Display name shown to cashier and captured on the line item.
    pub name: String,

    pub unit_price: Money,

    /// Unit cost (for margin reports, not used in pricing).
    pub unit_cost: Money,

    /// Category, matched by category-targeted promotions.
    pub category: String,

    /// Stock on hand per warehouse id.
    #[serde(default)]
    pub stock: BTreeMap<String, i64>,
}

impl Product {
    /// Stock on hand in the given warehouse (0 when unknown).
    pub fn stock_in(&self, warehouse_id: &str) -> i64 {
        self.stock.get(warehouse_id).copied().unwrap_or(0)
    }

    /// Whether the product shows up when browsing from this warehouse.
    pub fn is_available_in(&self, warehouse_id: &str) -> bool {
        self.stock_in(warehouse_id) > 0
    }
}

/// Indexed, read-only view of the product catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: HashMap<String, Product>,
}

impl Catalog {
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        Catalog {
            products: products.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    pub fn get(&self, product_id: &str) -> Option<&Product> {
        self.products.get(product_id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products with stock > 0 in the warehouse, sorted by name.
    pub fn available_in(&self, warehouse_id: &str) -> Vec<&Product> {
        let mut products: Vec<&Product> = self
            .products
            .values()
            .filter(|p| p.is_available_in(warehouse_id))
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        products
    }

    /// Case-insensitive match on name or category among available products.
    /// An empty query returns everything available.
    pub fn search(&self, query: &str, warehouse_id: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        self.available_in(warehouse_id)
            .into_iter()
            .filter(|p| {
                needle.is_empty()
                    || p.name.to_lowercase().contains(&needle)
                    || p.category.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

// =============================================================================
// Customer
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub name: String,
    /// NIT / cédula, when known.
    pub tax_id: Option<String>,
}

impl Customer {
    /// The walk-in customer every new bill is bound to.
    pub fn walk_in() -> Self {
        Customer {
            id: WALK_IN_CUSTOMER_ID.to_string(),
            name: WALK_IN_CUSTOMER_NAME.to_string(),
            tax_id: None,
        }
    }
}

// =============================================================================
// Promotion
// =============================================================================

/// What a promotion is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// `target_value` is a product id.
    Product,
    /// `target_value` is a category name.
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// `value` is a percent (10 = 10%) of the line subtotal.
    Percentage,
    /// `value` is a flat amount per line, not scaled by quantity.
    Fixed,
}

/// A time-boxed discount rule. Read-only reference owned by the host.
///
/// There is no priority field: when several promotions match a line, the
/// first one in the list wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Promotion {
    pub id: String,
    pub name: String,
    pub target_kind: TargetKind,
    pub target_value: String,
    pub discount_kind: DiscountKind,
    #[ts(type = "string")]
    pub discount_value: Decimal,
    /// First day the promotion applies (inclusive).
    #[ts(as = "String")]
    pub starts_on: NaiveDate,
    /// Last day the promotion applies (inclusive).
    #[ts(as = "String")]
    pub ends_on: NaiveDate,
}

impl Promotion {
    /// Whether `today` falls inside the inclusive validity window.
    pub fn is_active_on(&self, today: NaiveDate) -> bool {
        self.starts_on <= today && today <= self.ends_on
    }

    /// Whether this promotion targets the given product.
    pub fn matches(&self, product: &Product) -> bool {
        match self.target_kind {
            TargetKind::Product => self.target_value == product.id,
            TargetKind::Category => self.target_value == product.category,
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// Whether a payment method pays the invoice at once or leaves it pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SettlementClass {
    Immediate,
    Deferred,
}

/// Every payment method the terminal accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash; the only method that takes a tendered amount.
    Cash,
    /// Debit/credit card on the external dataphone.
    Card,
    /// PSE bank transfer.
    Pse,
    /// Nequi mobile wallet.
    Nequi,
    /// Daviplata mobile wallet.
    Daviplata,
    /// Contra entrega: collected by the courier on delivery.
    CashOnDelivery,
    /// Voucher paid later at a pay point (Efecty and similar).
    PayPointVoucher,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 7] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::Pse,
        PaymentMethod::Nequi,
        PaymentMethod::Daviplata,
        PaymentMethod::CashOnDelivery,
        PaymentMethod::PayPointVoucher,
    ];

    pub const fn settlement(&self) -> SettlementClass {
        match self {
            PaymentMethod::Cash
            | PaymentMethod::Card
            | PaymentMethod::Pse
            | PaymentMethod::Nequi
            | PaymentMethod::Daviplata => SettlementClass::Immediate,
            PaymentMethod::CashOnDelivery | PaymentMethod::PayPointVoucher => {
                SettlementClass::Deferred
            }
        }
    }

    /// Cash needs an amount received to compute change.
    pub const fn requires_tender(&self) -> bool {
        matches!(self, PaymentMethod::Cash)
    }

    /// Status an invoice paid this way is created with.
    pub const fn resulting_status(&self) -> InvoiceStatus {
        match self.settlement() {
            SettlementClass::Immediate => InvoiceStatus::Paid,
            SettlementClass::Deferred => InvoiceStatus::Pending,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Pse => "pse",
            PaymentMethod::Nequi => "nequi",
            PaymentMethod::Daviplata => "daviplata",
            PaymentMethod::CashOnDelivery => "cash_on_delivery",
            PaymentMethod::PayPointVoucher => "pay_point_voucher",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Invoice
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum InvoiceStatus {
    #[serde(rename = "pagada")]
    Paid,
    #[serde(rename = "pendiente")]
    Pending,
}

/// A finalized sale. Created only by checkout; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Invoice {
    pub id: String,
    /// Human-readable number, e.g. `FV-261016-101530-0042`.
    pub number: String,
    pub customer_id: String,
    /// Name of the tab the sale was composed on.
    pub bill_name: String,
    /// Snapshot of the bill's lines at checkout.
    pub items: Vec<LineItem>,
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub total: Money,
    pub payment_method: PaymentMethod,
    pub status: InvoiceStatus,
    /// Cash only.
    pub amount_received: Option<Money>,
    /// Cash only.
    pub change: Option<Money>,
    #[ts(as = "String")]
    pub issue_date: NaiveDate,
    #[ts(as = "String")]
    pub issued_at: DateTime<Utc>,
    /// Set only when the invoice is created paid.
    #[ts(as = "Option<String>")]
    pub payment_date: Option<NaiveDate>,
    pub warehouse_id: String,
    pub cash_session_id: String,
}

impl Invoice {
    #[inline]
    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }
}

// =============================================================================
// Cash Session
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CashSessionStatus {
    Open,
    Closed,
}

/// The open/closed state of one terminal's cash drawer for a shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CashSession {
    pub id: String,
    pub warehouse_id: String,
    pub status: CashSessionStatus,
    /// Cash placed in the drawer when the shift started.
    pub opening_float: Money,
    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl CashSession {
    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == CashSessionStatus::Open
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, category: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            unit_price: Money::from_units(1000),
            unit_cost: Money::from_units(600),
            category: category.to_string(),
            stock: BTreeMap::from([("bodega-1".to_string(), 3)]),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_tax_rate_default_is_vat() {
        assert_eq!(TaxRate::default().bps(), 1900);
        assert_eq!(TaxRate::from_percentage(19.0), TaxRate::vat());
        assert!((TaxRate::vat().percentage() - 19.0).abs() < 0.001);
    }

    #[test]
    fn test_promotion_window_is_inclusive() {
        let promo = Promotion {
            id: "p1".into(),
            name: "Octubre".into(),
            target_kind: TargetKind::Category,
            target_value: "aseo".into(),
            discount_kind: DiscountKind::Percentage,
            discount_value: Decimal::from(10),
            starts_on: date(2026, 10, 1),
            ends_on: date(2026, 10, 31),
        };
        assert!(promo.is_active_on(date(2026, 10, 1)));
        assert!(promo.is_active_on(date(2026, 10, 31)));
        assert!(!promo.is_active_on(date(2026, 9, 30)));
        assert!(!promo.is_active_on(date(2026, 11, 1)));
        assert!(promo.matches(&product("a", "aseo")));
        assert!(!promo.matches(&product("a", "bebidas")));
    }

    #[test]
    fn test_settlement_classes() {
        for method in [
            PaymentMethod::Cash,
            PaymentMethod::Card,
            PaymentMethod::Pse,
            PaymentMethod::Nequi,
            PaymentMethod::Daviplata,
        ] {
            assert_eq!(method.settlement(), SettlementClass::Immediate);
            assert_eq!(method.resulting_status(), InvoiceStatus::Paid);
        }
        for method in [PaymentMethod::CashOnDelivery, PaymentMethod::PayPointVoucher] {
            assert_eq!(method.settlement(), SettlementClass::Deferred);
            assert_eq!(method.resulting_status(), InvoiceStatus::Pending);
        }
        assert!(PaymentMethod::Cash.requires_tender());
        assert!(!PaymentMethod::Card.requires_tender());
    }

    #[test]
    fn test_invoice_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&InvoiceStatus::Paid).unwrap(),
            "\"pagada\""
        );
        assert_eq!(
            serde_json::to_string(&InvoiceStatus::Pending).unwrap(),
            "\"pendiente\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CashOnDelivery).unwrap(),
            "\"cash_on_delivery\""
        );
    }

    #[test]
    fn test_catalog_browsing_filters_by_stock() {
        let mut out_of_stock = product("b", "aseo");
        out_of_stock.stock.insert("bodega-1".into(), 0);
        let catalog = Catalog::new([product("a", "aseo"), out_of_stock, product("c", "bebidas")]);

        assert_eq!(catalog.len(), 3);
        let available: Vec<&str> = catalog
            .available_in("bodega-1")
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(available, vec!["a", "c"]);
        assert!(catalog.available_in("bodega-2").is_empty());

        let found: Vec<&str> = catalog
            .search("BEBI", "bodega-1")
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(found, vec!["c"]);
        assert_eq!(catalog.search("  ", "bodega-1").len(), 2);
    }

    #[test]
    fn test_walk_in_customer() {
        let customer = Customer::walk_in();
        assert_eq!(customer.id, WALK_IN_CUSTOMER_ID);
        assert_eq!(customer.name, "Consumidor Final");
    }
}
