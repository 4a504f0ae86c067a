//! # mostrador-core: POS Transaction Engine
//!
//! This crate holds the business logic of the Mostrador register: multiple
//! open bills per terminal, promotion-aware line pricing, payment
//! reconciliation and the cash-session gate. Pure functions, no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Mostrador POS Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    POS Screen (host UI)                         │   │
//! │  │    Tabs ──► Catalog ──► Bill ──► Checkout ──► Invoice          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                mostrador-terminal (host runtime)                │   │
//! │  │    config, state holders, commands, upsell worker              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ mostrador-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │ pricing  │ │   bill   │ │ terminal │ │ checkout │          │   │
//! │  │   │ resolver │ │ LineItem │ │   tabs   │ │ InvoiceSink         │   │
//! │  │   │  pricer  │ │  totals  │ │  active  │ │ snapshot │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │  money   │ │ payment  │ │   cash   │ │validation│          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • SYNCHRONOUS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Exact decimal money
//! - [`types`] - Domain types (Product, Promotion, Invoice, CashSession...)
//! - [`pricing`] - Promotion resolver and line pricer
//! - [`bill`] - Line items and bills
//! - [`terminal`] - Tab manager for the open bills of one terminal
//! - [`cash`] - Cash session gate and shift summary
//! - [`payment`] - Payment reconciliation and quick-cash amounts
//! - [`checkout`] - Bill to invoice
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use chrono::NaiveDate;
//! use mostrador_core::{Catalog, Money, PricingContext, Product, TerminalSession};
//!
//! let catalog = Catalog::new([Product {
//!     id: "SKU-1".into(),
//!     name: "Shampoo 1L".into(),
//!     unit_price: Money::from_units(40_000),
//!     unit_cost: Money::from_units(25_000),
//!     category: "aseo".into(),
//!     stock: BTreeMap::new(),
//! }]);
//! let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
//! let ctx = PricingContext::new(&catalog, &[], today);
//!
//! let mut terminal = TerminalSession::new("bodega-1", "consumidor-final");
//! let bill_id = terminal.active_bill().id.clone();
//! terminal.add_item(&bill_id, "SKU-1", &ctx).unwrap();
//! terminal.add_item(&bill_id, "SKU-1", &ctx).unwrap();
//!
//! // 80,000 + 19% VAT
//! assert_eq!(terminal.active_bill().total(), Money::from_units(95_200));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bill;
pub mod cash;
pub mod checkout;
pub mod error;
pub mod money;
pub mod payment;
pub mod pricing;
pub mod terminal;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use bill::{reprice, Bill, BillTotals, LineItem};
pub use cash::{can_sell, require_open, session_sales_total, session_summary, SessionSummary};
pub use checkout::{CheckoutContext, InvoiceSink, PaymentRequest};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use payment::{can_confirm, quick_cash_suggestions, reconcile, Settlement};
pub use pricing::{price_line, resolve_promotion, PricingContext, PromotionOutcome};
pub use terminal::TerminalSession;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Colombian VAT (IVA) in basis points: 19%.
pub const VAT_RATE_BPS: u32 = 1900;

/// Customer every new bill is bound to.
pub const WALK_IN_CUSTOMER_ID: &str = "consumidor-final";

pub const WALK_IN_CUSTOMER_NAME: &str = "Consumidor Final";

/// Tab label prefix; tabs are named "Cuenta 1", "Cuenta 2", ...
pub const DEFAULT_BILL_PREFIX: &str = "Cuenta";

/// Maximum distinct lines on one bill
///
/// ## Business Reason
/// Keeps a single sale at a size the register screen and the invoice
/// printout can handle.
pub const MAX_BILL_LINES: usize = 100;

/// Maximum quantity on a single line
///
/// ## Business Reason
/// Catches typing 1000 instead of 10 at the register.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest unit price or cost accepted for a product, in pesos
///
/// ## Business Reason
/// Keeps line and bill totals well inside decimal range: 999 units on each
/// of 100 lines at this price still sums without overflow.
pub const MAX_UNIT_PRICE: i64 = 1_000_000_000;

/// Highest amount accepted as cash received or as an opening float, in pesos
pub const MAX_CASH_AMOUNT: i64 = 10_000_000_000;
