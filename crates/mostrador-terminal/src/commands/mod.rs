//! # Commands Module
//!
//! Every operation the POS screen can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (shared views)
//! ├── tabs.rs      ◄─── open_tab, close_tab, select_tab, list_tabs
//! ├── bill.rs      ◄─── add_item, update_quantity, remove_item, change_customer
//! ├── catalog.rs   ◄─── browse_catalog, search_catalog
//! ├── session.rs   ◄─── open_session, close_session, session_summary
//! └── checkout.rs  ◄─── checkout_preview, confirm_payment
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  POS screen event                                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  commands::bill::add_item(&terminal, bill_id, product_id)               │
//! │         │                                                               │
//! │         │  1. debug! on entry                                           │
//! │         │  2. lock state in order (catalog → drawer → ledger → tabs)    │
//! │         │  3. delegate to mostrador-core                                │
//! │         │  4. CoreError → ApiError                                      │
//! │         ▼                                                               │
//! │  Result<BillView, ApiError>  (serde JSON, ts-rs types for the screen)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands are synchronous: every one of them is a short in-memory
//! mutation. The only async work (upsell) runs behind a channel.

pub mod bill;
pub mod catalog;
pub mod checkout;
pub mod session;
pub mod tabs;

use mostrador_core::{Bill, BillTotals, PricingContext};
use serde::Serialize;
use tracing::warn;
use ts_rs::TS;

/// A bill with its totals, as the screen renders it.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BillView {
    pub bill: Bill,
    pub totals: BillTotals,
}

impl From<&Bill> for BillView {
    fn from(bill: &Bill) -> Self {
        BillView {
            bill: bill.clone(),
            totals: BillTotals::from(bill),
        }
    }
}

/// Logs lines whose product is no longer in the catalog.
///
/// Such lines keep their captured price and get no promotion.
pub(crate) fn warn_orphan_lines(bill: &Bill, ctx: &PricingContext<'_>) {
    for line in &bill.items {
        if ctx.catalog.get(&line.product_id).is_none() {
            warn!(
                bill_id = %bill.id,
                product_id = %line.product_id,
                "Line priced without catalog entry"
            );
        }
    }
}

// =============================================================================
// Test Fixtures
// =============================================================================
