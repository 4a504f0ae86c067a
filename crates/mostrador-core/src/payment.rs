//! # Payment Reconciler
//!
//! Turns a bill total plus the operator's payment choice into a settlement
//! (status, amount received, change), or rejects it.
//!
//! ## Settlement Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Payment Reconciliation                             │
//! │                                                                         │
//! │  PaymentMethod ──► settlement class                                     │
//! │                                                                         │
//! │   Immediate (cash, card, pse, nequi, daviplata) ──► status "pagada"     │
//! │   Deferred  (contra entrega, pay point voucher) ──► status "pendiente"  │
//! │                                                                         │
//! │   Cash only:                                                            │
//! │     received missing ───────────────► TenderRequired                    │
//! │     change = received − total                                           │
//! │     change < 0 ─────────────────────► InsufficientFunds                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{InvoiceStatus, PaymentMethod};
use crate::validation::validate_tendered_amount;

/// Standard Colombian peso bills offered as quick-cash buttons.
pub const COP_BILLS: [i64; 7] = [1_000, 2_000, 5_000, 10_000, 20_000, 50_000, 100_000];

/// Most quick-cash buttons ever shown.
const MAX_QUICK_CASH: usize = 4;

// =============================================================================
// Settlement
// =============================================================================

/// Outcome of a successful reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Settlement {
    pub method: PaymentMethod,
    pub status: InvoiceStatus,
    /// Cash only.
    pub amount_received: Option<Money>,
    /// Cash only. Never negative.
    pub change: Option<Money>,
}

/// Reconciles a payment against a bill total.
///
/// `amount_received` is ignored for every method except cash.
///
/// ## Example
/// ```rust
/// use mostrador_core::money::Money;
/// use mostrador_core::payment::reconcile;
/// use mostrador_core::types::{InvoiceStatus, PaymentMethod};
///
/// let settlement = reconcile(
///     Money::from_units(85_680),
///     PaymentMethod::Cash,
///     Some(Money::from_units(100_000)),
/// ).unwrap();
/// assert_eq!(settlement.change, Some(Money::from_units(14_320)));
/// assert_eq!(settlement.status, InvoiceStatus::Paid);
/// ```
pub fn reconcile(
    total: Money,
    method: PaymentMethod,
    amount_received: Option<Money>,
) -> CoreResult<Settlement> {
    if !method.requires_tender() {
        return Ok(Settlement {
            method,
            status: method.resulting_status(),
            amount_received: None,
            change: None,
        });
    }

    let received = amount_received.ok_or(CoreError::TenderRequired)?;
    validate_tendered_amount(received)?;

    let change = received - total;
    if change.is_negative() {
        return Err(CoreError::InsufficientFunds { total, received });
    }

    Ok(Settlement {
        method,
        status: method.resulting_status(),
        amount_received: Some(received),
        change: Some(change),
    })
}

/// Whether the confirm-payment action should be enabled.
pub fn can_confirm(total: Money, method: PaymentMethod, amount_received: Option<Money>) -> bool {
    reconcile(total, method, amount_received).is_ok()
}

// =============================================================================
// Quick Cash
// =============================================================================

/// Suggested tender amounts for the cash screen, ascending, at most four.
///
/// Candidates: the exact total, the next round thousand, the next round ten
/// thousand, and the smallest standard bill that covers the total. Advisory
/// only; nothing else depends on it.
pub fn quick_cash_suggestions(total: Money) -> Vec<Money> {
    if !total.is_positive() {
        return Vec::new();
    }

    let mut suggestions = vec![
        total,
        total.ceil_to_multiple(Money::from_units(1_000)),
        total.ceil_to_multiple(Money::from_units(10_000)),
    ];
    if let Some(bill) = COP_BILLS
        .iter()
        .map(|b| Money::from_units(*b))
        .find(|b| *b >= total)
    {
        suggestions.push(bill);
    }

    suggestions.sort();
    suggestions.dedup();
    suggestions.truncate(MAX_QUICK_CASH);
    suggestions
}

// =============================================================================
// Unit Tests
// =============================================================================
