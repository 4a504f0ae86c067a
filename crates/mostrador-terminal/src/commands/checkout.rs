//! # Checkout Commands
//!
//! Payment modal and invoice emission.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Checkout Flow                                     │
//! │                                                                         │
//! │  Cobrar ──► checkout_preview(bill, payment)     (on every keystroke)    │
//! │               │  totals, quick-cash buttons, change, can_confirm        │
//! │               ▼                                                         │
//! │  Confirmar ─► confirm_payment(bill, payment)                            │
//! │               │                                                         │
//! │               │  1. price a copy (today's promotions)                   │
//! │               │  2. bill not empty?          else EMPTY_BILL            │
//! │               │  3. cash session open?       else SESSION_CLOSED        │
//! │               │  4. tender covers total?     else INSUFFICIENT_FUNDS    │
//! │               │  5. invoice → ledger                                    │
//! │               │  6. tab slot gets a fresh empty bill                    │
//! │               ▼                                                         │
//! │            Receipt { invoice, next bill }                               │
//! │                                                                         │
//! │  Any rejection leaves the bill, the session and the ledger untouched.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use mostrador_core::validation::validate_tendered_amount;
use mostrador_core::{
    can_confirm, can_sell, quick_cash_suggestions, BillTotals, Invoice, Money, PaymentMethod,
    PaymentRequest, SettlementClass,
};
use serde::Serialize;
use tracing::{debug, info, warn};
use ts_rs::TS;

use super::{warn_orphan_lines, BillView};
use crate::error::ApiError;
use crate::Terminal;

/// One payment method button in the modal.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOption {
    pub method: PaymentMethod,
    pub label: String,
    /// Whether the cashier must type the amount received
    pub requires_tender: bool,
    /// Whether the invoice stays pending until collected
    pub deferred: bool,
}

/// State of the payment modal for the entered payment.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPreview {
    pub bill_id: String,
    pub totals: BillTotals,
    pub methods: Vec<PaymentOption>,
    /// Quick-cash buttons (empty for an empty bill)
    pub quick_cash: Vec<Money>,
    /// Received minus total; negative while the tender falls short
    pub change: Option<Money>,
    pub session_open: bool,
    pub can_confirm: bool,
}

/// Result of a confirmed payment.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub invoice: Invoice,
    /// The fresh bill now occupying the paid tab
    pub next_bill: BillView,
}

/// Computes what the payment modal shows. Changes nothing.
pub fn checkout_preview(
    terminal: &Terminal,
    bill_id: &str,
    payment: &PaymentRequest,
) -> Result<CheckoutPreview, ApiError> {
    debug!(bill_id = %bill_id, method = %payment.method, "checkout_preview command");

    let totals = terminal.with_pricing(|_, ctx| {
        terminal.tabs.with_session(|s| {
            let bill = s
                .bill(bill_id)
                .ok_or_else(|| ApiError::not_found("Bill", bill_id))?;
            Ok::<_, ApiError>(BillTotals::from(&mostrador_core::reprice(bill, ctx)))
        })
    })?;
    let session_open = terminal.drawer.with_session(can_sell);

    let change = match (payment.method.requires_tender(), payment.amount_received) {
        (true, Some(received)) if validate_tendered_amount(received).is_ok() => {
            Some(received - totals.total)
        }
        _ => None,
    };
    let confirmable = session_open
        && totals.item_count > 0
        && can_confirm(totals.total, payment.method, payment.amount_received);

    Ok(CheckoutPreview {
        bill_id: bill_id.to_string(),
        quick_cash: quick_cash_suggestions(totals.total),
        totals,
        methods: payment_options(),
        change,
        session_open,
        can_confirm: confirmable,
    })
}

/// Finalizes a bill into an invoice.
///
/// ## Errors
/// - `NOT_FOUND`: unknown bill
/// - `EMPTY_BILL`: nothing to charge
/// - `SESSION_CLOSED`: no open cash session
/// - `VALIDATION_ERROR`: cash without an amount received
/// - `INSUFFICIENT_FUNDS`: cash received below the total
pub fn confirm_payment(
    terminal: &Terminal,
    bill_id: &str,
    payment: &PaymentRequest,
) -> Result<Receipt, ApiError> {
    debug!(bill_id = %bill_id, method = %payment.method, "confirm_payment command");

    let now = terminal.clock.now();

    // Lock order: catalog → drawer → ledger → tabs
    let result = terminal.with_pricing(|_, ctx| {
        terminal.drawer.with_session(|session| {
            terminal.ledger.with_ledger_mut(|ledger| {
                terminal.tabs.with_session_mut(|s| {
                    let slot = s
                        .bills()
                        .iter()
                        .position(|b| b.id == bill_id)
                        .ok_or_else(|| ApiError::not_found("Bill", bill_id))?;
                    warn_orphan_lines(&s.bills()[slot], ctx);

                    let invoice = s.checkout(bill_id, session, payment, ctx, now, ledger)?;

                    Ok::<_, ApiError>(Receipt {
                        invoice,
                        next_bill: BillView::from(&s.bills()[slot]),
                    })
                })
            })
        })
    });

    let receipt = match result {
        Ok(receipt) => receipt,
        Err(e) => {
            warn!(bill_id = %bill_id, code = ?e.code, error = %e.message, "Checkout rejected");
            return Err(e);
        }
    };

    let invoice = &receipt.invoice;
    info!(
        invoice_number = %invoice.number,
        bill_id = %bill_id,
        total = %invoice.total,
        method = %invoice.payment_method,
        status = ?invoice.status,
        change = ?invoice.change.map(|c| c.to_string()),
        "Invoice finalized"
    );

    terminal.notify_upsell(&receipt.next_bill.bill);
    Ok(receipt)
}

fn payment_options() -> Vec<PaymentOption> {
    PaymentMethod::ALL
        .iter()
        .map(|method| PaymentOption {
            method: *method,
            label: method.to_string(),
            requires_tender: method.requires_tender(),
            deferred: method.settlement() == SettlementClass::Deferred,
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
