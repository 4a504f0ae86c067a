//! # Checkout Orchestrator
//!
//! Converts a priced bill into an immutable [`Invoice`].
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Checkout Flow                                    │
//! │                                                                         │
//! │  Bill ──► empty? ─────────────────────────────► EmptyBill               │
//! │            │                                                            │
//! │            ▼                                                            │
//! │         session open? ────────────────────────► CashSessionClosed       │
//! │            │                                                            │
//! │            ▼                                                            │
//! │         reconcile(total, method, received) ───► TenderRequired /        │
//! │            │                                    InsufficientFunds       │
//! │            ▼                                                            │
//! │         snapshot lines + totals into Invoice                            │
//! │            │                                                            │
//! │            ▼                                                            │
//! │         InvoiceSink::append ──────────────────► InvoiceRejected         │
//! │            │                                                            │
//! │            ▼                                                            │
//! │         Ok(Invoice)   (caller recycles the tab)                         │
//! │                                                                         │
//! │  Any failure leaves the bill, the session and the sink untouched.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::bill::Bill;
use crate::cash::require_open;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::payment::reconcile;
use crate::types::{CashSession, Invoice, InvoiceStatus, PaymentMethod};

/// Prefix of every invoice number ("factura de venta").
pub const INVOICE_NUMBER_PREFIX: &str = "FV";

// =============================================================================
// Invoice Sink
// =============================================================================

/// Where finalized invoices go. The host owns the invoice collection.
///
/// `append` is the only side effect of a checkout. An `Err` aborts the
/// checkout and leaves the bill in place.
pub trait InvoiceSink {
    fn append(&mut self, invoice: Invoice) -> Result<(), String>;
}

impl InvoiceSink for Vec<Invoice> {
    fn append(&mut self, invoice: Invoice) -> Result<(), String> {
        self.push(invoice);
        Ok(())
    }
}

// =============================================================================
// Request & Context
// =============================================================================

/// The operator's payment choice on the checkout screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub method: PaymentMethod,
    /// Cash only.
    pub amount_received: Option<Money>,
}

impl PaymentRequest {
    pub fn cash(received: Money) -> Self {
        PaymentRequest {
            method: PaymentMethod::Cash,
            amount_received: Some(received),
        }
    }

    pub fn method(method: PaymentMethod) -> Self {
        PaymentRequest {
            method,
            amount_received: None,
        }
    }
}

/// Host-supplied facts stamped onto the invoice.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutContext<'a> {
    pub warehouse_id: &'a str,
    pub now: DateTime<Utc>,
    /// Business date of the sale (issue and payment date).
    pub today: NaiveDate,
    /// Per-terminal running number, last block of the invoice number.
    pub sequence: u32,
}

/// Formats `FV-YYMMDD-HHMMSS-NNNN`. The sequence wraps at 10 000.
pub fn invoice_number(now: DateTime<Utc>, sequence: u32) -> String {
    format!(
        "{}-{}-{:04}",
        INVOICE_NUMBER_PREFIX,
        now.format("%y%m%d-%H%M%S"),
        sequence % 10_000
    )
}

// =============================================================================
// Checkout
// =============================================================================

/// Validates and builds the invoice for `bill` without emitting it.
pub fn prepare_invoice(
    bill: &Bill,
    session: Option<&CashSession>,
    payment: &PaymentRequest,
    ctx: &CheckoutContext<'_>,
) -> CoreResult<Invoice> {
    if bill.is_empty() {
        return Err(CoreError::EmptyBill(bill.id.clone()));
    }

    let session = require_open(session)?;

    let total = bill.total();
    let settlement = reconcile(total, payment.method, payment.amount_received)?;

    let payment_date = match settlement.status {
        InvoiceStatus::Paid => Some(ctx.today),
        InvoiceStatus::Pending => None,
    };

    Ok(Invoice {
        id: Uuid::new_v4().to_string(),
        number: invoice_number(ctx.now, ctx.sequence),
        customer_id: bill.customer_id.clone(),
        bill_name: bill.name.clone(),
        items: bill.items.clone(),
        subtotal: bill.subtotal(),
        discount: bill.discount(),
        tax: bill.tax(),
        total,
        payment_method: settlement.method,
        status: settlement.status,
        amount_received: settlement.amount_received,
        change: settlement.change,
        issue_date: ctx.today,
        issued_at: ctx.now,
        payment_date,
        warehouse_id: ctx.warehouse_id.to_string(),
        cash_session_id: session.id.clone(),
    })
}

/// Builds the invoice and hands it to `sink`.
///
/// Returns the emitted invoice. The bill is only borrowed; recycling the tab
/// is the caller's job once this succeeds.
pub fn checkout(
    bill: &Bill,
    session: Option<&CashSession>,
    payment: &PaymentRequest,
    ctx: &CheckoutContext<'_>,
    sink: &mut dyn InvoiceSink,
) -> CoreResult<Invoice> {
    let invoice = prepare_invoice(bill, session, payment, ctx)?;
    sink.append(invoice.clone())
        .map_err(CoreError::InvoiceRejected)?;
    Ok(invoice)
}

// =============================================================================
// Unit Tests
// =============================================================================
