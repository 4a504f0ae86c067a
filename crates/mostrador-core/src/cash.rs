//! # Cash Session Gate
//!
//! Sales are only finalized while the terminal's cash drawer is open.
//!
//! ```text
//!        open(float)                 close()
//!  ───────────────────► [ Open ] ───────────────────► [ Closed ]
//!                          │
//!                          │ can_sell() == true
//!                          ▼
//!                  checkout allowed; invoices carry the session id
//! ```
//!
//! Session totals are never stored on the session. They are always derived
//! from the invoice collection, so they cannot drift from what was sold.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CashSession, CashSessionStatus, Invoice, InvoiceStatus, PaymentMethod};
use crate::validation::{validate_cash_amount, validate_identifier};

// =============================================================================
// Session Lifecycle
// =============================================================================

impl CashSession {
    /// Opens a new session for `warehouse_id` with the counted opening float.
    pub fn open(
        warehouse_id: &str,
        opening_float: Money,
        now: DateTime<Utc>,
    ) -> CoreResult<CashSession> {
        validate_identifier("warehouse id", warehouse_id)?;
        validate_cash_amount("opening float", opening_float)?;

        Ok(CashSession {
            id: Uuid::new_v4().to_string(),
            warehouse_id: warehouse_id.to_string(),
            status: CashSessionStatus::Open,
            opening_float,
            opened_at: now,
            closed_at: None,
        })
    }

    /// Closes the session. A closed session never reopens.
    pub fn close(&mut self, now: DateTime<Utc>) -> CoreResult<()> {
        if !self.is_open() {
            return Err(CoreError::InvalidSessionState {
                session_id: self.id.clone(),
                state: "closed".to_string(),
            });
        }
        self.status = CashSessionStatus::Closed;
        self.closed_at = Some(now);
        Ok(())
    }
}

// =============================================================================
// Gate
// =============================================================================

/// Whether a sale may be finalized right now.
pub fn can_sell(session: Option<&CashSession>) -> bool {
    session.map(CashSession::is_open).unwrap_or(false)
}

/// Returns the session when it is open, `CashSessionClosed` otherwise.
pub fn require_open(session: Option<&CashSession>) -> CoreResult<&CashSession> {
    match session {
        Some(s) if s.is_open() => Ok(s),
        _ => Err(CoreError::CashSessionClosed),
    }
}

/// Sum of paid invoice totals recorded against `session_id`.
pub fn session_sales_total(session_id: &str, invoices: &[Invoice]) -> Money {
    invoices
        .iter()
        .filter(|i| i.cash_session_id == session_id && i.status == InvoiceStatus::Paid)
        .map(|i| i.total)
        .sum()
}

// =============================================================================
// Session Summary
// =============================================================================

/// Paid sales for one payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MethodTotal {
    pub method: PaymentMethod,
    pub count: usize,
    pub total: Money,
}

/// Shift report for the cash-closing screen. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub status: CashSessionStatus,
    pub opening_float: Money,
    pub paid_count: usize,
    pub paid_total: Money,
    pub pending_count: usize,
    pub pending_total: Money,
    /// Paid totals per method, in `PaymentMethod::ALL` order; unused methods omitted.
    pub by_method: Vec<MethodTotal>,
    /// Cash that should be in the drawer: opening float plus paid cash sales.
    pub expected_cash: Money,
}

pub fn session_summary(session: &CashSession, invoices: &[Invoice]) -> SessionSummary {
    let mine: Vec<&Invoice> = invoices
        .iter()
        .filter(|i| i.cash_session_id == session.id)
        .collect();

    let (paid, pending): (Vec<&Invoice>, Vec<&Invoice>) =
        mine.into_iter().partition(|i| i.is_paid());

    let by_method: Vec<MethodTotal> = PaymentMethod::ALL
        .iter()
        .filter_map(|method| {
            let matching: Vec<&&Invoice> =
                paid.iter().filter(|i| i.payment_method == *method).collect();
            if matching.is_empty() {
                return None;
            }
            Some(MethodTotal {
                method: *method,
                count: matching.len(),
                total: matching.iter().map(|i| i.total).sum(),
            })
        })
        .collect();

    let cash_sales: Money = by_method
        .iter()
        .filter(|m| m.method == PaymentMethod::Cash)
        .map(|m| m.total)
        .sum();

    SessionSummary {
        session_id: session.id.clone(),
        status: session.status,
        opening_float: session.opening_float,
        paid_count: paid.len(),
        paid_total: paid.iter().map(|i| i.total).sum(),
        pending_count: pending.len(),
        pending_total: pending.iter().map(|i| i.total).sum(),
        by_method,
        expected_cash: session.opening_float + cash_sales,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
