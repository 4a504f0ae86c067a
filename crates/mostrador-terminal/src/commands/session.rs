//! # Cash Session Commands
//!
//! No sale can be confirmed unless a cash session is open. When the screen
//! receives `SESSION_CLOSED` it sends the cashier here.
//!
//! ```text
//! ┌────────────┐  open_session(float)  ┌────────────┐  close_session  ┌────────────┐
//! │  No        │──────────────────────►│   Open     │────────────────►│  Closed    │
//! │  session   │                       │  (selling) │                 │  (summary) │
//! └────────────┘                       └────────────┘                 └─────┬──────┘
//!        ▲                                                                  │
//!        └──────────────────────── next shift ──────────────────────────────┘
//! ```

use mostrador_core::{can_sell, session_summary as summarize, CashSession, CoreError, Money, SessionSummary};
use serde::Serialize;
use tracing::{debug, info};
use ts_rs::TS;

use crate::error::ApiError;
use crate::Terminal;

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    /// Whether sales can be confirmed right now
    pub can_sell: bool,
    pub session: Option<CashSession>,
}

pub fn session_status(terminal: &Terminal) -> SessionStatus {
    debug!("session_status command");
    terminal.drawer.with_session(|session| SessionStatus {
        can_sell: can_sell(session),
        session: session.cloned(),
    })
}

/// Opens a cash session with the counted opening float.
pub fn open_session(terminal: &Terminal, opening_float: Money) -> Result<CashSession, ApiError> {
    debug!(opening_float = %opening_float, "open_session command");

    let session = terminal.drawer.open(
        &terminal.config.terminal.warehouse_id,
        opening_float,
        terminal.clock.now(),
    )?;

    info!(
        session_id = %session.id,
        warehouse_id = %session.warehouse_id,
        opening_float = %session.opening_float,
        "Cash session opened"
    );
    Ok(session)
}

/// Closes the current session and returns its final summary.
pub fn close_session(terminal: &Terminal) -> Result<SessionSummary, ApiError> {
    debug!("close_session command");

    let session = terminal.drawer.close(terminal.clock.now())?;
    let summary = terminal
        .ledger
        .with_ledger(|ledger| summarize(&session, ledger.invoices()));

    info!(
        session_id = %session.id,
        paid_total = %summary.paid_total,
        pending_total = %summary.pending_total,
        expected_cash = %summary.expected_cash,
        "Cash session closed"
    );
    Ok(summary)
}

/// Totals of the current (or just closed) session, derived from the ledger.
pub fn session_summary(terminal: &Terminal) -> Result<SessionSummary, ApiError> {
    debug!("session_summary command");

    let session = terminal
        .drawer
        .current()
        .ok_or(CoreError::CashSessionClosed)?;
    Ok(terminal
        .ledger
        .with_ledger(|ledger| summarize(&session, ledger.invoices())))
}

// =============================================================================
// Unit Tests
// =============================================================================
