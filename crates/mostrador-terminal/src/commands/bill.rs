//! # Bill Commands
//!
//! Line edits on a tab. Every edit reprices the bill against the current
//! catalog and promotions before the view is returned.
//!
//! ## Line Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  add_item ──► line (qty 1) ──► add_item again ──► qty + 1               │
//! │                    │                                                    │
//! │                    ├── update_quantity(n)   n in 1..=999                │
//! │                    ├── update_quantity(0)   line removed                │
//! │                    └── remove_item          line removed                │
//! │                                                                         │
//! │  after each edit: price_line for every line, totals re-summed           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use super::{warn_orphan_lines, BillView};
use crate::error::ApiError;
use crate::Terminal;

/// Gets the active bill.
pub fn active_bill(terminal: &Terminal) -> BillView {
    debug!("active_bill command");
    terminal.tabs.with_session(|s| BillView::from(s.active_bill()))
}

/// Adds one unit of a product to the bill.
///
/// ## Behavior
/// - Product already on the bill: quantity increases by one
/// - Otherwise: appended as a new line at the catalog price
/// - Fails with `BILL_ERROR` once the bill holds 100 lines
pub fn add_item(terminal: &Terminal, bill_id: &str, product_id: &str) -> Result<BillView, ApiError> {
    debug!(bill_id = %bill_id, product_id = %product_id, "add_item command");

    let view = terminal.with_pricing(|_, ctx| {
        terminal.tabs.with_session_mut(|s| {
            let bill = s.add_item(bill_id, product_id, ctx)?;
            warn_orphan_lines(bill, ctx);
            Ok::<_, ApiError>(BillView::from(bill))
        })
    })?;

    terminal.notify_upsell(&view.bill);
    Ok(view)
}

/// Sets the quantity of a line. Zero or less removes it.
pub fn update_quantity(
    terminal: &Terminal,
    bill_id: &str,
    product_id: &str,
    quantity: i64,
) -> Result<BillView, ApiError> {
    debug!(bill_id = %bill_id, product_id = %product_id, quantity, "update_quantity command");

    let view = terminal.with_pricing(|_, ctx| {
        terminal.tabs.with_session_mut(|s| {
            let bill = s.update_quantity(bill_id, product_id, quantity, ctx)?;
            warn_orphan_lines(bill, ctx);
            Ok::<_, ApiError>(BillView::from(bill))
        })
    })?;

    terminal.notify_upsell(&view.bill);
    Ok(view)
}

pub fn remove_item(terminal: &Terminal, bill_id: &str, product_id: &str) -> Result<BillView, ApiError> {
    debug!(bill_id = %bill_id, product_id = %product_id, "remove_item command");

    let view = terminal.tabs.with_session_mut(|s| {
        s.remove_item(bill_id, product_id)
            .map(BillView::from)
            .map_err(ApiError::from)
    })?;

    terminal.notify_upsell(&view.bill);
    Ok(view)
}

/// Changes the customer on a bill.
///
/// When the host supplied a customer list the id must be on it; the
/// configured default customer is always accepted.
pub fn change_customer(
    terminal: &Terminal,
    bill_id: &str,
    customer_id: &str,
) -> Result<BillView, ApiError> {
    debug!(bill_id = %bill_id, customer_id = %customer_id, "change_customer command");

    let known = terminal.catalog.with_data(|data| {
        data.customers.is_empty()
            || data.customer(customer_id).is_some()
            || customer_id == terminal.config.customer.default_customer_id
    });
    if !known {
        return Err(ApiError::not_found("Customer", customer_id));
    }

    terminal.tabs.with_session_mut(|s| {
        s.set_customer(bill_id, customer_id)
            .map(BillView::from)
            .map_err(ApiError::from)
    })
}

/// Reprices one tab against today's catalog and promotions.
pub fn reprice_bill(terminal: &Terminal, bill_id: &str) -> Result<BillView, ApiError> {
    debug!(bill_id = %bill_id, "reprice_bill command");

    terminal.with_pricing(|_, ctx| {
        terminal.tabs.with_session_mut(|s| {
            let bill = s.reprice_bill(bill_id, ctx)?;
            warn_orphan_lines(bill, ctx);
            Ok::<_, ApiError>(BillView::from(bill))
        })
    })
}

/// Reprices every open tab, e.g. after the host replaced the promotions.
pub fn reprice_all(terminal: &Terminal) -> BillView {
    debug!("reprice_all command");

    terminal.with_pricing(|_, ctx| {
        terminal.tabs.with_session_mut(|s| {
            s.reprice_all(ctx);
            for bill in s.bills() {
                warn_orphan_lines(bill, ctx);
            }
            BillView::from(s.active_bill())
        })
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
