//! # Tab Commands
//!
//! Several customers can be served at once; each gets a tab ("Cuenta N").
//!
//! ```text
//! ┌──────────┬──────────┬──────────┬─────┐
//! │ Cuenta 1 │ Cuenta 2 │ Cuenta 4 │  +  │   ◄── open_tab
//! └──────────┴────▲─────┴──────────┴─────┘
//!                 │
//!            select_tab          close_tab (asks first if it has lines)
//! ```

use mostrador_core::Money;
use serde::Serialize;
use tracing::{debug, info};
use ts_rs::TS;

use super::BillView;
use crate::error::ApiError;
use crate::Terminal;

/// One tab in the tab strip.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TabSummary {
    pub bill_id: String,
    pub name: String,
    pub item_count: usize,
    pub total: Money,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TabsView {
    pub tabs: Vec<TabSummary>,
    pub active: BillView,
}

/// Lists the open tabs and the active bill.
pub fn list_tabs(terminal: &Terminal) -> TabsView {
    debug!("list_tabs command");
    snapshot(terminal)
}

/// Opens a new empty tab and makes it active.
pub fn open_tab(terminal: &Terminal) -> TabsView {
    debug!("open_tab command");
    let (bill_id, name) = terminal.tabs.with_session_mut(|s| {
        let bill = s.open_new_bill();
        (bill.id.clone(), bill.name.clone())
    });
    info!(bill_id = %bill_id, name = %name, "Tab opened");

    let view = snapshot(terminal);
    terminal.notify_upsell(&view.active.bill);
    view
}

/// Switches the active tab.
pub fn select_tab(terminal: &Terminal, bill_id: &str) -> Result<TabsView, ApiError> {
    debug!(bill_id = %bill_id, "select_tab command");
    terminal.tabs.with_session_mut(|s| s.select_bill(bill_id))?;

    let view = snapshot(terminal);
    terminal.notify_upsell(&view.active.bill);
    Ok(view)
}

/// Closes a tab.
///
/// A tab with lines is only discarded when `confirmed` is set; otherwise the
/// screen gets `CONFIRMATION_REQUIRED` and should ask the cashier. Closing
/// the last tab leaves a fresh empty one.
pub fn close_tab(terminal: &Terminal, bill_id: &str, confirmed: bool) -> Result<TabsView, ApiError> {
    debug!(bill_id = %bill_id, confirmed, "close_tab command");
    terminal
        .tabs
        .with_session_mut(|s| s.close_bill(bill_id, confirmed))?;
    info!(bill_id = %bill_id, "Tab closed");

    let view = snapshot(terminal);
    terminal.notify_upsell(&view.active.bill);
    Ok(view)
}

fn snapshot(terminal: &Terminal) -> TabsView {
    terminal.tabs.with_session(|s| {
        let active_id = &s.active_bill().id;
        TabsView {
            tabs: s
                .bills()
                .iter()
                .map(|b| TabSummary {
                    bill_id: b.id.clone(),
                    name: b.name.clone(),
                    item_count: b.item_count(),
                    total: b.total(),
                    active: &b.id == active_id,
                })
                .collect(),
            active: BillView::from(s.active_bill()),
        }
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::bill::add_item;
    use crate::commands::fixtures::{active_bill_id, terminal};
    use crate::error::ErrorCode;
    use crate::upsell::{UpsellAdvisor, UpsellHint, UpsellRequest};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct NoHints;

    #[async_trait]
    impl UpsellAdvisor for NoHints {
        async fn suggest(&self, _request: &UpsellRequest) -> Result<Vec<UpsellHint>, String> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_open_and_list_tabs() {
        let terminal = terminal();
        let view = open_tab(&terminal);

        let names: Vec<_> = view.tabs.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Cuenta 1", "Cuenta 2"]);
        assert!(view.tabs[1].active);
        assert_eq!(view.active.bill.name, "Cuenta 2");
        assert_eq!(list_tabs(&terminal), view);
    }

    #[test]
    fn test_select_tab() {
        let terminal = terminal();
        let first = active_bill_id(&terminal);
        open_tab(&terminal);

        let view = select_tab(&terminal, &first).unwrap();
        assert_eq!(view.active.bill.id, first);
        assert!(view.tabs[0].active);

        let err = select_tab(&terminal, "nope").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_close_tab_with_lines_needs_confirmation() {
        let terminal = terminal();
        let bill_id = active_bill_id(&terminal);
        add_item(&terminal, &bill_id, "SKU-1").unwrap();

        let err = close_tab(&terminal, &bill_id, false).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfirmationRequired);

        let view = close_tab(&terminal, &bill_id, true).unwrap();
        assert_eq!(view.tabs.len(), 1);
        assert_ne!(view.active.bill.id, bill_id);
        assert!(view.active.bill.is_empty());
    }

    #[test]
    fn test_closing_other_tab_keeps_active() {
        let terminal = terminal();
        let first = active_bill_id(&terminal);
        let second = open_tab(&terminal).active.bill.id;
        let third = open_tab(&terminal).active.bill.id;

        let view = close_tab(&terminal, &first, false).unwrap();
        assert_eq!(view.active.bill.id, third);

        let view = close_tab(&terminal, &third, false).unwrap();
        assert_eq!(view.active.bill.id, second);
    }

    #[tokio::test]
    async fn test_tab_changes_notify_upsell() {
        let mut terminal = terminal();
        let (task, _updates) = terminal.start_upsell(Arc::new(NoHints)).unwrap();
        let revision = |t: &Terminal| t.upsell().map(|h| h.current_revision());
        assert_eq!(revision(&terminal), Some(0));

        let second = open_tab(&terminal).active.bill.id;
        assert_eq!(revision(&terminal), Some(1));

        close_tab(&terminal, &second, false).unwrap();
        assert_eq!(revision(&terminal), Some(2));

        let err = close_tab(&terminal, "missing", false).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(revision(&terminal), Some(2));

        terminal.shutdown();
        task.await.unwrap();
    }
}
