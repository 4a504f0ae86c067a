//! # Cash Drawer State
//!
//! The current cash session of this register, if any.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use mostrador_core::{CashSession, CoreError, CoreResult, Money};

#[derive(Debug, Clone, Default)]
pub struct CashDrawerState {
    current: Arc<Mutex<Option<CashSession>>>,
}

impl CashDrawerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session. Fails while another session is still open.
    pub fn open(
        &self,
        warehouse_id: &str,
        opening_float: Money,
        now: DateTime<Utc>,
    ) -> CoreResult<CashSession> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(session) = current.as_ref().filter(|s| s.is_open()) {
            return Err(CoreError::InvalidSessionState {
                session_id: session.id.clone(),
                state: "open".to_string(),
            });
        }

        let session = CashSession::open(warehouse_id, opening_float, now)?;
        *current = Some(session.clone());
        Ok(session)
    }

    /// Closes the current session and returns it.
    pub fn close(&self, now: DateTime<Utc>) -> CoreResult<CashSession> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        let session = current.as_mut().ok_or(CoreError::CashSessionClosed)?;
        session.close(now)?;
        Ok(session.clone())
    }

    /// Executes a function with the current session (open or closed).
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(Option<&CashSession>) -> R,
    {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        f(current.as_ref())
    }

    pub fn current(&self) -> Option<CashSession> {
        self.with_session(|s| s.cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mostrador_core::can_sell;

    #[test]
    fn test_open_close_cycle() {
        let drawer = CashDrawerState::new();
        assert!(!drawer.with_session(can_sell));

        let opened = drawer
            .open("bodega-1", Money::from_units(200_000), Utc::now())
            .unwrap();
        assert!(drawer.with_session(can_sell));

        let err = drawer
            .open("bodega-1", Money::zero(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidSessionState { .. }));

        let closed = drawer.close(Utc::now()).unwrap();
        assert_eq!(closed.id, opened.id);
        assert!(!drawer.with_session(can_sell));

        // A new shift can start once the previous one is closed.
        let reopened = drawer.open("bodega-1", Money::zero(), Utc::now()).unwrap();
        assert_ne!(reopened.id, opened.id);
    }

    #[test]
    fn test_close_without_session() {
        let drawer = CashDrawerState::new();
        assert_eq!(
            drawer.close(Utc::now()).unwrap_err(),
            CoreError::CashSessionClosed
        );
    }
}
