//! # Terminal State
//!
//! The open tabs of this register.
//!
//! ## Thread Safety
//! Wrapped in `Arc<Mutex<T>>`: commands may run concurrently, and every tab
//! operation is a short mutation of the same aggregate. A RwLock would add
//! complexity with minimal benefit.

use std::sync::{Arc, Mutex, PoisonError};

use mostrador_core::TerminalSession;

#[derive(Debug, Clone)]
pub struct TerminalState {
    session: Arc<Mutex<TerminalSession>>,
}

impl TerminalState {
    pub fn new(warehouse_id: &str, default_customer_id: &str) -> Self {
        TerminalState {
            session: Arc::new(Mutex::new(TerminalSession::new(
                warehouse_id,
                default_customer_id,
            ))),
        }
    }

    /// Executes a function with read access to the tabs.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let names = terminal.with_session(|s| s.bills().len());
    /// ```
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&TerminalSession) -> R,
    {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&session)
    }

    /// Executes a function with write access to the tabs.
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut TerminalSession) -> R,
    {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_same_tabs() {
        let state = TerminalState::new("bodega-1", "consumidor-final");
        let other = state.clone();

        state.with_session_mut(|s| {
            s.open_new_bill();
        });

        assert_eq!(other.with_session(|s| s.bills().len()), 2);
    }
}
