//! # Ledger State
//!
//! In-memory invoice collection: the runtime's `InvoiceSink`.
//!
//! Persistent storage belongs to the host. The ledger keeps the invoices of
//! this run so session totals can be derived from them.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use mostrador_core::{Invoice, InvoiceSink};

/// Append-only invoice list with unique invoice ids and numbers.
#[derive(Debug, Clone, Default)]
pub struct InvoiceLedger {
    invoices: Vec<Invoice>,
    numbers: HashSet<String>,
}

impl InvoiceLedger {
    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }

    pub fn get(&self, invoice_id: &str) -> Option<&Invoice> {
        self.invoices.iter().find(|i| i.id == invoice_id)
    }
}

impl InvoiceSink for InvoiceLedger {
    fn append(&mut self, invoice: Invoice) -> Result<(), String> {
        if self.numbers.contains(&invoice.number) {
            return Err(format!("invoice number {} already recorded", invoice.number));
        }
        if self.get(&invoice.id).is_some() {
            return Err(format!("invoice {} already recorded", invoice.id));
        }
        self.numbers.insert(invoice.number.clone());
        self.invoices.push(invoice);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct LedgerState {
    ledger: Arc<Mutex<InvoiceLedger>>,
}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ledger<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&InvoiceLedger) -> R,
    {
        let ledger = self.ledger.lock().unwrap_or_else(PoisonError::into_inner);
        f(&ledger)
    }

    pub fn with_ledger_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut InvoiceLedger) -> R,
    {
        let mut ledger = self.ledger.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use mostrador_core::{InvoiceStatus, Money, PaymentMethod};

    fn invoice(id: &str, number: &str) -> Invoice {
        Invoice {
            id: id.into(),
            number: number.into(),
            customer_id: "consumidor-final".into(),
            bill_name: "Cuenta 1".into(),
            items: Vec::new(),
            subtotal: Money::from_units(1_000),
            discount: Money::zero(),
            tax: Money::from_units(190),
            total: Money::from_units(1_190),
            payment_method: PaymentMethod::Card,
            status: InvoiceStatus::Paid,
            amount_received: None,
            change: None,
            issue_date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            issued_at: Utc::now(),
            payment_date: None,
            warehouse_id: "bodega-1".into(),
            cash_session_id: "s1".into(),
        }
    }

    #[test]
    fn test_append_and_lookup() {
        let mut ledger = InvoiceLedger::default();
        ledger.append(invoice("i1", "FV-1")).unwrap();

        assert_eq!(ledger.len(), 1);
        assert!(ledger.get("i1").is_some());
    }

    #[test]
    fn test_duplicate_number_rejected() {
        let mut ledger = InvoiceLedger::default();
        ledger.append(invoice("i1", "FV-1")).unwrap();

        let err = ledger.append(invoice("i2", "FV-1")).unwrap_err();
        assert!(err.contains("FV-1"));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_state_shares_ledger() {
        let state = LedgerState::new();
        let other = state.clone();
        state
            .with_ledger_mut(|l| l.append(invoice("i1", "FV-1")))
            .unwrap();
        assert_eq!(other.with_ledger(|l| l.len()), 1);
    }
}
