//! # Terminal Session
//!
//! The set of open bills (tabs) on one terminal and the active-tab pointer.
//!
//! ## Tab Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tab Manager                                      │
//! │                                                                         │
//! │   [ Cuenta 1 ] [ Cuenta 2 ]* [ Cuenta 4 ]        * = active             │
//! │                                                                         │
//! │   open_new_bill()   → appends "Cuenta N" (N never reused), activates it │
//! │   select_bill(id)   → moves the pointer; never reprices                 │
//! │   close_bill(id)    → items require confirmation;                      │
//! │                       closing the active tab falls back one slot;       │
//! │                       closing the last tab leaves a fresh one           │
//! │   checkout(id, ..)  → invoice emitted, tab slot gets a fresh bill       │
//! │                                                                         │
//! │   There is always exactly one active bill.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};

use crate::bill::{reprice, Bill};
use crate::checkout::{self, CheckoutContext, InvoiceSink, PaymentRequest};
use crate::error::{CoreError, CoreResult};
use crate::pricing::PricingContext;
use crate::types::{CashSession, Invoice};
use crate::validation::validate_identifier;
use crate::DEFAULT_BILL_PREFIX;

/// Open bills on one terminal.
#[derive(Debug, Clone)]
pub struct TerminalSession {
    bills: Vec<Bill>,
    active: usize,
    next_tab_number: u32,
    next_invoice_sequence: u32,
    warehouse_id: String,
    default_customer_id: String,
}

impl TerminalSession {
    /// Starts with a single empty "Cuenta 1".
    pub fn new(warehouse_id: impl Into<String>, default_customer_id: impl Into<String>) -> Self {
        let mut session = TerminalSession {
            bills: Vec::new(),
            active: 0,
            next_tab_number: 1,
            next_invoice_sequence: 1,
            warehouse_id: warehouse_id.into(),
            default_customer_id: default_customer_id.into(),
        };
        let first = session.fresh_bill();
        session.bills.push(first);
        session
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn bills(&self) -> &[Bill] {
        &self.bills
    }

    pub fn bill(&self, bill_id: &str) -> Option<&Bill> {
        self.bills.iter().find(|b| b.id == bill_id)
    }

    pub fn active_bill(&self) -> &Bill {
        &self.bills[self.active]
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn warehouse_id(&self) -> &str {
        &self.warehouse_id
    }

    pub fn default_customer_id(&self) -> &str {
        &self.default_customer_id
    }

    // =========================================================================
    // Tabs
    // =========================================================================

    /// Appends a new empty bill and makes it active.
    pub fn open_new_bill(&mut self) -> &Bill {
        let bill = self.fresh_bill();
        self.bills.push(bill);
        self.active = self.bills.len() - 1;
        &self.bills[self.active]
    }

    pub fn select_bill(&mut self, bill_id: &str) -> CoreResult<()> {
        self.active = self.index_of(bill_id)?;
        Ok(())
    }

    /// Closes a tab. A bill with lines is only discarded when `confirmed`.
    pub fn close_bill(&mut self, bill_id: &str, confirmed: bool) -> CoreResult<()> {
        let index = self.index_of(bill_id)?;
        let items = self.bills[index].item_count();
        if items > 0 && !confirmed {
            return Err(CoreError::CloseNotConfirmed {
                bill_id: bill_id.to_string(),
                items,
            });
        }

        self.bills.remove(index);

        if self.bills.is_empty() {
            let bill = self.fresh_bill();
            self.bills.push(bill);
            self.active = 0;
        } else if index == self.active {
            self.active = index.saturating_sub(1);
        } else if index < self.active {
            self.active -= 1;
        }
        self.active = self.active.min(self.bills.len() - 1);

        Ok(())
    }

    // =========================================================================
    // Lines
    // =========================================================================

    /// Adds one unit of a catalog product to the bill.
    pub fn add_item(
        &mut self,
        bill_id: &str,
        product_id: &str,
        ctx: &PricingContext<'_>,
    ) -> CoreResult<&Bill> {
        let product = ctx
            .catalog
            .get(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;
        let bill = self.bill_mut(bill_id)?;
        bill.add_product(product, ctx)?;
        Ok(bill)
    }

    pub fn update_quantity(
        &mut self,
        bill_id: &str,
        product_id: &str,
        quantity: i64,
        ctx: &PricingContext<'_>,
    ) -> CoreResult<&Bill> {
        let bill = self.bill_mut(bill_id)?;
        bill.update_quantity(product_id, quantity, ctx)?;
        Ok(bill)
    }

    /// Removes a line. Removing an absent line is not an error.
    pub fn remove_item(&mut self, bill_id: &str, product_id: &str) -> CoreResult<&Bill> {
        let bill = self.bill_mut(bill_id)?;
        bill.remove_item(product_id);
        Ok(bill)
    }

    pub fn set_customer(&mut self, bill_id: &str, customer_id: &str) -> CoreResult<&Bill> {
        validate_identifier("customer id", customer_id)?;
        let bill = self.bill_mut(bill_id)?;
        bill.set_customer(customer_id);
        Ok(bill)
    }

    /// Reprices one bill, e.g. after the host swapped the promotion list.
    pub fn reprice_bill(&mut self, bill_id: &str, ctx: &PricingContext<'_>) -> CoreResult<&Bill> {
        let bill = self.bill_mut(bill_id)?;
        bill.reprice_with(ctx);
        Ok(bill)
    }

    pub fn reprice_all(&mut self, ctx: &PricingContext<'_>) {
        for bill in &mut self.bills {
            bill.reprice_with(ctx);
        }
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Finalizes a bill and recycles its tab slot.
    ///
    /// The invoice is built from a copy of the bill priced against `pricing`;
    /// the stored bill is never repriced here. On success the invoice has been
    /// appended to `sink` and the slot holds a fresh empty bill with the same
    /// name and the default customer. On any error nothing changes.
    pub fn checkout(
        &mut self,
        bill_id: &str,
        session: Option<&CashSession>,
        payment: &PaymentRequest,
        pricing: &PricingContext<'_>,
        now: DateTime<Utc>,
        sink: &mut dyn InvoiceSink,
    ) -> CoreResult<Invoice> {
        let index = self.index_of(bill_id)?;
        let priced = reprice(&self.bills[index], pricing);
        let ctx = CheckoutContext {
            warehouse_id: &self.warehouse_id,
            now,
            today: pricing.today,
            sequence: self.next_invoice_sequence,
        };

        let invoice = checkout::checkout(&priced, session, payment, &ctx, sink)?;

        self.next_invoice_sequence = self.next_invoice_sequence.wrapping_add(1);
        let name = self.bills[index].name.clone();
        self.bills[index] = Bill::new(name, self.default_customer_id.clone());

        Ok(invoice)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn fresh_bill(&mut self) -> Bill {
        let name = format!("{} {}", DEFAULT_BILL_PREFIX, self.next_tab_number);
        self.next_tab_number += 1;
        Bill::new(name, self.default_customer_id.clone())
    }

    fn index_of(&self, bill_id: &str) -> CoreResult<usize> {
        self.bills
            .iter()
            .position(|b| b.id == bill_id)
            .ok_or_else(|| CoreError::BillNotFound(bill_id.to_string()))
    }

    fn bill_mut(&mut self, bill_id: &str) -> CoreResult<&mut Bill> {
        self.bills
            .iter_mut()
            .find(|b| b.id == bill_id)
            .ok_or_else(|| CoreError::BillNotFound(bill_id.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{
        Catalog, DiscountKind, InvoiceStatus, PaymentMethod, Product, Promotion, TargetKind,
    };
    use crate::WALK_IN_CUSTOMER_ID;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::collections::BTreeMap;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-16T10:15:30Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn catalog() -> Catalog {
        Catalog::new([Product {
            id: "SKU-1".into(),
            name: "Shampoo 1L".into(),
            unit_price: Money::from_units(40_000),
            unit_cost: Money::from_units(25_000),
            category: "aseo".into(),
            stock: BTreeMap::from([("bodega-1".to_string(), 10)]),
        }])
    }

    fn ten_percent_aseo() -> Promotion {
        Promotion {
            id: "p10".into(),
            name: "10% aseo".into(),
            target_kind: TargetKind::Category,
            target_value: "aseo".into(),
            discount_kind: DiscountKind::Percentage,
            discount_value: Decimal::from(10),
            starts_on: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            ends_on: NaiveDate::from_ymd_opt(2026, 10, 31).unwrap(),
        }
    }

    fn terminal() -> TerminalSession {
        TerminalSession::new("bodega-1", WALK_IN_CUSTOMER_ID)
    }

    fn names(t: &TerminalSession) -> Vec<&str> {
        t.bills().iter().map(|b| b.name.as_str()).collect()
    }

    #[test]
    fn test_starts_with_one_active_bill() {
        let t = terminal();
        assert_eq!(names(&t), vec!["Cuenta 1"]);
        assert_eq!(t.active_index(), 0);
        assert_eq!(t.active_bill().customer_id, WALK_IN_CUSTOMER_ID);
    }

    #[test]
    fn test_open_new_bill_activates_it() {
        let mut t = terminal();
        let id = t.open_new_bill().id.clone();
        assert_eq!(names(&t), vec!["Cuenta 1", "Cuenta 2"]);
        assert_eq!(t.active_bill().id, id);
    }

    #[test]
    fn test_tab_numbers_are_never_reused() {
        let mut t = terminal();
        let second = t.open_new_bill().id.clone();
        t.open_new_bill();
        t.close_bill(&second, false).unwrap();
        t.open_new_bill();
        assert_eq!(names(&t), vec!["Cuenta 1", "Cuenta 3", "Cuenta 4"]);
    }

    #[test]
    fn test_select_bill() {
        let mut t = terminal();
        let first = t.active_bill().id.clone();
        t.open_new_bill();

        t.select_bill(&first).unwrap();
        assert_eq!(t.active_bill().id, first);
        assert!(matches!(
            t.select_bill("missing"),
            Err(CoreError::BillNotFound(_))
        ));
        assert_eq!(t.active_bill().id, first);
    }

    #[test]
    fn test_close_requires_confirmation_for_items() {
        let catalog = catalog();
        let ctx = PricingContext::new(&catalog, &[], today());
        let mut t = terminal();
        let id = t.active_bill().id.clone();
        t.add_item(&id, "SKU-1", &ctx).unwrap();

        let err = t.close_bill(&id, false).unwrap_err();
        assert_eq!(
            err,
            CoreError::CloseNotConfirmed {
                bill_id: id.clone(),
                items: 1
            }
        );
        assert_eq!(t.bills().len(), 1);

        t.close_bill(&id, true).unwrap();
        assert_eq!(t.bills().len(), 1);
        assert_ne!(t.active_bill().id, id);
        assert!(t.active_bill().is_empty());
        assert_eq!(t.active_bill().name, "Cuenta 2");
    }

    #[test]
    fn test_close_active_falls_back_to_previous() {
        let mut t = terminal();
        t.open_new_bill();
        let third = t.open_new_bill().id.clone();

        t.close_bill(&third, false).unwrap();
        assert_eq!(t.active_index(), 1);
        assert_eq!(t.active_bill().name, "Cuenta 2");
    }

    #[test]
    fn test_close_first_active_clamps_to_zero() {
        let mut t = terminal();
        let first = t.active_bill().id.clone();
        t.open_new_bill();
        t.select_bill(&first).unwrap();

        t.close_bill(&first, false).unwrap();
        assert_eq!(t.active_index(), 0);
        assert_eq!(t.active_bill().name, "Cuenta 2");
    }

    #[test]
    fn test_close_other_keeps_active_bill() {
        let mut t = terminal();
        let first = t.active_bill().id.clone();
        let second = t.open_new_bill().id.clone();
        t.open_new_bill();
        t.select_bill(&second).unwrap();

        t.close_bill(&first, false).unwrap();
        assert_eq!(t.active_bill().id, second);
    }

    #[test]
    fn test_line_operations_on_unknown_bill() {
        let catalog = catalog();
        let ctx = PricingContext::new(&catalog, &[], today());
        let mut t = terminal();

        assert!(matches!(
            t.add_item("nope", "SKU-1", &ctx),
            Err(CoreError::BillNotFound(_))
        ));
        assert!(matches!(
            t.remove_item("nope", "SKU-1"),
            Err(CoreError::BillNotFound(_))
        ));
    }

    #[test]
    fn test_add_unknown_product() {
        let catalog = catalog();
        let ctx = PricingContext::new(&catalog, &[], today());
        let mut t = terminal();
        let id = t.active_bill().id.clone();

        assert_eq!(
            t.add_item(&id, "SKU-404", &ctx).unwrap_err(),
            CoreError::ProductNotFound("SKU-404".into())
        );
    }

    #[test]
    fn test_set_customer() {
        let mut t = terminal();
        let id = t.active_bill().id.clone();

        t.set_customer(&id, "cli-7").unwrap();
        assert_eq!(t.active_bill().customer_id, "cli-7");
        assert!(t.set_customer(&id, "").is_err());
    }

    #[test]
    fn test_checkout_recycles_slot() {
        let catalog = catalog();
        let ctx = PricingContext::new(&catalog, &[], today());
        let mut t = terminal();
        let first = t.active_bill().id.clone();
        t.add_item(&first, "SKU-1", &ctx).unwrap();
        t.set_customer(&first, "cli-7").unwrap();
        t.open_new_bill();

        let session = CashSession::open("bodega-1", Money::zero(), now()).unwrap();
        let mut ledger: Vec<Invoice> = Vec::new();

        let invoice = t
            .checkout(
                &first,
                Some(&session),
                &PaymentRequest::method(PaymentMethod::Card),
                &ctx,
                now(),
                &mut ledger,
            )
            .unwrap();

        assert_eq!(invoice.status, InvoiceStatus::Paid);
        assert_eq!(invoice.customer_id, "cli-7");
        assert_eq!(invoice.total, Money::from_units(47_600));
        assert_eq!(invoice.number, "FV-261016-101530-0001");
        assert_eq!(ledger.len(), 1);

        let recycled = &t.bills()[0];
        assert_ne!(recycled.id, first);
        assert_eq!(recycled.name, "Cuenta 1");
        assert!(recycled.is_empty());
        assert_eq!(recycled.customer_id, WALK_IN_CUSTOMER_ID);
        assert_eq!(t.active_index(), 1);
    }

    #[test]
    fn test_failed_checkout_leaves_bill() {
        let catalog = catalog();
        let ctx = PricingContext::new(&catalog, &[], today());
        let mut t = terminal();
        let id = t.active_bill().id.clone();
        t.add_item(&id, "SKU-1", &ctx).unwrap();
        let before = t.active_bill().clone();
        let mut ledger: Vec<Invoice> = Vec::new();

        let err = t
            .checkout(
                &id,
                None,
                &PaymentRequest::cash(Money::from_units(100_000)),
                &ctx,
                now(),
                &mut ledger,
            )
            .unwrap_err();

        assert_eq!(err, CoreError::CashSessionClosed);
        assert_eq!(t.active_bill(), &before);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_invoice_sequence_advances_only_on_success() {
        let catalog = catalog();
        let ctx = PricingContext::new(&catalog, &[], today());
        let mut t = terminal();
        let session = CashSession::open("bodega-1", Money::zero(), now()).unwrap();
        let mut ledger: Vec<Invoice> = Vec::new();
        let id = t.active_bill().id.clone();
        t.add_item(&id, "SKU-1", &ctx).unwrap();

        let short = PaymentRequest::cash(Money::from_units(1));
        assert!(t
            .checkout(&id, Some(&session), &short, &ctx, now(), &mut ledger)
            .is_err());

        let paid = PaymentRequest::cash(Money::from_units(50_000));
        let invoice = t
            .checkout(&id, Some(&session), &paid, &ctx, now(), &mut ledger)
            .unwrap();
        assert!(invoice.number.ends_with("-0001"));
        assert_eq!(invoice.change, Some(Money::from_units(2_400)));
    }

    #[test]
    fn test_failed_checkout_does_not_reprice_bill() {
        let catalog = catalog();
        let promotions = vec![ten_percent_aseo()];
        let before_promo = PricingContext::new(&catalog, &[], today());
        let with_promo = PricingContext::new(&catalog, &promotions, today());
        let mut t = terminal();
        let id = t.active_bill().id.clone();
        t.add_item(&id, "SKU-1", &before_promo).unwrap();
        let before = t.active_bill().clone();
        let mut ledger: Vec<Invoice> = Vec::new();

        let err = t
            .checkout(
                &id,
                None,
                &PaymentRequest::method(PaymentMethod::Card),
                &with_promo,
                now(),
                &mut ledger,
            )
            .unwrap_err();

        assert_eq!(err, CoreError::CashSessionClosed);
        assert_eq!(t.active_bill(), &before);
        assert_eq!(t.active_bill().total(), Money::from_units(47_600));
        assert!(t.active_bill().discount().is_zero());
    }

    #[test]
    fn test_checkout_invoices_current_promotions() {
        let catalog = catalog();
        let promotions = vec![ten_percent_aseo()];
        let before_promo = PricingContext::new(&catalog, &[], today());
        let with_promo = PricingContext::new(&catalog, &promotions, today());
        let mut t = terminal();
        let session = CashSession::open("bodega-1", Money::zero(), now()).unwrap();
        let mut ledger: Vec<Invoice> = Vec::new();
        let id = t.active_bill().id.clone();
        t.add_item(&id, "SKU-1", &before_promo).unwrap();

        let invoice = t
            .checkout(
                &id,
                Some(&session),
                &PaymentRequest::method(PaymentMethod::Card),
                &with_promo,
                now(),
                &mut ledger,
            )
            .unwrap();

        assert_eq!(invoice.discount, Money::from_units(4_000));
        assert_eq!(invoice.total, Money::from_units(42_840));
    }
}
