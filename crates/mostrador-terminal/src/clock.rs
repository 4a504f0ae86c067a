//! # Clock
//!
//! Business date and timestamp source. The core never reads a clock for
//! pricing or invoices; the runtime injects one so commands stay testable.

use chrono::{DateTime, Local, NaiveDate, Utc};

pub trait Clock: Send + Sync {
    /// Timestamp stamped on invoices and sessions.
    fn now(&self) -> DateTime<Utc>;

    /// Local business date used for promotion windows and issue dates.
    fn today(&self) -> NaiveDate;
}

/// Wall clock; the business date is the terminal's local date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always returns the same instant. Used by tests and demos.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        FixedClock { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }
}
