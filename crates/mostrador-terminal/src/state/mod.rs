//! # State Module
//!
//! Thread-safe state holders for the terminal runtime.
//!
//! Each concern gets its own state type so a command locks only what it
//! touches, and independent states never block each other.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌────────────┐  │
//! │  │TerminalState │  │ CatalogState │  │ LedgerState  │  │CashDrawer  │  │
//! │  │              │  │              │  │              │  │  State     │  │
//! │  │  Arc<Mutex<  │  │  Arc<RwLock< │  │  Arc<Mutex<  │  │ Arc<Mutex< │  │
//! │  │   Terminal   │  │  Reference   │  │   Invoice    │  │  Option<   │  │
//! │  │   Session>>  │  │   Data>>     │  │   Ledger>>   │  │ CashSession│  │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  └────────────┘  │
//! │                                                                         │
//! │  LOCK ORDER (when a command needs several):                            │
//! │  catalog (read) → cash drawer → ledger → terminal                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cash;
mod catalog;
mod ledger;
mod terminal;

pub use cash::CashDrawerState;
pub use catalog::{CatalogState, ReferenceData};
pub use ledger::{InvoiceLedger, LedgerState};
pub use terminal::TerminalState;
