//! # Mostrador Terminal
//!
//! Host runtime for one POS register: configuration, shared state, the
//! commands a POS screen invokes, and the background upsell worker.
//!
//! ## Module Organization
//! ```text
//! mostrador_terminal/
//! ├── lib.rs          ◄─── You are here (Terminal bundle & tracing setup)
//! ├── config.rs       ◄─── terminal.toml + MOSTRADOR_* environment
//! ├── clock.rs        ◄─── Business date / timestamp source
//! ├── error.rs        ◄─── ApiError (what the screen sees) and TerminalError
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports, lock order
//! │   ├── terminal.rs ◄─── Open tabs (TerminalSession)
//! │   ├── catalog.rs  ◄─── Products, promotions, customers
//! │   ├── ledger.rs   ◄─── Invoices emitted by this register
//! │   └── cash.rs     ◄─── Current cash session
//! ├── commands/
//! │   ├── tabs.rs     ◄─── open / close / select / list tabs
//! │   ├── bill.rs     ◄─── line edits, customer change
//! │   ├── catalog.rs  ◄─── browse / search products
//! │   ├── session.rs  ◄─── open / close cash session, summary
//! │   └── checkout.rs ◄─── preview and confirm payment
//! └── upsell.rs       ◄─── Debounced, cancellable AI hints
//! ```
//!
//! ## Wiring
//! ```rust
//! use mostrador_terminal::{commands, config::TerminalConfig, Terminal};
//!
//! let terminal = Terminal::new(TerminalConfig::default());
//! let tabs = commands::tabs::list_tabs(&terminal);
//! assert_eq!(tabs.tabs.len(), 1);
//! assert_eq!(tabs.tabs[0].name, "Cuenta 1");
//! ```

pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod state;
pub mod upsell;

use std::sync::Arc;

use mostrador_core::{Bill, PricingContext};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use clock::{Clock, SystemClock};
use config::TerminalConfig;
use state::{CashDrawerState, CatalogState, LedgerState, ReferenceData, TerminalState};
use upsell::{UpsellAdvisor, UpsellHandle, UpsellUpdate, UpsellWorker};

/// Everything one register needs, cheap to clone into command handlers.
///
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Terminal                                                               │
/// │  ├── config   Arc<TerminalConfig>   (immutable after startup)           │
/// │  ├── clock    Arc<dyn Clock>                                            │
/// │  ├── tabs     TerminalState         Arc<Mutex<TerminalSession>>         │
/// │  ├── catalog  CatalogState          Arc<RwLock<ReferenceData>>          │
/// │  ├── ledger   LedgerState           Arc<Mutex<InvoiceLedger>>           │
/// │  ├── drawer   CashDrawerState       Arc<Mutex<Option<CashSession>>>     │
/// │  └── upsell   Option<UpsellHandle>  (None until started or if disabled) │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Clone)]
pub struct Terminal {
    pub config: Arc<TerminalConfig>,
    pub clock: Arc<dyn Clock>,
    pub tabs: TerminalState,
    pub catalog: CatalogState,
    pub ledger: LedgerState,
    pub drawer: CashDrawerState,
    upsell: Option<UpsellHandle>,
}

impl Terminal {
    pub fn new(config: TerminalConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: TerminalConfig, clock: Arc<dyn Clock>) -> Self {
        let tabs = TerminalState::new(
            &config.terminal.warehouse_id,
            &config.customer.default_customer_id,
        );

        info!(
            terminal_id = %config.terminal.id,
            warehouse_id = %config.terminal.warehouse_id,
            "Terminal initialized"
        );

        Terminal {
            config: Arc::new(config),
            clock,
            tabs,
            catalog: CatalogState::new(),
            ledger: LedgerState::new(),
            drawer: CashDrawerState::new(),
            upsell: None,
        }
    }

    /// Starts the upsell worker on the current tokio runtime.
    ///
    /// Returns the worker task and the receiver the screen reads hints from,
    /// or `None` when upsell is disabled in configuration.
    pub fn start_upsell(
        &mut self,
        advisor: Arc<dyn UpsellAdvisor>,
    ) -> Option<(JoinHandle<()>, mpsc::Receiver<UpsellUpdate>)> {
        if !self.config.upsell.enabled {
            info!("Upsell disabled by configuration");
            return None;
        }

        let (worker, handle, updates) = UpsellWorker::new(advisor, self.config.quiet_period());
        self.upsell = Some(handle);
        Some((worker.spawn(), updates))
    }

    pub fn upsell(&self) -> Option<&UpsellHandle> {
        self.upsell.as_ref()
    }

    /// Stops background work. Tabs and ledger are left as they are.
    pub fn shutdown(&self) {
        if let Some(handle) = &self.upsell {
            handle.shutdown();
        }
    }

    /// Executes a function with the pricing context for today.
    pub fn with_pricing<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ReferenceData, &PricingContext<'_>) -> R,
    {
        let today = self.clock.today();
        let vat_rate = self.config.vat_rate();
        self.catalog.with_data(|data| {
            let ctx = data.pricing_context(today, vat_rate);
            f(data, &ctx)
        })
    }

    /// Hands the bill to the upsell worker, if one is running.
    pub(crate) fn notify_upsell(&self, bill: &Bill) {
        if let Some(handle) = &self.upsell {
            let revision = handle.notify(bill);
            debug!(bill_id = %bill.id, revision, "Upsell notified");
        }
    }
}

/// Installs the global tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=mostrador_terminal=trace` - Trace the runtime only
/// - Default: `info,mostrador=debug`
///
/// Calling it twice is harmless; the second call is ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mostrador=debug"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

// =============================================================================
// Unit Tests
// =============================================================================
