//! # Upsell Worker
//!
//! Asks an external advisor (the hosted AI) for "customers also buy" hints
//! about the bill being composed, without ever slowing the register down.
//!
//! ## Debounce & Supersession
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Upsell Worker                                    │
//! │                                                                         │
//! │  bill edit ──► UpsellHandle::notify() ── try_send ──┐   (never blocks)  │
//! │  bill edit ──► UpsellHandle::notify() ── try_send ──┤                   │
//! │                                                     ▼                   │
//! │                                          ┌────────────────────┐         │
//! │                                          │  worker loop       │         │
//! │                                          │  keep latest only  │         │
//! │                                          │  abort in-flight   │         │
//! │                                          └─────────┬──────────┘         │
//! │                                                    │ quiet period       │
//! │                                                    ▼ (default 1.5 s)    │
//! │                                          advisor.suggest(request)       │
//! │                                                    │                    │
//! │                                revision still latest?                   │
//! │                                  yes ──► UpsellUpdate to the UI         │
//! │                                  no  ──► dropped (warn)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Hints are advisory. Checkout never waits on this worker and nothing in
//! pricing depends on it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mostrador_core::{Bill, Money};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};
use ts_rs::TS;

/// Pending requests buffered between the handle and the worker.
const REQUEST_CHANNEL_CAPACITY: usize = 32;

/// Undelivered updates buffered for the UI.
const UPDATE_CHANNEL_CAPACITY: usize = 8;

// =============================================================================
// Advisor Seam
// =============================================================================

/// One line of the bill as the advisor sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsellLine {
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
}

/// Snapshot of a bill sent to the advisor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsellRequest {
    pub bill_id: String,
    pub revision: u64,
    pub customer_id: String,
    pub lines: Vec<UpsellLine>,
    pub total: Money,
}

impl UpsellRequest {
    pub fn from_bill(bill: &Bill, revision: u64) -> Self {
        UpsellRequest {
            bill_id: bill.id.clone(),
            revision,
            customer_id: bill.customer_id.clone(),
            lines: bill
                .items
                .iter()
                .map(|l| UpsellLine {
                    product_id: l.product_id.clone(),
                    name: l.name.clone(),
                    quantity: l.quantity,
                })
                .collect(),
            total: bill.total(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpsellHint {
    /// Suggested catalog product, when the advisor names one.
    pub product_id: Option<String>,
    pub message: String,
}

/// Hints for one bill revision, delivered to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpsellUpdate {
    pub bill_id: String,
    pub revision: u64,
    pub hints: Vec<UpsellHint>,
}

/// External suggestion service.
#[async_trait]
pub trait UpsellAdvisor: Send + Sync {
    async fn suggest(&self, request: &UpsellRequest) -> Result<Vec<UpsellHint>, String>;
}

// =============================================================================
// Handle
// =============================================================================

/// Cheap, cloneable sender side of the worker.
#[derive(Debug, Clone)]
pub struct UpsellHandle {
    request_tx: mpsc::Sender<UpsellRequest>,
    shutdown_tx: mpsc::Sender<()>,
    revision: Arc<AtomicU64>,
}

impl UpsellHandle {
    /// Queues the bill for advice and returns its revision.
    ///
    /// Never blocks. A full queue drops the request; the revision still
    /// advances, so any in-flight result is discarded as stale.
    pub fn notify(&self, bill: &Bill) -> u64 {
        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
        let request = UpsellRequest::from_bill(bill, revision);

        if let Err(e) = self.request_tx.try_send(request) {
            warn!(revision, error = %e, "Upsell request dropped");
        }
        revision
    }

    /// Latest revision handed out.
    pub fn current_revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    /// Stops the worker. In-flight advisor calls are aborted.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.try_send(());
    }
}

// =============================================================================
// Worker
// =============================================================================

pub struct UpsellWorker {
    advisor: Arc<dyn UpsellAdvisor>,
    quiet_period: Duration,
    request_rx: mpsc::Receiver<UpsellRequest>,
    update_tx: mpsc::Sender<UpsellUpdate>,
    shutdown_rx: mpsc::Receiver<()>,
    revision: Arc<AtomicU64>,
}

impl UpsellWorker {
    /// Creates the worker, its handle, and the receiver the UI reads hints from.
    pub fn new(
        advisor: Arc<dyn UpsellAdvisor>,
        quiet_period: Duration,
    ) -> (Self, UpsellHandle, mpsc::Receiver<UpsellUpdate>) {
        let (request_tx, request_rx) = mpsc::channel(REQUEST_CHANNEL_CAPACITY);
        let (update_tx, update_rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let revision = Arc::new(AtomicU64::new(0));

        let worker = UpsellWorker {
            advisor,
            quiet_period,
            request_rx,
            update_tx,
            shutdown_rx,
            revision: revision.clone(),
        };
        let handle = UpsellHandle {
            request_tx,
            shutdown_tx,
            revision,
        };

        (worker, handle, update_rx)
    }

    /// Spawns the worker on the current runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Runs the worker loop until shutdown or until every handle is dropped.
    pub async fn run(mut self) {
        info!(quiet_ms = self.quiet_period.as_millis() as u64, "Upsell worker starting");

        let mut pending: Option<UpsellRequest> = None;
        let mut deadline: Option<Instant> = None;
        let mut in_flight: Option<JoinHandle<()>> = None;

        loop {
            tokio::select! {
                received = self.request_rx.recv() => {
                    let Some(request) = received else { break };
                    if let Some(task) = in_flight.take() {
                        if !task.is_finished() {
                            debug!(revision = request.revision, "Aborting superseded upsell call");
                        }
                        task.abort();
                    }
                    pending = Some(request);
                    deadline = Some(Instant::now() + self.quiet_period);
                }

                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    deadline = None;
                    if let Some(request) = pending.take() {
                        in_flight = Some(self.dispatch(request));
                    }
                }

                _ = self.shutdown_rx.recv() => {
                    info!("Upsell worker shutting down");
                    break;
                }
            }
        }

        if let Some(task) = in_flight.take() {
            task.abort();
        }
        info!("Upsell worker stopped");
    }

    /// Calls the advisor in its own task so a newer revision can abort it.
    fn dispatch(&self, request: UpsellRequest) -> JoinHandle<()> {
        let advisor = self.advisor.clone();
        let update_tx = self.update_tx.clone();
        let latest = self.revision.clone();

        tokio::spawn(async move {
            let hints = if request.lines.is_empty() {
                Vec::new()
            } else {
                debug!(bill_id = %request.bill_id, revision = request.revision, "Asking upsell advisor");
                match advisor.suggest(&request).await {
                    Ok(hints) => hints,
                    Err(e) => {
                        warn!(revision = request.revision, error = %e, "Upsell advisor failed");
                        return;
                    }
                }
            };

            if latest.load(Ordering::SeqCst) != request.revision {
                warn!(revision = request.revision, "Discarding stale upsell result");
                return;
            }

            let update = UpsellUpdate {
                bill_id: request.bill_id,
                revision: request.revision,
                hints,
            };
            if let Err(e) = update_tx.try_send(update) {
                debug!(error = %e, "Upsell update not delivered");
            }
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
