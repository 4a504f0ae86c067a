//! # Terminal Error Types
//!
//! `ApiError` is what a command returns to the POS screen; `TerminalError`
//! covers the runtime's own failures (configuration load/save).
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Mostrador POS                          │
//! │                                                                         │
//! │  POS Screen                  Terminal Runtime                           │
//! │  ──────────                  ────────────────                           │
//! │                                                                         │
//! │  confirm_payment(...)                                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  No session? ─── CoreError::CashSessionClosed ──┐                │  │
//! │  │         │                                       │                │  │
//! │  │         ▼                                       ▼                │  │
//! │  │  Short cash? ─── CoreError::InsufficientFunds ─ ApiError ───────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ───────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  e.code == "SESSION_CLOSED"  → redirect to the open-session flow        │
//! │  e.code == "INSUFFICIENT_FUNDS" → keep the cash modal open              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use mostrador_core::CoreError;
use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Api Error
// =============================================================================

/// Error returned from terminal commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INSUFFICIENT_FUNDS",
///   "message": "Insufficient funds: total $85680, received $50000"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed
    ValidationError,

    /// Bill, product or line not found
    NotFound,

    /// Checkout attempted on an empty bill
    EmptyBill,

    /// Cash received does not cover the total
    InsufficientFunds,

    /// No open cash session; the UI redirects to the opening flow
    SessionClosed,

    /// Closing a tab with items needs the operator's confirmation
    ConfirmationRequired,

    /// Bill limits or other tab errors
    BillError,

    /// Internal error
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        let code = match err {
            CoreError::ProductNotFound(_)
            | CoreError::BillNotFound(_)
            | CoreError::LineNotFound { .. } => ErrorCode::NotFound,
            CoreError::BillTooLarge { .. } => ErrorCode::BillError,
            CoreError::QuantityTooLarge { .. }
            | CoreError::TenderRequired
            | CoreError::Validation(_) => ErrorCode::ValidationError,
            CoreError::CloseNotConfirmed { .. } => ErrorCode::ConfirmationRequired,
            CoreError::EmptyBill(_) => ErrorCode::EmptyBill,
            CoreError::CashSessionClosed | CoreError::InvalidSessionState { .. } => {
                ErrorCode::SessionClosed
            }
            CoreError::InsufficientFunds { .. } => ErrorCode::InsufficientFunds,
            CoreError::InvoiceRejected(ref reason) => {
                tracing::error!(%reason, "Invoice rejected by ledger");
                ErrorCode::Internal
            }
        };
        ApiError { code, message }
    }
}

impl From<TerminalError> for ApiError {
    fn from(err: TerminalError) -> Self {
        tracing::error!(error = %err, "Terminal runtime error");
        ApiError::internal(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Terminal Error
// =============================================================================

/// Result type alias for runtime operations.
pub type TerminalResult<T> = Result<T, TerminalError>;

#[derive(Debug, Error)]
pub enum TerminalError {
    /// Configuration values failed validation.
    #[error("Invalid terminal configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// Reference data (catalog, promotions) failed validation.
    #[error("Invalid reference data: {0}")]
    InvalidReferenceData(String),
}

impl From<std::io::Error> for TerminalError {
    fn from(err: std::io::Error) -> Self {
        TerminalError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for TerminalError {
    fn from(err: toml::de::Error) -> Self {
        TerminalError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for TerminalError {
    fn from(err: toml::ser::Error) -> Self {
        TerminalError::ConfigSaveFailed(err.to_string())
    }
}

impl From<mostrador_core::ValidationError> for TerminalError {
    fn from(err: mostrador_core::ValidationError) -> Self {
        TerminalError::InvalidReferenceData(err.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
