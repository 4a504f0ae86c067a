//! # Error Types
//!
//! Domain-specific error types for mostrador-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mostrador-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  mostrador-terminal errors (separate crate)                            │
//! │  ├── TerminalError    - Config load/save failures                      │
//! │  └── ApiError         - What the POS screen sees (serialized)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → POS screen             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant is recoverable by the operator (add items, add cash, open a
//! session). Nothing here is fatal to the host.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Product is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// No open bill has this id.
    #[error("Bill not found: {0}")]
    BillNotFound(String),

    /// The bill has no line for this product.
    #[error("Product {product_id} is not on bill {bill_id}")]
    LineNotFound { bill_id: String, product_id: String },

    /// Bill has reached the maximum number of lines.
    #[error("Bill cannot have more than {max} lines")]
    BillTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Closing a bill with items discards them; the operator must confirm.
    ///
    /// ## User Workflow
    /// ```text
    /// Click ✕ on "Cuenta 3" (2 lines)
    ///      │
    ///      ▼
    /// close_bill(confirmed = false) → CloseNotConfirmed
    ///      │
    ///      ▼
    /// UI asks "Discard 2 items?" → close_bill(confirmed = true)
    /// ```
    #[error("Bill {bill_id} has {items} line(s); closing it requires confirmation")]
    CloseNotConfirmed { bill_id: String, items: usize },

    /// Checkout on a bill with no lines.
    #[error("Bill {0} is empty")]
    EmptyBill(String),

    /// No cash session is open; the operator must open one before selling.
    #[error("No open cash session")]
    CashSessionClosed,

    /// Cash session is already in the requested state.
    #[error("Cash session {session_id} is already {state}")]
    InvalidSessionState { session_id: String, state: String },

    /// Cash payment selected but no amount received entered.
    #[error("Amount received is required for cash payments")]
    TenderRequired,

    /// Cash received does not cover the total.
    #[error("Insufficient funds: total {total}, received {received}")]
    InsufficientFunds { total: Money, received: Money },

    /// The host refused to record the invoice.
    #[error("Invoice rejected by host: {0}")]
    InvoiceRejected(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Shortfall for an insufficient-funds rejection.
    pub fn shortfall(&self) -> Option<Money> {
        match self {
            CoreError::InsufficientFunds { total, received } => Some(*total - *received),
            _ => None,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., invalid UUID, inverted date range).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientFunds {
            total: Money::from_units(85_680),
            received: Money::from_units(50_000),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds: total $85680, received $50000"
        );
        assert_eq!(err.shortfall(), Some(Money::from_units(35_680)));
        assert_eq!(CoreError::CashSessionClosed.shortfall(), None);
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "product_id".to_string(),
        };
        assert_eq!(err.to_string(), "product_id is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
