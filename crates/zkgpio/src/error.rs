//! Common error types for GPIO backend operations

use thiserror::Error;

use crate::backend::Operation;

/// GPIO operation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GpioError {
    /// Native candidate absent, incomplete, or failed the round-trip probe.
    ///
    /// Only produced while probing; the factory recovers by falling back to
    /// the emulation, so callers of `plugin()` never see it.
    #[error("detection failed: {0}")]
    DetectionFailure(String),
    /// Pin identifier or value outside the backend-defined range
    #[error("invalid argument to {operation}: {reason}")]
    InvalidArgument {
        operation: Operation,
        reason: String,
    },
    /// Operation not supported by this backend
    #[error("operation {0} not supported")]
    Unsupported(Operation),
    /// Host environment or configuration changed after the backend was chosen
    #[error("backend already resolved")]
    AlreadyResolved,
    /// Vendor-specific error code reported by a native provider
    #[error("native error code: {0}")]
    Native(i32),
}

impl GpioError {
    pub fn invalid(operation: Operation, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            operation,
            reason: reason.into(),
        }
    }
}

/// Result type for GPIO operations
pub type GpioResult<T> = Result<T, GpioError>;
