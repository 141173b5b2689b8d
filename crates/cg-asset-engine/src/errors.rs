//! # Error Types
//!
//! All error types for the civic asset engine.
//!
//! The eleven domain kinds carry the stable numeric codes of the original
//! on-ledger contract (100-110, via [`EngineError::code`]). Infrastructure
//! kinds (`Transfer`, `Store`, `IdExhausted`) are introduced by this
//! implementation and carry no legacy code.

use crate::domain::value_objects::{AccountId, AssetId};
use thiserror::Error;

// =============================================================================
// ENGINE ERRORS
// =============================================================================

/// Errors reported by the transition engine.
///
/// Every error is raised before any store write; a failed operation has zero
/// effect on state.
#[derive(Debug, Error, Clone)]
pub enum EngineError {
    /// Caller lacks the required privilege.
    #[error("caller is not authorized for this operation")]
    Unauthorized,

    /// Asset does not exist, or is not of the kind the operation requires.
    #[error("invalid asset: {0}")]
    InvalidAsset(AssetId),

    /// Asset has too few available units for the request.
    #[error("asset unavailable: {0}")]
    AssetUnavailable(AssetId),

    /// A parameter failed validation.
    #[error("invalid parameters: {0}")]
    BadParams(String),

    /// Computed fee is below the configured minimum.
    #[error("fee too low: {fee} < minimum {minimum}")]
    LowBalance {
        /// Computed fee.
        fee: u64,
        /// Configured fee floor.
        minimum: u64,
    },

    /// No device record exists for the identity.
    #[error("sensor not found: {0}")]
    SensorNotFound(AccountId),

    /// Allocation or amount outside the permitted range.
    #[error("capacity out of range: {requested} (max {max})")]
    BadCapacity {
        /// Requested units.
        requested: u64,
        /// Permitted maximum.
        max: u64,
    },

    /// Unit cost or rate outside the permitted range.
    #[error("price out of range: {cost} (max {max})")]
    BadPrice {
        /// Requested cost or rate.
        cost: u64,
        /// Permitted maximum.
        max: u64,
    },

    /// Empty location string.
    #[error("location must not be empty")]
    BadLocation,

    /// Empty vehicle identifier.
    #[error("vehicle identifier must not be empty")]
    BadVehicle,

    /// Empty device label.
    #[error("device label must not be empty")]
    BadSensor,

    /// The sequential asset counter cannot advance further.
    #[error("asset id space exhausted")]
    IdExhausted,

    /// The external value transfer failed; safe to retry, no state changed.
    #[error("transfer failed: {0}")]
    Transfer(#[from] TransferError),

    /// The backing store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Returns the stable numeric code of the original contract, or None for
    /// the kinds introduced by this implementation.
    #[must_use]
    pub const fn code(&self) -> Option<u32> {
        match self {
            Self::Unauthorized => Some(100),
            Self::InvalidAsset(_) => Some(101),
            Self::AssetUnavailable(_) => Some(102),
            Self::BadParams(_) => Some(103),
            Self::LowBalance { .. } => Some(104),
            Self::SensorNotFound(_) => Some(105),
            Self::BadCapacity { .. } => Some(106),
            Self::BadPrice { .. } => Some(107),
            Self::BadLocation => Some(108),
            Self::BadVehicle => Some(109),
            Self::BadSensor => Some(110),
            Self::IdExhausted | Self::Transfer(_) | Self::Store(_) => None,
        }
    }

    /// Returns true if re-invoking the operation may succeed without any
    /// corrective action (nothing was written).
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transfer(_) | Self::Store(_))
    }
}

// =============================================================================
// TRANSFER ERRORS
// =============================================================================

/// Failure of the external value-transfer primitive.
#[derive(Debug, Error, Clone)]
pub enum TransferError {
    /// Payer balance below the requested amount.
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        /// Amount requested.
        required: u64,
        /// Payer balance at evaluation time.
        available: u64,
    },
}

// =============================================================================
// STORE ERRORS
// =============================================================================

/// Errors from the backing keyed store.
///
/// The in-memory adapter never raises these; the port carries them for
/// store backends with real failure modes.
#[derive(Debug, Error, Clone)]
pub enum StoreError {
    /// Store backend unreachable.
    #[error("store unavailable")]
    Unavailable,

    /// Stored data failed integrity checks.
    #[error("store corruption detected")]
    Corrupted,

    /// Other store error.
    #[error("store error: {0}")]
    Other(String),
}

// =============================================================================
// TESTS
// =============================================================================
