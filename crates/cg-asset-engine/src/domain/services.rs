//! # Domain Services
//!
//! Pure business logic functions for the asset engine: fee arithmetic,
//! maintenance derivation, and parameter validation. Deterministic, no I/O,
//! no side effects.

use crate::domain::invariants::limits;
use crate::domain::value_objects::BlockHeight;

// =============================================================================
// FEE ARITHMETIC
// =============================================================================

/// Computes the parking fee: `unit_cost * duration`.
///
/// Returns None on overflow; the caller rejects the request rather than
/// collecting a wrapped fee.
#[must_use]
pub fn parking_fee(unit_cost: u64, duration: u64) -> Option<u64> {
    unit_cost.checked_mul(duration)
}

/// Computes the energy cost: `amount * power_rate`.
///
/// Returns None on overflow.
#[must_use]
pub fn power_cost(amount: u64, power_rate: u64) -> Option<u64> {
    amount.checked_mul(power_rate)
}

/// Computes the advisory expiry height for a parking booking.
#[must_use]
pub const fn expiry_height(now: BlockHeight, duration: u64) -> BlockHeight {
    now.advance(duration)
}

// =============================================================================
// MAINTENANCE DERIVATION
// =============================================================================

/// Derives the maintenance flag from a fill level.
///
/// Strictly greater than the threshold: a level of exactly 80 does not
/// require maintenance.
#[must_use]
pub const fn needs_maintenance(level: u8) -> bool {
    level > limits::MAINTENANCE_THRESHOLD
}

// =============================================================================
// PARAMETER VALIDATION
// =============================================================================

/// A location is valid when non-empty.
#[must_use]
pub fn is_valid_location(location: &str) -> bool {
    !location.is_empty()
}

/// A vehicle identifier is valid when non-empty.
#[must_use]
pub fn is_valid_vehicle(vehicle: &str) -> bool {
    !vehicle.is_empty()
}

/// A device label is valid when non-empty.
#[must_use]
pub fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
}

/// An allocation is valid in `1..=MAX_ALLOCATION`.
#[must_use]
pub const fn is_valid_allocation(allocation: u64) -> bool {
    allocation > 0 && allocation <= limits::MAX_ALLOCATION
}

/// A unit cost (or power rate) is valid in `1..=MAX_UNIT_COST`.
#[must_use]
pub const fn is_valid_unit_cost(unit_cost: u64) -> bool {
    unit_cost > 0 && unit_cost <= limits::MAX_UNIT_COST
}

/// A fill level is valid in `0..=MAX_FILL_LEVEL`.
#[must_use]
pub const fn is_valid_fill_level(level: u8) -> bool {
    level <= limits::MAX_FILL_LEVEL
}

// =============================================================================
// TESTS
// =============================================================================
