//! # Domain Invariants
//!
//! Critical invariants that MUST hold for every stored record after every
//! operation. The service validates before writing; these checks exist so
//! tests (and debug builds) can verify that no transition violated them.
//!
//! | ID | Invariant |
//! |----|-----------|
//! | INVARIANT-1 | Asset capacity: `available <= allocation <= MAX_ALLOCATION`, `allocation > 0` |
//! | INVARIANT-2 | Asset price: `0 < unit_cost <= MAX_UNIT_COST` |
//! | INVARIANT-3 | Parking occupancy: occupied implies vehicle identifier present |
//! | INVARIANT-4 | Waste flag: `requires_maintenance == (fill_level > 80)`, level in range |
//! | INVARIANT-5 | Power metering: `consumed <= reserved` |

use crate::domain::entities::{Asset, ParkingSlot, PowerAllocation, WasteContainer};
use crate::domain::services::needs_maintenance;

// =============================================================================
// LIMITS
// =============================================================================

/// Range limits enforced at registration and report time.
pub mod limits {
    /// Maximum total allocation of a single asset.
    pub const MAX_ALLOCATION: u64 = 100_000;

    /// Maximum per-unit cost (and power rate).
    pub const MAX_UNIT_COST: u64 = 1_000_000;

    /// Maximum waste fill level.
    pub const MAX_FILL_LEVEL: u8 = 100;

    /// Fill level strictly above which maintenance is required.
    pub const MAINTENANCE_THRESHOLD: u8 = 80;

    /// Default minimum parking fee floor.
    pub const DEFAULT_MIN_PARKING_FEE: u64 = 1_000;

    /// Default per-unit energy rate.
    pub const DEFAULT_POWER_RATE: u64 = 10;
}

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// INVARIANT-1 and INVARIANT-2: asset capacity and price ranges.
#[must_use]
pub fn check_asset_invariant(asset: &Asset) -> bool {
    asset.allocation > 0
        && asset.allocation <= limits::MAX_ALLOCATION
        && asset.available <= asset.allocation
        && asset.unit_cost > 0
        && asset.unit_cost <= limits::MAX_UNIT_COST
}

/// INVARIANT-3: an occupied slot always carries a vehicle identifier.
#[must_use]
pub fn check_parking_invariant(slot: &ParkingSlot) -> bool {
    !slot.occupied || slot.vehicle.is_some()
}

/// INVARIANT-4: the maintenance flag is exactly the threshold predicate.
#[must_use]
pub fn check_waste_invariant(container: &WasteContainer) -> bool {
    container.fill_level <= limits::MAX_FILL_LEVEL
        && container.requires_maintenance == needs_maintenance(container.fill_level)
}

/// INVARIANT-5: consumption never exceeds the reservation.
#[must_use]
pub fn check_power_invariant(allocation: &PowerAllocation) -> bool {
    allocation.consumed <= allocation.reserved
}

/// Checks every record attached to one asset at once.
#[must_use]
pub fn check_all_invariants(
    asset: &Asset,
    slot: Option<&ParkingSlot>,
    container: Option<&WasteContainer>,
    allocations: &[PowerAllocation],
) -> InvariantCheckResult {
    let mut violations = Vec::new();

    if !check_asset_invariant(asset) {
        violations.push(InvariantViolation::AssetOutOfRange {
            available: asset.available,
            allocation: asset.allocation,
            unit_cost: asset.unit_cost,
        });
    }

    if let Some(slot) = slot {
        if !check_parking_invariant(slot) {
            violations.push(InvariantViolation::OccupiedWithoutVehicle);
        }
    }

    if let Some(container) = container {
        if !check_waste_invariant(container) {
            violations.push(InvariantViolation::MaintenanceFlagMismatch {
                fill_level: container.fill_level,
                requires_maintenance: container.requires_maintenance,
            });
        }
    }

    for allocation in allocations {
        if !check_power_invariant(allocation) {
            violations.push(InvariantViolation::OverconsumedAllocation {
                reserved: allocation.reserved,
                consumed: allocation.consumed,
            });
        }
    }

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

// =============================================================================
// CHECK RESULT
// =============================================================================

/// Result of an invariant check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    /// Returns true if no violation was found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// A specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Capacity or price out of range.
    AssetOutOfRange {
        /// Remaining units.
        available: u64,
        /// Total units.
        allocation: u64,
        /// Per-unit price.
        unit_cost: u64,
    },
    /// Slot marked occupied with no vehicle identifier.
    OccupiedWithoutVehicle,
    /// Maintenance flag inconsistent with the fill level.
    MaintenanceFlagMismatch {
        /// Stored fill level.
        fill_level: u8,
        /// Stored flag.
        requires_maintenance: bool,
    },
    /// Metered consumption above the reservation.
    OverconsumedAllocation {
        /// Reserved units.
        reserved: u64,
        /// Consumed units.
        consumed: u64,
    },
}

// =============================================================================
// TESTS
// =============================================================================
