//! # Core Domain Entities
//!
//! The record types held in the keyed store, plus the transaction context
//! threaded through every operation.
//!
//! Records are immutable values: mutation constructs a new value from the old
//! one plus explicit field deltas (`Asset::reserve`, `ParkingSlot::occupy`,
//! ...) which the service writes back under its commit lock.

use crate::domain::services::needs_maintenance;
use crate::domain::value_objects::{AccountId, AssetId, BlockHeight};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// TRANSACTION CONTEXT
// =============================================================================

/// Execution context for one operation.
///
/// Caller identity and current height come from the ledger substrate and are
/// passed explicitly; the engine never relies on ambient state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxContext {
    /// Identity invoking the operation.
    pub caller: AccountId,
    /// Height at which the operation executes.
    pub height: BlockHeight,
}

impl TxContext {
    /// Creates a new transaction context.
    #[must_use]
    pub const fn new(caller: AccountId, height: BlockHeight) -> Self {
        Self { caller, height }
    }
}

// =============================================================================
// ASSET KIND
// =============================================================================

/// The three recognized kinds of civic asset.
///
/// The kind is fixed at registration and also classifies devices: a device's
/// kind must be one of these at registration time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    /// A parking facility; units are parking slots.
    Parking,
    /// A waste container; capacity is nominal, fill level is sensor-reported.
    Waste,
    /// An energy feed; units are reservable capacity.
    Power,
}

impl AssetKind {
    /// All recognized kinds.
    pub const ALL: [Self; 3] = [Self::Parking, Self::Waste, Self::Power];

    /// Canonical wire name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Parking => "parking",
            Self::Waste => "waste",
            Self::Power => "power",
        }
    }

    /// Parses a wire name. Returns None for unrecognized kinds.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "parking" => Some(Self::Parking),
            "waste" => Some(Self::Waste),
            "power" => Some(Self::Power),
            _ => None,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ASSET
// =============================================================================

/// A registered civic resource.
///
/// ## Invariants
/// - `available <= allocation` at all times
/// - `allocation` and `unit_cost` validated against `limits` at registration
/// - `kind` never changes after creation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Kind of resource (fixed at creation).
    pub kind: AssetKind,
    /// Human-readable location.
    pub location: String,
    /// Total allocated units.
    pub allocation: u64,
    /// Remaining unreserved units.
    pub available: u64,
    /// Active flag (stored and reported, gates nothing in this core).
    pub active: bool,
    /// Price per unit.
    pub unit_cost: u64,
}

impl Asset {
    /// Creates a freshly registered asset with full availability.
    #[must_use]
    pub fn new(kind: AssetKind, location: String, allocation: u64, unit_cost: u64) -> Self {
        Self {
            kind,
            location,
            allocation,
            available: allocation,
            active: true,
            unit_cost,
        }
    }

    /// Returns a copy with `units` fewer available units.
    ///
    /// Returns None if fewer than `units` are available; the caller reports
    /// `AssetUnavailable` and writes nothing.
    #[must_use]
    pub fn reserve(&self, units: u64) -> Option<Self> {
        let remaining = self.available.checked_sub(units)?;
        Some(Self {
            available: remaining,
            ..self.clone()
        })
    }
}

// =============================================================================
// PARKING SLOT
// =============================================================================

/// Occupancy record for a parking asset.
///
/// Expiry is advisory: the stored height is never enforced by this core and
/// never restores `Asset::available`. Callers compare `expires_at` against
/// the current height themselves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingSlot {
    /// Whether the slot is currently booked.
    pub occupied: bool,
    /// Vehicle identifier, present whenever `occupied` is true.
    pub vehicle: Option<String>,
    /// Height at which the booking lapses.
    pub expires_at: BlockHeight,
}

impl ParkingSlot {
    /// Creates the vacant record written at asset registration.
    #[must_use]
    pub const fn vacant() -> Self {
        Self {
            occupied: false,
            vehicle: None,
            expires_at: BlockHeight::ZERO,
        }
    }

    /// Returns a copy booked for `vehicle` until `expires_at`.
    #[must_use]
    pub fn occupy(&self, vehicle: String, expires_at: BlockHeight) -> Self {
        Self {
            occupied: true,
            vehicle: Some(vehicle),
            expires_at,
        }
    }

    /// Returns true if the slot is booked but its expiry height has passed.
    #[must_use]
    pub fn is_expired(&self, now: BlockHeight) -> bool {
        self.occupied && self.expires_at < now
    }
}

impl Default for ParkingSlot {
    fn default() -> Self {
        Self::vacant()
    }
}

// =============================================================================
// WASTE CONTAINER
// =============================================================================

/// Fill-level record for a waste asset.
///
/// ## Invariants
/// - `fill_level <= 100`
/// - `requires_maintenance == (fill_level > 80)`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WasteContainer {
    /// Sensor-reported fill level, 0-100.
    pub fill_level: u8,
    /// Height of the last accepted report.
    pub last_serviced: BlockHeight,
    /// Derived maintenance flag.
    pub requires_maintenance: bool,
}

impl WasteContainer {
    /// Creates the empty record written at asset registration.
    #[must_use]
    pub const fn new(height: BlockHeight) -> Self {
        Self {
            fill_level: 0,
            last_serviced: height,
            requires_maintenance: false,
        }
    }

    /// Returns a copy updated with a validated sensor report.
    ///
    /// The maintenance flag is derived from the level; callers validate the
    /// range before calling.
    #[must_use]
    pub fn record_level(&self, level: u8, height: BlockHeight) -> Self {
        Self {
            fill_level: level,
            last_serviced: height,
            requires_maintenance: needs_maintenance(level),
        }
    }
}

// =============================================================================
// POWER ALLOCATION
// =============================================================================

/// Energy reservation for one `(asset, account)` pair.
///
/// Each allocation call overwrites the record wholesale; reservations never
/// accumulate across calls.
///
/// ## Invariants
/// - `consumed <= reserved`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerAllocation {
    /// Units reserved by the last allocation.
    pub reserved: u64,
    /// Units metered as consumed so far.
    pub consumed: u64,
    /// Height of the last modification.
    pub last_modified: BlockHeight,
}

impl PowerAllocation {
    /// Creates a fresh reservation with zero consumption.
    #[must_use]
    pub const fn reserve(amount: u64, height: BlockHeight) -> Self {
        Self {
            reserved: amount,
            consumed: 0,
            last_modified: height,
        }
    }
}

// =============================================================================
// DEVICE
// =============================================================================

/// IoT sensor identity bound to one asset.
///
/// One device per account identity; the record is created by the registry,
/// flipped inactive by deactivation, and never deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Human-readable label.
    pub label: String,
    /// Device kind, one of the three asset kinds.
    pub kind: AssetKind,
    /// Asset this device reports for.
    pub asset_id: AssetId,
    /// Active flag, cleared by deactivation.
    pub active: bool,
    /// Authorization flag consumed by the authorization guard.
    pub authorized: bool,
    /// Height of the last heartbeat.
    pub last_heartbeat: BlockHeight,
}

impl Device {
    /// Creates a freshly registered, authorized device.
    #[must_use]
    pub fn new(label: String, kind: AssetKind, asset_id: AssetId, height: BlockHeight) -> Self {
        Self {
            label,
            kind,
            asset_id,
            active: true,
            authorized: true,
            last_heartbeat: height,
        }
    }

    /// Returns a copy with `active` and `authorized` cleared.
    #[must_use]
    pub fn deactivate(&self) -> Self {
        Self {
            active: false,
            authorized: false,
            ..self.clone()
        }
    }

    /// Returns a copy with only the heartbeat height updated.
    ///
    /// Heartbeat is not re-authorization: flags are untouched.
    #[must_use]
    pub fn with_heartbeat(&self, height: BlockHeight) -> Self {
        Self {
            last_heartbeat: height,
            ..self.clone()
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
