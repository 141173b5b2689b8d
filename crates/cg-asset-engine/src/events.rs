//! # Event Schema
//!
//! Payloads published through the [`EventSink`](crate::ports::outbound::EventSink)
//! port after each successful mutation. Exactly one event per committed
//! operation; failed operations publish nothing.

use crate::domain::entities::AssetKind;
use crate::domain::value_objects::{AccountId, AssetId, BlockHeight};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// ENVELOPE
// =============================================================================

/// Transport wrapper around a domain event.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique id of this emission.
    pub event_id: Uuid,
    /// Height of the transaction that produced the event.
    pub height: BlockHeight,
    /// The event itself.
    pub event: CivicEvent,
}

impl EventEnvelope {
    /// Wraps an event with a fresh id.
    #[must_use]
    pub fn new(height: BlockHeight, event: CivicEvent) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            height,
            event,
        }
    }
}

// =============================================================================
// EVENTS
// =============================================================================

/// Domain events emitted by the asset engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum CivicEvent {
    /// A new asset entered the registry.
    AssetRegistered(AssetRegisteredPayload),
    /// A parking slot was booked and the fee collected.
    ParkingReserved(ParkingReservedPayload),
    /// A waste fill-level report was accepted.
    WasteLevelReported(WasteLevelReportedPayload),
    /// Energy capacity was reserved and paid for.
    PowerAllocated(PowerAllocatedPayload),
    /// A device was registered and authorized.
    DeviceRegistered(DeviceRegisteredPayload),
    /// A device was deactivated and de-authorized.
    DeviceDeactivated(DeviceDeactivatedPayload),
    /// A device refreshed its heartbeat.
    DeviceHeartbeat(DeviceHeartbeatPayload),
}

impl CivicEvent {
    /// Topic string this event is published under.
    #[must_use]
    pub const fn topic(&self) -> &'static str {
        match self {
            Self::AssetRegistered(_) => topics::ASSET_REGISTERED,
            Self::ParkingReserved(_) => topics::PARKING_RESERVED,
            Self::WasteLevelReported(_) => topics::WASTE_LEVEL_REPORTED,
            Self::PowerAllocated(_) => topics::POWER_ALLOCATED,
            Self::DeviceRegistered(_) => topics::DEVICE_REGISTERED,
            Self::DeviceDeactivated(_) => topics::DEVICE_DEACTIVATED,
            Self::DeviceHeartbeat(_) => topics::DEVICE_HEARTBEAT,
        }
    }
}

/// Payload for [`CivicEvent::AssetRegistered`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssetRegisteredPayload {
    /// Newly allocated id.
    pub asset_id: AssetId,
    /// Kind of the asset.
    pub kind: AssetKind,
    /// Registered location.
    pub location: String,
    /// Total allocation.
    pub allocation: u64,
    /// Per-unit price.
    pub unit_cost: u64,
}

/// Payload for [`CivicEvent::ParkingReserved`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParkingReservedPayload {
    /// Booked asset.
    pub asset_id: AssetId,
    /// Paying account.
    pub account: AccountId,
    /// Vehicle identifier.
    pub vehicle: String,
    /// Collected fee.
    pub fee: u64,
    /// Advisory expiry height.
    pub expires_at: BlockHeight,
}

/// Payload for [`CivicEvent::WasteLevelReported`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WasteLevelReportedPayload {
    /// Reported asset.
    pub asset_id: AssetId,
    /// Reporting identity.
    pub reporter: AccountId,
    /// Accepted fill level.
    pub fill_level: u8,
    /// Derived maintenance flag.
    pub requires_maintenance: bool,
}

/// Payload for [`CivicEvent::PowerAllocated`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PowerAllocatedPayload {
    /// Source asset.
    pub asset_id: AssetId,
    /// Reserving account.
    pub account: AccountId,
    /// Reserved units (overwrites any prior reservation for the pair).
    pub amount: u64,
    /// Collected cost.
    pub cost: u64,
}

/// Payload for [`CivicEvent::DeviceRegistered`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeviceRegisteredPayload {
    /// Device identity.
    pub device: AccountId,
    /// Device kind.
    pub kind: AssetKind,
    /// Bound asset.
    pub asset_id: AssetId,
}

/// Payload for [`CivicEvent::DeviceDeactivated`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeviceDeactivatedPayload {
    /// Device identity.
    pub device: AccountId,
}

/// Payload for [`CivicEvent::DeviceHeartbeat`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeviceHeartbeatPayload {
    /// Device identity.
    pub device: AccountId,
}

// =============================================================================
// TOPICS
// =============================================================================

/// Event topics for the asset engine.
pub mod topics {
    /// Topic for asset registrations.
    pub const ASSET_REGISTERED: &str = "civic_assets.asset.registered";

    /// Topic for parking reservations.
    pub const PARKING_RESERVED: &str = "civic_assets.parking.reserved";

    /// Topic for waste level reports.
    pub const WASTE_LEVEL_REPORTED: &str = "civic_assets.waste.reported";

    /// Topic for energy allocations.
    pub const POWER_ALLOCATED: &str = "civic_assets.power.allocated";

    /// Topic for device registrations.
    pub const DEVICE_REGISTERED: &str = "civic_assets.device.registered";

    /// Topic for device deactivations.
    pub const DEVICE_DEACTIVATED: &str = "civic_assets.device.deactivated";

    /// Topic for device heartbeats.
    pub const DEVICE_HEARTBEAT: &str = "civic_assets.device.heartbeat";
}

// =============================================================================
// TESTS
// =============================================================================
