//! # Driving Ports (API - Inbound)
//!
//! The public operation surface of the asset engine. Transport layers (RPC,
//! ledger dispatch) drive the engine through this trait; the service is the
//! only implementation in this crate.
//!
//! ## Operation surface
//!
//! | Operation | Success | Error kinds |
//! |-----------|---------|-------------|
//! | `register_resource` | asset id | Unauthorized, BadLocation, BadCapacity, BadPrice, IdExhausted |
//! | `reserve_parking` | () | InvalidAsset, BadVehicle, AssetUnavailable, LowBalance, Transfer |
//! | `update_waste_level` | () | Unauthorized, BadParams, InvalidAsset |
//! | `allocate_power` | () | InvalidAsset, BadCapacity, AssetUnavailable, Transfer |
//! | `register_device` | () | Unauthorized, BadSensor, InvalidAsset |
//! | `deactivate_device` | () | Unauthorized, SensorNotFound |
//! | `device_heartbeat` | () | SensorNotFound |
//! | `set_power_rate` | () | Unauthorized, BadPrice |
//! | read accessors | Option<record> | store failures only |

use crate::domain::entities::{
    Asset, AssetKind, Device, ParkingSlot, PowerAllocation, TxContext, WasteContainer,
};
use crate::domain::value_objects::{AccountId, AssetId};
use crate::errors::{EngineError, StoreError};
use async_trait::async_trait;

/// The civic asset engine API.
///
/// Every mutating operation validates fail-closed (no mutation on any
/// failure) and executes as a single serialized transaction.
#[async_trait]
pub trait CivicAssetApi: Send + Sync {
    // -------------------------------------------------------------------------
    // Mutating operations
    // -------------------------------------------------------------------------

    /// Registers a new asset and returns its sequential id. Admin-only.
    async fn register_resource(
        &self,
        ctx: TxContext,
        kind: AssetKind,
        location: &str,
        allocation: u64,
        unit_cost: u64,
    ) -> Result<AssetId, EngineError>;

    /// Books a parking slot for `duration` blocks, collecting the fee from
    /// the caller.
    async fn reserve_parking(
        &self,
        ctx: TxContext,
        asset_id: AssetId,
        vehicle: &str,
        duration: u64,
    ) -> Result<(), EngineError>;

    /// Accepts a sensor fill-level report for a waste asset.
    async fn update_waste_level(
        &self,
        ctx: TxContext,
        asset_id: AssetId,
        level: u8,
    ) -> Result<(), EngineError>;

    /// Reserves energy capacity for the caller at the configured rate,
    /// collecting payment. Overwrites any prior allocation for the pair.
    async fn allocate_power(
        &self,
        ctx: TxContext,
        asset_id: AssetId,
        amount: u64,
    ) -> Result<(), EngineError>;

    /// Registers (or re-registers) a device identity bound to an asset.
    /// Admin-only.
    async fn register_device(
        &self,
        ctx: TxContext,
        device: AccountId,
        label: &str,
        kind: AssetKind,
        asset_id: AssetId,
    ) -> Result<(), EngineError>;

    /// Deactivates and de-authorizes a device. Admin-only; the record stays
    /// queryable.
    async fn deactivate_device(
        &self,
        ctx: TxContext,
        device: AccountId,
    ) -> Result<(), EngineError>;

    /// Refreshes the heartbeat of the calling device. Does not touch the
    /// authorization flags.
    async fn device_heartbeat(&self, ctx: TxContext) -> Result<(), EngineError>;

    /// Changes the process-wide energy rate. Admin-only.
    async fn set_power_rate(&self, ctx: TxContext, rate: u64) -> Result<(), EngineError>;

    // -------------------------------------------------------------------------
    // Read accessors
    // -------------------------------------------------------------------------

    /// Asset record, or None if never registered.
    async fn asset_info(&self, id: AssetId) -> Result<Option<Asset>, StoreError>;

    /// Parking slot record for an asset.
    async fn parking_status(&self, id: AssetId) -> Result<Option<ParkingSlot>, StoreError>;

    /// Waste container record for an asset.
    async fn waste_status(&self, id: AssetId) -> Result<Option<WasteContainer>, StoreError>;

    /// Power allocation for an `(asset, account)` pair.
    async fn power_allocation(
        &self,
        id: AssetId,
        account: AccountId,
    ) -> Result<Option<PowerAllocation>, StoreError>;

    /// Device record for an identity.
    async fn device_info(&self, device: AccountId) -> Result<Option<Device>, StoreError>;

    /// Number of registered assets.
    async fn asset_count(&self) -> Result<u64, StoreError>;
}
