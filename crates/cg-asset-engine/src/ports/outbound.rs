//! # Driven Ports (SPI - Outbound)
//!
//! Interfaces the asset engine depends on. External adapters implement these
//! traits to provide:
//! - Record storage (the keyed store)
//! - Value transfer (the ledger's payment primitive)
//! - Event publication
//!
//! Dependencies point INWARD: adapters implement these traits, the engine
//! never names a concrete backend.

use crate::domain::entities::{Asset, Device, ParkingSlot, PowerAllocation, WasteContainer};
use crate::domain::value_objects::{AccountId, AssetId};
use crate::errors::{StoreError, TransferError};
use crate::events::EventEnvelope;
use async_trait::async_trait;

// =============================================================================
// STATE ACCESS (Keyed Store)
// =============================================================================

/// Interface to the keyed store holding all engine records.
///
/// ## Implementation Notes
///
/// - The store exclusively owns every record; the engine holds no copy across
///   calls and re-reads before each mutation.
/// - Single-key reads must be torn-free: a concurrent reader observes either
///   the pre- or post-transaction value, never a partial write.
/// - `put_*` overwrites wholesale; there is no partial-field update on the
///   wire.
#[async_trait]
pub trait StateAccess: Send + Sync {
    /// Get an asset record.
    async fn get_asset(&self, id: AssetId) -> Result<Option<Asset>, StoreError>;

    /// Write an asset record.
    async fn put_asset(&self, id: AssetId, asset: Asset) -> Result<(), StoreError>;

    /// Get the parking slot record for an asset.
    async fn get_parking(&self, id: AssetId) -> Result<Option<ParkingSlot>, StoreError>;

    /// Write the parking slot record for an asset.
    async fn put_parking(&self, id: AssetId, slot: ParkingSlot) -> Result<(), StoreError>;

    /// Get the waste container record for an asset.
    async fn get_waste(&self, id: AssetId) -> Result<Option<WasteContainer>, StoreError>;

    /// Write the waste container record for an asset.
    async fn put_waste(&self, id: AssetId, container: WasteContainer) -> Result<(), StoreError>;

    /// Get the power allocation for an `(asset, account)` pair.
    async fn get_power(
        &self,
        id: AssetId,
        account: AccountId,
    ) -> Result<Option<PowerAllocation>, StoreError>;

    /// Write the power allocation for an `(asset, account)` pair.
    async fn put_power(
        &self,
        id: AssetId,
        account: AccountId,
        allocation: PowerAllocation,
    ) -> Result<(), StoreError>;

    /// Get the device record for an identity.
    async fn get_device(&self, account: AccountId) -> Result<Option<Device>, StoreError>;

    /// Write the device record for an identity.
    async fn put_device(&self, account: AccountId, device: Device) -> Result<(), StoreError>;

    /// Number of assets registered so far (the id counter).
    async fn asset_count(&self) -> Result<u64, StoreError>;

    /// Advance the id counter.
    async fn set_asset_count(&self, count: u64) -> Result<(), StoreError>;

    /// Check if an asset exists.
    async fn asset_exists(&self, id: AssetId) -> Result<bool, StoreError> {
        Ok(self.get_asset(id).await?.is_some())
    }
}

// =============================================================================
// VALUE TRANSFER (Ledger Payment Primitive)
// =============================================================================

/// Interface to the ledger's atomic value-transfer primitive.
///
/// The engine awaits and confirms the transfer before committing any store
/// write; a failed transfer aborts the whole operation with zero effect.
#[async_trait]
pub trait ValueTransfer: Send + Sync {
    /// Transfer `amount` from `from` to `to` atomically.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - funds moved
    /// * `Err(TransferError::InsufficientFunds)` - payer balance too low,
    ///   nothing moved
    async fn transfer(
        &self,
        amount: u64,
        from: AccountId,
        to: AccountId,
    ) -> Result<(), TransferError>;
}

// =============================================================================
// EVENT SINK
// =============================================================================

/// Interface for publishing committed-operation events.
///
/// Publication happens after all writes for the operation; a sink must not
/// fail the operation.
pub trait EventSink: Send + Sync {
    /// Publish one event envelope.
    fn publish(&self, envelope: EventEnvelope);
}

// =============================================================================
// TESTS
// =============================================================================
