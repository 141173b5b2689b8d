//! # State Adapter
//!
//! In-memory [`StateAccess`] implementation backed by one [`TableStore`] per
//! record family. Production deployments substitute an adapter over the
//! ledger's persistent store; record semantics are identical.

use crate::adapters::table::TableStore;
use crate::domain::entities::{Asset, Device, ParkingSlot, PowerAllocation, WasteContainer};
use crate::domain::value_objects::{AccountId, AssetId};
use crate::errors::StoreError;
use crate::ports::outbound::StateAccess;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory keyed store holding every engine record.
#[derive(Debug, Default)]
pub struct InMemoryCityState {
    assets: TableStore<AssetId, Asset>,
    parking: TableStore<AssetId, ParkingSlot>,
    waste: TableStore<AssetId, WasteContainer>,
    power: TableStore<(AssetId, AccountId), PowerAllocation>,
    devices: TableStore<AccountId, Device>,
    asset_count: AtomicU64,
}

impl InMemoryCityState {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clones every table for pre/post comparison in tests.
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            assets: self.assets.snapshot(),
            parking: self.parking.snapshot(),
            waste: self.waste.snapshot(),
            power: self.power.snapshot(),
            devices: self.devices.snapshot(),
            asset_count: self.asset_count.load(Ordering::SeqCst),
        }
    }
}

/// Full copy of the store contents at one instant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateSnapshot {
    /// Asset records.
    pub assets: HashMap<AssetId, Asset>,
    /// Parking slot records.
    pub parking: HashMap<AssetId, ParkingSlot>,
    /// Waste container records.
    pub waste: HashMap<AssetId, WasteContainer>,
    /// Power allocation records.
    pub power: HashMap<(AssetId, AccountId), PowerAllocation>,
    /// Device records.
    pub devices: HashMap<AccountId, Device>,
    /// Id counter.
    pub asset_count: u64,
}

#[async_trait]
impl StateAccess for InMemoryCityState {
    async fn get_asset(&self, id: AssetId) -> Result<Option<Asset>, StoreError> {
        Ok(self.assets.get(&id))
    }

    async fn put_asset(&self, id: AssetId, asset: Asset) -> Result<(), StoreError> {
        self.assets.insert(id, asset);
        Ok(())
    }

    async fn get_parking(&self, id: AssetId) -> Result<Option<ParkingSlot>, StoreError> {
        Ok(self.parking.get(&id))
    }

    async fn put_parking(&self, id: AssetId, slot: ParkingSlot) -> Result<(), StoreError> {
        self.parking.insert(id, slot);
        Ok(())
    }

    async fn get_waste(&self, id: AssetId) -> Result<Option<WasteContainer>, StoreError> {
        Ok(self.waste.get(&id))
    }

    async fn put_waste(&self, id: AssetId, container: WasteContainer) -> Result<(), StoreError> {
        self.waste.insert(id, container);
        Ok(())
    }

    async fn get_power(
        &self,
        id: AssetId,
        account: AccountId,
    ) -> Result<Option<PowerAllocation>, StoreError> {
        Ok(self.power.get(&(id, account)))
    }

    async fn put_power(
        &self,
        id: AssetId,
        account: AccountId,
        allocation: PowerAllocation,
    ) -> Result<(), StoreError> {
        self.power.insert((id, account), allocation);
        Ok(())
    }

    async fn get_device(&self, account: AccountId) -> Result<Option<Device>, StoreError> {
        Ok(self.devices.get(&account))
    }

    async fn put_device(&self, account: AccountId, device: Device) -> Result<(), StoreError> {
        self.devices.insert(account, device);
        Ok(())
    }

    async fn asset_count(&self) -> Result<u64, StoreError> {
        Ok(self.asset_count.load(Ordering::SeqCst))
    }

    async fn set_asset_count(&self, count: u64) -> Result<(), StoreError> {
        self.asset_count.store(count, Ordering::SeqCst);
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
