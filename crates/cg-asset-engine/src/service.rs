//! # Civic Asset Service
//!
//! The transition engine behind [`CivicAssetApi`]. Every mutating operation
//! runs assert-then-act under the commit lock:
//!
//! 1. authorization and field validation (fail-closed, nothing written)
//! 2. re-read the affected records from the store
//! 3. confirm the external value transfer for paid operations
//! 4. write the new records back and publish one event
//!
//! A failed step aborts the whole operation with zero effect; the only
//! caller-retryable failures are the external transfer and the store itself.
//!
//! Read accessors bypass the lock and perform a single store lookup.

use crate::adapters::{InMemoryBank, InMemoryCityState, RecordingEventSink};
use crate::domain::authorization;
use crate::domain::entities::{
    Asset, AssetKind, Device, ParkingSlot, PowerAllocation, TxContext, WasteContainer,
};
use crate::domain::invariants::{check_asset_invariant, check_waste_invariant, limits};
use crate::domain::services;
use crate::domain::value_objects::{AccountId, AssetId, BlockHeight};
use crate::errors::{EngineError, StoreError};
use crate::events::{
    AssetRegisteredPayload, CivicEvent, DeviceDeactivatedPayload, DeviceHeartbeatPayload,
    DeviceRegisteredPayload, EventEnvelope, ParkingReservedPayload, PowerAllocatedPayload,
    WasteLevelReportedPayload,
};
use crate::ports::inbound::CivicAssetApi;
use crate::ports::outbound::{EventSink, StateAccess, ValueTransfer};

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Service configuration.
///
/// Replaces the original contract's process-wide mutable singletons with
/// explicit state injected at construction. The power rate is the only field
/// mutable at runtime, through the admin-guarded `set_power_rate`.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Administrator identity; receives all collected fees.
    pub admin: AccountId,
    /// Per-unit energy rate.
    pub power_rate: u64,
    /// Minimum parking fee floor.
    pub min_parking_fee: u64,
}

impl ServiceConfig {
    /// Creates a configuration with default rates for the given admin.
    #[must_use]
    pub const fn new(admin: AccountId) -> Self {
        Self {
            admin,
            power_rate: limits::DEFAULT_POWER_RATE,
            min_parking_fee: limits::DEFAULT_MIN_PARKING_FEE,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new(AccountId::ZERO)
    }
}

// =============================================================================
// STATISTICS
// =============================================================================

/// Statistics for the civic asset service.
#[derive(Debug, Default, Clone)]
pub struct ServiceStats {
    /// Successfully committed operations.
    pub operations_executed: u64,
    /// Operations rejected by validation (excluding authorization).
    pub failed_operations: u64,
    /// Operations rejected by the authorization guard.
    pub rejected_unauthorized: u64,
    /// Total fees collected into the admin account.
    pub fees_collected: u64,
}

// =============================================================================
// SERVICE
// =============================================================================

/// The main civic asset service.
///
/// Generic over the driven ports so the same transition logic runs against
/// the in-memory adapters in tests and the ledger substrate in production.
pub struct CivicAssetService<S: StateAccess, B: ValueTransfer, E: EventSink> {
    /// Service configuration (power rate mutable at runtime).
    config: RwLock<ServiceConfig>,
    /// Keyed store adapter.
    state: Arc<S>,
    /// Value transfer adapter.
    bank: Arc<B>,
    /// Event sink adapter.
    events: Arc<E>,
    /// Service statistics.
    stats: RwLock<ServiceStats>,
    /// Serializes mutating operations: no interleaved partial state is ever
    /// observable.
    commit_lock: Mutex<()>,
}

impl<S: StateAccess, B: ValueTransfer, E: EventSink> CivicAssetService<S, B, E> {
    /// Creates a new service over the given adapters.
    pub fn new(state: S, bank: B, events: E, config: ServiceConfig) -> Self {
        Self {
            config: RwLock::new(config),
            state: Arc::new(state),
            bank: Arc::new(bank),
            events: Arc::new(events),
            stats: RwLock::new(ServiceStats::default()),
            commit_lock: Mutex::new(()),
        }
    }

    /// Current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// Current configuration.
    pub async fn config(&self) -> ServiceConfig {
        self.config.read().await.clone()
    }

    /// Current per-unit energy rate.
    pub async fn power_rate(&self) -> u64 {
        self.config.read().await.power_rate
    }

    /// The state adapter (tests seed and inspect records through this).
    #[must_use]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// The bank adapter.
    #[must_use]
    pub fn bank(&self) -> &B {
        &self.bank
    }

    /// The event sink adapter.
    #[must_use]
    pub fn events(&self) -> &E {
        &self.events
    }

    fn publish(&self, height: BlockHeight, event: CivicEvent) {
        self.events.publish(EventEnvelope::new(height, event));
    }

    async fn record_outcome(&self, err: Option<&EngineError>) {
        let mut stats = self.stats.write().await;
        match err {
            None => stats.operations_executed += 1,
            Some(EngineError::Unauthorized) => stats.rejected_unauthorized += 1,
            Some(_) => stats.failed_operations += 1,
        }
    }

    async fn note_fee(&self, fee: u64) {
        let mut stats = self.stats.write().await;
        stats.fees_collected = stats.fees_collected.saturating_add(fee);
    }

    // -------------------------------------------------------------------------
    // Mutating operations (bodies run under the commit lock)
    // -------------------------------------------------------------------------

    /// Registers a new asset. See [`CivicAssetApi::register_resource`].
    #[instrument(skip(self), fields(caller = %ctx.caller, height = %ctx.height))]
    pub async fn register_resource(
        &self,
        ctx: TxContext,
        kind: AssetKind,
        location: &str,
        allocation: u64,
        unit_cost: u64,
    ) -> Result<AssetId, EngineError> {
        let _guard = self.commit_lock.lock().await;
        let result = self
            .register_resource_locked(ctx, kind, location, allocation, unit_cost)
            .await;
        self.record_outcome(result.as_ref().err()).await;
        result
    }

    async fn register_resource_locked(
        &self,
        ctx: TxContext,
        kind: AssetKind,
        location: &str,
        allocation: u64,
        unit_cost: u64,
    ) -> Result<AssetId, EngineError> {
        let config = self.config.read().await.clone();
        if !authorization::is_admin(&config.admin, &ctx.caller) {
            warn!("rejecting register_resource from non-admin caller");
            return Err(EngineError::Unauthorized);
        }
        if !services::is_valid_location(location) {
            return Err(EngineError::BadLocation);
        }
        if !services::is_valid_allocation(allocation) {
            return Err(EngineError::BadCapacity {
                requested: allocation,
                max: limits::MAX_ALLOCATION,
            });
        }
        if !services::is_valid_unit_cost(unit_cost) {
            return Err(EngineError::BadPrice {
                cost: unit_cost,
                max: limits::MAX_UNIT_COST,
            });
        }

        let count = self.state.asset_count().await?;
        let next = count.checked_add(1).ok_or(EngineError::IdExhausted)?;
        let asset_id = AssetId::new(next);

        let asset = Asset::new(kind, location.to_string(), allocation, unit_cost);
        debug_assert!(check_asset_invariant(&asset));

        self.state.put_asset(asset_id, asset).await?;
        match kind {
            AssetKind::Parking => {
                self.state
                    .put_parking(asset_id, ParkingSlot::vacant())
                    .await?;
            }
            AssetKind::Waste => {
                self.state
                    .put_waste(asset_id, WasteContainer::new(ctx.height))
                    .await?;
            }
            AssetKind::Power => {}
        }
        self.state.set_asset_count(next).await?;

        info!(asset_id = %asset_id, kind = %kind, allocation, unit_cost, "registered asset");
        self.publish(
            ctx.height,
            CivicEvent::AssetRegistered(AssetRegisteredPayload {
                asset_id,
                kind,
                location: location.to_string(),
                allocation,
                unit_cost,
            }),
        );
        Ok(asset_id)
    }

    /// Books a parking slot. See [`CivicAssetApi::reserve_parking`].
    #[instrument(skip(self), fields(caller = %ctx.caller, height = %ctx.height))]
    pub async fn reserve_parking(
        &self,
        ctx: TxContext,
        asset_id: AssetId,
        vehicle: &str,
        duration: u64,
    ) -> Result<(), EngineError> {
        let _guard = self.commit_lock.lock().await;
        let result = self
            .reserve_parking_locked(ctx, asset_id, vehicle, duration)
            .await;
        self.record_outcome(result.as_ref().err()).await;
        result
    }

    async fn reserve_parking_locked(
        &self,
        ctx: TxContext,
        asset_id: AssetId,
        vehicle: &str,
        duration: u64,
    ) -> Result<(), EngineError> {
        let config = self.config.read().await.clone();

        let asset = self
            .state
            .get_asset(asset_id)
            .await?
            .ok_or(EngineError::InvalidAsset(asset_id))?;
        if asset.kind != AssetKind::Parking {
            return Err(EngineError::InvalidAsset(asset_id));
        }
        if !services::is_valid_vehicle(vehicle) {
            return Err(EngineError::BadVehicle);
        }
        let reserved = asset
            .reserve(1)
            .ok_or(EngineError::AssetUnavailable(asset_id))?;

        let fee = services::parking_fee(asset.unit_cost, duration)
            .ok_or_else(|| EngineError::BadParams("parking fee overflows".to_string()))?;
        if fee < config.min_parking_fee {
            return Err(EngineError::LowBalance {
                fee,
                minimum: config.min_parking_fee,
            });
        }

        // Slot record is written at registration; absence means the asset id
        // predates this store and the booking cannot proceed.
        let slot = self
            .state
            .get_parking(asset_id)
            .await?
            .ok_or(EngineError::InvalidAsset(asset_id))?;

        // Fee collection precedes every write: a failed transfer leaves all
        // records untouched and the operation is safely retryable.
        self.bank.transfer(fee, ctx.caller, config.admin).await?;

        let expires_at = services::expiry_height(ctx.height, duration);
        self.state
            .put_parking(asset_id, slot.occupy(vehicle.to_string(), expires_at))
            .await?;
        self.state.put_asset(asset_id, reserved).await?;
        self.note_fee(fee).await;

        info!(asset_id = %asset_id, vehicle, fee, expires_at = %expires_at, "parking reserved");
        self.publish(
            ctx.height,
            CivicEvent::ParkingReserved(ParkingReservedPayload {
                asset_id,
                account: ctx.caller,
                vehicle: vehicle.to_string(),
                fee,
                expires_at,
            }),
        );
        Ok(())
    }

    /// Accepts a waste fill-level report. See
    /// [`CivicAssetApi::update_waste_level`].
    #[instrument(skip(self), fields(caller = %ctx.caller, height = %ctx.height))]
    pub async fn update_waste_level(
        &self,
        ctx: TxContext,
        asset_id: AssetId,
        level: u8,
    ) -> Result<(), EngineError> {
        let _guard = self.commit_lock.lock().await;
        let result = self.update_waste_level_locked(ctx, asset_id, level).await;
        self.record_outcome(result.as_ref().err()).await;
        result
    }

    async fn update_waste_level_locked(
        &self,
        ctx: TxContext,
        asset_id: AssetId,
        level: u8,
    ) -> Result<(), EngineError> {
        let config = self.config.read().await.clone();

        let device = self.state.get_device(ctx.caller).await?;
        if !authorization::can_report(&config.admin, &ctx.caller, device.as_ref()) {
            warn!("rejecting waste report from unauthorized caller");
            return Err(EngineError::Unauthorized);
        }
        if !services::is_valid_fill_level(level) {
            return Err(EngineError::BadParams(format!(
                "fill level {level} above maximum {}",
                limits::MAX_FILL_LEVEL
            )));
        }
        if !self.state.asset_exists(asset_id).await? {
            return Err(EngineError::InvalidAsset(asset_id));
        }

        // The container is never auto-created here; it must have been written
        // when a waste asset was registered.
        let container = self
            .state
            .get_waste(asset_id)
            .await?
            .ok_or(EngineError::InvalidAsset(asset_id))?;

        let updated = container.record_level(level, ctx.height);
        debug_assert!(check_waste_invariant(&updated));
        let requires_maintenance = updated.requires_maintenance;
        self.state.put_waste(asset_id, updated).await?;

        debug!(asset_id = %asset_id, level, requires_maintenance, "waste level updated");
        self.publish(
            ctx.height,
            CivicEvent::WasteLevelReported(WasteLevelReportedPayload {
                asset_id,
                reporter: ctx.caller,
                fill_level: level,
                requires_maintenance,
            }),
        );
        Ok(())
    }

    /// Reserves energy capacity. See [`CivicAssetApi::allocate_power`].
    #[instrument(skip(self), fields(caller = %ctx.caller, height = %ctx.height))]
    pub async fn allocate_power(
        &self,
        ctx: TxContext,
        asset_id: AssetId,
        amount: u64,
    ) -> Result<(), EngineError> {
        let _guard = self.commit_lock.lock().await;
        let result = self.allocate_power_locked(ctx, asset_id, amount).await;
        self.record_outcome(result.as_ref().err()).await;
        result
    }

    async fn allocate_power_locked(
        &self,
        ctx: TxContext,
        asset_id: AssetId,
        amount: u64,
    ) -> Result<(), EngineError> {
        let config = self.config.read().await.clone();

        let asset = self
            .state
            .get_asset(asset_id)
            .await?
            .ok_or(EngineError::InvalidAsset(asset_id))?;
        if asset.kind != AssetKind::Power {
            return Err(EngineError::InvalidAsset(asset_id));
        }
        if !services::is_valid_allocation(amount) {
            return Err(EngineError::BadCapacity {
                requested: amount,
                max: limits::MAX_ALLOCATION,
            });
        }
        let reserved = asset
            .reserve(amount)
            .ok_or(EngineError::AssetUnavailable(asset_id))?;

        let cost = services::power_cost(amount, config.power_rate)
            .ok_or_else(|| EngineError::BadParams("energy cost overflows".to_string()))?;

        self.bank.transfer(cost, ctx.caller, config.admin).await?;

        // Overwrite semantics: a prior allocation for this pair is replaced,
        // never accumulated.
        self.state
            .put_power(asset_id, ctx.caller, PowerAllocation::reserve(amount, ctx.height))
            .await?;
        self.state.put_asset(asset_id, reserved).await?;
        self.note_fee(cost).await;

        info!(asset_id = %asset_id, amount, cost, "power allocated");
        self.publish(
            ctx.height,
            CivicEvent::PowerAllocated(PowerAllocatedPayload {
                asset_id,
                account: ctx.caller,
                amount,
                cost,
            }),
        );
        Ok(())
    }

    /// Registers a device. See [`CivicAssetApi::register_device`].
    #[instrument(skip(self), fields(caller = %ctx.caller, height = %ctx.height))]
    pub async fn register_device(
        &self,
        ctx: TxContext,
        device: AccountId,
        label: &str,
        kind: AssetKind,
        asset_id: AssetId,
    ) -> Result<(), EngineError> {
        let _guard = self.commit_lock.lock().await;
        let result = self
            .register_device_locked(ctx, device, label, kind, asset_id)
            .await;
        self.record_outcome(result.as_ref().err()).await;
        result
    }

    async fn register_device_locked(
        &self,
        ctx: TxContext,
        device: AccountId,
        label: &str,
        kind: AssetKind,
        asset_id: AssetId,
    ) -> Result<(), EngineError> {
        let config = self.config.read().await.clone();
        if !authorization::is_admin(&config.admin, &ctx.caller) {
            warn!("rejecting register_device from non-admin caller");
            return Err(EngineError::Unauthorized);
        }
        if !services::is_valid_label(label) {
            return Err(EngineError::BadSensor);
        }
        if !self.state.asset_exists(asset_id).await? {
            return Err(EngineError::InvalidAsset(asset_id));
        }

        // Re-registration overwrites the record and restores authorization.
        self.state
            .put_device(
                device,
                Device::new(label.to_string(), kind, asset_id, ctx.height),
            )
            .await?;

        info!(device = %device, asset_id = %asset_id, kind = %kind, "device registered");
        self.publish(
            ctx.height,
            CivicEvent::DeviceRegistered(DeviceRegisteredPayload {
                device,
                kind,
                asset_id,
            }),
        );
        Ok(())
    }

    /// Deactivates a device. See [`CivicAssetApi::deactivate_device`].
    #[instrument(skip(self), fields(caller = %ctx.caller, height = %ctx.height))]
    pub async fn deactivate_device(
        &self,
        ctx: TxContext,
        device: AccountId,
    ) -> Result<(), EngineError> {
        let _guard = self.commit_lock.lock().await;
        let result = self.deactivate_device_locked(ctx, device).await;
        self.record_outcome(result.as_ref().err()).await;
        result
    }

    async fn deactivate_device_locked(
        &self,
        ctx: TxContext,
        device: AccountId,
    ) -> Result<(), EngineError> {
        let config = self.config.read().await.clone();
        if !authorization::is_admin(&config.admin, &ctx.caller) {
            warn!("rejecting deactivate_device from non-admin caller");
            return Err(EngineError::Unauthorized);
        }

        let record = self
            .state
            .get_device(device)
            .await?
            .ok_or(EngineError::SensorNotFound(device))?;

        // Record stays queryable; only the flags flip.
        self.state.put_device(device, record.deactivate()).await?;

        info!(device = %device, "device deactivated");
        self.publish(
            ctx.height,
            CivicEvent::DeviceDeactivated(DeviceDeactivatedPayload { device }),
        );
        Ok(())
    }

    /// Refreshes the caller's heartbeat. See
    /// [`CivicAssetApi::device_heartbeat`].
    #[instrument(skip(self), fields(caller = %ctx.caller, height = %ctx.height))]
    pub async fn device_heartbeat(&self, ctx: TxContext) -> Result<(), EngineError> {
        let _guard = self.commit_lock.lock().await;
        let result = self.device_heartbeat_locked(ctx).await;
        self.record_outcome(result.as_ref().err()).await;
        result
    }

    async fn device_heartbeat_locked(&self, ctx: TxContext) -> Result<(), EngineError> {
        let record = self
            .state
            .get_device(ctx.caller)
            .await?
            .ok_or(EngineError::SensorNotFound(ctx.caller))?;

        // Heartbeat is not re-authorization; only the timestamp moves.
        self.state
            .put_device(ctx.caller, record.with_heartbeat(ctx.height))
            .await?;

        debug!(device = %ctx.caller, "heartbeat recorded");
        self.publish(
            ctx.height,
            CivicEvent::DeviceHeartbeat(DeviceHeartbeatPayload { device: ctx.caller }),
        );
        Ok(())
    }

    /// Changes the energy rate. See [`CivicAssetApi::set_power_rate`].
    #[instrument(skip(self), fields(caller = %ctx.caller))]
    pub async fn set_power_rate(&self, ctx: TxContext, rate: u64) -> Result<(), EngineError> {
        let _guard = self.commit_lock.lock().await;
        let result = self.set_power_rate_locked(ctx, rate).await;
        self.record_outcome(result.as_ref().err()).await;
        result
    }

    async fn set_power_rate_locked(&self, ctx: TxContext, rate: u64) -> Result<(), EngineError> {
        let mut config = self.config.write().await;
        if !authorization::is_admin(&config.admin, &ctx.caller) {
            warn!("rejecting set_power_rate from non-admin caller");
            return Err(EngineError::Unauthorized);
        }
        if !services::is_valid_unit_cost(rate) {
            return Err(EngineError::BadPrice {
                cost: rate,
                max: limits::MAX_UNIT_COST,
            });
        }

        config.power_rate = rate;
        info!(rate, "power rate updated");
        Ok(())
    }
}

/// Create a service with in-memory adapters (for testing).
#[must_use]
pub fn create_test_service(
    admin: AccountId,
) -> CivicAssetService<InMemoryCityState, InMemoryBank, RecordingEventSink> {
    CivicAssetService::new(
        InMemoryCityState::new(),
        InMemoryBank::new(),
        RecordingEventSink::new(),
        ServiceConfig::new(admin),
    )
}

// =============================================================================
// CivicAssetApi Implementation
// =============================================================================

#[async_trait]
impl<S: StateAccess, B: ValueTransfer, E: EventSink> CivicAssetApi
    for CivicAssetService<S, B, E>
{
    async fn register_resource(
        &self,
        ctx: TxContext,
        kind: AssetKind,
        location: &str,
        allocation: u64,
        unit_cost: u64,
    ) -> Result<AssetId, EngineError> {
        Self::register_resource(self, ctx, kind, location, allocation, unit_cost).await
    }

    async fn reserve_parking(
        &self,
        ctx: TxContext,
        asset_id: AssetId,
        vehicle: &str,
        duration: u64,
    ) -> Result<(), EngineError> {
        Self::reserve_parking(self, ctx, asset_id, vehicle, duration).await
    }

    async fn update_waste_level(
        &self,
        ctx: TxContext,
        asset_id: AssetId,
        level: u8,
    ) -> Result<(), EngineError> {
        Self::update_waste_level(self, ctx, asset_id, level).await
    }

    async fn allocate_power(
        &self,
        ctx: TxContext,
        asset_id: AssetId,
        amount: u64,
    ) -> Result<(), EngineError> {
        Self::allocate_power(self, ctx, asset_id, amount).await
    }

    async fn register_device(
        &self,
        ctx: TxContext,
        device: AccountId,
        label: &str,
        kind: AssetKind,
        asset_id: AssetId,
    ) -> Result<(), EngineError> {
        Self::register_device(self, ctx, device, label, kind, asset_id).await
    }

    async fn deactivate_device(
        &self,
        ctx: TxContext,
        device: AccountId,
    ) -> Result<(), EngineError> {
        Self::deactivate_device(self, ctx, device).await
    }

    async fn device_heartbeat(&self, ctx: TxContext) -> Result<(), EngineError> {
        Self::device_heartbeat(self, ctx).await
    }

    async fn set_power_rate(&self, ctx: TxContext, rate: u64) -> Result<(), EngineError> {
        Self::set_power_rate(self, ctx, rate).await
    }

    async fn asset_info(&self, id: AssetId) -> Result<Option<Asset>, StoreError> {
        self.state.get_asset(id).await
    }

    async fn parking_status(&self, id: AssetId) -> Result<Option<ParkingSlot>, StoreError> {
        self.state.get_parking(id).await
    }

    async fn waste_status(&self, id: AssetId) -> Result<Option<WasteContainer>, StoreError> {
        self.state.get_waste(id).await
    }

    async fn power_allocation(
        &self,
        id: AssetId,
        account: AccountId,
    ) -> Result<Option<PowerAllocation>, StoreError> {
        self.state.get_power(id, account).await
    }

    async fn device_info(&self, device: AccountId) -> Result<Option<Device>, StoreError> {
        self.state.get_device(device).await
    }

    async fn asset_count(&self) -> Result<u64, StoreError> {
        self.state.asset_count().await
    }
}

// =============================================================================
// TESTS
// =============================================================================
