//! # CivicGrid Asset Engine
//!
//! Transition engine governing shared municipal resources: parking slots,
//! waste containers, and power capacity. A single administrator provisions
//! assets and devices; citizens pay to reserve capacity; authorized devices
//! report telemetry. All state lives in a keyed store behind the
//! [`StateAccess`](ports::outbound::StateAccess) port, and every mutation is
//! assert-then-act: a failed operation has zero observable effect.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | `available <= allocation`, bounds respected | `domain/invariants.rs` - `check_asset_invariant()` |
//! | INVARIANT-2 | Occupied slot always names a vehicle | `domain/invariants.rs` - `check_parking_invariant()` |
//! | INVARIANT-3 | Maintenance flag tracks fill level | `domain/invariants.rs` - `check_waste_invariant()` |
//! | INVARIANT-4 | `consumed <= reserved` per allocation | `domain/invariants.rs` - `check_power_invariant()` |
//! | INVARIANT-5 | No partial writes on failure | `service.rs` - assert-then-act ordering |
//!
//! ## Authorization
//!
//! - **Admin-only**: `register_resource`, `register_device`,
//!   `deactivate_device`, `set_power_rate`
//! - **Admin or authorized device**: `update_waste_level`
//! - **Any funded caller**: `reserve_parking`, `allocate_power`
//! - Deactivated devices stay queryable but lose reporting rights until
//!   re-registered.
//!
//! ## Outbound Dependencies
//!
//! | Collaborator | Trait | Purpose |
//! |--------------|-------|---------|
//! | Keyed store | [`StateAccess`](ports::outbound::StateAccess) | Read/write engine records |
//! | Ledger bank | [`ValueTransfer`](ports::outbound::ValueTransfer) | Collect fees into the admin account |
//! | Message bus | [`EventSink`](ports::outbound::EventSink) | One event per committed operation |
//!
//! ## Components
//!
//! | Component | Location | Purpose |
//! |-----------|----------|---------|
//! | Entities | `domain/entities.rs` | Asset, slot, container, allocation, device records |
//! | Pricing | `domain/services.rs` | Fee and expiry arithmetic, field validation |
//! | Authorization | `domain/authorization.rs` | Admin and device guards |
//! | Service | `service.rs` | Serialized assert-then-act transitions |
//! | Adapters | `adapters/` | In-memory store, bank, and event sink |
//!
//! ## Usage Example
//!
//! ```ignore
//! use cg_asset_engine::prelude::*;
//!
//! let service = create_test_service(admin);
//! let ctx = TxContext::new(admin, BlockHeight::new(1));
//!
//! let lot = service
//!     .register_resource(ctx, AssetKind::Parking, "lot-a", 50, 200)
//!     .await?;
//! service.reserve_parking(driver_ctx, lot, "CG-123", 5).await?;
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        Asset, AssetKind, Device, ParkingSlot, PowerAllocation, TxContext, WasteContainer,
    };

    // Value objects
    pub use crate::domain::value_objects::{AccountId, AssetId, BlockHeight};

    // Domain services
    pub use crate::domain::services::{
        expiry_height, needs_maintenance, parking_fee, power_cost,
    };

    // Invariants
    pub use crate::domain::invariants::{
        check_all_invariants, limits, InvariantCheckResult, InvariantViolation,
    };

    // Ports
    pub use crate::ports::inbound::CivicAssetApi;
    pub use crate::ports::outbound::{EventSink, StateAccess, ValueTransfer};

    // Events
    pub use crate::events::{topics, CivicEvent, EventEnvelope};

    // Errors
    pub use crate::errors::{EngineError, StoreError, TransferError};

    // Adapters
    pub use crate::adapters::{InMemoryBank, InMemoryCityState, RecordingEventSink};

    // Service
    pub use crate::service::{
        create_test_service, CivicAssetService, ServiceConfig, ServiceStats,
    };
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name used in logs and event routing.
pub const SERVICE_NAME: &str = "civic-asset-engine";

// =============================================================================
// TESTS
// =============================================================================
