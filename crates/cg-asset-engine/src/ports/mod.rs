//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions for the asset engine. These are the interfaces between
//! the domain and the outside world.
//!
//! - **Driving Ports (Inbound)**: `CivicAssetApi`
//! - **Driven Ports (Outbound)**: `StateAccess`, `ValueTransfer`, `EventSink`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
