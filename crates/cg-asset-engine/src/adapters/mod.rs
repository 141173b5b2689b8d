//! # Adapters Layer (Outer Hexagon)
//!
//! In-memory implementations of the driven ports, used by tests and by
//! `create_test_service`. Production deployments replace these with adapters
//! over the ledger substrate.

pub mod bank_adapter;
pub mod event_handler;
pub mod state_adapter;
pub mod table;

pub use bank_adapter::*;
pub use event_handler::*;
pub use state_adapter::*;
pub use table::*;
