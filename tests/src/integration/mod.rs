//! End-to-end flows exercising the public API through the in-memory adapters.

pub mod device_lifecycle;
pub mod parking_flow;
pub mod power_flow;
pub mod waste_flow;
