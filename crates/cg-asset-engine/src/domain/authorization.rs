//! # Authorization Guard
//!
//! Pure predicates deciding what a caller may do: the configured
//! administrator, an authorized device, or an unprivileged account.
//! No side effects; the service performs the device lookup and passes the
//! record in.

use crate::domain::entities::Device;
use crate::domain::value_objects::AccountId;

/// Returns true if `caller` is the configured administrator.
#[must_use]
pub fn is_admin(admin: &AccountId, caller: &AccountId) -> bool {
    admin == caller
}

/// Returns the authorization flag of a device record.
///
/// Defaults to false when no record exists for the caller.
#[must_use]
pub fn device_is_authorized(device: Option<&Device>) -> bool {
    device.is_some_and(|d| d.authorized)
}

/// Returns true if `caller` may submit sensor reports: the administrator, or
/// an identity whose device record carries the authorization flag.
#[must_use]
pub fn can_report(admin: &AccountId, caller: &AccountId, device: Option<&Device>) -> bool {
    is_admin(admin, caller) || device_is_authorized(device)
}

// =============================================================================
// TESTS
// =============================================================================
