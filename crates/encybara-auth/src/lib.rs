pub mod aggregator;
pub mod catalog;
pub mod error;
pub mod guard;
pub mod permissions;
pub mod types;
pub mod wire;

pub use aggregator::{ModuleGroup, RoleFormState, granted_ids_from_form_values, group_by_module};
pub use catalog::{ENDPOINTS, Endpoint, seed_catalog};
pub use error::AuthError;
pub use guard::{AccessOutcome, Principal, guard, require_permission};
pub use permissions::{AccessPolicy, is_allowed};
pub use types::*;
pub use wire::{
    LoginResponse, RawGrant, RawPermission, RolePermissionsUpdate, RoleRecord, RoleSubmission,
    decode_catalog, decode_principal, decode_role,
};
