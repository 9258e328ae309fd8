use crate::types::{GrantedSet, Permission, PermissionDescriptor};

/// Decide whether `granted` covers `requested`.
///
/// Branches are checked in priority order: `resource` (substring of a granted
/// API path), then `module` alone (any grant in that module), then `apiPath`
/// (exact path with optional module and method filters, or a module wildcard).
/// A descriptor with none of those fields is denied.
pub fn is_allowed(granted: &GrantedSet, requested: &PermissionDescriptor) -> bool {
    let allowed = if let Some(resource) = requested.resource_field() {
        granted.iter().any(|p| p.api_path.contains(resource))
    } else {
        let module = requested.module_field();
        match requested.api_path_field() {
            None => match module {
                Some(module) => granted.iter().any(|p| p.module == module),
                None => {
                    tracing::debug!("Denying empty permission descriptor");
                    return false;
                }
            },
            Some(api_path) => {
                let in_module = |p: &Permission| module.is_none_or(|m| p.module == m);
                let exact = granted.iter().any(|p| {
                    in_module(p)
                        && p.api_path == api_path
                        && requested.method.is_none_or(|m| p.method == m)
                });
                exact || granted.iter().any(|p| in_module(p) && p.is_wildcard())
            }
        }
    };

    if !allowed {
        tracing::debug!(descriptor = %requested, granted = granted.len(), "Denying permission");
    }
    allowed
}

/// Whether access checks are enforced at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccessPolicy {
    #[default]
    Enforced,
    /// Every request is allowed. Set through `acl.enabled = false` only.
    Disabled,
}

impl AccessPolicy {
    pub fn from_acl_enabled(enabled: bool) -> Self {
        if enabled {
            AccessPolicy::Enforced
        } else {
            tracing::warn!("ACL enforcement is disabled: every permission check will pass");
            AccessPolicy::Disabled
        }
    }

    pub fn allows(&self, granted: &GrantedSet, requested: &PermissionDescriptor) -> bool {
        match self {
            AccessPolicy::Enforced => is_allowed(granted, requested),
            AccessPolicy::Disabled => true,
        }
    }
}
