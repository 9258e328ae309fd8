use crate::error::AuthError;
use crate::permissions::AccessPolicy;
use crate::types::{GrantedSet, PermissionDescriptor};

/// The logged-in admin, with the permissions of their role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub granted: GrantedSet,
}

/// What a guarded element should do for the current principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOutcome {
    Render,
    /// Denied, and the element asked to disappear silently.
    Hide,
    /// Denied; show a 403 notice in place of the element.
    Forbidden,
}

pub fn require_permission(
    principal: &Principal,
    descriptor: &PermissionDescriptor,
    policy: AccessPolicy,
) -> Result<(), AuthError> {
    if policy.allows(&principal.granted, descriptor) {
        Ok(())
    } else {
        Err(AuthError::Forbidden(format!(
            "{} lacks permission: {descriptor}",
            principal.email
        )))
    }
}

/// Resolve a guarded element. No principal means nobody is logged in.
pub fn guard(
    principal: Option<&Principal>,
    descriptor: &PermissionDescriptor,
    policy: AccessPolicy,
    hide_children: bool,
) -> AccessOutcome {
    let allowed = match principal {
        Some(p) => policy.allows(&p.granted, descriptor),
        None => policy.allows(&GrantedSet::new(), descriptor),
    };

    if allowed {
        AccessOutcome::Render
    } else if hide_children {
        AccessOutcome::Hide
    } else {
        AccessOutcome::Forbidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::system;
    use crate::types::{Method, Permission};

    fn editor() -> Principal {
        Principal {
            id: 1,
            email: "editor@encybara.vn".into(),
            name: "Editor".into(),
            granted: [Permission::new(
                3,
                "Update role",
                Method::Put,
                "/api/v1/roles",
                "SYSTEM_MANAGEMENT",
            )]
            .into_iter()
            .collect(),
        }
    }

    #[test]
    fn require_permission_reports_descriptor() {
        let p = editor();
        assert!(require_permission(&p, &system::roles::UPDATE.descriptor(), AccessPolicy::Enforced).is_ok());

        let err = require_permission(&p, &system::roles::DELETE.descriptor(), AccessPolicy::Enforced)
            .unwrap_err();
        match err {
            AuthError::Forbidden(msg) => {
                assert!(msg.contains("editor@encybara.vn"));
                assert!(msg.contains("/api/v1/roles/{id}"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn guard_outcomes() {
        let p = editor();
        let delete = system::roles::DELETE.descriptor();
        assert_eq!(
            guard(Some(&p), &system::roles::UPDATE.descriptor(), AccessPolicy::Enforced, false),
            AccessOutcome::Render
        );
        assert_eq!(guard(Some(&p), &delete, AccessPolicy::Enforced, true), AccessOutcome::Hide);
        assert_eq!(
            guard(Some(&p), &delete, AccessPolicy::Enforced, false),
            AccessOutcome::Forbidden
        );
    }

    #[test]
    fn anonymous_is_denied_unless_acl_disabled() {
        let d = system::admins::GET_PAGINATE.descriptor();
        assert_eq!(guard(None, &d, AccessPolicy::Enforced, false), AccessOutcome::Forbidden);
        assert_eq!(guard(None, &d, AccessPolicy::Disabled, false), AccessOutcome::Render);
    }
}
