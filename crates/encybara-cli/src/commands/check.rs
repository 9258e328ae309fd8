use anyhow::{Context, Result};
use std::path::Path;

use encybara_auth::{
    AccessPolicy, Method, PermissionDescriptor, decode_principal, require_permission,
};
use encybara_core::EncybaraConfig;
use encybara_core::config::ACL_ENABLE_ENV;

pub struct DescriptorArgs {
    pub module: Option<String>,
    pub api_path: Option<String>,
    pub method: Option<String>,
    pub resource: Option<String>,
}

impl DescriptorArgs {
    fn into_descriptor(self) -> Result<PermissionDescriptor> {
        let method = self.method.as_deref().map(str::parse::<Method>).transpose()?;
        Ok(PermissionDescriptor {
            module: self.module,
            api_path: self.api_path,
            method,
            resource: self.resource,
        })
    }
}

/// Policy from `encybara.toml` (defaults when absent) with the env override applied.
fn resolve_policy(base_dir: &Path, acl_override: Option<&str>) -> Result<AccessPolicy> {
    let config_path = EncybaraConfig::default_path(base_dir);
    let mut config = if config_path.exists() {
        EncybaraConfig::load(&config_path)?
    } else {
        EncybaraConfig::default_config(base_dir)
    };
    config.apply_acl_override(acl_override);
    Ok(AccessPolicy::from_acl_enabled(config.acl.enabled))
}

pub fn run(base_dir: &Path, principal_path: &Path, args: DescriptorArgs) -> Result<()> {
    let acl_override = std::env::var(ACL_ENABLE_ENV).ok();
    let policy = resolve_policy(base_dir, acl_override.as_deref())?;

    let json = std::fs::read_to_string(principal_path)
        .with_context(|| format!("reading principal {}", principal_path.display()))?;
    let principal = decode_principal(&json)?;
    let descriptor = args.into_descriptor()?;

    match require_permission(&principal, &descriptor, policy) {
        Ok(()) => {
            println!("allow  {} -> {descriptor}", principal.email);
            Ok(())
        }
        Err(e) => {
            println!("deny   {} -> {descriptor}", principal.email);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(method: Option<&str>) -> DescriptorArgs {
        DescriptorArgs {
            module: Some("SYSTEM_MANAGEMENT".into()),
            api_path: Some("/api/v1/roles".into()),
            method: method.map(String::from),
            resource: None,
        }
    }

    #[test]
    fn method_flag_is_parsed() {
        let d = args(Some("put")).into_descriptor().unwrap();
        assert_eq!(d.method, Some(Method::Put));
        assert!(args(None).into_descriptor().unwrap().method.is_none());
    }

    #[test]
    fn env_override_applies_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve_policy(dir.path(), None).unwrap(), AccessPolicy::Enforced);
        assert_eq!(
            resolve_policy(dir.path(), Some("false")).unwrap(),
            AccessPolicy::Disabled
        );
        assert_eq!(
            resolve_policy(dir.path(), Some("nope")).unwrap(),
            AccessPolicy::Enforced
        );
    }

    #[test]
    fn env_override_beats_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = EncybaraConfig::default_config(dir.path());
        config.acl.enabled = false;
        config.save(&EncybaraConfig::default_path(dir.path())).unwrap();

        assert_eq!(resolve_policy(dir.path(), None).unwrap(), AccessPolicy::Disabled);
        assert_eq!(
            resolve_policy(dir.path(), Some("TRUE")).unwrap(),
            AccessPolicy::Enforced
        );
    }

    #[test]
    fn unknown_method_flag_is_rejected() {
        assert!(args(Some("FETCH")).into_descriptor().is_err());
    }
}
