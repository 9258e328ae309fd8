use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that can switch ACL enforcement on or off.
pub const ACL_ENABLE_ENV: &str = "ENCYBARA_ACL_ENABLE";

/// Top-level Encybara admin configuration stored as TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncybaraConfig {
    #[serde(default)]
    pub acl: AclConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AclConfig {
    /// When false, every access check passes. Only meant for local development.
    #[serde(default = "default_acl_enabled")]
    pub enabled: bool,
}

impl Default for AclConfig {
    fn default() -> Self {
        Self {
            enabled: default_acl_enabled(),
        }
    }
}

fn default_acl_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to the permission catalog snapshot (JSON).
    #[serde(default)]
    pub path: Option<String>,
}

impl EncybaraConfig {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CoreError::TomlDe(e.to_string()))
    }

    /// Load config from a TOML file, then apply environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_acl_override(std::env::var(ACL_ENABLE_ENV).ok().as_deref());
        Ok(config)
    }

    /// Save config to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| CoreError::TomlSer(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply the value of `ENCYBARA_ACL_ENABLE`. Only `true`/`false` are honoured.
    pub fn apply_acl_override(&mut self, value: Option<&str>) {
        let Some(raw) = value else {
            return;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "false" => self.acl.enabled = false,
            "true" => self.acl.enabled = true,
            other => {
                tracing::warn!("Ignoring {ACL_ENABLE_ENV}={other:?}: expected true or false");
            }
        }
    }

    /// Default config for `encybara init`.
    pub fn default_config(base_dir: &Path) -> Self {
        Self {
            acl: AclConfig::default(),
            catalog: CatalogConfig {
                path: Some(Self::default_catalog_path(base_dir).display().to_string()),
            },
        }
    }

    /// Resolve the catalog snapshot path, falling back to `<base_dir>/permissions.json`.
    pub fn catalog_path(&self, base_dir: &Path) -> PathBuf {
        match self.catalog.path {
            Some(ref p) => PathBuf::from(p),
            None => Self::default_catalog_path(base_dir),
        }
    }

    /// Resolve the config file path: `<base_dir>/encybara.toml`
    pub fn default_path(base_dir: &Path) -> PathBuf {
        base_dir.join("encybara.toml")
    }

    pub fn default_catalog_path(base_dir: &Path) -> PathBuf {
        base_dir.join("permissions.json")
    }

    /// Resolve the default encybara home directory: `~/.encybara`
    pub fn default_base_dir() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|h| h.join(".encybara"))
            .ok_or_else(|| CoreError::Config("Cannot determine home directory".to_string()))
    }
}
