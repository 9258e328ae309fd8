use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use encybara_auth::{Permission, decode_catalog, group_by_module};
use encybara_core::EncybaraConfig;

/// Catalog path from the command line, or from the config file.
pub fn resolve_catalog(base_dir: &Path, catalog: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = catalog {
        return Ok(path.to_path_buf());
    }
    let config = EncybaraConfig::load(&EncybaraConfig::default_path(base_dir))?;
    Ok(config.catalog_path(base_dir))
}

pub fn load_catalog(path: &Path) -> Result<Vec<Permission>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;
    let catalog =
        decode_catalog(&json).with_context(|| format!("decoding catalog {}", path.display()))?;
    tracing::info!("Loaded {} permissions from {}", catalog.len(), path.display());
    Ok(catalog)
}

pub fn run(base_dir: &Path, catalog: Option<&Path>) -> Result<()> {
    let path = resolve_catalog(base_dir, catalog)?;
    let groups = group_by_module(&load_catalog(&path)?);

    if groups.is_empty() {
        println!("Catalog {} is empty.", path.display());
        return Ok(());
    }

    for group in &groups {
        println!("{} ({})", group.module, group.permissions.len());
        for p in &group.permissions {
            println!("  {:>5}  {:<7} {:<36} {}", p.id, p.method, p.api_path, p.name);
        }
        println!();
    }

    Ok(())
}
