use anyhow::Result;
use std::path::Path;

use encybara_core::EncybaraConfig;
use encybara_core::config::ACL_ENABLE_ENV;

pub fn run(base_dir: &Path) -> Result<()> {
    let config_path = EncybaraConfig::default_path(base_dir);
    let config = EncybaraConfig::load_with_env(&config_path)?;

    println!("Config: {}", config_path.display());
    println!();
    println!("  ACL enforced:   {}", config.acl.enabled);
    println!("  Catalog:        {}", config.catalog_path(base_dir).display());
    println!();

    if !config.acl.enabled {
        println!("  Every permission check passes while ACL is disabled.");
        println!("  Set `[acl] enabled = true` in {} and unset {ACL_ENABLE_ENV}.", config_path.display());
    }

    Ok(())
}
