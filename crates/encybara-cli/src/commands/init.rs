use anyhow::Result;
use std::path::Path;

use encybara_auth::seed_catalog;
use encybara_core::EncybaraConfig;

pub fn run(base_dir: &Path) -> Result<()> {
    println!("Initializing Encybara in {}", base_dir.display());

    std::fs::create_dir_all(base_dir)?;

    let config_path = EncybaraConfig::default_path(base_dir);
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
    } else {
        let config = EncybaraConfig::default_config(base_dir);
        config.save(&config_path)?;
        println!("Created config: {}", config_path.display());
    }

    let config = EncybaraConfig::load(&config_path)?;
    let catalog_path = config.catalog_path(base_dir);
    if catalog_path.exists() {
        println!("Catalog already exists: {}", catalog_path.display());
    } else {
        let catalog = seed_catalog();
        if let Some(parent) = catalog_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&catalog_path, serde_json::to_string_pretty(&catalog)?)?;
        tracing::info!("Seeded {} permissions", catalog.len());
        println!("Created catalog: {}", catalog_path.display());
    }

    println!("\nEncybara initialized. Next steps:");
    println!("  1. Replace {} with a snapshot of GET /api/v1/permissions", catalog_path.display());
    println!("  2. Run `encybara modules` to review the catalog by module");

    Ok(())
}
