mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use encybara_auth::PermissionId;

#[derive(Parser)]
#[command(name = "encybara")]
#[command(about = "Permission tooling for the Encybara admin console")]
#[command(version)]
struct Cli {
    /// Path to the Encybara config directory (default: ~/.encybara)
    #[arg(long, global = true, env = "ENCYBARA_HOME")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the config file and a sample permission catalog
    Init,

    /// Show current configuration
    Config,

    /// Group a permission catalog by module
    Modules {
        /// Catalog JSON (default: catalog path from config)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Check whether an admin may access a guarded capability
    Check {
        /// Login response or admin record JSON
        #[arg(long)]
        principal: PathBuf,
        #[arg(long)]
        module: Option<String>,
        #[arg(long)]
        api_path: Option<String>,
        /// GET, POST, PUT, PATCH or DELETE
        #[arg(long)]
        method: Option<String>,
        /// Fragment matched against granted API paths
        #[arg(long)]
        resource: Option<String>,
    },

    /// Edit a role's permissions and print the resulting submission
    RoleForm {
        /// Catalog JSON (default: catalog path from config)
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Role JSON as returned by the backend
        #[arg(long)]
        role: PathBuf,
        /// Grant every permission of a module
        #[arg(long = "grant-module")]
        grant_modules: Vec<String>,
        /// Revoke every permission of a module
        #[arg(long = "revoke-module")]
        revoke_modules: Vec<String>,
        /// Grant a single permission id
        #[arg(long = "grant")]
        grants: Vec<PermissionId>,
        /// Revoke a single permission id
        #[arg(long = "revoke")]
        revokes: Vec<PermissionId>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("encybara=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let base_dir = match cli.config_dir {
        Some(ref dir) => dir.clone(),
        None => encybara_core::EncybaraConfig::default_base_dir()?,
    };

    match cli.command {
        Commands::Init => commands::init::run(&base_dir),
        Commands::Config => commands::config::run(&base_dir),
        Commands::Modules { ref catalog } => commands::modules::run(&base_dir, catalog.as_deref()),
        Commands::Check {
            ref principal,
            ref module,
            ref api_path,
            ref method,
            ref resource,
        } => commands::check::run(
            &base_dir,
            principal,
            commands::check::DescriptorArgs {
                module: module.clone(),
                api_path: api_path.clone(),
                method: method.clone(),
                resource: resource.clone(),
            },
        ),
        Commands::RoleForm {
            ref catalog,
            ref role,
            ref grant_modules,
            ref revoke_modules,
            ref grants,
            ref revokes,
        } => commands::role_form::run(
            &base_dir,
            catalog.as_deref(),
            role,
            &commands::role_form::Edits {
                grant_modules: grant_modules.clone(),
                revoke_modules: revoke_modules.clone(),
                grants: grants.clone(),
                revokes: revokes.clone(),
            },
        ),
    }
}
