use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

use encybara_auth::{PermissionId, RoleFormState, RoleSubmission, decode_role, group_by_module};

use super::modules::{load_catalog, resolve_catalog};

/// Edits applied in order: module grants, module revokes, id grants, id revokes.
pub struct Edits {
    pub grant_modules: Vec<String>,
    pub revoke_modules: Vec<String>,
    pub grants: Vec<PermissionId>,
    pub revokes: Vec<PermissionId>,
}

pub fn run(base_dir: &Path, catalog: Option<&Path>, role_path: &Path, edits: &Edits) -> Result<()> {
    let catalog_path = resolve_catalog(base_dir, catalog)?;
    let groups = group_by_module(&load_catalog(&catalog_path)?);

    let json = std::fs::read_to_string(role_path)
        .with_context(|| format!("reading role {}", role_path.display()))?;
    let role = decode_role(&json)?;

    let mut state = RoleFormState::build(&groups, &role.granted_ids());
    let module_of: HashMap<PermissionId, &str> = groups
        .iter()
        .flat_map(|g| g.ids().map(move |id| (id, g.module.as_str())))
        .collect();

    for module in &edits.grant_modules {
        apply_module(&mut state, module, true);
    }
    for module in &edits.revoke_modules {
        apply_module(&mut state, module, false);
    }
    for id in &edits.grants {
        apply_permission(&mut state, &module_of, *id, true);
    }
    for id in &edits.revokes {
        apply_permission(&mut state, &module_of, *id, false);
    }

    println!("Role: {} ({})", role.name, if role.active { "active" } else { "inactive" });
    for (module, all) in state.modules() {
        let (checked, total) = state.module_progress(module).unwrap_or((0, 0));
        let mark = if all { "[x]" } else { "[ ]" };
        println!("  {mark} {module:<24} {checked}/{total}");
    }
    println!();
    println!("{}", serde_json::to_string_pretty(&RoleSubmission::new(&role, &state))?);

    Ok(())
}

fn apply_module(state: &mut RoleFormState, module: &str, value: bool) {
    if !state.toggle_module(module, value) {
        tracing::warn!("Unknown module '{module}', skipped");
    }
}

fn apply_permission(
    state: &mut RoleFormState,
    module_of: &HashMap<PermissionId, &str>,
    id: PermissionId,
    value: bool,
) {
    match module_of.get(&id) {
        Some(module) => {
            state.toggle_permission(id, module, value);
        }
        None => tracing::warn!("Permission {id} is not in the catalog, skipped"),
    }
}
