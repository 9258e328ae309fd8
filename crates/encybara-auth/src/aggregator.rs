//! Role-edit form model.
//!
//! The catalog is grouped by module and turned into one switch per permission
//! plus one "all" switch per module. A module switch is on exactly when every
//! permission in the module is on; every edit goes through [`RoleFormState`]
//! so that stays true.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::types::{Permission, PermissionId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleGroup {
    pub module: String,
    pub permissions: Vec<Permission>,
}

impl ModuleGroup {
    pub fn ids(&self) -> impl Iterator<Item = PermissionId> + '_ {
        self.permissions.iter().map(|p| p.id)
    }
}

/// Group a flat catalog by module.
///
/// Modules come out in ascending byte order; permissions keep their catalog
/// order. When an id appears more than once the last record wins, at the
/// position of its last occurrence.
pub fn group_by_module(catalog: &[Permission]) -> Vec<ModuleGroup> {
    let last_seen: HashMap<PermissionId, usize> = catalog
        .iter()
        .enumerate()
        .map(|(idx, p)| (p.id, idx))
        .collect();

    let mut grouped: BTreeMap<&str, Vec<Permission>> = BTreeMap::new();
    for (idx, permission) in catalog.iter().enumerate() {
        if last_seen.get(&permission.id) != Some(&idx) {
            tracing::debug!(
                permission_id = permission.id,
                "Duplicate permission id in catalog, keeping the later record"
            );
            continue;
        }
        grouped
            .entry(permission.module.as_str())
            .or_default()
            .push(permission.clone());
    }

    grouped
        .into_iter()
        .map(|(module, permissions)| ModuleGroup {
            module: module.to_string(),
            permissions,
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleFormState {
    permissions: BTreeMap<PermissionId, bool>,
    modules: BTreeMap<String, bool>,
    members: BTreeMap<String, Vec<PermissionId>>,
}

impl RoleFormState {
    /// Build the form for a role whose granted permission ids are `granted`.
    ///
    /// Groups sharing a module name are merged. An id listed more than once
    /// belongs only to the module of its last occurrence, as in
    /// [`group_by_module`].
    pub fn build(groups: &[ModuleGroup], granted: &BTreeSet<PermissionId>) -> Self {
        let entries: Vec<(&str, PermissionId)> = groups
            .iter()
            .flat_map(|g| g.ids().map(move |id| (g.module.as_str(), id)))
            .collect();
        let last_seen: HashMap<PermissionId, usize> = entries
            .iter()
            .enumerate()
            .map(|(idx, (_, id))| (*id, idx))
            .collect();

        let mut state = Self::default();
        for group in groups {
            state.members.entry(group.module.clone()).or_default();
        }
        for (idx, (module, id)) in entries.iter().enumerate() {
            if last_seen.get(id) != Some(&idx) {
                tracing::debug!(
                    permission_id = id,
                    module,
                    "Permission listed again later, keeping the later module"
                );
                continue;
            }
            state.permissions.insert(*id, granted.contains(id));
            if let Some(ids) = state.members.get_mut(*module) {
                ids.push(*id);
            }
        }

        let modules: Vec<String> = state.members.keys().cloned().collect();
        for module in &modules {
            state.refresh_module(module);
        }
        state
    }

    /// Switch every permission of `module` to `value`.
    ///
    /// Returns false and leaves the state untouched if the module is unknown.
    pub fn toggle_module(&mut self, module: &str, value: bool) -> bool {
        let Some(ids) = self.members.get(module) else {
            tracing::debug!(module, "Ignoring toggle for unknown module");
            return false;
        };
        for id in ids {
            self.permissions.insert(*id, value);
        }
        self.refresh_module(module);
        true
    }

    /// Switch a single permission and re-derive its module flag.
    ///
    /// Returns false and leaves the state untouched if `module` is unknown or
    /// does not contain `permission_id`.
    pub fn toggle_permission(&mut self, permission_id: PermissionId, module: &str, value: bool) -> bool {
        let is_member = self
            .members
            .get(module)
            .is_some_and(|ids| ids.contains(&permission_id));
        if !is_member {
            tracing::debug!(permission_id, module, "Ignoring toggle for unknown permission");
            return false;
        }
        self.permissions.insert(permission_id, value);
        self.refresh_module(module);
        true
    }

    /// Granted permission ids. Module flags are never part of the result.
    pub fn flatten(&self) -> BTreeSet<PermissionId> {
        self.permissions
            .iter()
            .filter(|(_, checked)| **checked)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn is_checked(&self, permission_id: PermissionId) -> Option<bool> {
        self.permissions.get(&permission_id).copied()
    }

    pub fn module_checked(&self, module: &str) -> Option<bool> {
        self.modules.get(module).copied()
    }

    /// Module names with their "all checked" flag, in module order.
    pub fn modules(&self) -> impl Iterator<Item = (&str, bool)> {
        self.modules.iter().map(|(m, v)| (m.as_str(), *v))
    }

    /// Number of checked permissions in `module`, out of its total.
    pub fn module_progress(&self, module: &str) -> Option<(usize, usize)> {
        let ids = self.members.get(module)?;
        let checked = ids
            .iter()
            .filter(|id| self.permissions.get(*id).copied().unwrap_or(false))
            .count();
        Some((checked, ids.len()))
    }

    /// True when every module flag equals the AND of its permissions.
    pub fn is_consistent(&self) -> bool {
        self.members
            .keys()
            .all(|module| self.modules.get(module).copied() == Some(self.all_checked(module)))
    }

    /// Flat form values: permission ids and module names as keys.
    pub fn to_form_values(&self) -> Map<String, Value> {
        let mut values = Map::new();
        for (id, checked) in &self.permissions {
            values.insert(id.to_string(), Value::Bool(*checked));
        }
        for (module, checked) in &self.modules {
            values.insert(module.clone(), Value::Bool(*checked));
        }
        values
    }

    fn all_checked(&self, module: &str) -> bool {
        self.members.get(module).is_some_and(|ids| {
            ids.iter()
                .all(|id| self.permissions.get(id).copied().unwrap_or(false))
        })
    }

    fn refresh_module(&mut self, module: &str) {
        let all = self.all_checked(module);
        self.modules.insert(module.to_string(), all);
    }
}

/// Granted ids from submitted form values.
///
/// Only keys that look like a positive id (`^[1-9][0-9]*$`) with a JSON `true`
/// value count; module flags and anything else are ignored.
pub fn granted_ids_from_form_values(values: &Map<String, Value>) -> BTreeSet<PermissionId> {
    values
        .iter()
        .filter(|(_, v)| matches!(v, Value::Bool(true)))
        .filter_map(|(key, _)| parse_permission_key(key))
        .collect()
}

fn parse_permission_key(key: &str) -> Option<PermissionId> {
    let mut chars = key.chars();
    let first = chars.next()?;
    if !('1'..='9').contains(&first) || !chars.all(|c| c.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}
