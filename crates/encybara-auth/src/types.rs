use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::AuthError;

/// Backend-assigned permission identifier.
pub type PermissionId = i64;

/// Marker used by wildcard permissions for both the API path and the method.
pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    #[serde(rename = "GET")]
    Get,
    #[serde(rename = "POST")]
    Post,
    #[serde(rename = "PUT")]
    Put,
    #[serde(rename = "PATCH")]
    Patch,
    #[serde(rename = "DELETE")]
    Delete,
    #[serde(rename = "*")]
    Any,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Any => WILDCARD,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            WILDCARD => Ok(Method::Any),
            other => Err(AuthError::InvalidInput(format!("unknown method: {other}"))),
        }
    }
}

/// A permission as defined in the backend catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: PermissionId,
    pub name: String,
    pub api_path: String,
    pub method: Method,
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Permission {
    pub fn new(
        id: PermissionId,
        name: impl Into<String>,
        method: Method,
        api_path: impl Into<String>,
        module: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            api_path: api_path.into(),
            method,
            module: module.into(),
            created_by: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Blanket grant for every operation in `module`.
    pub fn module_wildcard(id: PermissionId, module: impl Into<String>) -> Self {
        let module = module.into();
        Self::new(
            id,
            format!("Full access to {module}"),
            Method::Any,
            WILDCARD,
            module,
        )
    }

    pub fn is_wildcard(&self) -> bool {
        self.api_path == WILDCARD && self.method == Method::Any
    }
}

/// The capability a guarded route or element asks for.
///
/// Empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<Method>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
}

impl PermissionDescriptor {
    pub fn module(module: impl Into<String>) -> Self {
        Self {
            module: Some(module.into()),
            ..Self::default()
        }
    }

    pub fn resource(resource: impl Into<String>) -> Self {
        Self {
            resource: Some(resource.into()),
            ..Self::default()
        }
    }

    pub fn api(method: Method, api_path: impl Into<String>) -> Self {
        Self {
            api_path: Some(api_path.into()),
            method: Some(method),
            ..Self::default()
        }
    }

    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub(crate) fn module_field(&self) -> Option<&str> {
        non_empty(&self.module)
    }

    pub(crate) fn api_path_field(&self) -> Option<&str> {
        non_empty(&self.api_path)
    }

    pub(crate) fn resource_field(&self) -> Option<&str> {
        non_empty(&self.resource)
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

impl fmt::Display for PermissionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(resource) = self.resource_field() {
            parts.push(format!("resource={resource}"));
        }
        if let Some(module) = self.module_field() {
            parts.push(format!("module={module}"));
        }
        if let Some(method) = self.method {
            parts.push(format!("method={method}"));
        }
        if let Some(api_path) = self.api_path_field() {
            parts.push(format!("apiPath={api_path}"));
        }
        if parts.is_empty() {
            f.write_str("<empty descriptor>")
        } else {
            f.write_str(&parts.join(" "))
        }
    }
}

/// Permissions attached to a principal's role, unique by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantedSet {
    by_id: BTreeMap<PermissionId, Permission>,
}

impl GrantedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a permission, replacing any earlier one with the same id.
    pub fn insert(&mut self, permission: Permission) {
        self.by_id.insert(permission.id, permission);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.by_id.values()
    }

    pub fn ids(&self) -> BTreeSet<PermissionId> {
        self.by_id.keys().copied().collect()
    }

    pub fn contains_id(&self, id: PermissionId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl FromIterator<Permission> for GrantedSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        let mut set = Self::new();
        for permission in iter {
            set.insert(permission);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parse_is_case_insensitive() {
        assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("Delete".parse::<Method>().unwrap(), Method::Delete);
        assert_eq!("*".parse::<Method>().unwrap(), Method::Any);
        assert!("TRACE".parse::<Method>().is_err());
    }

    #[test]
    fn permission_uses_backend_field_names() {
        let perm = Permission::new(3, "Update role", Method::Put, "/api/v1/roles", "SYSTEM_MANAGEMENT");
        let json = serde_json::to_value(&perm).unwrap();
        assert_eq!(json["apiPath"], "/api/v1/roles");
        assert_eq!(json["method"], "PUT");
        assert!(json.get("createdAt").is_none());
    }

    #[test]
    fn module_wildcard_is_wildcard() {
        let perm = Permission::module_wildcard(99, "CONTENT_MANAGEMENT");
        assert!(perm.is_wildcard());
        assert_eq!(perm.module, "CONTENT_MANAGEMENT");

        let half = Permission::new(1, "", Method::Get, WILDCARD, "CONTENT_MANAGEMENT");
        assert!(!half.is_wildcard());
    }

    #[test]
    fn granted_set_is_unique_by_id() {
        let granted: GrantedSet = [
            Permission::new(1, "a", Method::Get, "/a", "M"),
            Permission::new(1, "b", Method::Post, "/b", "M"),
            Permission::new(2, "c", Method::Get, "/c", "M"),
        ]
        .into_iter()
        .collect();

        assert_eq!(granted.len(), 2);
        assert_eq!(granted.ids(), BTreeSet::from([1, 2]));
        let first = granted.iter().next().unwrap();
        assert_eq!(first.api_path, "/b");
    }

    #[test]
    fn descriptor_display_lists_set_fields() {
        let d = PermissionDescriptor::api(Method::Put, "/api/v1/roles").in_module("SYSTEM_MANAGEMENT");
        assert_eq!(
            d.to_string(),
            "module=SYSTEM_MANAGEMENT method=PUT apiPath=/api/v1/roles"
        );
        assert_eq!(PermissionDescriptor::default().to_string(), "<empty descriptor>");
    }
}
