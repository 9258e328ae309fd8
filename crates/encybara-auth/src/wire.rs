//! Backend JSON at the boundary.
//!
//! Responses arrive in a few shapes and with every field optional. Everything
//! is decoded into the loose `Raw*` types first and validated once into the
//! internal model, so nothing past this module branches on shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

use crate::aggregator::RoleFormState;
use crate::error::AuthError;
use crate::guard::Principal;
use crate::types::{GrantedSet, Permission, PermissionId};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPermission {
    pub id: Option<PermissionId>,
    pub name: Option<String>,
    pub api_path: Option<String>,
    pub method: Option<String>,
    pub module: Option<String>,
    pub created_by: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl TryFrom<RawPermission> for Permission {
    type Error = AuthError;

    fn try_from(raw: RawPermission) -> Result<Self, Self::Error> {
        let id = raw
            .id
            .ok_or_else(|| AuthError::InvalidInput("permission without id".into()))?;
        let missing = |field: &str| AuthError::InvalidInput(format!("permission {id}: missing {field}"));

        let api_path = raw.api_path.ok_or_else(|| missing("apiPath"))?;
        let module = raw.module.ok_or_else(|| missing("module"))?;
        let method = raw
            .method
            .ok_or_else(|| missing("method"))?
            .parse()
            .map_err(|e| AuthError::InvalidInput(format!("permission {id}: {e}")))?;

        Ok(Permission {
            id,
            name: raw.name.unwrap_or_default(),
            api_path,
            method,
            module,
            created_by: raw.created_by,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ResultPage {
    result: Vec<RawPermission>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogEnvelope {
    Bare(Vec<RawPermission>),
    Result { result: Vec<RawPermission> },
    Data { data: Vec<RawPermission> },
    Paged { data: ResultPage },
}

impl CatalogEnvelope {
    fn into_records(self) -> Vec<RawPermission> {
        match self {
            CatalogEnvelope::Bare(records)
            | CatalogEnvelope::Result { result: records }
            | CatalogEnvelope::Data { data: records } => records,
            CatalogEnvelope::Paged { data } => data.result,
        }
    }
}

/// Decode a permission catalog response. One invalid record fails the decode.
pub fn decode_catalog(json: &str) -> Result<Vec<Permission>, AuthError> {
    let value: Value = serde_json::from_str(json)?;
    reject_error_body(&value)?;
    let envelope: CatalogEnvelope = serde_json::from_value(value)?;
    envelope
        .into_records()
        .into_iter()
        .map(Permission::try_from)
        .collect()
}

/// One entry of a role's `permissions` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawGrant {
    Id(PermissionId),
    Object(RawPermission),
    Name(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRecord {
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub permissions: Vec<RawGrant>,
}

fn default_active() -> bool {
    true
}

impl RoleRecord {
    /// Ids of every grant that carries one. Non-numeric names are skipped.
    pub fn granted_ids(&self) -> BTreeSet<PermissionId> {
        self.permissions
            .iter()
            .filter_map(|grant| match grant {
                RawGrant::Id(id) => Some(*id),
                RawGrant::Object(raw) => raw.id,
                RawGrant::Name(name) => {
                    let parsed = name.trim().parse().ok();
                    if parsed.is_none() {
                        tracing::debug!(grant = %name, "Skipping non-numeric role grant");
                    }
                    parsed
                }
            })
            .collect()
    }

    /// Full permission records granted to this role. Bare ids carry no path or
    /// module and are left out.
    pub fn granted_set(&self) -> Result<GrantedSet, AuthError> {
        let mut granted = GrantedSet::new();
        for grant in &self.permissions {
            match grant {
                RawGrant::Object(raw) => granted.insert(Permission::try_from(raw.clone())?),
                RawGrant::Id(id) => {
                    tracing::debug!(permission_id = id, "Role grant without permission details");
                }
                RawGrant::Name(name) => {
                    tracing::debug!(grant = %name, "Role grant without permission details");
                }
            }
        }
        Ok(granted)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RoleEnvelope {
    Data { data: RoleRecord },
    Result { result: RoleRecord },
    Bare(RoleRecord),
}

/// Fail on a backend error body (`statusCode` of 400 or more).
fn reject_error_body(value: &Value) -> Result<(), AuthError> {
    let Some(status) = value.get("statusCode").and_then(Value::as_u64) else {
        return Ok(());
    };
    if status < 400 {
        return Ok(());
    }
    let message = match value.get("message") {
        Some(Value::String(message)) => message.clone(),
        Some(Value::Array(messages)) => messages
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join("; "),
        _ => String::from("no message"),
    };
    Err(AuthError::InvalidInput(format!("backend error {status}: {message}")))
}

/// Decode a role response (`{data: role}`, `{result: role}` or a bare role).
///
/// Error bodies and records with neither an id nor a name are rejected.
pub fn decode_role(json: &str) -> Result<RoleRecord, AuthError> {
    let value: Value = serde_json::from_str(json)?;
    reject_error_body(&value)?;
    let role = match serde_json::from_value(value)? {
        RoleEnvelope::Data { data } => data,
        RoleEnvelope::Result { result } => result,
        RoleEnvelope::Bare(role) => role,
    };
    if role.id.is_none() && role.name.trim().is_empty() {
        return Err(AuthError::InvalidInput(
            "role response has neither id nor name".into(),
        ));
    }
    Ok(role)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRecord {
    pub id: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: Option<RoleRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub admin: AdminRecord,
}

impl TryFrom<AdminRecord> for Principal {
    type Error = AuthError;

    fn try_from(admin: AdminRecord) -> Result<Self, Self::Error> {
        let granted = match admin.role {
            Some(ref role) => role.granted_set()?,
            None => GrantedSet::new(),
        };
        Ok(Principal {
            id: admin.id,
            email: admin.email,
            name: admin.name,
            granted,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PrincipalEnvelope {
    Login(LoginResponse),
    Admin(AdminRecord),
}

/// Decode the logged-in admin from a login response or a stored admin record.
pub fn decode_principal(json: &str) -> Result<Principal, AuthError> {
    let value: Value = serde_json::from_str(json)?;
    reject_error_body(&value)?;
    let admin = match serde_json::from_value(value)? {
        PrincipalEnvelope::Login(login) => login.admin,
        PrincipalEnvelope::Admin(admin) => admin,
    };
    Principal::try_from(admin)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PermissionRef {
    pub id: PermissionId,
}

/// Body of a role create (`POST`) or update (`PUT`) request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleSubmission {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub active: bool,
    pub permissions: Vec<PermissionRef>,
}

impl RoleSubmission {
    pub fn new(role: &RoleRecord, state: &RoleFormState) -> Self {
        Self {
            id: role.id,
            name: role.name.clone(),
            description: role.description.clone(),
            active: role.active,
            permissions: state
                .flatten()
                .into_iter()
                .map(|id| PermissionRef { id })
                .collect(),
        }
    }
}

/// Body of `POST /api/v1/roles/{id}/permissions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePermissionsUpdate {
    pub permission_ids: Vec<PermissionId>,
}

impl From<&RoleFormState> for RolePermissionsUpdate {
    fn from(state: &RoleFormState) -> Self {
        Self {
            permission_ids: state.flatten().into_iter().collect(),
        }
    }
}
