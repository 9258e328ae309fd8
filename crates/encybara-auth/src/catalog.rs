use crate::types::{Method, Permission, PermissionDescriptor, PermissionId};

pub const SYSTEM_MANAGEMENT: &str = "SYSTEM_MANAGEMENT";
pub const CONTENT_MANAGEMENT: &str = "CONTENT_MANAGEMENT";

pub const MODULES: &[&str] = &[SYSTEM_MANAGEMENT, CONTENT_MANAGEMENT];

/// A guarded admin endpoint known at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub name: &'static str,
    pub method: Method,
    pub api_path: &'static str,
    pub module: &'static str,
}

impl Endpoint {
    const fn new(
        name: &'static str,
        method: Method,
        api_path: &'static str,
        module: &'static str,
    ) -> Self {
        Self {
            name,
            method,
            api_path,
            module,
        }
    }

    pub fn descriptor(&self) -> PermissionDescriptor {
        PermissionDescriptor::api(self.method, self.api_path).in_module(self.module)
    }
}

pub mod system {
    use super::{Endpoint, SYSTEM_MANAGEMENT as M};
    use crate::types::Method::*;

    pub mod permissions {
        use super::*;
        pub const GET_PAGINATE: Endpoint = Endpoint::new("List permissions", Get, "/api/v1/permissions", M);
        pub const CREATE: Endpoint = Endpoint::new("Create permission", Post, "/api/v1/permissions", M);
        pub const UPDATE: Endpoint = Endpoint::new("Update permission", Put, "/api/v1/permissions", M);
        pub const DELETE: Endpoint = Endpoint::new("Delete permission", Delete, "/api/v1/permissions/{id}", M);
    }

    pub mod roles {
        use super::*;
        pub const GET_PAGINATE: Endpoint = Endpoint::new("List roles", Get, "/api/v1/roles", M);
        pub const CREATE: Endpoint = Endpoint::new("Create role", Post, "/api/v1/roles", M);
        pub const UPDATE: Endpoint = Endpoint::new("Update role", Put, "/api/v1/roles", M);
        pub const DELETE: Endpoint = Endpoint::new("Delete role", Delete, "/api/v1/roles/{id}", M);
    }

    pub mod admins {
        use super::*;
        pub const GET_PAGINATE: Endpoint = Endpoint::new("List admins", Get, "/api/v1/admins", M);
        pub const CREATE: Endpoint = Endpoint::new("Create admin", Post, "/api/v1/admins", M);
        pub const UPDATE: Endpoint = Endpoint::new("Update admin", Put, "/api/v1/admins", M);
        pub const DELETE: Endpoint = Endpoint::new("Delete admin", Delete, "/api/v1/admins/{id}", M);
    }
}

pub mod content {
    use super::{CONTENT_MANAGEMENT as M, Endpoint};
    use crate::types::Method::*;

    pub mod courses {
        use super::*;
        pub const GET_PAGINATE: Endpoint = Endpoint::new("List courses", Get, "/api/v1/courses", M);
        pub const GET_BY_ID: Endpoint = Endpoint::new("Get course", Get, "/api/v1/courses/{id}", M);
        pub const CREATE: Endpoint = Endpoint::new("Create course", Post, "/api/v1/courses", M);
        pub const UPDATE: Endpoint = Endpoint::new("Update course", Put, "/api/v1/courses", M);
        pub const DELETE: Endpoint = Endpoint::new("Delete course", Delete, "/api/v1/courses/{id}", M);
        pub const ADD_LESSON: Endpoint =
            Endpoint::new("Add lesson to course", Post, "/api/v1/courses/{id}/lessons", M);
    }

    pub mod lessons {
        use super::*;
        pub const GET_PAGINATE: Endpoint = Endpoint::new("List lessons", Get, "/api/v1/lessons", M);
        pub const GET_BY_ID: Endpoint = Endpoint::new("Get lesson", Get, "/api/v1/lessons/{id}", M);
        pub const CREATE: Endpoint = Endpoint::new("Create lesson", Post, "/api/v1/lessons", M);
        pub const UPDATE: Endpoint = Endpoint::new("Update lesson", Put, "/api/v1/lessons", M);
        pub const DELETE: Endpoint = Endpoint::new("Delete lesson", Delete, "/api/v1/lessons/{id}", M);
        pub const ADD_QUESTION: Endpoint =
            Endpoint::new("Add question to lesson", Post, "/api/v1/lessons/{id}/questions", M);
    }

    pub mod questions {
        use super::*;
        pub const GET_PAGINATE: Endpoint = Endpoint::new("List questions", Get, "/api/v1/questions", M);
        pub const GET_BY_ID: Endpoint = Endpoint::new("Get question", Get, "/api/v1/questions/{id}", M);
        pub const CREATE: Endpoint = Endpoint::new("Create question", Post, "/api/v1/questions", M);
        pub const UPDATE: Endpoint = Endpoint::new("Update question", Put, "/api/v1/questions", M);
        pub const DELETE: Endpoint = Endpoint::new("Delete question", Delete, "/api/v1/questions/{id}", M);
    }
}

pub const ENDPOINTS: &[Endpoint] = &[
    system::permissions::GET_PAGINATE,
    system::permissions::CREATE,
    system::permissions::UPDATE,
    system::permissions::DELETE,
    system::roles::GET_PAGINATE,
    system::roles::CREATE,
    system::roles::UPDATE,
    system::roles::DELETE,
    system::admins::GET_PAGINATE,
    system::admins::CREATE,
    system::admins::UPDATE,
    system::admins::DELETE,
    content::courses::GET_PAGINATE,
    content::courses::GET_BY_ID,
    content::courses::CREATE,
    content::courses::UPDATE,
    content::courses::DELETE,
    content::courses::ADD_LESSON,
    content::lessons::GET_PAGINATE,
    content::lessons::GET_BY_ID,
    content::lessons::CREATE,
    content::lessons::UPDATE,
    content::lessons::DELETE,
    content::lessons::ADD_QUESTION,
    content::questions::GET_PAGINATE,
    content::questions::GET_BY_ID,
    content::questions::CREATE,
    content::questions::UPDATE,
    content::questions::DELETE,
];

/// Sample catalog: every endpoint numbered from 1, then one wildcard per module.
pub fn seed_catalog() -> Vec<Permission> {
    let mut catalog: Vec<Permission> = ENDPOINTS
        .iter()
        .zip(1..)
        .map(|(e, id)| Permission::new(id, e.name, e.method, e.api_path, e.module))
        .collect();

    let next = catalog.len() as PermissionId + 1;
    catalog.extend(
        MODULES
            .iter()
            .zip(next..)
            .map(|(module, id)| Permission::module_wildcard(id, *module)),
    );
    catalog
}
