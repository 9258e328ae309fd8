/// End-to-end scenarios for the admin console's access-control layer:
/// backend JSON in, guard decisions and role-edit payloads out.
use std::collections::{BTreeSet, HashSet};

use encybara_auth::catalog::{CONTENT_MANAGEMENT, SYSTEM_MANAGEMENT, content, system};
use encybara_auth::{
    AccessOutcome, AccessPolicy, GrantedSet, Method, Permission, PermissionDescriptor,
    PermissionId, RoleFormState, RoleSubmission, decode_catalog, decode_principal, decode_role,
    granted_ids_from_form_values, group_by_module, guard, is_allowed, seed_catalog,
};

fn granted(perms: Vec<Permission>) -> GrantedSet {
    perms.into_iter().collect()
}

#[test]
fn role_update_scenario() {
    let g = granted(vec![Permission::new(
        1,
        "Update role",
        Method::Put,
        "/api/v1/roles",
        SYSTEM_MANAGEMENT,
    )]);

    let put = PermissionDescriptor::api(Method::Put, "/api/v1/roles").in_module(SYSTEM_MANAGEMENT);
    assert!(is_allowed(&g, &put));

    let delete = PermissionDescriptor::api(Method::Delete, "/api/v1/roles").in_module(SYSTEM_MANAGEMENT);
    assert!(!is_allowed(&g, &delete));
}

#[test]
fn course_resource_scenario() {
    let g = granted(vec![Permission::new(
        5,
        "Get course",
        Method::Get,
        "/api/v1/courses/5",
        CONTENT_MANAGEMENT,
    )]);
    assert!(is_allowed(&g, &PermissionDescriptor::resource("courses")));
}

#[test]
fn empty_grant_denies_every_endpoint() {
    let g = GrantedSet::new();
    for endpoint in encybara_auth::ENDPOINTS {
        assert!(!is_allowed(&g, &endpoint.descriptor()), "{}", endpoint.name);
    }
    assert!(!is_allowed(&g, &PermissionDescriptor::module(CONTENT_MANAGEMENT)));
    assert!(!is_allowed(&g, &PermissionDescriptor::resource("")));
}

#[test]
fn module_wildcard_allows_any_operation_in_module() {
    let g = granted(vec![Permission::module_wildcard(1, "X")]);
    for path in ["/anything", "/api/v1/courses/{id}", "/"] {
        let d = PermissionDescriptor::api(Method::Delete, path).in_module("X");
        assert!(is_allowed(&g, &d), "{path}");
    }
}

#[test]
fn toggling_content_module_grants_exactly_its_ids() {
    let catalog = seed_catalog();
    let groups = group_by_module(&catalog);
    let mut state = RoleFormState::build(&groups, &BTreeSet::new());
    assert!(state.toggle_module(CONTENT_MANAGEMENT, true));

    let expected: BTreeSet<PermissionId> = catalog
        .iter()
        .filter(|p| p.module == CONTENT_MANAGEMENT)
        .map(|p| p.id)
        .collect();
    assert_eq!(state.flatten(), expected);
}

#[test]
fn grouping_partitions_catalog() {
    let catalog = seed_catalog();
    let groups = group_by_module(&catalog);

    let grouped: Vec<PermissionId> = groups.iter().flat_map(|g| g.ids()).collect();
    let unique: HashSet<PermissionId> = grouped.iter().copied().collect();
    assert_eq!(grouped.len(), catalog.len());
    assert_eq!(unique.len(), catalog.len());

    assert!(groups.windows(2).all(|w| w[0].module < w[1].module));
    for group in &groups {
        assert!(group.permissions.iter().all(|p| p.module == group.module));
    }
}

#[test]
fn backend_snapshot_to_submission() {
    let catalog_json = r#"{"statusCode": 200, "data": {"meta": {"total": 4}, "result": [
        {"id": 10, "name": "List roles", "apiPath": "/api/v1/roles", "method": "GET", "module": "SYSTEM_MANAGEMENT"},
        {"id": 11, "name": "Update role", "apiPath": "/api/v1/roles", "method": "PUT", "module": "SYSTEM_MANAGEMENT"},
        {"id": 20, "name": "List courses", "apiPath": "/api/v1/courses", "method": "GET", "module": "CONTENT_MANAGEMENT"},
        {"id": 21, "name": "Delete course", "apiPath": "/api/v1/courses/{id}", "method": "DELETE", "module": "CONTENT_MANAGEMENT"}
    ]}}"#;
    let role_json = r#"{"data": {"id": 3, "name": "moderator", "description": "Course moderation",
        "active": true, "permissions": [{"id": 20, "apiPath": "/api/v1/courses", "method": "GET",
        "module": "CONTENT_MANAGEMENT"}]}}"#;

    let catalog = decode_catalog(catalog_json).unwrap();
    let role = decode_role(role_json).unwrap();
    let groups = group_by_module(&catalog);
    let mut state = RoleFormState::build(&groups, &role.granted_ids());

    assert_eq!(state.module_checked(CONTENT_MANAGEMENT), Some(false));
    assert!(state.toggle_permission(21, CONTENT_MANAGEMENT, true));
    assert_eq!(state.module_checked(CONTENT_MANAGEMENT), Some(true));
    assert!(state.toggle_module(SYSTEM_MANAGEMENT, true));
    assert!(state.toggle_permission(10, SYSTEM_MANAGEMENT, false));
    assert_eq!(state.module_checked(SYSTEM_MANAGEMENT), Some(false));
    assert!(state.is_consistent());

    assert_eq!(
        granted_ids_from_form_values(&state.to_form_values()),
        BTreeSet::from([11, 20, 21])
    );

    let body = serde_json::to_value(RoleSubmission::new(&role, &state)).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "id": 3,
            "name": "moderator",
            "description": "Course moderation",
            "active": true,
            "permissions": [{"id": 11}, {"id": 20}, {"id": 21}]
        })
    );
}

#[test]
fn login_snapshot_drives_guards() {
    let login = r#"{"access_token": "eyJ...", "admin": {"id": 7, "email": "moderator@encybara.vn",
        "name": "Moderator", "role": {"id": 2, "name": "content", "permissions": [
            {"id": 30, "name": "All content", "apiPath": "*", "method": "*", "module": "CONTENT_MANAGEMENT"}
        ]}}}"#;
    let principal = decode_principal(login).unwrap();
    let policy = AccessPolicy::Enforced;

    assert_eq!(
        guard(Some(&principal), &content::lessons::ADD_QUESTION.descriptor(), policy, false),
        AccessOutcome::Render
    );
    assert_eq!(
        guard(Some(&principal), &system::admins::CREATE.descriptor(), policy, true),
        AccessOutcome::Hide
    );
    assert_eq!(
        guard(Some(&principal), &PermissionDescriptor::module(CONTENT_MANAGEMENT), policy, false),
        AccessOutcome::Render
    );
    assert_eq!(
        guard(
            Some(&principal),
            &system::admins::CREATE.descriptor(),
            AccessPolicy::from_acl_enabled(false),
            false
        ),
        AccessOutcome::Render
    );
}
