use crate::api::router::ApiRoutes;
use crate::api::test_utils::{bearer, create_test_app_state, create_test_app_state_with_audit};
use axum::http::header::AUTHORIZATION;
use axum_test::TestServer;
use clubhouse_core::authorization::{AuditOutcome, DenialReason, GateState, Role};
use serde_json::json;

async fn create_test_server() -> TestServer {
    let state = create_test_app_state().await;
    TestServer::new(ApiRoutes::create(state)).unwrap()
}

#[tokio::test]
async fn test_public_routes_need_no_token() {
    let server = create_test_server().await;

    let response = server.get("/api/v1/health").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<serde_json::Value>()["status"], "ok");

    let response = server.get("/api/v1/info").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<serde_json::Value>()["auth_mode"], "bearer");
}

#[tokio::test]
async fn test_missing_token_is_unauthenticated() {
    let (state, audit) = create_test_app_state_with_audit().await;
    let server = TestServer::new(ApiRoutes::create(state)).unwrap();

    let response = server.get("/api/v1/authenticated/whoami").await;

    assert_eq!(response.status_code(), 401);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], true);
    assert_eq!(body["message"], "authentication required");

    let records = audit.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, AuditOutcome::Denied);
    assert_eq!(records[0].reason, Some(DenialReason::NotAuthenticated));
    assert_eq!(records[0].gate_state, Some(GateState::Unauthenticated));
}

#[tokio::test]
async fn test_unknown_token_is_unauthenticated() {
    let server = create_test_server().await;

    let response = server
        .get("/api/v1/authenticated/whoami")
        .add_header(AUTHORIZATION, bearer("not-a-configured-token"))
        .await;

    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_whoami_reports_identity() {
    let server = create_test_server().await;

    let response = server
        .get("/api/v1/authenticated/whoami")
        .add_header(AUTHORIZATION, bearer("test-manager-token"))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["user_id"], 2);
    assert_eq!(body["roles"], json!(["Manager"]));
    assert_eq!(body["effective_role"], "Manager");
    assert_eq!(body["managed_club_id"], 3);
}

#[tokio::test]
async fn test_user_cannot_edit_club_and_handler_is_not_run() {
    let (state, audit) = create_test_app_state_with_audit().await;
    let server = TestServer::new(ApiRoutes::create(state.clone())).unwrap();

    let response = server
        .put("/api/v1/authenticated/clubs/3")
        .add_header(AUTHORIZATION, bearer("test-member-token"))
        .json(&json!({ "name": "Hijacked" }))
        .await;

    assert_eq!(response.status_code(), 403);
    assert_eq!(
        response.json::<serde_json::Value>()["message"],
        "insufficient privileges"
    );
    assert_eq!(state.directory.club(3).await.unwrap().name, "Riverside");

    let records = audit.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].operation, "edit_club");
    assert_eq!(records[0].reason, Some(DenialReason::RoleNotAllowed));
    assert_eq!(records[0].user_id, Some(5));
}

#[tokio::test]
async fn test_manager_edits_only_own_club() {
    let (state, audit) = create_test_app_state_with_audit().await;
    let server = TestServer::new(ApiRoutes::create(state.clone())).unwrap();

    let response = server
        .put("/api/v1/authenticated/clubs/3")
        .add_header(AUTHORIZATION, bearer("test-manager-token"))
        .json(&json!({ "description": "Now with balcony seats" }))
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.json::<serde_json::Value>()["description"],
        "Now with balcony seats"
    );

    let response = server
        .put("/api/v1/authenticated/clubs/4")
        .add_header(AUTHORIZATION, bearer("test-manager-token"))
        .json(&json!({ "name": "Taken over" }))
        .await;
    assert_eq!(response.status_code(), 403);
    assert_eq!(state.directory.club(4).await.unwrap().name, "Hilltop");

    let last = audit.records().await.pop().unwrap();
    assert_eq!(last.operation, "edit_club");
    assert_eq!(last.reason, Some(DenialReason::ResourceScopeDenied));
    assert_eq!(last.gate_state, None);
}

#[tokio::test]
async fn test_manager_with_malformed_club_claim_is_forbidden() {
    let (state, audit) = create_test_app_state_with_audit().await;
    let server = TestServer::new(ApiRoutes::create(state)).unwrap();

    let response = server
        .put("/api/v1/authenticated/clubs/3")
        .add_header(AUTHORIZATION, bearer("test-broken-manager-token"))
        .json(&json!({ "name": "Whatever" }))
        .await;

    assert_eq!(response.status_code(), 403);
    assert_eq!(
        response.json::<serde_json::Value>()["message"],
        "insufficient privileges"
    );
    let last = audit.records().await.pop().unwrap();
    assert_eq!(last.reason, Some(DenialReason::MalformedClaim));
}

#[tokio::test]
async fn test_booking_visibility() {
    let server = create_test_server().await;

    // Own booking in a club the member has nothing to do with
    let response = server
        .get("/api/v1/authenticated/bookings/100")
        .add_header(AUTHORIZATION, bearer("test-member-token"))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = server
        .get("/api/v1/authenticated/bookings/101")
        .add_header(AUTHORIZATION, bearer("test-member-token"))
        .await;
    assert_eq!(response.status_code(), 403);

    // Manager of club 3 sees bookings in club 3 only
    let response = server
        .get("/api/v1/authenticated/bookings/101")
        .add_header(AUTHORIZATION, bearer("test-manager-token"))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = server
        .get("/api/v1/authenticated/bookings/102")
        .add_header(AUTHORIZATION, bearer("test-manager-token"))
        .await;
    assert_eq!(response.status_code(), 403);

    let response = server
        .get("/api/v1/authenticated/bookings/102")
        .add_header(AUTHORIZATION, bearer("test-admin-token"))
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<serde_json::Value>()["seat"], "C3");
}

#[tokio::test]
async fn test_unknown_booking_is_not_found() {
    let server = create_test_server().await;

    let response = server
        .get("/api/v1/authenticated/bookings/999")
        .add_header(AUTHORIZATION, bearer("test-admin-token"))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_user_profiles() {
    let server = create_test_server().await;

    let response = server
        .get("/api/v1/authenticated/users/5")
        .add_header(AUTHORIZATION, bearer("test-member-token"))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = server
        .get("/api/v1/authenticated/users/9")
        .add_header(AUTHORIZATION, bearer("test-member-token"))
        .await;
    assert_eq!(response.status_code(), 403);

    // Managers get no carve-out for other users
    let response = server
        .put("/api/v1/authenticated/users/9")
        .add_header(AUTHORIZATION, bearer("test-manager-token"))
        .json(&json!({ "name": "Renamed" }))
        .await;
    assert_eq!(response.status_code(), 403);

    let response = server
        .put("/api/v1/authenticated/users/9")
        .add_header(AUTHORIZATION, bearer("test-admin-token"))
        .json(&json!({ "name": "Renamed" }))
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<serde_json::Value>()["name"], "Renamed");
}

#[tokio::test]
async fn test_role_listing_needs_admin() {
    let server = create_test_server().await;

    let response = server
        .get("/api/v1/authenticated/admin/roles")
        .add_header(AUTHORIZATION, bearer("test-manager-token"))
        .await;
    assert_eq!(response.status_code(), 403);

    let response = server
        .get("/api/v1/authenticated/admin/roles")
        .add_header(AUTHORIZATION, bearer("test-admin-token"))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    let names: Vec<&str> = body["roles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|role| role["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["SuperAdmin", "Admin", "Manager", "User"]);
    assert_eq!(body["roles"][0]["rank"], 4);
}

#[tokio::test]
async fn test_role_administration_needs_super_admin() {
    let state = create_test_app_state().await;
    let server = TestServer::new(ApiRoutes::create(state.clone())).unwrap();

    let response = server
        .post("/api/v1/authenticated/admin/roles/manager/deactivate")
        .add_header(AUTHORIZATION, bearer("test-admin-token"))
        .await;
    assert_eq!(response.status_code(), 403);
    assert!(state.roles.snapshot().await.is_active(Role::Manager));

    let response = server
        .post("/api/v1/authenticated/admin/roles/manager/deactivate")
        .add_header(AUTHORIZATION, bearer("test-root-token"))
        .await;
    assert_eq!(response.status_code(), 200);
    assert!(!state.roles.snapshot().await.is_active(Role::Manager));

    let response = server
        .post("/api/v1/authenticated/admin/roles/Manager/activate")
        .add_header(AUTHORIZATION, bearer("test-root-token"))
        .await;
    assert_eq!(response.status_code(), 200);
    assert!(state.roles.snapshot().await.is_active(Role::Manager));
}

#[tokio::test]
async fn test_role_administration_validates_input() {
    let server = create_test_server().await;

    let response = server
        .post("/api/v1/authenticated/admin/roles/janitor/activate")
        .add_header(AUTHORIZATION, bearer("test-root-token"))
        .await;
    assert_eq!(response.status_code(), 400);

    let response = server
        .put("/api/v1/authenticated/admin/roles/user/permissions")
        .add_header(AUTHORIZATION, bearer("test-root-token"))
        .json(&json!({ "section": "spaceships", "action": "view", "allowed": true }))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_deactivated_role_loses_matrix_permissions() {
    let (state, audit) = create_test_app_state_with_audit().await;
    let server = TestServer::new(ApiRoutes::create(state.clone())).unwrap();

    let response = server
        .get("/api/v1/authenticated/clubs/3")
        .add_header(AUTHORIZATION, bearer("test-member-token"))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = server
        .put("/api/v1/authenticated/admin/roles/user/permissions")
        .add_header(AUTHORIZATION, bearer("test-root-token"))
        .json(&json!({ "section": "clubs", "action": "view", "allowed": false }))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = server
        .get("/api/v1/authenticated/clubs/3")
        .add_header(AUTHORIZATION, bearer("test-member-token"))
        .await;
    assert_eq!(response.status_code(), 403);

    // The gate passed; the matrix refused the resource
    let last = audit.records().await.pop().unwrap();
    assert_eq!(last.operation, "view_club");
    assert_eq!(last.reason, Some(DenialReason::ResourceScopeDenied));
    assert_eq!(last.gate_state, None);

    // Club scoping is driven by claims, not by the matrix
    state
        .roles
        .set_role_active(Role::Manager, false)
        .await
        .unwrap();
    let response = server
        .put("/api/v1/authenticated/clubs/3")
        .add_header(AUTHORIZATION, bearer("test-manager-token"))
        .json(&json!({ "name": "Riverside Cinema" }))
        .await;
    assert_eq!(response.status_code(), 200);
}
