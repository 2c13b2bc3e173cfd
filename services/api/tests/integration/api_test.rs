use std::future::IntoFuture;

use axum::http::StatusCode;
use axum_test::{TestRequest, TestServer};
use chrono::{DateTime, Utc};
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use serde_json::{Value, json};

use techteam_api::router::build_router;
use techteam_api::state::AppState;
use techteam_api::usecase::account::{SeedSuperAdminInput, SeedSuperAdminUseCase};
use techteam_api_migration::Migrator;
use techteam_testing::auth::MockAuth;

use crate::helpers::PASSWORD;

async fn setup() -> TestServer {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let state = AppState {
        db,
        cookie_secure: false,
        bcrypt_cost: 4,
        rankings_limit: 10,
    };
    SeedSuperAdminUseCase {
        users: state.user_repo(),
        hasher: state.hasher(),
    }
    .execute(SeedSuperAdminInput {
        username: "root".to_owned(),
        email: "root@techteam.dev".to_owned(),
        password: PASSWORD.to_owned(),
    })
    .await
    .unwrap();

    TestServer::new(build_router(state)).unwrap()
}

fn with_auth(request: TestRequest, auth: &MockAuth) -> TestRequest {
    let (name, value) = auth.bearer();
    request.add_header(name, value)
}

async fn login(server: &TestServer, username: &str) -> MockAuth {
    let res = server
        .post("/api/auth/login")
        .json(&json!({ "username": username, "password": PASSWORD }))
        .await;
    res.assert_status_ok();
    let body: Value = res.json();
    MockAuth::new(body["token"].as_str().unwrap())
}

async fn create_school(server: &TestServer, root: &MockAuth, name: &str) -> String {
    let res = with_auth(server.post("/api/schools"), root)
        .json(&json!({ "name": name }))
        .await;
    res.assert_status(StatusCode::CREATED);
    res.json::<Value>()["id"].as_str().unwrap().to_owned()
}

async fn create_account(
    server: &TestServer,
    auth: &MockAuth,
    path: &str,
    username: &str,
) -> Value {
    let res = with_auth(server.post(path), auth)
        .json(&json!({
            "username": username,
            "email": format!("{username}@hogwarts.edu"),
            "password": PASSWORD,
        }))
        .await;
    res.assert_status(StatusCode::CREATED);
    res.json()
}

fn timestamp(value: &Value) -> DateTime<Utc> {
    value.as_str().unwrap().parse().unwrap()
}

/// Super admin, one school with an admin and a student, all signed in.
struct World {
    server: TestServer,
    root: MockAuth,
    admin: MockAuth,
    student: MockAuth,
    school_id: String,
    student_id: String,
}

async fn world() -> World {
    let server = setup().await;
    let root = login(&server, "root").await;
    let school_id = create_school(&server, &root, "Hogwarts").await;
    create_account(
        &server,
        &root,
        &format!("/api/schools/{school_id}/admins"),
        "minerva",
    )
    .await;
    let admin = login(&server, "minerva").await;
    let student = create_account(
        &server,
        &admin,
        &format!("/api/schools/{school_id}/students"),
        "jane.smith",
    )
    .await;
    let student_id = student["id"].as_str().unwrap().to_owned();
    let student = login(&server, "jane.smith").await;
    World {
        server,
        root,
        admin,
        student,
        school_id,
        student_id,
    }
}

async fn submit_check(w: &World) -> Value {
    let res = with_auth(
        w.server.post(&format!("/api/schools/{}/tickets", w.school_id)),
        &w.student,
    )
    .json(&json!({
        "studentName": "Jane Smith",
        "deviceType": "chromebook",
        "issueDescription": "Weekly cart check",
        "issueType": "check",
        "allPresent": true
    }))
    .await;
    res.assert_status(StatusCode::CREATED);
    res.json()
}

// ── End to end ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_run_device_check_lifecycle() {
    let w = world().await;

    let me: Value = with_auth(w.server.get("/api/auth/me"), &w.student).await.json();
    assert_eq!(me["id"], w.student_id);
    assert_eq!(me["points"], 0);
    assert_eq!(me["role"], "student");
    assert!(me.get("passwordHash").is_none());

    let created = submit_check(&w).await;
    assert_eq!(created["status"], "pending");
    assert_eq!(created["assignedTo"], w.student_id);
    assert!(created["priority"].is_null());

    let res = with_auth(
        w.server
            .get(&format!("/api/schools/{}/tickets", w.school_id))
            .add_query_param("issueType", "check"),
        &w.admin,
    )
    .await;
    res.assert_status_ok();
    let listed: Vec<Value> = res.json();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], created["id"]);
    assert_eq!(listed[0]["status"], "pending");

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let ticket_path = format!(
        "/api/schools/{}/tickets/{}",
        w.school_id,
        created["id"].as_str().unwrap()
    );
    let res = with_auth(w.server.patch(&ticket_path), &w.admin)
        .json(&json!({ "status": "completed" }))
        .await;
    res.assert_status_ok();

    let fetched: Value = with_auth(w.server.get(&ticket_path), &w.admin).await.json();
    assert_eq!(fetched["status"], "completed");
    assert!(timestamp(&fetched["updatedAt"]) > timestamp(&created["updatedAt"]));

    with_auth(w.server.post("/api/auth/logout"), &w.student)
        .await
        .assert_status_ok();
    with_auth(w.server.get("/api/auth/me"), &w.student)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_accept_session_cookie() {
    let w = world().await;
    let (name, value) = w.student.cookie();

    let res = w.server.get("/api/auth/me").add_header(name, value).await;

    res.assert_status_ok();
    assert_eq!(res.json::<Value>()["username"], "jane.smith");
}

#[tokio::test]
async fn should_reject_missing_and_bad_credentials() {
    let w = world().await;

    w.server
        .get("/api/auth/me")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let res = w
        .server
        .post("/api/auth/login")
        .json(&json!({ "username": "jane.smith", "password": "WrongPass1!" }))
        .await;
    res.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(res.json::<Value>()["kind"], "UNAUTHORIZED");
}

#[tokio::test]
async fn should_reject_malformed_ticket_body_as_validation() {
    let w = world().await;
    let tickets_path = format!("/api/schools/{}/tickets", w.school_id);

    let res = with_auth(w.server.post(&tickets_path), &w.student)
        .json(&json!({
            "studentName": "Jane Smith",
            "deviceType": "toaster",
            "issueDescription": "Smoking",
            "issueType": "repair"
        }))
        .await;
    res.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>()["kind"], "VALIDATION");

    let res = with_auth(w.server.post(&tickets_path), &w.student)
        .json(&json!({
            "deviceType": "ipad",
            "issueDescription": "Cracked screen",
            "issueType": "repair"
        }))
        .await;
    res.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = res.json();
    assert_eq!(body["kind"], "VALIDATION");
    assert!(body["message"].as_str().unwrap().contains("studentName"));

    let listed: Vec<Value> = with_auth(w.server.get(&tickets_path), &w.admin).await.json();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn should_reject_malformed_path_and_query_as_validation() {
    let w = world().await;

    let res = with_auth(
        w.server
            .get(&format!("/api/schools/{}/tickets/not-a-uuid", w.school_id)),
        &w.admin,
    )
    .await;
    res.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>()["kind"], "VALIDATION");

    let res = with_auth(
        w.server
            .get("/api/student/rankings")
            .add_query_param("limit", "lots"),
        &w.student,
    )
    .await;
    res.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>()["kind"], "VALIDATION");
}

// ── Ticket listing ───────────────────────────────────────────────────────────

async fn submit_repair(w: &World, student_name: &str, device_type: &str, issue: &str) -> String {
    let res = with_auth(
        w.server.post(&format!("/api/schools/{}/tickets", w.school_id)),
        &w.admin,
    )
    .json(&json!({
        "studentName": student_name,
        "deviceType": device_type,
        "issueDescription": issue,
        "issueType": "repair"
    }))
    .await;
    res.assert_status(StatusCode::CREATED);
    // Keep creation timestamps distinct for ordering assertions.
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    res.json::<Value>()["id"].as_str().unwrap().to_owned()
}

async fn list_ids(w: &World, params: &[(&str, &str)]) -> Vec<String> {
    let mut request = w
        .server
        .get(&format!("/api/schools/{}/tickets", w.school_id));
    for (name, value) in params {
        request = request.add_query_param(name, value);
    }
    let res = with_auth(request, &w.admin).await;
    res.assert_status_ok();
    res.json::<Vec<Value>>()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_owned())
        .collect()
}

#[tokio::test]
async fn should_filter_and_sort_ticket_list() {
    let w = world().await;
    let luna = submit_repair(&w, "Luna Lovegood", "ipad", "Cracked SCREEN on the back").await;
    let albus = submit_repair(&w, "Albus Dumbledore", "chromebook", "Keyboard sticks").await;
    let neville = submit_repair(&w, "Neville Longbottom", "chromebook", "Will not charge").await;

    assert_eq!(
        list_ids(&w, &[]).await,
        vec![neville.clone(), albus.clone(), luna.clone()]
    );
    assert_eq!(list_ids(&w, &[("search", "LOVEgood")]).await, vec![luna.clone()]);
    assert_eq!(list_ids(&w, &[("search", "keyBOARD")]).await, vec![albus.clone()]);
    assert_eq!(list_ids(&w, &[("search", "screen")]).await, vec![luna.clone()]);
    assert!(list_ids(&w, &[("search", "luna_lovegood")]).await.is_empty());
    assert_eq!(
        list_ids(&w, &[("deviceType", "chromebook")]).await,
        vec![neville.clone(), albus.clone()]
    );
    assert_eq!(
        list_ids(&w, &[("sortBy", "student"), ("sortOrder", "asc")]).await,
        vec![albus.clone(), luna.clone(), neville.clone()]
    );
    assert_eq!(
        list_ids(&w, &[("sortBy", "date"), ("sortOrder", "asc")]).await,
        vec![luna, albus, neville]
    );
}

// ── Tenant isolation ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_keep_schools_apart() {
    let w = world().await;
    let ticket = submit_check(&w).await;
    let ticket_id = ticket["id"].as_str().unwrap();

    let other_school = create_school(&w.server, &w.root, "Beauxbatons").await;
    create_account(
        &w.server,
        &w.root,
        &format!("/api/schools/{other_school}/admins"),
        "olympe",
    )
    .await;
    let other_admin = login(&w.server, "olympe").await;

    with_auth(
        w.server.get(&format!("/api/schools/{}/tickets", w.school_id)),
        &other_admin,
    )
    .await
    .assert_status(StatusCode::FORBIDDEN);

    let res = with_auth(
        w.server
            .patch(&format!("/api/schools/{other_school}/tickets/{ticket_id}")),
        &w.root,
    )
    .json(&json!({ "status": "completed" }))
    .await;
    res.assert_status(StatusCode::NOT_FOUND);

    with_auth(
        w.server
            .delete(&format!("/api/schools/{other_school}/tickets/{ticket_id}")),
        &w.root,
    )
    .await
    .assert_status(StatusCode::NOT_FOUND);

    let listed: Vec<Value> = with_auth(
        w.server.get(&format!("/api/schools/{other_school}/tickets")),
        &other_admin,
    )
    .await
    .json();
    assert!(listed.is_empty());

    let still: Value = with_auth(
        w.server
            .get(&format!("/api/schools/{}/tickets/{ticket_id}", w.school_id)),
        &w.admin,
    )
    .await
    .json();
    assert_eq!(still["status"], "pending");
}

#[tokio::test]
async fn should_forbid_students_from_staff_routes() {
    let w = world().await;

    with_auth(
        w.server
            .get(&format!("/api/schools/{}/students", w.school_id)),
        &w.student,
    )
    .await
    .assert_status(StatusCode::FORBIDDEN);

    let ticket = submit_check(&w).await;
    with_auth(
        w.server.delete(&format!(
            "/api/schools/{}/tickets/{}",
            w.school_id,
            ticket["id"].as_str().unwrap()
        )),
        &w.student,
    )
    .await
    .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_refuse_super_admin_on_student_routes() {
    let w = world().await;

    with_auth(w.server.get("/api/student/rankings"), &w.root)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

// ── Sessions ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_revoke_all_sessions_on_logout_all() {
    let w = world().await;
    let second = login(&w.server, "jane.smith").await;

    let res = with_auth(w.server.post("/api/auth/logout-all"), &w.student).await;
    res.assert_status_ok();
    assert_eq!(res.json::<Value>()["revoked"], 2);

    with_auth(w.server.get("/api/auth/me"), &second)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_sign_out_deactivated_student() {
    let w = world().await;

    with_auth(
        w.server.patch(&format!(
            "/api/schools/{}/students/{}",
            w.school_id, w.student_id
        )),
        &w.admin,
    )
    .json(&json!({ "isActive": false }))
    .await
    .assert_status_ok();

    with_auth(w.server.get("/api/auth/me"), &w.student)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

// ── Gamification ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_complete_challenge_once_and_rank_student() {
    let w = world().await;
    let res = with_auth(w.server.post("/api/challenges"), &w.root)
        .json(&json!({
            "title": "Reset a Chromebook",
            "difficulty": "beginner",
            "points": 25,
            "category": "hardware"
        }))
        .await;
    res.assert_status(StatusCode::CREATED);
    let challenge_id = res.json::<Value>()["id"].as_str().unwrap().to_owned();
    let complete_path = format!("/api/student/challenges/{challenge_id}/complete");

    let res = with_auth(w.server.post(&complete_path), &w.student).await;
    res.assert_status(StatusCode::CREATED);
    let body: Value = res.json();
    assert_eq!(body["totalPoints"], 25);
    assert_eq!(body["completion"]["challengeTitle"], "Reset a Chromebook");

    with_auth(w.server.post(&complete_path), &w.student)
        .await
        .assert_status(StatusCode::CONFLICT);

    let challenges: Vec<Value> = with_auth(w.server.get("/api/student/challenges"), &w.student)
        .await
        .json();
    assert_eq!(challenges[0]["completed"], true);
    assert_eq!(challenges[0]["progress"], 100);
    assert_eq!(challenges[0]["participants"], 1);

    let rankings: Vec<Value> = with_auth(w.server.get("/api/student/rankings"), &w.student)
        .await
        .json();
    assert_eq!(rankings.len(), 2);
    assert_eq!(rankings[0]["rank"], 1);
    assert_eq!(rankings[0]["points"], 25);
    assert_eq!(rankings[0]["isCurrentUser"], true);
    assert_eq!(rankings[1]["username"], "minerva");
    assert_eq!(rankings[1]["isCurrentUser"], false);
}

#[tokio::test]
async fn should_rank_admin_points_alongside_students() {
    let w = world().await;
    let res = with_auth(w.server.post("/api/challenges"), &w.root)
        .json(&json!({
            "title": "Image a laptop",
            "difficulty": "intermediate",
            "points": 40,
            "category": "software"
        }))
        .await;
    res.assert_status(StatusCode::CREATED);
    let challenge_id = res.json::<Value>()["id"].as_str().unwrap().to_owned();

    with_auth(
        w.server
            .post(&format!("/api/student/challenges/{challenge_id}/complete")),
        &w.admin,
    )
    .await
    .assert_status(StatusCode::CREATED);

    let rankings: Vec<Value> = with_auth(w.server.get("/api/student/rankings"), &w.student)
        .await
        .json();
    let board: Vec<_> = rankings
        .iter()
        .map(|r| {
            (
                r["rank"].as_u64().unwrap(),
                r["username"].as_str().unwrap(),
                r["points"].as_i64().unwrap(),
            )
        })
        .collect();
    assert_eq!(board, vec![(1, "minerva", 40), (2, "jane.smith", 0)]);
}

#[tokio::test]
async fn should_apply_concurrent_point_adjustments() {
    let w = world().await;
    let points_path = format!(
        "/api/schools/{}/students/{}/points",
        w.school_id, w.student_id
    );
    with_auth(w.server.post(&points_path), &w.admin)
        .json(&json!({ "delta": 5 }))
        .await
        .assert_status_ok();

    let add = with_auth(w.server.post(&points_path), &w.admin)
        .json(&json!({ "delta": 10 }))
        .into_future();
    let sub = with_auth(w.server.post(&points_path), &w.admin)
        .json(&json!({ "delta": -3 }))
        .into_future();
    let (a, b) = tokio::join!(add, sub);
    a.assert_status_ok();
    b.assert_status_ok();

    let me: Value = with_auth(w.server.get("/api/auth/me"), &w.student).await.json();
    assert_eq!(me["points"], 12);

    let res = with_auth(w.server.post(&points_path), &w.admin)
        .json(&json!({ "delta": -13 }))
        .await;
    res.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>()["kind"], "VALIDATION");
}

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_live_and_ready() {
    let server = setup().await;

    server.get("/healthz").await.assert_status_ok();
    server.get("/readyz").await.assert_status_ok();
}
