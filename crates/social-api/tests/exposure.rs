//! The deliberately unsafe paths behave as documented.

mod common;

use axum::http::{StatusCode, header};
use serde_json::json;

use social_api::photos::photo_path;

use common::{TestApp, encode};

#[tokio::test]
async fn search_hides_admins_for_plain_terms() {
    let app = TestApp::new();
    app.user("alice@example.com", "password123");
    app.admin("admin@example.com", "admin123");
    let cookie = app.login("alice@example.com", "password123").await;

    let rows = app.get("/api/search?q=example", &cookie).await.json();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["email"], "alice@example.com");
}

#[tokio::test]
async fn search_term_is_spliced_into_the_statement() {
    let app = TestApp::new();
    app.user("alice@example.com", "password123");
    app.user("bob@example.com", "hunter2");
    app.admin("admin@example.com", "admin123");
    let cookie = app.login("alice@example.com", "password123").await;

    let uri = format!("/api/search?q={}", encode("zzz%') OR 1=1 --"));
    let rows = app.get(&uri, &cookie).await.json();
    let emails: Vec<&str> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails.len(), 3);
    assert!(emails.contains(&"admin@example.com"));

    let union = "zzz%') UNION SELECT id, email, password, name, role, blocked FROM users --";
    let rows = app
        .get(&format!("/api/search?q={}", encode(union)), &cookie)
        .await
        .json();
    let leaked: Vec<&str> = rows
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["name"].as_str())
        .collect();
    assert!(leaked.contains(&"admin123"));
}

#[tokio::test]
async fn broken_search_statements_report_the_engine_error() {
    let app = TestApp::new();
    app.user("alice@example.com", "password123");
    let cookie = app.login("alice@example.com", "password123").await;

    let res = app.get(&format!("/api/search?q={}", encode("a'b")), &cookie).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.message(), "Server error");
    assert!(res.json()["error"].as_str().unwrap().contains("syntax"));
}

#[tokio::test]
async fn settings_write_arbitrary_columns() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com", "password123");
    let cookie = app.login("alice@example.com", "password123").await;

    let res = app
        .post(
            "/api/settings/update",
            &cookie,
            json!({ "bio": "<svg onload=alert(1)>", "email": "alice@evil.example" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["message"], "Settings updated");
    assert_eq!(body["applied"]["email"], "alice@evil.example");

    let profile = app.db().get_profile(&alice.to_string()).unwrap().unwrap();
    assert_eq!(profile.email, "alice@evil.example");
    assert_eq!(profile.bio.as_deref(), Some("<svg onload=alert(1)>"));
}

#[tokio::test]
async fn lowercase_role_is_dropped_but_other_casings_escalate() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com", "password123");
    let cookie = app.login("alice@example.com", "password123").await;

    // Only `role` was sent, so nothing is left to apply.
    let res = app.post("/api/settings/update", &cookie, json!({ "role": "admin" })).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);

    let res = app
        .post("/api/settings/update", &cookie, json!({ "role": "admin", "name": "Alice" }))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.json()["applied"].get("role").is_none());
    let profile = app.get(&format!("/api/users/{alice}"), &cookie).await.json();
    assert_eq!(profile["role"], "user");

    let res = app.post("/api/settings/update", &cookie, json!({ "Role": "admin" })).await;
    assert_eq!(res.status, StatusCode::OK);
    let profile = app.get(&format!("/api/users/{alice}"), &cookie).await.json();
    assert_eq!(profile["role"], "admin");

    // The old token still says `user`; a fresh login picks up the new role.
    let res = app.get("/api/admin/files", &cookie).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    let cookie = app.login("alice@example.com", "password123").await;
    let res = app.get("/api/admin/files", &cookie).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn settings_reject_non_objects() {
    let app = TestApp::new();
    app.user("alice@example.com", "password123");
    let cookie = app.login("alice@example.com", "password123").await;

    let res = app.post("/api/settings/update", &cookie, json!(["bio"])).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "Settings must be a JSON object");
}

#[tokio::test]
async fn photo_lifecycle() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com", "password123");
    app.user("bob@example.com", "hunter2");
    let alice_cookie = app.login("alice@example.com", "password123").await;
    let bob_cookie = app.login("bob@example.com", "hunter2").await;

    let res = app
        .post(
            "/api/photos/publish",
            &alice_cookie,
            json!({ "filename": "cat.png", "description": "my cat", "data": "aGk" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["filename"], "cat.png");
    assert_eq!(std::fs::read(app.uploads().join("cat.png")).unwrap(), b"hi");

    // Listing is open to anyone signed in.
    let photos = app.get(&format!("/api/photos/user/{alice}"), &bob_cookie).await.json();
    let id = photos[0]["id"].as_i64().unwrap();
    assert_eq!(photos[0]["description"], "my cat");

    let res = app.get("/api/photos/cat.png", &bob_cookie).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.header(header::CONTENT_TYPE).as_deref(), Some("image/png"));
    assert_eq!(&res.body[..], b"hi");

    let res = app.delete(&format!("/api/photos/item/{id}"), &bob_cookie).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert!(app.uploads().join("cat.png").exists());

    let res = app.delete(&format!("/api/photos/item/{id}"), &alice_cookie).await;
    assert_eq!(res.message(), "Photo deleted");
    assert!(!app.uploads().join("cat.png").exists());

    let res = app.get("/api/photos/cat.png", &bob_cookie).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.message(), "Photo not found");
}

#[tokio::test]
async fn publish_requires_name_and_data() {
    let app = TestApp::new();
    app.user("alice@example.com", "password123");
    let cookie = app.login("alice@example.com", "password123").await;

    let res = app.post("/api/photos/publish", &cookie, json!({ "filename": "a.png" })).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "Filename and data are required");
}

#[tokio::test]
async fn photo_names_can_climb_out_of_the_uploads_dir() {
    let app = TestApp::new();
    app.user("alice@example.com", "password123");
    let cookie = app.login("alice@example.com", "password123").await;
    std::fs::write(app.root().join("secret.txt"), "top secret").unwrap();

    let res = app.get("/api/photos/..%2Fsecret.txt", &cookie).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(&res.body[..], b"top secret");

    let res = app
        .post(
            "/api/photos/publish",
            &cookie,
            json!({ "filename": "../escaped.txt", "data": "b3V0" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(std::fs::read(app.root().join("escaped.txt")).unwrap(), b"out");

    let path = photo_path(&app.uploads(), "../../etc/passwd");
    assert!(path.to_string_lossy().ends_with("uploads/../../etc/passwd"));
}

#[tokio::test]
async fn uploads_are_also_served_statically() {
    let app = TestApp::new();
    std::fs::write(app.uploads().join("pic.txt"), "static").unwrap();

    let res = app.call(axum::http::Method::GET, "/static-photos/pic.txt", None, None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(&res.body[..], b"static");
}

#[tokio::test]
async fn admin_file_store_round_trip() {
    let app = TestApp::new();
    app.admin("admin@example.com", "admin123");
    let cookie = app.login("admin@example.com", "admin123").await;

    let res = app.get("/api/admin/files", &cookie).await;
    assert_eq!(res.json(), json!([]));

    for (name, data) in [("notes.txt", "aGVsbG8="), ("a.bin", "AAE")] {
        let res = app
            .post("/api/admin/files/upload", &cookie, json!({ "filename": name, "data": data }))
            .await;
        assert_eq!(res.message(), "File stored");
    }

    let files = app.get("/api/admin/files", &cookie).await.json();
    let files = files.as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["name"], "a.bin");
    assert_eq!(files[1]["name"], "notes.txt");
    assert_eq!(files[1]["size"], 5);

    let res = app.delete("/api/admin/files/notes.txt", &cookie).await;
    assert_eq!(res.message(), "File removed");
    let res = app.delete("/api/admin/files/notes.txt", &cookie).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.message(), "File not found");
}

#[tokio::test]
async fn admin_block_toggle_uses_loose_truthiness() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com", "password123");
    app.admin("admin@example.com", "admin123");
    let cookie = app.login("admin@example.com", "admin123").await;

    let uri = format!("/api/admin/users/{alice}/block");
    assert_eq!(app.post(&uri, &cookie, json!({ "blocked": "no" })).await.message(), "User blocked");
    assert!(app.db().find_user_by_email("alice@example.com").unwrap().unwrap().blocked);

    assert_eq!(app.post(&uri, &cookie, json!({ "blocked": 0 })).await.message(), "User unblocked");
    assert!(!app.db().find_user_by_email("alice@example.com").unwrap().unwrap().blocked);
}

#[tokio::test]
async fn block_without_a_body_unblocks() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com", "password123");
    app.admin("admin@example.com", "admin123");
    app.db().set_blocked(&alice.to_string(), true).unwrap();
    let cookie = app.login("admin@example.com", "admin123").await;

    let res = app
        .call(
            axum::http::Method::POST,
            &format!("/api/admin/users/{alice}/block"),
            Some(&cookie),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.message(), "User unblocked");
    assert!(!app.db().find_user_by_email("alice@example.com").unwrap().unwrap().blocked);
}
