
use actix_web::{http::{header, StatusCode}, test};
use portfolio_site::settings::ContactPolicy;
use serde_json::{json, Value};
use test_utils::*;

#[actix_rt::test]
async fn root_reports_running() {
    let store = InMemoryStore::seeded(vec![], vec![]);
    let app = test_service!(app_state(&store, None, ContactPolicy::Store));

    let body: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(body["message"], "Portfolio API Running...");
}

#[actix_rt::test]
async fn projects_are_listed_newest_first() {
    let store = InMemoryStore::seeded(
        vec![
            project("Library", 40, &["Node"]),
            project("Inventory", 2, &["React"]),
            project("Blog", 15, &[]),
        ],
        vec![],
    );
    let app = test_service!(app_state(&store, None, ContactPolicy::Store));

    let req = test::TestRequest::get().uri("/api/projects").to_request();
    let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;

    let titles: Vec<_> = body.iter().map(|p| p["title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["Inventory", "Blog", "Library"]);
    assert!(body[0]["techStack"].is_array());
    assert!(body[0]["createdAt"].is_string());
}

#[actix_rt::test]
async fn skills_are_sorted_by_category_then_name() {
    let store = InMemoryStore::seeded(
        vec![],
        vec![
            skill("React", "Frontend"),
            skill("Node", "Backend"),
            skill("CSS", "Frontend"),
            skill("Express", "Backend"),
            skill("Git", "Tools"),
        ],
    );
    let app = test_service!(app_state(&store, None, ContactPolicy::Store));

    let req = test::TestRequest::get().uri("/api/skills").to_request();
    let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;

    let pairs: Vec<(String, String)> = body
        .iter()
        .map(|s| (s["category"].as_str().unwrap().to_string(), s["name"].as_str().unwrap().to_string()))
        .collect();
    for pair in pairs.windows(2) {
        assert!(pair[0] <= pair[1], "{:?} should precede {:?}", pair[0], pair[1]);
    }
    assert_eq!(pairs[0].1, "Express");
    assert_eq!(body[0]["level"], "Intermediate");
}

#[actix_rt::test]
async fn empty_store_returns_empty_arrays() {
    let store = InMemoryStore::seeded(vec![], vec![]);
    let app = test_service!(app_state(&store, None, ContactPolicy::Store));

    for uri in ["/api/projects", "/api/skills"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!([]));
    }
}

#[actix_rt::test]
async fn store_failure_returns_generic_500() {
    let store = InMemoryStore::seeded(vec![project("Inventory", 1, &[])], vec![]);
    store.set_unavailable(true);
    let app = test_service!(app_state(&store, None, ContactPolicy::Store));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/projects").to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(!body.to_string().contains("5432"));
}

#[actix_rt::test]
async fn contact_with_missing_field_is_rejected_without_side_effects() {
    let store = InMemoryStore::seeded(vec![], vec![]);
    let mailer = std::sync::Arc::new(RecordingMailer::default());
    let app = test_service!(app_state(&store, Some(&mailer), ContactPolicy::StoreAndNotify));

    let payloads = [
        json!({ "email": "ada@example.com", "message": "Hi" }),
        json!({ "name": "Ada", "email": "", "message": "Hi" }),
        json!({ "name": "Ada", "email": "ada@example.com", "message": "   " }),
        json!({}),
    ];

    for payload in payloads {
        let req = test::TestRequest::post().uri("/api/contact").set_json(&payload).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload {payload}");

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "All fields are required");
        assert_eq!(body["success"], false);
    }

    assert_eq!(store.write_count(), 0);
    assert_eq!(mailer.sent_count(), 0);
}

#[actix_rt::test]
async fn store_policy_persists_exactly_one_message() {
    let store = InMemoryStore::seeded(vec![], vec![]);
    let app = test_service!(app_state(&store, None, ContactPolicy::Store));

    let req = test::TestRequest::post()
        .uri("/api/contact")
        .set_json(json!({ "name": "Ada", "email": "ada@example.com", "message": "Let's work together" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Ada");
    assert_eq!(store.write_count(), 1);
}

#[actix_rt::test]
async fn mail_policy_sends_exactly_one_email() {
    let store = InMemoryStore::seeded(vec![], vec![]);
    let mailer = std::sync::Arc::new(RecordingMailer::default());
    let app = test_service!(app_state(&store, Some(&mailer), ContactPolicy::Mail));

    let req = test::TestRequest::post()
        .uri("/api/contact")
        .set_json(json!({ "name": "Grace", "email": "grace@example.com", "message": "Hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert!(body.get("data").is_none());

    let sent = mailer.sent.lock();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "New Portfolio Message from Grace");
    assert_eq!(sent[0].reply_to, "grace@example.com");
    assert_eq!(store.write_count(), 0);
}

#[actix_rt::test]
async fn mail_policy_delivery_failure_is_generic_500() {
    let store = InMemoryStore::seeded(vec![], vec![]);
    let mailer = RecordingMailer::failing();
    let app = test_service!(app_state(&store, Some(&mailer), ContactPolicy::Mail));

    let req = test::TestRequest::post()
        .uri("/api/contact")
        .set_json(json!({ "name": "Grace", "email": "grace@example.com", "message": "Hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "success": false, "error": "Failed to send message" }));
}

#[actix_rt::test]
async fn failed_notification_still_reports_stored_message() {
    let store = InMemoryStore::seeded(vec![], vec![]);
    let mailer = RecordingMailer::failing();
    let app = test_service!(app_state(&store, Some(&mailer), ContactPolicy::StoreAndNotify));

    let req = test::TestRequest::post()
        .uri("/api/contact")
        .set_json(json!({ "name": "Ada", "email": "ada@example.com", "message": "Hi" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(store.write_count(), 1);
}

#[actix_rt::test]
async fn store_and_notify_sends_one_notification() {
    let store = InMemoryStore::seeded(vec![], vec![]);
    let mailer = std::sync::Arc::new(RecordingMailer::default());
    let app = test_service!(app_state(&store, Some(&mailer), ContactPolicy::StoreAndNotify));

    let req = test::TestRequest::post()
        .uri("/api/contact")
        .set_json(json!({ "name": "Ada", "email": "ada@example.com", "message": "Hi" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(store.write_count(), 1);
    assert_eq!(mailer.sent_count(), 1);
}

#[actix_rt::test]
async fn malformed_json_is_a_bad_request() {
    let store = InMemoryStore::seeded(vec![], vec![]);
    let app = test_service!(app_state(&store, None, ContactPolicy::Store));

    let req = test::TestRequest::post()
        .uri("/api/contact")
        .insert_header(header::ContentType::json())
        .set_payload("{\"name\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(store.write_count(), 0);
}

#[actix_rt::test]
async fn cors_preflight_allows_post_with_content_type() {
    let store = InMemoryStore::seeded(vec![], vec![]);
    let app = test_service!(app_state(&store, None, ContactPolicy::Store));

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/api/contact")
        .insert_header((header::ORIGIN, "https://someone.dev"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    let allow_methods = resp.headers()
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(allow_methods.contains("POST"));
    assert!(!allow_methods.contains("DELETE"));
    assert!(resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[actix_rt::test]
async fn health_reports_dependencies() {
    let store = InMemoryStore::seeded(vec![], vec![]);
    let app = test_service!(app_state(&store, None, ContactPolicy::Store));

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "OK");
    assert_eq!(body["mail"], "Not configured");
}
