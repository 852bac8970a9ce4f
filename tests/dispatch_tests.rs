//! Dispatcher tests against an in-process backend
//!
//! Run with: cargo test --test dispatch_tests

use axum::{
    extract::Query,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router as HttpRouter,
};
use futures_util::future::join_all;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use medicare::api::{self, StatisticsRange};
use medicare::auth::{LoginRequest, MemoryStorage, Role, Storage};
use medicare::config::{Config, ExpiryPolicy};
use medicare::dispatch::{ApiRequest, MemoryNotifier, SESSION_EXPIRED_MESSAGE};
use medicare::{Error, MedicareClient};

fn ok(data: Value) -> Json<Value> {
    Json(json!({"code": 1, "msg": "ok", "data": data}))
}

async fn echo_credentials(headers: HeaderMap) -> Json<Value> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(String::from);
    ok(json!({
        "token": header("token"),
        "authorization": header("authorization"),
        "authentication": header("authentication"),
    }))
}

async fn expired() -> Json<Value> {
    Json(json!({"code": 401, "msg": "NOT_LOGIN"}))
}

fn login_handler(role: &'static str) -> impl Fn() -> std::future::Ready<Json<Value>> + Clone {
    move || {
        std::future::ready(ok(json!({
            "token": format!("{}-token", role),
            "id": 9,
            "username": format!("{}-name", role),
        })))
    }
}

/// Start the mock backend and return its origin
async fn start_backend() -> String {
    let app = HttpRouter::new()
        .route("/api/admin/echo", get(echo_credentials))
        .route("/api/doctor/echo", get(echo_credentials))
        .route("/api/user/echo", get(echo_credentials))
        .route("/api/common/echo", get(echo_credentials))
        .route("/api/user/profile", get(|| async { ok(json!({"id": 1})) }))
        .route(
            "/api/admin/department",
            post(|| async { Json(json!({"code": 0, "msg": "bad input"})) }),
        )
        .route("/api/admin/expired", get(expired))
        .route("/api/doctor/expired", get(expired))
        .route("/api/user/expired", get(expired))
        .route(
            "/api/admin/unauthorized",
            get(|| async { StatusCode::UNAUTHORIZED }),
        )
        .route("/api/admin/forbidden", get(|| async { StatusCode::FORBIDDEN }))
        .route(
            "/api/user/boom",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
        .route("/api/user/garbage", get(|| async { "<html>gateway</html>" }))
        .route(
            "/api/user/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(400)).await;
                ok(json!("done"))
            }),
        )
        .route(
            "/api/user/dashboard/statistics",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                ok(json!({"type": params.get("type")}))
            }),
        )
        .route(
            "/api/admin/dashboard/statistics",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                ok(json!({"type": params.get("type"), "doctorCount": 12}))
            }),
        )
        .route(
            "/api/user/report/generate",
            post(|Json(body): Json<Value>| async move {
                tokio::time::sleep(Duration::from_millis(1500)).await;
                ok(json!({"reportId": 7, "request": body}))
            }),
        )
        .route("/api/user/user/login", post(login_handler("user")))
        .route("/api/doctor/doctor/login", post(login_handler("doctor")))
        .route("/api/admin/admin/login", post(login_handler("admin")))
        .route("/api/doctor/doctor/logout", post(|| async { ok(Value::Null) }))
        .route("/api/admin/admin/logout", post(|| async { ok(Value::Null) }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{}", addr)
}

struct Harness {
    client: MedicareClient,
    notifier: Arc<MemoryNotifier>,
    storage: MemoryStorage,
}

fn harness(origin: &str, tweak: impl FnOnce(&mut Config)) -> Harness {
    let mut config = Config::default();
    config.api.origin = origin.to_string();
    tweak(&mut config);

    let notifier = Arc::new(MemoryNotifier::new());
    let storage = MemoryStorage::new();
    let client =
        MedicareClient::with_storage(config, Arc::new(storage.clone()), notifier.clone()).unwrap();
    Harness {
        client,
        notifier,
        storage,
    }
}

fn login_all(h: &Harness) {
    for role in Role::ALL {
        h.client
            .sessions
            .store(role)
            .set_token(&format!("{}-t", role))
            .unwrap();
    }
}

#[tokio::test]
async fn test_credential_header_per_namespace() {
    let origin = start_backend().await;
    let h = harness(&origin, |_| {});
    login_all(&h);

    let admin: Value = h.client.dispatcher.get("/admin/echo").await.unwrap();
    assert_eq!(
        admin,
        json!({"token": "admin-t", "authorization": null, "authentication": null})
    );

    let doctor: Value = h.client.dispatcher.get("/doctor/echo").await.unwrap();
    assert_eq!(
        doctor,
        json!({"token": null, "authorization": "doctor-t", "authentication": null})
    );

    for path in ["/user/echo", "/common/echo"] {
        let user: Value = h.client.dispatcher.get(path).await.unwrap();
        assert_eq!(
            user,
            json!({"token": null, "authorization": null, "authentication": "user-t"}),
            "{}",
            path
        );
    }
}

#[tokio::test]
async fn test_empty_token_omits_header() {
    let origin = start_backend().await;
    let h = harness(&origin, |_| {});

    for path in ["/admin/echo", "/doctor/echo", "/user/echo"] {
        let echoed: Value = h.client.dispatcher.get(path).await.unwrap();
        assert_eq!(
            echoed,
            json!({"token": null, "authorization": null, "authentication": null}),
            "{}",
            path
        );
    }
}

#[tokio::test]
async fn test_success_returns_payload_only() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Profile {
        id: u64,
    }

    let origin = start_backend().await;
    let h = harness(&origin, |_| {});

    let raw: Value = h.client.dispatcher.get("/user/profile").await.unwrap();
    assert_eq!(raw, json!({"id": 1}));

    let typed: Profile = h.client.dispatcher.get("/user/profile").await.unwrap();
    assert_eq!(typed, Profile { id: 1 });
    assert_eq!(h.notifier.count(), 0);
}

#[tokio::test]
async fn test_business_error_rejects_with_message() {
    let origin = start_backend().await;
    let h = harness(&origin, |_| {});
    login_all(&h);

    let result: Result<Value, Error> = h
        .client
        .dispatcher
        .post("/admin/department", &json!({"name": ""}))
        .await;

    match result {
        Err(Error::Business { code, message }) => {
            assert_eq!(code, 0);
            assert_eq!(message, "bad input");
        }
        other => panic!("expected business error, got {:?}", other),
    }
    assert_eq!(h.notifier.messages(), vec!["bad input".to_string()]);
    assert!(h.client.sessions.is_authenticated(Role::Admin));
}

#[tokio::test]
async fn test_concurrent_expiry_redirects_once() {
    let origin = start_backend().await;
    let h = harness(&origin, |c| c.session.redirect_cooldown_ms = 300);
    login_all(&h);
    h.client.router.navigate("/admin/dashboard").unwrap();

    let dispatcher = h.client.dispatcher.clone();
    let results = join_all((0..5).map(|_| {
        let dispatcher = dispatcher.clone();
        async move { dispatcher.get::<Value>("/admin/expired").await }
    }))
    .await;

    for result in &results {
        assert!(matches!(result, Err(Error::AuthExpired { role: Role::Admin })));
    }
    assert_eq!(h.notifier.messages(), vec![SESSION_EXPIRED_MESSAGE.to_string()]);
    assert_eq!(h.client.router.current_path(), "/admin/login");
    assert!(h.client.dispatcher.redirect_pending());

    assert!(!h.client.sessions.is_authenticated(Role::Admin));
    assert_eq!(h.storage.get("admin_token"), None);
    assert_eq!(h.storage.get("doctor_token").as_deref(), Some("doctor-t"));
    assert_eq!(h.storage.get("user_token").as_deref(), Some("user-t"));

    // After the cool-down a new expiry redirects again
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(!h.client.dispatcher.redirect_pending());
    h.client.sessions.store(Role::Admin).set_token("admin-t2").unwrap();
    h.client.router.navigate("/admin/dashboard").unwrap();
    assert_eq!(h.client.router.current_path(), "/admin/dashboard");

    let again = h.client.dispatcher.get::<Value>("/admin/expired").await;
    assert!(matches!(again, Err(Error::AuthExpired { role: Role::Admin })));
    assert_eq!(h.notifier.count(), 2);
    assert_eq!(h.client.router.current_path(), "/admin/login");
}

#[tokio::test]
async fn test_transport_401_is_expiry() {
    let origin = start_backend().await;
    let h = harness(&origin, |_| {});
    login_all(&h);
    h.client.router.navigate("/admin/dashboard").unwrap();

    let result = h.client.dispatcher.get::<Value>("/admin/unauthorized").await;
    assert!(matches!(result, Err(Error::AuthExpired { role: Role::Admin })));
    assert_eq!(h.client.router.current_path(), "/admin/login");
}

#[tokio::test]
async fn test_expiry_follows_current_page_by_default() {
    let origin = start_backend().await;
    let h = harness(&origin, |_| {});
    login_all(&h);
    h.client.router.navigate("/doctor/dashboard").unwrap();

    let result = h.client.dispatcher.get::<Value>("/user/expired").await;
    assert!(matches!(result, Err(Error::AuthExpired { role: Role::Doctor })));
    assert_eq!(h.client.router.current_path(), "/doctor/login");
    assert!(!h.client.sessions.is_authenticated(Role::Doctor));
    assert!(h.client.sessions.is_authenticated(Role::User));
}

#[tokio::test]
async fn test_expiry_on_public_page_uses_its_namespace() {
    let origin = start_backend().await;
    let h = harness(&origin, |_| {});
    login_all(&h);
    h.client.router.navigate("/admin/login").unwrap();

    let result = h.client.dispatcher.get::<Value>("/user/expired").await;
    assert!(matches!(result, Err(Error::AuthExpired { role: Role::Admin })));
    assert_eq!(h.client.router.current_path(), "/admin/login");
    assert!(h.client.sessions.is_authenticated(Role::User));
}

#[tokio::test]
async fn test_expiry_clears_failing_request_role_when_configured() {
    let origin = start_backend().await;
    let h = harness(&origin, |c| c.session.expiry_policy = ExpiryPolicy::Request);
    login_all(&h);
    h.client.router.navigate("/doctor/dashboard").unwrap();

    let result = h.client.dispatcher.get::<Value>("/user/expired").await;
    assert!(matches!(result, Err(Error::AuthExpired { role: Role::User })));
    assert_eq!(h.client.router.current_path(), "/login");
    assert!(!h.client.sessions.is_authenticated(Role::User));
    assert!(h.client.sessions.is_authenticated(Role::Doctor));
}

#[tokio::test]
async fn test_http_errors_do_not_touch_sessions() {
    let origin = start_backend().await;
    let h = harness(&origin, |_| {});
    login_all(&h);

    let cases = [
        ("/admin/forbidden", 403),
        ("/user/missing", 404),
        ("/user/boom", 500),
    ];
    for (path, expected) in cases {
        match h.client.dispatcher.get::<Value>(path).await {
            Err(Error::Http { status, .. }) => assert_eq!(status, expected, "{}", path),
            other => panic!("{}: expected HTTP error, got {:?}", path, other),
        }
    }

    let messages = h.notifier.messages();
    assert_eq!(messages.len(), 3);
    assert_ne!(messages[0], messages[1]);
    assert_ne!(messages[1], messages[2]);

    assert_eq!(h.client.router.current_path(), "/");
    for role in Role::ALL {
        assert!(h.client.sessions.is_authenticated(role));
    }
}

#[tokio::test]
async fn test_network_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let origin = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let h = harness(&origin, |_| {});
    let result = h.client.dispatcher.get::<Value>("/user/profile").await;
    assert!(matches!(result, Err(Error::Network(_))));
    assert_eq!(h.notifier.count(), 1);
    assert_eq!(h.client.router.current_path(), "/");
}

#[tokio::test]
async fn test_per_call_timeout_override() {
    let origin = start_backend().await;
    let h = harness(&origin, |_| {});

    let short = h
        .client
        .dispatcher
        .send::<Value>(ApiRequest::get("/user/slow").timeout(Duration::from_millis(50)))
        .await;
    match short {
        Err(Error::Network(message)) => assert_eq!(message, "Request timed out"),
        other => panic!("expected timeout, got {:?}", other),
    }

    let long: Value = h
        .client
        .dispatcher
        .send(ApiRequest::get("/user/slow").long_running())
        .await
        .unwrap();
    assert_eq!(long, json!("done"));
}

#[tokio::test]
async fn test_malformed_body() {
    let origin = start_backend().await;
    let h = harness(&origin, |_| {});

    let result = h.client.dispatcher.get::<Value>("/user/garbage").await;
    assert!(matches!(result, Err(Error::Json(_))));
    assert_eq!(h.notifier.count(), 1);
}

#[tokio::test]
async fn test_login_and_logout_round_trip() {
    let origin = start_backend().await;
    let h = harness(&origin, |_| {});

    let credentials = LoginRequest {
        username: "house".to_string(),
        password: "vicodin".to_string(),
    };
    let session = api::login(&h.client.dispatcher, Role::Doctor, &credentials)
        .await
        .unwrap();
    assert_eq!(session.token, "doctor-token");
    assert_eq!(session.profile["username"], "doctor-name");
    assert_eq!(h.storage.get("doctor_token").as_deref(), Some("doctor-token"));
    assert!(!h.client.sessions.is_authenticated(Role::Admin));

    let nav = h.client.router.navigate("/doctor").unwrap();
    assert_eq!(nav.path, "/doctor/dashboard");

    api::logout(&h.client.dispatcher, Role::Doctor).await.unwrap();
    assert!(!h.client.sessions.is_authenticated(Role::Doctor));
    assert_eq!(h.storage.get("doctor_info"), None);
}

#[tokio::test]
async fn test_user_login_sets_nickname_fallback() {
    let origin = start_backend().await;
    let h = harness(&origin, |_| {});

    let credentials = LoginRequest {
        username: "alice".to_string(),
        password: "pw".to_string(),
    };
    api::login(&h.client.dispatcher, Role::User, &credentials)
        .await
        .unwrap();

    let profile = h.client.sessions.store(Role::User).profile();
    assert_eq!(profile["nickname"], "user-name");
}

#[tokio::test]
async fn test_statistics_range_query() {
    let origin = start_backend().await;
    let h = harness(&origin, |_| {});

    let stats = api::health_statistics(&h.client.dispatcher, StatisticsRange::Last7Days)
        .await
        .unwrap();
    assert_eq!(stats, json!({"type": "last7Days"}));
}

#[tokio::test]
async fn test_admin_statistics_sends_admin_credentials() {
    let origin = start_backend().await;
    let h = harness(&origin, |_| {});
    login_all(&h);

    let stats = api::admin_statistics(&h.client.dispatcher, StatisticsRange::Last30Days)
        .await
        .unwrap();
    assert_eq!(stats, json!({"type": "last30Days", "doctorCount": 12}));
    assert_eq!(h.notifier.count(), 0);
}

#[tokio::test]
async fn test_report_generation_uses_long_timeout() {
    let origin = start_backend().await;
    let h = harness(&origin, |c| {
        c.api.timeout_secs = 1;
        c.api.long_timeout_secs = 10;
    });
    login_all(&h);
    let request = json!({"recordIds": [1, 2]});

    let plain = h
        .client
        .dispatcher
        .post::<Value, _>("/user/report/generate", &request)
        .await;
    match plain {
        Err(Error::Network(message)) => assert_eq!(message, "Request timed out"),
        other => panic!("expected timeout, got {:?}", other),
    }

    let report = api::generate_report(&h.client.dispatcher, &request)
        .await
        .unwrap();
    assert_eq!(report, json!({"reportId": 7, "request": {"recordIds": [1, 2]}}));
    assert!(h.client.sessions.is_authenticated(Role::User));
}
