//! Integration tests: build the router over the in-memory store and a stub
//! provider, drive it with `oneshot`, and assert on the JSON envelopes.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use texmage_api::error::INVALID_JSON_DETAILS;
use texmage_api::{AppState, config::ApiConfig};
use texmage_core::auth::jwt::issue_token;
use texmage_core::generation::{ImageProvider, ProviderError};
use texmage_core::store::InMemoryCredentialStore;
use tower::ServiceExt;

const SECRET: &str = "integration-secret";

struct StubProvider {
    calls: AtomicU32,
    fail: bool,
}

#[async_trait]
impl ImageProvider for StubProvider {
    async fn generate(&self, _prompt: &str) -> Result<Vec<u8>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.fail {
            return Err(ProviderError::Status {
                status: 500,
                body: "boom".into(),
            });
        }
        Ok(b"\x89PNG".to_vec())
    }
}

struct TestApp {
    app: Router,
    store: Arc<InMemoryCredentialStore>,
    provider: Arc<StubProvider>,
}

fn test_app(provider_fails: bool) -> TestApp {
    let store = Arc::new(InMemoryCredentialStore::new());
    let provider = Arc::new(StubProvider {
        calls: AtomicU32::new(0),
        fail: provider_fails,
    });
    let mut config = ApiConfig::new(SECRET, "test-key");
    config.bcrypt_cost = 4;
    let state = AppState {
        store: store.clone(),
        provider: provider.clone(),
        config,
    };
    TestApp {
        app: texmage_api::router(state),
        store,
        provider,
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.expect("request");
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("parse JSON")
    };
    (status, json)
}

fn post_json(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("token", token);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("token", token);
    }
    builder.body(Body::empty()).unwrap()
}

/// Register `email` and return its token.
async fn signup(app: &Router, email: &str) -> String {
    let (status, json) = send(
        app,
        post_json(
            "/signup",
            json!({"name": "Ann", "email": email, "password": "secret1"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    json["token"].as_str().unwrap().to_string()
}

fn user_id_of(token: &str) -> String {
    texmage_core::auth::jwt::verify_token(token, SECRET.as_bytes())
        .unwrap()
        .user_id
}

#[tokio::test]
async fn signup_returns_token_and_public_user() {
    let t = test_app(false);

    let (status, json) = send(
        &t.app,
        post_json(
            "/signup",
            json!({"name": "Ann", "email": "ann@x.com", "password": "secret1"}),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "User added successfully.");
    assert_eq!(json["user"]["name"], "Ann");
    assert_eq!(json["user"]["email"], "ann@x.com");
    assert!(json["user"]["_id"].is_string());
    assert!(json["user"].get("password").is_none());
    assert!(json["user"].get("passwordHash").is_none());

    let token = json["token"].as_str().unwrap();
    let (_, credits) = send(&t.app, get("/credits", Some(token))).await;
    assert_eq!(credits["success"], true);
    assert_eq!(credits["credits"], 5);
    assert_eq!(credits["name"], "Ann");
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let t = test_app(false);
    signup(&t.app, "ann@x.com").await;

    let (status, json) = send(
        &t.app,
        post_json(
            "/signup",
            json!({"name": "Other", "email": "ann@x.com", "password": "secret2"}),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "User already exists.");
    assert_eq!(t.store.user_count(), 1);
}

#[tokio::test]
async fn signup_validation_reports_first_failing_field() {
    let t = test_app(false);

    let (status, json) = send(
        &t.app,
        post_json(
            "/signup",
            json!({"name": "Ann", "email": "ann@x.com", "password": "123"}),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Fill the inputs properly");
    assert_eq!(json["details"], "Password must have at least 6 characters");
    assert_eq!(t.store.user_count(), 0);
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let t = test_app(false);
    let req = Request::builder()
        .method("POST")
        .uri("/signup")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, json) = send(&t.app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Fill the inputs properly");
    assert_eq!(json["details"], INVALID_JSON_DETAILS);
    assert!(!json.to_string().contains("line 1"));
}

#[tokio::test]
async fn wrong_field_types_hide_parser_output() {
    let t = test_app(false);

    let (status, json) = send(
        &t.app,
        post_json("/login", json!({"email": 42, "password": ["x"]}), None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["details"], INVALID_JSON_DETAILS);
    assert!(!json.to_string().contains("invalid type"));
}

#[tokio::test]
async fn login_succeeds_with_correct_password() {
    let t = test_app(false);
    signup(&t.app, "ann@x.com").await;

    let (status, json) = send(
        &t.app,
        post_json(
            "/login",
            json!({"email": "ann@x.com", "password": "secret1"}),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Login Successful");
    assert_eq!(json["user"]["email"], "ann@x.com");
    assert!(json["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let t = test_app(false);
    signup(&t.app, "ann@x.com").await;

    let (wrong_status, wrong) = send(
        &t.app,
        post_json(
            "/login",
            json!({"email": "ann@x.com", "password": "wrongpassword"}),
            None,
        ),
    )
    .await;
    let (unknown_status, unknown) = send(
        &t.app,
        post_json(
            "/login",
            json!({"email": "nobody@x.com", "password": "secret1"}),
            None,
        ),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong, unknown);
    assert_eq!(wrong["message"], "Invalid credentials.");
}

#[tokio::test]
async fn credits_without_token_asks_to_login() {
    let t = test_app(false);

    let (status, json) = send(&t.app, get("/credits", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Token not found. Login again");
}

#[tokio::test]
async fn tampered_token_is_not_authorized() {
    let t = test_app(false);
    let token = signup(&t.app, "ann@x.com").await;
    let tampered = format!("{token}x");

    let (status, json) = send(&t.app, get("/credits", Some(&tampered))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Not authorized. Login again");
}

#[tokio::test]
async fn token_signed_with_another_secret_is_not_authorized() {
    let t = test_app(false);
    let token = issue_token("someone", "a@x.com", b"other-secret").unwrap();

    let (_, json) = send(&t.app, get("/credits", Some(&token))).await;

    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Not authorized. Login again");
}

#[tokio::test]
async fn valid_token_for_unknown_user_is_reported() {
    let t = test_app(false);
    let token = issue_token("ghost", "ghost@x.com", SECRET.as_bytes()).unwrap();

    let (status, credits) = send(&t.app, get("/credits", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(credits["success"], false);
    assert_eq!(credits["message"], "User not found");

    let (_, generated) = send(
        &t.app,
        post_json(
            "/image/generate-image",
            json!({"prompt": "a fox"}),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(generated["success"], false);
    assert_eq!(generated["message"], "Missing details");
    assert_eq!(t.provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn five_generations_then_no_credits() {
    let t = test_app(false);
    let token = signup(&t.app, "ann@x.com").await;

    for expected in (0..5).rev() {
        let (status, json) = send(
            &t.app,
            post_json(
                "/image/generate-image",
                json!({"prompt": "a red fox"}),
                Some(&token),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["creditBalance"], expected);
        assert!(
            json["resultImage"]
                .as_str()
                .unwrap()
                .starts_with("data:image/png;base64,")
        );
    }

    let (status, json) = send(
        &t.app,
        post_json(
            "/image/generate-image",
            json!({"prompt": "a red fox"}),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "You have no credits left.");
    assert_eq!(json["creditBalance"], 0);
    assert_eq!(t.provider.calls.load(Ordering::SeqCst), 5);

    let (_, credits) = send(&t.app, get("/credits", Some(&token))).await;
    assert_eq!(credits["credits"], 0);
}

#[tokio::test]
async fn provider_failure_keeps_balance_and_omits_it() {
    let t = test_app(true);
    let token = signup(&t.app, "ann@x.com").await;

    let (status, json) = send(
        &t.app,
        post_json(
            "/image/generate-image",
            json!({"prompt": "a red fox"}),
            Some(&token),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Error generating image.");
    assert!(json.get("creditBalance").is_none());
    assert!(json.get("details").is_none());

    let (_, credits) = send(&t.app, get("/credits", Some(&token))).await;
    assert_eq!(credits["credits"], 5);
}

#[tokio::test]
async fn blank_or_missing_prompt_is_missing_details() {
    let t = test_app(false);
    let token = signup(&t.app, "ann@x.com").await;

    for body in [json!({}), json!({"prompt": ""}), json!({"prompt": "   "})] {
        let (_, json) = send(
            &t.app,
            post_json("/image/generate-image", body, Some(&token)),
        )
        .await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Missing details");
    }
    assert_eq!(t.provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn generation_without_token_never_reaches_provider() {
    let t = test_app(false);

    let (_, json) = send(
        &t.app,
        post_json("/image/generate-image", json!({"prompt": "a fox"}), None),
    )
    .await;

    assert_eq!(json["message"], "Token not found. Login again");
    assert_eq!(t.provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn concurrent_generations_on_last_credit_charge_once() {
    let t = test_app(false);
    let token = signup(&t.app, "ann@x.com").await;
    let user_id = user_id_of(&token);
    assert!(t.store.set_balance(&user_id, 1));

    let first = send(
        &t.app,
        post_json(
            "/image/generate-image",
            json!({"prompt": "a fox"}),
            Some(&token),
        ),
    );
    let second = send(
        &t.app,
        post_json(
            "/image/generate-image",
            json!({"prompt": "a hen"}),
            Some(&token),
        ),
    );
    let ((_, a), (_, b)) = tokio::join!(first, second);

    let successes = [&a, &b].iter().filter(|j| j["success"] == true).count();
    assert_eq!(successes, 1, "{a} / {b}");

    let (_, credits) = send(&t.app, get("/credits", Some(&token))).await;
    assert_eq!(credits["credits"], 0);
}

#[tokio::test]
async fn health_reports_version_and_database() {
    let t = test_app(false);

    let (status, json) = send(&t.app, get("/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["database"], true);
    assert_eq!(json["version"], texmage_core::version());
}

#[tokio::test]
async fn unknown_route_is_404() {
    let t = test_app(false);

    let (status, _) = send(&t.app, get("/nope", None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn wrong_method_is_405() {
    let t = test_app(false);

    let (status, _) = send(&t.app, get("/signup", None)).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
