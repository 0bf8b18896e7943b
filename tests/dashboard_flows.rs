use std::collections::BTreeMap;
use std::sync::{ Arc, Mutex };

use axum::routing::{ get, post };
use axum::{ Json, Router };
use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{ json, Value };

use medcare_client::actions::Actions;
use medcare_client::api::ApiClient;
use medcare_client::page::{ self, Element, Submission };
use medcare_client::session::{ MemorySessionStore, SessionStore, TOKEN_KEY, USER_ID_KEY };
use medcare_client::ui::{ RecordingSurface, SurfaceEvent };

type Captured = Arc<Mutex<Vec<Value>>>;

async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });
    format!("http://{}", addr)
}

fn actions_for(base_url: &str) -> (Actions, Arc<RecordingSurface>, Arc<MemorySessionStore>) {
    let surface = Arc::new(RecordingSurface::default());
    let session = Arc::new(MemorySessionStore::default());
    let api = ApiClient::new(base_url.to_string(), "demo_user".to_string());
    let actions = Actions::new(api, session.clone(), surface.clone());
    (actions, surface, session)
}

fn capturing(sink: &Captured, reply: Value) -> axum::routing::MethodRouter {
    let sink = sink.clone();
    post(move |Json(body): Json<Value>| {
        let sink = sink.clone();
        async move {
            sink.lock().unwrap().push(body);
            Json(reply)
        }
    })
}

/// A free loopback port with nothing listening on it.
async fn dead_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

#[tokio::test]
async fn analyze_renders_result_then_refreshes_history() {
    let app = Router::new()
        .route(
            "/api/analyze-sentiment",
            post(|| async {
                Json(json!({ "message": "Positive", "label": "POS", "score": 0.87 }))
            })
        )
        .route(
            "/api/history",
            get(|| async {
                Json(json!([{ "text": "feeling great", "label": "positive", "score": 0.9 }]))
            })
        );
    let base_url = spawn_backend(app).await;
    let (actions, surface, _) = actions_for(&base_url);

    actions.analyze_text("feeling great").await;

    assert_eq!(surface.take(), vec![
        SurfaceEvent::Result("Positive (Label: POS, Score: 0.87)".to_string()),
        SurfaceEvent::History(vec!["feeling great → positive (0.90)".to_string()])
    ]);
}

#[tokio::test]
async fn analyze_server_error_alerts_and_skips_history() {
    let app = Router::new().route(
        "/api/analyze-sentiment",
        post(|| async { Json(json!({ "error": "Text is required" })) })
    );
    let base_url = spawn_backend(app).await;
    let (actions, surface, _) = actions_for(&base_url);

    actions.analyze_text("").await;

    assert_eq!(surface.take(), vec![SurfaceEvent::Alert("Text is required".to_string())]);
}

#[tokio::test]
async fn history_keeps_server_order_and_formatting() {
    let app = Router::new().route(
        "/api/history",
        get(|| async {
            Json(
                json!([
                    { "text": "slept badly", "label": "negative", "score": -0.4 },
                    { "text": "okay day", "label": "neutral", "score": 0.0 },
                    { "text": "feeling great", "label": "positive", "score": 0.917 }
                ])
            )
        })
    );
    let base_url = spawn_backend(app).await;
    let (actions, surface, _) = actions_for(&base_url);

    actions.load_history().await;

    assert_eq!(surface.take(), vec![
        SurfaceEvent::History(vec![
            "slept badly → negative (-0.40)".to_string(),
            "okay day → neutral (0.00)".to_string(),
            "feeling great → positive (0.92)".to_string()
        ])
    ]);
}

#[tokio::test]
async fn login_success_stores_session_and_navigates() {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().route(
        "/api/login",
        capturing(&captured, json!({ "status": "success", "token": "abc", "user_id": "1" }))
    );
    let base_url = spawn_backend(app).await;
    let (actions, surface, session) = actions_for(&base_url);

    actions.submit_login("  demo  ", "  secret  ").await;

    // credentials are trimmed before they hit the wire
    assert_eq!(captured.lock().unwrap().as_slice(), &[
        json!({ "username": "demo", "password": "secret" }),
    ]);
    assert_eq!(session.get(TOKEN_KEY).unwrap(), Some("abc".to_string()));
    assert_eq!(session.get(USER_ID_KEY).unwrap(), Some("1".to_string()));
    assert_eq!(surface.take(), vec![SurfaceEvent::Navigate("/dashboard".to_string())]);
}

#[tokio::test]
async fn login_rejection_without_error_field_uses_fallback_text() {
    let app = Router::new().route(
        "/api/login",
        post(|| async {
            (StatusCode::UNAUTHORIZED, Json(json!({ "message": "invalid credentials" })))
        })
    );
    let base_url = spawn_backend(app).await;
    let (actions, surface, session) = actions_for(&base_url);

    actions.submit_login("demo", "wrong").await;

    assert_eq!(surface.take(), vec![SurfaceEvent::Alert("Login failed".to_string())]);
    assert_eq!(session.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn login_rejection_surfaces_the_server_error() {
    let app = Router::new().route(
        "/api/login",
        post(|| async {
            (StatusCode::UNAUTHORIZED, Json(json!({ "error": "invalid credentials" })))
        })
    );
    let base_url = spawn_backend(app).await;
    let (actions, surface, _) = actions_for(&base_url);

    actions.submit_login("demo", "wrong").await;

    assert_eq!(surface.take(), vec![SurfaceEvent::Alert("invalid credentials".to_string())]);
}

#[tokio::test]
async fn signup_success_routes_back_to_login() {
    let app = Router::new().route(
        "/api/signup",
        post(|| async { Json(json!({ "status": "success" })) })
    );
    let base_url = spawn_backend(app).await;
    let (actions, surface, _) = actions_for(&base_url);

    actions.submit_signup("demo", "secret").await;

    assert_eq!(surface.take(), vec![
        SurfaceEvent::Alert("Signup successful! Please login.".to_string()),
        SurfaceEvent::Navigate("/login".to_string())
    ]);
}

#[tokio::test]
async fn signup_network_failure_alerts_and_stays_put() {
    let base_url = dead_endpoint().await;
    let (actions, surface, _) = actions_for(&base_url);

    actions.submit_signup("demo", "secret").await;

    assert_eq!(surface.take(), vec![
        SurfaceEvent::Alert("Server error. Please try again.".to_string())
    ]);
}

#[tokio::test]
async fn chat_wrapper_sends_exact_body_and_returns_reply_verbatim() {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().route("/chat", capturing(&captured, json!({ "reply": "ok" })));
    let base_url = spawn_backend(app).await;
    let api = ApiClient::new(base_url, "demo_user".to_string());

    let reply = api.chat("hi").await.unwrap();

    assert_eq!(captured.lock().unwrap().as_slice(), &[
        json!({ "user_id": "demo_user", "message": "hi" }),
    ]);
    assert_eq!(reply, json!({ "reply": "ok" }));
}

#[tokio::test]
async fn assessment_wrapper_keeps_answer_order() {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().route(
        "/api/assessment",
        capturing(&captured, json!({ "status": "saved", "label": "Medium" }))
    );
    let base_url = spawn_backend(app).await;
    let api = ApiClient::new(base_url, "demo_user".to_string());

    let answers = vec![json!(3), json!(1), json!("often")];
    let reply = api.submit_assessment(4, answers).await.unwrap();

    assert_eq!(captured.lock().unwrap().as_slice(), &[
        json!({ "user_id": "demo_user", "score": 4, "answers": [3, 1, "often"] }),
    ]);
    assert_eq!(reply, json!({ "status": "saved", "label": "Medium" }));
}

#[tokio::test]
async fn predict_wrapper_sends_score_and_named_features() {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().route(
        "/predict_fused",
        capturing(&captured, json!({ "label": "Medium", "suggestions": [] }))
    );
    let base_url = spawn_backend(app).await;
    let api = ApiClient::new(base_url, "demo_user".to_string());

    let mut features = BTreeMap::new();
    features.insert("sleep_hours".to_string(), 6.5);
    let reply = api.predict_fused(7.0, features).await.unwrap();

    assert_eq!(captured.lock().unwrap().as_slice(), &[
        json!({ "questionnaire_score": 7.0, "behavior_features": { "sleep_hours": 6.5 } }),
    ]);
    assert_eq!(reply, json!({ "label": "Medium", "suggestions": [] }));
}

#[tokio::test]
async fn session_login_wrapper_passes_user_id_through() {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().route("/login", capturing(&captured, json!({ "ok": true })));
    let base_url = spawn_backend(app).await;
    let api = ApiClient::new(base_url, "demo_user".to_string());

    let reply = api.session_login("u42").await.unwrap();

    assert_eq!(captured.lock().unwrap().as_slice(), &[json!({ "user_id": "u42" })]);
    assert_eq!(reply, json!({ "ok": true }));
}

#[tokio::test]
async fn dashboard_bootstrap_loads_history_eagerly() {
    let app = Router::new().route(
        "/api/history",
        get(|| async { Json(json!([{ "text": "hi", "label": "neutral", "score": 0.0 }])) })
    );
    let base_url = spawn_backend(app).await;
    let (actions, surface, _) = actions_for(&base_url);

    let wiring = page::bootstrap(&page::preset("dashboard").unwrap());
    wiring.run_eager(&actions).await;

    assert_eq!(surface.take(), vec![
        SurfaceEvent::History(vec!["hi → neutral (0.00)".to_string()])
    ]);
}

#[tokio::test]
async fn dispatch_ignores_elements_absent_from_the_page() {
    let base_url = dead_endpoint().await;
    let (actions, surface, _) = actions_for(&base_url);

    let wiring = page::bootstrap(&page::preset("login").unwrap());
    wiring.dispatch(&actions, Element::AnalyzeInput, Submission::Text("hi".to_string())).await;

    // no analyze handler on the login page, so nothing reaches the surface
    assert_eq!(surface.take(), Vec::<SurfaceEvent>::new());
}

#[tokio::test]
async fn login_page_dispatch_reaches_the_login_handler() {
    let app = Router::new().route(
        "/api/login",
        post(|| async { Json(json!({ "status": "success", "token": "t", "user_id": 9 })) })
    );
    let base_url = spawn_backend(app).await;
    let (actions, surface, session) = actions_for(&base_url);

    let wiring = page::bootstrap(&page::preset("login").unwrap());
    wiring.dispatch(&actions, Element::LoginForm, Submission::Credentials {
        username: "demo".to_string(),
        password: "secret".to_string(),
    }).await;

    assert_eq!(session.get(USER_ID_KEY).unwrap(), Some("9".to_string()));
    assert_eq!(surface.take(), vec![SurfaceEvent::Navigate("/dashboard".to_string())]);
}
