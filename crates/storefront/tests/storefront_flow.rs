//! End-to-end tests driving the full router against stub backend services.
//!
//! The three remote services (auth, catalog, purchases) are stubbed with
//! small axum servers on ephemeral ports. The storefront router itself is
//! driven in-process with `tower::ServiceExt::oneshot`; the session
//! cookie is carried between requests by hand.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{Method, Request, Response, StatusCode, header},
    routing::{get, post},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;

use botica_storefront::{
    build_app,
    config::{ServiceEndpoints, StorefrontConfig},
    state::AppState,
};

// ============================================================================
// Stub Backend
// ============================================================================

/// Shared, mutable behavior of the stub backend.
#[derive(Clone, Default)]
struct StubState {
    valid_tokens: Arc<Mutex<HashSet<String>>>,
    reject_purchases: Arc<AtomicBool>,
    envelope_responses: Arc<AtomicBool>,
    recorded_purchases: Arc<Mutex<Vec<Value>>>,
}

impl StubState {
    fn revoke_all_tokens(&self) {
        self.valid_tokens
            .lock()
            .expect("token lock")
            .clear();
    }

    fn restore_token(&self, token: &str) {
        self.valid_tokens
            .lock()
            .expect("token lock")
            .insert(token.to_string());
    }

    /// Wrap a JSON value the way the legacy gateway does: the real payload
    /// as a JSON string under `body`.
    fn respond(&self, value: Value) -> Json<Value> {
        if self.envelope_responses.load(Ordering::SeqCst) {
            Json(json!({
                "statusCode": 200,
                "body": value.to_string(),
            }))
        } else {
            Json(value)
        }
    }
}

fn stub_products() -> Vec<Value> {
    vec![
        json!({
            "sku": "ASP-100",
            "tenant_id": "inkafarma",
            "nombre": "Aspirina",
            "activeIngredient": "Ácido acetilsalicílico",
            "dosageForm": "tableta",
            "precio": 12.5,
            "expirationDate": "2027-01-31",
            "prescriptionRequired": false
        }),
        json!({
            "sku": "PAR-200",
            "tenant_id": "inkafarma",
            "nombre": "Paracetamol",
            "activeIngredient": "Paracetamol",
            "dosageForm": "jarabe",
            "precio": 8.0,
            "expirationDate": "2026-11-30",
            "prescriptionRequired": false
        }),
    ]
}

async fn stub_login(State(stub): State<StubState>) -> Json<Value> {
    stub.restore_token("tok-1");
    stub.respond(json!({ "token": "tok-1" }))
}

async fn stub_register(State(stub): State<StubState>) -> Json<Value> {
    stub.respond(json!({ "message": "ok" }))
}

async fn stub_validate_token(
    State(stub): State<StubState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let token = body["token"].as_str().unwrap_or_default();
    let valid = stub
        .valid_tokens
        .lock()
        .expect("token lock")
        .contains(token);

    if valid {
        (StatusCode::OK, stub.respond(json!({ "valid": true })))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "token inválido" })))
    }
}

async fn stub_list_products(State(stub): State<StubState>) -> Json<Value> {
    stub.respond(json!({ "items": stub_products() }))
}

async fn stub_get_product(
    State(stub): State<StubState>,
    Path((_tenant, sku)): Path<(String, String)>,
) -> (StatusCode, Json<Value>) {
    match stub_products()
        .into_iter()
        .find(|p| p["sku"].as_str() == Some(sku.as_str()))
    {
        Some(product) => (StatusCode::OK, stub.respond(product)),
        None => (StatusCode::NOT_FOUND, Json(json!({ "message": "no existe" }))),
    }
}

async fn stub_register_purchase(
    State(stub): State<StubState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if stub.reject_purchases.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "ledger no disponible" })),
        );
    }

    let purchase = json!({
        "compra_id": "c-1",
        "user_id": body["user_id"],
        "products": body["products"],
        "total": body["total"],
        "fecha": "2026-08-01T12:00:00Z",
        "status": "completed"
    });
    stub.recorded_purchases
        .lock()
        .expect("purchase lock")
        .push(purchase.clone());

    (StatusCode::OK, stub.respond(purchase))
}

async fn stub_list_purchases(State(stub): State<StubState>) -> Json<Value> {
    let purchases = stub
        .recorded_purchases
        .lock()
        .expect("purchase lock")
        .clone();
    stub.respond(json!({ "compras": purchases }))
}

/// Bind the stub backend to an ephemeral port and serve it in the
/// background. One server plays all three services.
async fn spawn_stub(stub: StubState) -> SocketAddr {
    let router = Router::new()
        .route("/login", post(stub_login))
        .route("/register", post(stub_register))
        .route("/validar-token", post(stub_validate_token))
        .route("/productos/listar", post(stub_list_products))
        .route("/productos/{tenant}/{sku}", get(stub_get_product))
        .route("/compras/registrar-compra", post(stub_register_purchase))
        .route("/compras/listar-compras", post(stub_list_purchases))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub local addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server");
    });

    addr
}

// ============================================================================
// Test Harness
// ============================================================================

/// The storefront app plus the session cookie carried across requests.
struct TestApp {
    app: Router,
    stub: StubState,
    cookie: Option<String>,
}

impl TestApp {
    async fn spawn() -> Self {
        let stub = StubState::default();
        let addr = spawn_stub(stub.clone()).await;
        let base = Url::parse(&format!("http://{addr}")).expect("stub url");

        let config = StorefrontConfig {
            host: "127.0.0.1".parse().expect("host"),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            tenant_id: "inkafarma".to_string(),
            http_timeout_secs: 5,
            services: ServiceEndpoints {
                auth_url: base.clone(),
                catalog_url: base.clone(),
                purchases_url: base,
            },
        };

        let state = AppState::new(config).expect("app state");
        Self {
            app: build_app(state),
            stub,
            cookie: None,
        }
    }

    async fn request(&mut self, method: Method, uri: &str, form: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie.as_str());
        }

        let request = match form {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router response");

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let raw = set_cookie.to_str().expect("cookie header");
            let pair = raw.split(';').next().expect("cookie pair");
            self.cookie = Some(pair.to_string());
        }

        response
    }

    async fn get(&mut self, uri: &str) -> Response<Body> {
        self.request(Method::GET, uri, None).await
    }

    async fn post_form(&mut self, uri: &str, form: &str) -> Response<Body> {
        self.request(Method::POST, uri, Some(form)).await
    }

    async fn login(&mut self) {
        let response = self
            .post_form("/auth/login", "user_id=ana&password=secreta")
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/mainPage");
    }
}

fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("location header")
        .to_str()
        .expect("location value")
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

// ============================================================================
// Auth & Session Gate
// ============================================================================

#[tokio::test]
async fn landing_page_shows_login_and_register_forms() {
    let mut app = TestApp::spawn().await;

    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Iniciar sesión"));
    assert!(body.contains("Registrarse"));
}

#[tokio::test]
async fn login_redirects_to_catalog_and_establishes_session() {
    let mut app = TestApp::spawn().await;
    app.login().await;

    let response = app.get("/mainPage").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Hola, ana"));
    assert!(body.contains("Aspirina"));
    assert!(body.contains("Paracetamol"));
}

#[tokio::test]
async fn registration_redirects_to_landing_with_success_banner() {
    let mut app = TestApp::spawn().await;

    let response = app
        .post_form(
            "/auth/register",
            "user_id=ana&password=secreta&password_confirm=secreta",
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/?success=registrado");
}

#[tokio::test]
async fn mismatched_registration_passwords_are_rejected_locally() {
    let mut app = TestApp::spawn().await;

    let response = app
        .post_form(
            "/auth/register",
            "user_id=ana&password=secreta&password_confirm=otra",
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/?error=password_distinta");
}

#[tokio::test]
async fn protected_page_without_session_redirects_to_landing() {
    let mut app = TestApp::spawn().await;

    let response = app.get("/mainPage").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn fragment_without_session_answers_unauthorized() {
    let mut app = TestApp::spawn().await;

    let response = app.get("/search?q=aspirina&seq=1").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn revoked_token_evicts_session_including_cart() {
    let mut app = TestApp::spawn().await;
    app.login().await;

    // Put something in the cart first
    let response = app
        .post_form("/cart/add", "product_id=ASP-100&quantity=2")
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Auth service stops accepting the token
    app.stub.revoke_all_tokens();

    let response = app.get("/mainPage").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    // Even with the token valid again, the evicted cart must be gone
    app.stub.restore_token("tok-1");
    app.login().await;

    let response = app.get("/cart").await;
    let body = body_text(response).await;
    assert!(body.contains("El carrito está vacío"));
}

#[tokio::test]
async fn logout_clears_the_session() {
    let mut app = TestApp::spawn().await;
    app.login().await;

    let response = app.post_form("/auth/logout", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let response = app.get("/purchases").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn adding_the_same_product_merges_quantities() {
    let mut app = TestApp::spawn().await;
    app.login().await;

    app.post_form("/cart/add", "product_id=ASP-100&quantity=2")
        .await;
    app.post_form("/cart/add", "product_id=ASP-100&quantity=1")
        .await;

    let response = app.get("/cart/count").await;
    let body = body_text(response).await;
    assert!(body.contains(">3<"), "expected merged count of 3, got: {body}");
}

#[tokio::test]
async fn updating_quantity_to_zero_removes_the_line() {
    let mut app = TestApp::spawn().await;
    app.login().await;

    app.post_form("/cart/add", "product_id=ASP-100&quantity=2")
        .await;
    let response = app
        .post_form("/cart/update", "product_id=ASP-100&quantity=0")
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("El carrito está vacío"));
}

#[tokio::test]
async fn unknown_product_cannot_be_added() {
    let mut app = TestApp::spawn().await;
    app.login().await;

    let response = app
        .post_form("/cart/add", "product_id=NO-EXISTE&quantity=1")
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = app.get("/cart/count").await;
    let body = body_text(response).await;
    assert!(!body.contains("cart-badge"));
}

// ============================================================================
// Checkout & Purchase History
// ============================================================================

#[tokio::test]
async fn checkout_registers_the_purchase_and_empties_the_cart() {
    let mut app = TestApp::spawn().await;
    app.login().await;

    app.post_form("/cart/add", "product_id=ASP-100&quantity=2")
        .await;
    app.post_form("/cart/add", "product_id=PAR-200&quantity=1")
        .await;

    let response = app.post_form("/cart/checkout", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/mainPage?success=compra");

    // Ledger received the snapshot with per-line identity and the total
    let recorded = app.stub.recorded_purchases.lock().expect("purchase lock");
    assert_eq!(recorded.len(), 1);
    let purchase = recorded.first().expect("one purchase");
    assert_eq!(purchase["user_id"], "ana");
    assert_eq!(purchase["products"][0]["product_id"], "ASP-100");
    assert_eq!(purchase["products"][0]["quantity"], 2);
    assert_eq!(purchase["total"], 33.0);
    drop(recorded);

    let response = app.get("/cart").await;
    let body = body_text(response).await;
    assert!(body.contains("El carrito está vacío"));
}

#[tokio::test]
async fn failed_checkout_leaves_the_cart_untouched() {
    let mut app = TestApp::spawn().await;
    app.login().await;

    app.post_form("/cart/add", "product_id=ASP-100&quantity=2")
        .await;
    app.stub.reject_purchases.store(true, Ordering::SeqCst);

    let response = app.post_form("/cart/checkout", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/cart?error=compra");

    let response = app.get("/cart").await;
    let body = body_text(response).await;
    assert!(body.contains("Aspirina"));
    assert!(!body.contains("El carrito está vacío"));
}

#[tokio::test]
async fn checkout_with_empty_cart_redirects_back() {
    let mut app = TestApp::spawn().await;
    app.login().await;

    let response = app.post_form("/cart/checkout", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/cart");
}

#[tokio::test]
async fn purchase_history_lists_registered_purchases() {
    let mut app = TestApp::spawn().await;
    app.login().await;

    app.post_form("/cart/add", "product_id=PAR-200&quantity=3")
        .await;
    app.post_form("/cart/checkout", "").await;

    let response = app.get("/purchases").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Compra c-1"));
    assert!(body.contains("Paracetamol"));
    assert!(body.contains("Completada"));
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn search_returns_matches_and_echoes_the_sequence_number() {
    let mut app = TestApp::spawn().await;
    app.login().await;

    let response = app.get("/search?q=aspirina&seq=7").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("x-search-seq")
            .expect("seq header")
            .to_str()
            .expect("seq value"),
        "7"
    );

    let body = body_text(response).await;
    assert!(body.contains("Aspirina"));
    assert!(!body.contains("Paracetamol"));
}

#[tokio::test]
async fn blank_search_yields_no_results() {
    let mut app = TestApp::spawn().await;
    app.login().await;

    let response = app.get("/search?q=%20%20&seq=1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Sin resultados"));
}

#[tokio::test]
async fn autocomplete_matches_on_active_ingredient() {
    let mut app = TestApp::spawn().await;
    app.login().await;

    let response = app.get("/search/autocomplete?q=paracetamol&seq=2").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Paracetamol"));
    assert!(!body.contains("Aspirina"));
}

// ============================================================================
// Legacy Envelope Responses
// ============================================================================

#[tokio::test]
async fn envelope_wrapped_backend_responses_are_unwrapped() {
    let mut app = TestApp::spawn().await;
    app.stub.envelope_responses.store(true, Ordering::SeqCst);

    app.login().await;

    let response = app.get("/mainPage").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Aspirina"));
}
