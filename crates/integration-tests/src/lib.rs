//! Integration tests for Deskshop.
//!
//! Both services are built over shared in-memory stores and driven through
//! `tower::ServiceExt::oneshot`, so no database or network is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p deskshop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `admin` - Product create/edit/delete and uploads
//! - `storefront` - Categories, product pages and the session cart

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use deskshop_catalog::{
    AssetCleanup, DocumentStore, MemoryDocumentStore, MemoryObjectStore, ObjectStore,
    ProductPipeline, ProductRepository,
};
use serde_json::Value;
use tower::ServiceExt;

/// Base URL the in-memory object store publishes uploads under.
pub const STORAGE_URL: &str = "https://storage.example.com";

/// Both services wired to the same stores.
pub struct TestContext {
    pub store: Arc<MemoryDocumentStore>,
    pub objects: Arc<MemoryObjectStore>,
    pub admin: Router,
    pub storefront: Router,
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(MemoryDocumentStore::new());
        let objects = Arc::new(MemoryObjectStore::new(STORAGE_URL));

        let documents: Arc<dyn DocumentStore> = store.clone();
        let blobs: Arc<dyn ObjectStore> = objects.clone();

        let admin_products = ProductRepository::new(Arc::clone(&documents))
            .with_assets(AssetCleanup::new(Arc::clone(&blobs)));
        let admin = deskshop_admin::app(deskshop_admin::state::AppState::new(
            ProductPipeline::new(admin_products),
            blobs,
        ));

        let storefront = deskshop_storefront::app(
            deskshop_storefront::state::AppState::new(ProductRepository::new(documents)),
            deskshop_storefront::middleware::create_session_layer(false),
        );

        Self {
            store,
            objects,
            admin,
            storefront,
        }
    }

    /// Create a product through the admin API and return its id.
    pub async fn create_product(&self, title: &str, stock: u32) -> String {
        let stock = stock.to_string();
        let mut fields = product_form(title);
        fields.retain(|(key, _)| *key != "stock");
        fields.push(("stock", stock.as_str()));

        let response = send(&self.admin, form_request("/products", &fields)).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text());
        response.json()["product"]["id"].as_str().unwrap().to_string()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A collected response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The `name=value` part of the session cookie, if one was set.
    #[must_use]
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::to_owned)
    }
}

/// Send one request through `app`.
pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    TestResponse {
        status,
        headers,
        body,
    }
}

/// A valid flat product form. `images` holds one URL.
#[must_use]
pub fn product_form(title: &str) -> Vec<(&str, &str)> {
    vec![
        ("title", title),
        (
            "description",
            "A smooth-writing gel pen with a comfortable grip, ideal for daily notes.",
        ),
        ("category", "Pens"),
        ("price", "12.50"),
        ("discountPercentage", "10"),
        ("stock", "40"),
        ("brand", "Inkwell"),
        ("weight", "0.02"),
        ("dimensions.width", "1"),
        ("dimensions.height", "14"),
        ("dimensions.depth", "1"),
        ("color", "Blue"),
        ("warrantyInformation", "1 year warranty"),
        ("shippingInformation", "Ships in 2 days"),
        ("availabilityStatus", "In Stock"),
        ("returnPolicy", "30 days return policy"),
        ("minimumOrderQuantity", "1"),
        ("images", "https://storage.example.com/products/blue-pen.jpg"),
    ]
}

/// `POST` an urlencoded form.
#[must_use]
pub fn form_request(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish();
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

/// A bodiless request, carrying `cookie` when given.
#[must_use]
pub fn request(method: Method, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// `POST` a JSON body, carrying `cookie` when given.
#[must_use]
pub fn json_request(uri: &str, body: &Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// `POST` a multipart body with a single file field.
#[must_use]
pub fn multipart_request(uri: &str, field: &str, content_type: &str, bytes: &[u8]) -> Request<Body> {
    const BOUNDARY: &str = "deskshop-test-boundary";

    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"upload\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}
