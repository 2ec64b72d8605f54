//! End-to-end loader tests against a local catalog server.
//!
//! A small axum app stands in for the products endpoint so the real
//! `ApiClient` is exercised over HTTP.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde_json::Value;
use shopcache_core::{ApiClient, ApiError, CacheManager, Notice, ProductLoader, Provenance};

const FAKESTORE_BODY: &str = r#"[
  {"id":1,"title":"Fjallraven - Foldsack No. 1 Backpack","price":109.95,"description":"Your perfect pack","category":"men's clothing","image":"https://fakestoreapi.com/img/1.jpg","rating":{"rate":3.9,"count":120}},
  {"id":2,"title":"Mens Casual Premium Slim Fit T-Shirts","price":22.3,"description":"Slim-fitting style","category":"men's clothing","image":"https://fakestoreapi.com/img/2.jpg","rating":{"rate":4.1,"count":259}}
]"#;

// == Helper Functions ==

#[derive(Clone)]
struct Fixture {
    reply: Arc<Mutex<(StatusCode, String)>>,
    hits: Arc<AtomicUsize>,
}

impl Fixture {
    fn new(status: StatusCode, body: &str) -> Self {
        Self {
            reply: Arc::new(Mutex::new((status, body.to_string()))),
            hits: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn set(&self, status: StatusCode, body: &str) {
        *self.reply.lock().unwrap() = (status, body.to_string());
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn products(State(fixture): State<Fixture>) -> impl IntoResponse {
    fixture.hits.fetch_add(1, Ordering::SeqCst);
    let (status, body) = fixture.reply.lock().unwrap().clone();
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

async fn slow_products() -> impl IntoResponse {
    tokio::time::sleep(Duration::from_secs(5)).await;
    (StatusCode::OK, FAKESTORE_BODY)
}

/// Serve the fixture on an ephemeral port and return the base URL.
async fn spawn_server(fixture: Fixture) -> String {
    let app = Router::new()
        .route("/products", get(products))
        .route("/slow", get(slow_products))
        .with_state(fixture);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn loader_for(url: String, timeout: Duration, cache: Arc<CacheManager>) -> ProductLoader {
    let client = ApiClient::with_endpoint(url, timeout)
        .unwrap()
        .with_initial_backoff(Duration::from_millis(10));
    ProductLoader::new(Arc::new(client), cache)
}

fn temp_cache() -> (tempfile::TempDir, Arc<CacheManager>) {
    let dir = tempfile::tempdir().unwrap();
    let cache = Arc::new(CacheManager::new(dir.path().join("cache")).unwrap());
    (dir, cache)
}

// == Client ==

#[tokio::test]
async fn test_client_parses_catalog_in_server_order() {
    let fixture = Fixture::new(StatusCode::OK, FAKESTORE_BODY);
    let base = spawn_server(fixture).await;
    let client = ApiClient::with_endpoint(format!("{}/products", base), Duration::from_secs(5)).unwrap();

    let catalog = client.fetch_products().await.unwrap();
    let ids: Vec<i64> = catalog.products().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(catalog.products()[1].display_price(), "$22.30");
}

#[tokio::test]
async fn test_client_non_array_body_is_invalid_response() {
    let fixture = Fixture::new(StatusCode::OK, r#"{"message":"maintenance"}"#);
    let base = spawn_server(fixture).await;
    let client = ApiClient::with_endpoint(format!("{}/products", base), Duration::from_secs(5)).unwrap();

    let err = client.fetch_products().await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_client_retries_rate_limit_then_gives_up() {
    let fixture = Fixture::new(StatusCode::TOO_MANY_REQUESTS, "");
    let base = spawn_server(fixture.clone()).await;
    let client = ApiClient::with_endpoint(format!("{}/products", base), Duration::from_secs(5))
        .unwrap()
        .with_initial_backoff(Duration::from_millis(10));

    let err = client.fetch_products().await.unwrap_err();
    assert!(matches!(err, ApiError::RateLimited));
    assert_eq!(fixture.hits(), 4);
}

// == Loader ==

#[tokio::test]
async fn test_fresh_fetch_is_cached_verbatim() {
    let fixture = Fixture::new(StatusCode::OK, FAKESTORE_BODY);
    let base = spawn_server(fixture).await;
    let (_dir, cache) = temp_cache();
    let loader = loader_for(format!("{}/products", base), Duration::from_secs(5), cache.clone());

    let outcome = loader.load().await;
    assert_eq!(outcome.provenance, Provenance::Network);
    assert_eq!(outcome.catalog.len(), 2);

    let cached = cache.load_products().unwrap().unwrap();
    let server: Value = serde_json::from_str(FAKESTORE_BODY).unwrap();
    assert_eq!(serde_json::to_value(&cached.data).unwrap(), server);
}

#[tokio::test]
async fn test_cache_keeps_fields_the_client_does_not_model() {
    let body = r#"[{"id":2,"title":"Hat","price":5,"image":"http://x/2.png","description":null,"rating":{"rate":4.1,"count":3,"source":"x"}}]"#;
    let fixture = Fixture::new(StatusCode::OK, body);
    let base = spawn_server(fixture.clone()).await;
    let (_dir, cache) = temp_cache();
    let loader = loader_for(format!("{}/products", base), Duration::from_secs(5), cache.clone());
    loader.load().await;

    // Served from the cache on the next load
    fixture.set(StatusCode::INTERNAL_SERVER_ERROR, "");
    let outcome = loader.load().await;
    assert_eq!(outcome.provenance, Provenance::Cache);

    let want: Value = serde_json::from_str(body).unwrap();
    assert_eq!(serde_json::to_value(&outcome.catalog).unwrap(), want);
    assert_eq!(
        serde_json::to_value(&cache.load_products().unwrap().unwrap().data).unwrap(),
        want
    );
}

#[tokio::test]
async fn test_single_item_catalog() {
    let body = r#"[{"id":1,"title":"Shirt","price":19.99,"image":"http://x/1.png"}]"#;
    let fixture = Fixture::new(StatusCode::OK, body);
    let base = spawn_server(fixture).await;
    let (_dir, cache) = temp_cache();
    let loader = loader_for(format!("{}/products", base), Duration::from_secs(5), cache.clone());

    let outcome = loader.load().await;
    assert_eq!(outcome.catalog.len(), 1);
    assert_eq!(outcome.catalog.products()[0].title, "Shirt");
    assert_eq!(cache.load_products().unwrap().unwrap().data, outcome.catalog);
}

#[tokio::test]
async fn test_timeout_falls_back_to_cache() {
    let fixture = Fixture::new(StatusCode::OK, r#"[{"id":2,"title":"Hat","price":5,"image":"http://x/2.png"}]"#);
    let base = spawn_server(fixture).await;
    let (_dir, cache) = temp_cache();

    let warm = loader_for(format!("{}/products", base), Duration::from_secs(5), cache.clone());
    let expected = warm.load().await.catalog;

    let slow = loader_for(format!("{}/slow", base), Duration::from_millis(200), cache);
    let outcome = slow.load().await;
    assert_eq!(outcome.provenance, Provenance::Cache);
    assert_eq!(outcome.notice, Some(Notice::Offline));
    assert_eq!(outcome.catalog, expected);
    assert_eq!(outcome.catalog.products()[0].id, 2);
}

#[tokio::test]
async fn test_server_error_with_no_cache_is_empty() {
    let fixture = Fixture::new(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"boom"}"#);
    let base = spawn_server(fixture).await;
    let (_dir, cache) = temp_cache();
    let loader = loader_for(format!("{}/products", base), Duration::from_secs(5), cache.clone());

    let outcome = loader.load().await;
    assert_eq!(outcome.provenance, Provenance::Empty);
    assert!(outcome.catalog.is_empty());
    assert_eq!(outcome.notice, Some(Notice::ServerError { status: 500 }));
    assert!(cache.load_products().unwrap().is_none());
}

#[tokio::test]
async fn test_server_error_keeps_previous_snapshot() {
    let fixture = Fixture::new(StatusCode::OK, FAKESTORE_BODY);
    let base = spawn_server(fixture.clone()).await;
    let (_dir, cache) = temp_cache();
    let loader = loader_for(format!("{}/products", base), Duration::from_secs(5), cache.clone());

    let first = loader.load().await;
    fixture.set(StatusCode::SERVICE_UNAVAILABLE, "down for maintenance");
    let second = loader.load().await;

    assert_eq!(second.provenance, Provenance::Cache);
    assert_eq!(second.catalog, first.catalog);
    assert!(second.cached_at.is_some());
}

#[tokio::test]
async fn test_repeated_loads_overwrite_with_identical_content() {
    let fixture = Fixture::new(StatusCode::OK, FAKESTORE_BODY);
    let base = spawn_server(fixture.clone()).await;
    let (_dir, cache) = temp_cache();
    let loader = loader_for(format!("{}/products", base), Duration::from_secs(5), cache.clone());

    let first = loader.load().await;
    let after_first = cache.load_products().unwrap().unwrap().data;
    let second = loader.load().await;
    let after_second = cache.load_products().unwrap().unwrap().data;

    assert_eq!(first.catalog, second.catalog);
    assert_eq!(after_first, after_second);
    assert_eq!(after_second.len(), 2);
    assert_eq!(fixture.hits(), 2);
}
