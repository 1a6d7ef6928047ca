//! Integration tests for the patient HTTP API.
//!
//! The router is driven in-process with `oneshot` over an in-memory store,
//! so no database or TCP port is needed.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value as JsonValue, json};
use tower::ServiceExt;

use patient_core::Patient;
use patient_server::config::{Config, StoreBackend};
use patient_server::db::{InMemoryPatientStore, PatientStore, StoreError};
use patient_server::service::PatientService;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// In-memory store that counts mutating calls
#[derive(Clone, Default)]
struct CountingStore {
    inner: InMemoryPatientStore,
    saves: Arc<AtomicUsize>,
    deletes: Arc<AtomicUsize>,
}

impl PatientStore for CountingStore {
    async fn find_all(&self) -> Result<Vec<Patient>, StoreError> {
        self.inner.find_all().await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Patient>, StoreError> {
        self.inner.find_by_id(id).await
    }

    async fn save(&self, patient: Patient) -> Result<Patient, StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(patient).await
    }

    async fn exists_by_id(&self, id: &str) -> Result<bool, StoreError> {
        self.inner.exists_by_id(id).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_by_id(id).await
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.inner.count().await
    }
}

fn test_config() -> Config {
    Config {
        database_url: String::new(),
        bind_address: "127.0.0.1:0".to_string(),
        cors_origins: vec!["*".to_string()],
        store: StoreBackend::Memory,
    }
}

/// Build the app router over a fresh counting store.
fn test_app() -> (Router, CountingStore) {
    let store = CountingStore::default();
    let app = patient_server::build_app(PatientService::new(store.clone()), &test_config());
    (app, store)
}

/// Send a request and return (status, raw body).
async fn request_raw(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(req).await.expect("Request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    (status, bytes.to_vec())
}

/// Send a request and return (status, body as JSON).
async fn request(app: &Router, req: Request<Body>) -> (StatusCode, JsonValue) {
    let (status, bytes) = request_raw(app, req).await;
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn with_json(method: &str, uri: &str, body: &JsonValue) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn post(uri: &str, body: &JsonValue) -> Request<Body> {
    with_json("POST", uri, body)
}

fn put(uri: &str, body: &JsonValue) -> Request<Body> {
    with_json("PUT", uri, body)
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn john_doe() -> JsonValue {
    json!({
        "firstName": "John",
        "lastName": "Doe",
        "dateOfBirth": "1990-01-01",
        "contactNumber": "1234567890",
        "emailAddress": "john.doe@gmail.com",
        "gender": "Male"
    })
}

/// Create a patient and return its id.
async fn create_patient(app: &Router, patient: &JsonValue) -> String {
    let (status, body) = request(app, post("/api/patients", patient)).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().expect("Missing id").to_string()
}

/// Payloads that each break exactly one field constraint.
fn invalid_payloads() -> Vec<(&'static str, JsonValue)> {
    let with = |field: &str, value: JsonValue| {
        let mut payload = john_doe();
        payload[field] = value;
        payload
    };
    let without = |field: &str| {
        let mut payload = john_doe();
        payload.as_object_mut().unwrap().remove(field);
        payload
    };

    vec![
        ("firstName", without("firstName")),
        ("firstName", with("firstName", json!("J"))),
        ("firstName", with("firstName", json!("x".repeat(51)))),
        ("lastName", with("lastName", json!("   "))),
        ("dateOfBirth", without("dateOfBirth")),
        ("dateOfBirth", with("dateOfBirth", json!("2999-01-01"))),
        ("contactNumber", with("contactNumber", json!("12345"))),
        ("contactNumber", with("contactNumber", json!("123-456-7890"))),
        ("emailAddress", with("emailAddress", json!("not-an-email"))),
        ("emailAddress", without("emailAddress")),
        ("gender", with("gender", json!("Unknown"))),
        ("gender", without("gender")),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_health_with_no_patients() {
    let (app, _) = test_app();

    let (status, body) = request_raw(&app, get("/api/patients/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "Patient Service is running. Total patients: 0"
    );
}

#[tokio::test]
async fn test_health_counts_patients() {
    let (app, _) = test_app();
    create_patient(&app, &john_doe()).await;
    create_patient(&app, &john_doe()).await;

    let (_, body) = request_raw(&app, get("/api/patients/health")).await;
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "Patient Service is running. Total patients: 2"
    );
}

#[tokio::test]
async fn test_crud_lifecycle() {
    let (app, _) = test_app();

    // 1. Create
    let (status, created) = request(&app, post("/api/patients", &john_doe())).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().expect("Missing id").to_string();
    assert!(!id.is_empty());

    // 2. Read
    let (status, body) = request(&app, get(&format!("/api/patients/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);
    let mut without_id = body.clone();
    without_id.as_object_mut().unwrap().remove("id");
    assert_eq!(without_id, john_doe());

    // 3. List
    let (status, body) = request(&app, get("/api/patients")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    // 4. Update
    let mut updated = john_doe();
    updated["lastName"] = json!("Updated");
    let (status, body) = request(&app, put(&format!("/api/patients/{}", id), &updated)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["lastName"], "Updated");

    // 5. Read after update
    let (_, body) = request(&app, get(&format!("/api/patients/{}", id))).await;
    assert_eq!(body["lastName"], "Updated");

    // 6. Delete
    let (status, body) = request_raw(&app, delete(&format!("/api/patients/{}", id))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    // 7. Read after delete -> 404
    let (status, body) = request(&app, get(&format!("/api/patients/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not-found");
}

#[tokio::test]
async fn test_create_sets_location_and_ignores_client_id() {
    let (app, _) = test_app();
    let mut payload = john_doe();
    payload["id"] = json!("client-chosen");

    let response = app
        .clone()
        .oneshot(post("/api/patients", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let location = response
        .headers()
        .get(header::LOCATION)
        .expect("Missing Location header")
        .to_str()
        .unwrap()
        .to_string();
    let id = location.rsplit('/').next().unwrap().to_string();
    assert_ne!(id, "client-chosen");

    let (status, _) = request(&app, get("/api/patients/client-chosen")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = request(&app, get(&location)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());
}

#[tokio::test]
async fn test_invalid_create_is_rejected_before_service() {
    let (app, store) = test_app();

    for (field, payload) in invalid_payloads() {
        let (status, body) = request(&app, post("/api/patients", &payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload breaking {field}");
        assert_eq!(body["kind"], "invalid");
        let fields: Vec<&str> = body["violations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["field"].as_str().unwrap())
            .collect();
        assert!(fields.iter().all(|f| *f == field), "{field}: {fields:?}");
    }

    assert_eq!(store.saves.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_invalid_update_is_rejected_before_service() {
    let (app, store) = test_app();
    let id = create_patient(&app, &john_doe()).await;

    for (field, payload) in invalid_payloads() {
        let (status, _) = request(&app, put(&format!("/api/patients/{}", id), &payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload breaking {field}");
    }

    assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    let (_, body) = request(&app, get(&format!("/api/patients/{}", id))).await;
    assert_eq!(body["lastName"], "Doe");
}

#[tokio::test]
async fn test_validation_reports_all_violations() {
    let (app, _) = test_app();

    let (status, body) = request(&app, post("/api/patients", &json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["violations"].as_array().unwrap().len(), 6);
    assert_eq!(body["violations"][0]["message"], "First name is required");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (app, store) = test_app();

    let req = Request::builder()
        .method("POST")
        .uri("/api/patients")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = request(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid");

    let mut bad_date = john_doe();
    bad_date["dateOfBirth"] = json!("01/01/1990");
    let (status, _) = request(&app, post("/api/patients", &bad_date)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(store.saves.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_update_absent_is_not_found() {
    let (app, store) = test_app();

    let (status, body) = request(&app, put("/api/patients/absent-id", &john_doe())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Patient not found with id: absent-id");
    assert_eq!(store.saves.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_update_path_id_overrides_body_id() {
    let (app, _) = test_app();
    let id = create_patient(&app, &john_doe()).await;

    let mut payload = john_doe();
    payload["id"] = json!("some-other-id");
    payload["firstName"] = json!("Johnny");
    let (status, body) = request(&app, put(&format!("/api/patients/{}", id), &payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());
    let (status, _) = request(&app, get("/api/patients/some-other-id")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_absent_is_not_found() {
    let (app, store) = test_app();

    let (status, _) = request(&app, delete("/api/patients/absent-id")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(store.deletes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_get_absent_is_not_found() {
    let (app, _) = test_app();
    let (status, body) = request(&app, get("/api/patients/absent-id")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not-found");
}

#[tokio::test]
async fn test_list_empty() {
    let (app, _) = test_app();
    let (status, body) = request(&app, get("/api/patients")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (app, _) = test_app();

    let req = Request::builder()
        .uri("/api/patients")
        .header("X-Request-ID", "trace-me")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.headers()["X-Request-ID"], "trace-me");

    let response = app.clone().oneshot(get("/api/patients")).await.unwrap();
    assert!(response.headers().contains_key("X-Request-ID"));
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _) = test_app();
    request(&app, get("/api/patients")).await;

    let (status, body) = request_raw(&app, get("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
    let body = String::from_utf8(body).unwrap();
    assert!(body.contains("http_requests_total"), "{body}");
}

#[tokio::test]
async fn test_invalid_update_of_absent_is_bad_request() {
    let (app, store) = test_app();

    let mut payload = john_doe();
    payload["contactNumber"] = json!("12");
    let (status, body) = request(&app, put("/api/patients/absent-id", &payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid");
    assert_eq!(store.saves.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_mutations_on_health_path_are_not_found() {
    let (app, store) = test_app();

    let (status, body) = request(&app, put("/api/patients/health", &john_doe())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Patient not found with id: health");

    let (status, body) = request(&app, delete("/api/patients/health")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Patient not found with id: health");

    assert_eq!(store.saves.load(Ordering::SeqCst), 0);
    assert_eq!(store.deletes.load(Ordering::SeqCst), 0);
}
