// libs/appointment-cell/tests/handlers_test.rs

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use appointment_cell::appointment_routes;
use appointment_cell::services::AppointmentBookingService;
use shared_utils::test_utils::{Fixtures, TestConfig};

fn create_app(config: &TestConfig) -> Router {
    let service = AppointmentBookingService::from_config(&config.to_app_config());
    appointment_routes(Arc::new(service))
}

async fn send(app: Router, method: &str, uri: &str, body: Option<String>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.map(Body::from).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_create_then_list() {
    let config = TestConfig::with_default_roster().unwrap();
    let body = Fixtures::appointment(1, 7, "2024-06-01", "10:00");

    let (status, created) = send(
        create_app(&config),
        "POST",
        "/appointments/7/",
        Some(body.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created, body);

    let (status, listed) = send(create_app(&config), "GET", "/appointments/7/2024-06-01/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([body]));
}

#[tokio::test]
async fn test_empty_day_lists_as_empty_array() {
    let config = TestConfig::with_default_roster().unwrap();

    let (status, listed) = send(create_app(&config), "GET", "/appointments/7/2024-06-01/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_routes_without_trailing_slash() {
    let config = TestConfig::with_default_roster().unwrap();
    let body = Fixtures::appointment(1, 7, "2024-06-01", "10:00");

    let (status, _) = send(create_app(&config), "POST", "/appointments/7", Some(body.to_string())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, listed) = send(create_app(&config), "GET", "/appointments/7/2024-06-01", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_list_rejects_bad_date() {
    let config = TestConfig::with_default_roster().unwrap();

    let (status, body) = send(create_app(&config), "GET", "/appointments/7/2024-02-30/", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Incorrect date format, needs to be YYYY-MM-DD");
}

#[tokio::test]
async fn test_list_rejects_unknown_doctor() {
    let config = TestConfig::with_default_roster().unwrap();

    let (status, body) = send(create_app(&config), "GET", "/appointments/42/2024-06-01/", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Doctor 42 does not exist");
}

#[tokio::test]
async fn test_create_rejects_non_json_body() {
    let config = TestConfig::with_default_roster().unwrap();

    let (status, body) = send(
        create_app(&config),
        "POST",
        "/appointments/7/",
        Some("not json".to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid appointment data format"));
}

#[tokio::test]
async fn test_create_rejects_wrong_field_type() {
    let config = TestConfig::with_default_roster().unwrap();
    let mut body = Fixtures::appointment(1, 7, "2024-06-01", "10:00");
    body["new_patient"] = json!("yes");

    let (status, _) = send(create_app(&config), "POST", "/appointments/7/", Some(body.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!config.appointments_path().exists());
}

#[tokio::test]
async fn test_create_rejects_off_quarter_time() {
    let config = TestConfig::with_default_roster().unwrap();
    let body = Fixtures::appointment(1, 7, "2024-06-01", "10:20");

    let (status, response) = send(create_app(&config), "POST", "/appointments/7/", Some(body.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["error"].as_str().unwrap().starts_with("Invalid time or time format"));
}

#[tokio::test]
async fn test_create_rejects_full_slot() {
    let config = TestConfig::with_default_roster().unwrap();
    config
        .write_appointments(&Fixtures::full_slot(1, 3, 7, "2024-06-01", "10:00"))
        .unwrap();
    let body = Fixtures::appointment(4, 7, "2024-06-01", "10:00");

    let (status, response) = send(create_app(&config), "POST", "/appointments/7/", Some(body.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "Doctor has too many appointments at this time 10:00");
}

#[tokio::test]
async fn test_create_rejects_duplicate_id_with_conflict() {
    let config = TestConfig::with_default_roster().unwrap();
    config
        .write_appointments(&json!([Fixtures::appointment(1, 2, "2024-01-01", "08:00")]))
        .unwrap();
    let body = Fixtures::appointment(1, 7, "2024-06-01", "10:00");

    let (status, _) = send(create_app(&config), "POST", "/appointments/7/", Some(body.to_string())).await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_appointment() {
    let config = TestConfig::with_default_roster().unwrap();
    config
        .write_appointments(&json!([
            Fixtures::appointment(1, 7, "2024-06-01", "10:00"),
            Fixtures::appointment(2, 7, "2024-06-01", "10:15")
        ]))
        .unwrap();

    let (status, body) = send(create_app(&config), "DELETE", "/appointments/7/?appointment_id=1", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["appointment"]["id"], 1);
    assert_eq!(
        body["message"],
        "Appointment for Sterling Archer on 2024-06-01 has been deleted."
    );
    assert_eq!(
        config.read_appointments().unwrap(),
        json!([Fixtures::appointment(2, 7, "2024-06-01", "10:15")])
    );
}

#[tokio::test]
async fn test_delete_unknown_appointment_is_not_found() {
    let config = TestConfig::with_default_roster().unwrap();
    let seeded = json!([Fixtures::appointment(1, 7, "2024-06-01", "10:00")]);
    config.write_appointments(&seeded).unwrap();

    let (status, _) = send(create_app(&config), "DELETE", "/appointments/7/?appointment_id=9", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(config.read_appointments().unwrap(), seeded);
}

#[tokio::test]
async fn test_delete_requires_appointment_id() {
    let config = TestConfig::with_default_roster().unwrap();

    let (status, body) = send(create_app(&config), "DELETE", "/appointments/7/", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing appointment_id parameter");

    let (status, _) = send(create_app(&config), "DELETE", "/appointments/7/?appointment_id=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_for_unknown_doctor() {
    let config = TestConfig::with_default_roster().unwrap();

    let (status, body) = send(create_app(&config), "DELETE", "/appointments/3/?appointment_id=1", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Doctor 3 does not exist");
}

#[tokio::test]
async fn test_non_integer_doctor_id_is_json_not_found() {
    let config = TestConfig::with_default_roster().unwrap();
    let body = Fixtures::appointment(1, 7, "2024-06-01", "10:00");

    let (status, listed) = send(create_app(&config), "GET", "/appointments/abc/2024-06-01/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(listed["error"].is_string());

    let (status, created) = send(create_app(&config), "POST", "/appointments/abc/", Some(body.to_string())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(created["error"].is_string());

    let (status, deleted) = send(create_app(&config), "DELETE", "/appointments/7.5/?appointment_id=1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(deleted["error"].is_string());
    assert!(!config.appointments_path().exists());
}

#[tokio::test]
async fn test_storage_failure_hides_file_details() {
    let config = TestConfig::with_default_roster().unwrap();
    std::fs::write(config.appointments_path(), "[{broken").unwrap();

    let (status, body) = send(create_app(&config), "GET", "/appointments/7/2024-06-01/", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert_eq!(message, "Internal storage error");
    assert!(!message.contains(config.dir.path().to_str().unwrap()));
    assert!(!message.contains("appointments.json"));
}

#[tokio::test]
async fn test_record_without_new_patient_still_lists_and_deletes() {
    let config = TestConfig::with_default_roster().unwrap();
    let mut legacy = Fixtures::appointment(1, 7, "2024-06-01", "10:00");
    legacy.as_object_mut().unwrap().remove("new_patient");
    let other = Fixtures::appointment(2, 2, "2024-06-01", "10:00");
    config.write_appointments(&json!([legacy, other])).unwrap();

    let (status, listed) = send(create_app(&config), "GET", "/appointments/7/2024-06-01/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["id"], 1);
    assert_eq!(listed[0]["new_patient"], false);

    let (status, _) = send(create_app(&config), "GET", "/appointments/2/2024-06-01/", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(create_app(&config), "DELETE", "/appointments/7/?appointment_id=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(config.read_appointments().unwrap(), json!([other]));
}
