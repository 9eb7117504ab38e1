use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use patientdb::{
    MemoryGateway, RecordService,
    web::{AppState, build_router},
};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    let service = RecordService::new(Arc::new(MemoryGateway::new()));
    build_router(AppState::new(service))
}

async fn request_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("request should complete");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body should be JSON")
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("valid GET request")
}

fn with_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid JSON request")
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .expect("valid DELETE request")
}

fn patient(id: &str, weight: f64) -> Value {
    json!({
        "id": id,
        "name": "Alice",
        "city": "Pune",
        "age": 30,
        "gender": "female",
        "height": 1.6,
        "weight": weight
    })
}

#[tokio::test]
async fn test_basic_endpoints() {
    let app = app();

    let (status, body) = request_json(app.clone(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Patient Management API");

    let (status, body) = request_json(app.clone(), get("/about")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, body) = request_json(app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_crud_round_trip() {
    let app = app();

    let (status, body) =
        request_json(app.clone(), with_json("POST", "/patients", patient("P001", 50.0))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["patient_id"], "P001");
    assert_eq!(body["message"], "Patient created successfully");

    let (status, body) = request_json(app.clone(), get("/patients/P001")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bmi"], 19.53);
    assert_eq!(body["verdict"], "normal");

    let (status, body) = request_json(
        app.clone(),
        with_json("PUT", "/patients/P001", json!({ "weight": 80.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["patient_id"], "P001");

    let (_, body) = request_json(app.clone(), get("/patients/P001")).await;
    assert_eq!(body["bmi"], 31.25);
    assert_eq!(body["verdict"], "obese");

    let (status, _) = request_json(app.clone(), delete("/patients/P001")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = request_json(app, get("/patients/P001")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    assert_eq!(body["title"], "Not found");
    assert_eq!(body["type"], "https://patientdb.dev/problems/not-found");
}

#[tokio::test]
async fn test_duplicate_create_is_conflict() {
    let app = app();
    let (status, _) =
        request_json(app.clone(), with_json("POST", "/patients", patient("P001", 50.0))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) =
        request_json(app, with_json("POST", "/patients", patient("P001", 60.0))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["title"], "Conflict");
    assert_eq!(body["type"], "https://patientdb.dev/problems/conflict");
}

#[tokio::test]
async fn test_invalid_update_reports_violations_and_keeps_record() {
    let app = app();
    request_json(app.clone(), with_json("POST", "/patients", patient("P001", 50.0))).await;

    let (status, body) = request_json(
        app.clone(),
        with_json("PUT", "/patients/P001", json!({ "age": 200, "name": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<_> = body["violations"]
        .as_array()
        .expect("violations array")
        .iter()
        .map(|v| v["field"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(fields, vec!["age", "name"]);

    let (_, body) = request_json(app, get("/patients/P001")).await;
    assert_eq!(body["age"], 30);
    assert_eq!(body["name"], "Alice");
}

#[tokio::test]
async fn test_missing_patient_operations_are_not_found() {
    let app = app();

    let (status, _) = request_json(app.clone(), delete("/patients/P999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request_json(
        app,
        with_json("PUT", "/patients/P999", json!({ "weight": 70.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_is_keyed_by_id_in_store_order() {
    let app = app();
    for id in ["P003", "P001", "P002"] {
        request_json(app.clone(), with_json("POST", "/patients", patient(id, 55.0))).await;
    }

    let response = app
        .oneshot(get("/patients"))
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    let p3 = text.find("\"P003\":").unwrap();
    let p1 = text.find("\"P001\":").unwrap();
    let p2 = text.find("\"P002\":").unwrap();
    assert!(p3 < p1 && p1 < p2);
}

#[tokio::test]
async fn test_sort_endpoint() {
    let app = app();
    request_json(app.clone(), with_json("POST", "/patients", patient("P001", 80.0))).await;
    request_json(app.clone(), with_json("POST", "/patients", patient("P002", 50.0))).await;

    let (status, body) =
        request_json(app.clone(), get("/patients/sort/by?sort_by=bmi&order=desc")).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = body
        .as_array()
        .expect("sorted array")
        .iter()
        .map(|v| v["id"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(ids, vec!["P001", "P002"]);

    let (status, body) = request_json(app.clone(), get("/patients/sort/by?sort_by=weight")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], "P002");

    let (status, body) = request_json(app.clone(), get("/patients/sort/by")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_object());
    assert!(body.get("P001").is_some());

    let (status, body) = request_json(app.clone(), get("/patients/sort/by?sort_by=age")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["title"], "Bad request");
    assert_eq!(body["type"], "https://patientdb.dev/problems/bad-request");

    let (status, _) =
        request_json(app, get("/patients/sort/by?sort_by=bmi&order=sideways")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_with_invalid_fields_is_unprocessable() {
    let app = app();
    let mut body = patient("P001", 50.0);
    body["gender"] = json!("unknown");
    body["height"] = json!(0);

    let (status, problem) = request_json(app.clone(), with_json("POST", "/patients", body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(problem["title"], "Validation failed");
    assert_eq!(problem["type"], "https://patientdb.dev/problems/validation");

    let (_, listing) = request_json(app, get("/patients")).await;
    assert_eq!(listing, json!({}));
}
