use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Created, Existing, Mutation, NOT_FOUND_BODY, OVERFLOW_BODY};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- create ---

#[tokio::test]
async fn create_counter_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/ns/k", r#"{"current_value":5}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Created = body_json(resp).await;
    assert!(!created.already_exists);
    assert_eq!(created.key, "k");
    assert_eq!(created.namespace, "ns");
    assert_eq!(created.current_value, 5);
}

#[tokio::test]
async fn create_counter_without_body_starts_at_zero() {
    let resp = app().oneshot(empty_request("POST", "/ns/k")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Created = body_json(resp).await;
    assert_eq!(created.current_value, 0);
}

#[tokio::test]
async fn create_counter_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/ns/k", r#"{"current_value":"five"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- get ---

#[tokio::test]
async fn get_missing_counter_reports_absent() {
    let resp = app().oneshot(empty_request("GET", "/ns/nope")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body, serde_json::json!({ "exists": false }));
}

// --- mutations ---

#[tokio::test]
async fn increment_missing_counter_returns_404() {
    let resp = app()
        .oneshot(empty_request("POST", "/ns/nope/increment"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_bytes(resp).await, NOT_FOUND_BODY.as_bytes());
}

#[tokio::test]
async fn update_missing_counter_returns_404() {
    let resp = app()
        .oneshot(json_request("POST", "/ns/nope/update", r#"{"current_value":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn increment_at_max_returns_400_and_keeps_value() {
    use tower::Service;

    let mut app = app().into_service();

    let body = format!(r#"{{"current_value":{}}}"#, i64::MAX);
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/ns/k", &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("POST", "/ns/k/increment"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_bytes(resp).await, OVERFLOW_BODY.as_bytes());

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/ns/k"))
        .await
        .unwrap();
    let existing: Existing = body_json(resp).await;
    assert_eq!(existing.current_value, i64::MAX);
}

#[tokio::test]
async fn decrement_at_min_returns_400() {
    use tower::Service;

    let mut app = app().into_service();

    let body = format!(r#"{{"current_value":{}}}"#, i64::MIN);
    ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/ns/k", &body))
        .await
        .unwrap();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("POST", "/ns/k/decrement"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_bytes(resp).await, OVERFLOW_BODY.as_bytes());
}

// --- full lifecycle ---

#[tokio::test]
async fn counter_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/ns/k", r#"{"current_value":2}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    // create again — reports the existing value, ignores the new one
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/ns/k", r#"{"current_value":100}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Created = body_json(resp).await;
    assert!(created.already_exists);
    assert_eq!(created.current_value, 2);

    // increment
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("POST", "/ns/k/increment"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let inc: Mutation = body_json(resp).await;
    assert_eq!((inc.previous_value, inc.current_value), (2, 3));
    assert!(inc.success);

    // update
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/ns/k/update", r#"{"current_value":-4}"#))
        .await
        .unwrap();
    let set: Mutation = body_json(resp).await;
    assert_eq!((set.previous_value, set.current_value), (3, -4));

    // decrement
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("POST", "/ns/k/decrement"))
        .await
        .unwrap();
    let dec: Mutation = body_json(resp).await;
    assert_eq!((dec.previous_value, dec.current_value), (-4, -5));

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/ns/k"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let existing: Existing = body_json(resp).await;
    assert!(existing.exists);
    assert_eq!(existing.current_value, -5);

    // same key in another namespace is independent
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/other/k"))
        .await
        .unwrap();
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["exists"], false);
}
