use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, JSON_PREFIX, XSRF_COOKIE};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Decode a session-style body after checking and dropping its guard prefix.
async fn prefixed_json(response: axum::response::Response) -> Value {
    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(JSON_PREFIX), "missing guard prefix");
    serde_json::from_slice(&bytes[JSON_PREFIX.len()..]).unwrap()
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

fn student_body(first_name: &str) -> String {
    json!({
        "uniqueKey": "1234",
        "firstName": first_name,
        "lastName": "Lovelace",
        "mapString": "London",
        "mediaURL": "https://example.com",
        "latitude": 51.5,
        "longitude": -0.12,
    })
    .to_string()
}

// --- session ---

#[tokio::test]
async fn create_session_sets_cookie_and_prefixes_body() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/session",
            r#"{"username":"ada","password":"secret"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp.headers()[http::header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with(&format!("{XSRF_COOKIE}=")));

    let body = prefixed_json(resp).await;
    assert_eq!(body["account"]["registered"], true);
    assert_eq!(body["account"]["key"], "ada");
    assert!(body["session"]["id"].is_string());
}

#[tokio::test]
async fn create_session_empty_password_is_forbidden() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/session",
            r#"{"username":"ada","password":""}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = prefixed_json(resp).await;
    assert_eq!(body["status"], 403);
}

#[tokio::test]
async fn delete_session_without_token_is_forbidden() {
    let resp = app().oneshot(empty_request("DELETE", "/session")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = prefixed_json(resp).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn session_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/session",
            r#"{"username":"ada","password":"secret"}"#,
        ))
        .await
        .unwrap();
    let cookie = resp.headers()[http::header::SET_COOKIE].to_str().unwrap().to_string();
    let token = cookie
        .split(';')
        .next()
        .and_then(|pair| pair.split_once('='))
        .map(|(_, v)| v.to_string())
        .unwrap();
    let created = prefixed_json(resp).await;

    // logout with the token echoed back in a header named after the cookie
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri("/session")
                .header(XSRF_COOKIE, &token)
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let deleted = prefixed_json(resp).await;
    assert_eq!(deleted["session"]["id"], created["session"]["id"]);

    // the token is single-use
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri("/session")
                .header(XSRF_COOKIE, &token)
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// --- student locations ---

#[tokio::test]
async fn list_students_empty() {
    let resp = app()
        .oneshot(empty_request("GET", "/classes/StudentLocation"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"results": []}));
}

#[tokio::test]
async fn create_student_returns_201_with_object_id() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/classes/StudentLocation",
            &student_body("Ada"),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert!(!body["objectId"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn create_student_missing_fields_returns_422() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/classes/StudentLocation",
            r#"{"firstName":"Ada"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn update_unknown_student_returns_404_json() {
    let resp = app()
        .oneshot(json_request(
            "PUT",
            "/classes/StudentLocation/missing",
            &student_body("Ada"),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["code"], 101);
}

#[tokio::test]
async fn student_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create two
    let mut ids = Vec::new();
    for name in ["Ada", "Grace"] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request(
                "POST",
                "/classes/StudentLocation",
                &student_body(name),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        ids.push(body["objectId"].as_str().unwrap().to_string());
    }

    // list with limit
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/classes/StudentLocation?limit=1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 1);

    // update the first
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/classes/StudentLocation/{}", ids[0]),
            &student_body("Augusta"),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["objectId"], ids[0].as_str());

    // full list reflects the update and keeps the id
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/classes/StudentLocation"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["firstName"], "Augusta");
    assert_eq!(results[0]["objectId"], ids[0].as_str());
    assert_eq!(results[1]["firstName"], "Grace");
}

// --- diagnostics ---

#[tokio::test]
async fn echo_reflects_method_and_headers() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/echo")
                .header("X-Parse-Application-Id", "app")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["method"], "PUT");
    assert_eq!(body["headers"]["x-parse-application-id"], "app");
}

#[tokio::test]
async fn plain_is_not_json() {
    let resp = app().oneshot(empty_request("GET", "/plain")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    assert!(serde_json::from_slice::<Value>(&bytes).is_err());
}
