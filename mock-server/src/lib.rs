use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Guard bytes the session endpoints put in front of their JSON.
pub const JSON_PREFIX: &[u8] = b")]}'\n";

/// Cookie set on login whose value must come back as a header on logout.
pub const XSRF_COOKIE: &str = "XSRF-TOKEN";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudentLocation {
    #[serde(default)]
    pub object_id: String,
    pub unique_key: String,
    pub first_name: String,
    pub last_name: String,
    pub map_string: String,
    #[serde(rename = "mediaURL")]
    pub media_url: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
}

#[derive(Default)]
pub struct Store {
    /// XSRF token → session id.
    sessions: HashMap<String, String>,
    students: Vec<StudentLocation>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/session", post(create_session).delete(delete_session))
        .route(
            "/classes/StudentLocation",
            get(list_students).post(create_student),
        )
        .route("/classes/StudentLocation/{id}", put(update_student))
        .route("/echo", any(echo))
        .route("/plain", get(plain))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// A JSON response with `JSON_PREFIX` in front of the body.
fn prefixed(status: StatusCode, body: &Value) -> Response {
    let mut bytes = JSON_PREFIX.to_vec();
    bytes.extend_from_slice(body.to_string().as_bytes());
    (status, [(header::CONTENT_TYPE, "application/json")], bytes).into_response()
}

async fn create_session(State(db): State<Db>, Json(input): Json<Credentials>) -> Response {
    if input.username.is_empty() || input.password.is_empty() {
        return prefixed(
            StatusCode::FORBIDDEN,
            &json!({"status": 403, "error": "Account not found or invalid credentials."}),
        );
    }

    let token = Uuid::new_v4().simple().to_string();
    let session_id = Uuid::new_v4().to_string();
    db.write()
        .await
        .sessions
        .insert(token.clone(), session_id.clone());
    tracing::debug!(user = %input.username, "session created");

    let body = json!({
        "account": {"registered": true, "key": input.username},
        "session": {"id": session_id},
    });
    (
        [(header::SET_COOKIE, format!("{XSRF_COOKIE}={token}; Path=/"))],
        prefixed(StatusCode::OK, &body),
    )
        .into_response()
}

async fn delete_session(State(db): State<Db>, headers: HeaderMap) -> Response {
    let token = headers.get(XSRF_COOKIE).and_then(|v| v.to_str().ok());
    let removed = match token {
        Some(token) => db.write().await.sessions.remove(token),
        None => None,
    };
    match removed {
        Some(id) => prefixed(StatusCode::OK, &json!({"session": {"id": id}})),
        None => prefixed(
            StatusCode::FORBIDDEN,
            &json!({"status": 403, "error": "Missing or invalid XSRF token."}),
        ),
    }
}

async fn list_students(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<Value> {
    let store = db.read().await;
    let results: Vec<&StudentLocation> = store
        .students
        .iter()
        .take(params.limit.unwrap_or(usize::MAX))
        .collect();
    Json(json!({ "results": results }))
}

async fn create_student(
    State(db): State<Db>,
    Json(mut input): Json<StudentLocation>,
) -> (StatusCode, Json<Value>) {
    let id = Uuid::new_v4().simple().to_string();
    input.object_id = id.clone();
    db.write().await.students.push(input);
    (StatusCode::CREATED, Json(json!({ "objectId": id })))
}

async fn update_student(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<StudentLocation>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut store = db.write().await;
    let student = store
        .students
        .iter_mut()
        .find(|s| s.object_id == id)
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(json!({"code": 101, "error": "object not found for update"})),
            )
        })?;
    *student = StudentLocation {
        object_id: id.clone(),
        ..input
    };
    Ok(Json(json!({ "objectId": id })))
}

/// Reflects the method and request headers back as JSON.
async fn echo(method: Method, headers: HeaderMap) -> Json<Value> {
    let headers: serde_json::Map<String, Value> = headers
        .iter()
        .filter_map(|(name, value)| {
            let value = value.to_str().ok()?;
            Some((name.as_str().to_string(), Value::String(value.to_string())))
        })
        .collect();
    Json(json!({ "method": method.as_str(), "headers": headers }))
}

async fn plain() -> &'static str {
    "this is not json"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> StudentLocation {
        StudentLocation {
            object_id: String::new(),
            unique_key: "1234".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            map_string: "London".to_string(),
            media_url: "https://example.com".to_string(),
            latitude: 51.5,
            longitude: -0.12,
        }
    }

    #[test]
    fn student_location_uses_api_field_names() {
        let json = serde_json::to_value(student()).unwrap();
        assert_eq!(json["uniqueKey"], "1234");
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["mediaURL"], "https://example.com");
        assert_eq!(json["latitude"], 51.5);
    }

    #[test]
    fn student_location_object_id_defaults_to_empty() {
        let input: StudentLocation = serde_json::from_str(
            r#"{"uniqueKey":"1","firstName":"A","lastName":"B","mapString":"C",
                "mediaURL":"D","latitude":1.0,"longitude":2.0}"#,
        )
        .unwrap();
        assert!(input.object_id.is_empty());
    }

    #[test]
    fn student_location_rejects_missing_coordinates() {
        let result: Result<StudentLocation, _> =
            serde_json::from_str(r#"{"uniqueKey":"1","firstName":"A"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn prefixed_body_starts_with_guard_bytes() {
        let resp = prefixed(StatusCode::OK, &json!({}));
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "application/json"
        );
    }

    #[test]
    fn credentials_require_both_fields() {
        let result: Result<Credentials, _> = serde_json::from_str(r#"{"username":"a"}"#);
        assert!(result.is_err());
    }
}
