use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::Method;
use axum::http::Request;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use http_body_util::BodyExt;
use serde_json::Map;
use serde_json::Value;
use tower::Service;
use uuid::Uuid;

use crate::create_router;
use crate::dispatch::Dispatcher;
use crate::mailer;
use crate::mailer::Mailer;
use crate::preferences::Fixed;
use crate::preferences::Stored;
use crate::storage::memory::Memory;

/// Contact address every test notification is delivered to
pub const TEST_CONTACT: &str = "inbox@example.com";

/// Test helper version of the status projection
#[derive(Debug, PartialEq, Eq)]
pub struct Status {
    pub user_id: Uuid,
    pub subject: String,
    pub status: String,
    pub kind: String,
    pub created_on: String,
}

/// Error envelope
#[derive(Debug, PartialEq, Eq)]
pub struct Error {
    pub status: u64,
    pub message: String,
}

/// Mailer that records recipients, optionally failing every send
pub struct TestMailer {
    fail: bool,
    recipients: Mutex<Vec<String>>,
}

impl TestMailer {
    pub fn recipients(&self) -> Vec<String> {
        self.recipients.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for TestMailer {
    async fn send(&self, to: &str, _subject: &str, _body: &str) -> mailer::Result<()> {
        if self.fail {
            return Err(mailer::Error::Transport(String::from("mail error")));
        }

        self.recipients.lock().unwrap().push(to.to_string());

        Ok(())
    }
}

/// Setup the Postbox app with a mailer that accepts everything
pub fn setup_test_app() -> Router {
    setup_test_app_with_mailer(false).0
}

/// Setup the Postbox app with a recording mailer
pub fn setup_test_app_with_mailer(fail: bool) -> (Router, Arc<TestMailer>) {
    let mailer = Arc::new(TestMailer {
        fail,
        recipients: Mutex::new(Vec::new()),
    });

    let dispatcher = Dispatcher::new(
        Memory::new(),
        mailer.clone(),
        Arc::new(Fixed::new(String::from(TEST_CONTACT))),
    );

    (create_router(dispatcher), mailer)
}

/// Setup the Postbox app with a store backed preference lookup
///
/// The store holds no preferences, so every user counts as opted out
pub fn setup_test_app_opted_out() -> (Router, Arc<TestMailer>) {
    let mailer = Arc::new(TestMailer {
        fail: false,
        recipients: Mutex::new(Vec::new()),
    });

    let storage = Memory::new();
    let dispatcher = Dispatcher::new(
        storage.clone(),
        mailer.clone(),
        Arc::new(Stored::new(storage)),
    );

    (create_router(dispatcher), mailer)
}

pub async fn notify(
    app: &mut Router,
    user_id: &Uuid,
    subject: &str,
    body: &str,
) -> (StatusCode, String) {
    let mut payload = Map::new();
    payload.insert(
        "userId".to_string(),
        Value::String(user_id.to_string()),
    );
    payload.insert("subject".to_string(), Value::String(subject.to_string()));
    payload.insert("body".to_string(), Value::String(body.to_string()));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/emails/notifyAdvanced")
        .header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();

    call(app, request).await
}

pub async fn notify_with_raw_body(
    app: &mut Router,
    body: &'static str,
    include_content_type: bool,
) -> (StatusCode, String) {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/emails/notifyAdvanced");

    if include_content_type {
        builder = builder.header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
    }

    let request = builder.body(Body::from(body.as_bytes())).unwrap();

    call(app, request).await
}

pub async fn status(app: &mut Router) -> (StatusCode, Vec<Status>, String) {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/emails/status")
        .body(Body::empty())
        .unwrap();

    let (status_code, body) = call(app, request).await;

    let statuses = if status_code == StatusCode::OK {
        get_statuses(&body)
    } else {
        Vec::new()
    };

    (status_code, statuses, body)
}

pub async fn clear(app: &mut Router, user_id: &Uuid) -> (StatusCode, String) {
    clear_with_query(app, &format!("?userId={user_id}")).await
}

pub async fn clear_with_query(app: &mut Router, query: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/api/emails{query}"))
        .body(Body::empty())
        .unwrap();

    call(app, request).await
}

pub async fn request(app: &mut Router, method: Method, path: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .unwrap();

    call(app, request).await
}

async fn call(app: &mut Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.call(request).await.unwrap();

    let status_code = response.status();

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body = String::from_utf8_lossy(&body[..]).to_string();

    (status_code, body)
}

fn value_to_status(status: &Map<String, Value>) -> Status {
    Status {
        user_id: status["userId"]
            .as_str()
            .map(Uuid::parse_str)
            .unwrap()
            .unwrap(),
        subject: status["subject"].as_str().map(ToString::to_string).unwrap(),
        status: status["status"].as_str().map(ToString::to_string).unwrap(),
        kind: status["type"].as_str().map(ToString::to_string).unwrap(),
        created_on: status["createdOn"]
            .as_str()
            .map(ToString::to_string)
            .unwrap(),
    }
}

fn get_statuses(body: &str) -> Vec<Status> {
    serde_json::from_str::<Value>(body)
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|status| status.as_object().unwrap())
        .map(value_to_status)
        .collect()
}

pub fn get_error(body: &str) -> Error {
    let value = serde_json::from_str::<Value>(body).unwrap();

    Error {
        status: value["status"].as_u64().unwrap(),
        message: value["message"].as_str().map(ToString::to_string).unwrap(),
    }
}
