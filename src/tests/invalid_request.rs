use axum::http::StatusCode;

use crate::tests::helper;

#[tokio::test]
async fn test_missing_data() {
    let mut app = helper::setup_test_app();

    let body = r"{}";
    let (status_code, body) = helper::notify_with_raw_body(&mut app, body, true).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);

    let error = helper::get_error(&body);
    assert_eq!(400, error.status);
    assert!(error.message.starts_with("Data error"));
}

#[tokio::test]
async fn test_json_syntax_error() {
    let mut app = helper::setup_test_app();

    let body = r#"{"}"#;
    let (status_code, body) = helper::notify_with_raw_body(&mut app, body, true).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);

    let error = helper::get_error(&body);
    assert_eq!(400, error.status);
    assert!(error.message.starts_with("JSON syntax error"));
}

#[tokio::test]
async fn test_missing_content_type() {
    let mut app = helper::setup_test_app();

    let body = r"{}";
    let (status_code, body) = helper::notify_with_raw_body(&mut app, body, false).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);

    let error = helper::get_error(&body);
    assert_eq!(400, error.status);
    assert_eq!("Missing `application/json` content type", error.message);
}

#[tokio::test]
async fn test_malformed_user_id() {
    let mut app = helper::setup_test_app();

    let body = r#"{"userId":"banana","subject":"Hi","body":"Hello"}"#;
    let (status_code, body) = helper::notify_with_raw_body(&mut app, body, true).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);

    let error = helper::get_error(&body);
    assert_eq!(400, error.status);
    assert!(error.message.starts_with("Data error"));
}
