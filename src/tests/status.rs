use axum::http::StatusCode;
use uuid::Uuid;

use crate::tests::helper;

#[tokio::test]
async fn test_status_empty() {
    let mut app = helper::setup_test_app();

    let (status_code, statuses, raw) = helper::status(&mut app).await;
    assert_eq!(StatusCode::OK, status_code);
    assert!(statuses.is_empty());
    assert_eq!("[]", raw);
}

#[tokio::test]
async fn test_status_keeps_store_order() {
    let mut app = helper::setup_test_app();

    let user_one = Uuid::new_v4();
    let user_two = Uuid::new_v4();

    helper::notify(&mut app, &user_one, "first", "body").await;
    helper::notify(&mut app, &user_two, "second", "body").await;
    helper::notify(&mut app, &user_one, "third", "body").await;

    let (status_code, statuses, _) = helper::status(&mut app).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(3, statuses.len());

    assert_eq!("first", statuses[0].subject);
    assert_eq!("second", statuses[1].subject);
    assert_eq!("third", statuses[2].subject);

    assert_eq!(user_one, statuses[0].user_id);
    assert_eq!(user_two, statuses[1].user_id);
    assert_eq!(user_one, statuses[2].user_id);
}
