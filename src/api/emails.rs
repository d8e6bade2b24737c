use axum::Extension;
use axum::Json;
use axum::http::StatusCode;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::dispatch;
use crate::dispatch::Dispatcher;
use crate::notifications::Notification;
use crate::notifications::NotificationStatus;
use crate::notifications::NotificationType;
use crate::storage::Storage;

use super::Error;
use super::Form;
use super::QueryParameters;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    user_id: Uuid,
    subject: String,
    body: String,
}

/// Projection of a notification for the status listing
///
/// The message body is deliberately left out
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub user_id: Uuid,
    pub subject: String,
    pub created_on: NaiveDateTime,
    pub status: NotificationStatus,
    #[serde(rename = "type")]
    pub kind: NotificationType,
}

impl NotificationResponse {
    fn from_notification(notification: Notification) -> Self {
        Self {
            user_id: notification.user_id,
            subject: notification.subject,
            created_on: notification.created_on,
            status: notification.status,
            kind: notification.kind,
        }
    }

    fn from_notification_multiple(mut notifications: Vec<Notification>) -> Vec<Self> {
        notifications
            .drain(..)
            .map(Self::from_notification)
            .collect::<Vec<Self>>()
    }
}

pub async fn notify<S: Storage>(
    Extension(dispatcher): Extension<Dispatcher<S>>,
    Form(request): Form<NotificationRequest>,
) -> Result<String, Error> {
    let notification = dispatcher
        .send_notification(&request.user_id, &request.subject, &request.body)
        .await
        .map_err(dispatch_error)?;

    Ok(format!("Notification status: {}", notification.status))
}

pub async fn status<S: Storage>(
    Extension(dispatcher): Extension<Dispatcher<S>>,
) -> Result<Json<Vec<NotificationResponse>>, Error> {
    let notifications = dispatcher
        .list_all_statuses()
        .await
        .map_err(dispatch_error)?;

    Ok(Json(NotificationResponse::from_notification_multiple(
        notifications,
    )))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearParameters {
    user_id: Uuid,
}

pub async fn clear<S: Storage>(
    Extension(dispatcher): Extension<Dispatcher<S>>,
    QueryParameters(parameters): QueryParameters<ClearParameters>,
) -> Result<StatusCode, Error> {
    dispatcher
        .clear(&parameters.user_id)
        .await
        .map_err(dispatch_error)?;

    Ok(StatusCode::OK)
}

fn dispatch_error(err: dispatch::Error) -> Error {
    match err {
        dispatch::Error::PreferenceDisabled { .. } => Error::bad_request(err),
        dispatch::Error::Storage(err) => Error::internal_server_error(err),
    }
}
