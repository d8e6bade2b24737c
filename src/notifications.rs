use std::fmt;

use chrono::naive::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// A record of one attempted send
///
/// The status is fixed by the single send attempt that created the record;
/// only the `deleted` flag changes afterwards.
#[derive(Clone, Debug)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject: String,
    pub body: String,
    pub created_on: NaiveDateTime,
    pub kind: NotificationType,
    pub status: NotificationStatus,
    pub deleted: bool,
}

/// Delivery channel of a notification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    Email,
}

/// Outcome of the send attempt that created a notification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationStatus {
    /// Not yet attempted, never produced by the current dispatcher
    Pending,

    /// The mail transport accepted the message
    Succeeded,

    /// The mail transport failed, recorded once, not retried
    Failed,
}

impl fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "PENDING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
        })
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Email => "EMAIL",
        })
    }
}
