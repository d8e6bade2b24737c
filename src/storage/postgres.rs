//! Postgres storage

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::notifications::Notification;
use crate::notifications::NotificationStatus;
use crate::notifications::NotificationType;
use crate::preferences::NotificationPreference;

use super::CreateNotificationValues;
use super::Error;
use super::Result;
use super::Storage;

/// Migrator to run migrations on startup
static MIGRATOR: Migrator = sqlx::migrate!();

/// Postgres type for notification status
#[derive(PartialEq, Debug, sqlx::Type)]
#[sqlx(type_name = "notification_status_type")]
#[sqlx(rename_all = "kebab-case")]
enum NotificationStatusType {
    /// Not yet attempted
    Pending,

    /// Accepted by the mail transport
    Succeeded,

    /// Refused by the mail transport
    Failed,
}

impl NotificationStatusType {
    /// Create status type from status
    fn from_status(status: NotificationStatus) -> Self {
        match status {
            NotificationStatus::Pending => Self::Pending,
            NotificationStatus::Succeeded => Self::Succeeded,
            NotificationStatus::Failed => Self::Failed,
        }
    }

    /// Create status from status type
    fn to_status(&self) -> NotificationStatus {
        match self {
            Self::Pending => NotificationStatus::Pending,
            Self::Succeeded => NotificationStatus::Succeeded,
            Self::Failed => NotificationStatus::Failed,
        }
    }
}

/// Postgres type for notification channel
#[derive(PartialEq, Debug, sqlx::Type)]
#[sqlx(type_name = "notification_kind_type")]
#[sqlx(rename_all = "kebab-case")]
enum NotificationKindType {
    /// E-mail
    Email,
}

impl NotificationKindType {
    /// Create kind type from kind
    fn from_kind(kind: NotificationType) -> Self {
        match kind {
            NotificationType::Email => Self::Email,
        }
    }

    /// Create kind from kind type
    fn to_kind(&self) -> NotificationType {
        match self {
            Self::Email => NotificationType::Email,
        }
    }
}

/// Postgres storage
#[derive(Clone)]
pub struct Postgres {
    /// Pool of connections
    connection_pool: PgPool,
}

impl Postgres {
    /// Create Postgres storage
    ///
    /// Use the `DATABASE_URL` environment variable
    ///
    /// Migrations will be run
    pub async fn new() -> Self {
        let database_connection_string = std::env::var("DATABASE_URL").expect("Valid DATABASE_URL");

        let connection_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_connection_string)
            .await
            .expect("Valid connection");

        Self::new_with_pool(connection_pool).await
    }

    /// Create Postgres storage with existing pool
    ///
    /// Migrations will be run
    pub async fn new_with_pool(connection_pool: PgPool) -> Self {
        let migration_result = MIGRATOR.run(&connection_pool).await;

        if let Err(err) = migration_result {
            panic!("Migrations could not run: {err}");
        }

        Self { connection_pool }
    }
}

/// Postgres version of a notification
#[derive(sqlx::FromRow)]
struct PostgresNotification {
    /// Notification ID
    id: Uuid,

    /// The addressed user
    user_id: Uuid,

    /// Subject line
    subject: String,

    /// Message body
    body: String,

    /// Creation date
    created_on: NaiveDateTime,

    /// Delivery channel
    kind: NotificationKindType,

    /// Outcome of the send attempt
    status: NotificationStatusType,

    /// Soft-delete flag
    deleted: bool,
}

impl Notification {
    /// Create notification from postgres version
    fn from_postgres_notification(notification: PostgresNotification) -> Self {
        Self {
            id: notification.id,
            user_id: notification.user_id,
            subject: notification.subject,
            body: notification.body,
            created_on: notification.created_on,
            kind: notification.kind.to_kind(),
            status: notification.status.to_status(),
            deleted: notification.deleted,
        }
    }

    /// Create multiple notifications from postgres version
    fn from_postgres_notification_multiple(
        mut notifications: Vec<PostgresNotification>,
    ) -> Vec<Self> {
        notifications
            .drain(..)
            .map(Self::from_postgres_notification)
            .collect::<Vec<Self>>()
    }
}

/// Postgres version of a preference
#[derive(sqlx::FromRow)]
struct PostgresPreference {
    /// The user these settings belong to
    user_id: Uuid,

    /// Gate on sending
    enabled: bool,

    /// Address mail is delivered to
    contact_info: String,
}

impl NotificationPreference {
    /// Create preference from postgres version
    fn from_postgres_preference(preference: PostgresPreference) -> Self {
        Self {
            user_id: preference.user_id,
            enabled: preference.enabled,
            contact_info: preference.contact_info,
        }
    }
}

#[async_trait]
impl Storage for Postgres {
    async fn create_notification(
        &self,
        values: &CreateNotificationValues,
    ) -> Result<Notification> {
        let notification = sqlx::query_as::<_, PostgresNotification>(
            r"
            INSERT INTO notifications (id, user_id, subject, body, created_on, kind, status, deleted)
            VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE)
            RETURNING id, user_id, subject, body, created_on, kind, status, deleted
            ",
        )
        .bind(Uuid::new_v4())
        .bind(values.user_id)
        .bind(values.subject)
        .bind(values.body)
        .bind(Utc::now().naive_utc())
        .bind(NotificationKindType::from_kind(values.kind))
        .bind(NotificationStatusType::from_status(values.status))
        .fetch_one(&self.connection_pool)
        .await
        .map(Notification::from_postgres_notification)
        .map_err(connection_error)?;

        Ok(notification)
    }

    async fn find_all_notifications(&self) -> Result<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, PostgresNotification>(
            r"
            SELECT id, user_id, subject, body, created_on, kind, status, deleted
            FROM notifications
            WHERE deleted = FALSE
            ORDER BY created_on
            ",
        )
        .fetch_all(&self.connection_pool)
        .await
        .map(Notification::from_postgres_notification_multiple)
        .map_err(connection_error)?;

        Ok(notifications)
    }

    async fn find_all_notifications_by_user(&self, user_id: &Uuid) -> Result<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, PostgresNotification>(
            r"
            SELECT id, user_id, subject, body, created_on, kind, status, deleted
            FROM notifications
            WHERE deleted = FALSE
                AND user_id = $1
            ORDER BY created_on
            ",
        )
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await
        .map(Notification::from_postgres_notification_multiple)
        .map_err(connection_error)?;

        Ok(notifications)
    }

    async fn delete_all_notifications_by_user(&self, user_id: &Uuid) -> Result<u64> {
        // one statement, the store makes the bulk update atomic
        let result = sqlx::query(
            r"
            UPDATE notifications
            SET deleted = TRUE
            WHERE deleted = FALSE
                AND user_id = $1
            ",
        )
        .bind(user_id)
        .execute(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(result.rows_affected())
    }

    async fn find_single_preference_by_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Option<NotificationPreference>> {
        let preference = sqlx::query_as::<_, PostgresPreference>(
            r"
            SELECT user_id, enabled, contact_info
            FROM notification_preferences
            WHERE user_id = $1
            LIMIT 1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(preference.map(NotificationPreference::from_postgres_preference))
    }

    async fn save_preference(
        &self,
        preference: &NotificationPreference,
    ) -> Result<NotificationPreference> {
        let preference = sqlx::query_as::<_, PostgresPreference>(
            r"
            INSERT INTO notification_preferences (user_id, enabled, contact_info)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE
            SET enabled = EXCLUDED.enabled,
                contact_info = EXCLUDED.contact_info
            RETURNING user_id, enabled, contact_info
            ",
        )
        .bind(preference.user_id)
        .bind(preference.enabled)
        .bind(&preference.contact_info)
        .fetch_one(&self.connection_pool)
        .await
        .map(NotificationPreference::from_postgres_preference)
        .map_err(connection_error)?;

        Ok(preference)
    }
}

/// Create a connection error from a sqlx error
fn connection_error(err: sqlx::Error) -> Error {
    Error::Connection(err.to_string())
}
