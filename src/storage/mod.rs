//! All things related to the storage of notifications and preferences

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::notifications::Notification;
use crate::notifications::NotificationStatus;
use crate::notifications::NotificationType;
use crate::preferences::NotificationPreference;

#[cfg(not(feature = "postgres"))]
use memory::Memory;
#[cfg(feature = "postgres")]
use postgres::Postgres;

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

/// Setup the storage
#[cfg(not(feature = "postgres"))]
#[allow(clippy::unused_async)]
pub async fn setup() -> Memory {
    Memory::new()
}

/// Setup the storage
#[cfg(feature = "postgres")]
pub async fn setup() -> Postgres {
    Postgres::new().await
}

/// Storage errors
#[derive(Debug, Error)]
#[allow(dead_code)]
pub enum Error {
    /// A connection error with the storage
    #[error("Connection error: {0}")]
    Connection(String),
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Values to create a Notification
///
/// The store assigns the ID and the creation timestamp
pub struct CreateNotificationValues<'a> {
    /// The addressed user
    pub user_id: &'a Uuid,

    /// Subject line, copied verbatim from the request
    pub subject: &'a str,

    /// Message body, copied verbatim from the request
    pub body: &'a str,

    /// Delivery channel
    pub kind: NotificationType,

    /// Outcome of the send attempt
    pub status: NotificationStatus,
}

/// Storage with all supported operations
#[async_trait]
pub trait Storage: Clone + Send + Sync + 'static {
    /// Create a single notification
    async fn create_notification(&self, values: &CreateNotificationValues)
    -> Result<Notification>;

    /// Find all notifications, in store order
    ///
    /// Respects the soft-delete
    async fn find_all_notifications(&self) -> Result<Vec<Notification>>;

    /// Find all notifications of a user, in store order
    ///
    /// Respects the soft-delete
    async fn find_all_notifications_by_user(&self, user_id: &Uuid) -> Result<Vec<Notification>>;

    /// Soft-delete all notifications of a user
    ///
    /// A single bulk update, skipping records that are already deleted;
    /// returns the number of records touched
    async fn delete_all_notifications_by_user(&self, user_id: &Uuid) -> Result<u64>;

    /// Find the delivery preference of a user
    async fn find_single_preference_by_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Option<NotificationPreference>>;

    /// Create or replace the delivery preference of a user
    async fn save_preference(
        &self,
        preference: &NotificationPreference,
    ) -> Result<NotificationPreference>;
}
