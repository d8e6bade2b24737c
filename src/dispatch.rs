//! Notification dispatch
//!
//! Orchestrates the preference check, the mail-send attempt and the
//! recording of the outcome.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::mailer::Mailer;
use crate::notifications::Notification;
use crate::notifications::NotificationStatus;
use crate::notifications::NotificationType;
use crate::preferences::PreferenceLookup;
use crate::storage;
use crate::storage::CreateNotificationValues;
use crate::storage::Storage;

/// Dispatch errors
#[derive(Debug, Error)]
pub enum Error {
    /// The user has opted out of notifications
    #[error("User with id {user_id} does not allow to receive notifications.")]
    PreferenceDisabled {
        /// The user that opted out
        user_id: Uuid,
    },

    /// The store failed
    #[error(transparent)]
    Storage(#[from] storage::Error),
}

/// Result type for all dispatch interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Notification dispatch service
///
/// Constructed once at startup, cheap to clone into the HTTP layer
#[derive(Clone)]
pub struct Dispatcher<S: Storage> {
    /// Store of notification records
    storage: S,

    /// Mail transport
    mailer: Arc<dyn Mailer>,

    /// Per-user preference lookup
    preferences: Arc<dyn PreferenceLookup>,
}

impl<S: Storage> Dispatcher<S> {
    /// Create a dispatcher
    pub fn new(storage: S, mailer: Arc<dyn Mailer>, preferences: Arc<dyn PreferenceLookup>) -> Self {
        Self {
            storage,
            mailer,
            preferences,
        }
    }

    /// Send a notification and record its outcome
    ///
    /// An opted-out user is an error and leaves no trace; a mail transport
    /// failure is not, it is recorded as `Failed` on the stored record
    pub async fn send_notification(
        &self,
        user_id: &Uuid,
        subject: &str,
        body: &str,
    ) -> Result<Notification> {
        let preference = self.preferences.preference(user_id).await?;

        if !preference.enabled {
            return Err(Error::PreferenceDisabled { user_id: *user_id });
        }

        let status = match self
            .mailer
            .send(&preference.contact_info, subject, body)
            .await
        {
            Ok(()) => NotificationStatus::Succeeded,
            Err(err) => {
                tracing::warn!(
                    "There was an issue sending an email to {}: {err}",
                    preference.contact_info
                );

                NotificationStatus::Failed
            }
        };

        let values = CreateNotificationValues {
            user_id,
            subject,
            body,
            kind: NotificationType::Email,
            status,
        };

        Ok(self.storage.create_notification(&values).await?)
    }

    /// List all non-deleted notifications, in store order
    pub async fn list_all_statuses(&self) -> Result<Vec<Notification>> {
        Ok(self.storage.find_all_notifications().await?)
    }

    /// List the non-deleted notifications of a user, in store order
    pub async fn list_for_user(&self, user_id: &Uuid) -> Result<Vec<Notification>> {
        Ok(self
            .storage
            .find_all_notifications_by_user(user_id)
            .await?)
    }

    /// Soft-delete all notifications of a user
    ///
    /// One bulk update in the store, idempotent
    pub async fn clear(&self, user_id: &Uuid) -> Result<()> {
        let deleted = self
            .storage
            .delete_all_notifications_by_user(user_id)
            .await?;

        tracing::debug!("Cleared {deleted} notifications of user {user_id}");

        Ok(())
    }
}
