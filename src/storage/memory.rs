//! Memory storage
//!
//! Will be destroyed on system shutdown

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::notifications::Notification;
use crate::preferences::NotificationPreference;

use super::CreateNotificationValues;
use super::Result;
use super::Storage;

/// An in-memory storage
///
/// Will be destroyed on system shutdown
#[derive(Clone, Debug)]
pub struct Memory {
    /// All notifications in storage, in insertion order
    notifications: Arc<Mutex<Vec<Notification>>>,

    /// All preferences in storage, keyed by user
    preferences: Arc<Mutex<HashMap<Uuid, NotificationPreference>>>,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self {
            notifications: Arc::new(Mutex::new(Vec::new())),
            preferences: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl Storage for Memory {
    async fn create_notification(
        &self,
        values: &CreateNotificationValues,
    ) -> Result<Notification> {
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id: *values.user_id,
            subject: values.subject.to_string(),
            body: values.body.to_string(),
            created_on: Utc::now().naive_utc(),
            kind: values.kind,
            status: values.status,
            deleted: false,
        };

        self.notifications.lock().await.push(notification.clone());

        Ok(notification)
    }

    async fn find_all_notifications(&self) -> Result<Vec<Notification>> {
        Ok(self
            .notifications
            .lock()
            .await
            .iter()
            .filter(|notification| !notification.deleted)
            .cloned()
            .collect())
    }

    async fn find_all_notifications_by_user(&self, user_id: &Uuid) -> Result<Vec<Notification>> {
        Ok(self
            .notifications
            .lock()
            .await
            .iter()
            .filter(|notification| &notification.user_id == user_id && !notification.deleted)
            .cloned()
            .collect())
    }

    async fn delete_all_notifications_by_user(&self, user_id: &Uuid) -> Result<u64> {
        let mut deleted = 0;

        // single pass under the lock, the bulk update is atomic
        for notification in self.notifications.lock().await.iter_mut() {
            if &notification.user_id == user_id && !notification.deleted {
                notification.deleted = true;
                deleted += 1;
            }
        }

        Ok(deleted)
    }

    async fn find_single_preference_by_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Option<NotificationPreference>> {
        Ok(self.preferences.lock().await.get(user_id).cloned())
    }

    async fn save_preference(
        &self,
        preference: &NotificationPreference,
    ) -> Result<NotificationPreference> {
        self.preferences
            .lock()
            .await
            .insert(preference.user_id, preference.clone());

        Ok(preference.clone())
    }
}
