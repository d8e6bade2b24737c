//! Per-user delivery preferences
//!
//! The lookup is a capability: the dispatcher only sees the trait. The
//! `Fixed` lookup stands in for a real preference store and enables every
//! user; the `Stored` lookup resolves preferences from storage.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::storage;
use crate::storage::Storage;
use crate::utils::env_var_or_else;

/// Contact address used by the fixed lookup when `CONTACT_ADDRESS` is not set
const DEFAULT_CONTACT_ADDRESS: &str = "notifications@example.com";

/// Delivery settings of a single user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationPreference {
    /// The user these settings belong to
    pub user_id: Uuid,

    /// Gate on sending, nothing is sent when false
    pub enabled: bool,

    /// Address mail is delivered to
    pub contact_info: String,
}

/// Preference lookup capability
#[async_trait]
pub trait PreferenceLookup: Send + Sync {
    /// Resolve the delivery preference of a user
    async fn preference(&self, user_id: &Uuid) -> storage::Result<NotificationPreference>;
}

/// Setup the preference lookup
///
/// `PREFERENCE_LOOKUP=stored` resolves preferences from storage, anything
/// else uses the fixed lookup
pub fn setup<S: Storage>(storage: &S) -> Arc<dyn PreferenceLookup> {
    let lookup = env_var_or_else("PREFERENCE_LOOKUP", || String::from("fixed"));

    if lookup == "stored" {
        Arc::new(Stored::new(storage.clone()))
    } else {
        let contact_info =
            env_var_or_else("CONTACT_ADDRESS", || String::from(DEFAULT_CONTACT_ADDRESS));

        Arc::new(Fixed::new(contact_info))
    }
}

/// Lookup that enables every user with a single contact address
#[derive(Clone, Debug)]
pub struct Fixed {
    /// Address returned for every user
    contact_info: String,
}

impl Fixed {
    /// Create a fixed lookup with the given contact address
    pub fn new(contact_info: String) -> Self {
        Self { contact_info }
    }
}

#[async_trait]
impl PreferenceLookup for Fixed {
    async fn preference(&self, user_id: &Uuid) -> storage::Result<NotificationPreference> {
        Ok(NotificationPreference {
            user_id: *user_id,
            enabled: true,
            contact_info: self.contact_info.clone(),
        })
    }
}

/// Lookup backed by the store
///
/// A user without a stored preference is treated as opted out
#[derive(Clone, Debug)]
pub struct Stored<S: Storage> {
    /// Store holding the preferences
    storage: S,
}

impl<S: Storage> Stored<S> {
    /// Create a store backed lookup
    pub fn new(storage: S) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl<S: Storage> PreferenceLookup for Stored<S> {
    async fn preference(&self, user_id: &Uuid) -> storage::Result<NotificationPreference> {
        let preference = self.storage.find_single_preference_by_user(user_id).await?;

        Ok(preference.unwrap_or_else(|| NotificationPreference {
            user_id: *user_id,
            enabled: false,
            contact_info: String::new(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::Memory;

    #[tokio::test]
    async fn test_fixed_enables_every_user() {
        let lookup = Fixed::new(String::from("inbox@example.com"));

        let user_id = Uuid::new_v4();
        let preference = lookup.preference(&user_id).await.unwrap();

        assert_eq!(user_id, preference.user_id);
        assert!(preference.enabled);
        assert_eq!("inbox@example.com", preference.contact_info);
    }

    #[tokio::test]
    async fn test_stored_unknown_user_is_opted_out() {
        let lookup = Stored::new(Memory::new());

        let preference = lookup.preference(&Uuid::new_v4()).await.unwrap();

        assert!(!preference.enabled);
    }

    #[tokio::test]
    async fn test_stored_resolves_saved_preference() {
        let storage = Memory::new();
        let lookup = Stored::new(storage.clone());

        let saved = NotificationPreference {
            user_id: Uuid::new_v4(),
            enabled: true,
            contact_info: String::from("someone@example.com"),
        };

        storage.save_preference(&saved).await.unwrap();

        let preference = lookup.preference(&saved.user_id).await.unwrap();

        assert_eq!(saved, preference);
    }
}
