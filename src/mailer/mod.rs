//! All things related to sending mail
//!
//! The transport is a capability with a single send operation: it either
//! delivers the message or fails, there is no retry.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::utils::env_var_or_else;

use log::Log;
use smtp::Smtp;

pub mod log;
pub mod smtp;

/// Mailer errors
#[derive(Debug, Error)]
pub enum Error {
    /// The message could not be built or addressed
    #[error("Invalid message: {0}")]
    Message(String),

    /// The transport failed to deliver the message
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Result type for all mailer interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Mail transport with a single send operation
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a plain-text message to a single recipient
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// Setup the mailer
///
/// `MAILER=log` selects the log-only mailer for runs without an SMTP server
pub fn setup() -> Arc<dyn Mailer> {
    let mailer = env_var_or_else("MAILER", || String::from("smtp"));

    if mailer == "log" {
        Arc::new(Log)
    } else {
        Arc::new(Smtp::from_environment())
    }
}
