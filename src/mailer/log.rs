//! Log-only mailer
//!
//! Logs the message and drops it, for runs without an SMTP server

use async_trait::async_trait;

use super::Mailer;
use super::Result;

/// Mailer that only logs
#[derive(Clone, Debug)]
pub struct Log;

#[async_trait]
impl Mailer for Log {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> Result<()> {
        tracing::info!(r#"Dropping mail to {to} with subject "{subject}""#);

        Ok(())
    }
}
