//! SMTP mailer
//!
//! Sends plain-text mail through lettre's async SMTP transport

use async_trait::async_trait;
use lettre::AsyncSmtpTransport;
use lettre::AsyncTransport;
use lettre::Message;
use lettre::Tokio1Executor;

use crate::utils::env_var_or_else;

use super::Error;
use super::Mailer;
use super::Result;

const DEFAULT_SMTP_HOST: &str = "localhost";
const DEFAULT_SMTP_PORT: &str = "25";
const DEFAULT_SMTP_FROM: &str = "postbox@example.com";

/// Mailer backed by an SMTP server
pub struct Smtp {
    /// Transport to the SMTP server
    transport: AsyncSmtpTransport<Tokio1Executor>,

    /// Sender address on outgoing mail
    from_address: String,
}

impl Smtp {
    /// Create an SMTP mailer
    ///
    /// Uses the `SMTP_HOST`, `SMTP_PORT` and `SMTP_FROM` environment
    /// variables, with defaults for a local relay
    pub fn from_environment() -> Self {
        let host = env_var_or_else("SMTP_HOST", || String::from(DEFAULT_SMTP_HOST));
        let port = env_var_or_else("SMTP_PORT", || String::from(DEFAULT_SMTP_PORT))
            .parse::<u16>()
            .expect("Valid SMTP_PORT");
        let from_address = env_var_or_else("SMTP_FROM", || String::from(DEFAULT_SMTP_FROM));

        // plain connection, no TLS, for local relays like Mailpit
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&host)
            .port(port)
            .build();

        Self {
            transport,
            from_address,
        }
    }
}

#[async_trait]
impl Mailer for Smtp {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|err| Error::Message(format!("Invalid sender address: {err}")))?,
            )
            .to(to
                .parse()
                .map_err(|err| Error::Message(format!("Invalid recipient address: {err}")))?)
            .subject(subject)
            .body(body.to_string())
            .map_err(|err| Error::Message(err.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|err| Error::Transport(err.to_string()))?;

        Ok(())
    }
}
