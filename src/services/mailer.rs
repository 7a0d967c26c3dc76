use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

/// Notification payloads sent out of the admission workflow.
///
/// Secrets carried here (generated passwords, reset tokens) must never
/// be logged by a mailer implementation.
#[derive(Clone)]
pub enum OutboundEmail {
    AccountCreated {
        to: String,
        display_name: String,
        generated_password: String,
    },
    RegistrationDecision {
        to: String,
        child_name: String,
        approved: bool,
    },
    PasswordReset {
        to: String,
        reset_token: String,
    },
}

impl OutboundEmail {
    pub fn recipient(&self) -> &str {
        match self {
            OutboundEmail::AccountCreated { to, .. } => to,
            OutboundEmail::RegistrationDecision { to, .. } => to,
            OutboundEmail::PasswordReset { to, .. } => to,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            OutboundEmail::AccountCreated { .. } => "account_created",
            OutboundEmail::RegistrationDecision { .. } => "registration_decision",
            OutboundEmail::PasswordReset { .. } => "password_reset",
        }
    }
}

#[derive(Error, Debug)]
pub enum MailerError {
    #[error("failed to deliver email: {0}")]
    Delivery(String),
}

/// Outbound email delivery. Implementations are swappable so tests can
/// record what would have been sent.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailerError>;
}

/// Mailer that only records delivery metadata in the log stream.
/// Used when no SMTP transport is configured.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailerError> {
        info!(
            kind = email.kind(),
            recipient = email.recipient(),
            "Outbound email (log-only delivery)"
        );
        Ok(())
    }
}

/// Deliver an email without letting delivery failures propagate.
/// Notification delivery never decides the outcome of the operation
/// that triggered it.
pub async fn send_best_effort(mailer: &dyn Mailer, email: OutboundEmail) {
    let kind = email.kind();
    let recipient = email.recipient().to_string();
    if let Err(e) = mailer.send(email).await {
        warn!(
            kind = kind,
            recipient = %recipient,
            error = %e,
            "Failed to deliver notification email"
        );
    }
}
