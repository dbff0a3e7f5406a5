use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::error::{AppError, Result};

use super::Notification;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<()>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailer {
    pub fn from_config(config: &SmtpConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        let host = config.host.as_deref()?;
        let from_address = config.from_address.clone()?;

        let mut builder = match AsyncSmtpTransport::<Tokio1Executor>::relay(host) {
            Ok(builder) => builder,
            Err(e) => {
                tracing::warn!("Invalid SMTP relay {}: {}", host, e);
                return None;
            }
        };

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Some(Self {
            transport: builder.build(),
            from_address,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, notification: &Notification) -> Result<()> {
        let email = Message::builder()
            .from(self.from_address.parse().map_err(|e| {
                AppError::Internal(format!("Invalid from address: {:?}", e))
            })?)
            .to(notification.recipient.parse().map_err(|e| {
                AppError::Internal(format!("Invalid recipient address: {:?}", e))
            })?)
            .subject(&notification.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body.clone())
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| AppError::Internal(format!("SMTP send failed: {}", e)))?;

        Ok(())
    }
}

/// Stand-in used when SMTP is not configured: logs instead of sending.
pub struct NullMailer;

#[async_trait]
impl Mailer for NullMailer {
    async fn send(&self, notification: &Notification) -> Result<()> {
        tracing::info!(
            "Email delivery disabled; would send {:?} to {}",
            notification.subject,
            notification.recipient
        );
        Ok(())
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod recording {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::error::Result;
    use crate::notifications::Notification;

    use super::Mailer;

    /// Records every delivered notification so tests can inspect what the
    /// queue worker actually sent.
    #[derive(Default)]
    pub struct RecordingMailer {
        sent: Mutex<Vec<Notification>>,
    }

    impl RecordingMailer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn sent(&self) -> Vec<Notification> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, notification: &Notification) -> Result<()> {
            self.sent.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }
}
