use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub mod mailer;

pub use mailer::{Mailer, NullMailer, SmtpMailer};

/// One queued notification message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
    pub recipient: String,
}

impl Notification {
    pub fn course_updated(course_title: &str, recipient: String) -> Self {
        Self {
            subject: format!("Course {} updated", course_title),
            body: format!(
                "The course {} has been updated, check the site",
                course_title
            ),
            recipient,
        }
    }
}

/// Producer side of the notification queue. Enqueueing hands the message to
/// the queue and returns; it never blocks on delivery.
pub trait NotificationQueue: Send + Sync {
    fn enqueue(&self, notification: Notification);
}

/// Queue backed by an unbounded channel and a single worker task that drains
/// it into a mailer. A failed delivery is logged and skipped so one bad
/// address cannot stall the rest of the queue.
pub struct MailQueue {
    tx: mpsc::UnboundedSender<Notification>,
    worker: JoinHandle<()>,
}

impl MailQueue {
    pub fn start(mailer: Arc<dyn Mailer>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Notification>();

        let worker = tokio::spawn(async move {
            while let Some(notification) = rx.recv().await {
                match mailer.send(&notification).await {
                    Ok(_) => {
                        tracing::debug!(
                            "Delivered notification to {}",
                            notification.recipient
                        );
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to deliver notification to {}: {:?}",
                            notification.recipient,
                            e
                        );
                    }
                }
            }
        });

        Self { tx, worker }
    }

    /// Stops accepting new messages and waits for the worker to drain
    /// everything already queued.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.worker.await {
            tracing::error!("Notification worker panicked: {:?}", e);
        }
    }
}

impl NotificationQueue for MailQueue {
    fn enqueue(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            tracing::error!("Notification queue is closed; message dropped");
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod recording {
    use std::sync::Mutex;

    use super::{Notification, NotificationQueue};

    /// Captures enqueued notifications so tests can assert on them.
    #[derive(Default)]
    pub struct RecordingQueue {
        messages: Mutex<Vec<Notification>>,
    }

    impl RecordingQueue {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn messages(&self) -> Vec<Notification> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl NotificationQueue for RecordingQueue {
        fn enqueue(&self, notification: Notification) {
            self.messages.lock().unwrap().push(notification);
        }
    }
}
