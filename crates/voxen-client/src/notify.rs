//! The notification surface.
//!
//! Panes push dismissable notices here; the rendering shell subscribes and
//! shows them as toasts. Failures never escalate past a notice — the UI
//! stays interactive after any error.

use tokio::sync::broadcast;

use voxen_gateway::GatewayError;

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// One dismissable notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub detail: String,
}

/// Broadcast handle for notices.
#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notice>,
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }

    pub fn info(&self, title: &str, detail: impl Into<String>) {
        self.send(Severity::Info, title, detail.into());
    }

    pub fn error(&self, title: &str, detail: impl Into<String>) {
        self.send(Severity::Error, title, detail.into());
    }

    fn send(&self, severity: Severity, title: &str, detail: String) {
        // With no subscribers the notice is simply dropped.
        let _ = self.tx.send(Notice {
            severity,
            title: title.to_string(),
            detail,
        });
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Failure boundary for gateway calls: log, surface one generic notice,
/// hand back the error untouched.
pub(crate) fn surface(notices: &Notifier, title: &str, err: GatewayError) -> ClientError {
    tracing::error!(error = %err, title, "gateway call failed");
    notices.error(title, "Please try again");
    ClientError::Gateway(err)
}

/// Failure boundary for validation: no network call has happened and none
/// will; the notice carries the specific reason.
pub(crate) fn reject(notices: &Notifier, title: &str, detail: impl Into<String>) -> ClientError {
    let detail = detail.into();
    tracing::warn!(title, detail, "input rejected");
    notices.error(title, detail.clone());
    ClientError::Validation(detail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_notices() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();

        notifier.error("Upload failed", "Please try again");

        let notice = rx.recv().await.unwrap();
        assert_eq!(notice.severity, Severity::Error);
        assert_eq!(notice.title, "Upload failed");
    }

    #[test]
    fn notices_without_subscribers_are_dropped() {
        let notifier = Notifier::new();
        notifier.info("Theme saved!", "Your custom theme has been applied");
    }
}
