//! Where failures that belong to nobody's state get reported.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStyle {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub style: NotificationStyle,
    pub title: String,
    pub message: Option<String>,
}

impl Notification {
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            style: NotificationStyle::Success,
            title: title.into(),
            message: None,
        }
    }

    pub fn failure(title: impl Into<String>) -> Self {
        Self {
            style: NotificationStyle::Failure,
            title: title.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_failure(&self) -> bool {
        self.style == NotificationStyle::Failure
    }
}

pub trait Notifier {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log. Used when no UI is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let message = notification.message.as_deref().unwrap_or_default();
        match notification.style {
            NotificationStyle::Success => {
                tracing::info!("{}: {message}", notification.title)
            }
            NotificationStyle::Failure => {
                tracing::error!("{}: {message}", notification.title)
            }
        }
    }
}
