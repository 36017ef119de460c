//! Ports through which the views talk to whatever renders them.

pub mod console;

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::{routes::Route, settings::AppConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A transient message, closed automatically after `auto_close`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub auto_close: Duration,
}

impl Notification {
    pub fn success(message: impl Into<String>, auto_close: Duration) -> Self {
        Notification {
            level: NotificationLevel::Success,
            message: message.into(),
            auto_close,
        }
    }

    pub fn error(message: impl Into<String>, auto_close: Duration) -> Self {
        Notification {
            level: NotificationLevel::Error,
            message: message.into(),
            auto_close,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Shows `notification`; resolves once it has been dismissed.
    async fn show(&self, notification: Notification);
}

#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn push(&self, route: Route);
    fn back(&self);
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Timings the views need from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewTimings {
    pub success_toast: Duration,
    pub error_toast: Duration,
    pub long_press_threshold: Duration,
}

impl From<&AppConfig> for ViewTimings {
    fn from(config: &AppConfig) -> Self {
        ViewTimings {
            success_toast: config.success_toast(),
            error_toast: config.error_toast(),
            long_press_threshold: config.long_press_threshold(),
        }
    }
}

/// Everything a view needs besides the repository.
#[derive(Clone)]
pub struct ViewContext {
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
    pub confirmer: Arc<dyn Confirmer>,
    pub timings: ViewTimings,
}

impl ViewContext {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        confirmer: Arc<dyn Confirmer>,
        timings: ViewTimings,
    ) -> Self {
        ViewContext {
            notifier,
            navigator,
            confirmer,
            timings,
        }
    }

    pub async fn notify_success(&self, message: &str) {
        self.notifier
            .show(Notification::success(message, self.timings.success_toast))
            .await;
    }

    pub async fn notify_error(&self, message: &str) {
        self.notifier
            .show(Notification::error(message, self.timings.error_toast))
            .await;
    }
}

impl std::fmt::Debug for ViewContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewContext")
            .field("timings", &self.timings)
            .finish_non_exhaustive()
    }
}
