use std::io::{self, BufRead, Write};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{
    routes::Route,
    ui::{Confirmer, Navigator, Notification, NotificationLevel, Notifier},
};

/// Prints notifications to the terminal. They count as dismissed once
/// printed.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn show(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => println!("✔ {}", notification.message),
            NotificationLevel::Error => eprintln!("✘ {}", notification.message),
        }
    }
}

/// Keeps the navigation history of a terminal session.
#[derive(Debug, Default)]
pub struct ConsoleNavigator {
    history: Mutex<Vec<Route>>,
}

impl ConsoleNavigator {
    pub fn new(start: Route) -> Self {
        ConsoleNavigator {
            history: Mutex::new(vec![start]),
        }
    }

    pub fn current(&self) -> Option<Route> {
        self.history.lock().last().copied()
    }
}

impl Navigator for ConsoleNavigator {
    fn push(&self, route: Route) {
        tracing::debug!(%route, "navigate");
        self.history.lock().push(route);
    }

    fn back(&self) {
        let mut history = self.history.lock();
        history.pop();
        tracing::debug!(current = ?history.last(), "navigate back");
    }
}

/// Asks on stdin unless every prompt is pre-approved.
#[derive(Debug, Default)]
pub struct ConsoleConfirmer {
    assume_yes: bool,
}

impl ConsoleConfirmer {
    pub fn new(assume_yes: bool) -> Self {
        ConsoleConfirmer { assume_yes }
    }
}

#[async_trait]
impl Confirmer for ConsoleConfirmer {
    async fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        let prompt = prompt.to_string();
        tokio::task::spawn_blocking(move || {
            print!("{} [y/N] ", prompt);
            io::stdout().flush().ok();
            let mut answer = String::new();
            io::stdin().lock().read_line(&mut answer).ok();
            matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
        })
        .await
        .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_pops_history() {
        let navigator = ConsoleNavigator::new(Route::default());
        navigator.push(Route::Create);
        assert_eq!(navigator.current(), Some(Route::Create));
        navigator.back();
        assert_eq!(navigator.current(), Some(Route::default()));
    }

    #[tokio::test]
    async fn assume_yes_skips_the_prompt() {
        assert!(ConsoleConfirmer::new(true).confirm("저장 하시겠습니까?").await);
    }
}
