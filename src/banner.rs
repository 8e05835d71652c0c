use std::time::Duration;
use tokio::time::Instant;

/// Transient error message. Visible until `visible_for` has passed since the
/// most recent failure; a new failure restarts the window.
#[derive(Debug, Clone)]
pub struct ErrorBanner {
    visible_for: Duration,
    message: Option<String>,
    raised_at: Option<Instant>,
}

impl ErrorBanner {
    pub fn new(visible_for: Duration) -> Self {
        Self {
            visible_for,
            message: None,
            raised_at: None,
        }
    }

    pub fn raise(&mut self, message: impl Into<String>) {
        self.raise_at(message, Instant::now());
    }

    pub fn raise_at(&mut self, message: impl Into<String>, now: Instant) {
        self.message = Some(message.into());
        self.raised_at = Some(now);
    }

    /// Last message raised, even after it has been hidden.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible_at(Instant::now())
    }

    pub fn is_visible_at(&self, now: Instant) -> bool {
        self.raised_at
            .is_some_and(|at| now.saturating_duration_since(at) < self.visible_for)
    }

    /// Message to render right now, if any.
    pub fn visible_message(&self) -> Option<&str> {
        if self.is_visible() {
            self.message()
        } else {
            None
        }
    }
}
