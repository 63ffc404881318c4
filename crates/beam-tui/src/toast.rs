//! Single-slot toast with a hover-pausable dismiss timer.

use tokio::time::{Duration, Instant};

/// How long a toast stays up without pointer interaction.
pub const TOAST_DISMISS: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastMessage {
    pub message: String,
    pub detail: String,
}

/// At most one toast is visible at a time; showing a new one replaces the
/// current one and restarts the timer. Hovering the toast suspends the timer;
/// moving off restarts the full interval rather than resuming the remainder.
#[derive(Debug, Default)]
pub struct Toast {
    current: Option<ToastMessage>,
    hovered: bool,
    deadline: Option<Instant>,
}

impl Toast {
    pub fn show(&mut self, message: impl Into<String>, detail: impl Into<String>) {
        self.current = Some(ToastMessage {
            message: message.into(),
            detail: detail.into(),
        });
        // A replacement toast starts fresh even if the pointer was parked on
        // the old one.
        self.hovered = false;
        self.deadline = Some(Instant::now() + TOAST_DISMISS);
    }

    pub fn visible(&self) -> Option<&ToastMessage> {
        self.current.as_ref()
    }

    /// When the current toast should be dismissed. `None` while hovered or
    /// when nothing is showing.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Track pointer position relative to the toast. Only transitions have an
    /// effect, so this is safe to call on every pointer event.
    pub fn set_hovered(&mut self, hovered: bool) {
        if self.hovered == hovered {
            return;
        }
        self.hovered = hovered;
        if hovered {
            self.deadline = None;
        } else if self.current.is_some() {
            self.deadline = Some(Instant::now() + TOAST_DISMISS);
        }
    }

    /// Dismiss the toast once its deadline has fired.
    pub fn dismiss_due(&mut self) {
        if self.hovered {
            return;
        }
        self.current = None;
        self.deadline = None;
    }
}
