//! Notification history for backend status pushes.

use std::collections::VecDeque;

use beam_rpc::IndexState;

/// Oldest entries are dropped beyond this.
pub const HISTORY_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEntry {
    pub icon: String,
    pub message: String,
    pub state: IndexState,
    /// Wall-clock receipt time, `%H:%M:%S`.
    pub time: String,
}

/// Ring of recent notifications, newest first, plus the hover panel flag.
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: VecDeque<NotificationEntry>,
    panel_open: bool,
}

impl NotificationLog {
    pub fn record(&mut self, message: &str, state: IndexState) {
        let entry = NotificationEntry {
            icon: icon_for(&state).to_string(),
            message: message.to_string(),
            state,
            time: chrono::Local::now().format("%H:%M:%S").to_string(),
        };
        self.entries.push_front(entry);
        self.entries.truncate(HISTORY_LIMIT);
    }

    /// Empty the history. An open panel stays open showing its placeholder.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Newest first.
    pub fn entries(&self) -> impl Iterator<Item = &NotificationEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&NotificationEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    /// Hovering the indicator opens the panel, but only when there is
    /// something to show.
    pub fn open_on_hover(&mut self) {
        if !self.entries.is_empty() {
            self.panel_open = true;
        }
    }

    pub fn toggle_panel(&mut self) {
        self.panel_open = !self.panel_open;
    }

    pub fn close_panel(&mut self) {
        self.panel_open = false;
    }
}

/// Fixed glyph per indexing state; unrecognized states get no glyph.
pub fn icon_for(state: &IndexState) -> &'static str {
    match state {
        IndexState::Checking => "◌",
        IndexState::Indexing => "⟳",
        IndexState::Ready => "✓",
        IndexState::Idle => "·",
        IndexState::Unknown(_) => "",
    }
}
