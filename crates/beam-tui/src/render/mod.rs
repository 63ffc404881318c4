//! Rendering and pointer hit-testing.
//!
//! Each draw records where the interactive regions landed in a [`HitMap`],
//! which the event loop consults to translate pointer coordinates back into
//! results, the toast, the notification indicator, and the history panel.

mod footer;
mod menu;
mod results;

pub use footer::render_footer;
pub use menu::render_menu_popup;
pub use results::render_search_ui;

use ratatui::layout::{Position, Rect};

/// One visual row of the result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowEntry {
    /// Category header, not selectable.
    Header,
    /// Index into the result list.
    Result(usize),
}

/// Screen regions recorded during the last draw.
#[derive(Debug, Default, Clone)]
pub struct HitMap {
    pub viewport: Rect,
    /// Inner area of the result list, borders excluded.
    pub results_inner: Rect,
    /// Visual rows in list order, headers included.
    pub rows: Vec<RowEntry>,
    /// First visual row currently scrolled into view.
    pub scroll_offset: usize,
    pub toast: Rect,
    pub indicator: Rect,
    pub footer: Rect,
    pub panel: Rect,
    pub panel_clear: Rect,
}

impl HitMap {
    pub fn hit(rect: Rect, column: u16, row: u16) -> bool {
        rect.contains(Position { x: column, y: row })
    }

    /// The result index under a pointer position, skipping header rows.
    pub fn result_at(&self, column: u16, row: u16) -> Option<usize> {
        if !Self::hit(self.results_inner, column, row) {
            return None;
        }
        let visual = self.scroll_offset + (row - self.results_inner.y) as usize;
        match self.rows.get(visual)? {
            RowEntry::Header => None,
            RowEntry::Result(index) => Some(*index),
        }
    }
}
