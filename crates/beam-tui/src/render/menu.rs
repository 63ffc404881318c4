//! Context menu overlay.

use ratatui::{
    Frame,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::App;
use crate::colors;

/// Draw the context menu over whatever is underneath it, if open.
pub fn render_menu_popup(f: &mut Frame, app: &App) {
    let Some(menu) = app.menu.state() else {
        return;
    };

    // Placement was clamped at open time; only intersect against resize.
    let area = menu.area.intersection(f.area());
    if area.is_empty() {
        return;
    }

    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Actions ")
        .style(Style::default().bg(colors::SURFACE_HIGH))
        .border_style(Style::default().fg(colors::PRIMARY));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines: Vec<Line> = menu
        .actions
        .iter()
        .map(|action| {
            Line::from(vec![
                Span::styled(
                    format!(" {} ", action.icon),
                    Style::default().fg(colors::PRIMARY),
                ),
                Span::styled(&action.label, Style::default().fg(colors::ON_SURFACE)),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}
