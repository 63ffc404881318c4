//! Footer bar: toast slot, notification indicator, and the history panel.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::App;
use crate::colors;
use crate::notify::HISTORY_LIMIT;

const PANEL_WIDTH: u16 = 44;
const PANEL_VISIBLE_ROWS: usize = 10;

/// Render the footer into `area` and any floating panel above it.
#[allow(clippy::cast_possible_truncation)] // Panel rows bounded by HISTORY_LIMIT
pub fn render_footer(f: &mut Frame, app: &mut App, area: Rect) {
    let footer_block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(colors::SURFACE))
        .border_style(Style::default().fg(colors::OUTLINE));
    let inner = footer_block.inner(area);
    f.render_widget(footer_block, area);

    app.hit.footer = area;

    let indicator_text = app.notifications.latest().map_or_else(
        || " 🔔 ".to_string(),
        |entry| format!(" {} {} ", entry.icon, entry.message),
    );
    let indicator_width = indicator_text.chars().count() as u16;

    let sections = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Min(0), Constraint::Length(indicator_width)])
        .split(inner);

    if let Some(toast) = app.toast.visible() {
        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", toast.message),
                Style::default()
                    .fg(colors::SUCCESS)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(&toast.detail, Style::default().fg(colors::SUBTEXT)),
        ]);
        f.render_widget(Paragraph::new(line), sections[0]);
        app.hit.toast = sections[0];
    } else {
        let line = Line::from(vec![
            Span::styled(
                " Beam ",
                Style::default()
                    .fg(colors::PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("search anything", Style::default().fg(colors::OUTLINE)),
        ]);
        f.render_widget(Paragraph::new(line), sections[0]);
        app.hit.toast = Rect::default();
    }

    let indicator = Paragraph::new(Span::styled(
        indicator_text,
        Style::default().fg(colors::SUBTEXT),
    ));
    f.render_widget(indicator, sections[1]);
    app.hit.indicator = sections[1];

    if app.notifications.panel_open() {
        render_history_panel(f, app, area);
    } else {
        app.hit.panel = Rect::default();
        app.hit.panel_clear = Rect::default();
    }
}

/// Floating history panel anchored above the footer's right edge.
#[allow(clippy::cast_possible_truncation)] // Panel rows bounded by HISTORY_LIMIT
fn render_history_panel(f: &mut Frame, app: &mut App, footer: Rect) {
    debug_assert!(app.notifications.len() <= HISTORY_LIMIT);

    // At least one row so an empty history still shows its placeholder.
    let rows = app.notifications.len().clamp(1, PANEL_VISIBLE_ROWS) as u16;
    // Borders plus the trailing clear row.
    let height = rows + 3;
    let width = PANEL_WIDTH.min(app.hit.viewport.width);
    let x = footer.right().saturating_sub(width);
    let y = footer.y.saturating_sub(height);
    let panel = Rect::new(x, y, width, height);

    f.render_widget(Clear, panel);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Notifications ")
        .style(Style::default().bg(colors::SURFACE_HIGH))
        .border_style(Style::default().fg(colors::OUTLINE));
    let inner = block.inner(panel);
    f.render_widget(block, panel);

    let mut lines: Vec<Line> = if app.notifications.is_empty() {
        vec![Line::from(Span::styled(
            "No notifications",
            Style::default().fg(colors::SUBTEXT),
        ))
        .centered()]
    } else {
        app.notifications
            .entries()
            .take(PANEL_VISIBLE_ROWS)
            .map(|entry| {
                Line::from(vec![
                    Span::styled(
                        format!(" {} ", entry.icon),
                        Style::default().fg(colors::PRIMARY),
                    ),
                    Span::styled(&entry.message, Style::default().fg(colors::ON_SURFACE)),
                    Span::raw(" "),
                    Span::styled(&entry.time, Style::default().fg(colors::OUTLINE)),
                ])
            })
            .collect()
    };
    lines.push(Line::from(Span::styled(
        "clear",
        Style::default().fg(colors::WARNING),
    ))
    .centered());

    f.render_widget(Paragraph::new(lines), inner);

    app.hit.panel = panel;
    app.hit.panel_clear = Rect::new(inner.x, inner.bottom().saturating_sub(1), inner.width, 1);
}
