//! Input box and result list rendering.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::app::App;
use crate::colors;
use crate::render::{RowEntry, render_footer};

/// Glyph shown in front of a result, by category.
fn category_glyph(category: &str) -> &'static str {
    match category {
        "Applications" => "◆",
        "Files" => "▸",
        "System" => "⚙",
        "Calculator" => "∑",
        "Clipboard" => "⎘",
        _ => "●",
    }
}

/// Render the main launcher surface: input, grouped results, footer.
#[allow(clippy::cast_possible_truncation)] // Cursor offset bounded by input width
pub fn render_search_ui(f: &mut Frame, app: &mut App) {
    let bg_block = Block::default().style(Style::default().bg(colors::BG));
    f.render_widget(bg_block, f.area());

    app.hit.viewport = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let input_block = Block::default()
        .borders(Borders::ALL)
        .title(" Beam ")
        .style(Style::default().bg(colors::SURFACE))
        .border_style(Style::default().fg(colors::OUTLINE));

    let input_text = if app.input.is_empty() {
        Span::styled("Search...", Style::default().fg(colors::OUTLINE))
    } else {
        Span::styled(&app.input, Style::default().fg(colors::ON_SURFACE))
    };

    let input = Paragraph::new(input_text).block(input_block);
    f.render_widget(input, chunks[0]);

    if !app.input.is_empty() {
        f.set_cursor_position((
            chunks[0].x + app.cursor_position as u16 + 1,
            chunks[0].y + 1,
        ));
    }

    let results_block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Results ({}) ", app.results.len()))
        .style(Style::default().bg(colors::SURFACE))
        .border_style(Style::default().fg(colors::OUTLINE));
    let results_inner = results_block.inner(chunks[1]);

    if app.results.is_empty() {
        let placeholder = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No results found",
                Style::default().fg(colors::SUBTEXT),
            ))
            .centered(),
        ])
        .block(results_block);
        f.render_widget(placeholder, chunks[1]);

        app.hit.results_inner = results_inner;
        app.hit.rows = Vec::new();
        app.hit.scroll_offset = 0;
        render_footer(f, app, chunks[2]);
        return;
    }

    // Consecutive results sharing a category sit under one header row.
    let mut rows: Vec<RowEntry> = Vec::new();
    let mut items: Vec<ListItem> = Vec::new();
    let mut last_category: Option<&str> = None;

    for (i, result) in app.results.iter().enumerate() {
        if last_category != Some(result.category.as_str()) {
            rows.push(RowEntry::Header);
            items.push(ListItem::new(Line::from(Span::styled(
                format!(" {} ", result.category),
                Style::default()
                    .fg(colors::OUTLINE)
                    .add_modifier(Modifier::BOLD),
            ))));
            last_category = Some(result.category.as_str());
        }

        let selected = i == app.selected;
        let row_style = if selected {
            Style::default()
                .bg(colors::SURFACE_HIGH)
                .fg(colors::ON_SURFACE)
        } else {
            Style::default().fg(colors::ON_SURFACE)
        };

        let mut spans = vec![
            Span::styled(
                format!(" {} ", category_glyph(&result.category)),
                Style::default().fg(colors::PRIMARY),
            ),
            Span::styled(&result.title, row_style.add_modifier(Modifier::BOLD)),
        ];
        if !result.subtitle.is_empty() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                &result.subtitle,
                Style::default().fg(colors::SUBTEXT),
            ));
        }

        rows.push(RowEntry::Result(i));
        items.push(ListItem::new(Line::from(spans)).style(row_style));
    }

    // Map the logical selection onto its visual row so scrolling follows it.
    let selected_visual = rows
        .iter()
        .position(|row| *row == RowEntry::Result(app.selected));
    app.list_state.select(selected_visual);

    let results_list = List::new(items).block(results_block);
    f.render_stateful_widget(results_list, chunks[1], &mut app.list_state);

    app.hit.results_inner = results_inner;
    app.hit.scroll_offset = app.list_state.offset();
    app.hit.rows = rows;

    render_footer(f, app, chunks[2]);
}
