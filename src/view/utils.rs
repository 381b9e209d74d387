//! Utility functions for rendering UI components

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn render_scrollable_list(
    frame: &mut Frame,
    area: Rect,
    items: Vec<ListItem>,
    selected_index: usize,
    block: Block,
) {
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default()); // Highlight handled by item styles

    let mut list_state = ListState::default();
    list_state.select(Some(selected_index));

    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Centered message with an optional action hint underneath, used for
/// loading, empty and error states
pub fn render_status_message(
    frame: &mut Frame,
    area: Rect,
    message: &str,
    color: Color,
    hint: Option<&str>,
    block: Block,
) {
    let inner_height = area.height.saturating_sub(2) as usize;
    let text_lines = if hint.is_some() { 3 } else { 1 };
    let mut lines: Vec<Line> = vec![Line::raw(""); inner_height.saturating_sub(text_lines) / 2];
    lines.push(Line::styled(message.to_string(), Style::default().fg(color)));
    if let Some(hint) = hint {
        lines.push(Line::raw(""));
        lines.push(Line::styled(hint.to_string(), Style::default().fg(Color::DarkGray)));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(paragraph, area);
}

/// Short count label: 999, 1.2K, 3.4M
pub fn compact_count(count: u64) -> String {
    match count {
        0..=999 => count.to_string(),
        1_000..=999_999 => trim_decimal(count as f64 / 1_000.0, "K"),
        _ => trim_decimal(count as f64 / 1_000_000.0, "M"),
    }
}

fn trim_decimal(value: f64, suffix: &str) -> String {
    let formatted = format!("{:.1}", value);
    let formatted = formatted.strip_suffix(".0").unwrap_or(&formatted);
    format!("{}{}", formatted, suffix)
}

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

/// Password fields render as bullets
pub fn mask(value: &str) -> String {
    "•".repeat(value.chars().count())
}

pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}
