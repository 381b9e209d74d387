//! Layout rendering (screen header, bottom tab bar)

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::model::{FeedTab, RenderState, Screen};

fn tab_span(label: &str, active: bool) -> Span<'static> {
    let style = if active {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(label.to_string(), style)
}

pub fn render_header(frame: &mut Frame, area: Rect, state: &RenderState) {
    let line = match state.ui.screen {
        Screen::Home => {
            let tab = state.home.tab;
            Line::from(vec![
                tab_span(FeedTab::Following.label(), tab == FeedTab::Following),
                Span::raw("   "),
                tab_span(FeedTab::ForYou.label(), tab == FeedTab::ForYou),
            ])
        }
        screen => Line::from(Span::styled(
            screen.label().to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
    };

    let header = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(header, area);
}

pub fn render_tab_bar(frame: &mut Frame, area: Rect, state: &RenderState) {
    let unread = crate::model::unread_count(&state.inbox.messages);

    let mut spans = Vec::new();
    for (i, screen) in Screen::TABS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
        }
        let active = *screen == state.ui.screen;
        let label = match screen {
            Screen::Create => " + ".to_string(),
            Screen::Inbox if unread > 0 => format!("{} ({})", screen.label(), unread),
            _ => screen.label().to_string(),
        };
        let style = match (active, screen) {
            (_, Screen::Create) => Style::default().fg(Color::Black).bg(Color::White).add_modifier(Modifier::BOLD),
            (true, _) => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            (false, _) => Style::default().fg(Color::Gray),
        };
        spans.push(Span::styled(format!("{} ", i + 1), Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(label, style));
    }

    let tab_bar = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(tab_bar, area);
}
