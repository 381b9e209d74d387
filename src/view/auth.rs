//! Login and registration screens

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::model::{AuthMode, AuthState, LoginForm, RegisterForm};
use super::utils::{centered_rect, mask};

const FORM_WIDTH: u16 = 48;

pub fn render_auth(frame: &mut Frame, area: Rect, auth: &AuthState) {
    let fields: Vec<(&str, String, bool)> = match auth.mode {
        AuthMode::Login => vec![
            (LoginForm::LABELS[0], auth.login.username.clone(), false),
            (LoginForm::LABELS[1], auth.login.password.clone(), true),
        ],
        AuthMode::Register => RegisterForm::LABELS
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let secret = RegisterForm::SECRET_FIELDS.contains(&i);
                (*label, auth.register.field(i).to_string(), secret)
            })
            .collect(),
    };

    let (title, subtitle, switch_hint) = match auth.mode {
        AuthMode::Login => ("Log in", "Welcome back", "Don't have an account? Ctrl+R to sign up"),
        AuthMode::Register => ("Sign up", "Create your account", "Already have an account? Ctrl+R to log in"),
    };

    let height = 4 + fields.len() as u16 * 3 + 3;
    let form_area = centered_rect(area, FORM_WIDTH, height);

    let mut constraints = vec![Constraint::Length(3)];
    constraints.extend(fields.iter().map(|_| Constraint::Length(3)));
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(0));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(form_area);

    let heading = Paragraph::new(vec![
        Line::styled(title, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Line::styled(subtitle, Style::default().fg(Color::DarkGray)),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(heading, chunks[0]);

    for (i, (label, value, secret)) in fields.iter().enumerate() {
        let focused = i == auth.field;
        let shown = if *secret { mask(value) } else { value.clone() };
        let text = if focused { format!("{}▏", shown) } else { shown };
        let border_style = if focused {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let input = Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", label))
                .padding(Padding::horizontal(1))
                .border_style(border_style),
        );
        frame.render_widget(input, chunks[i + 1]);
    }

    let action = if auth.submitting {
        Line::styled("Please wait...", Style::default().fg(Color::Yellow))
    } else {
        Line::styled(
            format!("Enter to {}", title.to_lowercase()),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )
    };
    frame.render_widget(Paragraph::new(action).alignment(Alignment::Center), chunks[fields.len() + 1]);

    let footer = Paragraph::new(vec![
        Line::styled(switch_hint, Style::default().fg(Color::DarkGray)),
        Line::styled("Tab/↑↓ move between fields · Ctrl+C quit", Style::default().fg(Color::DarkGray)),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[fields.len() + 2]);
}
