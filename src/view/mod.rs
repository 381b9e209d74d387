//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (formatting, lists, status messages)
//! - `layout`: Main layout structure (screen header, bottom tab bar)
//! - `feed`: Home feed pages
//! - `screens`: Discover, Create, Inbox and Profile
//! - `auth`: Login and registration forms
//! - `overlays`: Modal overlays (error, notice, help)

mod utils;
mod layout;
mod feed;
mod screens;
mod auth;
mod overlays;

use std::time::Instant;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use crate::model::{RenderState, Screen};

const HEADER_HEIGHT: u16 = 2;
const TAB_BAR_HEIGHT: u16 = 2;

pub struct AppView;

impl AppView {
    /// Rows available to one feed page in a terminal of the given size
    pub fn feed_viewport_height(area: Rect) -> u16 {
        area.height.saturating_sub(HEADER_HEIGHT + TAB_BAR_HEIGHT).max(1)
    }

    pub fn render(frame: &mut Frame, state: &RenderState, now: Instant) {
        let area = frame.area();

        if state.ui.screen.is_tab() {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(HEADER_HEIGHT),
                    Constraint::Min(0),
                    Constraint::Length(TAB_BAR_HEIGHT),
                ])
                .split(area);

            layout::render_header(frame, chunks[0], state);

            match state.ui.screen {
                Screen::Home => feed::render_home(frame, chunks[1], state, now),
                Screen::Discover => screens::render_discover(frame, chunks[1], state),
                Screen::Create => screens::render_create(frame, chunks[1], state),
                Screen::Inbox => screens::render_inbox(frame, chunks[1], state),
                Screen::Profile => screens::render_profile(frame, chunks[1], state),
                Screen::Login | Screen::Register => {}
            }

            layout::render_tab_bar(frame, chunks[2], state);
        } else {
            auth::render_auth(frame, area, &state.auth);
        }

        if state.ui.notice_visible(now) {
            overlays::render_notice(frame, &state.ui);
        }

        // Error notification overlay (if there's an error)
        if state.ui.error_message.is_some() {
            overlays::render_error_notification(frame, &state.ui);
        }

        // Help popup overlay (if open)
        if state.ui.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}
