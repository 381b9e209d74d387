//! Key event handling

use std::time::Instant;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::{LoadStatus, Screen};
use super::AppController;

/// Rows moved by one fine-scroll step on the feed
const SCROLL_STEP: i64 = 2;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let model = self.model.lock().await;

        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            model.set_should_quit(true).await;
            return Ok(());
        }

        // Handle error message first (blocks all other interactions)
        if model.has_error().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                model.clear_error().await;
            }
            return Ok(());
        }

        // Handle help popup
        if model.is_help_popup_open().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('?')) {
                model.hide_help_popup().await;
            }
            return Ok(());
        }

        let screen = model.current_screen().await;
        drop(model);

        // Screens with text input consume the key before global bindings
        let consumed = match screen {
            Screen::Login | Screen::Register => self.handle_auth_key(key, ctrl).await,
            Screen::Create => self.handle_create_key(key).await,
            Screen::Discover => self.handle_search_key(key).await,
            _ => false,
        };
        if consumed {
            return Ok(());
        }

        let consumed = match screen {
            Screen::Home => self.handle_home_key(key).await,
            Screen::Discover => self.handle_discover_key(key).await,
            Screen::Inbox => self.handle_inbox_key(key).await,
            Screen::Profile => self.handle_profile_key(key).await,
            _ => false,
        };
        if consumed {
            return Ok(());
        }

        // Global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.model.lock().await.set_should_quit(true).await;
            }
            KeyCode::Char(c @ '1'..='5') => {
                if let Some(target) = Screen::from_digit(c) {
                    self.open_screen(target).await;
                }
            }
            KeyCode::Tab => self.cycle_screen_forward().await,
            KeyCode::BackTab => self.cycle_screen_backward().await,
            KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                self.model.lock().await.show_help_popup().await;
            }
            _ => {}
        }
        Ok(())
    }

    /// Login and registration forms are always in text entry
    async fn handle_auth_key(&self, key: KeyEvent, ctrl: bool) -> bool {
        if ctrl {
            if key.code == KeyCode::Char('r') {
                self.switch_auth_mode().await;
            }
            return true;
        }

        let model = self.model.lock().await;
        let mut auth = model.auth.lock().await;
        match key.code {
            KeyCode::Tab | KeyCode::Down => auth.next_field(),
            KeyCode::BackTab | KeyCode::Up => auth.prev_field(),
            KeyCode::Backspace => auth.pop_char(),
            KeyCode::Char(c) => auth.push_char(c),
            KeyCode::Enter => {
                drop(auth);
                drop(model);
                let controller = self.clone();
                tokio::spawn(async move {
                    controller.submit_auth().await;
                });
            }
            _ => {}
        }
        true
    }

    async fn handle_create_key(&self, key: KeyEvent) -> bool {
        let model = self.model.lock().await;
        let mut create = model.create.lock().await;
        match key.code {
            KeyCode::Down => create.next_field(),
            KeyCode::Up => create.prev_field(),
            KeyCode::Left => create.mode = create.mode.prev(),
            KeyCode::Right => create.mode = create.mode.next(),
            KeyCode::Backspace => create.pop_char(),
            KeyCode::Char(c) => create.push_char(c),
            KeyCode::Enter => {
                drop(create);
                drop(model);
                let controller = self.clone();
                tokio::spawn(async move {
                    controller.submit_upload().await;
                });
            }
            KeyCode::Esc => {
                drop(create);
                drop(model);
                self.open_screen(Screen::Home).await;
            }
            _ => return false,
        }
        true
    }

    /// Text entry into the discover search box while it is being edited
    async fn handle_search_key(&self, key: KeyEvent) -> bool {
        let model = self.model.lock().await;
        let mut discover = model.discover.lock().await;
        if !discover.editing {
            return false;
        }
        match key.code {
            KeyCode::Enter => {
                drop(discover);
                drop(model);
                self.submit_search().await;
            }
            KeyCode::Esc => {
                discover.query.clear();
                discover.editing = false;
            }
            KeyCode::Backspace => {
                discover.query.pop();
            }
            KeyCode::Char(c) => discover.query.push(c),
            KeyCode::Tab | KeyCode::BackTab => {
                // Leaving the screen closes the search box
                discover.editing = false;
                return false;
            }
            _ => {}
        }
        true
    }

    async fn handle_home_key(&self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Down => self.feed_next().await,
            KeyCode::Up => self.feed_previous().await,
            KeyCode::Char('j') => self.feed_scroll(SCROLL_STEP).await,
            KeyCode::Char('k') => self.feed_scroll(-SCROLL_STEP).await,
            KeyCode::Enter | KeyCode::Char(' ') => self.tap_active(Instant::now()).await,
            KeyCode::Char('l') | KeyCode::Char('L') => self.toggle_like().await,
            KeyCode::Char('s') | KeyCode::Char('S') => self.toggle_save().await,
            KeyCode::Char('m') | KeyCode::Char('M') => self.toggle_mute().await,
            KeyCode::Left | KeyCode::Right => self.toggle_feed_tab().await,
            KeyCode::Char('r') | KeyCode::Char('R') => self.spawn_feed_load(),
            _ => return false,
        }
        true
    }

    async fn handle_discover_key(&self, key: KeyEvent) -> bool {
        let model = self.model.lock().await;
        let mut discover = model.discover.lock().await;
        match key.code {
            KeyCode::Char('/') | KeyCode::Char('i') => discover.editing = true,
            KeyCode::Up => discover.move_up(),
            KeyCode::Down => discover.move_down(),
            KeyCode::Left | KeyCode::Right => {
                drop(discover);
                drop(model);
                self.switch_discover_tab(key.code == KeyCode::Right).await;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                drop(discover);
                drop(model);
                self.spawn_discover_load();
            }
            _ => return false,
        }
        true
    }

    async fn handle_inbox_key(&self, key: KeyEvent) -> bool {
        let model = self.model.lock().await;
        let mut inbox = model.inbox.lock().await;
        match key.code {
            KeyCode::Left | KeyCode::Right => inbox.toggle_tab(),
            KeyCode::Up => inbox.move_up(),
            KeyCode::Down => inbox.move_down(),
            _ => return false,
        }
        true
    }

    async fn handle_profile_key(&self, key: KeyEvent) -> bool {
        let status = {
            let model = self.model.lock().await;
            let profile = model.profile.lock().await;
            profile.status.clone()
        };
        match key.code {
            KeyCode::Left => self.switch_profile_tab(false).await,
            KeyCode::Right => self.switch_profile_tab(true).await,
            KeyCode::Char('r') | KeyCode::Char('R') => self.spawn_profile_load(),
            KeyCode::Char('o') | KeyCode::Char('O') => self.logout().await,
            // The error view's "Log in" action
            KeyCode::Enter if matches!(status, LoadStatus::Failed(_)) => self.logout().await,
            _ => return false,
        }
        true
    }
}
