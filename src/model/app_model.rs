//! Main application model with state management

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use super::api_client::ApiClient;
use super::playback::{Feed, PlayerTimings};
use super::requests::{RequestTracker, Ticket};
use super::screens::{AuthMode, AuthState, CreateState, DiscoverState, HomeState, InboxState, ProfileState};
use super::session::SessionStore;
use super::types::{LoadStatus, Screen, UiState};

/// Everything the view needs for one frame
#[derive(Clone, Debug)]
pub struct RenderState {
    pub ui: UiState,
    pub home: HomeState,
    pub feed: Feed,
    pub discover: DiscoverState,
    pub create: CreateState,
    pub inbox: InboxState,
    pub profile: ProfileState,
    pub auth: AuthState,
}

/// Main application model containing all state
pub struct AppModel {
    pub client: ApiClient,
    pub ui_state: Arc<Mutex<UiState>>,
    pub home: Arc<Mutex<HomeState>>,
    pub feed: Arc<Mutex<Feed>>,
    pub discover: Arc<Mutex<DiscoverState>>,
    pub create: Arc<Mutex<CreateState>>,
    pub inbox: Arc<Mutex<InboxState>>,
    pub profile: Arc<Mutex<ProfileState>>,
    pub auth: Arc<Mutex<AuthState>>,
    pub should_quit: Arc<Mutex<bool>>,
    requests: RequestTracker,
}

impl AppModel {
    pub fn new(client: ApiClient, timings: PlayerTimings) -> Self {
        // The app opens on an auth screen, so the feed starts unfocused
        let mut feed = Feed::new(timings);
        feed.set_focused(false);

        Self {
            client,
            ui_state: Arc::new(Mutex::new(UiState::default())),
            home: Arc::new(Mutex::new(HomeState::default())),
            feed: Arc::new(Mutex::new(feed)),
            discover: Arc::new(Mutex::new(DiscoverState::default())),
            create: Arc::new(Mutex::new(CreateState::default())),
            inbox: Arc::new(Mutex::new(InboxState::default())),
            profile: Arc::new(Mutex::new(ProfileState::default())),
            auth: Arc::new(Mutex::new(AuthState::default())),
            should_quit: Arc::new(Mutex::new(false)),
            requests: RequestTracker::new(),
        }
    }

    pub fn session(&self) -> &SessionStore {
        self.client.session()
    }

    pub async fn get_render_state(&self) -> RenderState {
        RenderState {
            ui: self.ui_state.lock().await.clone(),
            home: self.home.lock().await.clone(),
            feed: self.feed.lock().await.clone(),
            discover: self.discover.lock().await.clone(),
            create: self.create.lock().await.clone(),
            inbox: self.inbox.lock().await.clone(),
            profile: self.profile.lock().await.clone(),
            auth: self.auth.lock().await.clone(),
        }
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    // ========================================================================
    // Screens
    // ========================================================================

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn current_screen(&self) -> Screen {
        self.ui_state.lock().await.screen
    }

    /// Switch screens. Leaving a screen drops its in-flight loads, and the
    /// feed only plays while Home is showing.
    pub async fn set_screen(&self, screen: Screen) {
        let previous = {
            let mut state = self.ui_state.lock().await;
            let previous = state.screen;
            state.screen = screen;
            previous
        };
        if previous == screen {
            return;
        }
        tracing::debug!(from = ?previous, to = ?screen, "Switching screen");

        self.abandon_load(previous).await;
        self.feed.lock().await.set_focused(screen == Screen::Home);

        match screen {
            Screen::Login => self.auth.lock().await.switch_to(AuthMode::Login),
            Screen::Register => self.auth.lock().await.switch_to(AuthMode::Register),
            _ => {}
        }
    }

    async fn abandon_load(&self, screen: Screen) {
        self.requests.invalidate(screen).await;
        // An abandoned load leaves the screen idle so it reloads on return
        match screen {
            Screen::Home => reset_loading(&mut self.home.lock().await.status),
            Screen::Discover => reset_loading(&mut self.discover.lock().await.status),
            Screen::Profile => reset_loading(&mut self.profile.lock().await.status),
            _ => {}
        }
    }

    /// Drop everything tied to the signed-in account. Home and Profile
    /// go back to Idle so they load again under the next session.
    pub async fn forget_account(&self) {
        for screen in [Screen::Home, Screen::Profile] {
            self.requests.invalidate(screen).await;
        }
        self.feed.lock().await.set_posts(Vec::new());
        self.home.lock().await.status = LoadStatus::Idle;
        self.profile.lock().await.reset();
    }

    pub async fn begin_load(&self, screen: Screen) -> Ticket {
        self.requests.begin(screen).await
    }

    /// Whether a response for `ticket` should still be applied
    pub async fn accepts(&self, ticket: Ticket) -> bool {
        let current = self.requests.is_current(ticket).await;
        if !current {
            tracing::debug!(screen = ?ticket.screen, "Dropping stale response");
        }
        current
    }

    // ========================================================================
    // Popups & messages
    // ========================================================================

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn set_notice(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.notice = Some(message);
        state.notice_timestamp = Some(Instant::now());
    }

    pub async fn auto_clear_old_notices(&self, now: Instant) {
        let mut state = self.ui_state.lock().await;
        if state.notice.is_some() && !state.notice_visible(now) {
            state.notice = None;
            state.notice_timestamp = None;
        }
    }

    pub async fn show_help_popup(&self) {
        let mut state = self.ui_state.lock().await;
        state.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        let mut state = self.ui_state.lock().await;
        state.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }
}

fn reset_loading(status: &mut LoadStatus) {
    if status.is_loading() {
        *status = LoadStatus::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::post::Post;
    use tempfile::TempDir;

    fn model(dir: &TempDir) -> AppModel {
        let session = SessionStore::new(dir.path());
        let client = ApiClient::new("http://127.0.0.1:9", session).unwrap();
        AppModel::new(client, PlayerTimings::default())
    }

    fn video(id: &str) -> Post {
        let record = serde_json::from_value(serde_json::json!({ "id": id, "post": "clip.mp4" })).unwrap();
        Post::from_record(&record)
    }

    #[tokio::test]
    async fn leaving_home_pauses_the_feed() {
        let dir = TempDir::new().unwrap();
        let model = model(&dir);
        model.set_screen(Screen::Home).await;
        {
            let mut feed = model.feed.lock().await;
            feed.resize(20);
            feed.set_posts(vec![video("1"), video("2")]);
            assert_eq!(feed.playing_count(), 1);
        }

        model.set_screen(Screen::Discover).await;
        assert_eq!(model.feed.lock().await.playing_count(), 0);

        model.set_screen(Screen::Home).await;
        assert_eq!(model.feed.lock().await.playing_count(), 1);
    }

    #[tokio::test]
    async fn leaving_a_screen_drops_its_pending_load() {
        let dir = TempDir::new().unwrap();
        let model = model(&dir);
        model.set_screen(Screen::Profile).await;
        let ticket = model.begin_load(Screen::Profile).await;
        model.profile.lock().await.status = LoadStatus::Loading;

        model.set_screen(Screen::Home).await;
        assert!(!model.accepts(ticket).await);
        assert_eq!(model.profile.lock().await.status, LoadStatus::Idle);
    }

    #[tokio::test]
    async fn forgetting_the_account_drops_likes_and_saves() {
        let dir = TempDir::new().unwrap();
        let model = model(&dir);
        model.set_screen(Screen::Home).await;
        {
            let mut feed = model.feed.lock().await;
            feed.resize(20);
            feed.set_posts(vec![video("1")]);
            feed.toggle_like();
            feed.toggle_save();
        }
        model.home.lock().await.status = LoadStatus::Loaded;
        let ticket = model.begin_load(Screen::Home).await;

        model.forget_account().await;

        assert!(model.feed.lock().await.is_empty());
        assert_eq!(model.home.lock().await.status, LoadStatus::Idle);
        assert!(!model.accepts(ticket).await);
    }

    #[tokio::test]
    async fn errors_block_until_cleared() {
        let dir = TempDir::new().unwrap();
        let model = model(&dir);
        model.set_error("Passwords do not match".into()).await;
        assert!(model.has_error().await);
        model.clear_error().await;
        assert!(!model.has_error().await);
    }
}
