//! Per-screen state outside the feed player

use super::forms::{FormFields, LoginForm, RegisterForm, UploadForm};
use super::inbox::{sample_activities, sample_messages, Activity, InboxMessage};
use super::post::{Post, ProfileTile};
use super::records::{HashtagRecord, MusicRecord, UserRecord};
use super::types::{DiscoverTab, FeedTab, InboxTab, LoadStatus, ProfileTab, RecordingMode};

#[derive(Clone, Debug, Default)]
pub struct HomeState {
    pub tab: FeedTab,
    pub status: LoadStatus,
}

#[derive(Clone, Debug, Default)]
pub struct DiscoverState {
    pub query: String,
    pub editing: bool,
    /// Query behind `posts`, `None` while showing the unfiltered list
    pub searched: Option<String>,
    pub tab: DiscoverTab,
    pub status: LoadStatus,
    pub posts: Vec<Post>,
    pub users: Vec<UserRecord>,
    pub sounds: Vec<MusicRecord>,
    pub hashtags: Vec<HashtagRecord>,
    pub selected: usize,
}

impl DiscoverState {
    /// Number of rows listed under the current tab
    pub fn item_count(&self) -> usize {
        match self.tab {
            DiscoverTab::Top => self.posts.len(),
            DiscoverTab::Videos => self.posts.iter().filter(|p| p.is_video()).count(),
            DiscoverTab::Users => self.users.len(),
            DiscoverTab::Sounds => self.sounds.len(),
            DiscoverTab::Hashtags => self.hashtags.len(),
            DiscoverTab::Live => 0,
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.item_count() {
            self.selected += 1;
        }
    }

    pub fn set_tab(&mut self, tab: DiscoverTab) {
        self.tab = tab;
        self.selected = 0;
    }

    /// Keep the selection inside the list after a reload
    pub fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.item_count().saturating_sub(1));
    }
}

#[derive(Clone, Debug, Default)]
pub struct CreateState {
    pub form: UploadForm,
    pub field: usize,
    pub mode: RecordingMode,
    pub submitting: bool,
}

impl CreateState {
    pub fn next_field(&mut self) {
        self.field = (self.field + 1) % UploadForm::FIELD_COUNT;
    }

    pub fn prev_field(&mut self) {
        self.field = (self.field + UploadForm::FIELD_COUNT - 1) % UploadForm::FIELD_COUNT;
    }

    pub fn push_char(&mut self, c: char) {
        let field = self.field;
        self.form.push_char(field, c);
    }

    pub fn pop_char(&mut self) {
        let field = self.field;
        self.form.pop_char(field);
    }
}

#[derive(Clone, Debug)]
pub struct InboxState {
    pub tab: InboxTab,
    pub messages: Vec<InboxMessage>,
    pub activities: Vec<Activity>,
    pub selected: usize,
}

impl Default for InboxState {
    fn default() -> Self {
        Self {
            tab: InboxTab::default(),
            messages: sample_messages(),
            activities: sample_activities(),
            selected: 0,
        }
    }
}

impl InboxState {
    fn item_count(&self) -> usize {
        match self.tab {
            InboxTab::AllActivity => self.activities.len(),
            InboxTab::Messages => self.messages.len(),
        }
    }

    pub fn toggle_tab(&mut self) {
        self.tab = self.tab.toggle();
        self.selected = 0;
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.item_count() {
            self.selected += 1;
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ProfileState {
    pub tab: ProfileTab,
    pub status: LoadStatus,
    pub user: Option<UserRecord>,
    pub tiles: Vec<ProfileTile>,
}

impl ProfileState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Which auth form has focus
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub mode: AuthMode,
    pub login: LoginForm,
    pub register: RegisterForm,
    pub field: usize,
    pub submitting: bool,
}

impl AuthState {
    fn field_count(&self) -> usize {
        match self.mode {
            AuthMode::Login => LoginForm::FIELD_COUNT,
            AuthMode::Register => RegisterForm::FIELD_COUNT,
        }
    }

    pub fn switch_to(&mut self, mode: AuthMode) {
        self.mode = mode;
        self.field = 0;
        self.submitting = false;
    }

    pub fn next_field(&mut self) {
        self.field = (self.field + 1) % self.field_count();
    }

    pub fn prev_field(&mut self) {
        let count = self.field_count();
        self.field = (self.field + count - 1) % count;
    }

    pub fn push_char(&mut self, c: char) {
        let field = self.field;
        match self.mode {
            AuthMode::Login => self.login.push_char(field, c),
            AuthMode::Register => self.register.push_char(field, c),
        }
    }

    pub fn pop_char(&mut self) {
        let field = self.field;
        match self.mode {
            AuthMode::Login => self.login.pop_char(field),
            AuthMode::Register => self.register.pop_char(field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, file: &str) -> Post {
        let record = serde_json::from_value(serde_json::json!({ "id": id, "post": file })).unwrap();
        Post::from_record(&record)
    }

    #[test]
    fn videos_tab_counts_only_videos() {
        let mut discover = DiscoverState {
            posts: vec![post("1", "a.mp4"), post("2", "b.jpg"), post("3", "c.webm")],
            ..DiscoverState::default()
        };
        assert_eq!(discover.item_count(), 3);
        discover.set_tab(DiscoverTab::Videos);
        assert_eq!(discover.item_count(), 2);
        discover.set_tab(DiscoverTab::Live);
        assert_eq!(discover.item_count(), 0);
    }

    #[test]
    fn discover_selection_stays_in_bounds() {
        let mut discover = DiscoverState {
            posts: vec![post("1", "a.mp4"), post("2", "b.jpg")],
            ..DiscoverState::default()
        };
        discover.move_down();
        discover.move_down();
        assert_eq!(discover.selected, 1);
        discover.posts.truncate(1);
        discover.clamp_selection();
        assert_eq!(discover.selected, 0);
        discover.move_up();
        assert_eq!(discover.selected, 0);
    }

    #[test]
    fn auth_fields_wrap_per_form() {
        let mut auth = AuthState::default();
        auth.next_field();
        auth.next_field();
        assert_eq!(auth.field, 0);

        auth.switch_to(AuthMode::Register);
        auth.prev_field();
        assert_eq!(auth.field, RegisterForm::FIELD_COUNT - 1);
        auth.push_char('x');
        assert_eq!(auth.register.last_name, "x");
    }

    #[test]
    fn inbox_starts_with_sample_data() {
        let mut inbox = InboxState::default();
        assert_eq!(inbox.tab, InboxTab::AllActivity);
        assert!(!inbox.activities.is_empty());
        inbox.move_down();
        inbox.toggle_tab();
        assert_eq!(inbox.selected, 0);
        assert_eq!(inbox.tab, InboxTab::Messages);
    }
}
