//! Core type definitions for the application

use std::time::{Duration, Instant};

/// How long a notice stays on screen
pub const NOTICE_VISIBLE_FOR: Duration = Duration::from_secs(3);

/// Top-level screens. The five tab screens sit on the bottom bar; the auth
/// screens replace the whole layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Screen {
    Login,
    Register,
    Home,
    Discover,
    Create,
    Inbox,
    Profile,
}

impl Screen {
    pub const TABS: [Screen; 5] = [
        Screen::Home,
        Screen::Discover,
        Screen::Create,
        Screen::Inbox,
        Screen::Profile,
    ];

    pub fn is_tab(self) -> bool {
        !matches!(self, Screen::Login | Screen::Register)
    }

    pub fn label(self) -> &'static str {
        match self {
            Screen::Login => "Log in",
            Screen::Register => "Sign up",
            Screen::Home => "Home",
            Screen::Discover => "Discover",
            Screen::Create => "Create",
            Screen::Inbox => "Inbox",
            Screen::Profile => "Profile",
        }
    }

    /// Tab for a 1-based number key
    pub fn from_digit(digit: char) -> Option<Self> {
        let index = digit.to_digit(10)? as usize;
        Self::TABS.get(index.checked_sub(1)?).copied()
    }

    fn tab_index(self) -> Option<usize> {
        Self::TABS.iter().position(|s| *s == self)
    }

    pub fn next(self) -> Self {
        match self.tab_index() {
            Some(i) => Self::TABS[(i + 1) % Self::TABS.len()],
            None => self,
        }
    }

    pub fn prev(self) -> Self {
        match self.tab_index() {
            Some(i) => Self::TABS[(i + Self::TABS.len() - 1) % Self::TABS.len()],
            None => self,
        }
    }
}

/// Home feed header tabs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FeedTab {
    Following,
    #[default]
    ForYou,
}

impl FeedTab {
    pub fn label(self) -> &'static str {
        match self {
            FeedTab::Following => "Following",
            FeedTab::ForYou => "For You",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            FeedTab::Following => FeedTab::ForYou,
            FeedTab::ForYou => FeedTab::Following,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DiscoverTab {
    #[default]
    Top,
    Users,
    Videos,
    Sounds,
    Live,
    Hashtags,
}

impl DiscoverTab {
    pub const ALL: [DiscoverTab; 6] = [
        DiscoverTab::Top,
        DiscoverTab::Users,
        DiscoverTab::Videos,
        DiscoverTab::Sounds,
        DiscoverTab::Live,
        DiscoverTab::Hashtags,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Top => "Top",
            Self::Users => "Users",
            Self::Videos => "Videos",
            Self::Sounds => "Sounds",
            Self::Live => "LIVE",
            Self::Hashtags => "Hashtags",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Top => Self::Users,
            Self::Users => Self::Videos,
            Self::Videos => Self::Sounds,
            Self::Sounds => Self::Live,
            Self::Live => Self::Hashtags,
            Self::Hashtags => Self::Top,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Top => Self::Hashtags,
            Self::Users => Self::Top,
            Self::Videos => Self::Users,
            Self::Sounds => Self::Videos,
            Self::Live => Self::Sounds,
            Self::Hashtags => Self::Live,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ProfileTab {
    #[default]
    Videos,
    Liked,
    Saved,
}

impl ProfileTab {
    pub fn label(self) -> &'static str {
        match self {
            Self::Videos => "Videos",
            Self::Liked => "Liked",
            Self::Saved => "Saved",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Videos => Self::Liked,
            Self::Liked => Self::Saved,
            Self::Saved => Self::Videos,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Videos => Self::Saved,
            Self::Liked => Self::Videos,
            Self::Saved => Self::Liked,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum InboxTab {
    #[default]
    AllActivity,
    Messages,
}

impl InboxTab {
    pub fn label(self) -> &'static str {
        match self {
            InboxTab::AllActivity => "All activity",
            InboxTab::Messages => "Messages",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            InboxTab::AllActivity => InboxTab::Messages,
            InboxTab::Messages => InboxTab::AllActivity,
        }
    }
}

/// Create screen recording length selector. Informational only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RecordingMode {
    Short,
    #[default]
    Minute,
    ThreeMinutes,
    TenMinutes,
}

impl RecordingMode {
    pub const ALL: [RecordingMode; 4] = [
        RecordingMode::Short,
        RecordingMode::Minute,
        RecordingMode::ThreeMinutes,
        RecordingMode::TenMinutes,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Short => "15s",
            Self::Minute => "60s",
            Self::ThreeMinutes => "3m",
            Self::TenMinutes => "10m",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Short => Self::Minute,
            Self::Minute => Self::ThreeMinutes,
            Self::ThreeMinutes => Self::TenMinutes,
            Self::TenMinutes => Self::Short,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Short => Self::TenMinutes,
            Self::Minute => Self::Short,
            Self::ThreeMinutes => Self::Minute,
            Self::TenMinutes => Self::ThreeMinutes,
        }
    }
}

/// Progress of a screen's remote data
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

impl LoadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading)
    }
}

/// UI state for the application
#[derive(Clone, Debug)]
pub struct UiState {
    pub screen: Screen,
    pub error_message: Option<String>,
    pub notice: Option<String>,
    pub notice_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            screen: Screen::Login,
            error_message: None,
            notice: None,
            notice_timestamp: None,
            show_help_popup: false,
        }
    }
}

impl UiState {
    pub fn notice_visible(&self, now: Instant) -> bool {
        match (self.notice.as_ref(), self.notice_timestamp) {
            (Some(_), Some(shown)) => now.duration_since(shown) < NOTICE_VISIBLE_FOR,
            _ => false,
        }
    }
}
