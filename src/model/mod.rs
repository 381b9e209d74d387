//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the application.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (screens, tabs, UI state)
//! - `records`: Wire records returned by the backend
//! - `post`: Display-ready posts and media classification
//! - `playback`: Feed player state (autoplay, taps, transient controls)
//! - `forms`: Login, registration and upload forms with validation
//! - `screens`: Per-screen state
//! - `inbox`: Static inbox sample data
//! - `session`: Persisted access token
//! - `requests`: Generation tickets for dropping stale responses
//! - `api_client`: REST client for the backend
//! - `app_model`: Main application model with state management methods

mod types;
mod records;
mod post;
mod playback;
mod forms;
mod screens;
mod inbox;
mod session;
mod requests;
mod api_client;
mod app_model;

// Re-export all public types for convenient access
pub use types::{
    DiscoverTab, FeedTab, InboxTab, LoadStatus, ProfileTab, RecordingMode, Screen, UiState,
};

pub use records::{HashtagRecord, MusicRecord, RegistrationRequest, UserRecord};

pub use post::{age_label, display_name, hashtag_label, sound_label, user_handle, MediaType, Post, ProfileTile};

pub use playback::{Feed, FeedEntry, PlaybackPhase, PlayerTimings, TapOutcome};

pub use forms::{LoginForm, RegisterForm, UploadForm, ValidationError};

pub use screens::{AuthMode, AuthState};

pub use inbox::unread_count;

pub use session::SessionStore;

pub use api_client::{ApiClient, ApiError};

pub use app_model::{AppModel, RenderState};
