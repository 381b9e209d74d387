//! View models derived from backend records, and the media classifier

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::records::{HashtagRecord, MusicRecord, PostRecord, UserRecord};

pub const VIDEO_EXTENSIONS: [&str; 6] = ["mp4", "mov", "avi", "mkv", "webm", "3gp"];
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];

const NO_DESCRIPTION: &str = "No description";
const ORIGINAL_SOUND: &str = "Original Sound";
const DEFAULT_COVER: &str = "https://via.placeholder.com/150";
const AVATAR_SERVICE: &str = "https://ui-avatars.com/api/?name=";
const DEFAULT_THUMBNAIL: &str = "https://via.placeholder.com/300x500.png";
const DEFAULT_DURATION: &str = "0:30";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaType {
    Video,
    Image,
    Unknown,
}

impl MediaType {
    pub fn badge(self) -> &'static str {
        match self {
            MediaType::Video => "VIDEO",
            MediaType::Image => "PHOTO",
            MediaType::Unknown => "FILE",
        }
    }
}

/// Lowercased extension of the last path segment of a media URL.
///
/// Query strings and fragments are ignored. A segment without a dot has no
/// extension.
pub fn media_extension(uri: &str) -> String {
    let path = uri.split(['?', '#']).next().unwrap_or_default();
    let file_name = path.rsplit('/').next().unwrap_or_default();
    match file_name.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => String::new(),
    }
}

pub fn classify_media(uri: &str) -> MediaType {
    let ext = media_extension(uri);
    if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        MediaType::Video
    } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        MediaType::Image
    } else {
        MediaType::Unknown
    }
}

/// A feed entry ready for rendering
#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    pub id: String,
    pub media_uri: String,
    pub media_type: MediaType,
    pub file_name: String,
    pub extension: String,
    pub title: String,
    pub author_handle: String,
    pub author_avatar_uri: String,
    pub caption: String,
    pub sound_label: String,
    pub sound_cover_uri: String,
    pub like_count: u64,
    pub comment_count: u64,
    pub hashtags: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl Post {
    pub fn from_record(record: &PostRecord) -> Self {
        let media_uri = non_empty(&record.post).unwrap_or_default().to_string();
        let username = record
            .user
            .as_ref()
            .and_then(|u| non_empty(&u.username));

        let caption = non_empty(&record.description)
            .or_else(|| non_empty(&record.title))
            .unwrap_or(NO_DESCRIPTION)
            .to_string();

        let author_avatar_uri = record
            .user
            .as_ref()
            .and_then(|u| non_empty(&u.avatar))
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}{}", AVATAR_SERVICE, username.unwrap_or("U")));

        let sound_cover_uri = record
            .music
            .as_ref()
            .and_then(|m| non_empty(&m.cover))
            .unwrap_or(DEFAULT_COVER)
            .to_string();

        let file_name = media_uri
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("file")
            .to_string();

        Self {
            id: record.id.to_string(),
            media_type: classify_media(&media_uri),
            extension: media_extension(&media_uri),
            file_name,
            title: non_empty(&record.title).unwrap_or("Post").to_string(),
            author_handle: format!("@{}", username.unwrap_or("user")),
            author_avatar_uri,
            caption,
            sound_label: record
                .music
                .as_ref()
                .map(sound_label)
                .unwrap_or_else(|| ORIGINAL_SOUND.to_string()),
            sound_cover_uri,
            like_count: record.likes_count.unwrap_or(0),
            comment_count: record.comments_count.unwrap_or(0),
            hashtags: record
                .hashtags
                .as_deref()
                .unwrap_or_default()
                .iter()
                .filter(|h| !h.name.trim().is_empty())
                .map(hashtag_label)
                .collect(),
            created_at: record.created_at,
            media_uri,
        }
    }

    pub fn is_video(&self) -> bool {
        self.media_type == MediaType::Video
    }
}

pub fn sound_label(music: &MusicRecord) -> String {
    match (non_empty(&music.music_name), non_empty(&music.singer)) {
        (Some(name), Some(singer)) => format!("{} - {}", name, singer),
        (Some(name), None) => name.to_string(),
        (None, Some(singer)) => format!("{} - {}", ORIGINAL_SOUND, singer),
        (None, None) => ORIGINAL_SOUND.to_string(),
    }
}

pub fn hashtag_label(tag: &HashtagRecord) -> String {
    format!("#{}", tag.name.trim().trim_start_matches('#'))
}

pub fn user_handle(user: &UserRecord) -> String {
    format!("@{}", non_empty(&user.username).unwrap_or("user"))
}

pub fn display_name(user: &UserRecord) -> String {
    match (non_empty(&user.first_name), non_empty(&user.last_name)) {
        (Some(first), Some(last)) => format!("{} {}", first, last),
        _ => user_handle(user),
    }
}

/// A tile in the profile video grid
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileTile {
    pub id: String,
    pub thumbnail: String,
    pub duration: String,
    pub views: String,
}

impl ProfileTile {
    pub fn from_record(record: &PostRecord) -> Self {
        let views = match &record.views {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            _ => "0".to_string(),
        };

        Self {
            id: record.id.to_string(),
            thumbnail: non_empty(&record.thumbnail).unwrap_or(DEFAULT_THUMBNAIL).to_string(),
            duration: non_empty(&record.duration).unwrap_or(DEFAULT_DURATION).to_string(),
            views,
        }
    }
}

/// Short relative age label such as `5m`, `3h` or `2d`
pub fn age_label(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(created_at);
    if elapsed.num_minutes() < 1 {
        "now".to_string()
    } else if elapsed.num_hours() < 1 {
        format!("{}m", elapsed.num_minutes())
    } else if elapsed.num_days() < 1 {
        format!("{}h", elapsed.num_hours())
    } else if elapsed.num_weeks() < 1 {
        format!("{}d", elapsed.num_days())
    } else {
        created_at.format("%Y-%m-%d").to_string()
    }
}
