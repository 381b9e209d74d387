//! Raw records as the backend returns them.
//!
//! Every field except the post id is optional; the backend omits or nulls
//! fields freely and the view models fill in defaults.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier the backend sends either as a number or a string
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub followers_count: Option<u64>,
    #[serde(default)]
    pub following_count: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MusicRecord {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub music_name: Option<String>,
    #[serde(default)]
    pub singer: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct HashtagRecord {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PostRecord {
    pub id: RecordId,
    /// Media file URL
    #[serde(default)]
    pub post: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub user: Option<UserRecord>,
    #[serde(default)]
    pub music: Option<MusicRecord>,
    #[serde(default)]
    pub likes_count: Option<u64>,
    #[serde(default)]
    pub comments_count: Option<u64>,
    #[serde(default)]
    pub hashtags: Option<Vec<HashtagRecord>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub views: Option<Value>,
}

/// Tokens returned by the login endpoint
#[derive(Clone, Debug, Deserialize)]
pub struct TokenPair {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// Registration payload for `POST /users/`
#[derive(Clone, Debug, Serialize)]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Keys list endpoints wrap their array under when they do not answer with a bare array
const LIST_KEYS: [&str; 3] = ["results", "posts", "data"];

/// Pull the record array out of a list response.
///
/// Accepts a bare array or an object with the array under one of
/// `results`, `posts`, `data`. Anything else is an empty list.
pub fn extract_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => LIST_KEYS
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Deserialize every element of a list response, skipping malformed entries
pub fn parse_list<T: serde::de::DeserializeOwned>(value: Value) -> Vec<T> {
    extract_list(value)
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed record");
                None
            }
        })
        .collect()
}
