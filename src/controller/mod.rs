//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input,
//! coordinates between the model and view, and runs backend requests.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `feed`: Home feed loading and player interaction
//! - `navigation`: Screen switching, discover and profile loading
//! - `account`: Login, registration, logout and uploads

mod input;
mod feed;
mod navigation;
mod account;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::model::{ApiError, AppModel, ValidationError};

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
}

impl AppController {
    pub fn new(model: Arc<Mutex<AppModel>>) -> Self {
        Self { model }
    }

    pub(crate) fn format_error(error: &anyhow::Error) -> String {
        if let Some(validation) = error.downcast_ref::<ValidationError>() {
            return validation.to_string();
        }

        match error.downcast_ref::<ApiError>() {
            Some(ApiError::Network(e)) if e.is_timeout() => {
                "Request timed out. Check your connection.".to_string()
            }
            Some(ApiError::Network(e)) if e.is_connect() => {
                "Cannot reach the server. Check your connection.".to_string()
            }
            Some(ApiError::Network(_)) => "Failed to fetch data. Check your connection.".to_string(),
            Some(ApiError::Malformed(detail)) => format!("Unexpected server response: {}", detail),
            Some(api_error) => api_error.to_string(),
            None => format!("Error: {}", error),
        }
    }
}
