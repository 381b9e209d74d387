//! Form state and client-side validation for login, registration and upload

use std::path::PathBuf;

use thiserror::Error;

use super::api_client::UploadRequest;
use super::records::RegistrationRequest;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields")]
    MissingRequired,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,
    #[error("Please enter username and password")]
    MissingCredentials,
    #[error("Please write a caption")]
    MissingCaption,
    #[error("Please choose a photo or video")]
    MissingMedia,
    #[error("Media file not found: {0}")]
    MediaNotFound(String),
}

/// A form whose fields are edited one at a time
pub trait FormFields {
    const FIELD_COUNT: usize;

    fn field_mut(&mut self, index: usize) -> Option<&mut String>;

    fn push_char(&mut self, index: usize, c: char) {
        if let Some(field) = self.field_mut(index) {
            field.push(c);
        }
    }

    fn pop_char(&mut self, index: usize) {
        if let Some(field) = self.field_mut(index) {
            field.pop();
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub const LABELS: [&'static str; 2] = ["Username", "Password"];

    /// Trimmed credentials ready to submit
    pub fn validate(&self) -> Result<(String, String), ValidationError> {
        let username = self.username.trim();
        if username.is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingCredentials);
        }
        Ok((username.to_string(), self.password.clone()))
    }
}

impl FormFields for LoginForm {
    const FIELD_COUNT: usize = 2;

    fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.username),
            1 => Some(&mut self.password),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
}

impl RegisterForm {
    pub const LABELS: [&'static str; 6] = [
        "Username *",
        "Email *",
        "Password *",
        "Confirm password *",
        "First name",
        "Last name",
    ];

    /// Indices of fields rendered masked
    pub const SECRET_FIELDS: [usize; 2] = [2, 3];

    pub fn validate(&self) -> Result<RegistrationRequest, ValidationError> {
        let username = self.username.trim();
        let email = self.email.trim();

        if username.is_empty()
            || email.is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(ValidationError::MissingRequired);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }

        Ok(RegistrationRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
        })
    }

    pub fn field(&self, index: usize) -> &str {
        match index {
            0 => &self.username,
            1 => &self.email,
            2 => &self.password,
            3 => &self.confirm_password,
            4 => &self.first_name,
            5 => &self.last_name,
            _ => "",
        }
    }
}

impl FormFields for RegisterForm {
    const FIELD_COUNT: usize = 6;

    fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.username),
            1 => Some(&mut self.email),
            2 => Some(&mut self.password),
            3 => Some(&mut self.confirm_password),
            4 => Some(&mut self.first_name),
            5 => Some(&mut self.last_name),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct UploadForm {
    pub title: String,
    pub caption: String,
    pub media_path: String,
}

impl UploadForm {
    pub const LABELS: [&'static str; 3] = ["Title", "Caption *", "Media file *"];

    /// The caption is checked first so a missing caption blocks submission
    /// whatever the media field holds.
    pub fn validate(&self) -> Result<UploadRequest, ValidationError> {
        let caption = self.caption.trim();
        if caption.is_empty() {
            return Err(ValidationError::MissingCaption);
        }

        let media = self.media_path.trim();
        if media.is_empty() {
            return Err(ValidationError::MissingMedia);
        }
        let media_path = expand_home(media);
        if !media_path.is_file() {
            return Err(ValidationError::MediaNotFound(media.to_string()));
        }

        let title = match self.title.trim() {
            "" => caption.chars().take(40).collect(),
            title => title.to_string(),
        };

        Ok(UploadRequest {
            title,
            description: caption.to_string(),
            media_path,
        })
    }

    pub fn field(&self, index: usize) -> &str {
        match index {
            0 => &self.title,
            1 => &self.caption,
            2 => &self.media_path,
            _ => "",
        }
    }
}

impl FormFields for UploadForm {
    const FIELD_COUNT: usize = 3;

    fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.title),
            1 => Some(&mut self.caption),
            2 => Some(&mut self.media_path),
            _ => None,
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn filled_registration() -> RegisterForm {
        RegisterForm {
            username: " aziz ".into(),
            email: "aziz@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            first_name: "Aziz".into(),
            last_name: String::new(),
        }
    }

    #[test]
    fn registration_requires_core_fields() {
        let form = RegisterForm {
            email: String::new(),
            ..filled_registration()
        };
        assert_eq!(form.validate().unwrap_err(), ValidationError::MissingRequired);
    }

    #[test]
    fn registration_rejects_mismatched_passwords() {
        let form = RegisterForm {
            confirm_password: "secret2".into(),
            ..filled_registration()
        };
        assert_eq!(form.validate().unwrap_err(), ValidationError::PasswordMismatch);
    }

    #[test]
    fn registration_rejects_short_passwords() {
        let form = RegisterForm {
            password: "abc".into(),
            confirm_password: "abc".into(),
            ..filled_registration()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 characters long");
    }

    #[test]
    fn valid_registration_is_trimmed() {
        let request = filled_registration().validate().unwrap();
        assert_eq!(request.username, "aziz");
        assert_eq!(request.first_name, "Aziz");
    }

    #[test]
    fn login_needs_both_fields() {
        let form = LoginForm { username: "  ".into(), password: "x".into() };
        assert_eq!(form.validate().unwrap_err(), ValidationError::MissingCredentials);
    }

    #[test]
    fn upload_without_caption_is_blocked_even_with_media() {
        let media = NamedTempFile::new().unwrap();
        let form = UploadForm {
            title: "t".into(),
            caption: "   ".into(),
            media_path: media.path().display().to_string(),
        };
        assert_eq!(form.validate().unwrap_err(), ValidationError::MissingCaption);

        let form = UploadForm::default();
        assert_eq!(form.validate().unwrap_err(), ValidationError::MissingCaption);
    }

    #[test]
    fn upload_needs_an_existing_media_file() {
        let form = UploadForm {
            caption: "hello".into(),
            ..UploadForm::default()
        };
        assert_eq!(form.validate().unwrap_err(), ValidationError::MissingMedia);

        let form = UploadForm {
            caption: "hello".into(),
            media_path: "/definitely/not/here.mp4".into(),
            ..UploadForm::default()
        };
        assert!(matches!(form.validate(), Err(ValidationError::MediaNotFound(_))));
    }

    #[test]
    fn upload_title_defaults_to_caption() {
        let media = NamedTempFile::new().unwrap();
        let form = UploadForm {
            title: String::new(),
            caption: "sunset at the lake".into(),
            media_path: media.path().display().to_string(),
        };
        let request = form.validate().unwrap();
        assert_eq!(request.title, "sunset at the lake");
        assert_eq!(request.description, "sunset at the lake");
        assert_eq!(request.media_path, media.path());
    }

    #[test]
    fn field_editing() {
        let mut form = LoginForm::default();
        form.push_char(0, 'a');
        form.push_char(0, 'b');
        form.pop_char(0);
        form.push_char(1, 'x');
        form.push_char(7, 'z');
        assert_eq!(form.username, "a");
        assert_eq!(form.password, "x");
    }
}
