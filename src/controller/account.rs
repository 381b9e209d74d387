//! Login, registration, logout and uploads.
//!
//! Every form is validated before anything goes over the network; a
//! validation failure surfaces as the error popup and no request is made.

use anyhow::Result;

use crate::model::{AuthMode, LoadStatus, RegistrationRequest, Screen, UploadForm};
use super::AppController;

pub const REGISTERED_NOTICE: &str = "Registration successful! Please login.";
pub const UPLOADED_NOTICE: &str = "Post uploaded!";

/// A validated auth form, ready to send
enum AuthRequest {
    Login { username: String, password: String },
    Register(RegistrationRequest),
}

impl AppController {
    /// Submit whichever auth form is showing
    pub async fn submit_auth(&self) {
        // Check, validate and claim the form under one lock so a second
        // Enter cannot send a duplicate request
        let request = {
            let model = self.model.lock().await;
            let mut auth = model.auth.lock().await;
            if auth.submitting {
                return;
            }
            let validated = match auth.mode {
                AuthMode::Login => auth
                    .login
                    .validate()
                    .map(|(username, password)| AuthRequest::Login { username, password }),
                AuthMode::Register => auth.register.validate().map(AuthRequest::Register),
            };
            match validated {
                Ok(request) => {
                    auth.submitting = true;
                    request
                }
                Err(e) => {
                    drop(auth);
                    model.set_error(Self::format_error(&anyhow::Error::from(e))).await;
                    return;
                }
            }
        };

        let outcome = match request {
            AuthRequest::Login { username, password } => self.login(&username, &password).await,
            AuthRequest::Register(request) => self.register(request).await,
        };

        let model = self.model.lock().await;
        model.auth.lock().await.submitting = false;
        if let Err(e) = outcome {
            let error_msg = Self::format_error(&e);
            model.set_error(error_msg).await;
        }
    }

    async fn login(&self, username: &str, password: &str) -> Result<()> {
        let client = self.model.lock().await.client.clone();

        tracing::debug!(username, "Logging in");
        let tokens = client.login(username, password).await?;
        client.session().set(tokens.access).await?;
        tracing::info!(username, "Logged in");

        let model = self.model.lock().await;
        model.auth.lock().await.login.password.clear();
        // Nothing loaded under a previous account carries over
        model.forget_account().await;
        drop(model);

        self.open_screen(Screen::Home).await;
        Ok(())
    }

    async fn register(&self, request: RegistrationRequest) -> Result<()> {
        let client = self.model.lock().await.client.clone();

        tracing::debug!(username = %request.username, "Registering account");
        let user = client.register(&request).await?;
        tracing::info!(username = ?user.username, "Account registered");

        let model = self.model.lock().await;
        {
            let mut auth = model.auth.lock().await;
            auth.login.username = request.username;
            auth.register = Default::default();
        }
        model.set_screen(Screen::Login).await;
        model.set_notice(REGISTERED_NOTICE.to_string()).await;
        Ok(())
    }

    pub async fn switch_auth_mode(&self) {
        let model = self.model.lock().await;
        let next = match model.auth.lock().await.mode {
            AuthMode::Login => Screen::Register,
            AuthMode::Register => Screen::Login,
        };
        model.set_screen(next).await;
    }

    /// Forget the token and go back to the login screen
    pub async fn logout(&self) {
        let model = self.model.lock().await;
        if let Err(e) = model.session().clear().await {
            tracing::error!(error = %e, "Failed to clear session");
            model.set_error(Self::format_error(&e)).await;
            return;
        }
        model.forget_account().await;
        model.set_screen(Screen::Login).await;
        tracing::info!("Logged out");
    }

    // ========================================================================
    // Create
    // ========================================================================

    pub async fn submit_upload(&self) {
        if let Err(e) = self.upload().await {
            tracing::error!(error = %e, "Upload failed");
            let model = self.model.lock().await;
            model.create.lock().await.submitting = false;
            let error_msg = Self::format_error(&e);
            model.set_error(error_msg).await;
        }
    }

    async fn upload(&self) -> Result<()> {
        let model = self.model.lock().await;
        let request = {
            let mut create = model.create.lock().await;
            if create.submitting {
                return Ok(());
            }
            let request = create.form.validate()?;
            create.submitting = true;
            request
        };
        let client = model.client.clone();
        drop(model);

        tracing::debug!(title = %request.title, path = %request.media_path.display(), "Uploading post");
        client.upload_post(&request).await?;
        tracing::info!(title = %request.title, "Post uploaded");

        let model = self.model.lock().await;
        {
            let mut create = model.create.lock().await;
            create.form = UploadForm::default();
            create.field = 0;
            create.submitting = false;
        }
        // The new post belongs in the feed
        model.home.lock().await.status = LoadStatus::Idle;
        model.set_notice(UPLOADED_NOTICE.to_string()).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tempfile::{NamedTempFile, TempDir};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::Mutex;

    use super::*;
    use crate::model::{ApiClient, AppModel, PlayerTimings, Post, SessionStore};

    /// A controller pointed at a bound listener, so any request would be visible as a connection
    async fn controller_with_listener(dir: &TempDir) -> (AppController, TcpListener) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let session = SessionStore::new(dir.path());
        session.set("token".into()).await.unwrap();
        let client = ApiClient::new(&url, session).unwrap();
        let model = AppModel::new(client, PlayerTimings::default());
        (AppController::new(Arc::new(Mutex::new(model))), listener)
    }

    /// Answer one request with `body` as JSON and hand back its request line
    async fn serve_json_once(body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            let request = String::from_utf8_lossy(&buf[..n]).into_owned();
            request.lines().next().unwrap_or_default().to_string()
        });
        (url, handle)
    }

    fn controller_at(url: &str, session: SessionStore) -> AppController {
        let client = ApiClient::new(url, session).unwrap();
        let model = AppModel::new(client, PlayerTimings::default());
        AppController::new(Arc::new(Mutex::new(model)))
    }

    async fn fill_login(controller: &AppController, username: &str) {
        let model = controller.model.lock().await;
        model.set_screen(Screen::Login).await;
        let mut auth = model.auth.lock().await;
        auth.login.username = username.into();
        auth.login.password = "secret1".into();
    }

    async fn assert_no_connection(listener: &TcpListener) {
        let accepted = tokio::time::timeout(Duration::from_millis(100), listener.accept()).await;
        assert!(accepted.is_err(), "a request reached the backend");
    }

    #[tokio::test]
    async fn mismatched_passwords_never_reach_the_backend() {
        let dir = TempDir::new().unwrap();
        let (controller, listener) = controller_with_listener(&dir).await;
        {
            let model = controller.model.lock().await;
            model.set_screen(Screen::Register).await;
            let mut auth = model.auth.lock().await;
            auth.register.username = "aziz".into();
            auth.register.email = "aziz@example.com".into();
            auth.register.password = "secret1".into();
            auth.register.confirm_password = "secret2".into();
        }

        controller.submit_auth().await;

        assert_no_connection(&listener).await;
        let model = controller.model.lock().await;
        assert_eq!(
            model.get_ui_state().await.error_message.as_deref(),
            Some("Passwords do not match")
        );
        assert!(!model.auth.lock().await.submitting);
    }

    #[tokio::test]
    async fn upload_without_caption_never_reaches_the_backend() {
        let dir = TempDir::new().unwrap();
        let media = NamedTempFile::new().unwrap();
        let (controller, listener) = controller_with_listener(&dir).await;
        {
            let model = controller.model.lock().await;
            let mut create = model.create.lock().await;
            create.form.title = "A title".into();
            create.form.media_path = media.path().display().to_string();
        }

        controller.submit_upload().await;

        assert_no_connection(&listener).await;
        let model = controller.model.lock().await;
        assert_eq!(
            model.get_ui_state().await.error_message.as_deref(),
            Some("Please write a caption")
        );
        assert!(!model.create.lock().await.submitting);
    }

    #[tokio::test]
    async fn logout_clears_the_token() {
        let dir = TempDir::new().unwrap();
        let (controller, _listener) = controller_with_listener(&dir).await;
        controller.model.lock().await.set_screen(Screen::Profile).await;

        controller.logout().await;

        let model = controller.model.lock().await;
        assert!(!model.session().is_authenticated().await);
        assert_eq!(model.current_screen().await, Screen::Login);
    }

    #[tokio::test]
    async fn login_stores_the_token_and_opens_home() {
        let dir = TempDir::new().unwrap();
        let (url, server) = serve_json_once(r#"{"access": "fresh-token", "refresh": "r"}"#).await;
        let controller = controller_at(&url, SessionStore::new(dir.path()));
        fill_login(&controller, "aziz").await;

        controller.submit_auth().await;

        assert_eq!(server.await.unwrap(), "POST /users/token/ HTTP/1.1");
        let model = controller.model.lock().await;
        assert_eq!(model.session().token().await.as_deref(), Some("fresh-token"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("access")).unwrap(),
            "fresh-token"
        );
        assert_eq!(model.current_screen().await, Screen::Home);
        let auth = model.auth.lock().await;
        assert!(!auth.submitting);
        assert!(auth.login.password.is_empty());
    }

    #[tokio::test]
    async fn signing_in_as_someone_else_starts_from_a_clean_feed() {
        let dir = TempDir::new().unwrap();
        let (url, _server) = serve_json_once(r#"{"access": "second-user-token"}"#).await;
        let session = SessionStore::new(dir.path());
        session.set("first-user-token".into()).await.unwrap();
        let controller = controller_at(&url, session);
        {
            let model = controller.model.lock().await;
            model.set_screen(Screen::Home).await;
            let record = serde_json::from_value(serde_json::json!({ "id": 1, "post": "a.mp4" })).unwrap();
            let mut feed = model.feed.lock().await;
            feed.resize(20);
            feed.set_posts(vec![Post::from_record(&record)]);
            feed.toggle_like();
            feed.toggle_save();
            drop(feed);
            model.home.lock().await.status = LoadStatus::Loaded;
        }

        controller.logout().await;
        fill_login(&controller, "bobur").await;
        controller.submit_auth().await;

        let model = controller.model.lock().await;
        assert_eq!(model.session().token().await.as_deref(), Some("second-user-token"));
        let feed = model.feed.lock().await;
        assert!(feed.entries().iter().all(|e| !e.playback.liked && !e.playback.saved));
        assert_ne!(model.home.lock().await.status, LoadStatus::Loaded);
    }

    #[tokio::test]
    async fn second_submit_while_signing_in_sends_nothing() {
        let dir = TempDir::new().unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let controller = controller_at(&url, SessionStore::new(dir.path()));
        fill_login(&controller, "aziz").await;

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit_auth().await }
        });
        // Hold the first request open without answering
        let (_held, _) = listener.accept().await.unwrap();
        assert!(controller.model.lock().await.auth.lock().await.submitting);

        tokio::time::timeout(Duration::from_millis(100), controller.submit_auth())
            .await
            .expect("a pending login should make the second submit return at once");
        assert_no_connection(&listener).await;

        first.abort();
    }
}
