//! Home feed loading and player interaction

use std::time::Instant;

use crate::model::{LoadStatus, Post, Screen, TapOutcome};

use super::AppController;

impl AppController {
    pub async fn load_feed(&self) {
        let model = self.model.lock().await;
        let ticket = model.begin_load(Screen::Home).await;
        model.home.lock().await.status = LoadStatus::Loading;
        let client = model.client.clone();
        drop(model);

        tracing::debug!("Loading feed");
        let result = client.fetch_posts().await;

        let model = self.model.lock().await;
        if !model.accepts(ticket).await {
            return;
        }

        match result {
            Ok(records) => {
                let posts: Vec<Post> = records.iter().map(Post::from_record).collect();
                tracing::info!(count = posts.len(), "Feed loaded");
                model.feed.lock().await.set_posts(posts);
                model.home.lock().await.status = LoadStatus::Loaded;
            }
            Err(e) => {
                tracing::error!(error = %e, "Feed load failed");
                let error_msg = Self::format_error(&anyhow::Error::from(e));
                model.home.lock().await.status = LoadStatus::Failed(error_msg);
            }
        }
    }

    pub fn spawn_feed_load(&self) {
        let controller = self.clone();
        tokio::spawn(async move {
            controller.load_feed().await;
        });
    }

    /// Press on the active entry's media area
    pub async fn tap_active(&self, now: Instant) {
        let model = self.model.lock().await;
        let mut feed = model.feed.lock().await;
        if let Some(TapOutcome::DoubleTap) = feed.tap(now) {
            tracing::info!(post_id = ?feed.active_id(), "Post liked by double tap");
        }
    }

    pub async fn toggle_like(&self) {
        let model = self.model.lock().await;
        let liked = model.feed.lock().await.toggle_like();
        tracing::debug!(?liked, "Toggled like");
    }

    pub async fn toggle_save(&self) {
        let model = self.model.lock().await;
        let saved = model.feed.lock().await.toggle_save();
        if let Some(saved) = saved {
            let notice = if saved { "Saved to favourites" } else { "Removed from favourites" };
            model.set_notice(notice.to_string()).await;
        }
    }

    pub async fn toggle_mute(&self) {
        let model = self.model.lock().await;
        let muted = model.feed.lock().await.toggle_mute();
        tracing::debug!(?muted, "Toggled mute");
    }

    pub async fn feed_next(&self) {
        let model = self.model.lock().await;
        model.feed.lock().await.next();
    }

    pub async fn feed_previous(&self) {
        let model = self.model.lock().await;
        model.feed.lock().await.previous();
    }

    pub async fn feed_scroll(&self, rows: i64) {
        let model = self.model.lock().await;
        model.feed.lock().await.scroll_by(rows);
    }

    pub async fn toggle_feed_tab(&self) {
        let model = self.model.lock().await;
        let mut home = model.home.lock().await;
        home.tab = home.tab.toggle();
    }

    /// Keep the feed page height in step with the terminal
    pub async fn resize_feed(&self, rows: u16) {
        let model = self.model.lock().await;
        model.feed.lock().await.resize(rows as u32);
    }

    /// Advance per-item timers and expire notices; called once per UI loop pass
    pub async fn tick(&self, now: Instant) {
        let model = self.model.lock().await;
        model.feed.lock().await.tick(now);
        model.auto_clear_old_notices(now).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::Mutex;

    use super::*;
    use crate::model::{ApiClient, AppModel, PlaybackPhase, PlayerTimings, SessionStore};

    async fn controller_for(base_url: &str, dir: &TempDir) -> AppController {
        let client = ApiClient::new(base_url, SessionStore::new(dir.path())).unwrap();
        let model = AppModel::new(client, PlayerTimings::default());
        model.set_screen(Screen::Home).await;
        model.feed.lock().await.resize(20);
        AppController::new(Arc::new(Mutex::new(model)))
    }

    /// Answer a single request with `body` as JSON
    async fn serve_json(body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let _ = socket.read(&mut buf).await.unwrap();
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn loading_the_feed_plays_the_first_video() {
        let dir = TempDir::new().unwrap();
        let url = serve_json(r#"[{"id": 1, "post": "a.mp4"}, {"id": 2, "post": "b.jpg"}]"#).await;
        let controller = controller_for(&url, &dir).await;

        controller.load_feed().await;

        let model = controller.model.lock().await;
        assert_eq!(model.home.lock().await.status, LoadStatus::Loaded);
        let feed = model.feed.lock().await;
        assert_eq!(feed.len(), 2);
        assert_eq!(feed.active_id(), Some("1"));
        assert_eq!(feed.entries()[0].playback.phase, PlaybackPhase::Playing);
        assert_eq!(feed.playing_count(), 1);
    }

    #[tokio::test]
    async fn unreachable_backend_shows_the_error_view() {
        let dir = TempDir::new().unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        let controller = controller_for(&url, &dir).await;

        controller.load_feed().await;

        let model = controller.model.lock().await;
        assert!(matches!(model.home.lock().await.status, LoadStatus::Failed(_)));
        assert!(model.feed.lock().await.is_empty());
    }

    #[tokio::test]
    async fn single_tap_pauses_after_the_window() {
        let dir = TempDir::new().unwrap();
        let url = serve_json(r#"[{"id": 1, "post": "a.mp4"}]"#).await;
        let controller = controller_for(&url, &dir).await;
        controller.load_feed().await;

        let start = Instant::now();
        controller.tap_active(start).await;
        controller.tick(start + Duration::from_millis(100)).await;
        {
            let model = controller.model.lock().await;
            let feed = model.feed.lock().await;
            assert_eq!(feed.entries()[0].playback.phase, PlaybackPhase::Playing);
        }

        controller.tick(start + Duration::from_millis(300)).await;
        let model = controller.model.lock().await;
        let feed = model.feed.lock().await;
        assert_eq!(feed.entries()[0].playback.phase, PlaybackPhase::Paused);
    }
}
