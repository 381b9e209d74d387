//! Navigation-related controller methods (screens, discover, profile)

use crate::model::{
    DiscoverTab, HashtagRecord, LoadStatus, MusicRecord, Post, ProfileTile, Screen, UserRecord,
};
use super::AppController;

/// Rows fetched for one discover tab
enum DiscoverPayload {
    Posts(Vec<Post>),
    Users(Vec<UserRecord>),
    Sounds(Vec<MusicRecord>),
    Hashtags(Vec<HashtagRecord>),
    Nothing,
}

impl AppController {
    /// Show `screen`, starting its first load when it has no data yet
    pub async fn open_screen(&self, screen: Screen) {
        let model = self.model.lock().await;
        model.set_screen(screen).await;

        let needs_load = match screen {
            Screen::Home => model.home.lock().await.status == LoadStatus::Idle,
            Screen::Discover => model.discover.lock().await.status == LoadStatus::Idle,
            Screen::Profile => model.profile.lock().await.status == LoadStatus::Idle,
            _ => false,
        };
        drop(model);

        if needs_load {
            match screen {
                Screen::Home => self.spawn_feed_load(),
                Screen::Discover => self.spawn_discover_load(),
                Screen::Profile => self.spawn_profile_load(),
                _ => {}
            }
        }
    }

    pub async fn cycle_screen_forward(&self) {
        let screen = self.model.lock().await.current_screen().await;
        self.open_screen(screen.next()).await;
    }

    pub async fn cycle_screen_backward(&self) {
        let screen = self.model.lock().await.current_screen().await;
        self.open_screen(screen.prev()).await;
    }

    // ========================================================================
    // Discover
    // ========================================================================

    pub async fn load_discover(&self) {
        let model = self.model.lock().await;
        let ticket = model.begin_load(Screen::Discover).await;
        let (tab, searched) = {
            let mut discover = model.discover.lock().await;
            discover.status = LoadStatus::Loading;
            (discover.tab, discover.searched.clone())
        };
        let client = model.client.clone();
        drop(model);

        tracing::debug!(?tab, query = ?searched, "Loading discover tab");
        let result = match tab {
            DiscoverTab::Top | DiscoverTab::Videos => {
                let records = match searched.as_deref() {
                    Some(query) => client.search_posts(query).await,
                    None => client.fetch_posts().await,
                };
                records.map(|r| DiscoverPayload::Posts(r.iter().map(Post::from_record).collect()))
            }
            DiscoverTab::Users => client.fetch_users().await.map(DiscoverPayload::Users),
            DiscoverTab::Sounds => client.fetch_musics().await.map(DiscoverPayload::Sounds),
            DiscoverTab::Hashtags => client.fetch_hashtags().await.map(DiscoverPayload::Hashtags),
            DiscoverTab::Live => Ok(DiscoverPayload::Nothing),
        };

        let model = self.model.lock().await;
        if !model.accepts(ticket).await {
            return;
        }

        let mut discover = model.discover.lock().await;
        match result {
            Ok(payload) => {
                match payload {
                    DiscoverPayload::Posts(posts) => discover.posts = posts,
                    DiscoverPayload::Users(users) => discover.users = users,
                    DiscoverPayload::Sounds(sounds) => discover.sounds = sounds,
                    DiscoverPayload::Hashtags(hashtags) => discover.hashtags = hashtags,
                    DiscoverPayload::Nothing => {}
                }
                discover.status = LoadStatus::Loaded;
                discover.clamp_selection();
                tracing::info!(?tab, items = discover.item_count(), "Discover tab loaded");
            }
            Err(e) => {
                tracing::error!(?tab, error = %e, "Discover load failed");
                discover.status = LoadStatus::Failed(Self::format_error(&anyhow::Error::from(e)));
            }
        }
    }

    pub fn spawn_discover_load(&self) {
        let controller = self.clone();
        tokio::spawn(async move {
            controller.load_discover().await;
        });
    }

    pub async fn switch_discover_tab(&self, forward: bool) {
        let model = self.model.lock().await;
        {
            let mut discover = model.discover.lock().await;
            let tab = if forward { discover.tab.next() } else { discover.tab.prev() };
            discover.set_tab(tab);
        }
        drop(model);
        self.spawn_discover_load();
    }

    /// Run the typed query; an empty query goes back to the full post list
    pub async fn submit_search(&self) {
        let model = self.model.lock().await;
        {
            let mut discover = model.discover.lock().await;
            discover.editing = false;
            let query = discover.query.trim().to_string();
            discover.searched = (!query.is_empty()).then_some(query);
            if !matches!(discover.tab, DiscoverTab::Top | DiscoverTab::Videos) {
                discover.set_tab(DiscoverTab::Top);
            }
            discover.selected = 0;
        }
        drop(model);
        self.spawn_discover_load();
    }

    // ========================================================================
    // Profile
    // ========================================================================

    /// Load the signed-in user and their posts. Without a token the profile
    /// shows its error view and no request is made.
    pub async fn load_profile(&self) {
        let model = self.model.lock().await;
        let ticket = model.begin_load(Screen::Profile).await;
        model.profile.lock().await.status = LoadStatus::Loading;
        let client = model.client.clone();
        drop(model);

        let result = async {
            let user = client.fetch_me().await?;
            let posts = client.fetch_posts().await?;
            Ok::<_, crate::model::ApiError>((user, posts))
        }
        .await;

        let model = self.model.lock().await;
        if !model.accepts(ticket).await {
            return;
        }

        let mut profile = model.profile.lock().await;
        match result {
            Ok((user, posts)) => {
                tracing::info!(username = ?user.username, videos = posts.len(), "Profile loaded");
                profile.user = Some(user);
                profile.tiles = posts.iter().map(ProfileTile::from_record).collect();
                profile.status = LoadStatus::Loaded;
            }
            Err(e) => {
                tracing::error!(error = %e, "Profile load failed");
                profile.status = LoadStatus::Failed(Self::format_error(&anyhow::Error::from(e)));
            }
        }
    }

    pub fn spawn_profile_load(&self) {
        let controller = self.clone();
        tokio::spawn(async move {
            controller.load_profile().await;
        });
    }

    pub async fn switch_profile_tab(&self, forward: bool) {
        let model = self.model.lock().await;
        let mut profile = model.profile.lock().await;
        profile.tab = if forward { profile.tab.next() } else { profile.tab.prev() };
    }
}
