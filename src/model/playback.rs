//! Feed player state.
//!
//! Each feed entry carries its own playback state (phase, mute, like, save,
//! transient controls) and a tap disambiguator. The [`Feed`] container owns
//! the entries in an indexed collection keyed by post id and drives the
//! autoplay rule: the single most visible entry is the active one, and only
//! the active entry may be playing.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::post::Post;

pub const DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(300);
pub const CONTROLS_VISIBLE_FOR: Duration = Duration::from_millis(2000);
pub const LIKE_PULSE_FOR: Duration = Duration::from_millis(800);

/// Share of the viewport an entry must cover to become active
pub const VISIBILITY_THRESHOLD: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlaybackPhase {
    #[default]
    Idle,
    Playing,
    Paused,
}

/// Timer lengths used by the player
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerTimings {
    pub double_tap_window: Duration,
    pub controls_visible_for: Duration,
    pub like_pulse_for: Duration,
}

impl Default for PlayerTimings {
    fn default() -> Self {
        Self {
            double_tap_window: DOUBLE_TAP_WINDOW,
            controls_visible_for: CONTROLS_VISIBLE_FOR,
            like_pulse_for: LIKE_PULSE_FOR,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PlaybackState {
    pub phase: PlaybackPhase,
    pub muted: bool,
    pub liked: bool,
    pub saved: bool,
    controls_until: Option<Instant>,
    like_pulse_until: Option<Instant>,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        self.phase == PlaybackPhase::Playing
    }

    pub fn controls_visible(&self, now: Instant) -> bool {
        self.controls_until.is_some_and(|until| now < until)
    }

    pub fn like_pulse_active(&self, now: Instant) -> bool {
        self.like_pulse_until.is_some_and(|until| now < until)
    }

    fn expire(&mut self, now: Instant) {
        if self.controls_until.is_some_and(|until| now >= until) {
            self.controls_until = None;
        }
        if self.like_pulse_until.is_some_and(|until| now >= until) {
            self.like_pulse_until = None;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapOutcome {
    /// First tap recorded; it becomes a single tap if no second tap follows in the window
    Pending,
    DoubleTap,
}

/// Tells single taps from double taps.
///
/// A second tap strictly inside the window is a double tap. A first tap is
/// only committed as a single tap once the window has fully elapsed.
#[derive(Clone, Debug)]
pub struct TapDisambiguator {
    window: Duration,
    last_tap: Option<Instant>,
}

impl TapDisambiguator {
    pub fn new(window: Duration) -> Self {
        Self { window, last_tap: None }
    }

    pub fn register(&mut self, now: Instant) -> TapOutcome {
        match self.last_tap {
            Some(previous) if now.saturating_duration_since(previous) < self.window => {
                self.last_tap = None;
                TapOutcome::DoubleTap
            }
            _ => {
                self.last_tap = Some(now);
                TapOutcome::Pending
            }
        }
    }

    /// Commit a pending tap whose window has elapsed
    pub fn take_single_tap(&mut self, now: Instant) -> bool {
        match self.last_tap {
            Some(previous) if now.saturating_duration_since(previous) >= self.window => {
                self.last_tap = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.last_tap.is_some()
    }

    pub fn cancel(&mut self) {
        self.last_tap = None;
    }
}

#[derive(Clone, Debug)]
pub struct FeedEntry {
    pub post: Post,
    pub playback: PlaybackState,
    taps: TapDisambiguator,
}

impl FeedEntry {
    fn new(post: Post, timings: &PlayerTimings) -> Self {
        Self {
            post,
            playback: PlaybackState::default(),
            taps: TapDisambiguator::new(timings.double_tap_window),
        }
    }

    /// Only videos have anything to play
    fn activate(&mut self) {
        if self.post.is_video() {
            self.playback.phase = PlaybackPhase::Playing;
        }
    }

    fn deactivate(&mut self) {
        if self.playback.phase == PlaybackPhase::Playing {
            self.playback.phase = PlaybackPhase::Paused;
        }
        self.taps.cancel();
    }

    fn toggle_playback(&mut self, now: Instant, timings: &PlayerTimings) -> bool {
        if !self.post.is_video() {
            return false;
        }
        self.playback.phase = match self.playback.phase {
            PlaybackPhase::Playing => PlaybackPhase::Paused,
            PlaybackPhase::Idle | PlaybackPhase::Paused => PlaybackPhase::Playing,
        };
        self.playback.controls_until = Some(now + timings.controls_visible_for);
        true
    }

    pub fn tap_pending(&self) -> bool {
        self.taps.is_pending()
    }
}

/// Rows of an entry that fall inside the viewport
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibleSlice {
    pub index: usize,
    /// Rows of the entry hidden above the viewport
    pub skip_rows: u32,
    /// First viewport row the entry occupies
    pub viewport_row: u32,
    pub rows: u32,
}

/// Vertically paged list of full-height entries
#[derive(Clone, Debug)]
pub struct Feed {
    entries: Vec<FeedEntry>,
    index: HashMap<String, usize>,
    active: Option<usize>,
    /// Viewport height in rows; every entry is exactly one viewport tall
    height: u32,
    /// Scroll offset in rows from the top of the first entry
    offset: u32,
    focused: bool,
    timings: PlayerTimings,
}

impl Default for Feed {
    fn default() -> Self {
        Self::new(PlayerTimings::default())
    }
}

impl Feed {
    pub fn new(timings: PlayerTimings) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            active: None,
            height: 1,
            offset: 0,
            focused: true,
            timings,
        }
    }

    /// Replace the feed content. Per-entry state starts fresh.
    pub fn set_posts(&mut self, posts: Vec<Post>) {
        self.entries.clear();
        self.index.clear();
        self.active = None;
        self.offset = 0;

        for post in posts {
            if self.index.contains_key(&post.id) {
                tracing::warn!(post_id = %post.id, "Dropping duplicate post in feed");
                continue;
            }
            self.index.insert(post.id.clone(), self.entries.len());
            self.entries.push(FeedEntry::new(post, &self.timings));
        }

        self.update_visibility();
    }

    pub fn entries(&self) -> &[FeedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, post_id: &str) -> Option<&FeedEntry> {
        self.index.get(post_id).map(|&i| &self.entries[i])
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.map(|i| self.entries[i].post.id.as_str())
    }

    pub fn active_entry(&self) -> Option<&FeedEntry> {
        self.active.map(|i| &self.entries[i])
    }

    pub fn playing_count(&self) -> usize {
        self.entries.iter().filter(|e| e.playback.is_playing()).count()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    fn max_offset(&self) -> u32 {
        (self.entries.len().saturating_sub(1) as u32).saturating_mul(self.height)
    }

    // ========================================================================
    // Visibility
    // ========================================================================

    /// Share of the viewport covered by the entry at `index`
    pub fn visible_fraction(&self, index: usize) -> f32 {
        if index >= self.entries.len() {
            return 0.0;
        }
        let top = index as u64 * self.height as u64;
        let bottom = top + self.height as u64;
        let view_top = self.offset as u64;
        let view_bottom = view_top + self.height as u64;

        let overlap = bottom.min(view_bottom).saturating_sub(top.max(view_top));
        overlap as f32 / self.height as f32
    }

    /// Index of the most visible entry at or above the threshold; ties go to the upper entry
    pub fn most_visible(&self) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for index in 0..self.entries.len() {
            let fraction = self.visible_fraction(index);
            if fraction < VISIBILITY_THRESHOLD {
                continue;
            }
            match best {
                Some((_, best_fraction)) if fraction <= best_fraction => {}
                _ => best = Some((index, fraction)),
            }
        }
        best.map(|(index, _)| index)
    }

    /// Recompute the active entry from the scroll position.
    ///
    /// When no entry reaches the threshold the current active entry is kept.
    pub fn update_visibility(&mut self) {
        if let Some(index) = self.most_visible() {
            if self.active != Some(index) {
                self.set_active(index);
            }
        }
    }

    fn set_active(&mut self, index: usize) {
        if let Some(previous) = self.active {
            self.entries[previous].deactivate();
        }
        self.active = Some(index);
        if self.focused {
            self.entries[index].activate();
        }
        tracing::trace!(index, post_id = %self.entries[index].post.id, "Feed entry became active");
    }

    /// Entries intersecting the viewport, top to bottom
    pub fn visible_slices(&self) -> Vec<VisibleSlice> {
        let view_top = self.offset as u64;
        let view_bottom = view_top + self.height as u64;

        (0..self.entries.len())
            .filter_map(|index| {
                let top = index as u64 * self.height as u64;
                let bottom = top + self.height as u64;
                let start = top.max(view_top);
                let end = bottom.min(view_bottom);
                (end > start).then(|| VisibleSlice {
                    index,
                    skip_rows: (start - top) as u32,
                    viewport_row: (start - view_top) as u32,
                    rows: (end - start) as u32,
                })
            })
            .collect()
    }

    // ========================================================================
    // Scrolling
    // ========================================================================

    pub fn scroll_by(&mut self, rows: i64) {
        let target = (self.offset as i64 + rows).clamp(0, self.max_offset() as i64);
        self.offset = target as u32;
        self.update_visibility();
    }

    /// Snap to the entry after the active one
    pub fn next(&mut self) {
        if let Some(active) = self.active {
            let target = (active + 1).min(self.entries.len().saturating_sub(1));
            self.snap_to(target);
        }
    }

    /// Snap to the entry before the active one
    pub fn previous(&mut self) {
        if let Some(active) = self.active {
            self.snap_to(active.saturating_sub(1));
        }
    }

    pub fn snap_to(&mut self, index: usize) {
        if index < self.entries.len() {
            self.offset = index as u32 * self.height;
            self.update_visibility();
        }
    }

    /// Adapt to a new viewport height, keeping the active entry snapped in view
    pub fn resize(&mut self, height: u32) {
        let height = height.max(1);
        if height == self.height {
            return;
        }
        self.height = height;
        match self.active {
            Some(active) => self.snap_to(active),
            None => self.offset = 0,
        }
    }

    /// Pause the active entry while the feed screen is hidden; resume it on return
    pub fn set_focused(&mut self, focused: bool) {
        if self.focused == focused {
            return;
        }
        self.focused = focused;
        if let Some(active) = self.active {
            let entry = &mut self.entries[active];
            if focused {
                entry.activate();
            } else {
                entry.deactivate();
            }
        }
    }

    // ========================================================================
    // Interaction on the active entry
    // ========================================================================

    /// Tap on the active entry's media area
    pub fn tap(&mut self, now: Instant) -> Option<TapOutcome> {
        if !self.focused {
            return None;
        }
        let timings = self.timings;
        let entry = self.active.map(|i| &mut self.entries[i])?;
        let outcome = entry.taps.register(now);
        if outcome == TapOutcome::DoubleTap {
            entry.playback.liked = true;
            entry.playback.like_pulse_until = Some(now + timings.like_pulse_for);
            tracing::debug!(post_id = %entry.post.id, "Double tap liked post");
        }
        Some(outcome)
    }

    /// Advance timers: commit pending single taps and expire transient flags
    pub fn tick(&mut self, now: Instant) {
        let timings = self.timings;
        let active = self.active;
        for (index, entry) in self.entries.iter_mut().enumerate() {
            if entry.taps.take_single_tap(now) && Some(index) == active && self.focused {
                let toggled = entry.toggle_playback(now, &timings);
                tracing::debug!(post_id = %entry.post.id, toggled, phase = ?entry.playback.phase, "Single tap");
            }
            entry.playback.expire(now);
        }
    }

    fn active_mut(&mut self) -> Option<&mut FeedEntry> {
        self.active.map(|i| &mut self.entries[i])
    }

    pub fn toggle_like(&mut self) -> Option<bool> {
        let entry = self.active_mut()?;
        entry.playback.liked = !entry.playback.liked;
        Some(entry.playback.liked)
    }

    pub fn toggle_save(&mut self) -> Option<bool> {
        let entry = self.active_mut()?;
        entry.playback.saved = !entry.playback.saved;
        Some(entry.playback.saved)
    }

    pub fn toggle_mute(&mut self) -> Option<bool> {
        let entry = self.active_mut()?;
        entry.playback.muted = !entry.playback.muted;
        Some(entry.playback.muted)
    }
}
