//! Home feed rendering.
//!
//! Every entry is drawn as a full page exactly one viewport tall; the
//! visible part of each intersecting page is cut out with a paragraph scroll.

use std::time::Instant;

use chrono::Utc;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::model::{age_label, FeedEntry, LoadStatus, MediaType, PlaybackPhase, RenderState};
use super::utils::{compact_count, render_status_message, truncate_string};

pub fn render_home(frame: &mut Frame, area: Rect, state: &RenderState, now: Instant) {
    let feed = &state.feed;

    match &state.home.status {
        LoadStatus::Loading | LoadStatus::Idle if feed.is_empty() => {
            render_status_message(frame, area, "Loading videos...", Color::White, None, Block::default());
            return;
        }
        LoadStatus::Failed(message) => {
            render_status_message(
                frame,
                area,
                message,
                Color::LightRed,
                Some("[r] Try again"),
                Block::default(),
            );
            return;
        }
        _ => {}
    }

    if feed.is_empty() {
        render_status_message(
            frame,
            area,
            "No videos available",
            Color::White,
            Some("[r] Refresh"),
            Block::default(),
        );
        return;
    }

    for slice in feed.visible_slices() {
        let entry = &feed.entries()[slice.index];
        let active = feed.active_index() == Some(slice.index);
        let lines = entry_lines(entry, active, feed.height() as usize, area.width as usize, now);

        let slice_area = Rect {
            x: area.x,
            y: area.y + slice.viewport_row as u16,
            width: area.width,
            height: (slice.rows as u16).min(area.height.saturating_sub(slice.viewport_row as u16)),
        };
        let page = Paragraph::new(lines).scroll((slice.skip_rows as u16, 0));
        frame.render_widget(page, slice_area);
    }
}

fn media_indicator(entry: &FeedEntry, now: Instant) -> Line<'static> {
    let playback = &entry.playback;
    if playback.like_pulse_active(now) {
        return Line::styled(
            "♥  ♥  ♥",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        );
    }

    match entry.post.media_type {
        MediaType::Unknown => Line::styled("Unknown media type", Style::default().fg(Color::DarkGray)),
        MediaType::Image => Line::styled("🖼  Photo", Style::default().fg(Color::Gray)),
        MediaType::Video => {
            let text = match (playback.phase, playback.controls_visible(now)) {
                (PlaybackPhase::Playing, true) => "▶",
                (PlaybackPhase::Playing, false) => "",
                (PlaybackPhase::Paused, _) => "⏸",
                (PlaybackPhase::Idle, _) => "▷",
            };
            Line::styled(
                text,
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )
        }
    }
}

fn action_rail(entry: &FeedEntry) -> Vec<Line<'static>> {
    let playback = &entry.playback;
    let post = &entry.post;
    let like_count = post.like_count + u64::from(playback.liked);

    let like_style = if playback.liked {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let save_style = if playback.saved {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    let sound = if playback.muted { "🔇 muted" } else { "🔊" };

    vec![
        Line::styled(format!("♥ {}", compact_count(like_count)), like_style),
        Line::styled(format!("💬 {}", compact_count(post.comment_count)), Style::default().fg(Color::White)),
        Line::styled(if playback.saved { "★ saved" } else { "☆ save" }, save_style),
        Line::styled(sound, Style::default().fg(Color::White)),
    ]
    .into_iter()
    .map(|line| line.alignment(Alignment::Right))
    .collect()
}

fn caption_block(entry: &FeedEntry, width: usize) -> Vec<Line<'static>> {
    let post = &entry.post;
    let mut author = vec![Span::styled(
        post.author_handle.clone(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )];
    if let Some(created) = post.created_at {
        author.push(Span::styled(
            format!(" · {}", age_label(created, Utc::now())),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut lines = vec![
        Line::from(author),
        Line::raw(truncate_string(&post.caption, width)),
    ];
    if !post.hashtags.is_empty() {
        lines.push(Line::styled(
            truncate_string(&post.hashtags.join(" "), width),
            Style::default().fg(Color::Cyan),
        ));
    }
    lines.push(Line::styled(
        truncate_string(&format!("♫ {}", post.sound_label), width),
        Style::default().fg(Color::Gray),
    ));
    lines
}

/// One full page for `entry`, exactly `height` lines tall
pub fn entry_lines(entry: &FeedEntry, active: bool, height: usize, width: usize, now: Instant) -> Vec<Line<'static>> {
    let post = &entry.post;
    let rule_style = if active {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title = format!(" {} {} ", post.media_type.badge(), post.file_name);
    let header = Line::from(vec![
        Span::styled("──", rule_style),
        Span::styled(truncate_string(&title, width.saturating_sub(4)), rule_style),
        Span::styled("─".repeat(width.saturating_sub(title.chars().count() + 2)), rule_style),
    ]);

    let rail = action_rail(entry);
    let caption = caption_block(entry, width.saturating_sub(2));
    let body_rows = height.saturating_sub(1 + caption.len());

    let mut body: Vec<Line<'static>> = vec![Line::raw(""); body_rows];
    if body_rows > 0 {
        let center = body_rows / 2;
        body[center] = media_indicator(entry, now).alignment(Alignment::Center);
        // The rail sits under the indicator when there is room
        let rail_start = (center + 2).min(body_rows.saturating_sub(rail.len()));
        for (offset, line) in rail.into_iter().enumerate() {
            let row = rail_start + offset;
            if row < body_rows && row != center {
                body[row] = line;
            }
        }
    }

    let mut lines = Vec::with_capacity(height);
    lines.push(header);
    lines.extend(body);
    lines.extend(caption);
    lines.truncate(height);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Feed, Post};

    fn feed_with(file: &str) -> Feed {
        let record = serde_json::from_value(serde_json::json!({
            "id": 7,
            "post": file,
            "description": "sunset",
            "likes_count": 1500
        }))
        .unwrap();
        let mut feed = Feed::default();
        feed.resize(12);
        feed.set_posts(vec![Post::from_record(&record)]);
        feed
    }

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn page_fills_the_viewport_exactly() {
        let feed = feed_with("clip.mp4");
        let lines = entry_lines(&feed.entries()[0], true, 12, 40, Instant::now());
        assert_eq!(lines.len(), 12);

        let tiny = entry_lines(&feed.entries()[0], true, 3, 40, Instant::now());
        assert_eq!(tiny.len(), 3);
    }

    #[test]
    fn unknown_media_says_so() {
        let feed = feed_with("clip.xyz");
        let rendered = text(&entry_lines(&feed.entries()[0], true, 16, 40, Instant::now()));
        assert!(rendered.contains("Unknown media type"));
        assert!(rendered.contains("sunset"));
    }

    #[test]
    fn rail_shows_compact_likes() {
        let feed = feed_with("clip.mp4");
        let rendered = text(&entry_lines(&feed.entries()[0], true, 16, 40, Instant::now()));
        assert!(rendered.contains("♥ 1.5K"));
    }
}
