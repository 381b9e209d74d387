//! Discover, Create, Inbox and Profile screens

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Padding, Paragraph, Wrap},
    Frame,
};

use crate::model::{
    display_name, hashtag_label, sound_label, user_handle, DiscoverTab, InboxTab, LoadStatus,
    ProfileTab, RecordingMode, RenderState, UploadForm,
};
use super::utils::{compact_count, render_scrollable_list, render_status_message, truncate_string};

fn tab_line<T: Copy + PartialEq>(tabs: &[T], active: T, label: impl Fn(T) -> &'static str) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, tab) in tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let style = if *tab == active {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(label(*tab).to_string(), style));
    }
    Line::from(spans)
}

fn selectable(text: String, selected: bool) -> ListItem<'static> {
    let style = if selected {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    ListItem::new(text).style(style)
}

// ============================================================================
// Discover
// ============================================================================

pub fn render_discover(frame: &mut Frame, area: Rect, state: &RenderState) {
    let discover = &state.discover;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search input
            Constraint::Length(1), // Tabs
            Constraint::Min(0),    // Results
        ])
        .split(area);

    let search_style = if discover.editing {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    };
    let search_text = match (discover.query.is_empty(), discover.editing) {
        (true, false) => "Press / to search".to_string(),
        (_, true) => format!("{}▏", discover.query),
        (false, false) => discover.query.clone(),
    };
    let search = Paragraph::new(search_text).style(search_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .padding(Padding::horizontal(1))
            .border_style(search_style),
    );
    frame.render_widget(search, chunks[0]);

    frame.render_widget(
        Paragraph::new(tab_line(&DiscoverTab::ALL, discover.tab, DiscoverTab::label)),
        chunks[1],
    );

    let block = Block::default().padding(Padding::uniform(1));
    match &discover.status {
        LoadStatus::Loading | LoadStatus::Idle => {
            render_status_message(frame, chunks[2], "Loading...", Color::Yellow, None, block);
            return;
        }
        LoadStatus::Failed(message) => {
            render_status_message(frame, chunks[2], message, Color::LightRed, Some("[r] Try again"), block);
            return;
        }
        LoadStatus::Loaded => {}
    }

    let width = chunks[2].width.saturating_sub(4) as usize;
    let selected = discover.selected;
    let items: Vec<ListItem> = match discover.tab {
        DiscoverTab::Top | DiscoverTab::Videos => discover
            .posts
            .iter()
            .filter(|p| discover.tab == DiscoverTab::Top || p.is_video())
            .enumerate()
            .map(|(i, post)| {
                let text = format!(
                    "{} {}  {}  ♥ {}",
                    post.media_type.badge(),
                    post.author_handle,
                    post.caption,
                    compact_count(post.like_count)
                );
                selectable(truncate_string(&text, width), i == selected)
            })
            .collect(),
        DiscoverTab::Users => discover
            .users
            .iter()
            .enumerate()
            .map(|(i, user)| {
                let text = format!("{}  {}", user_handle(user), display_name(user));
                selectable(truncate_string(&text, width), i == selected)
            })
            .collect(),
        DiscoverTab::Sounds => discover
            .sounds
            .iter()
            .enumerate()
            .map(|(i, music)| selectable(truncate_string(&format!("♫ {}", sound_label(music)), width), i == selected))
            .collect(),
        DiscoverTab::Hashtags => discover
            .hashtags
            .iter()
            .enumerate()
            .map(|(i, tag)| selectable(truncate_string(&hashtag_label(tag), width), i == selected))
            .collect(),
        DiscoverTab::Live => Vec::new(),
    };

    if items.is_empty() {
        let message = match (discover.tab, discover.searched.as_deref()) {
            (DiscoverTab::Live, _) => "Nobody is live right now".to_string(),
            (_, Some(query)) => format!("No results for \"{}\"", query),
            _ => "Nothing here yet".to_string(),
        };
        render_status_message(frame, chunks[2], &message, Color::DarkGray, None, block);
        return;
    }

    render_scrollable_list(frame, chunks[2], items, selected, block);
}

// ============================================================================
// Create
// ============================================================================

pub fn render_create(frame: &mut Frame, area: Rect, state: &RenderState) {
    let create = &state.create;
    let mut constraints: Vec<Constraint> = UploadForm::LABELS.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Length(2)); // Recording modes
    constraints.push(Constraint::Min(0)); // Hint

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(area);

    for (i, label) in UploadForm::LABELS.iter().enumerate() {
        let focused = i == create.field;
        let border_style = if focused {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let value = create.form.field(i);
        let text = if focused { format!("{}▏", value) } else { value.to_string() };
        let input = Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", label))
                .padding(Padding::horizontal(1))
                .border_style(border_style),
        );
        frame.render_widget(input, chunks[i]);
    }

    let modes = tab_line(&RecordingMode::ALL, create.mode, RecordingMode::label);
    frame.render_widget(
        Paragraph::new(modes).alignment(ratatui::layout::Alignment::Center),
        chunks[UploadForm::LABELS.len()],
    );

    let hint = if create.submitting {
        Line::styled("Uploading...", Style::default().fg(Color::Yellow))
    } else {
        Line::styled(
            "↑/↓ field  ←/→ length  Enter post  Esc cancel",
            Style::default().fg(Color::DarkGray),
        )
    };
    frame.render_widget(Paragraph::new(hint), chunks[UploadForm::LABELS.len() + 1]);
}

// ============================================================================
// Inbox
// ============================================================================

pub fn render_inbox(frame: &mut Frame, area: Rect, state: &RenderState) {
    let inbox = &state.inbox;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let tabs = [InboxTab::AllActivity, InboxTab::Messages];
    frame.render_widget(
        Paragraph::new(tab_line(&tabs, inbox.tab, InboxTab::label))
            .alignment(ratatui::layout::Alignment::Center),
        chunks[0],
    );

    let items: Vec<ListItem> = match inbox.tab {
        InboxTab::AllActivity => inbox
            .activities
            .iter()
            .enumerate()
            .map(|(i, activity)| {
                let text = format!(
                    "{} {} {}  · {}",
                    activity.kind.icon(),
                    activity.username,
                    activity.message,
                    activity.time
                );
                selectable(text, i == inbox.selected)
            })
            .collect(),
        InboxTab::Messages => inbox
            .messages
            .iter()
            .enumerate()
            .map(|(i, message)| {
                let dot = if message.unread { "● " } else { "  " };
                let text = format!("{}{}: {}  · {}", dot, message.username, message.message, message.time);
                selectable(text, i == inbox.selected)
            })
            .collect(),
    };

    render_scrollable_list(frame, chunks[1], items, inbox.selected, Block::default().padding(Padding::horizontal(1)));
}

// ============================================================================
// Profile
// ============================================================================

pub fn render_profile(frame: &mut Frame, area: Rect, state: &RenderState) {
    let profile = &state.profile;
    let block = Block::default().padding(Padding::uniform(1));

    match &profile.status {
        LoadStatus::Loading | LoadStatus::Idle => {
            render_status_message(frame, area, "Loading profile...", Color::White, None, block);
            return;
        }
        LoadStatus::Failed(message) => {
            render_status_message(
                frame,
                area,
                message,
                Color::LightRed,
                Some("[r] Retry   [Enter] Log in"),
                block,
            );
            return;
        }
        LoadStatus::Loaded => {}
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Identity + stats
            Constraint::Length(1), // Tabs
            Constraint::Min(0),    // Grid
        ])
        .split(area);

    let user = profile.user.clone().unwrap_or_default();
    let name = match (user.first_name.as_deref(), user.last_name.as_deref()) {
        (Some(first), Some(last)) if !first.is_empty() && !last.is_empty() => format!("{} {}", first, last),
        _ => display_name(&user),
    };
    let stat = |value: Option<u64>, label: &str| {
        vec![
            Span::styled(
                value.map(compact_count).unwrap_or_else(|| "0".to_string()),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}   ", label), Style::default().fg(Color::DarkGray)),
        ]
    };
    let mut stats = stat(user.following_count, "Following");
    stats.extend(stat(user.followers_count, "Followers"));

    let identity = vec![
        Line::styled(user_handle(&user), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Line::raw(name),
        Line::from(stats),
        Line::styled(user.bio.clone().unwrap_or_default(), Style::default().fg(Color::Gray)),
        Line::styled("[o] Log out  [r] Refresh", Style::default().fg(Color::DarkGray)),
    ];
    frame.render_widget(
        Paragraph::new(identity)
            .alignment(ratatui::layout::Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[0],
    );

    let tabs = [ProfileTab::Videos, ProfileTab::Liked, ProfileTab::Saved];
    frame.render_widget(
        Paragraph::new(tab_line(&tabs, profile.tab, ProfileTab::label))
            .alignment(ratatui::layout::Alignment::Center),
        chunks[1],
    );

    // Liked and saved come from this session's feed interaction
    let rows: Vec<String> = match profile.tab {
        ProfileTab::Videos => profile
            .tiles
            .iter()
            .map(|tile| format!("▶ {}  ·  {}  ·  {} views", tile.id, tile.duration, tile.views))
            .collect(),
        ProfileTab::Liked => state
            .feed
            .entries()
            .iter()
            .filter(|e| e.playback.liked)
            .map(|e| format!("♥ {}  {}", e.post.author_handle, e.post.caption))
            .collect(),
        ProfileTab::Saved => state
            .feed
            .entries()
            .iter()
            .filter(|e| e.playback.saved)
            .map(|e| format!("★ {}  {}", e.post.author_handle, e.post.caption))
            .collect(),
    };

    if rows.is_empty() {
        let message = match profile.tab {
            ProfileTab::Videos => "No videos yet",
            ProfileTab::Liked => "Videos you like will show up here",
            ProfileTab::Saved => "Videos you save will show up here",
        };
        render_status_message(frame, chunks[2], message, Color::DarkGray, None, block);
        return;
    }

    let width = chunks[2].width.saturating_sub(4) as usize;
    let lines: Vec<Line> = rows.iter().map(|r| Line::raw(truncate_string(r, width))).collect();
    frame.render_widget(Paragraph::new(lines).block(block), chunks[2]);
}
