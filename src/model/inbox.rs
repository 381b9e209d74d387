//! Inbox sample data. There is no messaging backend; the inbox is static.

#[derive(Clone, Debug)]
pub struct InboxMessage {
    pub id: &'static str,
    pub username: &'static str,
    pub message: &'static str,
    pub time: &'static str,
    pub unread: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivityKind {
    Like,
    Follow,
    Comment,
}

impl ActivityKind {
    pub fn icon(self) -> &'static str {
        match self {
            ActivityKind::Like => "♥",
            ActivityKind::Follow => "+",
            ActivityKind::Comment => "💬",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Activity {
    pub id: &'static str,
    pub kind: ActivityKind,
    pub username: &'static str,
    pub message: &'static str,
    pub time: &'static str,
}

pub fn sample_messages() -> Vec<InboxMessage> {
    vec![
        InboxMessage {
            id: "1",
            username: "@jamil_kandimov",
            message: "Assalomu alaykum ustoz",
            time: "2 daqiqa",
            unread: true,
        },
        InboxMessage {
            id: "2",
            username: "@aziz_fitnes",
            message: "Obuna bo‘lganing uchun rahmat!",
            time: "1 soat",
            unread: false,
        },
        InboxMessage {
            id: "3",
            username: "@dilnoza_taomlar",
            message: "Retseptini ulashasanmi? 😍",
            time: "3 soat",
            unread: true,
        },
        InboxMessage {
            id: "4",
            username: "@oshpaz_sardor",
            message: "Hamkorlik qilamizmi? Menga yoz! 📩",
            time: "1 kun",
            unread: true,
        },
    ]
}

pub fn sample_activities() -> Vec<Activity> {
    vec![
        Activity {
            id: "1",
            kind: ActivityKind::Like,
            username: "@travel_blogger",
            message: "liked your video",
            time: "5m",
        },
        Activity {
            id: "2",
            kind: ActivityKind::Follow,
            username: "@fitness_guru",
            message: "started following you",
            time: "15m",
        },
        Activity {
            id: "3",
            kind: ActivityKind::Comment,
            username: "@makeup_artist",
            message: "commented: \"Amazing tutorial! 💄\"",
            time: "1h",
        },
    ]
}

pub fn unread_count(messages: &[InboxMessage]) -> usize {
    messages.iter().filter(|m| m.unread).count()
}
