use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Number of entries the server returns per feed page.
pub const PAGE_SIZE: u32 = 30;

/// A reference to a feed (user, group or service) as embedded in entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FeedRef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Via {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Capability tokens: which actions the current viewer may perform on an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Comment,
    Like,
    Unlike,
    Edit,
    Delete,
}

impl Command {
    pub fn label(&self) -> &'static str {
        match self {
            Command::Comment => "Comment",
            Command::Like => "Like",
            Command::Unlike => "Unlike",
            Command::Edit => "Edit",
            Command::Delete => "Delete",
        }
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "comment" => Ok(Self::Comment),
            "like" => Ok(Self::Like),
            "unlike" => Ok(Self::Unlike),
            "edit" => Ok(Self::Edit),
            "delete" => Ok(Self::Delete),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

/// Decode a list of command tokens, dropping the ones we don't know.
fn deserialize_commands<'de, D>(deserializer: D) -> Result<Vec<Command>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .iter()
        .filter_map(|token| match token.parse() {
            Ok(cmd) => Some(cmd),
            Err(e) => {
                tracing::debug!("dropping command token: {e}");
                None
            }
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealizedComment {
    pub id: String,
    pub body: String,
    pub from: FeedRef,
    pub date: String,
    pub commands: Vec<Command>,
}

/// A comment as displayed under an entry.
///
/// `Placeholder` stands in for a collapsed run of comments that has not been
/// fetched; `Tombstone` marks a deleted comment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "CommentWire")]
pub enum Comment {
    Realized(RealizedComment),
    Placeholder { body: String, num: u32 },
    Tombstone { id: String },
}

impl Comment {
    /// Server id of the comment, if it has one. Placeholders never do.
    pub fn id(&self) -> Option<&str> {
        match self {
            Comment::Realized(c) if !c.id.is_empty() => Some(&c.id),
            Comment::Tombstone { id } if !id.is_empty() => Some(id),
            _ => None,
        }
    }

    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Comment::Placeholder { .. })
    }

    pub const fn is_tombstone(&self) -> bool {
        matches!(self, Comment::Tombstone { .. })
    }
}

#[derive(Deserialize)]
struct CommentWire {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    body: String,
    #[serde(default)]
    from: Option<FeedRef>,
    #[serde(default)]
    date: String,
    #[serde(default, deserialize_with = "deserialize_commands")]
    commands: Vec<Command>,
    #[serde(default)]
    placeholder: bool,
    #[serde(default)]
    num: u32,
    #[serde(default)]
    deleted: bool,
}

impl From<CommentWire> for Comment {
    fn from(wire: CommentWire) -> Self {
        if wire.placeholder {
            return Comment::Placeholder {
                body: wire.body,
                num: wire.num,
            };
        }
        if wire.deleted {
            return Comment::Tombstone {
                id: wire.id.unwrap_or_default(),
            };
        }
        Comment::Realized(RealizedComment {
            id: wire.id.unwrap_or_default(),
            body: wire.body,
            from: wire.from.unwrap_or_default(),
            date: wire.date,
            commands: wire.commands,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "LikeWire")]
pub enum Like {
    Realized { from: FeedRef, date: String },
    Placeholder { body: String, num: u32 },
}

impl Like {
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Like::Placeholder { .. })
    }
}

#[derive(Deserialize)]
struct LikeWire {
    #[serde(default)]
    from: Option<FeedRef>,
    #[serde(default)]
    date: String,
    #[serde(default)]
    placeholder: bool,
    #[serde(default)]
    body: String,
    #[serde(default)]
    num: u32,
}

impl From<LikeWire> for Like {
    fn from(wire: LikeWire) -> Self {
        if wire.placeholder {
            Like::Placeholder {
                body: wire.body,
                num: wire.num,
            }
        } else {
            Like::Realized {
                from: wire.from.unwrap_or_default(),
                date: wire.date,
            }
        }
    }
}

/// One feed item as delivered by the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Entry {
    pub id: String,
    #[serde(default)]
    pub date: String,
    /// Pre-rendered, server-sanitized HTML.
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub from: FeedRef,
    #[serde(default)]
    pub to: Vec<FeedRef>,
    #[serde(default)]
    pub thumbnails: Vec<Thumbnail>,
    #[serde(default)]
    pub via: Option<Via>,
    #[serde(default, deserialize_with = "deserialize_commands")]
    pub commands: Vec<Command>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub likes: Vec<Like>,
}

impl Entry {
    pub fn can(&self, command: Command) -> bool {
        self.commands.contains(&command)
    }

    /// Path of the entry's permalink page.
    pub fn permalink(&self) -> String {
        format!("/e/{}", self.id)
    }
}

/// Pagination markers that accompany every snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Paging {
    pub prev_start: u32,
    pub next_start: u32,
    pub show: bool,
}

impl Paging {
    pub const fn has_prev(&self) -> bool {
        self.show && self.next_start > PAGE_SIZE
    }

    pub const fn has_next(&self) -> bool {
        self.show
    }
}

/// A whole feed page as returned by a poll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "SnapshotWire")]
pub struct FeedSnapshot {
    pub entries: Vec<Entry>,
    pub paging: Paging,
}

#[derive(Deserialize)]
struct SnapshotWire {
    // Required: a payload without a feed is treated as malformed rather
    // than as an empty page.
    feed: FeedWire,
    #[serde(default)]
    prev_start: u32,
    #[serde(default)]
    next_start: u32,
    #[serde(default)]
    show_paging: bool,
}

#[derive(Deserialize)]
struct FeedWire {
    #[serde(default)]
    entries: Vec<Entry>,
}

impl From<SnapshotWire> for FeedSnapshot {
    fn from(wire: SnapshotWire) -> Self {
        FeedSnapshot {
            entries: wire.feed.entries,
            paging: Paging {
                prev_start: wire.prev_start,
                next_start: wire.next_start,
                show: wire.show_paging,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_decodes_entries_and_paging() {
        let snapshot: FeedSnapshot = serde_json::from_value(json!({
            "feed": {
                "entries": [{
                    "id": "e1",
                    "date": "2015-06-01T10:00:00Z",
                    "body": "hello <b>world</b>",
                    "from": {"id": "bob", "name": "Bob", "type": "user"},
                    "commands": ["comment", "like"],
                    "comments": [
                        {"id": "c1", "body": "first", "from": {"id": "al", "name": "Al"}},
                        {"body": "3 more comments", "num": 3, "placeholder": true},
                    ],
                    "likes": [{"from": {"id": "cy", "name": "Cy"}}],
                }]
            },
            "prev_start": 0,
            "next_start": 30,
            "show_paging": true,
        }))
        .unwrap();

        assert_eq!(snapshot.entries.len(), 1);
        let entry = &snapshot.entries[0];
        assert_eq!(entry.from.name, "Bob");
        assert_eq!(entry.commands, vec![Command::Comment, Command::Like]);
        assert!(matches!(&entry.comments[0], Comment::Realized(c) if c.id == "c1"));
        assert_eq!(
            entry.comments[1],
            Comment::Placeholder {
                body: "3 more comments".to_string(),
                num: 3
            }
        );
        assert_eq!(snapshot.paging.next_start, 30);
        assert!(snapshot.paging.show);
        assert!(!snapshot.paging.has_prev());
    }

    #[test]
    fn test_snapshot_without_feed_is_malformed() {
        let result = serde_json::from_value::<FeedSnapshot>(json!({"show_paging": true}));
        assert!(result.is_err());
    }

    #[test]
    fn test_snapshot_with_empty_feed_has_no_entries() {
        let snapshot: FeedSnapshot = serde_json::from_value(json!({"feed": {}})).unwrap();
        assert!(snapshot.entries.is_empty());
    }

    #[test]
    fn test_unknown_commands_are_dropped() {
        let entry: Entry = serde_json::from_value(json!({
            "id": "e1",
            "commands": ["hide", "unlike", "share"],
        }))
        .unwrap();
        assert_eq!(entry.commands, vec![Command::Unlike]);
    }

    #[test]
    fn test_deleted_comment_decodes_as_tombstone() {
        let comment: Comment =
            serde_json::from_value(json!({"id": "c9", "deleted": true, "body": ""})).unwrap();
        assert_eq!(
            comment,
            Comment::Tombstone {
                id: "c9".to_string()
            }
        );
        assert_eq!(comment.id(), Some("c9"));
    }

    #[test]
    fn test_placeholder_has_no_id() {
        let comment: Comment =
            serde_json::from_value(json!({"body": "2 more comments", "placeholder": true}))
                .unwrap();
        assert!(comment.is_placeholder());
        assert_eq!(comment.id(), None);
    }

    #[test]
    fn test_like_placeholder() {
        let like: Like = serde_json::from_value(
            json!({"body": "5 other people", "num": 5, "placeholder": true}),
        )
        .unwrap();
        assert!(like.is_placeholder());
    }

    #[test]
    fn test_paging_prev_only_after_first_page() {
        let first = Paging {
            prev_start: 0,
            next_start: 30,
            show: true,
        };
        let second = Paging {
            prev_start: 0,
            next_start: 60,
            show: true,
        };
        assert!(!first.has_prev());
        assert!(second.has_prev());
        assert!(!Paging::default().has_next());
    }
}
