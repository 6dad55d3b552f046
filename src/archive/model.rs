use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A mailing list as listed on the archive's root index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailingList {
    /// Derived from `name`, so the same list always gets the same id.
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Display order of the currently held page, not persisted here.
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Owned by whoever stores user preferences; carried through untouched.
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub favorite: bool,
}

impl MailingList {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: Uuid::new_v5(&Uuid::NAMESPACE_URL, name.as_bytes()),
            name,
            description: description.into(),
            messages: Vec::new(),
            pinned: false,
            favorite: false,
        }
    }
}

/// One thread entry on an archive page.
///
/// `parent` and `replies` are indices into the arena of the
/// [`MessagePage`] (or merged collection) the message lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub subject: String,
    /// Relative href exactly as it appeared on the page.
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub message_id: String,
    pub seq_id: i64,
    pub parent: Option<usize>,
    pub replies: Vec<usize>,
    /// Name of the owning list (`all` for search and thread pages).
    pub list: String,
}

impl Message {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Navigation cursors found on a page. Each is an opaque href, relative or
/// absolute; see [`crate::archive::urls::resolve_cursor`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursors {
    pub next_url: Option<String>,
    pub prev_url: Option<String>,
    pub latest_url: Option<String>,
}

/// Result of parsing one list, thread or search page.
///
/// `messages` is a flat arena in document order; `roots` holds the arena
/// indices of the root messages, also in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePage {
    pub messages: Vec<Message>,
    pub roots: Vec<usize>,
    #[serde(flatten)]
    pub cursors: PageCursors,
}

impl MessagePage {
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Root messages in document order.
    pub fn root_messages(&self) -> impl Iterator<Item = &Message> {
        self.roots.iter().filter_map(|&idx| self.messages.get(idx))
    }

    /// Direct replies of the message at `idx`.
    pub fn replies_of(&self, idx: usize) -> impl Iterator<Item = &Message> {
        self.messages
            .get(idx)
            .into_iter()
            .flat_map(|m| m.replies.iter())
            .filter_map(|&r| self.messages.get(r))
    }

    pub fn find(&self, message_id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.message_id == message_id)
    }
}

/// One `name - description` line of the archive index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntry {
    pub name: String,
    pub description: String,
}

impl From<ListEntry> for MailingList {
    fn from(entry: ListEntry) -> Self {
        MailingList::new(entry.name, entry.description)
    }
}
