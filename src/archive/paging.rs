use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::archive::model::{Message, MessagePage};

/// Direction of a navigation over a list's pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Navigation {
    /// Follow "next (older)".
    Older,
    /// Follow "prev (newer)".
    Newer,
    /// Initial load or "latest": start over.
    Latest,
}

/// The page that replaces the held collection, renumbered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub page: MessagePage,
    /// True exactly when the new page has no "next (older)" cursor.
    pub end_reached: bool,
}

/// First seq id of the page that will replace `held`.
pub fn seq_origin(held: &[Message], navigation: Navigation) -> i64 {
    let ids = held.iter().map(|m| m.seq_id);
    match navigation {
        Navigation::Older => ids.max().map_or(0, |max| max + 1),
        Navigation::Newer => ids.min().map_or(0, |min| min - 1),
        Navigation::Latest => 0,
    }
}

/// Combine the held messages with a freshly parsed page.
///
/// Pages are never unioned: the result replaces `held` entirely. Only the
/// numbering continues from it, contiguously and in document order.
pub fn merge_page(held: &[Message], mut page: MessagePage, navigation: Navigation) -> MergeOutcome {
    let origin = seq_origin(held, navigation);
    for (offset, message) in (0_i64..).zip(page.messages.iter_mut()) {
        message.seq_id = origin + offset;
    }

    let end_reached = page.cursors.next_url.is_none();
    debug!(
        ?navigation,
        origin,
        replaced = held.len(),
        count = page.messages.len(),
        end_reached,
        "merged archive page"
    );

    MergeOutcome { page, end_reached }
}
