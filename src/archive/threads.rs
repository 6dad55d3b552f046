//! Two-level thread reconstruction.
//!
//! The archive marks nested replies typographically: the renderer puts a
//! backtick and a space in front of a reply's anchor. Only "root" and
//! "reply of the last root" are distinguished; deeper nesting collapses onto
//! the most recent root.

use tracing::warn;

use crate::archive::model::Message;

/// Text the archive places before a nested reply's anchor.
pub const NESTING_MARKER: &str = "` ";

/// How many characters before an href are searched for the marker.
pub const LOOKBEHIND_CHARS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Root,
    Reply,
}

/// Finds hrefs in the raw page source, moving forward through the document
/// so repeated hrefs map to successive occurrences.
struct HrefLocator<'a> {
    raw: &'a str,
    cursor: usize,
}

impl<'a> HrefLocator<'a> {
    fn new(raw: &'a str) -> Self {
        Self { raw, cursor: 0 }
    }

    fn locate(&mut self, href: &str) -> Option<usize> {
        // attribute values in the source have '&' escaped
        let escaped = href.replace('&', "&amp;");
        let needles = [href, escaped.as_str()];

        let forward = needles.iter().find_map(|needle| {
            self.raw[self.cursor..]
                .find(needle)
                .map(|i| (self.cursor + i, needle.len()))
        });
        let (offset, len) = forward
            .or_else(|| {
                needles
                    .iter()
                    .find_map(|needle| self.raw.find(needle).map(|i| (i, needle.len())))
            })?;

        self.cursor = offset + len;
        Some(offset)
    }
}

/// Placement of an anchor whose href starts at byte `offset` of `raw`.
pub fn placement_at(raw: &str, offset: usize) -> Placement {
    let prefix = &raw[..offset];
    let start = prefix
        .char_indices()
        .rev()
        .nth(LOOKBEHIND_CHARS - 1)
        .map_or(0, |(i, _)| i);

    if prefix[start..].contains(NESTING_MARKER) {
        Placement::Reply
    } else {
        Placement::Root
    }
}

/// Link `messages` (document order, hrefs in `content`) into a two-level
/// forest using the page source `raw`. Fills in `parent` and `replies` and
/// returns the root indices in document order.
pub fn build_forest(messages: &mut [Message], raw: &str) -> Vec<usize> {
    let mut locator = HrefLocator::new(raw);
    let mut roots = Vec::new();
    let mut last_root: Option<usize> = None;

    for idx in 0..messages.len() {
        let placement = match locator.locate(&messages[idx].content) {
            Some(offset) => placement_at(raw, offset),
            None => {
                warn!(
                    href = %messages[idx].content,
                    "href not found in page source, treating as root"
                );
                Placement::Root
            }
        };

        match (placement, last_root) {
            (Placement::Reply, Some(root)) => {
                messages[idx].parent = Some(root);
                messages[root].replies.push(idx);
            }
            _ => {
                roots.push(idx);
                last_root = Some(idx);
            }
        }
    }

    roots
}
