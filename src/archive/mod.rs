//! Parsing of lore-style archive pages into ordered messages, a two-level
//! thread forest and pagination cursors.
//!
//! Everything here is synchronous and side-effect free: each function takes a
//! page snapshot and returns a new value. Fetching and holding state between
//! navigations is the caller's job (see [`crate::browser`]).

pub mod cursors;
pub mod directory;
pub mod document;
pub mod links;
pub mod model;
pub mod paging;
pub mod threads;
pub mod timestamp;
pub mod urls;

#[cfg(test)]
mod tests;

pub use directory::{parse_directory, parse_mailing_lists};
pub use document::{ArchivePage, ParseError};
pub use model::{ListEntry, MailingList, Message, MessagePage, PageCursors};
pub use paging::{MergeOutcome, Navigation, merge_page};
pub use urls::ArchiveContext;

use tracing::{debug, warn};

/// Parse a list, thread or search page.
///
/// Messages come back in document order with seq ids `0..n`; use
/// [`merge_page`] to continue numbering from previously held messages. A page
/// the HTML adapter rejects is logged and yields an empty result, so callers
/// must not read "no messages" as "the list is empty".
pub fn parse_message_page(html: &str, ctx: &ArchiveContext) -> MessagePage {
    let page = match ArchivePage::parse(html) {
        Ok(page) => page,
        Err(e) => {
            warn!(list = ctx.list(), error = %e, "could not parse archive page");
            return MessagePage::default();
        }
    };

    let mut messages: Vec<Message> = links::extract_thread_links(&page)
        .into_iter()
        .zip(0_i64..)
        .map(|(link, seq_id)| Message {
            timestamp: timestamp::resolve(&link.href, &link.context_text),
            message_id: ctx.message_id(&link.href),
            subject: link.subject,
            content: link.href,
            seq_id,
            parent: None,
            replies: Vec::new(),
            list: ctx.list().to_string(),
        })
        .collect();

    let roots = threads::build_forest(&mut messages, page.raw());
    let cursors = cursors::extract_cursors(&page);

    debug!(
        list = ctx.list(),
        messages = messages.len(),
        roots = roots.len(),
        has_next = cursors.next_url.is_some(),
        "parsed archive page"
    );

    MessagePage {
        messages,
        roots,
        cursors,
    }
}
