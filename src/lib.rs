//! Reader for lore-style public mailing-list archives.
//!
//! [`archive`] turns archive HTML into ordered messages, a two-level thread
//! forest and pagination cursors. [`fetcher`] and [`browser`] are the glue
//! that fetches pages and keeps per-list state between navigations.

pub mod archive;
pub mod browser;
pub mod config;
pub mod fetcher;

pub use archive::{
    ArchiveContext, MailingList, Message, MessagePage, Navigation, PageCursors,
    parse_mailing_lists, parse_message_page,
};
pub use browser::{ArchiveBrowser, BrowseError, ListState};
pub use config::Config;
pub use fetcher::{FetchError, Fetcher, PageSource};
