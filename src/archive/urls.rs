//! URL construction rules of the archive.
//!
//! These must match the archive's own layout exactly; message ids built here
//! are the keys external stores use for favorites and tags.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use url::Url;

/// Owning "list" of search results and standalone thread pages.
pub const ALL_LISTS: &str = "all";

/// Characters left as-is in a search query.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b':');

/// Which archive and which list a page belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveContext {
    base_url: String,
    list: String,
}

impl ArchiveContext {
    pub fn new(base_url: &str, list: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            list: list.trim_matches('/').to_string(),
        }
    }

    /// Context for search results and `/all/` thread pages.
    pub fn all(base_url: &str) -> Self {
        Self::new(base_url, ALL_LISTS)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn list(&self) -> &str {
        &self.list
    }

    pub fn list_url(&self) -> String {
        list_url(&self.base_url, &self.list)
    }

    /// Deterministic key of the message behind `href`.
    pub fn message_id(&self, href: &str) -> String {
        if let Some(absolute) = parse_absolute(href) {
            let path = normalize_path(absolute.path());
            let origin = absolute.origin().ascii_serialization();
            return format!("{origin}/{path}");
        }
        permalink(&self.base_url, &self.list, &normalize_path(href))
    }

    pub fn resolve_cursor(&self, cursor: &str) -> Option<String> {
        resolve_cursor(&self.base_url, &self.list, cursor)
    }
}

// Message ids may contain ':' and would otherwise parse as a URL scheme.
fn parse_absolute(href: &str) -> Option<Url> {
    if href.starts_with("http://") || href.starts_with("https://") {
        Url::parse(href).ok()
    } else {
        None
    }
}

/// `{base}/{list}`
pub fn list_url(base: &str, list: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), list)
}

/// `{base}/{list}/{path}` with slashes trimmed off `path`.
pub fn permalink(base: &str, list: &str, relative_path: &str) -> String {
    format!(
        "{}/{}/{}",
        base.trim_end_matches('/'),
        list,
        relative_path.trim_matches('/')
    )
}

/// Reduce an href to the message's path: fragment, query, `..` segments and
/// the trailing thread-view component (`T` or `t`) are dropped.
pub fn normalize_path(href: &str) -> String {
    let path = href.split(['#', '?']).next().unwrap_or_default();
    let mut segments: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .collect();
    if matches!(segments.last(), Some(&"T") | Some(&"t")) {
        segments.pop();
    }
    segments.join("/")
}

/// Thread id of a message identifier: its last path component when it has
/// one, the identifier itself otherwise.
pub fn thread_id(message_id: &str) -> &str {
    let trimmed = message_id.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some((_, last)) => last,
        None => trimmed,
    }
}

/// `{base}/all/{threadId}/t/`
pub fn thread_url(base: &str, message_id: &str) -> String {
    format!(
        "{}/{}/{}/t/",
        base.trim_end_matches('/'),
        ALL_LISTS,
        thread_id(message_id)
    )
}

/// `{base}/all/?q={query}`, plus `&page={n}` past the first page.
pub fn search_url(base: &str, query: &str, page: u32) -> String {
    let mut url = format!(
        "{}/{}/?q={}",
        base.trim_end_matches('/'),
        ALL_LISTS,
        utf8_percent_encode(query, QUERY_ENCODE_SET)
    );
    if page > 1 {
        url.push_str(&format!("&page={page}"));
    }
    url
}

/// Resolve a pagination cursor against `{base}/{list}/`. Absolute cursors
/// are returned unchanged.
pub fn resolve_cursor(base: &str, list: &str, cursor: &str) -> Option<String> {
    if parse_absolute(cursor).is_some() {
        return Some(cursor.to_string());
    }
    let list_root = Url::parse(&format!("{}/", list_url(base, list))).ok()?;
    list_root.join(cursor).ok().map(String::from)
}
