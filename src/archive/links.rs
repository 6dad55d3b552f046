use crate::archive::document::{ArchivePage, element_text, surrounding_text};

/// A thread-entry anchor as found on the page, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadLink {
    /// Raw, usually relative, href.
    pub href: String,
    /// Anchor text, used as the subject.
    pub subject: String,
    /// Text rendered around the anchor, used as the date candidate.
    pub context_text: String,
}

/// Collect thread-entry anchors in document order. Repeated hrefs are kept;
/// their position matters to the thread reconstructor and to seq ids.
pub fn extract_thread_links(page: &ArchivePage<'_>) -> Vec<ThreadLink> {
    page.thread_anchors()
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            Some(ThreadLink {
                href: href.to_string(),
                subject: element_text(anchor),
                context_text: surrounding_text(anchor),
            })
        })
        .collect()
}
