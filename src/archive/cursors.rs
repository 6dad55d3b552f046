use crate::archive::document::{ArchivePage, element_text};
use crate::archive::model::PageCursors;

const NEXT_CAPTION: &str = "next (older)";
const PREV_CAPTION: &str = "prev (newer)";
const LATEST_CAPTION: &str = "latest";

/// Scan every anchor for the archive's navigation captions. Later anchors
/// overwrite earlier ones; missing captions leave the cursor unset.
pub fn extract_cursors(page: &ArchivePage<'_>) -> PageCursors {
    let mut cursors = PageCursors::default();

    for anchor in page.anchors() {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let caption = element_text(anchor).to_lowercase();

        if caption.contains(NEXT_CAPTION) {
            cursors.next_url = Some(href.to_string());
        }
        if caption.contains(PREV_CAPTION) {
            cursors.prev_url = Some(href.to_string());
        }
        if caption.contains(LATEST_CAPTION) {
            cursors.latest_url = Some(href.to_string());
        }
    }

    cursors
}
