use tracing::{debug, warn};

use crate::archive::document::ArchivePage;
use crate::archive::model::{ListEntry, MailingList};

const FIELD_SEPARATOR: &str = " - ";

/// Parse the archive's root index into `name - description` entries sorted
/// by name. Duplicates are kept; an unparseable page yields no entries.
pub fn parse_directory(html: &str) -> Vec<ListEntry> {
    let page = match ArchivePage::parse(html) {
        Ok(page) => page,
        Err(e) => {
            warn!(error = %e, "could not parse archive index");
            return Vec::new();
        }
    };

    let mut entries: Vec<ListEntry> = page
        .preformatted()
        .flat_map(|pre| {
            pre.text()
                .collect::<String>()
                .lines()
                .filter_map(parse_line)
                .collect::<Vec<_>>()
        })
        .collect();

    // stable, so duplicate names keep their page order
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(count = entries.len(), "parsed archive index");
    entries
}

/// Same as [`parse_directory`], as fresh [`MailingList`] values.
pub fn parse_mailing_lists(html: &str) -> Vec<MailingList> {
    parse_directory(html).into_iter().map(MailingList::from).collect()
}

fn parse_line(line: &str) -> Option<ListEntry> {
    if line.trim().is_empty() {
        return None;
    }
    let mut fields = line.split(FIELD_SEPARATOR);
    let name = clean_field(fields.next()?);
    let description = clean_field(fields.next()?);
    Some(ListEntry { name, description })
}

fn clean_field(field: &str) -> String {
    field.replace('*', "").trim().to_string()
}
