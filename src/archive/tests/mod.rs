use chrono::{TimeZone, Utc};
use std::fs;

use crate::archive::{
    ArchiveContext, MessagePage, Navigation, PageCursors, merge_page, parse_directory,
    parse_message_page,
};

const BASE: &str = "https://lore.kernel.org";

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/archive/tests/fixtures/{name}"))
        .expect("Failed to read test fixture")
}

fn list_page() -> MessagePage {
    parse_message_page(&fixture("list_page.html"), &ArchiveContext::new(BASE, "linux-mm"))
}

fn subjects(page: &MessagePage, indices: &[usize]) -> Vec<String> {
    indices
        .iter()
        .map(|&i| page.messages[i].subject.clone())
        .collect()
}

#[test]
fn test_list_page_messages_in_document_order() {
    let page = list_page();

    assert_eq!(page.len(), 6);
    let seq_ids: Vec<_> = page.messages.iter().map(|m| m.seq_id).collect();
    assert_eq!(seq_ids, [0, 1, 2, 3, 4, 5]);

    let first = &page.messages[0];
    assert_eq!(first.subject, "[PATCH 0/3] mm: convert page cache to folios");
    assert_eq!(first.content, "20240315093012-4242-1-willy@infradead.org/T/#u");
    assert_eq!(
        first.message_id,
        "https://lore.kernel.org/linux-mm/20240315093012-4242-1-willy@infradead.org"
    );
    assert_eq!(first.list, "linux-mm");
    assert!(page.messages.iter().all(|m| m.list == "linux-mm"));
}

#[test]
fn test_list_page_forest() {
    let page = list_page();

    assert_eq!(page.roots, [0, 3, 5]);
    assert_eq!(page.messages[0].replies, [1, 2]);
    assert_eq!(page.messages[3].replies, [4]);
    assert!(page.messages[5].replies.is_empty());
    assert_eq!(page.messages[4].parent, Some(3));
    assert_eq!(
        subjects(&page, &page.messages[0].replies),
        [
            "[PATCH 1/3] mm: add folio_index",
            "[PATCH 2/3] mm: use folio_index in filemap"
        ]
    );
}

#[test]
fn test_list_page_timestamps() {
    let page = list_page();

    // embedded in the href
    assert_eq!(
        page.messages[0].timestamp,
        Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 12).unwrap()
    );
    assert_eq!(
        page.messages[5].timestamp,
        Utc.with_ymd_and_hms(2024, 3, 14, 18, 0, 1).unwrap()
    );
    // rendered next to the entry
    assert_eq!(
        page.messages[3].timestamp,
        Utc.with_ymd_and_hms(2024, 3, 14, 22, 7, 0).unwrap()
    );
    assert_eq!(
        page.messages[4].timestamp,
        Utc.with_ymd_and_hms(2024, 3, 14, 23, 15, 0).unwrap()
    );
}

#[test]
fn test_list_page_cursors() {
    let page = list_page();
    assert_eq!(page.cursors.next_url.as_deref(), Some("?t=20240314180001"));
    assert_eq!(page.cursors.prev_url.as_deref(), Some("?t=20240316000000"));
    assert_eq!(page.cursors.latest_url.as_deref(), Some("./"));

    let ctx = ArchiveContext::new(BASE, "linux-mm");
    assert_eq!(
        ctx.resolve_cursor(page.cursors.next_url.as_deref().unwrap()).as_deref(),
        Some("https://lore.kernel.org/linux-mm/?t=20240314180001")
    );
}

#[test]
fn test_parsing_is_idempotent() {
    assert_eq!(list_page(), list_page());
}

#[test]
fn test_thread_page_overview() {
    let html = fixture("thread_page.html");
    let page = parse_message_page(&html, &ArchiveContext::all(BASE));

    assert_eq!(page.len(), 3);
    assert_eq!(page.roots, [0]);
    assert_eq!(page.messages[0].replies, [1, 2]);
    assert_eq!(
        page.messages[0].message_id,
        "https://lore.kernel.org/all/20240201100000-11-edumazet@google.com"
    );
    assert_eq!(
        page.messages[1].timestamp,
        Utc.with_ymd_and_hms(2024, 2, 1, 11, 12, 0).unwrap()
    );
    assert_eq!(
        page.messages[2].timestamp,
        Utc.with_ymd_and_hms(2024, 2, 2, 8, 40, 0).unwrap()
    );
    assert_eq!(page.cursors, PageCursors::default());
}

#[test]
fn test_nesting_marker_makes_reply() {
    let html = "<pre><a href=\"a@x/T/#u\">A</a>\n` <a href=\"b@x/T/#u\">B</a>\n</pre>";
    let page = parse_message_page(html, &ArchiveContext::new(BASE, "lkml"));

    assert_eq!(page.roots, [0]);
    assert_eq!(page.messages[0].subject, "A");
    assert_eq!(page.messages[0].replies, [1]);
    assert_eq!(page.messages[1].subject, "B");
}

#[test]
fn test_malformed_page_yields_empty_result() {
    let ctx = ArchiveContext::new(BASE, "lkml");
    assert_eq!(parse_message_page("", &ctx), MessagePage::default());
    assert_eq!(parse_message_page("   \n", &ctx), MessagePage::default());
}

#[test]
fn test_index_page() {
    let entries = parse_directory(&fixture("index.html"));
    let pairs: Vec<_> = entries
        .iter()
        .map(|e| (e.name.as_str(), e.description.as_str()))
        .collect();

    assert_eq!(
        pairs,
        [
            ("all", "All of lore.kernel.org"),
            ("bpf", "BPF List"),
            ("bpf", "BPF mirror"),
            ("linux-mm", "Linux memory management"),
            ("lkml", "Linux Kernel Mailing List"),
            ("netdev", "Netdev List"),
        ]
    );
}

#[test]
fn test_paging_through_list() {
    let first = merge_page(&[], list_page(), Navigation::Latest);
    assert!(!first.end_reached);
    assert_eq!(first.page.messages.last().map(|m| m.seq_id), Some(5));

    let older = merge_page(&first.page.messages, list_page(), Navigation::Older);
    let seq_ids: Vec<_> = older.page.messages.iter().map(|m| m.seq_id).collect();
    assert_eq!(seq_ids, [6, 7, 8, 9, 10, 11]);
    // parent/reply indices are untouched by renumbering
    assert_eq!(older.page.roots, [0, 3, 5]);

    let newer = merge_page(&older.page.messages, list_page(), Navigation::Newer);
    assert_eq!(newer.page.messages[0].seq_id, 5);
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_parse_never_panics(html in ".*") {
            let page = parse_message_page(&html, &ArchiveContext::new(BASE, "lkml"));
            for (i, message) in page.messages.iter().enumerate() {
                prop_assert_eq!(message.seq_id, i as i64);
            }
        }

        #[test]
        fn test_seq_ids_follow_anchor_order(
            hrefs in proptest::collection::vec("[a-z0-9@.]{1,12}", 0..8),
            nested in proptest::collection::vec(any::<bool>(), 8),
        ) {
            let body: String = hrefs
                .iter()
                .zip(&nested)
                .map(|(h, &n)| format!("{}<a href=\"{h}/T/#u\">{h}</a>\n", if n { "` " } else { "" }))
                .collect();
            let html = format!("<pre>{body}</pre>");
            let page = parse_message_page(&html, &ArchiveContext::new(BASE, "lkml"));

            prop_assert_eq!(page.len(), hrefs.len());
            let parsed: Vec<_> = page.messages.iter().map(|m| m.content.clone()).collect();
            let expected: Vec<_> = hrefs.iter().map(|h| format!("{h}/T/#u")).collect();
            prop_assert_eq!(parsed, expected);
            for message in &page.messages {
                if let Some(parent) = message.parent {
                    prop_assert!(page.messages[parent].parent.is_none());
                }
            }
        }
    }
}
