#![no_main]

use libfuzzer_sys::fuzz_target;

use lorescope::archive::{ArchiveContext, parse_directory, parse_message_page};

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data);
    let ctx = ArchiveContext::new("https://lore.kernel.org", "lkml");

    // Neither parser may panic, and every reply must hang off a root.
    let page = parse_message_page(&html, &ctx);
    for message in &page.messages {
        if let Some(parent) = message.parent {
            assert!(page.messages[parent].parent.is_none());
        }
    }
    let _ = parse_directory(&html);
});
