use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use tracing::debug;

/// `/YYYYMMDDHHMMSS-` as embedded in archive message ids. A relative href
/// starting with the digits counts as preceded by a slash.
static EMBEDDED_TIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|/)(\d{14})-").unwrap());

/// `YYYY-MM-DD HH:MM` as rendered next to entries. The archive pads
/// single-digit hours with a space.
static RENDERED_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4})-(\d{2})-(\d{2})\s+(\d{1,2}):(\d{2})").unwrap()
});

/// Resolve the instant of a message. The timestamp embedded in the href wins
/// over rendered text; when neither yields one the current time is used so a
/// single odd entry never fails the page.
pub fn resolve(href: &str, date_text: &str) -> DateTime<Utc> {
    if let Some(ts) = from_href(href) {
        return ts;
    }
    if let Some(ts) = from_text(date_text) {
        return ts;
    }
    debug!(href, "no timestamp found, using current time");
    Utc::now()
}

pub fn from_href(href: &str) -> Option<DateTime<Utc>> {
    EMBEDDED_TIMESTAMP
        .captures_iter(href)
        .filter_map(|caps| NaiveDateTime::parse_from_str(&caps[1], "%Y%m%d%H%M%S").ok())
        .map(|naive| naive.and_utc())
        .next()
}

pub fn from_text(text: &str) -> Option<DateTime<Utc>> {
    RENDERED_TIMESTAMP.captures_iter(text).find_map(|caps| {
        let field = |i: usize| caps[i].parse::<u32>().ok();
        let year = caps[1].parse::<i32>().ok()?;
        NaiveDate::from_ymd_opt(year, field(2)?, field(3)?)?
            .and_hms_opt(field(4)?, field(5)?, 0)
            .map(|naive| naive.and_utc())
    })
}
