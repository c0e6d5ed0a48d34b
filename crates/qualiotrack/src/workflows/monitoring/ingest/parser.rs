use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use feed_rs::model::Entry;
use regex::Regex;
use uuid::Uuid;

use super::FeedRefreshError;

pub(crate) const TITLE_MAX_CHARS: usize = 500;
pub(crate) const LINK_MAX_CHARS: usize = 1000;
const EXTERNAL_ID_MAX_CHARS: usize = 500;

/// Parse the decoded payload as RSS or Atom, retrying once after repairing
/// known non-compliant date formats. The second failure is terminal for the
/// feed.
pub(crate) fn parse_syndication(text: &str) -> Result<feed_rs::model::Feed, FeedRefreshError> {
    match feed_rs::parser::parse(text.as_bytes()) {
        Ok(feed) => Ok(feed),
        Err(first) => {
            let repaired = repair_timezone_suffixes(text);
            feed_rs::parser::parse(repaired.as_bytes())
                .map_err(|_| FeedRefreshError::Parse(first.to_string()))
        }
    }
}

/// Rewrite `Mon, 01 Jan 2024 10:00:00 GMT+00:00` style dates to the RFC 822
/// `GMT` form some sources get wrong.
pub(crate) fn repair_timezone_suffixes(text: &str) -> String {
    timezone_regex().replace_all(text, "$1 GMT").into_owned()
}

fn timezone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\w{3},\s+\d{1,2}\s+\w{3}\s+\d{4}\s+\d{2}:\d{2}:\d{2})\s+GMT\+00:00")
            .expect("static regex compiles")
    })
}

/// Entry reduced to the fields the item store keeps, with bounded lengths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NormalizedEntry {
    pub(crate) external_id: String,
    pub(crate) title: String,
    pub(crate) link: String,
    pub(crate) description: String,
    pub(crate) published: Option<DateTime<Utc>>,
}

/// External id fallback chain: entry id, else link, else title, else a fresh
/// token.
pub(crate) fn normalize_entry(entry: &Entry) -> NormalizedEntry {
    let link = entry
        .links
        .first()
        .map(|link| link.href.clone())
        .unwrap_or_default();
    let title = entry
        .title
        .as_ref()
        .map(|text| text.content.clone())
        .unwrap_or_default();
    let description = entry
        .summary
        .as_ref()
        .map(|text| text.content.clone())
        .unwrap_or_default();

    let external_id = [entry.id.as_str(), link.as_str(), title.as_str()]
        .into_iter()
        .find(|candidate| !candidate.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    NormalizedEntry {
        external_id: clip(&external_id, EXTERNAL_ID_MAX_CHARS),
        title: clip(&title, TITLE_MAX_CHARS),
        link: clip(&link, LINK_MAX_CHARS),
        description,
        published: entry.published,
    }
}

pub(crate) fn clip(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        value.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rss(items: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>Flux</title>{items}</channel></rss>"#
        )
    }

    #[test]
    fn repair_rewrites_gmt_offset_suffix() {
        let raw = "<pubDate>Mon, 15 Jan 2024 08:30:00 GMT+00:00</pubDate>";
        let repaired = repair_timezone_suffixes(raw);
        assert_eq!(repaired, "<pubDate>Mon, 15 Jan 2024 08:30:00 GMT</pubDate>");
    }

    #[test]
    fn repair_leaves_compliant_dates_alone() {
        let raw = "<pubDate>Mon, 15 Jan 2024 08:30:00 GMT</pubDate>";
        assert_eq!(repair_timezone_suffixes(raw), raw);
    }

    #[test]
    fn external_id_prefers_guid_then_link_then_title() {
        let with_guid = rss(
            "<item><guid>abc-1</guid><link>https://example.org/a</link><title>A</title></item>",
        );
        let feed = parse_syndication(&with_guid).expect("feed parses");
        let entry = normalize_entry(&feed.entries[0]);
        assert_eq!(entry.external_id, "abc-1");

        let with_link = rss("<item><link>https://example.org/b</link><title>B</title></item>");
        let feed = parse_syndication(&with_link).expect("feed parses");
        let entry = normalize_entry(&feed.entries[0]);
        assert_eq!(entry.external_id, "https://example.org/b");
        assert_eq!(entry.link, "https://example.org/b");
    }

    #[test]
    fn blank_entry_gets_a_generated_token() {
        let bare = rss("<item><description>sans identifiant</description></item>");
        let feed = parse_syndication(&bare).expect("feed parses");
        let entry = normalize_entry(&feed.entries[0]);
        assert!(!entry.external_id.trim().is_empty());
        assert_eq!(entry.description, "sans identifiant");
    }

    #[test]
    fn clip_bounds_by_characters_not_bytes() {
        let accented = "é".repeat(600);
        let clipped = clip(&accented, TITLE_MAX_CHARS);
        assert_eq!(clipped.chars().count(), TITLE_MAX_CHARS);
    }

    #[test]
    fn mismatched_markup_is_a_terminal_parse_error() {
        let broken =
            r#"<?xml version="1.0"?><rss version="2.0"><channel><item><title>abc</titl></item></channel></rss>"#;
        match parse_syndication(broken) {
            Err(FeedRefreshError::Parse(_)) => {}
            other => panic!("expected parse failure, got {other:?}"),
        }
    }
}
