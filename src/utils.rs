//! Presentation-side helpers. `Post` stores locale-independent values;
//! formatting for display happens here, at render time.

use chrono::{DateTime, Utc};

/// Format a publication date for display, e.g. "15 Mar 2021".
pub fn format_publication_date(date: &DateTime<Utc>) -> String {
    date.format("%d %b %Y").to_string()
}

/// Extract clean text content from HTML by dropping tags and collapsing
/// whitespace. Good enough for word counting; not a sanitizer.
pub fn strip_html(html: &str) -> String {
    html.chars()
        .fold((String::new(), false), |(mut text, in_tag), c| match c {
            '<' => (text, true),
            '>' => {
                // Tag boundaries separate words.
                text.push(' ');
                (text, false)
            }
            _ if !in_tag => {
                text.push(c);
                (text, in_tag)
            }
            _ => (text, in_tag),
        })
        .0
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
