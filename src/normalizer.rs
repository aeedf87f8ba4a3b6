use crate::rich_text;
use crate::types::{
    Banner, BodySegment, ContentSection, FeedError, Page, Post, RawDocument, Result,
};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Maps raw CMS documents into the canonical `Post` shape.
///
/// Normalization is deterministic and total over well-formed documents.
/// A document missing required structured fields (`uid`, `title`, `author`)
/// or carrying an unparsable publication date fails with `InvalidContent`
/// rather than silently defaulting, so corrupt entries never reach the feed.
pub struct PostNormalizer;

impl PostNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, raw: &RawDocument) -> Result<Post> {
        let uid = raw
            .uid
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| FeedError::InvalidContent("document is missing uid".to_string()))?
            .to_string();

        if raw.data.title.is_empty() {
            return Err(FeedError::InvalidContent(format!(
                "document {}: missing title",
                uid
            )));
        }
        if raw.data.author.is_empty() {
            return Err(FeedError::InvalidContent(format!(
                "document {}: missing author",
                uid
            )));
        }

        let publication_date = match raw.first_publication_date.as_deref() {
            None => None,
            Some(value) => Some(parse_publication_date(&uid, value)?),
        };

        // Listing documents omit banner and content; those stay optional.
        let banner = raw
            .data
            .banner
            .as_ref()
            .and_then(|b| b.url.clone())
            .map(|url| Banner { url });

        let content = raw
            .data
            .content
            .iter()
            .map(|section| ContentSection {
                heading: rich_text::as_html(&section.heading),
                body: section
                    .body
                    .iter()
                    .map(|block| BodySegment {
                        text: rich_text::block_as_html(block),
                    })
                    .collect(),
            })
            .collect();

        debug!("Normalized document {}", uid);

        Ok(Post {
            uid,
            publication_date,
            title: rich_text::as_text(&raw.data.title),
            subtitle: rich_text::as_text(&raw.data.subtitle),
            author: rich_text::as_text(&raw.data.author),
            banner,
            content,
        })
    }

    /// Normalize every item of a page, in page order. Fails wholesale on the
    /// first bad document so a page is never partially applied.
    pub fn normalize_page(&self, page: &Page) -> Result<Vec<Post>> {
        page.items.iter().map(|raw| self.normalize(raw)).collect()
    }
}

impl Default for PostNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_publication_date(uid: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            FeedError::InvalidContent(format!(
                "document {}: unparsable publication date {:?}: {}",
                uid, value, e
            ))
        })
}
