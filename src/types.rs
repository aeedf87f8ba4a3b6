use crate::rich_text::RichTextBlock;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized blog post, ready for presentation.
///
/// `publication_date` is stored locale-independently; formatting for display
/// is applied at render time (see `utils::format_publication_date`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub uid: String,
    pub publication_date: Option<DateTime<Utc>>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub banner: Option<Banner>,
    pub content: Vec<ContentSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub url: String,
}

/// One section of post content. `heading` and `body` segments hold HTML-safe
/// text resolved from the CMS rich-text blocks; ordering is reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSection {
    pub heading: String,
    pub body: Vec<BodySegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySegment {
    pub text: String,
}

/// One page of raw documents from the content source. `next_cursor == None`
/// means the feed is exhausted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<RawDocument>,
    pub next_cursor: Option<String>,
}

/// Raw CMS document envelope as returned by the search API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub first_publication_date: Option<String>,
    #[serde(default)]
    pub data: RawData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawData {
    #[serde(default)]
    pub title: Vec<RichTextBlock>,
    #[serde(default)]
    pub subtitle: Vec<RichTextBlock>,
    #[serde(default)]
    pub author: Vec<RichTextBlock>,
    #[serde(default)]
    pub banner: Option<RawBanner>,
    #[serde(default)]
    pub content: Vec<RawSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBanner {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSection {
    #[serde(default)]
    pub heading: Vec<RichTextBlock>,
    #[serde(default)]
    pub body: Vec<RichTextBlock>,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
    pub follow_redirects: bool,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "cms-feed/0.1".to_string(),
            timeout_seconds: 30,
            max_retries: 3,
            retry_delay_seconds: 5,
            follow_redirects: true,
            max_redirects: 5,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Transient network/auth failure. State is unchanged; the caller may
    /// retry seed/load_next.
    #[error("content source unavailable: {0}")]
    SourceUnavailable(String),

    /// The source returned a page missing required envelope fields.
    #[error("malformed response from content source: {0}")]
    MalformedResponse(String),

    /// A raw document is missing required structured fields or carries an
    /// unparsable value. The whole page fetch is treated as failed.
    #[error("invalid content: {0}")]
    InvalidContent(String),

    #[error("feed is exhausted, no further pages")]
    AlreadyExhausted,

    #[error("another fetch is already in progress for this feed")]
    FetchInProgress,

    #[error("feed has already been seeded")]
    AlreadySeeded,

    #[error("feed has not been seeded yet")]
    NotSeeded,

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        FeedError::SourceUnavailable(err.to_string())
    }
}

impl FeedError {
    /// Whether a retry of the failed call can succeed without upstream fixes.
    pub fn is_transient(&self) -> bool {
        matches!(self, FeedError::SourceUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;
