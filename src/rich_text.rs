//! Rich-text resolution for CMS structured text fields.
//!
//! Fields like titles and post bodies arrive as arrays of typed blocks with
//! inline span annotations. Presentation needs either a plain-text form
//! (titles, authors) or an HTML form (headings, body paragraphs), so both
//! resolutions live here rather than being repeated per call site.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextBlock {
    #[serde(rename = "type", default = "default_block_type")]
    pub block_type: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub spans: Vec<RichTextSpan>,
}

/// Inline annotation over a character range of the owning block's text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextSpan {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub span_type: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

fn default_block_type() -> String {
    "paragraph".to_string()
}

/// Resolve blocks to plain text, block texts joined by a single space.
pub fn as_text(blocks: &[RichTextBlock]) -> String {
    blocks
        .iter()
        .map(|b| b.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve blocks to HTML. Block text is escaped; non-overlapping
/// strong/em/hyperlink spans are applied at their character offsets. Spans
/// that overlap an earlier span or fall outside the text are dropped.
pub fn as_html(blocks: &[RichTextBlock]) -> String {
    blocks.iter().map(block_as_html).collect::<Vec<_>>().join("")
}

/// HTML rendering of a single block. Unknown block types render as paragraphs.
pub fn block_as_html(block: &RichTextBlock) -> String {
    let tag = match block.block_type.as_str() {
        "heading1" => "h1",
        "heading2" => "h2",
        "heading3" => "h3",
        "heading4" => "h4",
        "heading5" => "h5",
        "heading6" => "h6",
        "preformatted" => "pre",
        "list-item" | "o-list-item" => "li",
        _ => "p",
    };
    format!("<{}>{}</{}>", tag, render_spans(&block.text, &block.spans), tag)
}

fn render_spans(text: &str, spans: &[RichTextSpan]) -> String {
    let chars: Vec<char> = text.chars().collect();

    // Keep only in-range spans, then drop any that overlap an earlier one.
    let mut candidates: Vec<&RichTextSpan> = spans
        .iter()
        .filter(|s| s.start < s.end && s.end <= chars.len())
        .collect();
    candidates.sort_by_key(|s| (s.start, s.end));

    let mut accepted: Vec<&RichTextSpan> = Vec::new();
    let mut last_end = 0;
    for span in candidates {
        if span.start >= last_end {
            last_end = span.end;
            accepted.push(span);
        }
    }

    let mut out = String::new();
    let mut pos = 0;
    for span in accepted {
        out.push_str(&escape_chars(&chars[pos..span.start]));
        let inner = escape_chars(&chars[span.start..span.end]);
        match span.span_type.as_str() {
            "strong" => out.push_str(&format!("<strong>{}</strong>", inner)),
            "em" => out.push_str(&format!("<em>{}</em>", inner)),
            "hyperlink" => {
                let href = span
                    .data
                    .as_ref()
                    .and_then(|d| d.get("url"))
                    .and_then(|u| u.as_str())
                    .unwrap_or("#");
                out.push_str(&format!("<a href=\"{}\">{}</a>", escape_str(href), inner));
            }
            _ => out.push_str(&inner),
        }
        pos = span.end;
    }
    out.push_str(&escape_chars(&chars[pos..]));
    out
}

fn escape_chars(chars: &[char]) -> String {
    let mut out = String::with_capacity(chars.len());
    for &c in chars {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_str(text: &str) -> String {
    escape_chars(&text.chars().collect::<Vec<_>>())
}
