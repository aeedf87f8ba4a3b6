use crate::types::Post;
use crate::utils::strip_html;

/// Average reading speed used for estimates.
pub const WORDS_PER_MINUTE: u32 = 200;

/// Estimate reading time in whole minutes for a post's content.
///
/// Counts whitespace-delimited words across every section heading and body
/// segment (tags are stripped first since those fields hold HTML), divides by
/// `WORDS_PER_MINUTE` and rounds up. Non-empty content never estimates below
/// one minute; a post with no words estimates zero.
pub fn estimate(post: &Post) -> u32 {
    let mut word_count = 0;
    for section in &post.content {
        word_count += count_words(&strip_html(&section.heading));
        for segment in &section.body {
            word_count += count_words(&strip_html(&segment.text));
        }
    }
    estimate_words(word_count)
}

/// Estimate from an already-computed word count.
pub fn estimate_words(word_count: usize) -> u32 {
    if word_count == 0 {
        return 0;
    }
    ((word_count as f64 / WORDS_PER_MINUTE as f64).ceil() as u32).max(1)
}

fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
