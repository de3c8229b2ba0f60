//! Estimated reading time for a post.
//!
//! Words are counted by splitting on single spaces with no normalisation, so
//! runs of spaces produce empty tokens that still count, and an empty heading
//! or body counts as one token. The estimate shown on existing pages depends
//! on this exact rule.

use crate::constants::WORDS_PER_MINUTE;
use crate::content::{ContentSection, PostDetail};

/// Tokens in `text` when split on `' '`.
fn count_tokens(text: &str) -> usize {
    text.split(' ').count()
}

/// Word count of one section: its plain-text body plus its heading.
#[must_use]
pub fn section_words(section: &ContentSection) -> usize {
    count_tokens(&section.body_text()) + count_tokens(&section.heading)
}

/// Total word count across all sections.
#[must_use]
pub fn total_words(sections: &[ContentSection]) -> usize {
    sections.iter().map(section_words).sum()
}

/// Estimated reading time in whole minutes, rounded up.
///
/// Returns `None` while there is no post to measure; a post without content
/// sections reads in `Some(0)` minutes.
#[must_use]
pub fn estimate_minutes(post: Option<&PostDetail>) -> Option<usize> {
    post.map(|post| total_words(&post.content).div_ceil(WORDS_PER_MINUTE))
}
