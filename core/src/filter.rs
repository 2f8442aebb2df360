//! Token filter: decides which tokens carry no language signal.
use once_cell::sync::Lazy;
use regex::Regex;

/// Tag value meaning "no tag supplied"; disables the tag-prefix check.
pub const NO_TAG: &str = "null";

/// Tag prefixes that still take part in LID when tags are supplied
/// (laughter and onomatopoeia).
pub const ALLOWED_TAG_PREFIXES: [&str; 2] = ["ja", "ha"];

/// Lowercased tokens never classified (retweet markers).
pub const BAD_TOKENS: [&str; 1] = ["rt"];

static NUMBER_LIKE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9]+\.?[0-9]*|\.[0-9]+)$").expect("valid number pattern"));

/// Return whether a token's LID should be ignored.
///
/// `tag` is the per-token tag from an upstream tokenizer, or `None`/[`NO_TAG`]
/// when tags are not available.
pub fn non_lid(token: &str, tag: Option<&str>) -> bool {
    all_punctuation(token)
        || NUMBER_LIKE.is_match(token)
        || disallowed_tag(tag)
        || BAD_TOKENS.contains(&token.to_lowercase().as_str())
}

fn all_punctuation(token: &str) -> bool {
    token.chars().all(|c| c.is_ascii_punctuation())
}

fn disallowed_tag(tag: Option<&str>) -> bool {
    match tag {
        None => false,
        Some(t) if t == NO_TAG => false,
        Some(t) => {
            let prefix: String = t.chars().take(2).collect();
            !ALLOWED_TAG_PREFIXES.contains(&prefix.as_str())
        }
    }
}
