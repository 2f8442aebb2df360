//! codeswitch-core
//!
//! Word-level language identification for short two-language messages and
//! detection of code-switching between them.
//!
//! The model is a table of per-word log-probability ratios computed from two
//! frequency lists. Tokens are thresholded into either language or "unknown",
//! undecided tokens are optionally attached to their context, and the labels
//! are aggregated into a per-message verdict.
//!
//! Public API:
//! - `FrequencyTable` - token counts loaded from a wordlist
//! - `RatioTable` - smoothed log-probability ratios from two wordlists
//! - `non_lid` - filter for tokens that carry no language signal
//! - `RatioClassifier` - thresholding and per-message aggregation
//! - `resolve` - low-confidence and unknown-word resolution
//! - `Lidder` - model variants selected at construction
//! - `ModelConfig` - TOML model configuration
pub mod error;
pub use error::{LidError, Result};

pub mod wordlist;
pub use wordlist::FrequencyTable;

pub mod ratio;
pub use ratio::RatioTable;

pub mod filter;
pub use filter::{non_lid, NO_TAG};

pub mod classifier;
pub use classifier::{
    cs_langs_present, pick_lang, Classification, ClassifierConfig, Hits, Lang, MessageVerdict,
    RatioClassifier, TokenClassification, MULTIPLE_LANGS, UNKNOWN_LANG,
};

pub mod resolve;
pub use resolve::{choose_lang, choose_unk_langs, LowMethod, ResolvePolicy, Slot, UnkMethod};

pub mod config;
pub use config::ModelConfig;

pub mod lidder;
pub use lidder::{Lidder, ModelKind};

/// Utility helpers.
pub mod utils {
    use crate::error::{LidError, Result};

    /// Normalize a token for lookup: NFC, then lowercase.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().to_lowercase()
    }

    /// Split a `token/tag` pair on the rightmost slash, since tokens may
    /// contain unescaped slashes themselves.
    pub fn split_token(token_tag: &str) -> Result<(&str, &str)> {
        let (token, tag) = token_tag
            .rsplit_once('/')
            .ok_or_else(|| LidError::MalformedToken(token_tag.to_string()))?;
        if token.is_empty() || tag.is_empty() {
            return Err(LidError::MalformedToken(token_tag.to_string()));
        }
        Ok((token, tag))
    }

    /// Split a whole line of `token/tag` pairs into parallel vectors.
    pub fn split_tagged_line(line: &str) -> Result<(Vec<&str>, Vec<&str>)> {
        let pairs = line
            .split_whitespace()
            .map(split_token)
            .collect::<Result<Vec<_>>>()?;
        Ok(pairs.into_iter().unzip())
    }

}
