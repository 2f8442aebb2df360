//! Token frequency tables ("wordlists") built from one corpus.
//!
//! On disk a wordlist is one `token<TAB>count` pair per line. Tokens are
//! keyed through [`normalize`] (NFC, lowercase), the same form the labelling
//! side looks them up in.
use ahash::AHashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use crate::error::{LidError, Result};
use crate::utils::normalize;

/// Immutable token -> count mapping with a cached total.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    counts: AHashMap<String, u64>,
    total: u64,
}

impl FrequencyTable {
    /// Build a table from pre-counted pairs. Repeated tokens accumulate.
    pub fn from_counts<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let mut counts: AHashMap<String, u64> = AHashMap::new();
        for (token, count) in pairs {
            add_count(&mut counts, normalize(token.as_ref()), count)?;
        }
        Self::with_counts(counts)
    }

    /// Count raw tokens, skipping ones that start with punctuation or are
    /// all digits.
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counts: AHashMap<String, u64> = AHashMap::new();
        for token in tokens {
            let token = token.as_ref();
            if good_token(token) {
                add_count(&mut counts, normalize(token), 1)?;
            }
        }
        Self::with_counts(counts)
    }

    /// Count whitespace-separated tokens of a plain text stream.
    pub fn from_text<R: BufRead>(mut reader: R) -> Result<Self> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| LidError::io("<text>", e))?;
        Self::from_tokens(text.split_whitespace())
    }

    /// Parse `token<TAB>count` lines. Blank lines are skipped.
    pub fn load_counts<R: BufRead>(reader: R) -> Result<Self> {
        let mut counts: AHashMap<String, u64> = AHashMap::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| LidError::io("<wordlist>", e))?;
            if line.trim().is_empty() {
                continue;
            }
            let bad = || LidError::BadCountLine {
                line: idx + 1,
                content: line.to_string(),
            };
            let (word, count) = line.split_once('\t').ok_or_else(bad)?;
            let count: u64 = count.trim().parse().map_err(|_| bad())?;
            add_count(&mut counts, normalize(word), count)?;
        }
        Self::with_counts(counts)
    }

    fn with_counts(counts: AHashMap<String, u64>) -> Result<Self> {
        let mut total = 0u64;
        for (token, &count) in &counts {
            total = total
                .checked_add(count)
                .ok_or_else(|| LidError::CountOverflow(token.clone()))?;
        }
        Ok(Self { counts, total })
    }

    /// Open and parse a wordlist file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| LidError::io(path, e))?;
        let table = Self::load_counts(BufReader::new(file))?;
        tracing::debug!(
            path = %path.display(),
            types = table.len(),
            tokens = table.total(),
            "loaded wordlist"
        );
        Ok(table)
    }

    /// Count for a token, zero when absent.
    pub fn count(&self, token: &str) -> u64 {
        self.counts.get(token).copied().unwrap_or(0)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.counts.contains_key(token)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Entries sorted by count descending, ties by token.
    pub fn most_common(&self) -> Vec<(&str, u64)> {
        let mut items: Vec<_> = self.iter().collect();
        items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        items
    }

    /// Write the table in wordlist format, most common first.
    pub fn write_counts<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        for (word, count) in self.most_common() {
            writeln!(out, "{}\t{}", word, count)?;
        }
        Ok(())
    }
}

fn add_count(counts: &mut AHashMap<String, u64>, token: String, count: u64) -> Result<()> {
    let current = counts.get(&token).copied().unwrap_or(0);
    match current.checked_add(count) {
        Some(next) => {
            counts.insert(token, next);
            Ok(())
        }
        None => Err(LidError::CountOverflow(token)),
    }
}

/// Whether a token belongs in a wordlist at all.
fn good_token(token: &str) -> bool {
    match token.chars().next() {
        None => false,
        Some(first) => {
            !first.is_ascii_punctuation() && !token.chars().all(|c| c.is_ascii_digit())
        }
    }
}
