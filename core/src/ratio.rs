//! Log-probability ratio tables discriminating two languages.
//!
//! For every token seen often enough in either wordlist the table stores
//! `ln P_a(w) / ln P_b(w)`, where both probabilities are Lidstone-smoothed
//! over the union vocabulary of the two wordlists. Words typical of the first
//! language get small ratios, words typical of the second get large ones.
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{LidError, Result};
use crate::wordlist::FrequencyTable;

/// Read-only token -> ratio mapping. Every stored ratio is finite.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatioTable {
    ratios: AHashMap<String, f64>,
}

/// Lidstone-smoothed probability estimate.
fn lidstone(count: u64, smoothing: f64, observations: u64, outcomes: usize) -> f64 {
    (count as f64 + smoothing) / (observations as f64 + smoothing * outcomes as f64)
}

fn log_prob_ratio(prob_a: f64, prob_b: f64) -> f64 {
    prob_a.ln() / prob_b.ln()
}

impl RatioTable {
    /// Build ratios from two frequency tables.
    ///
    /// A token is kept when its count reaches `min_freq` in a table it
    /// appears in. The outcome space for smoothing is the union of both
    /// vocabularies, shared by both estimates.
    pub fn build(
        table_a: &FrequencyTable,
        table_b: &FrequencyTable,
        smoothing: f64,
        min_freq: u64,
    ) -> Result<Self> {
        if !(smoothing.is_finite() && smoothing > 0.0) {
            return Err(LidError::InvalidConfig(format!(
                "smoothing must be a positive number, got {smoothing}"
            )));
        }

        let outcomes = table_a
            .iter()
            .map(|(w, _)| w)
            .chain(table_b.iter().map(|(w, _)| w).filter(|w| !table_a.contains(w)))
            .count();
        let (obs_a, obs_b) = (table_a.total(), table_b.total());

        let mut ratios: AHashMap<String, f64> = AHashMap::new();
        let candidates = table_a.iter().chain(table_b.iter());
        for (word, count) in candidates {
            if count < min_freq || ratios.contains_key(word) {
                continue;
            }
            let p_a = lidstone(table_a.count(word), smoothing, obs_a, outcomes);
            let p_b = lidstone(table_b.count(word), smoothing, obs_b, outcomes);
            let ratio = log_prob_ratio(p_a, p_b);
            // ln(p_b) is zero only when p_b == 1, i.e. a single-word vocabulary
            if ratio.is_finite() {
                ratios.insert(word.to_string(), ratio);
            } else {
                tracing::warn!(word, p_a, p_b, "dropping word with non-finite ratio");
            }
        }

        if ratios.is_empty() {
            return Err(LidError::Empty { min_freq });
        }
        tracing::debug!(
            entries = ratios.len(),
            outcomes,
            smoothing,
            min_freq,
            "built ratio table"
        );
        Ok(Self { ratios })
    }

    /// Build directly from explicit ratios, skipping non-finite values.
    pub fn from_ratios<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let ratios = pairs
            .into_iter()
            .filter(|(_, r)| r.is_finite())
            .map(|(w, r)| (w.into(), r))
            .collect();
        Self { ratios }
    }

    /// Remove words that should never discriminate (brand names and the
    /// like). Returns how many entries were dropped.
    pub fn prune<I, S>(&mut self, bad_words: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let before = self.ratios.len();
        for word in bad_words {
            self.ratios.remove(word.as_ref());
        }
        let removed = before - self.ratios.len();
        tracing::debug!(removed, "pruned ratio table");
        removed
    }

    /// Ratio for a token, `None` when it is out of vocabulary.
    pub fn get(&self, token: &str) -> Option<f64> {
        self.ratios.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.ratios.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.ratios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratios.is_empty()
    }

    /// Entries in ascending ratio order (ties by token).
    pub fn sorted(&self) -> Vec<(&str, f64)> {
        let mut items: Vec<_> = self.ratios.iter().map(|(w, r)| (w.as_str(), *r)).collect();
        items.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        items
    }

    /// Write `token<TAB>ratio<TAB>count_a<TAB>count_b` lines in ratio order.
    pub fn write_ratios<W: Write>(
        &self,
        mut out: W,
        table_a: &FrequencyTable,
        table_b: &FrequencyTable,
    ) -> std::io::Result<()> {
        for (word, ratio) in self.sorted() {
            writeln!(
                out,
                "{}\t{:.3}\t{}\t{}",
                word,
                ratio,
                table_a.count(word),
                table_b.count(word)
            )?;
        }
        Ok(())
    }

    /// Load a bincode snapshot.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| LidError::io(path, e))?;
        let table: RatioTable = bincode::deserialize_from(BufReader::new(file))?;
        Ok(table)
    }

    /// Save a bincode snapshot.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| LidError::io(path, e))?;
        bincode::serialize_into(BufWriter::new(file), self)?;
        Ok(())
    }
}
