//! Model configuration files.
//!
//! A model is described by a TOML file with a single `[model]` table:
//!
//! ```toml
//! [model]
//! lang1 = "eng"
//! lang2 = "spa"
//! low_ratio = 0.8
//! high_ratio = 1.2
//! wordlist1 = "wordlists/eng.tsv"
//! wordlist2 = "wordlists/spa.tsv"
//! smoothing = 0.5
//! min_freq = 5
//! lang1_min = 2
//! lang2_min = 2
//! lang1_max_unk_rate = 0.9
//! lang2_max_unk_rate = 0.9
//! cs_max_unk_rate = 0.4
//! ignorelist = "ignore.txt"   # optional
//! ```
//!
//! Relative paths are resolved against the directory holding the file.
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::classifier::{ClassifierConfig, RatioClassifier};
use crate::error::{LidError, Result};
use crate::ratio::RatioTable;
use crate::wordlist::FrequencyTable;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    pub lang1: String,
    pub lang2: String,
    pub low_ratio: f64,
    pub high_ratio: f64,
    pub wordlist1: PathBuf,
    pub wordlist2: PathBuf,
    pub smoothing: f64,
    pub min_freq: u64,
    pub lang1_min: usize,
    pub lang2_min: usize,
    pub lang1_max_unk_rate: f64,
    pub lang2_max_unk_rate: f64,
    pub cs_max_unk_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignorelist: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize)]
struct ConfigFile {
    model: ModelConfig,
}

#[derive(Debug, Deserialize)]
struct LangsOnly {
    model: LangNames,
}

#[derive(Debug, Deserialize)]
struct LangNames {
    lang1: String,
    lang2: String,
}

fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| LidError::io(path, e))
}

impl ModelConfig {
    /// Load configuration from a TOML file, resolving relative paths against
    /// the file's directory.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = read_config(path)?;
        let file: ConfigFile = toml::from_str(&content).map_err(|source| LidError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = file.model;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        tracing::info!(path = %path.display(), lang1 = %config.lang1, lang2 = %config.lang2, "loaded model config");
        Ok(config)
    }

    /// Parse configuration from a TOML string. Paths are left as written.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str::<ConfigFile>(content).map(|f| f.model)
    }

    /// Serialize back to TOML, wrapped in the `[model]` table.
    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(&ConfigFile {
            model: self.clone(),
        })
    }

    /// Read only `(lang1, lang2)` from a config file.
    pub fn langs_from_file<P: AsRef<Path>>(path: P) -> Result<(String, String)> {
        let path = path.as_ref();
        let content = read_config(path)?;
        let langs: LangsOnly = toml::from_str(&content).map_err(|source| LidError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok((langs.model.lang1, langs.model.lang2))
    }

    fn resolve_paths(&mut self, base: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        join(&mut self.wordlist1);
        join(&mut self.wordlist2);
        if let Some(ignore) = self.ignorelist.as_mut() {
            join(ignore);
        }
    }

    /// The threshold part of the configuration.
    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            lang1: self.lang1.clone(),
            lang2: self.lang2.clone(),
            low_ratio: self.low_ratio,
            high_ratio: self.high_ratio,
            lang1_min: self.lang1_min,
            lang2_min: self.lang2_min,
            lang1_max_unk_rate: self.lang1_max_unk_rate,
            lang2_max_unk_rate: self.lang2_max_unk_rate,
            cs_max_unk_rate: self.cs_max_unk_rate,
        }
    }

    /// Load both wordlists, build the ratio table and drop ignored words.
    pub fn build_ratio_table(&self) -> Result<RatioTable> {
        let counts1 = FrequencyTable::load(&self.wordlist1)?;
        let counts2 = FrequencyTable::load(&self.wordlist2)?;
        let mut ratios = RatioTable::build(&counts1, &counts2, self.smoothing, self.min_freq)?;
        if let Some(path) = &self.ignorelist {
            ratios.prune(load_ignorelist(path)?);
        }
        Ok(ratios)
    }

    /// Build a ready classifier. Thresholds are validated before any
    /// wordlist is read.
    pub fn build_classifier(&self) -> Result<RatioClassifier> {
        let config = self.classifier_config();
        config.validate()?;
        RatioClassifier::new(self.build_ratio_table()?, config)
    }

    /// Build a classifier around a saved ratio table snapshot. The
    /// wordlists are not read; the ignorelist still applies.
    pub fn build_classifier_from_table<P: AsRef<Path>>(&self, table: P) -> Result<RatioClassifier> {
        let config = self.classifier_config();
        config.validate()?;
        let mut ratios = RatioTable::load(table)?;
        if let Some(path) = &self.ignorelist {
            ratios.prune(load_ignorelist(path)?);
        }
        RatioClassifier::new(ratios, config)
    }
}

/// Read one word per line, skipping blank lines.
pub fn load_ignorelist<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| LidError::io(path, e))?;
    let mut words = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| LidError::io(path, e))?;
        let word = line.trim();
        if !word.is_empty() {
            words.push(word.to_string());
        }
    }
    Ok(words)
}
