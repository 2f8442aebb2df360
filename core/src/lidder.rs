//! Model variants, selected once when the lidder is built.
use rand::Rng;
use std::path::Path;
use std::str::FromStr;

use crate::classifier::{Classification, ClassifierConfig, RatioClassifier};
use crate::config::ModelConfig;
use crate::error::{LidError, Result};
use crate::resolve::{resolve, ResolvePolicy};

/// Which classification pipeline to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelKind {
    /// Ratio thresholds only; undecided tokens stay unknown.
    Ratio,
    /// Ratio thresholds followed by unknown-word attachment.
    #[default]
    Attaching,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Ratio => "1.0",
            ModelKind::Attaching => "1.5",
        }
    }
}

impl FromStr for ModelKind {
    type Err = LidError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "1.0" => Ok(ModelKind::Ratio),
            "1.5" => Ok(ModelKind::Attaching),
            other => Err(LidError::InvalidConfig(format!("unknown model: {other}"))),
        }
    }
}

/// A ready-to-use language identifier.
#[derive(Debug, Clone)]
pub enum Lidder {
    Ratio(RatioClassifier),
    Attaching(RatioClassifier),
}

impl Lidder {
    pub fn new(kind: ModelKind, classifier: RatioClassifier) -> Self {
        match kind {
            ModelKind::Ratio => Lidder::Ratio(classifier),
            ModelKind::Attaching => Lidder::Attaching(classifier),
        }
    }

    /// Build the classifier described by a config file.
    pub fn from_config_file<P: AsRef<Path>>(kind: ModelKind, path: P) -> Result<Self> {
        let config = ModelConfig::load_toml(path)?;
        Ok(Self::new(kind, config.build_classifier()?))
    }

    /// Build from a config file, taking ratios from a saved table snapshot
    /// instead of the config's wordlists.
    pub fn from_config_and_table<P, Q>(kind: ModelKind, config: P, table: Q) -> Result<Self>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let config = ModelConfig::load_toml(config)?;
        Ok(Self::new(kind, config.build_classifier_from_table(table)?))
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Lidder::Ratio(_) => ModelKind::Ratio,
            Lidder::Attaching(_) => ModelKind::Attaching,
        }
    }

    pub fn classifier(&self) -> &RatioClassifier {
        match self {
            Lidder::Ratio(c) | Lidder::Attaching(c) => c,
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        self.classifier().config()
    }

    /// Identify languages in a message. `tags`, when given, must parallel
    /// `tokens`. `policy` and `rng` only matter for the attaching model.
    pub fn idlangs<S, T, R>(
        &self,
        tokens: &[S],
        tags: Option<&[T]>,
        policy: ResolvePolicy,
        rng: &mut R,
    ) -> Result<Classification>
    where
        S: AsRef<str>,
        T: AsRef<str>,
        R: Rng + ?Sized,
    {
        let classifier = self.classifier();
        let provisional = match tags {
            Some(tags) => classifier.classify_tagged(tokens, tags)?,
            None => classifier.classify(tokens),
        };
        match self {
            Lidder::Ratio(_) => Ok(provisional),
            Lidder::Attaching(c) => resolve(provisional, c.config(), policy, rng),
        }
    }
}
