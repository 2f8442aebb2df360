//! Ratio classifier: thresholds per-token ratios and aggregates a verdict.
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{LidError, Result};
use crate::filter::non_lid;
use crate::ratio::RatioTable;

/// Language label for a classified token or a whole message.
///
/// `Lang1` is the language whose words have low ratios, `Lang2` the one
/// whose words have high ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lang {
    Lang1,
    Lang2,
    Unknown,
}

/// Thresholds and language names for one classifier.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClassifierConfig {
    pub lang1: String,
    pub lang2: String,
    /// Ratios below this are `Lang1`.
    pub low_ratio: f64,
    /// Ratios above this are `Lang2`.
    pub high_ratio: f64,
    pub lang1_min: usize,
    pub lang2_min: usize,
    pub lang1_max_unk_rate: f64,
    pub lang2_max_unk_rate: f64,
    pub cs_max_unk_rate: f64,
}

impl ClassifierConfig {
    /// Check threshold ordering and rate bounds.
    pub fn validate(&self) -> Result<()> {
        if !(self.low_ratio.is_finite() && self.high_ratio.is_finite())
            || self.low_ratio >= self.high_ratio
        {
            return Err(LidError::InvalidThresholds {
                low: self.low_ratio,
                high: self.high_ratio,
            });
        }
        for (name, rate) in [
            ("lang1_max_unk_rate", self.lang1_max_unk_rate),
            ("lang2_max_unk_rate", self.lang2_max_unk_rate),
            ("cs_max_unk_rate", self.cs_max_unk_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(LidError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {rate}"
                )));
            }
        }
        if self.lang1 == self.lang2 {
            return Err(LidError::InvalidConfig(format!(
                "lang1 and lang2 must differ, both are {:?}",
                self.lang1
            )));
        }
        Ok(())
    }

    /// Display name of a label.
    pub fn name_of(&self, lang: Lang) -> &str {
        match lang {
            Lang::Lang1 => &self.lang1,
            Lang::Lang2 => &self.lang2,
            Lang::Unknown => UNKNOWN_LANG,
        }
    }

    /// Map a ratio to a label. Out-of-vocabulary tokens (`None`) are unknown.
    pub fn ratio_lang(&self, ratio: Option<f64>) -> Lang {
        match ratio {
            Some(r) if r < self.low_ratio => Lang::Lang1,
            Some(r) if r > self.high_ratio => Lang::Lang2,
            _ => Lang::Unknown,
        }
    }

    /// Aggregate per-token labels into a message verdict. `None` labels are
    /// tokens excluded from LID and count toward nothing.
    pub fn verdict<I>(&self, labels: I) -> MessageVerdict
    where
        I: IntoIterator<Item = Option<Lang>>,
    {
        let mut hits = Hits::default();
        for lang in labels.into_iter().flatten() {
            hits.add(lang);
        }

        let total = hits.total();
        let unk_rate = if total == 0 {
            1.0
        } else {
            hits.unknown as f64 / total as f64
        };

        let langs_present = [
            hits.lang1 >= self.lang1_min && unk_rate <= self.lang1_max_unk_rate,
            hits.lang2 >= self.lang2_min && unk_rate <= self.lang2_max_unk_rate,
        ];

        let codeswitch = unk_rate <= self.cs_max_unk_rate && cs_langs_present(&langs_present);

        // Only languages that passed their presence test compete
        let lid = pick_lang([
            if langs_present[0] { hits.lang1 } else { 0 },
            if langs_present[1] { hits.lang2 } else { 0 },
        ]);

        MessageVerdict {
            lid,
            langs_present,
            hits,
            unk_rate,
            codeswitch,
        }
    }
}

/// Name reported for the unknown language.
pub const UNKNOWN_LANG: &str = "unk";

/// Name reported for a message containing more than one language.
pub const MULTIPLE_LANGS: &str = "multiple";

/// Pick the language with the most hits; ties go to `Lang1`, no hits at all
/// is `Unknown`.
pub fn pick_lang(hits: [usize; 2]) -> Lang {
    match hits {
        [0, 0] => Lang::Unknown,
        [a, b] if a >= b => Lang::Lang1,
        _ => Lang::Lang2,
    }
}

/// Whether at least two languages are present.
pub fn cs_langs_present(langs_present: &[bool]) -> bool {
    langs_present.iter().filter(|&&p| p).count() >= 2
}

/// Hit counts per label over the classifiable tokens of a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hits {
    pub lang1: usize,
    pub lang2: usize,
    pub unknown: usize,
}

impl Hits {
    fn add(&mut self, lang: Lang) {
        match lang {
            Lang::Lang1 => self.lang1 += 1,
            Lang::Lang2 => self.lang2 += 1,
            Lang::Unknown => self.unknown += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.lang1 + self.lang2 + self.unknown
    }
}

/// Aggregate decision for one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageVerdict {
    /// Dominant language among those present.
    pub lid: Lang,
    pub langs_present: [bool; 2],
    pub hits: Hits,
    pub unk_rate: f64,
    pub codeswitch: bool,
}

/// Per-token record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClassification {
    pub token: String,
    /// `None` when the token is out of vocabulary or excluded from LID.
    pub ratio: Option<f64>,
    /// `None` when the token is excluded from LID.
    pub lang: Option<Lang>,
    pub non_lid: bool,
}

/// Full result of classifying a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub verdict: MessageVerdict,
    pub tokens: Vec<TokenClassification>,
}

impl Classification {
    pub fn langs(&self) -> Vec<Option<Lang>> {
        self.tokens.iter().map(|t| t.lang).collect()
    }

    pub fn ratios(&self) -> Vec<Option<f64>> {
        self.tokens.iter().map(|t| t.ratio).collect()
    }
}

/// Applies a ratio table with fixed thresholds. Cheap to clone and safe to
/// share between threads; nothing is mutated after construction.
#[derive(Debug, Clone)]
pub struct RatioClassifier {
    ratios: Arc<RatioTable>,
    config: ClassifierConfig,
}

impl RatioClassifier {
    pub fn new(ratios: RatioTable, config: ClassifierConfig) -> Result<Self> {
        Self::with_shared(Arc::new(ratios), config)
    }

    pub fn with_shared(ratios: Arc<RatioTable>, config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { ratios, config })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn ratios(&self) -> &RatioTable {
        &self.ratios
    }

    /// Classify untagged tokens. Tokens are looked up as given; callers
    /// lowercase them first.
    pub fn classify<S: AsRef<str>>(&self, tokens: &[S]) -> Classification {
        self.classify_with(tokens, |_| None)
    }

    /// Classify tokens with a parallel tag sequence.
    pub fn classify_tagged<S: AsRef<str>, T: AsRef<str>>(
        &self,
        tokens: &[S],
        tags: &[T],
    ) -> Result<Classification> {
        check_tags(tokens.len(), tags.len())?;
        Ok(self.classify_with(tokens, |i| Some(tags[i].as_ref())))
    }

    /// Provisional per-token records: ratio lookup and band thresholding.
    fn token_records<'a, S, F>(&self, tokens: &[S], tag_at: F) -> Vec<TokenClassification>
    where
        S: AsRef<str>,
        F: Fn(usize) -> Option<&'a str>,
    {
        tokens
            .iter()
            .enumerate()
            .map(|(i, token)| {
                let token = token.as_ref();
                if non_lid(token, tag_at(i)) {
                    TokenClassification {
                        token: token.to_string(),
                        ratio: None,
                        lang: None,
                        non_lid: true,
                    }
                } else {
                    let ratio = self.ratios.get(token);
                    TokenClassification {
                        token: token.to_string(),
                        ratio,
                        lang: Some(self.config.ratio_lang(ratio)),
                        non_lid: false,
                    }
                }
            })
            .collect()
    }

    fn classify_with<'a, S, F>(&self, tokens: &[S], tag_at: F) -> Classification
    where
        S: AsRef<str>,
        F: Fn(usize) -> Option<&'a str>,
    {
        let tokens = self.token_records(tokens, tag_at);
        let verdict = self.config.verdict(tokens.iter().map(|t| t.lang));
        Classification { verdict, tokens }
    }
}

fn check_tags(tokens: usize, tags: usize) -> Result<()> {
    if tokens != tags {
        return Err(LidError::MalformedToken(format!(
            "{tokens} tokens but {tags} tags"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClassifierConfig {
        ClassifierConfig {
            lang1: "eng".into(),
            lang2: "spa".into(),
            low_ratio: 0.8,
            high_ratio: 1.2,
            lang1_min: 2,
            lang2_min: 4,
            lang1_max_unk_rate: 0.25,
            lang2_max_unk_rate: 0.20,
            cs_max_unk_rate: 0.10,
        }
    }

    #[test]
    fn pick_lang_goes_to_argmax_and_ties_to_lang1() {
        assert_eq!(pick_lang([1, 0]), Lang::Lang1);
        assert_eq!(pick_lang([110, 7]), Lang::Lang1);
        assert_eq!(pick_lang([0, 1]), Lang::Lang2);
        assert_eq!(pick_lang([54, 55]), Lang::Lang2);
        assert_eq!(pick_lang([777, 777]), Lang::Lang1);
        assert_eq!(pick_lang([0, 0]), Lang::Unknown);
    }

    #[test]
    fn ratio_bands_are_exclusive() {
        let cfg = config();
        assert_eq!(cfg.ratio_lang(Some(0.79)), Lang::Lang1);
        assert_eq!(cfg.ratio_lang(Some(0.8)), Lang::Unknown);
        assert_eq!(cfg.ratio_lang(Some(1.2)), Lang::Unknown);
        assert_eq!(cfg.ratio_lang(Some(1.21)), Lang::Lang2);
        assert_eq!(cfg.ratio_lang(None), Lang::Unknown);
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let mut cfg = config();
        cfg.low_ratio = 1.2;
        assert!(matches!(
            RatioClassifier::new(RatioTable::default(), cfg),
            Err(LidError::InvalidThresholds { .. })
        ));
    }

    #[test]
    fn out_of_range_unknown_rate_is_rejected() {
        let mut cfg = config();
        cfg.cs_max_unk_rate = 1.5;
        assert!(matches!(cfg.validate(), Err(LidError::InvalidConfig(_))));
    }

    #[test]
    fn empty_message_is_fully_unknown() {
        let verdict = config().verdict(Vec::<Option<Lang>>::new());
        assert_eq!(verdict.unk_rate, 1.0);
        assert_eq!(verdict.lid, Lang::Unknown);
        assert!(!verdict.codeswitch);
    }

    #[test]
    fn codeswitch_requires_low_unknown_rate() {
        let mut cfg = config();
        cfg.lang1_max_unk_rate = 1.0;
        cfg.lang2_max_unk_rate = 1.0;
        let mut labels = vec![Some(Lang::Lang1); 4];
        labels.extend(vec![Some(Lang::Lang2); 4]);
        assert!(cfg.verdict(labels.clone()).codeswitch);

        labels.push(Some(Lang::Unknown));
        let verdict = cfg.verdict(labels);
        assert_eq!(verdict.langs_present, [true, true]);
        assert!(verdict.unk_rate > cfg.cs_max_unk_rate);
        assert!(!verdict.codeswitch);
    }

    #[test]
    fn mismatched_tags_are_an_input_error() {
        let clf = RatioClassifier::new(RatioTable::default(), config()).unwrap();
        assert!(matches!(
            clf.classify_tagged(&["a", "b"], &["null"]),
            Err(LidError::MalformedToken(_))
        ));
    }
}
