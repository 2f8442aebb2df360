//! Resolution of tokens the ratio classifier could not decide.
//!
//! Two kinds of token are left open by the ratio bands:
//!
//! - low-confidence words: in the ratio table, but between `low_ratio` and
//!   `high_ratio`;
//! - unknown words: not in the ratio table at all.
//!
//! A [`ResolvePolicy`] picks how each kind is settled. Policies that look at
//! context (`left`/`right`) leave tokens [`Slot::Pending`] in a first pass and
//! fill them from their nearest labelled neighbour in a second pass.
use rand::Rng;

use crate::classifier::{ClassifierConfig, Classification, Lang, TokenClassification};
use crate::error::{LidError, Result};

/// Handling of low-confidence words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LowMethod {
    /// Ratio below 1.0 is `Lang1`, otherwise `Lang2`. Ignores the bands.
    Mle,
    /// Uniform choice between the two languages.
    Random,
    /// Treat like an unknown word.
    #[default]
    Unk,
}

/// Handling of unknown words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnkMethod {
    /// Uniform choice between the two languages.
    Random,
    /// Take the label of the nearest labelled token, looking left first.
    #[default]
    Left,
    /// Same as `Left` on the reversed message.
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolvePolicy {
    pub low: LowMethod,
    pub unk: UnkMethod,
}

impl ResolvePolicy {
    pub fn new(low: LowMethod, unk: UnkMethod) -> Self {
        Self { low, unk }
    }
}

/// A token label during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Lang(Lang),
    /// Excluded from LID.
    NoLang,
    /// Waiting for the context pass.
    Pending,
}

impl Slot {
    fn known(self) -> Option<Lang> {
        match self {
            Slot::Lang(lang @ (Lang::Lang1 | Lang::Lang2)) => Some(lang),
            _ => None,
        }
    }

    /// Final label; `None` for excluded tokens. Pending slots have no label.
    pub fn label(self) -> Option<Lang> {
        match self {
            Slot::Lang(lang) => Some(lang),
            Slot::NoLang | Slot::Pending => None,
        }
    }
}

fn random_lang<R: Rng + ?Sized>(rng: &mut R) -> Lang {
    if rng.gen_bool(0.5) {
        Lang::Lang1
    } else {
        Lang::Lang2
    }
}

/// First pass: settle one provisional token under `policy`.
pub fn choose_lang<R: Rng + ?Sized>(
    record: &TokenClassification,
    policy: ResolvePolicy,
    rng: &mut R,
) -> Slot {
    if record.non_lid {
        return Slot::NoLang;
    }
    let Some(ratio) = record.ratio else {
        // Unknown word
        return match policy.unk {
            UnkMethod::Random => Slot::Lang(random_lang(rng)),
            UnkMethod::Left | UnkMethod::Right => Slot::Pending,
        };
    };
    match record.lang {
        Some(Lang::Unknown) | None => match policy.low {
            LowMethod::Random => Slot::Lang(random_lang(rng)),
            LowMethod::Unk => match policy.unk {
                UnkMethod::Random => Slot::Lang(random_lang(rng)),
                UnkMethod::Left | UnkMethod::Right => Slot::Pending,
            },
            LowMethod::Mle if ratio < 1.0 => Slot::Lang(Lang::Lang1),
            LowMethod::Mle => Slot::Lang(Lang::Lang2),
        },
        Some(lang) => Slot::Lang(lang),
    }
}

/// Second pass: replace every pending slot with the label of its nearest
/// neighbour that has a real language, searching backwards to the start and
/// then forwards to the end. Slots with no such neighbour become `Unknown`.
///
/// `Right` runs the same scan over the reversed sequence. Calling this with
/// [`UnkMethod::Random`] is a contract violation: that policy never leaves a
/// slot pending.
pub fn choose_unk_langs(slots: &[Slot], unk: UnkMethod) -> Result<Vec<Slot>> {
    let reverse = match unk {
        UnkMethod::Left => false,
        UnkMethod::Right => true,
        UnkMethod::Random => {
            return Err(LidError::ContractViolation(
                "unknown-word context pass requested for the random policy",
            ))
        }
    };

    let mut out: Vec<Slot> = slots.to_vec();
    if reverse {
        out.reverse();
    }

    let mut filled = 0usize;
    for idx in 0..out.len() {
        if out[idx] != Slot::Pending {
            continue;
        }
        let neighbour = out[..idx]
            .iter()
            .rev()
            .chain(out[idx + 1..].iter())
            .find_map(|slot| slot.known());
        out[idx] = Slot::Lang(neighbour.unwrap_or(Lang::Unknown));
        filled += 1;
    }

    if reverse {
        out.reverse();
    }
    if filled > 0 {
        tracing::debug!(filled, ?unk, "resolved pending tokens from context");
    }
    Ok(out)
}

/// Resolve a provisional classification and recompute its verdict.
pub fn resolve<R: Rng + ?Sized>(
    provisional: Classification,
    config: &ClassifierConfig,
    policy: ResolvePolicy,
    rng: &mut R,
) -> Result<Classification> {
    let mut slots: Vec<Slot> = provisional
        .tokens
        .iter()
        .map(|record| choose_lang(record, policy, &mut *rng))
        .collect();

    if slots.contains(&Slot::Pending) {
        slots = choose_unk_langs(&slots, policy.unk)?;
    }

    let mut tokens = provisional.tokens;
    for (record, slot) in tokens.iter_mut().zip(&slots) {
        record.lang = slot.label();
    }
    let verdict = config.verdict(tokens.iter().map(|t| t.lang));
    Ok(Classification { verdict, tokens })
}
