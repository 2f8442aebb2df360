//! # codeswitchador
//!
//! Message labelling built on codeswitch-core: lowercases input, runs a
//! `Lidder` and reports the message language, whether it code-switches and
//! a label per token.

use codeswitch_core::utils::{normalize, split_tagged_line};
use codeswitch_core::{Lidder, ResolvePolicy, Result, MULTIPLE_LANGS};
use rand::Rng;
use serde::Serialize;

pub use codeswitch_core::{LowMethod, ModelKind, UnkMethod};

/// Placeholder written for tokens excluded from identification.
pub const NO_LANG: &str = "-";

/// Labels for one message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Labelled {
    /// Dominant language, or the unknown marker.
    pub lid: String,
    pub codeswitched: bool,
    /// `lid`, or the multiple-languages marker when code-switched.
    pub output_lang: String,
    /// One entry per token; `None` for tokens excluded from identification.
    pub token_langs: Vec<Option<String>>,
}

impl Labelled {
    /// Tab-separated form: output language, lid, code-switch flag, then the
    /// space-separated token labels.
    pub fn to_tsv(&self) -> String {
        let langs: Vec<&str> = self
            .token_langs
            .iter()
            .map(|l| l.as_deref().unwrap_or(NO_LANG))
            .collect();
        format!(
            "{}\t{}\t{}\t{}",
            self.output_lang,
            self.lid,
            self.codeswitched,
            langs.join(" ")
        )
    }
}

/// Identify languages in one tokenized message.
///
/// Tokens are normalized and lowercased first since ratio tables are built
/// from lowercased text. `tags`, when given, must parallel `tokens`.
pub fn label_tokens<S, T, R>(
    lidder: &Lidder,
    tokens: &[S],
    tags: Option<&[T]>,
    policy: ResolvePolicy,
    rng: &mut R,
) -> Result<Labelled>
where
    S: AsRef<str>,
    T: AsRef<str>,
    R: Rng + ?Sized,
{
    let lowered: Vec<String> = tokens.iter().map(|t| normalize(t.as_ref())).collect();
    let result = lidder.idlangs(&lowered, tags, policy, rng)?;

    let config = lidder.config();
    let lid = config.name_of(result.verdict.lid).to_string();
    let codeswitched = result.verdict.codeswitch;
    let output_lang = if codeswitched {
        MULTIPLE_LANGS.to_string()
    } else {
        lid.clone()
    };
    let token_langs = result
        .tokens
        .iter()
        .map(|t| t.lang.map(|l| config.name_of(l).to_string()))
        .collect();

    Ok(Labelled {
        lid,
        codeswitched,
        output_lang,
        token_langs,
    })
}

/// Label one input line: whitespace-separated tokens, or `token/tag` pairs
/// when `tagged` is set. Blank lines yield `None`.
pub fn label_line<R: Rng + ?Sized>(
    lidder: &Lidder,
    line: &str,
    tagged: bool,
    policy: ResolvePolicy,
    rng: &mut R,
) -> Result<Option<Labelled>> {
    if line.trim().is_empty() {
        return Ok(None);
    }
    let labelled = if tagged {
        let (tokens, tags) = split_tagged_line(line)?;
        label_tokens(lidder, &tokens, Some(&tags[..]), policy, rng)?
    } else {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        label_tokens(lidder, &tokens, None::<&[&str]>, policy, rng)?
    };
    Ok(Some(labelled))
}
