// Ratio classifier behaviour on a fixed, hand-written ratio table.
//
// The table places English words below 0.8 and Spanish words above 1.2, with
// "iphone" and "me" sitting on the band edges (low confidence).

use codeswitch_core::{ClassifierConfig, Lang, RatioClassifier, RatioTable};

const TOKENS: [&str; 10] = [
    "the", "of", "perro", "dog", "me", "man", "el", "la", "awesomesauce", ".",
];
const ONE_ENG: [&str; 1] = ["the"];
const TWO_ENG: [&str; 2] = ["the", "of"];
const THREE_ENG: [&str; 3] = ["the", "of", "dog"];
const FOUR_ENG: [&str; 4] = ["the", "of", "dog", "man"];
const TWO_SPA: [&str; 2] = ["la", "el"];
const THREE_SPA: [&str; 3] = ["la", "el", "perro"];
const FOUR_SPA: [&str; 4] = ["la", "el", "perro", "zapatos"];
const JUNK: [&str; 3] = [
    "asdkjhadjknqaionasdas",
    "lilajdomqomdnnasdasdasdacg",
    "adjklasdmadascbvas",
];

fn ratios() -> RatioTable {
    RatioTable::from_ratios([
        ("the", 0.1),
        ("of", 0.2),
        ("dog", 0.5),
        ("man", 0.6),
        ("iphone", 0.8),
        ("me", 1.2),
        ("perro", 1.4),
        ("zapatos", 1.5),
        ("la", 1.8),
        ("el", 1.9),
    ])
}

fn lidder() -> RatioClassifier {
    let config = ClassifierConfig {
        lang1: "eng".into(),
        lang2: "spa".into(),
        low_ratio: 0.8,
        high_ratio: 1.2,
        lang1_min: 2,
        lang2_min: 4,
        lang1_max_unk_rate: 0.25,
        lang2_max_unk_rate: 0.20,
        cs_max_unk_rate: 0.10,
    };
    RatioClassifier::new(ratios(), config).expect("valid config")
}

fn cat(parts: &[&[&str]]) -> Vec<String> {
    parts
        .iter()
        .flat_map(|p| p.iter().map(|s| s.to_string()))
        .collect()
}

#[test]
fn hits_per_label() {
    let result = lidder().classify(&TOKENS);
    assert_eq!(result.verdict.hits.lang1, 4);
    assert_eq!(result.verdict.hits.lang2, 3);
    assert_eq!(result.verdict.hits.unknown, 2);
}

#[test]
fn ratios_per_token() {
    let result = lidder().classify(&TOKENS);
    let table = ratios();
    let mut expected: Vec<Option<f64>> = TOKENS.iter().map(|t| table.get(t)).collect();
    // filtered tokens are never looked up
    expected[9] = None;
    assert_eq!(result.ratios(), expected);
    assert_eq!(result.tokens[8].ratio, None, "awesomesauce is out of vocabulary");
}

#[test]
fn labels_per_token() {
    use Lang::*;
    let result = lidder().classify(&TOKENS);
    assert_eq!(
        result.langs(),
        vec![
            Some(Lang1),
            Some(Lang1),
            Some(Lang2),
            Some(Lang1),
            Some(Unknown),
            Some(Lang1),
            Some(Lang2),
            Some(Lang2),
            Some(Unknown),
            None
        ]
    );
    assert!(result.tokens[9].non_lid);
}

#[test]
fn low_ratio_tokens_are_always_lang1() {
    let clf = lidder();
    for (token, ratio) in ratios().sorted() {
        let result = clf.classify(&[token]);
        if ratio < clf.config().low_ratio {
            assert_eq!(result.tokens[0].lang, Some(Lang::Lang1), "{token}");
        }
    }
}

#[test]
fn lid_goes_to_the_present_language_with_most_hits() {
    let clf = lidder();
    assert_eq!(clf.classify(&cat(&[&TWO_ENG, &FOUR_SPA])).verdict.lid, Lang::Lang2);
    assert_eq!(clf.classify(&cat(&[&FOUR_ENG, &THREE_SPA])).verdict.lid, Lang::Lang1);
    // ties go to the first language
    assert_eq!(clf.classify(&cat(&[&FOUR_SPA, &FOUR_ENG])).verdict.lid, Lang::Lang1);
    // unknown if there's nothing
    let junk = clf.classify(&JUNK);
    assert_eq!(junk.verdict.lid, Lang::Unknown);
    assert_eq!(junk.verdict.unk_rate, 1.0);
}

#[test]
fn lid_ignores_languages_below_threshold() {
    let clf = lidder();
    assert_eq!(clf.classify(&cat(&[&ONE_ENG, &TWO_SPA])).verdict.lid, Lang::Unknown);
    // fewer hits can still win when it is the only language present
    assert_eq!(clf.classify(&cat(&[&TWO_ENG, &THREE_SPA])).verdict.lid, Lang::Lang1);
}

#[test]
fn presence_flags() {
    let clf = lidder();
    let present = |parts: &[&[&str]]| clf.classify(&cat(parts)).verdict.langs_present;
    assert!(!present(&[&ONE_ENG, &JUNK, &THREE_SPA])[0]);
    assert!(present(&[&TWO_ENG, &TWO_SPA])[0]);
    assert!(!present(&[&TWO_SPA, &ONE_ENG])[1]);
    assert!(present(&[&FOUR_SPA, &TWO_ENG, &JUNK[..1]])[1]);
    assert_eq!(present(&[&JUNK]), [false, false]);
}

#[test]
fn lang1_unknown_rate_limit() {
    let clf = lidder();
    assert_eq!(clf.classify(&THREE_ENG).verdict.lid, Lang::Lang1);
    // at the limit still passes
    assert_eq!(clf.classify(&cat(&[&THREE_ENG, &JUNK[..1]])).verdict.lid, Lang::Lang1);
    assert_eq!(clf.classify(&cat(&[&THREE_SPA, &JUNK[..2]])).verdict.lid, Lang::Unknown);
}

#[test]
fn lang2_unknown_rate_limit() {
    let clf = lidder();
    assert_eq!(clf.classify(&FOUR_SPA).verdict.lid, Lang::Lang2);
    assert_eq!(clf.classify(&cat(&[&FOUR_SPA, &JUNK[..1]])).verdict.lid, Lang::Lang2);
    assert_eq!(clf.classify(&cat(&[&FOUR_SPA, &JUNK[..2]])).verdict.lid, Lang::Unknown);
}

#[test]
fn codeswitch_unknown_rate_limit() {
    let clf = lidder();
    let cs = |parts: &[&[&str]]| clf.classify(&cat(parts)).verdict.codeswitch;
    assert!(cs(&[&THREE_ENG, &FOUR_SPA]));
    assert!(!cs(&[&THREE_ENG, &THREE_SPA]));
    assert!(!cs(&[&ONE_ENG, &FOUR_SPA]));
    // junk below the limit
    assert!(cs(&[&FOUR_ENG, &FOUR_SPA, &FOUR_SPA[..1], &JUNK[..1]]));
    // junk at the limit
    assert!(cs(&[&FOUR_ENG, &FOUR_ENG[..1], &FOUR_SPA, &JUNK[..1]]));
    // junk above the limit
    assert!(!cs(&[&FOUR_ENG, &FOUR_SPA, &JUNK[..1]]));
}

#[test]
fn balanced_message_is_codeswitched_and_lang1_dominant() {
    let result = lidder().classify(&cat(&[&FOUR_ENG, &FOUR_SPA]));
    assert_eq!(result.verdict.lid, Lang::Lang1);
    assert!(result.verdict.codeswitch);
    assert_eq!(result.verdict.unk_rate, 0.0);
}

#[test]
fn all_filtered_message_is_unknown() {
    let result = lidder().classify(&["...", "42", "rt", "!!"]);
    assert_eq!(result.verdict.hits.total(), 0);
    assert_eq!(result.verdict.unk_rate, 1.0);
    assert_eq!(result.verdict.lid, Lang::Unknown);
    assert!(result.langs().iter().all(Option::is_none));
}

#[test]
fn tags_exclude_non_laughter_tokens() {
    let result = lidder()
        .classify_tagged(&["jaja", "the", "la"], &["ja", "null", "url"])
        .unwrap();
    assert_eq!(
        result.langs(),
        vec![Some(Lang::Unknown), Some(Lang::Lang1), None]
    );
}
