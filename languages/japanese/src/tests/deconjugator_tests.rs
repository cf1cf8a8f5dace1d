use std::sync::Arc;

use shirabe_core::{Deconjugator, Form};

use crate::deconjugator::JapaneseDeconjugator;
use crate::rules::RuleSet;

fn deconjugator(json: &str) -> JapaneseDeconjugator {
    JapaneseDeconjugator::new(Arc::new(RuleSet::from_json(json).expect("valid rules")))
}

fn embedded() -> JapaneseDeconjugator {
    JapaneseDeconjugator::new(Arc::new(RuleSet::embedded().expect("embedded rules")))
}

fn texts(forms: &[Form]) -> Vec<&str> {
    forms.iter().map(|f| f.text.as_str()).collect()
}

fn find<'a>(forms: &'a [Form], text: &str, process: &[&str]) -> Option<&'a Form> {
    forms
        .iter()
        .find(|f| f.text == text && f.process.iter().map(String::as_str).eq(process.iter().copied()))
}

#[test]
fn test_start_form_comes_first() {
    let forms = embedded().deconjugate("たべなかった");
    assert_eq!(forms[0], Form::start("たべなかった"));
    assert!(forms.iter().all(|f| f.original_text == "たべなかった"));
}

#[test]
fn test_empty_rule_set_returns_only_start() {
    let deconjugator = JapaneseDeconjugator::new(Arc::new(RuleSet::default()));
    let forms = deconjugator.deconjugate("たべた");
    assert_eq!(forms, vec![Form::start("たべた")]);
}

#[test]
fn test_ichidan_negative_past() {
    let forms = embedded().deconjugate("たべなかった");
    let form = find(&forms, "たべる", &["past", "negative", ""]).expect("たべる via negative past");
    assert_eq!(form.last_tag(), Some("v1"));
    assert!(form.seen_text.contains("たべない"));
}

#[test]
fn test_godan_past() {
    let forms = embedded().deconjugate("かいた");
    let form = find(&forms, "かく", &["past", ""]).expect("かく");
    assert_eq!(form.last_tag(), Some("v5k"));
}

#[test]
fn test_te_iru() {
    let forms = embedded().deconjugate("よんでいる");
    let form = find(&forms, "よむ", &["-te iru", ""]).expect("よむ");
    assert_eq!(form.last_tag(), Some("v5m"));
}

#[test]
fn test_adjective_negative() {
    let forms = embedded().deconjugate("たかくない");
    let form = find(&forms, "たかい", &["negative", ""]).expect("たかい");
    assert_eq!(form.last_tag(), Some("adj-i"));
}

#[test]
fn test_suru_negative_uses_rewrite() {
    let forms = embedded().deconjugate("しない");
    let form = find(&forms, "する", &["negative", ""]).expect("する");
    assert_eq!(form.last_tag(), Some("vs-i"));
}

#[test]
fn test_provisional_conditional() {
    let forms = embedded().deconjugate("たべれば");
    assert!(find(&forms, "たべる", &["provisional conditional", ""]).is_some());
}

#[test]
fn test_rewrite_requires_whole_text() {
    let deconjugator = deconjugator(
        r#"[{ "type": "rewriterule", "detail": "irregular", "dec_end": "する", "con_end": "し" }]"#,
    );
    assert_eq!(texts(&deconjugator.deconjugate("し")), vec!["し", "する"]);
    assert_eq!(texts(&deconjugator.deconjugate("はなし")), vec!["はなし"]);
}

#[test]
fn test_only_final_applies_once() {
    let deconjugator = deconjugator(
        r#"[{ "type": "onlyfinalrule", "detail": "provisional", "dec_end": "",
              "con_end": "ば", "con_tag": "t" }]"#,
    );
    assert_eq!(texts(&deconjugator.deconjugate("ばば")), vec!["ばば", "ば"]);
}

#[test]
fn test_never_final_needs_earlier_step() {
    let rules = r#"[
        { "type": "stdrule", "detail": "provisional", "dec_end": "", "con_end": "ば",
          "dec_tag": "stem-izenkei", "con_tag": "uninflectable" },
        { "type": "neverfinalrule", "detail": "negative", "dec_end": "", "con_end": "なけれ",
          "dec_tag": "stem-mizenkei", "con_tag": "stem-izenkei" }
    ]"#;
    let deconjugator = deconjugator(rules);

    assert_eq!(texts(&deconjugator.deconjugate("なけれ")), vec!["なけれ"]);

    let forms = deconjugator.deconjugate("たべなければ");
    let form = find(&forms, "たべ", &["provisional", "negative"]).expect("たべ");
    assert_eq!(form.tags, vec!["uninflectable", "stem-izenkei", "stem-mizenkei"]);
}

#[test]
fn test_blank_detail_cannot_start_a_path() {
    let deconjugator = deconjugator(
        r#"[{ "type": "stdrule", "detail": "", "dec_end": "る", "con_end": "た" }]"#,
    );
    assert_eq!(texts(&deconjugator.deconjugate("た")), vec!["た"]);
}

#[test]
fn test_tag_mismatch_rejects() {
    let deconjugator = deconjugator(
        r#"[
        { "type": "stdrule", "detail": "past", "dec_end": "く", "con_end": "た",
          "dec_tag": "stem-te", "con_tag": "uninflectable" },
        { "type": "stdrule", "detail": "adverbial", "dec_end": "い", "con_end": "く",
          "dec_tag": "adj-i", "con_tag": "adv" }
    ]"#,
    );
    // く ends in stem-te, which the adverbial rule does not continue
    let forms = deconjugator.deconjugate("た");
    assert_eq!(texts(&forms), vec!["た", "く"]);
}

#[test]
fn test_tagless_rule_does_not_continue_tagged_form() {
    let deconjugator = deconjugator(
        r#"[
        { "type": "stdrule", "detail": "a", "dec_end": "", "con_end": "た",
          "dec_tag": "y", "con_tag": "x" },
        { "type": "stdrule", "detail": "b", "dec_end": "る", "con_end": "ね" }
    ]"#,
    );

    // ね carries [x, y]; rule b names no tag to continue from
    let forms = deconjugator.deconjugate("ねた");
    assert_eq!(texts(&forms), vec!["ねた", "ね"]);
    assert!(find(&forms, "る", &["a", "b"]).is_none());

    // untagged text still goes through it
    assert_eq!(texts(&deconjugator.deconjugate("ね")), vec!["ね", "る"]);
}

#[test]
fn test_infinitive_trap_blocks_lone_stem() {
    let trap = r#"{ "type": "contextrule", "contextrule": "no-infinitive-trap",
                    "detail": "(infinitive)", "dec_end": "る", "con_end": "",
                    "dec_tag": "v1", "con_tag": "stem-ren" }"#;

    let bare = deconjugator(&format!(
        r#"[{{ "type": "stdrule", "detail": "polite", "dec_end": "", "con_end": "ます",
              "dec_tag": "stem-ren" }}, {trap}]"#
    ));
    let forms = bare.deconjugate("たべます");
    assert!(forms.iter().any(|f| f.text == "たべ"));
    assert!(!forms.iter().any(|f| f.text == "たべる"));

    let tagged = deconjugator(&format!(
        r#"[{{ "type": "stdrule", "detail": "polite", "dec_end": "", "con_end": "ます",
              "dec_tag": "stem-ren", "con_tag": "masu" }}, {trap}]"#
    ));
    let forms = tagged.deconjugate("たべます");
    assert!(find(&forms, "たべる", &["polite", "(infinitive)"]).is_some());
}

#[test]
fn test_sa_irregular_guard() {
    let deconjugator = deconjugator(
        r#"[
        { "type": "stdrule", "detail": "negative", "dec_end": "", "con_end": "ない",
          "dec_tag": "stem-mizenkei", "con_tag": "adj-i" },
        { "type": "contextrule", "contextrule": "sa-irregular-guard", "detail": "",
          "dec_end": "する", "con_end": "さ", "dec_tag": "vs-s", "con_tag": "stem-mizenkei" }
    ]"#,
    );

    let forms = deconjugator.deconjugate("あいさない");
    let form = find(&forms, "あいする", &["negative", ""]).expect("あいする");
    assert_eq!(form.last_tag(), Some("vs-s"));

    let forms = deconjugator.deconjugate("ささない");
    assert!(forms.iter().any(|f| f.text == "ささ"));
    assert!(!forms.iter().any(|f| f.text == "さする"));
}

#[test]
fn test_substitution_only_on_untouched_text() {
    let deconjugator = deconjugator(
        r#"[
        { "type": "substitution", "detail": "archaic kana",
          "dec_end": ["い", "え"], "con_end": ["ゐ", "ゑ"] },
        { "type": "stdrule", "detail": "past", "dec_end": "る", "con_end": "た" }
    ]"#,
    );

    let forms = deconjugator.deconjugate("ゐた");
    let substituted = find(&forms, "いた", &["archaic kana"]).expect("いた");
    assert!(substituted.tags.is_empty());
    assert!(find(&forms, "いる", &["archaic kana", "past"]).is_some());
    // ゐる already has a step behind it
    assert!(find(&forms, "いる", &["past", "archaic kana"]).is_none());
}

#[test]
fn test_substitution_replaces_first_occurrence() {
    let deconjugator = deconjugator(
        r#"[{ "type": "substitution", "detail": "archaic kana", "dec_end": "い", "con_end": "ゐ" }]"#,
    );
    assert_eq!(texts(&deconjugator.deconjugate("ゐゐ")), vec!["ゐゐ", "いゐ"]);
}

#[test]
fn test_growth_is_bounded() {
    let deconjugator = deconjugator(
        r#"[{ "type": "stdrule", "detail": "grow", "dec_end": "あ", "con_end": "",
              "dec_tag": "g", "con_tag": "g" }]"#,
    );
    let forms = deconjugator.deconjugate("か");
    assert_eq!(forms.len(), 8);
    assert!(forms.iter().all(|f| f.text.chars().count() <= 1 + 10));
}

#[test]
fn test_text_growth_is_bounded_without_tags() {
    let deconjugator = deconjugator(
        r#"[{ "type": "stdrule", "detail": "grow", "dec_end": "あ", "con_end": "" }]"#,
    );
    let forms = deconjugator.deconjugate("か");

    // forms up to 1 + 10 characters are expanded once more, then the search stops
    assert!(forms.iter().all(|f| f.tags.is_empty()));
    assert_eq!(forms.len(), 12);
    assert_eq!(forms.iter().map(|f| f.text.chars().count()).max(), Some(12));
}

#[test]
fn test_duplicate_rules_give_one_form() {
    let deconjugator = deconjugator(
        r#"[{ "type": "stdrule", "detail": "past", "dec_end": "る", "con_end": "た" },
            { "type": "stdrule", "detail": "past", "dec_end": "る", "con_end": "た" }]"#,
    );
    assert_eq!(texts(&deconjugator.deconjugate("みた")), vec!["みた", "みる"]);
}

#[test]
fn test_trait_object_matches_inherent() {
    let concrete = embedded();
    let dynamic: &dyn Deconjugator = &concrete;
    assert_eq!(dynamic.deconjugate("かいた"), concrete.deconjugate("かいた"));
}

#[test]
fn test_every_embedded_search_terminates() {
    let deconjugator = embedded();
    for word in ["", "ー", "たべさせられなかった", "ゐなければ", "しまいました", "来させる"] {
        let forms = deconjugator.deconjugate(word);
        assert!(!forms.is_empty());
        assert_eq!(forms[0].text, word);
    }
}
