use std::sync::Arc;

use indexmap::IndexSet;
use shirabe_core::{Deconjugator, Form};

use crate::rules::{ContextPredicate, Inflection, Rule, RuleSet, Substitution, Transform};

/// How much longer than the surface text a deconjugated form may grow
const MAX_TEXT_GROWTH: usize = 10;

/// How many tags a path may carry beyond the surface text length
const MAX_TAG_GROWTH: usize = 6;

/// Tag the infinitive trap looks for as the lone tag of a form
const STEM_REN: &str = "stem-ren";

/// Rule driven deconjugator. Walks every rule over every discovered form until
/// no new form turns up.
#[derive(Debug, Clone)]
pub struct JapaneseDeconjugator {
    rules: Arc<RuleSet>,
}

impl JapaneseDeconjugator {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Deconjugate a word to every reachable form, in discovery order.
    /// The unchanged start form is always first.
    pub fn deconjugate(&self, word: &str) -> Vec<Form> {
        let mut processed: IndexSet<Form> = IndexSet::new();
        let mut frontier: IndexSet<Form> = IndexSet::from([Form::start(word)]);

        while !frontier.is_empty() {
            let mut next = IndexSet::new();

            for form in &frontier {
                for rule in self.rules.iter() {
                    for successor in apply_rule(form, rule) {
                        if !processed.contains(&successor) && !frontier.contains(&successor) {
                            next.insert(successor);
                        }
                    }
                }
            }

            processed.extend(frontier);
            frontier = next;
        }

        processed.into_iter().collect()
    }
}

impl Deconjugator for JapaneseDeconjugator {
    fn deconjugate(&self, word: &str) -> Vec<Form> {
        JapaneseDeconjugator::deconjugate(self, word)
    }
}

fn apply_rule(form: &Form, rule: &Rule) -> Vec<Form> {
    match rule {
        Rule::Standard(transform) => standard(form, transform),
        Rule::Rewrite(transform) => {
            if form.text != transform.primary_con_end() {
                return Vec::new();
            }
            standard(form, transform)
        }
        Rule::OnlyFinal(transform) => {
            if !form.tags.is_empty() {
                return Vec::new();
            }
            standard(form, transform)
        }
        Rule::NeverFinal(transform) => {
            if form.tags.is_empty() {
                return Vec::new();
            }
            standard(form, transform)
        }
        Rule::Context {
            predicate,
            transform,
        } => {
            if !context_allows(*predicate, form, transform) {
                return Vec::new();
            }
            standard(form, transform)
        }
        Rule::Substitution(substitution) => substitute(form, substitution),
    }
}

fn context_allows(predicate: ContextPredicate, form: &Form, transform: &Transform) -> bool {
    match predicate {
        ContextPredicate::NoInfinitiveTrap => !(form.tags.len() == 1 && form.tags[0] == STEM_REN),
        ContextPredicate::SaIrregular => {
            let ending = transform.primary_con_end();
            match form.text.strip_suffix(ending) {
                Some(base) if !form.text.is_empty() => !base.ends_with('さ'),
                _ => false,
            }
        }
    }
}

fn standard(form: &Form, transform: &Transform) -> Vec<Form> {
    if form.text.is_empty() {
        return Vec::new();
    }

    let original_len = form.original_text.chars().count();
    if form.text.chars().count() > original_len + MAX_TEXT_GROWTH {
        return Vec::new();
    }
    if form.tags.len() > original_len + MAX_TAG_GROWTH {
        return Vec::new();
    }
    // a blank step cannot be the last one applied
    if transform.detail.is_empty() && form.tags.is_empty() {
        return Vec::new();
    }

    transform
        .alternatives
        .iter()
        .filter_map(|inflection| inner(form, inflection, &transform.detail))
        .collect()
}

fn inner(form: &Form, inflection: &Inflection, detail: &str) -> Option<Form> {
    // a tagged form only continues through a rule that names its last tag
    if !form.tags.is_empty() && inflection.con_tag.as_deref() != form.last_tag() {
        return None;
    }

    let base = form.text.strip_suffix(inflection.con_end.as_str())?;
    let text = format!("{base}{}", inflection.dec_end);

    let mut next = form.derive(text, detail);
    if form.tags.is_empty() {
        if let Some(con_tag) = &inflection.con_tag {
            next.tags.push(con_tag.clone());
        }
    }
    if let Some(dec_tag) = &inflection.dec_tag {
        next.tags.push(dec_tag.clone());
    }
    Some(next)
}

fn substitute(form: &Form, substitution: &Substitution) -> Vec<Form> {
    if !form.process.is_empty() || form.text.is_empty() {
        return Vec::new();
    }

    substitution
        .replacements
        .iter()
        .filter(|r| !r.from.is_empty() && form.text.contains(r.from.as_str()))
        .map(|r| {
            let text = form.text.replacen(r.from.as_str(), &r.to, 1);
            form.derive(text, &substitution.detail)
        })
        .collect()
}
