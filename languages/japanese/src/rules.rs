//! Deconjugation rule data.
//!
//! Rules are read from a JSON array of records:
//!
//! ```json
//! { "type": "stdrule", "detail": "negative",
//!   "dec_end": "", "con_end": "ない", "dec_tag": "stem-mizenkei", "con_tag": "adj-i" }
//! ```
//!
//! Ending and tag fields take a string or a list. `dec_end` and `con_end` are
//! paired alternatives and must have the same length; a tag list may be shorter,
//! in which case its last value carries over to the remaining alternatives.

use std::path::Path;
use std::slice;

use serde::Deserialize;

const EMBEDDED_RULES: &str = include_str!("../data/deconjugator.json");

#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("rule {index}: dec_end has {dec_end} alternatives but con_end has {con_end}")]
    MismatchedAlternatives {
        index: usize,
        dec_end: usize,
        con_end: usize,
    },

    #[error("rule {index}: {field} has {found} entries for {expected} alternatives")]
    MisalignedTags {
        index: usize,
        field: &'static str,
        found: usize,
        expected: usize,
    },

    #[error("rule {index}: no ending alternatives")]
    EmptyAlternatives { index: usize },

    #[error("rule {index}: contextrule without a context predicate")]
    MissingContextPredicate { index: usize },

    #[error("Failed to read rules from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid rule JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Named predicates gating a context rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ContextPredicate {
    /// Blocks the rule when the only tag so far is the ren'youkei stem
    #[serde(rename = "no-infinitive-trap", alias = "v1inftrap")]
    NoInfinitiveTrap,
    /// Blocks the rule on empty text, on text without the ending, and when the
    /// text before the ending already ends in さ
    #[serde(rename = "sa-irregular-guard", alias = "saspecial")]
    SaIrregular,
}

/// One ending/tag alternative of a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inflection {
    pub dec_end: String,
    pub con_end: String,
    pub dec_tag: Option<String>,
    pub con_tag: Option<String>,
}

/// Suffix rewrite shared by every tag-carrying rule kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transform {
    pub detail: String,
    pub alternatives: Vec<Inflection>,
}

impl Transform {
    /// Ending of the first alternative; whole-text and guard checks use it
    pub fn primary_con_end(&self) -> &str {
        self.alternatives
            .first()
            .map(|alt| alt.con_end.as_str())
            .unwrap_or_default()
    }
}

/// Replacement of `from` by `to` anywhere in the text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub detail: String,
    pub replacements: Vec<Replacement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Standard(Transform),
    /// Applies only when the whole text equals the ending
    Rewrite(Transform),
    /// Applies only as the first rule of a path
    OnlyFinal(Transform),
    /// Never applies as the first rule of a path
    NeverFinal(Transform),
    Context {
        predicate: ContextPredicate,
        transform: Transform,
    },
    /// Applies only to untouched text; leaves tags alone
    Substitution(Substitution),
}

impl Rule {
    pub fn detail(&self) -> &str {
        match self {
            Rule::Standard(t) | Rule::Rewrite(t) | Rule::OnlyFinal(t) | Rule::NeverFinal(t) => {
                &t.detail
            }
            Rule::Context { transform, .. } => &transform.detail,
            Rule::Substitution(s) => &s.detail,
        }
    }
}

/// Immutable, ordered collection of rules
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Rules bundled with the crate
    pub fn embedded() -> Result<Self, RuleError> {
        let rules = Self::from_json(EMBEDDED_RULES)?;
        tracing::info!("Loaded {} embedded deconjugation rules", rules.len());
        Ok(rules)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, RuleError> {
        tracing::info!("Loading deconjugation rules from file: {}", path.display());
        let json = std::fs::read_to_string(path).map_err(|source| RuleError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let rules = Self::from_json(&json)?;
        tracing::info!("Loaded {} deconjugation rules from file", rules.len());
        Ok(rules)
    }

    /// Parse and validate a JSON rule array. Any malformed record fails the whole set.
    pub fn from_json(json: &str) -> Result<Self, RuleError> {
        let records: Vec<RuleRecord> = serde_json::from_str(json)?;
        let rules = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.into_rule(index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn iter(&self) -> slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// On-disk representation

#[derive(Debug, Clone, Copy, Deserialize)]
enum RuleKind {
    #[serde(rename = "stdrule")]
    Standard,
    #[serde(rename = "rewriterule")]
    Rewrite,
    #[serde(rename = "onlyfinalrule")]
    OnlyFinal,
    #[serde(rename = "neverfinalrule")]
    NeverFinal,
    #[serde(rename = "contextrule")]
    Context,
    #[serde(rename = "substitution")]
    Substitution,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl Default for OneOrMany {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RuleRecord {
    #[serde(rename = "type", alias = "kind")]
    kind: RuleKind,
    #[serde(default, alias = "contextrule")]
    context: Option<ContextPredicate>,
    #[serde(default)]
    detail: String,
    dec_end: OneOrMany,
    con_end: OneOrMany,
    #[serde(default)]
    dec_tag: OneOrMany,
    #[serde(default)]
    con_tag: OneOrMany,
}

impl RuleRecord {
    fn into_rule(self, index: usize) -> Result<Rule, RuleError> {
        let dec_end: Vec<String> = self.dec_end.into();
        let con_end: Vec<String> = self.con_end.into();

        if dec_end.len() != con_end.len() {
            return Err(RuleError::MismatchedAlternatives {
                index,
                dec_end: dec_end.len(),
                con_end: con_end.len(),
            });
        }
        if dec_end.is_empty() {
            return Err(RuleError::EmptyAlternatives { index });
        }

        if let RuleKind::Substitution = self.kind {
            let replacements = con_end
                .into_iter()
                .zip(dec_end)
                .map(|(from, to)| Replacement { from, to })
                .collect();
            return Ok(Rule::Substitution(Substitution {
                detail: self.detail,
                replacements,
            }));
        }

        let predicate = match self.kind {
            RuleKind::Context => Some(
                self.context
                    .ok_or(RuleError::MissingContextPredicate { index })?,
            ),
            _ => None,
        };

        let count = dec_end.len();
        let dec_tag = align_tags(self.dec_tag.into(), count, index, "dec_tag")?;
        let con_tag = align_tags(self.con_tag.into(), count, index, "con_tag")?;

        let alternatives = dec_end
            .into_iter()
            .zip(con_end)
            .zip(dec_tag.into_iter().zip(con_tag))
            .map(|((dec_end, con_end), (dec_tag, con_tag))| Inflection {
                dec_end,
                con_end,
                dec_tag,
                con_tag,
            })
            .collect();

        let transform = Transform {
            detail: self.detail,
            alternatives,
        };

        Ok(match (self.kind, predicate) {
            (RuleKind::Context, Some(predicate)) => Rule::Context {
                predicate,
                transform,
            },
            (RuleKind::Rewrite, _) => Rule::Rewrite(transform),
            (RuleKind::OnlyFinal, _) => Rule::OnlyFinal(transform),
            (RuleKind::NeverFinal, _) => Rule::NeverFinal(transform),
            _ => Rule::Standard(transform),
        })
    }
}

/// One tag per alternative; shorter lists repeat their last value
fn align_tags(
    tags: Vec<String>,
    count: usize,
    index: usize,
    field: &'static str,
) -> Result<Vec<Option<String>>, RuleError> {
    if tags.len() > count {
        return Err(RuleError::MisalignedTags {
            index,
            field,
            found: tags.len(),
            expected: count,
        });
    }

    let mut last = None;
    Ok((0..count)
        .map(|i| {
            if let Some(tag) = tags.get(i) {
                last = Some(tag.clone());
            }
            last.clone()
        })
        .collect())
}
