//! Consistency check between rule-derived actions and actions inferred by
//! the symbolic reasoner.
//!
//! Both sides are reduced to the knowledge base's lower-case action key
//! (`LightOn` ↔ `AccendiLuce` ↔ `"accendiluce"`) and compared as sets. The
//! result is advisory: neither side is changed and the accepted
//! [`ActionSet`] is never blocked by a mismatch.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::actions::{Action, ActionSet};

/// One category the reasoner inferred for a room, with the action labels it
/// associates with that category. Read-only input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InferredFact {
    pub category: String,
    #[serde(default)]
    pub actions: Vec<String>,
}

/// Immutable snapshot of the reasoner's output for one room.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InferenceSnapshot {
    pub facts: Vec<InferredFact>,
}

impl InferenceSnapshot {
    pub fn new(facts: Vec<InferredFact>) -> Self {
        Self { facts }
    }

    /// Canonical labels of every action any fact mentions.
    pub fn action_labels(&self) -> BTreeSet<String> {
        self.facts
            .iter()
            .flat_map(|f| f.actions.iter())
            .map(|label| canonical_label(label))
            .collect()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.facts.iter().map(|f| f.category.as_str())
    }
}

// ---------------------------------------------------------------------------
// Canonical labels
// ---------------------------------------------------------------------------

/// Aliases per canonical key. The key itself is always the first entry.
const ALIASES: [(Action, &[&str]); 8] = [
    (Action::LightOn, &["accendiluce", "lighton", "lightson"]),
    (Action::LightOff, &["spegniluce", "lightoff", "lightsoff"]),
    (Action::HeatOn, &["accendiriscaldamento", "heaton", "heatingon"]),
    (Action::HeatOff, &["spegniriscaldamento", "heatoff", "heatingoff"]),
    (Action::AcOn, &["accendiclimatizzatore", "acon", "aircon"]),
    (Action::AcOff, &["spegniclimatizzatore", "acoff", "airconoff"]),
    (Action::BlindsUp, &["alzatapparelle", "blindsup", "alzatapparella"]),
    (Action::BlindsDown, &["abbassatapparelle", "blindsdown", "abbassatapparella"]),
];

/// Generic action-class prefixes, in squashed form.
const CLASS_PREFIXES: [&str; 2] = ["azione", "action"];

/// The canonical comparison key for an action.
pub fn action_key(action: Action) -> &'static str {
    ALIASES
        .iter()
        .find(|(a, _)| *a == action)
        .map_or("nessunaazione", |(_, names)| names[0])
}

/// Reduce an arbitrary label to its canonical key.
///
/// Strips IRI and namespace prefixes, a generic action-class prefix and an
/// instance suffix (`AccendiLuce_1a2b3c4d`), then maps known aliases. A
/// class prefix is only dropped when what remains is a known action.
/// Unknown labels come back lower-cased with separators squashed and are
/// otherwise unchanged. Applying it twice gives the same key as applying
/// it once.
pub fn canonical_label(label: &str) -> String {
    let local = label
        .rsplit(['#', '/', '.', ':'])
        .map(str::trim)
        .find(|segment| !segment.is_empty())
        .unwrap_or_default()
        .to_lowercase();

    let whole = squash(&local);
    if let Some(key) = lookup(&whole).or_else(|| lookup(strip_class(&whole))) {
        return key.to_owned();
    }
    // `Azione_AccendiLuce_Soggiorno1`: drop the class prefix, keep the
    // segment before the instance suffix.
    let unprefixed = CLASS_PREFIXES
        .iter()
        .find_map(|p| local.strip_prefix(p).and_then(|rest| rest.strip_prefix('_')))
        .unwrap_or(local.as_str());
    let head = squash(unprefixed.split('_').next().unwrap_or_default());
    if let Some(key) = lookup(&head).or_else(|| lookup(strip_class(&head))) {
        return key.to_owned();
    }
    whole
}

/// Drop leading class prefixes from a squashed label.
fn strip_class(squashed: &str) -> &str {
    let mut rest = squashed;
    while let Some(stripped) = CLASS_PREFIXES.iter().find_map(|p| rest.strip_prefix(p)) {
        rest = stripped;
    }
    rest
}

fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '_' | '-'))
        .collect()
}

fn lookup(squashed: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(_, names)| names.contains(&squashed))
        .map(|(_, names)| names[0])
}

// ---------------------------------------------------------------------------
// Diff
// ---------------------------------------------------------------------------

/// The two halves of the symmetric difference.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Issued by the rules, not inferred.
    pub rule_only: BTreeSet<String>,
    /// Inferred, not issued by the rules.
    pub inferred_only: BTreeSet<String>,
}

impl Reconciliation {
    pub fn is_consistent(&self) -> bool {
        self.rule_only.is_empty() && self.inferred_only.is_empty()
    }

    /// All mismatching labels.
    pub fn discrepancies(&self) -> BTreeSet<String> {
        self.rule_only.union(&self.inferred_only).cloned().collect()
    }
}

/// Canonical labels of a rule-derived set.
pub fn rule_labels(actions: &ActionSet) -> BTreeSet<String> {
    actions.iter().map(|a| action_key(a).to_owned()).collect()
}

/// Symmetric difference of two label sets after canonicalisation.
pub fn diff_labels(a: &BTreeSet<String>, b: &BTreeSet<String>) -> BTreeSet<String> {
    let a: BTreeSet<String> = a.iter().map(|l| canonical_label(l)).collect();
    let b: BTreeSet<String> = b.iter().map(|l| canonical_label(l)).collect();
    a.symmetric_difference(&b).cloned().collect()
}

/// Compare rule-derived actions with inferred action labels.
pub fn diff(rule_actions: &ActionSet, inferred: &BTreeSet<String>) -> BTreeSet<String> {
    diff_labels(&rule_labels(rule_actions), inferred)
}

/// Like [`diff`], keeping track of which side each label came from.
pub fn reconcile(rule_actions: &ActionSet, inferred: &BTreeSet<String>) -> Reconciliation {
    let ours = rule_labels(rule_actions);
    let theirs: BTreeSet<String> = inferred.iter().map(|l| canonical_label(l)).collect();
    Reconciliation {
        rule_only: ours.difference(&theirs).cloned().collect(),
        inferred_only: theirs.difference(&ours).cloned().collect(),
    }
}
