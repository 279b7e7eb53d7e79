use crate::core::normalizer::normalize_text;
use crate::domain::model::{Bank, Domain, GroupTable, Question};
use crate::utils::error::{QbankError, Result};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Outcome of asking the allocator for an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    Kept(i64),
    Reassigned { from: i64, to: i64 },
}

impl Claim {
    pub fn id(&self) -> i64 {
        match self {
            Claim::Kept(id) => *id,
            Claim::Reassigned { to, .. } => *to,
        }
    }
}

/// Tracks every id in use within one domain.
#[derive(Debug, Default, Clone)]
pub struct IdAllocator {
    taken: HashSet<i64>,
    max: Option<i64>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.taken.contains(&id)
    }

    pub fn insert(&mut self, id: i64) -> bool {
        self.max = Some(self.max.map_or(id, |max| max.max(id)));
        self.taken.insert(id)
    }

    /// Keeps `id` when free, otherwise takes the first free id above the
    /// current maximum. `None` when that would overflow.
    pub fn claim(&mut self, id: i64) -> Option<Claim> {
        if !self.contains(id) {
            self.insert(id);
            return Some(Claim::Kept(id));
        }

        let mut candidate = match self.max {
            Some(max) => max.checked_add(1)?,
            None => 1,
        };
        while self.contains(candidate) {
            candidate = candidate.checked_add(1)?;
        }
        self.insert(candidate);
        Some(Claim::Reassigned {
            from: id,
            to: candidate,
        })
    }

    pub fn max(&self) -> Option<i64> {
        self.max
    }
}

/// Where an already-seen normalized text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOrigin {
    /// A persisted bank entry; `None` when that entry has no integer id.
    Bank(Option<i64>),
    /// A question accepted earlier in the same run.
    Batch(i64),
}

/// Normalized texts already accepted in one domain, each mapped to the first
/// entry that carried it.
#[derive(Debug, Default, Clone)]
pub struct TextIndex {
    origins: HashMap<String, TextOrigin>,
}

impl TextIndex {
    pub fn origin(&self, key: &str) -> Option<TextOrigin> {
        self.origins.get(key).copied()
    }

    /// Returns false when the key was already present; the first origin is kept.
    pub fn insert(&mut self, key: String, origin: TextOrigin) -> bool {
        match self.origins.entry(key) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(origin);
                true
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Duplicate {
    pub question: Question,
    pub matched: TextOrigin,
}

impl Duplicate {
    /// Id of the matching bank entry. Outer `None` for a same-run match.
    pub fn bank_match(&self) -> Option<Option<i64>> {
        match self.matched {
            TextOrigin::Bank(id) => Some(id),
            TextOrigin::Batch(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment {
    pub group: String,
    pub from: i64,
    pub to: i64,
}

/// Result of deduplicating one domain's incoming questions.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainOutcome {
    pub domain: Domain,
    pub accepted: Vec<Question>,
    pub duplicates: Vec<Duplicate>,
    pub reassignments: Vec<Reassignment>,
}

impl DomainOutcome {
    /// Adds this domain's counts to the per-group table.
    pub fn tally(&self, groups: &mut GroupTable) {
        for question in &self.accepted {
            groups.entry(&question.group).added += 1;
        }
        for duplicate in &self.duplicates {
            groups.entry(&duplicate.question.group).text_duplicates += 1;
        }
        for reassignment in &self.reassignments {
            groups.entry(&reassignment.group).reassigned += 1;
        }
    }
}

/// Integer id of a bank entry. Integral floats such as `2.0` count too, so
/// they still block a new question claiming `2`.
fn entry_id(entry: &Value) -> Option<i64> {
    let id = entry.get("id")?;
    id.as_i64().or_else(|| {
        id.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn entry_text(entry: &Value) -> Option<&str> {
    entry
        .get("questionText")
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
}

/// Seeds id and text state from the persisted bank. Legacy duplicates are
/// tolerated and logged; the first occurrence wins for matching.
fn seed(bank: &Bank) -> (IdAllocator, TextIndex) {
    let mut ids = IdAllocator::new();
    let mut texts = TextIndex::default();
    let mut repeated_ids = 0usize;
    let mut repeated_texts = 0usize;

    for entry in &bank.entries {
        let id = entry_id(entry);
        if let Some(id) = id {
            if !ids.insert(id) {
                repeated_ids += 1;
            }
        }
        if let Some(text) = entry_text(entry) {
            if !texts.insert(normalize_text(text), TextOrigin::Bank(id)) {
                repeated_texts += 1;
            }
        }
    }

    if repeated_ids > 0 || repeated_texts > 0 {
        tracing::warn!(
            "{} bank already holds {} repeated id(s) and {} repeated text(s)",
            bank.domain,
            repeated_ids,
            repeated_texts
        );
    }

    (ids, texts)
}

/// Splits one domain's incoming questions into accepted and duplicate,
/// reassigning colliding ids. Both the bank and earlier questions of the
/// same run count as already taken.
pub fn dedupe_domain(bank: &Bank, incoming: Vec<Question>) -> Result<DomainOutcome> {
    let (mut ids, mut texts) = seed(bank);
    let mut outcome = DomainOutcome {
        domain: bank.domain,
        accepted: Vec::new(),
        duplicates: Vec::new(),
        reassignments: Vec::new(),
    };

    for mut question in incoming {
        let key = normalize_text(question.question_text());
        if let Some(matched) = texts.origin(&key) {
            tracing::debug!("{}: id {} is a text duplicate", bank.domain, question.id);
            outcome.duplicates.push(Duplicate { question, matched });
            continue;
        }

        let claim = ids
            .claim(question.id)
            .ok_or_else(|| QbankError::IdSpaceExhausted {
                domain: bank.domain.to_string(),
                max: ids.max().unwrap_or(i64::MAX),
            })?;
        if let Claim::Reassigned { from, to } = claim {
            tracing::debug!("{}: id {} reassigned to {}", bank.domain, from, to);
            outcome.reassignments.push(Reassignment {
                group: question.group.clone(),
                from,
                to,
            });
        }
        question.id = claim.id();

        texts.insert(key, TextOrigin::Batch(question.id));
        outcome.accepted.push(question);
    }

    Ok(outcome)
}
