use crate::utils::error::{QbankError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Domain {
    People,
    Process,
    Business,
}

impl Domain {
    /// Fixed processing and reporting order.
    pub const ALL: [Domain; 3] = [Domain::People, Domain::Process, Domain::Business];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::People => "People",
            Domain::Process => "Process",
            Domain::Business => "Business",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Domain::People => 0,
            Domain::Process => 1,
            Domain::Business => 2,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Single,
    Multiselect,
    Dragdrop,
    Hotspot,
    Fillin,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Single => "single",
            QuestionType::Multiselect => "multiselect",
            QuestionType::Dragdrop => "dragdrop",
            QuestionType::Hotspot => "hotspot",
            QuestionType::Fillin => "fillin",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-type question counts used by the summaries.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TypeCounts {
    pub single: usize,
    pub multiselect: usize,
    pub dragdrop: usize,
    pub hotspot: usize,
    pub fillin: usize,
}

impl TypeCounts {
    pub fn record(&mut self, kind: QuestionType) {
        match kind {
            QuestionType::Single => self.single += 1,
            QuestionType::Multiselect => self.multiselect += 1,
            QuestionType::Dragdrop => self.dragdrop += 1,
            QuestionType::Hotspot => self.hotspot += 1,
            QuestionType::Fillin => self.fillin += 1,
        }
    }

    pub fn add(&mut self, other: &TypeCounts) {
        self.single += other.single;
        self.multiselect += other.multiselect;
        self.dragdrop += other.dragdrop;
        self.hotspot += other.hotspot;
        self.fillin += other.fillin;
    }

    pub fn total(&self) -> usize {
        self.single + self.multiselect + self.dragdrop + self.hotspot + self.fillin
    }
}

/// A validated incoming question.
///
/// The original record is kept whole so that fields the tool does not know
/// about survive the merge untouched and in their original order. `group` is
/// the name of the input group the question arrived in; it is never written
/// to a bank.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub id: i64,
    pub domain: Domain,
    pub kind: QuestionType,
    pub group: String,
    fields: Map<String, Value>,
}

impl Question {
    pub(crate) fn new(
        fields: Map<String, Value>,
        id: i64,
        domain: Domain,
        kind: QuestionType,
        group: String,
    ) -> Self {
        Self {
            id,
            domain,
            kind,
            group,
            fields,
        }
    }

    pub fn question_text(&self) -> &str {
        self.fields
            .get("questionText")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Record as persisted: current id and canonical domain name.
    pub fn into_record(mut self) -> Value {
        self.fields.insert("id".to_string(), Value::from(self.id));
        self.fields
            .insert("domain".to_string(), Value::from(self.domain.as_str()));
        Value::Object(self.fields)
    }
}

/// One input batch. Only used for statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub index: usize,
    pub name: String,
    pub questions: Vec<Value>,
}

impl Group {
    /// Reads one element of the input array. Anything that is not an object,
    /// or a `questions` value that is not an array, yields an empty group.
    pub fn from_value(index: usize, value: &Value) -> Self {
        let name = value
            .get("group")
            .and_then(Value::as_str)
            .filter(|name| !name.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Group {}", index));

        let questions = value
            .get("questions")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Self {
            index,
            name,
            questions,
        }
    }

    pub fn parse_all(payload: &Value) -> Result<Vec<Group>> {
        let items = payload.as_array().ok_or(QbankError::InputNotAnArray)?;
        Ok(items
            .iter()
            .enumerate()
            .map(|(index, value)| Group::from_value(index, value))
            .collect())
    }
}

/// The persisted questions of one domain, in stored order.
#[derive(Debug, Clone, PartialEq)]
pub struct Bank {
    pub domain: Domain,
    pub entries: Vec<Value>,
}

impl Bank {
    pub fn empty(domain: Domain) -> Self {
        Self {
            domain,
            entries: Vec::new(),
        }
    }

    pub fn from_value(domain: Domain, file: &str, value: Value) -> Result<Self> {
        match value {
            Value::Array(entries) => Ok(Self { domain, entries }),
            _ => Err(QbankError::BankNotAnArray {
                file: file.to_string(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// When merged banks are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommitMode {
    /// Compute every domain, then write all banks.
    #[default]
    Staged,
    /// Write each bank as soon as its domain is merged.
    PerDomain,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GroupStats {
    pub input: usize,
    pub added: usize,
    pub text_duplicates: usize,
    pub reassigned: usize,
}

/// Per-group rows in first-seen order. Groups sharing a name share a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupTable<T = GroupStats> {
    rows: Vec<(String, T)>,
}

impl<T> Default for GroupTable<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T: Default> GroupTable<T> {
    pub fn entry(&mut self, name: &str) -> &mut T {
        let position = match self.rows.iter().position(|(n, _)| n == name) {
            Some(position) => position,
            None => {
                self.rows.push((name.to_string(), T::default()));
                self.rows.len() - 1
            }
        };
        &mut self.rows[position].1
    }
}

impl<T> GroupTable<T> {
    pub fn get(&self, name: &str) -> Option<&T> {
        self.rows.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.rows.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateExample {
    pub domain: Domain,
    pub input_id: i64,
    /// `None` when the matching entry has no integer id.
    pub existing_id: Option<i64>,
    pub question_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainReport {
    pub domain: Domain,
    pub file: String,
    pub added: usize,
    pub text_duplicates: usize,
    pub reassigned: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeReport {
    pub domains: Vec<DomainReport>,
    pub groups: GroupTable,
    pub duplicate_examples: Vec<DuplicateExample>,
    pub committed: bool,
}

impl MergeReport {
    pub fn domain(&self, domain: Domain) -> Option<&DomainReport> {
        self.domains.iter().find(|d| d.domain == domain)
    }

    pub fn total_added(&self) -> usize {
        self.domains.iter().map(|d| d.added).sum()
    }

    pub fn total_questions(&self) -> usize {
        self.domains.iter().map(|d| d.total).sum()
    }

    pub fn total_text_duplicates(&self) -> usize {
        self.domains.iter().map(|d| d.text_duplicates).sum()
    }

    pub fn total_reassigned(&self) -> usize {
        self.domains.iter().map(|d| d.reassigned).sum()
    }
}
