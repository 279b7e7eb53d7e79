use crate::core::bank::BankStore;
use crate::core::classifier::infer_value_type;
use crate::core::normalizer::normalize_domain;
use crate::core::{ConfigProvider, Storage};
use crate::domain::model::{Domain, Group, GroupTable, TypeCounts};
use crate::utils::error::{QbankError, Result};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainSummary {
    pub domain: Domain,
    pub counts: TypeCounts,
}

impl DomainSummary {
    pub fn of<'a>(domain: Domain, questions: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut counts = TypeCounts::default();
        for question in questions {
            counts.record(infer_value_type(question));
        }
        Self { domain, counts }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankStatus {
    Loaded(DomainSummary),
    Missing { file: String },
    Invalid { file: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankSummary {
    pub banks: Vec<BankStatus>,
}

impl BankSummary {
    pub fn loaded(&self) -> impl Iterator<Item = &DomainSummary> {
        self.banks.iter().filter_map(|status| match status {
            BankStatus::Loaded(summary) => Some(summary),
            _ => None,
        })
    }

    pub fn overall(&self) -> TypeCounts {
        let mut overall = TypeCounts::default();
        for summary in self.loaded() {
            overall.add(&summary.counts);
        }
        overall
    }
}

/// Type breakdown of the persisted banks. Missing or non-array banks are
/// reported, not fatal.
pub async fn summarize_banks<S: Storage, C: ConfigProvider>(
    store: &BankStore<S, C>,
) -> Result<BankSummary> {
    let mut banks = Vec::new();
    for domain in Domain::ALL {
        let file = store.file_name(domain).to_string();
        let status = match store.load(domain).await {
            Ok(Some(bank)) => BankStatus::Loaded(DomainSummary::of(domain, &bank.entries)),
            Ok(None) => BankStatus::Missing { file },
            Err(QbankError::BankNotAnArray { .. }) => BankStatus::Invalid { file },
            Err(e) => return Err(e),
        };
        banks.push(status);
    }
    Ok(BankSummary { banks })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSummary {
    pub domains: Vec<DomainSummary>,
    pub groups: GroupTable<TypeCounts>,
}

impl InputSummary {
    pub fn overall(&self) -> TypeCounts {
        let mut overall = TypeCounts::default();
        for summary in &self.domains {
            overall.add(&summary.counts);
        }
        overall
    }
}

/// Domain and group breakdown of an input file, without validation. Questions
/// whose domain is not recognized still count towards their group.
pub fn summarize_input(payload: &Value) -> Result<InputSummary> {
    let groups = Group::parse_all(payload)?;
    let mut by_domain: [Vec<&Value>; 3] = Default::default();
    let mut table: GroupTable<TypeCounts> = GroupTable::default();

    for group in &groups {
        let counts = table.entry(&group.name);
        for question in &group.questions {
            counts.record(infer_value_type(question));
            let domain = question
                .get("domain")
                .and_then(Value::as_str)
                .and_then(normalize_domain);
            if let Some(domain) = domain {
                by_domain[domain.index()].push(question);
            }
        }
    }

    let domains = Domain::ALL
        .iter()
        .map(|domain| DomainSummary::of(*domain, by_domain[domain.index()].iter().copied()))
        .collect();

    Ok(InputSummary {
        domains,
        groups: table,
    })
}
