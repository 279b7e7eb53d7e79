use crate::core::bank::BankStore;
use crate::core::dedup::{dedupe_domain, DomainOutcome};
use crate::core::validator::into_question;
use crate::core::{ConfigProvider, Storage};
use crate::domain::model::{
    Bank, CommitMode, Domain, DomainReport, DuplicateExample, Group, GroupTable, MergeReport,
    Question,
};
use crate::utils::error::{QbankError, Result, ValidationIssue};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Record which existing question each text duplicate matched.
    pub report_duplicates: bool,
    /// Compute everything but write nothing.
    pub dry_run: bool,
}

/// Validated input, bucketed by domain in submission order.
#[derive(Debug, Default)]
pub struct Intake {
    pub buckets: [Vec<Question>; 3],
    pub groups: GroupTable,
}

impl Intake {
    pub fn bucket(&self, domain: Domain) -> &[Question] {
        &self.buckets[domain.index()]
    }

    fn take(&mut self, domain: Domain) -> Vec<Question> {
        std::mem::take(&mut self.buckets[domain.index()])
    }
}

/// Validates every question of every group. All issues are collected before
/// failing so the caller sees the full list at once.
pub fn intake(groups: Vec<Group>) -> Result<Intake> {
    let mut intake = Intake::default();
    let mut issues = Vec::new();

    for group in groups {
        let stats = intake.groups.entry(&group.name);
        stats.input += group.questions.len();

        for (question_index, record) in group.questions.into_iter().enumerate() {
            match into_question(record, &group.name) {
                Ok(question) => intake.buckets[question.domain.index()].push(question),
                Err(kind) => issues.push(ValidationIssue {
                    group_index: group.index,
                    question_index,
                    kind,
                }),
            }
        }
    }

    if issues.is_empty() {
        Ok(intake)
    } else {
        Err(QbankError::Validation(issues))
    }
}

/// Appends accepted questions after the existing entries.
fn merge_bank(mut bank: Bank, accepted: Vec<Question>) -> Bank {
    bank.entries
        .extend(accepted.into_iter().map(Question::into_record));
    bank
}

fn duplicate_examples(outcome: &DomainOutcome) -> impl Iterator<Item = DuplicateExample> + '_ {
    outcome.duplicates.iter().filter_map(|duplicate| {
        let existing_id = duplicate.bank_match()?;
        Some(DuplicateExample {
            domain: outcome.domain,
            input_id: duplicate.question.id,
            existing_id,
            question_text: duplicate.question.question_text().to_string(),
        })
    })
}

pub struct MergeEngine<S: Storage, C: ConfigProvider> {
    store: BankStore<S, C>,
    options: MergeOptions,
}

impl<S: Storage, C: ConfigProvider> MergeEngine<S, C> {
    pub fn new(store: BankStore<S, C>, options: MergeOptions) -> Self {
        Self { store, options }
    }

    /// Merges a parsed input file (an array of groups) into the banks.
    pub async fn run(&self, payload: &Value) -> Result<MergeReport> {
        let groups = Group::parse_all(payload)?;
        tracing::info!("Read {} input group(s)", groups.len());
        self.merge(groups).await
    }

    pub async fn merge(&self, groups: Vec<Group>) -> Result<MergeReport> {
        let mut intake = intake(groups)?;
        for domain in Domain::ALL {
            tracing::debug!("{}: {} incoming question(s)", domain, intake.bucket(domain).len());
        }

        let commit_mode = self.store.config().commit_mode();
        let write_now = !self.options.dry_run && commit_mode == CommitMode::PerDomain;
        let mut staged = Vec::new();
        let mut domains = Vec::new();
        let mut examples = Vec::new();

        for domain in Domain::ALL {
            let bank = self.store.load_or_empty(domain).await?;
            let outcome = dedupe_domain(&bank, intake.take(domain))?;

            outcome.tally(&mut intake.groups);
            if self.options.report_duplicates {
                examples.extend(duplicate_examples(&outcome));
            }

            let added = outcome.accepted.len();
            let text_duplicates = outcome.duplicates.len();
            let reassigned = outcome.reassignments.len();
            let merged = merge_bank(bank, outcome.accepted);

            tracing::info!(
                "{}: +{} new, {} text-duplicate(s), {} reassigned id(s)",
                domain,
                added,
                text_duplicates,
                reassigned
            );
            domains.push(DomainReport {
                domain,
                file: self.store.file_name(domain).to_string(),
                added,
                text_duplicates,
                reassigned,
                total: merged.len(),
            });

            if write_now {
                self.store.save(&merged).await?;
            } else {
                staged.push(merged);
            }
        }

        if self.options.dry_run {
            tracing::info!("Dry run: no bank was written");
        } else {
            for bank in &staged {
                self.store.save(bank).await?;
            }
        }

        Ok(MergeReport {
            domains,
            groups: intake.groups,
            duplicate_examples: examples,
            committed: !self.options.dry_run,
        })
    }
}
