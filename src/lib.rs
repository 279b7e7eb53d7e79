pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Mode};

pub use crate::core::{
    bank::BankStore,
    merge::{MergeEngine, MergeOptions},
    report::ReportOptions,
};
pub use config::cli::LocalStorage;
pub use config::toml_config::{Settings, TomlConfig};
pub use domain::model::{CommitMode, Domain, MergeReport, QuestionType};
pub use utils::error::{QbankError, Result};
