pub mod cli;
pub mod toml_config;

use crate::config::toml_config::{Settings, TomlConfig};
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "qbank")]
#[command(about = "Merge new quiz questions into the People, Process and Business question banks")]
pub struct CliConfig {
    /// Input file: a JSON array of { group, questions } objects. Without it the
    /// current banks are summarized.
    pub input: Option<PathBuf>,

    /// Summarize the input file instead of merging it
    #[arg(long, visible_alias = "input-summary", requires = "input")]
    pub summary_input: bool,

    /// List which existing question each text duplicate matched
    #[arg(long, visible_alias = "report-dup", requires = "input", conflicts_with = "summary_input")]
    pub report_duplicates: bool,

    /// Run the merge and print the report without writing any bank
    #[arg(long, requires = "input", conflicts_with = "summary_input")]
    pub dry_run: bool,

    /// Directory holding the bank files (overrides the config file)
    #[arg(long, env = "QBANK_DATA_DIR")]
    pub data_dir: Option<String>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    SummarizeBanks,
    SummarizeInput(PathBuf),
    Merge(PathBuf),
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn mode(&self) -> Mode {
        match &self.input {
            None => Mode::SummarizeBanks,
            Some(path) if self.summary_input => Mode::SummarizeInput(path.clone()),
            Some(path) => Mode::Merge(path.clone()),
        }
    }

    /// Defaults, then the TOML file, then command-line flags.
    pub fn settings(&self) -> Result<Settings> {
        let file_config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        let mut settings = Settings::from_toml(&file_config);
        if let Some(dir) = &self.data_dir {
            settings.data_dir = dir.clone();
        }
        Ok(settings)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::domain::model::CommitMode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_modes() {
        let cli = CliConfig::try_parse_from(["qbank"]).unwrap();
        assert_eq!(cli.mode(), Mode::SummarizeBanks);

        let cli = CliConfig::try_parse_from(["qbank", "new.json"]).unwrap();
        assert_eq!(cli.mode(), Mode::Merge("new.json".into()));

        let cli = CliConfig::try_parse_from(["qbank", "--summary-input", "new.json"]).unwrap();
        assert_eq!(cli.mode(), Mode::SummarizeInput("new.json".into()));

        let cli = CliConfig::try_parse_from(["qbank", "--report-dup", "new.json"]).unwrap();
        assert!(cli.report_duplicates);
        assert_eq!(cli.mode(), Mode::Merge("new.json".into()));
    }

    #[test]
    fn test_flags_need_an_input() {
        assert!(CliConfig::try_parse_from(["qbank", "--report-duplicates"]).is_err());
        assert!(CliConfig::try_parse_from(["qbank", "--summary-input"]).is_err());
        assert!(
            CliConfig::try_parse_from(["qbank", "--summary-input", "--dry-run", "x.json"]).is_err()
        );
    }

    #[test]
    fn test_cli_data_dir_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[banks]\ndata_dir = \"from-file\"\n[merge]\ncommit = \"per-domain\""
        )
        .unwrap();

        let path = file.path().to_str().unwrap();
        let cli = CliConfig::try_parse_from(["qbank", "--config", path]).unwrap();
        let settings = cli.settings().unwrap();
        assert_eq!(settings.data_dir, "from-file");
        assert_eq!(settings.commit_mode, CommitMode::PerDomain);

        let cli =
            CliConfig::try_parse_from(["qbank", "--config", path, "--data-dir", "cli"]).unwrap();
        assert_eq!(cli.settings().unwrap().data_dir, "cli");
    }
}
