use crate::core::ConfigProvider;
use crate::domain::model::{CommitMode, Domain};
use crate::utils::error::{QbankError, Result};
use crate::utils::validation::{
    validate_distinct, validate_file_extension, validate_path, validate_positive_number,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_DATA_DIR: &str = "public/data";
pub const DEFAULT_DUPLICATE_EXAMPLE_LIMIT: usize = 20;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub banks: BanksConfig,
    #[serde(default)]
    pub merge: MergeConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BanksConfig {
    pub data_dir: Option<String>,
    pub people: Option<String>,
    pub process: Option<String>,
    pub business: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeConfig {
    pub duplicate_example_limit: Option<usize>,
    pub commit: Option<CommitMode>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(&path).map_err(|e| QbankError::ConfigError {
                message: format!("Cannot read {}: {}", path.as_ref().display(), e),
            })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| QbankError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${QBANK_DATA_DIR})；未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is a valid regex")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: String,
    pub bank_files: [String; 3],
    pub duplicate_example_limit: usize,
    pub commit_mode: CommitMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: DEFAULT_DATA_DIR.to_string(),
            bank_files: [
                "questions_people.json".to_string(),
                "questions_process.json".to_string(),
                "questions_business.json".to_string(),
            ],
            duplicate_example_limit: DEFAULT_DUPLICATE_EXAMPLE_LIMIT,
            commit_mode: CommitMode::default(),
        }
    }
}

impl Settings {
    /// Layers the TOML file over the defaults.
    pub fn from_toml(config: &TomlConfig) -> Self {
        let mut settings = Self::default();
        if let Some(dir) = &config.banks.data_dir {
            settings.data_dir = dir.clone();
        }
        let overrides = [
            &config.banks.people,
            &config.banks.process,
            &config.banks.business,
        ];
        for (slot, file) in settings.bank_files.iter_mut().zip(overrides) {
            if let Some(file) = file {
                *slot = file.clone();
            }
        }
        if let Some(limit) = config.merge.duplicate_example_limit {
            settings.duplicate_example_limit = limit;
        }
        if let Some(mode) = config.merge.commit {
            settings.commit_mode = mode;
        }
        settings
    }
}

impl ConfigProvider for Settings {
    fn bank_file(&self, domain: Domain) -> &str {
        &self.bank_files[domain.index()]
    }

    fn duplicate_example_limit(&self) -> usize {
        self.duplicate_example_limit
    }

    fn commit_mode(&self) -> CommitMode {
        self.commit_mode
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_path("banks.data_dir", &self.data_dir)?;
        for domain in Domain::ALL {
            let field = format!("banks.{}", domain.as_str().to_lowercase());
            let file = self.bank_file(domain);
            validate_path(&field, file)?;
            validate_file_extension(&field, file, "json")?;
        }
        let files: Vec<&str> = self.bank_files.iter().map(String::as_str).collect();
        validate_distinct("banks", &files)?;
        validate_positive_number(
            "merge.duplicate_example_limit",
            self.duplicate_example_limit,
            1,
        )?;
        Ok(())
    }
}
