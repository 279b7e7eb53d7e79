use std::fmt;
use thiserror::Error;

/// Why a single incoming question was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    NotAnObject,
    MissingOrInvalidId,
    MissingDomain,
    MissingText,
    UnrecognizedDomain(String),
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "Question must be an object"),
            Self::MissingOrInvalidId => write!(f, "Question id must be a number"),
            Self::MissingDomain => write!(f, "Question domain is required"),
            Self::MissingText => write!(f, "Question text is required"),
            Self::UnrecognizedDomain(raw) => write!(f, "Unknown domain '{}'", raw),
        }
    }
}

/// A rejected question, located by its group and position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub group_index: usize,
    pub question_index: usize,
    pub kind: ValidationErrorKind,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Group {}, question {}: {}",
            self.group_index, self.question_index, self.kind
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Storage,
}

#[derive(Error, Debug)]
pub enum QbankError {
    #[error("{} invalid question(s) in input", .0.len())]
    Validation(Vec<ValidationIssue>),

    #[error("Input JSON must be an array of groups")]
    InputNotAnArray,

    #[error("{file} does not contain an array")]
    BankNotAnArray { file: String },

    #[error("No free id above {max} in the {domain} bank")]
    IdSpaceExhausted { domain: String, max: i64 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl QbankError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) | Self::InputNotAnArray => ErrorCategory::Input,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::BankNotAnArray { .. }
            | Self::IdSpaceExhausted { .. }
            | Self::IoError(_)
            | Self::SerializationError(_) => ErrorCategory::Storage,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Input => 1,
            ErrorCategory::Configuration => 2,
            ErrorCategory::Storage => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Validation(issues) => {
                let lines: Vec<String> = issues.iter().map(|i| format!("- {}", i)).collect();
                format!("Validation errors:\n{}", lines.join("\n"))
            }
            Self::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                format!("File not found: {}", e)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Fix the listed questions and re-run; no bank was modified",
            Self::InputNotAnArray => {
                "Wrap the input in an array: [{ \"group\": ..., \"questions\": [...] }]"
            }
            Self::BankNotAnArray { .. } => {
                "Restore the bank file from version control; it must hold a JSON array"
            }
            Self::IdSpaceExhausted { .. } => "Renumber the bank so ids fit below i64::MAX",
            Self::IoError(_) => "Check the data directory path and file permissions",
            Self::SerializationError(_) => "Check that the file contains valid JSON",
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Check the command-line flags and the TOML configuration file"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, QbankError>;
