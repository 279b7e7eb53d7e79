pub mod bank;
pub mod classifier;
pub mod dedup;
pub mod merge;
pub mod normalizer;
pub mod report;
pub mod summary;
pub mod validator;

pub use crate::domain::model::{Bank, Domain, Question, QuestionType};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
