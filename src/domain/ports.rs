use crate::domain::model::{CommitMode, Domain};
use crate::utils::error::Result;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    /// Bank file name for a domain, relative to the storage base directory.
    fn bank_file(&self, domain: Domain) -> &str;
    fn duplicate_example_limit(&self) -> usize;
    fn commit_mode(&self) -> CommitMode;
}
