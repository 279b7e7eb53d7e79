use crate::core::{ConfigProvider, Storage};
use crate::domain::model::{Bank, Domain};
use crate::utils::error::{QbankError, Result};
use serde_json::Value;

/// Reads and writes the per-domain bank files through a [`Storage`].
pub struct BankStore<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> BankStore<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn file_name(&self, domain: Domain) -> &str {
        self.config.bank_file(domain)
    }

    /// `Ok(None)` when the bank file does not exist yet.
    pub async fn load(&self, domain: Domain) -> Result<Option<Bank>> {
        let file = self.config.bank_file(domain);
        let data = match self.storage.read_file(file).await {
            Ok(data) => data,
            Err(QbankError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("{} not found, treating as empty", file);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let value: Value = serde_json::from_slice(&data)?;
        let bank = Bank::from_value(domain, file, value)?;
        tracing::debug!("Loaded {} questions from {}", bank.len(), file);
        Ok(Some(bank))
    }

    pub async fn load_or_empty(&self, domain: Domain) -> Result<Bank> {
        Ok(self
            .load(domain)
            .await?
            .unwrap_or_else(|| Bank::empty(domain)))
    }

    /// Rewrites the whole bank: 2-space indented JSON with a trailing newline.
    pub async fn save(&self, bank: &Bank) -> Result<()> {
        let file = self.config.bank_file(bank.domain);
        let mut json = serde_json::to_string_pretty(&bank.entries)?;
        json.push('\n');

        tracing::debug!("Writing {} questions ({} bytes) to {}", bank.len(), json.len(), file);
        self.storage.write_file(file, json.as_bytes()).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::model::CommitMode;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    pub(crate) struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        pub(crate) async fn put(&self, path: &str, data: &str) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.as_bytes().to_vec());
        }

        pub(crate) async fn get_file(&self, path: &str) -> Option<String> {
            let files = self.files.lock().await;
            files
                .get(path)
                .map(|data| String::from_utf8_lossy(data).into_owned())
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                QbankError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    pub(crate) struct MockConfig {
        pub(crate) commit_mode: CommitMode,
    }

    impl ConfigProvider for MockConfig {
        fn bank_file(&self, domain: Domain) -> &str {
            match domain {
                Domain::People => "people.json",
                Domain::Process => "process.json",
                Domain::Business => "business.json",
            }
        }

        fn duplicate_example_limit(&self) -> usize {
            20
        }

        fn commit_mode(&self) -> CommitMode {
            self.commit_mode
        }
    }

    fn store(storage: MockStorage) -> BankStore<MockStorage, MockConfig> {
        BankStore::new(
            storage,
            MockConfig {
                commit_mode: CommitMode::Staged,
            },
        )
    }

    #[tokio::test]
    async fn test_missing_bank_is_none() {
        let store = store(MockStorage::default());
        assert!(store.load(Domain::People).await.unwrap().is_none());
        assert!(store.load_or_empty(Domain::People).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bank_must_be_array() {
        let storage = MockStorage::default();
        storage.put("process.json", r#"{"id": 1}"#).await;
        let err = store(storage).load(Domain::Process).await.unwrap_err();
        assert!(matches!(err, QbankError::BankNotAnArray { file } if file == "process.json"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_an_error() {
        let storage = MockStorage::default();
        storage.put("people.json", "[{").await;
        let err = store(storage).load(Domain::People).await.unwrap_err();
        assert!(matches!(err, QbankError::SerializationError(_)));
    }

    #[tokio::test]
    async fn test_save_is_pretty_with_trailing_newline() {
        let storage = MockStorage::default();
        let store = store(storage.clone());
        let bank = Bank::from_value(
            Domain::Business,
            "business.json",
            json!([{"id": 1, "questionText": "Q"}]),
        )
        .unwrap();

        store.save(&bank).await.unwrap();

        let written = storage.get_file("business.json").await.unwrap();
        assert_eq!(written, "[\n  {\n    \"id\": 1,\n    \"questionText\": \"Q\"\n  }\n]\n");
    }

    #[tokio::test]
    async fn test_load_save_round_trip_preserves_bytes() {
        let original = "[\n  {\n    \"questionText\": \"Z first\",\n    \"id\": 3,\n    \"options\": [\n      \"a\",\n      \"b\"\n    ]\n  }\n]\n";
        let storage = MockStorage::default();
        storage.put("people.json", original).await;
        let store = store(storage.clone());

        let bank = store.load_or_empty(Domain::People).await.unwrap();
        store.save(&bank).await.unwrap();

        assert_eq!(storage.get_file("people.json").await.unwrap(), original);
    }
}
