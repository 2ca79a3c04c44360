//! JSON file store
//!
//! Directory layout:
//! ```text
//! {data-dir}/
//! ├── config.toml      # Optional settings
//! ├── studies.json     # Array of study sessions, insertion order
//! ├── reviews.json     # Array of scheduled reviews
//! └── subjects.json    # Array of subjects, built-ins included
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use super::store::StudyStore;
use crate::study::models::{ScheduledReview, StudySession, Subject};
use crate::study::subjects::merge_with_builtins;

#[derive(Error, Debug)]
pub enum StudyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid import file: {0}")]
    ImportFormat(String),

    #[error("Built-in subject {0} cannot be deleted")]
    BuiltinSubject(i64),

    #[error("Subject not found: {0}")]
    SubjectNotFound(i64),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, StudyError>;

/// Store backed by one JSON file per collection
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Create the data directory if needed
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;
        Ok(())
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn studies_path(&self) -> PathBuf {
        self.base_path.join("studies.json")
    }

    fn reviews_path(&self) -> PathBuf {
        self.base_path.join("reviews.json")
    }

    fn subjects_path(&self) -> PathBuf {
        self.base_path.join("subjects.json")
    }

    /// Whether nothing has been written yet
    pub fn is_fresh(&self) -> bool {
        !self.studies_path().exists() && !self.reviews_path().exists()
    }

    fn read_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let items: Vec<T> = serde_json::from_str(&content)?;
        Ok(items)
    }

    fn write_collection<T: Serialize>(&self, path: &Path, items: &[T]) -> Result<()> {
        self.init()?;
        let json = serde_json::to_string_pretty(items)?;

        // Write then rename so a crash never leaves a half-written collection
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

impl StudyStore for FileStore {
    fn load_studies(&self) -> Result<Vec<StudySession>> {
        Self::read_collection(&self.studies_path())
    }

    fn save_studies(&mut self, studies: &[StudySession]) -> Result<()> {
        self.write_collection(&self.studies_path(), studies)
    }

    fn load_reviews(&self) -> Result<Vec<ScheduledReview>> {
        Self::read_collection(&self.reviews_path())
    }

    fn save_reviews(&mut self, reviews: &[ScheduledReview]) -> Result<()> {
        self.write_collection(&self.reviews_path(), reviews)
    }

    fn load_subjects(&self) -> Result<Vec<Subject>> {
        let persisted: Vec<Subject> = Self::read_collection(&self.subjects_path())?;
        Ok(merge_with_builtins(persisted))
    }

    fn save_subjects(&mut self, subjects: &[Subject]) -> Result<()> {
        self.write_collection(&self.subjects_path(), subjects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::study::builtin::{builtin_subjects, sample_reviews, sample_studies};
    use tempfile::TempDir;

    fn create_test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("data"));
        (store, temp_dir)
    }

    #[test]
    fn test_missing_files_are_empty() {
        let (store, _temp) = create_test_store();

        assert!(store.is_fresh());
        assert!(store.load_studies().unwrap().is_empty());
        assert!(store.load_reviews().unwrap().is_empty());
        assert_eq!(store.load_subjects().unwrap(), builtin_subjects());
    }

    #[test]
    fn test_save_and_load_preserves_order() {
        let (mut store, _temp) = create_test_store();

        let mut studies = sample_studies();
        studies.reverse();
        store.save_studies(&studies).unwrap();
        store.save_reviews(&sample_reviews()).unwrap();

        assert!(!store.is_fresh());
        assert_eq!(store.load_studies().unwrap(), studies);
        assert_eq!(store.load_reviews().unwrap(), sample_reviews());
    }

    #[test]
    fn test_subjects_keep_builtins_first() {
        let (mut store, _temp) = create_test_store();

        let oncology = Subject {
            id: 11,
            name: "Oncologia".to_string(),
            specialty: "Clínica".to_string(),
            topics: vec!["Linfomas".to_string()],
            custom: true,
        };

        // Custom subject only, no built-ins: they come back anyway
        store.save_subjects(&[oncology.clone()]).unwrap();
        let subjects = store.load_subjects().unwrap();

        assert_eq!(subjects.len(), 11);
        assert_eq!(subjects[0].name, "Cardiologia");
        assert_eq!(subjects[10], oncology);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let (store, _temp) = create_test_store();
        store.init().unwrap();
        fs::write(store.base_path().join("studies.json"), "{not json").unwrap();

        assert!(matches!(store.load_studies(), Err(StudyError::Json(_))));
    }
}
