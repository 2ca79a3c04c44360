use crate::study::models::{ScheduledReview, StudySession, Subject};
use crate::study::subjects::merge_with_builtins;

use super::file_storage::Result;
use super::store::StudyStore;

/// In-memory store, for embedding the tracker without a data directory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    studies: Vec<StudySession>,
    reviews: Vec<ScheduledReview>,
    subjects: Vec<Subject>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(studies: Vec<StudySession>, reviews: Vec<ScheduledReview>) -> Self {
        Self {
            studies,
            reviews,
            subjects: Vec::new(),
        }
    }
}

impl StudyStore for MemoryStore {
    fn load_studies(&self) -> Result<Vec<StudySession>> {
        Ok(self.studies.clone())
    }

    fn save_studies(&mut self, studies: &[StudySession]) -> Result<()> {
        self.studies = studies.to_vec();
        Ok(())
    }

    fn load_reviews(&self) -> Result<Vec<ScheduledReview>> {
        Ok(self.reviews.clone())
    }

    fn save_reviews(&mut self, reviews: &[ScheduledReview]) -> Result<()> {
        self.reviews = reviews.to_vec();
        Ok(())
    }

    fn load_subjects(&self) -> Result<Vec<Subject>> {
        Ok(merge_with_builtins(self.subjects.clone()))
    }

    fn save_subjects(&mut self, subjects: &[Subject]) -> Result<()> {
        self.subjects = subjects.to_vec();
        Ok(())
    }
}
