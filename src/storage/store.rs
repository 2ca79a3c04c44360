use crate::study::models::{ScheduledReview, StudySession, Subject};

use super::file_storage::Result;

/// Persistence for the three study collections.
///
/// Every save is a full replace. `load_subjects` always yields the built-in
/// subjects first, in fixed order, followed by custom ones.
pub trait StudyStore {
    /// Sessions in insertion order
    fn load_studies(&self) -> Result<Vec<StudySession>>;
    fn save_studies(&mut self, studies: &[StudySession]) -> Result<()>;

    fn load_reviews(&self) -> Result<Vec<ScheduledReview>>;
    fn save_reviews(&mut self, reviews: &[ScheduledReview]) -> Result<()>;

    fn load_subjects(&self) -> Result<Vec<Subject>>;
    /// Full list, built-ins included
    fn save_subjects(&mut self, subjects: &[Subject]) -> Result<()>;
}
