//! Study log operations over a `StudyStore`
//!
//! Each operation loads whole collections, computes, and saves whole
//! collections. The tracker owns its store, so a record (reconcile, append,
//! schedule) runs under one `&mut` borrow with no interleaved writer.

use chrono::{DateTime, NaiveDate, Utc};

use super::algorithm::{self, classify_reviews, schedule_review, summarize};
use super::builtin::{is_builtin, sample_reviews, sample_studies};
use super::models::*;
use super::reconcile::{find_pending_match, reconcile};
use super::stats::{self, HistoryFilter};
use super::subjects::build_custom_subject;
use crate::storage::backup::{self, BackupDocument, ImportPayload, ImportSummary};
use crate::storage::{Result, StudyError, StudyStore};

/// Check the counts and fields of a session before it is stored
pub fn validate_session(study: &StudySession) -> Result<()> {
    if study.total < 1 {
        return Err(StudyError::Validation(
            "Total questions must be at least 1".to_string(),
        ));
    }
    if study.correct > study.total {
        return Err(StudyError::Validation(format!(
            "Correct answers ({}) cannot exceed total ({})",
            study.correct, study.total
        )));
    }
    if study.topic.trim().is_empty() {
        return Err(StudyError::Validation("Topic is required".to_string()));
    }
    if study.subject_name.trim().is_empty() {
        return Err(StudyError::Validation("Subject name is required".to_string()));
    }
    if study.percentage != algorithm::percentage(u64::from(study.correct), u64::from(study.total))
        || study.performance != algorithm::tier(study.percentage)
    {
        return Err(StudyError::Validation(format!(
            "Session {} has a percentage or tier that does not match its counts",
            study.id
        )));
    }
    Ok(())
}

pub struct StudyTracker<S: StudyStore> {
    store: S,
}

impl<S: StudyStore> StudyTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn studies(&self) -> Result<Vec<StudySession>> {
        self.store.load_studies()
    }

    pub fn reviews(&self) -> Result<Vec<ScheduledReview>> {
        self.store.load_reviews()
    }

    pub fn subjects(&self) -> Result<Vec<Subject>> {
        self.store.load_subjects()
    }

    /// Write the sample sessions if the log is empty. Returns whether it did.
    pub fn seed_sample_data(&mut self) -> Result<bool> {
        if !self.store.load_studies()?.is_empty() {
            return Ok(false);
        }

        self.store.save_studies(&sample_studies())?;
        self.store.save_reviews(&sample_reviews())?;
        log::info!("Seeded sample study data");
        Ok(true)
    }

    // ==================== Recording ====================

    /// Turn form input into a session: validate, snapshot the subject name,
    /// derive percentage and tier, and pick a time-based id.
    pub fn prepare_study(&self, request: NewStudy, now: DateTime<Utc>) -> Result<StudySession> {
        let topic = request.topic.trim().to_string();
        if topic.is_empty() {
            return Err(StudyError::Validation("Topic is required".to_string()));
        }
        if request.total < 1 {
            return Err(StudyError::Validation(
                "Total questions must be at least 1".to_string(),
            ));
        }
        if request.correct > request.total {
            return Err(StudyError::Validation(format!(
                "Correct answers ({}) cannot exceed total ({})",
                request.correct, request.total
            )));
        }

        let subject = self
            .store
            .load_subjects()?
            .into_iter()
            .find(|s| s.id == request.subject_id)
            .ok_or(StudyError::SubjectNotFound(request.subject_id))?;

        let existing = self.store.load_studies()?;
        let id = StudySession::next_id(&existing, now.timestamp_millis());

        Ok(StudySession::new(
            id,
            subject.id,
            subject.name,
            topic,
            request.correct,
            request.total,
            request.date,
            request.observations.map(|o| o.trim().to_string()),
        ))
    }

    /// Validate and record form input in one step
    pub fn record_new_study(&mut self, request: NewStudy, now: DateTime<Utc>) -> Result<RecordOutcome> {
        let study = self.prepare_study(request, now)?;
        self.record_study(study)
    }

    /// Record a session: retire the pending reviews it satisfies, append it to
    /// the log, and schedule its follow-up review.
    pub fn record_study(&mut self, study: StudySession) -> Result<RecordOutcome> {
        validate_session(&study)?;

        let mut studies = self.store.load_studies()?;
        if studies.iter().any(|s| s.id == study.id) {
            return Err(StudyError::Validation(format!(
                "Session {} already exists",
                study.id
            )));
        }

        let review = schedule_review(&study).ok_or_else(|| {
            StudyError::Validation(format!(
                "Session date {} is too late to schedule a review",
                study.date
            ))
        })?;

        // Cleanup runs against the reviews as they were before this session
        let reviews = self.store.load_reviews()?;
        let reconciliation = reconcile(reviews, &study);
        let review_was_satisfied = reconciliation.review_was_satisfied();

        let mut reviews = reconciliation.remaining;
        reviews.push(review.clone());

        studies.push(study.clone());
        self.store.save_studies(&studies)?;
        self.store.save_reviews(&reviews)?;

        log::info!(
            "Recorded {} / {} on {}: {}/{} ({}%, {}), next review {}",
            study.subject_name,
            study.topic,
            study.date,
            study.correct,
            study.total,
            study.percentage,
            study.performance,
            review.scheduled_date
        );

        Ok(RecordOutcome {
            study,
            review,
            satisfied: reconciliation.removed,
            review_was_satisfied,
        })
    }

    /// Delete a session by id. Its scheduled review stays. Returns whether
    /// anything was removed.
    pub fn delete_study(&mut self, study_id: i64) -> Result<bool> {
        let mut studies = self.store.load_studies()?;
        let len_before = studies.len();
        studies.retain(|s| s.id != study_id);

        if studies.len() == len_before {
            log::debug!("Session {} not found, nothing to delete", study_id);
            return Ok(false);
        }

        self.store.save_studies(&studies)?;
        log::info!("Deleted session {}", study_id);
        Ok(true)
    }

    // ==================== Schedule ====================

    /// All pending reviews classified against one `today`, with counts
    pub fn schedule(&self, today: NaiveDate) -> Result<Schedule> {
        let reviews = self.store.load_reviews()?;
        let classified = classify_reviews(&reviews, today);
        let summary = summarize(&classified);

        Ok(Schedule {
            today,
            reviews: classified,
            summary,
        })
    }

    /// Remove every review scheduled before `today`. Returns how many went.
    pub fn clear_overdue(&mut self, today: NaiveDate) -> Result<usize> {
        let reviews = self.store.load_reviews()?;
        let survivors = algorithm::clear_overdue(&reviews, today);
        let removed = reviews.len() - survivors.len();

        if removed > 0 {
            self.store.save_reviews(&survivors)?;
            log::info!("Cleared {} overdue review(s) before {}", removed, today);
        }
        Ok(removed)
    }

    /// Pending review that a session on `on_date` would satisfy, if any
    pub fn pending_match(
        &self,
        subject_id: i64,
        topic: &str,
        on_date: NaiveDate,
    ) -> Result<Option<ScheduledReview>> {
        let reviews = self.store.load_reviews()?;
        Ok(find_pending_match(&reviews, subject_id, topic.trim(), on_date).cloned())
    }

    // ==================== Subjects ====================

    pub fn add_subject(&mut self, request: NewSubject) -> Result<Subject> {
        let mut subjects = self.store.load_subjects()?;
        let subject = build_custom_subject(request, &subjects)?;

        subjects.push(subject.clone());
        self.store.save_subjects(&subjects)?;

        log::info!("Added subject {} ({})", subject.name, subject.id);
        Ok(subject)
    }

    /// Delete a custom subject. Sessions and reviews keep their snapshot of
    /// its name. Returns whether anything was removed.
    pub fn delete_subject(&mut self, subject_id: i64) -> Result<bool> {
        if is_builtin(subject_id) {
            return Err(StudyError::BuiltinSubject(subject_id));
        }

        let mut subjects = self.store.load_subjects()?;
        let len_before = subjects.len();
        subjects.retain(|s| s.id != subject_id);

        if subjects.len() == len_before {
            return Ok(false);
        }

        self.store.save_subjects(&subjects)?;
        log::info!("Deleted subject {}", subject_id);
        Ok(true)
    }

    // ==================== Stats ====================

    pub fn stats(&self) -> Result<StudyStats> {
        let studies = self.store.load_studies()?;
        let reviews = self.store.load_reviews()?;
        Ok(stats::compute_stats(&studies, &reviews))
    }

    pub fn subject_performance(&self) -> Result<Vec<SubjectPerformance>> {
        Ok(stats::subject_performance(&self.store.load_studies()?))
    }

    pub fn evolution(&self) -> Result<Vec<EvolutionPoint>> {
        Ok(stats::evolution(&self.store.load_studies()?))
    }

    pub fn history(&self, filter: &HistoryFilter) -> Result<Vec<StudySession>> {
        Ok(stats::filter_history(&self.store.load_studies()?, filter))
    }

    // ==================== Backup ====================

    pub fn export(&self, now: DateTime<Utc>) -> Result<BackupDocument> {
        Ok(backup::export_document(
            self.store.load_studies()?,
            self.store.load_reviews()?,
            self.store.load_subjects()?,
            now,
        ))
    }

    /// Replace collections from a backup file's contents. Nothing is written
    /// unless the whole file parses.
    pub fn import(&mut self, content: &str) -> Result<ImportSummary> {
        let summary = match backup::parse_import(content)? {
            ImportPayload::Full {
                studies,
                reviews,
                subjects,
            } => {
                self.store.save_studies(&studies)?;
                self.store.save_reviews(&reviews)?;
                let subject_count = match subjects {
                    Some(subjects) => {
                        self.store.save_subjects(&subjects)?;
                        Some(subjects.len())
                    }
                    None => None,
                };
                ImportSummary {
                    studies: studies.len(),
                    reviews: reviews.len(),
                    subjects: subject_count,
                    legacy: false,
                }
            }
            ImportPayload::Legacy { studies } => {
                self.store.save_studies(&studies)?;
                self.store.save_reviews(&[])?;
                ImportSummary {
                    studies: studies.len(),
                    reviews: 0,
                    subjects: None,
                    legacy: true,
                }
            }
        };

        log::info!(
            "Imported {} studies and {} reviews{}",
            summary.studies,
            summary.reviews,
            if summary.legacy { " (legacy format)" } else { "" }
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};
    use tempfile::TempDir;
    use uuid::Uuid;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-20T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn review(subject_id: i64, topic: &str, day: &str) -> ScheduledReview {
        ScheduledReview {
            id: Uuid::new_v4(),
            subject_id,
            subject_name: "Cardiologia".to_string(),
            topic: topic.to_string(),
            scheduled_date: date(day),
            original_study_id: 1,
        }
    }

    fn request(subject_id: i64, topic: &str, correct: u32, total: u32, day: &str) -> NewStudy {
        NewStudy {
            subject_id,
            topic: topic.to_string(),
            correct,
            total,
            date: date(day),
            observations: None,
        }
    }

    fn tracker_with_reviews(reviews: Vec<ScheduledReview>) -> StudyTracker<MemoryStore> {
        StudyTracker::new(MemoryStore::with_data(Vec::new(), reviews))
    }

    #[test]
    fn test_record_satisfies_pending_review() {
        let pending = review(1, "Arritmias", "2024-01-22");
        let mut tracker = tracker_with_reviews(vec![pending.clone()]);

        let outcome = tracker
            .record_new_study(request(1, "Arritmias", 8, 10, "2024-01-20"), now())
            .unwrap();

        assert!(outcome.review_was_satisfied);
        assert_eq!(outcome.satisfied, vec![pending]);

        let reviews = tracker.reviews().unwrap();
        assert_eq!(reviews, vec![outcome.review.clone()]);
        assert_eq!(outcome.review.scheduled_date, date("2024-01-27"));
        assert_eq!(outcome.review.original_study_id, outcome.study.id);
        assert_eq!(tracker.studies().unwrap(), vec![outcome.study]);
    }

    #[test]
    fn test_record_leaves_distant_review() {
        let far = review(1, "Arritmias", "2024-01-24");
        let mut tracker = tracker_with_reviews(vec![far.clone()]);

        let outcome = tracker
            .record_new_study(request(1, "Arritmias", 8, 10, "2024-01-20"), now())
            .unwrap();

        assert!(!outcome.review_was_satisfied);
        let reviews = tracker.reviews().unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0], far);
    }

    #[test]
    fn test_record_removes_all_duplicates() {
        let mut tracker = tracker_with_reviews(vec![
            review(1, "Arritmias", "2024-01-18"),
            review(1, "Arritmias", "2024-01-22"),
            review(2, "Asma", "2024-01-20"),
        ]);

        let outcome = tracker
            .record_new_study(request(1, "Arritmias", 5, 10, "2024-01-20"), now())
            .unwrap();

        assert_eq!(outcome.satisfied.len(), 2);
        let reviews = tracker.reviews().unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].topic, "Asma");
        assert_eq!(reviews[1].scheduled_date, date("2024-01-22"));
    }

    #[test]
    fn test_record_snapshots_subject_name() {
        let mut tracker = tracker_with_reviews(Vec::new());
        let outcome = tracker
            .record_new_study(request(4, "  AVC ", 9, 10, "2024-01-20"), now())
            .unwrap();

        assert_eq!(outcome.study.subject_name, "Neurologia");
        assert_eq!(outcome.study.topic, "AVC");
        assert_eq!(outcome.study.performance, Performance::Excellent);
        assert_eq!(outcome.study.id, now().timestamp_millis());
    }

    #[test]
    fn test_ids_stay_unique_within_same_millisecond() {
        let mut tracker = tracker_with_reviews(Vec::new());
        let first = tracker
            .record_new_study(request(1, "Asma", 1, 2, "2024-01-20"), now())
            .unwrap();
        let second = tracker
            .record_new_study(request(1, "Asma", 1, 2, "2024-01-20"), now())
            .unwrap();

        assert_eq!(second.study.id, first.study.id + 1);
    }

    #[test]
    fn test_invalid_input_is_rejected_and_not_stored() {
        let mut tracker = tracker_with_reviews(Vec::new());

        for bad in [
            request(1, "Arritmias", 11, 10, "2024-01-20"),
            request(1, "Arritmias", 0, 0, "2024-01-20"),
            request(1, "  ", 1, 1, "2024-01-20"),
        ] {
            assert!(matches!(
                tracker.record_new_study(bad, now()),
                Err(StudyError::Validation(_))
            ));
        }
        assert!(matches!(
            tracker.record_new_study(request(99, "X", 1, 1, "2024-01-20"), now()),
            Err(StudyError::SubjectNotFound(99))
        ));

        assert!(tracker.studies().unwrap().is_empty());
        assert!(tracker.reviews().unwrap().is_empty());
    }

    #[test]
    fn test_record_rejects_inconsistent_session() {
        let mut tracker = tracker_with_reviews(Vec::new());
        let mut study = StudySession::new(
            1,
            1,
            "Cardiologia".to_string(),
            "Arritmias".to_string(),
            5,
            10,
            date("2024-01-20"),
            None,
        );
        study.performance = Performance::Excellent;

        assert!(matches!(
            tracker.record_study(study),
            Err(StudyError::Validation(_))
        ));
    }

    #[test]
    fn test_record_rejects_date_without_review_slot() {
        let pending = review(1, "Arritmias", "2024-01-22");
        let mut tracker = tracker_with_reviews(vec![pending.clone()]);
        let mut late = request(1, "Arritmias", 10, 10, "2024-01-20");
        late.date = NaiveDate::MAX - chrono::Duration::days(3);

        assert!(matches!(
            tracker.record_new_study(late, now()),
            Err(StudyError::Validation(_))
        ));
        assert!(tracker.studies().unwrap().is_empty());
        assert_eq!(tracker.reviews().unwrap(), vec![pending]);
    }

    #[test]
    fn test_import_rejects_inconsistent_session() {
        let mut tracker = tracker_with_reviews(Vec::new());
        let json = r#"[{
            "id": 1, "subjectId": 1, "subjectName": "Cardiologia", "topic": "Arritmias",
            "correct": 1, "total": 10, "percentage": 100, "date": "2024-01-15",
            "performance": "excellent"
        }]"#;

        assert!(matches!(tracker.import(json), Err(StudyError::ImportFormat(_))));
        assert!(tracker.studies().unwrap().is_empty());
    }

    #[test]
    fn test_delete_study_keeps_review() {
        let mut tracker = tracker_with_reviews(Vec::new());
        let outcome = tracker
            .record_new_study(request(1, "Arritmias", 8, 10, "2024-01-20"), now())
            .unwrap();

        assert!(tracker.delete_study(outcome.study.id).unwrap());
        assert!(!tracker.delete_study(outcome.study.id).unwrap());
        assert!(tracker.studies().unwrap().is_empty());
        assert_eq!(tracker.reviews().unwrap().len(), 1);
    }

    #[test]
    fn test_schedule_and_clear_overdue() {
        let mut tracker = tracker_with_reviews(vec![
            review(1, "A", "2024-02-02"),
            review(1, "B", "2024-01-30"),
            review(1, "C", "2024-02-01"),
        ]);
        let today = date("2024-02-01");

        let schedule = tracker.schedule(today).unwrap();
        assert_eq!(schedule.summary.overdue, 1);
        assert_eq!(schedule.summary.due_today, 1);
        assert_eq!(schedule.summary.upcoming, 1);
        assert_eq!(schedule.reviews[0].review.topic, "B");

        assert_eq!(tracker.clear_overdue(today).unwrap(), 1);
        let topics: Vec<String> = tracker.reviews().unwrap().into_iter().map(|r| r.topic).collect();
        assert_eq!(topics, vec!["A", "C"]);
        assert_eq!(tracker.clear_overdue(today).unwrap(), 0);
    }

    #[test]
    fn test_pending_match() {
        let tracker = tracker_with_reviews(vec![review(1, "Arritmias", "2024-01-22")]);

        assert!(tracker
            .pending_match(1, "Arritmias", date("2024-01-25"))
            .unwrap()
            .is_some());
        assert!(tracker
            .pending_match(1, "Arritmias", date("2024-01-26"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_subjects_add_and_delete() {
        let mut tracker = tracker_with_reviews(Vec::new());

        let subject = tracker
            .add_subject(NewSubject {
                name: "Oncologia".to_string(),
                specialty: "Clínica".to_string(),
                topics: vec!["Linfomas".to_string()],
            })
            .unwrap();
        assert_eq!(subject.id, 11);
        assert_eq!(tracker.subjects().unwrap().len(), 11);

        let outcome = tracker
            .record_new_study(request(11, "Linfomas", 3, 4, "2024-01-20"), now())
            .unwrap();

        assert!(tracker.delete_subject(11).unwrap());
        assert!(!tracker.delete_subject(11).unwrap());
        assert_eq!(tracker.subjects().unwrap().len(), 10);

        // Snapshots survive the subject
        assert_eq!(tracker.studies().unwrap()[0].subject_name, "Oncologia");
        assert_eq!(tracker.reviews().unwrap()[0], outcome.review);

        assert!(matches!(
            tracker.delete_subject(1),
            Err(StudyError::BuiltinSubject(1))
        ));
    }

    #[test]
    fn test_stats() {
        let mut tracker = tracker_with_reviews(Vec::new());
        tracker
            .record_new_study(request(1, "Arritmias", 8, 10, "2024-01-20"), now())
            .unwrap();
        tracker
            .record_new_study(request(2, "Asma", 6, 10, "2024-01-18"), now())
            .unwrap();

        let stats = tracker.stats().unwrap();
        assert_eq!(stats.total_studies, 2);
        assert_eq!(stats.average_score, 70);
        assert_eq!(stats.pending_reviews, 2);

        let evolution = tracker.evolution().unwrap();
        assert_eq!(evolution[0].date, date("2024-01-18"));
        assert_eq!(tracker.subject_performance().unwrap().len(), 2);
    }

    #[test]
    fn test_seed_sample_data_only_once() {
        let mut tracker = tracker_with_reviews(Vec::new());
        assert!(tracker.seed_sample_data().unwrap());
        assert!(!tracker.seed_sample_data().unwrap());
        assert_eq!(tracker.studies().unwrap().len(), 2);
        assert_eq!(tracker.reviews().unwrap().len(), 1);
    }

    #[test]
    fn test_export_import_round_trip_on_disk() {
        let temp = TempDir::new().unwrap();
        let mut source = StudyTracker::new(FileStore::new(temp.path().join("source")));
        source.seed_sample_data().unwrap();
        source
            .add_subject(NewSubject {
                name: "Oncologia".to_string(),
                specialty: "Clínica".to_string(),
                topics: vec!["Linfomas".to_string()],
            })
            .unwrap();
        source
            .record_new_study(request(11, "Linfomas", 3, 4, "2024-01-20"), now())
            .unwrap();

        let json = backup::to_json(&source.export(now()).unwrap()).unwrap();

        let mut target = StudyTracker::new(FileStore::new(temp.path().join("target")));
        let summary = target.import(&json).unwrap();
        assert_eq!(summary.studies, 3);
        assert_eq!(summary.subjects, Some(11));

        assert_eq!(target.studies().unwrap(), source.studies().unwrap());
        assert_eq!(target.reviews().unwrap(), source.reviews().unwrap());
        assert_eq!(target.subjects().unwrap(), source.subjects().unwrap());

        let again = backup::to_json(&target.export(now()).unwrap()).unwrap();
        assert_eq!(again, json);
    }

    #[test]
    fn test_legacy_import_clears_reviews_keeps_subjects() {
        let mut tracker = tracker_with_reviews(vec![review(1, "Arritmias", "2024-01-22")]);
        tracker
            .add_subject(NewSubject {
                name: "Oncologia".to_string(),
                specialty: "Clínica".to_string(),
                topics: vec!["Linfomas".to_string()],
            })
            .unwrap();

        let json = serde_json::to_string(&sample_studies()).unwrap();
        let summary = tracker.import(&json).unwrap();

        assert!(summary.legacy);
        assert_eq!(tracker.studies().unwrap(), sample_studies());
        assert!(tracker.reviews().unwrap().is_empty());
        assert_eq!(tracker.subjects().unwrap().len(), 11);
    }

    #[test]
    fn test_bad_import_changes_nothing() {
        let mut tracker = tracker_with_reviews(Vec::new());
        tracker.seed_sample_data().unwrap();
        let studies_before = tracker.studies().unwrap();
        let reviews_before = tracker.reviews().unwrap();

        for bad in [r#"{"hello": "world"}"#, r#"{"version": "2.0", "studies": [{"id": 1}]}"#] {
            assert!(matches!(tracker.import(bad), Err(StudyError::ImportFormat(_))));
        }
        assert_eq!(tracker.studies().unwrap(), studies_before);
        assert_eq!(tracker.reviews().unwrap(), reviews_before);
    }
}
