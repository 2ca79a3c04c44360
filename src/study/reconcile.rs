//! Retiring scheduled reviews that a new study session satisfies
//!
//! A review is satisfied by a session on the same subject and topic whose
//! date falls within `MATCH_TOLERANCE_DAYS` of the scheduled date, on either
//! side. The window is an approximation: an unrelated session on the same
//! topic close to the date also clears the review.

use chrono::NaiveDate;

use super::models::{ScheduledReview, StudySession};

/// Inclusive distance, in calendar days, between a review and a matching session
pub const MATCH_TOLERANCE_DAYS: i64 = 3;

/// Result of reconciling a session against the pending reviews
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    /// Reviews left after removing the satisfied ones, in their original order
    pub remaining: Vec<ScheduledReview>,
    /// Reviews the session satisfied
    pub removed: Vec<ScheduledReview>,
}

impl Reconciliation {
    pub fn review_was_satisfied(&self) -> bool {
        !self.removed.is_empty()
    }
}

fn matches(review: &ScheduledReview, subject_id: i64, topic: &str, on_date: NaiveDate) -> bool {
    review.subject_id == subject_id
        && review.topic == topic
        && review
            .scheduled_date
            .signed_duration_since(on_date)
            .num_days()
            .abs()
            <= MATCH_TOLERANCE_DAYS
}

/// Whether `study` completes `review`
pub fn is_satisfied_by(review: &ScheduledReview, study: &StudySession) -> bool {
    matches(review, study.subject_id, &study.topic, study.date)
}

/// Split `reviews` into the ones `study` satisfies and the ones it leaves.
///
/// Every match is removed, including stale duplicates for the same topic.
/// Must run against the reviews as they were before the session's own
/// follow-up review is added.
pub fn reconcile(reviews: Vec<ScheduledReview>, study: &StudySession) -> Reconciliation {
    let (removed, remaining): (Vec<_>, Vec<_>) = reviews
        .into_iter()
        .partition(|review| is_satisfied_by(review, study));

    if !removed.is_empty() {
        log::info!(
            "Session on {} / {} ({}) satisfied {} pending review(s)",
            study.subject_name,
            study.topic,
            study.date,
            removed.len()
        );
    }

    Reconciliation { remaining, removed }
}

/// First pending review a session on `on_date` would satisfy
pub fn find_pending_match<'a>(
    reviews: &'a [ScheduledReview],
    subject_id: i64,
    topic: &str,
    on_date: NaiveDate,
) -> Option<&'a ScheduledReview> {
    reviews
        .iter()
        .find(|review| matches(review, subject_id, topic, on_date))
}
