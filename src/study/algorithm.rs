//! Fixed-interval review scheduling
//!
//! A session's percentage of correct answers picks a performance tier, and
//! the tier picks how many days later the topic comes back for review:
//!
//! | percentage | tier      | offset  |
//! |------------|-----------|---------|
//! | >= 90      | excellent | 14 days |
//! | >= 75      | good      | 7 days  |
//! | >= 60      | regular   | 4 days  |
//! | < 60       | weak      | 2 days  |
//!
//! Dates are timezone-naive calendar days.

use std::cmp::Ordering;

use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use super::models::{
    ClassifiedReview, Performance, ReviewStatus, ScheduleSummary, ScheduledReview, StudySession,
};

const EXCELLENT_THRESHOLD: u32 = 90;
const GOOD_THRESHOLD: u32 = 75;
const REGULAR_THRESHOLD: u32 = 60;

/// Percentage of correct answers, rounded half up. 0 when `total` is 0.
pub fn percentage(correct: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    let rounded = (200u128 * correct as u128 + total as u128) / (2 * total as u128);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// Performance tier for a percentage. Each lower bound is inclusive.
pub fn tier(percentage: u32) -> Performance {
    if percentage >= EXCELLENT_THRESHOLD {
        Performance::Excellent
    } else if percentage >= GOOD_THRESHOLD {
        Performance::Good
    } else if percentage >= REGULAR_THRESHOLD {
        Performance::Regular
    } else {
        Performance::Weak
    }
}

/// Date of the next review for a session taken on `study_date`, or `None`
/// past the last representable date
pub fn next_review_date(study_date: NaiveDate, performance: Performance) -> Option<NaiveDate> {
    study_date.checked_add_signed(Duration::days(performance.review_offset_days()))
}

/// Classify a scheduled date against today
pub fn review_status(scheduled_date: NaiveDate, today: NaiveDate) -> ReviewStatus {
    match scheduled_date.cmp(&today) {
        Ordering::Less => ReviewStatus::Overdue,
        Ordering::Equal => ReviewStatus::DueToday,
        Ordering::Greater => ReviewStatus::Upcoming,
    }
}

/// Build the single review that follows a study session
pub fn schedule_review(study: &StudySession) -> Option<ScheduledReview> {
    let scheduled_date = next_review_date(study.date, study.performance)?;
    log::debug!(
        "Scheduling {} / {} for {} ({}, +{}d)",
        study.subject_name,
        study.topic,
        scheduled_date,
        study.performance,
        study.performance.review_offset_days()
    );

    Some(ScheduledReview {
        id: Uuid::new_v4(),
        subject_id: study.subject_id,
        subject_name: study.subject_name.clone(),
        topic: study.topic.clone(),
        scheduled_date,
        original_study_id: study.id,
    })
}

/// Pair every review with its status, ordered by scheduled date (oldest first)
pub fn classify_reviews(reviews: &[ScheduledReview], today: NaiveDate) -> Vec<ClassifiedReview> {
    let mut classified: Vec<ClassifiedReview> = reviews
        .iter()
        .map(|review| ClassifiedReview {
            review: review.clone(),
            status: review_status(review.scheduled_date, today),
        })
        .collect();

    classified.sort_by(|a, b| a.review.scheduled_date.cmp(&b.review.scheduled_date));
    classified
}

/// Count classified reviews by status
pub fn summarize(classified: &[ClassifiedReview]) -> ScheduleSummary {
    let mut summary = ScheduleSummary::default();
    for item in classified {
        match item.status {
            ReviewStatus::Overdue => summary.overdue += 1,
            ReviewStatus::DueToday => summary.due_today += 1,
            ReviewStatus::Upcoming => summary.upcoming += 1,
        }
    }
    summary
}

/// Reviews still due today or later; everything overdue is dropped
pub fn clear_overdue(reviews: &[ScheduledReview], today: NaiveDate) -> Vec<ScheduledReview> {
    reviews
        .iter()
        .filter(|review| review.scheduled_date >= today)
        .cloned()
        .collect()
}

/// Short relative label for a review date, e.g. "today", "in 2w", "3d late"
pub fn describe_due(scheduled_date: NaiveDate, today: NaiveDate) -> String {
    let days = scheduled_date.signed_duration_since(today).num_days();
    match days.cmp(&0) {
        Ordering::Equal => "today".to_string(),
        Ordering::Greater => format!("in {}", format_interval(days)),
        Ordering::Less => format!("{} late", format_interval(-days)),
    }
}

/// Format a number of days as a compact interval
fn format_interval(days: i64) -> String {
    if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn review_on(day: &str) -> ScheduledReview {
        ScheduledReview {
            id: Uuid::new_v4(),
            subject_id: 1,
            subject_name: "Cardiologia".to_string(),
            topic: "Arritmias".to_string(),
            scheduled_date: date(day),
            original_study_id: 1,
        }
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(tier(0), Performance::Weak);
        assert_eq!(tier(59), Performance::Weak);
        assert_eq!(tier(60), Performance::Regular);
        assert_eq!(tier(74), Performance::Regular);
        assert_eq!(tier(75), Performance::Good);
        assert_eq!(tier(89), Performance::Good);
        assert_eq!(tier(90), Performance::Excellent);
        assert_eq!(tier(100), Performance::Excellent);
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        assert_eq!(percentage(8, 10), 80);
        assert_eq!(percentage(1, 8), 13); // 12.5
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(0, 5), 0);
        assert_eq!(percentage(5, 5), 100);
    }

    #[test]
    fn test_next_review_offsets() {
        let day = date("2024-03-01");
        assert_eq!(next_review_date(day, Performance::Excellent), Some(date("2024-03-15")));
        assert_eq!(next_review_date(day, Performance::Good), Some(date("2024-03-08")));
        assert_eq!(next_review_date(day, Performance::Regular), Some(date("2024-03-05")));
        assert_eq!(next_review_date(day, Performance::Weak), Some(date("2024-03-03")));
    }

    #[test]
    fn test_next_review_rolls_over_month_and_year() {
        assert_eq!(
            next_review_date(date("2024-01-30"), Performance::Excellent),
            Some(date("2024-02-13"))
        );
        assert_eq!(
            next_review_date(date("2024-02-27"), Performance::Regular),
            Some(date("2024-03-02"))
        );
        assert_eq!(
            next_review_date(date("2023-12-28"), Performance::Good),
            Some(date("2024-01-04"))
        );
    }

    #[test]
    fn test_next_review_past_last_date_is_none() {
        let near_end = NaiveDate::MAX - Duration::days(3);
        assert_eq!(next_review_date(near_end, Performance::Excellent), None);
        assert_eq!(next_review_date(near_end, Performance::Weak), Some(NaiveDate::MAX - Duration::days(1)));

        let study = StudySession::new(
            1,
            1,
            "Cardiologia".to_string(),
            "Arritmias".to_string(),
            10,
            10,
            near_end,
            None,
        );
        assert!(schedule_review(&study).is_none());
    }

    #[test]
    fn test_percentage_handles_large_totals() {
        assert_eq!(percentage(u64::MAX, u64::MAX), 100);
        assert_eq!(percentage(1, 0), 0);
    }

    #[test]
    fn test_review_status() {
        let today = date("2024-02-01");
        assert_eq!(review_status(date("2024-01-31"), today), ReviewStatus::Overdue);
        assert_eq!(review_status(today, today), ReviewStatus::DueToday);
        assert_eq!(review_status(date("2024-02-02"), today), ReviewStatus::Upcoming);
    }

    #[test]
    fn test_schedule_review_copies_study() {
        let study = StudySession::new(
            42,
            3,
            "Gastroenterologia".to_string(),
            "Cirrose".to_string(),
            5,
            10,
            date("2024-01-30"),
            None,
        );

        let review = schedule_review(&study).unwrap();
        assert_eq!(review.subject_id, 3);
        assert_eq!(review.subject_name, "Gastroenterologia");
        assert_eq!(review.topic, "Cirrose");
        assert_eq!(review.original_study_id, 42);
        assert_eq!(review.scheduled_date, date("2024-02-01"));
        assert!(review.scheduled_date > study.date);
    }

    #[test]
    fn test_classify_sorts_and_is_idempotent() {
        let reviews = vec![
            review_on("2024-02-05"),
            review_on("2024-01-20"),
            review_on("2024-02-01"),
        ];
        let today = date("2024-02-01");

        let first = classify_reviews(&reviews, today);
        let second = classify_reviews(&reviews, today);
        assert_eq!(first, second);

        let statuses: Vec<ReviewStatus> = first.iter().map(|c| c.status).collect();
        assert_eq!(
            statuses,
            vec![ReviewStatus::Overdue, ReviewStatus::DueToday, ReviewStatus::Upcoming]
        );

        let summary = summarize(&first);
        assert_eq!(summary.overdue, 1);
        assert_eq!(summary.due_today, 1);
        assert_eq!(summary.upcoming, 1);
    }

    #[test]
    fn test_clear_overdue_keeps_today_and_later() {
        let reviews = vec![
            review_on("2024-01-30"),
            review_on("2024-02-01"),
            review_on("2024-02-02"),
        ];

        let survivors = clear_overdue(&reviews, date("2024-02-01"));
        assert_eq!(survivors.len(), 2);
        assert_eq!(survivors[0], reviews[1]);
        assert_eq!(survivors[1], reviews[2]);
    }

    #[test]
    fn test_describe_due() {
        let today = date("2024-02-01");
        assert_eq!(describe_due(today, today), "today");
        assert_eq!(describe_due(date("2024-02-03"), today), "in 2d");
        assert_eq!(describe_due(date("2024-02-15"), today), "in 2w");
        assert_eq!(describe_due(date("2024-01-29"), today), "3d late");
        assert_eq!(describe_due(date("2024-04-01"), today), "in 2mo");
    }
}
