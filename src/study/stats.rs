//! Simple aggregates over the study log

use serde::{Deserialize, Serialize};

use super::algorithm::percentage;
use super::models::{EvolutionPoint, ScheduledReview, StudySession, StudyStats, SubjectPerformance};

/// Totals and overall score
pub fn compute_stats(studies: &[StudySession], reviews: &[ScheduledReview]) -> StudyStats {
    let total_questions: u64 = studies.iter().map(|s| s.total as u64).sum();
    let total_correct: u64 = studies.iter().map(|s| s.correct as u64).sum();

    StudyStats {
        total_studies: studies.len(),
        total_questions,
        total_correct,
        average_score: percentage(total_correct, total_questions),
        pending_reviews: reviews.len(),
    }
}

/// Score per subject name, in the order subjects first appear in the log
pub fn subject_performance(studies: &[StudySession]) -> Vec<SubjectPerformance> {
    let mut rows: Vec<SubjectPerformance> = Vec::new();

    for study in studies {
        let row = match rows.iter().position(|r| r.subject_name == study.subject_name) {
            Some(pos) => &mut rows[pos],
            None => {
                rows.push(SubjectPerformance {
                    subject_name: study.subject_name.clone(),
                    correct: 0,
                    total: 0,
                    percentage: 0,
                });
                let last = rows.len() - 1;
                &mut rows[last]
            }
        };
        row.correct += study.correct as u64;
        row.total += study.total as u64;
    }

    for row in &mut rows {
        row.percentage = percentage(row.correct, row.total);
    }
    rows
}

/// Session scores ordered by date
pub fn evolution(studies: &[StudySession]) -> Vec<EvolutionPoint> {
    let mut sorted: Vec<&StudySession> = studies.iter().collect();
    sorted.sort_by_key(|s| s.date);
    sorted
        .into_iter()
        .map(|s| EvolutionPoint {
            date: s.date,
            percentage: s.percentage,
        })
        .collect()
}

/// Exact-match filters for the history view
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryFilter {
    pub subject_name: Option<String>,
    pub topic: Option<String>,
}

/// Sessions matching `filter`, newest first
pub fn filter_history(studies: &[StudySession], filter: &HistoryFilter) -> Vec<StudySession> {
    let mut filtered: Vec<StudySession> = studies
        .iter()
        .filter(|s| {
            filter
                .subject_name
                .as_ref()
                .map_or(true, |name| &s.subject_name == name)
        })
        .filter(|s| filter.topic.as_ref().map_or(true, |topic| &s.topic == topic))
        .cloned()
        .collect();

    filtered.sort_by(|a, b| b.date.cmp(&a.date));
    filtered
}

/// Distinct subject names and topics in the log, first-seen order
pub fn history_choices(studies: &[StudySession]) -> (Vec<String>, Vec<String>) {
    let mut subjects: Vec<String> = Vec::new();
    let mut topics: Vec<String> = Vec::new();

    for study in studies {
        if !subjects.contains(&study.subject_name) {
            subjects.push(study.subject_name.clone());
        }
        if !topics.contains(&study.topic) {
            topics.push(study.topic.clone());
        }
    }

    (subjects, topics)
}
