//! Data models for study sessions, scheduled reviews and subjects

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Performance tier derived from the percentage of correct answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Performance {
    #[serde(alias = "excelente")]
    Excellent,
    #[serde(alias = "bom")]
    Good,
    Regular,
    #[serde(alias = "fraco")]
    Weak,
}

impl Performance {
    /// Days between a study session and its follow-up review
    pub fn review_offset_days(self) -> i64 {
        match self {
            Self::Excellent => 14,
            Self::Good => 7,
            Self::Regular => 4,
            Self::Weak => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Regular => "regular",
            Self::Weak => "weak",
        }
    }
}

impl std::fmt::Display for Performance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a scheduled review sits relative to "today"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Overdue,
    DueToday,
    Upcoming,
}

impl ReviewStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::DueToday => "due_today",
            Self::Upcoming => "upcoming",
        }
    }
}

/// One logged practice-question attempt. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    /// Milliseconds since the Unix epoch at creation
    pub id: i64,
    pub subject_id: i64,
    /// Subject name at the time the session was recorded
    pub subject_name: String,
    pub topic: String,
    pub correct: u32,
    pub total: u32,
    pub percentage: u32,
    pub date: NaiveDate,
    pub performance: Performance,
    #[serde(
        default,
        deserialize_with = "deserialize_observations",
        skip_serializing_if = "Option::is_none"
    )]
    pub observations: Option<String>,
}

impl StudySession {
    /// Build a session, deriving percentage and performance from the counts.
    ///
    /// Counts are not checked here; see `tracker::validate_session`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        subject_id: i64,
        subject_name: String,
        topic: String,
        correct: u32,
        total: u32,
        date: NaiveDate,
        observations: Option<String>,
    ) -> Self {
        let percentage = super::algorithm::percentage(u64::from(correct), u64::from(total));
        Self {
            id,
            subject_id,
            subject_name,
            topic,
            correct,
            total,
            percentage,
            date,
            performance: super::algorithm::tier(percentage),
            observations: observations.filter(|o| !o.trim().is_empty()),
        }
    }

    /// Pick an id for a new session: the current timestamp, bumped past any
    /// existing id so ids stay unique when sessions are logged in quick succession.
    pub fn next_id(existing: &[StudySession], now_millis: i64) -> i64 {
        let highest = existing.iter().map(|s| s.id).max();
        match highest {
            Some(h) if h >= now_millis => h.saturating_add(1),
            _ => now_millis,
        }
    }
}

fn deserialize_observations<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|o| !o.trim().is_empty()))
}

/// A future date on which a topic should be revisited
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledReview {
    #[serde(deserialize_with = "deserialize_review_id")]
    pub id: Uuid,
    pub subject_id: i64,
    pub subject_name: String,
    pub topic: String,
    pub scheduled_date: NaiveDate,
    /// Session that produced this review. Not an owning reference.
    pub original_study_id: i64,
}

/// Map a non-UUID review id (older backups used numeric ids) onto a stable UUID
pub fn legacy_review_id(raw: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("studylog-review:{}", raw).as_bytes())
}

fn deserialize_review_id<'de, D>(deserializer: D) -> Result<Uuid, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Uuid(Uuid),
        Number(serde_json::Number),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Uuid(id) => id,
        RawId::Number(n) => legacy_review_id(&n.to_string()),
        RawId::Text(s) => legacy_review_id(&s),
    })
}

/// A named knowledge area with a specialty and an ordered topic list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: i64,
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(alias = "especialidade")]
    pub specialty: String,
    #[serde(default, alias = "assuntos")]
    pub topics: Vec<String>,
    /// False for built-in subjects
    #[serde(default)]
    pub custom: bool,
}

/// Input for recording a study session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudy {
    pub subject_id: i64,
    pub topic: String,
    pub correct: u32,
    pub total: u32,
    pub date: NaiveDate,
    #[serde(default)]
    pub observations: Option<String>,
}

/// Input for adding a custom subject
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubject {
    pub name: String,
    pub specialty: String,
    pub topics: Vec<String>,
}

/// Result of recording a study session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordOutcome {
    pub study: StudySession,
    /// Review scheduled from this session
    pub review: ScheduledReview,
    /// Pending reviews this session satisfied and retired
    pub satisfied: Vec<ScheduledReview>,
    pub review_was_satisfied: bool,
}

/// A review paired with its status for one "today"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedReview {
    #[serde(flatten)]
    pub review: ScheduledReview,
    pub status: ReviewStatus,
}

/// Review counts by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    pub overdue: usize,
    pub due_today: usize,
    pub upcoming: usize,
}

/// The classified schedule for one day
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub today: NaiveDate,
    pub reviews: Vec<ClassifiedReview>,
    pub summary: ScheduleSummary,
}

/// Dashboard aggregates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyStats {
    pub total_studies: usize,
    pub total_questions: u64,
    pub total_correct: u64,
    /// Percent of all questions answered correctly
    pub average_score: u32,
    pub pending_reviews: usize,
}

/// Aggregate score for one subject name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPerformance {
    pub subject_name: String,
    pub correct: u64,
    pub total: u64,
    pub percentage: u32,
}

/// One point of the score-over-time series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionPoint {
    pub date: NaiveDate,
    pub percentage: u32,
}
