//! Import and export of the whole study log as one JSON document
//!
//! Two shapes are accepted on import:
//! - the versioned envelope `{studies, reviews, subjects, exportDate, version}`
//! - a bare array of study sessions (older backups); reviews are cleared and
//!   subjects left alone
//!
//! Anything else is rejected before any collection is touched.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::file_storage::{Result, StudyError};
use crate::study::algorithm::{percentage, tier};
use crate::study::models::{ScheduledReview, StudySession, Subject};

/// Version written on export
pub const EXPORT_VERSION: &str = "2.0";

/// Envelope versions understood on import
pub const SUPPORTED_VERSIONS: &[&str] = &["1.0", "2.0"];

/// Allowed distance between a stored percentage and the recomputed one
const PERCENTAGE_TOLERANCE: u32 = 1;

/// Full backup document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub studies: Vec<StudySession>,
    pub reviews: Vec<ScheduledReview>,
    pub subjects: Vec<Subject>,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

/// What an import file asks to replace
#[derive(Debug, Clone)]
pub enum ImportPayload {
    /// Versioned envelope. `subjects` is `None` when the file has none.
    Full {
        studies: Vec<StudySession>,
        reviews: Vec<ScheduledReview>,
        subjects: Option<Vec<Subject>>,
    },
    /// Bare array of studies
    Legacy { studies: Vec<StudySession> },
}

/// Counts reported after an import
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub studies: usize,
    pub reviews: usize,
    /// `None` when subjects were left untouched
    pub subjects: Option<usize>,
    pub legacy: bool,
}

/// Build an export document for the given collections
pub fn export_document(
    studies: Vec<StudySession>,
    reviews: Vec<ScheduledReview>,
    subjects: Vec<Subject>,
    export_date: DateTime<Utc>,
) -> BackupDocument {
    BackupDocument {
        studies,
        reviews,
        subjects,
        export_date,
        version: EXPORT_VERSION.to_string(),
    }
}

/// Suggested file name for a backup taken on `date`
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("studylog_backup_{}.json", date.format("%Y-%m-%d"))
}

/// Serialize a document as pretty JSON
pub fn to_json(document: &BackupDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Write a document to `output_path`
pub fn write_backup(document: &BackupDocument, output_path: &Path) -> Result<()> {
    fs::write(output_path, to_json(document)?)?;
    log::info!(
        "Exported {} studies, {} reviews, {} subjects to {:?}",
        document.studies.len(),
        document.reviews.len(),
        document.subjects.len(),
        output_path
    );
    Ok(())
}

fn format_error(message: impl Into<String>) -> StudyError {
    StudyError::ImportFormat(message.into())
}

fn decode<T: serde::de::DeserializeOwned>(value: Value, what: &str) -> Result<T> {
    serde_json::from_value(value).map_err(|e| format_error(format!("{}: {}", what, e)))
}

/// Parse and check an import file without touching any store
pub fn parse_import(content: &str) -> Result<ImportPayload> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| format_error(format!("not valid JSON: {}", e)))?;

    let payload = match value {
        Value::Array(_) => ImportPayload::Legacy {
            studies: decode(value, "studies")?,
        },
        Value::Object(mut map) => {
            let version = match map.get("version") {
                Some(Value::String(v)) => v.clone(),
                Some(other) => return Err(format_error(format!("unsupported version {}", other))),
                None => return Err(format_error("missing version")),
            };
            if !SUPPORTED_VERSIONS.contains(&version.as_str()) {
                return Err(format_error(format!("unsupported version {}", version)));
            }

            let studies = match map.remove("studies") {
                Some(studies) => decode(studies, "studies")?,
                None => return Err(format_error("missing studies")),
            };
            let reviews = match map.remove("reviews") {
                Some(Value::Null) | None => Vec::new(),
                Some(reviews) => decode(reviews, "reviews")?,
            };
            let subjects = match map.remove("subjects") {
                Some(Value::Null) | None => None,
                Some(subjects) => Some(decode(subjects, "subjects")?),
            };

            ImportPayload::Full {
                studies,
                reviews,
                subjects,
            }
        }
        _ => return Err(format_error("expected a backup object or an array of studies")),
    };

    let studies = match &payload {
        ImportPayload::Full { studies, .. } | ImportPayload::Legacy { studies } => studies,
    };
    check_studies(studies)?;

    Ok(payload)
}

/// Reject the whole file if any study breaks the session invariants.
///
/// Older backups rounded percentages with floats, so a stored percentage may
/// sit one point away from the integer rounding used here. The tier must
/// still match the stored percentage exactly.
fn check_studies(studies: &[StudySession]) -> Result<()> {
    let mut seen = HashSet::new();
    for study in studies {
        if study.total < 1 || study.correct > study.total {
            return Err(format_error(format!(
                "study {} has invalid counts {}/{}",
                study.id, study.correct, study.total
            )));
        }

        let expected = percentage(u64::from(study.correct), u64::from(study.total));
        if study.percentage.abs_diff(expected) > PERCENTAGE_TOLERANCE {
            return Err(format_error(format!(
                "study {} has percentage {} but {}/{} is {}",
                study.id, study.percentage, study.correct, study.total, expected
            )));
        }
        if study.performance != tier(study.percentage) {
            return Err(format_error(format!(
                "study {} has tier {} but {}% is {}",
                study.id,
                study.performance,
                study.percentage,
                tier(study.percentage)
            )));
        }

        if !seen.insert(study.id) {
            return Err(format_error(format!("duplicate study id {}", study.id)));
        }
    }
    Ok(())
}
