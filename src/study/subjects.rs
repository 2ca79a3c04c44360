//! Subject catalog rules: built-in merge, id assignment, validation

use super::builtin::{builtin_subjects, is_builtin};
use super::models::{NewSubject, Subject};
use crate::storage::{Result, StudyError};

/// Built-ins first, in fixed order, then the persisted custom subjects.
///
/// Persisted entries that reuse a built-in id are dropped in favour of the
/// built-in.
pub fn merge_with_builtins(persisted: Vec<Subject>) -> Vec<Subject> {
    let mut subjects = builtin_subjects();
    for subject in persisted {
        if is_builtin(subject.id) {
            if subject.custom {
                log::warn!(
                    "Ignoring stored subject '{}' with reserved id {}",
                    subject.name,
                    subject.id
                );
            }
            continue;
        }
        if subjects.iter().any(|s| s.id == subject.id) {
            log::warn!("Ignoring duplicate subject id {}", subject.id);
            continue;
        }
        subjects.push(subject);
    }
    subjects
}

/// Next free subject id: one past the highest in use
pub fn next_subject_id(subjects: &[Subject]) -> i64 {
    subjects.iter().map(|s| s.id).max().unwrap_or(0) + 1
}

/// Split comma-separated topic input, dropping blanks
pub fn parse_topics(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Validate a new custom subject against the catalog and give it an id
pub fn build_custom_subject(request: NewSubject, existing: &[Subject]) -> Result<Subject> {
    let name = request.name.trim().to_string();
    let specialty = request.specialty.trim().to_string();
    let topics: Vec<String> = request
        .topics
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    if name.is_empty() {
        return Err(StudyError::Validation("Subject name is required".to_string()));
    }
    if specialty.is_empty() {
        return Err(StudyError::Validation("Specialty is required".to_string()));
    }
    if topics.is_empty() {
        return Err(StudyError::Validation(
            "At least one topic is required".to_string(),
        ));
    }

    let lower = name.to_lowercase();
    if existing.iter().any(|s| s.name.to_lowercase() == lower) {
        return Err(StudyError::Validation(format!(
            "Subject '{}' already exists",
            name
        )));
    }

    Ok(Subject {
        id: next_subject_id(existing),
        name,
        specialty,
        topics,
        custom: true,
    })
}
