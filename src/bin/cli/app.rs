use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};

use studylog_lib::config::Config;
use studylog_lib::storage::FileStore;
use studylog_lib::study::{Subject, StudyTracker};

/// Shared application state for CLI commands
pub struct App {
    pub tracker: StudyTracker<FileStore>,
    /// One "today" for the whole invocation
    pub today: NaiveDate,
}

impl App {
    /// Open the study log from the resolved data directory
    pub fn new(data_dir: Option<PathBuf>, today: Option<NaiveDate>) -> Result<Self> {
        let (data_dir, config) = Config::resolve(data_dir)
            .context("Failed to resolve data directory")?;

        let tracker = studylog_lib::open(data_dir.clone(), &config)
            .with_context(|| format!("Failed to open study log at {}", data_dir.display()))?;

        Ok(Self {
            tracker,
            today: today.unwrap_or_else(|| Local::now().date_naive()),
        })
    }

    /// Find a subject by id or name (case-insensitive, exact then prefix)
    pub fn find_subject(&self, query: &str) -> Result<Subject> {
        let subjects = self.tracker.subjects()
            .context("Failed to load subjects")?;

        if let Ok(id) = query.trim().parse::<i64>() {
            return subjects.into_iter()
                .find(|s| s.id == id)
                .context(format!("No subject with id {}", id));
        }

        let query_lower = query.trim().to_lowercase();

        // Exact match first
        if let Some(subject) = subjects.iter().find(|s| s.name.to_lowercase() == query_lower) {
            return Ok(subject.clone());
        }

        // Prefix match
        let matches: Vec<&Subject> = subjects.iter()
            .filter(|s| s.name.to_lowercase().starts_with(&query_lower))
            .collect();

        match matches.len() {
            0 => bail!("No subject matching '{}'. Available subjects:\n{}", query,
                subjects.iter().map(|s| format!("  {:>3}  {}", s.id, s.name)).collect::<Vec<_>>().join("\n")),
            1 => Ok(matches[0].clone()),
            _ => bail!("Ambiguous subject name '{}'. Matches:\n{}", query,
                matches.iter().map(|s| format!("  {:>3}  {}", s.id, s.name)).collect::<Vec<_>>().join("\n")),
        }
    }

    /// Use the subject's own spelling when `topic` names one of its topics;
    /// otherwise keep the free text as typed.
    pub fn resolve_topic(subject: &Subject, topic: &str) -> String {
        let trimmed = topic.trim();
        let lower = trimmed.to_lowercase();
        subject.topics.iter()
            .find(|t| t.to_lowercase() == lower)
            .cloned()
            .unwrap_or_else(|| trimmed.to_string())
    }
}

/// Parse a `YYYY-MM-DD` argument
pub fn parse_date(value: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}
