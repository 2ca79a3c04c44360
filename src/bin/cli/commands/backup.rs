use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;

use studylog_lib::storage::backup::{backup_file_name, to_json, write_backup};

use crate::app::App;
use crate::OutputFormat;

pub fn run_export(app: &App, output: Option<PathBuf>, format: &OutputFormat) -> Result<()> {
    let document = app.tracker.export(Utc::now()).context("Failed to read collections")?;

    if output.as_deref() == Some(Path::new("-")) {
        println!("{}", to_json(&document)?);
        return Ok(());
    }

    let path = output.unwrap_or_else(|| PathBuf::from(backup_file_name(app.today)));
    write_backup(&document, &path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "path": path.to_string_lossy(),
                "studies": document.studies.len(),
                "reviews": document.reviews.len(),
                "subjects": document.subjects.len(),
                "version": document.version,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Exported to {}", path.display());
            println!("  {} sessions, {} reviews, {} subjects",
                document.studies.len(), document.reviews.len(), document.subjects.len());
        }
    }

    Ok(())
}

pub fn run_import(app: &mut App, file: &Path, format: &OutputFormat) -> Result<()> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let summary = app.tracker.import(&content)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Plain => {
            println!("Imported {} sessions and {} reviews{}",
                summary.studies,
                summary.reviews,
                if summary.legacy { " (older format, reviews cleared)" } else { "" });
            match summary.subjects {
                Some(count) => println!("  Subjects replaced ({} total)", count),
                None => println!("  Subjects unchanged"),
            }
        }
    }

    Ok(())
}
