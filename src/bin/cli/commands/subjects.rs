use anyhow::{Context, Result};

use studylog_lib::study::subjects::parse_topics;
use studylog_lib::study::NewSubject;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run_list(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let subjects = app.tracker.subjects().context("Failed to load subjects")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&subjects)?);
        }
        OutputFormat::Plain => {
            for subject in &subjects {
                let custom = if subject.custom {
                    paint(" [custom]", Color::CYAN, use_color)
                } else {
                    String::new()
                };
                println!("{:>3}  {} ({}){}",
                    subject.id,
                    paint(&subject.name, Color::BOLD, use_color),
                    subject.specialty,
                    custom);
                println!("     {}", paint(&subject.topics.join(", "), Color::GRAY, use_color));
            }
        }
    }

    Ok(())
}

pub fn run_add(
    app: &mut App,
    name: &str,
    specialty: &str,
    topics: &str,
    format: &OutputFormat,
) -> Result<()> {
    let subject = app.tracker.add_subject(NewSubject {
        name: name.to_string(),
        specialty: specialty.to_string(),
        topics: parse_topics(topics),
    }).context("Failed to add subject")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&subject)?);
        }
        OutputFormat::Plain => {
            println!("Added subject \"{}\" ({})", subject.name, subject.specialty);
            println!("  Topics: {}", subject.topics.join(", "));
            println!("  ID: {}", subject.id);
        }
    }

    Ok(())
}

pub fn run_delete(app: &mut App, subject_id: i64, format: &OutputFormat) -> Result<()> {
    let removed = app.tracker.delete_subject(subject_id)
        .context("Failed to delete subject")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": subject_id,
                "deleted": removed,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if removed {
                println!("Deleted subject {}. Recorded sessions keep its name.", subject_id);
            } else {
                println!("No subject with id {}.", subject_id);
            }
        }
    }

    Ok(())
}
