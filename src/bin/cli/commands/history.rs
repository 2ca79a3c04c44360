use anyhow::{Context, Result};

use studylog_lib::study::stats::{history_choices, HistoryFilter};

use crate::app::App;
use crate::render::terminal::{column_width, pad, paint, performance_color, rule, truncate, Color};
use crate::OutputFormat;

pub fn run(
    app: &App,
    subject: Option<String>,
    topic: Option<String>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let filter = HistoryFilter {
        subject_name: subject,
        topic,
    };
    let studies = app.tracker.history(&filter)
        .context("Failed to load study history")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&studies)?);
        }
        OutputFormat::Plain => {
            if studies.is_empty() {
                println!("No sessions found.");
                if filter.subject_name.is_some() || filter.topic.is_some() {
                    let (subjects, topics) = history_choices(&app.tracker.studies()?);
                    if !subjects.is_empty() {
                        println!("  Subjects: {}", subjects.join(", "));
                        println!("  Topics:   {}", topics.join(", "));
                    }
                }
                return Ok(());
            }

            let subject_width = column_width(studies.iter().map(|s| s.subject_name.as_str()), 7, 24);
            let topic_width = column_width(studies.iter().map(|s| s.topic.as_str()), 5, 30);

            println!("{} {} {} {:>7} {:>4} {:<9} {}",
                pad("Date", 10), pad("Subject", subject_width), pad("Topic", topic_width),
                "Score", "%", "Tier", "ID");
            println!("{} {} {} {} {} {} {}",
                rule(10), rule(subject_width), rule(topic_width), rule(7), rule(4), rule(9), rule(13));

            for study in &studies {
                let score = format!("{}/{}", study.correct, study.total);
                let tier = pad(study.performance.as_str(), 9);
                println!("{} {} {} {:>7} {:>4} {} {}",
                    study.date,
                    pad(&truncate(&study.subject_name, subject_width), subject_width),
                    pad(&truncate(&study.topic, topic_width), topic_width),
                    score,
                    study.percentage,
                    paint(&tier, performance_color(study.performance), use_color),
                    paint(&study.id.to_string(), Color::GRAY, use_color));

                if let Some(notes) = &study.observations {
                    println!("           {}", paint(notes, Color::DIM, use_color));
                }
            }

            println!("\n{} sessions", studies.len());
        }
    }

    Ok(())
}

pub fn run_delete(app: &mut App, study_id: i64, format: &OutputFormat) -> Result<()> {
    let removed = app.tracker.delete_study(study_id)
        .context("Failed to delete session")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": study_id,
                "deleted": removed,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if removed {
                println!("Deleted session {}.", study_id);
            } else {
                println!("No session with id {}.", study_id);
            }
        }
    }

    Ok(())
}
