use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};

use studylog_lib::study::NewStudy;

use crate::app::App;
use crate::render::terminal::{paint, performance_color, Color};
use crate::OutputFormat;

#[allow(clippy::too_many_arguments)]
pub fn run(
    app: &mut App,
    subject_query: &str,
    topic: &str,
    correct: u32,
    total: u32,
    date: Option<NaiveDate>,
    observations: Option<String>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let subject = app.find_subject(subject_query)?;
    let topic = App::resolve_topic(&subject, topic);

    let request = NewStudy {
        subject_id: subject.id,
        topic,
        correct,
        total,
        date: date.unwrap_or(app.today),
        observations,
    };

    let outcome = app.tracker.record_new_study(request, Utc::now())
        .context("Failed to record study session")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        OutputFormat::Plain => {
            let study = &outcome.study;
            println!("Recorded {} / {} on {}", study.subject_name, study.topic, study.date);
            println!("  Score: {}/{} ({}%) {}",
                study.correct,
                study.total,
                study.percentage,
                paint(study.performance.as_str(), performance_color(study.performance), use_color));
            println!("  Next review: {}", outcome.review.scheduled_date);
            if outcome.review_was_satisfied {
                println!("  {}",
                    paint(&format!("Completed {} pending review(s) for this topic", outcome.satisfied.len()),
                        Color::GREEN, use_color));
            }
            println!("  ID: {}", study.id);
        }
    }

    Ok(())
}
