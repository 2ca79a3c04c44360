use anyhow::{Context, Result};
use chrono::NaiveDate;

use studylog_lib::study::algorithm::describe_due;

use crate::app::App;
use crate::render::terminal::{column_width, pad, paint, rule, status_color, status_label, truncate, Color};
use crate::OutputFormat;

pub fn run_list(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let schedule = app.tracker.schedule(app.today)
        .context("Failed to load scheduled reviews")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&schedule)?);
        }
        OutputFormat::Plain => {
            let summary = &schedule.summary;
            println!("{} overdue, {} due today, {} upcoming",
                paint(&summary.overdue.to_string(), Color::RED, use_color),
                paint(&summary.due_today.to_string(), Color::YELLOW, use_color),
                paint(&summary.upcoming.to_string(), Color::GREEN, use_color));

            if schedule.reviews.is_empty() {
                println!("\nNo reviews scheduled.");
                return Ok(());
            }

            let subject_width = column_width(
                schedule.reviews.iter().map(|r| r.review.subject_name.as_str()), 7, 24);
            let topic_width = column_width(
                schedule.reviews.iter().map(|r| r.review.topic.as_str()), 5, 30);

            println!();
            println!("{} {} {} {:<10} {}",
                pad("Date", 10), pad("Subject", subject_width), pad("Topic", topic_width), "Status", "When");
            println!("{} {} {} {} {}",
                rule(10), rule(subject_width), rule(topic_width), rule(10), rule(10));

            for item in &schedule.reviews {
                let review = &item.review;
                let status = pad(status_label(item.status), 10);
                println!("{} {} {} {} {}",
                    review.scheduled_date,
                    pad(&truncate(&review.subject_name, subject_width), subject_width),
                    pad(&truncate(&review.topic, topic_width), topic_width),
                    paint(&status, status_color(item.status), use_color),
                    describe_due(review.scheduled_date, schedule.today));
            }
        }
    }

    Ok(())
}

pub fn run_clear_overdue(app: &mut App, format: &OutputFormat) -> Result<()> {
    let removed = app.tracker.clear_overdue(app.today)
        .context("Failed to clear overdue reviews")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "removed": removed,
                "today": app.today.to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if removed == 0 {
                println!("No overdue reviews.");
            } else {
                println!("Removed {} overdue review(s).", removed);
            }
        }
    }

    Ok(())
}

pub fn run_check(
    app: &App,
    subject_query: &str,
    topic: &str,
    date: Option<NaiveDate>,
    format: &OutputFormat,
) -> Result<()> {
    let subject = app.find_subject(subject_query)?;
    let topic = App::resolve_topic(&subject, topic);
    let on_date = date.unwrap_or(app.today);

    let pending = app.tracker.pending_match(subject.id, &topic, on_date)
        .context("Failed to load scheduled reviews")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "subjectId": subject.id,
                "topic": topic,
                "date": on_date.to_string(),
                "pendingReview": pending,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => match pending {
            Some(review) => println!(
                "A session on {} would complete the review of {} / {} scheduled for {}.",
                on_date, review.subject_name, review.topic, review.scheduled_date
            ),
            None => println!("No pending review for {} / {} near {}.", subject.name, topic, on_date),
        },
    }

    Ok(())
}
