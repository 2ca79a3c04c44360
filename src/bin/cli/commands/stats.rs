use anyhow::{Context, Result};

use crate::app::App;
use crate::render::terminal::{column_width, pad, paint, rule, Color};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let stats = app.tracker.stats().context("Failed to compute stats")?;
    let subjects = app.tracker.subject_performance().context("Failed to compute stats")?;
    let schedule = app.tracker.schedule(app.today).context("Failed to load scheduled reviews")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "stats": stats,
                "subjects": subjects,
                "evolution": app.tracker.evolution()?,
                "schedule": schedule.summary,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Sessions:        {}", stats.total_studies);
            println!("Questions:       {}", stats.total_questions);
            println!("Average score:   {}", paint(&format!("{}%", stats.average_score), Color::BOLD, use_color));
            println!("Pending reviews: {} ({} overdue, {} today)",
                stats.pending_reviews, schedule.summary.overdue, schedule.summary.due_today);

            if subjects.is_empty() {
                return Ok(());
            }

            let name_width = column_width(subjects.iter().map(|s| s.subject_name.as_str()), 7, 24);
            println!();
            println!("{} {:>9} {:>4}", pad("Subject", name_width), "Questions", "%");
            println!("{} {} {}", rule(name_width), rule(9), rule(4));
            for row in &subjects {
                println!("{} {:>9} {:>4}", pad(&row.subject_name, name_width), row.total, row.percentage);
            }
        }
    }

    Ok(())
}
