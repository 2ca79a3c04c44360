mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use app::parse_date;

#[derive(Parser)]
#[command(name = "studylog", about = "Study session log and review schedule", version)]
struct Cli {
    /// Data directory (default: platform data dir, or STUDYLOG_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = parse_date)]
    today: Option<NaiveDate>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Record a practice session and schedule its review
    Record {
        /// Subject id or name (case-insensitive prefix match)
        subject: String,
        /// Topic (one of the subject's topics, or free text)
        topic: String,
        /// Correct answers
        correct: u32,
        /// Questions attempted
        total: u32,
        /// Session date (defaults to today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// Notes about the session (use "-" to read from stdin)
        #[arg(long)]
        observations: Option<String>,
    },

    /// Show scheduled reviews grouped by status
    Reviews,

    /// Remove every review scheduled before today
    ClearOverdue,

    /// Check whether a session would satisfy a pending review
    Check {
        /// Subject id or name
        subject: String,
        /// Topic
        topic: String,
        /// Session date (defaults to today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// List recorded sessions, newest first
    History {
        /// Filter by subject name
        #[arg(long)]
        subject: Option<String>,
        /// Filter by topic
        #[arg(long)]
        topic: Option<String>,
    },

    /// Delete a recorded session by id
    DeleteStudy {
        /// Session id
        id: i64,
    },

    /// Totals, average score and per-subject scores
    Stats,

    /// Subject catalog
    #[command(subcommand)]
    Subjects(SubjectsCommand),

    /// Write a JSON backup of all collections
    Export {
        /// Output file (defaults to studylog_backup_<today>.json, "-" for stdout)
        output: Option<PathBuf>,
    },

    /// Replace all collections from a JSON backup
    Import {
        /// Backup file
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum SubjectsCommand {
    /// List built-in and custom subjects
    List,

    /// Add a custom subject
    Add {
        /// Subject name
        name: String,
        /// Specialty
        specialty: String,
        /// Comma-separated topics
        topics: String,
    },

    /// Delete a custom subject
    Delete {
        /// Subject id
        id: i64,
    },
}

/// Resolve "-" as stdin
fn resolve_content(content: Option<String>) -> Option<String> {
    match content.as_deref() {
        Some("-") => {
            let mut buf = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf).ok();
            Some(buf)
        }
        _ => content,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let mut app = app::App::new(cli.data_dir, cli.today)?;

    match cli.command {
        Command::Record { subject, topic, correct, total, date, observations } => {
            let observations = resolve_content(observations);
            commands::record::run(
                &mut app,
                &subject,
                &topic,
                correct,
                total,
                date,
                observations,
                &cli.format,
                use_color,
            )?;
        }
        Command::Reviews => {
            commands::reviews::run_list(&app, &cli.format, use_color)?;
        }
        Command::ClearOverdue => {
            commands::reviews::run_clear_overdue(&mut app, &cli.format)?;
        }
        Command::Check { subject, topic, date } => {
            commands::reviews::run_check(&app, &subject, &topic, date, &cli.format)?;
        }
        Command::History { subject, topic } => {
            commands::history::run(&app, subject, topic, &cli.format, use_color)?;
        }
        Command::DeleteStudy { id } => {
            commands::history::run_delete(&mut app, id, &cli.format)?;
        }
        Command::Stats => {
            commands::stats::run(&app, &cli.format, use_color)?;
        }
        Command::Subjects(subcmd) => match subcmd {
            SubjectsCommand::List => {
                commands::subjects::run_list(&app, &cli.format, use_color)?;
            }
            SubjectsCommand::Add { name, specialty, topics } => {
                commands::subjects::run_add(&mut app, &name, &specialty, &topics, &cli.format)?;
            }
            SubjectsCommand::Delete { id } => {
                commands::subjects::run_delete(&mut app, id, &cli.format)?;
            }
        },
        Command::Export { output } => {
            commands::backup::run_export(&app, output, &cli.format)?;
        }
        Command::Import { file } => {
            commands::backup::run_import(&mut app, &file, &cli.format)?;
        }
    }

    Ok(())
}
