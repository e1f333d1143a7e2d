//! CLI entry point for the submission dashboard.
//!
//! Gates access behind the teacher password, loads every graded submission
//! and prints the requested view: overall summary, results table, a single
//! student's latest answers, or the list of student ids.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::io::BufRead;
use std::path::Path;
use submission_dashboard::{
    aggregate::ScoredTable,
    config::DashboardConfig,
    error::AuthError,
    output::{
        NO_DATA, render_json, render_results, render_student, render_student_ids,
        render_summary, write_results_csv,
    },
    session::{Dashboard, PasswordGate, RefreshOutcome, Session},
    source::{FileSource, SubmissionSource, SupabaseSource},
};
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "submission_dashboard")]
#[command(about = "Teacher dashboard for AI-graded student submissions", long_about = None)]
struct Cli {
    /// Dashboard password; prompted for on stdin when omitted
    #[arg(short, long, global = true)]
    password: Option<String>,

    /// Read submissions from a JSON file instead of Supabase
    #[arg(long, global = true, value_name = "FILE")]
    source_file: Option<String>,

    /// Only include students whose id contains this text (case-sensitive)
    #[arg(short, long, global = true, default_value = "")]
    search: String,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Overall metrics, accuracy per question and score distribution
    Summary,
    /// All submissions, newest first
    Results {
        /// Also write the table to this CSV file
        #[arg(long)]
        csv: Option<String>,
    },
    /// Latest submission of one student, question by question
    Student {
        #[arg(value_name = "STUDENT_ID")]
        student_id: String,
    },
    /// Distinct student ids
    Students,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/submission_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("submission_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = match DashboardConfig::from_env(cli.source_file.is_none()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Configuration error");
            return Err(e.into());
        }
    };

    let gate = PasswordGate::new(config.teacher_password.clone());
    let mut session = Session::new();
    login(&mut session, &gate, cli.password.as_deref())?;

    let source: Box<dyn SubmissionSource> = match (&cli.source_file, &config.supabase) {
        (Some(path), _) => Box::new(FileSource::new(path)),
        (None, Some(supabase)) => Box::new(SupabaseSource::new(supabase)?),
        (None, None) => bail!("no data source configured"),
    };

    let mut dashboard = Dashboard::new(source);
    match dashboard.reload().await {
        RefreshOutcome::Loaded { rows } => info!(rows, "Dashboard data ready"),
        RefreshOutcome::Failed { message } => {
            warn!(error = %message, "Showing empty dashboard after failed load");
            eprintln!("Warning: could not load submissions: {message}");
        }
    }

    let snapshot = dashboard.snapshot(&session)?;
    let view = snapshot.filter_student(&cli.search);
    if !cli.search.is_empty() {
        info!(search = %cli.search, rows = view.len(), "Applied student id filter");
    }

    run(cli.command, cli.format, &view)
}

/// Logs the session in, either with the password given on the command line
/// or by prompting until the right one is entered.
fn login(session: &mut Session, gate: &PasswordGate, password: Option<&str>) -> Result<()> {
    if let Some(password) = password {
        session.login(gate, password)?;
        return Ok(());
    }

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        eprint!("Dashboard password: ");
        let Some(line) = lines.next().transpose()? else {
            bail!(AuthError::NotLoggedIn);
        };
        match session.login(gate, &line) {
            Ok(()) => return Ok(()),
            Err(e) => eprintln!("{e}, try again."),
        }
    }
}

fn run(command: Commands, format: OutputFormat, view: &ScoredTable) -> Result<()> {
    if view.is_empty() {
        warn!("No submissions to show");
        match format {
            OutputFormat::Text => println!("{NO_DATA}"),
            OutputFormat::Json => println!("{}", render_json(&view.summary())?),
        }
        return Ok(());
    }

    match command {
        Commands::Summary => {
            let summary = view.summary();
            let distribution = view.score_distribution();
            match format {
                OutputFormat::Text => print!("{}", render_summary(&summary, &distribution)),
                OutputFormat::Json => println!(
                    "{}",
                    render_json(&serde_json::json!({
                        "summary": summary,
                        "score_distribution": distribution,
                    }))?
                ),
            }
        }
        Commands::Results { csv } => {
            let rows = view.results_by_time_desc();
            if let Some(path) = csv {
                write_results_csv(&path, &rows)?;
                info!(path = %path, rows = rows.len(), "Results written to CSV");
            }
            match format {
                OutputFormat::Text => print!("{}", render_results(&rows)),
                OutputFormat::Json => println!("{}", render_json(&rows)?),
            }
        }
        Commands::Student { student_id } => {
            let latest = view.latest_by_student();
            let Some(row) = latest.get(&student_id) else {
                bail!("no submissions found for student '{student_id}'");
            };
            match format {
                OutputFormat::Text => print!("{}", render_student(row)),
                OutputFormat::Json => println!("{}", render_json(row)?),
            }
        }
        Commands::Students => {
            let ids = view.student_ids();
            match format {
                OutputFormat::Text => print!("{}", render_student_ids(&ids)),
                OutputFormat::Json => println!("{}", render_json(&ids)?),
            }
        }
    }

    Ok(())
}
