//! worklog - calendar-driven work reports for Feishu
//!
//! ## Commands
//!
//! - `daily`: compile today's events into a daily report and publish it
//! - `weekly`: compile this week's events into a weekly report and publish it
//! - `classify`: print the category an event title falls into
//! - `segment`: split a meeting-note text file into sections
//! - `holiday`: show whether a date is a workday

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};

use worklog_core::{
    classify, render_summary_text, segment, write_rendered_report, write_summary_json,
    HolidayCalendar, RenderStyle, ReportPeriod, ReportPipeline, ReportRequest, ReportSettings,
    RunSummary,
};
use worklog_feishu::FeishuClient;

#[derive(Parser, Debug)]
#[command(name = "worklog")]
#[command(author = "Stevedores Org")]
#[command(version = worklog_core::VERSION)]
#[command(about = "Daily and weekly work reports from a Feishu calendar", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile and publish the daily report
    Daily(RunArgs),

    /// Compile and publish the weekly report
    Weekly(RunArgs),

    /// Print the category of an event title
    Classify {
        /// Event title
        title: String,
    },

    /// Split a meeting-note text file into sections
    Segment {
        /// Plain-text note, one paragraph per line
        file: PathBuf,

        /// Print the sections as JSON
        #[arg(long)]
        as_json: bool,
    },

    /// Show workday status and the month's holidays
    Holiday {
        /// Date to check (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Holiday JSON overlay (default: WORKLOG_HOLIDAYS_FILE)
        #[arg(long)]
        holidays_file: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// Report date, YYYY-MM-DD (default: today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Output layout: plain, markdown or styled
    #[arg(long, default_value = "styled")]
    style: RenderStyle,

    /// Render only; do not create a document
    #[arg(long)]
    dry_run: bool,

    /// Publish even if a report with the same title exists
    #[arg(long)]
    overwrite: bool,

    /// Run on weekends and holidays too
    #[arg(long)]
    force: bool,

    /// Also write the rendered report to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the run summary as JSON to this file
    #[arg(long)]
    summary: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    worklog_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Daily(args) => cmd_run(ReportPeriod::Daily, &args).await,
        Commands::Weekly(args) => cmd_run(ReportPeriod::Weekly, &args).await,
        Commands::Classify { title } => cmd_classify(&title),
        Commands::Segment { file, as_json } => cmd_segment(&file, as_json),
        Commands::Holiday {
            date,
            holidays_file,
        } => cmd_holiday(date, holidays_file),
    }
}

/// The run's reference time: now, or now's wall-clock time on `date`.
fn reference_time(
    now: DateTime<FixedOffset>,
    date: Option<NaiveDate>,
) -> Result<DateTime<FixedOffset>> {
    let Some(day) = date else {
        return Ok(now);
    };
    now.timezone()
        .from_local_datetime(&day.and_time(now.time()))
        .single()
        .with_context(|| format!("No local time for {day}"))
}

fn load_settings() -> Result<(ReportSettings, FixedOffset)> {
    let settings = ReportSettings::from_env().context("Invalid WORKLOG_* settings")?;
    let offset = settings.offset().context("Invalid UTC offset")?;
    Ok((settings, offset))
}

async fn cmd_run(period: ReportPeriod, args: &RunArgs) -> Result<()> {
    let (settings, offset) = load_settings()?;
    let reference = reference_time(Utc::now().with_timezone(&offset), args.date)?;

    if period == ReportPeriod::Daily && !args.force {
        let holidays = HolidayCalendar::load(settings.holidays_file.as_deref())
            .context("Failed to load holiday calendar")?;
        let day = reference.date_naive();
        if !holidays.is_workday(day) {
            info!(date = %day, "not a workday, skipping daily report");
            println!("{day} is not a workday; nothing to report (use --force to run anyway)");
            return Ok(());
        }
    }

    let client = Arc::new(FeishuClient::from_env().context("Failed to create Feishu client")?);
    let pipeline = ReportPipeline::new(client.clone(), client.clone(), client)
        .with_retry(settings.retry);

    let summary = execute_run(&pipeline, period, reference, args).await?;
    print!("{}", render_summary_text(&summary));
    Ok(())
}

/// Run the pipeline and write the requested artifacts.
async fn execute_run(
    pipeline: &ReportPipeline,
    period: ReportPeriod,
    reference: DateTime<FixedOffset>,
    args: &RunArgs,
) -> Result<RunSummary> {
    let request = ReportRequest::new(period, reference)
        .with_style(args.style)
        .dry_run(args.dry_run)
        .overwrite(args.overwrite);

    let outcome = pipeline
        .run(&request)
        .await
        .with_context(|| format!("{period} report run failed"))?;

    if let Some(rendered) = &outcome.rendered {
        match &args.output {
            Some(path) => write_rendered_report(path, rendered)?,
            None if args.dry_run => println!("{rendered}"),
            None => {}
        }
    }
    if let Some(path) = &args.summary {
        write_summary_json(path, &outcome.summary)?;
    }
    if outcome.summary.status.is_skipped() {
        info!(status = outcome.summary.status.as_str(), "nothing published");
    }
    Ok(outcome.summary)
}

fn cmd_classify(title: &str) -> Result<()> {
    let category = classify(Some(title));
    println!("{}", category.label());
    Ok(())
}

fn cmd_segment(file: &Path, as_json: bool) -> Result<()> {
    let text = std::fs::read_to_string(file).with_context(|| format!("Failed to read {:?}", file))?;
    let sections = segment(&text);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&sections)?);
        return Ok(());
    }
    if sections.is_empty() {
        println!("No sections found.");
        return Ok(());
    }
    for section in &sections {
        println!("{}", section.title.as_deref().unwrap_or("(untitled)"));
        for item in &section.items {
            println!("  • {}", item);
        }
    }
    Ok(())
}

fn cmd_holiday(date: Option<NaiveDate>, holidays_file: Option<PathBuf>) -> Result<()> {
    let (settings, offset) = load_settings()?;
    let overlay = holidays_file.or(settings.holidays_file);
    let calendar =
        HolidayCalendar::load(overlay.as_deref()).context("Failed to load holiday calendar")?;
    let day = date.unwrap_or_else(|| Utc::now().with_timezone(&offset).date_naive());

    println!("{}", describe_day(&calendar, day));
    let month = calendar.month_holidays(day.year(), day.month());
    if !month.is_empty() {
        let listed: Vec<String> = month.iter().map(|d| d.format("%m-%d").to_string()).collect();
        println!("Holidays in {}-{:02}: {}", day.year(), day.month(), listed.join(", "));
    }
    Ok(())
}

fn describe_day(calendar: &HolidayCalendar, day: NaiveDate) -> String {
    let kind = if calendar.is_holiday(day) {
        "holiday"
    } else if calendar.is_workday(day) {
        "workday"
    } else {
        "weekend"
    };
    format!("{day} ({}): {kind}", day.weekday())
}
