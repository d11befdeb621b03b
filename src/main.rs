use clap::{CommandFactory, Parser};
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use scanlog::domain::{LogEntry, ScanStatus};
use scanlog::filter::{self, DateFilter, FilterSpec, ScanStats, StatusFilter};
use scanlog::pipeline::{ScanOutcome, ScanPipeline};
use scanlog::replay::{self, ScriptLine, StepOutcome, StepReport};

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;

fn setup_logging(level: Option<&str>) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scanlog")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("scanlog.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG wins over the configured level
    let env = env_logger::Env::default().default_filter_or(level.unwrap_or("info"));
    env_logger::Builder::from_env(env)
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        None => {
            Cli::command().print_help().context("Failed to print help")?;
            println!();
            Ok(())
        }
        Some(Commands::Replay {
            script,
            status,
            date,
            query,
            json,
        }) => {
            let spec = FilterSpec {
                query: query.clone().unwrap_or_default(),
                status: *status,
                date: *date,
            };
            handle_replay_command(script, &spec, *json, cli.is_verbose(), config)
        }
        Some(Commands::Check { script }) => handle_check_command(script),
    }
}

fn read_script(path: &Path) -> Result<Vec<ScriptLine>> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read script from stdin")?;
        buf
    } else {
        fs::read_to_string(path).context(format!("Failed to read script {}", path.display()))?
    };

    let script = replay::parse_script(&text).context("Failed to parse script")?;
    info!("Parsed {} script steps from {}", script.len(), path.display());
    Ok(script)
}

fn handle_check_command(path: &Path) -> Result<()> {
    let script = read_script(path)?;
    for line in &script {
        println!("{:>4}  {}", line.line.to_string().dimmed(), line.step);
    }
    println!("{} {} steps", "OK:".green(), script.len());
    Ok(())
}

fn handle_replay_command(path: &Path, spec: &FilterSpec, json: bool, verbose: bool, config: &Config) -> Result<()> {
    let script = read_script(path)?;
    let pipeline = ScanPipeline::new(config.classifier.decider(), config.pipeline_settings());

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let reports = runtime
        .block_on(replay::run_script(&pipeline, &script))
        .context("Replay failed")?;

    let snapshot = pipeline.snapshot().context("Failed to read scan log")?;
    let entries = filter::apply(&snapshot, spec);
    let stats = ScanStats::from_entries(&snapshot);

    if json {
        let output = serde_json::json!({
            "entries": entries,
            "stats": stats,
        });
        let text = serde_json::to_string_pretty(&output).context("Failed to serialize scan log")?;
        println!("{}", text);
        return Ok(());
    }

    for report in &reports {
        print_report(report);
    }

    println!();
    print_log_header(spec, entries.len(), snapshot.len());
    for entry in &entries {
        print_entry(entry);
    }

    println!();
    println!(
        "{} {} total, {} valid, {} invalid",
        "Stats:".bold(),
        stats.total,
        stats.valid.to_string().green(),
        stats.invalid.to_string().red()
    );

    let recent = filter::recent(&snapshot, config.log.recent_limit);
    if !recent.is_empty() {
        println!("{}", "Recent scans:".bold());
        for entry in &recent {
            print_entry(entry);
        }
    }

    if verbose {
        let capture = pipeline.debouncer().stats().context("Failed to read capture stats")?;
        println!(
            "{} {} accepted, {} discarded ({} empty, {} duplicate, {} busy)",
            "Capture:".yellow(),
            capture.accepted,
            capture.discarded(),
            capture.discarded_empty,
            capture.discarded_duplicate,
            capture.discarded_busy
        );
    }

    Ok(())
}

fn print_report(report: &StepReport) {
    let line = format!("{:>4}", report.line).dimmed();
    match &report.outcome {
        StepOutcome::Scan(ScanOutcome::Logged { result, entry }) => {
            println!(
                "{}  {:<28} {} {} #{}",
                line,
                report.step.to_string(),
                "logged".cyan(),
                colored_status(result.status),
                entry.id
            );
        }
        StepOutcome::Scan(ScanOutcome::Discarded(reason)) => {
            println!("{}  {:<28} {}", line, report.step.to_string(), format!("discarded ({})", reason).dimmed());
        }
        StepOutcome::Rejected(message) => {
            println!("{}  {:<28} {} {}", line, report.step.to_string(), "rejected:".red(), message);
        }
        StepOutcome::Waited(_) | StepOutcome::Reset => {
            println!("{}  {}", line, report.step.to_string().dimmed());
        }
    }
}

fn print_log_header(spec: &FilterSpec, shown: usize, total: usize) {
    let mut filters = Vec::new();
    if !spec.query.is_empty() {
        filters.push(format!("query {:?}", spec.query));
    }
    if spec.status != StatusFilter::All {
        filters.push(format!("status {}", spec.status));
    }
    if spec.date != DateFilter::All {
        filters.push(format!("date {}", spec.date));
    }

    if filters.is_empty() {
        println!("{} {} entries", "Scan log:".bold(), total);
    } else {
        println!("{} {} of {} entries ({})", "Scan log:".bold(), shown, total, filters.join(", "));
    }
}

fn print_entry(entry: &LogEntry) {
    let extra: Vec<&str> = entry.descriptive_fields().into_iter().flatten().collect();
    println!(
        "  #{:<4} {}  {:<7} {:<7} {}  {}",
        entry.id.to_string(),
        entry.formatted_timestamp(),
        entry.kind.as_str(),
        colored_status(entry.status),
        entry.code,
        extra.join(" | ").dimmed()
    );
}

fn colored_status(status: ScanStatus) -> ColoredString {
    match status {
        ScanStatus::Valid => status.as_str().green(),
        ScanStatus::Invalid => status.as_str().red(),
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration before logging so its level applies
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(config.log_level.as_deref()).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}
