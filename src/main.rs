//! CLI entry point and command handlers for meter-validate.

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::EnvFilter;

use meter_validate::config::Config;
use meter_validate::fields::Field;
use meter_validate::pipeline::{Pipeline, RunReport, RunState, Stage, StageEvent, StageObserver};
use meter_validate::status::{StageResult, StageStatus};

#[derive(Parser)]
#[command(name = "meter-validate")]
#[command(version)]
#[command(about = "Validate meter asset exports against business rules", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', action = ArgAction::Count, global = true)]
    verbosity: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an export and write the violation report
    Run {
        /// Input file (.xlsx, .xls or .csv)
        input: PathBuf,
        /// Directory the report is written to
        #[arg(long, short = 'o', default_value = ".")]
        output_dir: PathBuf,
        /// Extra config file, applied after global and project config
        #[arg(long)]
        config: Option<PathBuf>,
        /// Emit one JSON object per stage instead of colored lines
        #[arg(long)]
        json: bool,
        /// Stop at the first check that fails to evaluate
        #[arg(long)]
        stop_on_check_error: bool,
    },
    /// List the required input columns, in report order
    Fields,
    /// Generate shell completions
    Completion {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Show version information
    Version {
        /// Show commit and build date
        #[arg(long)]
        verbose: bool,
    },
}

// RUN INTERRUPTION HANDLING

static RUN_INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Ctrl+C stops the run before the next stage. A second press exits at once.
fn setup_signal_handler() {
    RUN_INTERRUPTED.store(false, Ordering::SeqCst);
    let _ = ctrlc::set_handler(move || {
        if RUN_INTERRUPTED.load(Ordering::SeqCst) {
            eprintln!("\n{} Force exit", "✗".red());
            std::process::exit(130);
        }
        eprintln!(
            "\n{} Interrupt received - stopping after the current stage...",
            "→".yellow()
        );
        RUN_INTERRUPTED.store(true, Ordering::SeqCst);
    });
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    match cli.command {
        Commands::Run {
            input,
            output_dir,
            config,
            json,
            stop_on_check_error,
        } => cmd_run(input, output_dir, config, json, stop_on_check_error),
        Commands::Fields => cmd_fields(),
        Commands::Completion { shell } => cmd_completion(shell),
        Commands::Version { verbose } => cmd_version(verbose),
    }
}

/// Prints stage events as they arrive.
///
/// Human output stops after the first ERROR line; JSON output streams every
/// event so machine consumers see the whole run.
struct ConsoleObserver {
    json: bool,
    bar: Option<ProgressBar>,
    halted: bool,
}

impl ConsoleObserver {
    fn new(json: bool) -> Self {
        let bar = if !json && io::stderr().is_terminal() {
            let bar = ProgressBar::new(Stage::ALL.len() as u64);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .map(|s| s.progress_chars("=>-"))
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            bar.set_style(style);
            Some(bar)
        } else {
            None
        };

        Self {
            json,
            bar,
            halted: false,
        }
    }

    fn line(&self, text: String) {
        match &self.bar {
            Some(bar) => bar.suspend(|| println!("{}", text)),
            None => println!("{}", text),
        }
    }

    fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl StageObserver for ConsoleObserver {
    fn on_stage_start(&mut self, stage: Stage) {
        if let Some(bar) = &self.bar {
            bar.set_message(stage.to_string());
        }
        if self.json || self.halted {
            return;
        }
        if let Some(notice) = stage.start_notice() {
            self.line(format!("{} {}", "→".cyan(), notice));
        }
    }

    fn on_stage_result(&mut self, stage: Stage, result: &StageResult) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }

        if self.json {
            let event = StageEvent { stage, result };
            match serde_json::to_string(&event) {
                Ok(line) => self.line(line),
                Err(e) => tracing::warn!(error = %e, "failed to encode stage event"),
            }
            return;
        }

        if self.halted {
            return;
        }

        let marker = match result.status {
            StageStatus::Error => "✗".red(),
            StageStatus::Success if stage.is_check() => "●".yellow(),
            StageStatus::Success | StageStatus::NoViolations => "✓".green(),
        };
        self.line(format!(
            "{} {} {:<10} {}",
            marker,
            format!("[{}]", result.status.code()).dimmed(),
            stage.name(),
            result.detail
        ));

        if result.is_error() {
            self.halted = true;
        }
    }
}

fn cmd_run(
    input: PathBuf,
    output_dir: PathBuf,
    config_path: Option<PathBuf>,
    json: bool,
    stop_on_check_error: bool,
) -> Result<()> {
    let mut config = Config::load(config_path.as_deref()).context("Failed to load configuration")?;
    if stop_on_check_error {
        config.pipeline.continue_on_check_error = false;
    }

    let pipeline = Pipeline::with_config(input, output_dir, config)?;

    setup_signal_handler();
    let mut observer = ConsoleObserver::new(json);
    let report = pipeline.run_with_cancel(&mut observer, &RUN_INTERRUPTED);
    observer.finish();

    if !json {
        print_summary(&report);
    }

    if report.has_errors() || report.state == RunState::Failed {
        std::process::exit(1);
    }
    Ok(())
}

fn print_summary(report: &RunReport) {
    if let Some(path) = &report.output {
        println!();
        if report.sections.is_empty() {
            println!("{} No violations found", "✓".green());
        } else {
            for section in &report.sections {
                println!("  {} {} ({})", "•".cyan(), section.label, section.rows);
            }
        }
        println!("{} {}", "Report:".bold(), path.display());
    }

    if report.has_errors() {
        eprintln!("{} Run finished with errors", "✗".red());
    }
}

fn cmd_fields() -> Result<()> {
    for (i, field) in Field::ALL.iter().enumerate() {
        println!("{:>2}  {}", i + 1, field.header());
    }
    Ok(())
}

/// Generate shell completion script
fn cmd_completion(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "meter-validate", &mut io::stdout());
    Ok(())
}

fn cmd_version(verbose: bool) -> Result<()> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    println!("meter-validate {}", VERSION);

    if verbose {
        const GIT_SHA: &str = env!("GIT_SHA");
        const BUILD_DATE: &str = env!("BUILD_DATE");
        println!("commit: {}", GIT_SHA);
        println!("built: {}", BUILD_DATE);
    }

    Ok(())
}
