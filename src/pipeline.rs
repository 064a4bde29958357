//! Pipeline orchestrator.
//!
//! Runs the loader, the seven checks and the report writer as a linear state
//! machine, relaying every stage result to a [`StageObserver`]:
//!
//! `LOAD → EMPTY → MISMATCH → READ_TYPE → MULTIPLIER → DIALS → AMR_CODE → MXU_TYPE → WRITE`
//!
//! A load failure ends the run immediately. Check failures are reported and,
//! unless the pipeline policy says otherwise, the run continues. The writer
//! always runs last and its result is the final one.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use crate::checks::{
    run_check, AmrCodeCheck, Check, DialsCheck, EmptyFieldCheck, MultiplierCheck,
    MxuRegisterCheck, MxuTypeCheck, ReadTypeCheck,
};
use crate::config::Config;
use crate::error::ConfigurationError;
use crate::loader::Loader;
use crate::report::write_report;
use crate::status::StageResult;
use crate::violations::Violations;

/// Detail reported when a run is interrupted between stages.
pub const CANCELLED_DETAIL: &str = "Run cancelled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Load,
    Empty,
    Mismatch,
    ReadType,
    Multiplier,
    Dials,
    AmrCode,
    MxuType,
    Write,
}

impl Stage {
    pub const ALL: [Stage; 9] = [
        Stage::Load,
        Stage::Empty,
        Stage::Mismatch,
        Stage::ReadType,
        Stage::Multiplier,
        Stage::Dials,
        Stage::AmrCode,
        Stage::MxuType,
        Stage::Write,
    ];

    /// The stage that follows this one, or `None` after WRITE.
    pub fn next(self) -> Option<Stage> {
        let pos = Stage::ALL.iter().position(|s| *s == self)?;
        Stage::ALL.get(pos + 1).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Load => "LOAD",
            Stage::Empty => "EMPTY",
            Stage::Mismatch => "MISMATCH",
            Stage::ReadType => "READ_TYPE",
            Stage::Multiplier => "MULTIPLIER",
            Stage::Dials => "DIALS",
            Stage::AmrCode => "AMR_CODE",
            Stage::MxuType => "MXU_TYPE",
            Stage::Write => "WRITE",
        }
    }

    /// True for the seven rule checks.
    pub fn is_check(self) -> bool {
        self.check().is_some()
    }

    /// Notice shown when the stage starts, if it has one.
    pub fn start_notice(self) -> Option<&'static str> {
        match self {
            Stage::Load => Some("Reading Data"),
            _ => None,
        }
    }

    fn check(self) -> Option<&'static dyn Check> {
        match self {
            Stage::Empty => Some(&EmptyFieldCheck),
            Stage::Mismatch => Some(&MxuRegisterCheck),
            Stage::ReadType => Some(&ReadTypeCheck),
            Stage::Multiplier => Some(&MultiplierCheck),
            Stage::Dials => Some(&DialsCheck),
            Stage::AmrCode => Some(&AmrCodeCheck),
            Stage::MxuType => Some(&MxuTypeCheck),
            Stage::Load | Stage::Write => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One relayed event, serialized as `{"stage","status","detail"}`.
#[derive(Debug, Serialize)]
pub struct StageEvent<'a> {
    pub stage: Stage,
    #[serde(flatten)]
    pub result: &'a StageResult,
}

/// Receives stage notifications as the pipeline runs.
pub trait StageObserver {
    fn on_stage_start(&mut self, _stage: Stage) {}

    fn on_stage_result(&mut self, stage: Stage, result: &StageResult);
}

impl<F> StageObserver for F
where
    F: FnMut(Stage, &StageResult),
{
    fn on_stage_result(&mut self, stage: Stage, result: &StageResult) {
        self(stage, result)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Every stage ran and the report was written.
    Done,
    /// The run stopped early or the report could not be written.
    Failed,
}

/// A report sheet and how many records it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub label: String,
    pub rows: usize,
}

/// Everything a run produced, in stage order.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub state: RunState,
    pub results: Vec<(Stage, StageResult)>,
    pub output: Option<PathBuf>,
    pub sections: Vec<Section>,
}

impl RunReport {
    /// The last relayed result.
    pub fn final_result(&self) -> Option<&StageResult> {
        self.results.last().map(|(_, r)| r)
    }

    pub fn result(&self, stage: Stage) -> Option<&StageResult> {
        self.results.iter().find(|(s, _)| *s == stage).map(|(_, r)| r)
    }

    /// True when any stage reported ERROR.
    pub fn has_errors(&self) -> bool {
        self.results.iter().any(|(_, r)| r.is_error())
    }
}

/// Report file name for a run started at `at`.
pub fn report_file_name(at: &DateTime<Local>) -> String {
    format!("validation_{}.xlsx", at.format("%m%d%Y%H%M%S"))
}

/// A validated run: input file, output location and rules.
#[derive(Debug, Clone)]
pub struct Pipeline {
    loader: Loader,
    output_path: PathBuf,
    config: Config,
}

impl Pipeline {
    /// Construct with default rules.
    pub fn new(
        input: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self, ConfigurationError> {
        Self::with_config(input, output_dir, Config::default())
    }

    /// Validate the input path, then the output directory.
    pub fn with_config(
        input: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        config: Config,
    ) -> Result<Self, ConfigurationError> {
        let loader = Loader::new(input)?;
        let output_dir = output_dir.into();
        if !output_dir.is_dir() {
            return Err(ConfigurationError::OutputDirNotFound(output_dir));
        }
        let output_path = output_dir.join(report_file_name(&Local::now()));

        Ok(Self {
            loader,
            output_path,
            config,
        })
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn run(&self, observer: &mut dyn StageObserver) -> RunReport {
        let never = AtomicBool::new(false);
        self.run_with_cancel(observer, &never)
    }

    /// Run every stage, checking `cancel` before each one.
    pub fn run_with_cancel(&self, observer: &mut dyn StageObserver, cancel: &AtomicBool) -> RunReport {
        let mut relay = Relay {
            observer,
            results: Vec::new(),
        };
        let rules = &self.config.rules;

        if cancel.load(Ordering::SeqCst) {
            relay.send(Stage::Load, StageResult::error(CANCELLED_DETAIL));
            return relay.finish(RunState::Failed, None, Vec::new());
        }

        relay.observer.on_stage_start(Stage::Load);
        let policy = self.config.sources.for_format(self.loader.format());
        let dataset = match self.loader.load(rules, policy) {
            Ok(dataset) => {
                debug!(format = %dataset.format(), records = dataset.len(), "dataset loaded");
                relay.send(
                    Stage::Load,
                    StageResult::success(format!("Successfully read {}", dataset.source().display())),
                );
                dataset
            }
            Err(err) => {
                relay.send(Stage::Load, StageResult::from_error(&err));
                return relay.finish(RunState::Failed, None, Vec::new());
            }
        };

        let mut violations = Violations::new();
        let mut next = Stage::Load.next();

        while let Some(stage) = next {
            if cancel.load(Ordering::SeqCst) {
                relay.send(stage, StageResult::error(CANCELLED_DETAIL));
                return relay.finish(RunState::Failed, None, sections(&violations));
            }

            relay.observer.on_stage_start(stage);
            let Some(check) = stage.check() else {
                break;
            };
            let result = run_check(check, &dataset, rules, &mut violations);
            let failed = result.is_error();
            relay.send(stage, result);

            if failed && !self.config.pipeline.continue_on_check_error {
                return relay.finish(RunState::Failed, None, sections(&violations));
            }
            next = stage.next();
        }

        let sections = sections(&violations);
        match write_report(&violations, &self.output_path) {
            Ok(path) => {
                relay.send(
                    Stage::Write,
                    StageResult::success(format!("Results written to {}", path.display())),
                );
                relay.finish(RunState::Done, Some(path), sections)
            }
            Err(err) => {
                relay.send(Stage::Write, StageResult::from_error(&err));
                relay.finish(RunState::Failed, None, sections)
            }
        }
    }
}

fn sections(violations: &Violations<'_>) -> Vec<Section> {
    violations
        .entries()
        .iter()
        .map(|subset| Section {
            label: subset.label().to_string(),
            rows: subset.len(),
        })
        .collect()
}

struct Relay<'o> {
    observer: &'o mut dyn StageObserver,
    results: Vec<(Stage, StageResult)>,
}

impl Relay<'_> {
    fn send(&mut self, stage: Stage, result: StageResult) {
        if result.is_error() {
            warn!(%stage, status = result.status.code(), detail = %result.detail, "stage failed");
        } else {
            info!(%stage, status = result.status.code(), detail = %result.detail, "stage finished");
        }
        self.observer.on_stage_result(stage, &result);
        self.results.push((stage, result));
    }

    fn finish(self, state: RunState, output: Option<PathBuf>, sections: Vec<Section>) -> RunReport {
        RunReport {
            state,
            results: self.results,
            output,
            sections,
        }
    }
}
