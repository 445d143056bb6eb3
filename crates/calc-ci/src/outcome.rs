//! Folding per-step exit statuses into a pipeline verdict.
//!
//! Mirrors the runner contract: steps run in order, the first non-zero
//! status fails the run and nothing after it executes.

use calc_core::errors::{CalcError, ErrorInfo};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pipeline::{Pipeline, StepKind};

/// Result of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StepOutcome {
    /// Exited zero.
    Succeeded,
    /// Exited non-zero; halted the run.
    Failed {
        /// Reported exit code.
        code: i32,
    },
    /// Not run because an earlier step failed.
    Skipped,
    /// No status reported yet.
    Pending,
}

/// Outcome of one declared step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// Step display name.
    pub name: String,
    /// Step discriminant.
    pub kind: StepKind,
    /// What happened to the step.
    pub outcome: StepOutcome,
}

/// Verdict for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    /// Every step exited zero.
    Success,
    /// A step exited non-zero.
    Failed,
    /// No failure yet but some steps have not reported.
    Incomplete,
}

/// Per-step reports and the overall verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOutcome {
    /// Overall verdict.
    pub status: PipelineStatus,
    /// Index of the step that halted the run.
    pub failed_step: Option<usize>,
    /// One report per declared step, in order.
    pub steps: Vec<StepReport>,
}

impl PipelineOutcome {
    /// True only when every step exited zero.
    pub fn is_success(&self) -> bool {
        self.status == PipelineStatus::Success
    }
}

/// Evaluates `exit_codes`, given in step order, against `pipeline`.
///
/// Codes reported after the first failure are ignored since those steps
/// never run.
pub fn evaluate(pipeline: &Pipeline, exit_codes: &[i32]) -> Result<PipelineOutcome, CalcError> {
    if exit_codes.len() > pipeline.steps.len() {
        return Err(CalcError::Pipeline(
            ErrorInfo::new("calc_ci.too_many_statuses", "more statuses than pipeline steps")
                .with_context("steps", pipeline.steps.len().to_string())
                .with_context("statuses", exit_codes.len().to_string()),
        ));
    }

    let mut failed_step = None;
    let steps = pipeline
        .steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let outcome = match (failed_step, exit_codes.get(index)) {
                (Some(_), _) => StepOutcome::Skipped,
                (None, None) => StepOutcome::Pending,
                (None, Some(0)) => StepOutcome::Succeeded,
                (None, Some(&code)) => {
                    failed_step = Some(index);
                    StepOutcome::Failed { code }
                }
            };
            StepReport {
                name: step.name.clone(),
                kind: step.action.kind(),
                outcome,
            }
        })
        .collect::<Vec<_>>();

    let status = if failed_step.is_some() {
        PipelineStatus::Failed
    } else if steps
        .iter()
        .all(|report| report.outcome == StepOutcome::Succeeded)
    {
        PipelineStatus::Success
    } else {
        PipelineStatus::Incomplete
    };
    debug!(?status, ?failed_step, "evaluated pipeline statuses");

    Ok(PipelineOutcome {
        status,
        failed_step,
        steps,
    })
}
