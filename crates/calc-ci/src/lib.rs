//! Declarative CI pipeline for the calc workspace.
//!
//! The pipeline is only declared here; an external runner executes it. This
//! crate validates the declaration, decides which repository events trigger
//! it, folds step statuses into a verdict and renders the GitHub Actions
//! workflow committed under `.github/workflows/`.

#![deny(missing_docs)]

mod outcome;
mod pipeline;
mod serde;
mod settings;
mod workflow;

pub use outcome::{evaluate, PipelineOutcome, PipelineStatus, StepOutcome, StepReport};
pub use pipeline::{
    Pipeline, Step, StepAction, StepKind, Trigger, DEFAULT_BRANCH, DEFAULT_MANIFEST,
    DEFAULT_RUNNER, DEFAULT_TEST_DIRECTORY, DEFAULT_TOOLCHAIN,
};
pub use serde::{from_yaml_str, to_json_string, to_yaml_string};
pub use settings::PipelineSettings;
pub use workflow::{
    render_workflow, workflow_matches, BranchFilter, Workflow, WorkflowJob, WorkflowStep,
    WorkflowTriggers, JOB_ID,
};
