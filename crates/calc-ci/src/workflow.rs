//! GitHub Actions rendering of a [`Pipeline`].

use std::collections::BTreeMap;

use calc_core::errors::CalcError;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::pipeline::{Pipeline, Step, StepAction};
use crate::serde::{from_yaml_str, to_yaml_string};

/// Job identifier used in the rendered workflow.
pub const JOB_ID: &str = "test";

const CHECKOUT_ACTION: &str = "actions/checkout@v4";
const TOOLCHAIN_ACTION: &str = "dtolnay/rust-toolchain@master";

/// Branch filter of one trigger event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchFilter {
    /// Branches the event fires for.
    pub branches: Vec<String>,
}

/// The workflow's `on:` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowTriggers {
    /// Pushes to the listed branches.
    pub push: BranchFilter,
    /// Pull requests targeting the listed branches.
    pub pull_request: BranchFilter,
}

/// One entry of a job's `steps:` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStep {
    /// Step display name.
    pub name: String,
    /// Action reference, e.g. `actions/checkout@v4`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses: Option<String>,
    /// Inputs passed to the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with: Option<BTreeMap<String, String>>,
    /// Shell command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,
    /// Directory the shell command runs in.
    #[serde(
        default,
        rename = "working-directory",
        skip_serializing_if = "Option::is_none"
    )]
    pub working_directory: Option<String>,
}

/// A single job of the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowJob {
    /// Runner label.
    #[serde(rename = "runs-on")]
    pub runs_on: String,
    /// Steps in execution order.
    pub steps: Vec<WorkflowStep>,
}

/// Subset of the GitHub Actions workflow schema the pipeline maps onto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    /// Workflow display name.
    pub name: String,
    /// Events that start the workflow.
    #[serde(rename = "on")]
    pub triggers: WorkflowTriggers,
    /// Jobs keyed by identifier.
    pub jobs: BTreeMap<String, WorkflowJob>,
}

impl Workflow {
    /// Maps a validated pipeline onto the workflow schema.
    pub fn from_pipeline(pipeline: &Pipeline) -> Result<Self, CalcError> {
        pipeline.validate()?;
        let branches = vec![pipeline.branch.clone()];
        let steps = pipeline.steps.iter().map(render_step).collect();
        let job = WorkflowJob {
            runs_on: pipeline.runs_on.clone(),
            steps,
        };
        Ok(Self {
            name: pipeline.name.clone(),
            triggers: WorkflowTriggers {
                push: BranchFilter {
                    branches: branches.clone(),
                },
                pull_request: BranchFilter { branches },
            },
            jobs: BTreeMap::from([(JOB_ID.to_string(), job)]),
        })
    }

    /// Parses workflow YAML.
    pub fn parse(contents: &str) -> Result<Self, CalcError> {
        from_yaml_str(contents)
    }
}

fn render_step(step: &Step) -> WorkflowStep {
    let mut rendered = WorkflowStep {
        name: step.name.clone(),
        uses: None,
        with: None,
        run: None,
        working_directory: None,
    };
    match &step.action {
        StepAction::Checkout => rendered.uses = Some(CHECKOUT_ACTION.into()),
        StepAction::ProvisionToolchain { version } => {
            rendered.uses = Some(TOOLCHAIN_ACTION.into());
            rendered.with = Some(BTreeMap::from([("toolchain".to_string(), version.clone())]));
        }
        StepAction::InstallDependencies { manifest } => {
            rendered.run = Some(format!(
                "if [ -f {manifest} ]; then cargo fetch --manifest-path {manifest}; fi"
            ));
        }
        StepAction::RunTests { directory } => {
            rendered.run = Some("cargo test --workspace".into());
            rendered.working_directory = Some(directory.clone());
        }
    }
    rendered
}

/// Renders `pipeline` as GitHub Actions workflow YAML.
pub fn render_workflow(pipeline: &Pipeline) -> Result<String, CalcError> {
    let workflow = Workflow::from_pipeline(pipeline)?;
    let yaml = to_yaml_string(&workflow)?;
    info!(
        name = %pipeline.name,
        branch = %pipeline.branch,
        steps = pipeline.steps.len(),
        "rendered workflow"
    );
    Ok(yaml)
}

/// Returns true when `contents` describes the same workflow `pipeline` renders to.
///
/// Comparison is structural so formatting and key order in the committed
/// file do not matter.
pub fn workflow_matches(pipeline: &Pipeline, contents: &str) -> Result<bool, CalcError> {
    let expected = Workflow::from_pipeline(pipeline)?;
    let committed = Workflow::parse(contents)?;
    Ok(expected == committed)
}
