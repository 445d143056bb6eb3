use serde::{Deserialize, Serialize};

use crate::pipeline::{
    Pipeline, StepAction, DEFAULT_BRANCH, DEFAULT_MANIFEST, DEFAULT_RUNNER,
    DEFAULT_TEST_DIRECTORY, DEFAULT_TOOLCHAIN,
};

/// User-facing knobs for the canonical pipeline, read from the `[pipeline]`
/// table of `calc.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Workflow name.
    pub name: String,
    /// Designated branch.
    pub branch: String,
    /// Runner label.
    pub runs_on: String,
    /// Pinned toolchain version.
    pub toolchain: String,
    /// Manifest gating the dependency step.
    pub manifest: String,
    /// Working directory of the test step.
    pub test_directory: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            name: "CI".into(),
            branch: DEFAULT_BRANCH.into(),
            runs_on: DEFAULT_RUNNER.into(),
            toolchain: DEFAULT_TOOLCHAIN.into(),
            manifest: DEFAULT_MANIFEST.into(),
            test_directory: DEFAULT_TEST_DIRECTORY.into(),
        }
    }
}

impl PipelineSettings {
    /// Builds the canonical pipeline with these settings applied.
    pub fn to_pipeline(&self) -> Pipeline {
        let mut pipeline = Pipeline::for_branch(self.branch.clone());
        pipeline.name = self.name.clone();
        pipeline.runs_on = self.runs_on.clone();
        for step in &mut pipeline.steps {
            match &mut step.action {
                StepAction::Checkout => {}
                StepAction::ProvisionToolchain { version } => version.clone_from(&self.toolchain),
                StepAction::InstallDependencies { manifest } => {
                    manifest.clone_from(&self.manifest)
                }
                StepAction::RunTests { directory } => directory.clone_from(&self.test_directory),
            }
        }
        pipeline
    }
}
