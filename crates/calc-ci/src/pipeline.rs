use calc_core::errors::{CalcError, ErrorInfo};
use serde::{Deserialize, Serialize};

/// Branch the pipeline guards unless configured otherwise.
pub const DEFAULT_BRANCH: &str = "main";
/// Runner label the job is scheduled on.
pub const DEFAULT_RUNNER: &str = "ubuntu-latest";
/// Toolchain pinned by the provisioning step.
pub const DEFAULT_TOOLCHAIN: &str = "1.75.0";
/// Manifest whose presence gates the dependency step.
pub const DEFAULT_MANIFEST: &str = "Cargo.toml";
/// Directory the test step runs from.
pub const DEFAULT_TEST_DIRECTORY: &str = ".";

/// What a single pipeline step does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StepAction {
    /// Fetch the repository contents.
    Checkout,
    /// Install a fixed toolchain version.
    ProvisionToolchain {
        /// Toolchain name or version, e.g. `1.75.0` or `stable`.
        version: String,
    },
    /// Fetch declared dependencies when `manifest` exists.
    InstallDependencies {
        /// Path of the `Cargo.toml` gating the step.
        manifest: String,
    },
    /// Discover and run every test target from `directory`.
    RunTests {
        /// Working directory of `cargo test`.
        directory: String,
    },
}

/// Data-free discriminant of [`StepAction`], used for ordering checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// See [`StepAction::Checkout`].
    Checkout,
    /// See [`StepAction::ProvisionToolchain`].
    ProvisionToolchain,
    /// See [`StepAction::InstallDependencies`].
    InstallDependencies,
    /// See [`StepAction::RunTests`].
    RunTests,
}

impl StepKind {
    /// The only step order a pipeline may declare.
    pub const ORDER: [StepKind; 4] = [
        StepKind::Checkout,
        StepKind::ProvisionToolchain,
        StepKind::InstallDependencies,
        StepKind::RunTests,
    ];

    /// Snake case label used in error context.
    pub fn as_str(self) -> &'static str {
        match self {
            StepKind::Checkout => "checkout",
            StepKind::ProvisionToolchain => "provision_toolchain",
            StepKind::InstallDependencies => "install_dependencies",
            StepKind::RunTests => "run_tests",
        }
    }
}

impl StepAction {
    /// Discriminant of the action.
    pub fn kind(&self) -> StepKind {
        match self {
            StepAction::Checkout => StepKind::Checkout,
            StepAction::ProvisionToolchain { .. } => StepKind::ProvisionToolchain,
            StepAction::InstallDependencies { .. } => StepKind::InstallDependencies,
            StepAction::RunTests { .. } => StepKind::RunTests,
        }
    }
}

/// A named step; every step halts the pipeline on a non-zero exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Display name shown by the runner.
    pub name: String,
    /// What the step does.
    #[serde(flatten)]
    pub action: StepAction,
}

impl Step {
    /// Creates a step from its display name and action.
    pub fn new(name: impl Into<String>, action: StepAction) -> Self {
        Self {
            name: name.into(),
            action,
        }
    }
}

/// Repository event that may start a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Trigger {
    /// A push to `branch`.
    Push {
        /// Branch that received the push.
        branch: String,
    },
    /// A pull request whose target is `base`.
    PullRequest {
        /// Branch the pull request targets.
        base: String,
    },
}

/// Declarative CI pipeline consumed by an external runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    /// Workflow name.
    pub name: String,
    /// Designated branch guarded by the pipeline.
    pub branch: String,
    /// Runner label the job is scheduled on.
    pub runs_on: String,
    /// Steps in execution order.
    pub steps: Vec<Step>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::for_branch(DEFAULT_BRANCH)
    }
}

impl Pipeline {
    /// Canonical four-step pipeline guarding `branch`.
    pub fn for_branch(branch: impl Into<String>) -> Self {
        Self {
            name: "CI".into(),
            branch: branch.into(),
            runs_on: DEFAULT_RUNNER.into(),
            steps: vec![
                Step::new("Checkout repository", StepAction::Checkout),
                Step::new(
                    "Install Rust toolchain",
                    StepAction::ProvisionToolchain {
                        version: DEFAULT_TOOLCHAIN.into(),
                    },
                ),
                Step::new(
                    "Install dependencies",
                    StepAction::InstallDependencies {
                        manifest: DEFAULT_MANIFEST.into(),
                    },
                ),
                Step::new(
                    "Run tests",
                    StepAction::RunTests {
                        directory: DEFAULT_TEST_DIRECTORY.into(),
                    },
                ),
            ],
        }
    }

    /// Checks the declaration is complete and its steps follow [`StepKind::ORDER`].
    pub fn validate(&self) -> Result<(), CalcError> {
        if self.name.trim().is_empty() {
            return Err(pipeline_error("pipeline_name", "pipeline declaration missing name"));
        }
        if self.branch.trim().is_empty() {
            return Err(pipeline_error(
                "pipeline_branch",
                "pipeline declaration missing branch",
            ));
        }
        if self.runs_on.trim().is_empty() {
            return Err(pipeline_error(
                "pipeline_runner",
                "pipeline declaration missing runner label",
            ));
        }

        let kinds: Vec<StepKind> = self.steps.iter().map(|step| step.action.kind()).collect();
        if kinds != StepKind::ORDER {
            let found = kinds
                .iter()
                .map(|kind| kind.as_str())
                .collect::<Vec<_>>()
                .join(",");
            let expected = StepKind::ORDER
                .iter()
                .map(|kind| kind.as_str())
                .collect::<Vec<_>>()
                .join(",");
            return Err(CalcError::Pipeline(
                ErrorInfo::new("calc_ci.step_order", "pipeline steps out of order")
                    .with_context("expected", expected)
                    .with_context("found", found),
            ));
        }

        for (index, step) in self.steps.iter().enumerate() {
            if step.name.trim().is_empty() {
                return Err(CalcError::Pipeline(
                    ErrorInfo::new("calc_ci.step_name", "pipeline step missing name")
                        .with_context("index", index.to_string()),
                ));
            }
            let missing = match &step.action {
                StepAction::Checkout => None,
                StepAction::ProvisionToolchain { version } => {
                    version.trim().is_empty().then_some("toolchain version")
                }
                StepAction::InstallDependencies { manifest } => {
                    if !manifest.trim().is_empty() && !is_plain_path(manifest) {
                        return Err(CalcError::Pipeline(
                            ErrorInfo::new(
                                "calc_ci.manifest_path",
                                "dependency manifest must be a plain path",
                            )
                            .with_context("manifest", manifest.clone())
                            .with_hint("use only letters, digits and `/ . _ -`"),
                        ));
                    }
                    manifest.trim().is_empty().then_some("dependency manifest")
                }
                StepAction::RunTests { directory } => {
                    directory.trim().is_empty().then_some("test directory")
                }
            };
            if let Some(field) = missing {
                return Err(CalcError::Pipeline(
                    ErrorInfo::new("calc_ci.step_field", format!("pipeline step missing {field}"))
                        .with_context("step", step.name.clone()),
                ));
            }
        }
        Ok(())
    }

    /// Returns true when `trigger` targets the designated branch.
    pub fn is_triggered_by(&self, trigger: &Trigger) -> bool {
        match trigger {
            Trigger::Push { branch } => branch == &self.branch,
            Trigger::PullRequest { base } => base == &self.branch,
        }
    }

    /// Toolchain version pinned by the provisioning step, if declared.
    pub fn toolchain(&self) -> Option<&str> {
        self.steps.iter().find_map(|step| match &step.action {
            StepAction::ProvisionToolchain { version } => Some(version.as_str()),
            _ => None,
        })
    }
}

/// True when `path` is safe to splice into a shell command unquoted.
fn is_plain_path(path: &str) -> bool {
    !path.starts_with('-')
        && path
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '/' | '.' | '_' | '-'))
}

fn pipeline_error(code: &str, message: &str) -> CalcError {
    CalcError::Pipeline(ErrorInfo::new(format!("calc_ci.{code}"), message))
}
