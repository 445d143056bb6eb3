use std::error::Error;
use std::fs;
use std::path::PathBuf;

use calc_ci::{evaluate, render_workflow, to_json_string, workflow_matches, StepOutcome};
use clap::{Args, Subcommand};
use tracing::{info, warn};

use crate::config::CalcConfig;

/// Default location of the committed workflow.
const WORKFLOW_PATH: &str = ".github/workflows/ci.yml";

#[derive(Subcommand, Debug)]
pub enum CiCommand {
    /// Print the workflow YAML, or write it with `--out`.
    Render(RenderArgs),
    /// Fail when the committed workflow differs from the declaration.
    Check(CheckArgs),
    /// Fold step exit codes, in step order, into a pipeline verdict.
    ///
    /// Exits non-zero unless every step reported zero.
    Outcome(OutcomeArgs),
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[arg(long, default_value = WORKFLOW_PATH)]
    pub workflow: PathBuf,
}

#[derive(Args, Debug)]
pub struct OutcomeArgs {
    /// Exit code of each step that has reported.
    #[arg(allow_hyphen_values = true)]
    pub codes: Vec<i32>,
}

pub fn run(command: &CiCommand, config: &CalcConfig) -> Result<(), Box<dyn Error>> {
    let pipeline = config.pipeline.to_pipeline();
    match command {
        CiCommand::Render(args) => {
            let yaml = render_workflow(&pipeline)?;
            match &args.out {
                Some(path) => {
                    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                        fs::create_dir_all(parent)?;
                    }
                    fs::write(path, yaml)?;
                    info!(path = %path.display(), "wrote workflow");
                }
                None => print!("{yaml}"),
            }
            Ok(())
        }
        CiCommand::Check(args) => {
            let contents = fs::read_to_string(&args.workflow)?;
            if !workflow_matches(&pipeline, &contents)? {
                warn!(path = %args.workflow.display(), "workflow drifted from declaration");
                return Err(format!(
                    "{} is out of date; regenerate it with `calc ci render --out {}`",
                    args.workflow.display(),
                    args.workflow.display()
                )
                .into());
            }
            println!("{} is up to date", args.workflow.display());
            Ok(())
        }
        CiCommand::Outcome(args) => {
            let outcome = evaluate(&pipeline, &args.codes)?;
            println!("{}", to_json_string(&outcome)?);
            if outcome.is_success() {
                return Ok(());
            }
            if let Some(index) = outcome.failed_step {
                let name = &outcome.steps[index].name;
                return Err(format!("pipeline failed at step `{name}`").into());
            }
            let pending = outcome
                .steps
                .iter()
                .find(|report| report.outcome == StepOutcome::Pending)
                .map_or("<none>", |report| report.name.as_str());
            Err(format!("pipeline incomplete; step `{pending}` has not reported").into())
        }
    }
}
