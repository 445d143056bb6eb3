use std::path::Path;

use calc_ci::{
    from_yaml_str, render_workflow, to_yaml_string, workflow_matches, Pipeline, Workflow, JOB_ID,
};

fn committed_workflow() -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../.github/workflows/ci.yml");
    std::fs::read_to_string(path).expect("read committed workflow")
}

#[test]
fn committed_workflow_matches_default_pipeline() {
    let contents = committed_workflow();
    assert!(workflow_matches(&Pipeline::default(), &contents).unwrap());
}

#[test]
fn rendered_yaml_parses_back_to_same_workflow() {
    let pipeline = Pipeline::default();
    let yaml = render_workflow(&pipeline).unwrap();
    let parsed = Workflow::parse(&yaml).unwrap();
    assert_eq!(parsed, Workflow::from_pipeline(&pipeline).unwrap());
    assert!(workflow_matches(&pipeline, &yaml).unwrap());
}

#[test]
fn workflow_triggers_on_push_and_pull_request() {
    let workflow = Workflow::from_pipeline(&Pipeline::for_branch("release")).unwrap();
    assert_eq!(workflow.triggers.push.branches, ["release"]);
    assert_eq!(workflow.triggers.pull_request.branches, ["release"]);

    let job = &workflow.jobs[JOB_ID];
    assert_eq!(job.runs_on, "ubuntu-latest");
    let names: Vec<&str> = job.steps.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        ["Checkout repository", "Install Rust toolchain", "Install dependencies", "Run tests"]
    );
    assert_eq!(job.steps[0].uses.as_deref(), Some("actions/checkout@v4"));
    assert_eq!(
        job.steps[1].with.as_ref().and_then(|with| with.get("toolchain")).map(String::as_str),
        Some("1.75.0")
    );
    assert_eq!(
        job.steps[2].run.as_deref(),
        Some("if [ -f Cargo.toml ]; then cargo fetch --manifest-path Cargo.toml; fi")
    );
    assert_eq!(job.steps[3].run.as_deref(), Some("cargo test --workspace"));
}

#[test]
fn drifted_workflow_is_detected() {
    let drifted = committed_workflow().replace("1.75.0", "1.70.0");
    assert!(!workflow_matches(&Pipeline::default(), &drifted).unwrap());
    assert!(!workflow_matches(&Pipeline::for_branch("develop"), &committed_workflow()).unwrap());
}

#[test]
fn invalid_pipeline_is_not_rendered() {
    let mut pipeline = Pipeline::default();
    pipeline.steps.reverse();
    assert!(render_workflow(&pipeline).is_err());
}

#[test]
fn pipeline_declaration_round_trips_through_yaml() {
    let pipeline = Pipeline::default();
    let yaml = to_yaml_string(&pipeline).unwrap();
    assert!(yaml.contains("action: provision_toolchain"));
    let decoded: Pipeline = from_yaml_str(&yaml).unwrap();
    assert_eq!(decoded, pipeline);
}
