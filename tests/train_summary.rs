use clap::Parser;
use qlearn_ttt::{
    adapters::load_agent,
    cli::commands::train::{TrainArgs, execute},
    q_learning::EnvironmentKind,
};
use tempfile::tempdir;

fn parse_args<I, T>(args: I) -> TrainArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    TrainArgs::parse_from(args)
}

#[test]
fn summary_without_extension_appends_json() {
    let tmp = tempdir().unwrap();
    let summary_stem = tmp.path().join("run_overview");

    let args = parse_args([
        "qlearn-train",
        "--episodes",
        "50",
        "--seed",
        "3",
        "--no-progress",
        "--summary",
        summary_stem.to_str().unwrap(),
    ]);

    execute(args).expect("training with summary should succeed");

    let expected_path = summary_stem.with_extension("json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );

    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["training"]["episodes"], 50);
    assert_eq!(parsed["opponent"], "random");
    assert_eq!(parsed["schedule"]["seed"], 3);
    assert_eq!(parsed["training"]["curve"].as_array().unwrap().len(), 25);
}

#[test]
fn summary_directory_argument_creates_default_file() {
    let tmp = tempdir().unwrap();
    let summary_dir = tmp.path().join("summaries");
    std::fs::create_dir(&summary_dir).unwrap();
    let summary_arg = format!("{}/", summary_dir.display());

    let args = parse_args([
        "qlearn-train",
        "--episodes",
        "10",
        "--no-progress",
        "--summary",
        &summary_arg,
    ]);

    execute(args).expect("training with directory summary should succeed");

    let expected_path = summary_dir.join("training_summary.json");
    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["training"]["episodes"], 10);
}

#[test]
fn line_world_run_writes_agent_and_curve() {
    let tmp = tempdir().unwrap();
    let output = tmp.path().join("line.json");
    let curve = tmp.path().join("curve.csv");

    let args = parse_args([
        "qlearn-train",
        "--env",
        "line",
        "--seed",
        "5",
        "--no-progress",
        "--output",
        output.to_str().unwrap(),
        "--curve",
        curve.to_str().unwrap(),
    ]);
    execute(args).expect("line world training should succeed");

    let saved = load_agent(&output).unwrap();
    assert!(matches!(
        saved.metadata.environment,
        EnvironmentKind::LineWorld(config) if config.n_cells == 7 && config.goal == 6
    ));
    assert_eq!(saved.metadata.episodes_trained, Some(400));
    assert_eq!(saved.config.learning_rate, 0.1);

    let csv_text = std::fs::read_to_string(&curve).unwrap();
    let mut lines = csv_text.lines();
    assert_eq!(lines.next(), Some("episode,epsilon,average_reward"));
    assert_eq!(lines.count(), 20);
}

#[test]
fn existing_output_requires_force() {
    let tmp = tempdir().unwrap();
    let output = tmp.path().join("agent.msgpack");
    std::fs::write(&output, b"keep me").unwrap();

    let args = parse_args([
        "qlearn-train",
        "--episodes",
        "5",
        "--no-progress",
        "--output",
        output.to_str().unwrap(),
    ]);
    let err = execute(args).unwrap_err();
    assert!(err.to_string().contains("already exists"));
    assert_eq!(std::fs::read(&output).unwrap(), b"keep me");

    let args = parse_args([
        "qlearn-train",
        "--episodes",
        "5",
        "--no-progress",
        "--force",
        "--output",
        output.to_str().unwrap(),
    ]);
    execute(args).expect("forced save should succeed");
    assert!(load_agent(&output).is_ok());
}

#[test]
fn config_file_values_yield_to_flags() {
    let tmp = tempdir().unwrap();
    let config = tmp.path().join("run.json");
    std::fs::write(
        &config,
        r#"{ "episodes": 30, "learning_rate": 0.5, "seed": 8 }"#,
    )
    .unwrap();

    let args = parse_args([
        "qlearn-train",
        "--config",
        config.to_str().unwrap(),
        "--learning-rate",
        "0.3",
    ]);
    let run = args.resolve().unwrap();

    assert_eq!(run.training.episodes, 30);
    assert_eq!(run.training.seed, Some(8));
    assert_eq!(run.agent.learning_rate, 0.3);
    assert_eq!(run.agent.discount_factor, 0.9);
}
