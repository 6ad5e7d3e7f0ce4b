use std::io::Write;

use hazard_nav::{Connectivity, NavConfig, ReplanMode, DEFAULT_CONFIG_YAML};

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

#[test]
fn default_yaml_matches_default_config() {
    let parsed: NavConfig = serde_yaml::from_str(DEFAULT_CONFIG_YAML).expect("parse defaults");
    assert_eq!(parsed, NavConfig::default());
    parsed.validate().expect("defaults are valid");
}

#[test]
fn partial_config_fills_in_defaults() {
    let file = write_config(
        r#"
search:
  connectivity: four
walk:
  max_steps: 40
  replan:
    mode: commit
    steps: 3
"#,
    );

    let config = NavConfig::load(file.path()).expect("load");
    assert_eq!(config.search.connectivity, Connectivity::Four);
    assert!(config.search.allow_corner_cutting);
    assert_eq!(config.walk.max_steps, 40);
    assert_eq!(config.walk.replan, ReplanMode::Commit { steps: 3 });
    assert_eq!(config.walk.arrived_at, 1.0);
    assert_eq!(config.weights.object_threshold, 0.5);
    assert_eq!(config.frame.cell_size, 0.25);
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = NavConfig::load_or_default(&dir.path().join("absent.yaml")).unwrap();
    assert_eq!(config, NavConfig::default());
}

#[test]
fn invalid_values_are_rejected_on_load() {
    let file = write_config("frame:\n  cell_size: 0.0\n");
    let err = NavConfig::load(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("frame.cell_size"));

    let file = write_config("walk:\n  replan:\n    mode: commit\n    steps: 0\n");
    assert!(NavConfig::load(file.path()).is_err());

    let file = write_config("weights:\n  free_cost: -1.0\n");
    assert!(NavConfig::load(file.path()).is_err());
}

#[test]
fn malformed_yaml_reports_the_path() {
    let file = write_config("search: [not, a, map]\n");
    let err = NavConfig::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config"));
}
