use runwatch::config::{AgentConfig, load_config};
use runwatch::service::{Action, format_elapsed, tick_delta};

#[test]
fn formats_zero_padded_time_of_day() {
    assert_eq!(format_elapsed(0), "00:00:00");
    assert_eq!(format_elapsed(999), "00:00:00");
    assert_eq!(format_elapsed(2999), "00:00:02");
    assert_eq!(format_elapsed(3_661_000), "01:01:01");
    assert_eq!(format_elapsed(86_399_000), "23:59:59");
}

#[test]
fn formatting_wraps_past_24_hours() {
    assert_eq!(format_elapsed(86_400_000), "00:00:00");
    assert_eq!(format_elapsed(86_400_000 + 1000), "00:00:01");
    assert_eq!(format_elapsed(2 * 86_400_000 + 3_661_000), "01:01:01");
}

#[test]
fn tick_delta_clamps_backward_steps() {
    assert_eq!(tick_delta(0, 1000), 1000);
    assert_eq!(tick_delta(5, 5), 0);
    assert_eq!(tick_delta(1000, 500), 0);
    assert_eq!(tick_delta(-500, 500), 1000);
}

#[test]
fn accumulation_is_sum_of_deltas() {
    // Samples include a backward step; only non-negative deltas count.
    let samples = [0i64, 1000, 900, 2000, 2999];
    let mut elapsed: u64 = 0;
    for pair in samples.windows(2) {
        elapsed += tick_delta(pair[0], pair[1]);
    }
    assert_eq!(elapsed, 1000 + 0 + 1100 + 999);
}

#[test]
fn actions_parse_from_wire_values() {
    assert_eq!("START".parse::<Action>().unwrap(), Action::Start);
    assert_eq!("STOP".parse::<Action>().unwrap(), Action::Stop);
    assert!("PAUSE".parse::<Action>().is_err());
    assert!("start".parse::<Action>().is_err());
    assert_eq!(Action::Start.to_string(), "START");
    assert_eq!(Action::Stop.to_string(), "STOP");
}

#[test]
fn config_defaults_apply_to_empty_file() {
    let cfg: AgentConfig = serde_yaml::from_str("{}").unwrap();
    assert_eq!(cfg.tick_interval_ms, 999);
    assert_eq!(cfg.title, "Run is active");
    assert!(!cfg.log_only);
}

#[test]
fn config_loads_from_yaml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agent.yaml");
    std::fs::write(&path, "tick_interval_ms: 500\ntitle: Jog\nlog_only: true\n").unwrap();

    let cfg = load_config(&path).unwrap();
    assert_eq!(cfg.tick_interval_ms, 500);
    assert_eq!(cfg.title, "Jog");
    assert!(cfg.log_only);

    let (found, loaded) = AgentConfig::find_and_load(Some(path.clone())).unwrap();
    assert_eq!(found, Some(path));
    assert_eq!(loaded.tick_interval_ms, 500);
}

#[test]
fn explicit_config_path_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.yaml");
    assert!(AgentConfig::find_and_load(Some(missing)).is_err());
}
