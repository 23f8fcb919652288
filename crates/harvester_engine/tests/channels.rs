use std::fs;
use std::time::Duration;

use harvester_core::{ConfigError, FeedMode, PatternPair};
use harvester_engine::{load_channels, parse_channels, LoadError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn toml_path(temp: &TempDir, dir: &str) -> String {
    temp.path().join(dir).display().to_string().replace('\\', "/")
}

#[test]
fn parses_channels_in_file_order_with_defaults() {
    engine_logging::initialize_for_tests();
    let temp = TempDir::new().unwrap();
    let text = format!(
        r#"
[[channel]]
name = "wallpapers"
feed_mode = "top"
amount = 10
resolutions = ["1920x1080", "3840x2160"]
upvote_threshold = 50
upvote_ratio = 0.8
destination = "{walls}"

[[channel]]
name = "earthporn"
any_resolution = true
destination = "{earth}"
"#,
        walls = toml_path(&temp, "walls"),
        earth = toml_path(&temp, "earth"),
    );

    let loaded = parse_channels(&text).unwrap();
    assert!(loaded.rejected.is_empty());
    assert_eq!(loaded.channels.len(), 2);

    let walls = &loaded.channels[0];
    assert_eq!(walls.channel_id(), "wallpapers");
    assert_eq!(walls.feed_mode(), FeedMode::RankedAllTime);
    assert_eq!(walls.target_count(), 10);
    assert_eq!(walls.min_score(), 50);
    assert_eq!(walls.min_approval_ratio(), 0.8);
    assert_eq!(
        walls.required_patterns(),
        &[PatternPair::new("1920", "1080"), PatternPair::new("3840", "2160")]
    );
    assert!(walls.destination().is_dir());

    let earth = &loaded.channels[1];
    assert_eq!(earth.channel_id(), "earthporn");
    assert_eq!(earth.feed_mode(), FeedMode::RankedCurrent);
    assert_eq!(earth.target_count(), 25);
    assert!(earth.accept_any_pattern());
    assert_eq!(earth.min_score(), 2);
    assert_eq!(earth.min_approval_ratio(), 0.51);
}

#[test]
fn invalid_channels_are_rejected_individually() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("blocked");
    fs::write(&blocker, "file").unwrap();
    let text = format!(
        r#"
[[channel]]
name = "best_mode"
feed_mode = "best"
destination = "{ok}"

[[channel]]
name = "bad_res"
resolutions = ["4k"]
destination = "{ok}"

[[channel]]
name = "no_dest"

[[channel]]
name = "blocked"
destination = "{blocked}"

[[channel]]
name = "typo"
amonut = 3
destination = "{ok}"

[[channel]]
name = "fine"
destination = "{ok}"

[[channel]]
name = "fine"
destination = "{ok}"
"#,
        ok = toml_path(&temp, "ok"),
        blocked = toml_path(&temp, "blocked"),
    );

    let loaded = parse_channels(&text).unwrap();
    let ids: Vec<_> = loaded.channels.iter().map(|c| c.channel_id()).collect();
    assert_eq!(ids, vec!["fine"]);

    let errors: Vec<_> = loaded
        .rejected
        .iter()
        .map(|r| (r.channel_id.as_str(), r.error.clone()))
        .collect();
    assert_eq!(errors[0], ("best_mode", ConfigError::InvalidFeedMode("best".into())));
    assert_eq!(errors[1], ("bad_res", ConfigError::InvalidPattern("4k".into())));
    assert_eq!(errors[2], ("no_dest", ConfigError::MissingKey("destination")));
    assert!(matches!(errors[3].1, ConfigError::InvalidDestination { .. }));
    assert!(matches!(&errors[4].1, ConfigError::Malformed(msg) if msg.contains("amonut")));
    assert_eq!(errors[5], ("fine", ConfigError::DuplicateChannel("fine".into())));
}

#[test]
fn settings_table_overrides_limits() {
    let temp = TempDir::new().unwrap();
    let text = format!(
        r#"
[settings]
scan_limit = 200
probe_timeout_secs = 3
transfer_timeout_secs = 30
max_bytes = 1024
user_agent = "test-agent"

[[channel]]
name = "wallpapers"
destination = "{dest}"
"#,
        dest = toml_path(&temp, "out"),
    );

    let loaded = parse_channels(&text).unwrap();
    assert_eq!(loaded.pipeline.scan_limit, 200);
    assert_eq!(loaded.pipeline.probe_timeout, Duration::from_secs(3));
    assert_eq!(loaded.pipeline.transfer_timeout, Duration::from_secs(30));
    assert_eq!(loaded.fetch.request_timeout, Duration::from_secs(30));
    assert_eq!(loaded.fetch.max_bytes, 1024);
    assert_eq!(loaded.fetch.user_agent, "test-agent");
}

#[test]
fn unreadable_or_empty_configuration_is_fatal() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing.toml");
    assert!(matches!(load_channels(&missing), Err(LoadError::Read { .. })));
    assert!(matches!(parse_channels("[[channel]"), Err(LoadError::Parse(_))));
    assert!(matches!(parse_channels(""), Err(LoadError::Empty)));
    assert!(matches!(
        parse_channels("[settings]\nbogus = 1\n"),
        Err(LoadError::Parse(_))
    ));
}
