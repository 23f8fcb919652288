//! Channel configuration file loading.
//!
//! The file is TOML with one `[[channel]]` entry per channel and an optional
//! `[settings]` table:
//!
//! ```toml
//! [settings]
//! scan_limit = 1000
//!
//! [[channel]]
//! name = "wallpapers"
//! feed_mode = "top"
//! amount = 10
//! resolutions = ["1920x1080", "3840x2160"]
//! destination = "./wallpapers"
//! ```
//!
//! A broken channel entry is rejected on its own; only an unreadable file or
//! a broken `[settings]` table fails the whole load.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use harvester_core::{
    ChannelConfig, ChannelConfigError, ConfigError, FeedMode, PatternPair,
    DEFAULT_MIN_APPROVAL_RATIO, DEFAULT_MIN_SCORE, DEFAULT_TARGET_COUNT,
};
use serde::Deserialize;
use thiserror::Error;

use crate::fetch::FetchSettings;
use crate::persist::ensure_output_dir;
use crate::selector::PipelineSettings;

pub const DEFAULT_CONFIG_FILENAME: &str = "harvester.toml";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("no channels configured")]
    Empty,
}

/// Everything a run needs from the configuration file.
#[derive(Debug, Clone)]
pub struct LoadedChannels {
    pub channels: Vec<ChannelConfig>,
    pub rejected: Vec<ChannelConfigError>,
    pub fetch: FetchSettings,
    pub pipeline: PipelineSettings,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFile {
    #[serde(default)]
    settings: RawSettings,
    #[serde(default, rename = "channel")]
    channels: Vec<toml::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSettings {
    scan_limit: Option<usize>,
    probe_timeout_secs: Option<u64>,
    transfer_timeout_secs: Option<u64>,
    connect_timeout_secs: Option<u64>,
    max_bytes: Option<u64>,
    user_agent: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawChannel {
    name: String,
    feed_mode: Option<String>,
    amount: Option<usize>,
    any_resolution: Option<bool>,
    resolutions: Option<Vec<String>>,
    #[serde(alias = "upvote_threshold")]
    score_threshold: Option<i64>,
    upvote_ratio: Option<f64>,
    destination: Option<PathBuf>,
}

pub fn load_channels(path: &Path) -> Result<LoadedChannels, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let loaded = parse_channels(&text)?;
    engine_info!(
        "Loaded {} channel(s) from {:?} ({} rejected)",
        loaded.channels.len(),
        path,
        loaded.rejected.len()
    );
    Ok(loaded)
}

/// Parses configuration text. Destinations are created when missing.
pub fn parse_channels(text: &str) -> Result<LoadedChannels, LoadError> {
    let raw: RawFile = toml::from_str(text)?;
    if raw.channels.is_empty() {
        return Err(LoadError::Empty);
    }

    let mut channels = Vec::with_capacity(raw.channels.len());
    let mut rejected = Vec::new();
    let mut seen = HashSet::new();

    for (index, value) in raw.channels.into_iter().enumerate() {
        let channel_id = value
            .get("name")
            .and_then(toml::Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", index + 1));

        let resolved = if seen.insert(channel_id.clone()) {
            resolve_channel(value)
        } else {
            Err(ConfigError::DuplicateChannel(channel_id.clone()))
        };

        match resolved {
            Ok(config) => channels.push(config),
            Err(error) => {
                let rejection = ChannelConfigError { channel_id, error };
                engine_warn!("Skipping {}", rejection);
                rejected.push(rejection);
            }
        }
    }

    let (fetch, pipeline) = resolve_settings(raw.settings);
    Ok(LoadedChannels {
        channels,
        rejected,
        fetch,
        pipeline,
    })
}

fn resolve_channel(value: toml::Value) -> Result<ChannelConfig, ConfigError> {
    let raw =
        RawChannel::deserialize(value).map_err(|err| ConfigError::Malformed(err.to_string()))?;

    let feed_mode = match raw.feed_mode.as_deref() {
        Some(mode) => mode.parse::<FeedMode>()?,
        None => FeedMode::default(),
    };
    let required_patterns = raw
        .resolutions
        .unwrap_or_default()
        .iter()
        .map(|res| PatternPair::parse_resolution(res))
        .collect::<Result<Vec<_>, _>>()?;
    let destination = raw.destination.ok_or(ConfigError::MissingKey("destination"))?;

    let config = ChannelConfig::builder(raw.name, destination)
        .feed_mode(feed_mode)
        .target_count(raw.amount.unwrap_or(DEFAULT_TARGET_COUNT))
        .accept_any_pattern(raw.any_resolution.unwrap_or(false))
        .required_patterns(required_patterns)
        .min_score(raw.score_threshold.unwrap_or(DEFAULT_MIN_SCORE))
        .min_approval_ratio(raw.upvote_ratio.unwrap_or(DEFAULT_MIN_APPROVAL_RATIO))
        .build()?;

    ensure_output_dir(config.destination()).map_err(|err| ConfigError::InvalidDestination {
        path: config.destination().display().to_string(),
        reason: err.to_string(),
    })?;
    Ok(config)
}

fn resolve_settings(raw: RawSettings) -> (FetchSettings, PipelineSettings) {
    let mut fetch = FetchSettings::default();
    let mut pipeline = PipelineSettings::default();

    if let Some(limit) = raw.scan_limit {
        pipeline.scan_limit = limit;
    }
    if let Some(secs) = raw.probe_timeout_secs {
        pipeline.probe_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = raw.transfer_timeout_secs {
        pipeline.transfer_timeout = Duration::from_secs(secs);
        fetch.request_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = raw.connect_timeout_secs {
        fetch.connect_timeout = Duration::from_secs(secs);
    }
    if let Some(max_bytes) = raw.max_bytes {
        fetch.max_bytes = max_bytes;
    }
    if let Some(user_agent) = raw.user_agent {
        fetch.user_agent = user_agent;
    }
    (fetch, pipeline)
}
