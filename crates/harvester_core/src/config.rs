use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_TARGET_COUNT: usize = 25;
pub const DEFAULT_MIN_SCORE: i64 = 2;
pub const DEFAULT_MIN_APPROVAL_RATIO: f64 = 0.51;

/// Listing order requested from the feed provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedMode {
    #[default]
    RankedCurrent,
    RankedAllTime,
    RankedDebated,
    Chronological,
    RankedRising,
}

impl FeedMode {
    pub const ALL: [FeedMode; 5] = [
        FeedMode::RankedCurrent,
        FeedMode::RankedAllTime,
        FeedMode::RankedDebated,
        FeedMode::Chronological,
        FeedMode::RankedRising,
    ];

    /// Name used in configuration files and listing URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            FeedMode::RankedCurrent => "hot",
            FeedMode::RankedAllTime => "top",
            FeedMode::RankedDebated => "controversial",
            FeedMode::Chronological => "new",
            FeedMode::RankedRising => "rising",
        }
    }

    /// Ranked-over-time listings need an explicit window to cover all time.
    pub fn wants_all_time_window(self) -> bool {
        matches!(self, FeedMode::RankedAllTime | FeedMode::RankedDebated)
    }
}

impl fmt::Display for FeedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        FeedMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::InvalidFeedMode(wanted.to_string()))
    }
}

/// Two substrings that must both appear in a title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternPair {
    pub first: String,
    pub second: String,
}

impl PatternPair {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Parses `"1920x1080"` into `("1920", "1080")`, splitting at the first `x`.
    pub fn parse_resolution(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        match trimmed.split_once(['x', 'X']) {
            Some((width, height)) if !width.is_empty() && !height.is_empty() => {
                Ok(Self::new(width, height))
            }
            _ => Err(ConfigError::InvalidPattern(trimmed.to_string())),
        }
    }

    pub fn matches(&self, title: &str) -> bool {
        title.contains(&self.first) && title.contains(&self.second)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{0} is not a valid feed mode")]
    InvalidFeedMode(String),
    #[error("missing required key `{0}`")]
    MissingKey(&'static str),
    #[error("invalid resolution pattern `{0}` (expected WIDTHxHEIGHT)")]
    InvalidPattern(String),
    #[error("approval ratio {0} is outside [0, 1]")]
    InvalidApprovalRatio(f64),
    #[error("{path} is not a valid destination: {reason}")]
    InvalidDestination { path: String, reason: String },
    #[error("channel `{0}` is configured more than once")]
    DuplicateChannel(String),
    #[error("{0}")]
    Malformed(String),
}

/// A configuration problem attributed to one channel entry.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("channel `{channel_id}`: {error}")]
pub struct ChannelConfigError {
    pub channel_id: String,
    pub error: ConfigError,
}

/// Validated, immutable settings for one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelConfig {
    channel_id: String,
    feed_mode: FeedMode,
    target_count: usize,
    accept_any_pattern: bool,
    required_patterns: Vec<PatternPair>,
    min_score: i64,
    min_approval_ratio: f64,
    destination: PathBuf,
}

impl ChannelConfig {
    pub fn builder(
        channel_id: impl Into<String>,
        destination: impl Into<PathBuf>,
    ) -> ChannelConfigBuilder {
        ChannelConfigBuilder {
            channel_id: channel_id.into(),
            destination: destination.into(),
            feed_mode: FeedMode::default(),
            target_count: DEFAULT_TARGET_COUNT,
            accept_any_pattern: false,
            required_patterns: Vec::new(),
            min_score: DEFAULT_MIN_SCORE,
            min_approval_ratio: DEFAULT_MIN_APPROVAL_RATIO,
        }
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn feed_mode(&self) -> FeedMode {
        self.feed_mode
    }

    pub fn target_count(&self) -> usize {
        self.target_count
    }

    pub fn accept_any_pattern(&self) -> bool {
        self.accept_any_pattern
    }

    pub fn required_patterns(&self) -> &[PatternPair] {
        &self.required_patterns
    }

    pub fn min_score(&self) -> i64 {
        self.min_score
    }

    pub fn min_approval_ratio(&self) -> f64 {
        self.min_approval_ratio
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

#[derive(Debug, Clone)]
pub struct ChannelConfigBuilder {
    channel_id: String,
    destination: PathBuf,
    feed_mode: FeedMode,
    target_count: usize,
    accept_any_pattern: bool,
    required_patterns: Vec<PatternPair>,
    min_score: i64,
    min_approval_ratio: f64,
}

impl ChannelConfigBuilder {
    pub fn feed_mode(mut self, mode: FeedMode) -> Self {
        self.feed_mode = mode;
        self
    }

    pub fn target_count(mut self, count: usize) -> Self {
        self.target_count = count;
        self
    }

    pub fn accept_any_pattern(mut self, accept: bool) -> Self {
        self.accept_any_pattern = accept;
        self
    }

    pub fn required_patterns(mut self, patterns: Vec<PatternPair>) -> Self {
        self.required_patterns = patterns;
        self
    }

    pub fn min_score(mut self, score: i64) -> Self {
        self.min_score = score;
        self
    }

    pub fn min_approval_ratio(mut self, ratio: f64) -> Self {
        self.min_approval_ratio = ratio;
        self
    }

    pub fn build(self) -> Result<ChannelConfig, ConfigError> {
        if self.channel_id.trim().is_empty() {
            return Err(ConfigError::MissingKey("name"));
        }
        if !(0.0..=1.0).contains(&self.min_approval_ratio) {
            return Err(ConfigError::InvalidApprovalRatio(self.min_approval_ratio));
        }
        if self.destination.as_os_str().is_empty() {
            return Err(ConfigError::MissingKey("destination"));
        }
        Ok(ChannelConfig {
            channel_id: self.channel_id,
            feed_mode: self.feed_mode,
            target_count: self.target_count,
            accept_any_pattern: self.accept_any_pattern,
            required_patterns: self.required_patterns,
            min_score: self.min_score,
            min_approval_ratio: self.min_approval_ratio,
            destination: self.destination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_mode_parses_listing_names_case_insensitively() {
        assert_eq!("hot".parse::<FeedMode>().unwrap(), FeedMode::RankedCurrent);
        assert_eq!(" TOP ".parse::<FeedMode>().unwrap(), FeedMode::RankedAllTime);
        assert_eq!("new".parse::<FeedMode>().unwrap(), FeedMode::Chronological);
        assert_eq!(
            "best".parse::<FeedMode>().unwrap_err(),
            ConfigError::InvalidFeedMode("best".into())
        );
    }

    #[test]
    fn builder_applies_defaults() {
        let config = ChannelConfig::builder("wallpapers", "/tmp/out").build().unwrap();
        assert_eq!(config.feed_mode(), FeedMode::RankedCurrent);
        assert_eq!(config.target_count(), 25);
        assert!(!config.accept_any_pattern());
        assert!(config.required_patterns().is_empty());
        assert_eq!(config.min_score(), 2);
        assert_eq!(config.min_approval_ratio(), 0.51);
    }

    #[test]
    fn builder_rejects_out_of_range_ratio() {
        let err = ChannelConfig::builder("wallpapers", "/tmp/out")
            .min_approval_ratio(1.5)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidApprovalRatio(1.5));
    }

    #[test]
    fn resolution_splits_at_first_x() {
        assert_eq!(
            PatternPair::parse_resolution("3840x2160").unwrap(),
            PatternPair::new("3840", "2160")
        );
        assert!(PatternPair::parse_resolution("4k").is_err());
        assert!(PatternPair::parse_resolution("x1080").is_err());
    }
}
