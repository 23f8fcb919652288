//! Harvester core: typed channel settings and the pure parts of the pipeline.
mod candidate;
mod config;
mod filter;
mod progress;
mod report;
mod slug;
mod state;

pub use candidate::{Candidate, FeedItem, FALLBACK_STEM, MAX_STEM_BYTES};
pub use config::{
    ChannelConfig, ChannelConfigBuilder, ChannelConfigError, ConfigError, FeedMode, PatternPair,
    DEFAULT_MIN_APPROVAL_RATIO, DEFAULT_MIN_SCORE, DEFAULT_TARGET_COUNT,
};
pub use filter::{
    check_resource_kind, has_pattern_match, screen_item, Rejection, EXPECTED_RESOURCE_FAMILY,
};
pub use progress::{render_bar, ProgressLine, BAR_WIDTH};
pub use report::{ChannelOutcome, Report, Shortfall, TransferFailure};
pub use slug::{slugify, slugify_with, SlugMode};
pub use state::{ChannelPhase, PhaseEvent};
