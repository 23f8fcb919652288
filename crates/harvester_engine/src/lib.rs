//! Harvester engine: feed, probe and transfer IO plus the two pipeline stages.
mod aggregator;
mod channels;
mod engine;
mod feed;
mod fetch;
mod persist;
mod progress;
mod selector;
mod types;

pub use aggregator::{BatchAggregator, ChannelBatch, MaterializeOutcome, SelectionRound};
pub use channels::{
    load_channels, parse_channels, LoadError, LoadedChannels, DEFAULT_CONFIG_FILENAME,
};
pub use engine::{EngineError, EngineHandle};
pub use feed::{FeedSource, RedditFeed, DEFAULT_FEED_BASE_URL, DEFAULT_SCAN_LIMIT};
pub use fetch::{FetchSettings, ReqwestFetcher, ResourceProbe, Transfer};
pub use persist::{ensure_output_dir, AtomicFileWriter, PendingFile, PersistError};
pub use progress::{NullProgress, ProgressSink, TerminalProgress};
pub use selector::{CandidateSelector, PipelineSettings, Selection};
pub use types::{FailureKind, FetchError, ProgressEvent, SelectionError, Stage, TransferError};
