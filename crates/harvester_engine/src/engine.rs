use harvester_core::{ChannelConfig, Report};
use thiserror::Error;

use crate::aggregator::{BatchAggregator, SelectionRound};
use crate::feed::RedditFeed;
use crate::fetch::{FetchSettings, ReqwestFetcher};
use crate::progress::ProgressSink;
use crate::selector::PipelineSettings;
use crate::FetchError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[from] FetchError),
}

/// Blocking front door: owns a single-threaded runtime and the HTTP-backed
/// collaborators, and drives one run at a time.
pub struct EngineHandle {
    runtime: tokio::runtime::Runtime,
    fetcher: ReqwestFetcher,
    feed: RedditFeed,
    pipeline: PipelineSettings,
}

impl EngineHandle {
    pub fn new(fetch: FetchSettings, pipeline: PipelineSettings) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let fetcher = ReqwestFetcher::new(fetch)?;
        let feed = RedditFeed::new(fetcher.client().clone());
        Ok(Self {
            runtime,
            fetcher,
            feed,
            pipeline,
        })
    }

    pub fn run(&self, configs: &[ChannelConfig], sink: &dyn ProgressSink) -> Report {
        let aggregator = self.aggregator(sink);
        self.runtime.block_on(aggregator.run(configs))
    }

    /// Selection only; nothing is written to disk.
    pub fn select(&self, configs: &[ChannelConfig], sink: &dyn ProgressSink) -> SelectionRound {
        let aggregator = self.aggregator(sink);
        self.runtime.block_on(aggregator.select_all(configs))
    }

    fn aggregator<'a>(&'a self, sink: &'a dyn ProgressSink) -> BatchAggregator<'a> {
        BatchAggregator::new(
            &self.feed,
            &self.fetcher,
            &self.fetcher,
            sink,
            self.pipeline.clone(),
        )
    }
}
