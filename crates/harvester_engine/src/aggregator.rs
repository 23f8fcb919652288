use std::path::{Path, PathBuf};

use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};
use harvester_core::{
    Candidate, ChannelConfig, ChannelOutcome, ChannelPhase, PhaseEvent, Report, Shortfall,
    TransferFailure,
};

use crate::feed::FeedSource;
use crate::fetch::{ResourceProbe, Transfer};
use crate::progress::{report, ProgressSink};
use crate::selector::{CandidateSelector, PipelineSettings};
use crate::Stage;

const DOWNLOAD_LABEL: &str = "Downloading images progress:";

/// Candidates selected for one channel together with where they go.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelBatch {
    pub channel_id: String,
    pub destination: PathBuf,
    pub candidates: Vec<Candidate>,
}

impl ChannelBatch {
    pub fn target_path(&self, candidate: &Candidate) -> PathBuf {
        self.destination.join(candidate.file_name())
    }
}

/// Output of the selection phase, in configuration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionRound {
    pub batches: Vec<ChannelBatch>,
    pub channels: Vec<ChannelOutcome>,
    pub shortfalls: Vec<Shortfall>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MaterializeOutcome {
    pub downloaded: usize,
    pub failed: Vec<TransferFailure>,
}

pub struct BatchAggregator<'a> {
    feed: &'a dyn FeedSource,
    probe: &'a dyn ResourceProbe,
    transfer: &'a dyn Transfer,
    sink: &'a dyn ProgressSink,
    settings: PipelineSettings,
}

impl<'a> BatchAggregator<'a> {
    pub fn new(
        feed: &'a dyn FeedSource,
        probe: &'a dyn ResourceProbe,
        transfer: &'a dyn Transfer,
        sink: &'a dyn ProgressSink,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            feed,
            probe,
            transfer,
            sink,
            settings,
        }
    }

    /// Selects for every channel, then downloads everything in one pass.
    pub async fn run(&self, configs: &[ChannelConfig]) -> Report {
        let round = self.select_all(configs).await;
        let mut channels = round.channels;
        for channel in channels.iter_mut() {
            channel.phase = channel.phase.apply(PhaseEvent::MaterializationStarted);
        }

        let outcome = self.materialize(&round.batches).await;

        for channel in channels.iter_mut() {
            channel.phase = channel.phase.apply(PhaseEvent::MaterializationFinished);
        }
        if !outcome.failed.is_empty() {
            engine_warn!("{} download(s) failed", outcome.failed.len());
        }
        engine_info!("Downloaded {} image(s)", outcome.downloaded);

        Report {
            downloaded: outcome.downloaded,
            failed: outcome.failed,
            shortfalls: round.shortfalls,
            channels,
            rejected_configs: Vec::new(),
        }
    }

    /// Runs the selector for each channel in order. A failing channel is
    /// recorded and skipped.
    pub async fn select_all(&self, configs: &[ChannelConfig]) -> SelectionRound {
        let selector = CandidateSelector::new(self.feed, self.probe, self.sink, &self.settings);
        let mut round = SelectionRound::default();
        engine_info!("Getting images from {} channel(s)", configs.len());

        for config in configs {
            let mut outcome = ChannelOutcome {
                channel_id: config.channel_id().to_string(),
                phase: ChannelPhase::Unconfigured.apply(PhaseEvent::SelectionStarted),
                selected: 0,
                requested: config.target_count(),
                error: None,
            };

            match selector.select(config).await {
                Ok(selection) => {
                    outcome.phase = outcome.phase.apply(PhaseEvent::SelectionSucceeded);
                    outcome.selected = selection.candidates.len();
                    round.shortfalls.extend(selection.shortfall);
                    round.batches.push(ChannelBatch {
                        channel_id: config.channel_id().to_string(),
                        destination: config.destination().to_path_buf(),
                        candidates: selection.candidates,
                    });
                }
                Err(err) => {
                    engine_error!("Selection failed for {}: {}", config.channel_id(), err);
                    outcome.phase = outcome.phase.apply(PhaseEvent::SelectionFailed);
                    outcome.error = Some(err.to_string());
                }
            }
            round.channels.push(outcome);
        }

        round
    }

    /// Downloads every candidate in batch order; one item failing never
    /// stops the rest.
    pub async fn materialize(&self, batches: &[ChannelBatch]) -> MaterializeOutcome {
        let total: usize = batches.iter().map(|batch| batch.candidates.len()).sum();
        let mut outcome = MaterializeOutcome::default();
        let mut processed = 0usize;
        engine_info!("Downloading {} image(s)", total);

        for batch in batches {
            let _scope = engine_logging::enter_channel(&batch.channel_id);
            for candidate in &batch.candidates {
                let target = batch.target_path(candidate);
                match self.transfer_one(candidate, &target).await {
                    Ok(bytes) => {
                        engine_debug!("Wrote {} bytes to {:?}", bytes, target);
                        outcome.downloaded += 1;
                    }
                    Err(message) => {
                        engine_error!("Download failed for {}: {}", candidate.source_url, message);
                        outcome.failed.push(TransferFailure {
                            identity: candidate.identity().to_string(),
                            message,
                        });
                    }
                }
                processed += 1;
                report(self.sink, Stage::Downloading, DOWNLOAD_LABEL, processed, total);
            }
        }
        self.sink.finish(Stage::Downloading);

        outcome
    }

    async fn transfer_one(&self, candidate: &Candidate, target: &Path) -> Result<u64, String> {
        let timeout = self.settings.transfer_timeout;
        let transfer = self.transfer.fetch_to_file(&candidate.source_url, target);
        match tokio::time::timeout(timeout, transfer).await {
            Ok(Ok(bytes)) => Ok(bytes),
            Ok(Err(err)) => Err(err.to_string()),
            Err(_) => Err(format!("transfer timed out after {timeout:?}")),
        }
    }
}
