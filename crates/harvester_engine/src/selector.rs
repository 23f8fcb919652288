use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use futures_util::StreamExt;
use harvester_core::{
    check_resource_kind, screen_item, Candidate, ChannelConfig, FeedItem, Rejection, Shortfall,
};

use crate::feed::{FeedSource, DEFAULT_SCAN_LIMIT};
use crate::fetch::ResourceProbe;
use crate::progress::{report, ProgressSink};
use crate::{SelectionError, Stage};

/// Limits shared by both pipeline stages.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub scan_limit: usize,
    pub probe_timeout: Duration,
    pub transfer_timeout: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            scan_limit: DEFAULT_SCAN_LIMIT,
            probe_timeout: Duration::from_secs(15),
            transfer_timeout: Duration::from_secs(120),
        }
    }
}

/// Accepted candidates for one channel, in feed order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    pub candidates: Vec<Candidate>,
    pub examined: usize,
    pub shortfall: Option<Shortfall>,
}

pub struct CandidateSelector<'a> {
    feed: &'a dyn FeedSource,
    probe: &'a dyn ResourceProbe,
    sink: &'a dyn ProgressSink,
    settings: &'a PipelineSettings,
}

impl<'a> CandidateSelector<'a> {
    pub fn new(
        feed: &'a dyn FeedSource,
        probe: &'a dyn ResourceProbe,
        sink: &'a dyn ProgressSink,
        settings: &'a PipelineSettings,
    ) -> Self {
        Self {
            feed,
            probe,
            sink,
            settings,
        }
    }

    /// Walks the channel feed until `target_count` items are accepted or the
    /// feed runs dry. Fails only when the feed errors before its first item.
    pub async fn select(&self, config: &ChannelConfig) -> Result<Selection, SelectionError> {
        let target = config.target_count();
        if target == 0 {
            return Ok(Selection::default());
        }

        let channel_id = config.channel_id();
        let _scope = engine_logging::enter_channel(channel_id);
        let label = format!("{channel_id} progress:");
        engine_info!(
            "Selecting up to {} items from {} ({})",
            target,
            channel_id,
            config.feed_mode()
        );

        let mut items = self
            .feed
            .list_items(channel_id, config.feed_mode(), self.settings.scan_limit);
        let mut candidates = Vec::new();
        let mut examined = 0usize;

        while candidates.len() < target && examined < self.settings.scan_limit {
            let item = match items.next().await {
                None => break,
                Some(Ok(item)) => item,
                Some(Err(err)) if examined == 0 => return Err(SelectionError::Feed(err)),
                Some(Err(err)) => {
                    engine_warn!("Feed ended early: {}", err);
                    break;
                }
            };
            examined += 1;

            match self.evaluate(config, &item).await {
                Ok(resource_kind) => candidates.push(Candidate::from_item(item, resource_kind)),
                Err(rejection) => {
                    engine_debug!("Skipped {:?} ({:?})", item.title, rejection);
                }
            }
            report(self.sink, Stage::Selecting, &label, candidates.len(), target);
        }

        self.sink.finish(Stage::Selecting);

        let shortfall = (candidates.len() < target).then(|| Shortfall {
            channel_id: channel_id.to_string(),
            achieved: candidates.len(),
            requested: target,
        });
        if let Some(shortfall) = &shortfall {
            engine_warn!("{}", shortfall.message());
        }

        Ok(Selection {
            candidates,
            examined,
            shortfall,
        })
    }

    async fn evaluate(&self, config: &ChannelConfig, item: &FeedItem) -> Result<String, Rejection> {
        screen_item(config, item)?;

        let probed = tokio::time::timeout(
            self.settings.probe_timeout,
            self.probe.probe_headers(&item.source_url),
        )
        .await;
        let content_type = match probed {
            Ok(Ok(content_type)) => content_type,
            Ok(Err(err)) => {
                engine_debug!("Probe failed for {}: {}", item.source_url, err);
                return Err(Rejection::ProbeFailed);
            }
            Err(_) => {
                engine_debug!(
                    "Probe for {} timed out after {:?}",
                    item.source_url,
                    self.settings.probe_timeout
                );
                return Err(Rejection::ProbeFailed);
            }
        };

        check_resource_kind(content_type.as_deref()).map(str::to_string)
    }
}
