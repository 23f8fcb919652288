use crate::{ChannelConfigError, ChannelPhase};

/// Fewer candidates were accepted than requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortfall {
    pub channel_id: String,
    pub achieved: usize,
    pub requested: usize,
}

impl Shortfall {
    pub fn message(&self) -> String {
        format!(
            "Unable to retrieve all {} images for {} (got {})",
            self.requested, self.channel_id, self.achieved
        )
    }
}

/// A single item that could not be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferFailure {
    pub identity: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelOutcome {
    pub channel_id: String,
    pub phase: ChannelPhase,
    pub selected: usize,
    pub requested: usize,
    /// Set when the channel ended in `SelectionFailed`.
    pub error: Option<String>,
}

/// Result of one complete run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    pub downloaded: usize,
    pub failed: Vec<TransferFailure>,
    pub shortfalls: Vec<Shortfall>,
    pub channels: Vec<ChannelOutcome>,
    pub rejected_configs: Vec<ChannelConfigError>,
}

impl Report {
    pub fn has_problems(&self) -> bool {
        !self.failed.is_empty()
            || !self.shortfalls.is_empty()
            || !self.rejected_configs.is_empty()
            || self.channels.iter().any(|c| c.phase == ChannelPhase::SelectionFailed)
    }

    /// Human-readable lines for everything that went wrong, in run order.
    pub fn problem_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for rejected in &self.rejected_configs {
            lines.push(format!("Skipped {rejected}"));
        }
        for channel in &self.channels {
            if channel.phase == ChannelPhase::SelectionFailed {
                let reason = channel.error.as_deref().unwrap_or("unknown error");
                lines.push(format!("Selection failed for {}: {reason}", channel.channel_id));
            }
        }
        lines.extend(self.shortfalls.iter().map(Shortfall::message));
        if !self.failed.is_empty() {
            lines.push("Error(s) has occurred while downloading images.".to_string());
            lines.extend(
                self.failed
                    .iter()
                    .map(|failure| format!("{}: {}", failure.identity, failure.message)),
            );
        }
        lines
    }
}
