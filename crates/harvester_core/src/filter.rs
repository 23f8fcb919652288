use crate::{ChannelConfig, FeedItem, PatternPair};

/// Substring every accepted resource kind must contain.
pub const EXPECTED_RESOURCE_FAMILY: &str = "image";

/// Why an item was turned away before or during probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    BelowScore,
    BelowApprovalRatio,
    NoPatternMatch,
    MissingContentType,
    UnexpectedContentType,
    ProbeFailed,
}

/// True iff any pair has both members present in `title`.
pub fn has_pattern_match(patterns: &[PatternPair], title: &str) -> bool {
    patterns.iter().any(|pair| pair.matches(title))
}

/// Applies the score, ratio and title filters; probing happens afterwards.
pub fn screen_item(config: &ChannelConfig, item: &FeedItem) -> Result<(), Rejection> {
    if item.score < config.min_score() {
        return Err(Rejection::BelowScore);
    }
    if item.approval_ratio < config.min_approval_ratio() {
        return Err(Rejection::BelowApprovalRatio);
    }
    if !config.accept_any_pattern()
        && !has_pattern_match(config.required_patterns(), &item.title)
    {
        return Err(Rejection::NoPatternMatch);
    }
    Ok(())
}

/// Checks the probed content type against the expected family.
pub fn check_resource_kind(content_type: Option<&str>) -> Result<&str, Rejection> {
    match content_type {
        None => Err(Rejection::MissingContentType),
        Some(kind) if kind.contains(EXPECTED_RESOURCE_FAMILY) => Ok(kind),
        Some(_) => Err(Rejection::UnexpectedContentType),
    }
}
