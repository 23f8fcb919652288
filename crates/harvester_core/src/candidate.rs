use crate::slug::slugify;

/// Stem used when a title slugifies to nothing.
pub const FALLBACK_STEM: &str = "untitled";

/// Longest stem kept, in bytes; leaves room for the extension under the
/// usual 255 byte file name limit.
pub const MAX_STEM_BYTES: usize = 200;

/// One entry yielded by a channel feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub title: String,
    pub score: i64,
    pub approval_ratio: f64,
    pub source_url: String,
    pub created_utc: i64,
}

/// An item that passed every filter and the resource probe.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub title: String,
    pub source_url: String,
    pub score: i64,
    pub approval_ratio: f64,
    pub resource_kind: String,
}

impl Candidate {
    pub fn from_item(item: FeedItem, resource_kind: impl Into<String>) -> Self {
        Self {
            title: item.title,
            source_url: item.source_url,
            score: item.score,
            approval_ratio: item.approval_ratio,
            resource_kind: resource_kind.into(),
        }
    }

    /// Title when present, otherwise the source url.
    pub fn identity(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.source_url
        } else {
            &self.title
        }
    }

    /// Subtype of the resource kind: `image/jpeg; q=1` gives `jpeg`.
    pub fn extension(&self) -> &str {
        let essence = self.resource_kind.split(';').next().unwrap_or_default().trim();
        essence.rsplit('/').next().unwrap_or(essence).trim()
    }

    /// `{slug(title)}.{extension}`, with the slug cut to [`MAX_STEM_BYTES`].
    pub fn file_name(&self) -> String {
        let slug = slugify(&self.title);
        let stem = truncate_stem(&slug);
        let stem = if stem.is_empty() { FALLBACK_STEM } else { stem };
        format!("{stem}.{}", self.extension())
    }
}

fn truncate_stem(slug: &str) -> &str {
    if slug.len() <= MAX_STEM_BYTES {
        return slug;
    }
    let mut end = MAX_STEM_BYTES;
    while !slug.is_char_boundary(end) {
        end -= 1;
    }
    slug[..end].trim_end_matches('-')
}
