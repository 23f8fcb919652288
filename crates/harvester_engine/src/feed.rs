use std::collections::VecDeque;

use futures_util::stream::{self, BoxStream, StreamExt};
use harvester_core::{FeedItem, FeedMode};
use serde::Deserialize;

use crate::fetch::{check_status, map_reqwest_error, parse_url};
use crate::{FailureKind, FetchError};

pub const DEFAULT_SCAN_LIMIT: usize = 1000;
pub const DEFAULT_FEED_BASE_URL: &str = "https://www.reddit.com";
/// Largest page the listing endpoint hands out.
const PAGE_SIZE: usize = 100;

/// Source of ranked items for a channel. The returned stream is lazy,
/// finite and yields at most `scan_limit` items.
pub trait FeedSource: Send + Sync {
    fn list_items<'a>(
        &'a self,
        channel_id: &'a str,
        mode: FeedMode,
        scan_limit: usize,
    ) -> BoxStream<'a, Result<FeedItem, FetchError>>;
}

/// Reads subreddit listings through the public JSON endpoints.
#[derive(Debug, Clone)]
pub struct RedditFeed {
    client: reqwest::Client,
    base_url: String,
}

impl RedditFeed {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, DEFAULT_FEED_BASE_URL)
    }

    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn page_url(
        &self,
        channel_id: &str,
        mode: FeedMode,
        limit: usize,
        after: Option<&str>,
    ) -> Result<reqwest::Url, FetchError> {
        let mut url = parse_url(&format!("{}/r/{}/{}.json", self.base_url, channel_id, mode))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &limit.to_string());
            query.append_pair("raw_json", "1");
            if mode.wants_all_time_window() {
                query.append_pair("t", "all");
            }
            if let Some(after) = after {
                query.append_pair("after", after);
            }
        }
        Ok(url)
    }

    async fn fetch_page(
        &self,
        channel_id: &str,
        mode: FeedMode,
        limit: usize,
        after: Option<&str>,
    ) -> Result<ListingPage, FetchError> {
        let url = self.page_url(channel_id, mode, limit, after)?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        check_status(&response)?;
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        let listing: Listing = serde_json::from_slice(&body)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
        Ok(listing.into_page())
    }
}

impl FeedSource for RedditFeed {
    fn list_items<'a>(
        &'a self,
        channel_id: &'a str,
        mode: FeedMode,
        scan_limit: usize,
    ) -> BoxStream<'a, Result<FeedItem, FetchError>> {
        let state = PageCursor {
            buffered: VecDeque::new(),
            after: None,
            remaining: scan_limit,
            exhausted: scan_limit == 0,
        };

        stream::unfold(state, move |mut cursor| async move {
            if cursor.remaining == 0 {
                return None;
            }
            if cursor.buffered.is_empty() {
                if cursor.exhausted {
                    return None;
                }
                let limit = cursor.remaining.min(PAGE_SIZE);
                match self
                    .fetch_page(channel_id, mode, limit, cursor.after.as_deref())
                    .await
                {
                    Ok(page) => {
                        cursor.exhausted = page.after.is_none() || page.items.is_empty();
                        cursor.after = page.after;
                        cursor.buffered.extend(page.items);
                    }
                    Err(err) => {
                        cursor.exhausted = true;
                        cursor.remaining = 0;
                        return Some((Err(err), cursor));
                    }
                }
            }
            let item = cursor.buffered.pop_front()?;
            cursor.remaining -= 1;
            Some((Ok(item), cursor))
        })
        .boxed()
    }
}

struct PageCursor {
    buffered: VecDeque<FeedItem>,
    after: Option<String>,
    remaining: usize,
    exhausted: bool,
}

struct ListingPage {
    items: Vec<FeedItem>,
    after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    after: Option<String>,
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: Submission,
}

#[derive(Debug, Deserialize)]
struct Submission {
    #[serde(default)]
    title: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    upvote_ratio: f64,
    #[serde(default)]
    url: String,
    #[serde(default)]
    created_utc: f64,
}

impl Listing {
    fn into_page(self) -> ListingPage {
        let items = self
            .data
            .children
            .into_iter()
            .map(|child| {
                let submission = child.data;
                FeedItem {
                    title: submission.title,
                    score: submission.score,
                    approval_ratio: submission.upvote_ratio,
                    source_url: submission.url,
                    created_utc: submission.created_utc as i64,
                }
            })
            .collect();
        ListingPage {
            items,
            after: self.data.after,
        }
    }
}
