#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use futures_util::stream::{self, BoxStream, StreamExt};
use harvester_core::{FeedItem, FeedMode};
use harvester_engine::{
    FailureKind, FetchError, FeedSource, ProgressEvent, ProgressSink, ResourceProbe, Stage,
    Transfer, TransferError,
};

pub fn item(title: &str, url: &str, score: i64, ratio: f64) -> FeedItem {
    FeedItem {
        title: title.to_string(),
        score,
        approval_ratio: ratio,
        source_url: url.to_string(),
        created_utc: 1_700_000_000,
    }
}

/// Image item that clears the default thresholds.
pub fn image(title: &str) -> FeedItem {
    let url = format!("https://i.example.com/{}.png", title.replace(' ', "_"));
    item(title, &url, 100, 0.95)
}

#[derive(Default)]
pub struct FakeFeed {
    entries: HashMap<String, Vec<Result<FeedItem, FetchError>>>,
    pub requests: Mutex<Vec<(String, FeedMode, usize)>>,
}

impl FakeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(mut self, channel_id: &str, items: Vec<FeedItem>) -> Self {
        self.entries
            .insert(channel_id.to_string(), items.into_iter().map(Ok).collect());
        self
    }

    pub fn with_results(
        mut self,
        channel_id: &str,
        results: Vec<Result<FeedItem, FetchError>>,
    ) -> Self {
        self.entries.insert(channel_id.to_string(), results);
        self
    }
}

impl FeedSource for FakeFeed {
    fn list_items<'a>(
        &'a self,
        channel_id: &'a str,
        mode: FeedMode,
        scan_limit: usize,
    ) -> BoxStream<'a, Result<FeedItem, FetchError>> {
        self.requests
            .lock()
            .unwrap()
            .push((channel_id.to_string(), mode, scan_limit));
        let results = match self.entries.get(channel_id) {
            Some(results) => results.clone(),
            None => vec![Err(FetchError::new(FailureKind::HttpStatus(404), "404 Not Found"))],
        };
        stream::iter(results.into_iter().take(scan_limit)).boxed()
    }
}

/// Answers `image/png` for every url unless told otherwise.
#[derive(Default)]
pub struct FakeProbe {
    overrides: HashMap<String, Option<String>>,
    failing: HashSet<String>,
    hanging: HashSet<String>,
    pub probed: Mutex<Vec<String>>,
}

impl FakeProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content_type(mut self, url: &str, content_type: Option<&str>) -> Self {
        self.overrides
            .insert(url.to_string(), content_type.map(str::to_string));
        self
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub fn hanging(mut self, url: &str) -> Self {
        self.hanging.insert(url.to_string());
        self
    }

    pub fn probed(&self) -> Vec<String> {
        self.probed.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ResourceProbe for FakeProbe {
    async fn probe_headers(&self, url: &str) -> Result<Option<String>, FetchError> {
        self.probed.lock().unwrap().push(url.to_string());
        if self.hanging.contains(url) {
            std::future::pending::<()>().await;
        }
        if self.failing.contains(url) {
            return Err(FetchError::new(FailureKind::Network, "connection reset"));
        }
        Ok(self
            .overrides
            .get(url)
            .cloned()
            .unwrap_or_else(|| Some("image/png".to_string())))
    }
}

/// Writes the url as the file body; listed urls fail with a 404 or never finish.
#[derive(Default)]
pub struct FakeTransfer {
    failing: HashSet<String>,
    hanging: HashSet<String>,
    pub written: Mutex<Vec<(String, PathBuf)>>,
}

impl FakeTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub fn hanging(mut self, url: &str) -> Self {
        self.hanging.insert(url.to_string());
        self
    }

    pub fn written(&self) -> Vec<(String, PathBuf)> {
        self.written.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transfer for FakeTransfer {
    async fn fetch_to_file(&self, url: &str, path: &Path) -> Result<u64, TransferError> {
        if self.hanging.contains(url) {
            std::future::pending::<()>().await;
        }
        if self.failing.contains(url) {
            return Err(FetchError::new(FailureKind::HttpStatus(404), "404 Not Found").into());
        }
        std::fs::write(path, url.as_bytes()).map_err(harvester_engine::PersistError::from)?;
        self.written
            .lock()
            .unwrap()
            .push((url.to_string(), path.to_path_buf()));
        Ok(url.len() as u64)
    }
}

#[derive(Default, Clone)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
    finished: Arc<Mutex<Vec<Stage>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }

    pub fn finished(&self) -> Vec<Stage> {
        self.finished.lock().unwrap().clone()
    }

    pub fn ticks(&self, stage: Stage) -> Vec<(usize, usize)> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.stage == stage)
            .map(|event| (event.current, event.total))
            .collect()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }

    fn finish(&self, stage: Stage) {
        self.finished.lock().unwrap().push(stage);
    }
}
