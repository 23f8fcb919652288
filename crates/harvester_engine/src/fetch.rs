use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;

use crate::persist::{AtomicFileWriter, PersistError};
use crate::{FailureKind, FetchError, TransferError};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
            redirect_limit: 5,
            max_bytes: 50 * 1024 * 1024,
            user_agent: "harvester/0.1 (image downloader)".to_string(),
        }
    }
}

/// Header-only lookup of a resource's content type.
#[async_trait::async_trait]
pub trait ResourceProbe: Send + Sync {
    async fn probe_headers(&self, url: &str) -> Result<Option<String>, FetchError>;
}

/// Downloads a resource into a file, replacing whatever was there.
#[async_trait::async_trait]
pub trait Transfer: Send + Sync {
    async fn fetch_to_file(&self, url: &str, path: &Path) -> Result<u64, TransferError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = build_client(&settings)?;
        Ok(Self { settings, client })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

pub(crate) fn build_client(settings: &FetchSettings) -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
        .user_agent(settings.user_agent.clone())
        .build()
        .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
}

pub(crate) fn parse_url(url: &str) -> Result<reqwest::Url, FetchError> {
    reqwest::Url::parse(url)
        .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
}

pub(crate) fn check_status(response: &reqwest::Response) -> Result<(), FetchError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(FetchError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ))
    }
}

#[async_trait::async_trait]
impl ResourceProbe for ReqwestFetcher {
    async fn probe_headers(&self, url: &str) -> Result<Option<String>, FetchError> {
        let response = self
            .client
            .head(parse_url(url)?)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(&response)?;

        Ok(response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string()))
    }
}

#[async_trait::async_trait]
impl Transfer for ReqwestFetcher {
    async fn fetch_to_file(&self, url: &str, path: &Path) -> Result<u64, TransferError> {
        let response = self
            .client
            .get(parse_url(url)?)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(&response)?;

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, content_len).into());
            }
        }

        let (dir, filename) = split_target(path)?;
        let mut pending = AtomicFileWriter::new(dir.to_path_buf()).begin(filename)?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = pending.written() + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len).into());
            }
            pending.append(&chunk)?;
        }

        let written = pending.written();
        pending.commit()?;
        Ok(written)
    }
}

fn split_target(path: &Path) -> Result<(&Path, &str), PersistError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| PersistError::OutputDir(format!("bad target path {path:?}")))?;
    Ok((dir, filename))
}

fn too_large(max_bytes: u64, actual: u64) -> FetchError {
    FetchError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
