use crate::error::Error;
use anyhow::Context;
use regex::Regex;
use reqwest::Client;
use serde::Serialize;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

static DRIVE_FILE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://drive\.google\.com/file/d/([a-zA-Z0-9_-]+)/").expect("valid pattern")
});

/// First Drive file identifier mentioned in `text`, if any.
pub fn extract_file_id(text: &str) -> Option<&str> {
    DRIVE_FILE_LINK
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str())
}

pub fn is_valid_file_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioLinks {
    pub file_id: String,
    pub download_url: String,
    pub preview_url: String,
    pub view_url: String,
}

/// Builds links to Drive-hosted audio and fetches it for download.
#[derive(Clone)]
pub struct DriveClient {
    http: Client,
    base_url: String,
}

impl DriveClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create Drive HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn links(&self, file_id: &str) -> AudioLinks {
        let base = &self.base_url;
        AudioLinks {
            file_id: file_id.to_owned(),
            download_url: format!("{base}/uc?export=download&id={file_id}"),
            preview_url: format!("{base}/file/d/{file_id}/preview"),
            view_url: format!("{base}/file/d/{file_id}/view"),
        }
    }

    /// Audio links for the first Drive file mentioned in `result`.
    pub fn links_in(&self, result: &str) -> Option<AudioLinks> {
        extract_file_id(result).map(|id| self.links(id))
    }

    pub async fn fetch_audio(&self, file_id: &str) -> Result<Vec<u8>, Error> {
        if !is_valid_file_id(file_id) {
            return Err(Error::InvalidFileId);
        }

        let url = self.links(file_id).download_url;
        debug!("Fetching audio from {url}");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamStatus(status.as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
