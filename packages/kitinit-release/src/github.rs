use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::cursor::PageCursor;
use crate::data::{Release, ReleasePage};
use crate::error::{FetchError, Result};

use kitinit_utils::http::{get, http_status_is_ok, ResponseData};
use kitinit_utils::Uri;

pub const GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_REPOSITORY: &str = "alphagov/govuk-prototype-kit";
pub const DEFAULT_PAGE_SIZE: u32 = 10;

const USER_AGENT: &str = "govuk-prototype-kit-init";

/// Reads releases of one GitHub repository. Nothing is cached; every call is
/// one request.
#[derive(Debug, Clone)]
pub struct ReleaseFetcher {
    api_url: String,
    repository: String,
    token: Option<String>,
}

impl Default for ReleaseFetcher {
    fn default() -> Self {
        Self::new(GITHUB_API_URL, DEFAULT_REPOSITORY)
    }
}

impl ReleaseFetcher {
    pub fn new(api_url: impl Into<String>, repository: impl Into<String>) -> Self {
        let api_url: String = api_url.into();
        ReleaseFetcher {
            api_url: api_url.trim_end_matches('/').to_string(),
            repository: repository.into(),
            token: None,
        }
    }

    /// Blank tokens are ignored.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    fn get_header_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("User-Agent".to_string(), USER_AGENT.to_string());
        map.insert(
            "Accept".to_string(),
            "application/vnd.github+json".to_string(),
        );
        if let Some(token) = &self.token {
            map.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        map
    }

    /// One page of releases, newest first. Pages start at 1; a page past the
    /// end is empty and has no `next` cursor.
    pub async fn list_releases(&self, page: u32) -> Result<ReleasePage> {
        self.list_releases_sized(page, DEFAULT_PAGE_SIZE).await
    }

    pub async fn list_releases_sized(&self, page: u32, page_size: u32) -> Result<ReleasePage> {
        if page == 0 {
            return Err(FetchError::InvalidPage(page));
        }
        let url = format!(
            "{}/repos/{}/releases?per_page={}&page={}",
            self.api_url, self.repository, page_size, page
        );
        let rsp = self.request(&url).await?;
        let items: Vec<Release> = decode(&url, &rsp)?;
        let cursor = PageCursor::from_link_header(rsp.header("link"));
        Ok(ReleasePage { items, cursor })
    }

    /// The newest release, i.e. the first item of page 1.
    pub async fn latest_release(&self) -> Result<Release> {
        let page = self.list_releases(1).await?;
        page.items.into_iter().next().ok_or(FetchError::NoReleases)
    }

    pub async fn get_release_by_tag(&self, tag: &str) -> Result<Release> {
        let url = format!(
            "{}/repos/{}/releases/tags/{}",
            self.api_url,
            self.repository,
            urlencoding::encode(tag)
        );
        match self.request(&url).await {
            Ok(rsp) => decode(&url, &rsp),
            Err(FetchError::Upstream { status: 404, .. }) => {
                Err(FetchError::NotFound(tag.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    async fn request(&self, url: &str) -> Result<ResponseData> {
        debug!("GET {}", url);
        let parsed_url = url.parse::<Uri>().map_err(|e| FetchError::Transport {
            url: url.to_string(),
            source: Box::new(e),
        })?;
        let rsp = get(parsed_url, &self.get_header_map())
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;
        if http_status_is_ok(rsp.status) {
            return Ok(rsp);
        }
        if let Some(message) = rate_limit_message(&rsp) {
            return Err(FetchError::RateLimited(message));
        }
        Err(FetchError::Upstream {
            url: url.to_string(),
            status: rsp.status,
            body: rsp.body_text(),
        })
    }
}

fn decode<T: DeserializeOwned>(url: &str, rsp: &ResponseData) -> Result<T> {
    serde_json::from_slice(&rsp.body).map_err(|source| FetchError::Decode {
        url: url.to_string(),
        source,
    })
}

fn rate_limit_message(rsp: &ResponseData) -> Option<String> {
    if rsp.status != 403 && rsp.status != 429 {
        return None;
    }
    let json = serde_json::from_slice::<Value>(&rsp.body).ok()?;
    let message = json.get("message")?.as_str()?;
    if message.contains("rate limit") {
        Some(message.to_string())
    } else {
        None
    }
}
