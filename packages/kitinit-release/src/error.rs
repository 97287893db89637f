use kitinit_utils::BoxError;
use thiserror::Error;

/// Failures talking to the release API.
#[derive(Debug, Error)]
pub enum FetchError {
    /// GitHub refused the request because of its rate limit. The message is
    /// GitHub's own and often says how to get a higher limit.
    #[error("{0}")]
    RateLimited(String),

    #[error("release {0} was not found")]
    NotFound(String),

    #[error("non 200 status code {status} from {url}: {body}")]
    Upstream {
        url: String,
        status: u16,
        body: String,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no releases have been published")]
    NoReleases,

    #[error("page {0} does not exist, pages start at 1")]
    InvalidPage(u32),
}

pub type Result<T> = std::result::Result<T, FetchError>;

impl FetchError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FetchError::RateLimited(_))
    }
}
