//! Release listing for the GOV.UK Prototype Kit, read from the GitHub REST API.

pub mod cursor;
pub mod data;
pub mod error;
pub mod github;

// Re-export common types
pub use cursor::PageCursor;
pub use data::{Release, ReleasePage};
pub use error::FetchError;
pub use github::{ReleaseFetcher, DEFAULT_PAGE_SIZE, DEFAULT_REPOSITORY, GITHUB_API_URL};
