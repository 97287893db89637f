pub mod http;
pub mod versioning;

// Re-export main utilities
pub use http::{get, http_get, http_status_is_ok, https_get, BoxError, ResponseData};
pub use hyper::Uri;
pub use versioning::{is_release_tag, tag_version, Version};
