use once_cell::sync::Lazy;
use regex::Regex;

static VERSION_NUMBER_MATCH_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(\.\d+)*([.\-+_]?[A-Za-z0-9]+)*$").unwrap());

#[derive(Debug, Clone)]
pub struct Version {
    string: String,
}

impl Version {
    pub fn new(string: String) -> Self {
        Version { string }
    }

    /// Accepts only strings that are a version number from start to end.
    pub fn is_valid(&self) -> bool {
        VERSION_NUMBER_MATCH_REGEX.is_match(&self.string)
            && version_compare::Version::from(self.string.as_str()).is_some()
    }
}

/// Release tags look like `v13.1.0` or `v13.0.0-beta.1`.
pub fn is_release_tag(tag: &str) -> bool {
    match tag.strip_prefix('v') {
        Some(rest) => {
            rest.starts_with(|c: char| c.is_ascii_digit())
                && Version::new(rest.to_string()).is_valid()
        }
        None => false,
    }
}

/// The version number carried by a release tag, without the leading `v`.
pub fn tag_version(tag: &str) -> &str {
    tag.strip_prefix('v').unwrap_or(tag)
}
