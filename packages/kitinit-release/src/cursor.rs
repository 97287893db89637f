use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

static LINK_ENTRY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^<([^>]+)>;\s*rel="([^"]+)"$"#).unwrap());

/// The `next`/`prev` links of a paginated GitHub list, parsed from the
/// `Link` response header. `next` points at older releases.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageCursor {
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl PageCursor {
    pub fn from_link_header(header: Option<&str>) -> Self {
        let mut cursor = PageCursor::default();
        let Some(header) = header else {
            return cursor;
        };
        for entry in header.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let Some(captures) = LINK_ENTRY_REGEX.captures(entry) else {
                warn!("no matches found for link [{}]", entry);
                continue;
            };
            let url = captures[1].to_string();
            for rel in captures[2].split_whitespace() {
                match rel {
                    "next" => cursor.next = Some(url.clone()),
                    "prev" | "previous" => cursor.previous = Some(url.clone()),
                    _ => {}
                }
            }
        }
        cursor
    }
}
