use chrono::{DateTime, Utc};
use markdown::Options;
use serde::{Deserialize, Serialize};

use crate::cursor::PageCursor;

/// One GitHub release. Only the fields the wizard shows are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    #[serde(rename = "tag_name")]
    pub tag: String,
    pub created_at: DateTime<Utc>,
    pub html_url: String,
    #[serde(default)]
    pub body: Option<String>,
}

impl Release {
    /// Calendar date the release was created, e.g. `2023-01-30`.
    pub fn released_on(&self) -> String {
        self.created_at.format("%Y-%m-%d").to_string()
    }

    /// Release notes as HTML. Raw HTML inside the notes is escaped, not
    /// passed through.
    pub fn notes_html(&self) -> String {
        let body = self.body.as_deref().unwrap_or_default();
        markdown::to_html_with_options(body, &Options::gfm())
            .unwrap_or_else(|_| markdown::to_html(body))
    }
}

/// A page of releases together with the cursors around it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleasePage {
    pub items: Vec<Release>,
    pub cursor: PageCursor,
}

impl ReleasePage {
    pub fn has_next(&self) -> bool {
        self.cursor.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.cursor.previous.is_some()
    }

    pub fn first(&self) -> Option<&Release> {
        self.items.first()
    }
}
