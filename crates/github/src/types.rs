//! Search query and response types.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One pull request or issue as returned by the search API.
///
/// The app never looks inside; the panel page renders whatever fields it
/// wants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(pub Value);

/// Body of a `/search/issues` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    pub items: Vec<Item>,
}

/// Which kind of search result to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKind {
    PullRequest,
    Issue,
}

impl SearchKind {
    /// Value of the `type:` search qualifier.
    pub fn qualifier(self) -> &'static str {
        match self {
            SearchKind::PullRequest => "pr",
            SearchKind::Issue => "issue",
        }
    }

    /// Builds the `q` parameter for open items authored by `username`.
    pub fn query(self, username: &str) -> String {
        format!("type:{} is:open author:{username}", self.qualifier())
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SearchKind::PullRequest => "pull requests",
            SearchKind::Issue => "issues",
        })
    }
}
