use std::fmt;

use serde::{Deserialize, Serialize};

use pulltray_github::SearchKind;

/// The two panels, one per tray icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelKind {
    Pulls,
    Issues,
}

impl PanelKind {
    pub const ALL: [PanelKind; 2] = [PanelKind::Pulls, PanelKind::Issues];

    /// Window label and tray icon id.
    pub fn label(self) -> &'static str {
        match self {
            PanelKind::Pulls => "pulls",
            PanelKind::Issues => "issues",
        }
    }

    /// Event name the item list is pushed on.
    pub fn channel(self) -> &'static str {
        match self {
            PanelKind::Pulls => "pull-requests",
            PanelKind::Issues => "user-issues",
        }
    }

    /// Tooltip and window title.
    pub fn title(self) -> &'static str {
        match self {
            PanelKind::Pulls => "Pull Requests",
            PanelKind::Issues => "Issues",
        }
    }

    /// Page loaded into the panel window.
    pub fn page(self) -> &'static str {
        match self {
            PanelKind::Pulls => "pulls.html",
            PanelKind::Issues => "issues.html",
        }
    }

    pub fn search_kind(self) -> SearchKind {
        match self {
            PanelKind::Pulls => SearchKind::PullRequest,
            PanelKind::Issues => SearchKind::Issue,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.label() == label)
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
