//! The persisted user record.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ConfigError;

/// Configuration of the single signed-in user.
///
/// Serialized with camelCase keys (`githubUsername`, `credential`,
/// `apiBaseUrl`). Keys this version does not know about are kept in
/// [`extra`](Self::extra) and written back unchanged, so hand edits to the
/// file survive a save.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConfig {
    /// Login whose pull requests and issues are listed.
    pub github_username: String,

    /// Personal access token. Empty means unauthenticated requests.
    #[serde(default, alias = "token")]
    pub credential: String,

    /// Alternative API root, e.g. a GitHub Enterprise `https://host/api/v3`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserConfig {
    pub fn new(github_username: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            github_username: github_username.into(),
            credential: credential.into(),
            api_base_url: None,
            extra: Map::new(),
        }
    }

    /// Checks the fields the app relies on.
    ///
    /// The username ends up inside a search qualifier (`author:<name>`), so
    /// it must be non-empty and contain no whitespace.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.github_username.as_str();
        if name.is_empty() {
            return Err(ConfigError::Invalid("githubUsername is empty".into()));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid(format!(
                "githubUsername contains whitespace: {name:?}"
            )));
        }
        if let Some(url) = &self.api_base_url {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(ConfigError::Invalid(format!(
                    "apiBaseUrl must be an http(s) URL: {url:?}"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for UserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let credential = if self.credential.is_empty() {
            "<none>"
        } else {
            "<redacted>"
        };
        f.debug_struct("UserConfig")
            .field("github_username", &self.github_username)
            .field("credential", &credential)
            .field("api_base_url", &self.api_base_url)
            .field("extra_keys", &self.extra.len())
            .finish()
    }
}
