//! Shared application state, managed by Tauri.

use std::sync::{Arc, PoisonError, RwLock};

use anyhow::Context;

use pulltray_config::UserConfig;
use pulltray_github::Client;
use pulltray_panel::{Activation, Anchor, Panel, PanelError, PanelHost, PanelKind};

use crate::windows::WindowHost;

/// The loaded configuration and the client built from it.
#[derive(Debug)]
pub struct Session {
    pub config: UserConfig,
    pub client: Client,
}

impl Session {
    pub fn new(config: UserConfig) -> Result<Self, pulltray_github::Error> {
        let client = Client::from_config(&config)?;
        Ok(Self { config, client })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ActivateError {
    #[error("no user configuration loaded")]
    NotConfigured,

    #[error(transparent)]
    Panel(#[from] PanelError),
}

pub struct AppState<H: PanelHost = WindowHost> {
    session: RwLock<Option<Arc<Session>>>,
    pulls: Panel<H>,
    issues: Panel<H>,
}

impl<H: PanelHost> AppState<H> {
    pub fn new(pulls_host: H, issues_host: H) -> Self {
        Self {
            session: RwLock::new(None),
            pulls: Panel::new(PanelKind::Pulls, pulls_host),
            issues: Panel::new(PanelKind::Issues, issues_host),
        }
    }

    /// Installs `config` as the active session.
    pub fn configure(&self, config: UserConfig) -> anyhow::Result<()> {
        let session = Session::new(config).context("failed to build GitHub client")?;
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(session));
        Ok(())
    }

    pub fn session(&self) -> Option<Arc<Session>> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn panel(&self, kind: PanelKind) -> &Panel<H> {
        match kind {
            PanelKind::Pulls => &self.pulls,
            PanelKind::Issues => &self.issues,
        }
    }

    /// Tray click: fetch the panel's list for the configured user and show it.
    pub async fn activate(
        &self,
        kind: PanelKind,
        anchor: Option<Anchor>,
    ) -> Result<Activation, ActivateError> {
        let session = self.session().ok_or(ActivateError::NotConfigured)?;
        let outcome = self
            .panel(kind)
            .activate(anchor, || {
                session
                    .client
                    .search(kind.search_kind(), &session.config.github_username)
            })
            .await?;
        Ok(outcome)
    }
}
