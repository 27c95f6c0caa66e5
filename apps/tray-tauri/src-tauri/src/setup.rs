//! First-run setup window.
//!
//! The page emits `setup-complete` with the entered fields. The first valid
//! submission is saved, launch at login is registered and the app relaunches
//! into tray mode. A rejected submission is reported back to the page on
//! `setup-rejected` so the user can correct it. Submissions after a
//! successful save are ignored.

use std::sync::{Mutex, PoisonError};

use tauri::{AppHandle, Emitter, EventTarget, Listener, WebviewUrl, WebviewWindowBuilder};

use pulltray_config::{ConfigStore, SetupGate, UserConfig};

use crate::autolaunch;

pub const SETUP_LABEL: &str = "setup";
pub const SETUP_COMPLETE: &str = "setup-complete";
pub const SETUP_REJECTED: &str = "setup-rejected";

/// Outcome of one submission from the setup page.
#[derive(Debug)]
pub enum Submission {
    Saved(UserConfig),
    /// A submission was already saved in this run.
    Ignored,
    /// Not saved; the message is shown on the page.
    Rejected(String),
}

/// The gate and the store it writes to, shared by every submission.
pub struct SetupSession {
    gate: SetupGate,
    store: Mutex<ConfigStore>,
}

impl SetupSession {
    pub fn new(store: ConfigStore) -> Self {
        Self {
            gate: SetupGate::new(),
            store: Mutex::new(store),
        }
    }

    pub fn submit(&self, payload: &str) -> Submission {
        let result = {
            let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
            self.gate.submit(&mut store, payload)
        };

        match result {
            Ok(Some(config)) => Submission::Saved(config),
            Ok(None) => {
                tracing::debug!("ignoring repeated setup submission");
                Submission::Ignored
            }
            Err(e) => {
                tracing::error!("setup submission rejected: {e}");
                Submission::Rejected(e.to_string())
            }
        }
    }
}

pub fn show(app: &AppHandle, store: ConfigStore) -> tauri::Result<()> {
    WebviewWindowBuilder::new(app, SETUP_LABEL, WebviewUrl::App("setup.html".into()))
        .title("PullTray Setup")
        .inner_size(400.0, 300.0)
        .resizable(false)
        .center()
        .build()?;

    let session = SetupSession::new(store);
    let handle = app.clone();

    app.listen(SETUP_COMPLETE, move |event| match session.submit(event.payload()) {
        Submission::Saved(config) => complete(&handle, config),
        Submission::Ignored => {}
        Submission::Rejected(reason) => {
            let target = EventTarget::webview_window(SETUP_LABEL);
            if let Err(e) = handle.emit_to(target, SETUP_REJECTED, reason) {
                tracing::warn!("failed to report setup rejection: {e}");
            }
        }
    });

    Ok(())
}

fn complete(app: &AppHandle, config: UserConfig) {
    tracing::info!(user = %config.github_username, "configuration saved");
    autolaunch::enable(app);

    tracing::info!("relaunching in tray mode");
    app.restart();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_in(dir: &tempfile::TempDir) -> SetupSession {
        SetupSession::new(ConfigStore::in_dir(dir.path()))
    }

    #[test]
    fn rejected_submission_can_be_corrected() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(&dir);

        let first = session.submit(r#"{"githubUsername":"al ice","credential":"tok"}"#);
        match first {
            Submission::Rejected(reason) => assert!(reason.contains("whitespace"), "{reason}"),
            other => panic!("expected rejection, got {other:?}"),
        }
        assert!(ConfigStore::in_dir(dir.path()).load().unwrap().is_none());

        let second = session.submit(r#"{"githubUsername":"alice","credential":"tok"}"#);
        assert!(matches!(&second, Submission::Saved(c) if c.github_username == "alice"));

        let loaded = ConfigStore::in_dir(dir.path()).load().unwrap().unwrap();
        assert_eq!(loaded.github_username, "alice");
        assert_eq!(loaded.credential, "tok");
    }

    #[test]
    fn malformed_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(&dir);

        assert!(matches!(session.submit("{not json"), Submission::Rejected(_)));
        assert!(matches!(
            session.submit(r#"{"githubUsername":"alice","credential":""}"#),
            Submission::Saved(_)
        ));
    }

    #[test]
    fn submissions_after_save_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(&dir);

        session.submit(r#"{"githubUsername":"alice","credential":"tok"}"#);
        let again = session.submit(r#"{"githubUsername":"bob","credential":"x"}"#);
        assert!(matches!(again, Submission::Ignored));

        let loaded = ConfigStore::in_dir(dir.path()).load().unwrap().unwrap();
        assert_eq!(loaded.github_username, "alice");
    }
}
