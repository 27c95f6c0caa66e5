//! One-shot first-run submission.
//!
//! The setup page sends the entered config once; [`SetupGate`] parses it,
//! validates it, and persists it through a [`ConfigStore`]. After the first
//! successful save every further submission in the same run is ignored.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::{ConfigError, ConfigStore, UserConfig};

/// Errors from a setup submission. None of them consume the gate.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("invalid setup payload: {0}")]
    Payload(#[source] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Guards the single accepted setup submission.
#[derive(Debug, Default)]
pub struct SetupGate {
    consumed: AtomicBool,
}

impl SetupGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a submission has already been saved.
    pub fn is_consumed(&self) -> bool {
        self.consumed.load(Ordering::Acquire)
    }

    /// Handles one raw JSON submission.
    ///
    /// Returns `Ok(Some(config))` for the submission that was saved,
    /// `Ok(None)` when the gate was already consumed. A malformed payload,
    /// a validation failure or a failed save leaves the gate open.
    pub fn submit(
        &self,
        store: &mut ConfigStore,
        payload: &str,
    ) -> Result<Option<UserConfig>, SetupError> {
        if self.is_consumed() {
            return Ok(None);
        }

        let config: UserConfig = serde_json::from_str(payload).map_err(SetupError::Payload)?;
        config.validate()?;

        if self
            .consumed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(None);
        }

        if let Err(e) = store.save(config.clone()) {
            self.consumed.store(false, Ordering::Release);
            return Err(e.into());
        }

        tracing::info!(user = %config.github_username, "setup complete");
        Ok(Some(config))
    }
}
