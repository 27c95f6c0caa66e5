//! Launch-at-login registration.
//!
//! Registration is a convenience: [`enable`] never fails the caller. It
//! checks the current status first and only registers when disabled, so it
//! can run on every setup without side effects.
//!
//! The OS mechanism sits behind [`LaunchRegistry`]; the desktop app plugs in
//! the Tauri autostart plugin.

use std::fmt;

/// Access to the OS launch-at-login setting for this executable.
pub trait LaunchRegistry {
    type Error: fmt::Display;

    fn is_enabled(&self) -> Result<bool, Self::Error>;

    fn enable(&self) -> Result<(), Self::Error>;
}

/// Errors from launch-at-login registration. Logged, never propagated.
#[derive(Debug, thiserror::Error)]
pub enum AutoLaunchError {
    #[error("failed to query launch-at-login status: {0}")]
    Query(String),

    #[error("failed to register launch at login: {0}")]
    Register(String),
}

/// Result of an [`enable`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// Was disabled and is now registered.
    Enabled,
    /// Already registered; nothing changed.
    AlreadyEnabled,
    /// Query or registration failed; the error was logged.
    Failed,
}

/// Registers the app for launch at login if it is not already.
pub fn enable<R: LaunchRegistry>(registry: &R) -> Registration {
    match try_enable(registry) {
        Ok(outcome) => {
            tracing::debug!(?outcome, "launch at login");
            outcome
        }
        Err(e) => {
            tracing::warn!("{e}");
            Registration::Failed
        }
    }
}

fn try_enable<R: LaunchRegistry>(registry: &R) -> Result<Registration, AutoLaunchError> {
    let enabled = registry
        .is_enabled()
        .map_err(|e| AutoLaunchError::Query(e.to_string()))?;
    if enabled {
        return Ok(Registration::AlreadyEnabled);
    }

    registry
        .enable()
        .map_err(|e| AutoLaunchError::Register(e.to_string()))?;
    tracing::info!("registered for launch at login");
    Ok(Registration::Enabled)
}
