//! User configuration for PullTray.
//!
//! The whole persisted state of the app is a single JSON document,
//! `user-config.json`, living in the per-user application data directory.
//! [`ConfigStore`] reads and writes it; [`SetupGate`] turns the one-shot
//! first-run submission into a saved [`UserConfig`].

mod error;
pub mod setup;
mod store;
mod user;

pub use error::ConfigError;
pub use setup::{SetupError, SetupGate};
pub use store::{CONFIG_FILE_NAME, ConfigStore};
pub use user::UserConfig;
