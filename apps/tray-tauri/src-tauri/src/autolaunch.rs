//! Launch-at-login through the Tauri autostart plugin.

use tauri::AppHandle;
use tauri_plugin_autostart::{AutoLaunchManager, ManagerExt};

use pulltray_autostart::{LaunchRegistry, Registration};

struct PluginRegistry<'a>(&'a AutoLaunchManager);

impl LaunchRegistry for PluginRegistry<'_> {
    type Error = tauri_plugin_autostart::Error;

    fn is_enabled(&self) -> Result<bool, Self::Error> {
        self.0.is_enabled()
    }

    fn enable(&self) -> Result<(), Self::Error> {
        self.0.enable()
    }
}

/// Registers the running executable to start at login. Failures are logged.
pub fn enable(app: &AppHandle) -> Registration {
    let manager = app.autolaunch();
    pulltray_autostart::enable(&PluginRegistry(&manager))
}
