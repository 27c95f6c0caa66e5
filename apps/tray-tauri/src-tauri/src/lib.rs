mod autolaunch;
mod commands;
mod setup;
mod state;
mod tray;
mod windows;

use tauri::{Manager, RunEvent};
use tauri_plugin_autostart::MacosLauncher;
use tracing_subscriber::EnvFilter;

use pulltray_config::ConfigStore;

use state::AppState;
use windows::WindowHost;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,pulltray=debug")),
        )
        .init();

    tracing::info!(version = env!("PULLTRAY_VERSION"), "starting PullTray");

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_autostart::init(MacosLauncher::LaunchAgent, None))
        .setup(|app| {
            let handle = app.handle().clone();
            app.manage(AppState::new(
                WindowHost::new(handle.clone()),
                WindowHost::new(handle.clone()),
            ));

            let dir = app.path().app_data_dir()?;
            let mut store = ConfigStore::in_dir(&dir);
            let loaded = store.load().inspect_err(|e| {
                tracing::error!("cannot read user config: {e}");
            })?;

            match loaded {
                Some(config) => {
                    tracing::info!(user = %config.github_username, "loaded user config");
                    app.state::<AppState>().configure(config)?;
                    tray::build(&handle)?;
                }
                None => {
                    tracing::info!(path = %store.path().display(), "no user config, starting setup");
                    setup::show(&handle, store)?;
                }
            }
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::current_items,
            commands::open_item,
        ])
        .build(tauri::generate_context!());

    let app = match app {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("failed to start PullTray: {e}");
            std::process::exit(1);
        }
    };

    app.run(|_app, event| {
        // Tray apps outlive their windows; only an explicit exit code quits.
        if let RunEvent::ExitRequested { code: None, api, .. } = event {
            api.prevent_exit();
        }
    });
}
