//! Commands invoked from the panel pages.

use tauri::State;

use pulltray_github::Item;
use pulltray_panel::PanelKind;

use crate::state::AppState;

/// The list last pushed to `kind`'s panel, for pages that load after the push.
#[tauri::command]
pub async fn current_items(
    state: State<'_, AppState>,
    kind: PanelKind,
) -> Result<Vec<Item>, String> {
    Ok(state.panel(kind).items())
}

/// Opens an item's page in the default browser.
#[tauri::command]
pub async fn open_item(url: String) -> Result<(), String> {
    if !is_web_url(&url) {
        return Err(format!("refusing to open non-web URL: {url}"));
    }
    tracing::debug!(%url, "opening item");
    open::that(&url).map_err(|e| e.to_string())
}

fn is_web_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}
