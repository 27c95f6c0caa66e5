//! The two tray icons and their click handling.

use tauri::image::Image;
use tauri::menu::{MenuBuilder, MenuItemBuilder};
use tauri::tray::{MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent};
use tauri::{AppHandle, Manager};

use pulltray_panel::{Activation, Anchor, PanelKind};

use crate::state::AppState;

const QUIT_ID: &str = "quit";

/// The two icons, managed for the lifetime of the process.
pub struct TrayIcons {
    pulls: TrayIcon,
    issues: TrayIcon,
}

impl TrayIcons {
    fn get(&self, kind: PanelKind) -> &TrayIcon {
        match kind {
            PanelKind::Pulls => &self.pulls,
            PanelKind::Issues => &self.issues,
        }
    }

    fn show_count(&self, kind: PanelKind, items: usize) {
        if let Err(e) = self.get(kind).set_tooltip(Some(tooltip(kind, items))) {
            tracing::warn!(panel = %kind, "failed to update tooltip: {e}");
        }
    }
}

/// Installs one tray icon per panel.
pub fn build(app: &AppHandle) -> tauri::Result<()> {
    let icons = TrayIcons {
        pulls: build_icon(app, PanelKind::Pulls)?,
        issues: build_icon(app, PanelKind::Issues)?,
    };
    app.manage(icons);
    tracing::debug!("tray icons installed");
    Ok(())
}

fn build_icon(app: &AppHandle, kind: PanelKind) -> tauri::Result<TrayIcon> {
    let quit = MenuItemBuilder::with_id(QUIT_ID, "Quit PullTray").build(app)?;
    let menu = MenuBuilder::new(app).item(&quit).build()?;

    TrayIconBuilder::with_id(kind.label())
        .icon(icon_for(kind)?)
        .tooltip(kind.title())
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_menu_event(|app, event| {
            if event.id().as_ref() == QUIT_ID {
                tracing::info!("quit requested from tray");
                app.exit(0);
            }
        })
        .on_tray_icon_event(move |tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                position,
                ..
            } = event
            {
                let anchor = Anchor {
                    x: position.x,
                    y: position.y,
                };
                activate(tray.app_handle().clone(), kind, Some(anchor));
            }
        })
        .build(app)
}

fn icon_for(kind: PanelKind) -> tauri::Result<Image<'static>> {
    let bytes: &[u8] = match kind {
        PanelKind::Pulls => include_bytes!("../icons/pulls.png"),
        PanelKind::Issues => include_bytes!("../icons/issues.png"),
    };
    Image::from_bytes(bytes)
}

/// Fetches and shows `kind`'s panel in the background.
pub fn activate(app: AppHandle, kind: PanelKind, anchor: Option<Anchor>) {
    tauri::async_runtime::spawn(async move {
        let state = app.state::<AppState>();
        match state.activate(kind, anchor).await {
            Ok(Activation::Shown { items }) => {
                tracing::debug!(panel = %kind, items, "panel shown");
                if let Some(icons) = app.try_state::<TrayIcons>() {
                    icons.show_count(kind, items);
                }
            }
            Ok(Activation::Discarded) => {}
            Err(e) => tracing::error!(panel = %kind, "panel not shown: {e}"),
        }
    });
}

fn tooltip(kind: PanelKind, items: usize) -> String {
    format!("{} ({items})", kind.title())
}
