//! Tauri windows as panel hosts.

use tauri::{
    AppHandle, Emitter, EventTarget, Manager, Monitor, PhysicalPosition, WebviewUrl,
    WebviewWindow, WebviewWindowBuilder, WindowEvent,
};

use pulltray_github::Item;
use pulltray_panel::{Anchor, HostError, PanelHost, PanelKind, Screen, popup_origin};

use crate::state::AppState;

pub const PANEL_WIDTH: f64 = 400.0;
pub const PANEL_HEIGHT: f64 = 450.0;

/// Builds frameless popup windows and routes their focus and close events
/// back to the panel that owns them.
#[derive(Clone)]
pub struct WindowHost {
    app: AppHandle,
}

impl WindowHost {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl PanelHost for WindowHost {
    type Handle = WebviewWindow;

    fn create(&self, kind: PanelKind, generation: u64) -> Result<WebviewWindow, HostError> {
        let window =
            WebviewWindowBuilder::new(&self.app, kind.label(), WebviewUrl::App(kind.page().into()))
                .title(kind.title())
                .inner_size(PANEL_WIDTH, PANEL_HEIGHT)
                .decorations(false)
                .resizable(false)
                .always_on_top(true)
                .skip_taskbar(true)
                .visible(false)
                .build()
                .map_err(HostError::new)?;

        let app = self.app.clone();
        window.on_window_event(move |event| {
            let Some(state) = app.try_state::<AppState>() else {
                return;
            };
            match event {
                WindowEvent::Focused(false) => state.panel(kind).on_blur(),
                WindowEvent::Destroyed => state.panel(kind).on_closed(generation),
                _ => {}
            }
        });

        Ok(window)
    }

    fn push(&self, handle: &WebviewWindow, kind: PanelKind, items: &[Item]) -> Result<(), HostError> {
        handle
            .emit_to(EventTarget::webview_window(handle.label()), kind.channel(), items)
            .map_err(HostError::new)
    }

    fn show(&self, handle: &WebviewWindow, anchor: Option<Anchor>) -> Result<(), HostError> {
        if let Some(anchor) = anchor {
            let size = handle.outer_size().map_err(HostError::new)?;
            // The hidden window may still sit on another monitor; ask for
            // the one under the click first.
            let screen = handle
                .monitor_from_point(anchor.x, anchor.y)
                .ok()
                .flatten()
                .or_else(|| handle.current_monitor().ok().flatten())
                .map(|m| screen_of(&m));
            let (x, y) = popup_origin(
                anchor,
                (f64::from(size.width), f64::from(size.height)),
                screen,
            );
            handle
                .set_position(PhysicalPosition::new(x, y))
                .map_err(HostError::new)?;
        }

        handle.show().map_err(HostError::new)?;
        handle.set_focus().map_err(HostError::new)
    }

    fn hide(&self, handle: &WebviewWindow) -> Result<(), HostError> {
        handle.hide().map_err(HostError::new)
    }
}

fn screen_of(monitor: &Monitor) -> Screen {
    Screen {
        x: f64::from(monitor.position().x),
        y: f64::from(monitor.position().y),
        width: f64::from(monitor.size().width),
        height: f64::from(monitor.size().height),
    }
}
