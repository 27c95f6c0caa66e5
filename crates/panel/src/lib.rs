//! Popup panels for the two tray icons.
//!
//! A [`Panel`] is the Hidden/Visible state machine behind one tray icon. It
//! does not know about any GUI toolkit: window creation and visibility go
//! through the [`PanelHost`] trait, which the desktop app implements on top
//! of real webview windows and the tests implement with a recorder.
//!
//! Lifecycle of one panel:
//! - activation: lazily create the window, fetch, push the list, show
//! - focus loss: hide, keep the window
//! - OS close: drop the handle; the next activation builds a new window

mod kind;
mod panel;
mod placement;

pub use kind::PanelKind;
pub use panel::{Activation, HostError, Panel, PanelError, PanelHost, PanelState};
pub use placement::{Anchor, Screen, popup_origin};
