//! Positioning a popup next to its tray icon.

/// Click position on the tray icon, in physical screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

/// Area of one monitor in physical screen pixels. Secondary monitors may sit
/// at any origin, including negative ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Screen {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Top-left corner for a popup of `size` opened from `anchor`.
///
/// The popup is centred horizontally on the click. It opens upward when the
/// tray sits in the lower half of its monitor (Windows taskbar, bottom
/// panels) and downward otherwise (macOS menu bar, top panels). The result
/// is kept inside the monitor. Without a known monitor, it opens upward
/// whenever there is room above and is not clamped.
pub fn popup_origin(anchor: Anchor, size: (f64, f64), screen: Option<Screen>) -> (f64, f64) {
    let (width, height) = size;
    let x = anchor.x - width / 2.0;

    let Some(screen) = screen else {
        let y = if anchor.y >= height { anchor.y - height } else { anchor.y };
        return (x, y);
    };

    let opens_up = anchor.y > screen.y + screen.height / 2.0;
    let y = if opens_up { anchor.y - height } else { anchor.y };

    (
        x.min(screen.x + screen.width - width).max(screen.x),
        y.min(screen.y + screen.height - height).max(screen.y),
    )
}
