//! The per-panel state machine.

use std::fmt;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use pulltray_github::Item;

use crate::{Anchor, PanelKind};

/// Failure reported by a [`PanelHost`].
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct HostError(pub String);

impl HostError {
    pub fn new(err: impl fmt::Display) -> Self {
        Self(err.to_string())
    }
}

/// Errors that abort an activation. The panel stays Hidden after any of them.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("window error: {0}")]
    Window(#[from] HostError),

    #[error("fetch failed: {0}")]
    Fetch(#[from] pulltray_github::Error),
}

/// Window backend for panels.
///
/// Implementations must not call back into the owning [`Panel`] from these
/// methods; the panel never holds its own lock while calling them.
pub trait PanelHost: Send + Sync {
    type Handle: Clone + Send + Sync;

    /// Builds a hidden window for `kind`. `generation` identifies this
    /// window in later [`Panel::on_closed`] calls.
    fn create(&self, kind: PanelKind, generation: u64) -> Result<Self::Handle, HostError>;

    /// Delivers the item list to the window's page.
    fn push(&self, handle: &Self::Handle, kind: PanelKind, items: &[Item])
    -> Result<(), HostError>;

    /// Makes the window visible and focused, near `anchor` when given.
    fn show(&self, handle: &Self::Handle, anchor: Option<Anchor>) -> Result<(), HostError>;

    fn hide(&self, handle: &Self::Handle) -> Result<(), HostError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Hidden,
    Visible,
}

/// How a successful activation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The list was pushed and the window shown.
    Shown { items: usize },
    /// The window was closed or replaced while fetching; the list was dropped.
    Discarded,
}

struct Slot<W> {
    /// Live window and the generation it was created in.
    window: Option<(u64, W)>,
    state: PanelState,
    next_generation: u64,
    items: Vec<Item>,
}

/// One popup panel: lazily created, hidden on blur, rebuilt after close.
pub struct Panel<H: PanelHost> {
    kind: PanelKind,
    host: H,
    slot: Mutex<Slot<H::Handle>>,
    /// Held while a window is being built so concurrent activations share it.
    creating: Mutex<()>,
}

impl<H: PanelHost> Panel<H> {
    pub fn new(kind: PanelKind, host: H) -> Self {
        Self {
            kind,
            host,
            slot: Mutex::new(Slot {
                window: None,
                state: PanelState::Hidden,
                next_generation: 1,
                items: Vec::new(),
            }),
            creating: Mutex::new(()),
        }
    }

    pub fn kind(&self) -> PanelKind {
        self.kind
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn state(&self) -> PanelState {
        self.lock().state
    }

    /// The live window handle, if one exists.
    pub fn handle(&self) -> Option<H::Handle> {
        self.lock().window.as_ref().map(|(_, w)| w.clone())
    }

    /// Generation of the live window. Each construction gets a new one.
    pub fn generation(&self) -> Option<u64> {
        self.lock().window.as_ref().map(|(g, _)| *g)
    }

    /// The most recently pushed list.
    pub fn items(&self) -> Vec<Item> {
        self.lock().items.clone()
    }

    /// Hidden -> Visible: ensure a window, fetch, push, show.
    ///
    /// On any error the window is not shown and the panel stays Hidden; an
    /// existing window is kept for the next attempt.
    pub async fn activate<F, Fut>(
        &self,
        anchor: Option<Anchor>,
        fetch: F,
    ) -> Result<Activation, PanelError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Item>, pulltray_github::Error>>,
    {
        let generation = self.ensure_window()?;
        let items = fetch().await?;
        self.present(generation, items, anchor)
    }

    /// Focus lost: hide the window but keep it.
    pub fn on_blur(&self) {
        let handle = {
            let mut slot = self.lock();
            slot.state = PanelState::Hidden;
            slot.window.as_ref().map(|(_, w)| w.clone())
        };

        if let Some(handle) = handle {
            if let Err(e) = self.host.hide(&handle) {
                tracing::warn!(panel = %self.kind, "failed to hide panel: {e}");
            }
        }
    }

    /// The OS destroyed the window of `generation`: forget its handle.
    ///
    /// A late event from a window that was already replaced is ignored.
    pub fn on_closed(&self, generation: u64) {
        let mut slot = self.lock();
        if !matches!(&slot.window, Some((g, _)) if *g == generation) {
            tracing::debug!(panel = %self.kind, generation, "ignoring close of stale window");
            return;
        }
        slot.window = None;
        slot.state = PanelState::Hidden;
        tracing::debug!(panel = %self.kind, generation, "panel window closed");
    }

    fn ensure_window(&self) -> Result<u64, HostError> {
        if let Some(generation) = self.generation() {
            return Ok(generation);
        }

        let _creating = self.creating.lock().unwrap_or_else(PoisonError::into_inner);
        // Another activation may have built it while we waited.
        if let Some(generation) = self.generation() {
            return Ok(generation);
        }

        let generation = {
            let mut slot = self.lock();
            let generation = slot.next_generation;
            slot.next_generation += 1;
            generation
        };
        let handle = self.host.create(self.kind, generation)?;

        let mut slot = self.lock();
        slot.window = Some((generation, handle));
        slot.state = PanelState::Hidden;
        tracing::debug!(panel = %self.kind, generation, "panel window created");
        Ok(generation)
    }

    fn present(
        &self,
        generation: u64,
        items: Vec<Item>,
        anchor: Option<Anchor>,
    ) -> Result<Activation, PanelError> {
        let count = items.len();
        let handle = {
            let mut slot = self.lock();
            let handle = match &slot.window {
                Some((g, w)) if *g == generation => w.clone(),
                _ => {
                    tracing::debug!(panel = %self.kind, generation, "window gone, dropping fetched items");
                    return Ok(Activation::Discarded);
                }
            };
            slot.items = items.clone();
            handle
        };

        self.host.push(&handle, self.kind, &items)?;

        self.set_state_if_current(generation, PanelState::Visible);
        if let Err(e) = self.host.show(&handle, anchor) {
            self.set_state_if_current(generation, PanelState::Hidden);
            return Err(e.into());
        }

        Ok(Activation::Shown { items: count })
    }

    fn set_state_if_current(&self, generation: u64, state: PanelState) {
        let mut slot = self.lock();
        if matches!(&slot.window, Some((g, _)) if *g == generation) {
            slot.state = state;
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot<H::Handle>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
