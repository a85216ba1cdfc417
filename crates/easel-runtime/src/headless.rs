//! An in-memory backend for tests and offscreen rendering.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use easel_surface::Pixmap;

use crate::backend::{Backend, NativeTarget, Waker};
use crate::dispatcher::Pump;
use crate::error::PlatformError;
use crate::event::{NativeId, WindowRequest};
use crate::lock;

#[derive(Default)]
struct HeadlessState {
    next_id: u64,
    windows: BTreeMap<NativeId, HeadlessWindow>,
    messages: Vec<(String, String)>,
}

struct HeadlessWindow {
    request: WindowRequest,
    open: bool,
    presented: Option<Pixmap>,
    present_count: usize,
}

/// Backend whose windows only exist in memory.
pub struct HeadlessBackend {
    state: Arc<Mutex<HeadlessState>>,
    reject_windows: bool,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self {
            state: Arc::default(),
            reject_windows: false,
        }
    }

    /// A backend that connects but refuses to create any window.
    pub fn failing() -> Self {
        Self {
            reject_windows: true,
            ..Self::new()
        }
    }

    pub fn inspector(&self) -> HeadlessInspector {
        HeadlessInspector {
            state: Arc::clone(&self.state),
        }
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for HeadlessBackend {
    fn run(self: Box<Self>, pump: &mut Pump) -> Result<(), PlatformError> {
        let waker: Waker = Arc::new(|| {});
        pump.connected(waker);
        let mut target = HeadlessTarget {
            state: self.state,
            reject_windows: self.reject_windows,
        };
        while !pump.should_exit() {
            pump.wait(&mut target);
        }
        Ok(())
    }
}

struct HeadlessTarget {
    state: Arc<Mutex<HeadlessState>>,
    reject_windows: bool,
}

impl NativeTarget for HeadlessTarget {
    fn create_window(&mut self, request: &WindowRequest) -> Result<NativeId, PlatformError> {
        if self.reject_windows {
            return Err(PlatformError::WindowCreation(format!(
                "headless backend rejects `{}`",
                request.caption
            )));
        }
        let mut state = lock(&self.state);
        state.next_id += 1;
        let id = NativeId::new(state.next_id);
        state.windows.insert(
            id,
            HeadlessWindow {
                request: request.clone(),
                open: true,
                presented: None,
                present_count: 0,
            },
        );
        Ok(id)
    }

    fn present(&mut self, id: NativeId, frame: &Pixmap) -> Result<(), PlatformError> {
        let mut state = lock(&self.state);
        let window = state
            .windows
            .get_mut(&id)
            .filter(|window| window.open)
            .ok_or_else(|| PlatformError::Present(format!("no open window {id}")))?;
        window.presented = Some(frame.clone());
        window.present_count += 1;
        Ok(())
    }

    fn destroy_window(&mut self, id: NativeId) {
        if let Some(window) = lock(&self.state).windows.get_mut(&id) {
            window.open = false;
        }
    }

    fn show_message(&mut self, text: &str, caption: &str) {
        lock(&self.state)
            .messages
            .push((caption.to_string(), text.to_string()));
    }
}

/// Read access to the windows of a [`HeadlessBackend`].
#[derive(Clone)]
pub struct HeadlessInspector {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessInspector {
    /// Ids of windows that are still open, in creation order.
    pub fn windows(&self) -> Vec<NativeId> {
        lock(&self.state)
            .windows
            .iter()
            .filter(|(_, window)| window.open)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn is_open(&self, id: NativeId) -> bool {
        lock(&self.state)
            .windows
            .get(&id)
            .map_or(false, |window| window.open)
    }

    /// The most recent frame presented to `id`.
    pub fn presented(&self, id: NativeId) -> Option<Pixmap> {
        lock(&self.state)
            .windows
            .get(&id)
            .and_then(|window| window.presented.clone())
    }

    pub fn present_count(&self, id: NativeId) -> usize {
        lock(&self.state)
            .windows
            .get(&id)
            .map_or(0, |window| window.present_count)
    }

    /// Messages shown so far as `(caption, text)` pairs.
    pub fn messages(&self) -> Vec<(String, String)> {
        lock(&self.state).messages.clone()
    }

    pub fn request(&self, id: NativeId) -> Option<WindowRequest> {
        lock(&self.state)
            .windows
            .get(&id)
            .map(|window| window.request.clone())
    }
}
