use std::sync::Arc;

use easel_surface::Pixmap;

use crate::dispatcher::Pump;
use crate::error::PlatformError;
use crate::event::{NativeId, WindowRequest};

/// Wakes a backend blocked waiting for native events so it drains the
/// command queue. Must be callable from any thread.
pub type Waker = Arc<dyn Fn() + Send + Sync + 'static>;

/// A native display connection, driven on the dispatcher thread.
///
/// `run` connects, reports readiness with [`Pump::connected`] and then
/// pumps native events and [`Pump::drain`] until [`Pump::should_exit`].
pub trait Backend: Send + 'static {
    fn run(self: Box<Self>, pump: &mut Pump) -> Result<(), PlatformError>;
}

/// Window operations the pump performs on behalf of scenes.
pub trait NativeTarget {
    fn create_window(&mut self, request: &WindowRequest) -> Result<NativeId, PlatformError>;

    fn present(&mut self, id: NativeId, frame: &Pixmap) -> Result<(), PlatformError>;

    fn destroy_window(&mut self, id: NativeId);

    /// Shows a notification to the user. Backends without a native
    /// message box log it.
    fn show_message(&mut self, text: &str, caption: &str) {
        log::info!("[{caption}] {text}");
    }
}
