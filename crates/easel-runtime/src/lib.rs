//! Windows for Easel surfaces.
//!
//! A [`Display`] owns one dispatcher thread that runs a platform
//! [`Backend`]. [`Scene`]s are windows on a display: they send commands to
//! the dispatcher, which keeps the native-window registry, translates
//! native events into scene callbacks and blits presented frames.

mod backend;
mod dispatcher;
mod display;
mod error;
mod event;
mod headless;
mod registry;
mod scene;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use backend::{Backend, NativeTarget, Waker};
pub use dispatcher::Pump;
pub use display::Display;
pub use error::{ConnectError, PlatformError, WindowCreationError};
pub use event::{NativeEvent, NativeId, WindowRequest};
pub use headless::{HeadlessBackend, HeadlessInspector};
pub use scene::{Scene, SceneHandle, SceneOptions, MIN_HEIGHT, MIN_WIDTH};

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
