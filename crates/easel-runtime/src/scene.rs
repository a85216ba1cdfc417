use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, Weak};

use easel_graphics::{Color, Key, Size};
use easel_surface::{composite_tree, Canvas, Pixmap, Surface, WeakSurface};
use once_cell::sync::OnceCell;

use crate::dispatcher::{Command, Link};
use crate::display::Display;
use crate::error::WindowCreationError;
use crate::event::{NativeEvent, NativeId, WindowRequest};
use crate::lock;

/// Smallest accepted window width.
pub const MIN_WIDTH: u32 = 240;
/// Smallest accepted window height.
pub const MIN_HEIGHT: u32 = 120;

/// Window configuration for [`Scene::with_options`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneOptions {
    pub width: u32,
    pub height: u32,
    pub caption: String,
    /// Size of the default root surface. Defaults to the window size.
    pub canvas_size: Option<Size>,
    /// Opaque color behind the surface tree in every frame.
    pub backdrop: Color,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            caption: "Easel".to_string(),
            canvas_size: None,
            backdrop: Color::WHITE,
        }
    }
}

impl SceneOptions {
    pub fn new(width: u32, height: u32, caption: impl Into<String>) -> Self {
        Self {
            width,
            height,
            caption: caption.into(),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    /// Gives the default root surface a size independent of the window,
    /// e.g. larger so drawing survives later resizes.
    pub fn with_canvas_size(mut self, width: u32, height: u32) -> Self {
        self.canvas_size = Some(Size::new(width, height));
        self
    }

    pub fn with_backdrop(mut self, backdrop: Color) -> Self {
        self.backdrop = backdrop;
        self
    }
}

type ClickFn = dyn FnMut(&SceneHandle, i32, i32) + Send;
type KeyFn = dyn FnMut(&SceneHandle, Key) + Send;
type PressFn = dyn FnMut(&SceneHandle, char) + Send;
type ResizeFn = dyn FnMut(&SceneHandle, u32, u32) + Send;

#[derive(Clone, Copy, Debug)]
enum Slot {
    Click = 0,
    KeyDown = 1,
    KeyUp = 2,
    Press = 3,
    Resize = 4,
}

const SLOT_COUNT: usize = 5;

enum Callback {
    Click(Box<ClickFn>),
    Key(Box<KeyFn>),
    Press(Box<PressFn>),
    Resize(Box<ResizeFn>),
}

enum Root {
    Owned(Surface),
    Borrowed(WeakSurface),
}

/// Scene state shared between the owning [`Scene`], its handles and the
/// dispatcher's registry.
pub(crate) struct SceneShared {
    caption: String,
    size: Mutex<Size>,
    native_id: OnceCell<NativeId>,
    closed: AtomicBool,
    root: Mutex<Root>,
    callbacks: Mutex<[Option<Callback>; SLOT_COUNT]>,
    link: Link,
    backdrop: Color,
    last_frame: Mutex<Option<Arc<Pixmap>>>,
}

impl SceneShared {
    pub(crate) fn attach(&self, id: NativeId) {
        let _ = self.native_id.set(id);
    }

    pub(crate) fn mark_closed(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn native_id(&self) -> Option<NativeId> {
        if self.is_closed() {
            return None;
        }
        self.native_id.get().copied()
    }

    pub(crate) fn set_size(&self, width: u32, height: u32) {
        *lock(&self.size) = Size::new(width, height);
    }

    fn size(&self) -> Size {
        *lock(&self.size)
    }

    fn background(&self) -> Option<Surface> {
        match &*lock(&self.root) {
            Root::Owned(surface) => Some(surface.clone()),
            Root::Borrowed(weak) => weak.upgrade(),
        }
    }

    fn set_background(&self, surface: &Surface) {
        *lock(&self.root) = Root::Borrowed(surface.downgrade());
    }

    fn last_frame(&self) -> Option<Arc<Pixmap>> {
        lock(&self.last_frame).clone()
    }

    /// Composites the surface tree over the backdrop and queues the frame.
    pub(crate) fn refresh(&self) {
        let Some(id) = self.native_id() else {
            return;
        };
        let size = self.size();
        let mut frame = match Canvas::new(size.width, size.height) {
            Ok(frame) => frame,
            Err(err) => {
                log::warn!("skipping refresh of window {id}: {err}");
                return;
            }
        };
        frame.fill(self.backdrop);
        if let Some(root) = self.background() {
            let origin = root.position();
            composite_tree(&root, &mut frame, origin.x, origin.y);
        }
        let frame = Arc::new(frame.into_pixmap());
        *lock(&self.last_frame) = Some(Arc::clone(&frame));
        self.link.send(Command::Present { id, frame });
    }

    /// Repaints on the dispatcher thread. A panic while compositing is
    /// logged and the frame dropped.
    pub(crate) fn expose(&self) {
        if panic::catch_unwind(AssertUnwindSafe(|| self.refresh())).is_err() {
            log::error!("repaint of `{}` panicked", self.caption);
        }
    }

    fn post_event(&self, event: NativeEvent) {
        if let Some(id) = self.native_id() {
            self.link.send(Command::Post { id, event });
        }
    }

    fn set_callback(&self, slot: Slot, callback: Callback) {
        lock(&self.callbacks)[slot as usize] = Some(callback);
    }

    /// Runs the callback in `slot` with the slot emptied, so the callback
    /// may refresh or re-register without deadlocking.
    fn fire(self: &Arc<Self>, slot: Slot, invoke: impl FnOnce(&mut Callback, &SceneHandle)) {
        let Some(mut callback) = lock(&self.callbacks)[slot as usize].take() else {
            return;
        };
        let handle = SceneHandle {
            shared: Arc::downgrade(self),
        };
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| invoke(&mut callback, &handle)));
        if outcome.is_err() {
            log::error!("{slot:?} callback of `{}` panicked", self.caption);
        }
        let mut callbacks = lock(&self.callbacks);
        if callbacks[slot as usize].is_none() {
            callbacks[slot as usize] = Some(callback);
        }
    }

    pub(crate) fn fire_click(self: &Arc<Self>, x: i32, y: i32) {
        self.fire(Slot::Click, |callback, handle| {
            if let Callback::Click(f) = callback {
                f(handle, x, y);
            }
        });
    }

    pub(crate) fn fire_key_down(self: &Arc<Self>, key: Key) {
        self.fire(Slot::KeyDown, |callback, handle| {
            if let Callback::Key(f) = callback {
                f(handle, key);
            }
        });
    }

    pub(crate) fn fire_key_up(self: &Arc<Self>, key: Key) {
        self.fire(Slot::KeyUp, |callback, handle| {
            if let Callback::Key(f) = callback {
                f(handle, key);
            }
        });
    }

    pub(crate) fn fire_press(self: &Arc<Self>, ch: char) {
        self.fire(Slot::Press, |callback, handle| {
            if let Callback::Press(f) = callback {
                f(handle, ch);
            }
        });
    }

    pub(crate) fn fire_resize(self: &Arc<Self>, width: u32, height: u32) {
        self.fire(Slot::Resize, |callback, handle| {
            if let Callback::Resize(f) = callback {
                f(handle, width, height);
            }
        });
    }
}

/// An open window presenting a tree of surfaces.
///
/// Drawing goes to [`Scene::background`] (or a surface installed with
/// [`Scene::set_background`]) and becomes visible on [`Scene::refresh`].
///
/// Callbacks run on the dispatcher thread, not the thread that created the
/// scene. State they share with other threads must be synchronised by the
/// application, e.g. with a `Mutex`.
///
/// Dropping the scene closes its window.
pub struct Scene {
    shared: Arc<SceneShared>,
    display: Display,
}

impl Scene {
    pub fn new(
        display: &Display,
        width: u32,
        height: u32,
        caption: impl Into<String>,
    ) -> Result<Self, WindowCreationError> {
        Self::with_options(display, SceneOptions::new(width, height, caption))
    }

    /// Opens the window and blocks until the dispatcher has created it.
    pub fn with_options(display: &Display, options: SceneOptions) -> Result<Self, WindowCreationError> {
        if display.is_dispatcher_thread() {
            return Err(WindowCreationError::OnDispatcherThread);
        }
        if options.width < MIN_WIDTH || options.height < MIN_HEIGHT {
            return Err(WindowCreationError::TooSmall {
                width: options.width,
                height: options.height,
                min_width: MIN_WIDTH,
                min_height: MIN_HEIGHT,
            });
        }
        let canvas = options
            .canvas_size
            .unwrap_or(Size::new(options.width, options.height));
        let root = Surface::new(canvas.width, canvas.height)?;

        let shared = Arc::new(SceneShared {
            caption: options.caption.clone(),
            size: Mutex::new(Size::new(options.width, options.height)),
            native_id: OnceCell::new(),
            closed: AtomicBool::new(false),
            root: Mutex::new(Root::Owned(root)),
            callbacks: Mutex::new(Default::default()),
            link: display.link().clone(),
            backdrop: options.backdrop,
            last_frame: Mutex::new(None),
        });

        let request = WindowRequest {
            caption: options.caption,
            width: options.width,
            height: options.height,
            min_width: MIN_WIDTH,
            min_height: MIN_HEIGHT,
        };
        let (reply_tx, reply_rx) = mpsc::sync_channel(1);
        let sent = display.link().send(Command::Open {
            scene: Arc::clone(&shared),
            request,
            reply: reply_tx,
        });
        if !sent {
            return Err(WindowCreationError::DispatcherUnavailable);
        }
        match reply_rx.recv() {
            Ok(Ok(_)) => Ok(Self {
                shared,
                display: display.clone(),
            }),
            Ok(Err(err)) => Err(WindowCreationError::Platform(err)),
            Err(_) => Err(WindowCreationError::DispatcherUnavailable),
        }
    }

    /// Presents the current surface tree. Does nothing once closed.
    pub fn refresh(&self) {
        self.shared.refresh();
    }

    /// Whether the window is gone. Once true it stays true.
    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }

    /// Client size in pixels, updated by resize events.
    pub fn size(&self) -> Size {
        self.shared.size()
    }

    pub fn caption(&self) -> &str {
        &self.shared.caption
    }

    /// The native window identity, or `None` once closed.
    pub fn native_id(&self) -> Option<NativeId> {
        self.shared.native_id()
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    /// A weak handle usable from callbacks and other threads.
    pub fn handle(&self) -> SceneHandle {
        SceneHandle {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// The root surface: the scene's own unless one was installed with
    /// [`Scene::set_background`]. `None` if the installed one was dropped.
    pub fn background(&self) -> Option<Surface> {
        self.shared.background()
    }

    /// Makes `surface` the root. The scene only references it; the caller
    /// keeps it alive. The scene's own root surface is released.
    pub fn set_background(&self, surface: &Surface) {
        self.shared.set_background(surface);
    }

    /// The last frame built by [`Scene::refresh`].
    pub fn last_frame(&self) -> Option<Arc<Pixmap>> {
        self.shared.last_frame()
    }

    /// Injects `event` as if the platform had sent it. It is delivered on
    /// the dispatcher thread after the commands already queued.
    pub fn post_event(&self, event: NativeEvent) {
        self.shared.post_event(event);
    }

    /// Requests the window to close without dropping the scene.
    pub fn close(&self) {
        if let Some(id) = self.shared.native_id() {
            self.shared.link.send(Command::Close { id });
        }
    }

    pub fn on_click(&self, callback: impl FnMut(&SceneHandle, i32, i32) + Send + 'static) {
        self.handle().on_click(callback);
    }

    pub fn on_key_down(&self, callback: impl FnMut(&SceneHandle, Key) + Send + 'static) {
        self.handle().on_key_down(callback);
    }

    pub fn on_key_up(&self, callback: impl FnMut(&SceneHandle, Key) + Send + 'static) {
        self.handle().on_key_up(callback);
    }

    /// Character input, after keyboard layout and modifiers are applied.
    pub fn on_press(&self, callback: impl FnMut(&SceneHandle, char) + Send + 'static) {
        self.handle().on_press(callback);
    }

    pub fn on_resize(&self, callback: impl FnMut(&SceneHandle, u32, u32) + Send + 'static) {
        self.handle().on_resize(callback);
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("caption", &self.shared.caption)
            .field("size", &self.size())
            .field("native_id", &self.native_id())
            .finish()
    }
}

/// Non-owning access to a [`Scene`]. Every operation is a no-op once the
/// scene has been dropped.
#[derive(Clone)]
pub struct SceneHandle {
    shared: Weak<SceneShared>,
}

impl SceneHandle {
    fn with<R>(&self, f: impl FnOnce(&SceneShared) -> R) -> Option<R> {
        self.shared.upgrade().map(|shared| f(&shared))
    }

    pub fn refresh(&self) {
        self.with(SceneShared::refresh);
    }

    pub fn is_closed(&self) -> bool {
        self.with(SceneShared::is_closed).unwrap_or(true)
    }

    pub fn size(&self) -> Option<Size> {
        self.with(SceneShared::size)
    }

    pub fn background(&self) -> Option<Surface> {
        self.with(SceneShared::background).flatten()
    }

    pub fn last_frame(&self) -> Option<Arc<Pixmap>> {
        self.with(SceneShared::last_frame).flatten()
    }

    pub fn post_event(&self, event: NativeEvent) {
        self.with(|shared| shared.post_event(event));
    }

    pub fn on_click(&self, callback: impl FnMut(&SceneHandle, i32, i32) + Send + 'static) {
        self.with(|shared| shared.set_callback(Slot::Click, Callback::Click(Box::new(callback))));
    }

    pub fn on_key_down(&self, callback: impl FnMut(&SceneHandle, Key) + Send + 'static) {
        self.with(|shared| shared.set_callback(Slot::KeyDown, Callback::Key(Box::new(callback))));
    }

    pub fn on_key_up(&self, callback: impl FnMut(&SceneHandle, Key) + Send + 'static) {
        self.with(|shared| shared.set_callback(Slot::KeyUp, Callback::Key(Box::new(callback))));
    }

    pub fn on_press(&self, callback: impl FnMut(&SceneHandle, char) + Send + 'static) {
        self.with(|shared| shared.set_callback(Slot::Press, Callback::Press(Box::new(callback))));
    }

    pub fn on_resize(&self, callback: impl FnMut(&SceneHandle, u32, u32) + Send + 'static) {
        self.with(|shared| shared.set_callback(Slot::Resize, Callback::Resize(Box::new(callback))));
    }
}

impl fmt::Debug for SceneHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneHandle")
            .field("alive", &(self.shared.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/scene_tests.rs"]
mod tests;
