#![deny(missing_docs)]

//! Layered 2D drawing surfaces presented in native windows.
//!
//! Draw on [`Surface`]s, nest them with [`Surface::add_child`], and show
//! the tree in a [`Scene`] with [`Scene::refresh`]. Scene callbacks run on
//! the dispatcher thread; share state with them through a `Mutex`.

pub use easel_graphics::{
    normalize_degrees, sweep_contains, Brush, Color, FontSpec, Key, MouseButton, Pen, Point, Rect,
    Size,
};
pub use easel_runtime::{
    Backend, ConnectError, Display, HeadlessBackend, HeadlessInspector, NativeEvent, NativeId,
    NativeTarget, PlatformError, Pump, Scene, SceneHandle, SceneOptions, Waker,
    WindowCreationError, WindowRequest, MIN_HEIGHT, MIN_WIDTH,
};
pub use easel_surface::{
    composite_tree, font_book, register_font, Canvas, DrawError, ExportError, FontBook, FontError,
    Image, ImageError, ImageFormat, Pixmap, Surface, SurfaceCreationError, WeakSurface, BACKDROP,
    MAX_DIMENSION, TOUCHED, UNTOUCHED,
};

#[cfg(feature = "desktop")]
pub use easel_platform_desktop_winit::WinitBackend;

#[cfg(feature = "desktop")]
static DESKTOP: once_cell::sync::OnceCell<Display> = once_cell::sync::OnceCell::new();

/// Returns the process-wide desktop display, connecting on first use.
///
/// The display lives until the process exits; only one desktop connection
/// can exist per process.
#[cfg(feature = "desktop")]
pub fn desktop() -> Result<Display, ConnectError> {
    DESKTOP
        .get_or_try_init(|| {
            log::info!("connecting to the desktop display");
            Display::open(WinitBackend::new())
        })
        .cloned()
}

/// Shows a notification on the desktop display without waiting for it.
#[cfg(feature = "desktop")]
pub fn show_message(text: impl Into<String>, caption: impl Into<String>) -> Result<(), ConnectError> {
    desktop()?.show_message(text, caption);
    Ok(())
}

/// Builder used to configure and open a [`Scene`].
#[derive(Debug, Clone, Default)]
pub struct SceneBuilder {
    options: SceneOptions,
}

impl SceneBuilder {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the window caption.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.options.caption = title.into();
        self
    }

    /// Sets the window client size in physical pixels.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.options = self.options.with_size(width, height);
        self
    }

    /// Sets the size of the scene's own root surface.
    pub fn canvas_size(mut self, width: u32, height: u32) -> Self {
        self.options = self.options.with_canvas_size(width, height);
        self
    }

    /// Sets the opaque color shown where no surface has drawn.
    pub fn backdrop(mut self, color: Color) -> Self {
        self.options = self.options.with_backdrop(color);
        self
    }

    /// The options collected so far.
    pub fn options(&self) -> &SceneOptions {
        &self.options
    }

    /// Opens the scene on `display`.
    pub fn build_on(self, display: &Display) -> Result<Scene, WindowCreationError> {
        Scene::with_options(display, self.options)
    }

    /// Opens the scene on the desktop display.
    #[cfg(feature = "desktop")]
    pub fn build(self) -> Result<Scene, WindowCreationError> {
        let display = desktop()?;
        self.build_on(&display)
    }
}

/// Opens a desktop scene with default options.
#[cfg(feature = "desktop")]
pub fn open_scene(
    width: u32,
    height: u32,
    caption: impl Into<String>,
) -> Result<Scene, WindowCreationError> {
    SceneBuilder::new().title(caption).size(width, height).build()
}
