//! Desktop backend for Easel built on winit windows and a pixels blit.
//!
//! The event loop runs on the dispatcher thread. Frames are copied into a
//! `pixels` buffer sized in physical pixels, so one frame pixel is one
//! screen pixel.

mod keys;

use std::sync::atomic::{AtomicBool, Ordering};

use easel_runtime::{Backend, PlatformError, Pump};

/// winit allows a single event loop per process.
static EVENT_LOOP_CLAIMED: AtomicBool = AtomicBool::new(false);

/// Native windows through winit.
///
/// Only one `WinitBackend` can ever connect in a process; later attempts
/// fail with [`PlatformError::Connection`]. Keep the resulting display
/// alive for the whole program.
#[derive(Debug, Default)]
pub struct WinitBackend;

impl WinitBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Backend for WinitBackend {
    fn run(self: Box<Self>, pump: &mut Pump) -> Result<(), PlatformError> {
        if EVENT_LOOP_CLAIMED.swap(true, Ordering::SeqCst) {
            return Err(PlatformError::Connection(
                "a winit event loop already exists in this process".to_string(),
            ));
        }
        desktop::run(pump)
    }
}

#[cfg(target_os = "macos")]
mod desktop {
    use super::*;

    pub(crate) fn run(_pump: &mut Pump) -> Result<(), PlatformError> {
        Err(PlatformError::Unsupported(
            "macOS requires the event loop on the main thread".to_string(),
        ))
    }
}

#[cfg(not(target_os = "macos"))]
mod desktop {
    use std::sync::{Arc, Mutex};

    use easel_runtime::{NativeEvent, NativeId, NativeTarget, PlatformError, Pump, WindowRequest};
    use easel_surface::Pixmap;
    use hashbrown::HashMap;
    use pixels::{Pixels, SurfaceTexture};
    use winit::dpi::{PhysicalPosition, PhysicalSize};
    use winit::event::{ElementState, Event, WindowEvent};
    use winit::event_loop::{ControlFlow, EventLoopBuilder, EventLoopWindowTarget};
    use winit::platform::run_return::EventLoopExtRunReturn;
    use winit::window::{Window, WindowBuilder, WindowId};

    use easel_graphics::MouseButton;

    use crate::keys;

    struct NativeWindow {
        // Declared before `window`: the surface must be dropped first.
        pixels: Pixels,
        window: Window,
        buffer: (u32, u32),
        cursor: PhysicalPosition<f64>,
    }

    #[derive(Default)]
    struct Windows {
        next_id: u64,
        native: HashMap<NativeId, NativeWindow>,
        ids: HashMap<WindowId, NativeId>,
    }

    struct DesktopTarget<'a> {
        event_loop: &'a EventLoopWindowTarget<()>,
        windows: &'a mut Windows,
    }

    impl NativeTarget for DesktopTarget<'_> {
        fn create_window(&mut self, request: &WindowRequest) -> Result<NativeId, PlatformError> {
            let window = WindowBuilder::new()
                .with_title(request.caption.clone())
                .with_inner_size(PhysicalSize::new(request.width, request.height))
                .with_min_inner_size(PhysicalSize::new(request.min_width, request.min_height))
                .build(self.event_loop)
                .map_err(|err| PlatformError::WindowCreation(err.to_string()))?;

            let size = window.inner_size();
            let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
            let pixels = Pixels::new(size.width, size.height, surface_texture)
                .map_err(|err| PlatformError::WindowCreation(err.to_string()))?;

            self.windows.next_id += 1;
            let id = NativeId::new(self.windows.next_id);
            self.windows.ids.insert(window.id(), id);
            self.windows.native.insert(
                id,
                NativeWindow {
                    pixels,
                    window,
                    buffer: (size.width, size.height),
                    cursor: PhysicalPosition::new(0.0, 0.0),
                },
            );
            Ok(id)
        }

        fn present(&mut self, id: NativeId, frame: &Pixmap) -> Result<(), PlatformError> {
            let native = self
                .windows
                .native
                .get_mut(&id)
                .ok_or_else(|| PlatformError::Present(format!("unknown window {id}")))?;
            let frame_size = (frame.width(), frame.height());
            if native.buffer != frame_size {
                native
                    .pixels
                    .resize_buffer(frame_size.0, frame_size.1)
                    .map_err(|err| PlatformError::Present(err.to_string()))?;
                native.buffer = frame_size;
            }
            frame.copy_to(native.pixels.frame_mut());
            native
                .pixels
                .render()
                .map_err(|err| PlatformError::Present(err.to_string()))
        }

        fn destroy_window(&mut self, id: NativeId) {
            if let Some(native) = self.windows.native.remove(&id) {
                self.windows.ids.remove(&native.window.id());
            }
        }
    }

    pub(crate) fn run(pump: &mut Pump) -> Result<(), PlatformError> {
        let mut builder = EventLoopBuilder::<()>::with_user_event();
        allow_any_thread(&mut builder);
        let mut event_loop = builder.build();

        let proxy = Mutex::new(event_loop.create_proxy());
        pump.connected(Arc::new(move || {
            if let Ok(proxy) = proxy.lock() {
                let _ = proxy.send_event(());
            }
        }));
        log::debug!("winit event loop running");

        let mut windows = Windows::default();
        event_loop.run_return(|event, event_loop, control_flow| {
            *control_flow = ControlFlow::Wait;
            let mut target = DesktopTarget {
                event_loop,
                windows: &mut windows,
            };
            match event {
                Event::WindowEvent { window_id, event } => {
                    if let Some((id, event)) = translate(&mut target, window_id, event) {
                        pump.dispatch(id, event, &mut target);
                    }
                }
                Event::RedrawRequested(window_id) => {
                    if let Some(&id) = target.windows.ids.get(&window_id) {
                        pump.dispatch(id, NativeEvent::Expose, &mut target);
                    }
                }
                Event::UserEvent(()) | Event::MainEventsCleared => pump.drain(&mut target),
                _ => {}
            }
            if pump.should_exit() {
                *control_flow = ControlFlow::Exit;
            }
        });
        log::debug!("winit event loop finished");
        Ok(())
    }

    #[cfg(any(
        target_os = "linux",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd"
    ))]
    fn allow_any_thread(builder: &mut EventLoopBuilder<()>) {
        use winit::platform::x11::EventLoopBuilderExtX11;
        builder.with_any_thread(true);
    }

    #[cfg(target_os = "windows")]
    fn allow_any_thread(builder: &mut EventLoopBuilder<()>) {
        use winit::platform::windows::EventLoopBuilderExtWindows;
        builder.with_any_thread(true);
    }

    #[cfg(not(any(
        target_os = "linux",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd",
        target_os = "windows"
    )))]
    fn allow_any_thread(_builder: &mut EventLoopBuilder<()>) {}

    /// Updates per-window state and turns a winit event into a native event.
    fn translate(
        target: &mut DesktopTarget<'_>,
        window_id: WindowId,
        event: WindowEvent<'_>,
    ) -> Option<(NativeId, NativeEvent)> {
        let id = *target.windows.ids.get(&window_id)?;
        if let WindowEvent::Destroyed = event {
            target.windows.ids.remove(&window_id);
            target.windows.native.remove(&id);
            return Some((id, NativeEvent::Destroyed));
        }
        let native = target.windows.native.get_mut(&id)?;
        if let Some(size) = new_client_size(&event) {
            return resize(native, id, size).map(|event| (id, event));
        }
        let event = match event {
            WindowEvent::CloseRequested => NativeEvent::CloseRequested,
            WindowEvent::CursorMoved { position, .. } => {
                native.cursor = position;
                return None;
            }
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button,
                ..
            } => match keys::mouse_button(button) {
                MouseButton::Left | MouseButton::Right => NativeEvent::Click {
                    x: native.cursor.x as i32,
                    y: native.cursor.y as i32,
                },
                _ => return None,
            },
            WindowEvent::KeyboardInput { input, .. } => {
                let key = keys::key(input.virtual_keycode, input.scancode);
                match input.state {
                    ElementState::Pressed => NativeEvent::KeyDown(key),
                    ElementState::Released => NativeEvent::KeyUp(key),
                }
            }
            WindowEvent::ReceivedCharacter(ch) if !ch.is_control() || ch == '\r' || ch == '\t' => {
                NativeEvent::Char(ch)
            }
            _ => return None,
        };
        Some((id, event))
    }

    /// Client size carried by a resize or a scale factor change. Minimised
    /// windows report zero and yield `None`.
    fn new_client_size(event: &WindowEvent<'_>) -> Option<PhysicalSize<u32>> {
        let size = match event {
            WindowEvent::Resized(size) => *size,
            WindowEvent::ScaleFactorChanged { new_inner_size, .. } => **new_inner_size,
            _ => return None,
        };
        (size.width > 0 && size.height > 0).then_some(size)
    }

    /// Matches the pixels surface and buffer to a new client size.
    fn resize(native: &mut NativeWindow, id: NativeId, size: PhysicalSize<u32>) -> Option<NativeEvent> {
        if let Err(err) = native.pixels.resize_surface(size.width, size.height) {
            log::error!("failed to resize surface of window {id}: {err}");
            return None;
        }
        if let Err(err) = native.pixels.resize_buffer(size.width, size.height) {
            log::error!("failed to resize buffer of window {id}: {err}");
            return None;
        }
        native.buffer = (size.width, size.height);
        Some(NativeEvent::Resized {
            width: size.width,
            height: size.height,
        })
    }

}
