//! The command protocol between scenes and the dispatcher thread, and the
//! [`Pump`] backends drive it with.

use std::sync::atomic::AtomicUsize;
use std::sync::mpsc::{Receiver, Sender, SyncSender, TryRecvError};
use std::sync::Arc;

use easel_surface::Pixmap;

use crate::backend::{NativeTarget, Waker};
use crate::error::PlatformError;
use crate::event::{NativeEvent, NativeId, WindowRequest};
use crate::registry::Registry;
use crate::scene::SceneShared;

pub(crate) enum Command {
    Open {
        scene: Arc<SceneShared>,
        request: WindowRequest,
        reply: SyncSender<Result<NativeId, PlatformError>>,
    },
    Present {
        id: NativeId,
        frame: Arc<Pixmap>,
    },
    Close {
        id: NativeId,
    },
    Post {
        id: NativeId,
        event: NativeEvent,
    },
    Message {
        text: String,
        caption: String,
    },
    Sync {
        reply: SyncSender<()>,
    },
    Shutdown,
}

/// Sending half of the command queue plus the backend's waker.
#[derive(Clone)]
pub(crate) struct Link {
    commands: Sender<Command>,
    waker: Waker,
}

impl Link {
    pub(crate) fn new(commands: Sender<Command>, waker: Waker) -> Self {
        Self { commands, waker }
    }

    /// Queues `command` and wakes the dispatcher. Returns `false` once the
    /// dispatcher has stopped.
    pub(crate) fn send(&self, command: Command) -> bool {
        if self.commands.send(command).is_err() {
            return false;
        }
        (self.waker)();
        true
    }
}

pub(crate) type Ready = SyncSender<Result<Waker, PlatformError>>;

/// Dispatcher-side state handed to [`Backend::run`](crate::Backend::run).
pub struct Pump {
    commands: Receiver<Command>,
    ready: Option<Ready>,
    registry: Registry,
    shutdown: bool,
}

impl Pump {
    pub(crate) fn new(commands: Receiver<Command>, ready: Ready, open_windows: Arc<AtomicUsize>) -> Self {
        Self {
            commands,
            ready: Some(ready),
            registry: Registry::new(open_windows),
            shutdown: false,
        }
    }

    /// Reports a successful connection. Unblocks `Display::open`.
    pub fn connected(&mut self, waker: Waker) {
        if let Some(ready) = self.ready.take() {
            let _ = ready.send(Ok(waker));
        }
    }

    /// Processes every queued command without blocking.
    pub fn drain(&mut self, target: &mut dyn NativeTarget) {
        loop {
            match self.commands.try_recv() {
                Ok(command) => self.handle(command, target),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.shutdown = true;
                    break;
                }
            }
        }
    }

    /// Blocks for the next command, then drains the rest. For backends
    /// without a native event source of their own.
    pub fn wait(&mut self, target: &mut dyn NativeTarget) {
        match self.commands.recv() {
            Ok(command) => {
                self.handle(command, target);
                self.drain(target);
            }
            Err(_) => self.shutdown = true,
        }
    }

    /// Delivers a native event for window `id`. Events for unknown windows
    /// are dropped.
    pub fn dispatch(&mut self, id: NativeId, event: NativeEvent, target: &mut dyn NativeTarget) {
        let Some(scene) = self.registry.get(id) else {
            log::debug!("dropping {event:?} for unknown window {id}");
            return;
        };
        match event {
            NativeEvent::Resized { width, height } => {
                if width == 0 || height == 0 {
                    return;
                }
                scene.set_size(width, height);
                scene.fire_resize(width, height);
            }
            NativeEvent::Click { x, y } => scene.fire_click(x, y),
            NativeEvent::KeyDown(key) => scene.fire_key_down(key),
            NativeEvent::KeyUp(key) => scene.fire_key_up(key),
            NativeEvent::Char(ch) => scene.fire_press(ch),
            NativeEvent::Expose => scene.expose(),
            NativeEvent::CloseRequested => self.close(id, target),
            NativeEvent::Destroyed => self.forget(id),
        }
    }

    /// True once shutdown was requested and no window is left.
    pub fn should_exit(&self) -> bool {
        self.shutdown && self.registry.is_empty()
    }

    fn handle(&mut self, command: Command, target: &mut dyn NativeTarget) {
        match command {
            Command::Open {
                scene,
                request,
                reply,
            } => {
                let result = target.create_window(&request);
                match &result {
                    Ok(id) => {
                        scene.attach(*id);
                        self.registry.insert(*id, scene);
                        log::info!(
                            "opened window {id} `{}` ({}x{})",
                            request.caption,
                            request.width,
                            request.height
                        );
                    }
                    Err(err) => log::error!("failed to open window `{}`: {err}", request.caption),
                }
                let _ = reply.send(result);
            }
            Command::Present { id, frame } => {
                if !self.registry.contains(id) {
                    return;
                }
                if let Err(err) = target.present(id, &frame) {
                    log::warn!("dropping frame for window {id}: {err}");
                }
            }
            Command::Close { id } => self.close(id, target),
            Command::Post { id, event } => self.dispatch(id, event, target),
            Command::Message { text, caption } => target.show_message(&text, &caption),
            Command::Sync { reply } => {
                let _ = reply.send(());
            }
            Command::Shutdown => {
                log::debug!("dispatcher shutdown requested");
                self.shutdown = true;
            }
        }
    }

    fn close(&mut self, id: NativeId, target: &mut dyn NativeTarget) {
        if self.registry.contains(id) {
            target.destroy_window(id);
            self.forget(id);
        }
    }

    fn forget(&mut self, id: NativeId) {
        if let Some(scene) = self.registry.remove(id) {
            scene.mark_closed();
            log::info!("closed window {id}");
        }
    }

    /// Reports a backend failure to a caller still waiting in `Display::open`.
    pub(crate) fn fail(&mut self, err: PlatformError) {
        if let Some(ready) = self.ready.take() {
            let _ = ready.send(Err(err));
        }
    }

    /// Marks every remaining scene closed after the backend stopped.
    pub(crate) fn finish(&mut self) {
        for id in self.registry.ids() {
            self.forget(id);
        }
    }
}
