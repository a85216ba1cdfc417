use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle, ThreadId};

use crate::backend::Backend;
use crate::dispatcher::{Command, Link, Pump};
use crate::error::{ConnectError, PlatformError};
use crate::headless::{HeadlessBackend, HeadlessInspector};
use crate::lock;

const DISPATCHER_THREAD_NAME: &str = "easel-dispatcher";

/// A connection to a display, served by one dispatcher thread.
///
/// Cloning is cheap. Every [`Scene`](crate::Scene) keeps its display alive;
/// when the last handle drops the dispatcher is asked to stop, finishes
/// once no window is left, and is joined.
#[derive(Clone)]
pub struct Display {
    shared: Arc<DisplayShared>,
}

pub(crate) struct DisplayShared {
    link: Link,
    dispatcher: ThreadId,
    thread: Mutex<Option<JoinHandle<()>>>,
    open_windows: Arc<AtomicUsize>,
}

impl Display {
    /// Spawns the dispatcher thread running `backend` and waits until it
    /// is connected.
    pub fn open(backend: impl Backend) -> Result<Self, ConnectError> {
        let backend: Box<dyn Backend> = Box::new(backend);
        let (commands_tx, commands_rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let open_windows = Arc::new(AtomicUsize::new(0));
        let published = Arc::clone(&open_windows);

        let handle = thread::Builder::new()
            .name(DISPATCHER_THREAD_NAME.to_string())
            .spawn(move || {
                let mut pump = Pump::new(commands_rx, ready_tx, published);
                match panic::catch_unwind(AssertUnwindSafe(|| backend.run(&mut pump))) {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => {
                        log::error!("display backend stopped: {err}");
                        pump.fail(err);
                    }
                    Err(_) => {
                        log::error!("display backend panicked");
                        pump.fail(PlatformError::Connection("backend panicked".to_string()));
                    }
                }
                pump.finish();
                log::debug!("dispatcher thread exiting");
            })
            .map_err(ConnectError::ThreadSpawn)?;

        let waker = match ready_rx.recv() {
            Ok(Ok(waker)) => waker,
            Ok(Err(err)) => {
                let _ = handle.join();
                return Err(ConnectError::Platform(err));
            }
            Err(_) => {
                let _ = handle.join();
                return Err(ConnectError::DispatcherExited);
            }
        };
        log::debug!("display connected");

        Ok(Self {
            shared: Arc::new(DisplayShared {
                link: Link::new(commands_tx, waker),
                dispatcher: handle.thread().id(),
                thread: Mutex::new(Some(handle)),
                open_windows,
            }),
        })
    }

    /// Opens a display without native windows. The inspector observes the
    /// frames presented to it.
    pub fn headless() -> Result<(Self, HeadlessInspector), ConnectError> {
        let backend = HeadlessBackend::new();
        let inspector = backend.inspector();
        Ok((Self::open(backend)?, inspector))
    }

    /// Blocks until every command queued before this call was processed.
    /// Does nothing on the dispatcher thread.
    pub fn sync(&self) {
        if self.is_dispatcher_thread() {
            return;
        }
        let (reply_tx, reply_rx) = mpsc::sync_channel(1);
        if self.shared.link.send(Command::Sync { reply: reply_tx }) {
            let _ = reply_rx.recv();
        }
    }

    /// Shows a notification through the backend without waiting for it.
    pub fn show_message(&self, text: impl Into<String>, caption: impl Into<String>) {
        let sent = self.shared.link.send(Command::Message {
            text: text.into(),
            caption: caption.into(),
        });
        if !sent {
            log::warn!("dispatcher stopped; message not shown");
        }
    }

    /// Number of windows currently registered with the dispatcher.
    pub fn open_windows(&self) -> usize {
        self.shared.open_windows.load(Ordering::SeqCst)
    }

    pub fn is_dispatcher_thread(&self) -> bool {
        thread::current().id() == self.shared.dispatcher
    }

    pub(crate) fn link(&self) -> &Link {
        &self.shared.link
    }
}

impl fmt::Debug for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Display")
            .field("dispatcher", &self.shared.dispatcher)
            .field("open_windows", &self.open_windows())
            .finish()
    }
}

impl Drop for DisplayShared {
    fn drop(&mut self) {
        self.link.send(Command::Shutdown);
        let Some(handle) = lock(&self.thread).take() else {
            return;
        };
        if thread::current().id() == self.dispatcher {
            // Dropped from a callback; the loop exits on its own.
            return;
        }
        if handle.join().is_err() {
            log::error!("dispatcher thread panicked");
        }
    }
}
