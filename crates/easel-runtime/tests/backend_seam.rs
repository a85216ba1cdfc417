use std::sync::{Arc, Mutex};

use easel_runtime::{
    Backend, ConnectError, Display, NativeEvent, NativeId, NativeTarget, PlatformError, Pump,
    Scene, WindowRequest,
};
use easel_surface::Pixmap;

/// Records every call the pump makes, optionally rejecting frames.
struct Recorder {
    calls: Arc<Mutex<Vec<String>>>,
    next_id: u64,
    reject_frames: bool,
}

impl NativeTarget for Recorder {
    fn create_window(&mut self, request: &WindowRequest) -> Result<NativeId, PlatformError> {
        self.next_id += 1;
        self.calls
            .lock()
            .unwrap()
            .push(format!("create {} {}x{}", request.caption, request.width, request.height));
        Ok(NativeId::new(self.next_id))
    }

    fn present(&mut self, id: NativeId, frame: &Pixmap) -> Result<(), PlatformError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("present {} {}x{}", id.get(), frame.width(), frame.height()));
        if self.reject_frames {
            Err(PlatformError::Present("surface lost".into()))
        } else {
            Ok(())
        }
    }

    fn destroy_window(&mut self, id: NativeId) {
        self.calls.lock().unwrap().push(format!("destroy {}", id.get()));
    }
}

struct Scripted {
    calls: Arc<Mutex<Vec<String>>>,
    reject_frames: bool,
}

impl Backend for Scripted {
    fn run(self: Box<Self>, pump: &mut Pump) -> Result<(), PlatformError> {
        pump.connected(Arc::new(|| {}));
        let mut target = Recorder {
            calls: self.calls,
            next_id: 0,
            reject_frames: self.reject_frames,
        };
        pump.dispatch(NativeId::new(99), NativeEvent::Expose, &mut target);
        while !pump.should_exit() {
            pump.wait(&mut target);
        }
        Ok(())
    }
}

struct Refuses;

impl Backend for Refuses {
    fn run(self: Box<Self>, _pump: &mut Pump) -> Result<(), PlatformError> {
        Err(PlatformError::Connection("no display server".into()))
    }
}

struct Silent;

impl Backend for Silent {
    fn run(self: Box<Self>, _pump: &mut Pump) -> Result<(), PlatformError> {
        Ok(())
    }
}

fn scripted(reject_frames: bool) -> (Display, Arc<Mutex<Vec<String>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let display = Display::open(Scripted {
        calls: Arc::clone(&calls),
        reject_frames,
    })
    .unwrap();
    (display, calls)
}

#[test]
fn connection_failure_is_reported() {
    let err = Display::open(Refuses).unwrap_err();
    assert!(matches!(
        err,
        ConnectError::Platform(PlatformError::Connection(_))
    ));
}

#[test]
fn backend_that_never_connects_is_reported() {
    assert!(matches!(
        Display::open(Silent),
        Err(ConnectError::DispatcherExited)
    ));
}

#[test]
fn pump_drives_the_native_target() {
    let (display, calls) = scripted(false);
    let scene = Scene::new(&display, 320, 240, "seam").unwrap();
    scene.refresh();
    drop(scene);
    display.sync();

    assert_eq!(
        *calls.lock().unwrap(),
        vec!["create seam 320x240", "present 1 320x240", "destroy 1"]
    );
}

#[test]
fn present_failures_are_swallowed() {
    let (display, calls) = scripted(true);
    let scene = Scene::new(&display, 320, 240, "lossy").unwrap();
    scene.refresh();
    scene.refresh();
    display.sync();

    assert!(!scene.is_closed());
    assert_eq!(display.open_windows(), 1);
    let presents = calls
        .lock()
        .unwrap()
        .iter()
        .filter(|call| call.starts_with("present"))
        .count();
    assert_eq!(presents, 2);
}

#[test]
fn platform_destroy_notification_closes_without_destroying_again() {
    let (display, calls) = scripted(false);
    let scene = Scene::new(&display, 320, 240, "destroyed").unwrap();

    scene.post_event(NativeEvent::Destroyed);
    display.sync();
    assert!(scene.is_closed());

    drop(scene);
    display.sync();
    assert!(!calls.lock().unwrap().iter().any(|call| call.starts_with("destroy")));
}

#[test]
fn dropping_the_last_display_stops_the_backend() {
    let (display, _calls) = scripted(false);
    let scene = Scene::new(&display, 320, 240, "last").unwrap();
    let second = display.clone();
    drop(scene);
    second.sync();
    assert_eq!(second.open_windows(), 0);
    drop(display);
    // Joins the dispatcher; hangs if the backend ignored the shutdown.
    drop(second);
}

/// Target that panics on the first frame it is given.
#[derive(Default)]
struct Fragile {
    next_id: u64,
}

impl NativeTarget for Fragile {
    fn create_window(&mut self, _request: &WindowRequest) -> Result<NativeId, PlatformError> {
        self.next_id += 1;
        Ok(NativeId::new(self.next_id))
    }

    fn present(&mut self, _id: NativeId, _frame: &Pixmap) -> Result<(), PlatformError> {
        panic!("native surface vanished");
    }

    fn destroy_window(&mut self, _id: NativeId) {}
}

struct FragileBackend;

impl Backend for FragileBackend {
    fn run(self: Box<Self>, pump: &mut Pump) -> Result<(), PlatformError> {
        pump.connected(Arc::new(|| {}));
        let mut target = Fragile::default();
        while !pump.should_exit() {
            pump.wait(&mut target);
        }
        Ok(())
    }
}

#[test]
fn backend_panic_closes_every_scene() {
    let display = Display::open(FragileBackend).unwrap();
    let first = Scene::new(&display, 320, 240, "first").unwrap();
    let second = Scene::new(&display, 320, 240, "second").unwrap();

    first.refresh();
    display.sync();

    assert!(first.is_closed());
    assert!(second.is_closed());
    assert_eq!(display.open_windows(), 0);
    assert!(Scene::new(&display, 320, 240, "third").is_err());
}
