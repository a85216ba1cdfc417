use std::sync::atomic::AtomicUsize;

use super::*;

fn headless() -> Display {
    Display::headless().unwrap().0
}

#[test]
fn options_builders_override_defaults() {
    let options = SceneOptions::new(300, 200, "demo")
        .with_canvas_size(2000, 2000)
        .with_backdrop(Color::BLACK)
        .with_caption("renamed")
        .with_size(320, 240);
    assert_eq!(options.width, 320);
    assert_eq!(options.height, 240);
    assert_eq!(options.caption, "renamed");
    assert_eq!(options.canvas_size, Some(Size::new(2000, 2000)));
    assert_eq!(options.backdrop, Color::BLACK);
    assert_eq!(SceneOptions::default().backdrop, Color::WHITE);
}

#[test]
fn minimum_size_is_enforced() {
    let display = headless();
    let err = Scene::new(&display, MIN_WIDTH - 1, 480, "narrow").unwrap_err();
    assert!(matches!(
        err,
        WindowCreationError::TooSmall {
            width: 239,
            min_width: MIN_WIDTH,
            ..
        }
    ));
    assert!(Scene::new(&display, MIN_WIDTH, MIN_HEIGHT, "smallest").is_ok());
}

#[test]
fn callback_can_replace_itself() {
    let display = headless();
    let scene = Scene::new(&display, 320, 240, "swap").unwrap();
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));

    let first_hits = Arc::clone(&first);
    let second_hits = Arc::clone(&second);
    scene.on_press(move |handle, _| {
        first_hits.fetch_add(1, Ordering::SeqCst);
        let second_hits = Arc::clone(&second_hits);
        handle.on_press(move |_, _| {
            second_hits.fetch_add(1, Ordering::SeqCst);
        });
    });

    scene.post_event(NativeEvent::Char('a'));
    scene.post_event(NativeEvent::Char('b'));
    scene.post_event(NativeEvent::Char('c'));
    display.sync();

    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 2);
}

#[test]
fn handle_outlives_scene_harmlessly() {
    let display = headless();
    let scene = Scene::new(&display, 320, 240, "gone").unwrap();
    let handle = scene.handle();
    assert!(!handle.is_closed());
    drop(scene);
    display.sync();

    assert!(handle.is_closed());
    assert_eq!(handle.size(), None);
    handle.refresh();
    handle.post_event(NativeEvent::Expose);
    assert_eq!(display.open_windows(), 0);
}

#[test]
fn oversized_canvas_is_rejected() {
    let display = headless();
    let options = SceneOptions::new(320, 240, "huge").with_canvas_size(100_000, 10);
    assert!(matches!(
        Scene::with_options(&display, options),
        Err(WindowCreationError::Surface(_))
    ));
    assert_eq!(display.open_windows(), 0);
}
