use easel::{Color, Display, SceneBuilder, Size, Surface};

#[test]
fn builder_configures_the_scene() {
    let (display, inspector) = Display::headless().unwrap();
    let scene = SceneBuilder::new()
        .title("builder")
        .size(400, 300)
        .canvas_size(800, 600)
        .backdrop(Color::BLACK)
        .build_on(&display)
        .unwrap();

    let id = scene.native_id().unwrap();
    let request = inspector.request(id).unwrap();
    assert_eq!(request.caption, "builder");
    assert_eq!((request.width, request.height), (400, 300));
    assert_eq!(scene.size(), Size::new(400, 300));
    assert_eq!(scene.background().unwrap().size(), Size::new(800, 600));

    scene.refresh();
    let frame = scene.last_frame().unwrap();
    assert_eq!(frame.size(), Size::new(400, 300));
    assert_eq!(frame.color_at(399, 299), Some(Color::BLACK));
}

#[test]
fn surfaces_drawn_outside_the_window_are_clipped() {
    let (display, _inspector) = Display::headless().unwrap();
    let scene = SceneBuilder::new()
        .size(300, 200)
        .build_on(&display)
        .unwrap();
    let sprite = Surface::with_position(50, 50, 280, 180).unwrap();
    sprite.fill(Color::RED);
    scene.background().unwrap().add_child(&sprite);

    scene.refresh();
    let frame = scene.last_frame().unwrap();

    assert_eq!(frame.color_at(299, 199), Some(Color::RED));
    assert_eq!(frame.color_at(279, 179), Some(Color::WHITE));
}
