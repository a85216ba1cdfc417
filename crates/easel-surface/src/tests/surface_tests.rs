use super::*;

fn surface(width: u32, height: u32) -> Surface {
    Surface::new(width, height).unwrap()
}

#[test]
fn creation_errors_are_reported() {
    assert!(matches!(
        Surface::new(0, 5),
        Err(SurfaceCreationError::Empty { .. })
    ));
    assert!(matches!(
        Surface::new(5, 20_000),
        Err(SurfaceCreationError::TooLarge { .. })
    ));
}

#[test]
fn clones_share_pixels() {
    let a = surface(10, 10);
    let b = a.clone();
    b.line(0, 0, 9, 0).unwrap();
    assert_eq!(a.draw(|canvas| canvas.touched_count()), 10);
    assert_eq!(a, b);
    assert_ne!(a, surface(10, 10));
}

#[test]
fn move_round_trip_restores_position() {
    let s = Surface::with_position(4, 4, 7, -3).unwrap();
    s.move_by(5, 9);
    assert_eq!(s.position(), Point::new(12, 6));
    s.move_by(-5, -9);
    assert_eq!((s.x(), s.y()), (7, -3));
    s.move_to(1, 2);
    assert_eq!(s.position(), Point::new(1, 2));
}

#[test]
fn add_child_to_itself_is_ignored() {
    let s = surface(4, 4);
    s.add_child(&s);
    assert!(s.children().is_empty());
}

#[test]
fn re_adding_a_child_keeps_its_first_position() {
    let parent = surface(8, 8);
    let a = surface(2, 2);
    let b = surface(2, 2);
    parent.add_child(&a);
    parent.add_child(&b);
    parent.add_child(&a);
    assert_eq!(parent.children(), vec![a.clone(), b.clone()]);

    assert!(parent.remove_child(&a));
    assert!(!parent.remove_child(&a));
    assert_eq!(parent.children(), vec![b]);
}

#[test]
fn dropped_children_are_pruned() {
    let parent = surface(8, 8);
    let kept = surface(2, 2);
    {
        let temporary = surface(2, 2);
        parent.add_child(&temporary);
        parent.add_child(&kept);
    }
    assert_eq!(parent.children(), vec![kept]);
}

#[test]
fn surfaces_created_after_a_child_dropped_are_appended() {
    let parent = surface(8, 8);
    let first = surface(2, 2);
    let kept = surface(2, 2);
    parent.add_child(&first);
    parent.add_child(&kept);
    drop(first);

    let later = surface(2, 2);
    parent.add_child(&later);
    assert_eq!(parent.children(), vec![kept.clone(), later.clone()]);

    let after_prune = surface(2, 2);
    parent.add_child(&after_prune);
    assert_eq!(parent.children(), vec![kept, later, after_prune]);
}

#[test]
fn failed_set_font_keeps_previous_font() {
    let s = surface(8, 8);
    let before = s.font();
    assert!(s.set_font(30.0, "definitely-not-installed-xyz", Color::RED).is_err());
    assert_eq!(s.font(), before);
}

#[test]
fn render_puts_the_tree_on_white() {
    let root = surface(10, 10);
    let child = Surface::with_position(3, 3, 4, 4).unwrap();
    child.fill(Color::BLUE);
    root.add_child(&child);

    let frame = root.render().unwrap();

    assert_eq!(frame.pixel(0, 0), Some([255, 255, 255, 255]));
    assert_eq!(frame.color_at(5, 5), Some(Color::BLUE));
    assert_eq!(frame.color_at(7, 7), Some(Color::WHITE));
}
