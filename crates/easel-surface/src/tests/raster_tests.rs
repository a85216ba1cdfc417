use std::time::{Duration, Instant};

use super::*;
use crate::canvas::MAX_DIMENSION;
use easel_graphics::{Brush, Pen};

fn canvas(width: u32, height: u32) -> Canvas {
    Canvas::new(width, height).unwrap()
}

fn fill_only(canvas: &mut Canvas, color: Color) {
    canvas.set_pen(Pen::transparent());
    canvas.set_brush(Brush::solid(color));
}

#[test]
fn thin_line_touches_every_step() {
    let mut c = canvas(10, 10);
    c.line(0, 5, 9, 5).unwrap();
    assert_eq!(c.touched_count(), 10);
    assert!((0..10).all(|x| c.is_touched(x, 5)));
}

#[test]
fn line_reaches_both_endpoints() {
    let mut c = canvas(120, 40);
    c.line(0, 0, 100, 30).unwrap();
    assert!(c.is_touched(0, 0));
    assert!(c.is_touched(100, 30));
    assert!(!c.is_touched(100, 0));
}

#[test]
fn wide_line_is_thicker() {
    let mut thin = canvas(20, 20);
    thin.line(2, 10, 17, 10).unwrap();
    let mut wide = canvas(20, 20);
    wide.set_pen(Pen::new(5, Color::BLACK));
    wide.line(2, 10, 17, 10).unwrap();
    assert!(wide.touched_count() > thin.touched_count() * 3);
    assert!(wide.is_touched(10, 12));
}

#[test]
fn transparent_pen_draws_no_line() {
    let mut c = canvas(10, 10);
    c.set_pen(Pen::transparent());
    c.line(0, 0, 9, 9).unwrap();
    c.arc(0, 0, 10, 10, 0.0, 360.0).unwrap();
    assert_eq!(c.touched_count(), 0);
}

#[test]
fn rect_outline_stays_inside_the_box() {
    let mut c = canvas(10, 10);
    c.rect(2, 2, 8, 8).unwrap();
    assert!(c.is_touched(2, 2));
    assert!(c.is_touched(7, 7));
    assert!(!c.is_touched(8, 8));
    assert!(!c.is_touched(5, 5));
    assert_eq!(c.touched_count(), 20);
}

#[test]
fn rect_fill_covers_the_half_open_box() {
    let mut c = canvas(10, 10);
    fill_only(&mut c, Color::GREEN);
    c.rect(8, 8, 2, 2).unwrap();
    assert_eq!(c.touched_count(), 36);
    assert_eq!(c.color_at(5, 5), Some(Color::GREEN.to_rgba()));
}

#[test]
fn outline_is_drawn_over_the_fill() {
    let mut c = canvas(10, 10);
    c.set_pen(Pen::new(1, Color::RED));
    c.set_brush(Brush::solid(Color::BLUE));
    c.rect(0, 0, 10, 10).unwrap();
    assert_eq!(c.color_at(0, 0), Some(Color::RED.to_rgba()));
    assert_eq!(c.color_at(5, 5), Some(Color::BLUE.to_rgba()));
}

#[test]
fn degenerate_boxes_draw_nothing() {
    let mut c = canvas(10, 10);
    fill_only(&mut c, Color::RED);
    c.rect(3, 3, 3, 8).unwrap();
    c.ellipse(1, 1, 9, 1).unwrap();
    c.rounded_rect(4, 4, 4, 4, 2, 2).unwrap();
    assert_eq!(c.touched_count(), 0);
}

#[test]
fn ellipse_fill_excludes_corners() {
    let mut c = canvas(20, 20);
    fill_only(&mut c, Color::BLUE);
    c.ellipse(0, 0, 20, 20).unwrap();
    assert!(c.is_touched(10, 10));
    assert!(c.is_touched(0, 10));
    assert!(!c.is_touched(0, 0));
    assert!(!c.is_touched(19, 19));
}

#[test]
fn rounded_rect_trims_corners_only() {
    let mut c = canvas(20, 20);
    fill_only(&mut c, Color::BLUE);
    c.rounded_rect(0, 0, 20, 20, 10, 10).unwrap();
    assert!(!c.is_touched(0, 0));
    assert!(c.is_touched(10, 0));
    assert!(c.is_touched(0, 10));
    assert!(c.is_touched(10, 10));
}

#[test]
fn pie_fills_the_requested_quadrant() {
    let mut c = canvas(20, 20);
    fill_only(&mut c, Color::RED);
    c.pie(0, 0, 20, 20, 0.0, 90.0).unwrap();
    assert!(c.is_touched(15, 5));
    assert!(!c.is_touched(5, 5));
    assert!(!c.is_touched(15, 15));
}

#[test]
fn negative_sweep_runs_clockwise() {
    let mut c = canvas(20, 20);
    fill_only(&mut c, Color::RED);
    c.pie(0, 0, 20, 20, 0.0, -90.0).unwrap();
    assert!(c.is_touched(15, 15));
    assert!(!c.is_touched(15, 5));
}

#[test]
fn chord_fill_stops_at_the_chord() {
    let mut c = canvas(20, 20);
    fill_only(&mut c, Color::RED);
    c.chord(0, 0, 20, 20, 0.0, 90.0).unwrap();
    // Beyond the chord from (20, 10) to (10, 0).
    assert!(c.is_touched(17, 3));
    // Inside the sector but on the centre side of the chord.
    assert!(!c.is_touched(11, 9));
    assert!(!c.is_touched(5, 15));
}

#[test]
fn zero_sweep_chord_fills_nothing() {
    let mut c = canvas(20, 20);
    fill_only(&mut c, Color::RED);
    c.chord(0, 0, 20, 20, 45.0, 0.0).unwrap();
    assert_eq!(c.touched_count(), 0);
}

#[test]
fn arc_draws_only_the_swept_part_of_the_ring() {
    let mut c = canvas(21, 21);
    c.set_pen(Pen::new(2, Color::BLACK));
    c.arc(0, 0, 21, 21, 0.0, 180.0).unwrap();
    assert!(c.is_touched(10, 0));
    assert!(!c.is_touched(10, 20));
    assert!(!c.is_touched(10, 10));
}

#[test]
fn extreme_line_endpoints_draw_the_visible_part() {
    let mut c = canvas(10, 10);
    c.line(-2_000_000_000, 0, 2_000_000_000, 0).unwrap();
    assert_eq!(c.touched_count(), 10);
    assert!((0..10).all(|x| c.is_touched(x, 0)));

    let mut c = canvas(10, 10);
    c.line(i32::MIN, i32::MIN, i32::MAX, i32::MAX).unwrap();
    assert!(c.is_touched(0, 0));
    assert!(c.is_touched(9, 9));
}

#[test]
fn long_line_cost_is_bounded_by_the_canvas() {
    let mut c = canvas(10, 10);
    let started = Instant::now();
    c.line(0, 0, 400_000_000, 1).unwrap();
    assert!(started.elapsed() < Duration::from_secs(1));
    assert!((0..10).all(|x| c.is_touched(x, 0)));
    assert_eq!(c.touched_count(), 10);
}

#[test]
fn line_far_outside_touches_nothing() {
    let mut c = canvas(10, 10);
    c.line(-500, -500, -400, 2_000_000_000).unwrap();
    assert_eq!(c.touched_count(), 0);
}

#[test]
fn shapes_with_extreme_corners_cover_the_canvas() {
    let mut c = canvas(10, 10);
    fill_only(&mut c, Color::GREEN);
    c.rect(i32::MIN, i32::MIN, i32::MAX, i32::MAX).unwrap();
    assert_eq!(c.touched_count(), 100);

    let mut c = canvas(10, 10);
    fill_only(&mut c, Color::GREEN);
    c.ellipse(-2_000_000_000, -2_000_000_000, 2_000_000_000, 2_000_000_000).unwrap();
    assert_eq!(c.touched_count(), 100);
}

#[test]
fn huge_pen_width_is_clamped() {
    let mut c = canvas(10, 10);
    c.set_pen(Pen::new(1 << 31, Color::BLACK));
    assert_eq!(c.pen().width, MAX_DIMENSION);
    c.rect(0, 0, 5, 5).unwrap();
    assert_eq!(c.touched_count(), 25);

    c.line(2, 2, 3, 3).unwrap();
    assert_eq!(c.touched_count(), 100);
}
