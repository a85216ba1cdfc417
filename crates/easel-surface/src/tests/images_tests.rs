use super::*;

fn checker() -> Image {
    // 2x2: red, green / blue, white (transparent)
    Image::from_rgba(
        2,
        2,
        &[
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 255, 0,
        ],
    )
    .unwrap()
}

#[test]
fn from_rgba_checks_the_buffer_length() {
    let err = Image::from_rgba(2, 2, &[0; 15]).unwrap_err();
    assert!(matches!(
        err,
        ImageError::InvalidPixelData {
            expected: 16,
            got: 15
        }
    ));
}

#[test]
fn decode_rejects_garbage() {
    assert!(matches!(
        Image::decode(b"not an image"),
        Err(ImageError::Decode(_))
    ));
}

#[test]
fn draw_image_skips_transparent_pixels() {
    let mut canvas = Canvas::new(4, 4).unwrap();
    canvas.draw_image(&checker(), 1, 1).unwrap();
    assert_eq!(canvas.color_at(1, 1), Some(Color::RED.to_rgba()));
    assert_eq!(canvas.color_at(2, 1), Some(Color::GREEN.to_rgba()));
    assert_eq!(canvas.color_at(1, 2), Some(Color::BLUE.to_rgba()));
    assert!(!canvas.is_touched(2, 2));
    assert_eq!(canvas.touched_count(), 3);
}

#[test]
fn scaled_image_uses_nearest_neighbour() {
    let mut canvas = Canvas::new(4, 4).unwrap();
    canvas.draw_image_scaled(&checker(), 0, 0, 4, 4).unwrap();
    assert_eq!(canvas.color_at(1, 1), Some(Color::RED.to_rgba()));
    assert_eq!(canvas.color_at(3, 0), Some(Color::GREEN.to_rgba()));
    assert_eq!(canvas.color_at(0, 3), Some(Color::BLUE.to_rgba()));
    assert_eq!(canvas.touched_count(), 12);
}

#[test]
fn keyed_image_leaves_key_color_untouched() {
    let mut canvas = Canvas::new(2, 2).unwrap();
    canvas
        .draw_image_keyed(&checker(), 0, 0, 2, 2, Color::GREEN)
        .unwrap();
    assert!(canvas.is_touched(0, 0));
    assert!(!canvas.is_touched(1, 0));
    assert_eq!(canvas.touched_count(), 2);
}

#[test]
fn masked_image_copies_where_the_mask_is_dark() {
    let src = checker();
    let mask = Image::from_rgba(
        3,
        1,
        &[255, 255, 255, 255, 0, 0, 0, 255, 255, 255, 255, 255],
    )
    .unwrap();
    let mut canvas = Canvas::new(4, 4).unwrap();
    canvas
        .draw_image_masked(
            &src,
            &mask,
            Rect::new(2, 2, 2, 1),
            Point::new(0, 1),
            Point::new(0, 0),
        )
        .unwrap();
    assert!(!canvas.is_touched(2, 2));
    assert_eq!(canvas.color_at(3, 2), Some([255, 255, 255, 255]));
    assert_eq!(canvas.touched_count(), 1);
}

#[test]
fn masked_image_rejects_regions_outside_the_source() {
    let src = checker();
    let mask = checker();
    let mut canvas = Canvas::new(4, 4).unwrap();
    let err = canvas
        .draw_image_masked(
            &src,
            &mask,
            Rect::new(0, 0, 2, 2),
            Point::new(1, 0),
            Point::ORIGIN,
        )
        .unwrap_err();
    assert!(matches!(err, DrawError::InvalidImage(_)));
    assert_eq!(canvas.touched_count(), 0);
}

#[test]
fn images_placed_at_the_coordinate_limits_draw_nothing() {
    let src = checker();
    let mask = Image::from_rgba(2, 2, &[0; 16]).unwrap();
    let mut canvas = Canvas::new(4, 4).unwrap();
    canvas
        .draw_image_masked(
            &src,
            &mask,
            Rect::new(i32::MAX - 1, i32::MAX - 1, 2, 2),
            Point::ORIGIN,
            Point::ORIGIN,
        )
        .unwrap();
    canvas.draw_image(&src, i32::MAX - 1, i32::MIN).unwrap();
    canvas
        .draw_image_scaled(&src, 0, 0, u32::MAX, u32::MAX)
        .unwrap();
    assert!(canvas.is_touched(0, 0));
    assert!(canvas.is_touched(3, 3));
    assert_eq!(canvas.touched_count(), 16);
}
