use super::*;

fn lit(img: &RgbaImage) -> impl Iterator<Item = (u32, u32, [u8; 4])> + '_ {
    img.enumerate_pixels()
        .filter(|(_, _, p)| p.0[3] != 0)
        .map(|(x, y, p)| (x, y, p.0))
}

#[test]
fn single_line_is_centered_horizontally() {
    let canvas = Canvas::new(200, 100);
    let spec = TextSpec::new("Hey", 16);
    let layer = render_text_layer(canvas, &spec, &FontChain::empty()).unwrap();

    let line = &layer.layout.lines[0];
    let width = line.width();
    assert!(width > 0);

    let left = lit(&layer.image).map(|(x, _, _)| x).min().unwrap() as i32;
    let right = lit(&layer.image)
        .filter(|(_, _, p)| *p == [255, 255, 255, 255])
        .map(|(x, _, _)| x)
        .max()
        .unwrap() as i32;

    assert_eq!(left, line.x);
    assert!((left - (200 - width) / 2).abs() <= 1);
    assert_eq!(right + 1 - left, width);
}

#[test]
fn block_height_and_vertical_centering_follow_font_size() {
    let canvas = Canvas::new(400, 300);
    let spec = TextSpec::new("A\nB", 20);
    let layer = render_text_layer(canvas, &spec, &FontChain::empty()).unwrap();
    let layout = &layer.layout;

    assert_eq!(layout.lines.len(), 2);
    assert!((layout.block_height - (1.2 * 20.0 * 2.0 - 0.2 * 20.0)).abs() < 1e-3);
    assert_eq!(layout.top, 128.0);
    assert!((layout.lines[1].y - layout.lines[0].y - 24.0).abs() < 1e-3);

    let centre = layout.top + layout.block_height / 2.0;
    assert!((centre - 150.0).abs() <= 1.0);
}

#[test]
fn every_line_centers_on_its_own_width() {
    let canvas = Canvas::new(300, 200);
    let spec = TextSpec::new("W\nWWWW", 16);
    let layer = render_text_layer(canvas, &spec, &FontChain::empty()).unwrap();
    let [short, long] = [&layer.layout.lines[0], &layer.layout.lines[1]];

    assert!(long.width() > short.width());
    assert_eq!(short.x, (300 - short.width()).div_euclid(2));
    assert_eq!(long.x, (300 - long.width()).div_euclid(2));
    assert!(short.x > long.x);
}

#[test]
fn shadow_sits_three_pixels_down_right_in_translucent_black() {
    let canvas = Canvas::new(120, 60);
    let spec = TextSpec::new("L", 24);
    let layer = render_text_layer(canvas, &spec, &FontChain::empty()).unwrap();

    let (qx, qy, _) = lit(&layer.image)
        .filter(|(_, _, p)| *p == [255, 255, 255, 255])
        .max_by_key(|(x, y, _)| (*y, *x))
        .unwrap();
    let shadow = layer.image.get_pixel(qx + 3, qy + 3).0;
    assert_eq!(shadow, [0, 0, 0, 180]);
}

#[test]
fn text_color_is_applied() {
    let canvas = Canvas::new(80, 40);
    let red = Rgba8::new(255, 0, 0, 255);
    let spec = TextSpec::new("X", 16).with_color(red);
    let layer = render_text_layer(canvas, &spec, &FontChain::empty()).unwrap();

    assert!(lit(&layer.image).any(|(_, _, p)| p == [255, 0, 0, 255]));
    assert!(!lit(&layer.image).any(|(_, _, p)| p == [255, 255, 255, 255]));
}

#[test]
fn empty_text_allocates_a_clear_layer() {
    let canvas = Canvas::new(64, 48);
    let layer = render_text_layer(canvas, &TextSpec::new("", 30), &FontChain::empty()).unwrap();

    assert_eq!(layer.image.dimensions(), (64, 48));
    assert_eq!(layer.layout.lines.len(), 1);
    assert_eq!(layer.layout.lines[0].width(), 0);
    assert_eq!(lit(&layer.image).count(), 0);
}

#[test]
fn oversized_font_is_clipped_not_rejected() {
    let canvas = Canvas::new(50, 40);
    let layer =
        render_text_layer(canvas, &TextSpec::new("HELLO", 500), &FontChain::empty()).unwrap();

    assert_eq!(layer.image.dimensions(), (50, 40));
    assert!(layer.layout.top < 0.0);
    assert!(layer.layout.lines[0].x < 0);
}

#[test]
fn missing_fonts_fall_back_with_warning() {
    let layer = render_text_layer(
        Canvas::new(100, 50),
        &TextSpec::new("ok", 16),
        &FontChain::from_paths(["/no/such/font.ttf"]),
    )
    .unwrap();

    assert_eq!(layer.warnings.len(), 1);
    assert!(layer.warnings[0].contains("/no/such/font.ttf"));
    assert_eq!(layer.font_label, "built-in 8x8 bitmap");
    assert!(lit(&layer.image).count() > 0);
}

#[test]
fn y_override_replaces_only_the_top() {
    let canvas = Canvas::new(100, 100);
    let spec = TextSpec::new("a\nb", 10);
    let centered = render_text_layer(canvas, &spec, &FontChain::empty()).unwrap();
    let pinned = render_text_layer_at(canvas, &spec, &FontChain::empty(), Some(5.0)).unwrap();

    assert_eq!(pinned.layout.top, 5.0);
    assert_eq!(pinned.layout.lines[0].y, 5.0);
    assert_eq!(pinned.layout.lines[0].x, centered.layout.lines[0].x);
}

#[test]
fn zero_font_size_is_rejected() {
    let err = render_text_layer(Canvas::new(10, 10), &TextSpec::new("x", 0), &FontChain::empty())
        .unwrap_err();
    assert_eq!(err.kind(), crate::ErrorKind::Validation);
}
