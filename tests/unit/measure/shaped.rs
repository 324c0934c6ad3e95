use super::*;
use crate::{
    fit::{BlockText, FitOptions, FitStatus, TextBlock, fit},
    foundation::core::Rect,
};

const REGULAR: &[u8] = include_bytes!("../../data/fonts/DejaVuSansMono.ttf");
const OBLIQUE: &[u8] = include_bytes!("../../data/fonts/DejaVuSansMono-Oblique.ttf");

const RULES: &str = "Whenever a creature enters, draw a card and then discard a card.";

fn measurer() -> ParleyMeasure {
    ParleyMeasure::new(REGULAR).unwrap()
}

#[test]
fn garbage_font_bytes_are_rejected() {
    let err = ParleyMeasure::new(b"definitely not a font")
        .err()
        .expect("garbage bytes must not register a family");
    assert!(err.to_string().contains("invalid configuration:"));
}

#[test]
fn fixture_font_registers_its_family() {
    let m = measurer();
    assert!(m.family_name().contains("DejaVu Sans Mono"));
}

#[test]
fn narrower_wrap_width_is_taller() {
    let mut m = measurer();
    let text = [Segment::plain(RULES)];
    let wide = m.measure(&text, 12.0, Some(400.0)).unwrap();
    let narrow = m.measure(&text, 12.0, Some(80.0)).unwrap();
    let unwrapped = m.measure(&text, 12.0, None).unwrap();
    assert!(narrow.height > wide.height, "{narrow:?} vs {wide:?}");
    assert!(wide.height >= unwrapped.height);
    assert!(unwrapped.width > 400.0);
}

#[test]
fn height_does_not_grow_as_size_shrinks() {
    let mut m = measurer();
    let text = [Segment::plain(RULES)];
    let mut last = f64::INFINITY;
    for size in [16.0, 14.0, 12.0, 10.0, 8.0, 6.0] {
        let s = m.measure(&text, size, Some(200.0)).unwrap();
        assert!(s.height > 0.0);
        assert!(s.height <= last, "size {size}: {} > {last}", s.height);
        last = s.height;
    }
}

#[test]
fn line_heights_are_summed() {
    let mut m = measurer();
    let one = m.measure(&[Segment::plain("Flying")], 10.0, None).unwrap();
    let two = m
        .measure(&[Segment::plain("Flying\nVigilance")], 10.0, None)
        .unwrap();
    assert!((two.height - 2.0 * one.height).abs() < 1e-3, "{one:?} {two:?}");
}

#[test]
fn italic_segments_shape_with_an_italic_face() {
    let mut m = measurer();
    let family = m.register_font(OBLIQUE).unwrap();
    assert!(family.contains("DejaVu Sans Mono"));

    let mixed = [
        Segment::plain("Flying "),
        Segment::italic("(This creature can fly.)"),
    ];
    let s = m.measure(&mixed, 10.0, None).unwrap();
    let plain = m
        .measure(&[Segment::plain("Flying (This creature can fly.)")], 10.0, None)
        .unwrap();
    assert!(s.width > 0.0 && s.height > 0.0);
    // monospace faces share one advance, so styling must not change the line count
    assert!((s.height - plain.height).abs() < plain.height * 0.5);
}

#[test]
fn non_positive_size_is_rejected() {
    let mut m = measurer();
    assert!(m.measure(&[Segment::plain("x")], 0.0, None).is_err());
}

#[test]
fn fit_with_shaped_text_reaches_fits() {
    let block = TextBlock::new("rules", RULES, 24.0, 6.0, Rect::new(0.0, 0.0, 150.0, 60.0));
    let out = fit(
        &mut measurer(),
        &block,
        &BlockText::plain(&block),
        &FitOptions::default(),
    )
    .unwrap();
    assert_eq!(out.status, FitStatus::Fits);
    assert!(out.font_size < 24.0 && out.font_size >= 6.0);
    assert!(out.measured.height <= 60.0);
    assert!(out.iterations > 1);
}
