use super::*;

fn m() -> EstimatedMeasure {
    EstimatedMeasure {
        advance_em: 0.5,
        italic_factor: 1.0,
        line_height_em: 1.0,
    }
}

#[test]
fn single_line_width_counts_every_glyph() {
    // 5 glyphs * 10px * 0.5em
    let s = m().measure(&[Segment::plain("ab cd")], 10.0, None).unwrap();
    assert_eq!(s, Size::new(25.0, 10.0));
}

#[test]
fn explicit_breaks_add_lines_and_trailing_break_does_not() {
    let s = m()
        .measure(&[Segment::plain("ab\n\ncd\n")], 10.0, None)
        .unwrap();
    assert_eq!(s.height, 30.0);
    assert_eq!(s.width, 10.0);
}

#[test]
fn greedy_wrap_breaks_at_spaces() {
    // "aaaa" = 20px; "aaaa aaaa" = 45px > 30px limit.
    let s = m()
        .measure(&[Segment::plain("aaaa aaaa aaaa")], 10.0, Some(30.0))
        .unwrap();
    assert_eq!(s.height, 30.0);
    assert_eq!(s.width, 20.0);
}

#[test]
fn overlong_word_stays_on_its_own_line() {
    let s = m()
        .measure(&[Segment::plain("aaaaaaaaaa b")], 10.0, Some(20.0))
        .unwrap();
    assert_eq!(s.height, 20.0);
    assert_eq!(s.width, 50.0);
}

#[test]
fn italic_factor_narrows_italic_runs() {
    let mut est = EstimatedMeasure {
        italic_factor: 0.5,
        ..m()
    };
    let s = est
        .measure(&[Segment::plain("aa"), Segment::italic("aa")], 10.0, None)
        .unwrap();
    assert_eq!(s.width, 15.0);
}

#[test]
fn smaller_size_never_measures_taller() {
    let text = [Segment::plain(
        "Whenever a creature you control dies, draw a card and lose 1 life.",
    )];
    let mut est = EstimatedMeasure::default();
    let mut prev = f64::INFINITY;
    for size in [12.0, 11.0, 10.0, 9.0, 8.0, 7.0] {
        let h = est.measure(&text, size, Some(200.0)).unwrap().height;
        assert!(h <= prev, "height grew at size {size}");
        prev = h;
    }
}

#[test]
fn empty_text_is_zero_sized_and_bad_size_fails() {
    assert_eq!(m().measure(&[], 10.0, None).unwrap(), Size::ZERO);
    assert!(m().measure(&[Segment::plain("a")], 0.0, None).is_err());
}

#[test]
fn validate_rejects_non_positive_metrics() {
    assert!(EstimatedMeasure::default().validate().is_ok());
    let bad = EstimatedMeasure {
        line_height_em: 0.0,
        ..EstimatedMeasure::default()
    };
    assert!(bad.validate().is_err());
}

#[test]
fn closures_adapt_into_measurers() {
    let mut calls = 0;
    let mut f = measure_fn(|segs: &[Segment], size, _| {
        calls += 1;
        Ok(Size::new(segs.len() as f64, size))
    });
    let s = f.measure(&[Segment::plain("x")], 7.0, None).unwrap();
    assert_eq!(s, Size::new(1.0, 7.0));
    drop(f);
    assert_eq!(calls, 1);
}
