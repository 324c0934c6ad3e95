use super::*;
use crate::{
    foundation::core::Size,
    measure::{EstimatedMeasure, measure_fn},
    text::segment::italic_spans,
};

fn chapter(id: &str, text: &str) -> TextBlock {
    TextBlock::new(id, text, 10.0, 6.0, Rect::new(0.0, 0.0, 200.0, 100.0))
}

// Every line is 10px tall per 10pt of font size.
fn lines_measure() -> impl TextMeasure {
    measure_fn(|segs: &[Segment], size, _| {
        let text = crate::text::segment::flatten(segs);
        let lines = text.lines().count().max(1) as f64;
        Ok(Size::new(50.0, lines * size))
    })
}

#[test]
fn saga_chapters_are_fit_then_distributed() {
    let job = CardLayoutJob {
        name: Some("Saga".to_string()),
        blocks: vec![
            chapter("i", "Heroic — a\nb\nc\nd\ne"),
            chapter("ii", "x\ny\nz\nw\nv\nu"),
            chapter("iii", "q\nr\ns\nt"),
        ],
        fit: FitOptions::default(),
        distribution: Some(DistributionSpec {
            region: Rect::new(0.0, 0.0, 200.0, 300.0),
            spacing: Spacing::Fixed {
                edge_gap: 10.0,
                inside_gap: Some(20.0),
            },
            exclusion: None,
            dividers: true,
        }),
        ability_words: None,
    };

    let engine = LayoutEngine::default();
    let out = engine.layout_card(&job, &mut lines_measure()).unwrap();

    assert_eq!(out.blocks.len(), 3);
    assert_eq!(italic_spans(&out.blocks[0].segments), vec!["Heroic"]);
    assert_eq!(out.font_size("ii"), Some(10.0));

    let plan = out.plan.as_ref().unwrap();
    assert_eq!(plan.tops(), vec![10.0, 80.0, 160.0]);
    assert_eq!(out.dividers.len(), 2);
    assert_eq!(out.dividers[0].center_y, 70.0);
    assert!(out.warnings.is_empty());
}

#[test]
fn warnings_from_every_stage_are_collected() {
    let job = CardLayoutJob {
        name: None,
        blocks: vec![TextBlock::new(
            "rules",
            "Flying (unclosed",
            10.0,
            6.0,
            Rect::new(0.0, 0.0, 200.0, 1.0),
        )],
        fit: FitOptions::default(),
        distribution: Some(DistributionSpec {
            region: Rect::new(0.0, 0.0, 200.0, 5.0),
            spacing: Spacing::Fixed {
                edge_gap: 0.0,
                inside_gap: None,
            },
            exclusion: None,
            dividers: false,
        }),
        ability_words: None,
    };

    let out = LayoutEngine::default()
        .layout_card(&job, &mut lines_measure())
        .unwrap();
    assert_eq!(out.font_size("rules"), Some(6.0));
    assert!(matches!(out.warnings[0], Warning::MalformedInput { .. }));
    assert!(matches!(out.warnings[1], Warning::FitUnattainable { .. }));
    assert!(matches!(out.warnings[2], Warning::Overflow { .. }));
    assert!(out.dividers.is_empty());
    assert!(out.into_strict().is_err());
}

#[test]
fn job_ability_words_override_engine_table() {
    let mut job = CardLayoutJob {
        name: None,
        blocks: vec![chapter("r", "Boast — Draw a card.")],
        fit: FitOptions::default(),
        distribution: None,
        ability_words: None,
    };
    let engine = LayoutEngine::default();

    let out = engine.layout_card(&job, &mut lines_measure()).unwrap();
    assert!(italic_spans(&out.blocks[0].segments).is_empty());

    job.ability_words = Some(AbilityWordTable::from_words(["Boast"]).unwrap());
    let out = engine.layout_card(&job, &mut lines_measure()).unwrap();
    assert_eq!(italic_spans(&out.blocks[0].segments), vec!["Boast"]);
    assert!(out.plan.is_none());
}

#[test]
fn flavor_is_classified_italic_and_fit_with_rules() {
    let job = CardLayoutJob {
        name: None,
        blocks: vec![chapter("r", "Flying").with_flavor("Wings.")],
        fit: FitOptions::default(),
        distribution: None,
        ability_words: None,
    };
    let out = LayoutEngine::default()
        .layout_card(&job, &mut lines_measure())
        .unwrap();
    let b = &out.blocks[0];
    assert_eq!(italic_spans(&b.flavor_segments), vec!["Wings."]);
    // 10 rules + 10 gap + 10 flavor
    assert_eq!(b.fit.measured.height, 30.0);
    assert_eq!(b.fit.divider_offset, Some(15.0));
    assert_eq!(b.bounds.height(), 30.0);
}

#[test]
fn invalid_jobs_fail_fast() {
    let job = CardLayoutJob {
        name: None,
        blocks: vec![chapter("a", "x"), chapter("a", "y")],
        fit: FitOptions::default(),
        distribution: None,
        ability_words: None,
    };
    let err = LayoutEngine::default()
        .layout_card(&job, &mut lines_measure())
        .unwrap_err();
    assert!(err.to_string().contains("duplicate block id"));

    let job = CardLayoutJob {
        blocks: vec![chapter("a", "x")],
        distribution: Some(DistributionSpec {
            region: Rect::new(0.0, 0.0, 10.0, 10.0),
            spacing: Spacing::Auto {
                outside_gap: Some(-1.0),
            },
            exclusion: None,
            dividers: false,
        }),
        ..job
    };
    assert!(matches!(
        LayoutEngine::default().layout_card(&job, &mut lines_measure()),
        Err(TypesetError::InvalidConfiguration(_))
    ));
}

#[test]
fn batch_results_match_sequential_results() {
    let jobs = (0..6)
        .map(|i| CardLayoutJob {
            name: Some(format!("card {i}")),
            blocks: vec![TextBlock::new(
                "rules",
                "Landfall — Whenever a land you control enters, put a +1/+1 counter on target creature. (It grows.)"
                    .repeat(i + 1),
                12.0,
                5.0,
                Rect::new(0.0, 0.0, 180.0, 80.0),
            )],
            fit: FitOptions::default(),
            distribution: None,
            ability_words: None,
        })
        .collect::<Vec<_>>();

    let engine = LayoutEngine::default();
    let batch = engine
        .layout_batch(&jobs, NonZeroUsize::new(3), EstimatedMeasure::default)
        .unwrap();
    assert_eq!(batch.len(), jobs.len());
    for (job, got) in jobs.iter().zip(batch) {
        let want = engine
            .layout_card(job, &mut EstimatedMeasure::default())
            .unwrap();
        assert_eq!(got.unwrap(), want);
    }
}

#[test]
fn single_worker_batch_keeps_job_order_and_isolates_failures() {
    let good = |name: &str| CardLayoutJob {
        name: Some(name.to_string()),
        blocks: vec![chapter("r", "Flying")],
        fit: FitOptions::default(),
        distribution: None,
        ability_words: None,
    };
    let mut bad = good("bad");
    bad.blocks.push(chapter("r", "dup"));
    let jobs = vec![good("a"), bad, good("c")];

    let out = LayoutEngine::default()
        .layout_batch(&jobs, NonZeroUsize::new(1), EstimatedMeasure::default)
        .unwrap();
    assert_eq!(out[0].as_ref().unwrap().name.as_deref(), Some("a"));
    assert!(matches!(out[1], Err(TypesetError::InvalidConfiguration(_))));
    assert_eq!(out[2].as_ref().unwrap().name.as_deref(), Some("c"));
}
