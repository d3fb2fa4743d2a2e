use cropstack::{
    DrawCall, InMemorySink, LineEvents, RecordingContext, ScenePlan, ScriptedEvents, Session,
    Sketch, SketchConfig, SketchEvent,
};
use rand::{SeedableRng, rngs::StdRng};

fn check_pass(cfg: &SketchConfig, plan: &ScenePlan, ctx: &RecordingContext) {
    let n = f64::from(cfg.shape_count);
    let step = cfg.step();

    assert!((0.0..100.0).contains(&plan.palette.hue));
    assert!((90.0..100.0).contains(&plan.palette.saturation));

    for (i, r) in plan.rects.iter().enumerate() {
        let fi = i as f64;
        assert_eq!(r.color.s, plan.palette.saturation - fi * (100.0 / n));
        assert_eq!(r.color.b, 10.0 + fi * ((100.0 - 8.0) / n));
        let roll = r.roll.unwrap();
        assert!((cfg.rotate_min..=cfg.rotate_max).contains(&r.rotation_deg.abs()));
        assert_eq!(r.rotation_deg < 0.0, roll > 0.5);
    }
    for pair in plan.rects.windows(2) {
        let dec = pair[0].vertical_start - pair[1].vertical_start;
        assert!(dec >= step / 2.0 - 1e-9 && dec <= 1.5 * step + 1e-9);
    }

    let census = ctx.census();
    assert_eq!(census.backgrounds, 1);
    assert_eq!(census.ellipses, 1);
    assert_eq!(census.rects, 8 + 300 * 300 + 30);
    assert_eq!(census.open_saves, 0);

    let Some(DrawCall::Background { color }) = ctx.calls().first() else {
        panic!("first call must clear the frame");
    };
    assert_eq!(*color, cfg.background);
}

#[test]
fn every_click_is_an_independent_full_pass() {
    let sketch = Sketch::new(SketchConfig::default()).unwrap();
    let mut session = Session::new(&sketch);
    let mut ctx = RecordingContext::new(sketch.config().canvas());
    let mut rng = StdRng::seed_from_u64(2024);

    let first = session.on_ready(&mut ctx, &mut rng).unwrap().unwrap();
    check_pass(sketch.config(), &first.plan, &ctx);

    let mut palettes = vec![first.plan.palette];
    for i in 0u32..4 {
        let pass = session
            .on_pointer_pressed(f64::from(i), 0.0, &mut ctx, &mut rng)
            .unwrap();
        assert_eq!(pass.index, u64::from(i) + 1);
        assert!(matches!(pass.trigger, SketchEvent::PointerPressed { .. }));
        check_pass(sketch.config(), &pass.plan, &ctx);
        palettes.push(pass.plan.palette);
    }

    palettes.dedup();
    assert_eq!(palettes.len(), 5);
}

#[test]
fn scripted_session_without_pixels_pushes_no_frames() {
    let sketch = Sketch::new(SketchConfig::default()).unwrap();
    let mut session = Session::new(&sketch);
    let mut ctx = RecordingContext::new(sketch.config().canvas());
    let mut sink = InMemorySink::new();
    let mut events = ScriptedEvents::new([
        SketchEvent::Ready,
        SketchEvent::Ready,
        SketchEvent::PointerPressed { x: 1.0, y: 2.0 },
    ]);

    let passes = session
        .run(
            &mut events,
            &mut ctx,
            &mut StdRng::seed_from_u64(8),
            &mut sink,
        )
        .unwrap();
    assert_eq!(passes, 2);
    assert!(sink.frames().is_empty());
    assert!(sink.ended());
}

#[test]
fn line_driven_session_renders_per_line() {
    let sketch = Sketch::new(SketchConfig {
        canvas_size: 32,
        ..SketchConfig::default()
    })
    .unwrap();
    let mut session = Session::new(&sketch);
    let mut canvas = cropstack::CpuCanvas::new(sketch.config().canvas()).unwrap();
    let mut sink = InMemorySink::new();
    let mut events = LineEvents::new("\n10 10\nquit\n".as_bytes());

    let passes = session
        .run(
            &mut events,
            &mut canvas,
            &mut StdRng::seed_from_u64(9),
            &mut sink,
        )
        .unwrap();
    assert_eq!(passes, 3);
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| *i).collect();
    assert_eq!(idx, vec![0, 1, 2]);
    assert!(sink.frames().iter().all(|(_, f)| f.is_opaque()));
}
