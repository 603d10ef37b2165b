use polygon_annotate::mapper::CoordinateMapper;
use polygon_annotate::palette::Palette;
use polygon_annotate::render::{Frame, RenderSettings, Renderer, CLOSE_HINT};
use polygon_annotate::session::DEFAULT_CLOSURE_THRESHOLD;
use polygon_annotate::surface::{DrawOp, RecordingSurface};
use polygon_annotate::{AnnotationSession, PlaceOutcome, Point, SessionState};

fn harness() -> (AnnotationSession, Renderer, CoordinateMapper) {
    let palette = Palette::default();
    (
        AnnotationSession::new(palette.clone(), DEFAULT_CLOSURE_THRESHOLD),
        Renderer::new(palette, RenderSettings::default()),
        // canvas placed 20px right and 64px down in the window
        CoordinateMapper::new(Point::new(20.0, 64.0)),
    )
}

fn click(session: &mut AnnotationSession, mapper: &CoordinateMapper, x: f32, y: f32) -> PlaceOutcome {
    session.place_point(mapper.to_surface(Point::new(x + 20.0, y + 64.0)))
}

#[test]
fn triangle_commit_end_to_end() {
    let (mut session, renderer, mapper) = harness();
    let palette = session.palette().clone();

    assert_eq!(click(&mut session, &mapper, 10.0, 10.0), PlaceOutcome::Started);
    assert_eq!(click(&mut session, &mapper, 100.0, 10.0), PlaceOutcome::Extended);
    assert_eq!(click(&mut session, &mapper, 100.0, 100.0), PlaceOutcome::Extended);
    session.hover(mapper.to_surface(Point::new(32.0, 76.0)));

    let mut surface = RecordingSurface::new(800.0, 550.0);
    renderer.render(&mut surface, &Frame::of(&session));
    assert!(surface.texts().any(|(t, _)| t == CLOSE_HINT));

    let outcome = click(&mut session, &mapper, 12.0, 12.0);
    assert!(matches!(outcome, PlaceOutcome::NeedsTag(ref r) if r.vertex_count == 3));

    // the prompt is still open; the frame keeps showing the chain
    renderer.render(&mut surface, &Frame::of(&session));
    assert_eq!(session.state(), SessionState::AwaitingTag);

    let polygon = session.resolve_tag(Some("  ")).expect("commit").clone();
    assert_eq!(polygon.tag(), "None");
    assert_eq!(polygon.color(), &palette.color_for(0));
    assert_eq!(polygon.points().len(), 3);
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.chain().is_empty());
    assert_eq!(session.pending_point(), None);

    renderer.render(&mut surface, &Frame::of(&session));
    let (_, at) = surface
        .texts()
        .find(|(t, _)| *t == "1")
        .expect("centroid label");
    assert!((at.x - 70.0).abs() < 1e-4);
    assert!((at.y - 40.0).abs() < 1e-4);
    assert!(!surface.texts().any(|(t, _)| t == CLOSE_HINT));
}

#[test]
fn two_points_and_near_click_is_a_third_vertex() {
    let (mut session, _, mapper) = harness();
    click(&mut session, &mapper, 10.0, 10.0);
    click(&mut session, &mapper, 100.0, 10.0);
    assert_eq!(click(&mut session, &mapper, 12.0, 12.0), PlaceOutcome::Extended);
    assert_eq!(session.chain().len(), 3);
    assert!(session.polygons().is_empty());
}

#[test]
fn several_polygons_then_reset() {
    let (mut session, renderer, mapper) = harness();
    for k in 0..3 {
        let ox = k as f32 * 150.0;
        click(&mut session, &mapper, ox + 10.0, 10.0);
        click(&mut session, &mapper, ox + 110.0, 10.0);
        click(&mut session, &mapper, ox + 60.0, 90.0);
        click(&mut session, &mapper, ox + 11.0, 12.0);
        let tag = format!(" roi{k} ");
        session.resolve_tag(Some(tag.as_str()));
    }
    let tags: Vec<&str> = session.polygons().iter().map(|p| p.tag()).collect();
    assert_eq!(tags, ["roi0", "roi1", "roi2"]);

    let mut surface = RecordingSurface::new(800.0, 550.0);
    renderer.render(&mut surface, &Frame::of(&session));
    let fills = surface
        .ops()
        .iter()
        .filter(|op| matches!(op, DrawOp::FillPath { closed: true, .. }))
        .count();
    assert_eq!(fills, 3);

    session.reset();
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.polygons().is_empty());
    assert_eq!(session.active_color(), &session.palette().first());

    renderer.render(&mut surface, &Frame::of(&session));
    assert!(!surface
        .ops()
        .iter()
        .any(|op| matches!(op, DrawOp::FillPath { .. } | DrawOp::Circle { .. })));
}
