use jetplot_core::{MemorySource, Point, ShapeError};
use jetplot_designer::{
    CommandKind, PixmapSurface, Plotter, PlotterOptions, ShapeKind, StylePatch,
};
use std::sync::Arc;

fn plotter() -> Plotter<PixmapSurface> {
    let source = MemorySource::new().with("badge", "M10 10 h20 v20 h-20 z");
    Plotter::new(
        PixmapSurface::new(640, 480, 2.0).unwrap(),
        Arc::new(source),
        PlotterOptions::default(),
    )
}

#[tokio::test]
async fn test_operations_without_shape() {
    let mut plotter = plotter();
    assert_eq!(plotter.translate(1.0, 1.0).unwrap_err(), ShapeError::NoActiveShape);
    assert_eq!(plotter.scale(2.0, 2.0).unwrap_err(), ShapeError::NoActiveShape);
    assert_eq!(plotter.color("red").unwrap_err(), ShapeError::NoActiveShape);
    assert_eq!(
        plotter.style(StylePatch::new().fill_density(2)).unwrap_err(),
        ShapeError::NoActiveShape
    );
    assert_eq!(plotter.line_to(5.0, 5.0).unwrap_err(), ShapeError::NoActiveShape);
    assert_eq!(plotter.save().await.unwrap_err(), ShapeError::NoActiveShape);
    assert!(matches!(plotter.stroke().await, Err(ShapeError::NoActiveShape)));
    assert!(matches!(plotter.fill(4).await, Err(ShapeError::NoActiveShape)));
}

#[tokio::test]
async fn test_curve_needs_current_point() {
    let mut plotter = plotter();
    let _ = plotter.load_path("badge");
    let err = plotter
        .cubic_bezier_to(1.0, 1.0, 2.0, 2.0, 3.0, 3.0)
        .unwrap_err();
    assert_eq!(err, ShapeError::NoCurrentPoint);
}

#[tokio::test]
async fn test_path_with_bezier() {
    let mut plotter = plotter();
    plotter
        .move_to(100.0, 100.0)
        .cubic_bezier_to(250.0, 100.0, 150.0, 250.0, 350.0, 350.0)
        .unwrap()
        .stroke()
        .await
        .unwrap();

    let shape = &plotter.finalized_shapes()[0];
    assert_eq!(shape.kind, ShapeKind::Outline);
    assert_eq!(shape.subpaths[0].len(), 1 + 50);
    assert_eq!(shape.subpaths[0].last(), Some(&Point::new(350.0, 350.0)));
}

#[tokio::test]
async fn test_reuse_saved_square() {
    let mut plotter = plotter();
    let square = plotter.rect(170.0, 90.0, 150.0, 150.0).save().await.unwrap();
    plotter.stroke().await.unwrap();

    plotter.use_snapshot(&square).color("cyan").unwrap().stroke().await.unwrap();
    plotter
        .use_snapshot(&square)
        .translate(150.0, 150.0)
        .unwrap()
        .color("magenta")
        .unwrap()
        .fill(10)
        .await
        .unwrap();

    let shapes = plotter.finalized_shapes();
    assert_eq!(shapes.len(), 3);
    assert_eq!(shapes[1].subpaths, shapes[0].subpaths);
    assert_eq!(shapes[1].style.color.as_deref(), Some("cyan"));
    assert_eq!(shapes[2].kind, ShapeKind::Stipple);
    assert_eq!(shapes[2].style.fill_density, Some(10));
    assert!(!shapes[2].dots.is_empty());
    assert!(shapes[2]
        .dots
        .iter()
        .all(|p| p.x >= 320.0 && p.x <= 470.0 && p.y >= 240.0 && p.y <= 390.0));

    let layers = plotter.commands().layers();
    let colors: Vec<_> = layers.iter().map(|l| l.color.as_str()).collect();
    assert_eq!(colors, vec!["red", "cyan", "magenta"]);
}

#[tokio::test]
async fn test_loaded_path_is_translated_after_load() {
    let mut plotter = plotter();
    let load = plotter.load_path("badge");
    plotter.translate(100.0, 0.0).unwrap();
    plotter.stroke().await.unwrap();
    load.await.unwrap();

    let shape = &plotter.finalized_shapes()[0];
    assert_eq!(shape.subpaths[0][0], Point::new(110.0, 10.0));
}

#[tokio::test]
async fn test_failed_load_surfaces_on_stroke() {
    let mut plotter = plotter();
    let _ = plotter.load_path("unknown");
    match plotter.stroke().await {
        Err(ShapeError::LoadFailed { reference, .. }) => assert_eq!(reference, "unknown"),
        other => panic!("expected LoadFailed, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_draw_and_commands() {
    let mut plotter = plotter();
    plotter.circle(320.0, 240.0, 50.0).stroke().await.unwrap();
    plotter.rect(350.0, 150.0, 25.0, 25.0).fill(10).await.unwrap();

    let stream = plotter.commands();
    assert_eq!(stream.commands()[0].command, CommandKind::MoveTo);
    assert_eq!(stream.layers().len(), 2);

    plotter.draw();
    let surface = plotter.into_surface();
    // Rightmost point of the circle at (370, 240) in device pixels.
    assert_ne!(surface.pixel(740, 480), Some([255, 255, 255]));
}

#[test]
fn test_primitive_sent_to_stopped_shape_fails_stroke() {
    let source = MemorySource::new();
    let mut plotter = Plotter::new(
        PixmapSurface::new(640, 480, 2.0).unwrap(),
        Arc::new(source),
        PlotterOptions::default(),
    );

    // The shape task dies with the runtime that spawned it.
    let first = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    first.block_on(async {
        plotter.circle(320.0, 240.0, 50.0);
    });
    drop(first);

    plotter.rect(10.0, 10.0, 20.0, 20.0);

    let second = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    second.block_on(async {
        assert_eq!(plotter.save().await.unwrap_err(), ShapeError::Detached);
        assert_eq!(
            plotter.stroke().await.map(|_| ()).unwrap_err(),
            ShapeError::Detached
        );
        assert!(!plotter.has_active_shape());

        plotter.circle(320.0, 240.0, 50.0).stroke().await.unwrap();
        assert_eq!(plotter.finalized_shapes().len(), 1);
    });
}
