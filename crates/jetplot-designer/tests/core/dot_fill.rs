use jetplot_core::Point;
use jetplot_designer::geometry::{circle, rectangle};
use jetplot_designer::{DotFill, PixmapSurface};

fn surface() -> PixmapSurface {
    PixmapSurface::new(200, 200, 2.0).unwrap()
}

#[test]
fn test_rectangle_count_matches_area() {
    let rect = rectangle(Point::new(20.0, 30.0), 40.0, 25.0);
    let dots = DotFill::default().sample(&[rect], 1, &surface());
    let expected = 40.0 * 25.0;
    assert!((dots.len() as f64 - expected).abs() <= expected * 0.05, "{} dots", dots.len());
}

#[test]
fn test_density_scales_inverse_square() {
    let rect = vec![rectangle(Point::new(0.0, 0.0), 60.0, 60.0)];
    let fill = DotFill::default();
    let base = fill.sample(&rect, 1, &surface()).len() as f64;

    for d in [2u32, 3, 5] {
        let count = fill.sample(&rect, d, &surface()).len() as f64;
        let expected = base / f64::from(d * d);
        assert!((count - expected).abs() <= expected * 0.2, "density {}: {}", d, count);
    }
}

#[test]
fn test_dots_stay_inside_circle() {
    let center = Point::new(100.0, 100.0);
    let outline = circle(center, 30.0, 64);
    let dots = DotFill::default().sample(&[outline], 4, &surface());

    assert!(!dots.is_empty());
    assert!(dots.iter().all(|p| p.distance_to(&center) <= 30.0));
}

#[test]
fn test_row_major_order() {
    let rect = vec![rectangle(Point::new(0.0, 0.0), 10.0, 10.0)];
    let dots = DotFill::default().sample(&rect, 2, &surface());
    for pair in dots.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        assert!(a.y < b.y || (a.y == b.y && a.x < b.x));
    }
}

#[test]
fn test_finer_device_grid() {
    let rect = vec![rectangle(Point::new(0.0, 0.0), 10.0, 10.0)];
    let coarse = DotFill::new(2.0, 2).sample(&rect, 1, &surface()).len();
    let fine = DotFill::new(2.0, 1).sample(&rect, 1, &surface()).len();
    assert_eq!(coarse, 100);
    assert_eq!(fine, 400);
}
