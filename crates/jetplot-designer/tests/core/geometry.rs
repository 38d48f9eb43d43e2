use jetplot_core::Point;
use jetplot_designer::geometry::{arc, circle, cubic_bezier, quadratic_bezier, rectangle};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f64> {
    -1000.0..1000.0f64
}

proptest! {
    #[test]
    fn prop_circle_is_closed(cx in coord(), cy in coord(), r in 0.1..500.0f64, segments in 3usize..200) {
        let points = circle(Point::new(cx, cy), r, segments);
        prop_assert_eq!(points.len(), segments + 1);
        prop_assert_eq!(points[0], points[segments]);
    }

    #[test]
    fn prop_arc_points_lie_on_circle(r in 0.1..500.0f64, total in -6.0..6.0f64, start in -720.0..720.0f64, segments in 1usize..100) {
        let center = Point::new(10.0, -20.0);
        for p in arc(center, r, total, segments, start) {
            prop_assert!((p.distance_to(&center) - r).abs() < 1e-6);
        }
    }

    #[test]
    fn prop_cubic_ends_exactly_on_target(
        x0 in coord(), y0 in coord(), x1 in coord(), y1 in coord(),
        x2 in coord(), y2 in coord(), x3 in coord(), y3 in coord(),
        segments in 1usize..100,
    ) {
        let end = Point::new(x3, y3);
        let points = cubic_bezier(Point::new(x0, y0), Point::new(x1, y1), Point::new(x2, y2), end, segments);
        prop_assert_eq!(points.len(), segments);
        prop_assert_eq!(*points.last().unwrap(), end);
    }

    #[test]
    fn prop_quadratic_ends_exactly_on_target(x in coord(), y in coord(), segments in 1usize..100) {
        let end = Point::new(x, y);
        let points = quadratic_bezier(Point::default(), Point::new(1.0, 2.0), end, segments);
        prop_assert_eq!(*points.last().unwrap(), end);
    }
}

#[test]
fn test_rectangle_corners() {
    let points = rectangle(Point::new(170.0, 90.0), 150.0, 150.0);
    assert_eq!(points.first(), points.last());
    assert_eq!(points[2], Point::new(320.0, 240.0));
}
