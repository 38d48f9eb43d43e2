use jetplot_core::{Point, ShapeError};
use jetplot_designer::{Operation, ParsedPath, Shape, ShapeSnapshot, StylePatch};
use proptest::prelude::*;
use std::sync::Arc;

fn unresolved(reference: &str) -> Result<Arc<ParsedPath>, ShapeError> {
    Err(ShapeError::load_failed(reference, "unexpected load"))
}

fn operation() -> impl Strategy<Value = Operation> {
    let v = -100.0..100.0f64;
    let factor = 0.1..4.0f64;
    prop_oneof![
        4 => (v.clone(), v.clone()).prop_map(|(x, y)| Operation::AddPoint { x, y }),
        1 => Just(Operation::BeginSubpath),
        1 => (v.clone(), v).prop_map(|(dx, dy)| Operation::Translate { dx, dy }),
        1 => (factor.clone(), factor).prop_map(|(sx, sy)| Operation::Scale { sx, sy }),
        1 => "[a-z]{3,8}".prop_map(|color| Operation::SetColor { color }),
        1 => (1u32..10).prop_map(|d| Operation::SetStyle { patch: StylePatch::new().fill_density(d) }),
    ]
}

proptest! {
    #[test]
    fn prop_replay_is_idempotent(ops in prop::collection::vec(operation(), 0..40)) {
        let mut shape = Shape::new();
        for op in &ops {
            shape.apply(op);
        }

        let snapshot = shape.save();
        let mut replayed = Shape::new();
        replayed.restore_from(&snapshot, unresolved).unwrap();

        prop_assert_eq!(replayed.points(), shape.points());
        prop_assert_eq!(replayed.subpaths(), shape.subpaths());
        prop_assert_eq!(replayed.style(), shape.style());

        // A second round trip through JSON changes nothing either.
        let json = snapshot.to_json().unwrap();
        let mut again = Shape::new();
        again.restore_from(&ShapeSnapshot::from_json(&json).unwrap(), unresolved).unwrap();
        prop_assert_eq!(again.points().len(), shape.points().len());
        for (a, b) in again.points().iter().zip(shape.points()) {
            prop_assert!(a.distance_to(b) < 1e-6);
        }
    }

    #[test]
    fn prop_scale_then_inverse_restores(
        points in prop::collection::vec((-100.0..100.0f64, -100.0..100.0f64), 2..20),
        sx in 0.25..4.0f64,
        sy in 0.25..4.0f64,
    ) {
        let mut shape = Shape::new();
        for (x, y) in &points {
            shape.add_point(*x, *y);
        }
        let before = shape.points().to_vec();
        let center = shape.bounding_box().unwrap().center;

        shape.scale(sx, sy);
        let scaled_center = shape.bounding_box().unwrap().center;
        prop_assert!(scaled_center.distance_to(&center) < 1e-6);

        shape.scale(1.0 / sx, 1.0 / sy);
        for (a, b) in shape.points().iter().zip(&before) {
            prop_assert!(a.distance_to(b) < 1e-6, "{:?} vs {:?}", a, b);
        }
    }
}

#[test]
fn test_reused_square_under_new_transform() {
    let mut square = Shape::new();
    for (x, y) in [(170.0, 90.0), (320.0, 90.0), (320.0, 240.0), (170.0, 240.0), (170.0, 90.0)] {
        square.add_point(x, y);
    }
    let snapshot = square.save();

    let mut moved = Shape::new();
    moved.restore_from(&snapshot, unresolved).unwrap();
    moved.translate(150.0, 150.0);
    moved.set_color("magenta");

    assert_eq!(moved.points()[0], Point::new(320.0, 240.0));
    assert_eq!(square.points()[0], Point::new(170.0, 90.0));
    assert_eq!(moved.operation_log().len(), snapshot.operation_log.len() + 2);
}
