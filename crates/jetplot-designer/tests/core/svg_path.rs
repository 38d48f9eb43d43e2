use jetplot_core::{PathError, Point};
use jetplot_designer::{parse_path, PathParser, PathSegment};

#[test]
fn test_closed_triangle() {
    let parsed = parse_path("M0 0 L10 0 L10 10 Z").unwrap();
    assert_eq!(
        parsed.points(),
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 0.0),
        ]
    );
}

#[test]
fn test_smooth_cubic_reflection() {
    let parsed = parse_path("M0 0 C0 10 10 10 10 0 S20 -10 20 0").unwrap();
    let second = parsed
        .segments()
        .iter()
        .filter_map(|s| match s {
            PathSegment::Cubic { ctrl1, .. } => Some(*ctrl1),
            _ => None,
        })
        .nth(1)
        .unwrap();
    assert_eq!(second, Point::new(10.0, -10.0));
}

#[test]
fn test_compact_notation_matches_spaced() {
    let compact = parse_path("M10,10l5-5h-2.5v.5.5z").unwrap();
    let spaced = parse_path("M 10 10 l 5 -5 h -2.5 v 0.5 0.5 z").unwrap();
    assert_eq!(compact.points(), spaced.points());
}

#[test]
fn test_curve_resolution_is_configurable() {
    let coarse = PathParser::new(5).parse("M0 0 C0 10 10 10 10 0").unwrap();
    let fine = PathParser::new(40).parse("M0 0 C0 10 10 10 10 0").unwrap();
    assert_eq!(coarse.point_count(), 6);
    assert_eq!(fine.point_count(), 41);
}

#[test]
fn test_multi_subpath_icon() {
    let parsed = parse_path("M2 2 H22 V22 H2 Z M6 6 H18 V18 H6 Z").unwrap();
    assert_eq!(parsed.subpaths().len(), 2);
    assert!(parsed.subpaths().iter().all(|s| s.first() == s.last()));
}

#[test]
fn test_errors_report_position() {
    match parse_path("M0 0 L10 10 K5") {
        Err(PathError::MalformedPath {
            character, offset, ..
        }) => {
            assert_eq!(character, 'K');
            assert_eq!(offset, 12);
        }
        other => panic!("expected malformed path, got {:?}", other),
    }
}
