use async_trait::async_trait;
use jetplot_core::{LoadCause, MemorySource, PathError, PathSource, Point, ShapeError, SourceError};
use jetplot_designer::{PathLoader, PathParser, ShapeHandle};
use std::sync::Arc;
use std::time::Duration;

/// Serves path data after a delay.
struct SlowSource {
    inner: MemorySource,
    delay: Duration,
}

#[async_trait]
impl PathSource for SlowSource {
    async fn fetch_path_data(&self, reference: &str) -> Result<String, SourceError> {
        tokio::time::sleep(self.delay).await;
        self.inner.fetch_path_data(reference).await
    }
}

fn slow_loader(delay_ms: u64) -> Arc<PathLoader> {
    let source = SlowSource {
        inner: MemorySource::new().with("tick", "M0 0 L10 0"),
        delay: Duration::from_millis(delay_ms),
    };
    Arc::new(PathLoader::new(Arc::new(source), PathParser::default()))
}

#[tokio::test]
async fn test_translate_after_slow_load_applies_after_it() {
    let handle = ShapeHandle::spawn(slow_loader(50));
    handle.add_point(0.0, 0.0).unwrap();
    let load = handle.load_external_path("tick");
    handle.translate(100.0, 0.0).unwrap();

    let points = handle.snapshot_points().await.unwrap();
    assert_eq!(
        points,
        vec![
            Point::new(100.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(110.0, 0.0),
        ]
    );
    load.await.unwrap();
}

#[tokio::test]
async fn test_finalize_waits_for_load() {
    let handle = ShapeHandle::spawn(slow_loader(20));
    let _load = handle.load_external_path("tick");
    let finalized = handle.finalize_as_outline().await.unwrap();
    assert_eq!(finalized.subpaths, vec![vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]]);
}

#[tokio::test]
async fn test_missing_reference_fails_save() {
    let handle = ShapeHandle::spawn(slow_loader(1));
    let load = handle.load_external_path("nope");
    let save = handle.save();

    assert!(load.await.is_err());
    match save.await {
        Err(ShapeError::LoadFailed { reference, cause }) => {
            assert_eq!(reference, "nope");
            assert!(matches!(cause, LoadCause::Source(SourceError::NotFound { .. })));
        }
        other => panic!("expected LoadFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_path_reports_character_and_offset() {
    let source = MemorySource::new().with("bad", "M0 0 X5 5");
    let loader = Arc::new(PathLoader::new(Arc::new(source), PathParser::default()));
    let handle = ShapeHandle::spawn(loader);

    let err = handle.load_external_path("bad").await.unwrap_err();
    assert!(matches!(
        err.path_error(),
        Some(PathError::MalformedPath { character: 'X', offset: 5, .. })
    ));
    match handle.finalize_as_outline().await {
        Err(ShapeError::LoadFailed {
            cause: LoadCause::Path(PathError::MalformedPath { character, offset, .. }),
            ..
        }) => assert_eq!((character, offset), ('X', 5)),
        other => panic!("expected malformed path, got {:?}", other),
    }
}
