//! Per-shape sequential task queue.
//!
//! Every [`Shape`] lives inside its own tokio task. A [`ShapeHandle`] sends
//! it work over an unbounded channel and the task applies that work strictly
//! in send order. External path loads are awaited inside the task, so a
//! `translate` sent after a slow load still lands after the loaded points.
//!
//! Once a load fails the queue is poisoned: later mutations are skipped and
//! every request that returns data reports the failure.

use crate::loader::PathLoader;
use crate::shape::{FinalizedShape, Operation, Shape, ShapeSnapshot, StylePatch};
use crate::svg_path::ParsedPath;
use jetplot_core::{Point, ShapeError};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, oneshot};
use tracing::Instrument;
use uuid::Uuid;

/// Identifies one shape task in log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(Uuid);

impl ShapeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

type Reply<T> = oneshot::Sender<Result<T, ShapeError>>;

enum ShapeTask {
    Apply(Operation),
    Load {
        reference: String,
        reply: Reply<()>,
    },
    Save {
        reply: Reply<ShapeSnapshot>,
    },
    Restore {
        snapshot: ShapeSnapshot,
        reply: Reply<()>,
    },
    FinalizeOutline {
        reply: Reply<FinalizedShape>,
    },
    FinalizeStipple {
        density: u32,
        reply: Reply<FinalizedShape>,
    },
    Points {
        reply: Reply<Vec<Point>>,
    },
}

/// Result of a queued request, available once the task reaches it.
///
/// Dropping it does not cancel the request.
#[must_use = "pending results do nothing unless awaited"]
pub struct Pending<T> {
    rx: oneshot::Receiver<Result<T, ShapeError>>,
}

/// Completion of an external path load.
pub type PendingLoad = Pending<()>;

impl<T> Future for Pending<T> {
    type Output = Result<T, ShapeError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(ShapeError::Detached)))
    }
}

/// Sender side of a shape task.
#[derive(Clone)]
pub struct ShapeHandle {
    id: ShapeId,
    tx: mpsc::UnboundedSender<ShapeTask>,
}

impl ShapeHandle {
    /// Spawns the task owning a new empty shape.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(loader: Arc<PathLoader>) -> Self {
        let id = ShapeId::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let actor = ShapeActor {
            shape: Shape::new(),
            loader,
            failed: None,
        };

        let span = tracing::debug_span!("shape", id = %id);
        tokio::spawn(actor.run(rx).instrument(span));
        tracing::debug!("Spawned shape task {}", id);

        Self { id, tx }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    fn send(&self, task: ShapeTask) -> Result<(), ShapeError> {
        self.tx.send(task).map_err(|_| ShapeError::Detached)
    }

    fn request<T>(&self, make: impl FnOnce(Reply<T>) -> ShapeTask) -> Pending<T> {
        let (reply, rx) = oneshot::channel();
        // A closed channel drops `reply`, which the pending side reports as detached.
        let _ = self.tx.send(make(reply));
        Pending { rx }
    }

    pub fn apply(&self, op: Operation) -> Result<(), ShapeError> {
        self.send(ShapeTask::Apply(op))
    }

    pub fn add_point(&self, x: f64, y: f64) -> Result<(), ShapeError> {
        self.apply(Operation::AddPoint { x, y })
    }

    pub fn add_points(&self, points: &[Point]) -> Result<(), ShapeError> {
        points.iter().try_for_each(|p| self.add_point(p.x, p.y))
    }

    pub fn begin_subpath(&self) -> Result<(), ShapeError> {
        self.apply(Operation::BeginSubpath)
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Result<(), ShapeError> {
        self.apply(Operation::Translate { dx, dy })
    }

    pub fn scale(&self, sx: f64, sy: f64) -> Result<(), ShapeError> {
        self.apply(Operation::Scale { sx, sy })
    }

    pub fn set_color(&self, color: impl Into<String>) -> Result<(), ShapeError> {
        self.apply(Operation::SetColor {
            color: color.into(),
        })
    }

    pub fn set_style(&self, patch: StylePatch) -> Result<(), ShapeError> {
        self.apply(Operation::SetStyle { patch })
    }

    /// Queues a load of `reference`. Work sent afterwards waits for it.
    pub fn load_external_path(&self, reference: impl Into<String>) -> PendingLoad {
        let reference = reference.into();
        self.request(|reply| ShapeTask::Load { reference, reply })
    }

    pub fn save(&self) -> Pending<ShapeSnapshot> {
        self.request(|reply| ShapeTask::Save { reply })
    }

    /// Replaces the shape with a replay of `snapshot`, loading any
    /// external paths it references.
    pub fn restore_from(&self, snapshot: ShapeSnapshot) -> Pending<()> {
        self.request(|reply| ShapeTask::Restore { snapshot, reply })
    }

    pub fn finalize_as_outline(&self) -> Pending<FinalizedShape> {
        self.request(|reply| ShapeTask::FinalizeOutline { reply })
    }

    pub fn finalize_as_stipple(&self, density: u32) -> Pending<FinalizedShape> {
        self.request(|reply| ShapeTask::FinalizeStipple { density, reply })
    }

    /// Current points, once every earlier task has run.
    pub fn snapshot_points(&self) -> Pending<Vec<Point>> {
        self.request(|reply| ShapeTask::Points { reply })
    }
}

impl fmt::Debug for ShapeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeHandle").field("id", &self.id).finish()
    }
}

struct ShapeActor {
    shape: Shape,
    loader: Arc<PathLoader>,
    failed: Option<ShapeError>,
}

impl ShapeActor {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<ShapeTask>) {
        while let Some(task) = rx.recv().await {
            self.handle(task).await;
        }
        tracing::debug!("Shape task finished");
    }

    fn check(&self) -> Result<(), ShapeError> {
        match &self.failed {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn poison(&mut self, err: ShapeError) -> ShapeError {
        tracing::warn!("{}", err);
        self.failed = Some(err.clone());
        err
    }

    async fn load(&self, reference: &str) -> Result<Arc<ParsedPath>, ShapeError> {
        self.loader
            .load(reference)
            .await
            .map_err(|e| ShapeError::load_failed(reference, e))
    }

    async fn handle(&mut self, task: ShapeTask) {
        match task {
            ShapeTask::Apply(op) => {
                if self.failed.is_some() {
                    tracing::debug!("Skipping {} on failed shape", op.name());
                    return;
                }
                tracing::debug!("Applying {}", op.name());
                self.shape.apply(&op);
            }
            ShapeTask::Load { reference, reply } => {
                let _ = reply.send(self.handle_load(&reference).await);
            }
            ShapeTask::Save { reply } => {
                let _ = reply.send(self.check().map(|_| self.shape.save()));
            }
            ShapeTask::Restore { snapshot, reply } => {
                let _ = reply.send(self.handle_restore(&snapshot).await);
            }
            ShapeTask::FinalizeOutline { reply } => {
                let result = self.check().map(|_| self.shape.finalize_as_outline());
                let _ = reply.send(result);
            }
            ShapeTask::FinalizeStipple { density, reply } => {
                let result = self
                    .check()
                    .map(|_| self.shape.finalize_as_stipple(density));
                let _ = reply.send(result);
            }
            ShapeTask::Points { reply } => {
                let _ = reply.send(self.check().map(|_| self.shape.points().to_vec()));
            }
        }
    }

    async fn handle_load(&mut self, reference: &str) -> Result<(), ShapeError> {
        self.check()?;
        match self.load(reference).await {
            Ok(parsed) => {
                self.shape.append_loaded_path(reference, &parsed);
                tracing::debug!("Appended '{}' ({} point(s))", reference, parsed.point_count());
                Ok(())
            }
            Err(err) => Err(self.poison(err)),
        }
    }

    async fn handle_restore(&mut self, snapshot: &ShapeSnapshot) -> Result<(), ShapeError> {
        self.check()?;
        if let Err(err) = snapshot.validate() {
            return Err(self.poison(err));
        }

        let mut resolved: HashMap<String, Arc<ParsedPath>> = HashMap::new();
        for reference in snapshot.references() {
            if resolved.contains_key(reference) {
                continue;
            }
            match self.load(reference).await {
                Ok(parsed) => {
                    resolved.insert(reference.to_string(), parsed);
                }
                Err(err) => return Err(self.poison(err)),
            }
        }

        let result = self.shape.restore_from(snapshot, |reference| {
            resolved
                .get(reference)
                .cloned()
                .ok_or_else(|| ShapeError::load_failed(reference, "not resolved"))
        });
        result.map_err(|err| self.poison(err))
    }
}
