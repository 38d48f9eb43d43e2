//! Step-wise command playback.
//!
//! [`CommandRunner`] walks a command stream one instruction per call,
//! tracking pen state and the last visited position the way a physical
//! plotter would. Pacing (timers, intervals) is the caller's business.

use crate::commands::{Command, CommandKind, CommandStream};
use jetplot_core::{Point, RenderSurface};

/// Playback state of a runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Idle,
    Running,
    Done,
}

impl RunnerState {
    /// Returns the name of the state.
    pub fn name(&self) -> &'static str {
        match self {
            RunnerState::Idle => "Idle",
            RunnerState::Running => "Running",
            RunnerState::Done => "Done",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenState {
    Up,
    Down,
}

/// Outcome of one [`CommandRunner::next`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The command was executed.
    Executed(Command),
    /// Nothing left to execute.
    Complete,
    /// The runner has not been started.
    Idle,
}

/// What a listener sees after each executed command.
#[derive(Debug, Clone, PartialEq)]
pub struct StepEvent {
    pub index: usize,
    pub command: Command,
    pub pen: PenState,
    /// Position before this command moved the pen.
    pub previous: Point,
}

/// Observer for runner progress.
pub trait RunnerListener: Send {
    fn on_step(&mut self, event: &StepEvent);

    fn on_complete(&mut self) {}
}

/// Logs each executed command's message.
#[derive(Debug, Default)]
pub struct LoggingListener {
    steps: usize,
}

impl LoggingListener {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RunnerListener for LoggingListener {
    fn on_step(&mut self, event: &StepEvent) {
        self.steps += 1;
        tracing::info!(step = event.index, color = %event.command.color, "{}", event.command);
    }

    fn on_complete(&mut self) {
        tracing::info!("Runner finished after {} step(s)", self.steps);
    }
}

/// Traces the pen onto a surface: pen-down moves become line segments
/// and every pen drop leaves a dot.
///
/// Normalized coordinates are scaled back up by `width` and `height`.
pub struct SurfaceTracer<S: RenderSurface + Send> {
    surface: S,
    width: f64,
    height: f64,
}

impl<S: RenderSurface + Send> SurfaceTracer<S> {
    pub fn new(surface: S, width: f64, height: f64) -> Self {
        Self {
            surface,
            width,
            height,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    fn to_canvas(&self, p: Point) -> Point {
        Point::new(p.x * self.width, p.y * self.height)
    }
}

impl<S: RenderSurface + Send> RunnerListener for SurfaceTracer<S> {
    fn on_step(&mut self, event: &StepEvent) {
        let from = self.to_canvas(event.previous);
        match event.command.command {
            CommandKind::MoveTo if event.pen == PenState::Down => {
                if let Some(to) = event.command.position() {
                    let to = self.to_canvas(to);
                    self.surface.stroke_closed_path(&[from, to], &event.command.color);
                }
            }
            CommandKind::PenDown => self.surface.place_dot(from.x, from.y, &event.command.color),
            _ => {}
        }
    }
}

/// Replays a command stream one instruction at a time.
pub struct CommandRunner {
    commands: Vec<Command>,
    state: RunnerState,
    index: usize,
    pen: PenState,
    previous: Point,
    listener: Option<Box<dyn RunnerListener>>,
}

impl CommandRunner {
    pub fn new(stream: CommandStream) -> Self {
        Self {
            commands: stream.into_commands(),
            state: RunnerState::Idle,
            index: 0,
            pen: PenState::Up,
            previous: Point::default(),
            listener: None,
        }
    }

    pub fn with_listener(mut self, listener: impl RunnerListener + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn set_listener(&mut self, listener: Box<dyn RunnerListener>) {
        self.listener = Some(listener);
    }

    pub fn take_listener(&mut self) -> Option<Box<dyn RunnerListener>> {
        self.listener.take()
    }

    /// Rewinds to the first command with the pen up at the origin.
    pub fn start(&mut self) {
        self.state = RunnerState::Running;
        self.index = 0;
        self.pen = PenState::Up;
        self.previous = Point::default();
        tracing::debug!("Runner started with {} command(s)", self.commands.len());
    }

    pub fn reset(&mut self) {
        self.state = RunnerState::Idle;
        self.index = 0;
        self.pen = PenState::Up;
        self.previous = Point::default();
    }

    /// Executes the next command.
    pub fn next(&mut self) -> Step {
        match self.state {
            RunnerState::Idle => return Step::Idle,
            RunnerState::Done => return Step::Complete,
            RunnerState::Running => {}
        }

        let Some(command) = self.commands.get(self.index).cloned() else {
            self.finish();
            return Step::Complete;
        };

        match command.command {
            CommandKind::PenDown => self.pen = PenState::Down,
            CommandKind::PenUp => self.pen = PenState::Up,
            CommandKind::MoveTo => {}
        }

        let event = StepEvent {
            index: self.index,
            command: command.clone(),
            pen: self.pen,
            previous: self.previous,
        };

        if let Some(p) = command.position() {
            self.previous = p;
        }
        self.index += 1;

        if let Some(listener) = self.listener.as_mut() {
            listener.on_step(&event);
        }
        if self.index >= self.commands.len() {
            self.finish();
        }

        Step::Executed(command)
    }

    /// Runs every remaining command. Returns how many were executed.
    pub fn run_to_end(&mut self) -> usize {
        let mut executed = 0;
        while let Step::Executed(_) = self.next() {
            executed += 1;
        }
        executed
    }

    fn finish(&mut self) {
        if self.state == RunnerState::Done {
            return;
        }
        self.state = RunnerState::Done;
        tracing::debug!("Runner done at command {}", self.index);
        if let Some(listener) = self.listener.as_mut() {
            listener.on_complete();
        }
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn pen(&self) -> PenState {
        self.pen
    }

    pub fn previous_position(&self) -> Point {
        self.previous
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Gets the percentage of playback complete.
    pub fn progress_percentage(&self) -> f64 {
        if self.commands.is_empty() {
            return 100.0;
        }
        (self.index as f64 / self.commands.len() as f64 * 100.0).min(100.0)
    }
}

impl std::fmt::Debug for CommandRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRunner")
            .field("state", &self.state)
            .field("index", &self.index)
            .field("len", &self.commands.len())
            .field("pen", &self.pen)
            .finish()
    }
}
