//! SVG path data parser.
//!
//! Converts a path description (`d` attribute syntax) into flattened point
//! sequences. Supported commands, absolute (uppercase) and relative
//! (lowercase):
//!
//! | Command | Arity | Meaning |
//! |---|---|---|
//! | `M` | 2 | move (extra pairs are implicit line-tos) |
//! | `L` | 2 | line |
//! | `H` / `V` | 1 | horizontal / vertical line |
//! | `C` | 6 | cubic Bézier |
//! | `S` | 4 | smooth cubic (first control point reflected) |
//! | `Q` | 4 | quadratic Bézier |
//! | `T` | 2 | smooth quadratic |
//! | `Z` | 0 | close the current subpath |
//!
//! `A` (elliptical arc) is recognized but not implemented: it is skipped
//! with a warning and parsing continues. Any other letter, or a command
//! followed by an incomplete argument group, fails the whole parse.
//!
//! Each `M` starts a new disjoint subpath. [`ParsedPath::points`] gives the
//! concatenation for callers that want a single sequence.

use crate::geometry::{self, DEFAULT_SEGMENTS};
use jetplot_core::{PathError, Point};

/// Command letters the grammar knows about, implemented or not.
const KNOWN_COMMANDS: &str = "MmLlHhVvCcSsQqTtAaZz";

/// One interpreted drawing step, in absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    Cubic {
        from: Point,
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
    },
    Quadratic {
        from: Point,
        ctrl: Point,
        to: Point,
    },
    Close {
        to: Point,
    },
}

/// Result of parsing one path description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPath {
    subpaths: Vec<Vec<Point>>,
    segments: Vec<PathSegment>,
    warnings: Vec<PathError>,
}

impl ParsedPath {
    /// Disjoint point sequences, one per `M`.
    pub fn subpaths(&self) -> &[Vec<Point>] {
        &self.subpaths
    }

    /// All subpaths concatenated in order.
    pub fn points(&self) -> Vec<Point> {
        self.subpaths.iter().flatten().copied().collect()
    }

    pub fn point_count(&self) -> usize {
        self.subpaths.iter().map(Vec::len).sum()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Non-fatal problems, currently only skipped unsupported commands.
    pub fn warnings(&self) -> &[PathError] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Command { letter: char, offset: usize },
    Number { value: f64, offset: usize },
}

/// Splits path data into command letters and numbers.
///
/// Numbers are read greedily: a sign (outside an exponent) or a second
/// decimal point starts a new number, so `10-5.5.5` is `10 -5.5 .5`.
fn tokenize(data: &str) -> Result<Vec<Token>, PathError> {
    let bytes = data.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;

        if c.is_ascii_whitespace() || c == ',' {
            i += 1;
            continue;
        }

        if c.is_ascii_alphabetic() && c != 'e' && c != 'E' {
            if !KNOWN_COMMANDS.contains(c) {
                return Err(PathError::malformed(c, i, "unknown path command"));
            }
            tokens.push(Token::Command {
                letter: c,
                offset: i,
            });
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || c == '.' || c == '-' || c == '+' {
            let start = i;
            let end = scan_number(bytes, start);
            let text = &data[start..end];
            let value = text
                .parse::<f64>()
                .map_err(|_| PathError::malformed(c, start, format!("invalid number '{}'", text)))?;
            tokens.push(Token::Number {
                value,
                offset: start,
            });
            i = end;
            continue;
        }

        // Multi-byte characters are reported whole.
        let character = data[i..].chars().next().unwrap_or(c);
        return Err(PathError::malformed(character, i, "unexpected character"));
    }

    Ok(tokens)
}

/// Returns the end (exclusive) of the number starting at `start`.
fn scan_number(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    let mut seen_dot = false;
    let mut seen_exp = false;
    let mut seen_digit = false;

    if i < bytes.len() && (bytes[i] == b'-' || bytes[i] == b'+') {
        i += 1;
    }

    while i < bytes.len() {
        match bytes[i] {
            b'0'..=b'9' => {
                seen_digit = true;
                i += 1;
            }
            b'.' if !seen_dot && !seen_exp => {
                seen_dot = true;
                i += 1;
            }
            b'e' | b'E' if seen_digit && !seen_exp => {
                seen_exp = true;
                i += 1;
                if i < bytes.len() && (bytes[i] == b'-' || bytes[i] == b'+') {
                    i += 1;
                }
            }
            _ => break,
        }
    }

    i
}

fn arity(command: char) -> usize {
    match command.to_ascii_uppercase() {
        'M' | 'L' | 'T' => 2,
        'H' | 'V' => 1,
        'C' => 6,
        'S' | 'Q' => 4,
        'A' => 7,
        _ => 0,
    }
}

/// Running interpreter state, reset for every description.
#[derive(Debug, Default)]
struct Cursor {
    current: Point,
    subpath_start: Point,
    reflected_cubic: Option<Point>,
    reflected_quadratic: Option<Point>,
}

struct Interpreter {
    curve_segments: usize,
    cursor: Cursor,
    subpaths: Vec<Vec<Point>>,
    segments: Vec<PathSegment>,
    /// Set by `Z`: the next drawing command opens a new subpath.
    closed: bool,
}

impl Interpreter {
    fn new(curve_segments: usize) -> Self {
        Self {
            curve_segments,
            cursor: Cursor::default(),
            subpaths: Vec::new(),
            segments: Vec::new(),
            closed: false,
        }
    }

    fn resolve(&self, relative: bool, x: f64, y: f64) -> Point {
        if relative {
            Point::new(self.cursor.current.x + x, self.cursor.current.y + y)
        } else {
            Point::new(x, y)
        }
    }

    fn drop_bare_move(&mut self) {
        if self.subpaths.last().is_some_and(|s| s.len() == 1) {
            self.subpaths.pop();
        }
    }

    fn move_to(&mut self, p: Point) {
        self.drop_bare_move();
        self.subpaths.push(vec![p]);
        self.segments.push(PathSegment::MoveTo(p));
        self.cursor.current = p;
        self.cursor.subpath_start = p;
        self.closed = false;
    }

    /// Makes sure there is an open subpath starting at the cursor.
    fn ensure_subpath(&mut self) {
        if self.subpaths.is_empty() || self.closed {
            let start = self.cursor.current;
            self.subpaths.push(vec![start]);
            self.cursor.subpath_start = start;
            self.closed = false;
        }
    }

    fn extend(&mut self, points: Vec<Point>) {
        self.ensure_subpath();
        if let Some(subpath) = self.subpaths.last_mut() {
            subpath.extend(points);
        }
    }

    fn line_to(&mut self, p: Point) {
        self.extend(vec![p]);
        self.segments.push(PathSegment::LineTo(p));
        self.cursor.current = p;
    }

    fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) {
        let from = self.cursor.current;
        let points = geometry::cubic_bezier(from, ctrl1, ctrl2, to, self.curve_segments);
        self.extend(points);
        self.segments.push(PathSegment::Cubic {
            from,
            ctrl1,
            ctrl2,
            to,
        });
        self.cursor.current = to;
        self.cursor.reflected_cubic = Some(to - ctrl2);
    }

    fn quadratic_to(&mut self, ctrl: Point, to: Point) {
        let from = self.cursor.current;
        let points = geometry::quadratic_bezier(from, ctrl, to, self.curve_segments);
        self.extend(points);
        self.segments.push(PathSegment::Quadratic { from, ctrl, to });
        self.cursor.current = to;
        self.cursor.reflected_quadratic = Some(to - ctrl);
    }

    fn close(&mut self) {
        if self.subpaths.is_empty() || self.closed {
            return;
        }
        let start = self.cursor.subpath_start;
        if let Some(subpath) = self.subpaths.last_mut() {
            subpath.push(start);
        }
        self.segments.push(PathSegment::Close { to: start });
        self.cursor.current = start;
        self.closed = true;
    }

    /// Applies one argument group of `command`. `first` is true for the
    /// first group following the letter.
    fn apply(&mut self, command: char, args: &[f64], first: bool) {
        let relative = command.is_ascii_lowercase();
        let upper = command.to_ascii_uppercase();

        // Smooth variants only reflect a control point from their own family.
        let reflected_cubic = self.cursor.reflected_cubic.take();
        let reflected_quadratic = self.cursor.reflected_quadratic.take();

        match upper {
            'M' => {
                let p = self.resolve(relative, args[0], args[1]);
                if first {
                    self.move_to(p);
                } else {
                    self.line_to(p);
                }
            }
            'L' => {
                let p = self.resolve(relative, args[0], args[1]);
                self.line_to(p);
            }
            'H' => {
                let x = if relative {
                    self.cursor.current.x + args[0]
                } else {
                    args[0]
                };
                self.line_to(Point::new(x, self.cursor.current.y));
            }
            'V' => {
                let y = if relative {
                    self.cursor.current.y + args[0]
                } else {
                    args[0]
                };
                self.line_to(Point::new(self.cursor.current.x, y));
            }
            'C' => {
                let ctrl1 = self.resolve(relative, args[0], args[1]);
                let ctrl2 = self.resolve(relative, args[2], args[3]);
                let to = self.resolve(relative, args[4], args[5]);
                self.cubic_to(ctrl1, ctrl2, to);
            }
            'S' => {
                let current = self.cursor.current;
                let ctrl1 = reflected_cubic.map_or(current, |r| current + r);
                let ctrl2 = self.resolve(relative, args[0], args[1]);
                let to = self.resolve(relative, args[2], args[3]);
                self.cubic_to(ctrl1, ctrl2, to);
            }
            'Q' => {
                let ctrl = self.resolve(relative, args[0], args[1]);
                let to = self.resolve(relative, args[2], args[3]);
                self.quadratic_to(ctrl, to);
            }
            'T' => {
                let current = self.cursor.current;
                let ctrl = reflected_quadratic.map_or(current, |r| current + r);
                let to = self.resolve(relative, args[0], args[1]);
                self.quadratic_to(ctrl, to);
            }
            'Z' => self.close(),
            _ => {}
        }
    }

    fn finish(mut self, warnings: Vec<PathError>) -> ParsedPath {
        self.drop_bare_move();
        ParsedPath {
            subpaths: self.subpaths,
            segments: self.segments,
            warnings,
        }
    }
}

/// Path data parser with a fixed curve flattening resolution.
#[derive(Debug, Clone, Copy)]
pub struct PathParser {
    curve_segments: usize,
}

impl Default for PathParser {
    fn default() -> Self {
        Self::new(DEFAULT_SEGMENTS)
    }
}

impl PathParser {
    pub fn new(curve_segments: usize) -> Self {
        Self { curve_segments }
    }

    pub fn curve_segments(&self) -> usize {
        self.curve_segments
    }

    /// Parses `data` into flattened subpaths.
    pub fn parse(&self, data: &str) -> Result<ParsedPath, PathError> {
        let tokens = tokenize(data)?;
        let mut interpreter = Interpreter::new(self.curve_segments);
        let mut warnings = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            let (letter, offset) = match tokens[i] {
                Token::Command { letter, offset } => (letter, offset),
                Token::Number { offset, .. } => {
                    let character = data[offset..].chars().next().unwrap_or('?');
                    return Err(PathError::malformed(
                        character,
                        offset,
                        "number without a preceding command",
                    ));
                }
            };
            i += 1;

            let mut args = Vec::new();
            let mut first_arg_offset = None;
            while let Some(Token::Number { value, offset }) = tokens.get(i) {
                first_arg_offset.get_or_insert(*offset);
                args.push(*value);
                i += 1;
            }

            let n = arity(letter);

            if letter == 'A' || letter == 'a' {
                let warning = PathError::UnsupportedCommand {
                    command: letter,
                    offset,
                };
                tracing::warn!("{}; skipping {} argument(s)", warning, args.len());
                warnings.push(warning);
                // The pen still ends up somewhere we cannot compute; forget curve state.
                interpreter.cursor.reflected_cubic = None;
                interpreter.cursor.reflected_quadratic = None;
                continue;
            }

            if n == 0 {
                if let Some(arg_offset) = first_arg_offset {
                    let character = data[arg_offset..].chars().next().unwrap_or('?');
                    return Err(PathError::malformed(
                        character,
                        arg_offset,
                        format!("'{}' takes no arguments", letter),
                    ));
                }
                interpreter.apply(letter, &[], true);
                continue;
            }

            if args.is_empty() || args.len() % n != 0 {
                return Err(PathError::malformed(
                    letter,
                    offset,
                    format!(
                        "expected groups of {} argument(s), found {}",
                        n,
                        args.len()
                    ),
                ));
            }

            for (index, chunk) in args.chunks(n).enumerate() {
                interpreter.apply(letter, chunk, index == 0);
            }
        }

        let parsed = interpreter.finish(warnings);
        tracing::debug!(
            "Parsed path: {} subpath(s), {} point(s), {} segment(s)",
            parsed.subpaths.len(),
            parsed.point_count(),
            parsed.segments.len()
        );
        Ok(parsed)
    }
}

/// Parses `data` with the default curve resolution.
pub fn parse_path(data: &str) -> Result<ParsedPath, PathError> {
    PathParser::default().parse(data)
}
