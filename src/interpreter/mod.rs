//! G-code interpreter
//!
//! Reads program text back into geometry for display: polylines grouped by the
//! Z height they were cut at, and one flattened point sequence for playback.
//! Parsing is best effort. Blank lines, comments, and anything that is not a
//! G0-G3 motion are skipped without aborting.

pub mod arc;

pub use arc::sample_arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::model::{Point, ToolState};

/// Points per reconstructed arc, both ends included
pub const DEFAULT_ARC_SAMPLES: usize = 21;

/// Display-side parameters of a simulation request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationOptions {
    /// Offset the program was generated with; reported, never re-applied
    pub offset: Point,
    /// Translate the animation so it starts here
    pub start: Option<Point>,
    /// Replace the final animation sample with this point
    pub end: Option<Point>,
    pub arc_samples: usize,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            offset: Point::default(),
            start: None,
            end: None,
            arc_samples: DEFAULT_ARC_SAMPLES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MoveKind {
    Rapid,
    Linear,
    Arc { clockwise: bool },
}

/// One motion line, resolved against the modal position before it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Move {
    pub kind: MoveKind,
    pub from: ToolState,
    pub to: ToolState,
    pub i: f64,
    pub j: f64,
}

impl Move {
    /// XY samples of this move; arcs are expanded to `arc_samples` points
    pub fn points(&self, arc_samples: usize) -> Vec<Point> {
        match self.kind {
            MoveKind::Rapid | MoveKind::Linear => vec![self.from.xy(), self.to.xy()],
            MoveKind::Arc { clockwise } => sample_arc(
                self.from.xy(),
                self.to.xy(),
                self.i,
                self.j,
                clockwise,
                arc_samples,
            ),
        }
    }
}

fn move_kind(mnemonic: &crate::program::Word) -> Option<MoveKind> {
    if mnemonic.letter() != 'G' {
        return None;
    }
    // G0 ≡ G00, G1 ≡ G01, ...
    match mnemonic.value() {
        v if v == 0.0 => Some(MoveKind::Rapid),
        v if v == 1.0 => Some(MoveKind::Linear),
        v if v == 2.0 => Some(MoveKind::Arc { clockwise: true }),
        v if v == 3.0 => Some(MoveKind::Arc { clockwise: false }),
        _ => None,
    }
}

/// Resolve every motion line of `text` in order.
///
/// The tool starts at the origin with Z 0. Omitted X/Y/Z keep their previous
/// value; omitted I/J are 0.
pub fn parse_moves(text: &str) -> Vec<Move> {
    let mut tool = ToolState::default();
    let mut moves = Vec::new();

    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        let words = crate::lexer::words(line);
        let Some(kind) = words.first().and_then(move_kind) else {
            trace!(line = n + 1, "no motion: {}", line);
            continue;
        };

        let mut to = tool;
        let (mut i, mut j) = (0.0, 0.0);
        for w in &words[1..] {
            match w.letter() {
                'X' => to.x = w.value(),
                'Y' => to.y = w.value(),
                'Z' => to.z = w.value(),
                'I' => i = w.value(),
                'J' => j = w.value(),
                _ => {}
            }
        }

        moves.push(Move {
            kind,
            from: tool,
            to,
            i,
            j,
        });
        tool = to;
    }

    moves
}

/// Polyline samples at one Z height; `None` separates unconnected strokes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthLevel {
    pub z: f64,
    pub points: Vec<Option<Point>>,
}

/// Polylines bucketed by the Z height active before each move
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ZGroupedPath {
    /// Levels in the order their Z was first seen
    pub levels: Vec<DepthLevel>,
}

impl ZGroupedPath {
    pub fn from_moves(moves: &[Move], arc_samples: usize) -> Self {
        let mut path = Self::default();
        for m in moves {
            path.append(m.from.z, m.points(arc_samples));
        }
        path
    }

    fn append(&mut self, z: f64, points: Vec<Point>) {
        let index = match self.levels.iter().position(|l| l.z == z) {
            Some(index) => index,
            None => {
                self.levels.push(DepthLevel {
                    z,
                    points: Vec::new(),
                });
                self.levels.len() - 1
            }
        };
        let level = &mut self.levels[index];
        if !level.points.is_empty() {
            level.points.push(None);
        }
        level.points.extend(points.into_iter().map(Some));
    }

    pub fn get(&self, z: f64) -> Option<&DepthLevel> {
        self.levels.iter().find(|l| l.z == z)
    }

    /// Levels ordered by Z, lowest first
    pub fn sorted_levels(&self) -> Vec<&DepthLevel> {
        let mut levels: Vec<&DepthLevel> = self.levels.iter().collect();
        levels.sort_by(|a, b| a.z.total_cmp(&b.z));
        levels
    }

    /// XY extent of every sample, `None` for an empty path
    pub fn bounds(&self) -> Option<Bounds> {
        self.levels
            .iter()
            .flat_map(|l| l.points.iter().flatten())
            .fold(None, |acc: Option<Bounds>, p| {
                Some(match acc {
                    None => Bounds {
                        min_x: p.x,
                        max_x: p.x,
                        min_y: p.y,
                        max_y: p.y,
                    },
                    Some(b) => Bounds {
                        min_x: b.min_x.min(p.x),
                        max_x: b.max_x.max(p.x),
                        min_y: b.min_y.min(p.y),
                        max_y: b.max_y.max(p.y),
                    },
                })
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

/// Every sample of the program in execution order, no gaps
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimationPath(pub Vec<Point>);

impl AnimationPath {
    /// Rapid and linear moves contribute their target; arcs every sample.
    /// An empty program yields the single point `(0, 0)`.
    pub fn from_moves(moves: &[Move], arc_samples: usize) -> Self {
        let mut points = Vec::new();
        for m in moves {
            match m.kind {
                MoveKind::Rapid | MoveKind::Linear => points.push(m.to.xy()),
                MoveKind::Arc { .. } => points.extend(m.points(arc_samples)),
            }
        }
        if points.is_empty() {
            points.push(Point::default());
        }
        Self(points)
    }

    /// Translate so the first sample lands on `start`, then pin the last sample to `end`.
    ///
    /// The end replacement is not blended into the path; the jump between the
    /// last two samples is intentional.
    pub fn apply_overrides(&mut self, start: Option<Point>, end: Option<Point>) {
        if let (Some(start), Some(first)) = (start, self.0.first().copied()) {
            let (dx, dy) = (start.x - first.x, start.y - first.y);
            for p in &mut self.0 {
                p.x += dx;
                p.y += dy;
            }
        }
        if let (Some(end), Some(last)) = (end, self.0.last_mut()) {
            *last = end;
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<Point> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.0.last().copied()
    }
}

/// Everything the rendering surface needs for one program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    pub depths: ZGroupedPath,
    pub animation: AnimationPath,
    pub offset: Point,
    pub start_marker: Point,
    pub end_marker: Point,
    pub moves: usize,
}

/// Interpret program text for display
pub fn interpret(text: &str, options: &SimulationOptions) -> Simulation {
    let moves = parse_moves(text);

    let depths = ZGroupedPath::from_moves(&moves, options.arc_samples);
    let mut animation = AnimationPath::from_moves(&moves, options.arc_samples);
    animation.apply_overrides(options.start, options.end);

    let start_marker = animation.first().unwrap_or_default();
    let end_marker = animation.last().unwrap_or_default();

    debug!(
        "{} depth levels, {} animation samples",
        depths.levels.len(),
        animation.len()
    );
    info!("simulated {} moves", moves.len());

    Simulation {
        depths,
        animation,
        offset: options.offset,
        start_marker,
        end_marker,
        moves: moves.len(),
    }
}
