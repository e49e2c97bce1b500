//! Path-description parsing.
//!
//! Only the subset emitted for region outlines is understood: move, line,
//! cubic curve and close, in absolute (`M L C Z`) or relative (`m l c z`)
//! form. Anything else is dropped silently so that a bad outline degrades
//! into a short or empty shape instead of an error.

use crate::constants::BEZIER_STEPS;
use crate::geom::{Point, Ring, Shape};

/// One absolute path command with its fixed operand list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Control point 1, control point 2, end point.
    CubicTo(Point, Point, Point),
    Close,
}

struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Scanner {
            src,
            bytes: src.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_sep(&mut self) {
        while let Some(b' ' | b'\n' | b'\r' | b'\t' | b',') = self.peek() {
            self.pos += 1;
        }
    }

    fn digits(&mut self) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }

    /// Reads one number at the cursor. On failure the cursor is restored.
    fn number(&mut self) -> Option<f64> {
        let start = self.pos;
        if let Some(b'+' | b'-') = self.peek() {
            self.pos += 1;
        }
        let mut n = self.digits();
        if self.peek() == Some(b'.') {
            self.pos += 1;
            n += self.digits();
        }
        if n == 0 {
            self.pos = start;
            return None;
        }
        if let Some(b'e' | b'E') = self.peek() {
            let mark = self.pos;
            self.pos += 1;
            if let Some(b'+' | b'-') = self.peek() {
                self.pos += 1;
            }
            if self.digits() == 0 {
                self.pos = mark;
            }
        }
        match self.src[start..self.pos].parse::<f64>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => {
                self.pos = start;
                None
            }
        }
    }

    fn operands(&mut self) -> Vec<f64> {
        let mut out = Vec::new();
        loop {
            self.skip_sep();
            match self.peek() {
                Some(b'0'..=b'9' | b'.' | b'+' | b'-') => match self.number() {
                    Some(v) => out.push(v),
                    // stray sign or dot
                    None => self.pos += 1,
                },
                _ => return out,
            }
        }
    }
}

/// Splits a path description into absolute commands.
///
/// Operands are consumed in fixed-size groups (2 for move/line, 6 for
/// curves); extra groups repeat the command, with extra move groups
/// becoming line-tos. Incomplete groups and unknown commands are dropped.
pub fn tokenize(d: &str) -> Vec<PathCommand> {
    let mut sc = Scanner::new(d);
    let mut out = Vec::new();
    let mut current: Option<Point> = None;
    let mut start: Option<Point> = None;

    loop {
        sc.skip_sep();
        let Some(b) = sc.peek() else {
            break;
        };
        if !b.is_ascii_alphabetic() {
            // operands with no command in front
            let at = sc.pos;
            let lost = sc.operands();
            if sc.pos == at {
                sc.pos += 1;
            }
            log::trace!("path: skipped {} orphan operand(s) at byte {at}", lost.len());
            continue;
        }
        sc.pos += 1;
        let cmd = b as char;
        let relative = cmd.is_ascii_lowercase();
        let ops = sc.operands();
        let arity = match cmd.to_ascii_uppercase() {
            'M' | 'L' => 2,
            'C' => 6,
            'Z' => {
                out.push(PathCommand::Close);
                current = start;
                continue;
            }
            other => {
                log::trace!("path: dropped unsupported command '{other}'");
                continue;
            }
        };
        if ops.len() % arity != 0 {
            log::trace!(
                "path: '{cmd}' has {} operand(s), dropping incomplete group",
                ops.len()
            );
        }
        for (gi, g) in ops.chunks_exact(arity).enumerate() {
            let base = if relative {
                current.unwrap_or_default()
            } else {
                Point::default()
            };
            let at = |i: usize| Point::new(base.x + g[i], base.y + g[i + 1]);
            let (command, end) = match cmd.to_ascii_uppercase() {
                'M' if gi == 0 => {
                    let p = at(0);
                    start = Some(p);
                    (PathCommand::MoveTo(p), p)
                }
                'M' | 'L' => {
                    let p = at(0);
                    (PathCommand::LineTo(p), p)
                }
                _ => {
                    let p = at(4);
                    (PathCommand::CubicTo(at(0), at(2), p), p)
                }
            };
            if start.is_none() {
                start = current.or(Some(end));
            }
            current = Some(end);
            out.push(command);
        }
    }
    out
}

/// Point on the cubic Bézier `p0 p1 p2 p3` at parameter `t`.
pub fn cubic_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    Point {
        x: a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        y: a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    }
}

fn finish(rings: &mut Vec<Ring>, ring: &mut Ring) {
    if !ring.is_empty() {
        rings.push(std::mem::take(ring));
    }
}

/// Linearizes commands into rings. Curves contribute exactly
/// [`BEZIER_STEPS`] points at `t = 1/steps ..= 1`.
pub fn rings_from_commands(cmds: &[PathCommand]) -> Vec<Ring> {
    let mut rings: Vec<Ring> = Vec::new();
    let mut ring: Ring = Vec::new();
    let mut cursor: Option<Point> = None;

    for cmd in cmds {
        match *cmd {
            PathCommand::MoveTo(p) => {
                finish(&mut rings, &mut ring);
                ring.push(p);
                cursor = Some(p);
            }
            PathCommand::LineTo(p) => {
                if ring.is_empty()
                    && let Some(c) = cursor
                {
                    ring.push(c);
                }
                ring.push(p);
                cursor = Some(p);
            }
            PathCommand::CubicTo(c1, c2, p3) => {
                match cursor {
                    Some(p0) => {
                        if ring.is_empty() {
                            ring.push(p0);
                        }
                        for i in 1..=BEZIER_STEPS {
                            let t = i as f64 / BEZIER_STEPS as f64;
                            ring.push(cubic_point(p0, c1, c2, p3, t));
                        }
                    }
                    None => ring.push(p3),
                }
                cursor = Some(p3);
            }
            PathCommand::Close => {
                if let (Some(&first), Some(&last)) = (ring.first(), ring.last()) {
                    if first != last {
                        ring.push(first);
                    }
                    cursor = Some(first);
                }
                finish(&mut rings, &mut ring);
            }
        }
    }
    finish(&mut rings, &mut ring);
    rings
}

/// Parses a path description into a sampled shape. Never fails; bad
/// input gives fewer (possibly zero) points.
pub fn parse_path(d: &str) -> Shape {
    Shape::new(rings_from_commands(&tokenize(d)))
}
