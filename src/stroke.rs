use egui::{Color32, Pos2, Rect};

use crate::geometry::{self, IntRect, Region};

/// Number of line pieces used to flatten one quadratic segment
const QUAD_STEPS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeJoin {
    Miter,
    #[default]
    Round,
    Bevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeCap {
    Butt,
    #[default]
    Round,
    Square,
}

/// Paint attributes a stroke was drawn with. The engine only carries these
/// through to the compositor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Color32,
    pub width: f32,
    pub join: StrokeJoin,
    pub cap: StrokeCap,
}

impl Paint {
    pub fn new(color: Color32, width: f32) -> Self {
        Self {
            color,
            width,
            join: StrokeJoin::default(),
            cap: StrokeCap::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    QuadTo { ctrl: Pos2, to: Pos2 },
    LineTo(Pos2),
}

/// An open path made of quadratic and straight segments
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothPath {
    start: Pos2,
    segments: Vec<PathSegment>,
}

impl SmoothPath {
    pub fn new(start: Pos2) -> Self {
        Self {
            start,
            segments: Vec::new(),
        }
    }

    pub fn quad_to(&mut self, ctrl: Pos2, to: Pos2) {
        self.segments.push(PathSegment::QuadTo { ctrl, to });
    }

    pub fn line_to(&mut self, to: Pos2) {
        self.segments.push(PathSegment::LineTo(to));
    }

    pub fn start(&self) -> Pos2 {
        self.start
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Approximate the path by a polyline, starting at the start point
    pub fn flatten(&self) -> Vec<Pos2> {
        let mut points = vec![self.start];
        let mut current = self.start;
        for segment in &self.segments {
            match *segment {
                PathSegment::QuadTo { ctrl, to } => {
                    for step in 1..=QUAD_STEPS {
                        let t = step as f32 / QUAD_STEPS as f32;
                        points.push(quad_point(current, ctrl, to, t));
                    }
                    current = to;
                }
                PathSegment::LineTo(to) => {
                    points.push(to);
                    current = to;
                }
            }
        }
        points
    }

    /// Arc length of the flattened path
    pub fn length(&self) -> f32 {
        self.flatten()
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum()
    }

    pub fn bounds(&self) -> Rect {
        geometry::calculate_bounds(&self.flatten(), 0.0)
    }
}

fn quad_point(from: Pos2, ctrl: Pos2, to: Pos2, t: f32) -> Pos2 {
    let u = 1.0 - t;
    let x = u * u * from.x + 2.0 * u * t * ctrl.x + t * t * to.x;
    let y = u * u * from.y + 2.0 * u * t * ctrl.y + t * t * to.y;
    Pos2::new(x, y)
}

/// Geometry of one recorded stroke
#[derive(Debug, Clone, PartialEq)]
pub enum StrokeShape {
    Path(SmoothPath),
    /// A tap with no net movement
    Point(Pos2),
}

impl StrokeShape {
    /// Filled region used by the eraser.
    ///
    /// For a path this is the area the path encloses. Lines that are
    /// perfectly straight enclose nothing, so they fall back to their
    /// bounding box; otherwise they could never be erased.
    pub fn hit_region(&self, clip: IntRect) -> Region {
        match self {
            StrokeShape::Path(path) => {
                let region = Region::from_polygon(&path.flatten(), clip);
                if !region.is_empty() {
                    return region;
                }
                let bounds = path.bounds();
                Region::from_rect(IntRect::new(
                    bounds.min.x as i32,
                    bounds.min.y as i32,
                    (bounds.max.x as i32).saturating_add(1),
                    (bounds.max.y as i32).saturating_add(1),
                ))
            }
            StrokeShape::Point(point) => Region::from_rect(IntRect::pixel(point.x as i32, point.y as i32)),
        }
    }

    /// Polyline the compositor strokes; a single point for taps
    pub fn outline(&self) -> Vec<Pos2> {
        match self {
            StrokeShape::Path(path) => path.flatten(),
            StrokeShape::Point(point) => vec![*point],
        }
    }
}

/// The stroke currently being drawn.
///
/// Raw samples are smoothed with the midpoint rule: every accepted sample
/// adds a quadratic segment controlled by the previous sample and ending
/// halfway between the previous and the new one.
#[derive(Debug, Clone)]
pub struct StrokeBuilder {
    path: SmoothPath,
    anchor: Pos2,
    tolerance: f32,
}

impl StrokeBuilder {
    pub fn new(start: Pos2, tolerance: f32) -> Self {
        Self {
            path: SmoothPath::new(start),
            anchor: start,
            tolerance,
        }
    }

    /// Feed one sample; returns false when it is within the touch tolerance
    /// of the previous accepted sample and was ignored
    pub fn extend(&mut self, pos: Pos2) -> bool {
        let dx = (pos.x - self.anchor.x).abs();
        let dy = (pos.y - self.anchor.y).abs();
        if dx < self.tolerance && dy < self.tolerance {
            return false;
        }
        let mid = Pos2::new((self.anchor.x + pos.x) / 2.0, (self.anchor.y + pos.y) / 2.0);
        self.path.quad_to(self.anchor, mid);
        self.anchor = pos;
        true
    }

    /// Path drawn so far, for live preview
    pub fn preview(&self) -> &SmoothPath {
        &self.path
    }

    pub fn anchor(&self) -> Pos2 {
        self.anchor
    }

    /// Close the gesture. The length is measured before the closing line
    /// to the last sample, so a gesture that never left the tolerance box
    /// becomes a point.
    pub fn finish(mut self) -> StrokeShape {
        let length = self.path.length();
        self.path.line_to(self.anchor);
        if length > 0.0 {
            StrokeShape::Path(self.path)
        } else {
            StrokeShape::Point(self.anchor)
        }
    }
}
