use egui::Pos2;

/// Integer rectangle, half-open on the right and bottom edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl IntRect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Square of side `2 * half` centered on (x, y), saturating at the
    /// edges of the `i32` range
    pub fn around(x: i32, y: i32, half: i32) -> Self {
        Self::new(
            x.saturating_sub(half),
            y.saturating_sub(half),
            x.saturating_add(half),
            y.saturating_add(half),
        )
    }

    /// Single pixel at (x, y)
    pub fn pixel(x: i32, y: i32) -> Self {
        Self::new(x, y, x.saturating_add(1), y.saturating_add(1))
    }

    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    pub fn intersects(&self, other: &IntRect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// Overlap of both rectangles, `None` when they are disjoint
    pub fn intersect(&self, other: &IntRect) -> Option<IntRect> {
        let rect = IntRect::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        );
        (!rect.is_empty()).then_some(rect)
    }

    pub fn union(&self, other: &IntRect) -> IntRect {
        IntRect::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }
}

/// A set of pixels, stored as non-overlapping rectangles.
///
/// Regions are built once per hit test and only ever queried, so there is
/// no general boolean algebra here: just construction, a bounding-box
/// reject and an intersection test.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Region {
    rects: Vec<IntRect>,
    bounds: Option<IntRect>,
}

impl Region {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rect(rect: IntRect) -> Self {
        let mut region = Self::empty();
        region.push(rect);
        region
    }

    /// Rasterize the area enclosed by a polygon (implicitly closed) using
    /// the non-zero winding rule, sampling pixel centers and clipping to
    /// `clip`. Rows with identical coverage are merged into one band.
    pub fn from_polygon(points: &[Pos2], clip: IntRect) -> Self {
        let mut region = Self::empty();
        if points.len() < 3 || clip.is_empty() {
            return region;
        }

        let (min_y, max_y) = points.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });
        let top = (min_y.floor() as i32).max(clip.top);
        let bottom = (max_y.ceil() as i32).min(clip.bottom);

        let mut band_top = top;
        let mut band_spans: Vec<(i32, i32)> = Vec::new();
        for y in top..bottom {
            let spans = row_spans(points, y as f32 + 0.5, clip.left, clip.right);
            if spans != band_spans {
                region.push_band(&band_spans, band_top, y);
                band_spans = spans;
                band_top = y;
            }
        }
        region.push_band(&band_spans, band_top, bottom);
        region
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn bounds(&self) -> Option<IntRect> {
        self.bounds
    }

    pub fn rects(&self) -> &[IntRect] {
        &self.rects
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.rects.iter().any(|rect| rect.contains(x, y))
    }

    /// Cheap test: true when the two regions certainly do not overlap
    pub fn quick_reject(&self, other: &Region) -> bool {
        match (self.bounds, other.bounds) {
            (Some(a), Some(b)) => !a.intersects(&b),
            _ => true,
        }
    }

    /// Exact test: true when at least one pixel is in both regions
    pub fn intersects(&self, other: &Region) -> bool {
        if self.quick_reject(other) {
            return false;
        }
        self.rects
            .iter()
            .any(|a| other.rects.iter().any(|b| a.intersects(b)))
    }

    fn push(&mut self, rect: IntRect) {
        if rect.is_empty() {
            return;
        }
        self.bounds = Some(match self.bounds {
            Some(bounds) => bounds.union(&rect),
            None => rect,
        });
        self.rects.push(rect);
    }

    fn push_band(&mut self, spans: &[(i32, i32)], top: i32, bottom: i32) {
        for &(left, right) in spans {
            self.push(IntRect::new(left, top, right, bottom));
        }
    }
}

/// Covered pixel columns of one scanline, as sorted half-open spans
fn row_spans(points: &[Pos2], sample_y: f32, clip_left: i32, clip_right: i32) -> Vec<(i32, i32)> {
    let mut crossings: Vec<(f32, i32)> = Vec::new();
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        if a.y == b.y {
            continue;
        }
        let upward = a.y <= sample_y && sample_y < b.y;
        let downward = b.y <= sample_y && sample_y < a.y;
        if upward || downward {
            let x = a.x + (sample_y - a.y) * (b.x - a.x) / (b.y - a.y);
            crossings.push((x, if upward { 1 } else { -1 }));
        }
    }
    crossings.sort_by(|l, r| l.0.total_cmp(&r.0));

    let mut spans: Vec<(i32, i32)> = Vec::new();
    let mut winding = 0;
    let mut start = 0.0;
    for (x, direction) in crossings {
        let previous = winding;
        winding += direction;
        if previous == 0 && winding != 0 {
            start = x;
        } else if previous != 0 && winding == 0 {
            let left = ((start - 0.5).ceil() as i32).max(clip_left);
            let right = ((x - 0.5).ceil() as i32).min(clip_right);
            if left >= right {
                continue;
            }
            match spans.last_mut() {
                Some(last) if last.1 >= left => last.1 = last.1.max(right),
                _ => spans.push((left, right)),
            }
        }
    }
    spans
}
