use egui::{Pos2, Rect};

mod region;

pub use region::{IntRect, Region};

/// Bounding box of `points` grown by `padding` on every side.
/// `Rect::NOTHING` for no points.
pub fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }
    Rect::from_points(points).expand(padding)
}
