use crate::action::{ActionLog, WhiteboardAction};
use crate::config::ERASER_HALF_WIDTH;
use crate::geometry::{IntRect, Region};

/// Removes every visible stroke touched by a square probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eraser {
    half_width: i32,
}

impl Default for Eraser {
    fn default() -> Self {
        Self::new(ERASER_HALF_WIDTH)
    }
}

impl Eraser {
    pub fn new(half_width: i32) -> Self {
        Self { half_width }
    }

    pub fn half_width(&self) -> i32 {
        self.half_width
    }

    /// Probe centered on (x, y), clipped to the surface
    pub fn hit_rect(&self, x: i32, y: i32, surface: IntRect) -> Option<IntRect> {
        IntRect::around(x, y, self.half_width).intersect(&surface)
    }

    /// Erase every live stroke whose hit region overlaps the probe at (x, y).
    ///
    /// All strokes hit by one call go into a single erase record appended to
    /// the log. Returns whether anything was erased.
    pub fn erase(&self, log: &mut ActionLog, x: i32, y: i32, surface: IntRect) -> bool {
        if !log.has_any_visible_stroke() {
            return false;
        }
        let Some(probe) = self.hit_rect(x, y, surface) else {
            return false;
        };
        let probe = Region::from_rect(probe);

        let hits: Vec<usize> = log
            .entries()
            .iter()
            .enumerate()
            .filter(|(_, action)| match action {
                WhiteboardAction::Stroke(_) => {
                    let region = action.hit_region(surface);
                    !region.quick_reject(&probe) && region.intersects(&probe)
                }
                WhiteboardAction::Erase(_) => false,
            })
            .map(|(index, _)| index)
            .collect();

        if hits.is_empty() {
            return false;
        }
        let erased = log.erase_at(&hits);
        log::debug!("Erased {} stroke(s) at ({}, {})", erased, x, y);
        true
    }
}
