use image::RgbaImage;

use super::{EraseAction, StrokeAction, WhiteboardAction};
use crate::renderer::RasterCompositor;

/// Chronological record of strokes and erase records.
///
/// Replaying the entries in order, skipping erase records, reproduces the
/// visible picture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionLog {
    list: Vec<WhiteboardAction>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self { list: Vec::new() }
    }

    pub fn append(&mut self, action: impl Into<WhiteboardAction>) {
        self.list.push(action.into());
    }

    /// Remove and return the newest entry. Erased strokes are not restored
    /// here; see [`ActionLog::undo`].
    pub fn pop_last(&mut self) -> Option<WhiteboardAction> {
        self.list.pop()
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn entries(&self) -> &[WhiteboardAction] {
        &self.list
    }

    /// Strokes that are currently visible, in draw order
    pub fn live_strokes(&self) -> impl Iterator<Item = &StrokeAction> {
        self.list.iter().filter_map(WhiteboardAction::as_stroke)
    }

    pub fn has_any_visible_stroke(&self) -> bool {
        self.live_strokes().next().is_some()
    }

    pub fn last_is_erase(&self) -> bool {
        self.list.last().is_some_and(WhiteboardAction::is_erase)
    }

    /// Clear the raster and redraw every live stroke in log order
    pub fn replay(&self, compositor: &mut dyn RasterCompositor, raster: &mut RgbaImage) {
        compositor.clear_raster(raster);
        for action in &self.list {
            action.apply(compositor, raster);
        }
        compositor.request_repaint();
    }

    /// Splice the strokes at `indices` (ascending) out of the log in one
    /// pass and record them as one erase entry.
    ///
    /// Each removed stroke remembers the index it had once the strokes
    /// removed before it were gone, which is where undo reinserts it when
    /// walking the batch backwards.
    pub(crate) fn erase_at(&mut self, indices: &[usize]) -> usize {
        let mut kept = Vec::with_capacity(self.list.len());
        let mut erased: Vec<StrokeAction> = Vec::new();
        for (index, action) in self.list.drain(..).enumerate() {
            match action {
                WhiteboardAction::Stroke(mut stroke) if indices.binary_search(&index).is_ok() => {
                    stroke.original_index = Some(index - erased.len());
                    erased.push(stroke);
                }
                other => kept.push(other),
            }
        }
        self.list = kept;

        let count = erased.len();
        if count > 0 {
            self.list.push(WhiteboardAction::Erase(EraseAction::new(erased)));
        }
        count
    }

    /// Put an erased stroke back at the index it was removed from
    pub(crate) fn restore(&mut self, mut stroke: StrokeAction) {
        let index = stroke.original_index.take().unwrap_or(self.list.len());
        debug_assert!(
            index <= self.list.len(),
            "erased stroke index {} is past the end of the log ({} entries)",
            index,
            self.list.len()
        );
        self.list.insert(index, WhiteboardAction::Stroke(stroke));
    }
}
