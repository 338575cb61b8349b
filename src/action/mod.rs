use image::RgbaImage;
use uuid::Uuid;

use crate::geometry::{IntRect, Region};
use crate::renderer::RasterCompositor;
use crate::stroke::{Paint, StrokeShape};

mod history;
mod undo;

pub use history::ActionLog;

/// Stable identity of a recorded stroke, kept across erase and undo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrokeId(Uuid);

impl StrokeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StrokeId {
    fn default() -> Self {
        Self::new()
    }
}

/// One finished stroke: a path or a point, with the paint it was drawn with
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeAction {
    id: StrokeId,
    shape: StrokeShape,
    paint: Paint,
    /// Position in the log when an erase removed this stroke; `None` while live
    pub(crate) original_index: Option<usize>,
}

impl StrokeAction {
    pub fn new(shape: StrokeShape, paint: Paint) -> Self {
        Self {
            id: StrokeId::new(),
            shape,
            paint,
            original_index: None,
        }
    }

    pub fn id(&self) -> StrokeId {
        self.id
    }

    pub fn shape(&self) -> &StrokeShape {
        &self.shape
    }

    pub fn paint(&self) -> &Paint {
        &self.paint
    }

    pub fn original_index(&self) -> Option<usize> {
        self.original_index
    }

    /// Paint this stroke onto the raster
    pub fn draw(&self, compositor: &mut dyn RasterCompositor, raster: &mut RgbaImage) {
        compositor.draw_onto(raster, &self.shape, &self.paint);
    }
}

/// Strokes removed by a single eraser touch, in removal order
#[derive(Debug, Clone, PartialEq)]
pub struct EraseAction {
    erased: Vec<StrokeAction>,
}

impl EraseAction {
    pub(crate) fn new(erased: Vec<StrokeAction>) -> Self {
        Self { erased }
    }

    pub fn erased(&self) -> &[StrokeAction] {
        &self.erased
    }

    pub(crate) fn into_erased(self) -> Vec<StrokeAction> {
        self.erased
    }
}

/// An entry of the action log
#[derive(Debug, Clone, PartialEq)]
pub enum WhiteboardAction {
    Stroke(StrokeAction),
    Erase(EraseAction),
}

impl WhiteboardAction {
    /// Draw the entry; erase records carry no geometry and draw nothing
    pub fn apply(&self, compositor: &mut dyn RasterCompositor, raster: &mut RgbaImage) {
        match self {
            WhiteboardAction::Stroke(stroke) => stroke.draw(compositor, raster),
            WhiteboardAction::Erase(_) => {}
        }
    }

    /// Region the eraser tests against; empty for erase records
    pub fn hit_region(&self, clip: IntRect) -> Region {
        match self {
            WhiteboardAction::Stroke(stroke) => stroke.shape.hit_region(clip),
            WhiteboardAction::Erase(_) => Region::empty(),
        }
    }

    pub fn as_stroke(&self) -> Option<&StrokeAction> {
        match self {
            WhiteboardAction::Stroke(stroke) => Some(stroke),
            WhiteboardAction::Erase(_) => None,
        }
    }

    pub fn is_erase(&self) -> bool {
        matches!(self, WhiteboardAction::Erase(_))
    }
}

impl From<StrokeAction> for WhiteboardAction {
    fn from(stroke: StrokeAction) -> Self {
        WhiteboardAction::Stroke(stroke)
    }
}
