use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::WhiteboardResult;

/// Minimum movement (in either axis) before a new sample extends the stroke
pub const TOUCH_TOLERANCE: f32 = 4.0;
/// Half the side of the square eraser hit-region
pub const ERASER_HALF_WIDTH: i32 = 10;
pub const DEFAULT_STROKE_WIDTH: u32 = 6;

/// User-tunable whiteboard settings.
///
/// Missing fields fall back to their defaults when deserializing, so older
/// saved configurations keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhiteboardConfig {
    /// Width of newly drawn strokes
    pub stroke_width: u32,
    /// Night theme: white pen, black export background
    pub inverted: bool,
    /// Forward second-finger scrolls and taps to the content behind the board
    pub handle_multi_touch: bool,
    /// Only stylus contacts draw
    pub stylus_only: bool,
    pub eraser_half_width: i32,
    pub touch_tolerance: f32,
}

impl Default for WhiteboardConfig {
    fn default() -> Self {
        Self {
            stroke_width: DEFAULT_STROKE_WIDTH,
            inverted: false,
            handle_multi_touch: true,
            stylus_only: false,
            eraser_half_width: ERASER_HALF_WIDTH,
            touch_tolerance: TOUCH_TOLERANCE,
        }
    }
}

impl WhiteboardConfig {
    pub fn from_json_str(json: &str) -> WhiteboardResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> WhiteboardResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> WhiteboardResult<Self> {
        let json = fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded whiteboard config from {}", path.display());
        Ok(config)
    }
}
