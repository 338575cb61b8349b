#![warn(clippy::all, rust_2018_idioms)]

pub mod action;
pub mod app;
pub mod config;
pub mod eraser;
pub mod error;
pub mod event;
pub mod export;
pub mod geometry;
pub mod input;
pub mod renderer;
pub mod stroke;
pub mod util;
pub mod whiteboard;

pub use action::{ActionLog, EraseAction, StrokeAction, StrokeId, WhiteboardAction};
pub use app::WhiteboardApp;
pub use config::WhiteboardConfig;
pub use eraser::Eraser;
pub use error::{WhiteboardError, WhiteboardResult};
pub use event::{EventBus, EventHandler, HistoryState, WhiteboardEvent};
pub use input::{MultiTouchHandler, PointerEvent, PointerPhase, ToolKind};
pub use renderer::{RasterCompositor, SoftwareCompositor};
pub use stroke::{Paint, SmoothPath, StrokeBuilder, StrokeCap, StrokeJoin, StrokeShape};
pub use whiteboard::Whiteboard;
