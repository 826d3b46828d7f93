#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod export;
pub mod geometry;
pub mod history;
pub mod pages;
pub mod panels;
pub mod persistence;
pub mod renderer;
pub mod stroke;
pub mod toast;
pub mod tools;
pub mod util;

pub use app::WhiteboardApp;
pub use canvas::CanvasController;
pub use geometry::BoundingBox;
pub use history::{History, StrokeHistory};
pub use pages::{AspectRatio, Page, PageCollection};
pub use renderer::CanvasTransform;
pub use stroke::{PenConfig, ShapeKind, Stroke, StrokeGeometry};
pub use tools::{Tool, ToolSettings};
