//! # Cleanbot Designer
//!
//! Route design for the cleaning robot: an orthogonal drawing canvas, the
//! compiler that turns drawn segments into timed turn and move instructions,
//! the speed-to-time model, and the route file formats.
//!
//! ```text
//! Canvas (segments, waypoints)
//!   └── RouteCompiler (heading fold + timing model)
//!         ├── Instruction list  ──> scheduler
//!         └── Export file (route_esp32.json)
//!
//! RouteStats / RouteRecord (save and load)
//! ```
//!
//! ```rust,ignore
//! use cleanbot_designer::{Canvas, RouteCompiler};
//!
//! let mut canvas = Canvas::new();
//! canvas.toggle_drawing_mode();
//! canvas.press(Point::new(100.0, 100.0));
//! canvas.press(Point::new(150.0, 100.0));
//!
//! let instructions = RouteCompiler::default().compile(canvas.segments());
//! ```

pub mod canvas;
pub mod compiler;
pub mod export;
pub mod serialization;
pub mod timing;

pub use canvas::{snap, Canvas, StrokePreview};
pub use compiler::{Direction, Instruction, RouteCompiler, Turn};
pub use export::{to_export_json, write_export, ExportCoords, ExportEntry};
pub use serialization::RouteRecord;
pub use timing::{move_duration_ms, RouteStats};
