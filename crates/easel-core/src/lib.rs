//! Easel Core Library
//!
//! Scene-editing engine for the Easel design editor: a fixed-size workspace
//! holding shapes, text and images, with snapshot undo/redo, snapping guides
//! and viewport auto-fit. Rendering and decoding are left to the host.

pub mod clipboard;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod events;
pub mod export;
pub mod history;
pub mod image_load;
pub mod scene;
pub mod selection;
pub mod shapes;
pub mod snap;
pub mod viewport;

pub use clipboard::Clipboard;
pub use commands::{Command, KeyChord};
pub use config::{EditorConfig, StyleDefaults};
pub use editor::{Alignment, Editor, InteractionKind, LayerInfo, NudgeDirection, SavePayload};
pub use error::{EditorError, EditorResult};
pub use events::{EditorEvent, SubscriptionId};
pub use export::{ExportFormat, ExportOutput, ExportRequest, RasterTarget, Rasterizer};
pub use history::History;
pub use image_load::{DecodedImage, ImagePlacement, LoadTicket};
pub use scene::Scene;
pub use selection::Selection;
pub use shapes::{ObjectId, ObjectKey, ObjectKind, SceneObject, ShapeKind};
pub use snap::{GuideSegment, SnapGuide, SnapSettings, compute_snap};
pub use viewport::Viewport;
