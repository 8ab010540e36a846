//! Scene object definitions.

mod color;
mod frame;
mod geometry;
mod gradient;
mod image;
mod path;
pub mod presets;
mod text;

pub use color::{Paint, SerializableColor};
pub use frame::Frame;
pub use geometry::ShapeGeometry;
pub use gradient::{ColorStop, Gradient, GradientKind};
pub use image::{CropRect, Image, ImageFilter, ImageFormat, ImageSource};
pub use path::FreehandPath;
pub use presets::ShapeKind;
pub use text::{FontStyle, Text, TextAlign};

use kurbo::{BezPath, Point, Rect, RoundedRect, Shape as KurboShape, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persistent identifier, assigned lazily the first time a caller asks for it.
pub type ObjectId = Uuid;

/// Runtime handle for an object within one editor session. Never serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ObjectKey(pub(crate) u64);

/// Common behaviour of object kinds.
pub trait ObjectGeometry {
    /// Human-readable kind, used for layer labels.
    fn type_name(&self) -> &'static str;

    /// Outline in the object's unscaled local space for a box of `size`.
    fn local_path(&self, size: Size) -> BezPath;
}

/// What an object draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectKind {
    Shape(ShapeGeometry),
    Text(Text),
    Image(Image),
    Path(FreehandPath),
}

impl ObjectKind {
    pub fn geometry(&self) -> &dyn ObjectGeometry {
        match self {
            ObjectKind::Shape(g) => g as &dyn ObjectGeometry,
            ObjectKind::Text(t) => t,
            ObjectKind::Image(i) => i,
            ObjectKind::Path(p) => p,
        }
    }
}

fn default_stroke_width() -> f64 {
    1.0
}

fn default_opacity() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

/// Paint properties shared by every object kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectStyle {
    /// Fill paint (None = no fill).
    #[serde(default)]
    pub fill: Option<Paint>,
    /// Stroke color (None = no stroke).
    #[serde(default)]
    pub stroke: Option<SerializableColor>,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    /// Alternating dash and gap lengths; empty draws a solid line.
    #[serde(default)]
    pub stroke_dash_array: Vec<f64>,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

impl ObjectStyle {
    /// Flat fill color, if the fill is not a gradient.
    pub fn fill_color(&self) -> Option<SerializableColor> {
        self.fill.as_ref().and_then(Paint::as_color)
    }

    /// Fill color with opacity applied, for renderers.
    pub fn fill_with_opacity(&self) -> Option<SerializableColor> {
        self.fill_color().map(|c| c.with_opacity(self.opacity))
    }

    /// Stroke color with opacity applied, for renderers.
    pub fn stroke_with_opacity(&self) -> Option<SerializableColor> {
        self.stroke.map(|c| c.with_opacity(self.opacity))
    }
}

impl Default for ObjectStyle {
    fn default() -> Self {
        Self {
            fill: Some(Paint::Solid(SerializableColor::black())),
            stroke: None,
            stroke_width: default_stroke_width(),
            stroke_dash_array: Vec::new(),
            opacity: 1.0,
        }
    }
}

/// Drop shadow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub color: SerializableColor,
    pub blur: f64,
    #[serde(default)]
    pub offset_x: f64,
    #[serde(default)]
    pub offset_y: f64,
}

/// Per-axis transform locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LockFlags {
    #[serde(default)]
    pub movement_x: bool,
    #[serde(default)]
    pub movement_y: bool,
    #[serde(default)]
    pub rotation: bool,
    #[serde(default)]
    pub scaling_x: bool,
    #[serde(default)]
    pub scaling_y: bool,
}

impl LockFlags {
    pub fn all() -> Self {
        Self {
            movement_x: true,
            movement_y: true,
            rotation: true,
            scaling_x: true,
            scaling_y: true,
        }
    }

    /// Whether movement is locked on both axes.
    pub fn is_locked(&self) -> bool {
        self.movement_x && self.movement_y
    }
}

/// Whether the pointer can reach an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    #[serde(default = "default_true")]
    pub selectable: bool,
    #[serde(default = "default_true")]
    pub evented: bool,
    #[serde(default = "default_true")]
    pub has_controls: bool,
}

impl Interaction {
    /// Fully inert: not selectable, ignores pointer events, no handles.
    pub fn inert() -> Self {
        Self {
            selectable: false,
            evented: false,
            has_controls: false,
        }
    }
}

impl Default for Interaction {
    fn default() -> Self {
        Self {
            selectable: true,
            evented: true,
            has_controls: true,
        }
    }
}

/// Clip applied in the object's local space, centered on the object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ClipMask {
    RoundedRect { width: f64, height: f64, radius: f64 },
}

impl ClipMask {
    pub fn radius(&self) -> f64 {
        match self {
            ClipMask::RoundedRect { radius, .. } => *radius,
        }
    }

    /// Outline relative to the object center.
    pub fn to_path(&self) -> BezPath {
        match self {
            ClipMask::RoundedRect {
                width,
                height,
                radius,
            } => {
                let rect = Rect::new(-width / 2.0, -height / 2.0, width / 2.0, height / 2.0);
                RoundedRect::from_rect(rect, *radius).to_path(0.1)
            }
        }
    }
}

/// An object on the canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneObject {
    #[serde(skip)]
    pub(crate) key: ObjectKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<ObjectId>,
    /// Internal name; the workspace is recognized by it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Label chosen by the user in the layers panel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    pub kind: ObjectKind,
    pub frame: Frame,
    #[serde(default)]
    pub style: ObjectStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip: Option<ClipMask>,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locks: LockFlags,
    #[serde(default)]
    pub interaction: Interaction,
}

impl SceneObject {
    pub fn new(kind: ObjectKind, frame: Frame) -> Self {
        Self {
            key: ObjectKey::default(),
            id: None,
            name: None,
            custom_name: None,
            kind,
            frame,
            style: ObjectStyle::default(),
            shadow: None,
            clip: None,
            visible: true,
            locks: LockFlags::default(),
            interaction: Interaction::default(),
        }
    }

    pub fn with_style(mut self, style: ObjectStyle) -> Self {
        self.style = style;
        self
    }

    pub fn key(&self) -> ObjectKey {
        self.key
    }

    /// The persistent id, if one has been assigned.
    pub fn id(&self) -> Option<ObjectId> {
        self.id
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.geometry().type_name()
    }

    /// Label shown in the layers panel.
    pub fn display_name(&self) -> &str {
        self.custom_name.as_deref().unwrap_or_else(|| self.type_name())
    }

    /// Axis-aligned bounds in scene coordinates.
    pub fn bounds(&self) -> Rect {
        self.frame.bounds()
    }

    /// Outline in scene coordinates.
    pub fn to_path(&self) -> BezPath {
        let local = self
            .kind
            .geometry()
            .local_path(Size::new(self.frame.width, self.frame.height));
        self.frame.transform() * local
    }

    pub fn hit_test(&self, point: Point) -> bool {
        self.visible && self.frame.contains(point)
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, ObjectKind::Image(_))
    }

    pub fn as_text(&self) -> Option<&Text> {
        match &self.kind {
            ObjectKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match &mut self.kind {
            ObjectKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&Image> {
        match &self.kind {
            ObjectKind::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_image_mut(&mut self) -> Option<&mut Image> {
        match &mut self.kind {
            ObjectKind::Image(image) => Some(image),
            _ => None,
        }
    }

    /// Copy without identity, ready to be inserted as a new object.
    pub fn detached_clone(&self) -> Self {
        let mut clone = self.clone();
        clone.key = ObjectKey::default();
        clone.id = None;
        clone
    }

    /// Re-fit a text object's frame to its content after a text edit.
    pub(crate) fn refit_text(&mut self) {
        if let ObjectKind::Text(text) = &self.kind {
            let size = text.measure();
            self.frame.width = size.width;
            self.frame.height = size.height;
        }
    }
}
