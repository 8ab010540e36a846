//! Creating objects: shapes, text, images and drawn strokes.

use super::Editor;
use crate::error::{EditorError, EditorResult, require_finite};
use crate::image_load::{
    DecodedImage, ImagePlacement, LoadTicket, Resolution, STICKER_SIZE,
};
use crate::shapes::{
    FreehandPath, Frame, Image, ImageSource, ObjectKey, ObjectKind, ObjectStyle, Paint,
    SceneObject, ShapeKind, Text,
};
use kurbo::{Point, Size};

impl Editor {
    /// Style for a new shape, from the last-used values.
    pub fn default_style(&self) -> ObjectStyle {
        let d = &self.defaults;
        ObjectStyle {
            fill: Some(Paint::Solid(d.fill)),
            stroke: Some(d.stroke),
            stroke_width: d.stroke_width,
            stroke_dash_array: d.stroke_dash_array.clone(),
            opacity: d.opacity,
        }
    }

    /// Insert, select alone, and commit.
    fn add_object(&mut self, object: SceneObject) -> EditorResult<ObjectKey> {
        let key = self.insert(object);
        self.select_keys([key]);
        self.commit()?;
        Ok(key)
    }

    /// Add a preset shape centered in view. `style` overrides the defaults.
    pub fn add_shape(&mut self, kind: ShapeKind, style: Option<ObjectStyle>) -> EditorResult<ObjectKey> {
        let size = kind.default_size();
        let frame = Frame::centered(self.placement_center(), size.width, size.height);
        let style = style.unwrap_or_else(|| self.default_style());
        let key = self.add_object(SceneObject::new(ObjectKind::Shape(kind.geometry()), frame).with_style(style))?;
        log::debug!("Added {}", kind.display_name());
        Ok(key)
    }

    /// Add a text box using the default font, centered in view.
    pub fn add_text(&mut self, content: &str, style: Option<ObjectStyle>) -> EditorResult<ObjectKey> {
        let text = Text::new(content, self.defaults.font_family.clone(), self.defaults.font_size)
            .with_font_weight(self.defaults.font_weight)
            .with_decoration(
                self.defaults.font_style,
                self.defaults.text_align,
                self.defaults.underline,
                self.defaults.linethrough,
            );
        let size = text.measure();
        let frame = Frame::centered(self.placement_center(), size.width, size.height);
        let style = style.unwrap_or_else(|| ObjectStyle {
            fill: Some(Paint::Solid(self.defaults.fill)),
            stroke: None,
            opacity: self.defaults.opacity,
            ..ObjectStyle::default()
        });
        self.add_object(SceneObject::new(ObjectKind::Text(text), frame).with_style(style))
    }

    /// Start loading an image that will be fitted to the workspace.
    ///
    /// Supersedes any load still in flight.
    pub fn begin_image_load(&mut self, source: ImageSource) -> LoadTicket {
        self.image_loads.begin(source, ImagePlacement::FitWorkspace)
    }

    /// Start loading a sticker image.
    pub fn begin_sticker_load(&mut self, source: ImageSource) -> LoadTicket {
        self.image_loads
            .begin(source, ImagePlacement::Sticker(STICKER_SIZE))
    }

    /// Finish a load started with [`Editor::begin_image_load`] or
    /// [`Editor::begin_sticker_load`].
    ///
    /// A superseded ticket is ignored and yields `Ok(None)`. A failed load
    /// returns [`EditorError::ImageLoad`] without touching the scene.
    pub fn complete_image_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<DecodedImage, String>,
    ) -> EditorResult<Option<ObjectKey>> {
        let pending = match self.image_loads.resolve(ticket) {
            Resolution::Current(pending) => pending,
            Resolution::Stale => {
                log::warn!("Ignoring stale image load {ticket:?}");
                return Ok(None);
            }
        };
        let decoded = result.map_err(|reason| {
            log::warn!("Image load failed for {}: {reason}", pending.source.to_url());
            EditorError::ImageLoad(reason)
        })?;
        self.place_image(decoded, pending.placement).map(Some)
    }

    /// Add an already decoded image, fitted to the workspace.
    pub fn add_image(&mut self, image: DecodedImage) -> EditorResult<ObjectKey> {
        self.place_image(image, ImagePlacement::FitWorkspace)
    }

    /// Add an already decoded image as a sticker.
    pub fn add_sticker(&mut self, image: DecodedImage) -> EditorResult<ObjectKey> {
        self.place_image(image, ImagePlacement::Sticker(STICKER_SIZE))
    }

    fn place_image(&mut self, decoded: DecodedImage, placement: ImagePlacement) -> EditorResult<ObjectKey> {
        if decoded.width == 0 || decoded.height == 0 {
            return Err(EditorError::ImageLoad(format!(
                "image has no pixels ({}x{})",
                decoded.width, decoded.height
            )));
        }
        let bounds = match placement {
            ImagePlacement::FitWorkspace => self
                .scene
                .workspace_rect()
                .ok_or(EditorError::MissingWorkspace)?
                .size(),
            ImagePlacement::Sticker(side) => Size::new(f64::from(side), f64::from(side)),
        };

        let image = Image::new(decoded.source, decoded.width, decoded.height);
        let scale = image.fit_scale(bounds);
        let natural = image.natural_size();
        let mut frame = Frame::new(0.0, 0.0, natural.width, natural.height);
        frame.scale_x = scale;
        frame.scale_y = scale;
        frame.set_center(self.placement_center());

        let object = SceneObject::new(ObjectKind::Image(image), frame).with_style(ObjectStyle {
            fill: None,
            stroke: None,
            ..ObjectStyle::default()
        });
        let key = self.add_object(object)?;
        log::debug!(
            "Added {}x{} image at scale {scale:.3}",
            decoded.width,
            decoded.height
        );
        Ok(key)
    }

    /// Turn on freehand drawing. The selection is dropped.
    pub fn enable_drawing_mode(&mut self) {
        self.clear_selection();
        self.drawing_mode = true;
    }

    pub fn disable_drawing_mode(&mut self) {
        self.drawing_mode = false;
    }

    /// Commit a drawn stroke as one path object using the stroke defaults.
    ///
    /// Ignored outside drawing mode or with fewer than two points.
    pub fn commit_stroke(&mut self, points: &[Point]) -> EditorResult<Option<ObjectKey>> {
        if !self.drawing_mode || points.len() < 2 {
            return Ok(None);
        }
        for point in points {
            require_finite("stroke point", point.x)?;
            require_finite("stroke point", point.y)?;
        }

        let (mut path, bounds) = FreehandPath::from_scene_points(points);
        path.simplify(FreehandPath::SIMPLIFY_TOLERANCE);
        let frame = Frame::new(bounds.x0, bounds.y0, bounds.width(), bounds.height());
        let style = ObjectStyle {
            fill: None,
            stroke: Some(self.defaults.stroke),
            stroke_width: self.defaults.stroke_width,
            stroke_dash_array: self.defaults.stroke_dash_array.clone(),
            opacity: self.defaults.opacity,
        };

        let key = self.insert(SceneObject::new(ObjectKind::Path(path), frame).with_style(style));
        self.commit()?;
        Ok(Some(key))
    }
}
