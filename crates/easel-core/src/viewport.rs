//! Viewport pan/zoom and workspace auto-fit.

use crate::error::{EditorError, EditorResult, require_finite, require_positive};
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Default share of the container the workspace fills after auto-fit.
pub const DEFAULT_FIT_MARGIN: f64 = 0.85;

/// Maps object space to viewport (screen) space for the host container.
///
/// The transform is `translate(offset) * scale(zoom)`. `clip`, when set, is
/// the object-space region outside of which nothing is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Current translation offset (pan), in screen pixels.
    pub offset: Vec2,
    /// Current zoom level (1.0 = 100%).
    pub zoom: f64,
    /// Bounds for interactive zooming. Auto-fit ignores them.
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Size of the host container in screen pixels.
    pub container: Size,
    /// Object-space clip region, normally the workspace.
    pub clip: Option<Rect>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.1,
            max_zoom: 10.0,
            container: Size::ZERO,
            clip: None,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Object space to viewport space.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Viewport space to object space.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Map an object-space rectangle to viewport space.
    pub fn rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_points(
            self.world_to_screen(rect.origin()),
            self.world_to_screen(Point::new(rect.x1, rect.y1)),
        )
    }

    /// Map a viewport-space rectangle to object space.
    pub fn rect_to_world(&self, rect: Rect) -> Rect {
        Rect::from_points(
            self.screen_to_world(rect.origin()),
            self.screen_to_world(Point::new(rect.x1, rect.y1)),
        )
    }

    /// Center of the container in screen pixels.
    pub fn container_center(&self) -> Point {
        Point::new(self.container.width / 2.0, self.container.height / 2.0)
    }

    /// Object-space point shown at the container center.
    pub fn visible_center(&self) -> Point {
        self.screen_to_world(self.container_center())
    }

    /// Pan by a delta in screen pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom by `factor`, keeping the given screen point fixed.
    /// The result is clamped to `min_zoom..=max_zoom`.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        self.set_zoom_at(screen_point, new_zoom);
    }

    /// Set an absolute zoom, keeping the given screen point fixed.
    fn set_zoom_at(&mut self, screen_point: Point, zoom: f64) {
        if (zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let world_point = self.screen_to_world(screen_point);
        self.zoom = zoom;

        // Shift so world_point lands back on screen_point.
        let new_screen = self.world_to_screen(world_point);
        self.offset += screen_point - new_screen;
    }

    /// Reset to the identity transform.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
    }

    /// Largest zoom at which `bounds` fits inside the container.
    pub fn fit_scale(bounds: Rect, container: Size) -> f64 {
        (container.width / bounds.width()).min(container.height / bounds.height())
    }

    /// Fit the workspace into `container`.
    ///
    /// Zoom becomes `margin * fit_scale`, unclamped. The workspace center is
    /// then placed at the container center and the clip region set to the
    /// workspace. Calling this twice with the same inputs gives the same
    /// result. Returns the new zoom.
    pub fn auto_fit(&mut self, workspace: Rect, container: Size, margin: f64) -> EditorResult<f64> {
        require_positive("container width", container.width)?;
        require_positive("container height", container.height)?;
        require_positive("fit margin", margin)?;
        for value in [workspace.x0, workspace.y0, workspace.x1, workspace.y1] {
            require_finite("workspace bounds", value)?;
        }
        if workspace.width() <= 0.0 || workspace.height() <= 0.0 {
            return Err(EditorError::invalid(
                "workspace size",
                format!("{}x{} is not positive", workspace.width(), workspace.height()),
            ));
        }

        self.container = container;
        let zoom = margin * Self::fit_scale(workspace, container);

        self.reset();
        let center = self.container_center();
        self.set_zoom_at(center, zoom);

        let workspace_center = workspace.center();
        self.offset = Vec2::new(
            center.x - workspace_center.x * self.zoom,
            center.y - workspace_center.y * self.zoom,
        );
        self.clip = Some(workspace);
        Ok(self.zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::new();
        assert_eq!(viewport.offset, Vec2::ZERO);
        assert!((viewport.zoom - 1.0).abs() < f64::EPSILON);
        assert!(viewport.clip.is_none());
    }

    #[test]
    fn test_screen_to_world_with_offset_and_zoom() {
        let mut viewport = Viewport::new();
        viewport.offset = Vec2::new(50.0, 100.0);
        viewport.zoom = 2.0;
        let world = viewport.screen_to_world(Point::new(150.0, 300.0));
        assert!((world.x - 50.0).abs() < EPS);
        assert!((world.y - 100.0).abs() < EPS);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut viewport = Viewport::new();
        viewport.offset = Vec2::new(30.0, -20.0);
        viewport.zoom = 1.5;

        let original = Point::new(123.0, 456.0);
        let back = viewport.world_to_screen(viewport.screen_to_world(original));
        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_at_keeps_point_fixed() {
        let mut viewport = Viewport::new();
        let anchor = Point::new(200.0, 100.0);
        let before = viewport.screen_to_world(anchor);
        viewport.zoom_at(anchor, 2.0);
        let after = viewport.screen_to_world(anchor);
        assert!((before.x - after.x).abs() < EPS);
        assert!((before.y - after.y).abs() < EPS);
        assert!((viewport.zoom - 2.0).abs() < EPS);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut viewport = Viewport::new();
        viewport.zoom_at(Point::ZERO, 0.001);
        assert!((viewport.zoom - viewport.min_zoom).abs() < f64::EPSILON);

        viewport.zoom_at(Point::ZERO, 1000.0);
        assert!((viewport.zoom - viewport.max_zoom).abs() < f64::EPSILON);
    }

    #[test]
    fn test_auto_fit_centers_workspace() {
        let mut viewport = Viewport::new();
        let workspace = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        let zoom = viewport
            .auto_fit(workspace, Size::new(800.0, 600.0), DEFAULT_FIT_MARGIN)
            .unwrap();

        let expected = 0.85 * (800.0_f64 / 1920.0).min(600.0 / 1080.0);
        assert!((zoom - expected).abs() < EPS);
        let center = viewport.world_to_screen(workspace.center());
        assert!((center.x - 400.0).abs() < EPS);
        assert!((center.y - 300.0).abs() < EPS);
        assert_eq!(viewport.clip, Some(workspace));
    }

    #[test]
    fn test_auto_fit_is_idempotent() {
        let mut viewport = Viewport::new();
        let workspace = Rect::new(-100.0, 50.0, 800.0, 950.0);
        viewport.auto_fit(workspace, Size::new(1024.0, 768.0), 0.85).unwrap();
        let first = viewport.clone();
        viewport.auto_fit(workspace, Size::new(1024.0, 768.0), 0.85).unwrap();
        assert!((viewport.zoom - first.zoom).abs() < EPS);
        assert!((viewport.offset - first.offset).hypot() < EPS);
    }

    #[test]
    fn test_auto_fit_is_not_clamped() {
        let mut viewport = Viewport::new();
        let zoom = viewport
            .auto_fit(Rect::new(0.0, 0.0, 100_000.0, 100_000.0), Size::new(500.0, 500.0), 0.85)
            .unwrap();
        assert!(zoom < viewport.min_zoom);
    }

    #[test]
    fn test_auto_fit_rejects_degenerate_input() {
        let mut viewport = Viewport::new();
        let workspace = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(viewport.auto_fit(workspace, Size::new(0.0, 600.0), 0.85).is_err());
        assert!(
            viewport
                .auto_fit(Rect::new(0.0, 0.0, 0.0, 10.0), Size::new(800.0, 600.0), 0.85)
                .is_err()
        );
        assert!(viewport.auto_fit(workspace, Size::new(f64::NAN, 600.0), 0.85).is_err());
        assert_eq!(viewport, Viewport::new());
    }

    #[test]
    fn test_rect_mapping() {
        let mut viewport = Viewport::new();
        viewport.zoom = 2.0;
        viewport.offset = Vec2::new(10.0, 10.0);
        let screen = viewport.rect_to_screen(Rect::new(0.0, 0.0, 5.0, 5.0));
        assert_eq!(screen, Rect::new(10.0, 10.0, 20.0, 20.0));
        assert_eq!(viewport.rect_to_world(screen), Rect::new(0.0, 0.0, 5.0, 5.0));
    }
}
