//! Placement of an object in scene coordinates.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

fn default_scale() -> f64 {
    1.0
}

/// Position, size, scale, rotation and flips of an object.
///
/// `left`/`top` locate the unrotated, scaled box. Rotation happens about the
/// center of that box, so rotating never moves `left`/`top`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub left: f64,
    pub top: f64,
    /// Unscaled width.
    pub width: f64,
    /// Unscaled height.
    pub height: f64,
    #[serde(default = "default_scale")]
    pub scale_x: f64,
    #[serde(default = "default_scale")]
    pub scale_y: f64,
    /// Rotation in degrees, clockwise.
    #[serde(default)]
    pub angle: f64,
    #[serde(default)]
    pub flip_x: bool,
    #[serde(default)]
    pub flip_y: bool,
}

impl Frame {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
            flip_x: false,
            flip_y: false,
        }
    }

    /// Frame of the given size centered on `center`.
    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    /// Width and height after scaling.
    pub fn scaled_size(&self) -> Size {
        Size::new(self.width * self.scale_x.abs(), self.height * self.scale_y.abs())
    }

    /// The unrotated box.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size((self.left, self.top), self.scaled_size())
    }

    pub fn center(&self) -> Point {
        self.rect().center()
    }

    fn is_axis_aligned(&self) -> bool {
        self.angle.rem_euclid(360.0) == 0.0
    }

    /// Map from the object's unscaled local space (`0..width`, `0..height`)
    /// to scene coordinates.
    pub fn transform(&self) -> Affine {
        let size = self.scaled_size();
        let half = Vec2::new(size.width / 2.0, size.height / 2.0);
        let flip = Affine::scale_non_uniform(
            if self.flip_x { -1.0 } else { 1.0 },
            if self.flip_y { -1.0 } else { 1.0 },
        );
        Affine::translate(Vec2::new(self.left, self.top) + half)
            * Affine::rotate(self.angle.to_radians())
            * flip
            * Affine::translate(-half)
            * Affine::scale_non_uniform(self.scale_x.abs(), self.scale_y.abs())
    }

    /// Axis-aligned bounding box in scene coordinates, rotation included.
    pub fn bounds(&self) -> Rect {
        if self.is_axis_aligned() {
            return self.rect();
        }
        let affine = self.transform();
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(self.width, 0.0),
            Point::new(self.width, self.height),
            Point::new(0.0, self.height),
        ];
        let mut bounds = Rect::from_points(affine * corners[0], affine * corners[0]);
        for corner in &corners[1..] {
            bounds = bounds.union_pt(affine * *corner);
        }
        bounds
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.left += delta.x;
        self.top += delta.y;
    }

    /// Move so the unrotated box is centered on `center`.
    pub fn set_center(&mut self, center: Point) {
        let size = self.scaled_size();
        self.left = center.x - size.width / 2.0;
        self.top = center.y - size.height / 2.0;
    }

    /// Whether a scene-space point falls inside the (possibly rotated) box.
    pub fn contains(&self, point: Point) -> bool {
        let local = self.transform().inverse() * point;
        local.x >= 0.0 && local.x <= self.width && local.y >= 0.0 && local.y <= self.height
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}
