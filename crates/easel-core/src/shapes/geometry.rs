//! Vector shape outlines.

use super::ObjectGeometry;
use kurbo::{BezPath, Ellipse, Point, Rect, RoundedRect, Shape as KurboShape, Size};
use serde::{Deserialize, Serialize};

/// Outline of a vector shape, in the object's unscaled local space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeGeometry {
    Rect {
        #[serde(default)]
        corner_radius: f64,
    },
    Ellipse,
    /// Apex at the top center.
    Triangle,
    /// Closed polygon; points lie inside `0..width`, `0..height`.
    Polygon { points: Vec<Point> },
}

impl ObjectGeometry for ShapeGeometry {
    fn type_name(&self) -> &'static str {
        match self {
            ShapeGeometry::Rect { .. } => "Rectangle",
            ShapeGeometry::Ellipse => "Ellipse",
            ShapeGeometry::Triangle => "Triangle",
            ShapeGeometry::Polygon { .. } => "Polygon",
        }
    }

    fn local_path(&self, size: Size) -> BezPath {
        let rect = Rect::from_origin_size(Point::ZERO, size);
        match self {
            ShapeGeometry::Rect { corner_radius } if *corner_radius > 0.0 => {
                RoundedRect::from_rect(rect, *corner_radius).to_path(0.1)
            }
            ShapeGeometry::Rect { .. } => rect.to_path(0.1),
            ShapeGeometry::Ellipse => Ellipse::from_rect(rect).to_path(0.1),
            ShapeGeometry::Triangle => polygon_path(&[
                Point::new(size.width / 2.0, 0.0),
                Point::new(size.width, size.height),
                Point::new(0.0, size.height),
            ]),
            ShapeGeometry::Polygon { points } => polygon_path(points),
        }
    }
}

fn polygon_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some(first) = points.first() else {
        return path;
    };
    path.move_to(*first);
    for point in &points[1..] {
        path.line_to(*point);
    }
    path.close_path();
    path
}
