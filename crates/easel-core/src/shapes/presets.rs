//! Preset shapes offered by the shape picker.

use super::geometry::ShapeGeometry;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Corner radius of the soft rectangle preset.
pub const SOFT_RECT_RADIUS: f64 = 50.0;

/// Shapes that can be added from the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Rectangle,
    SoftRectangle,
    Circle,
    Triangle,
    InverseTriangle,
    Diamond,
    Star,
    Heart,
    Arrow,
    Pentagon,
    Hexagon,
}

impl ShapeKind {
    /// All presets in picker order.
    pub fn all() -> &'static [ShapeKind] {
        &[
            ShapeKind::Circle,
            ShapeKind::SoftRectangle,
            ShapeKind::Rectangle,
            ShapeKind::Triangle,
            ShapeKind::InverseTriangle,
            ShapeKind::Diamond,
            ShapeKind::Star,
            ShapeKind::Heart,
            ShapeKind::Arrow,
            ShapeKind::Pentagon,
            ShapeKind::Hexagon,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::SoftRectangle => "Soft rectangle",
            ShapeKind::Circle => "Circle",
            ShapeKind::Triangle => "Triangle",
            ShapeKind::InverseTriangle => "Inverse triangle",
            ShapeKind::Diamond => "Diamond",
            ShapeKind::Star => "Star",
            ShapeKind::Heart => "Heart",
            ShapeKind::Arrow => "Arrow",
            ShapeKind::Pentagon => "Pentagon",
            ShapeKind::Hexagon => "Hexagon",
        }
    }

    /// Default unscaled size of a freshly added shape.
    pub fn default_size(&self) -> Size {
        match self {
            ShapeKind::Rectangle | ShapeKind::SoftRectangle => Size::new(400.0, 400.0),
            ShapeKind::Circle => Size::new(450.0, 450.0),
            ShapeKind::Triangle | ShapeKind::InverseTriangle => Size::new(400.0, 400.0),
            ShapeKind::Diamond => Size::new(600.0, 600.0),
            ShapeKind::Star => Size::new(400.0, 400.0),
            ShapeKind::Heart | ShapeKind::Arrow => Size::new(400.0, 400.0),
            ShapeKind::Pentagon | ShapeKind::Hexagon => Size::new(400.0, 400.0),
        }
    }

    /// Geometry of the preset at its default size.
    pub fn geometry(&self) -> ShapeGeometry {
        let size = self.default_size();
        match self {
            ShapeKind::Rectangle => ShapeGeometry::Rect { corner_radius: 0.0 },
            ShapeKind::SoftRectangle => ShapeGeometry::Rect {
                corner_radius: SOFT_RECT_RADIUS,
            },
            ShapeKind::Circle => ShapeGeometry::Ellipse,
            ShapeKind::Triangle => ShapeGeometry::Triangle,
            ShapeKind::InverseTriangle => ShapeGeometry::Polygon {
                points: vec![
                    Point::new(0.0, 0.0),
                    Point::new(size.width, 0.0),
                    Point::new(size.width / 2.0, size.height),
                ],
            },
            ShapeKind::Diamond => ShapeGeometry::Polygon {
                points: vec![
                    Point::new(size.width / 2.0, 0.0),
                    Point::new(size.width, size.height / 2.0),
                    Point::new(size.width / 2.0, size.height),
                    Point::new(0.0, size.height / 2.0),
                ],
            },
            ShapeKind::Star => ShapeGeometry::Polygon {
                points: fit_points(&star_points(5, 200.0, 100.0), size),
            },
            ShapeKind::Heart => ShapeGeometry::Polygon {
                points: fit_points(&heart_points(100), size),
            },
            ShapeKind::Arrow => ShapeGeometry::Polygon {
                points: arrow_points(size.width, size.height, 0.3),
            },
            ShapeKind::Pentagon => ShapeGeometry::Polygon {
                points: fit_points(&regular_polygon_points(5, -PI / 2.0), size),
            },
            ShapeKind::Hexagon => ShapeGeometry::Polygon {
                points: fit_points(&regular_polygon_points(6, 0.0), size),
            },
        }
    }
}

/// Alternating outer/inner vertices, first point straight up.
pub fn star_points(spikes: usize, outer_radius: f64, inner_radius: f64) -> Vec<Point> {
    let step = PI / spikes as f64;
    (0..2 * spikes)
        .map(|i| {
            let radius = if i % 2 == 0 { outer_radius } else { inner_radius };
            let angle = i as f64 * step - PI / 2.0;
            Point::new(
                outer_radius + radius * angle.cos(),
                outer_radius + radius * angle.sin(),
            )
        })
        .collect()
}

/// Parametric heart curve sampled `steps + 1` times.
pub fn heart_points(steps: usize) -> Vec<Point> {
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64 * 2.0 * PI;
            let x = 16.0 * t.sin().powi(3);
            let y = -(13.0 * t.cos()
                - 5.0 * (2.0 * t).cos()
                - 2.0 * (3.0 * t).cos()
                - (4.0 * t).cos());
            Point::new(x, y)
        })
        .collect()
}

/// Downward block arrow: a shaft of 30% width, head taking `head_ratio` of the height.
pub fn arrow_points(width: f64, height: f64, head_ratio: f64) -> Vec<Point> {
    let shaft_height = height * (1.0 - head_ratio);
    let half_shaft = width * 0.3 / 2.0;
    let mid = width / 2.0;
    vec![
        Point::new(mid - half_shaft, 0.0),
        Point::new(mid + half_shaft, 0.0),
        Point::new(mid + half_shaft, shaft_height),
        Point::new(width, shaft_height),
        Point::new(mid, height),
        Point::new(0.0, shaft_height),
        Point::new(mid - half_shaft, shaft_height),
    ]
}

/// Vertices of a regular polygon on the unit circle.
pub fn regular_polygon_points(sides: usize, start_angle: f64) -> Vec<Point> {
    (0..sides)
        .map(|i| {
            let angle = i as f64 * 2.0 * PI / sides as f64 + start_angle;
            Point::new(angle.cos(), angle.sin())
        })
        .collect()
}

/// Bounding box of a point list.
pub fn points_bounds(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::ZERO;
    };
    points
        .iter()
        .skip(1)
        .fold(Rect::from_points(*first, *first), |acc, p| acc.union_pt(*p))
}

/// Translate and scale points so their bounding box becomes `0..width`, `0..height`.
pub fn fit_points(points: &[Point], size: Size) -> Vec<Point> {
    let bounds = points_bounds(points);
    let sx = if bounds.width() > 0.0 {
        size.width / bounds.width()
    } else {
        1.0
    };
    let sy = if bounds.height() > 0.0 {
        size.height / bounds.height()
    } else {
        1.0
    };
    points
        .iter()
        .map(|p| Point::new((p.x - bounds.x0) * sx, (p.y - bounds.y0) * sy))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_star_points() {
        let points = star_points(5, 200.0, 100.0);
        assert_eq!(points.len(), 10);
        // First spike points straight up from the center (200, 200).
        assert!((points[0].x - 200.0).abs() < EPS);
        assert!((points[0].y - 0.0).abs() < EPS);
    }

    #[test]
    fn test_heart_is_closed() {
        let points = heart_points(100);
        assert_eq!(points.len(), 101);
        let first = points[0];
        let last = points[100];
        assert!((first.x - last.x).abs() < 1e-6);
        assert!((first.y - last.y).abs() < 1e-6);
    }

    #[test]
    fn test_arrow_points() {
        let points = arrow_points(100.0, 100.0, 0.3);
        assert_eq!(points.len(), 7);
        assert_eq!(points[4], Point::new(50.0, 100.0));
        assert!((points[2].y - 70.0).abs() < EPS);
    }

    #[test]
    fn test_fit_points() {
        let points = fit_points(&regular_polygon_points(6, 0.0), Size::new(400.0, 400.0));
        let bounds = points_bounds(&points);
        assert!(bounds.x0.abs() < EPS);
        assert!(bounds.y0.abs() < EPS);
        assert!((bounds.width() - 400.0).abs() < EPS);
        assert!((bounds.height() - 400.0).abs() < EPS);
    }

    #[test]
    fn test_every_preset_fits_default_size() {
        for kind in ShapeKind::all() {
            let size = kind.default_size();
            if let ShapeGeometry::Polygon { points } = kind.geometry() {
                let bounds = points_bounds(&points);
                assert!(bounds.x1 <= size.width + EPS, "{:?}", kind);
                assert!(bounds.y1 <= size.height + EPS, "{:?}", kind);
            }
        }
    }
}
