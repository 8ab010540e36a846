//! Free-drawn brush strokes.

use super::ObjectGeometry;
use super::presets::points_bounds;
use kurbo::{BezPath, Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// A brush stroke stored as a polyline in local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreehandPath {
    pub points: Vec<Point>,
}

impl FreehandPath {
    /// Tolerance used when committing strokes.
    pub const SIMPLIFY_TOLERANCE: f64 = 0.5;

    /// Build a stroke from scene-space points. Returns the path with points
    /// relative to its bounding box, and that box in scene space.
    pub fn from_scene_points(points: &[Point]) -> (Self, Rect) {
        let bounds = points_bounds(points);
        let local = points
            .iter()
            .map(|p| Point::new(p.x - bounds.x0, p.y - bounds.y0))
            .collect();
        (Self { points: local }, bounds)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Simplify the path by removing redundant points.
    pub fn simplify(&mut self, tolerance: f64) {
        if self.points.len() < 3 {
            return;
        }

        self.points = rdp_simplify(&self.points, tolerance);
    }
}

/// Ramer-Douglas-Peucker line simplification.
fn rdp_simplify(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let first = points[0];
    let last = points[points.len() - 1];

    let mut max_dist = 0.0;
    let mut max_index = 0;

    for (i, point) in points.iter().enumerate().skip(1).take(points.len() - 2) {
        let dist = perpendicular_distance(*point, first, last);
        if dist > max_dist {
            max_dist = dist;
            max_index = i;
        }
    }

    if max_dist > tolerance {
        let mut left = rdp_simplify(&points[..=max_index], tolerance);
        let right = rdp_simplify(&points[max_index..], tolerance);

        // Junction point appears in both halves.
        left.pop();
        left.extend(right);
        left
    } else {
        vec![first, last]
    }
}

fn perpendicular_distance(point: Point, line_start: Point, line_end: Point) -> f64 {
    let dx = line_end.x - line_start.x;
    let dy = line_end.y - line_start.y;

    let line_len_sq = dx * dx + dy * dy;
    if line_len_sq < f64::EPSILON {
        return (point - line_start).hypot();
    }

    let area2 = ((point.x - line_start.x) * dy - (point.y - line_start.y) * dx).abs();
    area2 / line_len_sq.sqrt()
}

impl ObjectGeometry for FreehandPath {
    fn type_name(&self) -> &'static str {
        "Path"
    }

    /// The polyline as drawn; strokes are not stretched to `size`.
    fn local_path(&self, _size: Size) -> BezPath {
        let mut path = BezPath::new();
        let Some(first) = self.points.first() else {
            return path;
        };
        path.move_to(*first);
        for point in &self.points[1..] {
            path.line_to(*point);
        }
        path
    }
}
