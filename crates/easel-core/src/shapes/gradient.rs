//! Linear and radial gradient fills.

use super::color::SerializableColor;
use crate::error::{EditorError, EditorResult};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Gradient type requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradientKind {
    Linear,
    Radial,
}

/// A color at a relative offset (0..=1) along the gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub offset: f64,
    pub color: SerializableColor,
}

/// Gradient geometry, expressed in the object's scaled box
/// (origin at its top-left corner).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gradient {
    Linear {
        start: Point,
        end: Point,
        stops: Vec<ColorStop>,
    },
    Radial {
        center: Point,
        radius: f64,
        stops: Vec<ColorStop>,
    },
}

impl Gradient {
    /// Build a gradient over a box of `size`.
    ///
    /// Linear gradients run through the box center along `angle_degrees`,
    /// spanning the full width and height. Radial gradients start at the
    /// center and reach half of the longer side. Stops are spread evenly.
    pub fn new(
        kind: GradientKind,
        colors: &[SerializableColor],
        angle_degrees: f64,
        size: Size,
    ) -> EditorResult<Self> {
        if colors.len() < 2 {
            return Err(EditorError::invalid(
                "gradient colors",
                format!("need at least 2 colors, got {}", colors.len()),
            ));
        }
        if !angle_degrees.is_finite() {
            return Err(EditorError::invalid("gradient angle", "not a finite number"));
        }

        let stops = even_stops(colors);
        let (w, h) = (size.width, size.height);
        Ok(match kind {
            GradientKind::Linear => {
                let angle = angle_degrees.to_radians();
                let (dx, dy) = (angle.cos() * w / 2.0, angle.sin() * h / 2.0);
                Gradient::Linear {
                    start: Point::new(w / 2.0 - dx, h / 2.0 - dy),
                    end: Point::new(w / 2.0 + dx, h / 2.0 + dy),
                    stops,
                }
            }
            GradientKind::Radial => Gradient::Radial {
                center: Point::new(w / 2.0, h / 2.0),
                radius: w.max(h) / 2.0,
                stops,
            },
        })
    }

    pub fn kind(&self) -> GradientKind {
        match self {
            Gradient::Linear { .. } => GradientKind::Linear,
            Gradient::Radial { .. } => GradientKind::Radial,
        }
    }

    pub fn stops(&self) -> &[ColorStop] {
        match self {
            Gradient::Linear { stops, .. } | Gradient::Radial { stops, .. } => stops,
        }
    }
}

fn even_stops(colors: &[SerializableColor]) -> Vec<ColorStop> {
    let last = (colors.len() - 1) as f64;
    colors
        .iter()
        .enumerate()
        .map(|(i, color)| ColorStop {
            offset: i as f64 / last,
            color: *color,
        })
        .collect()
}
