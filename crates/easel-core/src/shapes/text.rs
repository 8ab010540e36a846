//! Text objects.

use super::ObjectGeometry;
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Size};
use serde::{Deserialize, Serialize};

/// Font style options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// Horizontal alignment of text lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "left" => Some(TextAlign::Left),
            "center" => Some(TextAlign::Center),
            "right" => Some(TextAlign::Right),
            "justify" => Some(TextAlign::Justify),
            _ => None,
        }
    }
}

fn default_font_weight() -> u16 {
    Text::DEFAULT_FONT_WEIGHT
}

/// A text object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    /// The text content.
    pub content: String,
    /// Font family name as understood by the renderer.
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// CSS-style numeric weight (100..=900).
    #[serde(default = "default_font_weight")]
    pub font_weight: u16,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub text_align: TextAlign,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub linethrough: bool,
}

impl Text {
    pub const DEFAULT_FONT_WEIGHT: u16 = 400;

    /// Line height relative to the font size.
    pub const LINE_HEIGHT: f64 = 1.16;

    pub fn new(content: impl Into<String>, font_family: impl Into<String>, font_size: f64) -> Self {
        Self {
            content: content.into(),
            font_family: font_family.into(),
            font_size,
            font_weight: Self::DEFAULT_FONT_WEIGHT,
            font_style: FontStyle::Normal,
            text_align: TextAlign::Left,
            underline: false,
            linethrough: false,
        }
    }

    pub fn with_font_weight(mut self, weight: u16) -> Self {
        self.font_weight = weight;
        self
    }

    pub fn with_decoration(
        mut self,
        style: FontStyle,
        align: TextAlign,
        underline: bool,
        linethrough: bool,
    ) -> Self {
        self.font_style = style;
        self.text_align = align;
        self.underline = underline;
        self.linethrough = linethrough;
        self
    }

    fn line_count(&self) -> usize {
        let count = self.content.lines().count().max(1);
        if self.content.ends_with('\n') {
            count + 1
        } else {
            count
        }
    }

    /// Approximate width based on character count and font size.
    /// The renderer's layout is authoritative; this only sizes new boxes.
    pub fn approximate_width(&self) -> f64 {
        let max_line_len = self
            .content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);

        let char_width_factor = if self.font_weight >= 600 { 0.6 } else { 0.55 };
        max_line_len as f64 * self.font_size * char_width_factor
    }

    /// Height of all lines at the configured line height.
    pub fn approximate_height(&self) -> f64 {
        self.line_count() as f64 * self.font_size * Self::LINE_HEIGHT
    }

    /// Approximate layout size, never smaller than one font-size square.
    pub fn measure(&self) -> Size {
        Size::new(
            self.approximate_width().max(self.font_size),
            self.approximate_height(),
        )
    }
}

impl ObjectGeometry for Text {
    fn type_name(&self) -> &'static str {
        "Text"
    }

    fn local_path(&self, size: Size) -> BezPath {
        Rect::from_origin_size(Point::ZERO, size).to_path(0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_creation() {
        let text = Text::new("Hello", "Arial", 32.0);
        assert_eq!(text.content, "Hello");
        assert_eq!(text.font_weight, 400);
        assert_eq!(text.text_align, TextAlign::Left);
    }

    #[test]
    fn test_measure_multiline() {
        let text = Text::new("ab\nabcd", "Arial", 10.0);
        let size = text.measure();
        assert!((size.width - 22.0).abs() < 1e-9);
        assert!((size.height - 23.2).abs() < 1e-9);
    }

    #[test]
    fn test_trailing_newline_adds_line() {
        let text = Text::new("a\n", "Arial", 10.0);
        assert!((text.approximate_height() - 23.2).abs() < 1e-9);
    }

    #[test]
    fn test_empty_text_has_size() {
        let size = Text::new("", "Arial", 20.0).measure();
        assert_eq!(size.width, 20.0);
        assert!(size.height > 0.0);
    }

    #[test]
    fn test_align_from_name() {
        assert_eq!(TextAlign::from_name("Center"), Some(TextAlign::Center));
        assert_eq!(TextAlign::from_name("middle"), None);
    }
}
