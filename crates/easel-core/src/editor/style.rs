//! Style setters and getters.
//!
//! Setters apply to the whole selection, update the last-used defaults, and
//! commit once. With nothing selected they only update the defaults.
//! Getters read the primary selected object and fall back to the defaults.

use super::Editor;
use crate::error::{EditorError, EditorResult, require_finite, require_non_negative, require_positive};
use crate::events::EditorEvent;
use crate::shapes::{
    FontStyle, Gradient, GradientKind, ObjectKind, Paint, SerializableColor, Shadow,
    ShapeGeometry, Text, TextAlign,
};
use kurbo::Size;

impl Editor {
    pub fn set_fill(&mut self, color: SerializableColor) -> EditorResult<bool> {
        self.defaults.fill = color;
        let changed = self.update_selected(|object| {
            let fill = Some(Paint::Solid(color));
            if object.style.fill == fill {
                return false;
            }
            object.style.fill = fill;
            true
        });
        self.commit_if(changed)
    }

    pub fn set_stroke(&mut self, color: SerializableColor) -> EditorResult<bool> {
        self.defaults.stroke = color;
        let changed = self.update_selected(|object| {
            if object.style.stroke == Some(color) {
                return false;
            }
            object.style.stroke = Some(color);
            true
        });
        self.commit_if(changed)
    }

    pub fn set_stroke_width(&mut self, width: f64) -> EditorResult<bool> {
        let width = require_non_negative("stroke width", width)?;
        self.defaults.stroke_width = width;
        let changed = self.update_selected(|object| {
            if object.style.stroke_width == width {
                return false;
            }
            object.style.stroke_width = width;
            true
        });
        self.commit_if(changed)
    }

    /// Set the dash pattern; an empty pattern draws solid lines.
    pub fn set_stroke_dash_array(&mut self, pattern: Vec<f64>) -> EditorResult<bool> {
        for value in &pattern {
            require_non_negative("stroke dash", *value)?;
        }
        self.defaults.stroke_dash_array = pattern.clone();
        let changed = self.update_selected(|object| {
            if object.style.stroke_dash_array == pattern {
                return false;
            }
            object.style.stroke_dash_array = pattern.clone();
            true
        });
        self.commit_if(changed)
    }

    pub fn set_opacity(&mut self, opacity: f64) -> EditorResult<bool> {
        let opacity = require_finite("opacity", opacity)?;
        if !(0.0..=1.0).contains(&opacity) {
            return Err(EditorError::invalid("opacity", format!("{opacity} is outside 0..=1")));
        }
        self.defaults.opacity = opacity;
        let changed = self.update_selected(|object| {
            if object.style.opacity == opacity {
                return false;
            }
            object.style.opacity = opacity;
            true
        });
        self.commit_if(changed)
    }

    /// Replace the fill of each selected object with a gradient sized to
    /// its scaled box. Nothing changes if any gradient cannot be built.
    pub fn apply_gradient(
        &mut self,
        colors: &[SerializableColor],
        angle_degrees: f64,
        kind: GradientKind,
    ) -> EditorResult<bool> {
        // Validate before touching anything, even with an empty selection.
        Gradient::new(kind, colors, angle_degrees, Size::new(1.0, 1.0))?;

        let mut gradients = Vec::new();
        for object in self.selection.objects(&self.scene) {
            let gradient = Gradient::new(kind, colors, angle_degrees, object.frame.scaled_size())?;
            gradients.push((object.key(), gradient));
        }
        let mut changed = false;
        for (key, gradient) in gradients {
            if let Some(object) = self.scene.get_mut(key) {
                object.style.fill = Some(Paint::Gradient(gradient));
                changed = true;
                self.notify(EditorEvent::ObjectModified(key));
            }
        }
        self.commit_if(changed)
    }

    fn update_texts(&mut self, mut f: impl FnMut(&mut Text) -> bool) -> bool {
        self.update_selected(|object| {
            let changed = match object.as_text_mut() {
                Some(text) => f(text),
                None => false,
            };
            if changed {
                object.refit_text();
            }
            changed
        })
    }

    /// Replace the content of selected text objects.
    pub fn set_text(&mut self, content: &str) -> EditorResult<bool> {
        let changed = self.update_texts(|text| {
            if text.content == content {
                return false;
            }
            text.content = content.to_string();
            true
        });
        self.commit_if(changed)
    }

    pub fn set_font_family(&mut self, family: &str) -> EditorResult<bool> {
        let family = family.trim();
        if family.is_empty() {
            return Err(EditorError::invalid("font family", "empty name"));
        }
        self.defaults.font_family = family.to_string();
        let changed = self.update_texts(|text| {
            if text.font_family == family {
                return false;
            }
            text.font_family = family.to_string();
            true
        });
        self.commit_if(changed)
    }

    pub fn set_font_size(&mut self, size: f64) -> EditorResult<bool> {
        let size = require_positive("font size", size)?;
        self.defaults.font_size = size;
        let changed = self.update_texts(|text| {
            if text.font_size == size {
                return false;
            }
            text.font_size = size;
            true
        });
        self.commit_if(changed)
    }

    pub fn set_font_weight(&mut self, weight: u16) -> EditorResult<bool> {
        if !(1..=1000).contains(&weight) {
            return Err(EditorError::invalid("font weight", format!("{weight} is outside 1..=1000")));
        }
        self.defaults.font_weight = weight;
        let changed = self.update_texts(|text| {
            if text.font_weight == weight {
                return false;
            }
            text.font_weight = weight;
            true
        });
        self.commit_if(changed)
    }

    pub fn set_font_style(&mut self, style: FontStyle) -> EditorResult<bool> {
        self.defaults.font_style = style;
        let changed = self.update_texts(|text| {
            if text.font_style == style {
                return false;
            }
            text.font_style = style;
            true
        });
        self.commit_if(changed)
    }

    pub fn set_text_align(&mut self, align: TextAlign) -> EditorResult<bool> {
        self.defaults.text_align = align;
        let changed = self.update_texts(|text| {
            if text.text_align == align {
                return false;
            }
            text.text_align = align;
            true
        });
        self.commit_if(changed)
    }

    pub fn set_underline(&mut self, underline: bool) -> EditorResult<bool> {
        self.defaults.underline = underline;
        let changed = self.update_texts(|text| {
            if text.underline == underline {
                return false;
            }
            text.underline = underline;
            true
        });
        self.commit_if(changed)
    }

    pub fn set_linethrough(&mut self, linethrough: bool) -> EditorResult<bool> {
        self.defaults.linethrough = linethrough;
        let changed = self.update_texts(|text| {
            if text.linethrough == linethrough {
                return false;
            }
            text.linethrough = linethrough;
            true
        });
        self.commit_if(changed)
    }

    /// Set or remove the shadow on selected text objects.
    pub fn apply_text_shadow(&mut self, shadow: Option<Shadow>) -> EditorResult<bool> {
        if let Some(shadow) = &shadow {
            require_non_negative("shadow blur", shadow.blur)?;
            require_finite("shadow offset", shadow.offset_x)?;
            require_finite("shadow offset", shadow.offset_y)?;
        }
        let changed = self.update_selected(|object| {
            if object.as_text().is_none() || object.shadow == shadow {
                return false;
            }
            object.shadow = shadow;
            true
        });
        self.commit_if(changed)
    }

    // --- getters ---

    /// Fill of the primary selection, else the default fill.
    pub fn fill(&self) -> Paint {
        self.primary_object()
            .and_then(|o| o.style.fill.clone())
            .unwrap_or(Paint::Solid(self.defaults.fill))
    }

    pub fn stroke(&self) -> SerializableColor {
        self.primary_object()
            .and_then(|o| o.style.stroke)
            .unwrap_or(self.defaults.stroke)
    }

    pub fn stroke_width(&self) -> f64 {
        self.primary_object()
            .map_or(self.defaults.stroke_width, |o| o.style.stroke_width)
    }

    pub fn stroke_dash_array(&self) -> Vec<f64> {
        self.primary_object()
            .map_or_else(|| self.defaults.stroke_dash_array.clone(), |o| o.style.stroke_dash_array.clone())
    }

    pub fn opacity(&self) -> f64 {
        self.primary_object()
            .map_or(self.defaults.opacity, |o| o.style.opacity)
    }

    fn primary_text(&self) -> Option<&Text> {
        self.primary_object().and_then(|o| o.as_text())
    }

    pub fn font_family(&self) -> String {
        self.primary_text()
            .map_or_else(|| self.defaults.font_family.clone(), |t| t.font_family.clone())
    }

    pub fn font_size(&self) -> f64 {
        self.primary_text()
            .map_or(self.defaults.font_size, |t| t.font_size)
    }

    pub fn font_weight(&self) -> u16 {
        self.primary_text()
            .map_or(self.defaults.font_weight, |t| t.font_weight)
    }

    pub fn font_style(&self) -> FontStyle {
        self.primary_text()
            .map_or(self.defaults.font_style, |t| t.font_style)
    }

    pub fn text_align(&self) -> TextAlign {
        self.primary_text()
            .map_or(self.defaults.text_align, |t| t.text_align)
    }

    pub fn underline(&self) -> bool {
        self.primary_text()
            .map_or(self.defaults.underline, |t| t.underline)
    }

    pub fn linethrough(&self) -> bool {
        self.primary_text()
            .map_or(self.defaults.linethrough, |t| t.linethrough)
    }

    /// Corner radius of the primary selection: an image's clip mask or a
    /// rectangle's own rounding. Zero otherwise.
    pub fn corner_radius(&self) -> f64 {
        let Some(object) = self.primary_object() else {
            return 0.0;
        };
        if let Some(clip) = &object.clip {
            return clip.radius();
        }
        match &object.kind {
            ObjectKind::Shape(ShapeGeometry::Rect { corner_radius }) => *corner_radius,
            _ => 0.0,
        }
    }
}
