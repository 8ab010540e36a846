//! Image-only edits. Non-image objects in the selection are skipped.

use super::Editor;
use crate::error::{EditorError, EditorResult, require_finite, require_non_negative, require_positive};
use crate::shapes::{ClipMask, CropRect, ImageFilter, SceneObject};

impl Editor {
    fn update_images(&mut self, mut f: impl FnMut(&mut SceneObject) -> bool) -> bool {
        self.update_selected(|object| object.is_image() && f(object))
    }

    /// Mirror selected images around their vertical axis.
    pub fn flip_horizontal(&mut self) -> EditorResult<bool> {
        let changed = self.update_images(|object| {
            object.frame.flip_x = !object.frame.flip_x;
            true
        });
        self.commit_if(changed)
    }

    /// Mirror selected images around their horizontal axis.
    pub fn flip_vertical(&mut self) -> EditorResult<bool> {
        let changed = self.update_images(|object| {
            object.frame.flip_y = !object.frame.flip_y;
            true
        });
        self.commit_if(changed)
    }

    /// Rotate selected images by `delta_degrees` on top of their current angle.
    pub fn rotate(&mut self, delta_degrees: f64) -> EditorResult<bool> {
        let delta = require_finite("rotation", delta_degrees)?;
        if delta == 0.0 {
            return Ok(false);
        }
        let changed = self.update_images(|object| {
            if object.locks.rotation {
                return false;
            }
            object.frame.angle = (object.frame.angle + delta).rem_euclid(360.0);
            true
        });
        self.commit_if(changed)
    }

    /// Show only `crop` of each selected image's source pixels.
    ///
    /// The display box is not resized. The window must lie inside the
    /// image's natural size.
    pub fn crop_image(&mut self, crop: CropRect) -> EditorResult<bool> {
        require_non_negative("crop left", crop.x)?;
        require_non_negative("crop top", crop.y)?;
        require_positive("crop width", crop.width)?;
        require_positive("crop height", crop.height)?;

        for object in self.selection.objects(&self.scene) {
            if let Some(image) = object.as_image() {
                let natural = image.natural_size();
                if crop.x + crop.width > natural.width || crop.y + crop.height > natural.height {
                    return Err(EditorError::invalid(
                        "crop",
                        format!(
                            "{}x{} at ({}, {}) exceeds the {}x{} image",
                            crop.width, crop.height, crop.x, crop.y, natural.width, natural.height
                        ),
                    ));
                }
            }
        }

        let changed = self.update_selected(|object| match object.as_image_mut() {
            Some(image) if image.crop != Some(crop) => {
                image.crop = Some(crop);
                true
            }
            _ => false,
        });
        self.commit_if(changed)
    }

    /// Round the corners of selected images with a clip mask sized to the
    /// image's own box. A radius of 0 removes the mask.
    pub fn change_corner_radius(&mut self, radius: f64) -> EditorResult<bool> {
        let radius = require_non_negative("corner radius", radius)?;
        let changed = self.update_images(|object| {
            let clip = (radius > 0.0).then(|| ClipMask::RoundedRect {
                width: object.frame.width,
                height: object.frame.height,
                radius,
            });
            if object.clip == clip {
                return false;
            }
            object.clip = clip;
            true
        });
        self.commit_if(changed)
    }

    /// Set or clear the filter preset on selected images.
    pub fn change_image_filter(&mut self, filter: Option<ImageFilter>) -> EditorResult<bool> {
        let changed = self.update_selected(|object| match object.as_image_mut() {
            Some(image) if image.filter != filter => {
                image.filter = filter;
                true
            }
            _ => false,
        });
        self.commit_if(changed)
    }
}
