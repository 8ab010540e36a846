//! Export through a host-provided rasterizer.

use crate::error::{EditorError, EditorResult, require_finite, require_positive};
use crate::scene::Scene;
use crate::viewport::Viewport;
use kurbo::{Affine, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Png,
    Jpeg,
    Webp,
    Svg,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Webp => "webp",
            ExportFormat::Svg => "svg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Webp => "image/webp",
            ExportFormat::Svg => "image/svg+xml",
        }
    }
}

/// What to export: an object-space region, encoding and scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    /// File name without extension.
    pub name: String,
    pub format: ExportFormat,
    /// Encoder quality in `0.0..=1.0` (lossy formats only).
    pub quality: f64,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Output pixels per object-space unit.
    pub multiplier: f64,
}

impl ExportRequest {
    /// Full-quality PNG of the workspace at 1x, with a random file name.
    pub fn for_workspace(workspace: Rect) -> Self {
        Self {
            name: Uuid::new_v4().to_string(),
            format: ExportFormat::Png,
            quality: 1.0,
            left: workspace.x0,
            top: workspace.y0,
            width: workspace.width(),
            height: workspace.height(),
            multiplier: 1.0,
        }
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn region(&self) -> Rect {
        Rect::new(self.left, self.top, self.left + self.width, self.top + self.height)
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.format.extension())
    }

    fn validate(&self) -> EditorResult<()> {
        require_finite("export left", self.left)?;
        require_finite("export top", self.top)?;
        require_positive("export width", self.width)?;
        require_positive("export height", self.height)?;
        require_positive("export multiplier", self.multiplier)?;
        let quality = require_finite("export quality", self.quality)?;
        if !(0.0..=1.0).contains(&quality) {
            return Err(EditorError::invalid(
                "export quality",
                format!("{quality} is outside 0..=1"),
            ));
        }
        Ok(())
    }

    pub(crate) fn target(&self) -> EditorResult<RasterTarget> {
        self.validate()?;
        let region = self.region();
        Ok(RasterTarget {
            region,
            multiplier: self.multiplier,
            pixel_width: (region.width() * self.multiplier).round().max(1.0) as u32,
            pixel_height: (region.height() * self.multiplier).round().max(1.0) as u32,
            format: self.format,
            quality: self.quality,
        })
    }
}

/// Fully resolved raster job handed to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterTarget {
    pub region: Rect,
    pub multiplier: f64,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub format: ExportFormat,
    pub quality: f64,
}

impl RasterTarget {
    /// Object space to output pixels.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.multiplier) * Affine::translate(-Vec2::new(self.region.x0, self.region.y0))
    }
}

/// Host-side renderer/encoder.
///
/// Called with the live scene and a viewport set to the identity transform;
/// the region and scale to draw are in `target`.
pub trait Rasterizer {
    fn rasterize(
        &mut self,
        scene: &Scene,
        viewport: &Viewport,
        target: &RasterTarget,
    ) -> Result<Vec<u8>, String>;
}

/// Encoded export result.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutput {
    pub file_name: String,
    pub mime_type: &'static str,
    pub data: Vec<u8>,
}

/// Run `rasterizer` with an identity view, restoring `viewport` afterwards
/// whether or not the rasterizer succeeds.
pub(crate) fn export_with(
    scene: &Scene,
    viewport: &mut Viewport,
    rasterizer: &mut dyn Rasterizer,
    request: &ExportRequest,
) -> EditorResult<ExportOutput> {
    let target = request.target()?;

    let saved = viewport.clone();
    viewport.reset();
    let result = rasterizer.rasterize(scene, viewport, &target);
    *viewport = saved;

    let data = result.map_err(EditorError::Export)?;
    log::info!(
        "Exported {} ({}x{} px, {} bytes)",
        request.file_name(),
        target.pixel_width,
        target.pixel_height,
        data.len()
    );
    Ok(ExportOutput {
        file_name: request.file_name(),
        mime_type: request.format.mime_type(),
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    struct Recorder {
        seen_zoom: Option<f64>,
        fail: bool,
    }

    impl Rasterizer for Recorder {
        fn rasterize(
            &mut self,
            _scene: &Scene,
            viewport: &Viewport,
            target: &RasterTarget,
        ) -> Result<Vec<u8>, String> {
            self.seen_zoom = Some(viewport.zoom);
            if self.fail {
                return Err("encoder exploded".to_string());
            }
            Ok(vec![0; (target.pixel_width * target.pixel_height) as usize])
        }
    }

    fn zoomed_viewport() -> Viewport {
        let mut viewport = Viewport::new();
        viewport.zoom = 0.5;
        viewport.offset = Vec2::new(40.0, 30.0);
        viewport
    }

    #[test]
    fn test_export_uses_identity_and_restores() {
        let scene = Scene::default();
        let mut viewport = zoomed_viewport();
        let mut rasterizer = Recorder {
            seen_zoom: None,
            fail: false,
        };
        let request = ExportRequest::for_workspace(Rect::new(0.0, 0.0, 10.0, 20.0)).with_multiplier(2.0);

        let output = export_with(&scene, &mut viewport, &mut rasterizer, &request).unwrap();
        assert_eq!(rasterizer.seen_zoom, Some(1.0));
        assert_eq!(output.data.len(), 20 * 40);
        assert!(output.file_name.ends_with(".png"));
        assert_eq!(viewport, zoomed_viewport());
    }

    #[test]
    fn test_failed_export_restores_viewport() {
        let scene = Scene::default();
        let mut viewport = zoomed_viewport();
        let mut rasterizer = Recorder {
            seen_zoom: None,
            fail: true,
        };
        let request = ExportRequest::for_workspace(Rect::new(0.0, 0.0, 10.0, 10.0));
        let result = export_with(&scene, &mut viewport, &mut rasterizer, &request);
        assert!(matches!(result, Err(EditorError::Export(_))));
        assert_eq!(viewport, zoomed_viewport());
    }

    #[test]
    fn test_invalid_request_rejected() {
        let mut request = ExportRequest::for_workspace(Rect::new(0.0, 0.0, 10.0, 10.0));
        request.quality = 2.0;
        assert!(request.target().is_err());
        request.quality = 1.0;
        request.multiplier = 0.0;
        assert!(request.target().is_err());
    }

    #[test]
    fn test_target_transform() {
        let request = ExportRequest::for_workspace(Rect::new(100.0, 50.0, 200.0, 150.0)).with_multiplier(3.0);
        let target = request.target().unwrap();
        assert_eq!(target.transform() * Point::new(100.0, 50.0), Point::ZERO);
        assert_eq!(target.transform() * Point::new(200.0, 150.0), Point::new(300.0, 300.0));
        assert_eq!((target.pixel_width, target.pixel_height), (300, 300));
    }
}
