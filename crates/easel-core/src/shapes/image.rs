//! Raster image objects.

use super::ObjectGeometry;
use crate::error::{EditorError, EditorResult};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Size};
use serde::{Deserialize, Serialize};

/// Image format for embedded image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    /// PNG format.
    Png,
    /// JPEG format.
    Jpeg,
    /// WebP format.
    WebP,
    /// GIF format.
    Gif,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Gif => "image/gif",
        }
    }

    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            "gif" => Some(ImageFormat::Gif),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        // GIF: "GIF8"
        if data.starts_with(b"GIF8") {
            return Some(ImageFormat::Gif);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        None
    }
}

/// Where the pixels come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSource {
    /// Remote or data URL, fetched by the host.
    Url(String),
    /// Bytes stored in the scene, base64-encoded to keep snapshots plain JSON.
    Embedded {
        format: ImageFormat,
        data_base64: String,
    },
}

impl ImageSource {
    /// Embed raw bytes, detecting the format from their magic bytes.
    pub fn embed(data: &[u8]) -> EditorResult<Self> {
        use base64::{Engine, engine::general_purpose::STANDARD};

        let format = ImageFormat::from_magic_bytes(data)
            .ok_or_else(|| EditorError::ImageLoad("unrecognized image format".to_string()))?;
        Ok(ImageSource::Embedded {
            format,
            data_base64: STANDARD.encode(data),
        })
    }

    /// Raw bytes of an embedded image.
    pub fn data(&self) -> Option<Vec<u8>> {
        use base64::{Engine, engine::general_purpose::STANDARD};
        match self {
            ImageSource::Url(_) => None,
            ImageSource::Embedded { data_base64, .. } => STANDARD.decode(data_base64).ok(),
        }
    }

    /// URL usable by an `<img>` element or fetch call.
    pub fn to_url(&self) -> String {
        match self {
            ImageSource::Url(url) => url.clone(),
            ImageSource::Embedded {
                format,
                data_base64,
            } => format!("data:{};base64,{}", format.mime_type(), data_base64),
        }
    }
}

/// Visible window into the natural image, in natural pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Named filter presets applied by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFilter {
    Greyscale,
    Polaroid,
    Sepia,
    Kodachrome,
    Contrast,
    Brightness,
    Brownie,
    Vintage,
    Technicolor,
    Pixelate,
    Invert,
    Blur,
    Sharpen,
    Emboss,
    RemoveColor,
    BlackAndWhite,
    Vibrance,
    BlendColor,
    HueRotate,
    Resize,
    Gamma,
    Saturation,
}

impl ImageFilter {
    /// Parse a preset name. `"none"` maps to `Ok(None)`.
    pub fn from_name(name: &str) -> EditorResult<Option<Self>> {
        let filter = match name.to_ascii_lowercase().as_str() {
            "none" | "" => return Ok(None),
            "greyscale" | "grayscale" => ImageFilter::Greyscale,
            "polaroid" => ImageFilter::Polaroid,
            "sepia" => ImageFilter::Sepia,
            "kodachrome" => ImageFilter::Kodachrome,
            "contrast" => ImageFilter::Contrast,
            "brightness" => ImageFilter::Brightness,
            "brownie" => ImageFilter::Brownie,
            "vintage" => ImageFilter::Vintage,
            "technicolor" => ImageFilter::Technicolor,
            "pixelate" => ImageFilter::Pixelate,
            "invert" => ImageFilter::Invert,
            "blur" => ImageFilter::Blur,
            "sharpen" => ImageFilter::Sharpen,
            "emboss" => ImageFilter::Emboss,
            "removecolor" => ImageFilter::RemoveColor,
            "blacknwhite" => ImageFilter::BlackAndWhite,
            "vibrance" => ImageFilter::Vibrance,
            "blendcolor" => ImageFilter::BlendColor,
            "huerotate" => ImageFilter::HueRotate,
            "resize" => ImageFilter::Resize,
            "gamma" => ImageFilter::Gamma,
            "saturation" => ImageFilter::Saturation,
            other => return Err(EditorError::invalid("image filter", other)),
        };
        Ok(Some(filter))
    }
}

/// An image object. Its frame holds the natural size; display size comes
/// from the frame's scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub source: ImageSource,
    /// Original image width in pixels.
    pub natural_width: u32,
    /// Original image height in pixels.
    pub natural_height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<CropRect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<ImageFilter>,
}

impl Image {
    pub fn new(source: ImageSource, natural_width: u32, natural_height: u32) -> Self {
        Self {
            source,
            natural_width,
            natural_height,
            crop: None,
            filter: None,
        }
    }

    pub fn natural_size(&self) -> Size {
        Size::new(f64::from(self.natural_width), f64::from(self.natural_height))
    }

    /// Uniform scale that fits the natural size within `max`, preserving aspect ratio.
    pub fn fit_scale(&self, max: Size) -> f64 {
        let natural = self.natural_size();
        if natural.width <= 0.0 || natural.height <= 0.0 {
            return 1.0;
        }
        (max.width / natural.width).min(max.height / natural.height)
    }
}

impl ObjectGeometry for Image {
    fn type_name(&self) -> &'static str {
        "Image"
    }

    fn local_path(&self, size: Size) -> BezPath {
        Rect::from_origin_size(Point::ZERO, size).to_path(0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(ImageFormat::from_magic_bytes(&png), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF89a"), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::from_magic_bytes(&[0, 1]), None);

        assert_eq!(ImageFormat::from_extension("PNG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("bmp"), None);
    }

    #[test]
    fn test_embed_roundtrip() {
        let bytes = vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3];
        let source = ImageSource::embed(&bytes).unwrap();
        assert!(matches!(
            source,
            ImageSource::Embedded {
                format: ImageFormat::Jpeg,
                ..
            }
        ));
        assert_eq!(source.data(), Some(bytes));
        assert!(source.to_url().starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_embed_rejects_unknown_bytes() {
        assert!(ImageSource::embed(b"hello world").is_err());
    }

    #[test]
    fn test_fit_scale() {
        let image = Image::new(ImageSource::Url("a.png".into()), 1000, 500);
        let scale = image.fit_scale(Size::new(400.0, 400.0));
        assert!((scale - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_filter_names() {
        assert_eq!(ImageFilter::from_name("none").unwrap(), None);
        assert_eq!(
            ImageFilter::from_name("sepia").unwrap(),
            Some(ImageFilter::Sepia)
        );
        assert!(ImageFilter::from_name("sparkle").is_err());
    }
}
