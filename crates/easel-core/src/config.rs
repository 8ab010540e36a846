//! Editor configuration.

use crate::error::EditorResult;
use crate::shapes::{FontStyle, SerializableColor, TextAlign};
use serde::{Deserialize, Serialize};

fn default_workspace_width() -> f64 {
    900.0
}

fn default_workspace_height() -> f64 {
    900.0
}

fn default_fit_margin() -> f64 {
    0.85
}

fn default_snap_threshold() -> f64 {
    5.0
}

fn default_true() -> bool {
    true
}

fn default_paste_offset() -> f64 {
    10.0
}

fn default_history_limit() -> usize {
    100
}

fn default_nudge_step() -> f64 {
    1.0
}

fn default_fast_nudge_step() -> f64 {
    10.0
}

fn default_zoom_step() -> f64 {
    1.1
}

/// Tunables for one editor instance.
///
/// Every field has a default, so a partial JSON document is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default = "default_workspace_width")]
    pub workspace_width: f64,
    #[serde(default = "default_workspace_height")]
    pub workspace_height: f64,
    /// Fraction of the container the workspace fills after auto-fit.
    #[serde(default = "default_fit_margin")]
    pub fit_margin: f64,
    /// Alignment distance in object-space units.
    #[serde(default = "default_snap_threshold")]
    pub snap_threshold: f64,
    #[serde(default = "default_true")]
    pub snapping: bool,
    #[serde(default = "default_paste_offset")]
    pub paste_offset: f64,
    /// Maximum retained snapshots; 0 keeps everything.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_nudge_step")]
    pub nudge_step: f64,
    #[serde(default = "default_fast_nudge_step")]
    pub fast_nudge_step: f64,
    /// Factor applied by zoom in/out commands.
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f64,
    #[serde(default)]
    pub defaults: StyleDefaults,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            workspace_width: default_workspace_width(),
            workspace_height: default_workspace_height(),
            fit_margin: default_fit_margin(),
            snap_threshold: default_snap_threshold(),
            snapping: true,
            paste_offset: default_paste_offset(),
            history_limit: default_history_limit(),
            nudge_step: default_nudge_step(),
            fast_nudge_step: default_fast_nudge_step(),
            zoom_step: default_zoom_step(),
            defaults: StyleDefaults::default(),
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON configuration.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn default_stroke_width() -> f64 {
    2.0
}

fn default_opacity() -> f64 {
    1.0
}

fn default_font_family() -> String {
    "Arial".to_string()
}

fn default_font_size() -> f64 {
    32.0
}

fn default_font_weight() -> u16 {
    400
}

/// Last-used style values applied to newly created objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleDefaults {
    #[serde(default = "SerializableColor::black")]
    pub fill: SerializableColor,
    #[serde(default = "SerializableColor::black")]
    pub stroke: SerializableColor,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default)]
    pub stroke_dash_array: Vec<f64>,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
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

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            fill: SerializableColor::black(),
            stroke: SerializableColor::black(),
            stroke_width: default_stroke_width(),
            stroke_dash_array: Vec::new(),
            opacity: default_opacity(),
            font_family: default_font_family(),
            font_size: default_font_size(),
            font_weight: default_font_weight(),
            font_style: FontStyle::default(),
            text_align: TextAlign::default(),
            underline: false,
            linethrough: false,
        }
    }
}
