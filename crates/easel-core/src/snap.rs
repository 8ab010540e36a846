//! Alignment and distribution snapping for dragged objects.
//!
//! Everything here works in object space (zoom and pan removed), so the
//! threshold means the same distance at every zoom level. Guides are mapped to
//! viewport space only when they are turned into drawable segments.

use crate::shapes::SerializableColor;
use crate::viewport::Viewport;
use kurbo::{Point, Rect};

/// Snap distance in object-space units.
pub const DEFAULT_SNAP_THRESHOLD: f64 = 5.0;

/// Distance between distribution guides and the topmost/leftmost object center.
pub const DISTRIBUTION_GUIDE_OFFSET: f64 = 15.0;

/// Distribution gaps narrower than this on screen get no label.
pub const MIN_LABEL_GAP: f64 = 20.0;

/// Guides closer than this (same orientation and kind) are merged.
pub const DEDUP_TOLERANCE: f64 = 0.5;

/// Half-size of the diamond markers at guide ends, in screen pixels.
pub const GUIDE_MARKER_SIZE: f64 = 4.0;

/// Dash pattern for guide lines, in screen pixels.
pub const GUIDE_DASH: [f64; 2] = [5.0, 4.0];

/// Direction a guide line runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideOrientation {
    /// Constant x; extent runs along y.
    Vertical,
    /// Constant y; extent runs along x.
    Horizontal,
}

/// What a guide marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideKind {
    /// An edge or center lines up with a reference.
    Alignment,
    /// Equal gaps between three objects.
    Distribution,
}

impl GuideKind {
    /// Stroke color for guides of this kind.
    pub fn color(&self) -> SerializableColor {
        match self {
            GuideKind::Alignment => SerializableColor::new(0xff, 0x2e, 0xcb, 0xff),
            GuideKind::Distribution => SerializableColor::new(0xff, 0x6b, 0x35, 0xff),
        }
    }
}

/// A transient guide line in object space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapGuide {
    pub orientation: GuideOrientation,
    /// x for vertical guides, y for horizontal ones.
    pub position: f64,
    /// Extent along the perpendicular axis.
    pub start: f64,
    pub end: f64,
    pub kind: GuideKind,
}

impl SnapGuide {
    /// Extent of the guide, regardless of direction.
    pub fn length(&self) -> f64 {
        (self.end - self.start).abs()
    }
}

/// Snap behavior for one interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapSettings {
    /// When false, guides are computed but objects are not moved.
    pub enabled: bool,
    /// Maximum correction in object-space units.
    pub threshold: f64,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: DEFAULT_SNAP_THRESHOLD,
        }
    }
}

/// Correction to apply to the dragged object, plus guides to draw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapResult {
    /// Horizontal correction.
    pub dx: f64,
    /// Vertical correction.
    pub dy: f64,
    pub guides: Vec<SnapGuide>,
}

impl SnapResult {
    /// True if either axis needs a correction.
    pub fn is_snapped(&self) -> bool {
        self.dx != 0.0 || self.dy != 0.0
    }
}

/// A reference line with the extent of whatever produced it.
#[derive(Debug, Clone, Copy)]
struct Reference {
    position: f64,
    span_start: f64,
    span_end: f64,
}

fn reference(position: f64, span_start: f64, span_end: f64) -> Reference {
    Reference {
        position,
        span_start,
        span_end,
    }
}

/// Keeps the candidate with the smallest magnitude.
#[derive(Debug, Clone, Copy, Default)]
struct BestDelta(Option<f64>);

impl BestDelta {
    fn offer(&mut self, delta: f64) {
        match self.0 {
            Some(best) if best.abs() <= delta.abs() => {}
            _ => self.0 = Some(delta),
        }
    }
}

fn workspace_references(ws: Rect) -> (Vec<Reference>, Vec<Reference>) {
    let (w, h) = (ws.width(), ws.height());
    let xs = [
        ws.x0,
        ws.x1,
        ws.center().x,
        ws.x0 + w / 3.0,
        ws.x0 + w * 2.0 / 3.0,
        ws.x0 + w / 4.0,
        ws.x0 + w * 3.0 / 4.0,
    ];
    let ys = [
        ws.y0,
        ws.y1,
        ws.center().y,
        ws.y0 + h / 3.0,
        ws.y0 + h * 2.0 / 3.0,
        ws.y0 + h / 4.0,
        ws.y0 + h * 3.0 / 4.0,
    ];
    (
        xs.iter().map(|x| reference(*x, ws.y0, ws.y1)).collect(),
        ys.iter().map(|y| reference(*y, ws.x0, ws.x1)).collect(),
    )
}

/// Compute the snap correction for `active` against the workspace and siblings.
///
/// Each axis is solved independently: among all alignment matches within the
/// threshold and all distribution candidates, the smallest delta wins. With
/// snapping disabled the guides are still produced but the deltas are zero.
pub fn compute_snap(
    active: Rect,
    siblings: &[Rect],
    workspace: Option<Rect>,
    settings: &SnapSettings,
) -> SnapResult {
    let threshold = settings.threshold;
    let mut x_refs = Vec::new();
    let mut y_refs = Vec::new();

    if let Some(ws) = workspace {
        let (xs, ys) = workspace_references(ws);
        x_refs.extend(xs);
        y_refs.extend(ys);
    }

    for b in siblings {
        let center = b.center();
        x_refs.extend([
            reference(b.x0, b.y0, b.y1),
            reference(b.x1, b.y0, b.y1),
            reference(center.x, b.y0, b.y1),
        ]);
        y_refs.extend([
            reference(b.y0, b.x0, b.x1),
            reference(b.y1, b.x0, b.x1),
            reference(center.y, b.x0, b.x1),
        ]);
    }

    let mut best_dx = BestDelta::default();
    let mut best_dy = BestDelta::default();
    let mut guides = Vec::new();

    let active_center = active.center();
    let edges_x = [active.x0, active_center.x, active.x1];
    let edges_y = [active.y0, active_center.y, active.y1];

    for r in &x_refs {
        for edge in edges_x {
            let diff = r.position - edge;
            if diff.abs() <= threshold {
                best_dx.offer(diff);
                guides.push(SnapGuide {
                    orientation: GuideOrientation::Vertical,
                    position: r.position,
                    start: r.span_start.min(active.y0),
                    end: r.span_end.max(active.y1),
                    kind: GuideKind::Alignment,
                });
            }
        }
    }

    for r in &y_refs {
        for edge in edges_y {
            let diff = r.position - edge;
            if diff.abs() <= threshold {
                best_dy.offer(diff);
                guides.push(SnapGuide {
                    orientation: GuideOrientation::Horizontal,
                    position: r.position,
                    start: r.span_start.min(active.x0),
                    end: r.span_end.max(active.x1),
                    kind: GuideKind::Alignment,
                });
            }
        }
    }

    if siblings.len() >= 2 {
        let mut all: Vec<(Rect, bool)> = siblings.iter().map(|b| (*b, false)).collect();
        all.push((active, true));

        all.sort_by(|a, b| a.0.x0.total_cmp(&b.0.x0));
        distribute(&all, Axis::X, threshold, &mut best_dx, &mut guides);

        all.sort_by(|a, b| a.0.y0.total_cmp(&b.0.y0));
        distribute(&all, Axis::Y, threshold, &mut best_dy, &mut guides);
    }

    SnapResult {
        dx: best_dx.0.filter(|_| settings.enabled).unwrap_or(0.0),
        dy: best_dy.0.filter(|_| settings.enabled).unwrap_or(0.0),
        guides: dedup_guides(guides),
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
}

/// Look for evenly spaced triples in `sorted` (ordered along `axis`).
fn distribute(
    sorted: &[(Rect, bool)],
    axis: Axis,
    threshold: f64,
    best: &mut BestDelta,
    guides: &mut Vec<SnapGuide>,
) {
    // (start, end, center on the other axis) along the sort axis.
    let span = |r: &Rect| match axis {
        Axis::X => (r.x0, r.x1, r.center().y),
        Axis::Y => (r.y0, r.y1, r.center().x),
    };

    for window in sorted.windows(3) {
        let (prev, curr, next) = (span(&window[0].0), span(&window[1].0), span(&window[2].0));
        let gap_before = curr.0 - prev.1;
        let gap_after = next.0 - curr.1;
        if gap_before <= 0.0 || gap_after <= 0.0 || (gap_before - gap_after).abs() > threshold {
            continue;
        }

        let position = prev.2.min(curr.2).min(next.2) - DISTRIBUTION_GUIDE_OFFSET;
        let orientation = match axis {
            Axis::X => GuideOrientation::Horizontal,
            Axis::Y => GuideOrientation::Vertical,
        };
        guides.push(SnapGuide {
            orientation,
            position,
            start: prev.1,
            end: curr.0,
            kind: GuideKind::Distribution,
        });
        guides.push(SnapGuide {
            orientation,
            position,
            start: curr.1,
            end: next.0,
            kind: GuideKind::Distribution,
        });

        if window[1].1 {
            // Center `curr` between its neighbours so both gaps match.
            let ideal = prev.1 + (gap_before + gap_after) / 2.0;
            best.offer(ideal - curr.0);
        }
    }
}

/// Drop guides that repeat an earlier one (same orientation and kind,
/// position within [`DEDUP_TOLERANCE`]). The first occurrence wins.
pub fn dedup_guides(guides: Vec<SnapGuide>) -> Vec<SnapGuide> {
    let mut unique: Vec<SnapGuide> = Vec::with_capacity(guides.len());
    for guide in guides {
        let duplicate = unique.iter().any(|g| {
            g.orientation == guide.orientation
                && g.kind == guide.kind
                && (g.position - guide.position).abs() < DEDUP_TOLERANCE
        });
        if !duplicate {
            unique.push(guide);
        }
    }
    unique
}

/// Distance label drawn on a distribution guide.
#[derive(Debug, Clone, PartialEq)]
pub struct GuideLabel {
    pub text: String,
    /// Midpoint of the guide in viewport space.
    pub anchor: Point,
}

/// A guide ready to draw, in viewport space.
#[derive(Debug, Clone, PartialEq)]
pub struct GuideSegment {
    pub start: Point,
    pub end: Point,
    pub kind: GuideKind,
    pub label: Option<GuideLabel>,
}

impl GuideSegment {
    /// Diamond marker outlines at both ends.
    pub fn markers(&self) -> [[Point; 4]; 2] {
        [diamond(self.start), diamond(self.end)]
    }
}

fn diamond(center: Point) -> [Point; 4] {
    let m = GUIDE_MARKER_SIZE;
    [
        Point::new(center.x, center.y - m),
        Point::new(center.x + m, center.y),
        Point::new(center.x, center.y + m),
        Point::new(center.x - m, center.y),
    ]
}

/// Map object-space guides to drawable viewport-space segments.
pub fn guide_segments(guides: &[SnapGuide], viewport: &Viewport) -> Vec<GuideSegment> {
    guides
        .iter()
        .map(|guide| {
            let (start, end) = match guide.orientation {
                GuideOrientation::Vertical => (
                    Point::new(guide.position, guide.start),
                    Point::new(guide.position, guide.end),
                ),
                GuideOrientation::Horizontal => (
                    Point::new(guide.start, guide.position),
                    Point::new(guide.end, guide.position),
                ),
            };
            let start = viewport.world_to_screen(start);
            let end = viewport.world_to_screen(end);

            let distance = guide.length();
            let label = (guide.kind == GuideKind::Distribution
                && distance * viewport.zoom > MIN_LABEL_GAP)
                .then(|| GuideLabel {
                    text: format!("{}", distance.round()),
                    anchor: start.midpoint(end),
                });

            GuideSegment {
                start,
                end,
                kind: guide.kind,
                label,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;

    fn no_workspace_settings() -> SnapSettings {
        SnapSettings::default()
    }

    #[test]
    fn test_left_edge_snaps_to_workspace() {
        let workspace = Rect::new(0.0, 0.0, 900.0, 900.0);
        let active = Rect::new(3.0, 200.0, 103.0, 300.0);
        let result = compute_snap(active, &[], Some(workspace), &no_workspace_settings());
        assert_eq!(active.x0 + result.dx, workspace.x0);
        assert!(result.guides.iter().any(|g| {
            g.orientation == GuideOrientation::Vertical && g.position == 0.0
        }));
    }

    #[test]
    fn test_outside_threshold_does_not_snap() {
        let workspace = Rect::new(0.0, 0.0, 900.0, 900.0);
        let active = Rect::new(20.0, 200.0, 120.0, 290.0);
        let result = compute_snap(active, &[], Some(workspace), &no_workspace_settings());
        assert_eq!(result.dx, 0.0);
        assert!(!result.is_snapped());
    }

    #[test]
    fn test_smallest_difference_wins() {
        // Left edge is 4 from a sibling edge, right edge is 1 from another.
        let a = Rect::new(0.0, 500.0, 96.0, 600.0);
        let b = Rect::new(201.0, 500.0, 300.0, 600.0);
        let active = Rect::new(100.0, 0.0, 200.0, 50.0);
        let result = compute_snap(active, &[a, b], None, &no_workspace_settings());
        assert_eq!(result.dx, 1.0);
    }

    #[test]
    fn test_workspace_thirds_and_quarters() {
        let workspace = Rect::new(0.0, 0.0, 1200.0, 1200.0);
        // Center x at 398 is 2 from the first third (400).
        let third = Rect::new(348.0, 10.0, 448.0, 20.0);
        let result = compute_snap(third, &[], Some(workspace), &no_workspace_settings());
        assert_eq!(result.dx, 2.0);
        // Left edge at 302 is 2 from the first quarter (300).
        let quarter = Rect::new(302.0, 10.0, 332.0, 20.0);
        let result = compute_snap(quarter, &[], Some(workspace), &no_workspace_settings());
        assert_eq!(result.dx, -2.0);
    }

    #[test]
    fn test_alignment_guide_spans_both_objects() {
        let sibling = Rect::new(0.0, 0.0, 100.0, 100.0);
        let active = Rect::new(2.0, 300.0, 52.0, 350.0);
        let result = compute_snap(active, &[sibling], None, &no_workspace_settings());
        let guide = result
            .guides
            .iter()
            .find(|g| g.orientation == GuideOrientation::Vertical && g.position == 0.0)
            .unwrap();
        assert_eq!(guide.start, 0.0);
        assert_eq!(guide.end, 350.0);
    }

    #[test]
    fn test_unequal_gaps_not_distributed() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let c = Rect::new(500.0, 0.0, 600.0, 100.0);
        let active = Rect::new(150.0, 0.0, 250.0, 100.0);
        let result = compute_snap(active, &[a, c], None, &no_workspace_settings());
        assert!(result.guides.iter().all(|g| g.kind != GuideKind::Distribution));
    }

    #[test]
    fn test_equal_gaps_distributed_and_snapped() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let c = Rect::new(402.0, 0.0, 502.0, 100.0);
        let active = Rect::new(200.0, 0.0, 300.0, 100.0);
        let result = compute_snap(active, &[a, c], None, &no_workspace_settings());

        let distribution: Vec<_> = result
            .guides
            .iter()
            .filter(|g| g.kind == GuideKind::Distribution)
            .collect();
        assert!(!distribution.is_empty());
        assert_eq!(distribution[0].position, 50.0 - DISTRIBUTION_GUIDE_OFFSET);
        assert_eq!(result.dx, 1.0);

        let snapped = active + Vec2::new(result.dx, 0.0);
        assert_eq!(snapped.x0 - a.x1, c.x0 - snapped.x1);
    }

    #[test]
    fn test_distribution_only_moves_active_object() {
        // The active object is on the end, not in the middle.
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(200.0, 0.0, 300.0, 100.0);
        let active = Rect::new(402.0, 300.0, 502.0, 400.0);
        let result = compute_snap(active, &[a, b], None, &no_workspace_settings());
        assert_eq!(result.dx, 0.0);
    }

    #[test]
    fn test_snapping_disabled_keeps_guides() {
        let workspace = Rect::new(0.0, 0.0, 900.0, 900.0);
        let active = Rect::new(3.0, 200.0, 103.0, 290.0);
        let settings = SnapSettings {
            enabled: false,
            ..SnapSettings::default()
        };
        let result = compute_snap(active, &[], Some(workspace), &settings);
        assert_eq!(result.dx, 0.0);
        assert!(!result.guides.is_empty());
    }

    #[test]
    fn test_dedup_guides() {
        let guide = SnapGuide {
            orientation: GuideOrientation::Vertical,
            position: 10.0,
            start: 0.0,
            end: 5.0,
            kind: GuideKind::Alignment,
        };
        let near = SnapGuide {
            position: 10.3,
            end: 50.0,
            ..guide
        };
        let other_kind = SnapGuide {
            kind: GuideKind::Distribution,
            ..guide
        };
        let unique = dedup_guides(vec![guide, near, other_kind]);
        assert_eq!(unique, vec![guide, other_kind]);
    }

    #[test]
    fn test_guide_segments_in_viewport_space() {
        let mut viewport = Viewport::new();
        viewport.zoom = 2.0;
        viewport.offset = Vec2::new(10.0, 20.0);
        let guides = [
            SnapGuide {
                orientation: GuideOrientation::Horizontal,
                position: 5.0,
                start: 0.0,
                end: 30.0,
                kind: GuideKind::Distribution,
            },
            SnapGuide {
                orientation: GuideOrientation::Horizontal,
                position: 5.0,
                start: 0.0,
                end: 8.0,
                kind: GuideKind::Distribution,
            },
        ];
        let segments = guide_segments(&guides, &viewport);
        assert_eq!(segments[0].start, Point::new(10.0, 30.0));
        assert_eq!(segments[0].end, Point::new(70.0, 30.0));
        let label = segments[0].label.as_ref().unwrap();
        assert_eq!(label.text, "30");
        assert_eq!(label.anchor, Point::new(40.0, 30.0));
        // 8 units at zoom 2 is too narrow for a label.
        assert!(segments[1].label.is_none());
        assert_eq!(segments[0].markers()[0][0], Point::new(10.0, 26.0));
    }
}
