//! Pie-slice geometry for the wheel face.
//!
//! Everything here is a pure function of `(index, segments, layout)`: the same
//! inputs always give the same path string, so rendered output can be compared
//! frame to frame. Angles are in degrees with 0 at 3 o'clock, increasing
//! clockwise (screen y points down).

use std::fmt::Write;

use super::{Snapshot, segment_span};

/// Viewport placement of the wheel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelLayout {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
    /// Label distance from the center as a fraction of `radius`.
    pub label_ratio: f64,
}

impl Default for WheelLayout {
    fn default() -> Self {
        Self {
            center_x: 160.0,
            center_y: 160.0,
            radius: 150.0,
            label_ratio: 0.75,
        }
    }
}

impl WheelLayout {
    fn point_at(&self, radius: f64, angle_deg: f64) -> (f64, f64) {
        let rad = angle_deg.to_radians();
        (
            self.center_x + radius * rad.cos(),
            self.center_y + radius * rad.sin(),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelPlacement {
    pub x: f64,
    pub y: f64,
    /// Text rotation so the number reads outward from the hub.
    pub rotate_deg: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SegmentGeometry {
    pub id: u32,
    pub start_deg: f64,
    pub end_deg: f64,
    /// SVG path data for the slice.
    pub path: String,
    pub label: LabelPlacement,
}

/// Visual state of one segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentStyle {
    Available,
    Active,
    Spent,
}

impl SegmentStyle {
    pub fn fill(self) -> &'static str {
        match self {
            SegmentStyle::Active => "rgba(6, 182, 212, 0.3)",
            SegmentStyle::Available | SegmentStyle::Spent => "rgba(15, 23, 42, 0.8)",
        }
    }

    pub fn label_color(self) -> &'static str {
        match self {
            SegmentStyle::Spent => "#475569",
            SegmentStyle::Available | SegmentStyle::Active => "#ffffff",
        }
    }
}

/// Style of segment `id` in the given snapshot.
pub fn segment_style(snapshot: &Snapshot, id: u32) -> SegmentStyle {
    if snapshot.active == Some(id) {
        SegmentStyle::Active
    } else if snapshot.is_available(id) {
        SegmentStyle::Available
    } else {
        SegmentStyle::Spent
    }
}

/// Geometry of the 0-based slice `index` out of `segments`.
pub fn segment_geometry(index: u32, segments: u32, layout: &WheelLayout) -> SegmentGeometry {
    let span = segment_span(segments);
    let start_deg = index as f64 * span;
    let end_deg = (index + 1) as f64 * span;
    let mid_deg = start_deg + span / 2.0;

    let (cx, cy, r) = (layout.center_x, layout.center_y, layout.radius);
    let mut path = String::new();
    if segments == 1 {
        // A single arc cannot start and end on the same point; use two halves.
        let (x1, y1) = layout.point_at(r, 0.0);
        let (x2, y2) = layout.point_at(r, 180.0);
        let _ = write!(
            path,
            "M {x1:.2} {y1:.2} A {r:.2} {r:.2} 0 1 1 {x2:.2} {y2:.2} A {r:.2} {r:.2} 0 1 1 {x1:.2} {y1:.2} Z"
        );
    } else {
        let (x1, y1) = layout.point_at(r, start_deg);
        let (x2, y2) = layout.point_at(r, end_deg);
        let large_arc = u8::from(span > 180.0);
        let _ = write!(
            path,
            "M {cx:.2} {cy:.2} L {x1:.2} {y1:.2} A {r:.2} {r:.2} 0 {large_arc} 1 {x2:.2} {y2:.2} Z"
        );
    }

    let (lx, ly) = layout.point_at(r * layout.label_ratio, mid_deg);
    SegmentGeometry {
        id: index + 1,
        start_deg,
        end_deg,
        path,
        label: LabelPlacement {
            x: lx,
            y: ly,
            rotate_deg: mid_deg + 90.0,
        },
    }
}

/// Geometry for every slice, in id order.
pub fn wheel_geometry(segments: u32, layout: &WheelLayout) -> Vec<SegmentGeometry> {
    (0..segments)
        .map(|i| segment_geometry(i, segments, layout))
        .collect()
}
