use serde::{Deserialize, Serialize};

use crate::point_set::{ImageSet, PointSet};

/// Fraction of the larger span added on every side.
pub const MARGIN_FRACTION: f64 = 0.1;

/// Equal-aspect axis ranges that show a point set next to its image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl ViewBounds {
    /// Fit both sets. Each axis gets the larger of the two spans plus a 10%
    /// margin, centred on its own extent; a zero span gets a margin of 1.
    pub fn fit(points: &PointSet, image: &ImageSet) -> Self {
        let extent = match (points.extent(), image.extent()) {
            (Some(a), Some(b)) => Some((a.0.min(b.0), a.1.max(b.1), a.2.min(b.2), a.3.max(b.3))),
            (a, b) => a.or(b),
        };
        let (x0, x1, y0, y1) = extent.unwrap_or((0.0, 0.0, 0.0, 0.0));

        let span = (x1 - x0).max(y1 - y0);
        let margin = if span > 0.0 { MARGIN_FRACTION * span } else { 1.0 };
        let half = span / 2.0 + margin;
        let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);

        Self {
            x_min: cx - half,
            x_max: cx + half,
            y_min: cy - half,
            y_max: cy + half,
        }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}
