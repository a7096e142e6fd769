//! Linear maps of the plane given by 2×2 matrices, and the sample shapes
//! they are applied to.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::ops::Mul;

use crate::error::CoreError;

/// Samples used to draw a circle.
pub const CIRCLE_SAMPLES: usize = 200;
/// Samples used to draw a line.
pub const LINE_SAMPLES: usize = 400;
/// Half-width of the x-range used for non-vertical lines.
pub const LINE_X_EXTENT: f64 = 20.0;
/// Half-height of the y-range used for vertical lines.
pub const LINE_Y_EXTENT: f64 = 5.0;

/// Largest half-range a fitted view may use.
const VIEW_MAX_HALF_RANGE: f64 = 20.0;
/// Half-range used when the content is smaller than one unit.
const VIEW_MIN_FALLBACK: f64 = 2.0;

/// A point (or vector) in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A 2×2 real matrix acting on column vectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix2 {
    pub a11: f64,
    pub a12: f64,
    pub a21: f64,
    pub a22: f64,
}

impl Matrix2 {
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0);

    /// Row-major constructor: `[[a11, a12], [a21, a22]]`.
    #[inline]
    pub const fn new(a11: f64, a12: f64, a21: f64, a22: f64) -> Self {
        Self { a11, a12, a21, a22 }
    }

    /// Counter-clockwise rotation by `angle` radians.
    pub fn rotation(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(c, -s, s, c)
    }

    #[inline]
    pub fn det(&self) -> f64 {
        self.a11 * self.a22 - self.a12 * self.a21
    }

    #[inline]
    pub fn apply(&self, p: Point2) -> Point2 {
        Point2 {
            x: self.a11 * p.x + self.a12 * p.y,
            y: self.a21 * p.x + self.a22 * p.y,
        }
    }

    /// `self · other`: apply `other` first, then `self`.
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            a11: self.a11 * other.a11 + self.a12 * other.a21,
            a12: self.a11 * other.a12 + self.a12 * other.a22,
            a21: self.a21 * other.a11 + self.a22 * other.a21,
            a22: self.a21 * other.a12 + self.a22 * other.a22,
        }
    }

    /// Entry-wise comparison with an absolute tolerance.
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        (self.a11 - other.a11).abs() <= eps
            && (self.a12 - other.a12).abs() <= eps
            && (self.a21 - other.a21).abs() <= eps
            && (self.a22 - other.a22).abs() <= eps
    }
}

impl Default for Matrix2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Matrix2 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.compose(&rhs)
    }
}

/// Shapes the matrix section can transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Triangle { a: Point2, b: Point2, c: Point2 },
    Quadrilateral { a: Point2, b: Point2, c: Point2, d: Point2 },
    Circle { center: Point2, radius: f64 },
    /// The line `a·x + b·y = c`.
    Line { a: f64, b: f64, c: f64 },
}

impl Shape {
    /// Sample the shape as a polyline. Polygons are closed by repeating the
    /// first vertex.
    pub fn outline(&self) -> crate::Result<Vec<Point2>> {
        match *self {
            Shape::Triangle { a, b, c } => Ok(vec![a, b, c, a]),
            Shape::Quadrilateral { a, b, c, d } => Ok(vec![a, b, c, d, a]),
            Shape::Circle { center, radius } => {
                if !(radius >= 0.0 && radius.is_finite()) {
                    return Err(CoreError::InvalidShape {
                        reason: format!("circle radius must be >= 0 and finite, got {radius}"),
                    });
                }
                Ok(linspace(0.0, TAU, CIRCLE_SAMPLES)
                    .map(|t| Point2::new(center.x + radius * t.cos(), center.y + radius * t.sin()))
                    .collect())
            }
            Shape::Line { a, b, c } => {
                if b != 0.0 {
                    Ok(linspace(-LINE_X_EXTENT, LINE_X_EXTENT, LINE_SAMPLES)
                        .map(|x| Point2::new(x, (c - a * x) / b))
                        .collect())
                } else if a != 0.0 {
                    let x = c / a;
                    Ok(linspace(-LINE_Y_EXTENT, LINE_Y_EXTENT, LINE_SAMPLES)
                        .map(|y| Point2::new(x, y))
                        .collect())
                } else {
                    Err(CoreError::DegenerateLine)
                }
            }
        }
    }

    /// For a line, the point on it that is highlighted after transforming:
    /// its y-intercept, or its x-intercept for vertical lines.
    pub fn base_point(&self) -> crate::Result<Option<Point2>> {
        match *self {
            Shape::Line { a, b, c } => {
                if b != 0.0 {
                    Ok(Some(Point2::new(0.0, c / b)))
                } else if a != 0.0 {
                    Ok(Some(Point2::new(c / a, 0.0)))
                } else {
                    Err(CoreError::DegenerateLine)
                }
            }
            _ => Ok(None),
        }
    }
}

/// A square display window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearView {
    pub center: Point2,
    pub half_range: f64,
}

impl LinearView {
    /// Centre on the mean of `points` and cover 75% of the larger spread
    /// on each side, capped at 20 and replaced by 2 when below 1.
    pub fn fit(points: &[Point2]) -> Self {
        if points.is_empty() {
            return Self {
                center: Point2::new(0.0, 0.0),
                half_range: VIEW_MIN_FALLBACK,
            };
        }
        let n = points.len() as f64;
        let (mut sx, mut sy) = (0.0, 0.0);
        let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in points {
            sx += p.x;
            sy += p.y;
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        let mut half_range = ((max_x - min_x).max(max_y - min_y) * 0.75).min(VIEW_MAX_HALF_RANGE);
        if half_range < 1.0 {
            half_range = VIEW_MIN_FALLBACK;
        }
        Self {
            center: Point2::new(sx / n, sy / n),
            half_range,
        }
    }

    pub fn x_range(&self) -> (f64, f64) {
        (self.center.x - self.half_range, self.center.x + self.half_range)
    }

    pub fn y_range(&self) -> (f64, f64) {
        (self.center.y - self.half_range, self.center.y + self.half_range)
    }
}

/// A shape together with its image under a matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearImage {
    pub shape: Vec<Point2>,
    pub transformed: Vec<Point2>,
    /// `(original, transformed)` base point, for lines only.
    pub base_point: Option<(Point2, Point2)>,
    pub view: LinearView,
}

/// Apply `matrix` to every sample of `shape` and fit a view around both.
pub fn transform_shape(shape: &Shape, matrix: &Matrix2) -> crate::Result<LinearImage> {
    let outline = shape.outline()?;
    let transformed: Vec<Point2> = outline.iter().map(|&p| matrix.apply(p)).collect();
    let base_point = shape.base_point()?.map(|p| (p, matrix.apply(p)));

    let mut all: Vec<Point2> = Vec::with_capacity(outline.len() * 2 + 1);
    all.extend_from_slice(&outline);
    all.extend_from_slice(&transformed);
    if let Some((_, image)) = base_point {
        all.push(image);
    }
    let view = LinearView::fit(&all);

    Ok(LinearImage {
        shape: outline,
        transformed,
        base_point,
        view,
    })
}

/// Format a coordinate for labels: whole numbers without decimals, others
/// with one decimal and trailing zeros removed.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if n.fract() == 0.0 {
        return format!("{n:.0}");
    }
    let s = format!("{n:.1}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// `n` evenly spaced values from `start` to `end` inclusive.
pub(crate) fn linspace(start: f64, end: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = if n > 1 {
        (end - start) / (n - 1) as f64
    } else {
        0.0
    };
    (0..n).map(move |k| if k + 1 == n && n > 1 { end } else { start + k as f64 * step })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn apply_matches_hand_computation() {
        // Default matrix of the lab: [[1, -1], [1, 2]].
        let m = Matrix2::new(1.0, -1.0, 1.0, 2.0);
        assert_eq!(m.apply(Point2::new(1.0, 2.0)), Point2::new(-1.0, 5.0));
        assert!((m.det() - 3.0).abs() < EPSILON);
    }

    #[test]
    fn compose_applies_right_operand_first() {
        let scale = Matrix2::new(2.0, 0.0, 0.0, 1.0);
        let swap = Matrix2::new(0.0, 1.0, 1.0, 0.0);
        let p = Point2::new(1.0, 3.0);
        let composed = (scale * swap).apply(p);
        assert_eq!(composed, scale.apply(swap.apply(p)));
        assert_eq!(composed, Point2::new(6.0, 1.0));
    }

    #[test]
    fn rotation_matrix_has_unit_determinant() {
        let r = Matrix2::rotation(0.3);
        assert!((r.det() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn polygons_are_closed() {
        let tri = Shape::Triangle {
            a: Point2::new(1.0, 1.0),
            b: Point2::new(1.0, 2.0),
            c: Point2::new(2.0, 1.0),
        };
        let outline = tri.outline().unwrap();
        assert_eq!(outline.len(), 4);
        assert_eq!(outline[0], outline[3]);
    }

    #[test]
    fn circle_samples_lie_on_circle() {
        let circle = Shape::Circle {
            center: Point2::new(1.0, 1.0),
            radius: 2.0,
        };
        let outline = circle.outline().unwrap();
        assert_eq!(outline.len(), CIRCLE_SAMPLES);
        for p in &outline {
            let r = ((p.x - 1.0).powi(2) + (p.y - 1.0).powi(2)).sqrt();
            assert!((r - 2.0).abs() < 1e-9);
        }
        assert!(Shape::Circle {
            center: Point2::new(0.0, 0.0),
            radius: -1.0
        }
        .outline()
        .is_err());
    }

    #[test]
    fn line_sampling_and_base_point() {
        let line = Shape::Line {
            a: 1.0,
            b: 1.0,
            c: 2.0,
        };
        let outline = line.outline().unwrap();
        assert_eq!(outline.len(), LINE_SAMPLES);
        assert_eq!(outline[0].x, -20.0);
        assert_eq!(outline[LINE_SAMPLES - 1].x, 20.0);
        assert!(outline.iter().all(|p| (p.x + p.y - 2.0).abs() < 1e-9));
        assert_eq!(line.base_point().unwrap(), Some(Point2::new(0.0, 2.0)));
    }

    #[test]
    fn vertical_line() {
        let line = Shape::Line {
            a: 2.0,
            b: 0.0,
            c: 4.0,
        };
        let outline = line.outline().unwrap();
        assert!(outline.iter().all(|p| p.x == 2.0));
        assert_eq!(outline[0].y, -5.0);
        assert_eq!(line.base_point().unwrap(), Some(Point2::new(2.0, 0.0)));
    }

    #[test]
    fn degenerate_line_is_an_error() {
        let line = Shape::Line {
            a: 0.0,
            b: 0.0,
            c: 1.0,
        };
        assert_eq!(line.outline().unwrap_err(), CoreError::DegenerateLine);
    }

    #[test]
    fn view_fit_rules() {
        // Spread 4 → 3.
        let v = LinearView::fit(&[Point2::new(0.0, 0.0), Point2::new(4.0, 0.0)]);
        assert!((v.half_range - 3.0).abs() < EPSILON);
        assert_eq!(v.center, Point2::new(2.0, 0.0));
        // Tiny content falls back to 2.
        let v = LinearView::fit(&[Point2::new(0.0, 0.0), Point2::new(0.5, 0.5)]);
        assert_eq!(v.half_range, 2.0);
        // Huge content is capped at 20.
        let v = LinearView::fit(&[Point2::new(-100.0, 0.0), Point2::new(100.0, 0.0)]);
        assert_eq!(v.half_range, 20.0);
        assert_eq!(v.x_range(), (-20.0, 20.0));
    }

    #[test]
    fn transform_line_includes_base_point_image() {
        let m = Matrix2::new(1.0, -1.0, 1.0, 2.0);
        let line = Shape::Line {
            a: 1.0,
            b: 1.0,
            c: 2.0,
        };
        let image = transform_shape(&line, &m).unwrap();
        assert_eq!(image.shape.len(), image.transformed.len());
        let (p, q) = image.base_point.unwrap();
        assert_eq!(p, Point2::new(0.0, 2.0));
        assert_eq!(q, Point2::new(-2.0, 4.0));
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(1.26), "1.3");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1.04), "1");
    }
}
