//! Reflections across lines through the origin, their compositions, and the
//! interaction state of the two-reflection view.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::linear::{Matrix2, Point2};

/// Matrices closer than this to the identity count as the identity.
const IDENTITY_EPS: f64 = 1e-12;

/// Half-extent of the square the axes are drawn in.
pub const AXIS_HALF_EXTENT: f64 = 5.0;

/// A mirror line through the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReflectionAxis {
    XAxis,
    YAxis,
    /// The line `y = tan(θ)·x`, `θ` in degrees from the positive x-axis.
    Line { angle_deg: f64 },
}

impl ReflectionAxis {
    /// Angle of the axis to the positive x-axis, in degrees.
    pub fn angle_deg(&self) -> f64 {
        match *self {
            ReflectionAxis::XAxis => 0.0,
            ReflectionAxis::YAxis => 90.0,
            ReflectionAxis::Line { angle_deg } => angle_deg,
        }
    }

    /// The reflection matrix `[[cos 2θ, sin 2θ], [sin 2θ, −cos 2θ]]`, exact
    /// for the coordinate axes.
    pub fn matrix(&self) -> Matrix2 {
        match *self {
            ReflectionAxis::XAxis => Matrix2::new(1.0, 0.0, 0.0, -1.0),
            ReflectionAxis::YAxis => Matrix2::new(-1.0, 0.0, 0.0, 1.0),
            ReflectionAxis::Line { angle_deg } => {
                let (s, c) = (2.0 * angle_deg.to_radians()).sin_cos();
                Matrix2::new(c, s, s, -c)
            }
        }
    }

    /// The visible part of the axis inside `[-h, h]²`: clipped on `x` when
    /// the slope is at most 1 in magnitude, on `y` otherwise.
    pub fn segment(&self, half_extent: f64) -> (Point2, Point2) {
        let h = half_extent;
        match *self {
            ReflectionAxis::XAxis => (Point2::new(-h, 0.0), Point2::new(h, 0.0)),
            ReflectionAxis::YAxis => (Point2::new(0.0, -h), Point2::new(0.0, h)),
            ReflectionAxis::Line { angle_deg } => {
                let (s, c) = angle_deg.to_radians().sin_cos();
                if s.abs() <= c.abs() {
                    let slope = s / c;
                    (Point2::new(-h, -slope * h), Point2::new(h, slope * h))
                } else {
                    let inv = c / s;
                    (Point2::new(-inv * h, -h), Point2::new(inv * h, h))
                }
            }
        }
    }
}

/// What an orientation-preserving or -reversing 2×2 isometry reduces to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classification {
    Identity,
    /// Counter-clockwise rotation about the origin, angle in `(-180, 180]`.
    Rotation { angle_deg: f64 },
    /// Reflection across the line at `angle_deg` in `(-90, 90]`.
    Reflection { angle_deg: f64 },
    /// Not an isometry.
    Other,
}

impl Classification {
    /// Classify a matrix from its entries rather than from how it was built.
    pub fn of(m: &Matrix2) -> Self {
        let orthogonal = (m.a11 * m.a11 + m.a21 * m.a21 - 1.0).abs() < 1e-9
            && (m.a12 * m.a12 + m.a22 * m.a22 - 1.0).abs() < 1e-9
            && (m.a11 * m.a12 + m.a21 * m.a22).abs() < 1e-9;
        if !orthogonal {
            return Self::Other;
        }
        if m.det() > 0.0 {
            if m.approx_eq(&Matrix2::IDENTITY, IDENTITY_EPS) {
                return Self::Identity;
            }
            Self::Rotation {
                angle_deg: normalize_deg(m.a21.atan2(m.a11).to_degrees()),
            }
        } else {
            // [[cos 2θ, sin 2θ], [sin 2θ, −cos 2θ]] → θ = atan2(sin 2θ, cos 2θ) / 2.
            let mut angle_deg = m.a21.atan2(m.a11).to_degrees() / 2.0;
            if angle_deg <= -90.0 {
                angle_deg += 180.0;
            }
            Self::Reflection { angle_deg }
        }
    }
}

/// Normalise an angle to `(-180, 180]`.
pub fn normalize_deg(angle: f64) -> f64 {
    let mut a = angle % 360.0;
    if a <= -180.0 {
        a += 360.0;
    } else if a > 180.0 {
        a -= 360.0;
    }
    a
}

/// Reflect across `first`, then across `second`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReflectionComposition {
    pub first: ReflectionAxis,
    pub second: ReflectionAxis,
    /// `second.matrix() · first.matrix()`.
    pub matrix: Matrix2,
    pub classification: Classification,
}

pub fn compose_reflections(first: ReflectionAxis, second: ReflectionAxis) -> ReflectionComposition {
    let matrix = second.matrix() * first.matrix();
    ReflectionComposition {
        first,
        second,
        matrix,
        classification: Classification::of(&matrix),
    }
}

/// Everything the two-reflection view displays for one interaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReflectionView {
    pub original: Point2,
    pub first_image: Point2,
    pub final_image: Point2,
    pub first_axis: (Point2, Point2),
    pub second_axis: (Point2, Point2),
    pub composition: ReflectionComposition,
}

/// One user interaction with the two-reflection view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReflectionEvent {
    /// The user clicked the plot at this point.
    Click(Point2),
    /// The user picked new axes.
    Configure {
        first: ReflectionAxis,
        second: ReflectionAxis,
    },
}

/// State carried from one interaction to the next: the selected point and
/// the chosen axes. Passed in and returned by value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReflectionSession {
    pub selected_point: Point2,
    pub first: ReflectionAxis,
    pub second: ReflectionAxis,
}

impl Default for ReflectionSession {
    fn default() -> Self {
        Self {
            selected_point: Point2::new(2.0, 1.0),
            first: ReflectionAxis::XAxis,
            second: ReflectionAxis::YAxis,
        }
    }
}

impl ReflectionSession {
    /// Apply `event` and return the next session with the view to show.
    pub fn handle(self, event: ReflectionEvent) -> (Self, ReflectionView) {
        let next = match event {
            ReflectionEvent::Click(p) => {
                debug!(x = p.x, y = p.y, "Selected point moved");
                Self {
                    selected_point: p,
                    ..self
                }
            }
            ReflectionEvent::Configure { first, second } => Self {
                first,
                second,
                ..self
            },
        };
        let view = next.view();
        (next, view)
    }

    /// The view for the current state.
    pub fn view(&self) -> ReflectionView {
        let composition = compose_reflections(self.first, self.second);
        let p0 = self.selected_point;
        let p1 = self.first.matrix().apply(p0);
        let p2 = self.second.matrix().apply(p1);
        ReflectionView {
            original: p0,
            first_image: p1,
            final_image: p2,
            first_axis: self.first.segment(AXIS_HALF_EXTENT),
            second_axis: self.second.segment(AXIS_HALF_EXTENT),
            composition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn close(a: Point2, b: Point2) -> bool {
        (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
    }

    #[test]
    fn line_at_zero_degrees_is_the_x_axis() {
        let line = ReflectionAxis::Line { angle_deg: 0.0 }.matrix();
        assert!(line.approx_eq(&ReflectionAxis::XAxis.matrix(), EPSILON));
        let line = ReflectionAxis::Line { angle_deg: 90.0 }.matrix();
        assert!(line.approx_eq(&ReflectionAxis::YAxis.matrix(), EPSILON));
    }

    #[test]
    fn reflection_across_diagonal_swaps_coordinates() {
        let m = ReflectionAxis::Line { angle_deg: 45.0 }.matrix();
        assert!(close(m.apply(Point2::new(2.0, 1.0)), Point2::new(1.0, 2.0)));
    }

    #[test]
    fn x_then_y_is_half_turn() {
        let c = compose_reflections(ReflectionAxis::XAxis, ReflectionAxis::YAxis);
        match c.classification {
            Classification::Rotation { angle_deg } => assert!((angle_deg - 180.0).abs() < EPSILON),
            other => panic!("expected rotation, got {other:?}"),
        }
    }

    #[test]
    fn two_reflections_rotate_by_twice_the_angle_between() {
        for (a, b) in [(10.0, 40.0), (45.0, -45.0), (-30.0, 75.0), (0.0, 120.0)] {
            let c = compose_reflections(
                ReflectionAxis::Line { angle_deg: a },
                ReflectionAxis::Line { angle_deg: b },
            );
            let expected = normalize_deg(2.0 * (b - a));
            match c.classification {
                Classification::Rotation { angle_deg } => {
                    let diff = normalize_deg(angle_deg - expected);
                    assert!(diff.abs() < 1e-6, "{a},{b}: {angle_deg} vs {expected}");
                }
                other => panic!("{a},{b}: expected rotation, got {other:?}"),
            }
        }
    }

    #[test]
    fn same_axis_twice_is_identity() {
        let axis = ReflectionAxis::Line { angle_deg: 33.0 };
        let c = compose_reflections(axis, axis);
        assert_eq!(c.classification, Classification::Identity);
    }

    #[test]
    fn single_reflection_is_classified_as_reflection() {
        let m = ReflectionAxis::Line { angle_deg: 30.0 }.matrix();
        match Classification::of(&m) {
            Classification::Reflection { angle_deg } => assert!((angle_deg - 30.0).abs() < 1e-9),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            Classification::of(&Matrix2::new(2.0, 0.0, 0.0, 1.0)),
            Classification::Other
        );
    }

    #[test]
    fn segments_stay_in_the_box() {
        for angle in [0.0, 20.0, 45.0, 60.0, 89.0, -70.0] {
            let (p, q) = ReflectionAxis::Line { angle_deg: angle }.segment(5.0);
            for pt in [p, q] {
                assert!(pt.x.abs() <= 5.0 + EPSILON && pt.y.abs() <= 5.0 + EPSILON);
            }
        }
        let (p, q) = ReflectionAxis::YAxis.segment(5.0);
        assert_eq!((p, q), (Point2::new(0.0, -5.0), Point2::new(0.0, 5.0)));
    }

    #[test]
    fn session_click_moves_point_and_recomputes() {
        let session = ReflectionSession::default();
        assert_eq!(session.selected_point, Point2::new(2.0, 1.0));

        let (session, view) = session.handle(ReflectionEvent::Click(Point2::new(3.0, 1.0)));
        assert_eq!(session.selected_point, Point2::new(3.0, 1.0));
        assert_eq!(view.original, Point2::new(3.0, 1.0));
        assert!(close(view.first_image, Point2::new(3.0, -1.0)));
        assert!(close(view.final_image, Point2::new(-3.0, -1.0)));
    }

    #[test]
    fn session_configure_keeps_point() {
        let session = ReflectionSession::default();
        let (next, view) = session.handle(ReflectionEvent::Configure {
            first: ReflectionAxis::Line { angle_deg: 45.0 },
            second: ReflectionAxis::Line { angle_deg: -45.0 },
        });
        assert_eq!(next.selected_point, session.selected_point);
        // Reflect (2,1) across y=x → (1,2), then across y=−x → (−2,−1).
        assert!(close(view.first_image, Point2::new(1.0, 2.0)));
        assert!(close(view.final_image, Point2::new(-2.0, -1.0)));
    }

    #[test]
    fn final_image_matches_composed_matrix() {
        let session = ReflectionSession {
            selected_point: Point2::new(-1.5, 2.5),
            first: ReflectionAxis::Line { angle_deg: 12.0 },
            second: ReflectionAxis::YAxis,
        };
        let view = session.view();
        assert!(close(
            view.final_image,
            view.composition.matrix.apply(session.selected_point)
        ));
    }
}
