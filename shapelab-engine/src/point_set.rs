use serde::{Deserialize, Serialize};

use shapelab_core::Complex;

/// Ordered complex points with a `[[re, im], ...]` serde form.
macro_rules! complex_set {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")]
        pub struct $name(Vec<Complex>);

        impl $name {
            pub fn new(points: Vec<Complex>) -> Self {
                Self(points)
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn as_slice(&self) -> &[Complex] {
                &self.0
            }

            pub fn iter(&self) -> std::slice::Iter<'_, Complex> {
                self.0.iter()
            }

            pub fn into_inner(self) -> Vec<Complex> {
                self.0
            }

            /// `(min re, max re, min im, max im)`, or `None` when empty.
            pub fn extent(&self) -> Option<(f64, f64, f64, f64)> {
                let first = self.0.first()?;
                Some(self.0.iter().fold(
                    (first.re, first.re, first.im, first.im),
                    |(x0, x1, y0, y1), p| (x0.min(p.re), x1.max(p.re), y0.min(p.im), y1.max(p.im)),
                ))
            }
        }

        impl From<Vec<Complex>> for $name {
            fn from(points: Vec<Complex>) -> Self {
                Self(points)
            }
        }

        impl From<Vec<[f64; 2]>> for $name {
            fn from(pairs: Vec<[f64; 2]>) -> Self {
                Self(pairs.into_iter().map(|[re, im]| Complex::new(re, im)).collect())
            }
        }

        impl From<$name> for Vec<[f64; 2]> {
            fn from(set: $name) -> Self {
                set.0.into_iter().map(|c| [c.re, c.im]).collect()
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a Complex;
            type IntoIter = std::slice::Iter<'a, Complex>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }
    };
}

complex_set!(
    /// Grid points that satisfy a relation, in row-major grid order.
    PointSet
);

complex_set!(
    /// Images of a [`PointSet`] under a complex map, index-aligned with it.
    ImageSet
);
