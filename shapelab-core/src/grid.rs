use crate::complex::Complex;
use crate::error::CoreError;

/// A square lattice of `resolution × resolution` points spanning
/// `[-radius, radius]` on both the real and imaginary axes.
///
/// Points are enumerated row-major: row `r` holds imaginary part `ys[r]`
/// (row 0 is `-radius`), column `c` holds real part `xs[c]`, and the flat
/// index is `r * resolution + c`. Both axes include their endpoints, like
/// `linspace(-radius, radius, resolution)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleGrid {
    /// Half-width of the sampled window.
    pub radius: f64,

    /// Points per axis.
    pub resolution: usize,
}

impl SampleGrid {
    /// Create a grid with explicit parameters.
    pub fn new(radius: f64, resolution: usize) -> crate::Result<Self> {
        if resolution < 2 {
            return Err(CoreError::InvalidGrid {
                reason: format!("resolution must be >= 2, got {resolution}"),
            });
        }
        if radius <= 0.0 || !radius.is_finite() {
            return Err(CoreError::InvalidGrid {
                reason: format!("radius must be positive and finite, got {radius}"),
            });
        }
        Ok(Self { radius, resolution })
    }

    /// Distance between neighbouring samples on either axis.
    #[inline]
    pub fn spacing(&self) -> f64 {
        2.0 * self.radius / (self.resolution - 1) as f64
    }

    /// Equality tolerance for this grid: `factor` grid cells.
    ///
    /// An implicit curve almost never passes exactly through a lattice
    /// point, so `==` is tested against a band that widens with the spacing.
    #[inline]
    pub fn tolerance(&self, factor: f64) -> f64 {
        factor * self.spacing()
    }

    /// Coordinate of sample `k` along one axis.
    #[inline]
    pub fn coordinate(&self, k: usize) -> f64 {
        if k + 1 == self.resolution {
            // Hit the endpoint exactly instead of accumulating rounding.
            self.radius
        } else {
            -self.radius + 2.0 * self.radius * k as f64 / (self.resolution - 1) as f64
        }
    }

    /// The point at `(row, col)`.
    #[inline]
    pub fn point(&self, row: usize, col: usize) -> Complex {
        Complex::new(self.coordinate(col), self.coordinate(row))
    }

    /// Iterate all points in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Complex> + '_ {
        (0..self.resolution)
            .flat_map(move |row| (0..self.resolution).map(move |col| self.point(row, col)))
    }
}
