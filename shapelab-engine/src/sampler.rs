use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use shapelab_core::{BoundRelation, Complex, CoreError, Relation, SampleGrid};

use crate::band::{build_bands, RowBand, BAND_ROWS};
use crate::error::EngineError;
use crate::point_set::PointSet;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Parameters of the growing-window search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Window half-width of the first attempt.
    pub initial_radius: f64,
    /// Grid points per axis.
    pub resolution: usize,
    /// Grid evaluations before giving up.
    pub max_attempts: usize,
    /// Radius added per failed attempt.
    pub radius_step: f64,
    /// Equality band width in grid cells.
    pub tolerance_factor: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            initial_radius: 8.0,
            resolution: 800,
            max_attempts: 10,
            radius_step: 2.0,
            tolerance_factor: 2.0,
        }
    }
}

impl SamplerConfig {
    pub fn validate(&self) -> crate::Result<()> {
        let reason = if self.resolution < 2 {
            format!("resolution must be >= 2, got {}", self.resolution)
        } else if self.max_attempts == 0 {
            "max_attempts must be at least 1".to_string()
        } else if !(self.initial_radius > 0.0 && self.initial_radius.is_finite()) {
            format!("initial_radius must be positive and finite, got {}", self.initial_radius)
        } else if !(self.radius_step >= 0.0 && self.radius_step.is_finite()) {
            format!("radius_step must be non-negative and finite, got {}", self.radius_step)
        } else if !(self.tolerance_factor > 0.0 && self.tolerance_factor.is_finite()) {
            format!("tolerance_factor must be positive, got {}", self.tolerance_factor)
        } else {
            return Ok(());
        };
        Err(EngineError::InvalidConfig { reason })
    }

    /// Window radius of attempt `attempt` (0-based). Never shrinks.
    pub fn radius_for(&self, attempt: usize) -> f64 {
        self.initial_radius + attempt as f64 * self.radius_step
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Points found by a successful search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub points: PointSet,
    /// Window radius of the successful attempt.
    pub radius: f64,
    /// Equality tolerance used on that attempt.
    pub tolerance: f64,
    /// Grid evaluations performed, including the successful one.
    pub attempts: usize,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleFailure {
    #[error("no points satisfy the relation after {attempts} attempt(s)")]
    NoPointsFound {
        attempts: usize,
        /// Message of the last attempt that failed with an error.
        last_error: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Finds grid points satisfying a relation, growing the window until some
/// match or the attempt budget runs out.
#[derive(Debug, Clone)]
pub struct Sampler {
    config: SamplerConfig,
}

impl Sampler {
    pub fn new(config: SamplerConfig) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn sample(&self, relation: &Relation) -> Result<Sample, SampleFailure> {
        let start = Instant::now();
        let mut last_error = None;

        for attempt in 0..self.config.max_attempts {
            let radius = self.config.radius_for(attempt);
            let grid = SampleGrid::new(radius, self.config.resolution).map_err(|e| {
                // Only reachable when radius_for overflows to infinity.
                SampleFailure::NoPointsFound {
                    attempts: attempt,
                    last_error: Some(e.to_string()),
                }
            })?;
            let tolerance = grid.tolerance(self.config.tolerance_factor);

            match evaluate_attempt(relation, &grid, tolerance) {
                Ok(points) if !points.is_empty() => {
                    let attempts = attempt + 1;
                    info!(
                        elapsed_ms = start.elapsed().as_millis(),
                        attempts,
                        radius,
                        points = points.len(),
                        "Sampling complete"
                    );
                    return Ok(Sample {
                        points: PointSet::new(points),
                        radius,
                        tolerance,
                        attempts,
                    });
                }
                Ok(_) => {
                    debug!(attempt, radius, tolerance, "No matching points");
                }
                Err(e) => {
                    debug!(attempt, radius, error = %e, "Attempt failed");
                    last_error = Some(e.to_string());
                }
            }
        }

        let attempts = self.config.max_attempts;
        warn!(
            attempts,
            last_error = last_error.as_deref().unwrap_or("none"),
            relation = relation.source(),
            "No points found"
        );
        Err(SampleFailure::NoPointsFound {
            attempts,
            last_error,
        })
    }
}

/// One grid evaluation: bind, then evaluate row bands in parallel and
/// concatenate their matches in band order.
fn evaluate_attempt(
    relation: &Relation,
    grid: &SampleGrid,
    tolerance: f64,
) -> Result<Vec<Complex>, CoreError> {
    let bound = relation.bind()?;
    let bands = build_bands(grid.resolution, BAND_ROWS);

    let results: Vec<Result<Vec<Complex>, CoreError>> = bands
        .par_iter()
        .map(|band| evaluate_band(&bound, grid, band, tolerance))
        .collect();

    let mut points = Vec::new();
    for result in results {
        points.extend(result?);
    }
    Ok(points)
}

/// Matching points of one band, row-major. Stops at the first error.
fn evaluate_band(
    relation: &BoundRelation,
    grid: &SampleGrid,
    band: &RowBand,
    tolerance: f64,
) -> Result<Vec<Complex>, CoreError> {
    let mut matches = Vec::new();
    for row in band.row_range() {
        let y = grid.coordinate(row);
        for col in 0..grid.resolution {
            let x = grid.coordinate(col);
            if relation.matches(x, y, tolerance)? {
                matches.push(Complex::new(x, y));
            }
        }
    }
    Ok(matches)
}
