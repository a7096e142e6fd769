use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use shapelab_core::{BoundExpression, Complex, Expression};

use crate::error::EngineError;
use crate::point_set::{ImageSet, PointSet};

/// Points per parallel work item.
pub const MAP_CHUNK: usize = 4096;

/// Applies a complex map to every point of a [`PointSet`].
#[derive(Debug, Clone, Copy)]
pub struct Mapper {
    chunk_size: usize,
}

impl Default for Mapper {
    fn default() -> Self {
        Self {
            chunk_size: MAP_CHUNK,
        }
    }
}

impl Mapper {
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Map every point, preserving order.
    ///
    /// All-or-nothing: the first failing element (lowest index) fails the
    /// whole call and no partial image is returned. A non-finite result is
    /// a failure too.
    pub fn apply(&self, expression: &Expression, points: &PointSet) -> crate::Result<ImageSet> {
        let start = Instant::now();
        let bound = expression.bind()?;
        let input = points.as_slice();
        debug!(points = input.len(), chunk_size = self.chunk_size, "Starting map");

        let chunks: Vec<crate::Result<Vec<Complex>>> = input
            .par_chunks(self.chunk_size)
            .enumerate()
            .map(|(i, chunk)| map_chunk(&bound, chunk, i * self.chunk_size))
            .collect();

        let mut image = Vec::with_capacity(input.len());
        for chunk in chunks {
            image.extend(chunk?);
        }

        info!(
            elapsed_ms = start.elapsed().as_millis(),
            points = image.len(),
            "Map complete"
        );
        Ok(ImageSet::new(image))
    }
}

fn map_chunk(
    expression: &BoundExpression,
    chunk: &[Complex],
    offset: usize,
) -> crate::Result<Vec<Complex>> {
    chunk
        .iter()
        .enumerate()
        .map(|(j, &z)| {
            let index = offset + j;
            let w = expression
                .eval(z)
                .map_err(|source| EngineError::Evaluation { index, source })?;
            if !w.is_finite() {
                return Err(EngineError::NonFinite { index });
            }
            Ok(w)
        })
        .collect()
}

/// [`Mapper::apply`] with the default chunk size.
pub fn apply(expression: &Expression, points: &PointSet) -> crate::Result<ImageSet> {
    Mapper::default().apply(expression, points)
}
