/// Default band height in grid rows. 64 rows × 800 columns is one rayon task.
pub const BAND_ROWS: usize = 64;

/// A contiguous block of grid rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBand {
    /// First row of the band.
    pub start: usize,
    /// Number of rows (may be smaller for the last band).
    pub rows: usize,
}

impl RowBand {
    /// Row indices covered by the band.
    pub fn row_range(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.rows
    }
}

/// Split `resolution` rows into bands of at most `band_rows` rows.
pub fn build_bands(resolution: usize, band_rows: usize) -> Vec<RowBand> {
    let band_rows = band_rows.max(1);
    let mut bands = Vec::with_capacity(resolution.div_ceil(band_rows));
    let mut start = 0;
    while start < resolution {
        let rows = band_rows.min(resolution - start);
        bands.push(RowBand { start, rows });
        start += rows;
    }
    bands
}
