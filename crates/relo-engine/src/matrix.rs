//! The zone-to-zone transition matrix.
//!
//! # CSV format
//!
//! The first record is a header and is ignored.  Each subsequent record
//! corresponds, by position, to one origin zone; each field within a record
//! corresponds, by position, to one destination zone.  Values are expected
//! agent counts as floats.
//!
//! ```csv
//! z0,z1,z2
//! 0.0,10.0,0.0
//! 5.0,0.0,0.0
//! 0.0,0.0,0.0
//! ```
//!
//! Negative cells are accepted at parse time — they are a data-quality
//! anomaly that the engine reports and skips at run time, never a parse
//! fault.  The diagonal is ignored by the engine's policy, not forced to
//! zero here.

use std::io::Read;
use std::path::Path;

use crate::{EngineError, EngineResult};

/// Square row-major matrix of expected agent-move counts between zones.
#[derive(Debug)]
pub struct TransitionMatrix {
    dim: usize,
    values: Vec<f64>,
}

impl TransitionMatrix {
    /// Validate and take ownership of in-memory rows.
    ///
    /// Fails with a data fault if any row length differs from `zone_count`
    /// or the row count does not equal `zone_count`.
    pub fn parse(rows: Vec<Vec<f64>>, zone_count: usize) -> EngineResult<Self> {
        if rows.len() != zone_count {
            return Err(EngineError::DimensionMismatch { rows: rows.len(), zones: zone_count });
        }
        let mut values = Vec::with_capacity(zone_count * zone_count);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != zone_count {
                return Err(EngineError::RaggedRow {
                    row: i,
                    got: row.len(),
                    expected: zone_count,
                });
            }
            values.extend(row);
        }
        Ok(Self { dim: zone_count, values })
    }

    /// Load from a CSV file.  See the module docs for the expected layout.
    pub fn load_csv(path: &Path, zone_count: usize) -> EngineResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, zone_count)
    }

    /// Like [`load_csv`](Self::load_csv) but accepts any `Read` source.
    ///
    /// Useful for testing (pass a `std::io::Cursor`).
    pub fn from_reader<R: Read>(reader: R, zone_count: usize) -> EngineResult<Self> {
        // flexible(): row-length validation happens in parse() so ragged
        // input surfaces as RaggedRow rather than a csv-crate error.
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut rows: Vec<Vec<f64>> = Vec::with_capacity(zone_count);
        for (i, result) in csv_reader.records().enumerate() {
            let record = result?;
            let row = record
                .iter()
                .map(|field| {
                    field.trim().parse::<f64>().map_err(|_| {
                        EngineError::Parse(format!(
                            "row {i}: invalid numeric field {field:?}"
                        ))
                    })
                })
                .collect::<EngineResult<Vec<f64>>>()?;
            rows.push(row);
        }

        Self::parse(rows, zone_count)
    }

    /// Expected move count from `origin` to `destination`.
    ///
    /// # Panics
    /// Panics if either index is `>= dim()` — a programmer error; the engine
    /// only derives indices from the dimension the matrix was validated
    /// against.
    #[inline]
    pub fn value(&self, origin: usize, destination: usize) -> f64 {
        assert!(origin < self.dim && destination < self.dim);
        self.values[origin * self.dim + destination]
    }

    /// Matrix dimension (= zone count).
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }
}
