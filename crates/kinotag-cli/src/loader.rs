//! CSV input for the load path.
//!
//! The load path consumes the rated-movie CSV emitted by the upstream
//! aggregation pipeline. Its `primaryTitle`/`startYear`/`weighted_rating`
//! headers are accepted via serde aliases alongside the plain
//! `title`/`year`/`rating` form, so hand-built files work too.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;

/// One row of the movie input file.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieRow {
    /// Primary title.
    #[serde(alias = "primaryTitle")]
    pub title: String,

    /// Release year.
    #[serde(alias = "startYear")]
    pub year: i32,

    /// Rating carried through to the store (ranking tiebreak).
    #[serde(alias = "weighted_rating", alias = "averageRating")]
    pub rating: Decimal,
}

/// Read at most `limit` movie rows from the CSV at `path`.
///
/// A malformed row aborts the whole read: partially loading a file would
/// silently skip movies, which is worse than failing loudly.
pub fn read_movie_rows(path: &str, limit: Option<usize>) -> Result<Vec<MovieRow>> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("failed to open {path}"))?;

    let mut rows = Vec::new();
    for (index, record) in reader.deserialize().enumerate() {
        if let Some(max) = limit {
            if rows.len() >= max {
                break;
            }
        }
        // Header occupies line 1, so data row N sits on line N + 1.
        let row: MovieRow =
            record.with_context(|| format!("invalid movie row at line {}", index + 2))?;
        rows.push(row);
    }
    Ok(rows)
}
