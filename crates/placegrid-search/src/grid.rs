//! Viewport partitioning.
//!
//! Splits a viewport into row-major cells no larger than a target edge length,
//! coarsening the edge when the viewport would otherwise produce more cells
//! than the configured ceiling. Edges are in degrees; no latitude correction
//! is applied to longitude.

use placegrid_core::places::wrap_longitude;
use placegrid_core::{CoreError, GridCell, ViewportBounds};

/// Absorbs floating-point noise in `span / size` so that a span of exactly
/// two cells does not round up to three.
const SPAN_TOLERANCE: f64 = 1e-9;

#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error(transparent)]
    InvalidBounds(#[from] CoreError),

    #[error("cell size must be a finite number above 0, got {0}")]
    InvalidCellSize(f64),
}

/// Cell size chosen for a viewport plus the resulting cells.
#[derive(Debug, Clone)]
pub struct GridPlan {
    pub cell_size_degrees: f64,
    pub cells: Vec<GridCell>,
}

/// Number of rows and columns needed to cover `bounds` at `cell_size_degrees`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn grid_dimensions(bounds: &ViewportBounds, cell_size_degrees: f64) -> (usize, usize) {
    let steps = |span: f64| -> usize {
        if span <= 0.0 {
            return 0;
        }
        ((span / cell_size_degrees) - SPAN_TOLERANCE).ceil().max(1.0) as usize
    };
    (steps(bounds.lat_span()), steps(bounds.lng_span()))
}

/// Partition `bounds` into cells of at most `cell_size_degrees` per side.
///
/// Cells are emitted in row-major order starting at the south-west corner.
/// The last row and column are clipped to the viewport edge, so the union of
/// all cells is exactly `bounds`.
#[allow(clippy::cast_precision_loss)]
pub fn divide(bounds: &ViewportBounds, cell_size_degrees: f64) -> Vec<GridCell> {
    let (rows, columns) = grid_dimensions(bounds, cell_size_degrees);

    let mut cells = Vec::with_capacity(rows * columns);
    for row in 0..rows {
        let south = bounds.south + row as f64 * cell_size_degrees;
        let north = if row + 1 == rows {
            bounds.north
        } else {
            south + cell_size_degrees
        };

        for column in 0..columns {
            // Unwrapped west edge; exceeds 180 past the antimeridian.
            let west = bounds.west + column as f64 * cell_size_degrees;
            let east = if column + 1 == columns {
                bounds.east
            } else {
                wrap_longitude(west + cell_size_degrees)
            };

            cells.push(GridCell {
                bounds: ViewportBounds {
                    north,
                    south,
                    east,
                    west: wrap_longitude(west),
                },
                row,
                column,
            });
        }
    }
    cells
}

/// Pick the cell size for `bounds`.
///
/// Returns `configured_size` when it yields at most `max_cells` cells.
/// Otherwise sizes cells so that a square `sqrt(max_cells)` grid spans the
/// longer side. This is a soft cap: `ceil` on the shorter side can still push
/// the count slightly over `max_cells`.
#[allow(clippy::cast_precision_loss)]
pub fn optimal_cell_size(bounds: &ViewportBounds, configured_size: f64, max_cells: usize) -> f64 {
    let (rows, columns) = grid_dimensions(bounds, configured_size);
    let total_cells = rows.saturating_mul(columns);
    if total_cells <= max_cells {
        return configured_size;
    }

    let lat_span = bounds.lat_span();
    let lng_span = bounds.lng_span();
    let target_dimension = (max_cells as f64).sqrt();
    let adjusted = (lat_span / target_dimension).max(lng_span / target_dimension);

    tracing::info!(
        configured_size,
        adjusted_size = adjusted,
        max_cells,
        lat_span,
        lng_span,
        "coarsened grid cell size to stay near the cell ceiling"
    );
    adjusted
}

/// Validate `bounds`, choose a cell size and partition.
///
/// # Errors
///
/// Returns [`GridError::InvalidBounds`] for degenerate viewports and
/// [`GridError::InvalidCellSize`] when the configured or computed size is not
/// a positive finite number.
pub fn plan(
    bounds: &ViewportBounds,
    configured_size: f64,
    max_cells: usize,
) -> Result<GridPlan, GridError> {
    bounds.validate()?;
    if !(configured_size.is_finite() && configured_size > 0.0) {
        return Err(GridError::InvalidCellSize(configured_size));
    }

    let cell_size_degrees = optimal_cell_size(bounds, configured_size, max_cells);
    if !(cell_size_degrees.is_finite() && cell_size_degrees > 0.0) {
        return Err(GridError::InvalidCellSize(cell_size_degrees));
    }

    Ok(GridPlan {
        cell_size_degrees,
        cells: divide(bounds, cell_size_degrees),
    })
}
