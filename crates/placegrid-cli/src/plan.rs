//! `plan` command: dry-run of the grid division, no provider calls.

use placegrid_core::ViewportBounds;
use placegrid_search::grid;
use placegrid_search::worker::cell_radius_meters;

/// Print the cell size chosen for `bounds` and every resulting cell.
///
/// # Errors
///
/// Returns an error if the viewport is degenerate or `cell_size` is not a
/// positive number.
pub(crate) fn run_plan(
    bounds: &ViewportBounds,
    cell_size: f64,
    max_cells: usize,
) -> anyhow::Result<()> {
    let plan = grid::plan(bounds, cell_size, max_cells)?;
    let (rows, columns) = grid::grid_dimensions(bounds, plan.cell_size_degrees);

    println!(
        "cell size {:.6}\u{b0} ({rows} rows x {columns} columns, {} cells)",
        plan.cell_size_degrees,
        plan.cells.len()
    );
    if bounds.crosses_antimeridian() {
        println!("viewport crosses the antimeridian");
    }
    println!();

    let header = format!(
        "{:<5}{:<5}{:<13}{:<13}{:<13}{:<13}RADIUS_M",
        "ROW", "COL", "SOUTH", "WEST", "NORTH", "EAST"
    );
    println!("{header}");
    for cell in &plan.cells {
        let b = &cell.bounds;
        println!(
            "{:<5}{:<5}{:<13.6}{:<13.6}{:<13.6}{:<13.6}{:.0}",
            cell.row,
            cell.column,
            b.south,
            b.west,
            b.north,
            b.east,
            cell_radius_meters(cell)
        );
    }

    Ok(())
}
