//! Optimal one-to-one assignment over a rectangular cost matrix.
//!
//! Rows and columns carry no meaning here beyond their indices, which keeps
//! the solver testable against plain assignment-problem instances.

use ndarray::Array2;

use crate::error::{Result, TrackerError};

/// Cost given to padding cells when a rectangular matrix is squared up.
///
/// Every padding cell carries the same cost, so it shifts the total of every
/// full assignment equally and never changes which real pairs are optimal.
const PADDING_COST: f64 = 1e6;

/// Build a cost matrix from row vectors, rejecting ragged input.
pub fn cost_matrix_from_rows(rows: &[Vec<f64>]) -> Result<Array2<f64>> {
    let num_cols = rows.first().map_or(0, Vec::len);
    for (row, values) in rows.iter().enumerate() {
        if values.len() != num_cols {
            return Err(TrackerError::RaggedCostMatrix {
                row,
                expected: num_cols,
                found: values.len(),
            });
        }
    }
    Ok(Array2::from_shape_fn((rows.len(), num_cols), |(i, j)| {
        rows[i][j]
    }))
}

/// Minimum-cost assignment of rows to columns.
///
/// Returns one entry per row: `Some(col)` for an assigned row, `None` for a
/// row left over when there are more rows than columns. Exactly
/// `min(rows, cols)` rows are assigned.
pub fn solve(cost_matrix: &Array2<f64>) -> Result<Vec<Option<usize>>> {
    let (num_rows, num_cols) = cost_matrix.dim();

    if let Some(((row, col), &value)) = cost_matrix.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(TrackerError::NonFiniteCost { row, col, value });
    }

    if num_rows == 0 || num_cols == 0 {
        return Ok(vec![None; num_rows]);
    }

    let size = num_rows.max(num_cols);
    let mut padded = Array2::<f64>::from_elem((size, size), PADDING_COST);
    padded
        .slice_mut(ndarray::s![..num_rows, ..num_cols])
        .assign(cost_matrix);

    let (row_to_col, _) =
        lapjv::lapjv(&padded).map_err(|e| TrackerError::Solver(format!("{e:?}")))?;

    Ok(row_to_col
        .into_iter()
        .take(num_rows)
        .map(|col| (col < num_cols).then_some(col))
        .collect())
}

/// Sum of the costs of the assigned cells.
pub fn total_cost(cost_matrix: &Array2<f64>, assignment: &[Option<usize>]) -> f64 {
    assignment
        .iter()
        .enumerate()
        .filter_map(|(row, col)| col.map(|col| cost_matrix[[row, col]]))
        .sum()
}
