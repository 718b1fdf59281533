use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
pub struct GridDimensions {
    pub rows: usize,
    pub columns: usize,
}

impl GridDimensions {
    /// Slots in the rectangle; the last row may hold fewer real cells.
    pub fn capacity(&self) -> usize {
        self.rows * self.columns
    }
}

/// Near-square layout: `columns = ceil(sqrt(n))`, `rows = ceil(n / columns)`.
pub fn compute_dimensions(total_cells: usize) -> GridDimensions {
    if total_cells == 0 {
        return GridDimensions::default();
    }

    let columns = ceil_sqrt(total_cells);
    let rows = total_cells.div_ceil(columns);
    GridDimensions { rows, columns }
}

/// Row and column of a cell position in a row-major grid.
pub fn cell_coordinates(position: usize, columns: usize) -> Option<(usize, usize)> {
    if columns == 0 {
        return None;
    }
    Some((position / columns, position % columns))
}

fn ceil_sqrt(n: usize) -> usize {
    let mut root = (n as f64).sqrt().ceil() as usize;
    while root > 1 && (root - 1) * (root - 1) >= n {
        root -= 1;
    }
    while root * root < n {
        root += 1;
    }
    root.max(1)
}
