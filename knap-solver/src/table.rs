use crate::error::{KnapsackError, Result};
use crate::item::Item;

/// Dense DP table stored as one row-major buffer.
///
/// `get(k, w)` is the best value reachable with the first `k` items of the
/// item set and capacity `w`. Row 0 is the empty prefix and stays all zeros.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DpTable {
    cells: Vec<u64>,
    num_rows: usize,
    num_cols: usize,
}

impl DpTable {
    pub fn allocate(num_rows: usize, num_cols: usize) -> Result<Self> {
        let len = num_rows.checked_mul(num_cols).ok_or_else(|| {
            KnapsackError::resource(format!(
                "table of {} x {} cells overflows the address space",
                num_rows, num_cols
            ))
        })?;
        let mut cells = Vec::new();
        cells.try_reserve_exact(len).map_err(|e| {
            KnapsackError::resource(format!(
                "table of {} x {} cells: {}",
                num_rows, num_cols, e
            ))
        })?;
        cells.resize(len, 0);
        Ok(Self {
            cells,
            num_rows,
            num_cols,
        })
    }

    /// `(num_items + 1) x (capacity + 1)` table.
    pub fn for_items(num_items: usize, capacity: u64) -> Result<Self> {
        let num_rows = num_items
            .checked_add(1)
            .ok_or_else(|| KnapsackError::resource("item count overflows table rows"))?;
        Self::allocate(num_rows, column_count(capacity)?)
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn get(&self, row: usize, col: usize) -> u64 {
        self.cells[row * self.num_cols + col]
    }

    pub fn row(&self, row: usize) -> &[u64] {
        let start = row * self.num_cols;
        &self.cells[start..start + self.num_cols]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [u64] {
        let start = row * self.num_cols;
        &mut self.cells[start..start + self.num_cols]
    }

    /// Splits out row `row - 1` (read only) and row `row` (writable).
    pub fn rows_mut(&mut self, row: usize) -> (&[u64], &mut [u64]) {
        assert!(row > 0 && row < self.num_rows, "row {} has no predecessor", row);
        let start = (row - 1) * self.num_cols;
        let (prev, cur) = self.cells[start..start + 2 * self.num_cols].split_at_mut(self.num_cols);
        (prev, cur)
    }

    /// Value in the bottom-right cell.
    pub fn optimal_value(&self) -> u64 {
        match (self.num_rows, self.num_cols) {
            (0, _) | (_, 0) => 0,
            (rows, cols) => self.get(rows - 1, cols - 1),
        }
    }
}

/// Number of capacity columns, `capacity + 1`, as a buffer dimension.
pub fn column_count(capacity: u64) -> Result<usize> {
    usize::try_from(capacity)
        .ok()
        .and_then(|c| c.checked_add(1))
        .ok_or_else(|| {
            KnapsackError::resource(format!(
                "capacity {} does not fit in addressable memory",
                capacity
            ))
        })
}

/// Applies the 0/1 recurrence to the columns `first_col..first_col + cur.len()`.
///
/// `prev` is the complete previous row; it is only indexed at `w - weight`
/// when the item actually fits in `w`.
pub fn relax_cells(prev: &[u64], cur: &mut [u64], first_col: usize, item: &Item) {
    let weight = item.weight_index();
    for (offset, cell) in cur.iter_mut().enumerate() {
        let w = first_col + offset;
        let exclude = prev[w];
        *cell = match w.checked_sub(weight) {
            Some(rest) => exclude.max(prev[rest].saturating_add(item.value)),
            None => exclude,
        };
    }
}
