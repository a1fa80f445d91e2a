use crate::error::{KnapsackError, Result};
use crate::item::{Item, ItemSet};
use crate::table::DpTable;

/// Recovers an optimal selection from a filled table and appends it to
/// `selected` in increasing item order.
///
/// Walks from `(n, W)` towards row 0. Exclusion wins ties, so every solver
/// variant yields the same selection for the same item set.
pub fn reconstruct(table: &DpTable, items: &ItemSet, selected: &mut ItemSet) -> Result<()> {
    if table.num_rows() != items.len() + 1 {
        return Err(KnapsackError::argument(format!(
            "table has {} rows but the item set has {} items",
            table.num_rows(),
            items.len()
        )));
    }
    let mut remaining = table.num_cols().saturating_sub(1);
    let mut picked = Vec::new();
    walk_rows(table, items.as_slice(), 0, &mut remaining, &mut picked);
    append_picked(&picked, items.as_slice(), selected)
}

/// Walks rows `num_rows - 1` down to 1 of `table`, where local row `i`
/// holds item `first_item + i - 1` and row 0 is the predecessor row.
///
/// Picked item indices are pushed in decreasing order. Returns `true` once a
/// zero cell ends the walk.
pub(crate) fn walk_rows(
    table: &DpTable,
    items: &[Item],
    first_item: usize,
    remaining: &mut usize,
    picked: &mut Vec<usize>,
) -> bool {
    for row in (1..table.num_rows()).rev() {
        let value = table.get(row, *remaining);
        if value == 0 {
            return true;
        }
        if table.get(row - 1, *remaining) == value {
            continue;
        }
        let index = first_item + row - 1;
        picked.push(index);
        // A differing cell means the item was included, so it fits.
        *remaining -= items[index].weight_index();
    }
    false
}

/// Appends items for `picked` (collected in decreasing order) in increasing order.
pub(crate) fn append_picked(picked: &[usize], items: &[Item], selected: &mut ItemSet) -> Result<()> {
    for &index in picked.iter().rev() {
        selected.push(items[index])?;
    }
    Ok(())
}
