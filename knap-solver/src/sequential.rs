use crate::error::Result;
use crate::item::ItemSet;
use crate::knapsack::Knapsack;
use crate::reconstruct::reconstruct;
use crate::table::{relax_cells, DpTable};
use log::{debug, info};
use logging_timer::time;

pub fn fill_table(items: &ItemSet, capacity: u64) -> Result<DpTable> {
    let mut table = DpTable::for_items(items.len(), capacity)?;
    debug!(
        "sequential fill: {} rows x {} cols",
        table.num_rows(),
        table.num_cols()
    );
    for (k, item) in items.iter().enumerate() {
        let (prev, cur) = table.rows_mut(k + 1);
        relax_cells(prev, cur, 0, item);
    }
    Ok(table)
}

#[time]
pub fn pack(knapsack: &mut Knapsack, items: &ItemSet) -> Result<u64> {
    let table = fill_table(items, knapsack.max_weight)?;
    reconstruct(&table, items, &mut knapsack.selected)?;
    let value = table.optimal_value();
    info!(
        "sequential: optimal value {} with {} items selected",
        value,
        knapsack.selected.len()
    );
    Ok(value)
}
