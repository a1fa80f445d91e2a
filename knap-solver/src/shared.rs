use crate::error::{KnapsackError, Result};
use crate::item::ItemSet;
use crate::knapsack::Knapsack;
use crate::reconstruct::reconstruct;
use crate::table::{relax_cells, DpTable};
use log::{debug, info};
use logging_timer::timer;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

pub const DEFAULT_COLUMN_CHUNK: usize = 100;

/// Fills each DP row with a persistent rayon pool.
///
/// Rows stay strictly ordered; the columns of one row are split into chunks
/// of `column_chunk` cells that the pool's workers steal dynamically.
#[derive(Debug)]
pub struct SharedMemorySolver {
    pool: ThreadPool,
    column_chunk: usize,
}

impl SharedMemorySolver {
    pub fn new(num_threads: Option<usize>, column_chunk: usize) -> Result<Self> {
        if column_chunk == 0 {
            return Err(KnapsackError::argument("column chunk must be positive"));
        }
        let mut builder =
            ThreadPoolBuilder::new().thread_name(|i| format!("knap-shared-{}", i));
        if let Some(num_threads) = num_threads {
            if num_threads == 0 {
                return Err(KnapsackError::argument("thread count must be positive"));
            }
            builder = builder.num_threads(num_threads);
        }
        let pool = builder
            .build()
            .map_err(|e| KnapsackError::resource(format!("thread pool: {}", e)))?;
        Ok(Self { pool, column_chunk })
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn column_chunk(&self) -> usize {
        self.column_chunk
    }

    pub fn fill_table(&self, items: &ItemSet, capacity: u64) -> Result<DpTable> {
        let mut table = DpTable::for_items(items.len(), capacity)?;
        debug!(
            "shared-memory fill: {} rows x {} cols on {} threads, chunk {}",
            table.num_rows(),
            table.num_cols(),
            self.num_threads(),
            self.column_chunk
        );
        let chunk = self.column_chunk;
        self.pool.install(|| {
            for (k, item) in items.iter().enumerate() {
                let (prev, cur) = table.rows_mut(k + 1);
                // for_each returns once every chunk of this row is written.
                cur.par_chunks_mut(chunk)
                    .enumerate()
                    .for_each(|(i, cells)| relax_cells(prev, cells, i * chunk, item));
            }
        });
        Ok(table)
    }

    pub fn pack(&self, knapsack: &mut Knapsack, items: &ItemSet) -> Result<u64> {
        let _tmr = timer!("shared_memory_pack");
        let table = self.fill_table(items, knapsack.max_weight)?;
        reconstruct(&table, items, &mut knapsack.selected)?;
        let value = table.optimal_value();
        info!(
            "shared-memory: optimal value {} with {} items selected",
            value,
            knapsack.selected.len()
        );
        Ok(value)
    }
}
