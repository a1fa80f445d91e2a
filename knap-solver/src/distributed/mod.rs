//! Process-style wavefront solver.
//!
//! Items are cut into row blocks of `row_block` items, dealt round-robin to
//! `num_workers` ranks. Capacity is cut into column chunks of `column_chunk`
//! cells. Each rank owns only the cells of its own blocks plus one imported
//! boundary row per block, and talks to the others through [`comm::Endpoint`].
//!
//! Fill: for every chunk in increasing order a block receives that chunk of
//! its predecessor's last row, fills the chunk over its rows and forwards the
//! chunk of its own last row to the next rank. A downstream block starts as
//! soon as its first chunk is available.
//!
//! Traceback: the rank holding the last block starts a token at `(n, W)`;
//! every block walks its rows backward with the usual tie-break and hands
//! the token to the owner of the previous block.

pub mod comm;

use crate::error::{KnapsackError, Result};
use crate::item::{Item, ItemSet};
use crate::knapsack::Knapsack;
use crate::reconstruct::{append_picked, walk_rows};
use crate::table::{column_count, relax_cells, DpTable};
use comm::{Endpoint, Message, Tag, TracebackToken};
use log::{debug, info};
use logging_timer::timer;
use std::ops::Range;
use std::thread;

pub const DEFAULT_NUM_WORKERS: usize = 4;
pub const DEFAULT_ROW_BLOCK: usize = 64;
pub const DEFAULT_COLUMN_CHUNK: usize = 100;

/// Block and chunk partition of one solve. Only built by [`DistributedSolver::layout`],
/// so every size is positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub(crate) num_items: usize,
    pub(crate) num_cols: usize,
    pub(crate) num_workers: usize,
    pub(crate) row_block: usize,
    pub(crate) column_chunk: usize,
}

impl Layout {
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    pub fn row_block(&self) -> usize {
        self.row_block
    }

    pub fn column_chunk(&self) -> usize {
        self.column_chunk
    }

    pub fn num_blocks(&self) -> usize {
        (self.num_items + self.row_block - 1) / self.row_block
    }

    pub fn owner(&self, block: usize) -> usize {
        block % self.num_workers
    }

    /// Item indices covered by `block`.
    pub fn block_items(&self, block: usize) -> Range<usize> {
        let start = block * self.row_block;
        start..(start + self.row_block).min(self.num_items)
    }

    pub fn blocks_of(&self, rank: usize) -> impl Iterator<Item = usize> {
        (rank..self.num_blocks()).step_by(self.num_workers)
    }

    pub fn chunks(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.num_cols)
            .step_by(self.column_chunk)
            .map(move |start| start..(start + self.column_chunk).min(self.num_cols))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributedSolver {
    num_workers: usize,
    row_block: usize,
    column_chunk: usize,
}

impl Default for DistributedSolver {
    fn default() -> Self {
        Self {
            num_workers: DEFAULT_NUM_WORKERS,
            row_block: DEFAULT_ROW_BLOCK,
            column_chunk: DEFAULT_COLUMN_CHUNK,
        }
    }
}

impl DistributedSolver {
    pub fn new(num_workers: usize, row_block: usize, column_chunk: usize) -> Result<Self> {
        if num_workers == 0 {
            return Err(KnapsackError::argument("worker count must be positive"));
        }
        if row_block == 0 {
            return Err(KnapsackError::argument("row block must be positive"));
        }
        if column_chunk == 0 {
            return Err(KnapsackError::argument("column chunk must be positive"));
        }
        Ok(Self {
            num_workers,
            row_block,
            column_chunk,
        })
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    pub fn row_block(&self) -> usize {
        self.row_block
    }

    pub fn column_chunk(&self) -> usize {
        self.column_chunk
    }

    pub fn layout(&self, num_items: usize, capacity: u64) -> Result<Layout> {
        Ok(Layout {
            num_items,
            num_cols: column_count(capacity)?,
            num_workers: self.num_workers,
            row_block: self.row_block,
            column_chunk: self.column_chunk,
        })
    }

    pub fn pack(&self, knapsack: &mut Knapsack, items: &ItemSet) -> Result<u64> {
        let _tmr = timer!("distributed_pack");
        let layout = self.layout(items.len(), knapsack.max_weight)?;
        debug!(
            "distributed fill: {} blocks of {} rows over {} workers, {} cols in chunks of {}",
            layout.num_blocks(),
            layout.row_block,
            layout.num_workers,
            layout.num_cols,
            layout.column_chunk
        );
        let token = run_world(&layout, items.as_slice())?;
        append_picked(&token.picked, items.as_slice(), &mut knapsack.selected)?;
        info!(
            "distributed: optimal value {} with {} items selected",
            token.value,
            knapsack.selected.len()
        );
        Ok(token.value)
    }
}

/// Runs one worker per rank and returns the finished traceback token.
fn run_world(layout: &Layout, items: &[Item]) -> Result<TracebackToken> {
    if layout.num_blocks() == 0 {
        // Base row only.
        let table = DpTable::allocate(1, layout.num_cols)?;
        return Ok(TracebackToken {
            value: table.optimal_value(),
            remaining: layout.num_cols - 1,
            picked: Vec::new(),
        });
    }
    let results: Vec<Result<Option<TracebackToken>>> = thread::scope(|s| {
        let handles: Vec<_> = Endpoint::world(layout.num_workers)
            .into_iter()
            .map(|endpoint| {
                thread::Builder::new()
                    .name(format!("knap-rank-{}", endpoint.rank()))
                    .spawn_scoped(s, move || Worker::new(endpoint, layout, items).run())
            })
            .collect();
        handles
            .into_iter()
            .enumerate()
            .map(|(rank, handle)| match handle {
                Ok(handle) => handle.join().unwrap_or_else(|_| {
                    Err(KnapsackError::communication(rank, "worker panicked"))
                }),
                Err(e) => Err(KnapsackError::resource(format!(
                    "spawning worker {}: {}",
                    rank, e
                ))),
            })
            .collect()
    });

    let mut token = None;
    let mut failure: Option<KnapsackError> = None;
    for result in results {
        match result {
            Ok(Some(t)) => token = Some(t),
            Ok(None) => {}
            Err(e) => {
                // Communication failures are knock-on effects of the root cause.
                let replace = match &failure {
                    None => true,
                    Some(KnapsackError::Communication { .. }) => {
                        !matches!(e, KnapsackError::Communication { .. })
                    }
                    Some(_) => false,
                };
                if replace {
                    failure = Some(e);
                }
            }
        }
    }
    if let Some(e) = failure {
        return Err(e);
    }
    token.ok_or_else(|| KnapsackError::communication(0, "no rank produced a traceback"))
}

/// One rank. Block tables are allocated and dropped inside `run`.
struct Worker<'a> {
    endpoint: Endpoint,
    layout: &'a Layout,
    items: &'a [Item],
}

impl<'a> Worker<'a> {
    fn new(endpoint: Endpoint, layout: &'a Layout, items: &'a [Item]) -> Self {
        Self {
            endpoint,
            layout,
            items,
        }
    }

    fn run(mut self) -> Result<Option<TracebackToken>> {
        let rank = self.endpoint.rank();
        let mut blocks = Vec::new();
        for block in self.layout.blocks_of(rank) {
            let rows = self.layout.block_items(block).len();
            blocks.push((block, DpTable::allocate(rows + 1, self.layout.num_cols)?));
        }
        debug!("rank {}: owns {} blocks", rank, blocks.len());

        for (block, table) in blocks.iter_mut() {
            self.fill_block(*block, table)?;
        }

        let mut result = None;
        for (block, table) in blocks.iter().rev() {
            result = self.trace_block(*block, table)?;
        }
        Ok(result)
    }

    fn fill_block(&mut self, block: usize, table: &mut DpTable) -> Result<()> {
        let rank = self.endpoint.rank();
        let item_range = self.layout.block_items(block);
        let last_row = item_range.len();
        let is_first = block == 0;
        let is_last = block + 1 == self.layout.num_blocks();
        let prev_rank = if is_first {
            rank
        } else {
            self.layout.owner(block - 1)
        };
        let next_rank = self.layout.owner(block + 1);

        for chunk in self.layout.chunks() {
            if !is_first {
                let cells = match self.endpoint.recv(prev_rank, Tag::Boundary(chunk.start))? {
                    Message::Boundary(cells) => cells,
                    other => {
                        return Err(KnapsackError::communication(
                            rank,
                            format!("expected boundary cells, got {:?}", other),
                        ))
                    }
                };
                if cells.len() != chunk.len() {
                    return Err(KnapsackError::communication(
                        rank,
                        format!(
                            "boundary chunk at column {} has {} cells, expected {}",
                            chunk.start,
                            cells.len(),
                            chunk.len()
                        ),
                    ));
                }
                table.row_mut(0)[chunk.clone()].copy_from_slice(&cells);
            }

            for (offset, item) in self.items[item_range.clone()].iter().enumerate() {
                let (prev, cur) = table.rows_mut(offset + 1);
                relax_cells(prev, &mut cur[chunk.clone()], chunk.start, item);
            }

            if !is_last {
                let cells = table.row(last_row)[chunk.clone()].to_vec();
                self.endpoint
                    .send(next_rank, Tag::Boundary(chunk.start), Message::Boundary(cells))?;
            }
        }
        debug!("rank {}: filled block {} ({:?})", rank, block, item_range);
        Ok(())
    }

    fn trace_block(&mut self, block: usize, table: &DpTable) -> Result<Option<TracebackToken>> {
        let rank = self.endpoint.rank();
        let mut token = if block + 1 == self.layout.num_blocks() {
            let remaining = self.layout.num_cols - 1;
            TracebackToken {
                value: table.get(table.num_rows() - 1, remaining),
                remaining,
                picked: Vec::new(),
            }
        } else {
            let source = self.layout.owner(block + 1);
            match self.endpoint.recv(source, Tag::Traceback(block))? {
                Message::Traceback(token) => token,
                other => {
                    return Err(KnapsackError::communication(
                        rank,
                        format!("expected traceback token, got {:?}", other),
                    ))
                }
            }
        };

        let first_item = self.layout.block_items(block).start;
        walk_rows(
            table,
            self.items,
            first_item,
            &mut token.remaining,
            &mut token.picked,
        );

        if block == 0 {
            return Ok(Some(token));
        }
        let dest = self.layout.owner(block - 1);
        self.endpoint
            .send(dest, Tag::Traceback(block - 1), Message::Traceback(token))?;
        Ok(None)
    }
}
