use crate::distributed::{self, DistributedSolver};
use crate::error::{KnapsackError, Result};
use crate::item::ItemSet;
use crate::knapsack::Knapsack;
use crate::sequential;
use crate::shared::{self, SharedMemorySolver};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Sequential,
    SharedMemory,
    Distributed,
}

impl FromStr for Mode {
    type Err = KnapsackError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sequential" | "seq" => Ok(Mode::Sequential),
            "shared_memory" | "shared" | "omp" => Ok(Mode::SharedMemory),
            "distributed" | "mpi" => Ok(Mode::Distributed),
            _ => Err(KnapsackError::argument(format!("unknown mode '{}'", s))),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Sequential => write!(f, "sequential"),
            Mode::SharedMemory => write!(f, "shared_memory"),
            Mode::Distributed => write!(f, "distributed"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    #[serde(default)]
    pub mode: Mode,
    /// Shared-memory pool size; rayon picks one per core when unset.
    #[serde(default)]
    pub num_threads: Option<usize>,
    #[serde(default = "default_column_chunk")]
    pub column_chunk: usize,
    #[serde(default = "default_row_block")]
    pub row_block: usize,
    #[serde(default = "default_num_workers")]
    pub num_workers: usize,
}

fn default_column_chunk() -> usize {
    shared::DEFAULT_COLUMN_CHUNK
}

fn default_row_block() -> usize {
    distributed::DEFAULT_ROW_BLOCK
}

fn default_num_workers() -> usize {
    distributed::DEFAULT_NUM_WORKERS
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            num_threads: None,
            column_chunk: default_column_chunk(),
            row_block: default_row_block(),
            num_workers: default_num_workers(),
        }
    }
}

impl SolverConfig {
    pub fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| KnapsackError::argument(format!("solver config: {}", e)))
    }
}

/// The closed set of execution strategies behind one `pack` entry point.
#[derive(Debug)]
pub enum Solver {
    Sequential,
    SharedMemory(SharedMemorySolver),
    Distributed(DistributedSolver),
}

impl Solver {
    pub fn from_config(config: &SolverConfig) -> Result<Self> {
        Ok(match config.mode {
            Mode::Sequential => Solver::Sequential,
            Mode::SharedMemory => Solver::SharedMemory(SharedMemorySolver::new(
                config.num_threads,
                config.column_chunk,
            )?),
            Mode::Distributed => Solver::Distributed(DistributedSolver::new(
                config.num_workers,
                config.row_block,
                config.column_chunk,
            )?),
        })
    }

    pub fn mode(&self) -> Mode {
        match self {
            Solver::Sequential => Mode::Sequential,
            Solver::SharedMemory(_) => Mode::SharedMemory,
            Solver::Distributed(_) => Mode::Distributed,
        }
    }

    /// Appends an optimal selection to `knapsack.selected` and returns its value.
    pub fn pack(&self, knapsack: &mut Knapsack, items: &ItemSet) -> Result<u64> {
        match self {
            Solver::Sequential => sequential::pack(knapsack, items),
            Solver::SharedMemory(solver) => solver.pack(knapsack, items),
            Solver::Distributed(solver) => solver.pack(knapsack, items),
        }
    }
}
