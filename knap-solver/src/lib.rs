pub mod config;
pub use config::{Mode, Solver, SolverConfig};
pub mod distributed;
pub use distributed::DistributedSolver;
pub mod error;
pub use error::{KnapsackError, Result};
pub mod format;
pub use format::Instance;
pub mod generator;
pub use generator::{generate_instance, GenerateParams};
pub mod item;
pub use item::{Item, ItemSet};
pub mod knapsack;
pub use knapsack::Knapsack;
pub mod reconstruct;
pub use reconstruct::reconstruct;
pub mod sequential;
pub mod shared;
pub use shared::SharedMemorySolver;
pub mod table;
pub use table::DpTable;
