use crate::item::ItemSet;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Knapsack {
    pub max_weight: u64,
    pub selected: ItemSet,
}

impl Knapsack {
    pub fn new(max_weight: u64) -> Self {
        Self {
            max_weight,
            selected: ItemSet::new(),
        }
    }

    pub fn value(&self) -> u64 {
        self.selected.total_value()
    }

    pub fn weight(&self) -> u64 {
        self.selected.total_weight()
    }
}
