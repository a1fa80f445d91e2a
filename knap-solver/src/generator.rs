use crate::error::{KnapsackError, Result};
use crate::format::Instance;
use crate::item::{Item, ItemSet};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GenerateParams {
    pub num_items: usize,
    pub max_weight: u64,
    /// Inclusive `(min, max)` bounds for item values.
    #[serde(default = "default_value_range")]
    pub value_range: (u64, u64),
    /// Inclusive `(min, max)` bounds for item weights.
    #[serde(default = "default_weight_range")]
    pub weight_range: (u64, u64),
}

fn default_value_range() -> (u64, u64) {
    (1, 100)
}

fn default_weight_range() -> (u64, u64) {
    (1, 50)
}

impl GenerateParams {
    pub fn new(num_items: usize, max_weight: u64) -> Self {
        Self {
            num_items,
            max_weight,
            value_range: default_value_range(),
            weight_range: default_weight_range(),
        }
    }
}

pub fn generate_instance(seed: &[u8; 32], params: &GenerateParams) -> Result<Instance> {
    let (value_min, value_max) = params.value_range;
    let (weight_min, weight_max) = params.weight_range;
    if value_min > value_max {
        return Err(KnapsackError::argument(format!(
            "value range {}..={} is empty",
            value_min, value_max
        )));
    }
    if weight_min > weight_max {
        return Err(KnapsackError::argument(format!(
            "weight range {}..={} is empty",
            weight_min, weight_max
        )));
    }

    let mut rng = SmallRng::from_seed(*seed);
    let mut items = ItemSet::with_capacity(params.num_items)?;
    for _ in 0..params.num_items {
        let value = rng.gen_range(value_min..=value_max);
        let weight = rng.gen_range(weight_min..=weight_max);
        items.push(Item::new(weight, value))?;
    }

    Ok(Instance {
        max_weight: params.max_weight,
        items,
    })
}
