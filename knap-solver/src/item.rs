use crate::error::{KnapsackError, Result};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Item {
    pub weight: u64,
    pub value: u64,
}

impl Item {
    pub fn new(weight: u64, value: u64) -> Self {
        Self { weight, value }
    }

    /// Weight as a column offset. Weights beyond `usize` can never fit any table.
    pub(crate) fn weight_index(&self) -> usize {
        usize::try_from(self.weight).unwrap_or(usize::MAX)
    }
}

impl From<(u64, u64)> for Item {
    fn from((weight, value): (u64, u64)) -> Self {
        Self { weight, value }
    }
}

/// Ordered collection of items. Insertion order decides the DP row of each item.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(try_from = "Vec<Item>", into = "Vec<Item>")]
pub struct ItemSet {
    items: Vec<Item>,
    total_value: u64,
    total_weight: u64,
}

impl ItemSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut items = Vec::new();
        items.try_reserve_exact(capacity).map_err(|e| {
            KnapsackError::resource(format!("item set of {} items: {}", capacity, e))
        })?;
        Ok(Self {
            items,
            total_value: 0,
            total_weight: 0,
        })
    }

    pub fn try_from_items<I>(items: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Item>,
    {
        let mut set = Self::new();
        for item in items {
            set.push(item.into())?;
        }
        Ok(set)
    }

    pub fn push(&mut self, item: Item) -> Result<()> {
        self.items.try_reserve(1).map_err(|e| {
            KnapsackError::resource(format!(
                "growing item set past {} items: {}",
                self.items.len(),
                e
            ))
        })?;
        self.items.push(item);
        self.total_value = self.total_value.saturating_add(item.value);
        self.total_weight = self.total_weight.saturating_add(item.weight);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Item] {
        &self.items
    }

    pub fn total_value(&self) -> u64 {
        self.total_value
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }
}

impl<'a> IntoIterator for &'a ItemSet {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl TryFrom<Vec<Item>> for ItemSet {
    type Error = KnapsackError;

    fn try_from(items: Vec<Item>) -> Result<Self> {
        Self::try_from_items(items)
    }
}

impl From<ItemSet> for Vec<Item> {
    fn from(set: ItemSet) -> Self {
        set.items
    }
}
