//! Plain-text instance and result files.
//!
//! Instance: capacity, item count, then one `weight value` line per item.
//! Result: `total_weight total_value`, selected count, then one
//! `weight value` line per selected item.

use crate::error::{KnapsackError, Result};
use crate::item::{Item, ItemSet};
use crate::knapsack::Knapsack;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

/// Items reserved up front; larger sets grow on demand.
const PREALLOCATE_LIMIT: usize = 1 << 16;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub max_weight: u64,
    pub items: ItemSet,
}

impl Instance {
    pub fn knapsack(&self) -> Knapsack {
        Knapsack::new(self.max_weight)
    }
}

struct LineReader<R> {
    reader: R,
    buffer: String,
    line: usize,
}

impl<R: BufRead> LineReader<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::new(),
            line: 0,
        }
    }

    fn next_line(&mut self, what: &str) -> Result<(usize, &str)> {
        self.buffer.clear();
        self.line += 1;
        let context = format!("reading {} on line {}", what, self.line);
        let read = self
            .reader
            .read_line(&mut self.buffer)
            .map_err(|e| KnapsackError::io(context.as_str(), e))?;
        if read == 0 {
            return Err(KnapsackError::Io {
                context,
                reason: "unexpected end of input".to_string(),
            });
        }
        Ok((self.line, self.buffer.trim()))
    }

    fn number(&mut self, what: &str) -> Result<u64> {
        let (line, text) = self.next_line(what)?;
        parse_field(line, text, what)
    }

    fn pair(&mut self, what: &str) -> Result<(u64, u64)> {
        let (line, text) = self.next_line(what)?;
        let mut fields = text.split_whitespace();
        let first = fields
            .next()
            .ok_or_else(|| KnapsackError::format(line, format!("missing weight of {}", what)))?;
        let second = fields
            .next()
            .ok_or_else(|| KnapsackError::format(line, format!("missing value of {}", what)))?;
        if fields.next().is_some() {
            return Err(KnapsackError::format(
                line,
                format!("trailing fields after {}", what),
            ));
        }
        Ok((parse_field(line, first, what)?, parse_field(line, second, what)?))
    }
}

fn parse_field(line: usize, text: &str, what: &str) -> Result<u64> {
    text.parse::<u64>().map_err(|e| {
        KnapsackError::format(line, format!("{} '{}' is not an unsigned integer: {}", what, text, e))
    })
}

fn read_items<R: BufRead>(lines: &mut LineReader<R>) -> Result<ItemSet> {
    let count = lines.number("item count")?;
    let count = usize::try_from(count)
        .map_err(|_| KnapsackError::resource(format!("{} items do not fit in memory", count)))?;
    let mut items = ItemSet::with_capacity(count.min(PREALLOCATE_LIMIT))?;
    for i in 0..count {
        let (weight, value) = lines.pair(&format!("item {}", i))?;
        items.push(Item::new(weight, value))?;
    }
    Ok(items)
}

pub fn read_instance<R: BufRead>(reader: R) -> Result<Instance> {
    let mut lines = LineReader::new(reader);
    let max_weight = lines.number("capacity")?;
    let items = read_items(&mut lines)?;
    Ok(Instance { max_weight, items })
}

pub fn write_instance<W: Write>(mut writer: W, instance: &Instance) -> Result<()> {
    let io_err = |e| KnapsackError::io("writing instance", e);
    writeln!(writer, "{}", instance.max_weight).map_err(io_err)?;
    writeln!(writer, "{}", instance.items.len()).map_err(io_err)?;
    for item in &instance.items {
        writeln!(writer, "{} {}", item.weight, item.value).map_err(io_err)?;
    }
    writer.flush().map_err(io_err)
}

pub fn write_selection<W: Write>(mut writer: W, knapsack: &Knapsack) -> Result<()> {
    let io_err = |e| KnapsackError::io("writing result", e);
    let selected = &knapsack.selected;
    writeln!(
        writer,
        "{} {}",
        selected.total_weight(),
        selected.total_value()
    )
    .map_err(io_err)?;
    writeln!(writer, "{}", selected.len()).map_err(io_err)?;
    for item in selected {
        writeln!(writer, "{} {}", item.weight, item.value).map_err(io_err)?;
    }
    writer.flush().map_err(io_err)
}

/// Parses a result file. The header totals must match the listed items.
pub fn read_selection<R: BufRead>(reader: R) -> Result<ItemSet> {
    let mut lines = LineReader::new(reader);
    let (total_weight, total_value) = lines.pair("totals")?;
    let items = read_items(&mut lines)?;
    if items.total_weight() != total_weight || items.total_value() != total_value {
        return Err(KnapsackError::format(
            1,
            format!(
                "totals {} {} do not match the listed items ({} {})",
                total_weight,
                total_value,
                items.total_weight(),
                items.total_value()
            ),
        ));
    }
    Ok(items)
}
