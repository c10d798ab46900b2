//! Cartesian row assembly from a form record of parallel sequences.
//!
//! ```text
//! {"x":0,"a":[1,2,3],"b":[11,22,33]}  ->  [{"a":1,"b":11},{"a":2,"b":22},{"a":3,"b":33}]
//! ```
//!
//! Only sequence-valued fields are projected; scalar and object fields are
//! dropped from every row.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::domain::record::Record;

/// How rows are counted when the sequences differ in length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    /// Stop at the shortest sequence.
    #[default]
    Truncate,
    /// Run to the longest sequence, padding with `null`.
    Extend,
}

impl From<bool> for FillMode {
    fn from(fill: bool) -> Self {
        if fill {
            FillMode::Extend
        } else {
            FillMode::Truncate
        }
    }
}

pub struct CartesianAssembler {
    mode: FillMode,
}

impl CartesianAssembler {
    pub fn new(mode: impl Into<FillMode>) -> Self {
        Self { mode: mode.into() }
    }

    #[instrument(level = "debug", skip(self, record), fields(mode = ?self.mode))]
    pub fn assemble(&self, record: &Record) -> Vec<Record> {
        let columns: Vec<(&String, &Vec<Value>)> = record
            .iter()
            .filter_map(|(key, value)| value.as_array().map(|items| (key, items)))
            .collect();

        let lengths = columns.iter().map(|(_, items)| items.len());
        let rows = match self.mode {
            FillMode::Truncate => lengths.min(),
            FillMode::Extend => lengths.max(),
        };
        let Some(rows) = rows else {
            debug!("no sequence fields, nothing to assemble");
            return Vec::new();
        };
        debug!("assembling {} rows from {} columns", rows, columns.len());

        (0..rows)
            .map(|i| {
                columns
                    .iter()
                    .map(|(key, items)| {
                        let cell = items.get(i).cloned().unwrap_or(Value::Null);
                        ((*key).clone(), cell)
                    })
                    .collect()
            })
            .collect()
    }
}

/// Assemble rows from `record` in the given fill mode.
pub fn assemble(record: &Record, mode: impl Into<FillMode>) -> Vec<Record> {
    CartesianAssembler::new(mode).assemble(record)
}
