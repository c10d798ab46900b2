//! Depth-first leveling of parent-linked records.
//!
//! ```text
//! [{"id":1,"pid":0},{"id":2,"pid":0},{"id":3,"pid":1}]
//!   ->  [{"id":1,"pid":0,"level":1,"html":"|--"},
//!        {"id":3,"pid":1,"level":2,"html":"|--|--"},
//!        {"id":2,"pid":0,"level":1,"html":"|--"}]
//! ```
//!
//! The walk keeps its stack, ancestor set and output rows local to one call,
//! so nothing is shared between calls and chain length is not limited by the
//! call stack.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::links::ParentLinks;
use crate::domain::record::{
    Record, RecordId, DEFAULT_ID_FIELD, DEFAULT_INDENT_FIELD, DEFAULT_INDENT_TOKEN,
    DEFAULT_LEVEL_FIELD, DEFAULT_PARENT_FIELD, ROOT_ID,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelOptions {
    /// Parent id whose children get level 1
    pub parent_id: RecordId,
    /// Parent reference meaning "no parent"
    pub root_id: RecordId,
    pub parent_field: String,
    pub id_field: String,
    /// Repeated once per level to build the indentation marker
    pub indent_token: String,
    pub level_field: String,
    pub indent_field: String,
}

impl Default for LevelOptions {
    fn default() -> Self {
        Self {
            parent_id: ROOT_ID,
            root_id: ROOT_ID,
            parent_field: DEFAULT_PARENT_FIELD.into(),
            id_field: DEFAULT_ID_FIELD.into(),
            indent_token: DEFAULT_INDENT_TOKEN.into(),
            level_field: DEFAULT_LEVEL_FIELD.into(),
            indent_field: DEFAULT_INDENT_FIELD.into(),
        }
    }
}

enum Step {
    Enter { pos: usize, level: usize },
    Leave(RecordId),
}

#[derive(Debug, Default)]
pub struct DepthFirstLeveler {
    options: LevelOptions,
}

impl DepthFirstLeveler {
    pub fn new(options: LevelOptions) -> Self {
        Self { options }
    }

    /// Order `records` depth-first below `parent_id`, annotating level and
    /// indentation. Records not reachable from `parent_id` are left out.
    #[instrument(level = "debug", skip(self, records), fields(len = records.len()))]
    pub fn level(&self, records: &[Record]) -> DomainResult<Vec<Record>> {
        let opts = &self.options;
        let links = ParentLinks::new(records, &opts.id_field, &opts.parent_field, opts.root_id)?;

        let rows = self.walk(&links)?;
        debug!("leveled {} of {} records", rows.len(), records.len());
        Ok(rows)
    }

    fn walk(&self, links: &ParentLinks<'_>) -> DomainResult<Vec<Record>> {
        let opts = &self.options;
        let mut rows = Vec::new();
        let mut ancestors = HashSet::from([opts.parent_id]);
        let mut stack: Vec<_> = links
            .children_of(opts.parent_id)
            .iter()
            .rev()
            .map(|&pos| Step::Enter { pos, level: 1 })
            .collect();

        while let Some(step) = stack.pop() {
            let (pos, level) = match step {
                Step::Leave(id) => {
                    ancestors.remove(&id);
                    continue;
                }
                Step::Enter { pos, level } => (pos, level),
            };
            let id = links.id_at(pos);
            if !ancestors.insert(id) {
                return Err(DomainError::CycleDetected { id });
            }

            let mut row = links.record_at(pos).clone();
            row.insert(opts.level_field.clone(), Value::from(level));
            row.insert(
                opts.indent_field.clone(),
                Value::from(opts.indent_token.repeat(level)),
            );
            rows.push(row);

            stack.push(Step::Leave(id));
            for &child in links.children_of(id).iter().rev() {
                stack.push(Step::Enter {
                    pos: child,
                    level: level + 1,
                });
            }
        }

        Ok(rows)
    }
}

/// Level `records` with the given options.
pub fn level_records(records: &[Record], options: &LevelOptions) -> DomainResult<Vec<Record>> {
    DepthFirstLeveler::new(options.clone()).level(records)
}
