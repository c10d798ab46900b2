//! Tree flattener: nested nodes to parent-linked records with fresh ids.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::record::{
    as_record, value_kind, Record, RecordId, DEFAULT_CHILD_FIELD, DEFAULT_ID_FIELD,
    DEFAULT_PARENT_FIELD, ROOT_ID,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenOptions {
    pub child_field: String,
    pub id_field: String,
    pub parent_id_field: String,
    /// Parent id assigned to top-level nodes
    pub root_id: RecordId,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            child_field: DEFAULT_CHILD_FIELD.into(),
            id_field: DEFAULT_ID_FIELD.into(),
            parent_id_field: DEFAULT_PARENT_FIELD.into(),
            root_id: ROOT_ID,
        }
    }
}

/// Monotonic id source for one flatten call, starting at 1.
#[derive(Debug)]
pub struct IdSequence {
    next: RecordId,
}

impl Default for IdSequence {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdSequence {
    pub fn next_id(&mut self) -> RecordId {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Flattens nested trees in pre-order.
///
/// ```text
/// [{"n":"a","children":[{"n":"b"}]}]  ->  [{"n":"a","id":1,"pid":0},{"n":"b","id":2,"pid":1}]
/// ```
#[derive(Debug, Default)]
pub struct TreeFlattener {
    options: FlattenOptions,
}

impl TreeFlattener {
    pub fn new(options: FlattenOptions) -> Self {
        Self { options }
    }

    #[instrument(level = "debug", skip(self, nodes), fields(len = nodes.len()))]
    pub fn flatten(&self, nodes: &[Value]) -> DomainResult<Vec<Record>> {
        let mut ids = IdSequence::default();
        let mut flat = Vec::new();
        self.flatten_level(nodes, self.options.root_id, &mut ids, &mut flat)?;
        debug!("flattened {} nodes", flat.len());
        Ok(flat)
    }

    fn flatten_level(
        &self,
        nodes: &[Value],
        parent_id: RecordId,
        ids: &mut IdSequence,
        flat: &mut Vec<Record>,
    ) -> DomainResult<()> {
        let opts = &self.options;
        for node in nodes {
            let position = flat.len();
            let mut row = as_record(node, position)?.clone();
            let id = ids.next_id();
            row.insert(opts.id_field.clone(), Value::from(id));
            row.insert(opts.parent_id_field.clone(), Value::from(parent_id));

            let children = match row.shift_remove(&opts.child_field) {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(children)) => children,
                Some(other) => {
                    return Err(DomainError::invalid(
                        position,
                        &opts.child_field,
                        format!("must be an array, got {}", value_kind(&other)),
                    ))
                }
            };
            trace!("node {} under {} with {} children", id, parent_id, children.len());

            flat.push(row);
            self.flatten_level(&children, id, ids, flat)?;
        }
        Ok(())
    }
}

/// Flatten `nodes` with the given options.
pub fn flatten_tree(nodes: &[Value], options: &FlattenOptions) -> DomainResult<Vec<Record>> {
    TreeFlattener::new(options.clone()).flatten(nodes)
}
