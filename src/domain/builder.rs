//! Tree builder for turning parent-linked records into nested trees.

use std::collections::HashSet;

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::domain::arena::RecordArena;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::links::ParentLinks;
use crate::domain::record::{
    Record, RecordId, DEFAULT_CHILD_FIELD, DEFAULT_ID_FIELD, DEFAULT_MAX_DEPTH,
    DEFAULT_PARENT_FIELD, ROOT_ID,
};

/// Field names and start point for [`TreeBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Parent id whose children become the top-level nodes
    pub parent_id: RecordId,
    /// Parent reference meaning "no parent"
    pub root_id: RecordId,
    pub id_field: String,
    pub parent_field: String,
    pub child_field: String,
    /// Deepest nesting level allowed below `parent_id`
    pub max_depth: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            parent_id: ROOT_ID,
            root_id: ROOT_ID,
            id_field: DEFAULT_ID_FIELD.into(),
            parent_field: DEFAULT_PARENT_FIELD.into(),
            child_field: DEFAULT_CHILD_FIELD.into(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

enum Step {
    Enter {
        pos: usize,
        parent: Option<Index>,
        depth: usize,
    },
    Leave(RecordId),
}

/// Constructs nested trees from flat parent-linked records.
///
/// ```text
/// [{"id":1,"pid":0},{"id":2,"pid":1}]  ->  [{"id":1,"pid":0,"children":[{"id":2,"pid":1,"children":[]}]}]
/// ```
#[derive(Debug, Default)]
pub struct TreeBuilder {
    options: BuildOptions,
}

impl TreeBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Build the nested tree below `parent_id`.
    ///
    /// Every node carries the child field, leaves get an empty sequence.
    /// Sibling order follows input order.
    #[instrument(level = "debug", skip(self, records), fields(len = records.len()))]
    pub fn build(&self, records: &[Record]) -> DomainResult<Vec<Record>> {
        let tree = self.build_arena(records)?;
        Ok(tree.into_nested(&self.options.child_field))
    }

    /// Build the intermediate arena forest below `parent_id`.
    ///
    /// Walks with an explicit stack, so long parent chains need no call
    /// stack. Nodes deeper than `max_depth` fail with `DepthExceeded`.
    #[instrument(level = "debug", skip(self, records), fields(len = records.len()))]
    pub fn build_arena(&self, records: &[Record]) -> DomainResult<RecordArena> {
        let opts = &self.options;
        let links = ParentLinks::new(records, &opts.id_field, &opts.parent_field, opts.root_id)?;

        let mut tree = RecordArena::new();
        let mut ancestors = HashSet::from([opts.parent_id]);
        let mut stack: Vec<_> = links
            .children_of(opts.parent_id)
            .iter()
            .rev()
            .map(|&pos| Step::Enter {
                pos,
                parent: None,
                depth: 1,
            })
            .collect();

        while let Some(step) = stack.pop() {
            let (pos, parent_idx, depth) = match step {
                Step::Leave(id) => {
                    ancestors.remove(&id);
                    continue;
                }
                Step::Enter { pos, parent, depth } => (pos, parent, depth),
            };
            let id = links.id_at(pos);

            // Cycle detection: a node must not reappear on its own ancestor path
            if !ancestors.insert(id) {
                return Err(DomainError::CycleDetected { id });
            }
            if depth > opts.max_depth {
                return Err(DomainError::DepthExceeded {
                    id,
                    limit: opts.max_depth,
                });
            }

            let current_idx = tree.insert_node(id, links.record_at(pos).clone(), parent_idx);
            trace!("inserted node {} at depth {}", id, depth);

            stack.push(Step::Leave(id));
            for &child in links.children_of(id).iter().rev() {
                stack.push(Step::Enter {
                    pos: child,
                    parent: Some(current_idx),
                    depth: depth + 1,
                });
            }
        }

        debug!("built forest of {} nodes", tree.len());
        Ok(tree)
    }
}

/// Build a nested tree from `records` with the given options.
pub fn build_tree(records: &[Record], options: &BuildOptions) -> DomainResult<Vec<Record>> {
    TreeBuilder::new(options.clone()).build(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::records_from_values;
    use serde_json::{json, Value};

    fn records(value: Value) -> Vec<Record> {
        records_from_values(value.as_array().unwrap()).unwrap()
    }

    fn to_value(records: Vec<Record>) -> Value {
        Value::Array(records.into_iter().map(Value::Object).collect())
    }

    #[test]
    fn test_build_single_chain() {
        let data = records(json!([{"id": 1, "pid": 0}, {"id": 2, "pid": 1}]));
        let tree = TreeBuilder::default().build(&data).unwrap();
        assert_eq!(
            to_value(tree),
            json!([{"id": 1, "pid": 0, "children": [{"id": 2, "pid": 1, "children": []}]}])
        );
    }

    #[test]
    fn test_build_from_inner_parent() {
        let data = records(json!([
            {"id": 1, "pid": 0},
            {"id": 2, "pid": 1},
            {"id": 3, "pid": 2}
        ]));
        let options = BuildOptions {
            parent_id: 1,
            ..Default::default()
        };
        let tree = build_tree(&data, &options).unwrap();
        assert_eq!(
            to_value(tree),
            json!([{"id": 2, "pid": 1, "children": [{"id": 3, "pid": 2, "children": []}]}])
        );
    }

    #[test]
    fn test_self_reference_at_start_is_cycle() {
        let data = records(json!([{"id": 0, "pid": 0}]));
        let err = TreeBuilder::default().build(&data).unwrap_err();
        assert_eq!(err, DomainError::CycleDetected { id: 0 });
    }

    #[test]
    fn test_depth_limit_is_enforced() {
        let data = records(json!([
            {"id": 1, "pid": 0},
            {"id": 2, "pid": 1},
            {"id": 3, "pid": 2}
        ]));
        let options = BuildOptions {
            max_depth: 2,
            ..Default::default()
        };
        let err = build_tree(&data, &options).unwrap_err();
        assert_eq!(err, DomainError::DepthExceeded { id: 3, limit: 2 });

        let options = BuildOptions {
            max_depth: 3,
            ..Default::default()
        };
        assert!(build_tree(&data, &options).is_ok());
    }

    #[test]
    fn test_empty_input_builds_empty_tree() {
        let tree = TreeBuilder::default().build(&[]).unwrap();
        assert!(tree.is_empty());
    }
}
