use std::collections::HashMap;

use generational_arena::{Arena, Index};
use serde_json::Value;
use tracing::instrument;

use crate::domain::record::{Record, RecordId};

/// Tree node in the arena-based forest.
#[derive(Debug)]
pub struct ArenaNode {
    /// Identity read from the flat record
    pub id: RecordId,
    /// Flat record payload, without child container
    pub record: Record,
    /// Index of parent node in the arena, None for top-level nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in input order
    pub children: Vec<Index>,
}

/// Arena-based forest assembled from a flat record sequence.
///
/// Uses generational arena for stable node references and O(1) lookups.
/// Top-level nodes are kept in `roots` in the order they were inserted.
#[derive(Debug, Default)]
pub struct RecordArena {
    arena: Arena<ArenaNode>,
    roots: Vec<Index>,
}

impl RecordArena {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "trace", skip(self, record))]
    pub fn insert_node(&mut self, id: RecordId, record: Record, parent: Option<Index>) -> Index {
        let node = ArenaNode {
            id,
            record,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.roots.push(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&ArenaNode> {
        self.arena.get(idx)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order iteration over the whole forest.
    pub fn iter(&self) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self)
    }

    /// Number of levels of the deepest branch, 0 for an empty forest.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut stack: Vec<_> = self.roots.iter().map(|&root| (root, 1)).collect();
        let mut deepest = 0;
        while let Some((idx, depth)) = stack.pop() {
            if let Some(node) = self.get_node(idx) {
                deepest = deepest.max(depth);
                stack.extend(node.children.iter().map(|&child| (child, depth + 1)));
            }
        }
        deepest
    }

    /// Node indices with every child before its parent, siblings left to right.
    pub fn post_order(&self) -> Vec<Index> {
        let mut stack = self.roots.clone();
        let mut order = Vec::with_capacity(self.len());
        while let Some(idx) = stack.pop() {
            if let Some(node) = self.get_node(idx) {
                stack.extend(node.children.iter().copied());
                order.push(idx);
            }
        }
        order.reverse();
        order
    }

    /// Ids of all nodes without children, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_ids(&self) -> Vec<RecordId> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.id)
            .collect()
    }

    /// Consumes the arena into nested records, attaching each node's children
    /// under `child_field` (always present, possibly empty).
    #[instrument(level = "debug", skip(self))]
    pub fn into_nested(mut self, child_field: &str) -> Vec<Record> {
        let mut done: HashMap<Index, Record> = HashMap::with_capacity(self.len());
        for idx in self.post_order() {
            let Some(node) = self.arena.remove(idx) else {
                continue;
            };
            let children = node
                .children
                .iter()
                .filter_map(|child| done.remove(child))
                .map(Value::Object)
                .collect();
            let mut record = node.record;
            record.insert(child_field.to_string(), Value::Array(children));
            done.insert(idx, record);
        }
        self.roots
            .iter()
            .filter_map(|root| done.remove(root))
            .collect()
    }
}

pub struct PreOrderIterator<'a> {
    arena: &'a RecordArena,
    stack: Vec<Index>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(arena: &'a RecordArena) -> Self {
        let stack = arena.roots.iter().rev().copied().collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (Index, &'a ArenaNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(id: RecordId) -> Record {
        json!({ "id": id }).as_object().cloned().unwrap()
    }

    //      1       5
    //     / \
    //    2   3
    //        |
    //        4
    fn sample() -> RecordArena {
        let mut arena = RecordArena::new();
        let one = arena.insert_node(1, node(1), None);
        arena.insert_node(2, node(2), Some(one));
        let three = arena.insert_node(3, node(3), Some(one));
        arena.insert_node(4, node(4), Some(three));
        arena.insert_node(5, node(5), None);
        arena
    }

    #[test]
    fn test_preorder_iteration() {
        let arena = sample();
        let ids: Vec<_> = arena.iter().map(|(_, n)| n.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_depth_and_leaves() {
        let arena = sample();
        assert_eq!(arena.depth(), 3);
        assert_eq!(arena.leaf_ids(), vec![2, 4, 5]);
        assert_eq!(arena.len(), 5);
        assert_eq!(RecordArena::new().depth(), 0);
    }

    #[test]
    fn test_post_order_puts_children_first() {
        let arena = sample();
        let ids: Vec<_> = arena
            .post_order()
            .into_iter()
            .filter_map(|idx| arena.get_node(idx))
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec![2, 4, 3, 1, 5]);
    }

    #[test]
    fn test_deep_chain_depth_and_nesting() {
        let mut arena = RecordArena::new();
        let mut parent = None;
        for id in 1..=20_000 {
            parent = Some(arena.insert_node(id, node(id), parent));
        }
        assert_eq!(arena.depth(), 20_000);
        assert_eq!(arena.post_order().len(), 20_000);
        assert_eq!(arena.leaf_ids(), vec![20_000]);
    }

    #[test]
    fn test_into_nested() {
        let arena = sample();
        let nested: Vec<_> = arena
            .into_nested("sub")
            .into_iter()
            .map(Value::Object)
            .collect();
        assert_eq!(
            Value::Array(nested),
            json!([
                {"id": 1, "sub": [
                    {"id": 2, "sub": []},
                    {"id": 3, "sub": [{"id": 4, "sub": []}]}
                ]},
                {"id": 5, "sub": []}
            ])
        );
    }
}
