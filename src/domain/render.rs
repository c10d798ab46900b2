use std::collections::HashMap;

use generational_arena::Index;
use serde_json::Value;
use termtree::Tree;

use crate::domain::arena::{ArenaNode, RecordArena};

pub trait TreeNodeConvert {
    /// Render as a terminal tree, labelling nodes with `label_field`
    /// (falling back to `#<id>`).
    fn to_tree_string(&self, root_label: &str, label_field: &str) -> Tree<String>;
}

impl TreeNodeConvert for RecordArena {
    fn to_tree_string(&self, root_label: &str, label_field: &str) -> Tree<String> {
        let mut done: HashMap<Index, Tree<String>> = HashMap::with_capacity(self.len());
        for idx in self.post_order() {
            if let Some(node) = self.get_node(idx) {
                let leaves: Vec<_> = node
                    .children
                    .iter()
                    .filter_map(|child| done.remove(child))
                    .collect();
                done.insert(idx, Tree::new(node_label(node, label_field)).with_leaves(leaves));
            }
        }

        let leaves: Vec<_> = self
            .roots()
            .iter()
            .filter_map(|root| done.remove(root))
            .collect();
        Tree::new(root_label.to_string()).with_leaves(leaves)
    }
}

fn node_label(node: &ArenaNode, label_field: &str) -> String {
    match node.record.get(label_field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => format!("#{}", node.id),
        Some(other) => other.to_string(),
    }
}
