//! Parent-reference index over a flat record sequence.
//!
//! Validates every record once and groups record positions by parent id so
//! traversals need no rescans. Positions inside a group keep input order.
//! Every parent chain must end at the root sentinel, so cyclic references are
//! rejected even where no traversal would reach them.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use tracing::{instrument, trace};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::record::{read_id, Record, RecordId};

#[derive(Debug)]
pub struct ParentLinks<'a> {
    records: &'a [Record],
    ids: Vec<RecordId>,
    children: HashMap<RecordId, Vec<usize>>,
}

impl<'a> ParentLinks<'a> {
    /// Index `records` by their parent field.
    ///
    /// Fails with `InvalidRecord` for a missing or non-integer id/parent field,
    /// with `DanglingParent` if a parent is neither `root_id` nor the id of
    /// a record in the sequence, and with `CycleDetected` if a parent chain
    /// returns to an id before reaching `root_id`.
    #[instrument(level = "debug", skip(records), fields(len = records.len()))]
    pub fn new(
        records: &'a [Record],
        id_field: &str,
        parent_field: &str,
        root_id: RecordId,
    ) -> DomainResult<Self> {
        let mut ids = Vec::with_capacity(records.len());
        let mut parents = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            ids.push(read_id(record, index, id_field)?);
            parents.push(read_id(record, index, parent_field)?);
        }

        let known: HashSet<RecordId> = ids.iter().copied().collect();
        if let Some((&id, &parent)) = ids
            .iter()
            .zip(parents.iter())
            .find(|&(_, &parent)| parent != root_id && !known.contains(&parent))
        {
            return Err(DomainError::DanglingParent { id, parent });
        }

        if let Some(id) = find_cycle(&ids, &parents, root_id) {
            return Err(DomainError::CycleDetected { id });
        }

        let children = parents
            .iter()
            .copied()
            .enumerate()
            .map(|(index, parent)| (parent, index))
            .into_group_map();
        trace!("indexed {} parent groups", children.len());

        Ok(Self {
            records,
            ids,
            children,
        })
    }

    /// Positions of records referencing `parent`, in input order.
    pub fn children_of(&self, parent: RecordId) -> &[usize] {
        self.children
            .get(&parent)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn id_at(&self, index: usize) -> RecordId {
        self.ids[index]
    }

    pub fn record_at(&self, index: usize) -> &'a Record {
        &self.records[index]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    OnPath,
    Settled,
}

/// Walks every parent chain up to `root_id` with an explicit stack. Ids whose
/// chains are known to end at the root are settled and never walked again.
/// Duplicate ids contribute all their parents.
fn find_cycle(ids: &[RecordId], parents: &[RecordId], root_id: RecordId) -> Option<RecordId> {
    let parents_of = ids
        .iter()
        .copied()
        .zip(parents.iter().copied())
        .into_group_map();
    let mut marks: HashMap<RecordId, Mark> = HashMap::with_capacity(parents_of.len());

    for &start in ids {
        if marks.contains_key(&start) {
            continue;
        }
        marks.insert(start, Mark::OnPath);
        let mut stack = vec![(start, 0usize)];

        while let Some(top) = stack.last_mut() {
            let (id, next) = *top;
            let pending = parents_of.get(&id).and_then(|up| up.get(next)).copied();
            let Some(parent) = pending else {
                marks.insert(id, Mark::Settled);
                stack.pop();
                continue;
            };
            top.1 += 1;
            if parent == root_id {
                continue;
            }
            match marks.get(&parent) {
                Some(Mark::OnPath) => return Some(parent),
                Some(Mark::Settled) => {}
                None => {
                    marks.insert(parent, Mark::OnPath);
                    stack.push((parent, 0));
                }
            }
        }
    }
    None
}
