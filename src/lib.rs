//! Structural conversions between three shapes of hierarchical data:
//!
//! - form records of parallel sequences ([`domain::assembler`])
//! - flat records linked by parent references
//! - nested trees with an embedded child sequence
//!
//! ```text
//! form  --assemble-->  rows
//! flat  --build----->  tree  --flatten-->  flat
//! flat  --level----->  flat (depth-first, with level + indentation)
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{
    assemble, build_tree, flatten_tree, level_records, BuildOptions, CartesianAssembler,
    DepthFirstLeveler, DomainError, DomainResult, FillMode, FlattenOptions, LevelOptions, Record,
    RecordId, TreeBuilder, TreeFlattener,
};
