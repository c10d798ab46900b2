//! Domain layer: record shapes and the conversions between them
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod assembler;
pub mod builder;
pub mod error;
pub mod flattener;
pub mod leveler;
pub mod links;
pub mod record;
pub mod render;

pub use arena::{ArenaNode, RecordArena};
pub use assembler::{assemble, CartesianAssembler, FillMode};
pub use builder::{build_tree, BuildOptions, TreeBuilder};
pub use error::{DomainError, DomainResult};
pub use flattener::{flatten_tree, FlattenOptions, IdSequence, TreeFlattener};
pub use leveler::{level_records, DepthFirstLeveler, LevelOptions};
pub use links::ParentLinks;
pub use record::{Record, RecordId, ROOT_ID};
pub use render::TreeNodeConvert;
