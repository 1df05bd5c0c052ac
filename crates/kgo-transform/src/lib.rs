//! KG-Oversight: Kuzu import layout
//!
//! Re-shapes three flat extracts of the supplier-oversight knowledge graph
//! into one CSV per node kind and per relation category, plus the matching
//! `import.cypher` bulk-load script:
//!
//! ```text
//!   nodes.csv ──► NodeKind::from_label ──► projector ──┐
//!                                                       ├──► RecordGroups ──► nodes/<Stem>.csv
//!   kqi.csv ────► Indicator ──► derive_links ───────────┤    relations/<CATEGORY>.csv
//!                                                       │    import.cypher
//!   relations.csv ──► resolve_category ──► extras ──────┘
//! ```
//!
//! ## Module Organization
//!
//! - `payload`: best-effort JSON payload parsing and defaulted accessors
//! - `nodes`: closed set of node kinds and their per-kind projections
//! - `relations`: ordered disambiguation rules and relation projections
//! - `indicators`: KQI renaming and the deduplicated KQI → subcontractor links
//! - `writer`: grouped CSV output (header from the first record)
//! - `import_script`: the fixed Kuzu `COPY` script
//! - `pipeline`: read → classify → group → write, one entry point per table

pub mod config;
pub mod error;
pub mod import_script;
pub mod indicators;
pub mod nodes;
pub mod payload;
pub mod pipeline;
pub mod record;
pub mod relations;
pub mod writer;

pub use config::TransformConfig;
pub use error::{Result, TransformError};
pub use indicators::{derive_links, Indicator, IndicatorLink, KqiRow};
pub use nodes::{classify_node, NodeKind, NodeRow};
pub use payload::Payload;
pub use pipeline::{
    group_nodes, group_relations, process_indicators, process_nodes, process_relations, run,
    NodeGroups, NodeSummary, SkippedNode, TransformReport,
};
pub use record::Record;
pub use relations::{classify_relation, resolve_category, RelationRow};
pub use writer::{write_groups, write_records, RecordGroups, WrittenFile};
