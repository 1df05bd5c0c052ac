//! Read → classify → group → write.
//!
//! One entry point per input table, each independent of the others apart
//! from the shared output directory. The grouping halves (`group_nodes`,
//! `group_relations`) do no I/O.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::config::TransformConfig;
use crate::error::{Result, TransformError};
use crate::import_script::write_import_script;
use crate::indicators::{
    derive_links, Indicator, KqiRow, INDICATOR_FILE_STEM, INDICATOR_LINK_CATEGORY,
};
use crate::nodes::{classify_node, file_stem_for_label, NodeRow};
use crate::payload::Payload;
use crate::relations::{classify_relation, RelationRow};
use crate::record::Record;
use crate::writer::{write_groups, write_records, RecordGroups, WrittenFile};

/// A node row whose `Type_Noeud` is outside the known set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedNode {
    pub id: String,
    pub node_type: String,
}

/// Node records grouped by node-type label.
#[derive(Debug, Clone, Default)]
pub struct NodeGroups {
    pub groups: RecordGroups,
    pub skipped: Vec<SkippedNode>,
}

#[derive(Debug, Clone, Default)]
pub struct NodeSummary {
    pub files: Vec<WrittenFile>,
    pub skipped: Vec<SkippedNode>,
}

#[derive(Debug, Clone)]
pub struct TransformReport {
    pub nodes: NodeSummary,
    pub relations: Vec<WrittenFile>,
    pub indicators: Vec<WrittenFile>,
    pub import_script: PathBuf,
}

/// Rows shorter than the header are padded with empty cells and longer ones
/// are cut to the header, so a ragged extract still deserializes.
fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| TransformError::csv(path, e))?;
    let headers = reader
        .headers()
        .map_err(|e| TransformError::csv(path, e))?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let mut record = record.map_err(|e| TransformError::csv(path, e))?;
        if record.len() != headers.len() {
            tracing::debug!(
                path = %path.display(),
                fields = record.len(),
                expected = headers.len(),
                "ragged row; aligning to header"
            );
            while record.len() < headers.len() {
                record.push_field("");
            }
            record.truncate(headers.len());
        }
        let row: T = record
            .deserialize(Some(&headers))
            .map_err(|e| TransformError::csv(path, e))?;
        rows.push(row);
    }
    Ok(rows)
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| TransformError::io(dir, e))
}

pub fn group_nodes<I>(rows: I) -> NodeGroups
where
    I: IntoIterator<Item = NodeRow>,
{
    let mut out = NodeGroups::default();
    for row in rows {
        let payload = Payload::parse(&row.payload);
        match classify_node(&row, &payload) {
            Some((kind, record)) => out.groups.push(kind.label(), record),
            None => {
                tracing::warn!(
                    id = %row.id,
                    node_type = %row.node_type,
                    "unknown node type; skipping row"
                );
                out.skipped.push(SkippedNode {
                    id: row.id,
                    node_type: row.node_type,
                });
            }
        }
    }
    out
}

pub fn group_relations<I>(rows: I) -> RecordGroups
where
    I: IntoIterator<Item = RelationRow>,
{
    let mut groups = RecordGroups::new();
    for row in rows {
        let payload = Payload::parse(&row.payload);
        let (category, record) = classify_relation(&row, &payload);
        groups.push(category, record);
    }
    groups
}

/// `nodes.csv` → `nodes/<Stem>.csv`, one file per node kind present.
pub fn process_nodes(config: &TransformConfig) -> Result<NodeSummary> {
    let rows: Vec<NodeRow> = read_rows(&config.nodes_csv)?;
    tracing::debug!(rows = rows.len(), path = %config.nodes_csv.display(), "read node rows");

    let NodeGroups { groups, skipped } = group_nodes(rows);
    let dir = config.nodes_dir();
    ensure_dir(&dir)?;
    let files = write_groups(&dir, &groups, file_stem_for_label)?;
    Ok(NodeSummary { files, skipped })
}

/// `relations.csv` → `relations/<CATEGORY>.csv`, one file per resolved category.
pub fn process_relations(config: &TransformConfig) -> Result<Vec<WrittenFile>> {
    let rows: Vec<RelationRow> = read_rows(&config.relations_csv)?;
    tracing::debug!(
        rows = rows.len(),
        path = %config.relations_csv.display(),
        "read relation rows"
    );

    let groups = group_relations(rows);
    let dir = config.relations_dir();
    ensure_dir(&dir)?;
    write_groups(&dir, &groups, str::to_string)
}

/// `kqi.csv` → `nodes/KQI.csv` and `relations/KQI_MESURE_ST.csv`.
pub fn process_indicators(config: &TransformConfig) -> Result<Vec<WrittenFile>> {
    let rows: Vec<KqiRow> = read_rows(&config.kqi_csv)?;
    let indicators: Vec<Indicator> = rows.into_iter().map(Indicator::from).collect();
    let links = derive_links(&indicators);

    let nodes_dir = config.nodes_dir();
    let relations_dir = config.relations_dir();
    ensure_dir(&nodes_dir)?;
    ensure_dir(&relations_dir)?;

    let records: Vec<Record> = indicators.iter().map(Indicator::to_record).collect();
    let link_records: Vec<Record> = links.iter().map(|l| l.to_record()).collect();

    let mut written = Vec::with_capacity(2);
    let targets = [
        (nodes_dir.join(format!("{INDICATOR_FILE_STEM}.csv")), records),
        (relations_dir.join(format!("{INDICATOR_LINK_CATEGORY}.csv")), link_records),
    ];
    for (path, records) in targets {
        if let Some(file) = write_records(&path, &records)? {
            written.push(file);
        }
    }
    Ok(written)
}

/// Full run: all three tables, then `import.cypher`.
pub fn run(config: &TransformConfig) -> Result<TransformReport> {
    ensure_dir(&config.nodes_dir())?;
    ensure_dir(&config.relations_dir())?;

    let nodes = process_nodes(config)?;
    let relations = process_relations(config)?;
    let indicators = process_indicators(config)?;
    let import_script = write_import_script(&config.out_dir)?;

    Ok(TransformReport {
        nodes,
        relations,
        indicators,
        import_script,
    })
}
