//! Grouped CSV output.
//!
//! Records are collected per category and each non-empty group becomes one
//! CSV file. The header is taken from the first record of the group; later
//! records are laid out along it, with absent columns written empty.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, TransformError};
use crate::record::Record;

/// Records grouped by category, groups kept in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct RecordGroups {
    groups: Vec<(String, Vec<Record>)>,
    index: HashMap<String, usize>,
}

impl RecordGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, category: impl Into<String>, record: Record) {
        let category = category.into();
        match self.index.get(&category) {
            Some(&i) => self.groups[i].1.push(record),
            None => {
                self.index.insert(category.clone(), self.groups.len());
                self.groups.push((category, vec![record]));
            }
        }
    }

    pub fn get(&self, category: &str) -> Option<&[Record]> {
        self.index
            .get(category)
            .map(|&i| self.groups[i].1.as_slice())
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(c, _)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.groups.iter().map(|(c, r)| (c.as_str(), r.as_slice()))
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total records across all groups.
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|(_, r)| r.len()).sum()
    }
}

/// A file produced by the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub records: usize,
}

/// Write one CSV file per non-empty group into `dir`, named
/// `<stem(category)>.csv`.
pub fn write_groups<F>(dir: &Path, groups: &RecordGroups, stem: F) -> Result<Vec<WrittenFile>>
where
    F: Fn(&str) -> String,
{
    let mut written = Vec::with_capacity(groups.len());
    for (category, records) in groups.iter() {
        let path = dir.join(format!("{}.csv", stem(category)));
        if let Some(file) = write_records(&path, records)? {
            written.push(file);
        }
    }
    Ok(written)
}

/// Write `records` to `path`. Returns `None` without touching the
/// filesystem when there is nothing to write.
pub fn write_records(path: &Path, records: &[Record]) -> Result<Option<WrittenFile>> {
    let Some(first) = records.first() else {
        return Ok(None);
    };
    let header: Vec<String> = first.columns().map(str::to_string).collect();

    let mut writer = csv::Writer::from_path(path).map_err(|e| TransformError::csv(path, e))?;
    writer
        .write_record(&header)
        .map_err(|e| TransformError::csv(path, e))?;

    for record in records {
        if let Some(extra) = record.columns().find(|c| !header.iter().any(|h| h.as_str() == *c)) {
            tracing::warn!(
                path = %path.display(),
                column = extra,
                "record has a column missing from the header; dropping it"
            );
        }
        writer
            .write_record(record.cells_for(&header))
            .map_err(|e| TransformError::csv(path, e))?;
    }
    writer.flush().map_err(|e| TransformError::io(path, e))?;

    tracing::info!(path = %path.display(), records = records.len(), "wrote group");
    Ok(Some(WrittenFile {
        path: path.to_path_buf(),
        records: records.len(),
    }))
}
