use std::path::{Path, PathBuf};

pub const NODES_DIR: &str = "nodes";
pub const RELATIONS_DIR: &str = "relations";

/// Input extracts and output root of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformConfig {
    pub nodes_csv: PathBuf,
    pub relations_csv: PathBuf,
    pub kqi_csv: PathBuf,
    pub out_dir: PathBuf,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            nodes_csv: PathBuf::from("data/nodes.csv"),
            relations_csv: PathBuf::from("data/relations.csv"),
            kqi_csv: PathBuf::from("data/kqi.csv"),
            out_dir: PathBuf::from("kuzu_data"),
        }
    }
}

impl TransformConfig {
    /// Standard file names (`nodes.csv`, `relations.csv`, `kqi.csv`) under
    /// `input_dir`, writing to `out_dir`.
    pub fn from_dirs(input_dir: impl AsRef<Path>, out_dir: impl Into<PathBuf>) -> Self {
        let input_dir = input_dir.as_ref();
        Self {
            nodes_csv: input_dir.join("nodes.csv"),
            relations_csv: input_dir.join("relations.csv"),
            kqi_csv: input_dir.join("kqi.csv"),
            out_dir: out_dir.into(),
        }
    }

    pub fn nodes_dir(&self) -> PathBuf {
        self.out_dir.join(NODES_DIR)
    }

    pub fn relations_dir(&self) -> PathBuf {
        self.out_dir.join(RELATIONS_DIR)
    }
}
