//! Kuzu bulk-load script (`import.cypher`).
//!
//! The script is static: one `COPY` per output file the transformer knows
//! about, node tables before relation tables. It is meant to run after the
//! schema (`schema.cypher`) has been created.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, TransformError};
use crate::indicators::{INDICATOR_FILE_STEM, INDICATOR_LINK_CATEGORY};
use crate::nodes::NodeKind;

pub const IMPORT_SCRIPT_FILE: &str = "import.cypher";

/// Relation tables in load order.
pub const RELATION_TABLES: &[&str] = &[
    "EST_LIE_AU_CONTRAT",
    "EST_COUVERT_PAR_QA",
    "A_VERSION_SUIVANTE",
    "QA_A_VERSION_SUIVANTE",
    "EST_SOUS_TRAITANT_DE",
    "A_ETE_AUDITE_PAR",
    "A_ETE_INSPECTE_PAR",
    "GENERE_FINDING",
    "INSPECTION_GENERE_FINDING",
    "QE_CONCERNE_ST",
    "SURVENU_DANS_ETUDE",
    "DECISION_JUSTIFIEE_PAR_AUDIT",
    "DECISION_JUSTIFIEE_PAR_QE",
    "DECISION_JUSTIFIEE_PAR_INSPECTION",
    "DECISION_JUSTIFIEE_PAR_FINDING",
    "RESULTE_DE_EVALUATION",
    "A_POUR_CONTEXTE",
    "POSSEDE_SERVICE",
    "A_FAIT_OBJET_EVALUATION",
    "A_ETE_SUIVI_PAR",
    "QE_DECLENCHE_ALERTE",
    "AUDIT_DECLENCHE_ALERTE",
    "CAUSE_EVENEMENT",
    "EVT_CONCERNE_ST",
    "IMPLIQUE_ST",
    INDICATOR_LINK_CATEGORY,
];

const HEADER: &str = "\
-- ============================================================================
-- SCRIPT D'IMPORT KUZU
-- Exécuter après avoir créé le schéma (schema.cypher)
-- ============================================================================
";

fn copy_statement(table: &str, dir: &str) -> String {
    format!("COPY {table} FROM \"{dir}/{table}.csv\" (HEADER=true);\n")
}

pub fn render_import_script() -> String {
    let mut script = String::from(HEADER);

    script.push_str("\n-- Import des nœuds\n");
    for kind in NodeKind::ALL {
        script.push_str(&copy_statement(kind.file_stem(), "nodes"));
    }
    script.push_str(&copy_statement(INDICATOR_FILE_STEM, "nodes"));

    script.push_str("\n-- Import des relations\n");
    for table in RELATION_TABLES {
        script.push_str(&copy_statement(table, "relations"));
    }
    script
}

/// Write `import.cypher` into `out_dir`.
pub fn write_import_script(out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join(IMPORT_SCRIPT_FILE);
    fs::write(&path, render_import_script()).map_err(|e| TransformError::io(&path, e))?;
    tracing::info!(path = %path.display(), "wrote import script");
    Ok(path)
}
