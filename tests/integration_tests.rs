//! Integration tests for the complete transformation
//!
//! These tests run the pipelines end to end against temporary directories:
//! - extracts on disk → per-type CSVs under `nodes/` and `relations/`
//! - KQI renaming and link deduplication
//! - `import.cypher` emission
//!
//! Run with: cargo test --test integration_tests

use std::fs;
use std::path::Path;

use kgo_transform::{run, TransformConfig, TransformError};
use tempfile::tempdir;

const NODES: &str = "\
ID_Noeud,Nom_Description,Type_Noeud,Statut,Criticite,Date_Creation,Date_Fin,Attributs_JSON,Source_Donnees
ST1,Labo Alpha,Sous-Traitant,Actif,-,2023-01-10,,\"{\"\"pays\"\":\"\"FR\"\"}\",QMS
ST2,Labo Beta,Sous-Traitant,Actif,Haute,2023-02-11,,\"{\"\"pays\"\":\"\"DE\"\",\"\"niveau_actuel\"\":2,\"\"type_service\"\":\"\"Bioanalyse\"\"}\",QMS
X1,Mystère,Fournisseur,Actif,-,2023-03-01,,{},QMS
A1,Audit annuel,Audit,Clos,Moyenne,2024-01-05,2024-01-07,{broken,Audits
EV1,Changement de site,Événement,Ouvert,-,2024-05-01,,\"{\"\"type\"\":\"\"Changement\"\",\"\"client\"\":\"\"Sponsor\"\"}\",QMS
";

const RELATIONS: &str = "\
Noeud_Source,Noeud_Cible,Type_Relation,Type_Noeud_Source,Type_Noeud_Cible,Date_Lien,Validite,Attributs
D1,A1,EST_JUSTIFIE_PAR,Décision,Audit,2024-02-01,,{}
I1,F1,GENERE_FINDING,Inspection,Finding,2024-02-02,Active,{}
A1,F2,GENERE_FINDING,Audit,Finding,2024-02-03,Expirée,{}
ST1,ST2,EST_SOUS_TRAITANT_DE,Sous-Traitant,Sous-Traitant,2023-05-05,,\"{\"\"contexte_etudes\"\":[\"\"ET1\"\",\"\"ET2\"\"]}\"
EV1,ST1,CONCERNE_ST,Événement,Sous-Traitant,2024-05-02,,\"{\"\"impact\"\":\"\"Majeur\"\"}\"
EV2,ST2,CONCERNE_ST,Événement,Sous-Traitant,2024-05-03,,{}
";

const KQI: &str = "\
ID_KQI,ID_SousTraitant,Nom_SousTraitant,Indicateur,Periode,Valeur,Seuil_Alerte,Seuil_Objectif,Statut,Tendance
KQI1,ST1,Labo Alpha,OTD,2024-Q1,95,90,98,OK,Stable
KQI1,ST1,Labo Alpha,OTD,2024-Q2,91,90,98,Alerte,Baisse
KQI2,ST2,Labo Beta,Conformité,2024-Q1,99,95,99,OK,Hausse
";

fn write_inputs(dir: &Path) {
    fs::write(dir.join("nodes.csv"), NODES).expect("write nodes.csv");
    fs::write(dir.join("relations.csv"), RELATIONS).expect("write relations.csv");
    fs::write(dir.join("kqi.csv"), KQI).expect("write kqi.csv");
}

fn read_csv(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .unwrap_or_else(|e| panic!("read {}: {e}", path.display()));
    reader
        .records()
        .map(|r| r.expect("csv record").iter().map(str::to_string).collect())
        .collect()
}

fn column<'a>(rows: &'a [Vec<String>], name: &str) -> Vec<&'a str> {
    let idx = rows[0]
        .iter()
        .position(|c| c == name)
        .unwrap_or_else(|| panic!("no column {name}"));
    rows[1..].iter().map(|r| r[idx].as_str()).collect()
}

#[test]
fn test_full_run_writes_expected_layout() {
    let input = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_inputs(input.path());

    let config = TransformConfig::from_dirs(input.path(), out.path());
    let report = run(&config).expect("run should succeed");

    for rel in [
        "nodes/SousTraitant.csv",
        "nodes/Audit.csv",
        "nodes/Evenement.csv",
        "nodes/KQI.csv",
        "relations/DECISION_JUSTIFIEE_PAR_AUDIT.csv",
        "relations/INSPECTION_GENERE_FINDING.csv",
        "relations/GENERE_FINDING.csv",
        "relations/EST_SOUS_TRAITANT_DE.csv",
        "relations/EVT_CONCERNE_ST.csv",
        "relations/KQI_MESURE_ST.csv",
        "import.cypher",
    ] {
        assert!(out.path().join(rel).exists(), "missing {rel}");
    }
    assert!(!out.path().join("relations/EST_JUSTIFIE_PAR.csv").exists());
    assert!(!out.path().join("nodes/Fournisseur.csv").exists());

    assert_eq!(report.nodes.skipped.len(), 1);
    assert_eq!(report.nodes.skipped[0].node_type, "Fournisseur");
    assert_eq!(report.nodes.files.len(), 3);
    assert_eq!(report.relations.len(), 5);
    assert_eq!(report.indicators.len(), 2);
    assert!(report.import_script.ends_with("import.cypher"));
}

#[test]
fn test_subcontractor_nodes_are_normalized() {
    let input = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_inputs(input.path());
    run(&TransformConfig::from_dirs(input.path(), out.path())).unwrap();

    let rows = read_csv(&out.path().join("nodes/SousTraitant.csv"));
    assert_eq!(
        rows[0],
        vec![
            "id",
            "nom",
            "statut",
            "criticite",
            "date_creation",
            "type_service",
            "pays",
            "niveau_actuel",
            "source_donnees"
        ]
    );
    assert_eq!(
        rows[1],
        vec!["ST1", "Labo Alpha", "Actif", "", "2023-01-10", "", "FR", "1", "QMS"]
    );
    assert_eq!(
        rows[2],
        vec!["ST2", "Labo Beta", "Actif", "Haute", "2023-02-11", "Bioanalyse", "DE", "2", "QMS"]
    );
}

#[test]
fn test_malformed_payload_and_event_fallbacks() {
    let input = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_inputs(input.path());
    run(&TransformConfig::from_dirs(input.path(), out.path())).unwrap();

    let audits = read_csv(&out.path().join("nodes/Audit.csv"));
    assert_eq!(column(&audits, "type_audit"), vec![""]);
    assert_eq!(column(&audits, "criticite"), vec!["Moyenne"]);
    assert_eq!(column(&audits, "date_fin"), vec!["2024-01-07"]);

    let events = read_csv(&out.path().join("nodes/Evenement.csv"));
    assert_eq!(column(&events, "source"), vec!["Sponsor"]);
    assert_eq!(column(&events, "impact"), vec![""]);
}

#[test]
fn test_relation_records_and_extras() {
    let input = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_inputs(input.path());
    run(&TransformConfig::from_dirs(input.path(), out.path())).unwrap();

    let justified = read_csv(&out.path().join("relations/DECISION_JUSTIFIEE_PAR_AUDIT.csv"));
    assert_eq!(
        justified,
        vec![
            vec!["from", "to", "date_lien", "validite"],
            vec!["D1", "A1", "2024-02-01", ""],
        ]
    );

    let generic = read_csv(&out.path().join("relations/GENERE_FINDING.csv"));
    assert_eq!(column(&generic, "validite"), vec!["Expirée"]);

    let sub = read_csv(&out.path().join("relations/EST_SOUS_TRAITANT_DE.csv"));
    assert_eq!(column(&sub, "contexte_etudes"), vec![r#"["ET1","ET2"]"#]);

    let concerns = read_csv(&out.path().join("relations/EVT_CONCERNE_ST.csv"));
    assert_eq!(concerns[0], vec!["from", "to", "date_lien", "validite", "impact"]);
    assert_eq!(column(&concerns, "impact"), vec!["Majeur", ""]);
}

#[test]
fn test_kqi_links_are_deduplicated() {
    let input = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_inputs(input.path());
    run(&TransformConfig::from_dirs(input.path(), out.path())).unwrap();

    let kqi = read_csv(&out.path().join("nodes/KQI.csv"));
    assert_eq!(kqi.len(), 4);
    assert_eq!(column(&kqi, "periode"), vec!["2024-Q1", "2024-Q2", "2024-Q1"]);

    let links = read_csv(&out.path().join("relations/KQI_MESURE_ST.csv"));
    assert_eq!(
        links,
        vec![
            vec!["from", "to", "periode"],
            vec!["KQI1", "ST1", "2024-Q1"],
            vec!["KQI2", "ST2", "2024-Q1"],
        ]
    );
}

#[test]
fn test_every_output_has_uniform_column_count() {
    let input = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_inputs(input.path());
    run(&TransformConfig::from_dirs(input.path(), out.path())).unwrap();

    for sub in ["nodes", "relations"] {
        for entry in fs::read_dir(out.path().join(sub)).unwrap() {
            let path = entry.unwrap().path();
            let rows = read_csv(&path);
            assert!(rows.len() >= 2, "{} has no data rows", path.display());
            assert!(
                rows.iter().all(|r| r.len() == rows[0].len()),
                "ragged rows in {}",
                path.display()
            );
        }
    }
}

#[test]
fn test_missing_input_aborts_run() {
    let input = tempdir().unwrap();
    let out = tempdir().unwrap();
    fs::write(input.path().join("nodes.csv"), NODES).unwrap();

    let err = run(&TransformConfig::from_dirs(input.path(), out.path())).unwrap_err();
    match err {
        TransformError::Csv { path, .. } => assert!(path.ends_with("relations.csv")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_required_column_is_fatal() {
    let input = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_inputs(input.path());
    fs::write(
        input.path().join("kqi.csv"),
        "ID_KQI,ID_SousTraitant\nKQI1,ST1\n",
    )
    .unwrap();

    let err = run(&TransformConfig::from_dirs(input.path(), out.path())).unwrap_err();
    assert!(matches!(err, TransformError::Csv { .. }), "{err}");
}
