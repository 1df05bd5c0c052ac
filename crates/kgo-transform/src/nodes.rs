//! Node kinds and their projections.
//!
//! Every row of `nodes.csv` declares one of a closed set of node kinds
//! (`Type_Noeud`). Each kind owns a pure projection that picks a fixed list of
//! row fields and payload keys, so all records of one kind share the same
//! columns whatever their payload holds.

use serde::Deserialize;

use crate::payload::Payload;
use crate::record::Record;

/// Sentinel used in `Criticite` for "not applicable".
pub const CRITICALITY_NOT_APPLICABLE: &str = "-";

/// One row of `nodes.csv`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NodeRow {
    #[serde(rename = "ID_Noeud")]
    pub id: String,
    #[serde(rename = "Nom_Description")]
    pub name: String,
    #[serde(rename = "Type_Noeud")]
    pub node_type: String,
    #[serde(rename = "Statut")]
    pub status: String,
    #[serde(rename = "Criticite")]
    pub criticality: String,
    #[serde(rename = "Date_Creation")]
    pub created: String,
    #[serde(rename = "Date_Fin", default)]
    pub ended: String,
    #[serde(rename = "Attributs_JSON")]
    pub payload: String,
    #[serde(rename = "Source_Donnees")]
    pub data_source: String,
}

impl NodeRow {
    /// `Criticite` with the not-applicable sentinel normalized to empty.
    pub fn criticality(&self) -> &str {
        normalize_criticality(&self.criticality)
    }
}

pub fn normalize_criticality(raw: &str) -> &str {
    if raw == CRITICALITY_NOT_APPLICABLE {
        ""
    } else {
        raw
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Subcontractor,
    Contract,
    QualityAgreement,
    Audit,
    Inspection,
    Finding,
    QualityEvent,
    Decision,
    RiskAssessment,
    QualityMeeting,
    ClinicalStudy,
    ServiceDomain,
    RegulatoryContext,
    Alert,
    Event,
}

/// A pure per-kind projection.
pub type Projector = fn(&NodeRow, &Payload) -> Record;

impl NodeKind {
    /// All kinds, in import-script order.
    pub const ALL: [NodeKind; 15] = [
        NodeKind::Subcontractor,
        NodeKind::Contract,
        NodeKind::QualityAgreement,
        NodeKind::Audit,
        NodeKind::Inspection,
        NodeKind::Finding,
        NodeKind::QualityEvent,
        NodeKind::Decision,
        NodeKind::RiskAssessment,
        NodeKind::QualityMeeting,
        NodeKind::ClinicalStudy,
        NodeKind::ServiceDomain,
        NodeKind::RegulatoryContext,
        NodeKind::Alert,
        NodeKind::Event,
    ];

    /// The `Type_Noeud` label as it appears in the extract.
    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Subcontractor => "Sous-Traitant",
            NodeKind::Contract => "Contrat",
            NodeKind::QualityAgreement => "Accord Qualité",
            NodeKind::Audit => "Audit",
            NodeKind::Inspection => "Inspection",
            NodeKind::Finding => "Finding",
            NodeKind::QualityEvent => "Événement Qualité",
            NodeKind::Decision => "Décision",
            NodeKind::RiskAssessment => "Évaluation Risque",
            NodeKind::QualityMeeting => "Réunion Qualité",
            NodeKind::ClinicalStudy => "Étude Clinique",
            NodeKind::ServiceDomain => "Domaine de Service",
            NodeKind::RegulatoryContext => "Contexte Réglementaire",
            NodeKind::Alert => "Alerte",
            NodeKind::Event => "Événement",
        }
    }

    /// Machine-safe file stem, also the Kuzu node table name.
    pub fn file_stem(self) -> &'static str {
        match self {
            NodeKind::Subcontractor => "SousTraitant",
            NodeKind::Contract => "Contrat",
            NodeKind::QualityAgreement => "AccordQualite",
            NodeKind::Audit => "Audit",
            NodeKind::Inspection => "Inspection",
            NodeKind::Finding => "Finding",
            NodeKind::QualityEvent => "EvenementQualite",
            NodeKind::Decision => "Decision",
            NodeKind::RiskAssessment => "EvaluationRisque",
            NodeKind::QualityMeeting => "ReunionQualite",
            NodeKind::ClinicalStudy => "EtudeClinique",
            NodeKind::ServiceDomain => "DomaineService",
            NodeKind::RegulatoryContext => "ContexteReglementaire",
            NodeKind::Alert => "Alerte",
            NodeKind::Event => "Evenement",
        }
    }

    pub fn from_label(label: &str) -> Option<NodeKind> {
        NodeKind::ALL.into_iter().find(|kind| kind.label() == label)
    }

    pub fn projector(self) -> Projector {
        match self {
            NodeKind::Subcontractor => project_subcontractor,
            NodeKind::Contract => project_contract,
            NodeKind::QualityAgreement => project_quality_agreement,
            NodeKind::Audit => project_audit,
            NodeKind::Inspection => project_inspection,
            NodeKind::Finding => project_finding,
            NodeKind::QualityEvent => project_quality_event,
            NodeKind::Decision => project_decision,
            NodeKind::RiskAssessment => project_risk_assessment,
            NodeKind::QualityMeeting => project_quality_meeting,
            NodeKind::ClinicalStudy => project_clinical_study,
            NodeKind::ServiceDomain => project_service_domain,
            NodeKind::RegulatoryContext => project_regulatory_context,
            NodeKind::Alert => project_alert,
            NodeKind::Event => project_event,
        }
    }

    pub fn project(self, row: &NodeRow, payload: &Payload) -> Record {
        (self.projector())(row, payload)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// File stem for a node-type label: the fixed stem for known kinds, the
/// label with whitespace stripped otherwise.
pub fn file_stem_for_label(label: &str) -> String {
    match NodeKind::from_label(label) {
        Some(kind) => kind.file_stem().to_string(),
        None => label.chars().filter(|c| !c.is_whitespace()).collect(),
    }
}

/// Classify a node row and project it. `None` for labels outside the known
/// set; the caller decides how to report those.
pub fn classify_node(row: &NodeRow, payload: &Payload) -> Option<(NodeKind, Record)> {
    let kind = NodeKind::from_label(&row.node_type)?;
    Some((kind, kind.project(row, payload)))
}

// ============================================================================
// Projections
// ============================================================================

/// `id`, the name column under `name_column`, `statut`.
fn head(row: &NodeRow, name_column: &str, capacity: usize) -> Record {
    Record::with_capacity(capacity)
        .with("id", row.id.as_str())
        .with(name_column, row.name.as_str())
        .with("statut", row.status.as_str())
}

fn project_subcontractor(row: &NodeRow, p: &Payload) -> Record {
    head(row, "nom", 9)
        .with("criticite", row.criticality())
        .with("date_creation", row.created.as_str())
        .with("type_service", p.text("type_service", ""))
        .with("pays", p.text("pays", ""))
        .with("niveau_actuel", p.text("niveau_actuel", "1"))
        .with("source_donnees", row.data_source.as_str())
}

fn project_contract(row: &NodeRow, p: &Payload) -> Record {
    head(row, "nom", 9)
        .with("date_debut", row.created.as_str())
        .with("date_fin", row.ended.as_str())
        .with("type_contrat", p.text("type", ""))
        .with("montant_annuel", p.text("montant_annuel", ""))
        .with("version", p.text("version", ""))
        .with("source_donnees", row.data_source.as_str())
}

fn project_quality_agreement(row: &NodeRow, p: &Payload) -> Record {
    head(row, "nom", 8)
        .with("date_debut", row.created.as_str())
        .with("date_fin", row.ended.as_str())
        .with("version", p.text("version", ""))
        .with("revision_en_cours", p.flag("revision_en_cours"))
        .with("source_donnees", row.data_source.as_str())
}

fn project_audit(row: &NodeRow, p: &Payload) -> Record {
    head(row, "nom", 10)
        .with("criticite", row.criticality())
        .with("date_debut", row.created.as_str())
        .with("date_fin", row.ended.as_str())
        .with("type_audit", p.text("type", ""))
        .with("resultat", p.text("resultat", ""))
        .with("declencheur", p.text("declencheur", ""))
        .with("source_donnees", row.data_source.as_str())
}

fn project_inspection(row: &NodeRow, p: &Payload) -> Record {
    head(row, "nom", 12)
        .with("criticite", row.criticality())
        .with("date_debut", row.created.as_str())
        .with("date_fin", row.ended.as_str())
        .with("autorite", p.text("autorite", ""))
        .with("type_inspection", p.text("type", ""))
        .with("resultat", p.text("resultat", ""))
        .with("nb_observations", p.text("nb_observations", ""))
        .with("nb_critiques", p.text("nb_critiques", ""))
        .with("source_donnees", row.data_source.as_str())
}

fn project_finding(row: &NodeRow, p: &Payload) -> Record {
    head(row, "description", 9)
        .with("criticite", row.criticality())
        .with("date_detection", row.created.as_str())
        .with("date_cloture", row.ended.as_str())
        .with("capa_id", p.text("capa", ""))
        .with("concerne_st2", p.text("concerne_st2", ""))
        .with("source_donnees", row.data_source.as_str())
}

fn project_quality_event(row: &NodeRow, p: &Payload) -> Record {
    head(row, "description", 12)
        .with("criticite", row.criticality())
        .with("date_creation", row.created.as_str())
        .with("date_cloture", row.ended.as_str())
        .with("impact", p.text("impact", ""))
        .with("nb_echantillons_impactes", p.text("nb_echantillons_impactes", ""))
        .with("retard_jours", p.text("retard_jours", ""))
        .with("nb_erreurs", p.text("nb_erreurs", ""))
        .with("delai_detection_mois", p.text("delai_detection_mois", ""))
        .with("source_donnees", row.data_source.as_str())
}

fn project_decision(row: &NodeRow, p: &Payload) -> Record {
    head(row, "description", 9)
        .with("criticite", row.criticality())
        .with("date_decision", row.created.as_str())
        .with("decideur", p.text("decideur", ""))
        .with("nature", p.text("nature", ""))
        .with("duree_mois", p.text("duree_mois", ""))
        .with("source_donnees", row.data_source.as_str())
}

fn project_risk_assessment(row: &NodeRow, p: &Payload) -> Record {
    let criteria = p.nested("criteres");
    head(row, "description", 14)
        .with("criticite", row.criticality())
        .with("date_evaluation", row.created.as_str())
        .with("score", p.text("score", ""))
        .with("evolution", p.text("evolution", ""))
        .with("findings_critiques", criteria.text("findings_critiques", ""))
        .with("qe_critiques", criteria.text("qe_critiques", ""))
        .with("kqi_alertes", criteria.text("kqi_alertes", ""))
        .with("inspection_recente", criteria.flag("inspection_recente"))
        .with("audit_for_cause", criteria.flag("audit_for_cause"))
        .with("prochaine_evaluation", p.text("prochaine", ""))
        .with("source_donnees", row.data_source.as_str())
}

fn project_quality_meeting(row: &NodeRow, p: &Payload) -> Record {
    head(row, "nom", 10)
        .with("criticite", row.criticality())
        .with("date_reunion", row.created.as_str())
        .with("trimestre", p.text("trimestre", ""))
        .with("semestre", p.text("semestre", ""))
        .with("periodicite", p.text("periodicite", ""))
        .with("motif", p.text("motif", ""))
        .with("source_donnees", row.data_source.as_str())
}

fn project_clinical_study(row: &NodeRow, p: &Payload) -> Record {
    head(row, "nom", 10)
        .with("criticite", row.criticality())
        .with("date_debut", row.created.as_str())
        .with("date_fin", row.ended.as_str())
        .with("phase", p.text("phase", ""))
        .with("indication", p.text("indication", ""))
        .with("nb_patients", p.text("nb_patients", ""))
        .with("source_donnees", row.data_source.as_str())
}

fn project_service_domain(row: &NodeRow, p: &Payload) -> Record {
    head(row, "nom", 8)
        .with("criticite", row.criticality())
        .with("date_creation", row.created.as_str())
        .with("categorie", p.text("categorie", ""))
        .with("complexite", p.text("complexite", ""))
        .with("source_donnees", row.data_source.as_str())
}

fn project_regulatory_context(row: &NodeRow, p: &Payload) -> Record {
    head(row, "nom", 8)
        .with("criticite", row.criticality())
        .with("date_application", row.created.as_str())
        .with("reference", p.text("reference", ""))
        .with("impact", p.text("impact", ""))
        .with("source_donnees", row.data_source.as_str())
}

fn project_alert(row: &NodeRow, p: &Payload) -> Record {
    head(row, "description", 11)
        .with("criticite", row.criticality())
        .with("date_creation", row.created.as_str())
        .with("date_resolution", row.ended.as_str())
        .with("niveau", p.text("niveau", ""))
        .with("regle_id", p.text("regle", ""))
        .with("declencheur", p.text("declencheur", ""))
        .with("st_concerne", p.text("st_concerne", ""))
        .with("source_donnees", row.data_source.as_str())
}

// The source systems name the originator and impact fields differently;
// candidates are tried in this order.
const EVENT_SOURCE_KEYS: &[&str] = &["source", "demandeur", "client"];
const EVENT_IMPACT_KEYS: &[&str] = &["impact", "contexte"];

fn project_event(row: &NodeRow, p: &Payload) -> Record {
    head(row, "description", 10)
        .with("criticite", row.criticality())
        .with("date_creation", row.created.as_str())
        .with("date_cloture", row.ended.as_str())
        .with("type_evenement", p.text("type", ""))
        .with("source", p.text_or_else(EVENT_SOURCE_KEYS, ""))
        .with("impact", p.text_or_else(EVENT_IMPACT_KEYS, ""))
        .with("source_donnees", row.data_source.as_str())
}
