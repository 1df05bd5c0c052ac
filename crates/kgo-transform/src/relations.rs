//! Relation categories.
//!
//! A declared relation type (`Type_Relation`) does not always map onto a
//! single Kuzu relation table: Kuzu tables are typed by their endpoints, so a
//! polymorphic relation such as `EST_JUSTIFIE_PAR` is split into one category
//! per endpoint type. Resolution walks [`RELATION_RULES`] top-down (first
//! match wins), then falls back to [`RELATION_TYPE_NAMES`], then to the
//! declared type itself.

use serde::{Deserialize, Deserializer};

use crate::payload::Payload;
use crate::record::Record;

/// Written when the extract has no `Validite` column.
pub const DEFAULT_VALIDITY: &str = "Active";

const QUALITY_EVENT: &str = "Événement Qualité";
const QUALITY_AGREEMENT: &str = "Accord Qualité";

/// One row of `relations.csv`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RelationRow {
    #[serde(rename = "Noeud_Source")]
    pub source: String,
    #[serde(rename = "Noeud_Cible")]
    pub target: String,
    #[serde(rename = "Type_Relation")]
    pub relation_type: String,
    #[serde(rename = "Type_Noeud_Source")]
    pub source_type: String,
    #[serde(rename = "Type_Noeud_Cible")]
    pub target_type: String,
    #[serde(rename = "Date_Lien")]
    pub linked_on: String,
    /// `None` only when the column is absent; an empty cell stays `Some("")`.
    #[serde(rename = "Validite", default, deserialize_with = "present_cell")]
    pub validity: Option<String>,
    #[serde(rename = "Attributs")]
    pub payload: String,
}

impl RelationRow {
    pub fn category(&self) -> String {
        resolve_category(&self.relation_type, &self.source_type, &self.target_type)
    }

    pub fn validity(&self) -> &str {
        self.validity.as_deref().unwrap_or(DEFAULT_VALIDITY)
    }
}

// Only called when the column exists, so an empty cell is kept as `Some("")`
// instead of collapsing to `None` like a plain `Option<String>` would.
fn present_cell<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(Some)
}

/// Endpoint condition of a [`RelationRule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointMatch {
    SourceIs(&'static str),
    TargetIs(&'static str),
    Any,
}

impl EndpointMatch {
    fn matches(self, source_type: &str, target_type: &str) -> bool {
        match self {
            EndpointMatch::SourceIs(label) => source_type == label,
            EndpointMatch::TargetIs(label) => target_type == label,
            EndpointMatch::Any => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryName {
    Fixed(&'static str),
    /// Prefix followed by the literal target node type.
    TargetSuffixed(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationRule {
    pub declared: &'static str,
    pub when: EndpointMatch,
    pub category: CategoryName,
}

const fn rule(declared: &'static str, when: EndpointMatch, category: CategoryName) -> RelationRule {
    RelationRule {
        declared,
        when,
        category,
    }
}

use CategoryName::{Fixed, TargetSuffixed};
use EndpointMatch::{Any, SourceIs, TargetIs};

/// Disambiguation rules for polymorphic relation types, in precedence order.
pub const RELATION_RULES: &[RelationRule] = &[
    rule("EST_JUSTIFIE_PAR", TargetIs("Audit"), Fixed("DECISION_JUSTIFIEE_PAR_AUDIT")),
    rule("EST_JUSTIFIE_PAR", TargetIs(QUALITY_EVENT), Fixed("DECISION_JUSTIFIEE_PAR_QE")),
    rule("EST_JUSTIFIE_PAR", TargetIs("Inspection"), Fixed("DECISION_JUSTIFIEE_PAR_INSPECTION")),
    rule("EST_JUSTIFIE_PAR", TargetIs("Finding"), Fixed("DECISION_JUSTIFIEE_PAR_FINDING")),
    rule("EST_JUSTIFIE_PAR", Any, TargetSuffixed("DECISION_JUSTIFIEE_PAR_")),
    rule("GENERE_FINDING", SourceIs("Inspection"), Fixed("INSPECTION_GENERE_FINDING")),
    rule("GENERE_FINDING", Any, Fixed("GENERE_FINDING")),
    rule("DECLENCHE_ALERTE", SourceIs(QUALITY_EVENT), Fixed("QE_DECLENCHE_ALERTE")),
    rule("DECLENCHE_ALERTE", Any, Fixed("AUDIT_DECLENCHE_ALERTE")),
    rule("CONCERNE_ST", SourceIs(QUALITY_EVENT), Fixed("QE_CONCERNE_ST")),
    rule("CONCERNE_ST", Any, Fixed("EVT_CONCERNE_ST")),
    rule("A_VERSION_SUIVANTE", SourceIs(QUALITY_AGREEMENT), Fixed("QA_A_VERSION_SUIVANTE")),
    rule("A_VERSION_SUIVANTE", Any, Fixed("A_VERSION_SUIVANTE")),
];

/// Declared type → category for relation types that are not split.
pub const RELATION_TYPE_NAMES: &[(&str, &str)] = &[
    ("EST_LIE_AU_CONTRAT", "EST_LIE_AU_CONTRAT"),
    ("EST_COUVERT_PAR_QA", "EST_COUVERT_PAR_QA"),
    ("A_VERSION_SUIVANTE", "A_VERSION_SUIVANTE"),
    ("EST_SOUS_TRAITANT_DE", "EST_SOUS_TRAITANT_DE"),
    ("A_ETE_AUDITE_PAR", "A_ETE_AUDITE_PAR"),
    ("A_ETE_INSPECTE_PAR", "A_ETE_INSPECTE_PAR"),
    ("GENERE_FINDING", "GENERE_FINDING"),
    ("CONCERNE_ST", "QE_CONCERNE_ST"),
    ("SURVENU_DANS", "SURVENU_DANS_ETUDE"),
    ("EST_JUSTIFIE_PAR", "DECISION_JUSTIFIEE_PAR"),
    ("RESULTE_DE_EVALUATION", "RESULTE_DE_EVALUATION"),
    ("A_POUR_CONTEXTE", "A_POUR_CONTEXTE"),
    ("POSSEDE_SERVICE", "POSSEDE_SERVICE"),
    ("A_FAIT_OBJET_EVALUATION", "A_FAIT_OBJET_EVALUATION"),
    ("A_ETE_SUIVI_PAR", "A_ETE_SUIVI_PAR"),
    ("DECLENCHE_ALERTE", "DECLENCHE_ALERTE"),
    ("CAUSE_EVENEMENT", "CAUSE_EVENEMENT"),
    ("IMPLIQUE_ST", "IMPLIQUE_ST"),
];

/// Resolve `(declared type, source type, target type)` to a category key.
///
/// Deterministic and total: unknown declared types come back unchanged.
pub fn resolve_category(declared: &str, source_type: &str, target_type: &str) -> String {
    let hit = RELATION_RULES
        .iter()
        .find(|r| r.declared == declared && r.when.matches(source_type, target_type));
    if let Some(rule) = hit {
        return match rule.category {
            Fixed(name) => name.to_string(),
            TargetSuffixed(prefix) => format!("{prefix}{target_type}"),
        };
    }

    RELATION_TYPE_NAMES
        .iter()
        .find(|(d, _)| *d == declared)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| declared.to_string())
}

type Extras = fn(&Payload, &mut Record);

/// Categories carrying payload fields beyond the base columns.
const CATEGORY_EXTRAS: &[(&str, Extras)] = &[
    ("EST_SOUS_TRAITANT_DE", subcontracting_extras),
    ("POSSEDE_SERVICE", service_ownership_extras),
    ("IMPLIQUE_ST", involvement_extras),
    ("CAUSE_EVENEMENT", impact_extras),
    ("EVT_CONCERNE_ST", impact_extras),
];

fn subcontracting_extras(p: &Payload, r: &mut Record) {
    r.insert("contexte_etudes", p.json_text("contexte_etudes", "[]"));
}

fn service_ownership_extras(p: &Payload, r: &mut Record) {
    r.insert("score_evaluation", p.text("score_evaluation", ""));
    r.insert("en_reevaluation", p.flag("en_reevaluation"));
}

fn involvement_extras(p: &Payload, r: &mut Record) {
    r.insert("niveau", p.text("niveau", "1"));
    r.insert("role", p.text("role", ""));
    r.insert("via", p.text("via", ""));
}

fn impact_extras(p: &Payload, r: &mut Record) {
    r.insert("impact", p.text("impact", ""));
}

/// Resolve the category of a relation row and project it.
///
/// Every record has `from`, `to`, `date_lien` and `validite`; a few
/// categories append payload fields after those.
pub fn classify_relation(row: &RelationRow, payload: &Payload) -> (String, Record) {
    let category = row.category();
    let mut record = Record::with_capacity(7)
        .with("from", row.source.as_str())
        .with("to", row.target.as_str())
        .with("date_lien", row.linked_on.as_str())
        .with("validite", row.validity());

    if let Some((_, extras)) = CATEGORY_EXTRAS.iter().find(|(c, _)| *c == category) {
        extras(payload, &mut record);
    }

    (category, record)
}
