//! Key quality indicators (KQI).
//!
//! `kqi.csv` is already one row per measurement; it only needs its columns
//! renamed. Each indicator is also linked back to the subcontractor it
//! measures (`KQI_MESURE_ST`).

use std::collections::HashSet;

use serde::Deserialize;

use crate::record::Record;

pub const INDICATOR_FILE_STEM: &str = "KQI";
pub const INDICATOR_LINK_CATEGORY: &str = "KQI_MESURE_ST";

/// One row of `kqi.csv`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct KqiRow {
    #[serde(rename = "ID_KQI")]
    pub id: String,
    #[serde(rename = "ID_SousTraitant")]
    pub subcontractor_id: String,
    #[serde(rename = "Nom_SousTraitant")]
    pub subcontractor_name: String,
    #[serde(rename = "Indicateur")]
    pub indicator: String,
    #[serde(rename = "Periode")]
    pub period: String,
    #[serde(rename = "Valeur")]
    pub value: String,
    #[serde(rename = "Seuil_Alerte")]
    pub alert_threshold: String,
    #[serde(rename = "Seuil_Objectif")]
    pub target_threshold: String,
    #[serde(rename = "Statut")]
    pub status: String,
    #[serde(rename = "Tendance")]
    pub trend: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    pub id: String,
    pub subcontractor_id: String,
    pub subcontractor_name: String,
    pub indicator: String,
    pub period: String,
    pub value: String,
    pub alert_threshold: String,
    pub target_threshold: String,
    pub status: String,
    pub trend: String,
}

impl From<KqiRow> for Indicator {
    fn from(row: KqiRow) -> Self {
        Self {
            id: row.id,
            subcontractor_id: row.subcontractor_id,
            subcontractor_name: row.subcontractor_name,
            indicator: row.indicator,
            period: row.period,
            value: row.value,
            alert_threshold: row.alert_threshold,
            target_threshold: row.target_threshold,
            status: row.status,
            trend: row.trend,
        }
    }
}

impl Indicator {
    pub fn to_record(&self) -> Record {
        Record::with_capacity(10)
            .with("id", self.id.as_str())
            .with("sous_traitant_id", self.subcontractor_id.as_str())
            .with("sous_traitant_nom", self.subcontractor_name.as_str())
            .with("indicateur", self.indicator.as_str())
            .with("periode", self.period.as_str())
            .with("valeur", self.value.as_str())
            .with("seuil_alerte", self.alert_threshold.as_str())
            .with("seuil_objectif", self.target_threshold.as_str())
            .with("statut", self.status.as_str())
            .with("tendance", self.trend.as_str())
    }
}

/// `KQI → Sous-Traitant` edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorLink {
    pub indicator_id: String,
    pub subcontractor_id: String,
    pub period: String,
}

impl IndicatorLink {
    pub fn to_record(&self) -> Record {
        Record::with_capacity(3)
            .with("from", self.indicator_id.as_str())
            .with("to", self.subcontractor_id.as_str())
            .with("periode", self.period.as_str())
    }
}

/// One link per distinct `(indicator id, subcontractor id)` pair, in
/// first-seen order. The first period seen for a pair is kept.
pub fn derive_links(indicators: &[Indicator]) -> Vec<IndicatorLink> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut links = Vec::new();
    for indicator in indicators {
        if seen.insert((indicator.id.as_str(), indicator.subcontractor_id.as_str())) {
            links.push(IndicatorLink {
                indicator_id: indicator.id.clone(),
                subcontractor_id: indicator.subcontractor_id.clone(),
                period: indicator.period.clone(),
            });
        }
    }
    links
}
