use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::High, Severity::Medium, Severity::Low];

    pub fn label(self) -> &'static str {
        match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InfrastructureKind {
    Hospital,
    School,
    Highway,
    #[serde(rename = "Power Station")]
    PowerStation,
}

impl InfrastructureKind {
    pub const ALL: [InfrastructureKind; 4] = [
        InfrastructureKind::Hospital,
        InfrastructureKind::School,
        InfrastructureKind::Highway,
        InfrastructureKind::PowerStation,
    ];

    pub fn label(self) -> &'static str {
        match self {
            InfrastructureKind::Hospital => "Hospital",
            InfrastructureKind::School => "School",
            InfrastructureKind::Highway => "Highway",
            InfrastructureKind::PowerStation => "Power Station",
        }
    }
}

impl fmt::Display for InfrastructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InfrastructureStatus {
    #[serde(rename = "At Risk")]
    AtRisk,
    Safe,
    Affected,
}

impl InfrastructureStatus {
    pub const ALL: [InfrastructureStatus; 3] = [
        InfrastructureStatus::AtRisk,
        InfrastructureStatus::Safe,
        InfrastructureStatus::Affected,
    ];

    pub fn label(self) -> &'static str {
        match self {
            InfrastructureStatus::AtRisk => "At Risk",
            InfrastructureStatus::Safe => "Safe",
            InfrastructureStatus::Affected => "Affected",
        }
    }
}

impl fmt::Display for InfrastructureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityRecord {
    pub severity: Severity,
    pub latitude: f64,
    pub longitude: f64,
    pub area_acres: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeObservation {
    pub species: String,
    pub latitude: f64,
    pub longitude: f64,
    pub affected_by_severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfrastructureRecord {
    #[serde(rename = "type")]
    pub kind: InfrastructureKind,
    pub latitude: f64,
    pub longitude: f64,
    pub status: InfrastructureStatus,
}

/// Static reference row for the invasive fire-hazard species chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvasiveSpecies {
    pub species: String,
    pub risk_score: f64,
    pub area_affected: u32,
}

impl InvasiveSpecies {
    pub fn reference_table() -> Vec<InvasiveSpecies> {
        [
            ("Yellow Star Thistle", 9.5, 456),
            ("Pampas Grass", 8.7, 323),
            ("French Broom", 8.4, 234),
            ("Ice Plant", 7.2, 178),
            ("Tree of Heaven", 8.9, 289),
        ]
        .into_iter()
        .map(|(species, risk_score, area_affected)| InvasiveSpecies {
            species: species.to_string(),
            risk_score,
            area_affected,
        })
        .collect()
    }
}

/// Everything generated for one dashboard session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub burn_severity: Vec<SeverityRecord>,
    pub tree_species: Vec<TreeObservation>,
    pub infrastructure: Vec<InfrastructureRecord>,
    pub invasive_species: Vec<InvasiveSpecies>,
    pub timeline: Vec<NaiveDate>,
}
