use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("scenario validation error: {0}")]
    Validation(String),
}

fn default_seed() -> u64 {
    42
}

fn default_severity_records() -> usize {
    300
}

fn default_tree_observations() -> usize {
    100
}

fn default_infrastructure_sites() -> usize {
    20
}

fn default_active_fire_perimeters() -> u32 {
    5
}

fn default_species() -> Vec<String> {
    [
        "Coast Live Oak",
        "California Bay",
        "Monterey Pine",
        "Eucalyptus",
        "Western Sycamore",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub bounds: Bounds,
    #[serde(default)]
    pub area_acres: Range,
    #[serde(default = "default_severity_records")]
    pub severity_records: usize,
    #[serde(default = "default_tree_observations")]
    pub tree_observations: usize,
    #[serde(default = "default_infrastructure_sites")]
    pub infrastructure_sites: usize,
    #[serde(default = "default_species")]
    pub species: Vec<String>,
    #[serde(default)]
    pub timeline: Timeline,
    #[serde(default = "default_active_fire_perimeters")]
    pub active_fire_perimeters: u32,
}

/// Half-open `[min, max)` interval used for uniform sampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value < self.max
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    fn check(&self, label: &str) -> Result<(), ScenarioError> {
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(ScenarioError::Validation(format!(
                "{label} range bounds must be finite (got {} .. {})",
                self.min, self.max
            )));
        }
        if self.min >= self.max {
            return Err(ScenarioError::Validation(format!(
                "{label} range must have min < max (got {} .. {})",
                self.min, self.max
            )));
        }
        if !(self.max - self.min).is_finite() {
            return Err(ScenarioError::Validation(format!(
                "{label} range is too wide to sample (got {} .. {})",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

impl Default for Range {
    fn default() -> Self {
        Self::new(10.0, 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub latitude: Range,
    pub longitude: Range,
}

impl Bounds {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        self.latitude.contains(latitude) && self.longitude.contains(longitude)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            latitude: Range::new(34.0, 34.2),
            longitude: Range::new(-118.4, -118.2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Timeline {
    /// Every day from `start` to `end`, both inclusive.
    pub fn days(&self) -> Vec<NaiveDate> {
        self.start
            .iter_days()
            .take_while(|day| *day <= self.end)
            .collect()
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2024, 1, 20).expect("valid start date"),
            end: NaiveDate::from_ymd_opt(2024, 2, 3).expect("valid end date"),
        }
    }
}

impl Scenario {
    /// The Los Angeles scenario used when no scenario file is supplied.
    pub fn los_angeles() -> Self {
        Self {
            name: "la_wildfire".to_string(),
            description: Some("LA wildfire impact, January 2024".to_string()),
            seed: default_seed(),
            bounds: Bounds::default(),
            area_acres: Range::default(),
            severity_records: default_severity_records(),
            tree_observations: default_tree_observations(),
            infrastructure_sites: default_infrastructure_sites(),
            species: default_species(),
            timeline: Timeline::default(),
            active_fire_perimeters: default_active_fire_perimeters(),
        }
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.name.trim().is_empty() {
            return Err(ScenarioError::Validation(
                "scenario must define a name".to_string(),
            ));
        }
        if self.species.is_empty() {
            return Err(ScenarioError::Validation(
                "scenario must list at least one tree species".to_string(),
            ));
        }
        self.bounds.latitude.check("latitude")?;
        self.bounds.longitude.check("longitude")?;
        self.area_acres.check("area_acres")?;
        if self.timeline.end < self.timeline.start {
            return Err(ScenarioError::Validation(format!(
                "timeline ends ({}) before it starts ({})",
                self.timeline.end, self.timeline.start
            )));
        }
        Ok(())
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn resolve(&self, file: impl AsRef<Path>) -> PathBuf {
        self.base_dir.join(file)
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario, ScenarioError> {
        let path = self.resolve(file);
        let data = fs::read_to_string(&path).map_err(|source| ScenarioError::Io {
            path: path.clone(),
            source,
        })?;
        let scenario = Scenario::from_yaml_str(&data).map_err(|source| ScenarioError::Parse {
            path: path.clone(),
            source,
        })?;
        scenario.validate()?;
        tracing::debug!(scenario = %scenario.name, path = %path.display(), "scenario loaded");
        Ok(scenario)
    }
}
