//! Chart and map-layer payloads derived from a [`Dataset`].
//!
//! Everything here is plain data: a front end can draw it without any further
//! aggregation.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::{
    aggregate::{
        complete_severity, complete_status, count_at_risk, count_by_status, cross_tabulate,
        sum_area_by_severity, total_area,
    },
    model::{Dataset, InfrastructureStatus, InvasiveSpecies, Severity},
    scenario::Scenario,
};

pub type Rgba = [u8; 4];

const INFRASTRUCTURE_FILL: Rgba = [255, 0, 0, 100];
const INFRASTRUCTURE_RADIUS: f64 = 100.0;

pub fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "#d9534f",
        Severity::Medium => "#f0ad4e",
        Severity::Low => "#f7e08a",
    }
}

pub fn severity_fill(severity: Severity) -> Rgba {
    match severity {
        Severity::High => [215, 48, 39, 180],
        Severity::Medium => [252, 141, 89, 180],
        Severity::Low => [254, 224, 144, 180],
    }
}

pub fn status_color(status: InfrastructureStatus) -> &'static str {
    match status {
        InfrastructureStatus::Affected => "#d9534f",
        InfrastructureStatus::AtRisk => "#f0ad4e",
        InfrastructureStatus::Safe => "#f7e08a",
    }
}

/// Continuous colour scale for invasive risk, lowest score first.
pub const RISK_COLOR_SCALE: [&str; 3] = ["#f7e08a", "#f0ad4e", "#d9534f"];

#[derive(Debug, Error, PartialEq)]
pub enum DashboardError {
    #[error("date {date} is outside the fire timeline ({start} to {end})")]
    DateOutOfRange {
        date: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("the fire timeline is empty")]
    EmptyTimeline,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSettings {
    pub title: String,
    pub active_fire_perimeters: u32,
    pub view: ViewState,
}

impl DashboardSettings {
    pub fn from_scenario(scenario: &Scenario) -> Self {
        Self {
            title: scenario
                .description
                .clone()
                .unwrap_or_else(|| scenario.name.clone()),
            active_fire_perimeters: scenario.active_fire_perimeters,
            view: ViewState {
                latitude: scenario.bounds.latitude.midpoint(),
                longitude: scenario.bounds.longitude.midpoint(),
                zoom: 11.0,
                pitch: 45.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewState {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
    pub pitch: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlineMetrics {
    pub total_burned_acres: f64,
    pub affected_trees: u64,
    pub infrastructure_at_risk: u64,
    pub active_fire_perimeters: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub name: String,
    pub color: String,
    pub x: Vec<String>,
    pub y: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: u64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub position: [f64; 2],
    pub radius: f64,
    pub fill: Rgba,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayer {
    pub id: String,
    pub points: Vec<MapPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progression {
    pub date: NaiveDate,
    pub view: ViewState,
    pub infrastructure: MapLayer,
}

/// Bubble position is (risk score, area); bubble size and colour follow area
/// and risk score respectively.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub x_label: String,
    pub y_label: String,
    pub color_scale: Vec<String>,
    pub color_range: [f64; 2],
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub metrics: HeadlineMetrics,
    pub severity_distribution: Vec<Slice>,
    pub species_by_severity: Vec<BarSeries>,
    pub invasive_species: ScatterChart,
    pub infrastructure_status: Vec<Bar>,
    pub view: ViewState,
    pub severity_layer: MapLayer,
    pub infrastructure_layer: MapLayer,
    pub timeline: Vec<NaiveDate>,
}

impl Dashboard {
    pub fn build(dataset: &Dataset, settings: &DashboardSettings) -> Self {
        Self {
            title: settings.title.clone(),
            metrics: metrics(dataset, settings),
            severity_distribution: severity_distribution(dataset),
            species_by_severity: species_by_severity(dataset),
            invasive_species: invasive_scatter(&dataset.invasive_species),
            infrastructure_status: infrastructure_status(dataset),
            view: settings.view,
            severity_layer: severity_layer(dataset),
            infrastructure_layer: infrastructure_layer(dataset),
            timeline: dataset.timeline.clone(),
        }
    }

    /// Infrastructure view for one day of the fire timeline.
    pub fn progression(&self, date: Option<NaiveDate>) -> Result<Progression, DashboardError> {
        let (start, end) = match (self.timeline.first(), self.timeline.last()) {
            (Some(start), Some(end)) => (*start, *end),
            _ => return Err(DashboardError::EmptyTimeline),
        };
        let date = date.unwrap_or(start);
        if !self.timeline.contains(&date) {
            return Err(DashboardError::DateOutOfRange { date, start, end });
        }
        Ok(Progression {
            date,
            view: self.view,
            infrastructure: self.infrastructure_layer.clone(),
        })
    }
}

pub fn metrics(dataset: &Dataset, settings: &DashboardSettings) -> HeadlineMetrics {
    HeadlineMetrics {
        total_burned_acres: total_area(&dataset.burn_severity),
        affected_trees: dataset.tree_species.len() as u64,
        infrastructure_at_risk: count_at_risk(&dataset.infrastructure),
        active_fire_perimeters: settings.active_fire_perimeters,
    }
}

fn severity_distribution(dataset: &Dataset) -> Vec<Slice> {
    complete_severity(&sum_area_by_severity(&dataset.burn_severity))
        .into_iter()
        .map(|(severity, value)| Slice {
            label: severity.label().to_string(),
            value,
            color: severity_color(severity).to_string(),
        })
        .collect()
}

fn species_by_severity(dataset: &Dataset) -> Vec<BarSeries> {
    let table = cross_tabulate(
        &dataset.tree_species,
        |obs| obs.species.clone(),
        |obs| obs.affected_by_severity,
    );
    let species: Vec<String> = table.rows().cloned().collect();
    Severity::ALL
        .iter()
        .map(|severity| BarSeries {
            name: severity.label().to_string(),
            color: severity_color(*severity).to_string(),
            x: species.clone(),
            y: table
                .column(severity)
                .into_iter()
                .map(|(_, count)| count)
                .collect(),
        })
        .collect()
}

fn invasive_scatter(species: &[InvasiveSpecies]) -> ScatterChart {
    let scores = species.iter().map(|s| s.risk_score);
    let low = scores.clone().fold(f64::INFINITY, f64::min);
    let high = scores.fold(f64::NEG_INFINITY, f64::max);
    let color_range = if low <= high { [low, high] } else { [0.0, 0.0] };
    ScatterChart {
        x_label: "Risk_Score".to_string(),
        y_label: "Area_Affected".to_string(),
        color_scale: RISK_COLOR_SCALE.iter().map(|c| c.to_string()).collect(),
        color_range,
        points: species
            .iter()
            .map(|s| ScatterPoint {
                label: s.species.clone(),
                x: s.risk_score,
                y: f64::from(s.area_affected),
                size: f64::from(s.area_affected),
                color_value: s.risk_score,
            })
            .collect(),
    }
}

fn infrastructure_status(dataset: &Dataset) -> Vec<Bar> {
    complete_status(&count_by_status(&dataset.infrastructure))
        .into_iter()
        .map(|(status, value)| Bar {
            label: status.label().to_string(),
            value,
            color: status_color(status).to_string(),
        })
        .collect()
}

fn severity_layer(dataset: &Dataset) -> MapLayer {
    MapLayer {
        id: "burn_severity".to_string(),
        points: dataset
            .burn_severity
            .iter()
            .map(|record| MapPoint {
                position: [record.longitude, record.latitude],
                radius: record.area_acres,
                fill: severity_fill(record.severity),
                tooltip: format!(
                    "{} Severity: {:.1} acres",
                    record.severity, record.area_acres
                ),
            })
            .collect(),
    }
}

fn infrastructure_layer(dataset: &Dataset) -> MapLayer {
    MapLayer {
        id: "infrastructure".to_string(),
        points: dataset
            .infrastructure
            .iter()
            .map(|record| MapPoint {
                position: [record.longitude, record.latitude],
                radius: INFRASTRUCTURE_RADIUS,
                fill: INFRASTRUCTURE_FILL,
                tooltip: format!("{}: {}", record.kind, record.status),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        InfrastructureKind, InfrastructureRecord, SeverityRecord, TreeObservation,
    };

    fn settings() -> DashboardSettings {
        DashboardSettings::from_scenario(&Scenario::los_angeles())
    }

    fn small_dataset() -> Dataset {
        Dataset {
            burn_severity: vec![
                SeverityRecord {
                    severity: Severity::High,
                    latitude: 34.05,
                    longitude: -118.25,
                    area_acres: 10.0,
                },
                SeverityRecord {
                    severity: Severity::High,
                    latitude: 34.1,
                    longitude: -118.3,
                    area_acres: 3.0,
                },
            ],
            tree_species: vec![
                TreeObservation {
                    species: "Monterey Pine".to_string(),
                    latitude: 34.1,
                    longitude: -118.3,
                    affected_by_severity: Severity::Low,
                },
                TreeObservation {
                    species: "Eucalyptus".to_string(),
                    latitude: 34.1,
                    longitude: -118.3,
                    affected_by_severity: Severity::High,
                },
            ],
            infrastructure: vec![InfrastructureRecord {
                kind: InfrastructureKind::Hospital,
                latitude: 34.12,
                longitude: -118.31,
                status: InfrastructureStatus::AtRisk,
            }],
            invasive_species: InvasiveSpecies::reference_table(),
            timeline: Scenario::los_angeles().timeline.days(),
        }
    }

    #[test]
    fn view_centres_on_scenario_bounds() {
        let view = settings().view;
        assert!((view.latitude - 34.1).abs() < 1e-9);
        assert!((view.longitude + 118.3).abs() < 1e-9);
        assert_eq!(view.zoom, 11.0);
        assert_eq!(view.pitch, 45.0);
    }

    #[test]
    fn headline_metrics_reduce_the_dataset() {
        let dashboard = Dashboard::build(&small_dataset(), &settings());
        assert_eq!(dashboard.metrics.total_burned_acres, 13.0);
        assert_eq!(dashboard.metrics.affected_trees, 2);
        assert_eq!(dashboard.metrics.infrastructure_at_risk, 1);
        assert_eq!(dashboard.metrics.active_fire_perimeters, 5);
    }

    #[test]
    fn distribution_lists_every_severity() {
        let dashboard = Dashboard::build(&small_dataset(), &settings());
        let labels: Vec<_> = dashboard
            .severity_distribution
            .iter()
            .map(|slice| (slice.label.as_str(), slice.value))
            .collect();
        assert_eq!(labels, vec![("High", 13.0), ("Medium", 0.0), ("Low", 0.0)]);
        assert_eq!(dashboard.severity_distribution[0].color, "#d9534f");
    }

    #[test]
    fn species_series_are_stacked_per_severity() {
        let dashboard = Dashboard::build(&small_dataset(), &settings());
        assert_eq!(dashboard.species_by_severity.len(), 3);
        let high = &dashboard.species_by_severity[0];
        assert_eq!(high.name, "High");
        assert_eq!(high.x, vec!["Eucalyptus", "Monterey Pine"]);
        assert_eq!(high.y, vec![1, 0]);
        let low = &dashboard.species_by_severity[2];
        assert_eq!(low.y, vec![0, 1]);
    }

    #[test]
    fn map_points_use_lon_lat_order_and_palette() {
        let dashboard = Dashboard::build(&small_dataset(), &settings());
        let point = &dashboard.severity_layer.points[0];
        assert_eq!(point.position, [-118.25, 34.05]);
        assert_eq!(point.fill, [215, 48, 39, 180]);
        assert_eq!(point.tooltip, "High Severity: 10.0 acres");

        let site = &dashboard.infrastructure_layer.points[0];
        assert_eq!(site.radius, 100.0);
        assert_eq!(site.tooltip, "Hospital: At Risk");
    }

    #[test]
    fn status_bars_zero_fill() {
        let dashboard = Dashboard::build(&small_dataset(), &settings());
        let bars: Vec<_> = dashboard
            .infrastructure_status
            .iter()
            .map(|bar| (bar.label.as_str(), bar.value))
            .collect();
        assert_eq!(bars, vec![("At Risk", 1), ("Safe", 0), ("Affected", 0)]);
    }

    #[test]
    fn status_colours_follow_alphabetical_palette_order() {
        let dashboard = Dashboard::build(&small_dataset(), &settings());
        let colours: Vec<_> = dashboard
            .infrastructure_status
            .iter()
            .map(|bar| (bar.label.as_str(), bar.color.as_str()))
            .collect();
        assert_eq!(
            colours,
            vec![
                ("At Risk", "#f0ad4e"),
                ("Safe", "#f7e08a"),
                ("Affected", "#d9534f")
            ]
        );
    }

    #[test]
    fn invasive_scatter_encodes_risk_and_area() {
        let dashboard = Dashboard::build(&small_dataset(), &settings());
        let chart = &dashboard.invasive_species;
        assert_eq!(chart.points.len(), 5);
        assert_eq!(chart.color_scale, vec!["#f7e08a", "#f0ad4e", "#d9534f"]);
        assert_eq!(chart.color_range, [7.2, 9.5]);

        let thistle = &chart.points[0];
        assert_eq!(thistle.label, "Yellow Star Thistle");
        assert_eq!(thistle.x, 9.5);
        assert_eq!(thistle.y, 456.0);
        assert_eq!(thistle.size, 456.0);
        assert_eq!(thistle.color_value, 9.5);
    }

    #[test]
    fn invasive_scatter_handles_empty_table() {
        let chart = invasive_scatter(&[]);
        assert!(chart.points.is_empty());
        assert_eq!(chart.color_range, [0.0, 0.0]);
    }

    #[test]
    fn progression_defaults_to_first_day() {
        let dashboard = Dashboard::build(&small_dataset(), &settings());
        let progression = dashboard.progression(None).unwrap();
        assert_eq!(progression.date.to_string(), "2024-01-20");
        assert_eq!(progression.infrastructure.points.len(), 1);
    }

    #[test]
    fn progression_rejects_dates_off_the_timeline() {
        let dashboard = Dashboard::build(&small_dataset(), &settings());
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(matches!(
            dashboard.progression(Some(date)),
            Err(DashboardError::DateOutOfRange { .. })
        ));

        let mut empty = small_dataset();
        empty.timeline.clear();
        let dashboard = Dashboard::build(&empty, &settings());
        assert_eq!(
            dashboard.progression(None),
            Err(DashboardError::EmptyTimeline)
        );
    }
}
