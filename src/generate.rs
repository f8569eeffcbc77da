//! Synthetic record generation for a dashboard session.
//!
//! Categorical fields are assigned in contiguous blocks (the first block of
//! records gets the first category, and so on); coordinates and areas are
//! drawn uniformly from the scenario ranges.

use rand::{Rng, RngCore};
use tracing::{debug, info};

use crate::{
    model::{
        Dataset, InfrastructureKind, InfrastructureRecord, InfrastructureStatus,
        InvasiveSpecies, Severity, SeverityRecord, TreeObservation,
    },
    rng::RngManager,
    scenario::{Bounds, Range, Scenario},
};

pub struct DatasetGenerator<'a> {
    scenario: &'a Scenario,
    rng: RngManager,
}

impl<'a> DatasetGenerator<'a> {
    pub fn new(scenario: &'a Scenario) -> Self {
        Self {
            scenario,
            rng: RngManager::new(scenario.seed),
        }
    }

    pub fn generate(mut self) -> Dataset {
        let scenario = self.scenario;
        let burn_severity = burn_severity(
            scenario.severity_records,
            &scenario.bounds,
            &scenario.area_acres,
            &mut self.rng.stream("burn_severity"),
        );
        let tree_species = tree_species(
            scenario.tree_observations,
            &scenario.species,
            &scenario.bounds,
            &mut self.rng.stream("tree_species"),
        );
        let infrastructure = infrastructure(
            scenario.infrastructure_sites,
            &scenario.bounds,
            &mut self.rng.stream("infrastructure"),
        );
        let timeline = scenario.timeline.days();

        debug!(
            burn_severity = burn_severity.len(),
            tree_species = tree_species.len(),
            infrastructure = infrastructure.len(),
            days = timeline.len(),
            "generated collections"
        );
        info!(scenario = %scenario.name, seed = scenario.seed, "dataset generated");

        Dataset {
            burn_severity,
            tree_species,
            infrastructure,
            invasive_species: InvasiveSpecies::reference_table(),
            timeline,
        }
    }
}

/// Category for position `index` when `len` records are split into equal
/// contiguous blocks over `categories`.
pub fn block_assign<T: Copy>(categories: &[T], len: usize, index: usize) -> T {
    let block = len.div_ceil(categories.len()).max(1);
    categories[(index / block).min(categories.len() - 1)]
}

fn sample(range: &Range, rng: &mut impl RngCore) -> f64 {
    rng.gen_range(range.min..range.max)
}

fn burn_severity(
    count: usize,
    bounds: &Bounds,
    area: &Range,
    rng: &mut impl RngCore,
) -> Vec<SeverityRecord> {
    (0..count)
        .map(|index| SeverityRecord {
            severity: Severity::ALL[index % Severity::ALL.len()],
            latitude: sample(&bounds.latitude, rng),
            longitude: sample(&bounds.longitude, rng),
            area_acres: sample(area, rng),
        })
        .collect()
}

fn tree_species(
    count: usize,
    species: &[String],
    bounds: &Bounds,
    rng: &mut impl RngCore,
) -> Vec<TreeObservation> {
    if species.is_empty() {
        return Vec::new();
    }
    let indices: Vec<usize> = (0..species.len()).collect();
    (0..count)
        .map(|index| TreeObservation {
            species: species[block_assign(&indices, count, index)].clone(),
            latitude: sample(&bounds.latitude, rng),
            longitude: sample(&bounds.longitude, rng),
            affected_by_severity: block_assign(&Severity::ALL, count, index),
        })
        .collect()
}

fn infrastructure(
    count: usize,
    bounds: &Bounds,
    rng: &mut impl RngCore,
) -> Vec<InfrastructureRecord> {
    (0..count)
        .map(|index| InfrastructureRecord {
            kind: block_assign(&InfrastructureKind::ALL, count, index),
            latitude: sample(&bounds.latitude, rng),
            longitude: sample(&bounds.longitude, rng),
            status: block_assign(&InfrastructureStatus::ALL, count, index),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_assignment_matches_contiguous_split() {
        let statuses = InfrastructureStatus::ALL;
        let assigned: Vec<_> = (0..20).map(|i| block_assign(&statuses, 20, i)).collect();
        assert!(assigned[..7]
            .iter()
            .all(|s| *s == InfrastructureStatus::AtRisk));
        assert!(assigned[7..14]
            .iter()
            .all(|s| *s == InfrastructureStatus::Safe));
        assert!(assigned[14..]
            .iter()
            .all(|s| *s == InfrastructureStatus::Affected));
    }

    #[test]
    fn block_assignment_handles_fewer_records_than_categories() {
        let kinds = InfrastructureKind::ALL;
        let assigned: Vec<_> = (0..2).map(|i| block_assign(&kinds, 2, i)).collect();
        assert_eq!(
            assigned,
            vec![InfrastructureKind::Hospital, InfrastructureKind::School]
        );
    }

    #[test]
    fn severity_cycles_by_index() {
        let scenario = Scenario::los_angeles();
        let dataset = DatasetGenerator::new(&scenario).generate();
        assert_eq!(dataset.burn_severity.len(), 300);
        for (index, record) in dataset.burn_severity.iter().enumerate() {
            assert_eq!(record.severity, Severity::ALL[index % 3]);
        }
    }

    #[test]
    fn default_scenario_shapes() {
        let scenario = Scenario::los_angeles();
        let dataset = DatasetGenerator::new(&scenario).generate();

        assert_eq!(dataset.tree_species.len(), 100);
        assert_eq!(dataset.tree_species[0].species, "Coast Live Oak");
        assert_eq!(dataset.tree_species[19].species, "Coast Live Oak");
        assert_eq!(dataset.tree_species[20].species, "California Bay");
        assert_eq!(dataset.tree_species[99].species, "Western Sycamore");
        assert_eq!(dataset.tree_species[33].affected_by_severity, Severity::High);
        assert_eq!(dataset.tree_species[34].affected_by_severity, Severity::Medium);
        assert_eq!(dataset.tree_species[99].affected_by_severity, Severity::Low);

        assert_eq!(dataset.infrastructure.len(), 20);
        assert_eq!(dataset.infrastructure[4].kind, InfrastructureKind::Hospital);
        assert_eq!(dataset.infrastructure[5].kind, InfrastructureKind::School);
        assert_eq!(
            dataset.infrastructure[19].kind,
            InfrastructureKind::PowerStation
        );

        assert_eq!(dataset.invasive_species.len(), 5);
        assert_eq!(dataset.timeline.len(), 15);
    }

    #[test]
    fn samples_stay_inside_scenario_ranges() {
        let scenario = Scenario::los_angeles();
        let dataset = DatasetGenerator::new(&scenario).generate();
        let bounds = scenario.bounds;
        assert!(dataset
            .burn_severity
            .iter()
            .all(|r| bounds.contains(r.latitude, r.longitude)
                && scenario.area_acres.contains(r.area_acres)));
        assert!(dataset
            .tree_species
            .iter()
            .all(|t| bounds.contains(t.latitude, t.longitude)));
        assert!(dataset
            .infrastructure
            .iter()
            .all(|i| bounds.contains(i.latitude, i.longitude)));
    }

    #[test]
    fn same_seed_same_dataset() {
        let scenario = Scenario::los_angeles();
        let a = DatasetGenerator::new(&scenario).generate();
        let b = DatasetGenerator::new(&scenario).generate();
        assert_eq!(a, b);

        let mut other = scenario.clone();
        other.seed += 1;
        let c = DatasetGenerator::new(&other).generate();
        assert_ne!(a.burn_severity, c.burn_severity);
    }

    #[test]
    fn zero_counts_produce_empty_collections() {
        let mut scenario = Scenario::los_angeles();
        scenario.severity_records = 0;
        scenario.tree_observations = 0;
        scenario.infrastructure_sites = 0;
        let dataset = DatasetGenerator::new(&scenario).generate();
        assert!(dataset.burn_severity.is_empty());
        assert!(dataset.tree_species.is_empty());
        assert!(dataset.infrastructure.is_empty());
    }
}
