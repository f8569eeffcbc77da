pub mod aggregate;
pub mod dashboard;
pub mod export;
pub mod generate;
pub mod model;
pub mod rng;
pub mod scenario;
pub mod web;

pub use dashboard::{Dashboard, DashboardSettings};
pub use generate::DatasetGenerator;
pub use model::Dataset;
pub use scenario::{Scenario, ScenarioLoader};
