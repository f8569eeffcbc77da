use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use wildfire_impact::{
    aggregate::{count_by_status, cross_tabulate, sum_area_by_severity},
    export::DashboardExporter,
    model::Dataset,
    web::{self, WebServerConfig},
    Dashboard, DashboardSettings, DatasetGenerator, Scenario, ScenarioLoader,
};

const DEFAULT_SCENARIO: &str = "scenarios/la_wildfire.yaml";

#[derive(Debug, Parser)]
#[command(author, version, about = "Wildfire impact dashboard data service")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = DEFAULT_SCENARIO, global = true)]
    scenario: PathBuf,

    /// Override the scenario's random seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print headline metrics and aggregate tables
    Summary,
    /// Write the dashboard payload as JSON
    Export {
        /// Output directory
        #[arg(long, default_value = "exports")]
        out: PathBuf,

        /// Also write the generated records
        #[arg(long)]
        with_dataset: bool,
    },
    /// Serve the dashboard over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

impl Cli {
    fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level())
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")
}

fn load_scenario(path: &Path) -> Result<Scenario> {
    if !path.exists() && path == Path::new(DEFAULT_SCENARIO) {
        warn!(
            "scenario file {} not found, using built-in Los Angeles scenario",
            path.display()
        );
        return Ok(Scenario::los_angeles());
    }
    let scenario = ScenarioLoader::new(".").load(path)?;
    Ok(scenario)
}

fn print_summary(dashboard: &Dashboard, dataset: &Dataset) {
    let metrics = &dashboard.metrics;
    println!("{}", dashboard.title);
    println!(
        "  Total burned area:      {:.0} acres",
        metrics.total_burned_acres
    );
    println!("  Affected trees:         {}", metrics.affected_trees);
    println!("  Infrastructure at risk: {}", metrics.infrastructure_at_risk);
    println!("  Active fire perimeters: {}", metrics.active_fire_perimeters);

    println!("\nBurned area by severity");
    for (severity, acres) in sum_area_by_severity(&dataset.burn_severity) {
        println!("  {:<8} {:>10.1}", severity.label(), acres);
    }

    println!("\nTree species by severity");
    let table = cross_tabulate(
        &dataset.tree_species,
        |obs| obs.species.clone(),
        |obs| obs.affected_by_severity,
    );
    let columns: Vec<_> = table.columns().copied().collect();
    let header: Vec<String> = columns.iter().map(|c| format!("{:>7}", c.label())).collect();
    println!("  {:<18}{}", "", header.join(""));
    for species in table.rows() {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| format!("{:>7}", table.get(species, c)))
            .collect();
        println!("  {:<18}{}", species, cells.join(""));
    }

    println!("\nInfrastructure status");
    for (status, count) in count_by_status(&dataset.infrastructure) {
        println!("  {:<8} {:>4}", status.label(), count);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut scenario = load_scenario(&cli.scenario)?;
    if let Some(seed) = cli.seed {
        scenario.seed = seed;
    }

    let dataset = DatasetGenerator::new(&scenario).generate();
    let dashboard = Dashboard::build(&dataset, &DashboardSettings::from_scenario(&scenario));

    match cli.command {
        Command::Summary => print_summary(&dashboard, &dataset),
        Command::Export { out, with_dataset } => {
            let exporter = DashboardExporter::new(&out);
            let path = exporter.write(&scenario.name, &dashboard)?;
            if with_dataset {
                exporter.write_dataset(&scenario.name, &dataset)?;
            }
            info!("export complete: {}", path.display());
        }
        Command::Serve { host, port } => {
            web::run(WebServerConfig {
                scenario_name: scenario.name.clone(),
                dashboard,
                host,
                port,
            })
            .await?;
        }
    }
    Ok(())
}
