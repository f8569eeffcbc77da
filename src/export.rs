use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::{dashboard::Dashboard, model::Dataset};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode {what}: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Writes dashboard payloads under `<output_dir>/<scenario>/`.
pub struct DashboardExporter {
    output_dir: PathBuf,
}

impl DashboardExporter {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn write(&self, scenario_name: &str, dashboard: &Dashboard) -> Result<PathBuf, ExportError> {
        self.write_json(scenario_name, "dashboard.json", "dashboard", dashboard)
    }

    /// Raw generated records, for inspection next to the dashboard payload.
    pub fn write_dataset(&self, scenario_name: &str, dataset: &Dataset) -> Result<PathBuf, ExportError> {
        self.write_json(scenario_name, "dataset.json", "dataset", dataset)
    }

    fn write_json<T: Serialize>(
        &self,
        scenario_name: &str,
        file_name: &str,
        what: &'static str,
        value: &T,
    ) -> Result<PathBuf, ExportError> {
        let dir = self.output_dir.join(scenario_name);
        fs::create_dir_all(&dir).map_err(|source| ExportError::Io {
            path: dir.clone(),
            source,
        })?;
        let path = dir.join(file_name);
        let json = serde_json::to_string_pretty(value)
            .map_err(|source| ExportError::Encode { what, source })?;
        fs::write(&path, json).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "{what} written");
        Ok(path)
    }
}
