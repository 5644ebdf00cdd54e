//! Dashboard configuration.
//!
//! Values are layered: built-in defaults, then a YAML file, then the
//! environment. Front ends apply their own flags on top.

use crate::error::{GestaoError, GestaoResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "gestao.yaml";

/// Environment variable overriding the workbook path.
pub const WORKBOOK_ENV: &str = "GESTAO_WORKBOOK";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetNames {
    /// Debit note control sheet, shared by the NDs and chart pages
    pub nds: String,
    pub analistas: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            nds: "Controle NDs".to_string(),
            analistas: "Analistas EIC²".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSize {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub workbook: PathBuf,
    pub sheets: SheetNames,
    /// Columns left out of the NDs detail table and its export
    pub hidden_columns: Vec<String>,
    pub chart: ChartSize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            workbook: PathBuf::from("APP Gestão.xlsx"),
            sheets: SheetNames::default(),
            hidden_columns: vec![
                "Empresa".to_string(),
                "Conta Destino".to_string(),
                "Aprovador".to_string(),
            ],
            chart: ChartSize::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_yaml_str(text: &str) -> GestaoResult<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a YAML file. Missing keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> GestaoResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            GestaoError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Defaults, then `explicit` or `gestao.yaml` when present, then the
    /// environment.
    ///
    /// An explicit path that does not exist is an error; a missing
    /// `gestao.yaml` is not.
    pub fn resolve(explicit: Option<&Path>) -> GestaoResult<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(workbook) = lookup(WORKBOOK_ENV).filter(|v| !v.trim().is_empty()) {
            self.workbook = PathBuf::from(workbook);
        }
    }

    #[must_use]
    pub fn with_workbook(mut self, workbook: impl Into<PathBuf>) -> Self {
        self.workbook = workbook.into();
        self
    }

    fn validate(&self) -> GestaoResult<()> {
        if self.workbook.as_os_str().is_empty() {
            return Err(GestaoError::Config("workbook path is empty".to_string()));
        }
        if self.sheets.nds.trim().is_empty() || self.sheets.analistas.trim().is_empty() {
            return Err(GestaoError::Config("sheet names must not be empty".to_string()));
        }
        if self.chart.width == 0 || self.chart.height == 0 {
            return Err(GestaoError::Config("chart size must be positive".to_string()));
        }
        Ok(())
    }
}
