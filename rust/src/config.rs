//! Configuration types for the scheduling pipeline.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Direction in which the row assigner searches for a free row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowSearch {
    /// Try `0, +1, -1, +2, -2, ...` around the anchor row; rows are
    /// normalized afterwards so none is negative.
    #[default]
    Centered,
    /// Try `0, +1, +2, ...` below the anchor row.
    Increasing,
}

impl RowSearch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Centered => "centered",
            Self::Increasing => "increasing",
        }
    }
}

impl fmt::Display for RowSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RowSearch {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "centered" => Ok(Self::Centered),
            "increasing" => Ok(Self::Increasing),
            other => Err(ScheduleError::InvalidConfig(format!(
                "Unknown row search policy: {}",
                other
            ))),
        }
    }
}

/// Configuration for a single pipeline run.
#[cfg_attr(feature = "python", pyclass)]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Row placement policy within a layer.
    pub row_search: RowSearch,
    /// Horizontal distance between consecutive layers, in renderer units.
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub layer_spacing: f64,
    /// Vertical distance between consecutive rows, in renderer units.
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub row_spacing: f64,
    /// Verbosity level: 0=silent, 1=passes, 2=layers, 3=debug.
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub verbosity: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            row_search: RowSearch::Centered,
            layer_spacing: 160.0,
            row_spacing: 160.0,
            verbosity: 0,
        }
    }
}

impl PipelineConfig {
    /// Reject spacing values that cannot produce a usable layout.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        for (name, value) in [
            ("layer_spacing", self.layer_spacing),
            ("row_spacing", self.row_spacing),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ScheduleError::InvalidConfig(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl PipelineConfig {
    #[new]
    #[pyo3(signature = (row_search=None, layer_spacing=None, row_spacing=None, verbosity=None))]
    fn py_new(
        row_search: Option<&str>,
        layer_spacing: Option<f64>,
        row_spacing: Option<f64>,
        verbosity: Option<u8>,
    ) -> PyResult<Self> {
        let defaults = Self::default();
        let row_search = match row_search {
            Some(name) => name
                .parse()
                .map_err(|e: ScheduleError| pyo3::exceptions::PyValueError::new_err(e.to_string()))?,
            None => defaults.row_search,
        };
        Ok(Self {
            row_search,
            layer_spacing: layer_spacing.unwrap_or(defaults.layer_spacing),
            row_spacing: row_spacing.unwrap_or(defaults.row_spacing),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        })
    }

    #[getter(row_search)]
    fn py_row_search(&self) -> &'static str {
        self.row_search.as_str()
    }

    fn __repr__(&self) -> String {
        format!(
            "PipelineConfig(row_search={:?}, layer_spacing={}, row_spacing={})",
            self.row_search.as_str(),
            self.layer_spacing,
            self.row_spacing
        )
    }
}
