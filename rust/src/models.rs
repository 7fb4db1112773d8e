//! Core data types for the scheduling pipeline.

#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};

/// Slack values closer to zero than this are treated as zero.
pub const TIME_EPSILON: f64 = 1e-9;

/// A job as declared by the input document, before validation.
#[cfg_attr(feature = "python", pyclass)]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub id: String,
    /// Required by validation; optional here so a loader can report it missing.
    #[cfg_attr(feature = "python", pyo3(get, set))]
    #[serde(default)]
    pub duration: Option<f64>,
    #[cfg_attr(feature = "python", pyo3(get, set))]
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[cfg_attr(feature = "python", pyo3(get, set))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl JobSpec {
    pub fn new(id: impl Into<String>, duration: f64) -> Self {
        Self {
            id: id.into(),
            duration: Some(duration),
            dependencies: Vec::new(),
            description: None,
        }
    }

    /// Adds dependencies to this job.
    pub fn depends_on(mut self, deps: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.dependencies.extend(deps.into_iter().map(Into::into));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl JobSpec {
    #[new]
    #[pyo3(signature = (id, duration=None, dependencies=None, description=None))]
    fn py_new(
        id: String,
        duration: Option<f64>,
        dependencies: Option<Vec<String>>,
        description: Option<String>,
    ) -> Self {
        Self {
            id,
            duration,
            dependencies: dependencies.unwrap_or_default(),
            description,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "JobSpec(id={:?}, duration={:?}, deps={})",
            self.id,
            self.duration,
            self.dependencies.len()
        )
    }
}

/// Per-job timing from the forward and backward passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JobTiming {
    /// Earliest possible start (forward pass).
    pub early_start: f64,
    /// Earliest possible finish (forward pass).
    pub early_finish: f64,
    /// Latest start that does not delay the makespan (backward pass).
    pub late_start: f64,
    /// Latest finish that does not delay the makespan (backward pass).
    pub late_finish: f64,
    /// late_start - early_start.
    pub slack: f64,
}

impl JobTiming {
    pub fn is_critical(&self) -> bool {
        self.slack.abs() < TIME_EPSILON
    }
}

/// A fully annotated job, as handed to the renderer.
#[cfg_attr(feature = "python", pyclass(get_all))]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub duration: f64,
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub early_start: f64,
    pub early_finish: f64,
    pub late_start: f64,
    pub late_finish: f64,
    pub slack: f64,
    /// Horizontal position: index of the forward-pass frontier.
    pub layer: u32,
    /// Vertical position within the layer.
    pub row: u32,
    pub is_critical: bool,
    /// No dependencies.
    pub is_root: bool,
    /// No dependents.
    pub is_sink: bool,
}

impl Job {
    pub fn timing(&self) -> JobTiming {
        JobTiming {
            early_start: self.early_start,
            early_finish: self.early_finish,
            late_start: self.late_start,
            late_finish: self.late_finish,
            slack: self.slack,
        }
    }

    /// Strip the computed attributes, keeping what the input declared.
    pub fn to_spec(&self) -> JobSpec {
        JobSpec {
            id: self.id.clone(),
            duration: Some(self.duration),
            dependencies: self.dependencies.clone(),
            description: self.description.clone(),
        }
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl Job {
    fn __repr__(&self) -> String {
        format!(
            "Job(id={:?}, es={}, ef={}, ls={}, lf={}, slack={})",
            self.id,
            self.early_start,
            self.early_finish,
            self.late_start,
            self.late_finish,
            self.slack
        )
    }
}
