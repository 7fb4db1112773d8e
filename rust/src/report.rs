//! The finished, annotated schedule handed to a renderer.

use chrono::{Duration, NaiveDate};
#[cfg(feature = "python")]
use pyo3::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::backward_pass::BackwardPassResult;
use crate::config::PipelineConfig;
use crate::error::ScheduleError;
use crate::forward_pass::ForwardPassResult;
use crate::graph::GraphIndex;
use crate::models::{Job, JobSpec, TIME_EPSILON};

/// Calendar dates for one job, with one time unit taken as one day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct JobDates {
    pub early_start: NaiveDate,
    pub early_finish: NaiveDate,
    pub late_start: NaiveDate,
    pub late_finish: NaiveDate,
}

impl JobDates {
    /// `(early_start, early_finish, late_start, late_finish)`.
    pub fn as_tuple(&self) -> (NaiveDate, NaiveDate, NaiveDate, NaiveDate) {
        (
            self.early_start,
            self.early_finish,
            self.late_start,
            self.late_finish,
        )
    }
}

/// Read-only view of a fully scheduled job set.
///
/// Jobs are stored in ascending id order.
#[cfg_attr(feature = "python", pyclass)]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScheduleReport {
    jobs: Vec<Job>,
    makespan: f64,
    critical_edges: Vec<(String, String)>,
    layer_spacing: f64,
    row_spacing: f64,
    #[serde(skip)]
    positions: FxHashMap<String, usize>,
}

impl ScheduleReport {
    /// Combine both passes into job records. Only called once both succeeded.
    pub(crate) fn assemble(
        index: &GraphIndex,
        forward: &ForwardPassResult,
        backward: &BackwardPassResult,
        config: &PipelineConfig,
    ) -> Self {
        let jobs: Vec<Job> = index
            .ids
            .iter()
            .map(|(idx, id)| {
                let i = idx as usize;
                let placed = &forward.timings[i];
                let timing = &backward.timings[i];
                Job {
                    id: id.to_string(),
                    duration: index.durations[i],
                    dependencies: index.deps[i]
                        .iter()
                        .filter_map(|&dep| index.ids.resolve(dep).map(str::to_string))
                        .collect(),
                    description: index.descriptions[i].clone(),
                    early_start: timing.early_start,
                    early_finish: timing.early_finish,
                    late_start: timing.late_start,
                    late_finish: timing.late_finish,
                    slack: timing.slack,
                    layer: placed.layer,
                    row: placed.row,
                    is_critical: timing.is_critical(),
                    is_root: index.dependency_count(idx) == 0,
                    is_sink: index.dependent_count(idx) == 0,
                }
            })
            .collect();

        let mut critical_edges = Vec::new();
        for job in jobs.iter().filter(|job| job.is_critical) {
            for dep in &job.dependencies {
                let dep_critical = index
                    .ids
                    .get(dep)
                    .map(|d| jobs[d as usize].is_critical)
                    .unwrap_or(false);
                if dep_critical {
                    critical_edges.push((dep.clone(), job.id.clone()));
                }
            }
        }
        critical_edges.sort();

        Self::from_parts(
            jobs,
            forward.makespan,
            critical_edges,
            config.layer_spacing,
            config.row_spacing,
        )
    }

    fn from_parts(
        jobs: Vec<Job>,
        makespan: f64,
        critical_edges: Vec<(String, String)>,
        layer_spacing: f64,
        row_spacing: f64,
    ) -> Self {
        let positions = jobs
            .iter()
            .enumerate()
            .map(|(pos, job)| (job.id.clone(), pos))
            .collect();
        Self {
            jobs,
            makespan,
            critical_edges,
            layer_spacing,
            row_spacing,
            positions,
        }
    }

    /// All jobs in ascending id order.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn job(&self, id: &str) -> Option<&Job> {
        self.positions.get(id).map(|&pos| &self.jobs[pos])
    }

    /// Total schedule duration: the largest finish time of any job.
    pub fn makespan(&self) -> f64 {
        self.makespan
    }

    /// `(dependency, job)` edges whose endpoints both have zero slack.
    pub fn critical_edges(&self) -> &[(String, String)] {
        &self.critical_edges
    }

    pub fn is_critical_edge(&self, dependency: &str, job: &str) -> bool {
        self.critical_edges
            .binary_search_by(|(d, j)| (d.as_str(), j.as_str()).cmp(&(dependency, job)))
            .is_ok()
    }

    pub fn roots(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter().filter(|job| job.is_root)
    }

    pub fn sinks(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter().filter(|job| job.is_sink)
    }

    pub fn layer_count(&self) -> u32 {
        self.jobs.iter().map(|job| job.layer + 1).max().unwrap_or(0)
    }

    pub fn row_count(&self) -> u32 {
        self.jobs.iter().map(|job| job.row + 1).max().unwrap_or(0)
    }

    /// Renderer coordinates of a job: `(layer * layer_spacing, row * row_spacing)`.
    pub fn position(&self, id: &str) -> Option<(f64, f64)> {
        self.job(id).map(|job| {
            (
                job.layer as f64 * self.layer_spacing,
                job.row as f64 * self.row_spacing,
            )
        })
    }

    /// One root-to-sink chain of critical jobs.
    ///
    /// Starts at the first critical root by id and repeatedly steps to the
    /// first critical dependent that starts exactly when the current job
    /// finishes. Empty only for an empty report.
    pub fn critical_path(&self) -> Vec<&Job> {
        let mut dependents: FxHashMap<&str, Vec<&Job>> = FxHashMap::default();
        for job in &self.jobs {
            for dep in &job.dependencies {
                dependents.entry(dep.as_str()).or_default().push(job);
            }
        }

        let mut path = Vec::new();
        let mut current = self.roots().find(|job| job.is_critical);
        while let Some(job) = current {
            path.push(job);
            current = dependents.get(job.id.as_str()).and_then(|next| {
                next.iter().copied().find(|candidate| {
                    candidate.is_critical
                        && (candidate.early_start - job.early_finish).abs() < TIME_EPSILON
                })
            });
        }
        path
    }

    /// Project the schedule onto calendar dates starting at `start`.
    ///
    /// One time unit is one day. Start offsets round down and finish offsets
    /// round up, so fractional jobs occupy every day they touch.
    pub fn calendar(&self, start: NaiveDate) -> Result<Vec<(String, JobDates)>, ScheduleError> {
        self.jobs
            .iter()
            .map(|job| {
                let date = |offset: f64| -> Result<NaiveDate, ScheduleError> {
                    let days = offset as i64;
                    Duration::try_days(days)
                        .and_then(|delta| start.checked_add_signed(delta))
                        .ok_or_else(|| ScheduleError::DateOutOfRange {
                            job_id: job.id.clone(),
                        })
                };
                let dates = JobDates {
                    early_start: date(job.early_start.floor())?,
                    early_finish: date(job.early_finish.ceil())?,
                    late_start: date(job.late_start.floor())?,
                    late_finish: date(job.late_finish.ceil())?,
                };
                Ok((job.id.clone(), dates))
            })
            .collect()
    }

    /// The declared input of every job, ready to be scheduled again.
    pub fn to_specs(&self) -> Vec<JobSpec> {
        self.jobs.iter().map(Job::to_spec).collect()
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl ScheduleReport {
    #[getter(jobs)]
    fn py_jobs(&self) -> Vec<Job> {
        self.jobs.clone()
    }

    #[getter(makespan)]
    fn py_makespan(&self) -> f64 {
        self.makespan
    }

    #[getter(critical_edges)]
    fn py_critical_edges(&self) -> Vec<(String, String)> {
        self.critical_edges.clone()
    }

    #[pyo3(name = "critical_path")]
    fn py_critical_path(&self) -> Vec<String> {
        self.critical_path()
            .into_iter()
            .map(|job| job.id.clone())
            .collect()
    }

    #[pyo3(name = "position")]
    fn py_position(&self, id: &str) -> Option<(f64, f64)> {
        self.position(id)
    }

    #[pyo3(name = "calendar")]
    fn py_calendar(
        &self,
        start: NaiveDate,
    ) -> PyResult<
        std::collections::HashMap<String, (NaiveDate, NaiveDate, NaiveDate, NaiveDate)>,
    > {
        let dates = self
            .calendar(start)
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;
        Ok(dates
            .into_iter()
            .map(|(id, d)| (id, d.as_tuple()))
            .collect())
    }

    fn __repr__(&self) -> String {
        format!(
            "ScheduleReport(jobs={}, makespan={}, critical_edges={})",
            self.jobs.len(),
            self.makespan,
            self.critical_edges.len()
        )
    }
}
