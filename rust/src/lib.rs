//! Critical path scheduling and diagram layout for job dependency graphs.
//!
//! Turns a set of jobs with durations and dependencies into a fully annotated
//! schedule: early/late start and finish, slack, critical path membership, and
//! a `(layer, row)` coordinate per job for a diagram renderer.
//!
//! The pipeline runs validation, builds the graph index, then the forward
//! pass (with row placement) and the backward pass. Any failure aborts the
//! whole run; a [`ScheduleReport`] is only produced when every stage succeeds.

// Allow clippy warning triggered by PyO3 macro expansion
#![cfg_attr(feature = "python", allow(clippy::useless_conversion))]

#[cfg(feature = "python")]
use pyo3::prelude::*;

pub mod backward_pass;
mod config;
mod error;
pub mod forward_pass;
pub mod graph;
pub mod interner;
pub mod logging;
mod models;
mod report;
pub mod rows;
pub mod validation;

pub use backward_pass::{backward_pass, BackwardPassResult};
pub use config::{PipelineConfig, RowSearch};
pub use error::{
    CyclicDependencyError, Pass, ScheduleError, ValidationError, ValidationRule, Violation,
};
pub use forward_pass::{forward_pass, ForwardPassResult, ForwardTiming};
pub use graph::GraphIndex;
pub use models::{Job, JobSpec, JobTiming, TIME_EPSILON};
pub use report::{JobDates, ScheduleReport};
pub use validation::validate_jobs;

/// Run the full scheduling pipeline.
///
/// This algorithm:
/// 1. Validates the job set, deduplicating dependency lists
/// 2. Layers the graph forward, computing early times and rows
/// 3. Layers the graph backward from the sinks, computing late times and slack
///
/// # Arguments
/// * `jobs` - Raw job declarations
/// * `config` - Row placement policy, spacing, and verbosity
///
/// # Returns
/// * `Ok(ScheduleReport)` with every job annotated
/// * `Err(ScheduleError::Validation)` listing every violated rule and job
/// * `Err(ScheduleError::CyclicDependency)` naming the jobs caught in a cycle
pub fn schedule(
    jobs: Vec<JobSpec>,
    config: &PipelineConfig,
) -> Result<ScheduleReport, ScheduleError> {
    config.validate()?;

    let jobs = validate_jobs(jobs)?;
    log_passes!(config.verbosity, "validated {} jobs", jobs.len());

    let index = GraphIndex::build(&jobs)?;
    let forward = forward_pass(&index, config.row_search, config.verbosity)?;
    let backward = backward_pass(&index, &forward, config.verbosity)?;

    Ok(ScheduleReport::assemble(&index, &forward, &backward, config))
}

/// Run the scheduling pipeline from Python.
///
/// # Raises
/// * ValueError if the job set is invalid, cyclic, or the options are invalid
#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(signature = (jobs, row_search="centered", layer_spacing=160.0, row_spacing=160.0, verbosity=0))]
fn run_schedule(
    jobs: Vec<JobSpec>,
    row_search: &str,
    layer_spacing: f64,
    row_spacing: f64,
    verbosity: u8,
) -> PyResult<ScheduleReport> {
    let to_py_err = |e: ScheduleError| pyo3::exceptions::PyValueError::new_err(e.to_string());
    let config = PipelineConfig {
        row_search: row_search.parse().map_err(to_py_err)?,
        layer_spacing,
        row_spacing,
        verbosity,
    };
    schedule(jobs, &config).map_err(to_py_err)
}

/// Run the scheduling pipeline from Python with an explicit configuration.
#[cfg(feature = "python")]
#[pyfunction]
fn run_schedule_with_config(
    jobs: Vec<JobSpec>,
    config: PipelineConfig,
) -> PyResult<ScheduleReport> {
    schedule(jobs, &config).map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}

/// The pert.rust Python module.
#[cfg(feature = "python")]
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core data types
    m.add_class::<JobSpec>()?;
    m.add_class::<Job>()?;
    m.add_class::<ScheduleReport>()?;

    // Config types
    m.add_class::<PipelineConfig>()?;

    // Pipeline
    m.add_function(wrap_pyfunction!(run_schedule, m)?)?;
    m.add_function(wrap_pyfunction!(run_schedule_with_config, m)?)?;

    Ok(())
}
