//! Backward pass: late start/finish and slack over the reverse graph.

use crate::error::{CyclicDependencyError, Pass};
use crate::forward_pass::ForwardPassResult;
use crate::graph::GraphIndex;
use crate::interner::JobIdx;
use crate::models::{JobTiming, TIME_EPSILON};
use crate::{log_debug, log_layers, log_passes};

/// Result from the backward pass, indexed by interned job id.
#[derive(Debug, Clone, PartialEq)]
pub struct BackwardPassResult {
    /// Complete timing for every job.
    pub timings: Vec<JobTiming>,
    /// Number of reverse frontiers it took to finalize every job.
    pub layer_count: usize,
}

/// Compute late start, late finish, and slack for every job.
///
/// Sinks finish at the makespan. Every other job is finalized once all of its
/// dependents are, finishing at the earliest late start among them. The
/// frontier logic mirrors the forward pass with dependents in place of
/// dependencies, so an inconsistent graph is reported instead of looping.
pub fn backward_pass(
    index: &GraphIndex,
    forward: &ForwardPassResult,
    verbosity: u8,
) -> Result<BackwardPassResult, CyclicDependencyError> {
    let n = index.len();
    let makespan = forward.makespan;
    let mut remaining = index.dependent_counts();
    let mut timings: Vec<JobTiming> = forward
        .timings
        .iter()
        .map(|t| JobTiming {
            early_start: t.early_start,
            early_finish: t.early_finish,
            ..JobTiming::default()
        })
        .collect();
    let mut finalized = vec![false; n];
    let mut completed = 0usize;
    let mut layer_count = 0usize;

    // Sinks recorded by the forward pass must still be sinks of this graph
    let mut frontier: Vec<JobIdx> = forward
        .sinks
        .iter()
        .copied()
        .filter(|&sink| remaining[sink as usize] == 0)
        .collect();

    while completed < n {
        if frontier.is_empty() {
            let stuck = index.indices().filter(|&idx| !finalized[idx as usize]);
            return Err(CyclicDependencyError {
                pass: Pass::Backward,
                job_ids: index.ids.resolve_all(stuck),
            });
        }

        log_layers!(
            verbosity,
            "backward layer {}: {:?}",
            layer_count,
            index.ids.resolve_all(frontier.iter().copied())
        );

        for &job in &frontier {
            let i = job as usize;
            let late_finish = index.dependents[i]
                .iter()
                .map(|&dependent| timings[dependent as usize].late_start)
                .reduce(f64::min)
                .unwrap_or(makespan);
            finalize(&mut timings[i], late_finish, index.durations[i]);
            finalized[i] = true;

            log_debug!(
                verbosity,
                "  {}: ls={} lf={} slack={}",
                index.ids.resolve(job).unwrap_or("?"),
                timings[i].late_start,
                timings[i].late_finish,
                timings[i].slack
            );
        }
        completed += frontier.len();
        layer_count += 1;

        let mut next = Vec::new();
        for &job in &frontier {
            for &dep in &index.deps[job as usize] {
                let count = &mut remaining[dep as usize];
                *count -= 1;
                if *count == 0 {
                    next.push(dep);
                }
            }
        }
        next.sort_unstable();
        frontier = next;
    }

    let critical = timings.iter().filter(|t| t.is_critical()).count();
    log_passes!(
        verbosity,
        "backward pass: {} layers, {} of {} jobs critical",
        layer_count,
        critical,
        n
    );

    Ok(BackwardPassResult {
        timings,
        layer_count,
    })
}

fn finalize(timing: &mut JobTiming, late_finish: f64, duration: f64) {
    timing.late_finish = late_finish;
    timing.late_start = late_finish - duration;
    let slack = timing.late_start - timing.early_start;
    // Absorb float noise from fractional durations; a snapped job keeps
    // late == early so slack stays equal to late_start - early_start
    if slack.abs() < TIME_EPSILON {
        timing.late_start = timing.early_start;
        timing.late_finish = timing.early_finish;
        timing.slack = 0.0;
    } else {
        timing.slack = slack;
    }
}
