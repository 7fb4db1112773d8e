//! Forward pass: topological layering, early start/finish, and row placement.

use crate::config::RowSearch;
use crate::error::{CyclicDependencyError, Pass};
use crate::graph::GraphIndex;
use crate::interner::JobIdx;
use crate::rows::{normalize_rows, RowAssigner};
use crate::{log_debug, log_layers, log_passes};

/// Forward-pass values for a single job.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ForwardTiming {
    pub early_start: f64,
    pub early_finish: f64,
    /// Index of the frontier the job was resolved in.
    pub layer: u32,
    /// Normalized (non-negative) row within the layer.
    pub row: u32,
}

/// Result of the forward pass, indexed by interned job id.
#[derive(Clone, Debug)]
pub struct ForwardPassResult {
    pub timings: Vec<ForwardTiming>,
    /// Jobs of each layer, in processing order.
    pub layers: Vec<Vec<JobIdx>>,
    /// Largest early finish over all jobs.
    pub makespan: f64,
    /// Jobs nothing depends on, in id order.
    pub sinks: Vec<JobIdx>,
}

/// Layer the graph with Kahn's algorithm and compute early times.
///
/// Each frontier holds every unresolved job whose dependencies are all
/// resolved; its jobs are processed in ascending id order so row placement is
/// reproducible. An empty frontier with jobs remaining means the graph has a
/// cycle.
pub fn forward_pass(
    index: &GraphIndex,
    row_search: RowSearch,
    verbosity: u8,
) -> Result<ForwardPassResult, CyclicDependencyError> {
    let n = index.len();
    let mut remaining = index.dependency_counts();
    let mut early_start = vec![0.0_f64; n];
    let mut early_finish = vec![0.0_f64; n];
    let mut layer_of = vec![0_u32; n];
    let mut raw_rows = vec![0_i64; n];
    let mut resolved = vec![false; n];

    let mut rows = RowAssigner::new(row_search);
    let mut layers: Vec<Vec<JobIdx>> = Vec::new();
    let mut makespan = 0.0_f64;
    let mut completed = 0usize;

    let mut frontier = index.roots();

    while completed < n {
        if frontier.is_empty() {
            let stuck = index.indices().filter(|&idx| !resolved[idx as usize]);
            return Err(CyclicDependencyError {
                pass: Pass::Forward,
                job_ids: index.ids.resolve_all(stuck),
            });
        }

        let layer = layers.len() as u32;
        log_layers!(
            verbosity,
            "forward layer {}: {:?}",
            layer,
            index.ids.resolve_all(frontier.iter().copied())
        );

        rows.begin_layer();
        for &job in &frontier {
            let i = job as usize;
            let deps = &index.deps[i];

            let start = deps
                .iter()
                .map(|&dep| early_finish[dep as usize])
                .fold(0.0_f64, f64::max);
            early_start[i] = start;
            early_finish[i] = start + index.durations[i];
            makespan = makespan.max(early_finish[i]);

            layer_of[i] = layer;
            let row = rows.assign(deps.iter().map(|&dep| raw_rows[dep as usize]));
            raw_rows[i] = row;
            resolved[i] = true;

            log_debug!(
                verbosity,
                "  {}: es={} ef={} row={}",
                index.ids.resolve(job).unwrap_or("?"),
                early_start[i],
                early_finish[i],
                raw_rows[i]
            );
        }
        completed += frontier.len();

        let mut next = Vec::new();
        for &job in &frontier {
            for &dependent in &index.dependents[job as usize] {
                let count = &mut remaining[dependent as usize];
                *count -= 1;
                if *count == 0 {
                    next.push(dependent);
                }
            }
        }
        next.sort_unstable();

        layers.push(std::mem::replace(&mut frontier, next));
    }

    let rows = normalize_rows(&raw_rows);
    let timings = (0..n)
        .map(|i| ForwardTiming {
            early_start: early_start[i],
            early_finish: early_finish[i],
            layer: layer_of[i],
            row: rows[i],
        })
        .collect();

    log_passes!(
        verbosity,
        "forward pass: {} jobs in {} layers, makespan {}",
        n,
        layers.len(),
        makespan
    );

    Ok(ForwardPassResult {
        timings,
        layers,
        makespan,
        sinks: index.sinks(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobSpec;

    fn make_job(id: &str, duration: f64, deps: &[&str]) -> JobSpec {
        JobSpec::new(id, duration).depends_on(deps.iter().copied())
    }

    fn run(jobs: &[JobSpec], search: RowSearch) -> (GraphIndex, ForwardPassResult) {
        let index = GraphIndex::build(jobs).unwrap();
        let result = forward_pass(&index, search, 0).unwrap();
        (index, result)
    }

    fn timing<'a>(
        index: &GraphIndex,
        result: &'a ForwardPassResult,
        id: &str,
    ) -> &'a ForwardTiming {
        &result.timings[index.ids.get(id).unwrap() as usize]
    }

    #[test]
    fn test_chain() {
        let jobs = vec![
            make_job("a", 2.0, &[]),
            make_job("b", 3.0, &["a"]),
            make_job("c", 4.0, &["b"]),
        ];
        let (index, result) = run(&jobs, RowSearch::Centered);

        assert_eq!(result.makespan, 9.0);
        let c = timing(&index, &result, "c");
        assert_eq!((c.early_start, c.early_finish, c.layer, c.row), (5.0, 9.0, 2, 0));
        assert_eq!(result.layers.len(), 3);
        assert_eq!(result.sinks, vec![index.ids.get("c").unwrap()]);
    }

    #[test]
    fn test_early_start_is_latest_dependency_finish() {
        // a (2) and b (5) both feed target
        let jobs = vec![
            make_job("a", 2.0, &[]),
            make_job("b", 5.0, &[]),
            make_job("target", 1.0, &["a", "b"]),
        ];
        let (index, result) = run(&jobs, RowSearch::Centered);

        let target = timing(&index, &result, "target");
        assert_eq!(target.early_start, 5.0);
        assert_eq!(target.early_finish, 6.0);
        assert_eq!(target.layer, 1);
    }

    #[test]
    fn test_layer_follows_longest_dependency_chain() {
        // x depends on a root directly and on a two-step chain
        let jobs = vec![
            make_job("r", 1.0, &[]),
            make_job("s", 1.0, &["r"]),
            make_job("t", 1.0, &["s"]),
            make_job("x", 1.0, &["r", "t"]),
        ];
        let (index, result) = run(&jobs, RowSearch::Centered);
        assert_eq!(timing(&index, &result, "x").layer, 3);
    }

    #[test]
    fn test_centered_rows_are_normalized() {
        // three children of one root fan out to rows 0, +1, -1
        let jobs = vec![
            make_job("x", 1.0, &[]),
            make_job("a", 1.0, &["x"]),
            make_job("b", 1.0, &["x"]),
            make_job("c", 1.0, &["x"]),
        ];
        let (index, result) = run(&jobs, RowSearch::Centered);

        let rows: Vec<u32> = ["x", "a", "b", "c"]
            .iter()
            .map(|id| timing(&index, &result, id).row)
            .collect();
        assert_eq!(rows, vec![1, 1, 2, 0]);
    }

    #[test]
    fn test_increasing_rows() {
        let jobs = vec![
            make_job("x", 1.0, &[]),
            make_job("a", 1.0, &["x"]),
            make_job("b", 1.0, &["x"]),
            make_job("c", 1.0, &["x"]),
        ];
        let (index, result) = run(&jobs, RowSearch::Increasing);

        let rows: Vec<u32> = ["x", "a", "b", "c"]
            .iter()
            .map(|id| timing(&index, &result, id).row)
            .collect();
        assert_eq!(rows, vec![0, 0, 1, 2]);
    }

    #[test]
    fn test_frontier_processed_in_id_order() {
        // declaration order must not affect placement
        let forward = vec![
            make_job("root", 1.0, &[]),
            make_job("m", 1.0, &["root"]),
            make_job("n", 1.0, &["root"]),
        ];
        let reversed: Vec<JobSpec> = forward.iter().rev().cloned().collect();

        let (index_a, result_a) = run(&forward, RowSearch::Centered);
        let (index_b, result_b) = run(&reversed, RowSearch::Centered);
        for id in ["root", "m", "n"] {
            assert_eq!(
                timing(&index_a, &result_a, id),
                timing(&index_b, &result_b, id)
            );
        }
        assert_eq!(timing(&index_a, &result_a, "m").row, 0);
        assert_eq!(timing(&index_a, &result_a, "n").row, 1);
    }

    #[test]
    fn test_cycle_detected() {
        // root is fine, a and b wait on each other
        let jobs = vec![
            make_job("root", 1.0, &[]),
            make_job("a", 1.0, &["root", "b"]),
            make_job("b", 1.0, &["a"]),
        ];
        let index = GraphIndex::build(&jobs).unwrap();
        let err = forward_pass(&index, RowSearch::Centered, 0).unwrap_err();

        assert_eq!(err.pass, Pass::Forward);
        assert_eq!(err.job_ids, vec!["a", "b"]);
    }
}
