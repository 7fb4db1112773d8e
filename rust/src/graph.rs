//! Adjacency index over a validated job set.
//!
//! Built once and shared by both passes. All lookups use direct vector
//! indexing on interned ids, and interned order equals lexicographic id
//! order, so sorting a frontier by index sorts it by id.

use crate::error::{ValidationError, ValidationRule, Violation};
use crate::interner::{JobIdInterner, JobIdx};
use crate::models::JobSpec;

/// Dependency and dependent lists for every job, indexed by interned id.
#[derive(Debug, Clone)]
pub struct GraphIndex {
    /// Job id string <-> integer mapping.
    pub ids: JobIdInterner,
    pub durations: Vec<f64>,
    /// Dependencies of each job, in declaration order.
    pub deps: Vec<Vec<JobIdx>>,
    /// Jobs that list each job as a dependency, in ascending index order.
    pub dependents: Vec<Vec<JobIdx>>,
    pub descriptions: Vec<Option<String>>,
}

impl GraphIndex {
    /// Build the index from validated specs.
    ///
    /// Duplicate ids, unusable durations and dependencies on unknown ids are
    /// reported rather than dropped, so an unvalidated job set cannot silently
    /// lose jobs or edges.
    pub fn build(jobs: &[JobSpec]) -> Result<Self, ValidationError> {
        let ids = JobIdInterner::sorted(jobs.iter().map(|job| job.id.as_str()));
        let n = ids.len();

        let mut durations = vec![0.0; n];
        let mut deps: Vec<Vec<JobIdx>> = vec![Vec::new(); n];
        let mut dependents: Vec<Vec<JobIdx>> = vec![Vec::new(); n];
        let mut descriptions = vec![None; n];
        let mut indexed = vec![false; n];
        let mut duplicates = Vec::new();
        let mut bad_durations = Vec::new();
        let mut dangling = Vec::new();

        for job in jobs {
            let Some(idx) = ids.get(&job.id) else {
                continue;
            };
            let i = idx as usize;
            if std::mem::replace(&mut indexed[i], true) {
                duplicates.push(job.id.clone());
                continue;
            }
            match job.duration {
                Some(d) if d.is_finite() && d > 0.0 => durations[i] = d,
                _ => bad_durations.push(job.id.clone()),
            }
            descriptions[i] = job.description.clone();

            for dep in &job.dependencies {
                match ids.get(dep) {
                    Some(dep_idx) => {
                        deps[i].push(dep_idx);
                        dependents[dep_idx as usize].push(idx);
                    }
                    None => dangling.push(job.id.clone()),
                }
            }
        }

        let violations: Vec<Violation> = [
            (ValidationRule::DuplicateId, duplicates),
            (ValidationRule::UnknownDependency, dangling),
            (ValidationRule::InvalidDuration, bad_durations),
        ]
        .into_iter()
        .filter(|(_, job_ids)| !job_ids.is_empty())
        .map(|(rule, mut job_ids)| {
            job_ids.sort();
            job_ids.dedup();
            Violation { rule, job_ids }
        })
        .collect();
        if !violations.is_empty() {
            return Err(ValidationError { violations });
        }

        for list in &mut dependents {
            list.sort_unstable();
        }

        Ok(Self {
            ids,
            durations,
            deps,
            dependents,
            descriptions,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[inline]
    pub fn dependency_count(&self, idx: JobIdx) -> usize {
        self.deps[idx as usize].len()
    }

    #[inline]
    pub fn dependent_count(&self, idx: JobIdx) -> usize {
        self.dependents[idx as usize].len()
    }

    /// Remaining-dependency counters for the forward pass.
    pub fn dependency_counts(&self) -> Vec<usize> {
        self.deps.iter().map(Vec::len).collect()
    }

    /// Remaining-dependent counters for the backward pass.
    pub fn dependent_counts(&self) -> Vec<usize> {
        self.dependents.iter().map(Vec::len).collect()
    }

    /// Jobs with no dependencies, in id order.
    pub fn roots(&self) -> Vec<JobIdx> {
        self.indices()
            .filter(|&idx| self.dependency_count(idx) == 0)
            .collect()
    }

    /// Jobs nothing depends on, in id order.
    pub fn sinks(&self) -> Vec<JobIdx> {
        self.indices()
            .filter(|&idx| self.dependent_count(idx) == 0)
            .collect()
    }

    pub fn indices(&self) -> impl Iterator<Item = JobIdx> {
        0..self.len() as JobIdx
    }
}
