//! Input validation for job sets.
//!
//! Checks structural and data invariants before any pass runs:
//! - Duplicate job ids
//! - Self dependencies
//! - Missing root job
//! - Dependencies on jobs outside the schedule
//! - Missing or non-positive durations
//!
//! Every rule is evaluated and every offender reported, so a caller can fix
//! the whole input in one round trip. Dependency lists are deduplicated as a
//! side effect.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{ValidationError, ValidationRule, Violation};
use crate::models::JobSpec;

/// Validate a raw job set, returning it with deduplicated dependency lists.
pub fn validate_jobs(mut jobs: Vec<JobSpec>) -> Result<Vec<JobSpec>, ValidationError> {
    for job in &mut jobs {
        dedup_dependencies(&mut job.dependencies);
    }

    let mut violations = Vec::new();

    let mut seen: FxHashMap<&str, usize> =
        FxHashMap::with_capacity_and_hasher(jobs.len(), Default::default());
    for job in &jobs {
        *seen.entry(job.id.as_str()).or_insert(0) += 1;
    }
    push_violation(
        &mut violations,
        ValidationRule::DuplicateId,
        seen.iter()
            .filter(|(_, &count)| count > 1)
            .map(|(&id, _)| id),
    );

    push_violation(
        &mut violations,
        ValidationRule::SelfDependency,
        jobs.iter()
            .filter(|job| job.dependencies.iter().any(|dep| *dep == job.id))
            .map(|job| job.id.as_str()),
    );

    if !jobs.iter().any(|job| job.dependencies.is_empty()) {
        violations.push(Violation {
            rule: ValidationRule::NoRootJob,
            job_ids: Vec::new(),
        });
    }

    push_violation(
        &mut violations,
        ValidationRule::UnknownDependency,
        jobs.iter()
            .filter(|job| {
                job.dependencies
                    .iter()
                    .any(|dep| !seen.contains_key(dep.as_str()))
            })
            .map(|job| job.id.as_str()),
    );

    push_violation(
        &mut violations,
        ValidationRule::InvalidDuration,
        jobs.iter()
            .filter(|job| !is_valid_duration(job.duration))
            .map(|job| job.id.as_str()),
    );

    if violations.is_empty() {
        Ok(jobs)
    } else {
        Err(ValidationError { violations })
    }
}

fn is_valid_duration(duration: Option<f64>) -> bool {
    matches!(duration, Some(d) if d.is_finite() && d > 0.0)
}

/// Remove repeated dependencies, keeping the first occurrence of each.
fn dedup_dependencies(deps: &mut Vec<String>) {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    deps.retain(|dep| seen.insert(dep.clone()));
}

fn push_violation<'a>(
    violations: &mut Vec<Violation>,
    rule: ValidationRule,
    offenders: impl Iterator<Item = &'a str>,
) {
    let mut job_ids: Vec<String> = offenders.map(str::to_string).collect();
    if job_ids.is_empty() {
        return;
    }
    job_ids.sort();
    job_ids.dedup();
    violations.push(Violation { rule, job_ids });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_job(id: &str, duration: f64, deps: &[&str]) -> JobSpec {
        JobSpec::new(id, duration).depends_on(deps.iter().copied())
    }

    #[test]
    fn test_valid_jobs_pass_through() {
        let jobs = vec![make_job("a", 1.0, &[]), make_job("b", 2.0, &["a"])];
        let validated = validate_jobs(jobs.clone()).unwrap();
        assert_eq!(validated, jobs);
    }

    #[test]
    fn test_dependencies_deduplicated() {
        let jobs = vec![
            make_job("a", 1.0, &[]),
            make_job("b", 1.0, &[]),
            make_job("c", 1.0, &["b", "a", "b", "a"]),
        ];
        let validated = validate_jobs(jobs).unwrap();
        assert_eq!(validated[2].dependencies, vec!["b", "a"]);
    }

    #[test]
    fn test_duplicate_id() {
        let jobs = vec![
            make_job("a", 1.0, &[]),
            make_job("b", 1.0, &["a"]),
            make_job("a", 2.0, &[]),
        ];
        let err = validate_jobs(jobs).unwrap_err();
        assert_eq!(
            err.job_ids(ValidationRule::DuplicateId),
            Some(&["a".to_string()][..])
        );
    }

    #[test]
    fn test_self_dependency() {
        let jobs = vec![make_job("root", 1.0, &[]), make_job("a", 1.0, &["a"])];
        let err = validate_jobs(jobs).unwrap_err();
        assert_eq!(
            err.job_ids(ValidationRule::SelfDependency),
            Some(&["a".to_string()][..])
        );
    }

    #[test]
    fn test_no_root_job() {
        let jobs = vec![make_job("a", 1.0, &["b"]), make_job("b", 1.0, &["a"])];
        let err = validate_jobs(jobs).unwrap_err();
        assert!(err.has_rule(ValidationRule::NoRootJob));
        assert_eq!(err.job_ids(ValidationRule::NoRootJob), Some(&[][..]));
    }

    #[test]
    fn test_empty_job_set_has_no_root() {
        let err = validate_jobs(Vec::new()).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].rule, ValidationRule::NoRootJob);
    }

    #[test]
    fn test_unknown_dependencies_all_listed() {
        let jobs = vec![
            make_job("a", 1.0, &[]),
            make_job("b", 1.0, &["ghost"]),
            make_job("c", 1.0, &["a", "phantom"]),
            make_job("d", 1.0, &["a"]),
        ];
        let err = validate_jobs(jobs).unwrap_err();
        assert_eq!(
            err.job_ids(ValidationRule::UnknownDependency),
            Some(&["b".to_string(), "c".to_string()][..])
        );
    }

    #[test]
    fn test_invalid_durations_all_listed() {
        let mut missing = make_job("missing", 1.0, &[]);
        missing.duration = None;
        let jobs = vec![
            make_job("ok", 1.0, &[]),
            make_job("zero", 0.0, &[]),
            make_job("negative", -3.0, &[]),
            make_job("nan", f64::NAN, &[]),
            make_job("inf", f64::INFINITY, &[]),
            missing,
        ];
        let err = validate_jobs(jobs).unwrap_err();
        assert_eq!(
            err.job_ids(ValidationRule::InvalidDuration).unwrap(),
            &["inf", "missing", "nan", "negative", "zero"]
        );
    }

    #[test]
    fn test_fractional_duration_accepted() {
        let jobs = vec![make_job("a", 0.5, &[])];
        assert!(validate_jobs(jobs).is_ok());
    }

    #[test]
    fn test_all_rules_reported_together() {
        let jobs = vec![
            make_job("a", 0.0, &["a"]),
            make_job("b", 1.0, &["nowhere"]),
        ];
        let err = validate_jobs(jobs).unwrap_err();
        let rules: Vec<ValidationRule> = err.violations.iter().map(|v| v.rule).collect();
        assert_eq!(
            rules,
            vec![
                ValidationRule::SelfDependency,
                ValidationRule::NoRootJob,
                ValidationRule::UnknownDependency,
                ValidationRule::InvalidDuration,
            ]
        );
    }
}
