//! Error types for the scheduling pipeline.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Rules checked by the validator before any computation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValidationRule {
    /// Two jobs share the same id.
    DuplicateId,
    /// A job lists itself as a dependency.
    SelfDependency,
    /// No job has an empty dependency list.
    NoRootJob,
    /// A dependency names a job that is not in the schedule.
    UnknownDependency,
    /// A duration is missing, non-finite, or not greater than zero.
    InvalidDuration,
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::DuplicateId => "duplicate job id",
            Self::SelfDependency => "job depends on itself",
            Self::NoRootJob => {
                "no root job (a job with no dependencies); the schedule is cyclic or incomplete"
            }
            Self::UnknownDependency => "dependency not present in the schedule",
            Self::InvalidDuration => "duration missing or not greater than zero",
        };
        f.write_str(text)
    }
}

/// One violated rule and the jobs that violate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub rule: ValidationRule,
    /// Offending job ids, sorted. Empty for global rules such as `NoRootJob`.
    pub job_ids: Vec<String>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.job_ids.is_empty() {
            write!(f, "{}", self.rule)
        } else {
            write!(f, "{}: {}", self.rule, self.job_ids.join(", "))
        }
    }
}

/// Every violation found in a job set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// Whether `rule` is among the violations.
    pub fn has_rule(&self, rule: ValidationRule) -> bool {
        self.violations.iter().any(|v| v.rule == rule)
    }

    /// Job ids reported for `rule`, if it was violated.
    pub fn job_ids(&self, rule: ValidationRule) -> Option<&[String]> {
        self.violations
            .iter()
            .find(|v| v.rule == rule)
            .map(|v| v.job_ids.as_slice())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid schedule")?;
        for (i, violation) in self.violations.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}", sep, violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Which layering pass failed to make progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Pass {
    Forward,
    Backward,
}

/// A layering pass found no frontier while jobs were still unresolved.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("cyclic dependency detected in {pass:?} pass; unschedulable jobs: {}", .job_ids.join(", "))]
pub struct CyclicDependencyError {
    pub pass: Pass,
    /// Jobs that could not be scheduled, sorted.
    pub job_ids: Vec<String>,
}

/// Errors that abort the scheduling pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    CyclicDependency(#[from] CyclicDependencyError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Date out of range for job {job_id}")]
    DateOutOfRange { job_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_every_violation() {
        let err = ValidationError {
            violations: vec![
                Violation {
                    rule: ValidationRule::UnknownDependency,
                    job_ids: vec!["a".to_string(), "b".to_string()],
                },
                Violation {
                    rule: ValidationRule::NoRootJob,
                    job_ids: vec![],
                },
            ],
        };

        let message = err.to_string();
        assert!(message.contains("dependency not present in the schedule: a, b"));
        assert!(message.contains("no root job"));
        assert!(err.has_rule(ValidationRule::NoRootJob));
        assert!(!err.has_rule(ValidationRule::DuplicateId));
        assert_eq!(
            err.job_ids(ValidationRule::UnknownDependency),
            Some(&["a".to_string(), "b".to_string()][..])
        );
    }

    #[test]
    fn test_cycle_error_message_names_jobs() {
        let err = ScheduleError::from(CyclicDependencyError {
            pass: Pass::Forward,
            job_ids: vec!["a".to_string(), "b".to_string()],
        });
        assert_eq!(
            err.to_string(),
            "cyclic dependency detected in Forward pass; unschedulable jobs: a, b"
        );
    }
}
