//! Logging macros for the scheduling pipeline with verbosity level control.
//!
//! Provides zero-cost logging when disabled (verbosity=0).
//! Verbosity levels:
//! - 0: SILENT (nothing)
//! - 1: PASSES (one summary line per pass)
//! - 2: LAYERS (every frontier as it is resolved)
//! - 3: DEBUG (per-job timing and row decisions)

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_PASSES: u8 = 1;
pub const VERBOSITY_LAYERS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at PASSES level (verbosity >= 1).
///
/// Used for: pass summaries such as layer count and makespan.
#[macro_export]
macro_rules! log_passes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_PASSES {
            eprintln!($($arg)*);
        }
    };
}

/// Log at LAYERS level (verbosity >= 2).
///
/// Used for: frontier membership in the forward and backward passes.
#[macro_export]
macro_rules! log_layers {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_LAYERS {
            eprintln!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
///
/// Used for: individual job timings and row placement.
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            eprintln!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels_are_ordered() {
        assert!(VERBOSITY_SILENT < VERBOSITY_PASSES);
        assert!(VERBOSITY_PASSES < VERBOSITY_LAYERS);
        assert!(VERBOSITY_LAYERS < VERBOSITY_DEBUG);
    }

    #[test]
    fn test_log_macros_silent() {
        let verbosity = VERBOSITY_SILENT;
        log_passes!(verbosity, "makespan {}", 10.0);
        log_layers!(verbosity, "layer {}: {:?}", 0, ["a"]);
        log_debug!(verbosity, "job {} row {}", "a", 0);
    }
}
