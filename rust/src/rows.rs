//! Row placement within a layer.
//!
//! A job is anchored at the smallest row among its dependencies (row 0 for
//! roots) and placed on the nearest free row of its layer, searching in the
//! direction given by [`RowSearch`].

use rustc_hash::FxHashSet;

use crate::config::RowSearch;

/// Places the jobs of one layer at a time into collision-free rows.
#[derive(Debug, Clone)]
pub struct RowAssigner {
    search: RowSearch,
    used: FxHashSet<i64>,
}

impl RowAssigner {
    pub fn new(search: RowSearch) -> Self {
        Self {
            search,
            used: FxHashSet::default(),
        }
    }

    /// Start a new layer; rows used by the previous layer become free again.
    pub fn begin_layer(&mut self) {
        self.used.clear();
    }

    /// Assign a row to a job whose dependencies sit on `dependency_rows`.
    pub fn assign(&mut self, dependency_rows: impl IntoIterator<Item = i64>) -> i64 {
        let anchor = dependency_rows.into_iter().min().unwrap_or(0);
        let row = self
            .candidates(anchor)
            .find(|row| !self.used.contains(row))
            .unwrap_or(anchor);
        self.used.insert(row);
        row
    }

    /// Candidate rows in search order. Unbounded; the first free one wins.
    fn candidates(&self, anchor: i64) -> impl Iterator<Item = i64> {
        let search = self.search;
        (0i64..).flat_map(move |offset| {
            let below = anchor + offset;
            let above = match search {
                RowSearch::Centered if offset > 0 => Some(anchor - offset),
                _ => None,
            };
            std::iter::once(below).chain(above)
        })
    }
}

/// Shift rows so the smallest is zero when any row is negative.
pub fn normalize_rows(rows: &[i64]) -> Vec<u32> {
    let shift = match rows.iter().min() {
        Some(&min) if min < 0 => -min,
        _ => 0,
    };
    rows.iter().map(|&row| (row + shift) as u32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_starts_at_zero() {
        let mut rows = RowAssigner::new(RowSearch::Centered);
        assert_eq!(rows.assign([]), 0);
    }

    #[test]
    fn test_centered_alternates_around_anchor() {
        let mut rows = RowAssigner::new(RowSearch::Centered);
        let placed: Vec<i64> = (0..5).map(|_| rows.assign([0])).collect();
        assert_eq!(placed, vec![0, 1, -1, 2, -2]);
    }

    #[test]
    fn test_increasing_only_moves_down() {
        let mut rows = RowAssigner::new(RowSearch::Increasing);
        let placed: Vec<i64> = (0..4).map(|_| rows.assign([3])).collect();
        assert_eq!(placed, vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_anchor_is_minimum_dependency_row() {
        let mut rows = RowAssigner::new(RowSearch::Centered);
        assert_eq!(rows.assign([4, 2, 7]), 2);
        assert_eq!(rows.assign([2, 9]), 3);
    }

    #[test]
    fn test_begin_layer_frees_rows() {
        let mut rows = RowAssigner::new(RowSearch::Increasing);
        assert_eq!(rows.assign([]), 0);
        assert_eq!(rows.assign([]), 1);
        rows.begin_layer();
        assert_eq!(rows.assign([]), 0);
    }

    #[test]
    fn test_normalize_rows() {
        assert_eq!(normalize_rows(&[0, 1, -1, -2]), vec![2, 3, 1, 0]);
        assert_eq!(normalize_rows(&[0, 3, 1]), vec![0, 3, 1]);
        assert!(normalize_rows(&[]).is_empty());
    }
}
