//! String interning for job identifiers.
//!
//! The graph index and both passes work on dense integer ids; strings only
//! appear at the boundaries (validation input and the final report).

use rustc_hash::FxHashMap;

/// Interned job id (u32 for compact storage and direct vector indexing).
pub type JobIdx = u32;

/// Maps job id strings to dense integers and back.
#[derive(Debug, Clone)]
pub struct JobIdInterner {
    to_int: FxHashMap<String, JobIdx>,
    from_int: Vec<String>,
}

impl JobIdInterner {
    /// Create a new interner with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_int: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            from_int: Vec::with_capacity(capacity),
        }
    }

    /// Build an interner whose integer order matches the lexicographic order of ids.
    pub fn sorted<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mut ids: Vec<&str> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        let mut interner = Self::with_capacity(ids.len());
        for id in ids {
            interner.intern(id);
        }
        interner
    }

    /// Intern a string, returning its integer id.
    /// If already interned, returns the existing id.
    pub fn intern(&mut self, s: &str) -> JobIdx {
        if let Some(&idx) = self.to_int.get(s) {
            return idx;
        }
        let idx = self.from_int.len() as JobIdx;
        self.from_int.push(s.to_string());
        self.to_int.insert(s.to_string(), idx);
        idx
    }

    #[inline]
    pub fn get(&self, s: &str) -> Option<JobIdx> {
        self.to_int.get(s).copied()
    }

    /// Resolve an integer id back to its string.
    #[inline]
    pub fn resolve(&self, idx: JobIdx) -> Option<&str> {
        self.from_int.get(idx as usize).map(String::as_str)
    }

    /// Resolve and sort a set of integer ids, for error messages and logs.
    /// Ids this interner never produced are skipped.
    pub fn resolve_all(&self, idxs: impl IntoIterator<Item = JobIdx>) -> Vec<String> {
        let mut ids: Vec<String> = idxs
            .into_iter()
            .filter_map(|idx| self.resolve(idx).map(str::to_string))
            .collect();
        ids.sort();
        ids
    }

    /// Every interned id with its index, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (JobIdx, &str)> {
        self.from_int
            .iter()
            .enumerate()
            .map(|(i, s)| (i as JobIdx, s.as_str()))
    }

    pub fn len(&self) -> usize {
        self.from_int.len()
    }

    pub fn is_empty(&self) -> bool {
        self.from_int.is_empty()
    }
}

impl Default for JobIdInterner {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}
