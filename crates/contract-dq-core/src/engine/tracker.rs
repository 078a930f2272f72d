//! Run-scoped uniqueness state

use std::collections::{HashMap, HashSet};

/// Values seen so far for each `unique` field of a run
///
/// Created at the start of a run, mutated in record order, dropped at the
/// end. A fresh tracker must be used for every run.
#[derive(Debug, Clone, Default)]
pub struct UniquenessTracker {
    seen: HashMap<String, HashSet<String>>,
}

impl UniquenessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value; returns `false` when it was already seen for the field
    pub fn observe(&mut self, field: &str, value: &str) -> bool {
        match self.seen.get_mut(field) {
            Some(values) => {
                if values.contains(value) {
                    false
                } else {
                    values.insert(value.to_string());
                    true
                }
            }
            None => {
                self.seen
                    .insert(field.to_string(), HashSet::from([value.to_string()]));
                true
            }
        }
    }

    /// Number of distinct values seen for the field
    pub fn seen_count(&self, field: &str) -> usize {
        self.seen.get(field).map(HashSet::len).unwrap_or(0)
    }
}
