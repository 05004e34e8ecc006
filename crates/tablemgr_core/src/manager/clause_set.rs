use crate::sql::Clause;
use std::sync::Arc;

/// Append-only, shareable list of predicates for one statement kind.
///
/// Appending returns a new set; existing sets (and managers holding them)
/// never observe the change.
#[derive(Debug, Clone, Default)]
pub struct ClauseSet(Arc<Vec<Clause>>);

impl ClauseSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn appended(&self, clauses: &[Clause]) -> Self {
        if clauses.is_empty() {
            return self.clone();
        }
        let mut combined = Vec::with_capacity(self.0.len() + clauses.len());
        combined.extend_from_slice(&self.0);
        combined.extend_from_slice(clauses);
        Self(Arc::new(combined))
    }

    pub fn as_slice(&self) -> &[Clause] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
