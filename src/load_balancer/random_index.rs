//! Random-index selection: `members[n % len]` for a random draw `n`.

use std::sync::Arc;
use rand::Rng;
use crate::load_balancer::{SelectionPolicy, backend::Backend};
use crate::load_balancer::types::SelectionError;

/// Picks a member uniformly at random. Works for any non-empty pool.
#[derive(Debug, Default)]
pub struct RandomIndex;

impl RandomIndex {
    pub fn new() -> Self {
        Self
    }

    /// Deterministic core of the policy for a given draw.
    pub fn pick(number: usize, members: &[Arc<Backend>]) -> Result<Arc<Backend>, SelectionError> {
        if members.is_empty() {
            return Err(SelectionError::Range { required: 1, available: 0 });
        }
        Ok(members[number % members.len()].clone())
    }
}

impl SelectionPolicy for RandomIndex {
    fn select(&self, members: &[Arc<Backend>]) -> Result<Arc<Backend>, SelectionError> {
        let number = rand::thread_rng().gen::<u32>() as usize;
        Self::pick(number, members)
    }

    fn min_members(&self) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "random_index"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(ids: &[&str]) -> Vec<Arc<Backend>> {
        ids.iter().map(|id| Backend::new(*id, 1).0).collect()
    }

    #[test]
    fn test_pick_wraps_modulo_len() {
        let backends = pool(&["A", "B", "C"]);
        assert_eq!(RandomIndex::pick(0, &backends).unwrap().id(), "A");
        assert_eq!(RandomIndex::pick(4, &backends).unwrap().id(), "B");
        assert_eq!(RandomIndex::pick(8, &backends).unwrap().id(), "C");
    }

    #[test]
    fn test_single_member_always_chosen() {
        let backends = pool(&["A"]);
        let lb = RandomIndex::new();
        for _ in 0..50 {
            assert_eq!(lb.select(&backends).unwrap().id(), "A");
        }
    }

    #[test]
    fn test_empty_pool_is_range_error() {
        let err = RandomIndex::new().select(&[]).unwrap_err();
        assert_eq!(err, SelectionError::Range { required: 1, available: 0 });
    }

    #[test]
    fn test_selected_member_is_from_snapshot() {
        let backends = pool(&["A", "B", "C", "D"]);
        let lb = RandomIndex::new();
        for _ in 0..200 {
            let chosen = lb.select(&backends).unwrap();
            assert!(backends.iter().any(|b| Arc::ptr_eq(b, &chosen)));
        }
    }
}
