//! Legacy two-slot selection.
//!
//! Draws a number in `[0, 100)`; an even draw picks `members[0]`, an odd
//! draw picks `members[1]`. Members beyond the second are never chosen,
//! and a snapshot with fewer than two members is rejected.

use std::sync::Arc;
use rand::Rng;
use crate::load_balancer::{SelectionPolicy, backend::Backend};
use crate::load_balancer::types::SelectionError;

/// Exclusive upper bound of the random draw.
pub const DRAW_RANGE: u32 = 100;

const REQUIRED_MEMBERS: usize = 2;

#[derive(Debug, Default)]
pub struct RandomPair;

impl RandomPair {
    pub fn new() -> Self {
        Self
    }

    /// Deterministic core of the policy for a given draw.
    pub fn pick(number: u32, members: &[Arc<Backend>]) -> Result<Arc<Backend>, SelectionError> {
        if members.len() < REQUIRED_MEMBERS {
            return Err(SelectionError::Range {
                required: REQUIRED_MEMBERS,
                available: members.len(),
            });
        }
        let index = if number % 2 == 0 { 0 } else { 1 };
        Ok(members[index].clone())
    }
}

impl SelectionPolicy for RandomPair {
    fn select(&self, members: &[Arc<Backend>]) -> Result<Arc<Backend>, SelectionError> {
        let number = rand::thread_rng().gen_range(0..DRAW_RANGE);
        Self::pick(number, members)
    }

    fn min_members(&self) -> usize {
        REQUIRED_MEMBERS
    }

    fn name(&self) -> &'static str {
        "random_pair"
    }
}
