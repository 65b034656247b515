//! Per-container source of node priorities.

use rand::{self, Rng, SeedableRng, XorShiftRng};

/// Draws one random priority for every node a container creates.
///
/// Every container owns its own generator, so independent containers never influence each
/// other's shapes. Seeding with `with_seed` makes the shapes reproducible.
///
/// # Examples
///
/// ```
/// use ordered_treap::priority::PriorityGenerator;
///
/// let mut a = PriorityGenerator::with_seed(7);
/// let mut b = PriorityGenerator::with_seed(7);
/// assert_eq!(a.next_priority(), b.next_priority());
/// ```
#[derive(Clone)]
pub struct PriorityGenerator {
    rng: XorShiftRng,
}

impl PriorityGenerator {
    /// Constructs a generator seeded from the thread-local entropy source.
    pub fn new() -> Self {
        PriorityGenerator {
            rng: rand::weak_rng(),
        }
    }

    /// Constructs a deterministic generator.
    pub fn with_seed(seed: u64) -> Self {
        let low = seed as u32;
        let high = (seed >> 32) as u32;
        // XorShift must not start from the all-zero state.
        let state = [
            low ^ 0x193a_6754,
            high ^ 0xa8a7_d469,
            low.rotate_left(16) ^ 0x9783_0e05,
            (high.rotate_left(16) ^ 0x113b_a7bb) | 1,
        ];
        PriorityGenerator {
            rng: XorShiftRng::from_seed(state),
        }
    }

    pub fn next_priority(&mut self) -> u32 {
        self.rng.next_u32()
    }
}

impl Default for PriorityGenerator {
    fn default() -> Self {
        Self::new()
    }
}
