//! Deterministic pseudo-randomness.
//!
//! Outputs only depend on the seed, so a mix renders the same badges
//! every time and on every platform.

/// mulberry32 generator
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Uniform index in `0..bound`
    pub fn next_index(&mut self, bound: usize) -> usize {
        ((u64::from(self.next_u32()) * bound as u64) >> 32) as usize
    }
}

/// Fisher-Yates shuffle driven by a `Mulberry32` seeded with `seed`
pub fn seeded_shuffle<T>(items: &mut [T], seed: u32) {
    let mut rng = Mulberry32::new(seed);
    for i in (1..items.len()).rev() {
        let j = rng.next_index(i + 1);
        items.swap(i, j);
    }
}
