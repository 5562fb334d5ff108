//! Random sub-sampling of analog pools.
//!
//! ## Purpose
//!
//! Each reconstruction iteration uses a random subset of `N_b` analogues drawn
//! from the `N_a`-entry pool. This module provides the draw and the per-step
//! generator seeding.
//!
//! ## Design notes
//!
//! * **No shared generator**: Every target step owns a `ChaCha8Rng` seeded from
//!   `(run seed, member, step)`, so results do not depend on thread
//!   scheduling, on the analysis period, or on which other steps ran.
//! * **Uniform without replacement**: Draws use `rand::seq::index::sample`.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Draw `n_subsample` distinct positions out of `0..pool_size`.
///
/// Every subset of size `n_subsample` is equally likely. The caller
/// guarantees `n_subsample <= pool_size`.
pub fn draw_subsample<R: Rng + ?Sized>(rng: &mut R, pool_size: usize, n_subsample: usize) -> Vec<usize> {
    debug_assert!(n_subsample <= pool_size);
    rand::seq::index::sample(rng, pool_size, n_subsample).into_vec()
}

/// SplitMix64 finaliser.
#[inline]
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Seed of one unit of work, derived from the run seed.
pub fn step_seed(run_seed: u64, member: usize, step: usize) -> u64 {
    let member_seed = splitmix64(run_seed ^ splitmix64(member as u64));
    splitmix64(member_seed ^ (step as u64))
}

/// Generator of one unit of work.
pub fn step_rng(run_seed: u64, member: usize, step: usize) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(step_seed(run_seed, member, step))
}
