//! Deterministic RNG streams for synthesis.
//!
//! Every program gets its own ChaCha8 stream derived from
//! `(seed, worker, iteration)`, so any single program can be re-synthesized
//! without replaying the ones before it.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// SplitMix64 finalizer: spreads nearby inputs over the whole seed space.
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// RNG for a worker as a whole, seeded from `(global_seed + worker_id)`.
pub fn worker_rng(global_seed: u64, worker_id: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(global_seed.wrapping_add(worker_id))
}

/// RNG for one program of one worker.
pub fn program_rng(global_seed: u64, worker_id: u64, iteration: u64) -> ChaCha8Rng {
    let worker_seed = mix(global_seed.wrapping_add(worker_id));
    ChaCha8Rng::seed_from_u64(mix(worker_seed ^ iteration))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn draw(mut rng: ChaCha8Rng) -> Vec<u64> {
        (0..8).map(|_| rng.gen()).collect()
    }

    #[test]
    fn test_same_inputs_same_stream() {
        assert_eq!(draw(worker_rng(42, 0)), draw(worker_rng(42, 0)));
        assert_eq!(draw(program_rng(42, 1, 9)), draw(program_rng(42, 1, 9)));
    }

    #[test]
    fn test_neighbouring_programs_differ() {
        assert_ne!(draw(program_rng(42, 0, 0)), draw(program_rng(42, 0, 1)));
        assert_ne!(draw(program_rng(42, 0, 0)), draw(program_rng(42, 1, 0)));
        assert_ne!(draw(program_rng(42, 0, 0)), draw(program_rng(43, 0, 0)));
    }

    #[test]
    fn test_worker_and_iteration_do_not_alias() {
        // (worker 1, iteration 0) and (worker 0, iteration 1) must not collide.
        assert_ne!(draw(program_rng(7, 1, 0)), draw(program_rng(7, 0, 1)));
    }
}
