//! Seeded sample corpora for tests and benches.
//!
//! Generated data mixes sections with different compressibility:
//! - runs of a single byte
//! - text-like data over a small alphabet
//! - short repeating patterns
//! - random bytes
//!
//! so codes of very different lengths show up in the same archive.
#![allow(dead_code)]

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generate `size_bytes` of mixed-compressibility data from `seed`.
pub fn sample_data(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    while data.len() < size_bytes {
        let section = (size_bytes - data.len()).min(rng.gen_range(64..=2048));

        match rng.gen_range(0..10u8) {
            // runs of one byte
            0..=2 => {
                let byte: u8 = rng.gen();
                data.extend(std::iter::repeat(byte).take(section));
            }
            // limited alphabet, text-like
            3..=5 => {
                let alphabet = b"etaoin shrdlu.,\n";
                for _ in 0..section {
                    data.push(alphabet[rng.gen_range(0..alphabet.len())]);
                }
            }
            // repeating pattern
            6..=7 => {
                let pattern: Vec<u8> = (0..rng.gen_range(4..=32)).map(|_| rng.gen()).collect();
                data.extend(pattern.iter().copied().cycle().take(section));
            }
            // incompressible
            _ => data.extend((0..section).map(|_| rng.gen::<u8>())),
        }
    }

    data
}

/// Same as [`sample_data`], trimmed to a multiple of `width`.
pub fn aligned_sample(seed: u64, size_bytes: usize, width: usize) -> Vec<u8> {
    let mut data = sample_data(seed, size_bytes);
    data.truncate(size_bytes - size_bytes % width);
    data
}
