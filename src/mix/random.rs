use rand::{Rng, RngCore};

/// The randomness the mixer and the appended blocks draw from.
///
/// Every [RngCore] is a source, so `rand::thread_rng()` or a seeded
/// `rand_chacha::ChaCha20Rng` can be passed directly. Tests can implement this trait with a
/// scripted sequence to pin chunk boundaries and branch choices exactly.
pub trait RandomSource {
    /// A uniform value in `[0, 1)`
    fn unit(&mut self) -> f64;

    /// A uniform integer in `[min, max]`; callers guarantee `min <= max`
    fn between(&mut self, min: usize, max: usize) -> usize;
}

impl<R: RngCore> RandomSource for R {
    fn unit(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn between(&mut self, min: usize, max: usize) -> usize {
        self.gen_range(min..=max)
    }
}

/// A lowercase ASCII word of `length` letters
pub fn random_word<R: RandomSource + ?Sized>(rng: &mut R, length: usize) -> String {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
    (0..length)
        .map(|_| ALPHABET[rng.between(0, ALPHABET.len() - 1)] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn seeded_sources_repeat() {
        let mut a = ChaCha20Rng::seed_from_u64(7);
        let mut b = ChaCha20Rng::seed_from_u64(7);
        assert_eq!(random_word(&mut a, 12), random_word(&mut b, 12));
    }

    #[test]
    fn words_are_lowercase_ascii() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let word = random_word(&mut rng, 64);
        assert_eq!(word.len(), 64);
        assert!(word.bytes().all(|b| b.is_ascii_lowercase()));
    }

    #[test]
    fn ranges_are_inclusive() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        for _ in 0..200 {
            let v = rng.between(3, 4);
            assert!((3..=4).contains(&v));
            let u = rng.unit();
            assert!((0.0..1.0).contains(&u));
        }
        assert_eq!(rng.between(5, 5), 5);
    }
}
