//! Reproducible shuffling seeded from a room code
//!
//! Every member of a room must see the same order and the same tie-break, so
//! the generator is a fixed linear-congruential sequence seeded from the room
//! code rather than a system RNG.

const LCG_MULTIPLIER: u64 = 9301;
const LCG_INCREMENT: u64 = 49297;
const LCG_MODULUS: u64 = 233_280;

/// Sum of the UTF-16 code units of `s`
pub fn seed_from_str(s: &str) -> u64 {
    s.encode_utf16().map(u64::from).sum()
}

/// `s = (s × 9301 + 49297) mod 233280`
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed % LCG_MODULUS,
        }
    }

    pub fn from_str_seed(s: &str) -> Self {
        Self::new(seed_from_str(s))
    }

    /// Next raw state in `[0, 233280)`
    pub fn next_state(&mut self) -> u64 {
        self.state = (self.state * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        self.state
    }

    /// Next value in `[0.0, 1.0)`
    pub fn next_unit(&mut self) -> f64 {
        self.next_state() as f64 / LCG_MODULUS as f64
    }

    /// Next index in `[0, n)`; `floor(unit × n)` computed in integers. `n` must be > 0.
    pub fn next_index(&mut self, n: usize) -> usize {
        ((self.next_state() * n as u64) / LCG_MODULUS) as usize
    }

    /// In-place Fisher–Yates shuffle
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_index(i + 1);
            items.swap(i, j);
        }
    }
}

/// Shuffle a copy of `items` with a generator seeded from `seed`
pub fn seeded_shuffle<T: Clone>(items: &[T], seed: &str) -> Vec<T> {
    let mut out = items.to_vec();
    Lcg::from_str_seed(seed).shuffle(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_from_str() {
        // 'A'..='F' = 65..=70
        assert_eq!(seed_from_str("ABCDEF"), 405);
        assert_eq!(seed_from_str(""), 0);
    }

    #[test]
    fn test_lcg_sequence() {
        let mut lcg = Lcg::new(405);
        // (405 * 9301 + 49297) % 233280
        assert_eq!(lcg.next_state(), (405 * 9301 + 49297) % 233_280);
    }

    #[test]
    fn test_next_index_in_range() {
        let mut lcg = Lcg::new(7);
        for n in 1..50 {
            assert!(lcg.next_index(n) < n);
        }
    }

    #[test]
    fn test_shuffle_is_reproducible_permutation() {
        let items: Vec<u32> = (0..10).collect();
        let a = seeded_shuffle(&items, "ROOM42");
        let b = seeded_shuffle(&items, "ROOM42");
        assert_eq!(a, b);

        let mut sorted = a.clone();
        sorted.sort();
        assert_eq!(sorted, items);
    }

    #[test]
    fn test_different_rooms_differ() {
        let items: Vec<u32> = (0..10).collect();
        assert_ne!(seeded_shuffle(&items, "ABCDEF"), seeded_shuffle(&items, "ZZZZZZ"));
    }

    #[test]
    fn test_shuffle_trivial_inputs() {
        let empty: Vec<u8> = Vec::new();
        assert!(seeded_shuffle(&empty, "X").is_empty());
        assert_eq!(seeded_shuffle(&[1], "X"), vec![1]);
    }
}
