use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Character set for generating short codes.
pub const ALPHABET_CHARS: &[char] = &[
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M',
    'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm',
    'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Length of generated short codes.
pub const GENERATED_CODE_LENGTH: usize = 8;

/// Source of candidate short codes for auto-shortened URLs.
///
/// Candidates are not guaranteed to be unique; the store has the final say.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Draws codes uniformly from [`ALPHABET_CHARS`] using one generator seeded
/// at construction and shared by every caller.
pub struct RandomCodeGenerator {
    rng: Mutex<StdRng>,
}

impl RandomCodeGenerator {
    /// Seed from the operating system.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Seed deterministically, for reproducible sequences.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        // A poisoned lock still holds a usable RNG.
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        (0..GENERATED_CODE_LENGTH)
            .map(|_| ALPHABET_CHARS[rng.random_range(0..ALPHABET_CHARS.len())])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_alphabet_chars_const() {
        // Verify the alphabet has 62 characters (0-9, A-Z, a-z)
        assert_eq!(ALPHABET_CHARS.len(), 62);
    }

    #[test]
    fn test_alphabet_chars_unique() {
        let unique: HashSet<_> = ALPHABET_CHARS.iter().collect();
        assert_eq!(unique.len(), ALPHABET_CHARS.len());
    }

    #[test]
    fn test_generated_codes_have_fixed_length_and_alphabet() {
        let generator = RandomCodeGenerator::new();

        for _ in 0..500 {
            let code = generator.generate();
            assert_eq!(code.len(), GENERATED_CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_seeded_generators_repeat() {
        let a = RandomCodeGenerator::with_seed(42);
        let b = RandomCodeGenerator::with_seed(42);

        let first: Vec<String> = (0..5).map(|_| a.generate()).collect();
        let second: Vec<String> = (0..5).map(|_| b.generate()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_consecutive_codes_differ() {
        let generator = RandomCodeGenerator::with_seed(7);
        let codes: HashSet<String> = (0..1000).map(|_| generator.generate()).collect();
        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_every_symbol_is_reachable() {
        let generator = RandomCodeGenerator::with_seed(1);
        let mut seen = HashSet::new();
        for _ in 0..2000 {
            seen.extend(generator.generate().chars());
        }
        assert_eq!(seen.len(), ALPHABET_CHARS.len());
    }
}
