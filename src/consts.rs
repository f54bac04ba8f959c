/// The six coordinate labels of the Polybius square, in row/column order.
pub const CIPHER_ALPHABET: &[u8; 6] = b"ADFGVX";

/// Number of coordinate labels per axis.
pub const CIPHER_SYMBOLS: usize = 6;

/// Plaintext alphabet: 26 letters followed by the 10 digits.
pub const PLAIN_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Number of plaintext symbols (cells of the square).
pub const PLAIN_SYMBOLS: usize = 36;

/// English letter order by descending frequency, digits last.
pub const FREQUENCY_ORDER: &[u8; 36] = b"ETAOINHSRDLMUWYCFGPBVKXJQZ0123456789";

/// Size of the dense quadgram table (36^4).
pub const QUADGRAM_TABLE_SIZE: usize = PLAIN_SYMBOLS * PLAIN_SYMBOLS * PLAIN_SYMBOLS * PLAIN_SYMBOLS;

/// Pseudo-count given to quadgrams never seen in the training corpus.
pub const QUADGRAM_FLOOR_COUNT: f64 = 0.01;

/// Annealing stops once the temperature falls to or below this value.
pub const ABSOLUTE_ZERO: f64 = 0.000_000_1;

/// Largest column count for which grouping enumerates every partition.
pub const EXHAUSTIVE_GROUPING_LIMIT: usize = 20;

/// Largest group size for which pairing and ordering enumerate every permutation.
pub const EXHAUSTIVE_PATTERN_LIMIT: usize = 8;

/// Default key length used by the self-test driver.
pub const DEFAULT_KEY_LENGTH: usize = 8;

/// Plaintext sample length of a self-test, as a multiple of the key length.
pub const DEFAULT_TIMES_KEY_LENGTH: usize = 50;

/// Independent hill-climbing restarts per decryption.
pub const DEFAULT_RESTARTS: usize = 10;

/// Annealing defaults: initial temperature, cooling factor, trials per level.
pub const DEFAULT_ANNEAL_TEMPERATURE: f64 = 0.01;
pub const DEFAULT_ANNEAL_COOLING: f64 = 0.99;
pub const DEFAULT_ANNEAL_STEPS: usize = 800;

/// Upper bound on pair orderings re-scored after the substitution search.
pub const DEFAULT_ORDER_REFINEMENT_LIMIT: usize = 5040;

/// Rounds of order refinement before giving up on further changes.
pub const MAX_REFINEMENT_ROUNDS: usize = 4;

/// Pair orderings hill-climbed per refinement round, best direct fitness first.
pub const REFINEMENT_CANDIDATES: usize = 24;

/// Plaintext length of a substitution-only self-test.
pub const SUBSTITUTION_TRIAL_LENGTH: usize = 100;

/// Plaintext symbol ('X') appended by `encrypt` until the grid's last row is full.
pub const PADDING_SYMBOL: u8 = 23;
