use crate::cipher::text::{decode_plain, plain_index};
use crate::consts::{FREQUENCY_ORDER, PLAIN_SYMBOLS};
use crate::error::{invalid_input, AdfgvxError, AdfgvxResult};
use fastrand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A bijection from cipher symbols to plaintext symbols over the 36-symbol
/// alphabet. Entry `i` is the plaintext symbol that cipher symbol `i` decodes to.
///
/// Every constructor validates bijectivity and the only mutation is
/// [`swap`](Self::swap), so a value of this type is always a permutation.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubstitutionAlphabet {
    targets: [u8; PLAIN_SYMBOLS],
}

impl SubstitutionAlphabet {
    pub fn identity() -> Self {
        let mut targets = [0u8; PLAIN_SYMBOLS];
        for (i, t) in targets.iter_mut().enumerate() {
            *t = i as u8;
        }
        Self { targets }
    }

    pub fn random(rng: &mut Rng) -> Self {
        let mut alphabet = Self::identity();
        rng.shuffle(&mut alphabet.targets);
        alphabet
    }

    pub fn from_targets(targets: &[u8]) -> AdfgvxResult<Self> {
        if targets.len() != PLAIN_SYMBOLS {
            return Err(invalid_input!(
                "alphabet needs {} targets, got {}",
                PLAIN_SYMBOLS,
                targets.len()
            ));
        }
        let mut seen = [false; PLAIN_SYMBOLS];
        for &t in targets {
            if t as usize >= PLAIN_SYMBOLS || seen[t as usize] {
                return Err(invalid_input!("alphabet is not a bijection (target {})", t));
            }
            seen[t as usize] = true;
        }
        let mut fixed = [0u8; PLAIN_SYMBOLS];
        fixed.copy_from_slice(targets);
        Ok(Self { targets: fixed })
    }

    /// Parses the printable form: the 36 plaintext targets of `A..Z0..9` in order.
    pub fn from_mapping(mapping: &str) -> AdfgvxResult<Self> {
        let targets = mapping
            .bytes()
            .map(|b| {
                plain_index(b)
                    .ok_or_else(|| invalid_input!("'{}' is not a plaintext symbol", b as char))
            })
            .collect::<AdfgvxResult<Vec<u8>>>()?;
        Self::from_targets(&targets)
    }

    /// Initial guess from symbol frequencies: the most frequent cipher symbol
    /// maps to `E`, the next to `T`, and so on. Ties keep symbol order.
    pub fn frequency_guess(text: &[u8]) -> Self {
        let mut counts = [0usize; PLAIN_SYMBOLS];
        for &s in text {
            counts[s as usize] += 1;
        }

        let mut by_count: Vec<usize> = (0..PLAIN_SYMBOLS).collect();
        by_count.sort_by(|&a, &b| counts[b].cmp(&counts[a]));

        let mut targets = [0u8; PLAIN_SYMBOLS];
        for (rank, &sym) in by_count.iter().enumerate() {
            targets[sym] = plain_index(FREQUENCY_ORDER[rank]).unwrap_or(rank as u8);
        }
        Self { targets }
    }

    #[inline]
    pub fn target(&self, symbol: u8) -> u8 {
        self.targets[symbol as usize]
    }

    pub fn targets(&self) -> &[u8; PLAIN_SYMBOLS] {
        &self.targets
    }

    #[inline]
    pub fn swap(&mut self, a: usize, b: usize) {
        self.targets.swap(a, b);
    }

    /// Applies the mapping to every symbol of the text.
    pub fn transcribe(&self, text: &[u8]) -> Vec<u8> {
        text.iter().map(|&s| self.targets[s as usize]).collect()
    }

    pub fn inverse(&self) -> Self {
        let mut targets = [0u8; PLAIN_SYMBOLS];
        for (src, &dst) in self.targets.iter().enumerate() {
            targets[dst as usize] = src as u8;
        }
        Self { targets }
    }

    /// Number of cipher symbols occurring in `text` that this alphabet maps
    /// the same way as `other`.
    pub fn agreement(&self, other: &Self, text: &[u8]) -> usize {
        let mut present = [false; PLAIN_SYMBOLS];
        for &s in text {
            present[s as usize] = true;
        }
        (0..PLAIN_SYMBOLS)
            .filter(|&s| present[s] && self.targets[s] == other.targets[s])
            .count()
    }

    pub fn mapping(&self) -> String {
        decode_plain(&self.targets)
    }
}

impl fmt::Display for SubstitutionAlphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mapping())
    }
}

impl fmt::Debug for SubstitutionAlphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubstitutionAlphabet({})", self.mapping())
    }
}

impl From<SubstitutionAlphabet> for String {
    fn from(alphabet: SubstitutionAlphabet) -> Self {
        alphabet.mapping()
    }
}

impl TryFrom<String> for SubstitutionAlphabet {
    type Error = AdfgvxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_mapping(&value)
    }
}
