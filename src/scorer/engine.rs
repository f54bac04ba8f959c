use crate::cipher::SubstitutionAlphabet;
use crate::consts::{PLAIN_SYMBOLS, QUADGRAM_FLOOR_COUNT, QUADGRAM_TABLE_SIZE};
use crate::error::{AdfgvxError, AdfgvxResult};
use crate::scorer::loader::QuadgramCounts;
use tracing::debug;

const RADIX: usize = PLAIN_SYMBOLS;

/// Dense quadgram language model: `table[((a*36 + b)*36 + c)*36 + d]` holds
/// the log10 probability of the quadgram `abcd`.
#[derive(Clone, Debug)]
pub struct QuadgramModel {
    table: Vec<f32>,
    floor: f32,
    total: u64,
    distinct: usize,
}

impl QuadgramModel {
    pub fn from_counts(counts: &QuadgramCounts) -> AdfgvxResult<Self> {
        let total = counts.total();
        if total == 0 {
            return Err(AdfgvxError::Model(
                "quadgram model needs at least one observed quadgram".into(),
            ));
        }

        let denom = total as f64;
        let floor = (QUADGRAM_FLOOR_COUNT / denom).log10() as f32;
        let mut table = vec![floor; QUADGRAM_TABLE_SIZE];

        for (quad, &count) in &counts.counts {
            if count > 0 {
                table[index(quad)] = (count as f64 / denom).log10() as f32;
            }
        }

        debug!(
            "Quadgram model: {} distinct, {} total, floor {:.3}",
            counts.len(),
            total,
            floor
        );

        Ok(Self {
            table,
            floor,
            total,
            distinct: counts.len(),
        })
    }

    #[inline]
    pub fn log_probability(&self, quad: &[u8; 4]) -> f32 {
        self.table[index(quad)]
    }

    pub fn floor(&self) -> f32 {
        self.floor
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn distinct(&self) -> usize {
        self.distinct
    }

    /// Mean log10 probability of the quadgrams of `text`, read through
    /// `map` (symbol -> plaintext symbol). 0.0 for texts under four symbols.
    #[inline]
    pub(crate) fn mean_log_probability(&self, text: &[u8], map: &[u8; PLAIN_SYMBOLS]) -> f64 {
        if text.len() < 4 {
            return 0.0;
        }

        let wrap = RADIX * RADIX * RADIX;
        let mut idx = 0usize;
        for &s in &text[..3] {
            idx = idx * RADIX + map[s as usize] as usize;
        }

        let mut sum = 0.0f64;
        for &s in &text[3..] {
            idx = (idx % wrap) * RADIX + map[s as usize] as usize;
            sum += self.table[idx] as f64;
        }
        sum / (text.len() - 3) as f64
    }

    /// Fitness of text that is already plaintext.
    pub fn score_plain(&self, text: &[u8]) -> f64 {
        self.mean_log_probability(text, SubstitutionAlphabet::identity().targets())
    }
}

#[inline(always)]
fn index(quad: &[u8; 4]) -> usize {
    ((quad[0] as usize * RADIX + quad[1] as usize) * RADIX + quad[2] as usize) * RADIX
        + quad[3] as usize
}
