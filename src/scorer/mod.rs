pub mod engine;
pub mod loader;

pub use self::engine::QuadgramModel;
pub use self::loader::{count_quadgrams, QuadgramCounts};

use crate::cipher::SubstitutionAlphabet;
use crate::error::AdfgvxResult;
use std::path::Path;
use tracing::info;

/// Language plausibility of a candidate decryption. Higher is better; values
/// are only meaningful relative to other values of the same scorer.
pub trait Fitness: Send + Sync {
    fn fitness(&self, text: &[u8], alphabet: &SubstitutionAlphabet) -> f64;
}

impl Fitness for QuadgramModel {
    #[inline]
    fn fitness(&self, text: &[u8], alphabet: &SubstitutionAlphabet) -> f64 {
        self.mean_log_probability(text, alphabet.targets())
    }
}

impl QuadgramModel {
    /// Trains on raw text (normalized on the fly).
    pub fn from_corpus(content: &str) -> AdfgvxResult<Self> {
        Self::from_counts(&count_quadgrams(content))
    }

    /// Loads a `QUAD<TAB>COUNT` table. A file without a single valid row is
    /// treated as a raw training corpus instead.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> AdfgvxResult<Self> {
        let path = path.as_ref();
        let counts = loader::load_counts_from_file(path)?;
        if !counts.is_empty() {
            let model = Self::from_counts(&counts)?;
            info!(
                "✅ Quadgram table ready: {} entries, {} observations",
                model.distinct(),
                model.total()
            );
            return Ok(model);
        }

        info!("📖 No quadgram rows found, training on raw text instead");
        let content = std::fs::read_to_string(path)?;
        Self::from_corpus(&content)
    }
}
