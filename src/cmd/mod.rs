pub mod encrypt;
pub mod model;
pub mod selftest;
pub mod solve;

use adfgvx::error::{AdfgvxError, AdfgvxResult};
use adfgvx::scorer::QuadgramModel;
use fastrand::Rng;

pub fn require_model(path: Option<&str>) -> AdfgvxResult<QuadgramModel> {
    match path {
        Some(p) => QuadgramModel::load_from_file(p),
        None => Err(AdfgvxError::Config(
            "this command needs a language model (--model)".into(),
        )),
    }
}

pub fn seeded_rng(seed: Option<u64>) -> Rng {
    match seed {
        Some(s) => Rng::with_seed(s),
        None => Rng::new(),
    }
}

/// Literal text if given, otherwise the contents of the file.
pub fn read_input(text: Option<String>, file: Option<&str>) -> AdfgvxResult<String> {
    match (text, file) {
        (Some(t), _) => Ok(t),
        (None, Some(path)) => Ok(std::fs::read_to_string(path)?),
        (None, None) => Err(AdfgvxError::Config(
            "provide the text directly or with --input".into(),
        )),
    }
}
