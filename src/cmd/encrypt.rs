use super::{read_input, seeded_rng};
use crate::reports;
use adfgvx::cipher::text::{decode_cipher, encode_plain, normalize};
use adfgvx::cipher::{encrypt, Grid, PolybiusSquare};
use adfgvx::consts::DEFAULT_KEY_LENGTH;
use adfgvx::error::{AdfgvxError, AdfgvxResult};
use clap::Args;
use itertools::Itertools;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct EncryptArgs {
    /// Plaintext; anything outside A-Z0-9 is dropped
    pub plaintext: Option<String>,

    #[arg(short, long)]
    pub input: Option<String>,

    /// Square as 36 symbols read row by row; random when omitted
    #[arg(long)]
    pub square: Option<String>,

    /// Transposition key as comma-separated positions, e.g. "3,0,2,1"
    #[arg(long)]
    pub key: Option<String>,

    /// Length of the random key when --key is omitted
    #[arg(long, default_value_t = DEFAULT_KEY_LENGTH)]
    pub key_length: usize,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,
}

fn parse_key(raw: &str) -> AdfgvxResult<Vec<usize>> {
    raw.split(',')
        .map(|p| {
            p.trim()
                .parse::<usize>()
                .map_err(|_| AdfgvxError::Config(format!("invalid key entry '{}'", p.trim())))
        })
        .collect()
}

pub fn run(args: EncryptArgs) -> AdfgvxResult<()> {
    let text = read_input(args.plaintext, args.input.as_deref())?;
    let plain = encode_plain(&normalize(&text))?;
    let mut rng = seeded_rng(args.seed);

    let square = match &args.square {
        Some(layout) => PolybiusSquare::from_layout(layout)?,
        None => PolybiusSquare::random(&mut rng),
    };
    let key = match &args.key {
        Some(raw) => parse_key(raw)?,
        None => Grid::random_key(&mut rng, args.key_length),
    };

    let cipher = encrypt(&plain, &square, &key)?;
    info!("🔐 Encrypted {} symbols with key {:?}", plain.len(), key);

    reports::print_square(&square);
    println!("Key: {}", key.iter().join(","));
    println!("Ciphertext: {}", decode_cipher(&cipher));
    Ok(())
}
