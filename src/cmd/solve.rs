use super::{read_input, seeded_rng};
use crate::reports;
use adfgvx::analysis::Analyzer;
use adfgvx::config::Config;
use adfgvx::error::AdfgvxResult;
use adfgvx::scorer::QuadgramModel;
use clap::Args;
use std::time::Instant;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct SolveArgs {
    #[command(flatten)]
    pub config: Config,

    /// Ciphertext letters (ADFGVX, whitespace ignored)
    pub ciphertext: Option<String>,

    #[arg(short, long)]
    pub input: Option<String>,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: SolveArgs, model: &QuadgramModel) -> AdfgvxResult<()> {
    args.config.validate()?;
    let ciphertext = read_input(args.ciphertext, args.input.as_deref())?;
    let key_length = args.config.analysis.key_length;
    let mut rng = seeded_rng(args.seed);

    info!(
        "🔍 Attacking {} cipher symbols with key length {}",
        ciphertext.split_whitespace().map(str::len).sum::<usize>(),
        key_length
    );

    let start = Instant::now();
    let analyzer = Analyzer::new(model, args.config);
    let decryption = analyzer.decrypt_with_progress(
        &adfgvx::cipher::text::encode_cipher(&ciphertext)?,
        key_length,
        &mut rng,
        |restart: usize, fitness: f64, best: f64| {
            info!(
                "   Restart {:2} | fitness {:.4} | best {:.4}",
                restart + 1,
                fitness,
                best
            );
            true
        },
    )?;
    info!("⏱  Finished in {:.2?}", start.elapsed());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&decryption)?);
    } else {
        reports::print_decryption(&decryption);
    }
    Ok(())
}
