use adfgvx::error::AdfgvxResult;
use adfgvx::scorer::loader::write_counts;
use adfgvx::scorer::count_quadgrams;
use clap::Args;
use std::fs::{self, File};
use std::io::BufWriter;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Training text
    #[arg(short, long)]
    pub corpus: String,

    #[arg(short, long, default_value = "quadgrams.tsv")]
    pub output: String,
}

pub fn run(args: ModelArgs) -> AdfgvxResult<()> {
    info!("📖 Reading corpus: {}", args.corpus);
    let content = fs::read_to_string(&args.corpus)?;
    let counts = count_quadgrams(&content);

    let file = File::create(&args.output)?;
    write_counts(&counts, BufWriter::new(file))?;
    info!(
        "💾 Wrote {} quadgrams ({} observations) to {}",
        counts.len(),
        counts.total(),
        args.output
    );
    Ok(())
}
