use crate::reports;
use adfgvx::analysis::selftest::{run_self_test, run_substitution_test};
use adfgvx::analysis::{Analyzer, TestLevel};
use adfgvx::cipher::text::plain_symbols;
use adfgvx::config::Config;
use adfgvx::error::AdfgvxResult;
use adfgvx::optimizer::Strategy;
use adfgvx::scorer::QuadgramModel;
use clap::Args;
use fastrand::Rng;
use std::fs;
use strum::IntoEnumIterator;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct SelfTestArgs {
    #[command(flatten)]
    pub config: Config,

    /// Plaintext corpus the samples are drawn from
    #[arg(short, long)]
    pub corpus: String,

    #[arg(short, long, default_value_t = 10)]
    pub trials: usize,

    #[arg(short, long, default_value_t = TestLevel::Full)]
    pub level: TestLevel,

    /// Compare the substitution strategies alone on short monoalphabetic texts
    #[arg(long, default_value_t = false)]
    pub substitution: bool,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: SelfTestArgs, model: &QuadgramModel) -> AdfgvxResult<()> {
    args.config.validate()?;
    let corpus = plain_symbols(&fs::read_to_string(&args.corpus)?);
    info!("📚 Corpus: {} symbols from {}", corpus.len(), args.corpus);

    let seed = args.seed;

    if args.substitution {
        // Same samples for every strategy.
        let base = seed.unwrap_or_else(|| Rng::new().u64(..));
        let mut results = Vec::new();
        for strategy in Strategy::iter() {
            let mut config = args.config.clone();
            config.search.strategy = strategy;
            let analyzer = Analyzer::new(model, config);
            let optimizer = analyzer.optimizer();
            let reports =
                run_substitution_test(model, &optimizer, &corpus, args.trials, Some(base))?;
            results.push((strategy, reports));
        }

        if args.json {
            println!("{}", serde_json::to_string_pretty(&results)?);
        } else {
            for (strategy, reports) in &results {
                reports::print_substitution_report(*strategy, reports);
            }
        }
        return Ok(());
    }

    let analyzer = Analyzer::new(model, args.config);
    let summary = run_self_test(&analyzer, &corpus, args.level, args.trials, seed)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        reports::print_self_test_report(&summary);
    }
    Ok(())
}
