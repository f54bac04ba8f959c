use adfgvx::error::AdfgvxResult;
use adfgvx::scorer::QuadgramModel;
use clap::{Parser, Subcommand};
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Quadgram table (QUAD<TAB>COUNT) or raw training text
    #[arg(global = true, short, long)]
    model: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Recover the plaintext of an ADFGVX ciphertext
    Solve(cmd::solve::SolveArgs),
    /// Encrypt known text and check every stage of the attack
    Selftest(cmd::selftest::SelfTestArgs),
    /// Encrypt plaintext with a given or random key
    Encrypt(cmd::encrypt::EncryptArgs),
    /// Build a quadgram table from a training corpus
    Model(cmd::model::ModelArgs),
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        error!("❌ {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> AdfgvxResult<()> {
    info!("🚀 Initializing ADFGVX analysis...");
    match cli.command {
        Commands::Solve(args) => {
            let model = cmd::require_model(cli.model.as_deref())?;
            cmd::solve::run(args, &model)
        }
        Commands::Selftest(args) => {
            let model = match cli.model.as_deref() {
                Some(path) => QuadgramModel::load_from_file(path)?,
                None => {
                    info!("📖 No model given, training on the self-test corpus");
                    QuadgramModel::from_corpus(&std::fs::read_to_string(&args.corpus)?)?
                }
            };
            cmd::selftest::run(args, &model)
        }
        Commands::Encrypt(args) => cmd::encrypt::run(args),
        Commands::Model(args) => cmd::model::run(args),
    }
}
