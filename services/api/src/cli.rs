use crate::commands::{
    run_generate, run_init_config, run_level, GenerateArgs, InitConfigArgs, LevelArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use questlog_xp::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "questlog-xp",
    about = "Score project activity into XP, streaks, and levels",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score an activity export and write the daily, total, and ledger artifacts
    Generate(GenerateArgs),
    /// Show the level reached with a given XP total
    Level(LevelArgs),
    /// Write the standard XP rules to a config file
    InitConfig(InitConfigArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Generate(args) => run_generate(args),
        Command::Level(args) => run_level(args),
        Command::InitConfig(args) => run_init_config(args),
    }
}
