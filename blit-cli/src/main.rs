use clap::Parser;
use env_logger::Env;

use blit_cli::{AppError, Cli};

fn main() -> Result<(), AppError> {
    let args = Cli::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(
        Env::default().default_filter_or(default_filter),
    )
    .init();

    args.command.run()
}
