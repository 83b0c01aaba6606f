use crate::commands::Commands;

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(name = "blitter")]
#[clap(about = "Bundle images into deferred image buffers", long_about = None)]
pub struct Cli {
    #[clap(long, short, global = true, action, help = "Log debug messages")]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Commands,
}
