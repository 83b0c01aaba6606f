use clap::Subcommand;

mod collisions;
mod encode;
mod inspect;

pub use collisions::Collisions;
pub use encode::Encode;
pub use inspect::Inspect;

use crate::AppError;

#[derive(Debug, Subcommand)]
pub enum Commands {
    Encode(Encode),
    Inspect(Inspect),
    Collisions(Collisions),
}

impl Commands {
    pub fn run(&self) -> Result<(), AppError> {
        match self {
            Commands::Encode(encode) => encode.run().map(|_| ()),
            Commands::Inspect(inspect) => inspect.run(),
            Commands::Collisions(collisions) => collisions.run(),
        }
    }
}
