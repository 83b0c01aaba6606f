use std::path::PathBuf;

use fs_bundle::{collisions, DirectoryScanner};

use crate::AppError;

#[derive(Clone, Debug, clap::Args)]
#[clap(
    name = "collisions",
    about = "Find files that would produce the same asset id"
)]
pub struct Collisions {
    #[clap(value_parser, required = true, help = "Directories to scan")]
    sources: Vec<PathBuf>,
}

impl Collisions {
    pub fn run(&self) -> Result<(), AppError> {
        println!("{}", self.report()?);
        Ok(())
    }

    pub fn report(&self) -> Result<String, AppError> {
        let scanner = DirectoryScanner::new(&self.sources)?;
        let found = collisions(&scanner)?;

        if found.is_empty() {
            return Ok("No collisions found".to_owned());
        }

        let mut output = format!("{} ids collide", found.len());
        for (id, paths) in &found {
            output.push_str(&format!(
                "\nId {} produced by {} files:",
                id,
                paths.len()
            ));
            for path in paths {
                output.push_str(&format!("\n\t{}", path.display()));
            }
        }
        Ok(output)
    }
}
