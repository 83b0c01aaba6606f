use std::path::PathBuf;

use fs_bundle::{bundle, BundleOptions, BundleReport};

use crate::{config::load_options, AppError};

#[derive(Clone, Debug, clap::Args)]
#[clap(
    name = "encode",
    about = "Encode image directories into a deferred image buffer"
)]
pub struct Encode {
    #[clap(value_parser, help = "Directories to scan for images")]
    sources: Vec<PathBuf>,
    #[clap(long, short, help = "File the generated buffer is written to")]
    dest: Option<PathBuf>,
    #[clap(long, short, help = "Read options from a TOML file")]
    config: Option<PathBuf>,
    #[clap(long, action, help = "Keep assets as data URIs in the page")]
    no_object_urls: bool,
    #[clap(long, action, help = "Wrap the program in a <script> element")]
    inline: bool,
    #[clap(long, help = "Read buffer size in bytes")]
    read_capacity: Option<usize>,
}

impl Encode {
    /// Options from the config file, if any, overridden by flags
    pub fn options(&self) -> Result<BundleOptions, AppError> {
        let mut options = match &self.config {
            Some(path) => load_options(path)?,
            None => BundleOptions::default(),
        };

        if !self.sources.is_empty() {
            options.sources = self.sources.clone();
        }
        if let Some(dest) = &self.dest {
            options.dest = dest.clone();
        }
        if self.no_object_urls {
            options.use_object_urls = false;
        }
        if self.inline {
            options.inline = true;
        }
        if let Some(capacity) = self.read_capacity {
            options.read_capacity = capacity;
        }

        Ok(options)
    }

    pub fn run(&self) -> Result<BundleReport, AppError> {
        let options = self.options()?;
        let report = bundle(&options)?;

        println!(
            "Encoded {} images ({} bytes) into {}",
            report.records,
            report.bytes_read,
            report.dest.display()
        );
        Ok(report)
    }
}
