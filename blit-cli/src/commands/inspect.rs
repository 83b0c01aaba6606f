use std::{fs, path::PathBuf};

use serde::Serialize;

use data_asset::WireBuffer;

use crate::AppError;

#[derive(Clone, Debug, clap::Args)]
#[clap(name = "inspect", about = "List the records of a generated buffer")]
pub struct Inspect {
    #[clap(value_parser, help = "Path to the generated buffer")]
    file: PathBuf,
    #[clap(long, action, help = "Print the listing as JSON")]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Listing<'a> {
    #[serde(rename = "useObjectURLs")]
    use_object_urls: bool,
    records: Vec<RecordLine<'a>>,
}

#[derive(Debug, Serialize)]
struct RecordLine<'a> {
    id: &'a str,
    mime: &'a str,
    size: usize,
}

impl Inspect {
    pub fn run(&self) -> Result<(), AppError> {
        let output = self.render()?;
        println!("{}", output);
        Ok(())
    }

    /// Parse the buffer and format its listing
    pub fn render(&self) -> Result<String, AppError> {
        let program = fs::read_to_string(&self.file)?;
        let buffer = WireBuffer::parse(&program)?;

        let listing = Listing {
            use_object_urls: buffer.use_object_urls,
            records: buffer
                .records
                .iter()
                .map(|record| RecordLine {
                    id: record.id.as_str(),
                    mime: &record.mime,
                    size: record.content.len(),
                })
                .collect(),
        };

        if self.json {
            return Ok(serde_json::to_string_pretty(&listing)?);
        }

        let mut output = format!(
            "{} records, object URLs {}",
            listing.records.len(),
            if listing.use_object_urls { "on" } else { "off" }
        );
        for line in &listing.records {
            output.push_str(&format!(
                "\n{}\t{}\t{}",
                line.id, line.mime, line.size
            ));
        }
        Ok(output)
    }
}
