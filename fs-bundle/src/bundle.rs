use std::{
    collections::{BTreeMap, HashMap},
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use data_asset::AssetId;
use data_error::{BlitError, Result};

use crate::{
    encoder::{AssetEncoder, PlannedAsset, DEFAULT_READ_CAPACITY},
    scanner::DirectoryScanner,
    writer::BufferWriter,
};

/// Options of one encode job
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BundleOptions {
    /// Directories scanned for images, in order
    #[serde(alias = "src")]
    pub sources: Vec<PathBuf>,
    /// File the generated buffer is written to
    pub dest: PathBuf,
    /// Prepend the statement switching the runtime into object-URL mode
    #[serde(alias = "useObjectURLs")]
    pub use_object_urls: bool,
    /// Wrap the program in a `<script>` element
    pub inline: bool,
    /// Read buffer size used per file
    pub read_capacity: usize,
}

impl Default for BundleOptions {
    fn default() -> Self {
        BundleOptions {
            sources: Vec::new(),
            dest: PathBuf::new(),
            use_object_urls: true,
            inline: false,
            read_capacity: DEFAULT_READ_CAPACITY,
        }
    }
}

impl BundleOptions {
    pub fn new<I, P>(sources: I, dest: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        BundleOptions {
            sources: sources.into_iter().map(Into::into).collect(),
            dest: dest.into(),
            ..Default::default()
        }
    }
}

/// Outcome of a successful encode job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleReport {
    pub dest: PathBuf,
    pub records: usize,
    pub bytes_read: u64,
}

/// Scan the sources, encode every image and write the generated buffer
///
/// Configuration problems and id collisions are detected before the
/// destination is opened, so they never leave an output file behind. Any
/// read or write failure aborts the whole job.
pub fn bundle(options: &BundleOptions) -> Result<BundleReport> {
    log::debug!("Bundling {:?} into {:?}", options.sources, options.dest);

    check_dest(&options.dest)?;
    let scanner = DirectoryScanner::new(&options.sources)?;
    let assets = plan(&scanner)?;

    if let Some(parent) = options
        .dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
    {
        fs::create_dir_all(parent).map_err(|source| BlitError::Create {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let file =
        File::create(&options.dest).map_err(|source| BlitError::Create {
            path: options.dest.clone(),
            source,
        })?;

    let encoder = AssetEncoder::with_capacity(options.read_capacity);
    let mut writer = BufferWriter::begin(
        BufWriter::new(file),
        encoder,
        options.use_object_urls,
        options.inline,
    )?;
    for asset in &assets {
        writer.write_record(asset)?;
    }

    let records = writer.records();
    let bytes_read = writer.bytes_read();
    writer.finish()?;

    log::info!(
        "{} assets ({} bytes) have been written to {}",
        records,
        bytes_read,
        options.dest.display()
    );

    Ok(BundleReport {
        dest: options.dest.clone(),
        records,
        bytes_read,
    })
}

/// Walk the scanner and derive id and MIME of every image, in scan order
///
/// Fails on the first id produced by two different files.
pub fn plan(scanner: &DirectoryScanner) -> Result<Vec<PlannedAsset>> {
    let mut seen: HashMap<AssetId, PathBuf> = HashMap::new();
    let mut assets = Vec::new();

    for path in scanner.paths() {
        let asset = PlannedAsset::from_path(path?)?;

        if let Some(first) = seen.get(&asset.id) {
            return Err(BlitError::Collision {
                id: asset.id.to_string(),
                first: first.clone(),
                second: asset.path,
            });
        }

        seen.insert(asset.id.clone(), asset.path.clone());
        assets.push(asset);
    }

    log::debug!("{} assets planned", assets.len());
    Ok(assets)
}

/// Every id produced by more than one file, with all of its files
pub fn collisions(
    scanner: &DirectoryScanner,
) -> Result<BTreeMap<AssetId, Vec<PathBuf>>> {
    let mut by_id: BTreeMap<AssetId, Vec<PathBuf>> = BTreeMap::new();
    for path in scanner.paths() {
        let path = path?;
        by_id
            .entry(AssetId::from_path(&path)?)
            .or_default()
            .push(path);
    }

    Ok(by_id
        .into_iter()
        .filter(|(_id, paths)| paths.len() > 1)
        .collect())
}

fn check_dest(dest: &Path) -> Result<()> {
    if dest.as_os_str().is_empty() {
        return Err(BlitError::Config(
            "A destination file is required".to_owned(),
        ));
    }
    if dest.is_dir() {
        return Err(BlitError::Config(format!(
            "{} is a directory, dest must be a file",
            dest.display()
        )));
    }
    Ok(())
}
