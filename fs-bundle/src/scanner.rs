use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
};

use walkdir::{DirEntry, WalkDir};

use data_asset::is_image;
use data_error::{BlitError, Result};

/// Enumerates the image files below a set of root directories.
///
/// Roots are validated and canonicalized up front, so every yielded path is
/// absolute. Each root is walked depth-first with directory entries sorted
/// by file name, which keeps the sequence stable for an unchanged tree.
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    roots: Vec<PathBuf>,
}

impl DirectoryScanner {
    /// Create a scanner over the given roots
    ///
    /// Fails if the list is empty or if any root is missing or is not a
    /// directory.
    pub fn new<I, P>(roots: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let roots = roots
            .into_iter()
            .map(|root| resolve_root(root.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        if roots.is_empty() {
            return Err(BlitError::Config(
                "At least one source directory is required".to_owned(),
            ));
        }

        Ok(DirectoryScanner { roots })
    }

    /// Return the canonicalized roots in declaration order
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Lazily yield the absolute path of every image under the roots
    ///
    /// A file reachable from several roots, because roots overlap or repeat,
    /// is yielded once, under the first root that reaches it.
    pub fn paths(&self) -> impl Iterator<Item = Result<PathBuf>> + '_ {
        let mut seen: HashSet<PathBuf> = HashSet::new();
        self.roots
            .iter()
            .flat_map(|root| {
                log::debug!("Scanning source directory: {:?}", root);

                WalkDir::new(root)
                    .min_depth(1)
                    .follow_links(true)
                    .sort_by_file_name()
                    .into_iter()
            })
            .filter_map(move |entry| match entry {
                Ok(entry) => {
                    if !should_encode(&entry) {
                        return None;
                    }
                    if !seen.insert(entry.path().to_path_buf()) {
                        log::trace!("Skipping repeated {:?}", entry.path());
                        return None;
                    }
                    Some(Ok(entry.into_path()))
                }
                Err(err) => Some(Err(walk_error(err))),
            })
    }
}

fn resolve_root(root: &Path) -> Result<PathBuf> {
    let metadata = fs::metadata(root).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            BlitError::Config(format!(
                "{} must be a directory in src, but it does not exist",
                root.display()
            ))
        } else {
            BlitError::Read {
                path: root.to_path_buf(),
                source: e,
            }
        }
    })?;

    if !metadata.is_dir() {
        return Err(BlitError::Config(format!(
            "{} must be a directory in src",
            root.display()
        )));
    }

    root.canonicalize().map_err(|e| BlitError::Read {
        path: root.to_path_buf(),
        source: e,
    })
}

fn walk_error(err: walkdir::Error) -> BlitError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    BlitError::Read {
        path,
        source: err.into(),
    }
}

/// Only regular files with an image extension are encoded
fn should_encode(entry: &DirEntry) -> bool {
    if !entry.file_type().is_file() {
        return false;
    }

    if !is_image(entry.path()) {
        log::trace!("Ignoring non-image file: {:?}", entry.path());
        return false;
    }

    true
}
