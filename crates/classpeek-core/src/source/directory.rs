use super::{is_class_file_name, ClassSource, CLASS_SUFFIX};
use crate::container::DecodedContainer;
use crate::decoder::Decoder;
use crate::error::{Error, Result};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// A directory of `.class` files laid out by package
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    decoder: Decoder,
}

impl DirectorySource {
    /// Opens a class directory, decoding with the default configuration
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        Self::with_decoder(root, Decoder::new())
    }

    /// Opens a class directory, decoding with `decoder`
    pub fn with_decoder(root: impl Into<PathBuf>, decoder: Decoder) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(Error::directory_read(
                root,
                io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
            ));
        }
        Ok(Self { root, decoder })
    }

    /// The directory this source reads from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the class with this binary name would be stored
    pub fn path_of(&self, class_name: &str) -> PathBuf {
        let mut path = self.root.clone();
        for segment in class_name.split('.') {
            path.push(segment);
        }
        path.set_extension("class");
        path
    }

    /// Class files under the root with their binary names, sorted by path
    fn walk(&self, recursive: bool) -> Result<Vec<(String, PathBuf)>> {
        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut found = Vec::new();

        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| walk_error(&self.root, e))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(file_name) = entry.file_name().to_str() else {
                trace!("Skipping non-UTF-8 path {}", entry.path().display());
                continue;
            };
            if !is_class_file_name(file_name) {
                continue;
            }

            match binary_name(&self.root, entry.path()) {
                Some(name) => found.push((name, entry.into_path())),
                None => trace!("Skipping non-UTF-8 path {}", entry.path().display()),
            }
        }

        debug!("Found {} class files under {}", found.len(), self.root.display());
        Ok(found)
    }
}

impl ClassSource for DirectorySource {
    fn sub(&self, package: &str) -> Result<Self> {
        let mut root = self.root.clone();
        for segment in package.split('.') {
            root.push(segment);
        }
        Self::with_decoder(root, self.decoder.clone())
    }

    fn read(&self, class_name: &str) -> Result<DecodedContainer> {
        self.decoder.decode_file(self.path_of(class_name))
    }

    fn list(&self, recursive: bool) -> Result<Vec<String>> {
        Ok(self
            .walk(recursive)?
            .into_iter()
            .map(|(name, _)| name)
            .collect())
    }

    fn read_all(&self, recursive: bool) -> Result<Vec<DecodedContainer>> {
        self.walk(recursive)?
            .iter()
            .map(|(_, path)| self.decoder.decode_file(path))
            .collect()
    }
}

/// `a/b/C.class` under `root` becomes `a.b.C`
fn binary_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut segments = Vec::new();
    for component in relative.components() {
        segments.push(component.as_os_str().to_str()?);
    }

    let name = segments.join(".");
    name.strip_suffix(CLASS_SUFFIX).map(str::to_owned)
}

fn walk_error(root: &Path, e: walkdir::Error) -> Error {
    let path = e.path().unwrap_or(root).to_path_buf();
    let source = e
        .into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "filesystem loop"));
    Error::directory_read(path, source)
}
