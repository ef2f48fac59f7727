use super::{is_class_file_name, ClassSource, CLASS_SUFFIX};
use crate::container::DecodedContainer;
use crate::decoder::Decoder;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};
use zip::result::ZipError;
use zip::ZipArchive;

type Archive = ZipArchive<BufReader<File>>;

/// A jar or zip file whose entries are `.class` files laid out by package.
///
/// The central directory is read once on [`open`](Self::open); narrowed
/// sources made with [`sub`](ClassSource::sub) share the open archive.
#[derive(Debug, Clone)]
pub struct ArchiveSource {
    path: PathBuf,
    prefix: String,
    decoder: Decoder,
    archive: Arc<Mutex<Archive>>,
}

impl ArchiveSource {
    /// Opens a class archive, decoding with the default configuration
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_decoder(path, Decoder::new())
    }

    /// Opens a class archive, decoding with `decoder`
    pub fn with_decoder(path: impl Into<PathBuf>, decoder: Decoder) -> Result<Self> {
        let path = path.into();
        let file = File::open(&path).map_err(|e| Error::file_read(&path, e))?;
        let archive =
            ZipArchive::new(BufReader::new(file)).map_err(|e| Error::archive_read(&path, e))?;
        debug!("Opened {} with {} entries", path.display(), archive.len());

        Ok(Self {
            path,
            prefix: String::new(),
            decoder,
            archive: Arc::new(Mutex::new(archive)),
        })
    }

    /// The archive this source reads from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entry name the class with this binary name would be stored under
    pub fn entry_name(&self, class_name: &str) -> String {
        format!("{}{}{}", self.prefix, class_name.replace('.', "/"), CLASS_SUFFIX)
    }

    fn lock(&self) -> MutexGuard<'_, Archive> {
        self.archive.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// `a/b/C.class` under the prefix becomes `a.b.C`
    fn binary_name(&self, entry: &str, recursive: bool) -> Option<String> {
        let relative = entry.strip_prefix(self.prefix.as_str())?;
        let file_name = match relative.rsplit_once('/') {
            Some(_) if !recursive => return None,
            Some((_, file_name)) => file_name,
            None => relative,
        };
        if !is_class_file_name(file_name) {
            return None;
        }
        relative
            .strip_suffix(CLASS_SUFFIX)
            .map(|stem| stem.replace('/', "."))
    }
}

impl ClassSource for ArchiveSource {
    fn sub(&self, package: &str) -> Result<Self> {
        let prefix = format!("{}{}/", self.prefix, package.replace('.', "/"));
        if !self.lock().file_names().any(|name| name.starts_with(&prefix)) {
            return Err(Error::directory_read(
                self.path.join(&prefix),
                io::Error::new(io::ErrorKind::NotFound, "no such package in archive"),
            ));
        }

        Ok(Self {
            prefix,
            ..self.clone()
        })
    }

    fn read(&self, class_name: &str) -> Result<DecodedContainer> {
        let name = self.entry_name(class_name);
        let mut archive = self.lock();
        let entry = match archive.by_name(&name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => {
                return Err(Error::file_read(
                    self.path.join(&name),
                    io::Error::new(io::ErrorKind::NotFound, "no such archive entry"),
                ))
            }
            Err(e) => return Err(Error::archive_read(&self.path, e)),
        };

        trace!("Reading {} ({} bytes)", name, entry.size());
        self.decoder.decode(entry)
    }

    fn list(&self, recursive: bool) -> Result<Vec<String>> {
        let archive = self.lock();
        let mut names: Vec<String> = archive
            .file_names()
            .filter_map(|entry| self.binary_name(entry, recursive))
            .collect();
        names.sort();

        debug!("Found {} class entries in {}", names.len(), self.path.display());
        Ok(names)
    }
}
