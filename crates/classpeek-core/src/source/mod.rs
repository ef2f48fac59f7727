//! Locating class files by binary name.
//!
//! A [`ClassSource`] maps dotted class names such as `com.example.Widget` to
//! decoded containers. [`DirectorySource`] does this for an exploded class
//! directory, where that name lives at `com/example/Widget.class`;
//! [`ArchiveSource`] does the same for the entries of a jar or zip file.

mod archive;
mod directory;

use crate::container::DecodedContainer;
use crate::error::Result;

pub use archive::ArchiveSource;
pub use directory::DirectorySource;

const CLASS_SUFFIX: &str = ".class";
const PACKAGE_INFO: &str = "package-info.class";

/// A place class files can be read from by name
pub trait ClassSource {
    /// Narrows the source to one package, so that
    /// `sub("a.b")?.read("C")` reads the same class as `read("a.b.C")`
    fn sub(&self, package: &str) -> Result<Self>
    where
        Self: Sized;

    /// Decodes the class with the given binary name, relative to this source
    fn read(&self, class_name: &str) -> Result<DecodedContainer>;

    /// Binary names of the classes in this source. Without `recursive`, only
    /// classes directly in this source are listed.
    fn list(&self, recursive: bool) -> Result<Vec<String>>;

    /// Decodes every class [`list`](Self::list) would return
    fn read_all(&self, recursive: bool) -> Result<Vec<DecodedContainer>> {
        self.list(recursive)?
            .iter()
            .map(|name| self.read(name))
            .collect()
    }
}

/// Returns true for `X.class` file names other than `package-info.class`
fn is_class_file_name(file_name: &str) -> bool {
    file_name.len() > CLASS_SUFFIX.len()
        && file_name.ends_with(CLASS_SUFFIX)
        && file_name != PACKAGE_INFO
}

/// Smallest class file naming `internal_name`, with no members
#[cfg(test)]
fn minimal_class(internal_name: &str) -> Vec<u8> {
    let mut out = crate::decoder::MAGIC.to_vec();
    out.extend_from_slice(&[0x00, 0x00, 0x00, 0x34]); // 52.0
    out.extend_from_slice(&3u16.to_be_bytes());
    out.push(1);
    out.extend_from_slice(&(internal_name.len() as u16).to_be_bytes());
    out.extend_from_slice(internal_name.as_bytes());
    out.extend_from_slice(&[7, 0x00, 0x01]);
    out.extend_from_slice(&[0x00, 0x21]); // access_flags
    out.extend_from_slice(&[0x00, 0x02]); // this_class
    out.extend_from_slice(&[0x00, 0x00]); // super_class
    out.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
    out
}
