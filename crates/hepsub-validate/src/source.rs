//! # Bundle Sources
//!
//! The validator touches the filesystem only through [`BundleSource`]: it
//! reads bundle files and checks that referenced resources exist.
//! [`LocalFiles`] is the real filesystem.

use std::io;
use std::path::Path;

/// File access used while validating a bundle.
pub trait BundleSource {
    /// Read a whole bundle file.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Whether `path` names an existing regular file.
    fn is_file(&self, path: &Path) -> bool;
}

/// The local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFiles;

impl BundleSource for LocalFiles {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

impl<S: BundleSource + ?Sized> BundleSource for &S {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        (**self).is_file(path)
    }
}
