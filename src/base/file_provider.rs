use std::{
    borrow::Cow,
    collections::HashMap,
    path::{Component, Path, PathBuf},
};

use super::Error;

/// A trait for providing file contents.
pub trait FileProvider {
    /// Reads the contents of the file at the given path as bytes.
    ///
    /// # Errors
    /// - If an error occurs while reading the file.
    /// - If the file does not exist.
    fn read_bytes<P: AsRef<Path>>(&self, path: P) -> Result<Cow<[u8]>, Error>;

    /// Reads the contents of the file at the given path.
    ///
    /// # Errors
    /// - If an error occurs while reading the file.
    /// - If the file does not exist.
    /// - If the file is not valid UTF-8.
    fn read_str<P: AsRef<Path>>(&self, path: P) -> Result<Cow<str>, Error> {
        let bytes = self.read_bytes(path)?;
        let string = std::str::from_utf8(&bytes)?.to_string();
        Ok(Cow::Owned(string))
    }
}

/// Provides file contents from the file system.
#[derive(Debug, Clone)]
pub struct FsProvider {
    /// The root directory to base paths off of.
    root: PathBuf,
}

impl Default for FsProvider {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

impl<P> From<P> for FsProvider
where
    P: Into<PathBuf>,
{
    fn from(root: P) -> Self {
        Self { root: root.into() }
    }
}

impl FileProvider for FsProvider {
    fn read_bytes<P: AsRef<Path>>(&self, path: P) -> Result<Cow<[u8]>, Error> {
        let full_path = self.root.join(path);
        std::fs::read(full_path)
            .map(Cow::Owned)
            .map_err(|err| Error::IoError(err.to_string()))
    }

    fn read_str<P: AsRef<Path>>(&self, path: P) -> Result<Cow<str>, Error> {
        let full_path = self.root.join(path);
        std::fs::read_to_string(full_path)
            .map(Cow::Owned)
            .map_err(|err| Error::IoError(err.to_string()))
    }
}

/// Provides file contents from an in-memory map of paths to texts.
///
/// Paths are normalized before lookup, so `./a/b.tit` and `a/c/../b.tit` name the same file.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    files: HashMap<PathBuf, String>,
}

impl MemoryProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, replacing any previous file at the same path.
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P, content: impl Into<String>) {
        if let Some(path) = normalize_path(path) {
            self.files.insert(path, content.into());
        }
    }
}

impl FileProvider for MemoryProvider {
    fn read_bytes<P: AsRef<Path>>(&self, path: P) -> Result<Cow<[u8]>, Error> {
        self.read_str(path).map(|content| match content {
            Cow::Borrowed(content) => Cow::Borrowed(content.as_bytes()),
            Cow::Owned(content) => Cow::Owned(content.into_bytes()),
        })
    }

    fn read_str<P: AsRef<Path>>(&self, path: P) -> Result<Cow<str>, Error> {
        let path = normalize_path(path).ok_or_else(|| Error::IoError("Invalid path".to_string()))?;
        self.files
            .get(&path)
            .map(|content| Cow::Borrowed(content.as_str()))
            .ok_or_else(|| Error::IoError("File not found".to_string()))
    }
}

fn normalize_path<P: AsRef<Path>>(path: P) -> Option<PathBuf> {
    let mut normalized = Vec::new();

    for component in path.as_ref().components() {
        match component {
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            Component::ParentDir => {
                normalized.pop()?;
            }
            Component::Normal(part) => normalized.push(part),
        }
    }

    Some(normalized.into_iter().collect())
}
