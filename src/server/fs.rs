//! Mapping request paths onto files under the document root.

use std::io;
use std::path::{Component, Path, PathBuf};

use log::debug;
use percent_encoding::percent_decode_str;

use crate::server::error::Error;

/// Name of the document served for a directory.
pub const INDEX_FILE: &str = "index.html";

/// Content type used when the extension says nothing.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Read-only access to the files being served.
pub trait FileStore {
    /// Whether `path` is a directory.
    fn is_directory(&self, path: &Path) -> bool;
    /// Whether `path` is an existing regular file.
    fn file_exists(&self, path: &Path) -> bool;
    /// Read the whole content of the file at `path`.
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// A [`FileStore`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskStore;

impl FileStore for DiskStore {
    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// Guess the content type of a file from its extension.
pub fn resolve_mime(path: &Path) -> Option<String> {
    mime_guess::from_path(path).first().map(|mime| mime.to_string())
}

/// A file found under the root, ready to be served.
#[derive(Debug, Clone)]
pub struct ResolvedFile {
    pub path: PathBuf,
    pub content: Vec<u8>,
    pub content_type: String,
}

/// Join a percent-encoded request path onto `root`.
///
/// `.` and empty segments are dropped. A `..` segment pops the previous one
/// and fails when it would climb above the root.
fn join_under_root(root: &Path, raw_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(raw_path).decode_utf8_lossy();

    let mut relative = PathBuf::new();
    for component in Path::new(&*decoded).components() {
        match component {
            Component::Normal(segment) => relative.push(segment),
            Component::CurDir => {}
            Component::ParentDir => {
                if !relative.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if relative.as_os_str().is_empty() {
        Some(root.to_path_buf())
    } else {
        Some(root.join(relative))
    }
}

/// Find and read the file a request path refers to.
///
/// Directories are served through their [`INDEX_FILE`].
pub fn resolve_file<F: FileStore + ?Sized>(store: &F, root: &Path, raw_path: &str) -> Result<ResolvedFile, Error> {
    let not_found = || Error::NotFound(format!("/{raw_path}"));

    let mut path = join_under_root(root, raw_path).ok_or_else(not_found)?;
    if store.is_directory(&path) {
        path.push(INDEX_FILE);
    }

    if !store.file_exists(&path) {
        debug!("No file at {}", path.display());
        return Err(not_found());
    }

    let content = match store.read_file(&path) {
        Ok(content) => content,
        Err(e) => {
            debug!("Could not read {}: {e}", path.display());
            return Err(not_found());
        }
    };
    let content_type = resolve_mime(&path).unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

    Ok(ResolvedFile {
        path,
        content,
        content_type,
    })
}
