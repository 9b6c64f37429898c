//! File access inside the working directory.
//!
//! Paths handed to and returned from [`Worktree`] are relative to the root
//! and `/`-separated, the same form used as keys in the staging area and in
//! commit snapshots.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use lvc_index::IndexError;
use lvc_types::{ContentHasher, ObjectId};

use crate::error::{SdkError, SdkResult};

/// Name of the metadata directory at the working directory root.
pub const METADATA_DIR: &str = ".lvc";

#[derive(Debug, Clone)]
pub struct Worktree {
    root: PathBuf,
}

impl Worktree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn metadata_dir(&self) -> PathBuf {
        self.root.join(METADATA_DIR)
    }

    /// Absolute location of a relative path.
    pub fn resolve(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Turn a user-supplied path into the canonical relative form.
    ///
    /// `.` components are dropped and `..` is folded; paths that leave the
    /// root or point into the metadata directory are rejected. Absolute
    /// paths are accepted under the root even when the root itself was
    /// given relative to the current directory.
    pub fn normalize(&self, path: &str) -> SdkResult<String> {
        let raw = Path::new(path);
        let relative = if raw.is_absolute() {
            self.strip_root(raw)
                .ok_or_else(|| invalid_path(format!("{path} is outside the working directory")))?
        } else {
            raw
        };

        let mut parts: Vec<String> = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                Component::ParentDir => {
                    if parts.pop().is_none() {
                        return Err(invalid_path(format!("{path} is outside the working directory")));
                    }
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid_path(format!("{path} is outside the working directory")));
                }
            }
        }

        match parts.first() {
            None => Err(invalid_path(format!("{path:?} does not name a file"))),
            Some(first) if first == METADATA_DIR => {
                Err(invalid_path(format!("{path} is inside {METADATA_DIR}")))
            }
            Some(_) => Ok(parts.join("/")),
        }
    }

    fn strip_root<'a>(&self, path: &'a Path) -> Option<&'a Path> {
        if let Ok(rest) = path.strip_prefix(&self.root) {
            return Some(rest);
        }
        [std::path::absolute(&self.root), fs::canonicalize(&self.root)]
            .into_iter()
            .flatten()
            .find_map(|root| path.strip_prefix(root).ok())
    }

    pub fn read(&self, rel: &str) -> io::Result<Vec<u8>> {
        fs::read(self.resolve(rel))
    }

    /// Digest of the file's current content.
    pub fn digest(&self, rel: &str) -> io::Result<ObjectId> {
        Ok(ContentHasher::BLOB.hash(&self.read(rel)?))
    }

    /// Write `data` to `rel`, creating parent directories as needed.
    pub fn write(&self, rel: &str, data: &[u8]) -> io::Result<()> {
        let path = self.resolve(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)
    }

    /// Delete `rel` and any directories the deletion leaves empty.
    ///
    /// Returns `false` if the file was already gone.
    pub fn remove(&self, rel: &str) -> io::Result<bool> {
        let path = self.resolve(rel);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        }
        self.prune_empty_parents(&path);
        Ok(true)
    }

    fn prune_empty_parents(&self, path: &Path) {
        let mut dir = path.parent();
        while let Some(current) = dir {
            if current == self.root || !current.starts_with(&self.root) {
                break;
            }
            // fails on a non-empty directory, which ends the walk
            if fs::remove_dir(current).is_err() {
                break;
            }
            dir = current.parent();
        }
    }

    /// Lazily walk every regular file under the root, skipping the metadata
    /// directory. Yields relative paths in file-name order.
    pub fn files(&self) -> impl Iterator<Item = io::Result<String>> + '_ {
        WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                !(entry.depth() == 1 && entry.file_name() == OsStr::new(METADATA_DIR))
            })
            .filter_map(move |entry| match entry {
                Ok(entry) if entry.file_type().is_file() => Some(Ok(self.relative(entry.path()))),
                Ok(_) => None,
                Err(e) => Some(Err(io::Error::from(e))),
            })
    }

    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn invalid_path(msg: String) -> SdkError {
    SdkError::Index(IndexError::InvalidPath(msg))
}
