//! Filesystem entries used as tree nodes

use serde::Serialize;
use std::fmt;
use std::fs::{self, Metadata};
use std::hash::{Hash, Hasher};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// The type of a filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A directory - can have children
    #[display(fmt = "directory")]
    Directory,
    /// A regular file - always a leaf
    #[display(fmt = "file")]
    File,
    /// A symbolic link that is not followed - always a leaf
    #[display(fmt = "symlink")]
    Symlink,
}

impl EntryKind {
    fn from_metadata(metadata: &Metadata) -> Self {
        let file_type = metadata.file_type();
        if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_symlink() {
            EntryKind::Symlink
        } else {
            EntryKind::File
        }
    }

    /// Returns true if this is a directory
    pub const fn is_directory(self) -> bool {
        matches!(self, EntryKind::Directory)
    }
}

/// A single entry on disk
///
/// Two entries are the same node when their paths are equal, so a traversal
/// never lists a path twice.
#[derive(Debug, Clone, Serialize)]
pub struct FsEntry {
    /// Full path on the filesystem
    pub path: PathBuf,
    /// The entry's name (not full path)
    pub name: String,
    /// Directory, file or unfollowed symlink
    pub kind: EntryKind,
    /// Size in bytes (0 for directories)
    pub size: u64,
    /// Last modified timestamp
    #[serde(skip)]
    pub modified: Option<SystemTime>,
    /// File extension (if any)
    pub extension: Option<String>,
}

impl FsEntry {
    /// Read an entry from disk
    ///
    /// With `follow_links` the path is canonicalized and a symlink takes the
    /// kind of its target; otherwise a symlink is its own leaf entry. Either
    /// way the name stays the one `path` was given with, so a followed link
    /// is listed under the link's name.
    ///
    /// # Errors
    ///
    /// Returns an error if the path (or a followed link target) doesn't exist.
    pub fn from_path(path: impl AsRef<Path>, follow_links: bool) -> io::Result<Self> {
        let path = path.as_ref();
        if !follow_links {
            return Ok(Self::with_metadata(path.to_path_buf(), &fs::symlink_metadata(path)?));
        }

        let mut entry = Self::with_metadata(fs::canonicalize(path)?, &fs::metadata(path)?);
        if let Some(name) = path.file_name() {
            entry.name = name.to_string_lossy().into_owned();
        }
        Ok(entry)
    }

    /// Read the entry a traversal starts from
    ///
    /// A root that is a symlink is always resolved, so naming a link to a
    /// directory walks that directory. Without `follow_links` the path is
    /// kept as given and links below the root stay leaves.
    ///
    /// # Errors
    ///
    /// Returns an error if the path (or the link target) doesn't exist.
    pub fn open_root(path: impl AsRef<Path>, follow_links: bool) -> io::Result<Self> {
        let path = path.as_ref();
        if follow_links {
            return Self::from_path(path, true);
        }
        Ok(Self::with_metadata(path.to_path_buf(), &fs::metadata(path)?))
    }

    pub(crate) fn with_metadata(path: PathBuf, metadata: &Metadata) -> Self {
        let kind = EntryKind::from_metadata(metadata);

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let extension = match kind {
            EntryKind::File => path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_string),
            _ => None,
        };

        let size = match kind {
            EntryKind::Directory => 0,
            _ => metadata.len(),
        };

        Self {
            path,
            name,
            kind,
            size,
            modified: metadata.modified().ok(),
            extension,
        }
    }

    /// Returns true if this entry can have children
    pub fn is_directory(&self) -> bool {
        self.kind.is_directory()
    }

    /// Returns true for dot-files and dot-directories
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }

    /// The path relative to `base`, or the full path when outside it
    pub fn relative_to<'a>(&'a self, base: &Path) -> &'a Path {
        self.path.strip_prefix(base).unwrap_or(&self.path)
    }
}

impl PartialEq for FsEntry {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for FsEntry {}

impl Hash for FsEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl fmt::Display for FsEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EntryKind::Directory => write!(f, "{}/", self.name),
            EntryKind::Symlink => write!(f, "{}@", self.name),
            EntryKind::File => write!(f, "{}", self.name),
        }
    }
}
