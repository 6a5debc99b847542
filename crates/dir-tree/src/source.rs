//! Directory contents as a child accessor

use crate::entry::{EntryKind, FsEntry};
use std::fs;
use std::io;
use std::path::Path;
use tree_walk::{ChildAccessor, TreeTraversal};

/// Lists directory contents on demand
///
/// Nothing is cached: each traversal reads every directory it reaches once.
/// Children are sorted directories first, then files, alphabetically within
/// each group. An unreadable directory is logged and treated as empty.
///
/// # Example
///
/// ```no_run
/// use dir_tree::{FsChildren, FsEntry};
///
/// let tree = FsChildren::new().include_hidden(true).into_traversal();
/// let root = FsEntry::open_root(".", false).expect("Failed to read directory");
/// println!("{} entries", tree.count(root));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FsChildren {
    include_hidden: bool,
    follow_links: bool,
}

impl FsChildren {
    /// List visible entries without following symlinks
    pub fn new() -> Self {
        Self::default()
    }

    /// Also list entries whose name starts with `.`
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Resolve symlinks to their targets
    ///
    /// Followed entries carry canonical paths, so a link back to an ancestor
    /// is recognized as an already visited node. Each entry keeps the name
    /// it is listed under in its parent directory.
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Whether root entries should be read with links followed
    pub fn follows_links(&self) -> bool {
        self.follow_links
    }

    /// Wrap this accessor in a traversal
    pub fn into_traversal(self) -> TreeTraversal<FsEntry, Self> {
        TreeTraversal::new(self)
    }

    /// Read the entries of a directory
    pub fn read_children(&self, dir: &Path) -> io::Result<Vec<FsEntry>> {
        let mut children = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            let child = if self.follow_links {
                match FsEntry::from_path(&path, true) {
                    Ok(child) => child,
                    Err(e) => {
                        // Dangling link: keep it visible as a leaf
                        log::debug!("Not following {}: {}", path.display(), e);
                        FsEntry::with_metadata(path, &entry.metadata()?)
                    }
                }
            } else {
                FsEntry::with_metadata(path, &entry.metadata()?)
            };

            if !self.include_hidden && child.is_hidden() {
                continue;
            }
            children.push(child);
        }

        // Sort children: directories first, then files, alphabetically within each group
        children.sort_by(|a, b| {
            let a_dir = a.kind == EntryKind::Directory;
            let b_dir = b.kind == EntryKind::Directory;
            b_dir.cmp(&a_dir).then_with(|| a.name.cmp(&b.name))
        });

        Ok(children)
    }
}

impl ChildAccessor<FsEntry> for FsChildren {
    fn children(&self, node: &FsEntry) -> Vec<FsEntry> {
        if !node.is_directory() {
            return Vec::new();
        }

        match self.read_children(&node.path) {
            Ok(children) => children,
            Err(e) => {
                log::warn!("Failed to read {}: {}", node.path.display(), e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        // Create test structure:
        // root/
        //   b.txt
        //   .hidden
        //   a_dir/
        //     file2.txt
        //   z_dir/

        fs::write(root.join("b.txt"), "content1").unwrap();
        fs::write(root.join(".hidden"), "secret").unwrap();
        fs::create_dir(root.join("a_dir")).unwrap();
        fs::write(root.join("a_dir/file2.txt"), "content2").unwrap();
        fs::create_dir(root.join("z_dir")).unwrap();
        temp
    }

    fn names(entries: &[FsEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_directories_first() {
        let temp = create_test_tree();
        let root = FsEntry::from_path(temp.path(), false).unwrap();

        let children = FsChildren::new().children(&root);
        assert_eq!(names(&children), vec!["a_dir", "z_dir", "b.txt"]);
    }

    #[test]
    fn test_hidden_entries() {
        let temp = create_test_tree();
        let root = FsEntry::from_path(temp.path(), false).unwrap();

        let children = FsChildren::new().include_hidden(true).children(&root);
        assert_eq!(names(&children), vec!["a_dir", "z_dir", ".hidden", "b.txt"]);
    }

    #[test]
    fn test_files_are_leaves() {
        let temp = create_test_tree();
        let file = FsEntry::from_path(temp.path().join("b.txt"), false).unwrap();
        assert!(FsChildren::new().children(&file).is_empty());
    }

    #[test]
    fn test_vanished_directory_is_empty() {
        let temp = create_test_tree();
        let dir = FsEntry::from_path(temp.path().join("z_dir"), false).unwrap();
        fs::remove_dir(temp.path().join("z_dir")).unwrap();
        assert!(FsChildren::new().children(&dir).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_terminates() {
        let temp = create_test_tree();
        std::os::unix::fs::symlink(temp.path(), temp.path().join("a_dir/loop")).unwrap();

        let tree = FsChildren::new().follow_links(true).into_traversal();
        let root = FsEntry::from_path(temp.path(), true).unwrap();
        // root, a_dir, file2.txt, z_dir, b.txt; the link resolves to root
        assert_eq!(tree.count(root), 5);

        let plain = FsChildren::new().into_traversal();
        let root = FsEntry::from_path(temp.path(), false).unwrap();
        let link = plain.find_first(root, |e| e.name == "loop").unwrap();
        assert_eq!(link.kind, EntryKind::Symlink);
    }
}
