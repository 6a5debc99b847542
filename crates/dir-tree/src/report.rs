//! Reports over a directory tree
//!
//! Each report is a thin layer over one `tree-walk` operation.

use crate::entry::{EntryKind, FsEntry};
use crate::source::FsChildren;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::rc::Rc;
use tree_walk::{TraversalOrder, TreeTraversal};

/// A traversal over directory contents
pub type DirTraversal = TreeTraversal<FsEntry, FsChildren>;

/// Every reachable entry in the given order
pub fn listing(tree: &DirTraversal, root: &FsEntry, order: TraversalOrder) -> Vec<FsEntry> {
    tree.walk(root.clone(), order).collect()
}

/// Entries grouped by depth below `root`
pub fn levels(tree: &DirTraversal, root: &FsEntry) -> Vec<Vec<FsEntry>> {
    tree.levels(root.clone())
}

/// A directory's children as collected by `render_tree`
///
/// Shared directories are one `Outline` referenced from every parent that
/// lists them, each time under that parent's own label.
struct Outline {
    path: PathBuf,
    children: Vec<(String, Rc<Outline>)>,
}

struct RenderFrame {
    outline: Rc<Outline>,
    prefix: String,
    next: usize,
}

/// Render the tree with box-drawing guides, one entry per line
///
/// A directory reached a second time (two links to one target, when links
/// are followed) is expanded only where it first appears; later occurrences
/// print their own name marked `(see above)`.
pub fn render_tree(tree: &DirTraversal, root: &FsEntry) -> Option<String> {
    let outline = tree.map_with_children(root.clone(), |entry, children| {
        Rc::new(Outline {
            path: entry.path.clone(),
            children: children
                .into_iter()
                .map(|(child, outline)| (child.to_string(), outline))
                .collect(),
        })
    })?;

    let mut lines = vec![root.to_string()];
    let mut expanded = HashSet::from([outline.path.clone()]);
    let mut stack = vec![RenderFrame {
        outline,
        prefix: String::new(),
        next: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let Some((label, child)) = frame.outline.children.get(frame.next).cloned() else {
            stack.pop();
            continue;
        };
        frame.next += 1;

        let last = frame.next == frame.outline.children.len();
        let (branch, indent) = if last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        let prefix = frame.prefix.clone();

        if child.children.is_empty() {
            lines.push(format!("{prefix}{branch}{label}"));
        } else if expanded.insert(child.path.clone()) {
            lines.push(format!("{prefix}{branch}{label}"));
            stack.push(RenderFrame {
                outline: child,
                prefix: format!("{prefix}{indent}"),
                next: 0,
            });
        } else {
            lines.push(format!("{prefix}{branch}{label} (see above)"));
        }
    }

    Some(lines.join("\n"))
}

/// Aggregated size of a subtree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Usage {
    /// Total bytes of every file and unfollowed link
    pub bytes: u64,
    /// Number of non-directory entries
    pub files: usize,
    /// Number of directories, including the root when it is one
    pub directories: usize,
}

impl Usage {
    fn of(entry: &FsEntry) -> Self {
        match entry.kind {
            EntryKind::Directory => Usage {
                directories: 1,
                ..Usage::default()
            },
            EntryKind::File | EntryKind::Symlink => Usage {
                bytes: entry.size,
                files: 1,
                directories: 0,
            },
        }
    }

    fn add(self, other: Usage) -> Self {
        Usage {
            bytes: self.bytes + other.bytes,
            files: self.files + other.files,
            directories: self.directories + other.directories,
        }
    }
}

/// Sum sizes over every distinct entry
///
/// An entry reachable through several followed links counts once.
pub fn disk_usage(tree: &DirTraversal, root: &FsEntry) -> Option<Usage> {
    let usage = tree
        .walk(root.clone(), TraversalOrder::PreOrder)
        .fold(Usage::default(), |usage, entry| usage.add(Usage::of(&entry)));
    Some(usage)
}

/// One directory's total, as reported by [`directory_sizes`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectorySize {
    /// The directory itself
    pub entry: FsEntry,
    /// Bytes of every distinct file and unfollowed link below it
    pub bytes: u64,
}

/// Every directory with its total size, deepest first
///
/// Uses the post-order guarantee: a directory is visited after all of its
/// children, so the files below each child are already known. Totals are
/// built from sets of files, so content reachable through several followed
/// links is counted once per directory.
pub fn directory_sizes(tree: &DirTraversal, root: &FsEntry) -> Vec<DirectorySize> {
    let mut file_sizes: HashMap<PathBuf, u64> = HashMap::new();
    let mut files_below: HashMap<PathBuf, HashSet<PathBuf>> = HashMap::new();
    let mut sizes = Vec::new();

    tree.process_depth_first(root.clone(), |entry, children| {
        if !entry.is_directory() {
            file_sizes.insert(entry.path.clone(), entry.size);
            return;
        }

        let mut below = HashSet::new();
        for child in children {
            if !child.is_directory() {
                below.insert(child.path.clone());
            } else if let Some(files) = files_below.get(&child.path) {
                below.extend(files.iter().cloned());
            }
        }

        let bytes = below.iter().filter_map(|path| file_sizes.get(path)).sum();
        files_below.insert(entry.path.clone(), below);
        sizes.push(DirectorySize {
            entry: entry.clone(),
            bytes,
        });
    });

    sizes
}

/// What `find` matches against
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Substring of the entry name
    pub name: Option<String>,
    /// Exact file extension, without the dot
    pub extension: Option<String>,
}

impl Query {
    /// Returns true if every given criterion matches
    pub fn matches(&self, entry: &FsEntry) -> bool {
        let name_ok = self
            .name
            .as_deref()
            .map_or(true, |name| entry.name.contains(name));
        let ext_ok = self
            .extension
            .as_deref()
            .map_or(true, |ext| entry.extension.as_deref() == Some(ext));
        name_ok && ext_ok
    }
}

/// Entries matching `query`, in pre-order
///
/// With `first_only` the search stops at the first match.
pub fn find(tree: &DirTraversal, root: &FsEntry, query: &Query, first_only: bool) -> Vec<FsEntry> {
    if first_only {
        tree.find_first(root.clone(), |entry| query.matches(entry))
            .into_iter()
            .collect()
    } else {
        tree.find_all(root.clone(), |entry| query.matches(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    // project/
    //   src/
    //     lib.rs     (10 bytes)
    //     main.rs    (20 bytes)
    //   Cargo.toml   (5 bytes)
    //   README.md    (7 bytes)
    fn create_project() -> (TempDir, FsEntry) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("project");
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/lib.rs"), "0123456789").unwrap();
        fs::write(root.join("src/main.rs"), "01234567890123456789").unwrap();
        fs::write(root.join("Cargo.toml"), "01234").unwrap();
        fs::write(root.join("README.md"), "0123456").unwrap();

        let entry = FsEntry::from_path(&root, false).unwrap();
        (temp, entry)
    }

    fn names(entries: &[FsEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_render_tree() {
        let (_temp, root) = create_project();
        let tree = FsChildren::new().into_traversal();

        let rendered = render_tree(&tree, &root).unwrap();
        insta::assert_snapshot!(rendered, @r"
        project/
        ├── src/
        │   ├── lib.rs
        │   └── main.rs
        ├── Cargo.toml
        └── README.md
        ");
    }

    #[test]
    fn test_listing_orders() {
        let (_temp, root) = create_project();
        let tree = FsChildren::new().into_traversal();

        assert_eq!(
            names(&listing(&tree, &root, TraversalOrder::PreOrder)),
            vec!["project", "src", "lib.rs", "main.rs", "Cargo.toml", "README.md"]
        );
        assert_eq!(
            names(&listing(&tree, &root, TraversalOrder::PostOrder)),
            vec!["lib.rs", "main.rs", "src", "Cargo.toml", "README.md", "project"]
        );
        assert_eq!(
            names(&listing(&tree, &root, TraversalOrder::BreadthFirst)),
            vec!["project", "src", "Cargo.toml", "README.md", "lib.rs", "main.rs"]
        );
    }

    #[test]
    fn test_levels() {
        let (_temp, root) = create_project();
        let tree = FsChildren::new().into_traversal();

        let levels = levels(&tree, &root);
        let levels: Vec<Vec<&str>> = levels.iter().map(|level| names(level)).collect();
        assert_eq!(
            levels,
            vec![
                vec!["project"],
                vec!["src", "Cargo.toml", "README.md"],
                vec!["lib.rs", "main.rs"],
            ]
        );
    }

    #[test]
    fn test_disk_usage() {
        let (_temp, root) = create_project();
        let tree = FsChildren::new().into_traversal();

        let usage = disk_usage(&tree, &root).unwrap();
        assert_eq!(
            usage,
            Usage {
                bytes: 42,
                files: 4,
                directories: 2,
            }
        );
    }

    #[test]
    fn test_directory_sizes() {
        let (_temp, root) = create_project();
        let tree = FsChildren::new().into_traversal();

        let sizes: Vec<_> = directory_sizes(&tree, &root)
            .into_iter()
            .map(|d| (d.entry.name, d.bytes))
            .collect();
        assert_eq!(
            sizes,
            vec![("src".to_string(), 30), ("project".to_string(), 42)]
        );
    }

    #[test]
    fn test_find() {
        let (_temp, root) = create_project();
        let tree = FsChildren::new().into_traversal();

        let rust = Query {
            extension: Some("rs".to_string()),
            ..Query::default()
        };
        assert_eq!(names(&find(&tree, &root, &rust, false)), vec!["lib.rs", "main.rs"]);
        assert_eq!(names(&find(&tree, &root, &rust, true)), vec!["lib.rs"]);

        let readme = Query {
            name: Some("READ".to_string()),
            ..Query::default()
        };
        assert_eq!(names(&find(&tree, &root, &readme, false)), vec!["README.md"]);

        let nothing = Query {
            name: Some("nothing".to_string()),
            extension: Some("rs".to_string()),
        };
        assert!(find(&tree, &root, &nothing, true).is_empty());
    }

    #[test]
    fn test_single_file_root() {
        let (_temp, root) = create_project();
        let tree = FsChildren::new().into_traversal();
        let file = FsEntry::from_path(root.path.join("Cargo.toml"), false).unwrap();

        assert_eq!(render_tree(&tree, &file).as_deref(), Some("Cargo.toml"));
        assert_eq!(
            disk_usage(&tree, &file),
            Some(Usage {
                bytes: 5,
                files: 1,
                directories: 0,
            })
        );
        assert!(directory_sizes(&tree, &file).is_empty());
    }

    // r/
    //   data/
    //     big.bin  (100 bytes)
    //   link1 -> data
    //   link2 -> data
    #[cfg(unix)]
    fn create_shared_links() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("r");
        fs::create_dir_all(root.join("data")).unwrap();
        fs::write(root.join("data/big.bin"), vec![0u8; 100]).unwrap();
        std::os::unix::fs::symlink(root.join("data"), root.join("link1")).unwrap();
        std::os::unix::fs::symlink(root.join("data"), root.join("link2")).unwrap();
        (temp, root)
    }

    #[cfg(unix)]
    #[test]
    fn test_shared_link_target_counted_once() {
        let (_temp, path) = create_shared_links();
        let tree = FsChildren::new().follow_links(true).into_traversal();
        let root = FsEntry::open_root(&path, true).unwrap();

        // r, data and big.bin; both links resolve to data
        assert_eq!(tree.count(root.clone()), 3);
        assert_eq!(
            disk_usage(&tree, &root),
            Some(Usage {
                bytes: 100,
                files: 1,
                directories: 2,
            })
        );

        let sizes: Vec<_> = directory_sizes(&tree, &root)
            .into_iter()
            .map(|d| (d.entry.name, d.bytes))
            .collect();
        assert_eq!(sizes, vec![("data".to_string(), 100), ("r".to_string(), 100)]);
    }

    #[cfg(unix)]
    #[test]
    fn test_render_shared_link_target_once() {
        let (_temp, path) = create_shared_links();
        let tree = FsChildren::new().follow_links(true).into_traversal();
        let root = FsEntry::open_root(&path, true).unwrap();

        let rendered = render_tree(&tree, &root).unwrap();
        insta::assert_snapshot!(rendered, @r"
        r/
        ├── data/
        │   └── big.bin
        ├── link1/ (see above)
        └── link2/ (see above)
        ");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_root_is_walked() {
        let (_temp, project) = create_project();
        let link = project.path.with_file_name("current");
        std::os::unix::fs::symlink(&project.path, &link).unwrap();

        let tree = FsChildren::new().into_traversal();
        let root = FsEntry::open_root(&link, false).unwrap();
        assert!(root.is_directory());

        let usage = disk_usage(&tree, &root).unwrap();
        assert_eq!(usage.bytes, 42);
        assert_eq!(
            names(&listing(&tree, &root, TraversalOrder::BreadthFirst)),
            vec!["current", "src", "Cargo.toml", "README.md", "lib.rs", "main.rs"]
        );
    }
}
