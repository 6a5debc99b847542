//! Directory Tree Library
//!
//! Directory trees as `tree-walk` nodes: entries are read lazily from disk as
//! a traversal reaches them, and each report drives one traversal operation.
//!
//! # Example
//!
//! ```no_run
//! use dir_tree::prelude::*;
//!
//! let tree = FsChildren::new().into_traversal();
//! let root = FsEntry::open_root("./src", false).expect("Failed to load directory");
//!
//! if let Some(rendered) = render_tree(&tree, &root) {
//!     println!("{rendered}");
//! }
//! ```

pub mod entry;
pub mod report;
pub mod source;

pub use entry::{EntryKind, FsEntry};
pub use report::{DirTraversal, DirectorySize, Query, Usage};
pub use source::FsChildren;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::report::{
        directory_sizes, disk_usage, find, levels, listing, render_tree, DirTraversal, Query,
        Usage,
    };
    pub use crate::{EntryKind, FsChildren, FsEntry};
    pub use tree_walk::TraversalOrder;
}
