//! Tree Walk Library
//!
//! Reusable traversal, search and structural mapping over any tree-shaped
//! structure, without callers writing recursion themselves.
//!
//! # Core Concepts
//!
//! - **ChildAccessor**: how to get the ordered children of a node
//! - **TreeTraversal**: the operations (depth-first, breadth-first, find, map)
//! - **TreeWalker**: lazy iteration in pre-order, post-order or level order
//! - **ByAddress**: opt-in reference identity for nodes
//!
//! Every operation keeps a per-call visited set, so shared children (DAGs)
//! are processed once and cycles terminate.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use tree_walk::prelude::*;
//!
//! let edges: HashMap<&str, Vec<&str>> =
//!     HashMap::from([("A", vec!["B", "C"]), ("B", vec!["D"])]);
//! let tree = TreeTraversal::from_fn(|node: &&str| edges.get(node).cloned().unwrap_or_default());
//!
//! let mut order = Vec::new();
//! tree.process_depth_first("A", |node, _children| order.push(*node));
//! assert_eq!(order, ["D", "B", "C", "A"]);
//!
//! let rendered = tree.map("A", |node, kids: Vec<String>| format!("{}({})", node, kids.join(",")));
//! assert_eq!(rendered.as_deref(), Some("A(B(D()),C())"));
//! ```

mod children;
mod identity;
mod traversal;
mod walker;

pub use children::ChildAccessor;
pub use identity::ByAddress;
pub use traversal::TreeTraversal;
pub use walker::{TraversalOrder, TreeWalker};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{ByAddress, ChildAccessor, TraversalOrder, TreeTraversal, TreeWalker};
}
