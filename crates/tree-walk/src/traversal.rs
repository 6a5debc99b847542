//! Traversal, search and mapping operations over a child accessor

use crate::children::ChildAccessor;
use crate::walker::{TraversalOrder, TreeWalker};
use std::collections::{HashMap, HashSet, VecDeque};
use std::convert::Infallible;
use std::hash::Hash;
use std::marker::PhantomData;

/// Reusable tree operations bound to one child accessor
///
/// The traversal holds no state besides the accessor. Every operation
/// allocates its own visited set (and queue or result cache) and drops it on
/// return, so one `TreeTraversal` can be shared freely, including across
/// threads when the accessor and nodes are `Sync`.
///
/// Nodes are deduplicated through `Eq` + `Hash`: within one call a node is
/// processed at most once, whether it is reached again through a second
/// parent or through a cycle. Wrap nodes in [`ByAddress`](crate::ByAddress)
/// for reference identity.
///
/// Every operation accepts `root` as either a node or an `Option`; a `None`
/// root is a valid empty tree.
///
/// # Example
///
/// ```
/// use tree_walk::TreeTraversal;
///
/// // Binary heap layout: children of n are 2n+1 and 2n+2
/// let heap = TreeTraversal::from_fn(|n: &u32| {
///     [2 * n + 1, 2 * n + 2].into_iter().filter(|c| *c < 7)
/// });
///
/// let mut levels = Vec::new();
/// heap.process_breadth_first(0u32, |node, _| levels.push(*node));
/// assert_eq!(levels, [0, 1, 2, 3, 4, 5, 6]);
///
/// let leaves = heap.find_all(0u32, |n| heap.children_of(n).is_empty());
/// assert_eq!(leaves, [3, 4, 5, 6]);
///
/// let size = heap.map(0u32, |_, kids: Vec<usize>| 1 + kids.iter().sum::<usize>());
/// assert_eq!(size, Some(7));
/// ```
pub struct TreeTraversal<T, C> {
    accessor: C,
    _node: PhantomData<fn(&T)>,
}

impl<T, F, I> TreeTraversal<T, F>
where
    F: Fn(&T) -> I,
    I: IntoIterator<Item = T>,
{
    /// Create a traversal from a closure returning a node's children
    pub fn from_fn(children: F) -> Self {
        Self {
            accessor: children,
            _node: PhantomData,
        }
    }
}

impl<T, C> TreeTraversal<T, C>
where
    T: Clone + Eq + Hash,
    C: ChildAccessor<T>,
{
    /// Create a traversal from any child accessor
    pub fn new(accessor: C) -> Self {
        Self {
            accessor,
            _node: PhantomData,
        }
    }

    /// Materialize the children of a node
    pub fn children_of(&self, node: &T) -> Vec<T> {
        self.accessor.children(node)
    }

    /// Walk the tree lazily in the specified order
    pub fn walk(&self, root: impl Into<Option<T>>, order: TraversalOrder) -> TreeWalker<'_, T, C> {
        TreeWalker::new(&self.accessor, root.into(), order)
    }

    /// Visit every reachable node in post-order
    ///
    /// `visit` receives the node together with its full materialized child
    /// list, after every child subtree has been visited.
    pub fn process_depth_first<V>(&self, root: impl Into<Option<T>>, mut visit: V)
    where
        V: FnMut(&T, &[T]),
    {
        let result = self.try_process_depth_first(root, |node, children| {
            visit(node, children);
            Ok::<(), Infallible>(())
        });
        match result {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    /// Post-order visit that stops at the first error returned by `visit`
    ///
    /// The error is handed back unchanged.
    pub fn try_process_depth_first<V, E>(
        &self,
        root: impl Into<Option<T>>,
        visit: V,
    ) -> Result<(), E>
    where
        V: FnMut(&T, &[T]) -> Result<(), E>,
    {
        self.drive(root.into(), TraversalOrder::PostOrder, visit)
    }

    /// Visit every reachable node in level order
    ///
    /// Nodes at depth `d` are all visited, in child order, before any node at
    /// depth `d + 1`.
    pub fn process_breadth_first<V>(&self, root: impl Into<Option<T>>, mut visit: V)
    where
        V: FnMut(&T, &[T]),
    {
        let result = self.try_process_breadth_first(root, |node, children| {
            visit(node, children);
            Ok::<(), Infallible>(())
        });
        match result {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    /// Level-order visit that stops at the first error returned by `visit`
    pub fn try_process_breadth_first<V, E>(
        &self,
        root: impl Into<Option<T>>,
        visit: V,
    ) -> Result<(), E>
    where
        V: FnMut(&T, &[T]) -> Result<(), E>,
    {
        self.drive(root.into(), TraversalOrder::BreadthFirst, visit)
    }

    fn drive<V, E>(&self, root: Option<T>, order: TraversalOrder, mut visit: V) -> Result<(), E>
    where
        V: FnMut(&T, &[T]) -> Result<(), E>,
    {
        let mut walker = TreeWalker::new(&self.accessor, root, order);
        let mut processed = 0usize;

        while let Some((node, children)) = walker.next_with_children() {
            visit(&node, &children)?;
            processed += 1;
        }

        log::trace!("{} traversal processed {} nodes", order, processed);
        Ok(())
    }

    /// Find the first node matching `predicate` in pre-order
    ///
    /// Stops as soon as a match is found.
    pub fn find_first<P>(&self, root: impl Into<Option<T>>, mut predicate: P) -> Option<T>
    where
        P: FnMut(&T) -> bool,
    {
        self.walk(root, TraversalOrder::PreOrder)
            .find(|node| predicate(node))
    }

    /// Find every node matching `predicate`, in pre-order
    pub fn find_all<P>(&self, root: impl Into<Option<T>>, mut predicate: P) -> Vec<T>
    where
        P: FnMut(&T) -> bool,
    {
        self.walk(root, TraversalOrder::PreOrder)
            .filter(|node| predicate(node))
            .collect()
    }

    /// Group reachable nodes by depth (root = level 0)
    pub fn levels(&self, root: impl Into<Option<T>>) -> Vec<Vec<T>> {
        let Some(root) = root.into() else {
            return Vec::new();
        };

        let mut visited = HashSet::from([root.clone()]);
        let mut queue = VecDeque::from([(root, 0usize)]);
        let mut levels: Vec<Vec<T>> = Vec::new();

        while let Some((node, depth)) = queue.pop_front() {
            for child in self.accessor.children(&node) {
                if visited.insert(child.clone()) {
                    queue.push_back((child, depth + 1));
                }
            }

            // Depths arrive in non-decreasing order
            if levels.len() == depth {
                levels.push(Vec::new());
            }
            levels[depth].push(node);
        }

        levels
    }

    /// Count the distinct reachable nodes
    pub fn count(&self, root: impl Into<Option<T>>) -> usize {
        self.walk(root, TraversalOrder::BreadthFirst).count()
    }

    /// Fold the tree bottom-up into a single value
    ///
    /// `combine` receives a node and the results of its children, in child
    /// order; a leaf receives an empty vector. Results are cached per node,
    /// so a node shared by several parents is combined once and its result
    /// cloned for the other parents. A child that is still being combined
    /// higher up the current path (a cycle) contributes no result.
    pub fn map<R, M>(&self, root: impl Into<Option<T>>, mut combine: M) -> Option<R>
    where
        R: Clone,
        M: FnMut(&T, Vec<R>) -> R,
    {
        let result = self.try_map(root, |node, children| {
            Ok::<R, Infallible>(combine(node, children))
        });
        match result {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Bottom-up fold that stops at the first error returned by `combine`
    pub fn try_map<R, M, E>(
        &self,
        root: impl Into<Option<T>>,
        mut combine: M,
    ) -> Result<Option<R>, E>
    where
        R: Clone,
        M: FnMut(&T, Vec<R>) -> Result<R, E>,
    {
        self.try_map_with_children(root, |node, children| {
            combine(node, children.into_iter().map(|(_, result)| result).collect())
        })
    }

    /// Like [`map`](Self::map), pairing each result with the child it came from
    ///
    /// The child is the value as listed under this parent. When a shared node
    /// is reached through several parents, each parent sees its own listed
    /// value next to the one cached result, so a caller can tell the
    /// occurrences apart even though the node was combined once.
    pub fn map_with_children<R, M>(
        &self,
        root: impl Into<Option<T>>,
        mut combine: M,
    ) -> Option<R>
    where
        R: Clone,
        M: FnMut(&T, Vec<(T, R)>) -> R,
    {
        let result = self.try_map_with_children(root, |node, children| {
            Ok::<R, Infallible>(combine(node, children))
        });
        match result {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Fallible [`map_with_children`](Self::map_with_children)
    pub fn try_map_with_children<R, M, E>(
        &self,
        root: impl Into<Option<T>>,
        mut combine: M,
    ) -> Result<Option<R>, E>
    where
        R: Clone,
        M: FnMut(&T, Vec<(T, R)>) -> Result<R, E>,
    {
        struct Frame<T, R> {
            node: T,
            children: Vec<T>,
            next: usize,
            results: Vec<(T, R)>,
        }

        let Some(root) = root.into() else {
            return Ok(None);
        };

        let mut cache: HashMap<T, R> = HashMap::new();
        let mut on_path: HashSet<T> = HashSet::from([root.clone()]);
        let mut stack = vec![Frame {
            children: self.accessor.children(&root),
            node: root,
            next: 0,
            results: Vec::new(),
        }];

        while let Some(frame) = stack.last_mut() {
            if frame.next < frame.children.len() {
                let child = frame.children[frame.next].clone();
                frame.next += 1;

                if let Some(done) = cache.get(&child) {
                    let done = done.clone();
                    frame.results.push((child, done));
                } else if on_path.insert(child.clone()) {
                    let children = self.accessor.children(&child);
                    stack.push(Frame {
                        node: child,
                        children,
                        next: 0,
                        results: Vec::new(),
                    });
                }
                continue;
            }

            let Some(frame) = stack.pop() else { break };
            on_path.remove(&frame.node);
            let value = combine(&frame.node, frame.results)?;

            match stack.last_mut() {
                Some(parent) => {
                    cache.insert(frame.node.clone(), value.clone());
                    parent.results.push((frame.node, value));
                }
                None => {
                    log::trace!("map combined {} distinct nodes", cache.len() + 1);
                    return Ok(Some(value));
                }
            }
        }

        Ok(None)
    }
}

impl<T, C: Clone> Clone for TreeTraversal<T, C> {
    fn clone(&self) -> Self {
        Self {
            accessor: self.accessor.clone(),
            _node: PhantomData,
        }
    }
}
