//! Lazy tree walking in pre-order, post-order or level order

use crate::children::ChildAccessor;
use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

/// Traversal order for walking the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum TraversalOrder {
    /// Visit parent before children (top-down)
    #[display(fmt = "pre-order")]
    PreOrder,
    /// Visit children before parent (bottom-up)
    #[display(fmt = "post-order")]
    PostOrder,
    /// Visit level by level (breadth-first)
    #[display(fmt = "breadth-first")]
    BreadthFirst,
}

/// A node whose children have been materialized but not yet all walked
struct Frame<T> {
    node: T,
    children: Vec<T>,
    next: usize,
}

enum Pending<T> {
    PreOrder(Vec<T>),
    PostOrder(Vec<Frame<T>>),
    BreadthFirst(VecDeque<T>),
}

/// Iterator for traversing a tree in different orders
///
/// Each reachable node is yielded once; nodes reached again through another
/// parent, or through a cycle, are skipped. All pending work lives on the
/// heap, so deep trees do not grow the call stack.
pub struct TreeWalker<'a, T, C: ?Sized> {
    accessor: &'a C,
    pending: Pending<T>,
    visited: HashSet<T>,
}

impl<'a, T, C> TreeWalker<'a, T, C>
where
    T: Clone + Eq + Hash,
    C: ChildAccessor<T> + ?Sized,
{
    /// Create a new tree walker starting from the given node
    ///
    /// A `None` root yields nothing.
    pub fn new(accessor: &'a C, root: Option<T>, order: TraversalOrder) -> Self {
        let mut visited = HashSet::new();

        let pending = match order {
            TraversalOrder::PreOrder => Pending::PreOrder(root.into_iter().collect()),
            TraversalOrder::PostOrder => Pending::PostOrder(
                root.into_iter()
                    .map(|node| {
                        visited.insert(node.clone());
                        let children = accessor.children(&node);
                        Frame {
                            node,
                            children,
                            next: 0,
                        }
                    })
                    .collect(),
            ),
            TraversalOrder::BreadthFirst => Pending::BreadthFirst(
                root.into_iter()
                    .inspect(|node| {
                        visited.insert(node.clone());
                    })
                    .collect(),
            ),
        };

        Self {
            accessor,
            pending,
            visited,
        }
    }

    /// The order this walker yields nodes in
    pub fn order(&self) -> TraversalOrder {
        match self.pending {
            Pending::PreOrder(_) => TraversalOrder::PreOrder,
            Pending::PostOrder(_) => TraversalOrder::PostOrder,
            Pending::BreadthFirst(_) => TraversalOrder::BreadthFirst,
        }
    }

    /// Number of distinct nodes reached so far, including queued ones
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Advance to the next node, together with its materialized children
    pub(crate) fn next_with_children(&mut self) -> Option<(T, Vec<T>)> {
        match &mut self.pending {
            Pending::PreOrder(stack) => {
                Self::next_preorder(self.accessor, stack, &mut self.visited)
            }
            Pending::PostOrder(frames) => {
                Self::next_postorder(self.accessor, frames, &mut self.visited)
            }
            Pending::BreadthFirst(queue) => {
                Self::next_breadthfirst(self.accessor, queue, &mut self.visited)
            }
        }
    }

    fn next_preorder(
        accessor: &C,
        stack: &mut Vec<T>,
        visited: &mut HashSet<T>,
    ) -> Option<(T, Vec<T>)> {
        while let Some(current) = stack.pop() {
            // A node can be pushed by several parents before it is reached
            if !visited.insert(current.clone()) {
                continue;
            }

            let children = accessor.children(&current);

            // Add children in reverse order so they're popped in correct order
            stack.extend(
                children
                    .iter()
                    .rev()
                    .filter(|child| !visited.contains(*child))
                    .cloned(),
            );

            return Some((current, children));
        }
        None
    }

    fn next_postorder(
        accessor: &C,
        frames: &mut Vec<Frame<T>>,
        visited: &mut HashSet<T>,
    ) -> Option<(T, Vec<T>)> {
        loop {
            let frame = frames.last_mut()?;

            if frame.next < frame.children.len() {
                let child = frame.children[frame.next].clone();
                frame.next += 1;

                if visited.insert(child.clone()) {
                    let children = accessor.children(&child);
                    frames.push(Frame {
                        node: child,
                        children,
                        next: 0,
                    });
                }
                continue;
            }

            // Every child is finished, so the frame itself is
            let frame = frames.pop()?;
            return Some((frame.node, frame.children));
        }
    }

    fn next_breadthfirst(
        accessor: &C,
        queue: &mut VecDeque<T>,
        visited: &mut HashSet<T>,
    ) -> Option<(T, Vec<T>)> {
        let current = queue.pop_front()?;
        let children = accessor.children(&current);

        // Marked on enqueue so a shared child is queued only once
        for child in &children {
            if visited.insert(child.clone()) {
                queue.push_back(child.clone());
            }
        }

        Some((current, children))
    }
}

impl<T, C> Iterator for TreeWalker<'_, T, C>
where
    T: Clone + Eq + Hash,
    C: ChildAccessor<T> + ?Sized,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_with_children().map(|(node, _)| node)
    }
}
