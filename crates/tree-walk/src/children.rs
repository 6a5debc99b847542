//! The child accessor abstraction

/// Produces the ordered children of a node
///
/// An empty vector marks a leaf. Implementations should be deterministic for
/// a given node during one traversal; the traversal calls the accessor at
/// most once per visited node.
///
/// Any `Fn(&T) -> I` where `I: IntoIterator<Item = T>` is an accessor, so
/// closures and plain functions can be passed directly.
///
/// # Example
///
/// ```
/// use tree_walk::ChildAccessor;
///
/// struct Halves;
///
/// impl ChildAccessor<u32> for Halves {
///     fn children(&self, node: &u32) -> Vec<u32> {
///         if *node > 1 { vec![node / 2] } else { Vec::new() }
///     }
/// }
///
/// assert_eq!(Halves.children(&8), vec![4]);
/// assert!(Halves.children(&1).is_empty());
/// ```
pub trait ChildAccessor<T> {
    /// Get the children of `node`, in traversal order
    fn children(&self, node: &T) -> Vec<T>;
}

impl<T, F, I> ChildAccessor<T> for F
where
    F: Fn(&T) -> I,
    I: IntoIterator<Item = T>,
{
    fn children(&self, node: &T) -> Vec<T> {
        self(node).into_iter().collect()
    }
}
