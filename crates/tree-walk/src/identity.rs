//! Reference identity for nodes

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::ptr;

/// A node compared and hashed by its address rather than its value
///
/// Traversals deduplicate nodes through `Eq` + `Hash`. For value types two
/// distinct positions holding equal values collapse into one node; wrapping
/// borrowed nodes in `ByAddress` keeps them apart.
///
/// # Example
///
/// ```
/// use tree_walk::ByAddress;
///
/// let a = String::from("leaf");
/// let b = String::from("leaf");
/// assert_eq!(a, b);
/// assert_ne!(ByAddress(&a), ByAddress(&b));
/// assert_eq!(ByAddress(&a), ByAddress(&a));
/// ```
pub struct ByAddress<'a, T: ?Sized>(pub &'a T);

impl<'a, T: ?Sized> ByAddress<'a, T> {
    /// Wrap a borrowed node
    pub const fn new(node: &'a T) -> Self {
        ByAddress(node)
    }

    /// Get the wrapped reference with its original lifetime
    pub const fn get(self) -> &'a T {
        self.0
    }
}

impl<T: ?Sized> Clone for ByAddress<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for ByAddress<'_, T> {}

impl<T: ?Sized> PartialEq for ByAddress<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.0, other.0)
    }
}

impl<T: ?Sized> Eq for ByAddress<'_, T> {}

impl<T: ?Sized> Hash for ByAddress<'_, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Thin address only; metadata of unsized pointers is ignored
        (self.0 as *const T).cast::<()>().hash(state);
    }
}

impl<T: ?Sized> Deref for ByAddress<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.0
    }
}

impl<'a, T: ?Sized> From<&'a T> for ByAddress<'a, T> {
    fn from(node: &'a T) -> Self {
        ByAddress(node)
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for ByAddress<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByAddress({:?} @ {:p})", self.0, self.0)
    }
}
