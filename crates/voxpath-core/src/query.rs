//! Read-only occupancy facade consumed by the search engine.

use std::sync::Arc;

use crate::coords::GlobalVoxelCoordinates;

/// Answers whether a voxel is solid.
///
/// Implementors own the policy for unloaded or out-of-range regions. The
/// search engine only ever reads through this trait and never caches answers
/// between calls, so an implementation backed by a concurrently mutated store
/// must make individual reads safe on its own.
pub trait WorldQuery {
    /// Returns true if the voxel at `pos` blocks movement.
    fn is_occupied(&self, pos: GlobalVoxelCoordinates) -> bool;
}

impl<T: WorldQuery + ?Sized> WorldQuery for &T {
    #[inline]
    fn is_occupied(&self, pos: GlobalVoxelCoordinates) -> bool {
        (**self).is_occupied(pos)
    }
}

impl<T: WorldQuery + ?Sized> WorldQuery for Box<T> {
    #[inline]
    fn is_occupied(&self, pos: GlobalVoxelCoordinates) -> bool {
        (**self).is_occupied(pos)
    }
}

impl<T: WorldQuery + ?Sized> WorldQuery for Arc<T> {
    #[inline]
    fn is_occupied(&self, pos: GlobalVoxelCoordinates) -> bool {
        (**self).is_occupied(pos)
    }
}

/// Adapts a closure into a [`WorldQuery`].
///
/// ```
/// use voxpath_core::{query::from_fn, GlobalVoxelCoordinates, WorldQuery};
///
/// let floor = from_fn(|pos: GlobalVoxelCoordinates| pos.y < 4);
/// assert!(floor.is_occupied(GlobalVoxelCoordinates::new(0, 3, 0)));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct FnQuery<F>(pub F);

impl<F> WorldQuery for FnQuery<F>
where
    F: Fn(GlobalVoxelCoordinates) -> bool,
{
    #[inline]
    fn is_occupied(&self, pos: GlobalVoxelCoordinates) -> bool {
        (self.0)(pos)
    }
}

/// Wrap a closure as a world query.
#[inline]
pub fn from_fn<F>(f: F) -> FnQuery<F>
where
    F: Fn(GlobalVoxelCoordinates) -> bool,
{
    FnQuery(f)
}
