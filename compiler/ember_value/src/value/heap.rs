//! Shared mutable container handle.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Handle to a container reached through a `Value`.
///
/// Cloning the handle shares the container; mutation through `write()` is
/// seen by every holder. The constructor is crate-private so containers are
/// only created through the `Value` factories.
pub struct Handle<T>(Arc<RwLock<T>>);

impl<T> Handle<T> {
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        Handle(Arc::new(RwLock::new(value)))
    }

    #[inline]
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.read()
    }

    #[inline]
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write()
    }

    /// Whether both handles point at the same container.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Stable identity for debugging output.
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>() as usize
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Handle(Arc::clone(&self.0))
    }
}
