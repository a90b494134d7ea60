//! Guards that restore a renderer's nesting state when a level is left.

use core::ops::{Deref, DerefMut};

/// State that grows when a level is entered and must shrink back on exit.
pub(crate) trait Nesting {
    /// Snapshot taken on entry.
    type Saved;

    /// Puts the snapshot back.
    fn restore(&mut self, saved: Self::Saved);
}

/// Holds a renderer for the duration of one level.
///
/// Dropping the scope restores the snapshot, on every exit path including
/// early returns through `?`.
pub(crate) struct Scope<'a, T: Nesting> {
    target: &'a mut T,
    saved: Option<T::Saved>,
}

impl<'a, T: Nesting> Scope<'a, T> {
    pub(crate) fn new(target: &'a mut T, saved: T::Saved) -> Self {
        Self {
            target,
            saved: Some(saved),
        }
    }
}

impl<T: Nesting> Deref for Scope<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.target
    }
}

impl<T: Nesting> DerefMut for Scope<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.target
    }
}

impl<T: Nesting> Drop for Scope<'_, T> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.target.restore(saved);
        }
    }
}
