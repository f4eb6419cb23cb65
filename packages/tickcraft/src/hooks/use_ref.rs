use crate::{Hook, Hooks};
use generational_box::{AnyStorage, GenerationalBox, Owner, SyncStorage};
use std::{
    fmt::{self, Debug, Display, Formatter},
    ops,
};

mod private {
    pub trait Sealed {}
    impl Sealed for crate::Hooks<'_> {}
}

/// `Ref` is a copyable handle to a value that is owned by a component but does not cause
/// re-renders when it changes.
///
/// # Panics
///
/// Attempts to read a ref after its owning component has been dropped will panic.
pub struct Ref<T: Send + Sync + 'static> {
    inner: GenerationalBox<T, SyncStorage>,
}

/// A reference to the value of a [`Ref`].
pub struct RefRef<'a, T: 'static> {
    inner: <SyncStorage as AnyStorage>::Ref<'a, T>,
}

impl<T: 'static> ops::Deref for RefRef<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: Copy + Sync + Send + 'static> Ref<T> {
    /// Gets a copy of the current value of the ref.
    ///
    /// # Panics
    ///
    /// Panics if the owning component has been dropped.
    pub fn get(&self) -> T {
        *self.read()
    }

    /// Gets a copy of the current value of the ref, if its owning component has not been
    /// dropped.
    pub fn try_get(&self) -> Option<T> {
        self.inner.try_read().ok().map(|inner| *inner)
    }
}

impl<T: Sync + Send + 'static> Ref<T> {
    /// Sets the value of the ref. This is a no-op if the owning component has been dropped.
    pub fn set(&mut self, value: T) {
        if let Ok(mut v) = self.inner.try_write() {
            *v = value;
        }
    }

    /// Updates the value of the ref based on its current value. This is a no-op if the owning
    /// component has been dropped.
    pub fn set_with<F>(&mut self, f: F)
    where
        F: FnOnce(&mut T),
    {
        if let Ok(mut v) = self.inner.try_write() {
            f(&mut v);
        }
    }

    /// Returns a reference to the ref's value.
    ///
    /// # Panics
    ///
    /// Panics if the owning component has been dropped.
    pub fn read(&self) -> RefRef<T> {
        RefRef {
            inner: self.inner.read(),
        }
    }
}

impl<T: Sync + Send + 'static> Clone for Ref<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Sync + Send + 'static> Copy for Ref<T> {}

impl<T: Debug + Sync + Send + 'static> Debug for Ref<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.read().fmt(f)
    }
}

impl<T: Display + Sync + Send + 'static> Display for Ref<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.read().fmt(f)
    }
}

/// `UseRef` is a hook that allows you to store a value which can be modified but doesn't impact
/// rendering.
///
/// It is almost identical to [`UseState`](crate::hooks::UseState), but changing the value does
/// not trigger a re-render. One use for it is bookkeeping that should be observable without
/// participating in the render cycle, such as counting how many update passes a component has
/// gone through.
pub trait UseRef: private::Sealed {
    /// Creates a new ref with its initial value computed by the given function.
    fn use_ref<F, T>(&mut self, f: F) -> Ref<T>
    where
        F: FnOnce() -> T,
        T: Send + Sync + Unpin + 'static;
}

impl UseRef for Hooks<'_> {
    fn use_ref<F, T>(&mut self, f: F) -> Ref<T>
    where
        F: FnOnce() -> T,
        T: Send + Sync + Unpin + 'static,
    {
        let hook = self.use_hook(move || UseRefImpl::new(f()));
        hook.value
    }
}

struct UseRefImpl<T: Unpin + Send + Sync + 'static> {
    _storage: Owner<SyncStorage>,
    value: Ref<T>,
}

impl<T: Unpin + Send + Sync + 'static> UseRefImpl<T> {
    pub fn new(initial_value: T) -> Self {
        let storage = Owner::default();
        UseRefImpl {
            value: Ref {
                inner: storage.insert(initial_value),
            },
            _storage: storage,
        }
    }
}

impl<T: Send + Sync + Unpin> Hook for UseRefImpl<T> {}
