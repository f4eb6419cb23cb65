use std::{ops::Deref, sync::Arc};

/// `Handler` is a type representing an optional event handler, commonly used for component
/// properties.
///
/// Any function that takes a single argument and returns `()` can be converted into a `Handler`,
/// and it can be invoked using function call syntax. Handlers are cheap to clone, so they can be
/// moved into timer callbacks and effect closures freely.
#[derive(Clone)]
pub struct Handler<T>(Arc<dyn Fn(T) + Send + Sync + 'static>);

impl<T> Default for Handler<T> {
    fn default() -> Self {
        Self(Arc::new(|_| {}))
    }
}

impl<T, F> From<F> for Handler<T>
where
    F: Fn(T) + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

impl<T> Deref for Handler<T> {
    type Target = dyn Fn(T) + Send + Sync + 'static;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}
