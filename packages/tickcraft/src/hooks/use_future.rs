use crate::{Hook, Hooks};
use futures::future::BoxFuture;
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

mod private {
    pub trait Sealed {}
    impl Sealed for crate::Hooks<'_> {}
}

/// `UseFuture` is a hook that allows you to spawn an async task which is bound to the lifetime of
/// the component.
pub trait UseFuture: private::Sealed {
    /// Spawns a future which is bound to the lifetime of the component. When the component is
    /// dropped, the future will also be dropped, so no background work outlives the component.
    ///
    /// The given future will only be spawned once, on the component's first update. After that,
    /// calling this function has no effect: any value the future closes over is a snapshot taken
    /// at that time. Read fresh values through [`State`](crate::hooks::State) handles instead.
    fn use_future<F>(&mut self, f: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

impl UseFuture for Hooks<'_> {
    fn use_future<F>(&mut self, f: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.use_hook(move || UseFutureImpl::new(f));
    }
}

struct UseFutureImpl {
    f: Option<BoxFuture<'static, ()>>,
}

impl Hook for UseFutureImpl {
    fn poll_change(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if let Some(f) = self.f.as_mut() {
            if let Poll::Ready(()) = f.as_mut().poll(cx) {
                self.f = None;
            }
        }
        Poll::Pending
    }
}

impl UseFutureImpl {
    pub fn new<F>(f: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            f: Some(Box::pin(f)),
        }
    }
}
