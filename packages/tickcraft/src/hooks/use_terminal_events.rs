use crate::{
    terminal::{TerminalEvent, TerminalEvents},
    ComponentUpdater, Hook, Hooks,
};
use futures::stream::Stream;
use std::{
    pin::Pin,
    task::{Context, Poll},
};

mod private {
    pub trait Sealed {}
    impl Sealed for crate::Hooks<'_> {}
}

/// `UseTerminalEvents` is a hook that allows a component to react to terminal events, such as key
/// presses.
pub trait UseTerminalEvents: private::Sealed {
    /// Registers a function to be invoked for every terminal event that occurs while the
    /// component is mounted. Like other hook callbacks, the function is captured once, on the
    /// component's first update.
    fn use_terminal_events<F>(&mut self, f: F)
    where
        F: FnMut(TerminalEvent) + Send + 'static;
}

impl UseTerminalEvents for Hooks<'_> {
    fn use_terminal_events<F>(&mut self, f: F)
    where
        F: FnMut(TerminalEvent) + Send + 'static,
    {
        self.use_hook(move || UseTerminalEventsImpl {
            events: None,
            f: Box::new(f),
        });
    }
}

struct UseTerminalEventsImpl {
    events: Option<TerminalEvents>,
    f: Box<dyn FnMut(TerminalEvent) + Send>,
}

impl Hook for UseTerminalEventsImpl {
    fn poll_change(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let s = &mut *self;
        if let Some(events) = s.events.as_mut() {
            while let Poll::Ready(Some(event)) = Pin::new(&mut *events).poll_next(cx) {
                (s.f)(event);
            }
        }
        Poll::Pending
    }

    fn pre_component_update(&mut self, updater: &mut ComponentUpdater) {
        if self.events.is_none() {
            self.events = updater.terminal_events();
        }
    }
}
