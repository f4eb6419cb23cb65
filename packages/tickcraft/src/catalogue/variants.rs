use crate::{
    catalogue::CounterProps,
    components::{Text, TextProps},
    hooks::{UseEffect, UseInterval, UseState, UseTerminalEvents},
    AnyElement, Component, ComponentUpdater, Element, Hook, Hooks, KeyCode, KeyEvent,
    KeyEventKind, TerminalEvent,
};
use async_io::Timer;
use futures::stream::Stream;
use std::{
    pin::Pin,
    sync::{Arc, Mutex},
    task::{Context, Poll, Waker},
    time::Duration,
};

mod private {
    pub trait Sealed {}
    impl Sealed for crate::Hooks<'_> {}
}

/// A counter that suffers from a frozen snapshot.
///
/// This looks almost identical to [`Counter`](crate::catalogue::Counter), but its tick callback
/// adds one to a plain value captured from the count instead of updating through the
/// [`State`](crate::hooks::State) handle. The callback is created once, on the component's first
/// update, when the count is zero, so every tick computes `0 + 1` and the display sticks at 1 no
/// matter how long the timer runs.
///
/// Key bindings are the same as [`Counter`](crate::catalogue::Counter)'s.
pub struct StaleCounter;

impl Component for StaleCounter {
    type Props = CounterProps;

    fn new(_props: &Self::Props) -> Self {
        Self
    }

    fn update(
        &mut self,
        props: &Self::Props,
        mut hooks: Hooks<'_>,
        updater: &mut ComponentUpdater<'_>,
    ) {
        let count = hooks.use_state(|| 0i64);
        let should_exit = hooks.use_state(|| false);

        // recomputed every update, but the callback below only ever sees the first one
        let snapshot = count.get();
        let timer = {
            let on_tick = props.on_tick.clone();
            hooks.use_interval(props.period, move || {
                count.set(snapshot + 1);
                on_tick(count.get());
            })
        };
        hooks.use_effect(move || timer.start(), ());

        hooks.use_terminal_events(move |event| match event {
            TerminalEvent::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                match code {
                    KeyCode::Char('s') => timer.start(),
                    KeyCode::Char('x') => timer.stop(),
                    KeyCode::Char('r') => count.set(0),
                    KeyCode::Char('q') => should_exit.set(true),
                    _ => {}
                }
            }
            _ => {}
        });

        if should_exit.get() {
            updater.exit();
        }

        updater.update_children([
            AnyElement::from(Element::<Text>::new(TextProps {
                content: format!("count => {}", count),
            })),
            Element::<Text>::new(TextProps {
                content: format!(
                    "timer => {}",
                    if timer.is_running() {
                        "running"
                    } else {
                        "stopped"
                    }
                ),
            })
            .into(),
        ]);
    }
}

/// `UseLeakyInterval` is a deliberately broken sibling of
/// [`use_interval`](crate::hooks::UseInterval::use_interval): arming is not guarded, so every
/// call to [`start`](LeakyIntervalHandle::start) adds another concurrent timer behind the same
/// callback. Two starts means twice the tick rate. It exists to make the cost of an unguarded
/// start observable.
pub trait UseLeakyInterval: private::Sealed {
    /// Registers the leaky timer. See [`use_interval`](crate::hooks::UseInterval::use_interval)
    /// for the basics; this version starts with zero timers armed and never deduplicates them.
    fn use_leaky_interval<F>(&mut self, period: Duration, f: F) -> LeakyIntervalHandle
    where
        F: FnMut() + Send + 'static;
}

impl UseLeakyInterval for Hooks<'_> {
    fn use_leaky_interval<F>(&mut self, period: Duration, f: F) -> LeakyIntervalHandle
    where
        F: FnMut() + Send + 'static,
    {
        self.use_hook(move || LeakyIntervalImpl {
            shared: Arc::new(Mutex::new(LeakyShared {
                armed: 0,
                dirty: false,
                waker: None,
            })),
            period,
            f: Box::new(f),
            timers: Vec::new(),
        })
        .handle()
    }
}

struct LeakyShared {
    armed: usize,
    dirty: bool,
    waker: Option<Waker>,
}

impl LeakyShared {
    fn wake(&mut self) {
        self.dirty = true;
        if let Some(waker) = self.waker.take() {
            waker.wake();
        }
    }
}

/// A handle for controlling the timers registered by
/// [`use_leaky_interval`](UseLeakyInterval::use_leaky_interval).
#[derive(Clone)]
pub struct LeakyIntervalHandle {
    shared: Arc<Mutex<LeakyShared>>,
}

impl LeakyIntervalHandle {
    /// Arms another timer. Unlike [`IntervalHandle::start`](crate::hooks::IntervalHandle::start),
    /// this is never a no-op.
    pub fn start(&self) {
        let mut shared = self.shared.lock().unwrap();
        shared.armed += 1;
        shared.wake();
    }

    /// Disarms the most recently armed timer, if any. The rest keep ticking.
    pub fn stop(&self) {
        let mut shared = self.shared.lock().unwrap();
        if shared.armed > 0 {
            shared.armed -= 1;
            shared.wake();
        }
    }

    /// Returns the number of timers currently armed.
    pub fn armed(&self) -> usize {
        self.shared.lock().unwrap().armed
    }
}

struct LeakyIntervalImpl {
    shared: Arc<Mutex<LeakyShared>>,
    period: Duration,
    f: Box<dyn FnMut() + Send>,
    timers: Vec<Timer>,
}

impl LeakyIntervalImpl {
    fn handle(&self) -> LeakyIntervalHandle {
        LeakyIntervalHandle {
            shared: self.shared.clone(),
        }
    }
}

impl Hook for LeakyIntervalImpl {
    fn poll_change(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let s = &mut *self;
        let mut redraw = false;
        let armed = {
            let mut shared = s.shared.lock().unwrap();
            shared.waker = Some(cx.waker().clone());
            if shared.dirty {
                shared.dirty = false;
                redraw = true;
            }
            shared.armed
        };
        s.timers.truncate(armed);
        while s.timers.len() < armed {
            s.timers.push(Timer::interval(s.period));
        }
        // every armed timer drives the same callback
        for timer in s.timers.iter_mut() {
            while let Poll::Ready(Some(_)) = Pin::new(&mut *timer).poll_next(cx) {
                (s.f)();
            }
        }
        if redraw {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }
}

/// A counter that accumulates timers.
///
/// Its timer hook does not guard against double arming, so every press of `s` stacks another
/// timer behind the same callback and the count starts climbing that much faster. `x` only
/// disarms the most recently added timer, one per press.
///
/// Key bindings:
///
/// - `s` arms one more timer
/// - `x` disarms one timer
/// - `r` resets the count to zero
/// - `q` exits the render loop
pub struct LeakyCounter;

impl Component for LeakyCounter {
    type Props = CounterProps;

    fn new(_props: &Self::Props) -> Self {
        Self
    }

    fn update(
        &mut self,
        props: &Self::Props,
        mut hooks: Hooks<'_>,
        updater: &mut ComponentUpdater<'_>,
    ) {
        let count = hooks.use_state(|| 0i64);
        let should_exit = hooks.use_state(|| false);

        let timer = {
            let on_tick = props.on_tick.clone();
            hooks.use_leaky_interval(props.period, move || {
                count.set_with(|c| *c += 1);
                on_tick(count.get());
            })
        };
        {
            let timer = timer.clone();
            hooks.use_effect(move || timer.start(), ());
        }

        {
            let timer = timer.clone();
            hooks.use_terminal_events(move |event| match event {
                TerminalEvent::Key(KeyEvent { code, kind, .. })
                    if kind != KeyEventKind::Release =>
                {
                    match code {
                        KeyCode::Char('s') => timer.start(),
                        KeyCode::Char('x') => timer.stop(),
                        KeyCode::Char('r') => count.set(0),
                        KeyCode::Char('q') => should_exit.set(true),
                        _ => {}
                    }
                }
                _ => {}
            });
        }

        if should_exit.get() {
            updater.exit();
        }

        updater.update_children([
            AnyElement::from(Element::<Text>::new(TextProps {
                content: format!("count => {}", count),
            })),
            Element::<Text>::new(TextProps {
                content: format!("timers => {}", timer.armed()),
            })
            .into(),
        ]);
    }
}

/// A counter whose timer never settles.
///
/// An effect keyed on the count restarts the timer, so every tick rearms a fresh timer and pays
/// the full period again. The `starts` line makes the churn visible: a well-behaved counter arms
/// its timer once, while this one's start count climbs in lockstep with the count itself.
///
/// Key bindings are the same as [`Counter`](crate::catalogue::Counter)'s.
pub struct ChurningCounter;

impl Component for ChurningCounter {
    type Props = CounterProps;

    fn new(_props: &Self::Props) -> Self {
        Self
    }

    fn update(
        &mut self,
        props: &Self::Props,
        mut hooks: Hooks<'_>,
        updater: &mut ComponentUpdater<'_>,
    ) {
        let count = hooks.use_state(|| 0i64);
        let should_exit = hooks.use_state(|| false);

        let timer = {
            let on_tick = props.on_tick.clone();
            hooks.use_interval(props.period, move || {
                count.set_with(|c| *c += 1);
                on_tick(count.get());
            })
        };
        // keyed on the very value the timer changes: re-runs after every tick
        hooks.use_effect(move || timer.restart(), count.get());

        hooks.use_terminal_events(move |event| match event {
            TerminalEvent::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                match code {
                    KeyCode::Char('s') => timer.start(),
                    KeyCode::Char('x') => timer.stop(),
                    KeyCode::Char('r') => count.set(0),
                    KeyCode::Char('q') => should_exit.set(true),
                    _ => {}
                }
            }
            _ => {}
        });

        if should_exit.get() {
            updater.exit();
        }

        updater.update_children([
            AnyElement::from(Element::<Text>::new(TextProps {
                content: format!("count => {}", count),
            })),
            Element::<Text>::new(TextProps {
                content: format!("starts => {}", timer.start_count()),
            })
            .into(),
            Element::<Text>::new(TextProps {
                content: format!(
                    "timer => {}",
                    if timer.is_running() {
                        "running"
                    } else {
                        "stopped"
                    }
                ),
            })
            .into(),
        ]);
    }
}
