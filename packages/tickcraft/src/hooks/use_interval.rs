use crate::{Hook, Hooks};
use async_io::Timer;
use futures::stream::Stream;
use generational_box::{GenerationalBox, Owner, SyncStorage};
use log::{debug, trace};
use std::{
    pin::Pin,
    task::{Context, Poll, Waker},
    time::Duration,
};

mod private {
    pub trait Sealed {}
    impl Sealed for crate::Hooks<'_> {}
}

/// `UseInterval` is a hook that gives a component a recurring timer which invokes a callback once
/// per period while armed.
///
/// The timer is owned by the component instance: dropping the component (e.g. because its parent
/// stopped rendering it) cancels the timer, so no ticks outlive the instance.
///
/// # Example
///
/// ```no_run
/// # use tickcraft::prelude::*;
/// # use std::time::Duration;
/// # struct Blinker;
/// # impl Component for Blinker {
/// #     type Props = ();
/// #     fn new(_props: &Self::Props) -> Self { Self }
/// fn update(&mut self, _props: &Self::Props, mut hooks: Hooks, updater: &mut ComponentUpdater) {
///     let on = hooks.use_state(|| false);
///     hooks.use_interval(Duration::from_millis(500), move || on.set_with(|v| *v = !*v))
///         .start();
///     updater.update_children([Element::<Text>::new(TextProps {
///         content: if on.get() { "*" } else { " " }.to_string(),
///     })]);
/// }
/// # }
/// ```
pub trait UseInterval: private::Sealed {
    /// Registers a recurring timer with the given period and tick callback, returning a handle
    /// for controlling it. The timer starts out disarmed; call
    /// [`start`](IntervalHandle::start) to arm it.
    ///
    /// Both the period and the callback are captured once, on the component's first update.
    /// Values the callback closes over are therefore snapshots frozen at that time: read and
    /// write fresh values through [`State`](crate::hooks::State) handles, never through captured
    /// plain values.
    fn use_interval<F>(&mut self, period: Duration, f: F) -> IntervalHandle
    where
        F: FnMut() + Send + 'static;
}

impl UseInterval for Hooks<'_> {
    fn use_interval<F>(&mut self, period: Duration, f: F) -> IntervalHandle
    where
        F: FnMut() + Send + 'static,
    {
        self.use_hook(move || UseIntervalImpl::new(period, f)).handle
    }
}

struct IntervalState {
    running: bool,
    epoch: u64,
    starts: u64,
    dirty: bool,
    waker: Option<Waker>,
}

impl IntervalState {
    fn wake(&mut self) {
        self.dirty = true;
        if let Some(waker) = self.waker.take() {
            waker.wake();
        }
    }
}

/// A copyable handle for controlling the timer registered by
/// [`use_interval`](UseInterval::use_interval).
///
/// There is at most one armed timer behind a handle at any time. All control methods become
/// no-ops once the owning component has been dropped.
#[derive(Clone, Copy)]
pub struct IntervalHandle {
    inner: GenerationalBox<IntervalState, SyncStorage>,
}

impl IntervalHandle {
    /// Arms the timer. This is a no-op while the timer is already armed: the running timer keeps
    /// its cadence and no second timer is created.
    pub fn start(&self) {
        if let Ok(mut state) = self.inner.try_write() {
            if state.running {
                return;
            }
            state.running = true;
            state.epoch += 1;
            state.starts += 1;
            state.wake();
            debug!("interval armed");
        }
    }

    /// Disarms the timer. This is a no-op while the timer is already disarmed. Once this call
    /// returns, no further tick is observable.
    pub fn stop(&self) {
        if let Ok(mut state) = self.inner.try_write() {
            if !state.running {
                return;
            }
            state.running = false;
            state.wake();
            debug!("interval disarmed");
        }
    }

    /// Discards the current timer, if any, and arms a fresh one, restarting the full period.
    pub fn restart(&self) {
        if let Ok(mut state) = self.inner.try_write() {
            state.running = true;
            state.epoch += 1;
            state.starts += 1;
            state.wake();
            debug!("interval rearmed");
        }
    }

    /// Returns whether the timer is currently armed.
    ///
    /// # Panics
    ///
    /// Panics if the owning component has been dropped.
    pub fn is_running(&self) -> bool {
        self.inner.read().running
    }

    /// Returns whether the timer is currently armed, or `None` if the owning component has been
    /// dropped. Since dropping the component cancels the timer, a `None` result means no further
    /// ticks can occur.
    pub fn try_is_running(&self) -> Option<bool> {
        self.inner.try_read().ok().map(|state| state.running)
    }

    /// Returns the number of times the timer has been armed so far. A well-behaved component
    /// arms its timer once per start: higher numbers indicate churn.
    pub fn start_count(&self) -> u64 {
        self.inner.read().starts
    }
}

struct UseIntervalImpl {
    _storage: Owner<SyncStorage>,
    handle: IntervalHandle,
    period: Duration,
    f: Box<dyn FnMut() + Send>,
    timer: Option<Timer>,
    timer_epoch: u64,
}

impl UseIntervalImpl {
    fn new<F>(period: Duration, f: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let storage = Owner::default();
        UseIntervalImpl {
            handle: IntervalHandle {
                inner: storage.insert(IntervalState {
                    running: false,
                    epoch: 0,
                    starts: 0,
                    dirty: false,
                    waker: None,
                }),
            },
            _storage: storage,
            period,
            f: Box::new(f),
            timer: None,
            timer_epoch: 0,
        }
    }
}

impl Hook for UseIntervalImpl {
    fn poll_change(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let s = &mut *self;
        let mut redraw = false;
        loop {
            // The state borrow is released before the callback runs, so the callback is free to
            // start or stop the timer itself. The run state is re-checked before every tick.
            let (running, epoch) = match s.handle.inner.try_write() {
                Ok(mut state) => {
                    state.waker = Some(cx.waker().clone());
                    if state.dirty {
                        state.dirty = false;
                        redraw = true;
                    }
                    (state.running, state.epoch)
                }
                Err(_) => break,
            };
            if !running {
                s.timer = None;
                break;
            }
            if s.timer_epoch != epoch {
                s.timer = None;
                s.timer_epoch = epoch;
            }
            let period = s.period;
            let timer = s.timer.get_or_insert_with(|| Timer::interval(period));
            match Pin::new(timer).poll_next(cx) {
                Poll::Ready(Some(_)) => {
                    trace!("interval tick");
                    (s.f)();
                }
                Poll::Ready(None) | Poll::Pending => break,
            }
        }
        if redraw {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::task::noop_waker;
    use macro_rules_attribute::apply;
    use smol_macros::test;
    use std::sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    };

    fn poll(hook: &mut UseIntervalImpl) -> Poll<()> {
        Pin::new(hook).poll_change(&mut Context::from_waker(&noop_waker()))
    }

    #[apply(test!)]
    async fn test_interval_lifecycle() {
        let ticks = Arc::new(AtomicU64::new(0));
        let mut hook = {
            let ticks = ticks.clone();
            UseIntervalImpl::new(Duration::from_millis(10), move || {
                ticks.fetch_add(1, Ordering::SeqCst);
            })
        };
        let handle = hook.handle;

        // not armed: time passing produces no ticks
        assert_eq!(poll(&mut hook), Poll::Pending);
        Timer::after(Duration::from_millis(25)).await;
        assert_eq!(poll(&mut hook), Poll::Pending);
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
        assert!(!handle.is_running());

        // arming twice is the same as arming once
        handle.start();
        handle.start();
        assert!(handle.is_running());
        assert_eq!(handle.start_count(), 1);
        assert_eq!(poll(&mut hook), Poll::Ready(())); // armed state is a visible change
        Timer::after(Duration::from_millis(35)).await;
        assert_eq!(poll(&mut hook), Poll::Pending);
        let after_run = ticks.load(Ordering::SeqCst);
        assert!(after_run >= 2, "expected at least 2 ticks, got {after_run}");

        // no ticks are observable after stop, no matter how much time passes
        handle.stop();
        handle.stop();
        assert!(!handle.is_running());
        assert_eq!(poll(&mut hook), Poll::Ready(()));
        Timer::after(Duration::from_millis(35)).await;
        assert_eq!(poll(&mut hook), Poll::Pending);
        assert_eq!(ticks.load(Ordering::SeqCst), after_run);

        // a subsequent start arms a fresh timer
        handle.start();
        assert_eq!(handle.start_count(), 2);
        poll(&mut hook);
        Timer::after(Duration::from_millis(15)).await;
        poll(&mut hook);
        assert!(ticks.load(Ordering::SeqCst) > after_run);
    }

    #[apply(test!)]
    async fn test_interval_stops_within_callback() {
        let ticks = Arc::new(AtomicU64::new(0));
        let state = Owner::<SyncStorage>::default();
        let handle_slot = state.insert(None::<IntervalHandle>);
        let mut hook = {
            let ticks = ticks.clone();
            UseIntervalImpl::new(Duration::from_millis(5), move || {
                ticks.fetch_add(1, Ordering::SeqCst);
                if let Some(handle) = *handle_slot.read() {
                    handle.stop();
                }
            })
        };
        *handle_slot.write() = Some(hook.handle);

        hook.handle.start();
        poll(&mut hook);
        Timer::after(Duration::from_millis(30)).await;
        poll(&mut hook);

        // the callback stopped the timer after its first tick; later elapsed periods are ignored
        assert_eq!(ticks.load(Ordering::SeqCst), 1);
        assert!(!hook.handle.is_running());
    }

    #[apply(test!)]
    async fn test_interval_cancelled_at_drop() {
        let ticks = Arc::new(AtomicU64::new(0));
        let mut hook = {
            let ticks = ticks.clone();
            UseIntervalImpl::new(Duration::from_millis(5), move || {
                ticks.fetch_add(1, Ordering::SeqCst);
            })
        };
        let handle = hook.handle;
        handle.start();
        poll(&mut hook);
        Timer::after(Duration::from_millis(12)).await;
        poll(&mut hook);
        let before_drop = ticks.load(Ordering::SeqCst);
        assert!(before_drop >= 1);

        drop(hook);
        assert_eq!(handle.try_is_running(), None);

        Timer::after(Duration::from_millis(20)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), before_drop);

        // control methods through the dangling handle are no-ops
        handle.start();
        handle.stop();
    }
}
