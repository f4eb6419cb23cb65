use crate::{
    components::{Text, TextProps},
    hooks::{UseEffect, UseInterval, UseState, UseTerminalEvents},
    AnyElement, Component, ComponentUpdater, Element, Handler, Hooks, KeyCode, KeyEvent,
    KeyEventKind, TerminalEvent,
};
use std::time::Duration;

/// The props which can be passed to a [`Counter`] component and its misbehaving siblings.
#[derive(Clone)]
pub struct CounterProps {
    /// The tick period.
    pub period: Duration,

    /// Invoked with the new count after every tick.
    pub on_tick: Handler<i64>,
}

impl Default for CounterProps {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(500),
            on_tick: Handler::default(),
        }
    }
}

/// A counter that increments once per period, the way it should be done.
///
/// The timer is armed exactly once, when the component mounts, and the tick callback goes through
/// a [`State`](crate::hooks::State) handle so that every increment sees the latest count.
///
/// Key bindings:
///
/// - `s` starts the timer (a no-op while it is already running)
/// - `x` stops the timer
/// - `r` resets the count to zero without touching the timer's run state
/// - `q` exits the render loop
pub struct Counter;

impl Component for Counter {
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
