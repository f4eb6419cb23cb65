use futures::stream::{self, Stream, StreamExt};
use macro_rules_attribute::apply;
use smol_macros::test;
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tickcraft::{catalogue::*, prelude::*};

fn press(c: char) -> TerminalEvent {
    TerminalEvent::Key(KeyEvent::press(KeyCode::Char(c)))
}

fn ctrl_c() -> TerminalEvent {
    TerminalEvent::Key(KeyEvent {
        code: KeyCode::Char('c'),
        modifiers: KeyModifiers::CONTROL,
        kind: KeyEventKind::Press,
    })
}

/// Emits each event after its delay, measured from the previous event.
fn key_script(
    script: Vec<(Duration, TerminalEvent)>,
) -> impl Stream<Item = TerminalEvent> + Send {
    stream::unfold(script.into_iter(), |mut script| async move {
        let (delay, event) = script.next()?;
        smol::Timer::after(delay).await;
        Some((event, script))
    })
}

fn line_value<'a>(frame: &'a Frame, key: &str) -> Option<&'a str> {
    let prefix = format!("{} => ", key);
    frame
        .lines()
        .iter()
        .find_map(|line| line.strip_prefix(prefix.as_str()))
}

fn count_in(frame: &Frame) -> Option<i64> {
    line_value(frame, "count").map(|v| v.parse().unwrap())
}

fn recorder() -> (Arc<Mutex<Vec<i64>>>, Handler<i64>) {
    let ticks = Arc::new(Mutex::new(Vec::new()));
    let handler = {
        let ticks = ticks.clone();
        Handler::from(move |count| ticks.lock().unwrap().push(count))
    };
    (ticks, handler)
}

#[apply(test!)]
async fn test_counter_ticks_monotonically() {
    let (ticks, on_tick) = recorder();
    let frames: Vec<Frame> = Element::<Counter>::new(CounterProps {
        period: Duration::from_millis(25),
        on_tick,
    })
    .mock_render_loop(MockTerminalConfig::with_events(key_script(vec![(
        Duration::from_millis(150),
        ctrl_c(),
    )])))
    .collect()
    .await;

    assert_eq!(
        frames[0].lines(),
        ["count => 0".to_string(), "timer => stopped".to_string()]
    );
    assert!(frames
        .iter()
        .any(|f| line_value(f, "timer") == Some("running")));

    let counts: Vec<i64> = frames.iter().filter_map(count_in).collect();
    assert!(counts.windows(2).all(|w| w[0] <= w[1]));
    assert!(*counts.last().unwrap() >= 2);

    let recorded = ticks.lock().unwrap().clone();
    assert_eq!(recorded, (1..=recorded.len() as i64).collect::<Vec<_>>());
}

#[apply(test!)]
async fn test_counter_stop_is_silent_afterwards() {
    let (ticks, on_tick) = recorder();
    let frames: Vec<Frame> = Element::<Counter>::new(CounterProps {
        period: Duration::from_millis(25),
        on_tick,
    })
    .mock_render_loop(MockTerminalConfig::with_events(key_script(vec![
        (Duration::from_millis(120), press('x')),
        (Duration::from_millis(100), ctrl_c()),
    ])))
    .collect()
    .await;

    let last = frames.last().unwrap();
    assert_eq!(line_value(last, "timer"), Some("stopped"));

    // once stopped, the frozen count and the last recorded tick agree
    let recorded = ticks.lock().unwrap().clone();
    assert_eq!(recorded.last().copied(), count_in(last));

    // the tree is gone; 100ms of further silence proves no timer survived it
    smol::Timer::after(Duration::from_millis(100)).await;
    assert_eq!(ticks.lock().unwrap().len(), recorded.len());
}

#[apply(test!)]
async fn test_counter_start_is_idempotent() {
    let (ticks, on_tick) = recorder();
    let frames: Vec<Frame> = Element::<Counter>::new(CounterProps {
        period: Duration::from_millis(60),
        on_tick,
    })
    .mock_render_loop(MockTerminalConfig::with_events(key_script(vec![
        (Duration::from_millis(10), press('s')),
        (Duration::from_millis(10), press('s')),
        (Duration::from_millis(10), press('s')),
        (Duration::from_millis(80), ctrl_c()),
    ])))
    .collect()
    .await;

    // repeated starts do not stack timers or reset the period
    assert!(ticks.lock().unwrap().len() <= 2);
    assert!(frames.iter().all(|f| count_in(f).map_or(true, |c| c <= 2)));
}

#[apply(test!)]
async fn test_counter_reset_preserves_run_state() {
    let (_ticks, on_tick) = recorder();
    let frames: Vec<Frame> = Element::<Counter>::new(CounterProps {
        period: Duration::from_millis(40),
        on_tick,
    })
    .mock_render_loop(MockTerminalConfig::with_events(key_script(vec![
        (Duration::from_millis(150), press('r')),
        (Duration::from_millis(100), ctrl_c()),
    ])))
    .collect()
    .await;

    // the count drops back while the timer keeps running
    let mut max_seen = 0;
    let mut reset_frame = None;
    for frame in &frames {
        if let Some(count) = count_in(frame) {
            if count < max_seen {
                reset_frame = Some(frame);
                break;
            }
            max_seen = max_seen.max(count);
        }
    }
    let reset_frame = reset_frame.expect("the count should have been reset");
    assert_eq!(line_value(reset_frame, "timer"), Some("running"));
}

#[apply(test!)]
async fn test_counter_quits_on_key() {
    let frames: Vec<Frame> = Element::<Counter>::new(CounterProps {
        period: Duration::from_millis(20),
        on_tick: Handler::default(),
    })
    .mock_render_loop(MockTerminalConfig::with_events(key_script(vec![(
        Duration::from_millis(70),
        press('q'),
    )])))
    .collect()
    .await;

    // the stream ended without a ctrl-c, because the component exited itself
    assert!(!frames.is_empty());
}

#[apply(test!)]
async fn test_stale_counter_sticks_at_one() {
    let (ticks, on_tick) = recorder();
    let frames: Vec<Frame> = Element::<StaleCounter>::new(CounterProps {
        period: Duration::from_millis(20),
        on_tick,
    })
    .mock_render_loop(MockTerminalConfig::with_events(key_script(vec![(
        Duration::from_millis(150),
        ctrl_c(),
    )])))
    .collect()
    .await;

    // the display never gets past 1...
    assert!(frames.iter().all(|f| count_in(f).map_or(true, |c| c <= 1)));
    assert_eq!(count_in(frames.last().unwrap()), Some(1));

    // ...even though the timer kept firing the whole time
    let recorded = ticks.lock().unwrap().clone();
    assert!(recorded.len() >= 3);
    assert!(recorded.iter().all(|&c| c == 1));
}

#[apply(test!)]
async fn test_leaky_counter_stacks_timers() {
    let (ticks, on_tick) = recorder();
    let frames: Vec<Frame> = Element::<LeakyCounter>::new(CounterProps {
        period: Duration::from_millis(60),
        on_tick,
    })
    .mock_render_loop(MockTerminalConfig::with_events(key_script(vec![
        (Duration::from_millis(10), press('s')),
        (Duration::from_millis(10), press('s')),
        (Duration::from_millis(10), press('s')),
        (Duration::from_millis(80), ctrl_c()),
    ])))
    .collect()
    .await;

    // same key script as the idempotent test, very different outcome
    assert!(frames
        .iter()
        .any(|f| line_value(f, "timers") == Some("4")));
    assert!(ticks.lock().unwrap().len() >= 3);
}

#[apply(test!)]
async fn test_churning_counter_rearms_every_tick() {
    let frames: Vec<Frame> = Element::<ChurningCounter>::new(CounterProps {
        period: Duration::from_millis(25),
        on_tick: Handler::default(),
    })
    .mock_render_loop(MockTerminalConfig::with_events(key_script(vec![(
        Duration::from_millis(150),
        ctrl_c(),
    )])))
    .collect()
    .await;

    let last = frames.last().unwrap();
    let count = count_in(last).unwrap();
    let starts: u64 = line_value(last, "starts").unwrap().parse().unwrap();
    assert!(count >= 2);
    assert_eq!(starts, count as u64 + 1);
}

#[apply(test!)]
async fn test_profile_updates_only_on_real_change() {
    let identities = Arc::new(Mutex::new(Vec::new()));
    let on_identity_change = {
        let identities = identities.clone();
        Handler::from(move |identity| identities.lock().unwrap().push(identity))
    };
    let frames: Vec<Frame> = Element::<Profile>::new(ProfileProps {
        period: Duration::from_millis(30),
        on_identity_change,
    })
    .mock_render_loop(MockTerminalConfig::with_events(key_script(vec![
        (Duration::from_millis(100), press('n')),
        (Duration::from_millis(100), ctrl_c()),
    ])))
    .collect()
    .await;

    // the effect fired exactly twice: on mount, and when the name was edited
    let recorded = identities.lock().unwrap().clone();
    assert_eq!(recorded.len(), 2);
    assert_eq!(recorded[0].name, "ada");
    assert_eq!(recorded[1].name, "adan");

    // the card re-rendered far more often than it updated
    let last = frames.last().unwrap();
    let updates: u64 = line_value(last, "updates").unwrap().parse().unwrap();
    let renders: u64 = line_value(last, "renders").unwrap().parse().unwrap();
    assert_eq!(updates, 2);
    assert!(renders > updates);
}

/// A parent that renders a [`Counter`] child until `d` is pressed.
struct Gate;

#[derive(Clone, Default)]
struct GateProps {
    period: Duration,
    on_tick: Handler<i64>,
}

impl Component for Gate {
    type Props = GateProps;

    fn new(_props: &Self::Props) -> Self {
        Self
    }

    fn update(
        &mut self,
        props: &Self::Props,
        mut hooks: Hooks<'_>,
        updater: &mut ComponentUpdater<'_>,
    ) {
        let show = hooks.use_state(|| true);
        hooks.use_terminal_events(move |event| match event {
            TerminalEvent::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                if code == KeyCode::Char('d') {
                    show.set(false);
                }
            }
            _ => {}
        });

        let mut children = Vec::new();
        if show.get() {
            children.push(AnyElement::from(Element::<Counter>::new(CounterProps {
                period: props.period,
                on_tick: props.on_tick.clone(),
            })));
        }
        updater.update_children(children);
    }
}

#[apply(test!)]
async fn test_unmount_cancels_timer() {
    let (ticks, on_tick) = recorder();
    let mut stream = std::pin::pin!(Element::<Gate>::new(GateProps {
        period: Duration::from_millis(30),
        on_tick,
    })
    .mock_render_loop(MockTerminalConfig::with_events(key_script(vec![
        (Duration::from_millis(100), press('d')),
        (Duration::from_millis(100), ctrl_c()),
    ]))));

    let mut ticks_at_removal = None;
    while let Some(frame) = stream.next().await {
        if count_in(&frame).is_none() && ticks_at_removal.is_none() {
            ticks_at_removal = Some(ticks.lock().unwrap().len());
        }
    }

    // the child was dropped, taking its timer with it: 100ms passed between removal and exit
    // without a single further tick
    let ticks_at_removal = ticks_at_removal.expect("the counter should have been removed");
    assert!(ticks_at_removal >= 1);
    assert_eq!(ticks.lock().unwrap().len(), ticks_at_removal);
}
