//! Runs the well-behaved counter and its misbehaving siblings side by side. All four share the
//! same key bindings, so a single `s` or `x` press shows how differently they react.

use anyhow::Result;
use std::time::Duration;
use tickcraft::{catalogue::*, prelude::*};

fn labeled<C>(label: &str, props: C::Props) -> [AnyElement; 2]
where
    C: Component,
{
    [
        Element::<Text>::new(TextProps {
            content: format!("--- {} ---", label),
        })
        .into(),
        Element::<C>::new(props).into(),
    ]
}

fn main() -> Result<()> {
    env_logger::init();
    let period = Duration::from_millis(500);
    let props = || CounterProps {
        period,
        on_tick: Handler::default(),
    };
    let children = [
        labeled::<Counter>("correct", props()),
        labeled::<StaleCounter>("stale snapshot", props()),
        labeled::<LeakyCounter>("stacked timers", props()),
        labeled::<ChurningCounter>("restarted every tick", props()),
    ]
    .into_iter()
    .flatten()
    .collect();
    smol::block_on(Element::<Stack>::new(StackProps { children }).render_loop())?;
    Ok(())
}
