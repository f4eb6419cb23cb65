use anyhow::Result;
use std::time::Duration;
use tickcraft::{catalogue::*, prelude::*};

fn main() -> Result<()> {
    env_logger::init();
    smol::block_on(
        Element::<Counter>::new(CounterProps {
            period: Duration::from_millis(500),
            on_tick: Handler::from(|count| log::info!("tick: {}", count)),
        })
        .render_loop(),
    )?;
    Ok(())
}
