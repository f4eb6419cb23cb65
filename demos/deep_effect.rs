use anyhow::Result;
use std::time::Duration;
use tickcraft::{catalogue::*, prelude::*};

fn main() -> Result<()> {
    env_logger::init();
    smol::block_on(
        Element::<Profile>::new(ProfileProps {
            period: Duration::from_millis(500),
            on_identity_change: Handler::from(|identity: Identity| {
                log::info!("identity changed: {:?}", identity)
            }),
        })
        .render_loop(),
    )?;
    Ok(())
}
