//! Hooks for adding state and behavior to components.
//!
//! All hooks must be used unconditionally, in the same order, on every update of a component.
//! Breaking that rule is a programming error and will cause a panic.
//!
//! A common thread runs through every hook here: callbacks and futures are captured exactly once,
//! on the component's first update. Plain values they close over are snapshots frozen at that
//! time. To observe or modify current values from inside a callback, go through the copyable
//! handles ([`State`], [`Ref`], [`IntervalHandle`]) rather than captured data.

mod use_deep_effect;
pub use use_deep_effect::*;

mod use_effect;
pub use use_effect::*;

mod use_future;
pub use use_future::*;

mod use_interval;
pub use use_interval::*;

mod use_ref;
pub use use_ref::*;

mod use_state;
pub use use_state::*;

mod use_terminal_events;
pub use use_terminal_events::*;
