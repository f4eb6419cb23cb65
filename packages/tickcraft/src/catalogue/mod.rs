//! A catalogue of small components for studying timer and effect lifecycles.
//!
//! The well-behaved [`Counter`] sits alongside deliberately misbehaving siblings, each isolating
//! one classic mistake: [`StaleCounter`] ticks against a frozen snapshot, [`LeakyCounter`] stacks
//! duplicate timers, and [`ChurningCounter`] rearms its timer on every tick. [`Profile`] and
//! [`ProfileCard`] demonstrate gating an effect on the contents of a prop rather than its
//! identity.
//!
//! Every component renders its observable state as `key => value` lines, so the difference
//! between doing it right and doing it wrong is visible in the frames themselves.

mod counter;
pub use counter::*;

mod profile;
pub use profile::*;

mod variants;
pub use variants::*;
