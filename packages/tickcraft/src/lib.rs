#![warn(missing_docs)]
//! `tickcraft` is a small library for building interactive, text-based programs whose components
//! own recurring timers.
//!
//! Programs are composed from components, which declare their children on every update pass and
//! attach state and behavior via hooks. The central hook is
//! [`use_interval`](crate::hooks::UseInterval::use_interval), which binds a periodic timer to the
//! lifetime of its component: starting and stopping are idempotent, restarting resets the full
//! period, and dropping the component cancels the timer outright.
//!
//! The [`catalogue`] module contains ready-made counter components, including deliberately
//! misbehaving ones, for studying how timers, state snapshots, and effects interact across
//! re-renders.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use tickcraft::prelude::*;
//!
//! struct Clock;
//!
//! impl Component for Clock {
//!     type Props = ();
//!
//!     fn new(_props: &Self::Props) -> Self {
//!         Self
//!     }
//!
//!     fn update(&mut self, _props: &Self::Props, mut hooks: Hooks, updater: &mut ComponentUpdater) {
//!         let seconds = hooks.use_state(|| 0u64);
//!         let timer = hooks.use_interval(Duration::from_secs(1), move || {
//!             seconds.set_with(|s| *s += 1);
//!         });
//!         hooks.use_effect(move || timer.start(), ());
//!         updater.update_children([Element::<Text>::new(TextProps {
//!             content: format!("{}s", seconds),
//!         })]);
//!     }
//! }
//!
//! fn main() {
//!     smol::block_on(Element::<Clock>::new(()).render_loop()).unwrap();
//! }
//! ```

pub mod catalogue;

mod component;
pub use component::Component;

pub mod components;

mod element;
pub use element::*;

mod handler;
pub use handler::*;

mod hook;
pub use hook::{Hook, Hooks};

pub mod hooks;

mod render;
pub use render::{ComponentRenderer, ComponentUpdater, Frame};

mod terminal;
pub use terminal::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MockTerminalConfig, TerminalEvent,
    TerminalEvents,
};

/// A convenience module which exports all of the most commonly used types.
pub mod prelude {
    pub use crate::{
        components::*, hooks::*, AnyElement, Component, ComponentRenderer, ComponentUpdater,
        Element, ElementExt, Frame, Handler, Hook, Hooks, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MockTerminalConfig, TerminalEvent, TerminalEvents,
    };
}
