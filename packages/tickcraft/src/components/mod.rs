//! Built-in components.

mod stack;
pub use stack::*;

mod text;
pub use text::*;
