//! Form input handling: field sanitization, autocomplete rules and the
//! resolver that picks a single input mode.

pub mod autocomplete;
pub mod resolver;
pub mod sanitize;

pub use resolver::{InputError, InputMode, InputModeKind, resolve};
