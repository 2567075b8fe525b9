//! Construction and transformation of finite state automata over `char`:
//! determinization, totalization, complement, product (intersection),
//! union, minimization, acceptance and equivalence, plus a restricted
//! regex-to-NFA compiler.
//!
//! The textual driver language that would script these operations (parse a
//! command file, call `loadr`/`union`/`intersect`/`accepts`/`println`), the
//! command-line entry point, and writing `.dot` output to a file are all
//! external collaborators: this crate exposes the operations they call and
//! a pure string producer for rendering, nothing more.
pub mod accept;
pub mod automaton;
pub mod closure;
pub mod complement;
pub mod determinize;
#[cfg(feature = "render")]
pub mod dot;
pub mod error;
pub mod minimize;
pub mod product;
pub mod regex;
pub mod total;
pub mod union;

pub use accept::equivalent;
pub use automaton::{Automaton, Edge, Label, StateId};
pub use error::{Error, Result};
pub use product::intersect;
pub use union::union;
