//! Structured errors surfaced by every fallible operation on an [`crate::Automaton`].
use thiserror::Error;

/// Errors returned by graph mutation, transforms and the regex compiler.
///
/// Transforms (`make_deterministic`, `make_total`, `complement`, `minimize`,
/// `intersect`, `union`) only fail by propagating a validation error from
/// their inputs; their algorithms do not themselves fail on well-formed
/// automata.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("automaton `{automaton}` already has a state `{state}`")]
    DuplicateElement { automaton: String, state: String },

    #[error("automaton `{automaton}` has no state `{state}`")]
    NoSuchNode { automaton: String, state: String },

    #[error("automaton `{automaton}` has no edge {src} --{label:?}--> {dst}")]
    NoSuchEdge {
        automaton: String,
        src: String,
        label: Option<char>,
        dst: String,
    },

    #[error("invalid regex at offset {offset}: {message}")]
    RegexSyntax { offset: usize, message: String },

    #[error("automaton `{automaton}` violates an invariant: {detail}")]
    InvalidAutomaton { automaton: String, detail: String },
}

pub type Result<T> = std::result::Result<T, Error>;
