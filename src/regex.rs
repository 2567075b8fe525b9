//! A Thompson-style compiler from a restricted regular-expression syntax to
//! an ε-NFA: literal symbols, `*`, alternation `|`, implicit concatenation
//! and `(...)` grouping. `*` binds tighter than concatenation, which binds
//! tighter than `|`. Metacharacters are escaped with a leading `\`.
use std::iter::Peekable;
use std::str::CharIndices;

use tracing::debug;

use crate::automaton::{Automaton, Label, StateId};
use crate::error::{Error, Result};

const METACHARS: &[char] = &['*', '|', '(', ')', '\\'];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Ast {
    Epsilon,
    Literal(char),
    Star(Box<Ast>),
    Concat(Box<Ast>, Box<Ast>),
    Or(Box<Ast>, Box<Ast>),
}

impl Automaton {
    /// Compiles `pattern` into a fresh ε-NFA named `name`. The empty
    /// pattern compiles to an automaton matching only the empty string.
    pub fn from_regex(pattern: &str, name: impl Into<String>) -> Result<Automaton> {
        let ast = Parser::new(pattern).parse()?;

        let mut builder = Builder::default();
        let (entry, exit) = builder.fragment(&ast);

        let mut automaton = Automaton::new(name, entry, builder.states);
        for (src, label, dst) in builder.edges {
            automaton.add_edge(&src, label, &dst)?;
        }
        automaton.set_final(&exit, true)?;

        debug!(pattern, states = automaton.states().len(), "compiled regex");
        Ok(automaton)
    }
}

/// Accumulates fragment states/edges before a single `Automaton` is built
/// from them, so that fresh names never need a linear existing-states scan
/// mid-construction.
#[derive(Default)]
struct Builder {
    counter: usize,
    states: Vec<StateId>,
    edges: Vec<(StateId, Label, StateId)>,
}

impl Builder {
    fn fresh(&mut self) -> StateId {
        let id: StateId = format!("n{}", self.counter).into();
        self.counter += 1;
        self.states.push(id.clone());
        id
    }

    fn edge(&mut self, src: StateId, label: Label, dst: StateId) {
        self.edges.push((src, label, dst));
    }

    /// Builds one Thompson fragment, returning its unique entry and exit
    /// states.
    fn fragment(&mut self, ast: &Ast) -> (StateId, StateId) {
        match ast {
            Ast::Epsilon => {
                let entry = self.fresh();
                let exit = self.fresh();
                self.edge(entry.clone(), None, exit.clone());
                (entry, exit)
            }
            Ast::Literal(c) => {
                let entry = self.fresh();
                let exit = self.fresh();
                self.edge(entry.clone(), Some(*c), exit.clone());
                (entry, exit)
            }
            Ast::Star(inner) => {
                let (inner_entry, inner_exit) = self.fragment(inner);
                let entry = self.fresh();
                let exit = self.fresh();
                self.edge(entry.clone(), None, inner_entry.clone());
                self.edge(entry.clone(), None, exit.clone());
                self.edge(inner_exit.clone(), None, inner_entry);
                self.edge(inner_exit, None, exit.clone());
                (entry, exit)
            }
            Ast::Concat(a, b) => {
                let (a_entry, a_exit) = self.fragment(a);
                let (b_entry, b_exit) = self.fragment(b);
                self.edge(a_exit, None, b_entry);
                (a_entry, b_exit)
            }
            Ast::Or(a, b) => {
                let (a_entry, a_exit) = self.fragment(a);
                let (b_entry, b_exit) = self.fragment(b);
                let entry = self.fresh();
                let exit = self.fresh();
                self.edge(entry.clone(), None, a_entry);
                self.edge(entry, None, b_entry);
                self.edge(a_exit, None, exit.clone());
                self.edge(b_exit, None, exit.clone());
                (entry, exit)
            }
        }
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn parse(mut self) -> Result<Ast> {
        let ast = self.parse_alt()?;
        if let Some(&(offset, ch)) = self.chars.peek() {
            return Err(Error::RegexSyntax {
                offset,
                message: format!("unexpected `{ch}`"),
            });
        }
        Ok(ast)
    }

    fn parse_alt(&mut self) -> Result<Ast> {
        let mut ast = self.parse_concat()?;
        while self.peek_char() == Some('|') {
            self.chars.next();
            let rhs = self.parse_concat()?;
            ast = Ast::Or(Box::new(ast), Box::new(rhs));
        }
        Ok(ast)
    }

    fn parse_concat(&mut self) -> Result<Ast> {
        let mut ast: Option<Ast> = None;
        while let Some(ch) = self.peek_char() {
            if ch == '|' || ch == ')' {
                break;
            }
            let next = self.parse_star()?;
            ast = Some(match ast {
                None => next,
                Some(prev) => Ast::Concat(Box::new(prev), Box::new(next)),
            });
        }
        Ok(ast.unwrap_or(Ast::Epsilon))
    }

    fn parse_star(&mut self) -> Result<Ast> {
        let mut ast = self.parse_atom()?;
        while self.peek_char() == Some('*') {
            self.chars.next();
            ast = Ast::Star(Box::new(ast));
        }
        Ok(ast)
    }

    fn parse_atom(&mut self) -> Result<Ast> {
        match self.chars.next() {
            Some((_, '(')) => {
                let inner = self.parse_alt()?;
                match self.chars.next() {
                    Some((_, ')')) => Ok(inner),
                    Some((offset, ch)) => Err(Error::RegexSyntax {
                        offset,
                        message: format!("expected `)`, found `{ch}`"),
                    }),
                    None => Err(Error::RegexSyntax {
                        offset: self.input.len(),
                        message: "unterminated group: expected `)`".into(),
                    }),
                }
            }
            Some((offset, '\\')) => match self.chars.next() {
                Some((_, ch)) => Ok(Ast::Literal(ch)),
                None => Err(Error::RegexSyntax {
                    offset,
                    message: "dangling `\\` at end of pattern".into(),
                }),
            },
            Some((offset, ch)) if METACHARS.contains(&ch) => Err(Error::RegexSyntax {
                offset,
                message: format!("unexpected metacharacter `{ch}`"),
            }),
            Some((_, ch)) => Ok(Ast::Literal(ch)),
            None => Err(Error::RegexSyntax {
                offset: self.input.len(),
                message: "expected a symbol, group or end of alternation".into(),
            }),
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, ch)| ch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_regex_matches_empty_string() {
        let a = Automaton::from_regex("", "empty").unwrap();
        assert!(a.accepts(""));
        assert!(!a.accepts("a"));
    }

    #[test]
    fn literal_concat_and_star() {
        let a = Automaton::from_regex("a*bb*|aa*bc*", "r").unwrap();
        for word in ["abc", "abbb", "bbbb"] {
            assert!(a.accepts(word), "expected {word:?} to be accepted");
        }
    }

    #[test]
    fn grouping_and_alternation_scenario() {
        let a = Automaton::from_regex("ef|a*bb*|aa*bc*", "r").unwrap();
        for word in ["ef", "abc", "aaabccccc", "aaabbbbbb", "abbbb", "bbbb"] {
            assert!(a.accepts(word), "expected {word:?} to be accepted");
        }
        for word in ["", "e", "eff", "abbc", "bcccc", "sfgddd", "aaacccc"] {
            assert!(!a.accepts(word), "expected {word:?} to be rejected");
        }
    }

    #[test]
    fn unmatched_paren_is_a_syntax_error() {
        assert!(matches!(
            Automaton::from_regex("(ab", "r"),
            Err(Error::RegexSyntax { .. })
        ));
    }

    #[test]
    fn escaped_metachar_is_a_literal() {
        let a = Automaton::from_regex(r"a\*b", "r").unwrap();
        assert!(a.accepts("a*b"));
        assert!(!a.accepts("ab"));
    }
}
