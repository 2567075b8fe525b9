//! Totalization: complete a (deterministic) automaton so that every state
//! has an out-edge for every symbol of the active alphabet.
use tracing::debug;

use crate::automaton::{Automaton, StateId};
use crate::error::Result;

const SINK: &str = "_error";

impl Automaton {
    /// Adds a shared, non-final sink state with a self-loop on every
    /// alphabet symbol, and routes every missing `(state, symbol)` pair to
    /// it. The sink is only created if some state actually needs it.
    pub fn make_total(&mut self) -> Result<()> {
        let alphabet: Vec<char> = self.alphabet().collect();
        self.total_over(&alphabet)
    }

    /// Like [`Automaton::make_total`] but completes over an explicit symbol
    /// set rather than the automaton's own active alphabet. Used by
    /// [`crate::product::intersect`] to make both operands total over the
    /// *union* of their alphabets before building the product.
    pub(crate) fn total_over(&mut self, alphabet: &[char]) -> Result<()> {
        let already_total = self.states().iter().all(|state| {
            let out = self.out_edges(state);
            alphabet
                .iter()
                .all(|symbol| out.iter().any(|e| e.label == Some(*symbol)))
        });
        if already_total {
            return Ok(());
        }

        let mut alphabet: Vec<char> = alphabet.to_vec();
        alphabet.sort_unstable();

        let sink: StateId = self.fresh_sink_name();
        if !self.has_state(&sink) {
            self.add_state(sink.clone())?;
        }

        let states: Vec<StateId> = self.states().to_vec();
        let mut added = 0usize;
        for state in &states {
            for &symbol in &alphabet {
                let missing = !self
                    .out_edges(state)
                    .iter()
                    .any(|e| e.label == Some(symbol));
                if missing {
                    self.add_edge(state, Some(symbol), &sink)?;
                    added += 1;
                }
            }
        }
        for &symbol in &alphabet {
            let missing = !self
                .out_edges(&sink)
                .iter()
                .any(|e| e.label == Some(symbol));
            if missing {
                self.add_edge(&sink, Some(symbol), &sink)?;
            }
        }

        debug!(added, sink = %sink, "totalized automaton");
        Ok(())
    }

    fn fresh_sink_name(&self) -> StateId {
        if !self.has_state(&StateId::from(SINK)) {
            return SINK.into();
        }
        self.fresh_state_name(SINK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totalize_adds_sink_with_self_loop() {
        let mut a = Automaton::new("a", "q0", ["q1"].map(StateId::from));
        a.add_edge(&"q0".into(), Some('a'), &"q1".into()).unwrap();
        a.add_edge(&"q0".into(), Some('b'), &"q0".into()).unwrap();
        a.set_final(&"q1".into(), true).unwrap();

        a.make_total().unwrap();
        assert!(a.is_total());
        assert!(a.has_state(&"_error".into()));
        assert!(!a.is_final(&"_error".into()));

        for symbol in ['a', 'b'] {
            assert!(a
                .out_edges(&"_error".into())
                .iter()
                .any(|e| e.label == Some(symbol) && e.destination == "_error".into()));
        }
    }

    #[test]
    fn totalize_is_noop_when_already_total() {
        let mut a = Automaton::new("a", "q0", Vec::<StateId>::new());
        a.add_edge(&"q0".into(), Some('a'), &"q0".into()).unwrap();
        a.make_total().unwrap();
        assert!(!a.has_state(&"_error".into()));
    }
}
