//! ε-closure: the set of states reachable from a seed set using only
//! ε-transitions.
use std::collections::HashSet;

use crate::automaton::{Automaton, StateId};

impl Automaton {
    /// `epsilon_closure({state})`. O(|states| + |ε-edges|).
    pub fn epsilon_closure(&self, state: &StateId) -> HashSet<StateId> {
        self.epsilon_closure_set(std::iter::once(state.clone()))
    }

    /// `epsilon_closure(S)` for an arbitrary seed set: the smallest set
    /// containing `S` and closed under ε-edges.
    pub fn epsilon_closure_set(&self, seed: impl IntoIterator<Item = StateId>) -> HashSet<StateId> {
        let mut reached: HashSet<StateId> = HashSet::new();
        let mut worklist: Vec<StateId> = Vec::new();

        for state in seed {
            if reached.insert(state.clone()) {
                worklist.push(state);
            }
        }

        while let Some(state) = worklist.pop() {
            for edge in self.out_edges(&state) {
                if edge.label.is_none() && reached.insert(edge.destination.clone()) {
                    worklist.push(edge.destination.clone());
                }
            }
        }

        reached
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_follows_epsilon_chain() {
        let mut a = Automaton::new("a", "q0", ["q1", "q2", "q3"].map(StateId::from));
        a.add_edge(&"q0".into(), None, &"q1".into()).unwrap();
        a.add_edge(&"q1".into(), None, &"q2".into()).unwrap();
        a.add_edge(&"q2".into(), Some('a'), &"q3".into()).unwrap();

        let closure = a.epsilon_closure(&"q0".into());
        let expected: HashSet<StateId> = ["q0", "q1", "q2"].map(StateId::from).into_iter().collect();
        assert_eq!(closure, expected);

        let closure = a.epsilon_closure(&"q3".into());
        let expected: HashSet<StateId> = ["q3"].map(StateId::from).into_iter().collect();
        assert_eq!(closure, expected);
    }

    #[test]
    fn closure_is_idempotent() {
        let mut a = Automaton::new("a", "q0", ["q1"].map(StateId::from));
        a.add_edge(&"q0".into(), None, &"q1".into()).unwrap();

        let once = a.epsilon_closure(&"q0".into());
        let twice = a.epsilon_closure_set(once.clone());
        assert_eq!(once, twice);
    }
}
