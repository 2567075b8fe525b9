//! Subset construction: replace the state graph with a DFA recognizing the
//! same language.
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::automaton::{Automaton, Edge, StateId};
use crate::error::Result;

impl Automaton {
    /// Determinizes in place. A no-op if already deterministic. States of
    /// the resulting DFA are named `q0, q1, …` in discovery order; empty
    /// target sets are not materialized, so the result may be partial (see
    /// [`Automaton::make_total`]).
    pub fn make_deterministic(&mut self) -> Result<()> {
        if self.is_deterministic() {
            return Ok(());
        }

        let before_states = self.states().len();
        let mut alphabet: Vec<char> = self.alphabet().collect();
        alphabet.sort_unstable();

        let start_set: BTreeSet<StateId> = self.epsilon_closure(self.initial()).into_iter().collect();
        let mut names: HashMap<BTreeSet<StateId>, StateId> = HashMap::new();
        let mut order: Vec<StateId> = Vec::new();
        let mut finals: HashSet<StateId> = HashSet::new();
        let mut edges: HashMap<StateId, Vec<Edge>> = HashMap::new();
        let mut queue: VecDeque<BTreeSet<StateId>> = VecDeque::new();
        let mut next_id = 0usize;

        let start_name: StateId = format!("q{next_id}").into();
        next_id += 1;
        names.insert(start_set.clone(), start_name.clone());
        order.push(start_name.clone());
        queue.push_back(start_set);

        while let Some(set) = queue.pop_front() {
            let name = names[&set].clone();
            if set.iter().any(|s| self.is_final(s)) {
                finals.insert(name.clone());
            }
            let out = edges.entry(name.clone()).or_default();

            for &symbol in &alphabet {
                let mut targets = HashSet::new();
                for state in &set {
                    for edge in self.out_edges(state) {
                        if edge.label == Some(symbol) {
                            targets.insert(edge.destination.clone());
                        }
                    }
                }
                if targets.is_empty() {
                    continue;
                }
                let closed: BTreeSet<StateId> = self.epsilon_closure_set(targets).into_iter().collect();

                let target_name = match names.get(&closed) {
                    Some(existing) => existing.clone(),
                    None => {
                        let fresh: StateId = format!("q{next_id}").into();
                        next_id += 1;
                        names.insert(closed.clone(), fresh.clone());
                        order.push(fresh.clone());
                        queue.push_back(closed);
                        fresh
                    }
                };

                out.push(Edge {
                    label: Some(symbol),
                    destination: target_name,
                });
            }
        }

        debug!(
            before = before_states,
            after = order.len(),
            "determinized automaton"
        );

        self.replace_graph(start_name, order, finals, edges);
        self.set_deterministic(true);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn determinizes_epsilon_nfa() {
        let mut a = Automaton::new("a", "q0", ["q1", "q2"].map(StateId::from));
        a.add_edge(&"q0".into(), None, &"q1".into()).unwrap();
        a.add_edge(&"q0".into(), Some('a'), &"q1".into()).unwrap();
        a.add_edge(&"q1".into(), Some('a'), &"q0".into()).unwrap();
        a.set_final(&"q1".into(), true).unwrap();

        a.make_deterministic().unwrap();
        assert!(a.is_deterministic());
        assert!(a.accepts("a"));
        assert!(a.accepts(""));
    }

    #[test]
    fn determinize_preserves_language() {
        let mut a = Automaton::new("a", "q0", ["q1", "q2"].map(StateId::from));
        a.add_edge(&"q0".into(), None, &"q1".into()).unwrap();
        a.add_edge(&"q1".into(), Some('a'), &"q2".into()).unwrap();
        a.set_final(&"q2".into(), true).unwrap();

        let before: Vec<bool> = ["", "a", "aa", "b"].iter().map(|w| a.accepts(w)).collect();
        a.make_deterministic().unwrap();
        let after: Vec<bool> = ["", "a", "aa", "b"].iter().map(|w| a.accepts(w)).collect();
        assert_eq!(before, after);
    }
}
