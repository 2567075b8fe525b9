//! Acceptance, emptiness and language equivalence.
use tracing::debug;

use crate::automaton::Automaton;
use crate::error::Result;
use crate::product::intersect;
use crate::union::union;

impl Automaton {
    /// Runs `word` from `epsilon_closure({initial})`, re-closing under ε
    /// after each symbol. Works on any ε-NFA; does not require prior
    /// determinization.
    pub fn accepts(&self, word: &str) -> bool {
        let mut current = self.epsilon_closure(self.initial());

        for ch in word.chars() {
            let mut stepped = std::collections::HashSet::new();
            for state in &current {
                for edge in self.out_edges(state) {
                    if edge.label == Some(ch) {
                        stepped.insert(edge.destination.clone());
                    }
                }
            }
            current = self.epsilon_closure_set(stepped);
            if current.is_empty() {
                return false;
            }
        }

        current.iter().any(|state| self.is_final(state))
    }

    /// `true` iff no final state is reachable from the initial state. A
    /// plain reachability test over the raw graph suffices; determinizing
    /// first is not required since reachability doesn't care about label
    /// ambiguity.
    pub fn is_empty_language(&self) -> bool {
        self.reachable_states()
            .iter()
            .all(|state| !self.is_final(state))
    }
}

/// `L(a) == L(b)` via symmetric difference:
/// `intersect(a, complement(b)) ∪ intersect(complement(a), b)` is empty.
pub fn equivalent(a: &Automaton, b: &Automaton) -> Result<bool> {
    let mut not_a = a.clone();
    not_a.complement()?;
    let mut not_b = b.clone();
    not_b.complement()?;

    let only_a = intersect(&[a, &not_b])?;
    let only_b = intersect(&[&not_a, b])?;
    let symmetric_difference = union(&[&only_a, &only_b])?;

    let equal = symmetric_difference.is_empty_language();
    debug!(equal, "checked automaton equivalence");
    Ok(equal)
}
