//! Complement: flips finality on a total DFA.
use std::collections::HashSet;

use tracing::debug;

use crate::automaton::Automaton;
use crate::error::Result;

impl Automaton {
    /// Determinizes and totalizes first (both are no-ops if already in that
    /// shape), then flips finality: `finals := states \ finals`. Correct
    /// only because totality guarantees every word has some run to flip.
    pub fn complement(&mut self) -> Result<()> {
        self.make_deterministic()?;
        self.make_total()?;

        let all: HashSet<_> = self.states().iter().cloned().collect();
        let complemented: HashSet<_> = all.difference(&self.finals).cloned().collect();
        debug!(
            finals_before = self.finals.len(),
            finals_after = complemented.len(),
            "complemented automaton"
        );
        self.finals = complemented;
        Ok(())
    }
}
