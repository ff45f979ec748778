use std::collections::HashMap;

use rand::Rng;

use super::chain::Token;

/// Represents a state of the word chain.
///
/// A `State` corresponds to one token and stores every observed transition
/// from it to the next token.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Invariants
/// - Each transition occurrence count is strictly positive
/// - Transitions are kept in first-seen order, so a seeded RNG always
///   draws the same successor
#[derive(Clone, Debug, Default)]
pub struct State {
	/// Outgoing transitions with how many times each was observed.
	/// Example: [("the", 42), ("a", 3)]
	transitions: Vec<(Token, usize)>,
	/// Position of each successor in `transitions`.
	index: HashMap<Token, usize>,
}

impl State {
	/// Records an occurrence of a transition toward `next`.
	///
	/// - If the transition already exists, its occurrence count is increased.
	/// - Otherwise, a new transition is created with an initial count of 1.
	pub fn add_transition(&mut self, next: Token) {
		match self.index.get(&next) {
			Some(&position) => self.transitions[position].1 += 1,
			None => {
				self.index.insert(next.clone(), self.transitions.len());
				self.transitions.push((next, 1));
			}
		}
	}

	/// Total number of observed transitions.
	pub fn total(&self) -> usize {
		self.transitions.iter().map(|(_, occurrence)| occurrence).sum()
	}

	/// Observation count of the transition toward `next`.
	pub fn count(&self, next: &Token) -> usize {
		self.index.get(next).map_or(0, |&position| self.transitions[position].1)
	}

	/// Picks the next token using weighted random sampling.
	///
	/// The probability of selecting a token is proportional to its
	/// occurrence count: one draw in `[0, total)`, then a cumulative
	/// subtraction over the transitions.
	///
	/// Returns `None` if the state has no transitions.
	pub fn predict<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Token> {
		let total = self.total();
		if total == 0 {
			return None;
		}

		let mut r = rng.random_range(0..total);
		for (next, occurrence) in &self.transitions {
			if r < *occurrence {
				return Some(next);
			}
			r -= occurrence;
		}

		// Unreachable while counts sum to `total`.
		self.transitions.last().map(|(next, _)| next)
	}
}
