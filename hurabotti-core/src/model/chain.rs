use std::collections::HashMap;

use rand::Rng;

use super::state::State;

/// A token of the chain: a corpus word or one of the two sentinels.
///
/// Sentinels are their own variants, so no corpus word can be mistaken
/// for a sequence boundary.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
	Start,
	Word(String),
	End,
}

/// Order-1 transition table built from a word sequence.
///
/// The sequence is bounded by [`Token::Start`] and [`Token::End`], and
/// both take part in the counts like ordinary words.
///
/// # Invariants
/// - Every token of the sequence except `End` has a state
/// - `End` never has outgoing transitions
#[derive(Clone, Debug, Default)]
pub struct TransitionTable {
	states: HashMap<Token, State>,
}

impl TransitionTable {
	/// Builds the table for `Start, words..., End`.
	pub fn from_words(words: &[String]) -> Self {
		let mut table = Self::default();

		let mut previous = Token::Start;
		for word in words {
			let next = Token::Word(word.clone());
			table.add_transition(previous, next.clone());
			previous = next;
		}
		table.add_transition(previous, Token::End);

		table
	}

	fn add_transition(&mut self, from: Token, to: Token) {
		self.states.entry(from).or_default().add_transition(to);
	}

	/// Returns the state of `token`, if it has outgoing transitions.
	pub fn state(&self, token: &Token) -> Option<&State> {
		self.states.get(token)
	}

	/// Number of states (distinct tokens with a successor).
	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Draws a successor of `token` proportionally to the observed counts.
	///
	/// Returns `None` if `token` has no recorded transitions.
	pub fn next<R: Rng + ?Sized>(&self, token: &Token, rng: &mut R) -> Option<&Token> {
		self.states.get(token)?.predict(rng)
	}
}
