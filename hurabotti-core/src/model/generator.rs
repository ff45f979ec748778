use rand::Rng;
use tracing::trace;

use super::chain::{Token, TransitionTable};
use super::word_model::WordModel;
use crate::error::{Error, Result};

/// Generates up to `word_count` words from a model.
///
/// See [`generate_with_rng`].
pub fn generate(model: &WordModel, word_count: usize) -> Result<String> {
	generate_with_rng(model, word_count, &mut rand::rng())
}

/// Generates up to `word_count` words from a model with the given RNG.
///
/// # Behavior
/// - Works on a copy of the model's words; `model` is never mutated.
/// - Swaps the first word with a uniformly chosen one, so the opening word
///   varies between calls. This also replaces up to two adjacent pairs of
///   the corpus with two new ones.
/// - Builds an order-1 chain over `Start, words..., End`.
/// - Starting from `Start`, appends weighted draws until `End` is drawn,
///   the sequence holds `word_count + 1` tokens, or a token has no
///   successor.
/// - Joins the drawn words with single spaces. Sentinels are not rendered.
///
/// # Errors
/// - `InvalidWordCount` if `word_count` is 0
/// - `EmptyModel` if the model has no words
pub fn generate_with_rng<R: Rng + ?Sized>(model: &WordModel, word_count: usize, rng: &mut R) -> Result<String> {
	if word_count == 0 {
		return Err(Error::InvalidWordCount);
	}
	if model.words.is_empty() {
		return Err(Error::EmptyModel(model.name.clone()));
	}

	let mut words = model.words.clone();
	let r = rng.random_range(0..words.len());
	words.swap(0, r);

	let table = TransitionTable::from_words(&words);

	let mut tokens = vec![Token::Start];
	while tokens.len() <= word_count {
		let Some(current) = tokens.last() else { break };
		if *current == Token::End {
			break;
		}
		match table.next(current, rng) {
			Some(next) => {
				let next = next.clone();
				tokens.push(next);
			}
			None => {
				trace!(?current, "no outgoing transitions, stopping");
				break;
			}
		}
	}

	Ok(render(&tokens))
}

/// Joins the words of a token sequence, dropping everything up to and
/// including the last start sentinel, and every end sentinel.
fn render(tokens: &[Token]) -> String {
	let body = match tokens.iter().rposition(|token| *token == Token::Start) {
		Some(start) => &tokens[start + 1..],
		None => tokens,
	};

	body.iter()
		.filter_map(|token| match token {
			Token::Word(word) => Some(word.as_str()),
			Token::Start | Token::End => None,
		})
		.collect::<Vec<_>>()
		.join(" ")
}
