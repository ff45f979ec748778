use std::fmt;

use tracing::debug;

use crate::archive::messages::RawMessage;

/// Why a token was left out of the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
	Empty,
	Url,
	AnimatedEmoji,
	UserMention,
	ChannelMention,
}

impl fmt::Display for DiscardReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let description = match self {
			DiscardReason::Empty => "empty",
			DiscardReason::Url => "a URL",
			DiscardReason::AnimatedEmoji => "an animated emoji",
			DiscardReason::UserMention => "a mention",
			DiscardReason::ChannelMention => "a channel mention",
		};
		f.write_str(description)
	}
}

/// Returns the rule that rejects `token`, if any.
///
/// Expects a lower-cased token. The URL check is a prefix heuristic only.
pub fn classify(token: &str) -> Option<DiscardReason> {
	if token.is_empty() {
		Some(DiscardReason::Empty)
	} else if token.starts_with("http://") || token.starts_with("https://") {
		Some(DiscardReason::Url)
	} else if token.starts_with("<a:") && token.ends_with('>') {
		Some(DiscardReason::AnimatedEmoji)
	} else if token.contains("<@") && token.ends_with('>') {
		Some(DiscardReason::UserMention)
	} else if token.starts_with("<#") && token.ends_with('>') {
		Some(DiscardReason::ChannelMention)
	} else {
		None
	}
}

/// Splits message contents into lower-cased words, dropping URLs, emojis,
/// mentions and empty tokens.
///
/// Tokens are split on the space character only and keep their order within
/// and across messages. Attachments are never looked at.
pub fn sanitize(messages: &[RawMessage]) -> Vec<String> {
	sanitize_contents(messages.iter().map(|message| message.contents.as_str()))
}

/// Same as [`sanitize`], over raw message texts.
pub fn sanitize_contents<'a, I>(contents: I) -> Vec<String>
where
	I: IntoIterator<Item = &'a str>,
{
	let mut words = Vec::new();

	for text in contents {
		for token in text.split(' ') {
			let word = token.to_lowercase();
			match classify(&word) {
				Some(reason) => debug!(token, %reason, "skipping word"),
				None => words.push(word),
			}
		}
	}

	words
}
