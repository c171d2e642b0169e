use std::collections::VecDeque;

use crate::error::ChainError;
use crate::model::transitions::{State, Token, TransitionTable};
use crate::tokenizer::{NO_WHITESPACE_AFTER, NO_WHITESPACE_BEFORE};

/// Endless random walk over a trained transition table.
///
/// The walk is lazy and pull-based: nothing is computed until the consumer
/// asks for the next token, and no look-ahead is buffered beyond the tokens
/// of the current (re)seed window. It never terminates on its own; consumers
/// bound it by word count or sentence count by simply ceasing to pull.
///
/// # Behavior
/// - On the first pull a start state is drawn and its full window of tokens
///   is emitted, one token per pull.
/// - Afterwards each pull draws one successor of the current window from
///   the successor bag, slides the window and emits the drawn token.
/// - Reaching a dead end (a window absent from the table) draws a fresh
///   start state and emits its full window again.
///
/// # Errors
/// Start-state selection can fail (empty table, or only stale start
/// states). The failure is yielded once as an `Err` item, after which the
/// walk is fused and yields `None`.
pub struct TokenWalk<'a> {
	table: &'a TransitionTable,
	/// Current window; empty until the walk is seeded on first pull.
	window: State,
	/// Seed tokens waiting to be emitted.
	pending: VecDeque<Token>,
	failed: bool,
}

impl<'a> TokenWalk<'a> {
	pub(crate) fn new(table: &'a TransitionTable) -> Self {
		Self {
			table,
			window: State::new(),
			pending: VecDeque::new(),
			failed: false,
		}
	}

	/// Draws a start state, installs it as the current window and queues
	/// its tokens for emission.
	fn reseed(&mut self) -> Result<(), ChainError> {
		let state = self.table.random_start_state(&mut rand::rng())?;
		self.pending.extend(state.iter().cloned());
		self.window = state;
		Ok(())
	}
}

impl Iterator for TokenWalk<'_> {
	type Item = Result<Token, ChainError>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.failed {
			return None;
		}

		if let Some(token) = self.pending.pop_front() {
			return Some(Ok(token));
		}

		// Not seeded yet, or the previous window hit a dead end.
		if self.window.is_empty() || !self.table.contains(&self.window) {
			if let Err(err) = self.reseed() {
				self.failed = true;
				return Some(Err(err));
			}
			return self.pending.pop_front().map(Ok);
		}

		// Windows are only installed when present as keys, so a successor
		// always exists here.
		let token = self.table.random_successor(&self.window, &mut rand::rng())?;
		self.window.push(token.clone());
		self.window.remove(0);

		Some(Ok(token))
	}
}

/// One-shot output of a generation call.
///
/// Wraps a lazy, forward-only token stream. Consume it either token by
/// token through the `Iterator` impl, or all at once through
/// [`GenerationResult::tokens`] / [`GenerationResult::text`].
pub struct GenerationResult<'a> {
	stream: Box<dyn Iterator<Item = Result<Token, ChainError>> + 'a>,
}

impl<'a> GenerationResult<'a> {
	pub(crate) fn new(stream: impl Iterator<Item = Result<Token, ChainError>> + 'a) -> Self {
		Self {
			stream: Box::new(stream),
		}
	}

	/// Collects all emitted tokens.
	///
	/// # Errors
	/// Propagates the first generation failure encountered on the stream.
	pub fn tokens(self) -> Result<Vec<Token>, ChainError> {
		self.stream.collect()
	}

	/// Collects all emitted tokens into a string with correct spacing
	/// between punctuation and words.
	///
	/// # Errors
	/// Propagates the first generation failure encountered on the stream.
	pub fn text(self) -> Result<String, ChainError> {
		Ok(render(self.tokens()?))
	}
}

impl Iterator for GenerationResult<'_> {
	type Item = Result<Token, ChainError>;

	fn next(&mut self) -> Option<Self::Item> {
		self.stream.next()
	}
}

/// Renders a token sequence into text.
///
/// Pure transform: tokens are joined with a single space, except that no
/// space is placed before a [`NO_WHITESPACE_BEFORE`] token, after a
/// [`NO_WHITESPACE_AFTER`] token, or in front of the very first token.
pub fn render(tokens: impl IntoIterator<Item = Token>) -> String {
	let mut output = String::new();
	let mut previous: Option<Token> = None;

	for token in tokens {
		let glue_before = NO_WHITESPACE_BEFORE.contains(&token.as_str());
		let glue_after = previous
			.as_ref()
			.is_some_and(|prev| NO_WHITESPACE_AFTER.contains(&prev.as_str()));

		if !glue_before && !glue_after && !output.is_empty() {
			output.push(' ');
		}

		output.push_str(&token);
		previous = Some(token);
	}

	output
}
