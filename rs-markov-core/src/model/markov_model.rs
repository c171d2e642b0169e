use crate::error::{ChainError, PersistenceError};
use crate::model::generation::{GenerationResult, TokenWalk};
use crate::model::transitions::{Token, TransitionTable};
use crate::persistence::{self, BagEncoding};
use crate::tokenizer::{Tokenizer, TokenTransform, WordTokenizer, is_sentence_terminator};

/// Default token count for [`MarkovModel::generate`] callers (CLI).
pub const DEFAULT_GENERATE_WORD_AMOUNT: usize = 32;

/// Default sentence count for [`MarkovModel::generate_sentences`] callers.
pub const DEFAULT_GENERATE_SENTENCE_AMOUNT: usize = 3;

/// A word-level Markov chain of fixed order.
///
/// The chain defines a state as a window of `order` tokens. During
/// construction the window slides over the token stream, recording for each
/// state which token followed it. During generation the process is
/// reversed: starting from a recorded entry point, successors are drawn at
/// random, weighted by how often they were observed.
///
/// # Responsibilities
/// - Build the transition table from raw text (`add_text`)
/// - Generate token streams bounded by word or sentence count
/// - Serialize to and from the JSON document format
///
/// # Invariants
/// - `order` is always >= 1 and fixed at construction
/// - Every key of the transition table is a window of exactly `order` tokens
/// - Generation never mutates the table
pub struct MarkovModel {
	/// Number of trailing tokens used as lookup context.
	order: usize,
	/// Tokenizer applied by `add_text`.
	tokenizer: Box<dyn Tokenizer>,
	/// Optional transform applied to every token before insertion.
	before_insert: Option<Box<dyn TokenTransform>>,
	transitions: TransitionTable,
}

impl std::fmt::Debug for MarkovModel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MarkovModel")
			.field("order", &self.order)
			.field("before_insert", &self.before_insert.is_some())
			.field("transitions", &self.transitions)
			.finish()
	}
}

impl MarkovModel {
	/// Creates an empty model of the given order, using the default
	/// word/punctuation tokenizer and no token transform.
	///
	/// # Panics
	/// Panics if `order` is zero.
	pub fn new(order: usize) -> Self {
		assert!(order >= 1, "Order must be at least 1.");
		Self {
			order,
			tokenizer: Box::new(WordTokenizer),
			before_insert: None,
			transitions: TransitionTable::new(),
		}
	}

	/// Replaces the default tokenizer. Meant to be chained at construction;
	/// swapping tokenizers after text was added mixes token vocabularies.
	pub fn with_tokenizer(mut self, tokenizer: impl Tokenizer + 'static) -> Self {
		self.tokenizer = Box::new(tokenizer);
		self
	}

	/// Installs a transform applied to every token right before insertion
	/// (e.g. [`crate::tokenizer::token_to_lowercase`]).
	pub fn with_before_insert(mut self, transform: impl TokenTransform + 'static) -> Self {
		self.before_insert = Some(Box::new(transform));
		self
	}

	/// The chain order.
	pub fn order(&self) -> usize {
		self.order
	}

	/// Read access to the transition table.
	pub fn transitions(&self) -> &TransitionTable {
		&self.transitions
	}

	/// Write access to the transition table, for manual seeding and for
	/// document decoding.
	pub fn transitions_mut(&mut self) -> &mut TransitionTable {
		&mut self.transitions
	}

	fn apply_before_insert(&self, token: Token) -> Token {
		match &self.before_insert {
			Some(transform) => transform.apply(token),
			None => token,
		}
	}

	/// Inserts some text into the chain using the model's own tokenizer.
	///
	/// May be called repeatedly; every call enriches the same transition
	/// table. Windows never span across separate calls.
	///
	/// # Errors
	/// [`ChainError::TokenStreamExhausted`] if the text yields fewer tokens
	/// than the chain order.
	pub fn add_text(&mut self, text: &str) -> Result<(), ChainError> {
		let tokens = self.tokenizer.tokenize(text);
		self.insert_token_stream(tokens)
	}

	/// Same as [`MarkovModel::add_text`] with a one-off tokenizer override.
	pub fn add_text_with(
		&mut self,
		text: &str,
		tokenizer: &dyn Tokenizer,
	) -> Result<(), ChainError> {
		let tokens = tokenizer.tokenize(text);
		self.insert_token_stream(tokens)
	}

	/// Slides a window of `order` tokens over the stream, declaring one
	/// transition per consumed token and marking entry points.
	///
	/// A window is an entry point when it is the very first window of the
	/// stream, or when the token evicted on the previous step terminated a
	/// sentence.
	fn insert_token_stream(&mut self, tokens: Vec<Token>) -> Result<(), ChainError> {
		let mut stream = tokens.into_iter();

		let mut window: Vec<Token> = Vec::with_capacity(self.order);
		for _ in 0..self.order {
			match stream.next() {
				Some(token) => window.push(self.apply_before_insert(token)),
				None => return Err(ChainError::TokenStreamExhausted),
			}
		}

		let mut last_evicted: Option<Token> = None;

		for token in stream {
			let token = self.apply_before_insert(token);
			self.transitions.declare(window.clone(), token.clone());

			let is_entry_point = match &last_evicted {
				// the beginning of a text is always a valid entry point.
				None => true,
				Some(evicted) => is_sentence_terminator(evicted),
			};
			if is_entry_point {
				self.transitions.declare_start(window.clone());
			}

			window.push(token);
			// keep the evicted token around for entry-point detection.
			last_evicted = Some(window.remove(0));
		}

		Ok(())
	}

	/// The unbounded lazy random walk over the chain.
	///
	/// Every call starts a fresh walk. See [`TokenWalk`] for the emission
	/// and reseeding rules.
	pub fn walk(&self) -> TokenWalk<'_> {
		TokenWalk::new(&self.transitions)
	}

	/// Generates exactly `word_amount` tokens.
	///
	/// Tokens injected by mid-walk reseeds count toward the same budget, so
	/// the output never exceeds `word_amount`.
	///
	/// Failures ([`ChainError::NoTransitionsDefined`],
	/// [`ChainError::NoStartStateFound`]) surface when the result is
	/// consumed.
	pub fn generate(&self, word_amount: usize) -> GenerationResult<'_> {
		GenerationResult::new(self.walk().take(word_amount))
	}

	/// Generates tokens until `sentence_amount` sentence terminators have
	/// been emitted.
	///
	/// There is no upper bound on the emitted token count. If no sentence
	/// terminator is reachable from the walk this never terminates; that is
	/// an accepted property of the trained data, not guarded against.
	///
	/// # Panics
	/// Panics if `sentence_amount` is zero.
	pub fn generate_sentences(&self, sentence_amount: usize) -> GenerationResult<'_> {
		assert!(sentence_amount >= 1, "Sentence amount must be at least 1.");

		let mut walk = self.walk();
		let mut remaining = sentence_amount;

		GenerationResult::new(std::iter::from_fn(move || {
			if remaining == 0 {
				return None;
			}
			match walk.next() {
				Some(Ok(token)) => {
					if is_sentence_terminator(&token) {
						remaining -= 1;
					}
					Some(Ok(token))
				}
				// yield the failure, then stop pulling.
				other => {
					remaining = 0;
					other
				}
			}
		}))
	}

	/// Serializes the model into a JSON document string.
	///
	/// `compress` selects the compact layout over the pretty-printed one;
	/// both parse identically.
	pub fn to_json(&self, encoding: BagEncoding, compress: bool) -> Result<String, PersistenceError> {
		persistence::to_json(self, encoding, compress)
	}

	/// Reconstructs a model from a JSON document string.
	///
	/// `encoding` must name the successor encoding the document was written
	/// with; the document does not carry that information itself.
	pub fn from_json(raw: &str, encoding: BagEncoding) -> Result<Self, PersistenceError> {
		persistence::from_json(raw, encoding)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	#[should_panic]
	fn order_zero_is_rejected() {
		MarkovModel::new(0);
	}

	#[test]
	fn exactly_order_tokens_build_nothing_but_do_not_fail() {
		// the initial window consumes everything, no transition is declared.
		let mut model = MarkovModel::new(6);
		model.add_text("A b c d e f").unwrap();

		assert!(model.transitions().is_empty());
		assert_eq!(
			model.generate(10).text().unwrap_err(),
			ChainError::NoTransitionsDefined
		);
	}

	#[test]
	fn fewer_than_order_tokens_exhaust_the_stream() {
		let mut model = MarkovModel::new(6);
		assert_eq!(
			model.add_text("A b c d e").unwrap_err(),
			ChainError::TokenStreamExhausted
		);
	}

	#[test]
	fn windows_do_not_span_separate_calls() {
		let mut model = MarkovModel::new(1);
		model.add_text("a b").unwrap();
		model.add_text("c d").unwrap();

		// "b" was the tail of the first call; nothing follows it.
		assert!(!model.transitions().contains(&vec!["b".to_string()]));
		assert!(model.transitions().contains(&vec!["a".to_string()]));
		assert!(model.transitions().contains(&vec!["c".to_string()]));
	}
}
