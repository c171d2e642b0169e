use thiserror::Error;

/// Failure conditions raised by chain construction and generation.
///
/// All variants are contract violations or exhausted-resource conditions,
/// not transient faults. They are raised at the point of detection and are
/// never caught or retried inside the crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
	/// Building the initial window consumed fewer tokens than the chain
	/// order requires. Retrying with the same input cannot succeed; the
	/// caller must provide more text or choose a lower order.
	#[error(
		"creating an initial chain state exhausted the token stream; \
		 choose a lower chain order or provide more input text"
	)]
	TokenStreamExhausted,

	/// Generation was attempted against a transition table with no entries,
	/// i.e. generate was called before any text was added.
	#[error(
		"the Markov chain does not have any transitions; \
		 this is probably due to invalid operation i.e. generate was called before text was added"
	)]
	NoTransitionsDefined,

	/// 100 randomized attempts failed to find a start state that also has
	/// at least one successor. All declared start states are terminal.
	#[error("couldn't select a valid start state")]
	NoStartStateFound,
}

/// Failure conditions raised when persisting or loading a model document.
///
/// Kept distinct from [`ChainError`]: a missing file or a malformed document
/// says nothing about the state of a chain.
#[derive(Error, Debug)]
pub enum PersistenceError {
	/// Reading or writing the document file failed (missing file,
	/// permissions, ...).
	#[error("model file I/O failed: {0}")]
	Io(#[from] std::io::Error),

	/// The document is not valid JSON or does not have the expected shape.
	#[error("model document is not valid JSON: {0}")]
	Json(#[from] serde_json::Error),

	/// The document parsed as JSON but violates the model schema
	/// (missing invariants, or a successor encoding other than the one
	/// the caller declared).
	#[error("malformed model document: {0}")]
	MalformedDocument(String),
}
