use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::io;
use crate::model::markov_model::MarkovModel;
use crate::model::transitions::Token;

/// Successor-bag encoding of a persisted document.
///
/// The document itself carries no version marker, so the encoding must be
/// supplied out-of-band by whoever wrote the document. Passing the wrong
/// one fails with [`PersistenceError::MalformedDocument`]; it is never
/// auto-detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BagEncoding {
	/// Each successor bag is stored as an ordered list with duplicates
	/// preserved literally. Exact round-trip of insertion order.
	Verbatim,
	/// Each successor bag is stored as a token -> occurrence count map.
	/// Smaller for repetitive data; insertion order is lost.
	Counted,
}

/// Wire shape of a persisted model.
#[derive(Serialize, Deserialize)]
struct Document {
	order: usize,
	transitions: Vec<TransitionRecord>,
	start_states: Vec<Vec<Token>>,
}

#[derive(Serialize, Deserialize)]
struct TransitionRecord {
	state: Vec<Token>,
	tokens: TokenBag,
}

/// The two on-wire shapes of a successor bag.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TokenBag {
	Verbatim(Vec<Token>),
	Counted(HashMap<Token, usize>),
}

/// Serializes a model's order, transitions and start states into a JSON
/// document string.
///
/// `compress` selects the compact layout (no inter-field whitespace) over
/// the pretty-printed one. Both layouts parse identically.
pub fn to_json(
	model: &MarkovModel,
	encoding: BagEncoding,
	compress: bool,
) -> Result<String, PersistenceError> {
	let transitions = model
		.transitions()
		.iter()
		.map(|(state, bag)| TransitionRecord {
			state: state.clone(),
			tokens: match encoding {
				BagEncoding::Verbatim => TokenBag::Verbatim(bag.clone()),
				BagEncoding::Counted => TokenBag::Counted(aggregate_token_count(bag)),
			},
		})
		.collect();

	let document = Document {
		order: model.order(),
		transitions,
		start_states: model.transitions().start_states().to_vec(),
	};

	let raw = if compress {
		serde_json::to_string(&document)?
	} else {
		serde_json::to_string_pretty(&document)?
	};

	Ok(raw)
}

/// Reconstructs a model from a JSON document string.
///
/// The returned model is fresh: default tokenizer, no transform, and a
/// transition table fully populated from the document.
///
/// # Errors
/// - [`PersistenceError::Json`] when `raw` is not valid JSON or a required
///   field is missing.
/// - [`PersistenceError::MalformedDocument`] when the document violates the
///   model schema: order of zero, a state whose length differs from the
///   order, an empty successor bag, a zero occurrence count, or a successor
///   bag in the other encoding than the one declared by the caller.
pub fn from_json(raw: &str, encoding: BagEncoding) -> Result<MarkovModel, PersistenceError> {
	let document: Document = serde_json::from_str(raw)?;

	if document.order < 1 {
		return Err(PersistenceError::MalformedDocument(
			"order must be at least 1".to_string(),
		));
	}

	let mut model = MarkovModel::new(document.order);

	for record in document.transitions {
		if record.state.len() != document.order {
			return Err(PersistenceError::MalformedDocument(format!(
				"state {:?} does not match order {}",
				record.state, document.order
			)));
		}

		match (encoding, record.tokens) {
			(BagEncoding::Verbatim, TokenBag::Verbatim(tokens)) => {
				if tokens.is_empty() {
					return Err(PersistenceError::MalformedDocument(format!(
						"state {:?} has an empty successor bag",
						record.state
					)));
				}
				for token in tokens {
					model.transitions_mut().declare(record.state.clone(), token);
				}
			}
			(BagEncoding::Counted, TokenBag::Counted(counts)) => {
				if counts.is_empty() {
					return Err(PersistenceError::MalformedDocument(format!(
						"state {:?} has an empty successor bag",
						record.state
					)));
				}
				for (token, count) in counts {
					if count < 1 {
						return Err(PersistenceError::MalformedDocument(format!(
							"token {:?} of state {:?} has a zero occurrence count",
							token, record.state
						)));
					}
					for _ in 0..count {
						model
							.transitions_mut()
							.declare(record.state.clone(), token.clone());
					}
				}
			}
			(BagEncoding::Verbatim, TokenBag::Counted(_)) => {
				return Err(PersistenceError::MalformedDocument(
					"expected a verbatim token list, found a counted map".to_string(),
				));
			}
			(BagEncoding::Counted, TokenBag::Verbatim(_)) => {
				return Err(PersistenceError::MalformedDocument(
					"expected a counted token map, found a verbatim list".to_string(),
				));
			}
		}
	}

	for start_state in document.start_states {
		if start_state.len() != document.order {
			return Err(PersistenceError::MalformedDocument(format!(
				"start state {:?} does not match order {}",
				start_state, document.order
			)));
		}
		model.transitions_mut().declare_start(start_state);
	}

	Ok(model)
}

/// Writes a model document to a file.
pub fn save_model<P: AsRef<Path>>(
	path: P,
	model: &MarkovModel,
	encoding: BagEncoding,
	compress: bool,
) -> Result<(), PersistenceError> {
	let raw = to_json(model, encoding, compress)?;
	io::write_file(path, &raw)?;
	Ok(())
}

/// Reads a model document from a file.
///
/// The entire file is read as UTF-8 text and parsed as one document. A
/// missing file surfaces as [`PersistenceError::Io`], not as a model error.
pub fn load_model<P: AsRef<Path>>(
	path: P,
	encoding: BagEncoding,
) -> Result<MarkovModel, PersistenceError> {
	let raw = io::read_file(path)?;
	from_json(&raw, encoding)
}

/// Collapses a successor bag into per-token occurrence counts.
fn aggregate_token_count(tokens: &[Token]) -> HashMap<Token, usize> {
	let mut counts = HashMap::new();
	for token in tokens {
		*counts.entry(token.clone()).or_insert(0) += 1;
	}
	counts
}
