use std::collections::HashMap;

use rand::Rng;
use rand::prelude::{IndexedRandom, IteratorRandom};

use crate::error::ChainError;

/// Smallest unit of text handled by the chain (a word or a punctuation
/// mark). Opaque string value.
pub type Token = String;

/// Lookup key of the chain: an ordered window of exactly `order` tokens.
pub type State = Vec<Token>;

/// Number of attempts made to draw a start state that still has successors
/// before giving up with [`ChainError::NoStartStateFound`].
pub const START_STATE_ATTEMPTS: usize = 100;

/// Stores all state transitions of the Markov chain.
///
/// A plain composite of two collections:
/// - a map from [`State`] to its successor bag, an ordered list of every
///   token observed after that state. Duplicates are kept on purpose, they
///   are the sole weighting mechanism for random selection.
/// - a list of states declared as valid generation entry points. Duplicates
///   are kept here too, a state observed more often as an entry point is
///   more likely to be drawn.
///
/// # Invariants
/// - A state present as a key always has at least one successor (keys are
///   only created together with their first successor).
/// - Start states are NOT guaranteed to be present as keys: the source text
///   may have ended right after a sentence boundary. Lookups must tolerate
///   this.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionTable {
	transitions: HashMap<State, Vec<Token>>,
	start_states: Vec<State>,
}

impl TransitionTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a transition from state `from` to the successor token `to`.
	///
	/// Calling this several times with the same pair increases the chance
	/// of this transition being taken during generation.
	pub fn declare(&mut self, from: State, to: Token) {
		self.transitions.entry(from).or_default().push(to);
	}

	/// Declares `from` as a valid starting state of the chain.
	pub fn declare_start(&mut self, from: State) {
		self.start_states.push(from);
	}

	/// Returns the successor bag of `state`, or `None` if the state was
	/// never observed as a key (a dead end).
	pub fn successors(&self, state: &[Token]) -> Option<&[Token]> {
		self.transitions.get(state).map(Vec::as_slice)
	}

	/// Returns true if `state` is present as a key.
	pub fn contains(&self, state: &[Token]) -> bool {
		self.transitions.contains_key(state)
	}

	/// Returns true if no transitions were declared at all.
	pub fn is_empty(&self) -> bool {
		self.transitions.is_empty()
	}

	/// Number of distinct states present as keys.
	pub fn len(&self) -> usize {
		self.transitions.len()
	}

	/// Iterates over all (state, successor bag) entries.
	///
	/// Iteration order is unspecified.
	pub fn iter(&self) -> impl Iterator<Item = (&State, &Vec<Token>)> {
		self.transitions.iter()
	}

	/// All declared start states, duplicates included.
	pub fn start_states(&self) -> &[State] {
		&self.start_states
	}

	/// Draws one successor of `state` uniformly at random from its bag.
	///
	/// Duplicates in the bag make frequent successors proportionally more
	/// likely. Returns `None` for a dead end.
	pub fn random_successor(&self, state: &[Token], rng: &mut impl Rng) -> Option<Token> {
		self.transitions.get(state)?.choose(rng).cloned()
	}

	/// Draws a state to (re)start a generation walk from.
	///
	/// # Behavior
	/// - An empty table cannot start anything: [`ChainError::NoTransitionsDefined`].
	/// - If no start states were ever declared (input had no sentence
	///   terminators), any key is picked uniformly at random.
	/// - Otherwise up to [`START_STATE_ATTEMPTS`] draws are made from the
	///   duplicate-weighted start-state list. A draw is accepted only if it
	///   is also present as a key: a start state recorded near the end of
	///   the input may have no successors because the text ended there.
	///
	/// # Errors
	/// [`ChainError::NoStartStateFound`] if every attempt landed on a
	/// stale start state.
	pub fn random_start_state(&self, rng: &mut impl Rng) -> Result<State, ChainError> {
		if self.transitions.is_empty() {
			return Err(ChainError::NoTransitionsDefined);
		}

		if self.start_states.is_empty() {
			return self
				.transitions
				.keys()
				.choose(rng)
				.cloned()
				// The table was checked non-empty above.
				.ok_or(ChainError::NoTransitionsDefined);
		}

		for _ in 0..START_STATE_ATTEMPTS {
			if let Some(candidate) = self.start_states.choose(rng) {
				if self.transitions.contains_key(candidate) {
					return Ok(candidate.clone());
				}
			}
		}

		Err(ChainError::NoStartStateFound)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn state(tokens: &[&str]) -> State {
		tokens.iter().map(|t| t.to_string()).collect()
	}

	#[test]
	fn declare_accumulates_duplicates() {
		let mut table = TransitionTable::new();
		table.declare(state(&["a"]), "b".to_string());
		table.declare(state(&["a"]), "b".to_string());
		table.declare(state(&["a"]), "c".to_string());

		assert_eq!(
			table.successors(&state(&["a"])),
			Some(&state(&["b", "b", "c"])[..])
		);
		assert_eq!(table.len(), 1);
	}

	#[test]
	fn missing_state_is_a_dead_end() {
		let table = TransitionTable::new();
		assert!(table.successors(&state(&["nope"])).is_none());
		assert!(!table.contains(&state(&["nope"])));
	}

	#[test]
	fn empty_table_cannot_start() {
		let table = TransitionTable::new();
		let err = table.random_start_state(&mut rand::rng()).unwrap_err();
		assert_eq!(err, ChainError::NoTransitionsDefined);
	}

	#[test]
	fn start_selection_falls_back_to_any_key() {
		let mut table = TransitionTable::new();
		table.declare(state(&["a"]), "b".to_string());

		// no start state was ever declared, any key will do.
		let start = table.random_start_state(&mut rand::rng()).unwrap();
		assert_eq!(start, state(&["a"]));
	}

	#[test]
	fn stale_start_states_are_rejected() {
		let mut table = TransitionTable::new();
		table.declare(state(&["a"]), "b".to_string());
		// declared as a start but never observed as a key.
		table.declare_start(state(&["z"]));

		let err = table.random_start_state(&mut rand::rng()).unwrap_err();
		assert_eq!(err, ChainError::NoStartStateFound);
	}

	#[test]
	fn live_start_states_are_accepted() {
		let mut table = TransitionTable::new();
		table.declare(state(&["a"]), "b".to_string());
		table.declare_start(state(&["a"]));

		let start = table.random_start_state(&mut rand::rng()).unwrap();
		assert_eq!(start, state(&["a"]));
	}

	#[test]
	fn random_successor_draws_from_the_bag() {
		let mut table = TransitionTable::new();
		table.declare(state(&["a"]), "b".to_string());

		let successor = table.random_successor(&state(&["a"]), &mut rand::rng());
		assert_eq!(successor, Some("b".to_string()));
		assert_eq!(table.random_successor(&state(&["x"]), &mut rand::rng()), None);
	}
}
