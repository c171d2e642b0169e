//! Integration tests for random-walk generation.

use rs_markov_core::error::ChainError;
use rs_markov_core::model::markov_model::MarkovModel;
use rs_markov_core::tokenizer::is_sentence_terminator;

#[test]
fn an_untrained_model_cannot_generate() {
	let model = MarkovModel::new(1);
	assert_eq!(
		model.generate(10).text().unwrap_err(),
		ChainError::NoTransitionsDefined
	);
}

#[test]
fn generation_works_without_declared_start_states() {
	// no sentence terminator in the input, so no start state was ever
	// declared and the walk falls back to a random key.
	let mut model = MarkovModel::new(1);
	model.add_text("Way too simple sentence").unwrap();

	assert!(model.transitions().start_states().is_empty());
	assert!(!model.generate(5).text().unwrap().is_empty());
}

#[test]
fn generate_returns_exactly_the_requested_token_count() {
	let mut model = MarkovModel::new(1);
	model.add_text("A. B. C.").unwrap();

	for amount in [0, 1, 2, 5, 32, 100] {
		let tokens = model.generate(amount).tokens().unwrap();
		assert_eq!(tokens.len(), amount);
	}
}

#[test]
fn reseed_tokens_count_toward_the_same_budget() {
	// "x" -> "y" and then ["y"] is a dead end on every step, so this model
	// reseeds constantly. The budget must still be exact.
	let mut model = MarkovModel::new(1);
	model.add_text("x y").unwrap();

	for amount in [1, 2, 3, 17, 64] {
		let tokens = model.generate(amount).tokens().unwrap();
		assert_eq!(tokens.len(), amount);
	}
}

#[test]
fn higher_order_generation_emits_full_windows_on_reseed() {
	let mut model = MarkovModel::new(2);
	model.add_text("a b c. d e f.").unwrap();

	for amount in [0, 1, 2, 3, 10, 33] {
		let tokens = model.generate(amount).tokens().unwrap();
		assert_eq!(tokens.len(), amount);
	}
}

#[test]
fn the_walk_is_lazy_and_unbounded() {
	let mut model = MarkovModel::new(1);
	model.add_text("a a a a").unwrap();

	// pull far more tokens than the input contained.
	let tokens: Vec<_> = model.walk().take(1000).collect::<Result<_, _>>().unwrap();
	assert_eq!(tokens.len(), 1000);
	assert!(tokens.iter().all(|t| t == "a"));
}

#[test]
fn sentence_generation_emits_the_requested_terminator_count() {
	let mut model = MarkovModel::new(1);
	model.add_text("A. B. C.").unwrap();

	// test a few samples to avoid accidental test pass
	for amount in 1..=100 {
		let tokens = model.generate_sentences(amount).tokens().unwrap();
		let terminators = tokens.iter().filter(|t| is_sentence_terminator(t)).count();
		assert_eq!(terminators, amount);

		// the walk stops right after the last terminator.
		assert!(is_sentence_terminator(tokens.last().unwrap()));
	}
}

#[test]
fn sentence_generation_handles_every_terminator_kind() {
	let mut model = MarkovModel::new(1);
	model.add_text("A? B!").unwrap();

	for amount in 1..=100 {
		let text = model.generate_sentences(amount).text().unwrap();
		let terminators = text
			.chars()
			.filter(|c| matches!(c, '.' | '?' | '!'))
			.count();
		assert_eq!(terminators, amount);
	}
}

#[test]
#[should_panic]
fn zero_sentences_is_a_contract_violation() {
	let mut model = MarkovModel::new(1);
	model.add_text("not empty").unwrap();

	model.generate_sentences(0);
}

#[test]
fn generation_does_not_mutate_the_table() {
	let mut model = MarkovModel::new(1);
	model.add_text("A. B. C.").unwrap();

	let before = model.transitions().clone();
	let _ = model.generate(50).tokens().unwrap();
	let _ = model.generate_sentences(3).tokens().unwrap();

	assert_eq!(model.transitions(), &before);
}

#[test]
fn rendered_text_applies_spacing_rules() {
	// a single chain: every walk reproduces the input sentence.
	let mut model = MarkovModel::new(1);
	model.add_text("I have a dream.").unwrap();

	let text = model.generate(5).text().unwrap();
	assert_eq!(text, "I have a dream.");
}
