use rs_markov_core::model::markov_model::MarkovModel;
use rs_markov_core::persistence::BagEncoding;
use rs_markov_core::tokenizer::token_to_lowercase;

const SAMPLE: &str = "The quick brown fox jumps over the lazy dog. \
    The lazy dog sleeps in the sun. The quick fox runs over the hill. \
    A brown dog barks at the quick fox.";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A chain of order 2 uses the two most recent tokens as lookup context.
    // The lowercase transform folds "The" and "the" into one token.
    let mut model = MarkovModel::new(2).with_before_insert(token_to_lowercase);

    // add_text can be called several times; every call enriches the chain.
    model.add_text(SAMPLE)?;

    println!(
        "Trained {} states with {} start states",
        model.transitions().len(),
        model.transitions().start_states().len()
    );

    // Generate exactly 20 tokens, rendered with punctuation-aware spacing.
    println!("20 words : {}", model.generate(20).text()?);

    // Generate whole sentences instead; this pulls tokens until the second
    // sentence terminator has been emitted.
    println!("2 sentences: {}", model.generate_sentences(2).text()?);

    // Persist the model. The verbatim encoding keeps every successor bag
    // as-is; the counted encoding stores occurrence counts instead.
    let document = model.to_json(BagEncoding::Counted, false)?;
    println!("Counted document is {} bytes", document.len());

    // The document does not say which encoding it uses, the loader has to
    // be told.
    let loaded = MarkovModel::from_json(&document, BagEncoding::Counted)?;
    println!("Reloaded  : {}", loaded.generate(20).text()?);

    // Generating from an untrained model is an error, not a panic.
    let empty = MarkovModel::new(1);
    match empty.generate(10).text() {
        Ok(_) => println!("Should not happen"),
        Err(err) => println!("Untrained model refused: {err}"),
    }

    Ok(())
}
