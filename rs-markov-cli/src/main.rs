use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::{debug, info};

use rs_markov_core::model::markov_model::{DEFAULT_GENERATE_WORD_AMOUNT, MarkovModel};
use rs_markov_core::persistence::BagEncoding;
use rs_markov_core::tokenizer::{NgramTokenizer, token_to_lowercase};

/// Markov chain text generation: train models from text, persist them as
/// JSON documents, and generate new text from them.
#[derive(Parser)]
#[command(name = "rs-markov", version)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Trains a model from text files (or stdin) and emits its JSON document.
	Build {
		/// Text files to import. Stdin is read when none are given.
		files: Vec<PathBuf>,

		/// Order of the Markov chain.
		#[arg(long, default_value_t = 1)]
		order: usize,

		/// Lowercase every token before insertion.
		#[arg(long)]
		normalize: bool,

		/// Use the fixed-width tokenizer with chunks of N characters
		/// instead of word/punctuation splitting.
		#[arg(long, value_name = "N")]
		ngram: Option<usize>,

		/// Store successor bags as token -> occurrence count maps instead
		/// of literal lists.
		#[arg(long)]
		counted: bool,

		/// Emit the compact document layout (no inter-field whitespace).
		#[arg(long)]
		compress: bool,

		/// Write the document to a file instead of stdout.
		#[arg(long, short)]
		output: Option<PathBuf>,
	},
	/// Loads a model document and generates text from it.
	Generate {
		/// Model document file. Stdin is read when absent.
		model: Option<PathBuf>,

		/// Amount of words to generate.
		#[arg(long, default_value_t = DEFAULT_GENERATE_WORD_AMOUNT)]
		words: usize,

		/// Generate this many sentences instead of a fixed word count.
		#[arg(long, value_name = "M", conflicts_with = "words")]
		sentences: Option<usize>,

		/// The document stores counted successor bags.
		#[arg(long)]
		counted: bool,
	},
}

fn bag_encoding(counted: bool) -> BagEncoding {
	if counted {
		BagEncoding::Counted
	} else {
		BagEncoding::Verbatim
	}
}

fn read_stdin() -> std::io::Result<String> {
	let mut buffer = String::new();
	std::io::stdin().read_to_string(&mut buffer)?;
	Ok(buffer)
}

fn build(
	files: Vec<PathBuf>,
	order: usize,
	normalize: bool,
	ngram: Option<usize>,
	counted: bool,
	compress: bool,
	output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
	let mut model = MarkovModel::new(order);
	if normalize {
		model = model.with_before_insert(token_to_lowercase);
	}
	if let Some(n) = ngram {
		model = model.with_tokenizer(NgramTokenizer::new(n));
	}

	if files.is_empty() {
		info!("importing text from stdin");
		model.add_text(&read_stdin()?)?;
	} else {
		for file in &files {
			info!("importing {}", file.display());
			model.add_text(&std::fs::read_to_string(file)?)?;
		}
	}

	debug!(
		"trained {} states, {} start states",
		model.transitions().len(),
		model.transitions().start_states().len()
	);

	let document = model.to_json(bag_encoding(counted), compress)?;
	match output {
		Some(path) => std::fs::write(path, document)?,
		None => println!("{document}"),
	}

	Ok(())
}

fn generate(
	model: Option<PathBuf>,
	words: usize,
	sentences: Option<usize>,
	counted: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let raw = match model {
		Some(path) => {
			info!("loading model from {}", path.display());
			std::fs::read_to_string(path)?
		}
		None => {
			info!("loading model from stdin");
			read_stdin()?
		}
	};
	let model = MarkovModel::from_json(&raw, bag_encoding(counted))?;

	let text = match sentences {
		Some(amount) => model.generate_sentences(amount).text()?,
		None => model.generate(words).text()?,
	};
	println!("{text}");

	Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
	match Cli::parse().command {
		Command::Build {
			files,
			order,
			normalize,
			ngram,
			counted,
			compress,
			output,
		} => build(files, order, normalize, ngram, counted, compress, output),
		Command::Generate {
			model,
			words,
			sentences,
			counted,
		} => generate(model, words, sentences, counted),
	}
}

fn main() {
	env_logger::init();

	// every failure kind is reported the same way, on one line.
	if let Err(err) = run() {
		println!("ERROR: {err}");
	}
}
