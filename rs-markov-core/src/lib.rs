//! Markov-chain-based text generation library.
//!
//! This crate provides a word-level Markov chain system including:
//! - Chain construction from raw text with a configurable order
//! - Pluggable tokenizers (word/punctuation splitting, fixed-width n-grams)
//! - Lazy random-walk generation, bounded by word or sentence count
//! - JSON persistence with two interchangeable successor encodings
//!
//! Only the high-level API is exposed publicly. Low-level file helpers
//! are kept internal to ensure consistency and prevent misuse.

/// Core Markov model and generation logic.
///
/// This module exposes the transition table, the model itself and the
/// random-walk generation types.
pub mod model;

/// Tokenization of raw text into chain tokens.
///
/// Provides the `Tokenizer` capability, the default word/punctuation
/// splitter, a fixed-width n-gram splitter and the per-token transforms.
pub mod tokenizer;

/// Failure conditions surfaced by chain construction, generation and
/// persistence.
pub mod error;

/// JSON serialization and deserialization of trained models.
///
/// Supports a verbatim (duplicate-preserving) and a counted
/// (token -> occurrence count) successor encoding.
pub mod persistence;

/// I/O utilities (whole-file reading and writing).
///
/// Not exposed
pub(crate) mod io;
