//! Top-level module for the Markov chain system.
//!
//! This module provides a word-level Markov text model, including:
//! - The transition table with its start-state bookkeeping (`TransitionTable`)
//! - The model itself, built from raw text (`MarkovModel`)
//! - Lazy random-walk generation (`TokenWalk`, `GenerationResult`)

/// The Markov model: chain construction from text, bounded and unbounded
/// generation, persistence entry points.
pub mod markov_model;

/// State-to-successor bookkeeping of the chain.
///
/// Holds the successor bags and the list of valid generation entry points,
/// and implements weighted random sampling over both.
pub mod transitions;

/// Random-walk generation over a trained transition table.
///
/// Exposes the unbounded lazy token walk and the one-shot generation
/// result with its text rendering.
pub mod generation;
