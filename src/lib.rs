//! Parallel word counter.
//!
//! Splits the input file into one contiguous byte range per worker, scans the
//! ranges concurrently with positional reads, and reconciles words that
//! straddle range seams so each is counted exactly once.

pub mod cli;
pub mod logging;
pub mod partition;
pub mod pipeline;
pub mod scanner;
pub mod source;
pub mod tokenizer;
