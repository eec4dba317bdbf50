//! # Pipeline Module
//!
//! Orchestrates the parallel count: one scan worker per byte range, partial
//! counts collected over a channel, reduced to a single total.

pub mod workers;

use std::sync::Arc;

use crossbeam_channel::bounded;
use thiserror::Error;
use tracing::debug;

use crate::partition::ByteRange;
use crate::scanner::ScanError;
use crate::source::ByteSource;

pub use workers::PartialCount;

#[derive(Debug, Error)]
pub enum CountError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("worker for range {range_index} exited without reporting a result")]
    WorkerLost { range_index: usize },
}

/// Scan every range concurrently and sum the partial counts.
///
/// Each range that does not begin the file gets its boundary byte from a
/// single point read issued here, before the worker's buffered reads begin.
/// Zero-length ranges still get a worker so result collection stays uniform.
/// All workers are joined before returning; a failure in any worker fails the
/// whole run and no partial total is ever reported.
pub fn run(
    source: Arc<dyn ByteSource>,
    ranges: &[ByteRange],
    buffer_capacity: usize,
) -> Result<u64, CountError> {
    // All boundary bytes are fetched before the first spawn; a point-read
    // failure here must not leave already-launched workers unjoined.
    let mut boundary_bytes = Vec::with_capacity(ranges.len());
    for &range in ranges {
        boundary_bytes.push(preceding_byte(source.as_ref(), range)?);
    }

    let (result_tx, result_rx) = bounded(ranges.len().max(1));

    let mut handles = Vec::with_capacity(ranges.len());
    for (&range, &preceding) in ranges.iter().zip(&boundary_bytes) {
        handles.push(workers::spawn_range_worker(
            Arc::clone(&source),
            range,
            preceding,
            buffer_capacity,
            result_tx.clone(),
        ));
    }
    drop(result_tx);

    let mut total = 0u64;
    let mut reported = vec![false; ranges.len()];
    let mut failure: Option<CountError> = None;

    for outcome in result_rx {
        match outcome {
            Ok(partial) => {
                debug!(
                    "range {} counted {} words",
                    partial.range_index, partial.words
                );
                reported[partial.range_index] = true;
                total += partial.words;
            }
            Err(err) => {
                if failure.is_none() {
                    failure = Some(CountError::Scan(err));
                }
            }
        }
    }

    for handle in handles {
        let _ = handle.join();
    }

    if let Some(err) = failure {
        return Err(err);
    }
    if let Some(range_index) = reported.iter().position(|done| !done) {
        return Err(CountError::WorkerLost { range_index });
    }
    Ok(total)
}

/// Point read of the byte immediately before `range`, for ranges that do not
/// start the file. Empty ranges never look behind themselves.
fn preceding_byte(source: &dyn ByteSource, range: ByteRange) -> Result<Option<u8>, ScanError> {
    if range.start == 0 || range.length == 0 {
        return Ok(None);
    }
    let mut byte = [0u8; 1];
    let got = source.read_at(range.start - 1, &mut byte)?;
    if got != 1 {
        return Err(ScanError::ShortRead {
            offset: range.start - 1,
            expected: 1,
            got,
        });
    }
    Ok(Some(byte[0]))
}
