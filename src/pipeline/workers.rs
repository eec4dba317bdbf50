//! Worker thread spawning for the scan pipeline.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::Sender;
use tracing::warn;

use crate::partition::ByteRange;
use crate::scanner::{self, ScanError};
use crate::source::ByteSource;

/// Word count of a single range, owned by its worker until handed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialCount {
    pub range_index: usize,
    pub words: u64,
}

/// Spawn one scan worker. The worker reports exactly one result over
/// `result_tx` and exits; it shares nothing with its siblings beyond the
/// read-only source handle.
pub fn spawn_range_worker(
    source: Arc<dyn ByteSource>,
    range: ByteRange,
    preceding_byte: Option<u8>,
    buffer_capacity: usize,
    result_tx: Sender<Result<PartialCount, ScanError>>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let outcome = scanner::scan_range(source.as_ref(), range, preceding_byte, buffer_capacity)
            .map(|words| PartialCount {
                range_index: range.index,
                words,
            });
        if let Err(err) = result_tx.send(outcome) {
            warn!(
                "result channel closed while sending range {}: {err}",
                range.index
            );
        }
    })
}
