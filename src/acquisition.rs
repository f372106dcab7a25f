//! The acquisition worker: pulls lines off the source and fans accepted
//! records out to the history and the sink, in strict arrival order.

use crate::history::BoundedHistory;
use crate::parse::parse_line;
use crate::record::Record;
use crate::sink::RecordSink;
use crate::source::LineSource;
use log::{debug, error};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use thiserror::Error;

/// Terminal failures of the acquisition loop. Malformed lines are not errors
/// and never show up here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("serial source read failed: {0}")]
    Source(std::io::Error),
    #[error("record sink write failed: {0}")]
    Sink(std::io::Error),
}

/// Run the acquisition loop to completion.
///
/// Reads until the stop flag is raised, the source closes, or an I/O error
/// hits; then drains: the sink is closed exactly once and the source handle
/// is released. Timestamps are wall-clock seconds since the loop started.
///
/// The stop flag is checked once per iteration, so cancellation is only as
/// prompt as the next line arrival or source close; a blocking read is never
/// interrupted preemptively.
pub fn run_acquisition<S: LineSource>(
    mut source: S,
    history: &BoundedHistory,
    mut sink: Option<RecordSink>,
    stop: &AtomicBool,
) -> Result<(), PipelineError> {
    let started = Instant::now();
    let mut result = Ok(());

    debug!("acquisition loop reading");
    while !stop.load(Ordering::SeqCst) {
        let line = match source.read_line() {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("source closed, draining");
                break;
            }
            Err(err) => {
                error!("source read failed, draining: {err}");
                result = Err(PipelineError::Source(err));
                break;
            }
        };

        // A stop raised while we were blocked in the read wins over the line
        // that unblocked it.
        if stop.load(Ordering::SeqCst) {
            break;
        }

        let Some((channel_a, channel_b)) = parse_line(&line) else {
            continue;
        };
        let record = Record::new(started.elapsed().as_secs_f64(), channel_a, channel_b);

        history.append(record);
        if let Some(sink) = sink.as_mut() {
            if let Err(err) = sink.write(&record) {
                error!("sink write failed, draining: {err}");
                result = Err(PipelineError::Sink(err));
                break;
            }
        }
    }

    if let Some(mut sink) = sink.take() {
        if let Err(err) = sink.close() {
            error!("sink close failed: {err}");
            if result.is_ok() {
                result = Err(PipelineError::Sink(err));
            }
        }
    }
    drop(source);
    debug!("acquisition loop finished");
    result
}
