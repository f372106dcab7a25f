/// One accepted sample off the serial line.
///
/// Constructed by the acquisition loop once a line has parsed; the timestamp
/// is elapsed wall-clock seconds since the loop started, stamped by the loop
/// (the parser has no clock). Copied by value into both the history and the
/// sink, never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub elapsed_secs: f64,
    pub channel_a: i64,
    pub channel_b: i64,
}

impl Record {
    pub fn new(elapsed_secs: f64, channel_a: i64, channel_b: i64) -> Self {
        Self {
            elapsed_secs,
            channel_a,
            channel_b,
        }
    }
}
