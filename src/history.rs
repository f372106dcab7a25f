//! Bounded, shared history of recent records for the live display.
//!
//! One writer (the acquisition thread) appends, any number of readers take
//! snapshots. A single mutex around the ring keeps every append atomic, so a
//! snapshot can never observe a record with its timestamp in place but a
//! channel value missing.

use crate::record::Record;
use std::sync::Mutex;

/// A consistent copy of the history at one point in time, split into the
/// three index-aligned series the display wants to plot.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub timestamps: Vec<f64>,
    pub channel_a: Vec<i64>,
    pub channel_b: Vec<i64>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Fixed-capacity ring of records, oldest evicted first.
pub struct BoundedHistory {
    inner: Mutex<Ring>,
}

struct Ring {
    slots: Vec<Record>,
    capacity: usize,
    // Index of the oldest record once the ring has wrapped.
    head: usize,
}

impl BoundedHistory {
    /// Capacity must be non-zero; a zero-length history could never hold the
    /// record that was just appended.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be non-zero");
        Self {
            inner: Mutex::new(Ring {
                slots: Vec::with_capacity(capacity),
                capacity,
                head: 0,
            }),
        }
    }

    /// Append one record, evicting the oldest if the ring is full. O(1),
    /// no reallocation once the ring has filled.
    pub fn append(&self, record: Record) {
        let mut ring = self.inner.lock().unwrap();
        if ring.slots.len() < ring.capacity {
            ring.slots.push(record);
        } else {
            let head = ring.head;
            ring.slots[head] = record;
            ring.head = (head + 1) % ring.capacity;
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().slots.is_empty()
    }

    /// Copy out the current contents in arrival order.
    pub fn snapshot(&self) -> Snapshot {
        let ring = self.inner.lock().unwrap();
        let len = ring.slots.len();
        let mut snap = Snapshot {
            timestamps: Vec::with_capacity(len),
            channel_a: Vec::with_capacity(len),
            channel_b: Vec::with_capacity(len),
        };
        for i in 0..len {
            let record = ring.slots[(ring.head + i) % len];
            snap.timestamps.push(record.elapsed_secs);
            snap.channel_a.push(record.channel_a);
            snap.channel_b.push(record.channel_b);
        }
        snap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn rec(n: i64) -> Record {
        Record::new(n as f64, n, n * 10)
    }

    #[test]
    fn appends_in_order_below_capacity() {
        let history = BoundedHistory::new(10);
        for n in 1..=4 {
            history.append(rec(n));
        }
        assert_eq!(history.len(), 4);
        assert_eq!(history.snapshot().channel_a, vec![1, 2, 3, 4]);
    }

    #[test]
    fn evicts_oldest_at_capacity() {
        let history = BoundedHistory::new(3);
        for n in 1..=5 {
            history.append(rec(n));
        }
        let snap = history.snapshot();
        assert_eq!(history.len(), 3);
        assert_eq!(snap.channel_a, vec![3, 4, 5]);
        assert_eq!(snap.channel_b, vec![30, 40, 50]);
        assert_eq!(snap.timestamps, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn keeps_exactly_last_capacity_records() {
        let history = BoundedHistory::new(200);
        for n in 0..1000 {
            history.append(rec(n));
        }
        let snap = history.snapshot();
        assert_eq!(snap.len(), 200);
        assert_eq!(snap.channel_a, (800..1000).collect::<Vec<_>>());
    }

    #[test]
    fn empty_history_snapshot() {
        let history = BoundedHistory::new(5);
        assert!(history.is_empty());
        assert!(history.snapshot().is_empty());
    }

    #[test]
    fn snapshots_stay_aligned_under_concurrent_appends() {
        let history = Arc::new(BoundedHistory::new(16));
        let writer = {
            let history = Arc::clone(&history);
            thread::spawn(move || {
                for n in 0..5000 {
                    history.append(rec(n));
                }
            })
        };

        for _ in 0..2000 {
            let snap = history.snapshot();
            assert_eq!(snap.timestamps.len(), snap.channel_a.len());
            assert_eq!(snap.channel_a.len(), snap.channel_b.len());
            // Arrival order must survive the ring wrap.
            for pair in snap.channel_a.windows(2) {
                assert!(pair[0] < pair[1]);
            }
        }
        writer.join().unwrap();
    }
}
