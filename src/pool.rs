use std::ops::{Deref, DerefMut};

use parking_lot::Mutex;

use crate::record::LogRecord;

/// Upper bound on idle records kept around for reuse.
pub const DEFAULT_MAX_IDLE: usize = 64;

/// Thread-safe free list of cleared [`LogRecord`]s.
///
/// A record handed out by [`acquire`](Self::acquire) is owned by exactly one
/// caller until its guard drops; the guard clears it and puts it back on
/// every exit path, including unwinding and encoder errors.
#[derive(Debug)]
pub struct RecordPool {
    free: Mutex<Vec<LogRecord>>,
    max_idle: usize,
}

impl RecordPool {
    pub fn new(max_idle: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            max_idle,
        }
    }

    /// Take a cleared record from the pool, allocating when it is empty.
    pub fn acquire(&self) -> PooledRecord<'_> {
        let record = self.free.lock().pop().unwrap_or_default();
        PooledRecord {
            pool: self,
            record,
        }
    }

    /// Number of idle records currently waiting for reuse.
    pub fn idle(&self) -> usize {
        self.free.lock().len()
    }

    fn release(&self, mut record: LogRecord) {
        record.clear();
        let mut free = self.free.lock();
        if free.len() < self.max_idle {
            free.push(record);
        }
    }
}

impl Default for RecordPool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IDLE)
    }
}

/// Scoped handle to a pooled record.
pub struct PooledRecord<'a> {
    pool: &'a RecordPool,
    record: LogRecord,
}

impl Deref for PooledRecord<'_> {
    type Target = LogRecord;

    fn deref(&self) -> &LogRecord {
        &self.record
    }
}

impl DerefMut for PooledRecord<'_> {
    fn deref_mut(&mut self) -> &mut LogRecord {
        &mut self.record
    }
}

impl Drop for PooledRecord<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.record));
    }
}
