//! The two queue primitives that bind producers to the single foreground
//! consumer: an ordinary blocking FIFO for jobs, and a single-slot
//! rendezvous channel (with producer backpressure) for UI events.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

/// Thread-safe FIFO with a blocking `take` and a non-blocking `put`.
/// Multiple producers, multiple consumers.
pub struct UnboundedQueue<T> {
    inner: Mutex<VecDeque<T>>,
    not_empty: Condvar,
}

impl<T> Default for UnboundedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> UnboundedQueue<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
            not_empty: Condvar::new(),
        }
    }

    /// Appends `v` and wakes one waiter. Never blocks.
    pub fn put(&self, v: T) {
        let mut guard = self.inner.lock().unwrap();
        guard.push_back(v);
        self.not_empty.notify_one();
    }

    /// Blocks until the queue is non-empty, then removes and returns the
    /// head.
    pub fn take(&self) -> T {
        let mut guard = self.inner.lock().unwrap();
        loop {
            if let Some(v) = guard.pop_front() {
                return v;
            }
            guard = self.not_empty.wait(guard).unwrap();
        }
    }
}

/// Single-slot rendezvous channel with producer backpressure.
///
/// `put` returns only once the consumer has `advance`d past the value it
/// just inserted — this is what guarantees the foreground loop observes
/// (paints for) every event exactly once, with no producer racing ahead of
/// the consumer. Ordering between distinct producers calling `put`
/// concurrently is unspecified; whichever acquires the mutex first wins.
pub struct LockstepQueue<T> {
    slot: Mutex<Option<T>>,
    read_available: Condvar,
    write_available: Condvar,
}

impl<T> Default for LockstepQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LockstepQueue<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            read_available: Condvar::new(),
            write_available: Condvar::new(),
        }
    }

    /// Inserts `v` into the slot, wakes the consumer, then blocks until the
    /// consumer has `advance`d it out again.
    pub fn put(&self, v: T) {
        let mut guard = self.slot.lock().unwrap();
        while guard.is_some() {
            guard = self.write_available.wait(guard).unwrap();
        }
        *guard = Some(v);
        self.read_available.notify_one();

        while guard.is_some() {
            guard = self.write_available.wait(guard).unwrap();
        }
    }

    /// Blocks until the slot is non-empty, then runs `f` against a reference
    /// to the head without removing it, returning `f`'s result.
    ///
    /// The queue's internal lock is held for the duration of `f`, which is
    /// what lets this hand out `&T` instead of requiring `T: Clone`: there is
    /// no other way to keep the value in place (still observable to
    /// `advance`, per the "present until advance" contract) while also
    /// exposing it to the caller without copying it. A concurrent `put`
    /// blocks on acquiring the same lock for that span, which is no looser
    /// than the backpressure contract already requires — a producer is not
    /// supposed to make progress until this value has been `advance`d past
    /// regardless of which primitive it's blocked on.
    pub fn peek_with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let mut guard = self.slot.lock().unwrap();
        while guard.is_none() {
            guard = self.read_available.wait(guard).unwrap();
        }
        f(guard.as_ref().unwrap())
    }

    /// Removes the head, waking any producer blocked in `put`.
    pub fn advance(&self) {
        let mut guard = self.slot.lock().unwrap();
        *guard = None;
        self.write_available.notify_one();
    }
}
