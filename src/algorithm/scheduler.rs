//! Single-threaded cooperative event loop
//!
//! Work is queued as boxed continuations and executed one per tick in FIFO
//! order. A continuation receives the loop itself so it can schedule the next
//! step of its work, which is how long-running jobs yield between quanta.

use std::collections::VecDeque;
use std::fmt;

/// Deferred unit of work run by the event loop
pub type Continuation<'a> = Box<dyn FnOnce(&mut EventLoop<'a>) + 'a>;

/// FIFO queue of continuations drained one per tick
pub struct EventLoop<'a> {
    queue: VecDeque<Continuation<'a>>,
    ticks: usize,
}

impl Default for EventLoop<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventLoop<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLoop")
            .field("pending", &self.queue.len())
            .field("ticks", &self.ticks)
            .finish()
    }
}

impl<'a> EventLoop<'a> {
    /// Create an empty event loop
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            ticks: 0,
        }
    }

    /// Queue a continuation behind everything already scheduled
    pub fn schedule(&mut self, continuation: impl FnOnce(&mut Self) + 'a) {
        self.queue.push_back(Box::new(continuation));
    }

    /// Run the oldest pending continuation
    ///
    /// Returns `false` if nothing was pending.
    pub fn tick(&mut self) -> bool {
        let Some(continuation) = self.queue.pop_front() else {
            return false;
        };
        self.ticks += 1;
        continuation(self);
        true
    }

    /// Tick until the queue is empty, returning the number of ticks run
    pub fn run_until_idle(&mut self) -> usize {
        let start = self.ticks;
        while self.tick() {}
        self.ticks - start
    }

    /// Number of continuations waiting to run
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Whether no continuation is waiting
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Total continuations executed since creation
    pub const fn ticks(&self) -> usize {
        self.ticks
    }
}
