//! Single-threaded timer queue on virtual time.
//!
//! Nothing here sleeps. Time only moves when the owner pops due tasks up to
//! some instant; `runner` maps that onto a real or manual `Clock`.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::Duration;

/// Handle to one scheduled task; used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Min-heap of deferred tasks keyed by due time, FIFO among equal due times.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    queue: BinaryHeap<Reverse<(Duration, u64)>>,
    tasks: HashMap<u64, T>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            queue: BinaryHeap::new(),
            tasks: HashMap::new(),
        }
    }

    /// Current virtual time.
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Run `task` once, `delay` after the current virtual time.
    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.queue.push(Reverse((self.now.saturating_add(delay), id)));
        self.tasks.insert(id, task);
        TimerHandle(id)
    }

    /// Drop a task before it fires. Returns false when it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.tasks.remove(&handle.0).is_some()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.tasks.contains_key(&handle.0)
    }

    pub fn get(&self, handle: TimerHandle) -> Option<&T> {
        self.tasks.get(&handle.0)
    }

    /// Number of live (not cancelled, not fired) tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Due time of the earliest live task.
    pub fn next_due(&mut self) -> Option<Duration> {
        self.discard_cancelled();
        self.queue.peek().map(|Reverse((due, _))| *due)
    }

    /// Remove and return the earliest task due at or before `until`,
    /// moving virtual time to its due time.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerHandle, T)> {
        let due = self.next_due()?;
        if due > until {
            return None;
        }
        let Reverse((due, id)) = self.queue.pop()?;
        let task = self.tasks.remove(&id)?;
        self.now = self.now.max(due);
        Some((TimerHandle(id), task))
    }

    /// Move virtual time forward to `t`; never backwards.
    pub fn advance_to(&mut self, t: Duration) {
        self.now = self.now.max(t);
    }

    fn discard_cancelled(&mut self) {
        while let Some(Reverse((_, id))) = self.queue.peek() {
            if self.tasks.contains_key(id) {
                break;
            }
            self.queue.pop();
        }
    }
}
