#![forbid(unsafe_code)]

//! Slot-keyed coalescing scheduler.
//!
//! Side effects that several components may request in the same burst
//! (re-filter after a batch of mounts, scroll the selection into view,
//! select the first item after a search) are queued under a *slot* and run
//! once when the current turn ends.
//!
//! # Turns
//!
//! A turn is delimited by [`TurnGuard`]s: [`Scheduler::begin_turn`] opens
//! one, and dropping the outermost guard flushes the queue. Hosts with a
//! render loop may instead call [`Scheduler::flush`] after each commit.
//! Every public palette entry point opens a guard, so a host without a loop
//! still sees the queue drained by the time its call returns.
//!
//! # Invariants
//!
//! 1. A slot holds at most one pending task; scheduling it again replaces
//!    the task (last write wins) but keeps the slot's original position.
//! 2. Tasks run in the order their slots were first scheduled.
//! 3. Each pending task runs exactly once per flush.
//! 4. Tasks scheduled while flushing run in a follow-up pass of the same
//!    flush; runaway chains are cut after [`MAX_FLUSH_PASSES`] passes.
//! 5. No internal borrow is held while a task runs.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use web_time::Instant;

/// Upper bound on follow-up passes within one flush.
pub const MAX_FLUSH_PASSES: usize = 32;

type Task = Box<dyn FnOnce()>;

struct Queue<K> {
    pending: RefCell<Vec<(K, Task)>>,
    depth: Cell<u32>,
    flushing: Cell<bool>,
    flushes: Cell<u64>,
}

/// Coalescing task queue keyed by slot `K`.
///
/// Cloning shares the queue.
pub struct Scheduler<K> {
    queue: Rc<Queue<K>>,
}

impl<K> Clone for Scheduler<K> {
    fn clone(&self) -> Self {
        Self {
            queue: Rc::clone(&self.queue),
        }
    }
}

impl<K: Copy + Eq + fmt::Debug + 'static> Scheduler<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: Rc::new(Queue {
                pending: RefCell::new(Vec::new()),
                depth: Cell::new(0),
                flushing: Cell::new(false),
                flushes: Cell::new(0),
            }),
        }
    }

    /// Queue `task` under `slot`, replacing any task already pending there.
    pub fn schedule(&self, slot: K, task: impl FnOnce() + 'static) {
        let mut pending = self.queue.pending.borrow_mut();
        if let Some(entry) = pending.iter_mut().find(|(k, _)| *k == slot) {
            tracing::trace!(?slot, "schedule: replacing pending task");
            entry.1 = Box::new(task);
        } else {
            tracing::trace!(?slot, "schedule: queued");
            pending.push((slot, Box::new(task)));
        }
    }

    /// Whether a task is pending under `slot`.
    #[must_use]
    pub fn is_pending(&self, slot: K) -> bool {
        self.queue.pending.borrow().iter().any(|(k, _)| *k == slot)
    }

    /// Slots currently pending, in run order.
    #[must_use]
    pub fn pending_slots(&self) -> Vec<K> {
        self.queue.pending.borrow().iter().map(|(k, _)| *k).collect()
    }

    /// Open a turn. The queue flushes when the outermost guard drops.
    #[must_use = "the turn ends (and the queue flushes) when the guard drops"]
    pub fn begin_turn(&self) -> TurnGuard<K> {
        self.queue.depth.set(self.queue.depth.get() + 1);
        TurnGuard {
            scheduler: self.clone(),
        }
    }

    /// Whether a turn is open.
    #[must_use]
    pub fn in_turn(&self) -> bool {
        self.queue.depth.get() > 0
    }

    /// Number of completed flushes that ran at least one task.
    #[must_use]
    pub fn flush_count(&self) -> u64 {
        self.queue.flushes.get()
    }

    /// Run every pending task.
    ///
    /// Re-entrant calls (a task flushing) return immediately; the outer
    /// flush picks up whatever the task queued.
    pub fn flush(&self) {
        if self.queue.flushing.get() {
            return;
        }
        if self.queue.pending.borrow().is_empty() {
            return;
        }
        let _reset = FlushingReset::enter(&self.queue.flushing);
        let started = Instant::now();
        let mut ran = 0usize;

        for pass in 0..MAX_FLUSH_PASSES {
            let batch = std::mem::take(&mut *self.queue.pending.borrow_mut());
            if batch.is_empty() {
                break;
            }
            tracing::trace!(pass, tasks = batch.len(), "flush pass");
            for (_slot, task) in batch {
                task();
                ran += 1;
            }
        }

        let leftover = self.queue.pending.borrow().len();
        if leftover > 0 {
            tracing::warn!(
                leftover,
                passes = MAX_FLUSH_PASSES,
                "scheduler flush cut short; tasks keep rescheduling themselves"
            );
            self.queue.pending.borrow_mut().clear();
        }

        self.queue.flushes.set(self.queue.flushes.get() + 1);
        tracing::trace!(
            ran,
            elapsed_us = started.elapsed().as_micros() as u64,
            "flush complete"
        );
    }
}

impl<K: Copy + Eq + fmt::Debug + 'static> Default for Scheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug> fmt::Debug for Scheduler<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots: Vec<String> = self
            .queue
            .pending
            .borrow()
            .iter()
            .map(|(k, _)| format!("{k:?}"))
            .collect();
        f.debug_struct("Scheduler")
            .field("pending", &slots)
            .field("depth", &self.queue.depth.get())
            .finish()
    }
}

/// RAII guard for one turn; see the module docs.
#[must_use = "the turn ends (and the queue flushes) when the guard drops"]
pub struct TurnGuard<K: Copy + Eq + fmt::Debug + 'static> {
    scheduler: Scheduler<K>,
}

impl<K: Copy + Eq + fmt::Debug + 'static> Drop for TurnGuard<K> {
    fn drop(&mut self) {
        let depth = self.scheduler.queue.depth.get().saturating_sub(1);
        self.scheduler.queue.depth.set(depth);
        if depth == 0 {
            self.scheduler.flush();
        }
    }
}

impl<K: Copy + Eq + fmt::Debug + 'static> fmt::Debug for TurnGuard<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TurnGuard")
            .field("depth", &self.scheduler.queue.depth.get())
            .finish()
    }
}

/// Clears the flushing flag even if a task panics.
struct FlushingReset<'a>(&'a Cell<bool>);

impl<'a> FlushingReset<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for FlushingReset<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Slot {
        A,
        B,
        C,
    }

    fn log() -> Rc<RefCell<Vec<&'static str>>> {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn nothing_runs_until_flush() {
        let s = Scheduler::new();
        let l = log();
        let l2 = Rc::clone(&l);
        s.schedule(Slot::A, move || l2.borrow_mut().push("a"));
        assert!(l.borrow().is_empty());
        assert!(s.is_pending(Slot::A));
        s.flush();
        assert_eq!(*l.borrow(), vec!["a"]);
        assert!(!s.is_pending(Slot::A));
    }

    #[test]
    fn same_slot_last_write_wins() {
        let s = Scheduler::new();
        let l = log();
        for name in ["first", "second", "third"] {
            let l = Rc::clone(&l);
            s.schedule(Slot::A, move || l.borrow_mut().push(name));
        }
        s.flush();
        assert_eq!(*l.borrow(), vec!["third"]);
    }

    #[test]
    fn slots_keep_first_scheduled_position() {
        let s = Scheduler::new();
        let l = log();
        let push = |name: &'static str| {
            let l = Rc::clone(&l);
            move || l.borrow_mut().push(name)
        };
        s.schedule(Slot::B, push("b1"));
        s.schedule(Slot::A, push("a"));
        s.schedule(Slot::B, push("b2"));
        assert_eq!(s.pending_slots(), vec![Slot::B, Slot::A]);
        s.flush();
        assert_eq!(*l.borrow(), vec!["b2", "a"]);
    }

    #[test]
    fn outermost_guard_flushes() {
        let s = Scheduler::new();
        let l = log();
        {
            let _outer = s.begin_turn();
            {
                let _inner = s.begin_turn();
                let l = Rc::clone(&l);
                s.schedule(Slot::A, move || l.borrow_mut().push("a"));
            }
            assert!(l.borrow().is_empty(), "inner guard must not flush");
            assert!(s.in_turn());
        }
        assert_eq!(*l.borrow(), vec!["a"]);
        assert!(!s.in_turn());
    }

    #[test]
    fn tasks_scheduled_during_flush_run_in_same_flush() {
        let s = Scheduler::new();
        let l = log();
        let s2 = s.clone();
        let l2 = Rc::clone(&l);
        s.schedule(Slot::A, move || {
            l2.borrow_mut().push("a");
            let l3 = Rc::clone(&l2);
            s2.schedule(Slot::C, move || l3.borrow_mut().push("c"));
        });
        s.flush();
        assert_eq!(*l.borrow(), vec!["a", "c"]);
        assert_eq!(s.flush_count(), 1);
    }

    #[test]
    fn guard_dropped_inside_task_does_not_recurse() {
        let s = Scheduler::new();
        let l = log();
        let s2 = s.clone();
        let l2 = Rc::clone(&l);
        s.schedule(Slot::A, move || {
            let _turn = s2.begin_turn();
            let l3 = Rc::clone(&l2);
            s2.schedule(Slot::B, move || l3.borrow_mut().push("b"));
            l2.borrow_mut().push("a");
        });
        s.flush();
        assert_eq!(*l.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn runaway_rescheduling_is_cut() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let s: Scheduler<Slot> = Scheduler::new();
        let count = Rc::new(Cell::new(0usize));

        fn again(s: Scheduler<Slot>, count: Rc<Cell<usize>>) {
            let s2 = s.clone();
            s.schedule(Slot::A, move || {
                count.set(count.get() + 1);
                again(s2, count);
            });
        }

        again(s.clone(), Rc::clone(&count));
        s.flush();
        assert_eq!(count.get(), MAX_FLUSH_PASSES);
        assert!(s.pending_slots().is_empty());
    }

    #[test]
    fn empty_flush_is_not_counted() {
        let s: Scheduler<Slot> = Scheduler::new();
        s.flush();
        assert_eq!(s.flush_count(), 0);
    }

    proptest::proptest! {
        #[test]
        fn each_slot_runs_once_in_first_scheduled_order(
            slots in proptest::collection::vec(0u8..6, 0..40),
        ) {
            let s: Scheduler<u8> = Scheduler::new();
            let ran = Rc::new(RefCell::new(Vec::new()));
            for (seq, slot) in slots.iter().copied().enumerate() {
                let r = Rc::clone(&ran);
                s.schedule(slot, move || r.borrow_mut().push((slot, seq)));
            }
            s.flush();

            let mut expected: Vec<(u8, usize)> = Vec::new();
            for (seq, slot) in slots.iter().copied().enumerate() {
                match expected.iter_mut().find(|(k, _)| *k == slot) {
                    Some(entry) => entry.1 = seq,
                    None => expected.push((slot, seq)),
                }
            }
            let ran = ran.borrow().clone();
            proptest::prop_assert_eq!(ran, expected);
            proptest::prop_assert!(s.pending_slots().is_empty());
        }
    }
}
