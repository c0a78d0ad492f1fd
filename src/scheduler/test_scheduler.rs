//! Test Scheduler for deterministic testing of time-based operators.
//!
//! Provides virtual time that only advances when explicitly instructed,
//! enabling deterministic testing of `debounce_time`, `interval`, etc.
//!
//! # Usage
//!
//! ```rust
//! use rxlite::prelude::*;
//! use std::time::Duration;
//!
//! let scheduler = TestScheduler::new();
//! let mut seen = vec![];
//! let subscription = observable::interval(Duration::from_millis(100), scheduler.clone())
//!   .subscribe(move |v| seen.push(v));
//!
//! // Advance virtual time to trigger the first two ticks
//! scheduler.advance_by(Duration::from_millis(200));
//! subscription.into_inner().unsubscribe();
//! assert_eq!(scheduler.pending_tasks(), 0);
//! ```
//!
//! Clones of a scheduler share the same clock and task queue, independent
//! schedulers do not see each other's tasks.

use std::{cmp::Ordering, collections::BinaryHeap, time::Duration};

use super::{Scheduler, TaskHandle};
use crate::{rc::MutRc, subscription::SubscriptionLike};

#[derive(Default)]
struct TestSchedulerState {
  virtual_time: Duration,
  task_queue: BinaryHeap<ScheduledTask>,
  next_task_id: usize,
}

struct ScheduledTask {
  scheduled_time: Duration,
  task_id: usize,
  task: Box<dyn FnOnce()>,
  handle: TaskHandle,
}

impl PartialEq for ScheduledTask {
  fn eq(&self, other: &Self) -> bool {
    self.scheduled_time == other.scheduled_time && self.task_id == other.task_id
  }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for ScheduledTask {
  fn cmp(&self, other: &Self) -> Ordering {
    // Min-heap: earlier times first, then FIFO by task_id
    other
      .scheduled_time
      .cmp(&self.scheduled_time)
      .then_with(|| other.task_id.cmp(&self.task_id))
  }
}

/// A virtual time scheduler for deterministic testing.
///
/// Time starts at zero and only moves through [`advance_by`],
/// [`advance_to`] or [`flush`]. Tasks run synchronously inside those calls.
///
/// [`advance_by`]: TestScheduler::advance_by
/// [`advance_to`]: TestScheduler::advance_to
/// [`flush`]: TestScheduler::flush
#[derive(Clone, Default)]
pub struct TestScheduler(MutRc<TestSchedulerState>);

impl TestScheduler {
  pub fn new() -> Self { Self::default() }

  /// Get the current virtual time.
  pub fn now(&self) -> Duration { self.0.rc_deref().virtual_time }

  /// Number of scheduled tasks that were neither run nor cancelled.
  pub fn pending_tasks(&self) -> usize {
    self
      .0
      .rc_deref()
      .task_queue
      .iter()
      .filter(|t| !t.handle.is_closed())
      .count()
  }

  /// Advance virtual time by the specified duration and execute due tasks.
  pub fn advance_by(&self, duration: Duration) {
    let target = self.now() + duration;
    self.advance_to(target);
  }

  /// Advance virtual time to `target` and execute every task due at or
  /// before it.
  ///
  /// Tasks are executed in order of their scheduled time, with FIFO ordering
  /// for tasks scheduled at the same time. While a task runs, `now()` reports
  /// its scheduled time, so tasks it schedules are placed relative to it.
  /// Moving backwards is a no-op.
  pub fn advance_to(&self, target: Duration) {
    self.execute_tasks_until(Some(target));
    let mut state = self.0.rc_deref_mut();
    if state.virtual_time < target {
      state.virtual_time = target;
    }
  }

  /// Execute all pending tasks by advancing time to each task's scheduled time.
  ///
  /// Never returns while a self rescheduling source such as `interval` is
  /// still subscribed.
  pub fn flush(&self) { self.execute_tasks_until(None) }

  fn execute_tasks_until(&self, target_time: Option<Duration>) {
    loop {
      let task = {
        let mut state = self.0.rc_deref_mut();
        let due = state
          .task_queue
          .peek()
          .is_some_and(|peek| target_time.map_or(true, |limit| peek.scheduled_time <= limit));
        if !due {
          break;
        }
        let task = state.task_queue.pop();
        if let Some(task) = &task {
          if state.virtual_time < task.scheduled_time {
            state.virtual_time = task.scheduled_time;
          }
        }
        task
      };

      // The borrow is released here, tasks may schedule more tasks.
      if let Some(ScheduledTask { task, handle, .. }) = task {
        if handle.start() {
          task();
        } else {
          tracing::trace!("skip cancelled task");
        }
      }
    }
  }
}

impl Scheduler for TestScheduler {
  fn schedule<F>(&self, task: F, delay: Duration) -> TaskHandle
  where
    F: FnOnce() + 'static,
  {
    let mut state = self.0.rc_deref_mut();
    let handle = TaskHandle::new();
    let task_id = state.next_task_id;
    state.next_task_id += 1;
    let scheduled_time = state.virtual_time + delay;
    state.task_queue.push(ScheduledTask {
      scheduled_time,
      task_id,
      task: Box::new(task),
      handle: handle.clone(),
    });
    handle
  }
}
