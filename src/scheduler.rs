//! Scheduling of delayed work.
//!
//! Every time-based operator (`interval`, `throttle_time`, `debounce_time`)
//! takes a [`Scheduler`] and never reads a clock by itself. Tests use the
//! virtual-time [`TestScheduler`]; programs use one of the runtime backed
//! schedulers.

use std::time::Duration;

use crate::{rc::MutRc, subscription::SubscriptionLike};

mod test_scheduler;
pub use test_scheduler::TestScheduler;

#[cfg(feature = "timer")]
mod local_scheduler;
#[cfg(feature = "timer")]
pub use local_scheduler::LocalScheduler;

#[cfg(feature = "tokio-scheduler")]
mod tokio_scheduler;
#[cfg(feature = "tokio-scheduler")]
pub use tokio_scheduler::TokioLocalScheduler;

/// A Scheduler is an object to order task and schedule their execution.
///
/// A scheduled task runs once, on the scheduler's thread, no earlier than
/// `delay` after it was scheduled. Tasks due at the same instant run in the
/// order they were scheduled.
pub trait Scheduler: Clone + 'static {
  fn schedule<F>(&self, task: F, delay: Duration) -> TaskHandle
  where
    F: FnOnce() + 'static;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TaskState {
  Pending,
  Finished,
  Cancelled,
}

struct HandleInner {
  state: TaskState,
  abort: Option<Box<dyn FnOnce()>>,
}

/// Handle of a scheduled task. Unsubscribing it cancels the task if it has
/// not run yet.
///
/// Clones refer to the same task.
#[derive(Clone)]
pub struct TaskHandle(MutRc<HandleInner>);

impl TaskHandle {
  pub fn new() -> Self { TaskHandle(MutRc::own(HandleInner { state: TaskState::Pending, abort: None })) }

  /// A handle for a task that will never run.
  pub fn closed() -> Self {
    TaskHandle(MutRc::own(HandleInner { state: TaskState::Finished, abort: None }))
  }

  /// Marks the task as running. Returns `false` if it was cancelled (or has
  /// already run), in which case the task body must be skipped.
  pub fn start(&self) -> bool {
    let mut inner = self.0.rc_deref_mut();
    if inner.state == TaskState::Pending {
      inner.state = TaskState::Finished;
      inner.abort = None;
      true
    } else {
      false
    }
  }

  /// Installs the runtime specific cancellation, such as aborting the
  /// spawned future.
  pub fn set_abort(&self, abort: impl FnOnce() + 'static) {
    let mut inner = self.0.rc_deref_mut();
    if inner.state == TaskState::Pending {
      inner.abort = Some(Box::new(abort));
    }
  }

  pub fn is_cancelled(&self) -> bool { self.0.rc_deref().state == TaskState::Cancelled }
}

impl Default for TaskHandle {
  fn default() -> Self { Self::new() }
}

impl SubscriptionLike for TaskHandle {
  fn unsubscribe(&mut self) {
    let abort = {
      let mut inner = self.0.rc_deref_mut();
      if inner.state != TaskState::Pending {
        return;
      }
      inner.state = TaskState::Cancelled;
      inner.abort.take()
    };
    if let Some(abort) = abort {
      abort();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.rc_deref().state != TaskState::Pending }
}

#[cfg(test)]
mod test {
  use super::*;
  use std::{cell::Cell, rc::Rc};

  #[test]
  fn cancel_before_start() {
    let aborted = Rc::new(Cell::new(false));
    let c_aborted = aborted.clone();
    let mut handle = TaskHandle::new();
    handle.set_abort(move || c_aborted.set(true));

    handle.clone().unsubscribe();
    assert!(aborted.get());
    assert!(handle.is_cancelled());
    assert!(!handle.start());
    handle.unsubscribe();
  }

  #[test]
  fn cancel_after_start_is_noop() {
    let mut handle = TaskHandle::new();
    assert!(handle.start());
    assert!(handle.is_closed());
    handle.unsubscribe();
    assert!(!handle.is_cancelled());
  }

  #[test]
  fn closed_handle_never_runs() {
    assert!(!TaskHandle::closed().start());
  }
}
