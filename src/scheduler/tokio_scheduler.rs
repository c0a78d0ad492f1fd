use std::time::Duration;

use super::{Scheduler, TaskHandle};

/// Runs tasks on the current tokio `LocalSet`.
///
/// `schedule` must be called from inside `LocalSet::run_until` (or a task
/// spawned on a `LocalSet`), otherwise tokio panics.
#[derive(Clone, Copy, Default)]
pub struct TokioLocalScheduler;

impl Scheduler for TokioLocalScheduler {
  fn schedule<F>(&self, task: F, delay: Duration) -> TaskHandle
  where
    F: FnOnce() + 'static,
  {
    let handle = TaskHandle::new();
    let c_handle = handle.clone();
    let join = tokio::task::spawn_local(async move {
      tokio::time::sleep(delay).await;
      if c_handle.start() {
        task();
      }
    });
    handle.set_abort(move || join.abort());
    handle
  }
}
