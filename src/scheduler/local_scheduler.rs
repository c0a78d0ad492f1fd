use std::time::Duration;

use futures::{
  executor::LocalSpawner,
  future::{abortable, FutureExt},
  task::LocalSpawnExt,
};

use super::{Scheduler, TaskHandle};
use crate::error::SchedulerError;

/// Runs tasks as timer futures on a `futures` single thread executor.
///
/// ```rust
/// use futures::executor::LocalPool;
/// use rxlite::prelude::*;
/// use std::time::Duration;
///
/// let mut pool = LocalPool::new();
/// let scheduler = LocalScheduler::new(pool.spawner());
/// scheduler.schedule(|| println!("later"), Duration::from_millis(1));
/// pool.run();
/// ```
#[derive(Clone)]
pub struct LocalScheduler {
  spawner: LocalSpawner,
}

impl LocalScheduler {
  pub fn new(spawner: LocalSpawner) -> Self { LocalScheduler { spawner } }

  /// Like [`Scheduler::schedule`] but reports executor failures instead of
  /// logging them.
  pub fn try_schedule<F>(&self, task: F, delay: Duration) -> Result<TaskHandle, SchedulerError>
  where
    F: FnOnce() + 'static,
  {
    let handle = TaskHandle::new();
    let (sleep, abort_handle) = abortable(futures_time::task::sleep(delay.into()));
    let c_handle = handle.clone();
    let fut = sleep.map(move |res| {
      if res.is_ok() && c_handle.start() {
        task();
      }
    });
    self.spawner.spawn_local(fut)?;
    handle.set_abort(move || abort_handle.abort());
    Ok(handle)
  }
}

impl Scheduler for LocalScheduler {
  fn schedule<F>(&self, task: F, delay: Duration) -> TaskHandle
  where
    F: FnOnce() + 'static,
  {
    self.try_schedule(task, delay).unwrap_or_else(|err| {
      tracing::error!(error = %err, "timer task dropped");
      TaskHandle::closed()
    })
  }
}
