use std::{convert::Infallible, time::Duration};

use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  rc::MutRc,
  scheduler::Scheduler,
  subscriber::Subscriber,
};

/// Creates an observable which will fire at `period` intervals, emitting
/// `0, 1, 2, ...`. The first value is emitted one `period` after
/// subscribing. Never completes, unsubscribe to stop it.
///
/// # Example
///
/// ```
/// use rxlite::prelude::*;
/// use std::time::Duration;
///
/// let scheduler = TestScheduler::new();
/// let subscription = observable::interval(Duration::from_millis(10), scheduler.clone())
///   .subscribe(|v| println!("tick {}", v));
///
/// scheduler.advance_by(Duration::from_millis(30));
/// subscription.into_inner().unsubscribe();
/// ```
pub fn interval<SD: Scheduler>(period: Duration, scheduler: SD) -> Interval<SD> { Interval { period, scheduler } }

#[derive(Clone)]
pub struct Interval<SD> {
  period: Duration,
  scheduler: SD,
}

impl<SD, O> Observable<usize, Infallible, O> for Interval<SD>
where
  SD: Scheduler,
  O: Observer<usize, Infallible> + 'static,
{
  fn actual_subscribe(self, subscriber: Subscriber<O>) {
    schedule_tick(self.scheduler, self.period, MutRc::own(subscriber), 0);
  }
}

impl<SD: Scheduler> ObservableExt<usize, Infallible> for Interval<SD> {}

fn schedule_tick<SD, O>(scheduler: SD, period: Duration, subscriber: MutRc<Subscriber<O>>, seq: usize)
where
  SD: Scheduler,
  O: Observer<usize, Infallible> + 'static,
{
  let subscription = subscriber.rc_deref().subscription().clone();
  let c_scheduler = scheduler.clone();
  let handle = scheduler.schedule(
    move || {
      subscriber.rc_deref_mut().next(seq);
      let finished = subscriber.rc_deref().is_finished();
      if !finished {
        schedule_tick(c_scheduler, period, subscriber, seq + 1);
      }
    },
    period,
  );
  subscription.add(handle);
}
